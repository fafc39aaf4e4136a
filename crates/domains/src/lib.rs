//! forum/crates/domains/src/lib.rs
//!
//! The central domain types and port definitions for the forum.

pub mod error;
pub mod models;
pub mod query;
pub mod traits;
pub mod vote;

// Re-exporting for easier access in other crates
pub use error::*;
pub use models::*;
pub use query::*;
pub use traits::*;
