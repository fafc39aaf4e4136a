//! forum/crates/api-adapters/src/lib.rs
//!
//! Delivery adapters exposing the forum services over HTTP.
//! Each transport is compiled in behind its own cargo feature.

#[cfg(feature = "web-axum")]
pub mod web;

#[cfg(feature = "web-axum")]
pub use web::{router, AppState};
