//! forum/crates/storage-adapters/src/lib.rs
//!
//! Persistence adapters implementing the `domains` repository ports.
//! Each backend is compiled in behind its own cargo feature.

#[cfg(feature = "db-postgres")]
pub mod postgres;

#[cfg(feature = "db-postgres")]
pub use postgres::PgRepository;
