//! # DomainError
//!
//! Centralized error handling for the forum.
//! Every adapter maps its failures into one of these variants and the HTTP
//! layer maps each variant to exactly one status code.

use thiserror::Error;

/// The primary error type for all domain and repository operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Referenced forum, thread, user or post is absent
    #[error("{0}")]
    NotFound(String),

    /// Unique key collision, or a post whose parent lives in another thread
    #[error("{0}")]
    Conflict(String),

    /// Malformed body or unparsable parameter
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Storage failure (e.g., DB down)
    #[error("internal service error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn not_found(what: impl Into<String>) -> Self {
        DomainError::NotFound(what.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, DomainError::NotFound(_))
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, DomainError::Conflict(_))
    }
}

/// Message returned when a post's parent belongs to a different thread.
pub const WRONG_PARENT: &str = "Parent post was created in another thread";

/// A specialized Result type for forum logic.
pub type Result<T> = std::result::Result<T, DomainError>;
