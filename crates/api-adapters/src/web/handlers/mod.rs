//! # Handlers
//!
//! Thin adapters between HTTP requests and the forum services. Each handler
//! parses its inputs, calls one service method and picks the status code.

pub mod forums;
pub mod posts;
pub mod service;
pub mod threads;
pub mod users;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use domains::Outcome;
use serde::Serialize;

/// `201` with the created entity, or `409` with whatever already holds the key.
pub(crate) fn created_or_conflict<T: Serialize, C: Serialize>(outcome: Outcome<T, C>) -> Response {
    match outcome {
        Outcome::Created(created) => (StatusCode::CREATED, Json(created)).into_response(),
        Outcome::Conflict(existing) => (StatusCode::CONFLICT, Json(existing)).into_response(),
    }
}
