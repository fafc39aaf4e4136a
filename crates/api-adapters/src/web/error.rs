//! Mapping of domain failures onto HTTP responses.
//!
//! Every error body has the shape `{"message": "..."}`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use domains::DomainError;
use serde_json::json;

#[derive(Debug)]
pub struct ApiError(pub DomainError);

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError(DomainError::BadRequest(message.into()))
    }

    pub fn status(&self) -> StatusCode {
        match self.0 {
            DomainError::NotFound(_) => StatusCode::NOT_FOUND,
            DomainError::Conflict(_) => StatusCode::CONFLICT,
            DomainError::BadRequest(_) => StatusCode::BAD_REQUEST,
            DomainError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self.0 {
            DomainError::Internal(detail) => {
                tracing::error!(%detail, "request failed");
                "internal server error".to_string()
            }
            other => other.to_string(),
        };
        (status, Json(json!({ "message": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_variant_has_one_status() {
        let cases = [
            (DomainError::not_found("x"), StatusCode::NOT_FOUND),
            (DomainError::Conflict("x".into()), StatusCode::CONFLICT),
            (DomainError::BadRequest("x".into()), StatusCode::BAD_REQUEST),
            (
                DomainError::Internal("x".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError(err).into_response().status(), status);
        }
    }

    #[tokio::test]
    async fn internal_details_stay_in_the_log() {
        let response = ApiError(DomainError::Internal("pool timed out".into())).into_response();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body, json!({ "message": "internal server error" }));
    }
}
