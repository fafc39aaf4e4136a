use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use domains::Status;

use crate::web::error::ApiResult;
use crate::web::state::AppState;

/// `POST /service/clear`
pub async fn clear(State(state): State<AppState>) -> ApiResult<StatusCode> {
    state.admin.clear().await?;
    Ok(StatusCode::OK)
}

/// `GET /service/status`
pub async fn status(State(state): State<AppState>) -> ApiResult<Json<Status>> {
    Ok(Json(state.admin.status().await?))
}
