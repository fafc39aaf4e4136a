use axum::extract::{Path, State};
use axum::response::Response;
use axum::Json;
use domains::{User, UserProfile, UserUpdate};
use tracing::instrument;

use super::created_or_conflict;
use crate::web::error::ApiResult;
use crate::web::extract::JsonBody;
use crate::web::state::AppState;

/// `POST /user/{nickname}/create`
#[instrument(skip(state, profile))]
pub async fn create(
    State(state): State<AppState>,
    Path(nickname): Path<String>,
    JsonBody(profile): JsonBody<UserProfile>,
) -> ApiResult<Response> {
    let outcome = state.users.create(&nickname, profile).await?;
    Ok(created_or_conflict(outcome))
}

/// `GET /user/{nickname}/profile`
pub async fn profile(
    State(state): State<AppState>,
    Path(nickname): Path<String>,
) -> ApiResult<Json<User>> {
    Ok(Json(state.users.profile(&nickname).await?))
}

/// `POST /user/{nickname}/profile`
#[instrument(skip(state, update))]
pub async fn update(
    State(state): State<AppState>,
    Path(nickname): Path<String>,
    JsonBody(update): JsonBody<UserUpdate>,
) -> ApiResult<Json<User>> {
    Ok(Json(state.users.update(&nickname, update).await?))
}
