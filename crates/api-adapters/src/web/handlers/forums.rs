use axum::extract::{Path, State};
use axum::response::Response;
use axum::Json;
use domains::{Forum, NewForum, NewThread, Thread, User};
use tracing::instrument;

use super::created_or_conflict;
use crate::web::error::ApiResult;
use crate::web::extract::{JsonBody, PageParams, QueryParams};
use crate::web::state::AppState;

/// `POST /forum/create`
#[instrument(skip(state, forum), fields(slug = %forum.slug))]
pub async fn create(
    State(state): State<AppState>,
    JsonBody(forum): JsonBody<NewForum>,
) -> ApiResult<Response> {
    let outcome = state.forums.create(forum).await?;
    Ok(created_or_conflict(outcome))
}

/// `GET /forum/{slug}/details`
pub async fn details(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> ApiResult<Json<Forum>> {
    Ok(Json(state.forums.details(&slug).await?))
}

/// `POST /forum/{slug}/create`
#[instrument(skip(state, thread))]
pub async fn create_thread(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    JsonBody(thread): JsonBody<NewThread>,
) -> ApiResult<Response> {
    let outcome = state.forums.create_thread(&slug, thread).await?;
    Ok(created_or_conflict(outcome))
}

/// `GET /forum/{slug}/threads?limit&since&desc`, `since` being a timestamp.
pub async fn threads(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    QueryParams(params): QueryParams<PageParams>,
) -> ApiResult<Json<Vec<Thread>>> {
    let query = params.threads_query(state.default_limit)?;
    Ok(Json(state.forums.threads(&slug, &query).await?))
}

/// `GET /forum/{slug}/users?limit&since&desc`, `since` being a nickname.
pub async fn users(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    QueryParams(params): QueryParams<PageParams>,
) -> ApiResult<Json<Vec<User>>> {
    let query = params.users_query(state.default_limit)?;
    Ok(Json(state.forums.users(&slug, &query).await?))
}
