use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use domains::{NewPost, Post, Thread, ThreadRef, ThreadUpdate, Vote};
use tracing::instrument;

use crate::web::error::ApiResult;
use crate::web::extract::{JsonBody, PageParams, QueryParams};
use crate::web::state::AppState;

/// `POST /thread/{slug_or_id}/create`: a batch of posts, stored all or nothing.
#[instrument(skip(state, posts), fields(count = posts.len()))]
pub async fn create_posts(
    State(state): State<AppState>,
    Path(slug_or_id): Path<String>,
    JsonBody(posts): JsonBody<Vec<NewPost>>,
) -> ApiResult<(StatusCode, Json<Vec<Post>>)> {
    let thread = ThreadRef::parse(&slug_or_id);
    let created = state.posts.create(&thread, posts).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// `GET /thread/{slug_or_id}/details`
pub async fn details(
    State(state): State<AppState>,
    Path(slug_or_id): Path<String>,
) -> ApiResult<Json<Thread>> {
    let thread = ThreadRef::parse(&slug_or_id);
    Ok(Json(state.threads.details(&thread).await?))
}

/// `POST /thread/{slug_or_id}/details`
#[instrument(skip(state, update))]
pub async fn update(
    State(state): State<AppState>,
    Path(slug_or_id): Path<String>,
    JsonBody(update): JsonBody<ThreadUpdate>,
) -> ApiResult<Json<Thread>> {
    let thread = ThreadRef::parse(&slug_or_id);
    Ok(Json(state.threads.update(&thread, update).await?))
}

/// `GET /thread/{slug_or_id}/posts?limit&since&sort&desc`
pub async fn posts(
    State(state): State<AppState>,
    Path(slug_or_id): Path<String>,
    QueryParams(params): QueryParams<PageParams>,
) -> ApiResult<Json<Vec<Post>>> {
    let query = params.posts_query(state.default_limit)?;
    let thread = ThreadRef::parse(&slug_or_id);
    Ok(Json(state.threads.posts(&thread, &query).await?))
}

/// `POST /thread/{slug_or_id}/vote`
#[instrument(skip(state, vote), fields(nickname = %vote.nickname, voice = vote.voice))]
pub async fn vote(
    State(state): State<AppState>,
    Path(slug_or_id): Path<String>,
    JsonBody(vote): JsonBody<Vote>,
) -> ApiResult<Json<Thread>> {
    let thread = ThreadRef::parse(&slug_or_id);
    Ok(Json(state.threads.vote(&thread, vote).await?))
}
