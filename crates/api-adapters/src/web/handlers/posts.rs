use axum::extract::{Path, State};
use axum::Json;
use domains::{Post, PostFull, PostUpdate, Related};

use crate::web::error::ApiResult;
use crate::web::extract::{post_id, JsonBody, QueryParams, RelatedParams};
use crate::web::state::AppState;

/// `GET /post/{id}/details?related=user,thread,forum`
pub async fn details(
    State(state): State<AppState>,
    Path(id): Path<String>,
    QueryParams(params): QueryParams<RelatedParams>,
) -> ApiResult<Json<PostFull>> {
    let id = post_id(&id)?;
    let related = params
        .related
        .as_deref()
        .map(Related::parse)
        .unwrap_or_default();
    Ok(Json(state.posts.details(id, related).await?))
}

/// `POST /post/{id}/details`
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(update): JsonBody<PostUpdate>,
) -> ApiResult<Json<Post>> {
    let id = post_id(&id)?;
    Ok(Json(state.posts.update(id, update).await?))
}
