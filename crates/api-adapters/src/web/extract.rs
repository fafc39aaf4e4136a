//! Request extractors and query-string parsing.
//!
//! axum's own rejections answer with plain-text bodies and a variety of
//! status codes; these wrappers turn every malformed input into a `400` with
//! the usual JSON error body.

use axum::extract::{FromRequest, FromRequestParts, Query, Request};
use axum::http::request::Parts;
use axum::Json;
use chrono::{DateTime, Utc};
use domains::{ForumUsersQuery, PostsQuery, SortMode, ThreadsQuery};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use super::error::ApiError;

/// JSON request body. Missing, mistyped or malformed bodies are `400`.
#[derive(Debug, Clone)]
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;
        Ok(JsonBody(value))
    }
}

/// Query string deserialized into `T`, rejected with `400`.
#[derive(Debug, Clone)]
pub struct QueryParams<T>(pub T);

impl<S, T> FromRequestParts<S> for QueryParams<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;
        Ok(QueryParams(value))
    }
}

/// Raw pagination parameters. Values are kept as strings so that each
/// listing can parse `since` in its own way.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageParams {
    pub limit: Option<String>,
    pub since: Option<String>,
    pub desc: Option<String>,
    pub sort: Option<String>,
}

impl PageParams {
    pub fn limit(&self, default: i64) -> Result<i64, ApiError> {
        match self.limit.as_deref() {
            None => Ok(default),
            Some(raw) => match raw.parse::<i64>() {
                Ok(limit) if limit >= 0 => Ok(limit),
                _ => Err(ApiError::bad_request(format!("invalid limit: {raw}"))),
            },
        }
    }

    pub fn desc(&self) -> Result<bool, ApiError> {
        match self.desc.as_deref() {
            None => Ok(false),
            Some(raw) => raw
                .parse::<bool>()
                .map_err(|_| ApiError::bad_request(format!("invalid desc: {raw}"))),
        }
    }

    pub fn posts_query(&self, default_limit: i64) -> Result<PostsQuery, ApiError> {
        let since = self
            .since
            .as_deref()
            .map(|raw| {
                raw.parse::<i64>()
                    .map_err(|_| ApiError::bad_request(format!("invalid since: {raw}")))
            })
            .transpose()?;
        let sort = match self.sort.as_deref() {
            Some(raw) => raw.parse::<SortMode>().unwrap_or_default(),
            None => SortMode::Flat,
        };

        Ok(PostsQuery {
            limit: self.limit(default_limit)?,
            since,
            sort,
            desc: self.desc()?,
        })
    }

    pub fn threads_query(&self, default_limit: i64) -> Result<ThreadsQuery, ApiError> {
        let since = self
            .since
            .as_deref()
            .map(|raw| {
                DateTime::parse_from_rfc3339(raw)
                    .map(|at| at.with_timezone(&Utc))
                    .map_err(|_| ApiError::bad_request(format!("invalid since: {raw}")))
            })
            .transpose()?;

        Ok(ThreadsQuery {
            limit: self.limit(default_limit)?,
            since,
            desc: self.desc()?,
        })
    }

    pub fn users_query(&self, default_limit: i64) -> Result<ForumUsersQuery, ApiError> {
        Ok(ForumUsersQuery {
            limit: self.limit(default_limit)?,
            since: self.since.clone(),
            desc: self.desc()?,
        })
    }
}

/// `?related=user,thread,forum` on post details.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RelatedParams {
    pub related: Option<String>,
}

/// Parses the `{id}` path segment of post routes.
pub fn post_id(raw: &str) -> Result<i64, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::bad_request(format!("invalid post id: {raw}")))
}
