//! # Domain Models
//!
//! These structs represent the core entities of the forum: users, forums,
//! threads and posts, plus the request payloads that create or patch them.
//! Field names follow the public JSON contract (`isEdited`, `user`, ...).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A registered forum member. `nickname` and `email` are unique, compared
/// case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub nickname: String,
    pub fullname: String,
    pub email: String,
    #[serde(default)]
    pub about: String,
}

/// Body of `POST /user/{nickname}/create`. The nickname comes from the path.
#[derive(Debug, Clone, Deserialize)]
pub struct UserProfile {
    pub fullname: String,
    pub email: String,
    #[serde(default)]
    pub about: String,
}

impl UserProfile {
    pub fn into_user(self, nickname: &str) -> User {
        User {
            nickname: nickname.to_string(),
            fullname: self.fullname,
            email: self.email,
            about: self.about,
        }
    }
}

/// Partial profile update. Omitted fields keep their stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct UserUpdate {
    pub fullname: Option<String>,
    pub email: Option<String>,
    pub about: Option<String>,
}

impl UserUpdate {
    pub fn is_empty(&self) -> bool {
        self.fullname.is_none() && self.email.is_none() && self.about.is_none()
    }
}

/// A top-level discussion area. `threads` and `posts` are running counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Forum {
    pub slug: String,
    pub title: String,
    /// Canonical nickname of the owner
    pub user: String,
    #[serde(default)]
    pub threads: i64,
    #[serde(default)]
    pub posts: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewForum {
    pub slug: String,
    pub title: String,
    pub user: String,
}

/// A discussion inside a forum holding nested posts and a vote tally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thread {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub forum: String,
    pub message: String,
    pub votes: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    pub created: DateTime<Utc>,
}

/// Body of `POST /forum/{slug}/create`.
#[derive(Debug, Clone, Deserialize)]
pub struct NewThread {
    pub title: String,
    pub author: String,
    pub message: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub created: Option<DateTime<Utc>>,
    /// Filled from the path by the service; ignored in the body
    #[serde(skip)]
    pub forum: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ThreadUpdate {
    pub title: Option<String>,
    pub message: Option<String>,
}

/// A message within a thread. `parent == 0` marks a top-level post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: i64,
    #[serde(default)]
    pub parent: i64,
    pub author: String,
    pub message: String,
    #[serde(default)]
    pub is_edited: bool,
    pub forum: String,
    pub thread: i64,
    pub created: DateTime<Utc>,
}

impl Post {
    pub fn is_root(&self) -> bool {
        self.parent == 0
    }
}

/// One element of the batch body of `POST /thread/{slug_or_id}/create`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewPost {
    #[serde(default)]
    pub parent: i64,
    pub author: String,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PostUpdate {
    pub message: Option<String>,
}

/// Body of `POST /thread/{slug_or_id}/vote`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Vote {
    pub nickname: String,
    pub voice: i32,
}

/// A post together with the related entities requested via `?related=`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostFull {
    pub post: Post,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<User>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thread: Option<Thread>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forum: Option<Forum>,
}

/// Which related entities to attach to a [`PostFull`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Related {
    pub user: bool,
    pub thread: bool,
    pub forum: bool,
}

impl Related {
    /// Parses the comma separated `related` query value. Unknown names are ignored.
    pub fn parse(raw: &str) -> Self {
        let mut related = Related::default();
        for part in raw.split(',').map(str::trim) {
            match part {
                "user" => related.user = true,
                "thread" => related.thread = true,
                "forum" => related.forum = true,
                _ => {}
            }
        }
        related
    }
}

/// Aggregate row counts reported by `GET /service/status`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Status {
    pub user: i64,
    pub forum: i64,
    pub thread: i64,
    pub post: i64,
}

/// Result of a create call that may collide with existing rows.
///
/// A collision is not an error for the caller: the API answers `409` with the
/// rows that already occupy the unique key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T, C = T> {
    Created(T),
    Conflict(C),
}
