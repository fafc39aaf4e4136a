//! # Core Traits (Ports)
//!
//! Any storage adapter must implement these traits to be used by the services.
//! Lookups return `Ok(None)` for absent rows; writes report collisions as
//! [`DomainError::Conflict`](crate::DomainError::Conflict).

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{
    Forum, NewForum, NewPost, NewThread, Post, Status, Thread, User, UserUpdate, Vote,
};
use crate::query::{ForumUsersQuery, PostsQuery, ThreadRef, ThreadsQuery};

#[cfg(feature = "testing")]
use mockall::automock;

/// Persistence contract for users.
#[cfg_attr(feature = "testing", automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fails with `Conflict` when the nickname or email is taken.
    async fn create(&self, user: &User) -> Result<()>;
    async fn find_by_nickname(&self, nickname: &str) -> Result<Option<User>>;
    /// Every user whose nickname or email matches, case-insensitively.
    async fn find_conflicting(&self, nickname: &str, email: &str) -> Result<Vec<User>>;
    /// Applies the set fields of `update`. `Ok(None)` when the user is absent.
    async fn update(&self, nickname: &str, update: &UserUpdate) -> Result<Option<User>>;
}

/// Persistence contract for forums and their listings.
#[cfg_attr(feature = "testing", automock)]
#[async_trait]
pub trait ForumRepository: Send + Sync {
    /// `forum.user` must already be the owner's canonical nickname.
    async fn create(&self, forum: &NewForum) -> Result<Forum>;
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Forum>>;
    async fn list_threads(&self, slug: &str, query: &ThreadsQuery) -> Result<Vec<Thread>>;
    /// Users who authored a thread or a post in the forum.
    async fn list_users(&self, slug: &str, query: &ForumUsersQuery) -> Result<Vec<User>>;
}

/// Persistence contract for threads and votes.
#[cfg_attr(feature = "testing", automock)]
#[async_trait]
pub trait ThreadRepository: Send + Sync {
    /// Inserts the thread and bumps the forum's thread counter as one unit.
    async fn create(&self, thread: &NewThread) -> Result<Thread>;
    async fn find(&self, thread: &ThreadRef) -> Result<Option<Thread>>;
    async fn update(&self, id: i64, title: &str, message: &str) -> Result<Thread>;
    /// Records the vote and adjusts the tally by the delta as one unit.
    async fn vote(&self, thread_id: i64, vote: &Vote) -> Result<Thread>;
}

/// Persistence contract for posts.
#[cfg_attr(feature = "testing", automock)]
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// All-or-nothing batch insert. Unknown author is `NotFound`, a parent
    /// outside `thread` is `Conflict`. Parents must already be stored: a post
    /// replying to an earlier post of the same batch is a `Conflict` too.
    async fn create_batch(&self, thread: &Thread, posts: &[NewPost]) -> Result<Vec<Post>>;
    async fn find(&self, id: i64) -> Result<Option<Post>>;
    async fn update_message(&self, id: i64, message: &str) -> Result<Option<Post>>;
    /// Every post of the thread in id order, for in-process linearization.
    async fn list_by_thread(&self, thread_id: i64) -> Result<Vec<Post>>;
    /// One page of the thread's posts, ordered and paginated by the store.
    async fn list_sorted(&self, thread_id: i64, query: &PostsQuery) -> Result<Vec<Post>>;
}

/// Operational endpoints: reset and aggregate counts.
#[cfg_attr(feature = "testing", automock)]
#[async_trait]
pub trait AdminRepository: Send + Sync {
    async fn clear(&self) -> Result<()>;
    async fn status(&self) -> Result<Status>;
}
