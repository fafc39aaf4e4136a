use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use domains::vote::validate_voice;
use domains::{
    DomainError, Post, PostRepository, PostsQuery, Result, Thread, ThreadRef, ThreadRepository,
    ThreadUpdate, UserRepository, Vote,
};

use crate::post_tree;
use crate::users::user_not_found;

/// Where a thread's posts get ordered for `GET /thread/{slug_or_id}/posts`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TreeStrategy {
    /// Materialized-path ordering inside the database.
    #[default]
    Database,
    /// Fetch every post of the thread and linearize in the service.
    InProcess,
}

impl FromStr for TreeStrategy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "database" => Ok(TreeStrategy::Database),
            "in_process" => Ok(TreeStrategy::InProcess),
            other => Err(format!(
                "unknown tree strategy '{other}', expected 'database' or 'in_process'"
            )),
        }
    }
}

impl fmt::Display for TreeStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TreeStrategy::Database => "database",
            TreeStrategy::InProcess => "in_process",
        })
    }
}

/// Thread details, edits, votes and post listings.
#[derive(Clone)]
pub struct ThreadService {
    threads: Arc<dyn ThreadRepository>,
    posts: Arc<dyn PostRepository>,
    users: Arc<dyn UserRepository>,
    strategy: TreeStrategy,
}

impl ThreadService {
    pub fn new(
        threads: Arc<dyn ThreadRepository>,
        posts: Arc<dyn PostRepository>,
        users: Arc<dyn UserRepository>,
        strategy: TreeStrategy,
    ) -> Self {
        Self {
            threads,
            posts,
            users,
            strategy,
        }
    }

    pub async fn details(&self, thread: &ThreadRef) -> Result<Thread> {
        resolve_thread(self.threads.as_ref(), thread).await
    }

    /// Omitted title or message keep their stored value; an empty patch
    /// returns the thread untouched.
    pub async fn update(&self, thread: &ThreadRef, update: ThreadUpdate) -> Result<Thread> {
        let current = resolve_thread(self.threads.as_ref(), thread).await?;
        if update.title.is_none() && update.message.is_none() {
            return Ok(current);
        }
        let title = update.title.unwrap_or(current.title);
        let message = update.message.unwrap_or(current.message);
        self.threads.update(current.id, &title, &message).await
    }

    pub async fn vote(&self, thread: &ThreadRef, vote: Vote) -> Result<Thread> {
        validate_voice(vote.voice)?;
        let current = resolve_thread(self.threads.as_ref(), thread).await?;
        let voter = self
            .users
            .find_by_nickname(&vote.nickname)
            .await?
            .ok_or_else(|| user_not_found(&vote.nickname))?;

        let vote = Vote {
            nickname: voter.nickname,
            voice: vote.voice,
        };
        self.threads.vote(current.id, &vote).await
    }

    pub async fn posts(&self, thread: &ThreadRef, query: &PostsQuery) -> Result<Vec<Post>> {
        let current = resolve_thread(self.threads.as_ref(), thread).await?;
        match self.strategy {
            TreeStrategy::Database => self.posts.list_sorted(current.id, query).await,
            TreeStrategy::InProcess => {
                let posts = self.posts.list_by_thread(current.id).await?;
                Ok(post_tree::linearize(posts, query))
            }
        }
    }
}

/// Resolves a slug-or-id reference into the canonical thread row.
pub(crate) async fn resolve_thread(
    threads: &dyn ThreadRepository,
    thread: &ThreadRef,
) -> Result<Thread> {
    threads
        .find(thread)
        .await?
        .ok_or_else(|| DomainError::not_found(format!("Can't find thread by slug or id: {thread}")))
}
