use std::sync::Arc;

use domains::{
    DomainError, Forum, ForumRepository, ForumUsersQuery, NewForum, NewThread, Outcome, Result,
    Thread, ThreadRef, ThreadRepository, ThreadsQuery, User, UserRepository,
};

use crate::users::user_not_found;

/// Forum creation, thread creation inside a forum, and forum listings.
#[derive(Clone)]
pub struct ForumService {
    forums: Arc<dyn ForumRepository>,
    threads: Arc<dyn ThreadRepository>,
    users: Arc<dyn UserRepository>,
}

impl ForumService {
    pub fn new(
        forums: Arc<dyn ForumRepository>,
        threads: Arc<dyn ThreadRepository>,
        users: Arc<dyn UserRepository>,
    ) -> Self {
        Self {
            forums,
            threads,
            users,
        }
    }

    /// Creates a forum owned by an existing user. The stored owner uses the
    /// user's canonical nickname.
    pub async fn create(&self, forum: NewForum) -> Result<Outcome<Forum>> {
        let owner = self.owner(&forum.user).await?;
        let forum = NewForum {
            user: owner.nickname,
            ..forum
        };

        match self.forums.create(&forum).await {
            Ok(created) => Ok(Outcome::Created(created)),
            Err(err @ DomainError::Conflict(_)) => {
                let existing = self.forums.find_by_slug(&forum.slug).await?.ok_or(err)?;
                Ok(Outcome::Conflict(existing))
            }
            Err(err) => Err(err),
        }
    }

    pub async fn details(&self, slug: &str) -> Result<Forum> {
        self.forums
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| forum_not_found(slug))
    }

    /// Opens a thread in forum `slug`. A slug collision returns the thread
    /// that already owns it.
    pub async fn create_thread(&self, slug: &str, thread: NewThread) -> Result<Outcome<Thread>> {
        let author = self.owner(&thread.author).await?;
        let forum = self.details(slug).await?;
        // An empty slug means "no slug".
        let thread = NewThread {
            author: author.nickname,
            forum: forum.slug,
            slug: thread.slug.filter(|slug| !slug.is_empty()),
            ..thread
        };

        match self.threads.create(&thread).await {
            Ok(created) => {
                tracing::debug!(id = created.id, forum = %created.forum, "thread created");
                Ok(Outcome::Created(created))
            }
            Err(err @ DomainError::Conflict(_)) => {
                let slug = thread.slug.clone().ok_or_else(|| err.clone())?;
                let existing = self
                    .threads
                    .find(&ThreadRef::BySlug(slug))
                    .await?
                    .ok_or(err)?;
                Ok(Outcome::Conflict(existing))
            }
            Err(err) => Err(err),
        }
    }

    pub async fn threads(&self, slug: &str, query: &ThreadsQuery) -> Result<Vec<Thread>> {
        let forum = self.details(slug).await?;
        self.forums.list_threads(&forum.slug, query).await
    }

    pub async fn users(&self, slug: &str, query: &ForumUsersQuery) -> Result<Vec<User>> {
        let forum = self.details(slug).await?;
        self.forums.list_users(&forum.slug, query).await
    }

    async fn owner(&self, nickname: &str) -> Result<User> {
        self.users
            .find_by_nickname(nickname)
            .await?
            .ok_or_else(|| user_not_found(nickname))
    }
}

pub(crate) fn forum_not_found(slug: &str) -> DomainError {
    DomainError::not_found(format!("Can't find forum with slug: {slug}"))
}
