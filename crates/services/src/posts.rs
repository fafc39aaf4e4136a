use std::sync::Arc;

use domains::{
    DomainError, ForumRepository, NewPost, Post, PostFull, PostRepository, PostUpdate, Related,
    Result, ThreadRef, ThreadRepository, UserRepository,
};

use crate::forums::forum_not_found;
use crate::threads::resolve_thread;
use crate::users::user_not_found;

/// Batch post creation, post details and edits.
#[derive(Clone)]
pub struct PostService {
    posts: Arc<dyn PostRepository>,
    threads: Arc<dyn ThreadRepository>,
    users: Arc<dyn UserRepository>,
    forums: Arc<dyn ForumRepository>,
}

impl PostService {
    pub fn new(
        posts: Arc<dyn PostRepository>,
        threads: Arc<dyn ThreadRepository>,
        users: Arc<dyn UserRepository>,
        forums: Arc<dyn ForumRepository>,
    ) -> Self {
        Self {
            posts,
            threads,
            users,
            forums,
        }
    }

    /// Adds `posts` to the thread. Either every post is stored or none is.
    pub async fn create(&self, thread: &ThreadRef, posts: Vec<NewPost>) -> Result<Vec<Post>> {
        let thread = resolve_thread(self.threads.as_ref(), thread).await?;
        if posts.is_empty() {
            return Ok(Vec::new());
        }
        self.posts.create_batch(&thread, &posts).await
    }

    pub async fn details(&self, id: i64, related: Related) -> Result<PostFull> {
        let post = self.find(id).await?;

        let author = if related.user {
            let user = self
                .users
                .find_by_nickname(&post.author)
                .await?
                .ok_or_else(|| user_not_found(&post.author))?;
            Some(user)
        } else {
            None
        };

        let thread = if related.thread {
            Some(resolve_thread(self.threads.as_ref(), &ThreadRef::ById(post.thread)).await?)
        } else {
            None
        };

        let forum = if related.forum {
            let forum = self
                .forums
                .find_by_slug(&post.forum)
                .await?
                .ok_or_else(|| forum_not_found(&post.forum))?;
            Some(forum)
        } else {
            None
        };

        Ok(PostFull {
            post,
            author,
            thread,
            forum,
        })
    }

    /// Changes the message. An absent or identical message leaves the post
    /// (and its `isEdited` flag) untouched.
    pub async fn update(&self, id: i64, update: PostUpdate) -> Result<Post> {
        let current = self.find(id).await?;
        match update.message {
            Some(message) if message != current.message => self
                .posts
                .update_message(id, &message)
                .await?
                .ok_or_else(|| post_not_found(id)),
            _ => Ok(current),
        }
    }

    async fn find(&self, id: i64) -> Result<Post> {
        self.posts
            .find(id)
            .await?
            .ok_or_else(|| post_not_found(id))
    }
}

fn post_not_found(id: i64) -> DomainError {
    DomainError::not_found(format!("Can't find post with id: {id}"))
}
