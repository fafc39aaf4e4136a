use std::sync::Arc;

use domains::{
    AdminRepository, ForumRepository, PostRepository, ThreadRepository, UserRepository,
    DEFAULT_LIMIT,
};
use services::{AdminService, ForumService, PostService, ThreadService, TreeStrategy, UserService};

/// State shared across every request handler.
#[derive(Clone)]
pub struct AppState {
    pub users: UserService,
    pub forums: ForumService,
    pub threads: ThreadService,
    pub posts: PostService,
    pub admin: AdminService,
    /// Page size used when a listing omits `limit`
    pub default_limit: i64,
}

impl AppState {
    /// Wires every service onto one store implementing all the ports.
    pub fn from_repository<R>(repo: Arc<R>, strategy: TreeStrategy) -> Self
    where
        R: UserRepository
            + ForumRepository
            + ThreadRepository
            + PostRepository
            + AdminRepository
            + 'static,
    {
        let users: Arc<dyn UserRepository> = repo.clone();
        let forums: Arc<dyn ForumRepository> = repo.clone();
        let threads: Arc<dyn ThreadRepository> = repo.clone();
        let posts: Arc<dyn PostRepository> = repo.clone();
        let admin: Arc<dyn AdminRepository> = repo;

        Self {
            users: UserService::new(users.clone()),
            forums: ForumService::new(forums.clone(), threads.clone(), users.clone()),
            threads: ThreadService::new(threads.clone(), posts.clone(), users.clone(), strategy),
            posts: PostService::new(posts, threads, users, forums),
            admin: AdminService::new(admin),
            default_limit: DEFAULT_LIMIT,
        }
    }

    pub fn with_default_limit(mut self, limit: i64) -> Self {
        self.default_limit = limit;
        self
    }
}
