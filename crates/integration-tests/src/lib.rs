//! Shared fixtures for the HTTP-level tests.
//!
//! Every test builds the real router and services on top of `mockall` mocks
//! of the repository ports, then drives it with `tower::ServiceExt::oneshot`.

use chrono::{DateTime, TimeZone, Utc};
use domains::{Forum, Post, Thread, User};

pub fn created_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
}

pub fn jack() -> User {
    User {
        nickname: "Jack".into(),
        fullname: "Jack Sparrow".into(),
        email: "jack@sea.com".into(),
        about: "Captain".into(),
    }
}

pub fn forum() -> Forum {
    Forum {
        slug: "pirates".into(),
        title: "Pirates".into(),
        user: "Jack".into(),
        threads: 1,
        posts: 0,
    }
}

pub fn thread() -> Thread {
    Thread {
        id: 42,
        title: "Davy Jones cache".into(),
        author: "Jack".into(),
        forum: "pirates".into(),
        message: "An urgent matter".into(),
        votes: 0,
        slug: Some("davy".into()),
        created: created_at(),
    }
}

pub fn post(id: i64, parent: i64) -> Post {
    Post {
        id,
        parent,
        author: "Jack".into(),
        message: format!("post {id}"),
        is_edited: false,
        forum: "pirates".into(),
        thread: 42,
        created: created_at(),
    }
}

#[cfg(feature = "web-axum")]
pub use harness::*;

#[cfg(feature = "web-axum")]
mod harness {
    use std::sync::Arc;

    use api_adapters::{router, AppState};
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request, StatusCode};
    use axum::response::Response;
    use axum::Router;
    use domains::{
        AdminRepository, ForumRepository, MockAdminRepository, MockForumRepository,
        MockPostRepository, MockThreadRepository, MockUserRepository, PostRepository,
        ThreadRepository, UserRepository, DEFAULT_LIMIT,
    };
    use serde_json::Value;
    use services::{AdminService, ForumService, PostService, ThreadService, TreeStrategy, UserService};
    use tower::ServiceExt;

    /// One mock per port. Set expectations, then call [`Mocks::into_app`].
    #[derive(Default)]
    pub struct Mocks {
        pub users: MockUserRepository,
        pub forums: MockForumRepository,
        pub threads: MockThreadRepository,
        pub posts: MockPostRepository,
        pub admin: MockAdminRepository,
    }

    impl Mocks {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn into_app(self) -> Router {
            self.into_app_with(TreeStrategy::Database)
        }

        pub fn into_app_with(self, strategy: TreeStrategy) -> Router {
            let users: Arc<dyn UserRepository> = Arc::new(self.users);
            let forums: Arc<dyn ForumRepository> = Arc::new(self.forums);
            let threads: Arc<dyn ThreadRepository> = Arc::new(self.threads);
            let posts: Arc<dyn PostRepository> = Arc::new(self.posts);
            let admin: Arc<dyn AdminRepository> = Arc::new(self.admin);

            router(AppState {
                users: UserService::new(users.clone()),
                forums: ForumService::new(forums.clone(), threads.clone(), users.clone()),
                threads: ThreadService::new(
                    threads.clone(),
                    posts.clone(),
                    users.clone(),
                    strategy,
                ),
                posts: PostService::new(posts, threads, users, forums),
                admin: AdminService::new(admin),
                default_limit: DEFAULT_LIMIT,
            })
        }
    }

    pub async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
        send(app, Method::GET, uri, None).await
    }

    pub async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
        send(app, Method::POST, uri, Some(body.to_string())).await
    }

    /// Sends `body` verbatim as `application/json`, so tests can submit
    /// malformed documents.
    pub async fn send(
        app: Router,
        method: Method,
        uri: &str,
        body: Option<String>,
    ) -> (StatusCode, Value) {
        let request = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => request
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body)),
            None => request.body(Body::empty()),
        }
        .unwrap();

        read_json(app.oneshot(request).await.unwrap()).await
    }

    pub async fn read_json(response: Response) -> (StatusCode, Value) {
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }
}
