//! # services
//!
//! Use-case layer of the forum. Each service orchestrates the repository
//! ports from `domains`: it resolves identifiers, checks that referenced rows
//! exist, applies default-value fallbacks and turns unique-key collisions into
//! [`Outcome::Conflict`](domains::Outcome) where the API reports the existing row.

pub mod admin;
pub mod forums;
pub mod post_tree;
pub mod posts;
pub mod threads;
pub mod users;

pub use admin::AdminService;
pub use forums::ForumService;
pub use posts::PostService;
pub use threads::{ThreadService, TreeStrategy};
pub use users::UserService;
