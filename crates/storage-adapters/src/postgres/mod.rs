//! # PostgreSQL Implementation
//!
//! This module implements the data mapping between the PostgreSQL relational
//! model and the `domains` models. One [`PgRepository`] implements every port;
//! each port lives in its own submodule.
//!
//! CITEXT columns are compared against `$n::citext` parameters (a bare text
//! parameter would coerce the column to TEXT and compare case-sensitively) and
//! read back as `::text`.

mod admin;
mod forums;
mod posts;
mod threads;
mod users;

use domains::{DomainError, Forum, Post, Thread, User};
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::Row;

/// Bundled idempotent schema, applied by [`PgRepository::apply_schema`].
const SCHEMA: &str = include_str!("../../sql/schema.sql");

pub(crate) const USER_COLUMNS: &str =
    "nickname::text AS nickname, fullname, email::text AS email, about";

pub(crate) const FORUM_COLUMNS: &str =
    "slug::text AS slug, title, author::text AS author, threads, posts";

pub(crate) const THREAD_COLUMNS: &str = "id, title, author::text AS author, forum::text AS forum, \
     message, votes, slug::text AS slug, created";

pub(crate) const POST_COLUMNS: &str = "id, parent, author::text AS author, message, is_edited, \
     forum::text AS forum, thread, created";

#[derive(Clone)]
pub struct PgRepository {
    pool: PgPool,
}

impl PgRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Opens a connection pool against `url`.
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(url)
            .await?;
        Ok(Self::new(pool))
    }

    /// Creates missing tables, indexes and functions.
    pub async fn apply_schema(&self) -> Result<(), sqlx::Error> {
        sqlx::raw_sql(SCHEMA).execute(&self.pool).await?;
        tracing::info!("database schema applied");
        Ok(())
    }
}

/// Maps a driver error onto the domain taxonomy.
///
/// Only "no rows", unique and foreign-key violations are distinguished; any
/// other failure is reported as `Internal`.
pub(crate) fn db_error(err: sqlx::Error) -> DomainError {
    match &err {
        sqlx::Error::RowNotFound => DomainError::NotFound("row not found".into()),
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            DomainError::Conflict(db.message().to_string())
        }
        sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
            DomainError::NotFound(db.message().to_string())
        }
        _ => {
            tracing::error!(error = %err, "database failure");
            DomainError::Internal(err.to_string())
        }
    }
}

pub(crate) fn user_from_row(row: &PgRow) -> Result<User, sqlx::Error> {
    Ok(User {
        nickname: row.try_get("nickname")?,
        fullname: row.try_get("fullname")?,
        email: row.try_get("email")?,
        about: row.try_get("about")?,
    })
}

pub(crate) fn forum_from_row(row: &PgRow) -> Result<Forum, sqlx::Error> {
    Ok(Forum {
        slug: row.try_get("slug")?,
        title: row.try_get("title")?,
        user: row.try_get("author")?,
        threads: row.try_get("threads")?,
        posts: row.try_get("posts")?,
    })
}

pub(crate) fn thread_from_row(row: &PgRow) -> Result<Thread, sqlx::Error> {
    Ok(Thread {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        author: row.try_get("author")?,
        forum: row.try_get("forum")?,
        message: row.try_get("message")?,
        votes: row.try_get("votes")?,
        slug: row.try_get("slug")?,
        created: row.try_get("created")?,
    })
}

pub(crate) fn post_from_row(row: &PgRow) -> Result<Post, sqlx::Error> {
    Ok(Post {
        id: row.try_get("id")?,
        parent: row.try_get("parent")?,
        author: row.try_get("author")?,
        message: row.try_get("message")?,
        is_edited: row.try_get("is_edited")?,
        forum: row.try_get("forum")?,
        thread: row.try_get("thread")?,
        created: row.try_get("created")?,
    })
}

/// Decodes every row with `decode`, mapping failures onto the domain taxonomy.
pub(crate) fn decode_all<T>(
    rows: &[PgRow],
    decode: fn(&PgRow) -> Result<T, sqlx::Error>,
) -> domains::Result<Vec<T>> {
    rows.iter().map(decode).collect::<Result<_, _>>().map_err(db_error)
}
