//! # Query Types
//!
//! Identifier resolution and pagination parameters shared by every layer.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};

/// Default page size when the client omits `limit`.
pub const DEFAULT_LIMIT: i64 = 100;

/// A thread addressed either by numeric id or by slug.
///
/// The `{slug_or_id}` path segment is parsed once at the API boundary; a value
/// that parses as an integer is always an id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ThreadRef {
    ById(i64),
    BySlug(String),
}

impl ThreadRef {
    pub fn parse(raw: &str) -> Self {
        match raw.parse::<i64>() {
            Ok(id) => ThreadRef::ById(id),
            Err(_) => ThreadRef::BySlug(raw.to_string()),
        }
    }
}

impl From<&str> for ThreadRef {
    fn from(raw: &str) -> Self {
        ThreadRef::parse(raw)
    }
}

impl fmt::Display for ThreadRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ThreadRef::ById(id) => write!(f, "{id}"),
            ThreadRef::BySlug(slug) => f.write_str(slug),
        }
    }
}

/// Display order of a thread's posts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortMode {
    #[default]
    Flat,
    Tree,
    ParentTree,
}

impl FromStr for SortMode {
    type Err = std::convert::Infallible;

    /// Unknown values fall back to `flat`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "tree" => SortMode::Tree,
            "parent_tree" => SortMode::ParentTree,
            _ => SortMode::Flat,
        })
    }
}

/// Parameters of `GET /thread/{slug_or_id}/posts`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PostsQuery {
    /// Page size. In `parent_tree` mode this bounds the number of top-level groups.
    pub limit: i64,
    /// Exclusive cursor: a post id.
    pub since: Option<i64>,
    pub sort: SortMode,
    pub desc: bool,
}

impl Default for PostsQuery {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            since: None,
            sort: SortMode::Flat,
            desc: false,
        }
    }
}

/// Parameters of `GET /forum/{slug}/threads`. `since` is an inclusive bound on `created`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThreadsQuery {
    pub limit: i64,
    pub since: Option<DateTime<Utc>>,
    pub desc: bool,
}

impl Default for ThreadsQuery {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            since: None,
            desc: false,
        }
    }
}

/// Parameters of `GET /forum/{slug}/users`. `since` is an exclusive nickname bound.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForumUsersQuery {
    pub limit: i64,
    pub since: Option<String>,
    pub desc: bool,
}

impl Default for ForumUsersQuery {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            since: None,
            desc: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_segment_is_an_id() {
        assert_eq!(ThreadRef::parse("42"), ThreadRef::ById(42));
        assert_eq!(ThreadRef::parse("-7"), ThreadRef::ById(-7));
    }

    #[test]
    fn anything_else_is_a_slug() {
        assert_eq!(
            ThreadRef::parse("rust-2024"),
            ThreadRef::BySlug("rust-2024".into())
        );
        assert_eq!(ThreadRef::parse("12ab"), ThreadRef::BySlug("12ab".into()));
    }

    #[test]
    fn sort_mode_falls_back_to_flat() {
        assert_eq!("tree".parse::<SortMode>(), Ok(SortMode::Tree));
        assert_eq!("parent_tree".parse::<SortMode>(), Ok(SortMode::ParentTree));
        assert_eq!("flat".parse::<SortMode>(), Ok(SortMode::Flat));
        assert_eq!("sideways".parse::<SortMode>(), Ok(SortMode::Flat));
    }
}
