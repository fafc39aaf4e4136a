use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{SubsecRound, Utc};
use domains::{
    DomainError, NewPost, Post, PostRepository, PostsQuery, Result, SortMode, Thread, WRONG_PARENT,
};
use sqlx::{PgConnection, Postgres, QueryBuilder};

use super::{db_error, decode_all, post_from_row, PgRepository, POST_COLUMNS};

/// Rows per multi-row INSERT, keeping the bind count under the protocol limit.
const INSERT_CHUNK: usize = 1000;

#[async_trait]
impl PostRepository for PgRepository {
    async fn create_batch(&self, thread: &Thread, posts: &[NewPost]) -> Result<Vec<Post>> {
        if posts.is_empty() {
            return Ok(Vec::new());
        }

        let mut tx = self.pool.begin().await.map_err(db_error)?;

        let authors = canonical_authors(&mut *tx, posts).await?;
        let parents = parent_paths(&mut *tx, thread.id, posts).await?;

        let ids: Vec<i64> = sqlx::query_scalar(
            "SELECT nextval(pg_get_serial_sequence('posts', 'id')) FROM generate_series(1, $1)",
        )
        .bind(posts.len() as i64)
        .fetch_all(&mut *tx)
        .await
        .map_err(db_error)?;

        // Postgres keeps microseconds; truncate so the response matches a reread.
        let created = Utc::now().trunc_subsecs(6);
        let mut rows = Vec::with_capacity(posts.len());
        for (new, id) in posts.iter().zip(ids) {
            let author = authors.get(&new.author).cloned().ok_or_else(|| {
                DomainError::not_found(format!(
                    "Can't find post author by nickname: {}",
                    new.author
                ))
            })?;
            let mut path = if new.parent == 0 {
                Vec::new()
            } else {
                parents
                    .get(&new.parent)
                    .cloned()
                    .ok_or_else(|| DomainError::Conflict(WRONG_PARENT.into()))?
            };
            path.push(id);

            let post = Post {
                id,
                parent: new.parent,
                author,
                message: new.message.clone(),
                is_edited: false,
                forum: thread.forum.clone(),
                thread: thread.id,
                created,
            };
            rows.push((post, path));
        }

        for chunk in rows.chunks(INSERT_CHUNK) {
            let mut qb = QueryBuilder::<Postgres>::new(
                "INSERT INTO posts (id, parent, author, message, is_edited, forum, thread, created, path) ",
            );
            qb.push_values(chunk, |mut b, (post, path)| {
                b.push_bind(post.id)
                    .push_bind(post.parent)
                    .push_bind(&post.author)
                    .push_bind(&post.message)
                    .push_bind(post.is_edited)
                    .push_bind(&post.forum)
                    .push_bind(post.thread)
                    .push_bind(post.created)
                    .push_bind(path);
            });
            qb.build().execute(&mut *tx).await.map_err(db_error)?;
        }

        sqlx::query("UPDATE forums SET posts = posts + $1 WHERE slug = $2::citext")
            .bind(rows.len() as i64)
            .bind(&thread.forum)
            .execute(&mut *tx)
            .await
            .map_err(db_error)?;

        tx.commit().await.map_err(db_error)?;
        tracing::debug!(thread = thread.id, count = rows.len(), "posts created");
        Ok(rows.into_iter().map(|(post, _)| post).collect())
    }

    async fn find(&self, id: i64) -> Result<Option<Post>> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT ");
        qb.push(POST_COLUMNS)
            .push(" FROM posts WHERE id = ")
            .push_bind(id);

        let row = qb
            .build()
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error)?;
        row.as_ref().map(post_from_row).transpose().map_err(db_error)
    }

    async fn update_message(&self, id: i64, message: &str) -> Result<Option<Post>> {
        let mut qb = QueryBuilder::<Postgres>::new("UPDATE posts SET message = ");
        qb.push_bind(message)
            .push(", is_edited = TRUE WHERE id = ")
            .push_bind(id)
            .push(" RETURNING ")
            .push(POST_COLUMNS);

        let row = qb
            .build()
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error)?;
        row.as_ref().map(post_from_row).transpose().map_err(db_error)
    }

    async fn list_by_thread(&self, thread_id: i64) -> Result<Vec<Post>> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT ");
        qb.push(POST_COLUMNS)
            .push(" FROM posts WHERE thread = ")
            .push_bind(thread_id)
            .push(" ORDER BY id");

        let rows = qb.build().fetch_all(&self.pool).await.map_err(db_error)?;
        decode_all(&rows, post_from_row)
    }

    async fn list_sorted(&self, thread_id: i64, query: &PostsQuery) -> Result<Vec<Post>> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT ");
        qb.push(POST_COLUMNS)
            .push(" FROM posts WHERE thread = ")
            .push_bind(thread_id);

        match query.sort {
            SortMode::Flat => {
                if let Some(since) = query.since {
                    qb.push(if query.desc { " AND id < " } else { " AND id > " })
                        .push_bind(since);
                }
                qb.push(if query.desc {
                    " ORDER BY id DESC"
                } else {
                    " ORDER BY id"
                })
                .push(" LIMIT ")
                .push_bind(query.limit);
            }
            SortMode::Tree => {
                if let Some(cursor) = self.cursor_path(thread_id, query.since).await? {
                    if query.desc {
                        let reversed: Vec<i64> = cursor.iter().map(|step| -step).collect();
                        qb.push(" AND path_desc(path) > ").push_bind(reversed);
                    } else {
                        qb.push(" AND path > ").push_bind(cursor);
                    }
                }
                qb.push(if query.desc {
                    " ORDER BY path_desc(path)"
                } else {
                    " ORDER BY path"
                })
                .push(" LIMIT ")
                .push_bind(query.limit);
            }
            SortMode::ParentTree => {
                qb.push(" AND path[1] IN (SELECT id FROM posts WHERE thread = ")
                    .push_bind(thread_id)
                    .push(" AND parent = 0");
                let cursor = self.cursor_path(thread_id, query.since).await?;
                if let Some(root) = cursor.as_ref().and_then(|path| path.first()) {
                    qb.push(if query.desc { " AND id < " } else { " AND id > " })
                        .push_bind(*root);
                }
                qb.push(if query.desc {
                    " ORDER BY id DESC"
                } else {
                    " ORDER BY id"
                })
                .push(" LIMIT ")
                .push_bind(query.limit)
                .push(")")
                .push(if query.desc {
                    " ORDER BY path[1] DESC, path"
                } else {
                    " ORDER BY path"
                });
            }
        }

        let rows = qb.build().fetch_all(&self.pool).await.map_err(db_error)?;
        decode_all(&rows, post_from_row)
    }
}

impl PgRepository {
    /// Materialized path of the cursor post, if it belongs to `thread_id`.
    async fn cursor_path(&self, thread_id: i64, since: Option<i64>) -> Result<Option<Vec<i64>>> {
        let Some(since) = since else {
            return Ok(None);
        };
        sqlx::query_scalar("SELECT path FROM posts WHERE id = $1 AND thread = $2")
            .bind(since)
            .bind(thread_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error)
    }
}

/// Maps every requested author to the stored nickname spelling.
async fn canonical_authors(
    conn: &mut PgConnection,
    posts: &[NewPost],
) -> Result<HashMap<String, String>> {
    let mut requested: Vec<String> = posts.iter().map(|post| post.author.clone()).collect();
    requested.sort();
    requested.dedup();

    let found: Vec<(String, String)> = sqlx::query_as(
        "SELECT requested, u.nickname::text FROM unnest($1::text[]) AS requested \
         JOIN users u ON u.nickname = requested::citext",
    )
    .bind(&requested)
    .fetch_all(&mut *conn)
    .await
    .map_err(db_error)?;

    Ok(found.into_iter().collect())
}

/// Paths of the referenced parents. A parent that is missing or lives in
/// another thread fails the whole batch.
async fn parent_paths(
    conn: &mut PgConnection,
    thread_id: i64,
    posts: &[NewPost],
) -> Result<HashMap<i64, Vec<i64>>> {
    let mut wanted: Vec<i64> = posts
        .iter()
        .map(|post| post.parent)
        .filter(|&parent| parent != 0)
        .collect();
    if wanted.is_empty() {
        return Ok(HashMap::new());
    }
    wanted.sort_unstable();
    wanted.dedup();

    let found: Vec<(i64, i64, Vec<i64>)> =
        sqlx::query_as("SELECT id, thread, path FROM posts WHERE id = ANY($1)")
            .bind(&wanted)
            .fetch_all(&mut *conn)
            .await
            .map_err(db_error)?;

    if found.len() != wanted.len() || found.iter().any(|(_, thread, _)| *thread != thread_id) {
        return Err(DomainError::Conflict(WRONG_PARENT.into()));
    }
    Ok(found
        .into_iter()
        .map(|(id, _, path)| (id, path))
        .collect())
}
