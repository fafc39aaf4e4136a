use async_trait::async_trait;
use domains::{vote::vote_delta, NewThread, Result, Thread, ThreadRef, ThreadRepository, Vote};
use sqlx::{Postgres, QueryBuilder};

use super::{db_error, thread_from_row, PgRepository, THREAD_COLUMNS};

#[async_trait]
impl ThreadRepository for PgRepository {
    async fn create(&self, thread: &NewThread) -> Result<Thread> {
        let slug = thread.slug.as_deref().filter(|slug| !slug.is_empty());
        let mut tx = self.pool.begin().await.map_err(db_error)?;

        let mut qb = QueryBuilder::<Postgres>::new(
            "INSERT INTO threads (title, author, forum, message, slug, created) VALUES (",
        );
        qb.push_bind(&thread.title)
            .push(", ")
            .push_bind(&thread.author)
            .push(", ")
            .push_bind(&thread.forum)
            .push(", ")
            .push_bind(&thread.message)
            .push(", ")
            .push_bind(slug)
            .push(", COALESCE(")
            .push_bind(thread.created)
            .push(", now())) RETURNING ")
            .push(THREAD_COLUMNS);

        let row = qb.build().fetch_one(&mut *tx).await.map_err(db_error)?;
        let created = thread_from_row(&row).map_err(db_error)?;

        sqlx::query("UPDATE forums SET threads = threads + 1 WHERE slug = $1::citext")
            .bind(&created.forum)
            .execute(&mut *tx)
            .await
            .map_err(db_error)?;

        tx.commit().await.map_err(db_error)?;
        Ok(created)
    }

    async fn find(&self, thread: &ThreadRef) -> Result<Option<Thread>> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT ");
        qb.push(THREAD_COLUMNS).push(" FROM threads WHERE ");
        match thread {
            ThreadRef::ById(id) => {
                qb.push("id = ").push_bind(*id);
            }
            ThreadRef::BySlug(slug) => {
                qb.push("slug = ").push_bind(slug).push("::citext");
            }
        }

        let row = qb
            .build()
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error)?;
        row.as_ref().map(thread_from_row).transpose().map_err(db_error)
    }

    async fn update(&self, id: i64, title: &str, message: &str) -> Result<Thread> {
        let mut qb = QueryBuilder::<Postgres>::new("UPDATE threads SET title = ");
        qb.push_bind(title)
            .push(", message = ")
            .push_bind(message)
            .push(" WHERE id = ")
            .push_bind(id)
            .push(" RETURNING ")
            .push(THREAD_COLUMNS);

        let row = qb.build().fetch_one(&self.pool).await.map_err(db_error)?;
        thread_from_row(&row).map_err(db_error)
    }

    async fn vote(&self, thread_id: i64, vote: &Vote) -> Result<Thread> {
        let mut tx = self.pool.begin().await.map_err(db_error)?;

        // Serializes concurrent votes on the same thread.
        sqlx::query("SELECT id FROM threads WHERE id = $1 FOR UPDATE")
            .bind(thread_id)
            .fetch_one(&mut *tx)
            .await
            .map_err(db_error)?;

        let previous: Option<i32> = sqlx::query_scalar(
            "SELECT voice FROM votes WHERE thread = $1 AND nickname = $2::citext",
        )
        .bind(thread_id)
        .bind(&vote.nickname)
        .fetch_optional(&mut *tx)
        .await
        .map_err(db_error)?;

        sqlx::query(
            "INSERT INTO votes (thread, nickname, voice) VALUES ($1, $2, $3) \
             ON CONFLICT (thread, nickname) DO UPDATE SET voice = EXCLUDED.voice",
        )
        .bind(thread_id)
        .bind(&vote.nickname)
        .bind(vote.voice)
        .execute(&mut *tx)
        .await
        .map_err(db_error)?;

        let mut qb = QueryBuilder::<Postgres>::new("UPDATE threads SET votes = votes + ");
        qb.push_bind(vote_delta(previous, vote.voice))
            .push(" WHERE id = ")
            .push_bind(thread_id)
            .push(" RETURNING ")
            .push(THREAD_COLUMNS);

        let row = qb.build().fetch_one(&mut *tx).await.map_err(db_error)?;
        let updated = thread_from_row(&row).map_err(db_error)?;

        tx.commit().await.map_err(db_error)?;
        Ok(updated)
    }
}
