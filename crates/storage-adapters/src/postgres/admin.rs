use async_trait::async_trait;
use domains::{AdminRepository, Result, Status};
use sqlx::Row;

use super::{db_error, PgRepository};

#[async_trait]
impl AdminRepository for PgRepository {
    async fn clear(&self) -> Result<()> {
        sqlx::query("TRUNCATE votes, posts, threads, forums, users RESTART IDENTITY CASCADE")
            .execute(&self.pool)
            .await
            .map_err(db_error)?;
        Ok(())
    }

    async fn status(&self) -> Result<Status> {
        let row = sqlx::query(
            "SELECT (SELECT count(*) FROM users) AS users, \
                    (SELECT count(*) FROM forums) AS forums, \
                    (SELECT count(*) FROM threads) AS threads, \
                    (SELECT count(*) FROM posts) AS posts",
        )
        .fetch_one(&self.pool)
        .await
        .map_err(db_error)?;

        let count = |column: &str| row.try_get::<i64, _>(column).map_err(db_error);
        Ok(Status {
            user: count("users")?,
            forum: count("forums")?,
            thread: count("threads")?,
            post: count("posts")?,
        })
    }
}
