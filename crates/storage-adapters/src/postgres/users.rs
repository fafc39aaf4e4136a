use async_trait::async_trait;
use domains::{Result, User, UserRepository, UserUpdate};
use sqlx::{Postgres, QueryBuilder};

use super::{db_error, decode_all, user_from_row, PgRepository, USER_COLUMNS};

#[async_trait]
impl UserRepository for PgRepository {
    async fn create(&self, user: &User) -> Result<()> {
        sqlx::query("INSERT INTO users (nickname, fullname, email, about) VALUES ($1, $2, $3, $4)")
            .bind(&user.nickname)
            .bind(&user.fullname)
            .bind(&user.email)
            .bind(&user.about)
            .execute(&self.pool)
            .await
            .map_err(db_error)?;
        Ok(())
    }

    async fn find_by_nickname(&self, nickname: &str) -> Result<Option<User>> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT ");
        qb.push(USER_COLUMNS)
            .push(" FROM users WHERE nickname = ")
            .push_bind(nickname)
            .push("::citext");

        let row = qb
            .build()
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error)?;
        row.as_ref().map(user_from_row).transpose().map_err(db_error)
    }

    async fn find_conflicting(&self, nickname: &str, email: &str) -> Result<Vec<User>> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT ");
        qb.push(USER_COLUMNS)
            .push(" FROM users WHERE nickname = ")
            .push_bind(nickname)
            .push("::citext OR email = ")
            .push_bind(email)
            .push("::citext ORDER BY nickname");

        let rows = qb.build().fetch_all(&self.pool).await.map_err(db_error)?;
        decode_all(&rows, user_from_row)
    }

    async fn update(&self, nickname: &str, update: &UserUpdate) -> Result<Option<User>> {
        let mut qb = QueryBuilder::<Postgres>::new("UPDATE users SET fullname = COALESCE(");
        qb.push_bind(update.fullname.as_deref())
            .push(", fullname), email = COALESCE(")
            .push_bind(update.email.as_deref())
            .push("::citext, email), about = COALESCE(")
            .push_bind(update.about.as_deref())
            .push(", about) WHERE nickname = ")
            .push_bind(nickname)
            .push("::citext RETURNING ")
            .push(USER_COLUMNS);

        let row = qb
            .build()
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error)?;
        row.as_ref().map(user_from_row).transpose().map_err(db_error)
    }
}
