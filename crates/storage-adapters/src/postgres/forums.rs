use async_trait::async_trait;
use domains::{
    Forum, ForumRepository, ForumUsersQuery, NewForum, Result, Thread, ThreadsQuery, User,
};
use sqlx::{Postgres, QueryBuilder};

use super::{
    db_error, decode_all, forum_from_row, thread_from_row, user_from_row, PgRepository,
    FORUM_COLUMNS, THREAD_COLUMNS, USER_COLUMNS,
};

#[async_trait]
impl ForumRepository for PgRepository {
    async fn create(&self, forum: &NewForum) -> Result<Forum> {
        let mut qb = QueryBuilder::<Postgres>::new("INSERT INTO forums (slug, title, author) VALUES (");
        qb.push_bind(&forum.slug)
            .push(", ")
            .push_bind(&forum.title)
            .push(", ")
            .push_bind(&forum.user)
            .push(") RETURNING ")
            .push(FORUM_COLUMNS);

        let row = qb.build().fetch_one(&self.pool).await.map_err(db_error)?;
        forum_from_row(&row).map_err(db_error)
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Forum>> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT ");
        qb.push(FORUM_COLUMNS)
            .push(" FROM forums WHERE slug = ")
            .push_bind(slug)
            .push("::citext");

        let row = qb
            .build()
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error)?;
        row.as_ref().map(forum_from_row).transpose().map_err(db_error)
    }

    async fn list_threads(&self, slug: &str, query: &ThreadsQuery) -> Result<Vec<Thread>> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT ");
        qb.push(THREAD_COLUMNS)
            .push(" FROM threads WHERE forum = ")
            .push_bind(slug)
            .push("::citext");

        if let Some(since) = query.since {
            qb.push(if query.desc {
                " AND created <= "
            } else {
                " AND created >= "
            })
            .push_bind(since);
        }

        qb.push(if query.desc {
            " ORDER BY created DESC, id DESC"
        } else {
            " ORDER BY created, id"
        })
        .push(" LIMIT ")
        .push_bind(query.limit);

        let rows = qb.build().fetch_all(&self.pool).await.map_err(db_error)?;
        decode_all(&rows, thread_from_row)
    }

    async fn list_users(&self, slug: &str, query: &ForumUsersQuery) -> Result<Vec<User>> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT ");
        qb.push(USER_COLUMNS)
            .push(" FROM users WHERE nickname IN (SELECT author FROM threads WHERE forum = ")
            .push_bind(slug)
            .push("::citext UNION SELECT author FROM posts WHERE forum = ")
            .push_bind(slug)
            .push("::citext)");

        if let Some(since) = &query.since {
            qb.push(if query.desc {
                " AND nickname < "
            } else {
                " AND nickname > "
            })
            .push_bind(since)
            .push("::citext");
        }

        qb.push(if query.desc {
            " ORDER BY nickname DESC"
        } else {
            " ORDER BY nickname"
        })
        .push(" LIMIT ")
        .push_bind(query.limit);

        let rows = qb.build().fetch_all(&self.pool).await.map_err(db_error)?;
        decode_all(&rows, user_from_row)
    }
}
