//! Users repository for database operations

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use super::{SearchFilter, Store};
use crate::{
    error::{AppError, AppResult},
    models::{Draft, User},
};

#[derive(Clone)]
pub struct UsersRepository {
    pool: Pool<Postgres>,
}

impl UsersRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Store<User> for UsersRepository {
    /// Search users by name or email
    async fn find_all(&self, filter: &SearchFilter) -> AppResult<Vec<User>> {
        let condition = filter.sql_condition(1);
        let query = format!(
            "SELECT id, name, email, is_librarian FROM users WHERE {} ORDER BY id",
            condition.clause
        );

        let mut builder = sqlx::query_as::<_, User>(&query);
        if let Some(pattern) = condition.pattern {
            builder = builder.bind(pattern);
        }

        let users = builder.fetch_all(&self.pool).await?;
        Ok(users)
    }

    async fn find_by_id(&self, id: i32) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, name, email, is_librarian FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn save(&self, draft: Draft<User>) -> AppResult<User> {
        let data = draft.data;

        match draft.id {
            None => {
                let user = sqlx::query_as::<_, User>(
                    r#"
                    INSERT INTO users (name, email, is_librarian)
                    VALUES ($1, $2, $3)
                    RETURNING id, name, email, is_librarian
                    "#,
                )
                .bind(&data.name)
                .bind(&data.email)
                .bind(data.is_librarian)
                .fetch_one(&self.pool)
                .await?;
                Ok(user)
            }
            Some(id) => sqlx::query_as::<_, User>(
                r#"
                UPDATE users SET name = $1, email = $2, is_librarian = $3
                WHERE id = $4
                RETURNING id, name, email, is_librarian
                "#,
            )
            .bind(&data.name)
            .bind(&data.email)
            .bind(data.is_librarian)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            // Deleted between lookup and write
            .ok_or_else(AppError::not_found::<User>),
        }
    }

    async fn delete(&self, id: i32) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
