//! Books repository for database operations

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use super::{SearchFilter, Store};
use crate::{
    error::{AppError, AppResult},
    models::{Book, Draft},
};

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Store<Book> for BooksRepository {
    /// Search books by title, author or ISBN
    async fn find_all(&self, filter: &SearchFilter) -> AppResult<Vec<Book>> {
        let condition = filter.sql_condition(1);
        let query = format!(
            "SELECT id, title, author, isbn, available FROM books WHERE {} ORDER BY id",
            condition.clause
        );

        let mut builder = sqlx::query_as::<_, Book>(&query);
        if let Some(pattern) = condition.pattern {
            builder = builder.bind(pattern);
        }

        Ok(builder.fetch_all(&self.pool).await?)
    }

    async fn find_by_id(&self, id: i32) -> AppResult<Option<Book>> {
        let book = sqlx::query_as::<_, Book>("SELECT id, title, author, isbn, available FROM books WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(book)
    }

    async fn save(&self, draft: Draft<Book>) -> AppResult<Book> {
        let data = draft.data;

        match draft.id {
            None => {
                let book = sqlx::query_as::<_, Book>(
                    r#"
                    INSERT INTO books (title, author, isbn, available)
                    VALUES ($1, $2, $3, $4)
                    RETURNING id, title, author, isbn, available
                    "#,
                )
                .bind(&data.title)
                .bind(&data.author)
                .bind(&data.isbn)
                .bind(data.available)
                .fetch_one(&self.pool)
                .await?;
                Ok(book)
            }
            Some(id) => sqlx::query_as::<_, Book>(
                r#"
                UPDATE books SET title = $1, author = $2, isbn = $3, available = $4
                WHERE id = $5
                RETURNING id, title, author, isbn, available
                "#,
            )
            .bind(&data.title)
            .bind(&data.author)
            .bind(&data.isbn)
            .bind(data.available)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            // Deleted between lookup and write
            .ok_or_else(AppError::not_found::<Book>),
        }
    }

    async fn delete(&self, id: i32) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
