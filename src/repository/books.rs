//! Books repository for database operations

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use super::BookStore;
use crate::{
    error::{AppError, AppResult},
    models::{Book, BookData},
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
impl BookStore for BooksRepository {
    /// List all books
    async fn list(&self) -> AppResult<Vec<Book>> {
        let rows = sqlx::query_as::<_, Book>(
            "SELECT id, title, author, publisher, year, pages FROM books ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Create book
    async fn create(&self, data: &BookData) -> AppResult<Book> {
        let row = sqlx::query_as::<_, Book>(
            r#"
            INSERT INTO books (title, author, publisher, year, pages)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, title, author, publisher, year, pages
            "#,
        )
        .bind(&data.title)
        .bind(&data.author)
        .bind(&data.publisher)
        .bind(data.year)
        .bind(data.pages)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    /// Update book
    async fn update(&self, id: i32, data: &BookData) -> AppResult<Book> {
        sqlx::query_as::<_, Book>(
            r#"
            UPDATE books
            SET title = $1, author = $2, publisher = $3, year = $4, pages = $5
            WHERE id = $6
            RETURNING id, title, author, publisher, year, pages
            "#,
        )
        .bind(&data.title)
        .bind(&data.author)
        .bind(&data.publisher)
        .bind(data.year)
        .bind(data.pages)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Book {} not found", id)))
    }

    /// Delete book
    async fn delete(&self, id: i32) -> AppResult<Book> {
        sqlx::query_as::<_, Book>(
            "DELETE FROM books WHERE id = $1 RETURNING id, title, author, publisher, year, pages",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Book {} not found", id)))
    }
}
