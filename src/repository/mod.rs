//! Repository layer for database operations

pub mod books;
pub mod memory;
pub mod users;

use async_trait::async_trait;
use sqlx::{Pool, Postgres};
use std::sync::Arc;

#[cfg(test)]
use mockall::automock;

use crate::{
    error::{AppError, AppResult},
    models::{Book, BookData, NewUser, User},
};

/// Persistence of user accounts
#[cfg_attr(test, automock)]
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a user; a duplicate email is a `Conflict`
    async fn create(&self, user: &NewUser) -> AppResult<User>;

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;
}

/// Persistence of book records
#[cfg_attr(test, automock)]
#[async_trait]
pub trait BookStore: Send + Sync {
    /// All books ordered by id
    async fn list(&self) -> AppResult<Vec<Book>>;

    async fn create(&self, data: &BookData) -> AppResult<Book>;

    /// Overwrite every column of book `id`; `NotFound` if it does not exist
    async fn update(&self, id: i32, data: &BookData) -> AppResult<Book>;

    /// Delete book `id` and return it; `NotFound` if it does not exist
    async fn delete(&self, id: i32) -> AppResult<Book>;
}

/// Main repository struct holding the stores
#[derive(Clone)]
pub struct Repository {
    pool: Option<Pool<Postgres>>,
    pub users: Arc<dyn UserStore>,
    pub books: Arc<dyn BookStore>,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            users: Arc::new(users::UsersRepository::new(pool.clone())),
            books: Arc::new(books::BooksRepository::new(pool.clone())),
            pool: Some(pool),
        }
    }

    /// Create a repository backed by process memory
    pub fn in_memory() -> Self {
        let store = Arc::new(memory::MemoryStore::new());
        Self::from_stores(store.clone(), store)
    }

    pub fn from_stores(users: Arc<dyn UserStore>, books: Arc<dyn BookStore>) -> Self {
        Self {
            pool: None,
            users,
            books,
        }
    }

    /// Check that the database answers
    pub async fn ping(&self) -> AppResult<()> {
        if let Some(ref pool) = self.pool {
            sqlx::query("SELECT 1").execute(pool).await?;
        }
        Ok(())
    }
}

/// Map a unique-constraint violation to `Conflict`, anything else to `Database`
fn map_unique_violation(err: sqlx::Error, message: &str) -> AppError {
    match err {
        sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
            AppError::Conflict(message.to_string())
        }
        other => AppError::Database(other),
    }
}
