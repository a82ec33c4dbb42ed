//! In-process store used with `database.url = "memory://"`.
//!
//! Follows the rules of the SQL schema: emails are unique, ids come from
//! per-table counters starting at 1 and are never reused.

use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use super::{BookStore, UserStore};
use crate::{
    error::{AppError, AppResult},
    models::{Book, BookData, NewUser, User},
};

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    books: BTreeMap<i32, Book>,
    last_user_id: i32,
    last_book_id: i32,
}

#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create(&self, user: &NewUser) -> AppResult<User> {
        let mut tables = self.tables.write().await;
        if tables.users.iter().any(|u| u.email == user.email) {
            return Err(AppError::Conflict("Email already registered".to_string()));
        }

        tables.last_user_id += 1;
        let created = User {
            id: tables.last_user_id,
            name: user.name.clone(),
            email: user.email.clone(),
            password: user.password_hash.clone(),
        };
        tables.users.push(created.clone());
        Ok(created)
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.email == email).cloned())
    }
}

#[async_trait]
impl BookStore for MemoryStore {
    async fn list(&self) -> AppResult<Vec<Book>> {
        let tables = self.tables.read().await;
        Ok(tables.books.values().cloned().collect())
    }

    async fn create(&self, data: &BookData) -> AppResult<Book> {
        let mut tables = self.tables.write().await;
        tables.last_book_id += 1;
        let book = Book::from_data(tables.last_book_id, data.clone());
        tables.books.insert(book.id, book.clone());
        Ok(book)
    }

    async fn update(&self, id: i32, data: &BookData) -> AppResult<Book> {
        let mut tables = self.tables.write().await;
        let book = tables
            .books
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("Book {} not found", id)))?;
        *book = Book::from_data(id, data.clone());
        Ok(book.clone())
    }

    async fn delete(&self, id: i32) -> AppResult<Book> {
        let mut tables = self.tables.write().await;
        tables
            .books
            .remove(&id)
            .ok_or_else(|| AppError::NotFound(format!("Book {} not found", id)))
    }
}
