//! Book catalog service

use std::sync::Arc;

use crate::{
    error::AppResult,
    models::{action::UpdateBookRequest, Book, BookFields, IntField},
    repository::BookStore,
};

#[derive(Clone)]
pub struct BooksService {
    books: Arc<dyn BookStore>,
}

impl BooksService {
    pub fn new(books: Arc<dyn BookStore>) -> Self {
        Self { books }
    }

    pub async fn list(&self) -> AppResult<Vec<Book>> {
        self.books.list().await
    }

    pub async fn create(&self, fields: BookFields) -> AppResult<Book> {
        let data = fields.into_data()?;
        self.books.create(&data).await
    }

    /// Overwrite every field of an existing book
    pub async fn update(&self, request: UpdateBookRequest) -> AppResult<Book> {
        let (id, fields) = request.into_parts();
        let id = id.require("id")?;
        let data = fields.into_data()?;
        self.books.update(id, &data).await
    }

    pub async fn delete(&self, id: IntField) -> AppResult<Book> {
        let id = id.require("id")?;
        self.books.delete(id).await
    }
}
