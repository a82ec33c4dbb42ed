//! Book model

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use super::action::IntField;
use crate::error::{AppError, AppResult};

/// Book record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub author: String,
    pub publisher: String,
    /// Publication year
    pub year: i32,
    /// Number of pages
    pub pages: i32,
}

/// Column values for inserting or overwriting a book
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookData {
    pub title: String,
    pub author: String,
    pub publisher: String,
    pub year: i32,
    pub pages: i32,
}

/// Book fields as submitted by the form; `year` and `pages` may be strings
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct BookFields {
    pub title: String,
    pub author: String,
    pub publisher: String,
    #[serde(default)]
    #[schema(value_type = String, example = "2020")]
    pub year: IntField,
    #[serde(default)]
    #[schema(value_type = String, example = "320")]
    pub pages: IntField,
}

impl BookFields {
    /// Resolve the coerced integers, failing on any field that is not a number
    pub fn into_data(self) -> AppResult<BookData> {
        let year = self.year.require("year")?;
        let pages = self.pages.require("pages")?;

        Ok(BookData {
            title: self.title,
            author: self.author,
            publisher: self.publisher,
            year,
            pages,
        })
    }
}

impl Book {
    pub fn from_data(id: i32, data: BookData) -> Self {
        Self {
            id,
            title: data.title,
            author: data.author,
            publisher: data.publisher,
            year: data.year,
            pages: data.pages,
        }
    }
}

impl IntField {
    /// Integer value or a validation error naming the field
    pub fn require(self, field: &str) -> AppResult<i32> {
        self.value()
            .ok_or_else(|| AppError::Validation(format!("{} is not a number", field)))
    }
}
