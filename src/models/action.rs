//! Action discriminator for the `/api` endpoint

use serde::{
    de::{self, Visitor},
    Deserialize, Deserializer,
};
use serde_json::Value;
use std::fmt;
use utoipa::ToSchema;

use super::{book::BookFields, user::{LoginRequest, RegisterRequest}};
use crate::error::{AppError, AppResult};

/// Integer submitted either as a JSON number or as free text.
///
/// Text is read the way a browser's `parseInt(text, 10)` reads it: leading
/// whitespace, an optional sign, then the longest run of decimal digits.
/// Anything without digits, or outside the `i32` range, holds no value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IntField(Option<i32>);

impl IntField {
    pub fn value(self) -> Option<i32> {
        self.0
    }

    pub fn parse(text: &str) -> Self {
        let text = text.trim_start();
        let (negative, digits) = match text.as_bytes().first() {
            Some(b'-') => (true, &text[1..]),
            Some(b'+') => (false, &text[1..]),
            _ => (false, text),
        };

        let digits: &str = {
            let end = digits
                .find(|c: char| !c.is_ascii_digit())
                .unwrap_or(digits.len());
            &digits[..end]
        };
        if digits.is_empty() {
            return IntField(None);
        }

        let value = digits
            .parse::<i64>()
            .ok()
            .map(|v| if negative { -v } else { v })
            .and_then(|v| i32::try_from(v).ok());
        IntField(value)
    }

    fn from_f64(value: f64) -> Self {
        if !value.is_finite() {
            return IntField(None);
        }
        let truncated = value.trunc();
        if truncated < i32::MIN as f64 || truncated > i32::MAX as f64 {
            return IntField(None);
        }
        IntField(Some(truncated as i32))
    }
}

impl From<i32> for IntField {
    fn from(value: i32) -> Self {
        IntField(Some(value))
    }
}

impl<'de> Deserialize<'de> for IntField {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct IntFieldVisitor;

        impl<'de> Visitor<'de> for IntFieldVisitor {
            type Value = IntField;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an integer or a string")
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<IntField, E> {
                Ok(IntField(i32::try_from(v).ok()))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<IntField, E> {
                Ok(IntField(i32::try_from(v).ok()))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<IntField, E> {
                Ok(IntField::from_f64(v))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<IntField, E> {
                Ok(IntField::parse(v))
            }

            fn visit_bool<E: de::Error>(self, _: bool) -> Result<IntField, E> {
                Ok(IntField(None))
            }

            fn visit_unit<E: de::Error>(self) -> Result<IntField, E> {
                Ok(IntField(None))
            }

            fn visit_none<E: de::Error>(self) -> Result<IntField, E> {
                Ok(IntField(None))
            }
        }

        deserializer.deserialize_any(IntFieldVisitor)
    }
}

/// Action names accepted by the endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    Register,
    Login,
    CreateBook,
    UpdateBook,
    DeleteBook,
    GetAllBooks,
}

impl ActionKind {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "register" => Some(ActionKind::Register),
            "login" => Some(ActionKind::Login),
            "createBook" => Some(ActionKind::CreateBook),
            "updateBook" => Some(ActionKind::UpdateBook),
            "deleteBook" => Some(ActionKind::DeleteBook),
            "getAllBooks" => Some(ActionKind::GetAllBooks),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ActionKind::Register => "register",
            ActionKind::Login => "login",
            ActionKind::CreateBook => "createBook",
            ActionKind::UpdateBook => "updateBook",
            ActionKind::DeleteBook => "deleteBook",
            ActionKind::GetAllBooks => "getAllBooks",
        }
    }

    /// Fixed message returned to the caller when the action fails
    pub fn failure_message(self) -> &'static str {
        match self {
            ActionKind::Register => "User already exists",
            ActionKind::Login => "Invalid credentials",
            ActionKind::CreateBook => "Book creation failed",
            ActionKind::UpdateBook => "Book update failed",
            ActionKind::DeleteBook => "Book deletion failed",
            ActionKind::GetAllBooks => "Failed to fetch books",
        }
    }

    pub fn is_book_mutation(self) -> bool {
        matches!(
            self,
            ActionKind::CreateBook | ActionKind::UpdateBook | ActionKind::DeleteBook
        )
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Update book request; every field is overwritten
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateBookRequest {
    #[serde(default)]
    #[schema(value_type = String, example = "1")]
    pub id: IntField,
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

impl UpdateBookRequest {
    pub fn into_parts(self) -> (IntField, BookFields) {
        let fields = BookFields {
            title: self.title,
            author: self.author,
            publisher: self.publisher,
            year: self.year,
            pages: self.pages,
        };
        (self.id, fields)
    }
}

/// Delete book request
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct DeleteBookRequest {
    #[serde(default)]
    #[schema(value_type = String, example = "1")]
    pub id: IntField,
}

/// POST body of the `/api` endpoint, tagged by its `action` field
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum Action {
    Register(RegisterRequest),
    Login(LoginRequest),
    CreateBook(BookFields),
    UpdateBook(UpdateBookRequest),
    DeleteBook(DeleteBookRequest),
}

impl Action {
    pub fn kind(&self) -> ActionKind {
        match self {
            Action::Register(_) => ActionKind::Register,
            Action::Login(_) => ActionKind::Login,
            Action::CreateBook(_) => ActionKind::CreateBook,
            Action::UpdateBook(_) => ActionKind::UpdateBook,
            Action::DeleteBook(_) => ActionKind::DeleteBook,
        }
    }

    /// Parse a POST body.
    ///
    /// A body that is not JSON or names no known action is a bad request.
    /// A known action with unusable fields fails as that action.
    pub fn parse(body: &[u8]) -> AppResult<Self> {
        let (kind, value) = Self::read_kind(body)?;
        Self::from_value(value).map_err(|e| e.into_action(kind.failure_message()))
    }

    /// First half of [`Action::parse`]: the JSON body and the action it names
    pub fn read_kind(body: &[u8]) -> AppResult<(ActionKind, Value)> {
        let value: Value = serde_json::from_slice(body)
            .map_err(|_| AppError::BadRequest("Invalid request body".to_string()))?;

        let kind = value
            .get("action")
            .and_then(Value::as_str)
            .and_then(ActionKind::from_name)
            .filter(|kind| *kind != ActionKind::GetAllBooks)
            .ok_or_else(|| AppError::BadRequest("Unknown action".to_string()))?;

        Ok((kind, value))
    }

    /// Second half of [`Action::parse`]. Field errors come back unwrapped as
    /// `Validation` so the caller can log the cause.
    pub fn from_value(value: Value) -> AppResult<Self> {
        Action::deserialize(value).map_err(|e| AppError::Validation(e.to_string()))
    }
}
