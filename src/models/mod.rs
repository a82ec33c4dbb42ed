//! Data models for Bookcase

pub mod action;
pub mod book;
pub mod user;

// Re-export commonly used types
pub use action::{Action, ActionKind, IntField};
pub use book::{Book, BookData, BookFields};
pub use user::{NewUser, User, UserClaims};
