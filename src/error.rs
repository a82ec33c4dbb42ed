//! Error types for the Bookcase server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Unknown email or wrong password. Both cases share one message.
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    /// Failure of a single API action. Callers only ever see `message`;
    /// `source` is kept for the logs.
    #[error("{message}: {source}")]
    Action {
        message: &'static str,
        #[source]
        source: Box<AppError>,
    },
}

/// Error response body
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub message: String,
}

impl AppError {
    /// Wrap this error as the failure of an action with a fixed public message
    pub fn into_action(self, message: &'static str) -> AppError {
        match self {
            // Unauthorized stays visible so clients know to log in again
            AppError::Unauthorized(_) | AppError::Action { .. } => self,
            other => AppError::Action {
                message,
                source: Box::new(other),
            },
        }
    }

    /// HTTP status code for this error
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidCredentials
            | AppError::NotFound(_)
            | AppError::Validation(_)
            | AppError::Conflict(_)
            | AppError::BadRequest(_)
            | AppError::Action { .. } => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message exposed to the caller
    pub fn public_message(&self) -> String {
        match self {
            AppError::InvalidCredentials => "Invalid credentials".to_string(),
            AppError::Unauthorized(_) => "Unauthorized".to_string(),
            AppError::NotFound(msg)
            | AppError::Validation(msg)
            | AppError::Conflict(msg)
            | AppError::BadRequest(msg) => msg.clone(),
            AppError::Database(_) => "Database error".to_string(),
            AppError::Internal(_) => "Internal server error".to_string(),
            AppError::Action { message, .. } => message.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::Database(e) => tracing::error!("Database error: {:?}", e),
            AppError::Internal(msg) => tracing::error!("Internal error: {}", msg),
            _ => {}
        }

        let body = Json(ErrorResponse {
            message: self.public_message(),
        });

        (self.status(), body).into_response()
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
