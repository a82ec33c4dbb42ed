//! The `/api` action endpoint.
//!
//! POST requests carry an `action` field in their JSON body, GET requests
//! carry it in the query string. Every request performs one store operation
//! and always gets a response: unknown actions are rejected with 400 and
//! methods other than GET and POST with an empty 405.

use axum::{
    body::Bytes,
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use super::AuthenticatedUser;
use crate::{
    error::{AppError, AppResult, ErrorResponse},
    models::{Action, ActionKind, Book, User},
    AppState,
};

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ActionQuery {
    /// Only `getAllBooks` is served over GET
    pub action: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RegisterResponse {
    pub user: User,
    pub token: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TokenResponse {
    pub token: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BookResponse {
    pub book: Book,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BooksResponse {
    pub books: Vec<Book>,
}

/// Body of a successful POST action
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ActionResponse {
    Registered(RegisterResponse),
    Token(TokenResponse),
    Book(BookResponse),
}

/// Run a POST action
#[utoipa::path(
    post,
    path = "/api",
    tag = "api",
    security((), ("bearer_auth" = [])),
    request_body(
        content = String,
        content_type = "application/json",
        description = "Object with an `action` field (register, login, createBook, updateBook, deleteBook) \
                       and the fields of RegisterRequest, LoginRequest, BookFields, UpdateBookRequest \
                       or DeleteBookRequest"
    ),
    responses(
        (status = 200, description = "`{ user, token }` for register, `{ token }` for login, `{ book }` for book actions", body = BookResponse),
        (status = 400, description = "Action failed or unknown action", body = ErrorResponse),
        (status = 401, description = "Book mutation without a valid bearer token", body = ErrorResponse)
    )
)]
pub async fn handle_post(
    State(state): State<AppState>,
    user: Option<AuthenticatedUser>,
    body: Bytes,
) -> AppResult<Json<ActionResponse>> {
    let (kind, value) = Action::read_kind(&body).map_err(|err| {
        tracing::debug!("Rejected action request: {}", err);
        err
    })?;

    let result = match Action::from_value(value) {
        Ok(action) => perform(&state, user, action).await,
        Err(err) => Err(err),
    };

    match result {
        Ok(response) => {
            tracing::info!(action = %kind, "Action completed");
            Ok(Json(response))
        }
        Err(err) => {
            report_failure(kind, &err);
            Err(err.into_action(kind.failure_message()))
        }
    }
}

/// Run a GET action
#[utoipa::path(
    get,
    path = "/api",
    tag = "api",
    params(ActionQuery),
    responses(
        (status = 200, description = "All books", body = BooksResponse),
        (status = 400, description = "Unknown action or malformed query string", body = ErrorResponse)
    )
)]
pub async fn handle_get(
    State(state): State<AppState>,
    query: Result<Query<ActionQuery>, QueryRejection>,
) -> AppResult<Json<BooksResponse>> {
    let Query(query) = query.map_err(|rejection| {
        tracing::debug!("Rejected query string: {}", rejection);
        AppError::BadRequest("Invalid query string".to_string())
    })?;

    match query.action.as_deref().and_then(ActionKind::from_name) {
        Some(ActionKind::GetAllBooks) => {
            let books = state.services.books.list().await?;
            Ok(Json(BooksResponse { books }))
        }
        _ => Err(AppError::BadRequest("Unknown action".to_string())),
    }
}

/// Any method other than GET or POST
pub async fn method_not_allowed() -> StatusCode {
    StatusCode::METHOD_NOT_ALLOWED
}

async fn perform(
    state: &AppState,
    user: Option<AuthenticatedUser>,
    action: Action,
) -> AppResult<ActionResponse> {
    let users = &state.services.users;
    let books = &state.services.books;

    if action.kind().is_book_mutation() && users.require_token_for_writes() {
        match user {
            Some(AuthenticatedUser(ref claims)) => {
                tracing::debug!(user_id = claims.user_id, action = %action.kind(), "Authorized book mutation");
            }
            None => return Err(AppError::Unauthorized("Bearer token required".to_string())),
        }
    }

    let response = match action {
        Action::Register(request) => {
            let (user, token) = users.register(request).await?;
            ActionResponse::Registered(RegisterResponse { user, token })
        }
        Action::Login(request) => ActionResponse::Token(TokenResponse {
            token: users.login(request).await?,
        }),
        Action::CreateBook(fields) => ActionResponse::Book(BookResponse {
            book: books.create(fields).await?,
        }),
        Action::UpdateBook(request) => ActionResponse::Book(BookResponse {
            book: books.update(request).await?,
        }),
        Action::DeleteBook(request) => ActionResponse::Book(BookResponse {
            book: books.delete(request.id).await?,
        }),
    };

    Ok(response)
}

/// Book failures are logged with their cause; auth failures stay at debug
fn report_failure(kind: ActionKind, err: &AppError) {
    match err {
        AppError::Database(_) | AppError::Internal(_) => {
            tracing::error!(action = %kind, "Action failed: {}", err)
        }
        _ if kind.is_book_mutation() => tracing::warn!(action = %kind, "Action failed: {}", err),
        _ => tracing::debug!(action = %kind, "Action failed: {}", err),
    }
}
