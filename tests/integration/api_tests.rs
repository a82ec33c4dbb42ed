//! API tests against the router with an in-memory store

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use bookcase_server::{
    api,
    config::{AppConfig, AuthConfig, DatabaseConfig, LoggingConfig, ServerConfig},
    models::UserClaims,
    repository::Repository,
    AppState,
};

const SECRET: &str = "integration-test-secret";

fn app_with(require_token_for_writes: bool) -> Router {
    let config = AppConfig {
        server: ServerConfig::default(),
        database: DatabaseConfig {
            url: "memory://".to_string(),
            ..DatabaseConfig::default()
        },
        auth: AuthConfig {
            jwt_secret: SECRET.to_string(),
            jwt_expiration_hours: 1,
            require_token_for_writes,
        },
        logging: LoggingConfig::default(),
    };
    api::router(AppState::new(config, Repository::in_memory()))
}

fn app() -> Router {
    app_with(true)
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

async fn post(app: &Router, token: Option<&str>, body: Value) -> (StatusCode, Value) {
    let mut builder = Request::builder()
        .method(Method::POST)
        .uri("/api")
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    send(app, builder.body(Body::from(body.to_string())).unwrap()).await
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, Request::get(uri).body(Body::empty()).unwrap()).await
}

async fn all_books(app: &Router) -> Vec<Value> {
    let (status, body) = get(app, "/api?action=getAllBooks").await;
    assert_eq!(status, StatusCode::OK);
    body["books"].as_array().unwrap().clone()
}

async fn register(app: &Router, email: &str, password: &str) -> (StatusCode, Value) {
    post(
        app,
        None,
        json!({ "action": "register", "name": "Reader", "email": email, "password": password }),
    )
    .await
}

async fn token_for(app: &Router) -> String {
    let (status, body) = register(app, "librarian@example.com", "shelves").await;
    assert_eq!(status, StatusCode::OK);
    body["token"].as_str().unwrap().to_string()
}

async fn create_book(app: &Router, token: &str, title: &str) -> Value {
    let (status, body) = post(
        app,
        Some(token),
        json!({
            "action": "createBook",
            "title": title,
            "author": "Ursula K. Le Guin",
            "publisher": "Ace",
            "year": "1969",
            "pages": "286"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["book"].clone()
}

#[tokio::test]
async fn test_register_returns_user_without_password() {
    let app = app();
    let (status, body) = register(&app, "ada@example.com", "analytical").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["email"], "ada@example.com");
    assert_eq!(body["user"]["name"], "Reader");
    assert!(body["user"]["id"].is_number());
    assert!(body["user"].get("password").is_none());
    assert!(!body.to_string().contains("analytical"));
    assert!(body["token"].is_string());
}

#[tokio::test]
async fn test_register_duplicate_email() {
    let app = app();
    let (first, _) = register(&app, "ada@example.com", "analytical").await;
    assert_eq!(first, StatusCode::OK);

    let (status, body) = register(&app, "ada@example.com", "different").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "message": "User already exists" }));
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let app = app();
    register(&app, "ada@example.com", "analytical").await;

    let wrong_password = post(
        &app,
        None,
        json!({ "action": "login", "email": "ada@example.com", "password": "engine" }),
    )
    .await;
    let unknown_email = post(
        &app,
        None,
        json!({ "action": "login", "email": "nobody@example.com", "password": "engine" }),
    )
    .await;

    assert_eq!(wrong_password.0, StatusCode::BAD_REQUEST);
    assert_eq!(wrong_password, unknown_email);
    assert_eq!(wrong_password.1, json!({ "message": "Invalid credentials" }));
}

#[tokio::test]
async fn test_login_token_carries_user_id() {
    let app = app();
    let (_, registered) = register(&app, "ada@example.com", "analytical").await;
    let user_id = registered["user"]["id"].as_i64().unwrap();

    let (status, body) = post(
        &app,
        None,
        json!({ "action": "login", "email": "ada@example.com", "password": "analytical" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let claims = UserClaims::from_token(body["token"].as_str().unwrap(), SECRET).unwrap();
    assert_eq!(claims.user_id as i64, user_id);
    assert_eq!(claims.sub, user_id.to_string());
}

#[tokio::test]
async fn test_create_book_coerces_numbers() {
    let app = app();
    let token = token_for(&app).await;

    let (status, body) = post(
        &app,
        Some(&token),
        json!({
            "action": "createBook",
            "title": "A",
            "author": "B",
            "publisher": "C",
            "year": "2020",
            "pages": "100"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["book"]["year"], json!(2020));
    assert_eq!(body["book"]["pages"], json!(100));

    let books = all_books(&app).await;
    assert_eq!(books.len(), 1);
    assert_eq!(books[0]["title"], "A");
    assert_eq!(books[0]["year"], json!(2020));
}

#[tokio::test]
async fn test_create_book_with_bad_year_fails() {
    let app = app();
    let token = token_for(&app).await;

    let (status, body) = post(
        &app,
        Some(&token),
        json!({
            "action": "createBook",
            "title": "A",
            "author": "B",
            "publisher": "C",
            "year": "someday",
            "pages": "100"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "message": "Book creation failed" }));
    assert!(all_books(&app).await.is_empty());
}

#[tokio::test]
async fn test_update_book_overwrites_fields() {
    let app = app();
    let token = token_for(&app).await;
    let book = create_book(&app, &token, "The Left Hand of Darkness").await;

    let (status, body) = post(
        &app,
        Some(&token),
        json!({
            "action": "updateBook",
            "id": book["id"].to_string(),
            "title": "The Dispossessed",
            "author": "Ursula K. Le Guin",
            "publisher": "Harper & Row",
            "year": 1974,
            "pages": "387"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["book"]["id"], book["id"]);
    assert_eq!(body["book"]["title"], "The Dispossessed");
    assert_eq!(body["book"]["publisher"], "Harper & Row");
    assert_eq!(body["book"]["pages"], json!(387));

    let books = all_books(&app).await;
    assert_eq!(books, vec![body["book"].clone()]);
}

#[tokio::test]
async fn test_update_missing_book_creates_nothing() {
    let app = app();
    let token = token_for(&app).await;

    let (status, body) = post(
        &app,
        Some(&token),
        json!({
            "action": "updateBook",
            "id": "404",
            "title": "Ghost",
            "author": "Nobody",
            "publisher": "Void",
            "year": "2000",
            "pages": "1"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "message": "Book update failed" }));
    assert!(all_books(&app).await.is_empty());
}

#[tokio::test]
async fn test_delete_book_twice() {
    let app = app();
    let token = token_for(&app).await;
    let keep = create_book(&app, &token, "Keep").await;
    let remove = create_book(&app, &token, "Remove").await;

    let (status, body) = post(
        &app,
        Some(&token),
        json!({ "action": "deleteBook", "id": remove["id"].to_string() }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["book"], remove);

    assert_eq!(all_books(&app).await, vec![keep]);

    let (status, body) = post(
        &app,
        Some(&token),
        json!({ "action": "deleteBook", "id": remove["id"] }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "message": "Book deletion failed" }));
}

#[tokio::test]
async fn test_get_all_books_empty() {
    let app = app();
    let (status, body) = get(&app, "/api?action=getAllBooks").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "books": [] }));
}

#[tokio::test]
async fn test_unknown_actions_get_a_response() {
    let app = app();

    let (status, body) = post(&app, None, json!({ "action": "dropTables" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "message": "Unknown action" }));

    let (status, body) = post(&app, None, json!({ "title": "no action" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "message": "Unknown action" }));

    let (status, body) = get(&app, "/api").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "message": "Unknown action" }));

    let (status, _) = get(&app, "/api?action=register").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_malformed_body() {
    let app = app();
    let request = Request::post("/api")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "message": "Invalid request body" }));
}

#[tokio::test]
async fn test_malformed_query_string() {
    let app = app();

    let (status, body) = get(&app, "/api?action=getAllBooks&action=getAllBooks").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "message": "Invalid query string" }));
}

#[tokio::test]
async fn test_other_methods_not_allowed() {
    let app = app();
    for method in [Method::PUT, Method::DELETE, Method::PATCH, Method::HEAD] {
        for uri in ["/api", "/api?action=getAllBooks"] {
            let request = Request::builder()
                .method(method.clone())
                .uri(uri)
                .body(Body::empty())
                .unwrap();
            let (status, body) = send(&app, request).await;
            assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED, "{} {}", method, uri);
            assert_eq!(body, Value::Null);
        }
    }
}

#[tokio::test]
async fn test_book_mutation_requires_token() {
    let app = app();

    let (status, body) = post(
        &app,
        None,
        json!({
            "action": "createBook",
            "title": "A",
            "author": "B",
            "publisher": "C",
            "year": 2020,
            "pages": 100
        }),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({ "message": "Unauthorized" }));

    let (status, _) = post(
        &app,
        Some("forged.token.value"),
        json!({ "action": "deleteBook", "id": 1 }),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    assert!(all_books(&app).await.is_empty());
}

#[tokio::test]
async fn test_token_check_can_be_disabled() {
    let app = app_with(false);

    let (status, body) = post(
        &app,
        None,
        json!({
            "action": "createBook",
            "title": "Open",
            "author": "Anyone",
            "publisher": "Public",
            "year": "1990",
            "pages": "50"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["book"]["title"], "Open");
}

#[tokio::test]
async fn test_index_page_and_health() {
    let app = app();

    let response = app
        .clone()
        .oneshot(Request::get("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let html = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(html.contains("Create Book"));

    let (status, body) = get(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");

    let (status, body) = get(&app, "/ready").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ready");
}
