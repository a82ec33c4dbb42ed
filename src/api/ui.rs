//! Single-page client served at `/`.
//!
//! The page keeps the session token in memory only, so a reload logs out.

use axum::response::Html;

const INDEX_HTML: &str = include_str!("../../static/index.html");

pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}
