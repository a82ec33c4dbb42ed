//! OpenAPI documentation

use axum::Router;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{dispatch, health};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Bookcase API",
        version = "0.1.0",
        description = "Book catalog with user registration and login",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Actions
        dispatch::handle_post,
        dispatch::handle_get,
    ),
    components(
        schemas(
            // Requests
            crate::models::user::RegisterRequest,
            crate::models::user::LoginRequest,
            crate::models::book::BookFields,
            crate::models::action::UpdateBookRequest,
            crate::models::action::DeleteBookRequest,
            // Responses
            crate::models::user::User,
            crate::models::book::Book,
            dispatch::RegisterResponse,
            dispatch::TokenResponse,
            dispatch::BookResponse,
            dispatch::BooksResponse,
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "api", description = "Action endpoint for accounts and books")
    )
)]
pub struct ApiDoc;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
