//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{books, health, users};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "BookHub API",
        version = "0.1.0",
        description = "User and book catalog REST API"
    ),
    servers(
        (url = "/api", description = "BookHub API")
    ),
    paths(
        // Health
        health::health_check,
        // Users
        users::list_users,
        users::create_user,
        users::get_user,
        users::update_user,
        users::delete_user,
        // Books
        books::list_books,
        books::create_book,
        books::get_book,
        books::update_book,
        books::delete_book,
    ),
    components(
        schemas(
            crate::models::User,
            crate::models::UserPayload,
            crate::models::Book,
            crate::models::BookPayload,
            health::HealthResponse,
            crate::validation::FieldErrors,
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "users", description = "User management"),
        (name = "books", description = "Book catalog management")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
