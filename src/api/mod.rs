//! API handlers for BookHub REST endpoints

pub mod books;
pub mod health;
pub mod openapi;
pub mod users;

use axum::{routing::get, Router};
use serde::Deserialize;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::IntoParams;

use crate::AppState;

/// Query string accepted by list endpoints
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchQuery {
    /// Case-insensitive text matched against the resource's searchable fields
    pub search: Option<String>,
}

/// Create the application router with all routes
pub fn router(state: AppState) -> Router {
    // The browser client is served from another origin
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let user_list = get(users::list_users).post(users::create_user);
    let user_item = get(users::get_user)
        .put(users::update_user)
        .delete(users::delete_user);
    let book_list = get(books::list_books).post(books::create_book);
    let book_item = get(books::get_book)
        .put(books::update_book)
        .delete(books::delete_book);

    // Every resource path is also served with a trailing slash, which is
    // how the browser client addresses them
    let api = Router::new()
        .route("/health", get(health::health_check))
        // Users
        .route("/users", user_list.clone())
        .route("/users/", user_list)
        .route("/users/:id", user_item.clone())
        .route("/users/:id/", user_item)
        // Books
        .route("/books", book_list.clone())
        .route("/books/", book_list)
        .route("/books/:id", book_item.clone())
        .route("/books/:id/", book_item)
        .with_state(state);

    Router::new()
        .nest("/api", api)
        .merge(openapi::create_openapi_router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
