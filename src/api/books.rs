//! Book catalog endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::WithRejection;
use serde_json::Value;

use crate::{
    error::{AppError, AppResult},
    models::Book,
    AppState,
};

use super::SearchQuery;

/// List books, optionally searching title, author and ISBN
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    params(SearchQuery),
    responses(
        (status = 200, description = "List of books", body = Vec<Book>)
    )
)]
pub async fn list_books(
    State(state): State<AppState>,
    WithRejection(Query(query), _): WithRejection<Query<SearchQuery>, AppError>,
) -> AppResult<Json<Vec<Book>>> {
    let books = state.services.books.list(query.search.as_deref()).await?;
    Ok(Json(books))
}

/// Create a new book
#[utoipa::path(
    post,
    path = "/books",
    tag = "books",
    request_body = crate::models::BookPayload,
    responses(
        (status = 201, description = "Book created", body = Book),
        (status = 400, description = "Invalid input", body = crate::validation::FieldErrors)
    )
)]
pub async fn create_book(
    State(state): State<AppState>,
    WithRejection(Json(payload), _): WithRejection<Json<Value>, AppError>,
) -> AppResult<(StatusCode, Json<Book>)> {
    let created = state.services.books.create(&payload).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Get book details by ID
#[utoipa::path(
    get,
    path = "/books/{id}",
    tag = "books",
    params(
        ("id" = i32, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Book details", body = Book),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_book(
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<i32>, AppError>,
) -> AppResult<Json<Book>> {
    let book = state.services.books.get(id).await?;
    Ok(Json(book))
}

/// Replace an existing book
#[utoipa::path(
    put,
    path = "/books/{id}",
    tag = "books",
    params(
        ("id" = i32, Path, description = "Book ID")
    ),
    request_body = crate::models::BookPayload,
    responses(
        (status = 200, description = "Book updated", body = Book),
        (status = 400, description = "Invalid input", body = crate::validation::FieldErrors),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_book(
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<i32>, AppError>,
    WithRejection(Json(payload), _): WithRejection<Json<Value>, AppError>,
) -> AppResult<Json<Book>> {
    let updated = state.services.books.update(id, &payload).await?;
    Ok(Json(updated))
}

/// Delete a book
#[utoipa::path(
    delete,
    path = "/books/{id}",
    tag = "books",
    params(
        ("id" = i32, Path, description = "Book ID")
    ),
    responses(
        (status = 204, description = "Book deleted"),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_book(
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<i32>, AppError>,
) -> AppResult<StatusCode> {
    state.services.books.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
