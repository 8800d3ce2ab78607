//! Router tests over the in-memory backend

use axum::{
    body::{to_bytes, Body},
    http::{header::CONTENT_TYPE, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use bookhub_server::{
    api, config::StorageBackend, repository::Repository, services::Services, AppConfig, AppState,
};

fn app() -> Router {
    let mut config = AppConfig::default();
    config.database.backend = StorageBackend::Memory;
    let state = AppState::new(config, Services::new(Repository::in_memory()));
    api::router(state)
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

#[tokio::test]
async fn test_user_lifecycle() {
    let app = app();

    let (status, created) = send(
        &app,
        Method::POST,
        "/api/users",
        Some(json!({"name": "Ada", "email": "ada@x.com"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["id"].as_i64().unwrap();
    assert_eq!(created["name"], "Ada");
    assert_eq!(created["email"], "ada@x.com");
    assert_eq!(created["is_librarian"], false);

    let (status, fetched) = send(&app, Method::GET, &format!("/api/users/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);

    let (status, found) = send(&app, Method::GET, "/api/users?search=ada", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(found.as_array().unwrap().iter().any(|u| u["id"] == id));

    let (status, body) = send(&app, Method::DELETE, &format!("/api/users/{}", id), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let (status, body) = send(&app, Method::GET, &format!("/api/users/{}", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "User not found"}));
}

#[tokio::test]
async fn test_invalid_book_is_not_created() {
    let app = app();
    send(
        &app,
        Method::POST,
        "/api/books",
        Some(json!({"title": "Dune", "author": "Herbert", "isbn": "1"})),
    )
    .await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/books",
        Some(json!({"title": "", "author": "X", "isbn": "Y"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"title": ["This field may not be blank."]}));

    let (_, books) = send(&app, Method::GET, "/api/books", None).await;
    assert_eq!(books.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_book_search_matches_any_field() {
    let app = app();
    for (title, author, isbn) in [
        ("Dune", "Frank Herbert", "9780441013593"),
        ("Emma", "Jane Austen", "9780141439587"),
        ("Persuasion", "Jane Austen", "9780141439686"),
    ] {
        let (status, _) = send(
            &app,
            Method::POST,
            "/api/books",
            Some(json!({"title": title, "author": author, "isbn": isbn})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (_, by_author) = send(&app, Method::GET, "/api/books?search=austen", None).await;
    let titles: Vec<_> = by_author
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["title"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(titles, vec!["Emma", "Persuasion"]);

    let (_, by_isbn) = send(&app, Method::GET, "/api/books?search=0441", None).await;
    assert_eq!(by_isbn.as_array().unwrap().len(), 1);

    let (_, all) = send(&app, Method::GET, "/api/books", None).await;
    let (_, empty_search) = send(&app, Method::GET, "/api/books?search=", None).await;
    assert_eq!(all.as_array().unwrap().len(), 3);
    assert_eq!(all, empty_search);
}

#[tokio::test]
async fn test_update_replaces_user() {
    let app = app();
    let (_, created) = send(
        &app,
        Method::POST,
        "/api/users",
        Some(json!({"name": "Ada", "email": "ada@x.com"})),
    )
    .await;
    let uri = format!("/api/users/{}", created["id"]);

    let (status, updated) = send(
        &app,
        Method::PUT,
        &uri,
        Some(json!({"name": "Ada Lovelace", "email": "ada@lovelace.org", "is_librarian": true})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["id"], created["id"]);
    assert_eq!(updated["name"], "Ada Lovelace");
    assert_eq!(updated["is_librarian"], true);

    // Partial bodies are rejected, not merged
    let (status, errors) = send(&app, Method::PUT, &uri, Some(json!({"name": "Ada"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(errors, json!({"email": ["This field is required."]}));

    let (_, fetched) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(fetched, updated);
}

#[tokio::test]
async fn test_missing_ids_are_not_found() {
    let app = app();

    let (status, body) = send(
        &app,
        Method::PUT,
        "/api/books/404",
        Some(json!({"title": ""})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "Book not found"}));

    let (status, body) = send(&app, Method::DELETE, "/api/books/404", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "Book not found"}));
}

#[tokio::test]
async fn test_malformed_requests_are_bad_requests() {
    let app = app();

    let (status, body) = send(&app, Method::GET, "/api/users/abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/users")
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_health() {
    let (status, body) = send(&app(), Method::GET, "/api/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["storage"], "memory");
}

#[tokio::test]
async fn test_trailing_slash_paths() {
    let app = app();

    let (status, created) = send(
        &app,
        Method::POST,
        "/api/books/",
        Some(json!({"title": "Dune", "author": "Herbert", "isbn": "1", "available": true})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let uri = format!("/api/books/{}/", created["id"]);

    let (status, found) = send(&app, Method::GET, "/api/books/?search=dune", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(found, json!([created]));

    let (status, updated) = send(
        &app,
        Method::PUT,
        &uri,
        Some(json!({"title": "Dune", "author": "Frank Herbert", "isbn": "1"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["author"], "Frank Herbert");

    let (status, _) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "Book not found"}));

    let (status, users) = send(&app, Method::GET, "/api/users/?search=", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(users, json!([]));
}

#[tokio::test]
async fn test_book_availability_round_trip() {
    let app = app();

    let (status, created) = send(
        &app,
        Method::POST,
        "/api/books",
        Some(json!({"title": "Emma", "author": "Austen", "isbn": "2", "available": false})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["available"], false);

    let uri = format!("/api/books/{}", created["id"]);
    let (_, fetched) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(fetched["available"], false);

    // Omitted on a full replacement, the flag returns to its default
    let (_, updated) = send(
        &app,
        Method::PUT,
        &uri,
        Some(json!({"title": "Emma", "author": "Austen", "isbn": "2"})),
    )
    .await;
    assert_eq!(updated["available"], true);
}

#[tokio::test]
async fn test_wrong_types_keep_other_field_errors() {
    let app = app();

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/books",
        Some(json!({"title": 5, "author": "", "isbn": "1"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({
            "author": ["This field may not be blank."],
            "title": ["Not a valid string."]
        })
    );

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/users",
        Some(json!({"name": null, "email": "ada@x.com"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"name": ["This field may not be null."]}));

    let (_, books) = send(&app, Method::GET, "/api/books", None).await;
    assert_eq!(books, json!([]));
}
