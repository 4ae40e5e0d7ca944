//! API integration tests, driven in-process through the router

use axum::{
    body::{to_bytes, Body},
    http::{header::CONTENT_TYPE, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use bookshelf_server::{api, AppConfig, AppState};

fn app() -> Router {
    api::create_router(AppState::new(AppConfig::default()))
}

/// Send a request and return the status with the decoded JSON body
async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("Failed to build request");

    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("Failed to send request");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    let body = serde_json::from_slice(&bytes).expect("Failed to parse response");
    (status, body)
}

async fn add(app: &Router, book: Value) -> String {
    let (status, body) = send(app, Method::POST, "/books", Some(book)).await;
    assert_eq!(status, StatusCode::CREATED);
    body["data"]["id"].as_str().expect("No book ID").to_string()
}

fn book(name: &str, reading: bool) -> Value {
    json!({
        "name": name,
        "year": 2010,
        "author": "John Doe",
        "summary": "Lorem ipsum",
        "publisher": "Dicoding Indonesia",
        "pageCount": 100,
        "readPage": 25,
        "reading": reading
    })
}

#[tokio::test]
async fn test_health_check() {
    let app = app();
    let (status, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["books"], 0);

    add(&app, book("Dune", false)).await;
    let (status, body) = send(&app, Method::GET, "/ready", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ready");
    assert_eq!(body["books"], 1);
}

#[tokio::test]
async fn test_add_book() {
    let app = app();
    let (status, body) = send(
        &app,
        Method::POST,
        "/books",
        Some(json!({ "name": "Dune", "pageCount": 500, "readPage": 500, "finished": false })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["status"], "success");
    assert_eq!(body["message"], "Book added successfully");
    let data = &body["data"];
    assert!(data["id"].is_string());
    assert_eq!(data["bookId"], data["id"]);
    assert_eq!(data["finished"], true);
    assert_eq!(data["insertedAt"], data["updatedAt"]);
}

#[tokio::test]
async fn test_add_book_without_name() {
    let app = app();
    let (status, body) = send(
        &app,
        Method::POST,
        "/books",
        Some(json!({ "pageCount": 10, "readPage": 1 })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "fail");
    assert_eq!(body["message"], "Failed to add book. Please provide the book name");
    assert!(body.get("data").is_none());
}

#[tokio::test]
async fn test_add_book_read_page_overflow() {
    let app = app();
    let (status, body) = send(
        &app,
        Method::POST,
        "/books",
        Some(json!({ "name": "Dune", "pageCount": 500, "readPage": 600 })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["message"],
        "Failed to add book. readPage must not be greater than pageCount"
    );

    let (_, body) = send(&app, Method::GET, "/books", None).await;
    assert_eq!(body["data"]["books"], json!([]));
}

#[tokio::test]
async fn test_malformed_body() {
    let app = app();
    let (status, body) = send(
        &app,
        Method::POST,
        "/books",
        Some(json!({ "name": "Dune", "pageCount": -3 })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "fail");
}

#[tokio::test]
async fn test_list_books_with_filters() {
    let app = app();
    let harry = add(&app, book("Harry Potter", true)).await;
    let dune = add(&app, book("Dune", false)).await;

    let (status, body) = send(&app, Method::GET, "/books", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    let books = body["data"]["books"].as_array().unwrap();
    assert_eq!(books.len(), 2);
    assert_eq!(books[0]["id"], harry.as_str());
    assert_eq!(books[1]["id"], dune.as_str());
    assert_eq!(
        books[0],
        json!({ "id": &harry, "name": "Harry Potter", "publisher": "Dicoding Indonesia" })
    );

    let (_, body) = send(&app, Method::GET, "/books?reading=1", None).await;
    assert_eq!(body["data"]["books"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"]["books"][0]["id"], harry.as_str());

    let (_, body) = send(&app, Method::GET, "/books?reading=0", None).await;
    assert_eq!(body["data"]["books"][0]["id"], dune.as_str());

    let (_, body) = send(&app, Method::GET, "/books?name=aR", None).await;
    assert_eq!(body["data"]["books"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"]["books"][0]["name"], "Harry Potter");

    let (_, body) = send(&app, Method::GET, "/books?finished=1", None).await;
    assert_eq!(body["data"]["books"], json!([]));

    let (_, body) = send(&app, Method::GET, "/books?reading=", None).await;
    assert_eq!(body["data"]["books"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_list_books_repeated_filter() {
    let app = app();
    add(&app, book("Harry Potter", true)).await;
    let dune = add(&app, book("Dune", false)).await;

    let (status, body) = send(&app, Method::GET, "/books?reading=1&reading=0", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    let books = body["data"]["books"].as_array().unwrap();
    assert_eq!(books.len(), 1);
    assert_eq!(books[0]["id"], dune.as_str());
}

#[tokio::test]
async fn test_get_book() {
    let app = app();
    let id = add(&app, book("Dune", false)).await;

    let (status, body) = send(&app, Method::GET, &format!("/books/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["book"]["id"], id.as_str());
    assert_eq!(body["data"]["book"]["bookId"], id.as_str());
    assert_eq!(body["data"]["book"]["year"], "2010");
    assert_eq!(body["data"]["book"]["readPage"], 25);

    let (status, body) = send(&app, Method::GET, "/books/missing", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status"], "fail");
    assert_eq!(body["message"], "Book not found");
}

#[tokio::test]
async fn test_update_book() {
    let app = app();
    let id = add(&app, book("Dune", false)).await;

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/books/{}", id),
        Some(json!({ "id": "forged", "name": "Dune Messiah", "readPage": 100 })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Book updated successfully");
    let updated = &body["data"]["book"];
    assert_eq!(updated["id"], id.as_str());
    assert_eq!(updated["name"], "Dune Messiah");
    assert_eq!(updated["author"], "John Doe");
    assert_eq!(updated["finished"], true);
}

#[tokio::test]
async fn test_update_book_null_clears_field() {
    let app = app();
    let id = add(&app, book("Dune", false)).await;
    let uri = format!("/books/{}", id);

    let (status, body) = send(
        &app,
        Method::PUT,
        &uri,
        Some(json!({ "name": "Dune", "publisher": null })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["book"]["publisher"], Value::Null);
    assert_eq!(body["data"]["book"]["author"], "John Doe");

    let (_, body) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(body["data"]["book"]["publisher"], Value::Null);
}

#[tokio::test]
async fn test_update_book_failures() {
    let app = app();
    let id = add(&app, book("Dune", false)).await;
    let uri = format!("/books/{}", id);

    let (status, body) = send(&app, Method::PUT, &uri, Some(json!({ "readPage": 1 }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Failed to update book. Please provide the book name");

    let (status, body) = send(
        &app,
        Method::PUT,
        &uri,
        Some(json!({ "name": "Dune", "readPage": 101 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["message"],
        "Failed to update book. readPage must not be greater than pageCount"
    );

    let (status, body) = send(
        &app,
        Method::PUT,
        "/books/missing",
        Some(json!({ "name": "Dune" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Failed to update book. Id not found");
}

#[tokio::test]
async fn test_delete_book() {
    let app = app();
    let id = add(&app, book("Dune", false)).await;
    let uri = format!("/books/{}", id);

    let (status, body) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Book deleted successfully");
    assert_eq!(body["data"]["book"][0]["id"], id.as_str());

    let (status, _) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Failed to delete book. Id not found");
}
