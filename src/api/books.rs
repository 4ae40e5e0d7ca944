//! Book endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::book::{Book, BookPayload, BookQuery, BookSummary},
};

use super::{ApiResponse, AppJson, AppQuery};

#[derive(Debug, Serialize, ToSchema)]
pub struct BookListData {
    pub books: Vec<BookSummary>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BookData {
    pub book: Book,
}

/// Books removed by a delete (always exactly one)
#[derive(Debug, Serialize, ToSchema)]
pub struct RemovedBooksData {
    pub book: Vec<Book>,
}

/// Add a new book
#[utoipa::path(
    post,
    path = "/books",
    tag = "books",
    request_body = BookPayload,
    responses(
        (status = 201, description = "Book added", body = crate::api::AddBookResponse),
        (status = 400, description = "Missing name or readPage greater than pageCount", body = crate::error::ErrorResponse)
    )
)]
pub async fn add_book(
    State(state): State<crate::AppState>,
    AppJson(payload): AppJson<BookPayload>,
) -> AppResult<(StatusCode, Json<ApiResponse<Book>>)> {
    let book = state.services.books.add_book(payload)?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success("Book added successfully", book)),
    ))
}

/// List books, optionally filtered
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    params(BookQuery),
    responses(
        (status = 200, description = "Matching books", body = crate::api::BookListResponse)
    )
)]
pub async fn list_books(
    State(state): State<crate::AppState>,
    AppQuery(pairs): AppQuery<Vec<(String, String)>>,
) -> AppResult<Json<ApiResponse<BookListData>>> {
    let query = BookQuery::from_pairs(pairs);
    let books = state.services.books.list_books(&query)?;
    Ok(Json(ApiResponse::success("", BookListData { books })))
}

/// Get a book by ID
#[utoipa::path(
    get,
    path = "/books/{id}",
    tag = "books",
    params(("id" = String, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book details", body = crate::api::BookResponse),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_book(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<BookData>>> {
    let book = state.services.books.get_book(&id)?;
    Ok(Json(ApiResponse::success("", BookData { book })))
}

/// Update a book; omitted fields keep their stored values
#[utoipa::path(
    put,
    path = "/books/{id}",
    tag = "books",
    params(("id" = String, Path, description = "Book ID")),
    request_body = BookPayload,
    responses(
        (status = 200, description = "Book updated", body = crate::api::BookResponse),
        (status = 400, description = "Missing name or readPage greater than pageCount", body = crate::error::ErrorResponse),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_book(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
    AppJson(payload): AppJson<BookPayload>,
) -> AppResult<Json<ApiResponse<BookData>>> {
    let book = state.services.books.update_book(&id, payload)?;
    Ok(Json(ApiResponse::success(
        "Book updated successfully",
        BookData { book },
    )))
}

/// Delete a book
#[utoipa::path(
    delete,
    path = "/books/{id}",
    tag = "books",
    params(("id" = String, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book deleted", body = crate::api::RemovedBooksResponse),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_book(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<RemovedBooksData>>> {
    let book = state.services.books.delete_book(&id)?;
    Ok(Json(ApiResponse::success(
        "Book deleted successfully",
        RemovedBooksData { book },
    )))
}
