//! API handlers for the bookshelf REST endpoints

pub mod books;
pub mod health;
pub mod openapi;

use axum::{
    extract::{FromRequest, FromRequestParts},
    routing::get,
    Router,
};
use serde::Serialize;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::ToSchema;

use crate::{
    error::AppError,
    models::book::Book,
    AppState,
};

use books::{BookData, BookListData, RemovedBooksData};

/// Uniform response envelope. `status` is `success` exactly when `data` is set.
#[derive(Debug, Serialize, ToSchema)]
#[aliases(
    AddBookResponse = ApiResponse<Book>,
    BookListResponse = ApiResponse<BookListData>,
    BookResponse = ApiResponse<BookData>,
    RemovedBooksResponse = ApiResponse<RemovedBooksData>
)]
pub struct ApiResponse<T>
where
    T: for<'a> ToSchema<'a>,
{
    /// `success` or `fail`
    pub status: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T>
where
    T: for<'a> ToSchema<'a>,
{
    pub fn new(message: impl Into<String>, data: Option<T>) -> Self {
        let status = if data.is_some() { "success" } else { "fail" };
        Self {
            status: status.to_string(),
            message: message.into(),
            data,
        }
    }

    pub fn success(message: impl Into<String>, data: T) -> Self {
        Self::new(message, Some(data))
    }
}

/// JSON body extractor whose rejection is rendered as a `fail` envelope
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

/// Query string extractor whose rejection is rendered as a `fail` envelope
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct AppQuery<T>(pub T);

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api = Router::new()
        // Health check
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        // Books
        .route("/books", get(books::list_books).post(books::add_book))
        .route(
            "/books/:id",
            get(books::get_book)
                .put(books::update_book)
                .delete(books::delete_book),
        )
        .with_state(state);

    Router::new()
        .merge(api)
        .merge(openapi::create_openapi_router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
