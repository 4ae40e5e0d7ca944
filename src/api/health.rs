//! Liveness and readiness probes

use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::error::AppResult;

#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    /// `healthy` or `ready`
    pub status: String,
    pub version: String,
    /// Books currently held in memory
    pub books: usize,
}

fn report(state: &crate::AppState, status: &str) -> AppResult<Json<HealthResponse>> {
    Ok(Json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        books: state.services.books.count()?,
    }))
}

/// Liveness, with the current catalog size
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse),
        (status = 500, description = "Book store unavailable", body = crate::error::ErrorResponse)
    )
)]
pub async fn health_check(
    State(state): State<crate::AppState>,
) -> AppResult<Json<HealthResponse>> {
    report(&state, "healthy")
}

/// Readiness: the book store lock can be taken
#[utoipa::path(
    get,
    path = "/ready",
    tag = "health",
    responses(
        (status = 200, description = "Service accepts requests", body = HealthResponse),
        (status = 500, description = "Book store unavailable", body = crate::error::ErrorResponse)
    )
)]
pub async fn readiness_check(
    State(state): State<crate::AppState>,
) -> AppResult<Json<HealthResponse>> {
    report(&state, "ready")
}
