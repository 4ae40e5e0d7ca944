//! Bookshelf server
//!
//! A small REST JSON API over an in-memory book catalog: add, list with filters,
//! read, update and delete book records.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}

impl AppState {
    /// Build state with an empty book store
    pub fn new(config: AppConfig) -> Self {
        let repository = repository::Repository::new(&config.books);
        Self {
            services: Arc::new(services::Services::new(repository)),
            config: Arc::new(config),
        }
    }
}
