//! Repository layer for book storage

pub mod books;

use crate::config::BooksConfig;

/// Main repository struct holding every store
#[derive(Clone)]
pub struct Repository {
    pub books: books::BooksRepository,
}

impl Repository {
    /// Create a new, empty repository
    pub fn new(config: &BooksConfig) -> Self {
        Self {
            books: books::BooksRepository::new(config.id_length),
        }
    }
}
