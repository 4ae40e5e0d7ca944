//! Book catalog service

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, BookFilter, BookPayload, BookQuery, BookSummary},
    repository::Repository,
};

#[derive(Clone)]
pub struct BooksService {
    repository: Repository,
}

impl BooksService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub fn add_book(&self, payload: BookPayload) -> AppResult<Book> {
        let book = self.repository.books.create(payload)?;
        tracing::info!(book_id = %book.id, "Book added");
        Ok(book)
    }

    /// List books matching the query filters
    pub fn list_books(&self, query: &BookQuery) -> AppResult<Vec<BookSummary>> {
        let filter = BookFilter::from(query);
        self.repository.books.list(&filter)
    }

    pub fn get_book(&self, id: &str) -> AppResult<Book> {
        self.repository.books.get_by_id(id).map_err(|e| log_miss(id, e))
    }

    pub fn update_book(&self, id: &str, payload: BookPayload) -> AppResult<Book> {
        let book = self
            .repository
            .books
            .update(id, payload)
            .map_err(|e| log_miss(id, e))?;
        tracing::info!(book_id = %book.id, "Book updated");
        Ok(book)
    }

    pub fn delete_book(&self, id: &str) -> AppResult<Vec<Book>> {
        let removed = self.repository.books.delete(id).map_err(|e| log_miss(id, e))?;
        tracing::info!(book_id = %id, "Book deleted");
        Ok(removed)
    }

    pub fn count(&self) -> AppResult<usize> {
        self.repository.books.count()
    }
}

fn log_miss(id: &str, err: AppError) -> AppError {
    if let AppError::NotFound(_) = err {
        tracing::debug!(book_id = %id, "Book lookup missed");
    }
    err
}
