//! In-memory book store

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Utc;
use rand::Rng;

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, BookFilter, BookOperation, BookPayload, BookSummary},
};

/// URL-safe id alphabet
const ID_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789_-";

/// Owns the book collection. Clones share the same storage; every operation
/// holds the lock for its whole duration.
#[derive(Clone)]
pub struct BooksRepository {
    books: Arc<RwLock<Vec<Book>>>,
    id_length: usize,
}

impl BooksRepository {
    pub fn new(id_length: usize) -> Self {
        Self {
            books: Arc::new(RwLock::new(Vec::new())),
            id_length,
        }
    }

    fn read(&self) -> AppResult<RwLockReadGuard<'_, Vec<Book>>> {
        self.books
            .read()
            .map_err(|_| AppError::Internal("book store lock poisoned".to_string()))
    }

    fn write(&self) -> AppResult<RwLockWriteGuard<'_, Vec<Book>>> {
        self.books
            .write()
            .map_err(|_| AppError::Internal("book store lock poisoned".to_string()))
    }

    fn generate_id(&self, books: &[Book]) -> String {
        let mut rng = rand::thread_rng();
        loop {
            let id: String = (0..self.id_length)
                .map(|_| ID_ALPHABET[rng.gen_range(0..ID_ALPHABET.len())] as char)
                .collect();
            if !books.iter().any(|b| b.id == id) {
                return id;
            }
        }
    }

    /// Validate and store a new book
    pub fn create(&self, payload: BookPayload) -> AppResult<Book> {
        let op = BookOperation::Add;
        op.validate(&payload)?;
        op.check_progress(
            payload.page_count.unwrap_or(0),
            payload.read_page.unwrap_or(0),
        )?;

        let mut books = self.write()?;
        let id = self.generate_id(&books);
        let book = Book::from_payload(id, payload, Utc::now());
        books.push(book.clone());
        Ok(book)
    }

    /// Matching books in insertion order, projected to id/name/publisher
    pub fn list(&self, filter: &BookFilter) -> AppResult<Vec<BookSummary>> {
        let books = self.read()?;
        Ok(books
            .iter()
            .filter(|b| filter.matches(b))
            .map(Book::to_summary)
            .collect())
    }

    pub fn get_by_id(&self, id: &str) -> AppResult<Book> {
        self.read()?
            .iter()
            .find(|b| b.id == id)
            .cloned()
            .ok_or_else(|| AppError::NotFound("Book not found".to_string()))
    }

    /// Merge `payload` into the stored book. Validation happens before the lookup.
    pub fn update(&self, id: &str, payload: BookPayload) -> AppResult<Book> {
        let op = BookOperation::Update;
        op.validate(&payload)?;

        let mut books = self.write()?;
        let book = books
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or_else(|| AppError::NotFound("Failed to update book. Id not found".to_string()))?;

        op.check_progress(
            payload.page_count.unwrap_or(book.page_count),
            payload.read_page.unwrap_or(book.read_page),
        )?;

        book.apply(payload, Utc::now());
        Ok(book.clone())
    }

    /// Remove a book, returning the removed records
    pub fn delete(&self, id: &str) -> AppResult<Vec<Book>> {
        let mut books = self.write()?;
        let index = books
            .iter()
            .position(|b| b.id == id)
            .ok_or_else(|| AppError::NotFound("Failed to delete book. Id not found".to_string()))?;
        Ok(books.drain(index..=index).collect())
    }

    pub fn count(&self) -> AppResult<usize> {
        Ok(self.read()?.len())
    }
}
