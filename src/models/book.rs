//! Book model and related types.
//!
//! `Book` is the stored record. `BookPayload` is the client input for both add and
//! update; fields the server owns (`id`, `finished`, timestamps) are not part of it
//! and are dropped if a client sends them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError, ValidationErrors};

use crate::error::AppError;

/// Stored book record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    /// Server-generated identifier, never reassigned
    pub id: String,
    /// Mirror of `id` kept for clients that read `bookId`
    pub book_id: String,
    pub name: String,
    pub year: Option<String>,
    pub author: Option<String>,
    pub summary: Option<String>,
    pub publisher: Option<String>,
    pub page_count: u64,
    pub read_page: u64,
    /// Always `read_page == page_count`
    pub finished: bool,
    pub reading: bool,
    pub inserted_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Book {
    /// Build a new record from an already validated payload
    pub fn from_payload(id: String, payload: BookPayload, now: DateTime<Utc>) -> Self {
        let page_count = payload.page_count.unwrap_or(0);
        let read_page = payload.read_page.unwrap_or(0);
        Self {
            book_id: id.clone(),
            id,
            name: payload.name.unwrap_or_default(),
            year: payload.year.flatten(),
            author: payload.author.flatten(),
            summary: payload.summary.flatten(),
            publisher: payload.publisher.flatten(),
            page_count,
            read_page,
            finished: page_count == read_page,
            reading: payload.reading.unwrap_or(false),
            inserted_at: now,
            updated_at: now,
        }
    }

    /// Shallow merge: fields present in `payload` replace stored ones, an explicit
    /// `null` clears a text field. `id`, `book_id` and `inserted_at` are left untouched.
    pub fn apply(&mut self, payload: BookPayload, now: DateTime<Utc>) {
        if let Some(name) = payload.name {
            self.name = name;
        }
        if let Some(year) = payload.year {
            self.year = year;
        }
        if let Some(author) = payload.author {
            self.author = author;
        }
        if let Some(summary) = payload.summary {
            self.summary = summary;
        }
        if let Some(publisher) = payload.publisher {
            self.publisher = publisher;
        }
        if let Some(page_count) = payload.page_count {
            self.page_count = page_count;
        }
        if let Some(read_page) = payload.read_page {
            self.read_page = read_page;
        }
        if let Some(reading) = payload.reading {
            self.reading = reading;
        }
        self.finished = self.page_count == self.read_page;
        self.updated_at = now;
    }

    pub fn to_summary(&self) -> BookSummary {
        BookSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            publisher: self.publisher.clone(),
        }
    }
}

/// List projection of a book
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct BookSummary {
    pub id: String,
    pub name: String,
    pub publisher: Option<String>,
}

/// Add/update book request
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_page_progress"))]
pub struct BookPayload {
    #[validate(required(code = "name_required"))]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "opaque_text")]
    #[schema(value_type = Option<String>)]
    pub year: Option<Option<String>>,
    #[serde(default, deserialize_with = "opaque_text")]
    #[schema(value_type = Option<String>)]
    pub author: Option<Option<String>>,
    #[serde(default, deserialize_with = "opaque_text")]
    #[schema(value_type = Option<String>)]
    pub summary: Option<Option<String>>,
    #[serde(default, deserialize_with = "opaque_text")]
    #[schema(value_type = Option<String>)]
    pub publisher: Option<Option<String>>,
    pub page_count: Option<u64>,
    pub read_page: Option<u64>,
    pub reading: Option<bool>,
}

fn validate_page_progress(payload: &BookPayload) -> Result<(), ValidationError> {
    match (payload.read_page, payload.page_count) {
        (Some(read), Some(total)) if read > total => {
            Err(ValidationError::new(READ_PAGE_EXCEEDS_PAGE_COUNT))
        }
        _ => Ok(()),
    }
}

const READ_PAGE_EXCEEDS_PAGE_COUNT: &str = "read_page_exceeds_page_count";

/// Pass-through text field: `None` when absent (via `serde(default)`), `Some(None)`
/// for an explicit `null`. Bare JSON numbers (e.g. `"year": 2008`) are stringified.
fn opaque_text<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Text {
        Str(String),
        Num(serde_json::Number),
    }

    Ok(Some(Option::<Text>::deserialize(deserializer)?.map(|text| match text {
        Text::Str(s) => s,
        Text::Num(n) => n.to_string(),
    })))
}

/// Mutation kind, used to word validation and lookup errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookOperation {
    Add,
    Update,
}

impl BookOperation {
    fn prefix(self) -> &'static str {
        match self {
            BookOperation::Add => "Failed to add book",
            BookOperation::Update => "Failed to update book",
        }
    }

    pub fn name_required(self) -> AppError {
        AppError::Validation(format!("{}. Please provide the book name", self.prefix()))
    }

    pub fn read_page_exceeds_page_count(self) -> AppError {
        AppError::Validation(format!(
            "{}. readPage must not be greater than pageCount",
            self.prefix()
        ))
    }

    /// Validate the payload on its own. Name is reported before page progress.
    pub fn validate(self, payload: &BookPayload) -> Result<(), AppError> {
        payload.validate().map_err(|errors| self.first_error(&errors))
    }

    /// Check the page invariant on the values the record will end up with
    pub fn check_progress(self, page_count: u64, read_page: u64) -> Result<(), AppError> {
        if read_page > page_count {
            return Err(self.read_page_exceeds_page_count());
        }
        Ok(())
    }

    fn first_error(self, errors: &ValidationErrors) -> AppError {
        let name_missing = errors
            .field_errors()
            .values()
            .flat_map(|errs| errs.iter())
            .any(|e| e.code == "name_required");
        if name_missing {
            self.name_required()
        } else {
            self.read_page_exceeds_page_count()
        }
    }
}

/// Book list query. Empty values behave like absent ones.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct BookQuery {
    /// `1` keeps books being read, any other value keeps the rest
    pub reading: Option<String>,
    /// `1` keeps finished books, any other value keeps the rest
    pub finished: Option<String>,
    /// Case-insensitive substring of the book name
    pub name: Option<String>,
}

impl BookQuery {
    /// Build from raw query pairs. A repeated key keeps its last value; unknown keys
    /// are ignored.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        pairs
            .into_iter()
            .fold(Self::default(), |mut query, (key, value)| {
                match key.as_str() {
                    "reading" => query.reading = Some(value),
                    "finished" => query.finished = Some(value),
                    "name" => query.name = Some(value),
                    _ => {}
                }
                query
            })
    }
}

/// Tri-state boolean predicate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BoolFilter {
    #[default]
    Any,
    Truthy,
    Falsy,
}

impl BoolFilter {
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            None | Some("") => BoolFilter::Any,
            Some("1") => BoolFilter::Truthy,
            Some(_) => BoolFilter::Falsy,
        }
    }

    pub fn accepts(self, value: bool) -> bool {
        match self {
            BoolFilter::Any => true,
            BoolFilter::Truthy => value,
            BoolFilter::Falsy => !value,
        }
    }
}

/// Parsed form of `BookQuery`; all predicates are ANDed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookFilter {
    pub reading: BoolFilter,
    pub finished: BoolFilter,
    /// Lowercased needle
    pub name: Option<String>,
}

impl BookFilter {
    pub fn matches(&self, book: &Book) -> bool {
        self.reading.accepts(book.reading)
            && self.finished.accepts(book.finished)
            && self
                .name
                .as_deref()
                .map_or(true, |needle| book.name.to_lowercase().contains(needle))
    }
}

impl From<&BookQuery> for BookFilter {
    fn from(query: &BookQuery) -> Self {
        Self {
            reading: BoolFilter::parse(query.reading.as_deref()),
            finished: BoolFilter::parse(query.finished.as_deref()),
            name: query
                .name
                .as_deref()
                .filter(|n| !n.is_empty())
                .map(str::to_lowercase),
        }
    }
}
