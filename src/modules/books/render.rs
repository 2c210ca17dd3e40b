//! Display models for the book table and the detail view.

use std::fmt;

use bookshelf_kernel::{format_isbn, Book};

use crate::utils::cover_or_placeholder;

/// Shown instead of rows when the listing is empty.
pub const EMPTY_LIST_MESSAGE: &str =
    "No books found. Try searching for something else or add a new book.";

/// What the book table shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableView {
    /// Initial fetch still in flight.
    Loading,
    Empty,
    Rows(Vec<BookRow>),
}

/// One table row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookRow {
    pub id: String,
    pub cover: String,
    pub title: String,
    pub author: String,
    pub publication_year: i32,
    pub isbn: String,
}

impl BookRow {
    pub fn new(book: &Book, placeholder_cover: &str) -> Self {
        Self {
            id: book.id.clone(),
            cover: cover_or_placeholder(book.image.as_deref(), placeholder_cover),
            title: book.title.clone(),
            author: book.author.clone(),
            publication_year: book.publication_year,
            isbn: format_isbn(Some(&book.isbn)),
        }
    }
}

/// Read-only detail of one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookDetail {
    pub title: String,
    pub author: String,
    pub published: i32,
    /// Formatted ISBN; absent when the record has none.
    pub isbn: Option<String>,
    pub cover: String,
}

impl BookDetail {
    pub fn new(book: &Book, placeholder_cover: &str) -> Self {
        Self {
            title: book.title.clone(),
            author: book.author.clone(),
            published: book.publication_year,
            isbn: (!book.isbn.is_empty()).then(|| format_isbn(Some(&book.isbn))),
            cover: cover_or_placeholder(book.image.as_deref(), placeholder_cover),
        }
    }
}

impl fmt::Display for BookDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        writeln!(f, "Author: {}", self.author)?;
        writeln!(f, "Published Date: {}", self.published)?;
        if let Some(isbn) = &self.isbn {
            writeln!(f, "ISBN: {isbn}")?;
        }
        write!(f, "Cover: {}", self.cover)
    }
}
