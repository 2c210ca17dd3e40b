//! Form drafts and the book schema check.
//!
//! Every rule runs on every submission; the caller gets all failing fields at once.

use std::collections::BTreeMap;
use std::fmt;

use chrono::Datelike;
use serde::Serialize;
use validator::{Validate, ValidationError};

use crate::model::{Book, NewBook};

const FUTURE_YEAR_MESSAGE: &str = "Published date cannot be in the future.";

/// Form state for the add and edit dialogs.
#[derive(Debug, Clone, PartialEq, Eq, Validate)]
pub struct BookDraft {
    #[validate(length(min = 1, message = "Title is required."))]
    pub title: String,
    #[validate(length(min = 1, message = "Author is required."))]
    pub author: String,
    #[validate(range(min = 1000, message = "Published date must be a 4-digit year."))]
    pub publication_year: i32,
    #[validate(length(min = 10, message = "ISBN must be at least 10 characters long."))]
    pub isbn: String,
    pub image: Option<String>,
}

impl BookDraft {
    /// Empty form with the year preset to `year`.
    pub fn blank(year: i32) -> Self {
        Self {
            title: String::new(),
            author: String::new(),
            publication_year: year,
            isbn: String::new(),
            image: None,
        }
    }

    /// Form pre-filled from an existing record.
    pub fn from_book(book: &Book) -> Self {
        Self {
            title: book.title.clone(),
            author: book.author.clone(),
            publication_year: book.publication_year,
            isbn: book.isbn.clone(),
            image: book.image.clone(),
        }
    }

    /// Overwrite the fields the patch carries.
    pub fn apply(&mut self, patch: BookPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(author) = patch.author {
            self.author = author;
        }
        if let Some(year) = patch.publication_year {
            self.publication_year = year;
        }
        if let Some(isbn) = patch.isbn {
            self.isbn = isbn;
        }
        if let Some(image) = patch.image {
            self.image = Some(image);
        }
    }

    fn to_new_book(&self) -> NewBook {
        NewBook {
            title: self.title.clone(),
            author: self.author.clone(),
            publication_year: self.publication_year,
            isbn: self.isbn.clone(),
            image: self.image.clone().filter(|image| !image.is_empty()),
        }
    }
}

impl Default for BookDraft {
    fn default() -> Self {
        Self::blank(current_year())
    }
}

impl From<NewBook> for BookDraft {
    fn from(book: NewBook) -> Self {
        Self {
            title: book.title,
            author: book.author,
            publication_year: book.publication_year,
            isbn: book.isbn,
            image: book.image,
        }
    }
}

/// A partial edit; `None` leaves the field as it is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookPatch {
    pub title: Option<String>,
    pub author: Option<String>,
    pub publication_year: Option<i32>,
    pub isbn: Option<String>,
    /// A new cover URL. An edit cannot clear an existing cover: a blank value
    /// is treated as "no cover given" and the record keeps its image.
    pub image: Option<String>,
}

/// Form fields that can carry a validation message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    Title,
    Author,
    PublicationYear,
    Isbn,
}

impl Field {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Author => "author",
            Self::PublicationYear => "publicationYear",
            Self::Isbn => "isbn",
        }
    }

    fn from_draft_field(name: &str) -> Option<Self> {
        match name {
            "title" => Some(Self::Title),
            "author" => Some(Self::Author),
            "publication_year" => Some(Self::PublicationYear),
            "isbn" => Some(Self::Isbn),
            _ => None,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validation messages keyed by field, in form order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<Field, Vec<String>>);

impl FieldErrors {
    pub fn push(&mut self, field: Field, message: impl Into<String>) {
        self.0.entry(field).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of fields with at least one message.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, field: Field) -> &[String] {
        self.0.get(&field).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn contains(&self, field: Field) -> bool {
        self.0.contains_key(&field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &[String])> {
        self.0.iter().map(|(field, messages)| (*field, messages.as_slice()))
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in self.iter() {
            for message in messages {
                if !first {
                    f.write_str("; ")?;
                }
                write!(f, "{field}: {message}")?;
                first = false;
            }
        }
        Ok(())
    }
}

/// Calendar year in local time.
pub fn current_year() -> i32 {
    chrono::Local::now().year()
}

/// Check a draft against the book schema, using the current calendar year as
/// the upper bound for the publication year.
pub fn validate_book(draft: &BookDraft) -> Result<NewBook, FieldErrors> {
    validate_book_at(draft, current_year())
}

/// Check a draft against the book schema with an explicit latest allowed year.
pub fn validate_book_at(draft: &BookDraft, latest_year: i32) -> Result<NewBook, FieldErrors> {
    let mut errors = FieldErrors::default();

    if let Err(report) = draft.validate() {
        for (name, failures) in report.field_errors() {
            let name: &str = name.as_ref();
            let Some(field) = Field::from_draft_field(name) else {
                continue;
            };
            for failure in failures {
                errors.push(field, message_of(failure));
            }
        }
    }

    if draft.publication_year > latest_year {
        errors.push(Field::PublicationYear, FUTURE_YEAR_MESSAGE);
    }

    if errors.is_empty() {
        Ok(draft.to_new_book())
    } else {
        tracing::debug!(%errors, "book draft rejected");
        Err(errors)
    }
}

fn message_of(failure: &ValidationError) -> String {
    failure
        .message
        .as_ref()
        .map_or_else(|| failure.code.to_string(), ToString::to_string)
}
