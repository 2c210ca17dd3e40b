use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A book record as stored by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    /// Identifier assigned by the backend on creation
    pub id: String,
    /// Title of the book
    pub title: String,
    /// Author of the book
    pub author: String,
    /// Year of first publication
    pub publication_year: i32,
    /// ISBN-10 or ISBN-13, hyphenated or not
    pub isbn: String,
    /// Cover image URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl Book {
    /// Build a persisted record from a payload and the id the backend assigned to it.
    pub fn from_new(id: impl Into<String>, book: NewBook) -> Self {
        Self {
            id: id.into(),
            title: book.title,
            author: book.author,
            publication_year: book.publication_year,
            isbn: book.isbn,
            image: book.image,
        }
    }

    /// Replace the editable fields, keeping the identifier.
    ///
    /// The cover is only replaced when the edit carries one.
    pub fn with_fields(&self, fields: NewBook) -> Self {
        Self {
            id: self.id.clone(),
            title: fields.title,
            author: fields.author,
            publication_year: fields.publication_year,
            isbn: fields.isbn,
            image: fields.image.or_else(|| self.image.clone()),
        }
    }

    /// The record without its identifier.
    pub fn fields(&self) -> NewBook {
        NewBook {
            title: self.title.clone(),
            author: self.author.clone(),
            publication_year: self.publication_year,
            isbn: self.isbn.clone(),
            image: self.image.clone(),
        }
    }
}

/// Request payload for creating a book. The backend assigns the id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub publication_year: i32,
    pub isbn: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}
