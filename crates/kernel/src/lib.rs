//! Core types shared by every bookshelf crate: the book model, ISBN display,
//! the book schema check, the UI ports and layered settings.

pub mod isbn;
pub mod model;
pub mod ports;
pub mod settings;
pub mod validation;

pub use isbn::format_isbn;
pub use model::{Book, NewBook};
pub use ports::{AutoConfirm, Confirm, Notifier};
pub use validation::{validate_book, BookDraft, BookPatch, Field, FieldErrors};
