//! The book catalog screen: list view, dialogs and their state.

pub mod dialogs;
pub mod list;
pub mod page;
pub mod render;
pub mod state;

pub use dialogs::{AddBookDialog, EditBookDialog, ViewBookDialog};
pub use list::BookList;
pub use page::CatalogPage;
pub use render::{BookDetail, BookRow, TableView, EMPTY_LIST_MESSAGE};
pub use state::{DeleteOutcome, DialogState, LoadState, SubmitOutcome};
