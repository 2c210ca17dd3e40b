//! The session's cached listing, shared between the page and the requests it
//! starts.

use std::sync::{Arc, Mutex};

use bookshelf_kernel::Book;

use crate::utils::lock;

/// Cheap handle to the page's book list. Clones see the same records.
#[derive(Debug, Clone, Default)]
pub struct BookList {
    books: Arc<Mutex<Vec<Book>>>,
}

impl BookList {
    pub fn snapshot(&self) -> Vec<Book> {
        lock(&self.books).clone()
    }

    pub fn find(&self, id: &str) -> Option<Book> {
        lock(&self.books).iter().find(|book| book.id == id).cloned()
    }

    pub fn replace_all(&self, books: Vec<Book>) {
        *lock(&self.books) = books;
    }

    /// Put a record the server just created at the top.
    pub fn prepend(&self, book: Book) {
        tracing::debug!(book_id = %book.id, "book added to catalog page");
        lock(&self.books).insert(0, book);
    }

    /// Swap in the server's copy of an edited record, keeping its position.
    pub fn replace(&self, book: Book) {
        let mut books = lock(&self.books);
        match books.iter_mut().find(|existing| existing.id == book.id) {
            Some(existing) => *existing = book,
            None => tracing::debug!(book_id = %book.id, "updated book is no longer listed"),
        }
    }

    pub fn remove(&self, id: &str) {
        lock(&self.books).retain(|book| book.id != id);
    }
}
