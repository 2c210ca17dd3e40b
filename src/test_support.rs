//! Scripted collaborators for exercising the catalog page without a network.

use std::sync::{
    atomic::{AtomicBool, AtomicU64, Ordering},
    Mutex,
};
use std::time::Duration;

use async_trait::async_trait;
use bookshelf_http::{BooksApi, ClientError, DeleteStatus};
use bookshelf_kernel::{Book, NewBook, Notifier};

pub fn book(id: &str) -> Book {
    Book {
        id: id.to_string(),
        title: format!("Book {id}"),
        author: "Jorge Luis Borges".to_string(),
        publication_year: 1944,
        isbn: "9780802130303".to_string(),
        image: None,
    }
}

/// In-memory [`BooksApi`] that records every call.
#[derive(Default)]
pub struct FakeApi {
    books: Vec<Book>,
    fail_search: bool,
    fail_writes: AtomicBool,
    delay_ms: AtomicU64,
    next_id: Mutex<Option<String>>,
    calls: Mutex<Vec<String>>,
}

impl FakeApi {
    pub fn with_books(books: Vec<Book>) -> Self {
        Self {
            books,
            ..Self::default()
        }
    }

    /// Every operation fails.
    pub fn failing() -> Self {
        let api = Self {
            fail_search: true,
            ..Self::default()
        };
        api.fail_writes();
        api
    }

    pub fn fail_writes(&self) {
        self.fail_writes.store(true, Ordering::SeqCst);
    }

    /// Answer writes only after `delay`, as a slow server would.
    pub fn delay(&self, delay: Duration) {
        let millis = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        self.delay_ms.store(millis, Ordering::SeqCst);
    }

    /// Id the next created book receives.
    pub fn next_id(&self, id: &str) {
        *self.next_id.lock().unwrap() = Some(id.to_string());
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    fn writes_fail(&self) -> bool {
        self.fail_writes.load(Ordering::SeqCst)
    }

    async fn respond(&self) {
        let millis = self.delay_ms.load(Ordering::SeqCst);
        if millis > 0 {
            tokio::time::sleep(Duration::from_millis(millis)).await;
        }
    }
}

#[async_trait]
impl BooksApi for FakeApi {
    async fn search(&self) -> Vec<Book> {
        self.record("search".to_string());
        if self.fail_search {
            Vec::new()
        } else {
            self.books.clone()
        }
    }

    async fn add(&self, book: &NewBook) -> Result<Book, ClientError> {
        self.record("add".to_string());
        self.respond().await;
        if self.writes_fail() {
            return Err(ClientError::Status { status: 500 });
        }
        let id = self
            .next_id
            .lock()
            .unwrap()
            .take()
            .unwrap_or_else(|| "new".to_string());
        Ok(Book::from_new(id, book.clone()))
    }

    async fn update(&self, id: &str, book: &Book) -> Result<Book, ClientError> {
        self.record(format!("update:{id}"));
        self.respond().await;
        if self.writes_fail() {
            return Err(ClientError::Status { status: 500 });
        }
        Ok(book.clone())
    }

    async fn delete(&self, id: &str) -> DeleteStatus {
        self.record(format!("delete:{id}"));
        self.respond().await;
        DeleteStatus {
            success: !self.writes_fail(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    Error(String),
}

#[derive(Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn success(&self, message: &str) {
        self.notices
            .lock()
            .unwrap()
            .push(Notice::Success(message.to_string()));
    }

    fn error(&self, message: &str) {
        self.notices
            .lock()
            .unwrap()
            .push(Notice::Error(message.to_string()));
    }
}
