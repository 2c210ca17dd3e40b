//! The catalog list view.
//!
//! Owns the session's cached copy of the listing. The server remains the source
//! of truth; the list is only patched after the server has answered. Each
//! request runs in its own task, so the page stays usable while it is pending
//! and its result lands even if the caller stops waiting.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc, Mutex,
};

use bookshelf_http::BooksApi;
use bookshelf_kernel::{Book, Confirm, Notifier};

use super::dialogs::{AddBookDialog, EditBookDialog, ViewBookDialog};
use super::list::BookList;
use super::render::{BookRow, TableView};
use super::state::{DeleteOutcome, LoadState};
use crate::utils::{lock, settle};

pub const DELETE_PROMPT: &str = "Are you sure? This action cannot be undone. \
     This will permanently delete the book from the current view.";
const DELETE_SUCCESS: &str = "Book deleted successfully!";
const DELETE_FAILURE: &str = "Failed to delete book. Please try again.";
const DEFAULT_PLACEHOLDER_COVER: &str = "/placeholder.svg";

pub struct CatalogPage {
    api: Arc<dyn BooksApi>,
    notifier: Arc<dyn Notifier>,
    placeholder_cover: String,
    books: BookList,
    load_state: Arc<Mutex<LoadState>>,
    mounted: AtomicBool,
}

impl CatalogPage {
    pub fn new(api: Arc<dyn BooksApi>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            api,
            notifier,
            placeholder_cover: DEFAULT_PLACEHOLDER_COVER.to_string(),
            books: BookList::default(),
            load_state: Arc::default(),
            mounted: AtomicBool::new(false),
        }
    }

    pub fn with_placeholder_cover(mut self, placeholder_cover: impl Into<String>) -> Self {
        self.placeholder_cover = placeholder_cover.into();
        self
    }

    /// Load the listing. Only the first call reaches the server.
    pub async fn mount(&self) {
        if self.mounted.swap(true, Ordering::SeqCst) {
            return;
        }

        let api = Arc::clone(&self.api);
        let books = self.books.clone();
        let load_state = Arc::clone(&self.load_state);
        let task = tokio::spawn(async move {
            let listing = api.search().await;
            tracing::debug!(count = listing.len(), "catalog page loaded");
            books.replace_all(listing);
            *lock(&load_state) = LoadState::Loaded;
        });
        settle(task, ()).await;
    }

    pub fn load_state(&self) -> LoadState {
        *lock(&self.load_state)
    }

    /// Current copy of the listing.
    pub fn books(&self) -> Vec<Book> {
        self.books.snapshot()
    }

    pub fn find(&self, id: &str) -> Option<Book> {
        self.books.find(id)
    }

    pub fn table(&self) -> TableView {
        match self.load_state() {
            LoadState::Loading => TableView::Loading,
            LoadState::Loaded => {
                let books = self.books.snapshot();
                if books.is_empty() {
                    TableView::Empty
                } else {
                    TableView::Rows(
                        books
                            .iter()
                            .map(|book| BookRow::new(book, &self.placeholder_cover))
                            .collect(),
                    )
                }
            }
        }
    }

    /// Ask for confirmation, then delete. The row disappears only once the
    /// server reports success.
    pub async fn delete(&self, id: &str, confirm: &dyn Confirm) -> DeleteOutcome {
        if !confirm.confirm(DELETE_PROMPT).await {
            tracing::debug!(book_id = %id, "delete cancelled");
            return DeleteOutcome::Cancelled;
        }

        let api = Arc::clone(&self.api);
        let notifier = Arc::clone(&self.notifier);
        let books = self.books.clone();
        let id = id.to_string();
        let task = tokio::spawn(async move {
            if api.delete(&id).await.success {
                books.remove(&id);
                notifier.success(DELETE_SUCCESS);
                DeleteOutcome::Deleted
            } else {
                notifier.error(DELETE_FAILURE);
                DeleteOutcome::Failed
            }
        });
        settle(task, DeleteOutcome::Failed).await
    }

    pub fn add_dialog(&self) -> AddBookDialog {
        AddBookDialog::new(
            Arc::clone(&self.api),
            Arc::clone(&self.notifier),
            self.books.clone(),
        )
    }

    /// Edit dialog for a listed record.
    pub fn edit_dialog(&self, id: &str) -> Option<EditBookDialog> {
        let book = self.find(id)?;
        Some(EditBookDialog::new(
            Arc::clone(&self.api),
            Arc::clone(&self.notifier),
            self.books.clone(),
            book,
        ))
    }

    pub fn view_dialog(&self, id: &str) -> Option<ViewBookDialog> {
        let book = self.find(id)?;
        Some(ViewBookDialog::new(book, self.placeholder_cover.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::books::render::EMPTY_LIST_MESSAGE;
    use crate::test_support::{book, FakeApi, Notice, RecordingNotifier};
    use bookshelf_kernel::AutoConfirm;
    use std::time::Duration;

    fn page(api: &Arc<FakeApi>, notifier: &Arc<RecordingNotifier>) -> CatalogPage {
        CatalogPage::new(api.clone(), notifier.clone())
    }

    #[tokio::test]
    async fn starts_loading_then_shows_the_listing() {
        let api = Arc::new(FakeApi::with_books(vec![book("1"), book("2")]));
        let notifier = Arc::new(RecordingNotifier::default());
        let page = page(&api, &notifier);

        assert_eq!(page.table(), TableView::Loading);
        page.mount().await;

        assert_eq!(page.load_state(), LoadState::Loaded);
        let TableView::Rows(rows) = page.table() else {
            panic!("expected rows");
        };
        assert_eq!(rows.len(), 2);
    }

    #[tokio::test]
    async fn mount_searches_exactly_once() {
        let api = Arc::new(FakeApi::with_books(vec![book("1")]));
        let notifier = Arc::new(RecordingNotifier::default());
        let page = page(&api, &notifier);

        page.mount().await;
        page.mount().await;
        assert_eq!(api.calls(), ["search"]);
    }

    #[tokio::test]
    async fn failing_search_renders_an_empty_table() {
        let api = Arc::new(FakeApi::failing());
        let notifier = Arc::new(RecordingNotifier::default());
        let page = page(&api, &notifier);

        page.mount().await;
        assert!(page.books().is_empty());
        assert_eq!(page.table(), TableView::Empty);
        assert!(notifier.notices().is_empty());
        assert!(!EMPTY_LIST_MESSAGE.is_empty());
    }

    #[tokio::test]
    async fn confirmed_delete_removes_the_row_after_success() {
        let api = Arc::new(FakeApi::with_books(vec![book("1"), book("2")]));
        let notifier = Arc::new(RecordingNotifier::default());
        let page = page(&api, &notifier);
        page.mount().await;

        let outcome = page.delete("1", &AutoConfirm(true)).await;

        assert_eq!(outcome, DeleteOutcome::Deleted);
        assert!(page.find("1").is_none());
        assert_eq!(
            notifier.notices(),
            [Notice::Success("Book deleted successfully!".to_string())]
        );
    }

    #[tokio::test]
    async fn failed_delete_keeps_the_row_and_notifies() {
        let api = Arc::new(FakeApi::with_books(vec![book("1")]));
        api.fail_writes();
        let notifier = Arc::new(RecordingNotifier::default());
        let page = page(&api, &notifier);
        page.mount().await;

        let outcome = page.delete("1", &AutoConfirm(true)).await;

        assert_eq!(outcome, DeleteOutcome::Failed);
        assert!(page.find("1").is_some());
        assert_eq!(
            notifier.notices(),
            [Notice::Error(
                "Failed to delete book. Please try again.".to_string()
            )]
        );
    }

    #[tokio::test]
    async fn declined_delete_never_calls_the_server() {
        let api = Arc::new(FakeApi::with_books(vec![book("1")]));
        let notifier = Arc::new(RecordingNotifier::default());
        let page = page(&api, &notifier);
        page.mount().await;

        let outcome = page.delete("1", &AutoConfirm(false)).await;

        assert_eq!(outcome, DeleteOutcome::Cancelled);
        assert_eq!(api.calls(), ["search"]);
        assert!(page.find("1").is_some());
    }

    #[tokio::test]
    async fn abandoned_delete_still_removes_the_row() {
        let api = Arc::new(FakeApi::with_books(vec![book("1"), book("2")]));
        api.delay(Duration::from_millis(100));
        let notifier = Arc::new(RecordingNotifier::default());
        let page = page(&api, &notifier);
        page.mount().await;

        let waited = tokio::time::timeout(
            Duration::from_millis(10),
            page.delete("1", &AutoConfirm(true)),
        )
        .await;
        assert!(waited.is_err());
        assert!(page.find("1").is_some());

        tokio::time::sleep(Duration::from_millis(300)).await;
        assert!(page.find("1").is_none());
        assert_eq!(
            notifier.notices(),
            [Notice::Success("Book deleted successfully!".to_string())]
        );
    }

    #[tokio::test]
    async fn page_stays_usable_while_a_delete_is_pending() {
        let api = Arc::new(FakeApi::with_books(vec![book("1"), book("2")]));
        api.delay(Duration::from_millis(100));
        let notifier = Arc::new(RecordingNotifier::default());
        let page = page(&api, &notifier);
        page.mount().await;

        let (outcome, ()) = tokio::join!(page.delete("1", &AutoConfirm(true)), async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            let TableView::Rows(rows) = page.table() else {
                panic!("expected rows while the delete is pending");
            };
            assert_eq!(rows.len(), 2);
            assert!(page.view_dialog("2").is_some());
            assert!(page.edit_dialog("2").is_some());
        });

        assert_eq!(outcome, DeleteOutcome::Deleted);
        assert_eq!(page.books(), [book("2")]);
    }

    #[tokio::test]
    async fn dialogs_are_only_offered_for_listed_books() {
        let api = Arc::new(FakeApi::with_books(vec![book("1")]));
        let notifier = Arc::new(RecordingNotifier::default());
        let page = page(&api, &notifier);
        page.mount().await;

        assert!(page.edit_dialog("1").is_some());
        assert!(page.view_dialog("1").is_some());
        assert!(page.edit_dialog("2").is_none());
        assert!(page.view_dialog("2").is_none());
    }
}
