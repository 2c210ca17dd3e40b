//! Add, edit and view dialogs.
//!
//! Form dialogs validate their draft, then hand the request to a task of its
//! own. That task patches the page's [`BookList`] once the server answers, so
//! a dialog dismissed while its submission is pending still lands the result.

use std::sync::{Arc, Mutex};

use bookshelf_http::BooksApi;
use bookshelf_kernel::{validate_book, Book, BookDraft, BookPatch, NewBook, Notifier};

use super::list::BookList;
use super::render::BookDetail;
use super::state::{DialogState, SubmitOutcome};
use crate::utils::{lock, settle};

const ADD_SUCCESS: &str = "Book added successfully!";
const ADD_FAILURE: &str = "Failed to add book. Please try again.";
const UPDATE_SUCCESS: &str = "Book updated successfully!";
const UPDATE_FAILURE: &str = "Failed to update book. Please try again.";

/// Validate `draft`, moving `state` to `Open { errors }` on failure.
fn check(draft: &BookDraft, state: &mut DialogState) -> Result<NewBook, SubmitOutcome> {
    state.begin_submit();
    validate_book(draft).map_err(|errors| {
        state.reject(errors.clone());
        SubmitOutcome::Invalid(errors)
    })
}

#[derive(Debug)]
struct AddForm {
    draft: BookDraft,
    state: DialogState,
}

pub struct AddBookDialog {
    api: Arc<dyn BooksApi>,
    notifier: Arc<dyn Notifier>,
    books: BookList,
    form: Arc<Mutex<AddForm>>,
}

impl AddBookDialog {
    /// Opened dialog with an empty form.
    pub fn new(api: Arc<dyn BooksApi>, notifier: Arc<dyn Notifier>, books: BookList) -> Self {
        let mut state = DialogState::default();
        state.open();
        Self {
            api,
            notifier,
            books,
            form: Arc::new(Mutex::new(AddForm {
                draft: BookDraft::default(),
                state,
            })),
        }
    }

    pub fn draft(&self) -> BookDraft {
        lock(&self.form).draft.clone()
    }

    pub fn update_draft(&self, edit: impl FnOnce(&mut BookDraft)) {
        edit(&mut lock(&self.form).draft);
    }

    pub fn state(&self) -> DialogState {
        lock(&self.form).state.clone()
    }

    pub fn open(&self) {
        lock(&self.form).state.open();
    }

    /// Close the dialog. The form keeps what was typed and a pending
    /// submission still completes.
    pub fn cancel(&self) {
        lock(&self.form).state.close();
    }

    pub async fn submit(&self) -> SubmitOutcome {
        let book = {
            let mut form = lock(&self.form);
            let AddForm { draft, state } = &mut *form;
            match check(draft, state) {
                Ok(book) => book,
                Err(outcome) => return outcome,
            }
        };

        let api = Arc::clone(&self.api);
        let notifier = Arc::clone(&self.notifier);
        let books = self.books.clone();
        let form = Arc::clone(&self.form);
        let task = tokio::spawn(async move {
            match api.add(&book).await {
                Ok(created) => {
                    books.prepend(created.clone());
                    {
                        let mut form = lock(&form);
                        form.state.close();
                        form.draft = BookDraft::default();
                    }
                    notifier.success(ADD_SUCCESS);
                    SubmitOutcome::Saved(created)
                }
                Err(error) => {
                    tracing::debug!(%error, "add dialog submission failed");
                    lock(&form).state.fail();
                    notifier.error(ADD_FAILURE);
                    SubmitOutcome::Failed
                }
            }
        });
        settle(task, SubmitOutcome::Failed).await
    }
}

#[derive(Debug)]
struct EditForm {
    book: Book,
    draft: BookDraft,
    state: DialogState,
}

pub struct EditBookDialog {
    api: Arc<dyn BooksApi>,
    notifier: Arc<dyn Notifier>,
    books: BookList,
    form: Arc<Mutex<EditForm>>,
}

impl EditBookDialog {
    /// Opened dialog with the form filled from `book`.
    pub fn new(
        api: Arc<dyn BooksApi>,
        notifier: Arc<dyn Notifier>,
        books: BookList,
        book: Book,
    ) -> Self {
        let mut state = DialogState::default();
        state.open();
        Self {
            api,
            notifier,
            books,
            form: Arc::new(Mutex::new(EditForm {
                draft: BookDraft::from_book(&book),
                book,
                state,
            })),
        }
    }

    /// Point the dialog at another record. The form is reset only when the
    /// record actually differs from the one being edited.
    pub fn set_book(&self, book: Book) {
        let mut form = lock(&self.form);
        if form.book != book {
            form.draft = BookDraft::from_book(&book);
            form.book = book;
        }
    }

    pub fn book(&self) -> Book {
        lock(&self.form).book.clone()
    }

    pub fn draft(&self) -> BookDraft {
        lock(&self.form).draft.clone()
    }

    pub fn update_draft(&self, edit: impl FnOnce(&mut BookDraft)) {
        edit(&mut lock(&self.form).draft);
    }

    /// Overwrite only the fields the patch carries.
    pub fn apply(&self, patch: BookPatch) {
        lock(&self.form).draft.apply(patch);
    }

    pub fn state(&self) -> DialogState {
        lock(&self.form).state.clone()
    }

    pub fn open(&self) {
        lock(&self.form).state.open();
    }

    pub fn cancel(&self) {
        lock(&self.form).state.close();
    }

    pub async fn submit(&self) -> SubmitOutcome {
        let (id, merged) = {
            let mut form = lock(&self.form);
            let EditForm { book, draft, state } = &mut *form;
            match check(draft, state) {
                Ok(fields) => (book.id.clone(), book.with_fields(fields)),
                Err(outcome) => return outcome,
            }
        };

        let api = Arc::clone(&self.api);
        let notifier = Arc::clone(&self.notifier);
        let books = self.books.clone();
        let form = Arc::clone(&self.form);
        let task = tokio::spawn(async move {
            match api.update(&id, &merged).await {
                Ok(updated) => {
                    books.replace(updated.clone());
                    {
                        let mut form = lock(&form);
                        form.book = updated.clone();
                        form.state.close();
                    }
                    notifier.success(UPDATE_SUCCESS);
                    SubmitOutcome::Saved(updated)
                }
                Err(error) => {
                    tracing::debug!(book_id = %id, %error, "edit dialog submission failed");
                    lock(&form).state.fail();
                    notifier.error(UPDATE_FAILURE);
                    SubmitOutcome::Failed
                }
            }
        });
        settle(task, SubmitOutcome::Failed).await
    }
}

/// Read-only presentation of one record.
#[derive(Debug, Clone)]
pub struct ViewBookDialog {
    book: Book,
    placeholder_cover: String,
}

impl ViewBookDialog {
    pub fn new(book: Book, placeholder_cover: String) -> Self {
        Self {
            book,
            placeholder_cover,
        }
    }

    pub fn book(&self) -> &Book {
        &self.book
    }

    pub fn detail(&self) -> BookDetail {
        BookDetail::new(&self.book, &self.placeholder_cover)
    }
}
