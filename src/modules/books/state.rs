//! Explicit UI state values for the catalog page and its dialogs.

use bookshelf_kernel::{Book, FieldErrors};

/// Whether the initial listing has arrived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    Loading,
    Loaded,
}

/// Lifecycle of a form dialog.
///
/// `Closed -> Open -> Submitting -> Closed`, or back to `Open` with the
/// validation messages (or none, after a failed call) when submission fails.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DialogState {
    #[default]
    Closed,
    Open {
        errors: FieldErrors,
    },
    Submitting,
}

impl DialogState {
    /// Open with a clean slate. Re-opening an open dialog keeps its messages.
    pub fn open(&mut self) {
        if *self == Self::Closed {
            *self = Self::Open {
                errors: FieldErrors::default(),
            };
        }
    }

    pub fn begin_submit(&mut self) {
        *self = Self::Submitting;
    }

    /// Stay open, showing the messages next to their fields.
    pub fn reject(&mut self, errors: FieldErrors) {
        *self = Self::Open { errors };
    }

    /// Stay open after a failed call; the failure itself is a notification.
    /// A dialog dismissed while the call was pending stays closed.
    pub fn fail(&mut self) {
        if self.is_submitting() {
            *self = Self::Open {
                errors: FieldErrors::default(),
            };
        }
    }

    pub fn close(&mut self) {
        *self = Self::Closed;
    }

    pub fn is_open(&self) -> bool {
        !matches!(self, Self::Closed)
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self, Self::Submitting)
    }

    /// Messages currently shown in the form.
    pub fn errors(&self) -> Option<&FieldErrors> {
        match self {
            Self::Open { errors } if !errors.is_empty() => Some(errors),
            _ => None,
        }
    }
}

/// Result of submitting an add or edit dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The draft failed validation; no request was sent.
    Invalid(FieldErrors),
    /// The request failed; a notification was shown.
    Failed,
    /// The server accepted the record and the page's list was updated.
    Saved(Book),
}

/// Result of a delete request from the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The user declined; nothing was sent.
    Cancelled,
    Deleted,
    Failed,
}
