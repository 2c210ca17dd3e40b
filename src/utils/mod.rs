//! Project-specific utilities live here.

use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio::task::JoinHandle;

/// Cover image to show for a record, falling back to the placeholder when the
/// record has none.
pub fn cover_or_placeholder(image: Option<&str>, placeholder: &str) -> String {
    match image {
        Some(image) if !image.is_empty() => image.to_string(),
        _ => placeholder.to_string(),
    }
}

/// Lock UI state, recovering it if a previous holder panicked.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Wait for a request task, answering `fallback` if it panicked or was aborted.
pub(crate) async fn settle<T>(task: JoinHandle<T>, fallback: T) -> T {
    task.await.unwrap_or_else(|error| {
        tracing::error!(%error, "catalog request task did not finish");
        fallback
    })
}
