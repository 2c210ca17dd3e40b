//! Reqwest-backed client for the books collection.
//!
//! Every call is logged on success and on failure. Callers only learn *that* a
//! call failed: `search` degrades to an empty list, `delete` to a flag, and
//! `add`/`update` hand back a [`ClientError`] they are expected to treat as one
//! generic failure.

use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use bookshelf_kernel::settings::ApiSettings;
use bookshelf_kernel::{Book, NewBook};
use reqwest::{Client, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use serde_json::json;

use crate::error::ClientError;

/// Operations the catalog UI performs against the books resource.
#[async_trait]
pub trait BooksApi: Send + Sync {
    /// Fetch the whole collection. Failures are logged and yield an empty list.
    async fn search(&self) -> Vec<Book>;

    /// Create a record; the returned book carries the server-assigned id.
    async fn add(&self, book: &NewBook) -> Result<Book, ClientError>;

    /// Replace the record addressed by `id`.
    async fn update(&self, id: &str, book: &Book) -> Result<Book, ClientError>;

    /// Remove the record addressed by `id`. Failures are logged, not returned.
    async fn delete(&self, id: &str) -> DeleteStatus;
}

/// Result flag of [`BooksApi::delete`].
#[must_use = "a failed delete is only reported through this flag"]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteStatus {
    pub success: bool,
}

/// [`BooksApi`] over HTTP/JSON.
#[derive(Debug, Clone)]
pub struct HttpBooksClient {
    client: Client,
    base_url: Url,
}

impl HttpBooksClient {
    /// Build a client for the collection at `base_url`.
    ///
    /// Without a timeout, requests settle according to the transport defaults.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(base_url: Url, timeout: Option<Duration>) -> Result<Self, ClientError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            base_url,
        })
    }

    pub fn from_settings(settings: &ApiSettings) -> anyhow::Result<Self> {
        let base_url = Url::parse(&settings.base_url)
            .with_context(|| format!("invalid books API URL '{}'", settings.base_url))?;
        let timeout = settings.timeout_ms.map(Duration::from_millis);
        Self::new(base_url, timeout).context("failed to build HTTP client")
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn book_url(&self, id: &str) -> Result<Url, ClientError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ClientError::InvalidUrl {
                base: self.base_url.to_string(),
                id: id.to_string(),
            })?
            .pop_if_empty()
            .push(id);
        Ok(url)
    }
}

#[async_trait]
impl BooksApi for HttpBooksClient {
    async fn search(&self) -> Vec<Book> {
        let request = self.client.get(self.base_url.clone());
        match fetch::<Option<Vec<Book>>>(request).await {
            Ok(books) => {
                let books = books.unwrap_or_default();
                tracing::info!(count = books.len(), "[API] books loaded");
                books
            }
            Err(error) => {
                tracing::error!(%error, "failed to search for books");
                Vec::new()
            }
        }
    }

    async fn add(&self, book: &NewBook) -> Result<Book, ClientError> {
        let request = self.client.post(self.base_url.clone()).json(book);
        match fetch::<Book>(request).await {
            Ok(created) => {
                tracing::info!(book_id = %created.id, "[API] book added successfully");
                Ok(created)
            }
            Err(error) => {
                tracing::error!(%error, "failed to add book");
                Err(error)
            }
        }
    }

    async fn update(&self, id: &str, book: &Book) -> Result<Book, ClientError> {
        let result = match self.book_url(id) {
            Ok(url) => fetch::<Book>(self.client.put(url).json(book)).await,
            Err(error) => Err(error),
        };
        match result {
            Ok(updated) => {
                tracing::info!(book_id = %id, "[API] book updated successfully");
                Ok(updated)
            }
            Err(error) => {
                tracing::error!(book_id = %id, %error, "failed to update book");
                Err(error)
            }
        }
    }

    async fn delete(&self, id: &str) -> DeleteStatus {
        let result = match self.book_url(id) {
            Ok(url) => send(self.client.delete(url)).await.map(drop),
            Err(error) => Err(error),
        };
        match result {
            Ok(()) => {
                tracing::info!(book_id = %id, "[API] book deleted successfully");
                DeleteStatus { success: true }
            }
            Err(error) => {
                tracing::error!(book_id = %id, %error, "failed to delete book");
                DeleteStatus { success: false }
            }
        }
    }
}

async fn fetch<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, ClientError> {
    let response = send(request).await?;
    response.json::<T>().await.map_err(|error| {
        tracing::error!(%error, "fetch error: undecodable response body");
        ClientError::Decode(error.to_string())
    })
}

/// Send a request and treat every non-2xx status as a failure.
async fn send(request: RequestBuilder) -> Result<Response, ClientError> {
    let response = request.send().await.map_err(|error| {
        tracing::error!(%error, "fetch error: request did not complete");
        ClientError::Transport(error)
    })?;

    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    // Best effort: the body only ever feeds the log.
    let body = response.bytes().await.unwrap_or_default();
    let body: serde_json::Value = serde_json::from_slice(&body).unwrap_or_else(|_| json!({}));
    tracing::error!(status = status.as_u16(), %body, "API error body");

    Err(ClientError::Status {
        status: status.as_u16(),
    })
}
