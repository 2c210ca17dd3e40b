//! HTTP plumbing for bookshelf: the books API client and the in-memory
//! development backend it can talk to.

use anyhow::Context;
use axum::{extract::Request, http::HeaderValue, routing::get, Router};
use tokio::net::TcpListener;
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

use bookshelf_kernel::settings::ServerSettings;

pub mod backend;
pub mod client;
pub mod error;
pub mod openapi;
pub mod router;

pub use backend::BookStore;
pub use client::{BooksApi, DeleteStatus, HttpBooksClient};
pub use error::{AppError, ClientError};

use router::RouterBuilder;

/// Bind and run the development backend until the process stops
pub async fn start_server(settings: &ServerSettings, store: BookStore) -> anyhow::Result<()> {
    let address = format!("{}:{}", settings.host, settings.port);
    tracing::info!("starting development backend on {address}");

    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind to {address}"))?;

    tracing::info!("books API listening on http://{address}/books");

    serve(listener, build_router(settings, store)).await
}

/// Serve `router` on an already bound listener
pub async fn serve(listener: TcpListener, router: Router) -> anyhow::Result<()> {
    axum::serve(listener, router)
        .await
        .context("HTTP server failed")
}

/// Build the backend router with books routes and global middleware
pub fn build_router(settings: &ServerSettings, store: BookStore) -> Router {
    RouterBuilder::new()
        .route("/healthz", get(health_check))
        .merge(backend::router(store))
        .with_openapi()
        .with_tracing()
        .with_cors()
        .with_request_id()
        .with_timeout(settings.request_timeout_ms)
        .build()
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "ok"
}

/// Request ID generator producing time-ordered UUIDs
#[derive(Clone, Copy)]
pub(crate) struct MakeRequestUuidV7;

impl MakeRequestId for MakeRequestUuidV7 {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        let request_id = Uuid::now_v7().to_string().parse::<HeaderValue>().ok()?;
        Some(RequestId::new(request_id))
    }
}
