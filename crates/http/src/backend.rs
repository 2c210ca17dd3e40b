//! In-memory development backend for the books collection.
//!
//! Records live for the lifetime of the process. Payloads go through the same
//! schema check the dialogs use.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use bookshelf_kernel::{validate_book, Book, BookDraft, NewBook};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::AppError;

/// Shared, insertion-ordered book records.
#[derive(Debug, Clone, Default)]
pub struct BookStore {
    books: Arc<RwLock<Vec<Book>>>,
}

impl BookStore {
    pub async fn list(&self) -> Vec<Book> {
        self.books.read().await.clone()
    }

    /// Append a record under a fresh UUIDv7 id.
    pub async fn insert(&self, book: NewBook) -> Book {
        let book = Book::from_new(Uuid::now_v7().to_string(), book);
        self.books.write().await.push(book.clone());
        book
    }

    /// Replace the fields of record `id`; `None` when it does not exist.
    pub async fn replace(&self, id: &str, fields: NewBook) -> Option<Book> {
        let mut books = self.books.write().await;
        let slot = books.iter_mut().find(|book| book.id == id)?;
        *slot = Book::from_new(id, fields);
        Some(slot.clone())
    }

    /// Remove record `id`; `false` when it does not exist.
    pub async fn remove(&self, id: &str) -> bool {
        let mut books = self.books.write().await;
        let before = books.len();
        books.retain(|book| book.id != id);
        books.len() != before
    }
}

/// Routes for `/books` and `/books/{id}`.
pub fn router(store: BookStore) -> Router {
    Router::new()
        .route("/books", get(list_books).post(create_book))
        .route("/books/{id}", put(update_book).delete(delete_book))
        .with_state(store)
}

fn checked(payload: NewBook) -> Result<NewBook, AppError> {
    validate_book(&BookDraft::from(payload)).map_err(|errors| AppError::invalid_book(&errors))
}

/// List every book
#[utoipa::path(
    get,
    path = "/books",
    tag = "Books",
    responses((status = 200, description = "All books in insertion order", body = [Book]))
)]
pub(crate) async fn list_books(State(store): State<BookStore>) -> Json<Vec<Book>> {
    Json(store.list().await)
}

/// Create a book
#[utoipa::path(
    post,
    path = "/books",
    tag = "Books",
    request_body = NewBook,
    responses(
        (status = 201, description = "Created book with its assigned id", body = Book),
        (status = 400, description = "Malformed JSON body"),
        (status = 422, description = "Book failed validation")
    )
)]
pub(crate) async fn create_book(
    State(store): State<BookStore>,
    payload: Result<Json<NewBook>, JsonRejection>,
) -> Result<(StatusCode, Json<Book>), AppError> {
    let Json(payload) = payload?;
    let book = store.insert(checked(payload)?).await;
    tracing::info!(book_id = %book.id, "book created");
    Ok((StatusCode::CREATED, Json(book)))
}

/// Replace a book
///
/// The id in the path wins over any id in the body.
#[utoipa::path(
    put,
    path = "/books/{id}",
    tag = "Books",
    params(("id" = String, Path, description = "Book id")),
    request_body = Book,
    responses(
        (status = 200, description = "Updated book", body = Book),
        (status = 404, description = "No book with this id"),
        (status = 422, description = "Book failed validation")
    )
)]
pub(crate) async fn update_book(
    State(store): State<BookStore>,
    Path(id): Path<String>,
    payload: Result<Json<NewBook>, JsonRejection>,
) -> Result<Json<Book>, AppError> {
    let Json(payload) = payload?;
    let fields = checked(payload)?;
    let book = store
        .replace(&id, fields)
        .await
        .ok_or_else(|| AppError::not_found(format!("book '{id}' not found")))?;
    tracing::info!(book_id = %book.id, "book updated");
    Ok(Json(book))
}

/// Delete a book
#[utoipa::path(
    delete,
    path = "/books/{id}",
    tag = "Books",
    params(("id" = String, Path, description = "Book id")),
    responses(
        (status = 204, description = "Book deleted"),
        (status = 404, description = "No book with this id")
    )
)]
pub(crate) async fn delete_book(
    State(store): State<BookStore>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    if !store.remove(&id).await {
        return Err(AppError::not_found(format!("book '{id}' not found")));
    }
    tracing::info!(book_id = %id, "book deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{header, Method, Request},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn dune() -> NewBook {
        NewBook {
            title: "Dune".to_string(),
            author: "Frank Herbert".to_string(),
            publication_year: 1965,
            isbn: "9780441172719".to_string(),
            image: None,
        }
    }

    fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn create_assigns_an_id_and_returns_201() {
        let store = BookStore::default();
        let response = router(store.clone())
            .oneshot(json_request(
                Method::POST,
                "/books",
                json!({
                    "title": "Dune",
                    "author": "Frank Herbert",
                    "publicationYear": 1965,
                    "isbn": "9780441172719"
                }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let body = body_json(response).await;
        let id = body["id"].as_str().unwrap();
        assert!(Uuid::parse_str(id).is_ok());
        assert_eq!(store.list().await.len(), 1);
    }

    #[tokio::test]
    async fn create_rejects_invalid_books_with_field_details() {
        let response = router(BookStore::default())
            .oneshot(json_request(
                Method::POST,
                "/books",
                json!({
                    "title": "",
                    "author": "Frank Herbert",
                    "publicationYear": 1965,
                    "isbn": "9780441172719"
                }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = body_json(response).await;
        assert_eq!(
            body["error"]["details"],
            json!([{"field": "title", "error": "Title is required."}])
        );
    }

    #[tokio::test]
    async fn malformed_json_is_a_bad_request() {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/books")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();

        let response = router(BookStore::default()).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"]["code"], "bad_request");
    }

    #[tokio::test]
    async fn update_uses_the_path_id() {
        let store = BookStore::default();
        let book = store.insert(dune()).await;

        let mut body = serde_json::to_value(&book).unwrap();
        body["id"] = json!("some-other-id");
        body["title"] = json!("Dune Messiah");

        let response = router(store.clone())
            .oneshot(json_request(
                Method::PUT,
                &format!("/books/{}", book.id),
                body,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let stored = store.list().await;
        assert_eq!(stored[0].id, book.id);
        assert_eq!(stored[0].title, "Dune Messiah");
    }

    #[tokio::test]
    async fn update_and_delete_of_unknown_ids_are_404() {
        let app = router(BookStore::default());

        let response = app
            .clone()
            .oneshot(json_request(
                Method::PUT,
                "/books/nope",
                serde_json::to_value(Book::from_new("nope", dune())).unwrap(),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = app
            .oneshot(
                Request::builder()
                    .method(Method::DELETE)
                    .uri("/books/nope")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn delete_removes_the_record() {
        let store = BookStore::default();
        let keep = store.insert(dune()).await;
        let gone = store.insert(dune()).await;

        let response = router(store.clone())
            .oneshot(
                Request::builder()
                    .method(Method::DELETE)
                    .uri(format!("/books/{}", gone.id))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert_eq!(store.list().await, vec![keep]);
    }
}
