use bookshelf_kernel::{Book, NewBook};
use utoipa::OpenApi;

use crate::backend;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Bookshelf API",
        version = "1.0.0",
        description = "Book catalog records over HTTP/JSON"
    ),
    paths(
        backend::list_books,
        backend::create_book,
        backend::update_book,
        backend::delete_book
    ),
    components(schemas(Book, NewBook)),
    tags((name = "Books", description = "Book catalog records"))
)]
pub struct ApiDoc;
