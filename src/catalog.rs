//! Application state: one document collection per catalog entity.

use std::sync::Arc;

use liber_store::Collection;

use crate::modules::author::models::Author;
use crate::modules::book::models::Book;
use crate::modules::bookinstance::models::BookInstance;
use crate::modules::genre::models::Genre;

/// The four entity collections. Shared read-only between requests;
/// each request builds its own view from freshly fetched documents.
pub struct Catalog {
    pub authors: Collection<Author>,
    pub books: Collection<Book>,
    pub genres: Collection<Genre>,
    pub instances: Collection<BookInstance>,
}

impl Catalog {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            authors: Collection::new("authors"),
            books: Collection::new("books"),
            genres: Collection::new("genres"),
            instances: Collection::new("bookinstances"),
        })
    }
}
