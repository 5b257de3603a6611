pub mod models;
mod views;

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::anyhow;
use async_trait::async_trait;
use axum::{
    extract::{Path, State},
    response::{Html, IntoResponse, Response},
    routing::get,
    Form, Router,
};
use uuid::Uuid;

use liber_http::{error::AppError, found};
use liber_kernel::{InitCtx, Module};

use crate::catalog::Catalog;
use crate::forms::{normalize_id_set, FieldError, FormData, Validation};
use crate::modules::author::models::Author;
use crate::modules::bookinstance::models::Status;
use crate::modules::genre::models::Genre;
use models::Book;
use views::HomeCounts;

/// Book module: the catalog home page plus book CRUD with genre-set
/// normalization and a copies-checked delete.
pub struct BookModule {
    catalog: Arc<Catalog>,
}

impl BookModule {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self { catalog }
    }
}

#[async_trait]
impl Module for BookModule {
    fn name(&self) -> &'static str {
        "books"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            "book module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        Router::new()
            .route("/", get(index))
            .route("/books", get(list))
            .route("/book/create", get(create_get).post(create_post))
            .route("/book/{id}", get(detail))
            .route("/book/{id}/delete", get(delete_get).post(delete_post))
            .route("/book/{id}/update", get(update_get).post(update_post))
            .with_state(self.catalog.clone())
    }
}

/// Sanitized form echo for the book form. `genres` is already
/// normalized to an id set before validation runs.
pub(crate) struct BookInput {
    pub title: String,
    pub author: String,
    pub summary: String,
    pub isbn: String,
    pub genres: Vec<Uuid>,
}

impl BookInput {
    fn empty() -> Self {
        Self {
            title: String::new(),
            author: String::new(),
            summary: String::new(),
            isbn: String::new(),
            genres: Vec::new(),
        }
    }

    fn from_form(form: &FormData) -> Self {
        Self {
            title: crate::forms::sanitize(form.first("title")),
            author: crate::forms::sanitize(form.first("author")),
            summary: crate::forms::sanitize(form.first("summary")),
            isbn: crate::forms::sanitize(form.first("isbn")),
            genres: normalize_id_set(&form.all("genre")),
        }
    }

    fn from_book(book: &Book) -> Self {
        Self {
            title: book.title.clone(),
            author: book.author.to_string(),
            summary: book.summary.clone(),
            isbn: book.isbn.clone(),
            genres: book.genre.clone(),
        }
    }

    fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut v = Validation::new();
        v.require("title", &self.title, "Title must not be empty");
        v.require("author", &self.author, "Author must not be empty");
        v.require("summary", &self.summary, "Summary must not be empty");
        v.require("isbn", &self.isbn, "ISBN must not be empty");
        v.finish()
    }

    /// The author reference comes from our own select options; a value
    /// that is not an id is tampering and surfaces as an unexpected
    /// error.
    fn author_id(&self) -> anyhow::Result<Uuid> {
        self.author
            .parse()
            .map_err(|_| anyhow!("author reference is not a valid id"))
    }
}

async fn selector_options(catalog: &Catalog) -> (Vec<Author>, Vec<Genre>) {
    tokio::join!(
        catalog.authors.all_sorted(|a| a.family_name.clone()),
        catalog.genres.all_sorted(|g| g.name.clone())
    )
}

async fn index(State(catalog): State<Arc<Catalog>>) -> Result<Html<String>, AppError> {
    let (books, instances, instances_available, genres, authors) = tokio::join!(
        catalog.books.count(),
        catalog.instances.count(),
        catalog
            .instances
            .count_where(|i| i.status == Status::Available),
        catalog.genres.count(),
        catalog.authors.count(),
    );
    Ok(views::index_page(&HomeCounts {
        books,
        instances,
        instances_available,
        authors,
        genres,
    }))
}

async fn list(State(catalog): State<Arc<Catalog>>) -> Result<Html<String>, AppError> {
    let (books, authors) = tokio::join!(
        catalog.books.all_sorted(|b| b.title.clone()),
        catalog.authors.all()
    );
    let authors: HashMap<Uuid, Author> = authors.into_iter().map(|a| (a.id, a)).collect();
    let rows: Vec<(Book, Option<Author>)> = books
        .into_iter()
        .map(|book| {
            let author = authors.get(&book.author).cloned();
            (book, author)
        })
        .collect();
    Ok(views::list_page(&rows))
}

async fn detail(
    State(catalog): State<Arc<Catalog>>,
    Path(id): Path<Uuid>,
) -> Result<Html<String>, AppError> {
    let (book, instances) = tokio::join!(
        catalog.books.get(id),
        catalog.instances.find_sorted(|i| i.book == id, |i| i.id)
    );
    let book = book.ok_or_else(|| AppError::not_found("Book not found"))?;

    let author = catalog.authors.get(book.author).await;
    let mut genres = Vec::with_capacity(book.genre.len());
    for genre_id in &book.genre {
        if let Some(genre) = catalog.genres.get(*genre_id).await {
            genres.push(genre);
        }
    }
    Ok(views::detail_page(&book, author.as_ref(), &genres, &instances))
}

async fn create_get(State(catalog): State<Arc<Catalog>>) -> Result<Html<String>, AppError> {
    let (authors, genres) = selector_options(&catalog).await;
    Ok(views::form_page(
        "Create Book",
        &BookInput::empty(),
        &authors,
        &genres,
        &[],
    ))
}

async fn create_post(
    State(catalog): State<Arc<Catalog>>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Result<Response, AppError> {
    let form = FormData::new(pairs);
    let input = BookInput::from_form(&form);
    if let Err(errors) = input.validate() {
        let (authors, genres) = selector_options(&catalog).await;
        return Ok(views::form_page("Create Book", &input, &authors, &genres, &errors)
            .into_response());
    }

    let author = input.author_id()?;
    let book = Book::new(
        input.title,
        author,
        input.summary,
        input.isbn,
        input.genres,
    );
    let url = book.url();
    catalog.books.insert(book).await;
    Ok(found(&url))
}

async fn delete_get(
    State(catalog): State<Arc<Catalog>>,
    Path(id): Path<Uuid>,
) -> Result<Html<String>, AppError> {
    let (book, instances) = tokio::join!(
        catalog.books.get(id),
        catalog.instances.find(|i| i.book == id)
    );
    let book = book.ok_or_else(|| AppError::not_found("Book not found"))?;
    Ok(views::delete_page(&book, &instances))
}

async fn delete_post(
    State(catalog): State<Arc<Catalog>>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let (book, instances) = tokio::join!(
        catalog.books.get(id),
        catalog.instances.find(|i| i.book == id)
    );
    let book = book.ok_or_else(|| AppError::not_found("Book not found"))?;

    // Referential conflict: the delete is refused while copies still
    // reference this book.
    if !instances.is_empty() {
        return Ok(views::delete_page(&book, &instances).into_response());
    }

    catalog.books.remove(id).await;
    Ok(found("/catalog/books"))
}

async fn update_get(
    State(catalog): State<Arc<Catalog>>,
    Path(id): Path<Uuid>,
) -> Result<Html<String>, AppError> {
    let (book, authors, genres) = tokio::join!(
        catalog.books.get(id),
        catalog.authors.all_sorted(|a| a.family_name.clone()),
        catalog.genres.all_sorted(|g| g.name.clone())
    );
    let book = book.ok_or_else(|| AppError::not_found("Book not found"))?;
    Ok(views::form_page(
        "Update Book",
        &BookInput::from_book(&book),
        &authors,
        &genres,
        &[],
    ))
}

async fn update_post(
    State(catalog): State<Arc<Catalog>>,
    Path(id): Path<Uuid>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Result<Response, AppError> {
    let form = FormData::new(pairs);
    let input = BookInput::from_form(&form);
    if let Err(errors) = input.validate() {
        let (authors, genres) = selector_options(&catalog).await;
        return Ok(views::form_page("Update Book", &input, &authors, &genres, &errors)
            .into_response());
    }

    let author = input.author_id()?;
    let updated = catalog
        .books
        .update(id, |book| {
            book.title = input.title;
            book.author = author;
            book.summary = input.summary;
            book.isbn = input.isbn;
            book.genre = input.genres;
        })
        .await
        .ok_or_else(|| AppError::not_found("Book not found"))?;
    Ok(found(&updated.url()))
}
