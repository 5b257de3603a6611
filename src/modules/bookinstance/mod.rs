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
use time::Date;
use uuid::Uuid;

use liber_http::{error::AppError, found};
use liber_kernel::{InitCtx, Module};

use crate::catalog::Catalog;
use crate::forms::{FieldError, FormData, Validation};
use crate::modules::book::models::Book;
use models::{BookInstance, Status};

/// BookInstance module: copy tracking. Copies are leaf records, so
/// deletion is unconditional; update remains unimplemented.
pub struct BookInstanceModule {
    catalog: Arc<Catalog>,
}

impl BookInstanceModule {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self { catalog }
    }
}

#[async_trait]
impl Module for BookInstanceModule {
    fn name(&self) -> &'static str {
        "bookinstances"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            "bookinstance module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        Router::new()
            .route("/bookinstances", get(list))
            .route("/bookinstance/create", get(create_get).post(create_post))
            .route("/bookinstance/{id}", get(detail))
            .route(
                "/bookinstance/{id}/delete",
                get(delete_get).post(delete_post),
            )
            .route(
                "/bookinstance/{id}/update",
                get(update_get).post(update_post),
            )
            .with_state(self.catalog.clone())
    }
}

/// Sanitized form echo for the book-instance form.
pub(crate) struct InstanceInput {
    pub book: String,
    pub imprint: String,
    pub status: String,
    pub due_back: String,
}

impl InstanceInput {
    fn empty() -> Self {
        Self {
            book: String::new(),
            imprint: String::new(),
            status: String::new(),
            due_back: String::new(),
        }
    }

    fn from_form(form: &FormData) -> Self {
        Self {
            book: crate::forms::sanitize(form.first("book")),
            imprint: crate::forms::sanitize(form.first("imprint")),
            // Escaped only; the enum is enforced at store-write time.
            status: crate::forms::sanitize(form.first("status")),
            due_back: crate::forms::sanitize(form.first("due_back")),
        }
    }

    fn validate(&self) -> Result<Option<Date>, Vec<FieldError>> {
        let mut v = Validation::new();
        v.require("book", &self.book, "Book must be specified");
        v.require("imprint", &self.imprint, "Imprint must be specified");
        let due_back = v.optional_iso_date("due_back", &self.due_back, "Invalid date");
        v.finish()?;
        Ok(due_back)
    }

    fn book_id(&self) -> anyhow::Result<Uuid> {
        self.book
            .parse()
            .map_err(|_| anyhow!("book reference is not a valid id"))
    }

    /// Empty falls back to the default status; any other unknown value
    /// is an unexpected error at write time.
    fn status(&self) -> anyhow::Result<Status> {
        if self.status.is_empty() {
            return Ok(Status::default());
        }
        Status::parse(&self.status).ok_or_else(|| anyhow!("unknown status '{}'", self.status))
    }
}

async fn list(State(catalog): State<Arc<Catalog>>) -> Result<Html<String>, AppError> {
    let (instances, books) = tokio::join!(
        catalog.instances.all_sorted(|i| i.id),
        catalog.books.all()
    );
    let books: HashMap<Uuid, Book> = books.into_iter().map(|b| (b.id, b)).collect();
    let rows: Vec<(BookInstance, Option<Book>)> = instances
        .into_iter()
        .map(|instance| {
            let book = books.get(&instance.book).cloned();
            (instance, book)
        })
        .collect();
    Ok(views::list_page(&rows))
}

async fn detail(
    State(catalog): State<Arc<Catalog>>,
    Path(id): Path<Uuid>,
) -> Result<Html<String>, AppError> {
    let instance = catalog
        .instances
        .get(id)
        .await
        .ok_or_else(|| AppError::not_found("Book copy not found"))?;
    let book = catalog.books.get(instance.book).await;
    Ok(views::detail_page(&instance, book.as_ref()))
}

async fn create_get(State(catalog): State<Arc<Catalog>>) -> Result<Html<String>, AppError> {
    let books = catalog.books.all_sorted(|b| b.title.clone()).await;
    Ok(views::form_page(
        "Create BookInstance",
        &InstanceInput::empty(),
        &books,
        &[],
    ))
}

async fn create_post(
    State(catalog): State<Arc<Catalog>>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Result<Response, AppError> {
    let form = FormData::new(pairs);
    let input = InstanceInput::from_form(&form);
    match input.validate() {
        Err(errors) => {
            let books = catalog.books.all_sorted(|b| b.title.clone()).await;
            Ok(views::form_page("Create BookInstance", &input, &books, &errors).into_response())
        }
        Ok(due_back) => {
            let book = input.book_id()?;
            let status = input.status()?;
            let instance = BookInstance::new(book, input.imprint.clone(), status, due_back);
            let url = instance.url();
            catalog.instances.insert(instance).await;
            Ok(found(&url))
        }
    }
}

async fn delete_get(
    State(catalog): State<Arc<Catalog>>,
    Path(id): Path<Uuid>,
) -> Result<Html<String>, AppError> {
    let instance = catalog
        .instances
        .get(id)
        .await
        .ok_or_else(|| AppError::not_found("Book copy not found"))?;
    let book = catalog.books.get(instance.book).await;
    Ok(views::delete_page(&instance, book.as_ref()))
}

/// Copies are leaf records; nothing references them, so deletion is
/// unconditional.
async fn delete_post(
    State(catalog): State<Arc<Catalog>>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    catalog.instances.remove(id).await;
    Ok(found("/catalog/bookinstances"))
}

async fn update_get() -> Html<&'static str> {
    Html("NOT IMPLEMENTED: BookInstance update GET")
}

async fn update_post() -> Html<&'static str> {
    Html("NOT IMPLEMENTED: BookInstance update POST")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::author::models::Author;
    use axum::body::to_bytes;
    use axum::http::{header, StatusCode};
    use time::OffsetDateTime;

    fn form(pairs: &[(&str, &str)]) -> Form<Vec<(String, String)>> {
        Form(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    async fn seed_book(catalog: &Arc<Catalog>) -> Uuid {
        let author_id = catalog
            .authors
            .insert(Author::new("Jane".into(), "Austen".into(), None, None))
            .await;
        catalog
            .books
            .insert(Book::new(
                "Emma".into(),
                author_id,
                "A novel".into(),
                "9780141439587".into(),
                vec![],
            ))
            .await
    }

    #[tokio::test]
    async fn create_defaults_status_and_due_back() {
        let catalog = Catalog::new();
        let book_id = seed_book(&catalog).await;

        let response = create_post(
            State(catalog.clone()),
            form(&[
                ("book", &book_id.to_string()),
                ("imprint", "Penguin Classics"),
                ("status", ""),
                ("due_back", ""),
            ]),
        )
        .await
        .unwrap();

        assert_eq!(response.status(), StatusCode::FOUND);
        let stored = catalog
            .instances
            .find_one(|i| i.book == book_id)
            .await
            .unwrap();
        assert_eq!(stored.status, Status::Maintenance);
        assert_eq!(stored.due_back, OffsetDateTime::now_utc().date());
    }

    #[tokio::test]
    async fn create_without_book_rerenders_with_errors() {
        let catalog = Catalog::new();
        seed_book(&catalog).await;

        let response = create_post(
            State(catalog.clone()),
            form(&[("book", ""), ("imprint", ""), ("due_back", "")]),
        )
        .await
        .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_text(response).await;
        assert!(body.contains("Book must be specified"));
        assert!(body.contains("Imprint must be specified"));
        assert_eq!(catalog.instances.count().await, 0);
    }

    #[tokio::test]
    async fn create_accepts_explicit_status_and_due_date() {
        let catalog = Catalog::new();
        let book_id = seed_book(&catalog).await;

        let response = create_post(
            State(catalog.clone()),
            form(&[
                ("book", &book_id.to_string()),
                ("imprint", "Penguin Classics"),
                ("status", "loaned"),
                ("due_back", "2026-09-15"),
            ]),
        )
        .await
        .unwrap();

        assert_eq!(response.status(), StatusCode::FOUND);
        let stored = catalog
            .instances
            .find_one(|i| i.book == book_id)
            .await
            .unwrap();
        assert_eq!(stored.status, Status::Loaned);
        assert_eq!(
            stored.due_back,
            Date::from_calendar_date(2026, time::Month::September, 15).unwrap()
        );
    }

    #[tokio::test]
    async fn list_resolves_book_titles_in_one_pass() {
        let catalog = Catalog::new();
        let book_id = seed_book(&catalog).await;
        catalog
            .instances
            .insert(BookInstance::new(
                book_id,
                "Penguin Classics".into(),
                Status::Available,
                None,
            ))
            .await;
        // Dangling book reference renders as unknown.
        catalog
            .instances
            .insert(BookInstance::new(
                Uuid::now_v7(),
                "Folio Society".into(),
                Status::Loaned,
                None,
            ))
            .await;

        let body = list(State(catalog)).await.unwrap().0;
        assert!(body.contains("Emma"));
        assert!(body.contains("Folio Society"));
        assert!(body.contains("unknown book"));
    }

    #[tokio::test]
    async fn detail_of_unknown_copy_is_not_found() {
        let catalog = Catalog::new();
        let response = detail(State(catalog), Path(Uuid::now_v7()))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn delete_is_unconditional_and_redirects_to_list() {
        let catalog = Catalog::new();
        let book_id = seed_book(&catalog).await;
        let instance_id = catalog
            .instances
            .insert(BookInstance::new(
                book_id,
                "Penguin Classics".into(),
                Status::Loaned,
                None,
            ))
            .await;

        let response = delete_post(State(catalog.clone()), Path(instance_id))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(
            response.headers()[header::LOCATION].to_str().unwrap(),
            "/catalog/bookinstances"
        );
        assert_eq!(catalog.instances.count().await, 0);
    }

    #[tokio::test]
    async fn update_routes_are_placeholders() {
        let get_body = update_get().await;
        assert!(get_body.0.contains("NOT IMPLEMENTED"));
        let post_body = update_post().await;
        assert!(post_body.0.contains("NOT IMPLEMENTED"));
    }
}
