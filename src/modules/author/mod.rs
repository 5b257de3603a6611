pub mod models;
mod views;

use std::sync::Arc;

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
use models::Author;

/// Author module: list/detail plus validated create/update and a
/// dependents-checked delete.
pub struct AuthorModule {
    catalog: Arc<Catalog>,
}

impl AuthorModule {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self { catalog }
    }
}

#[async_trait]
impl Module for AuthorModule {
    fn name(&self) -> &'static str {
        "authors"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            "author module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        Router::new()
            .route("/authors", get(list))
            .route("/author/create", get(create_get).post(create_post))
            .route("/author/{id}", get(detail))
            .route("/author/{id}/delete", get(delete_get).post(delete_post))
            .route("/author/{id}/update", get(update_get).post(update_post))
            .with_state(self.catalog.clone())
    }
}

/// Sanitized form echo for the author form.
pub(crate) struct AuthorInput {
    pub first_name: String,
    pub family_name: String,
    pub date_of_birth: String,
    pub date_of_death: String,
}

/// Validated author fields ready to persist.
struct AuthorFields {
    first_name: String,
    family_name: String,
    date_of_birth: Option<Date>,
    date_of_death: Option<Date>,
}

impl AuthorInput {
    fn empty() -> Self {
        Self {
            first_name: String::new(),
            family_name: String::new(),
            date_of_birth: String::new(),
            date_of_death: String::new(),
        }
    }

    fn from_form(form: &FormData) -> Self {
        Self {
            first_name: crate::forms::sanitize(form.first("first_name")),
            family_name: crate::forms::sanitize(form.first("family_name")),
            date_of_birth: crate::forms::sanitize(form.first("date_of_birth")),
            date_of_death: crate::forms::sanitize(form.first("date_of_death")),
        }
    }

    fn from_author(author: &Author) -> Self {
        Self {
            first_name: author.first_name.clone(),
            family_name: author.family_name.clone(),
            date_of_birth: crate::forms::iso_date_string(author.date_of_birth),
            date_of_death: crate::forms::iso_date_string(author.date_of_death),
        }
    }

    fn validate(&self) -> Result<AuthorFields, Vec<FieldError>> {
        let mut v = Validation::new();
        v.require(
            "first_name",
            &self.first_name,
            "First name must be specified",
        );
        v.max_length(
            "first_name",
            &self.first_name,
            100,
            "First name must not exceed 100 characters",
        );
        v.alphanumeric(
            "first_name",
            &self.first_name,
            "First name has non-alphanumeric characters",
        );
        v.require(
            "family_name",
            &self.family_name,
            "Family name must be specified",
        );
        v.max_length(
            "family_name",
            &self.family_name,
            100,
            "Family name must not exceed 100 characters",
        );
        v.alphanumeric(
            "family_name",
            &self.family_name,
            "Family name has non-alphanumeric characters",
        );
        let date_of_birth =
            v.optional_iso_date("date_of_birth", &self.date_of_birth, "Invalid date of birth");
        let date_of_death =
            v.optional_iso_date("date_of_death", &self.date_of_death, "Invalid date of death");

        v.finish()?;
        Ok(AuthorFields {
            first_name: self.first_name.clone(),
            family_name: self.family_name.clone(),
            date_of_birth,
            date_of_death,
        })
    }
}

async fn list(State(catalog): State<Arc<Catalog>>) -> Result<Html<String>, AppError> {
    let authors = catalog
        .authors
        .all_sorted(|a| a.family_name.clone())
        .await;
    Ok(views::list_page(&authors))
}

async fn detail(
    State(catalog): State<Arc<Catalog>>,
    Path(id): Path<Uuid>,
) -> Result<Html<String>, AppError> {
    let (author, books) = tokio::join!(
        catalog.authors.get(id),
        catalog.books.find(|b| b.author == id)
    );
    let author = author.ok_or_else(|| AppError::not_found("Author not found"))?;
    Ok(views::detail_page(&author, &books))
}

async fn create_get() -> Html<String> {
    views::form_page("Create Author", &AuthorInput::empty(), &[])
}

async fn create_post(
    State(catalog): State<Arc<Catalog>>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Result<Response, AppError> {
    let form = FormData::new(pairs);
    let input = AuthorInput::from_form(&form);
    match input.validate() {
        Err(errors) => Ok(views::form_page("Create Author", &input, &errors).into_response()),
        Ok(fields) => {
            let author = Author::new(
                fields.first_name,
                fields.family_name,
                fields.date_of_birth,
                fields.date_of_death,
            );
            let url = author.url();
            catalog.authors.insert(author).await;
            Ok(found(&url))
        }
    }
}

async fn delete_get(
    State(catalog): State<Arc<Catalog>>,
    Path(id): Path<Uuid>,
) -> Result<Html<String>, AppError> {
    let (author, books) = tokio::join!(
        catalog.authors.get(id),
        catalog.books.find(|b| b.author == id)
    );
    let author = author.ok_or_else(|| AppError::not_found("Author not found"))?;
    Ok(views::delete_page(&author, &books))
}

async fn delete_post(
    State(catalog): State<Arc<Catalog>>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let (author, books) = tokio::join!(
        catalog.authors.get(id),
        catalog.books.find(|b| b.author == id)
    );
    let author = author.ok_or_else(|| AppError::not_found("Author not found"))?;

    // Referential conflict: the delete is refused while books still
    // reference this author.
    if !books.is_empty() {
        return Ok(views::delete_page(&author, &books).into_response());
    }

    catalog.authors.remove(id).await;
    Ok(found("/catalog/authors"))
}

async fn update_get(
    State(catalog): State<Arc<Catalog>>,
    Path(id): Path<Uuid>,
) -> Result<Html<String>, AppError> {
    let author = catalog
        .authors
        .get(id)
        .await
        .ok_or_else(|| AppError::not_found("Author not found"))?;
    Ok(views::form_page(
        "Update Author",
        &AuthorInput::from_author(&author),
        &[],
    ))
}

async fn update_post(
    State(catalog): State<Arc<Catalog>>,
    Path(id): Path<Uuid>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Result<Response, AppError> {
    let form = FormData::new(pairs);
    let input = AuthorInput::from_form(&form);
    match input.validate() {
        Err(errors) => Ok(views::form_page("Update Author", &input, &errors).into_response()),
        Ok(fields) => {
            let updated = catalog
                .authors
                .update(id, |author| {
                    author.first_name = fields.first_name;
                    author.family_name = fields.family_name;
                    author.date_of_birth = fields.date_of_birth;
                    author.date_of_death = fields.date_of_death;
                })
                .await
                .ok_or_else(|| AppError::not_found("Author not found"))?;
            Ok(found(&updated.url()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::book::models::Book;
    use axum::body::to_bytes;
    use axum::http::{header, StatusCode};

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

    fn location(response: &Response) -> String {
        response.headers()[header::LOCATION]
            .to_str()
            .unwrap()
            .to_string()
    }

    #[tokio::test]
    async fn create_valid_author_redirects_to_detail() {
        let catalog = Catalog::new();
        let response = create_post(
            State(catalog.clone()),
            form(&[
                ("first_name", "Jane"),
                ("family_name", "Austen"),
                ("date_of_birth", ""),
                ("date_of_death", ""),
            ]),
        )
        .await
        .unwrap();

        assert_eq!(response.status(), StatusCode::FOUND);
        let location = location(&response);
        assert!(location.starts_with("/catalog/author/"));

        let id: Uuid = location.rsplit('/').next().unwrap().parse().unwrap();
        let detail = detail(State(catalog.clone()), Path(id)).await.unwrap();
        assert!(detail.0.contains("Jane Austen"));
    }

    #[tokio::test]
    async fn create_roundtrip_stores_sanitized_values() {
        let catalog = Catalog::new();
        let response = create_post(
            State(catalog.clone()),
            form(&[("first_name", "  Jane "), ("family_name", "Austen")]),
        )
        .await
        .unwrap();

        let id: Uuid = location(&response)
            .rsplit('/')
            .next()
            .unwrap()
            .parse()
            .unwrap();
        let stored = catalog.authors.get(id).await.unwrap();
        assert_eq!(stored.first_name, "Jane");
        assert_eq!(stored.family_name, "Austen");
        assert_eq!(stored.date_of_birth, None);
    }

    #[tokio::test]
    async fn create_invalid_rerenders_form_with_errors() {
        let catalog = Catalog::new();
        let response = create_post(
            State(catalog.clone()),
            form(&[("first_name", ""), ("family_name", "Austen")]),
        )
        .await
        .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_text(response).await;
        assert!(body.contains("First name must be specified"));
        // Submitted input is echoed back.
        assert!(body.contains("value=\"Austen\""));
        assert_eq!(catalog.authors.count().await, 0);
    }

    #[tokio::test]
    async fn create_rejects_bad_birth_date() {
        let catalog = Catalog::new();
        let response = create_post(
            State(catalog.clone()),
            form(&[
                ("first_name", "Jane"),
                ("family_name", "Austen"),
                ("date_of_birth", "not-a-date"),
            ]),
        )
        .await
        .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_text(response).await;
        assert!(body.contains("Invalid date of birth"));
        assert_eq!(catalog.authors.count().await, 0);
    }

    #[tokio::test]
    async fn detail_of_unknown_author_is_not_found() {
        let catalog = Catalog::new();
        let result = detail(State(catalog), Path(Uuid::now_v7())).await;
        let response = result.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn delete_with_books_is_refused_and_lists_dependents() {
        let catalog = Catalog::new();
        let author = Author::new("Jane".into(), "Austen".into(), None, None);
        let author_id = catalog.authors.insert(author).await;
        catalog
            .books
            .insert(Book::new(
                "Emma".into(),
                author_id,
                "A novel".into(),
                "9780141439587".into(),
                vec![],
            ))
            .await;

        let response = delete_post(State(catalog.clone()), Path(author_id))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_text(response).await;
        assert!(body.contains("Emma"));
        // Store state is unchanged.
        assert!(catalog.authors.get(author_id).await.is_some());
    }

    #[tokio::test]
    async fn delete_without_books_removes_author_and_redirects() {
        let catalog = Catalog::new();
        let author_id = catalog
            .authors
            .insert(Author::new("Jane".into(), "Austen".into(), None, None))
            .await;

        let response = delete_post(State(catalog.clone()), Path(author_id))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(location(&response), "/catalog/authors");
        assert_eq!(catalog.authors.count().await, 0);
    }

    #[tokio::test]
    async fn update_changes_fields_and_redirects() {
        let catalog = Catalog::new();
        let author_id = catalog
            .authors
            .insert(Author::new("Jane".into(), "Austen".into(), None, None))
            .await;

        let response = update_post(
            State(catalog.clone()),
            Path(author_id),
            form(&[
                ("first_name", "Charlotte"),
                ("family_name", "Bronte"),
                ("date_of_birth", "1816-04-21"),
            ]),
        )
        .await
        .unwrap();

        assert_eq!(response.status(), StatusCode::FOUND);
        let stored = catalog.authors.get(author_id).await.unwrap();
        assert_eq!(stored.name(), "Charlotte Bronte");
        assert!(stored.date_of_birth.is_some());
    }

    #[tokio::test]
    async fn update_of_unknown_author_is_not_found() {
        let catalog = Catalog::new();
        let result = update_post(
            State(catalog),
            Path(Uuid::now_v7()),
            form(&[("first_name", "Jane"), ("family_name", "Austen")]),
        )
        .await;
        let response = result.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
