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
use uuid::Uuid;

use liber_http::{error::AppError, found};
use liber_kernel::{InitCtx, Module};

use crate::catalog::Catalog;
use crate::forms::{FieldError, FormData, Validation};
use models::Genre;

/// Genre module: list/detail, idempotent-by-name create, update, and a
/// dependents-checked delete.
pub struct GenreModule {
    catalog: Arc<Catalog>,
}

impl GenreModule {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self { catalog }
    }
}

#[async_trait]
impl Module for GenreModule {
    fn name(&self) -> &'static str {
        "genres"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            "genre module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        Router::new()
            .route("/genres", get(list))
            .route("/genre/create", get(create_get).post(create_post))
            .route("/genre/{id}", get(detail))
            .route("/genre/{id}/delete", get(delete_get).post(delete_post))
            .route("/genre/{id}/update", get(update_get).post(update_post))
            .with_state(self.catalog.clone())
    }
}

/// Sanitized form echo for the genre form.
pub(crate) struct GenreInput {
    pub name: String,
}

impl GenreInput {
    fn empty() -> Self {
        Self {
            name: String::new(),
        }
    }

    fn from_form(form: &FormData) -> Self {
        Self {
            name: crate::forms::sanitize(form.first("name")),
        }
    }

    fn from_genre(genre: &Genre) -> Self {
        Self {
            name: genre.name.clone(),
        }
    }

    fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut v = Validation::new();
        v.min_length(
            "name",
            &self.name,
            3,
            "Genre name must contain at least 3 characters",
        );
        v.finish()
    }
}

async fn list(State(catalog): State<Arc<Catalog>>) -> Result<Html<String>, AppError> {
    let genres = catalog.genres.all_sorted(|g| g.name.clone()).await;
    Ok(views::list_page(&genres))
}

async fn detail(
    State(catalog): State<Arc<Catalog>>,
    Path(id): Path<Uuid>,
) -> Result<Html<String>, AppError> {
    let (genre, books) = tokio::join!(
        catalog.genres.get(id),
        catalog
            .books
            .find_sorted(|b| b.genre.contains(&id), |b| b.title.clone())
    );
    let genre = genre.ok_or_else(|| AppError::not_found("Genre not found"))?;
    Ok(views::detail_page(&genre, &books))
}

async fn create_get() -> Html<String> {
    views::form_page("Create Genre", &GenreInput::empty(), &[])
}

async fn create_post(
    State(catalog): State<Arc<Catalog>>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Result<Response, AppError> {
    let form = FormData::new(pairs);
    let input = GenreInput::from_form(&form);
    if let Err(errors) = input.validate() {
        return Ok(views::form_page("Create Genre", &input, &errors).into_response());
    }

    // Idempotent-by-name create: a case-insensitive match redirects to
    // the existing genre instead of duplicating it. Check-then-insert
    // with no isolation; a racing create of the same name can slip
    // through.
    let name = input.name.clone();
    if let Some(existing) = catalog
        .genres
        .find_one(move |g| g.name.eq_ignore_ascii_case(&name))
        .await
    {
        return Ok(found(&existing.url()));
    }

    let genre = Genre::new(input.name);
    let url = genre.url();
    catalog.genres.insert(genre).await;
    Ok(found(&url))
}

async fn delete_get(
    State(catalog): State<Arc<Catalog>>,
    Path(id): Path<Uuid>,
) -> Result<Html<String>, AppError> {
    let (genre, books) = tokio::join!(
        catalog.genres.get(id),
        catalog.books.find(|b| b.genre.contains(&id))
    );
    let genre = genre.ok_or_else(|| AppError::not_found("Genre not found"))?;
    Ok(views::delete_page(&genre, &books))
}

async fn delete_post(
    State(catalog): State<Arc<Catalog>>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let (genre, books) = tokio::join!(
        catalog.genres.get(id),
        catalog.books.find(|b| b.genre.contains(&id))
    );
    let genre = genre.ok_or_else(|| AppError::not_found("Genre not found"))?;

    // Referential conflict: the delete is refused while books still
    // reference this genre.
    if !books.is_empty() {
        return Ok(views::delete_page(&genre, &books).into_response());
    }

    catalog.genres.remove(id).await;
    Ok(found("/catalog/genres"))
}

async fn update_get(
    State(catalog): State<Arc<Catalog>>,
    Path(id): Path<Uuid>,
) -> Result<Html<String>, AppError> {
    let genre = catalog
        .genres
        .get(id)
        .await
        .ok_or_else(|| AppError::not_found("Genre not found"))?;
    Ok(views::form_page(
        "Update Genre",
        &GenreInput::from_genre(&genre),
        &[],
    ))
}

async fn update_post(
    State(catalog): State<Arc<Catalog>>,
    Path(id): Path<Uuid>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Result<Response, AppError> {
    let form = FormData::new(pairs);
    let input = GenreInput::from_form(&form);
    if let Err(errors) = input.validate() {
        return Ok(views::form_page("Update Genre", &input, &errors).into_response());
    }

    let updated = catalog
        .genres
        .update(id, |genre| genre.name = input.name)
        .await
        .ok_or_else(|| AppError::not_found("Genre not found"))?;
    Ok(found(&updated.url()))
}
