use liber_store::Document;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A catalog book. `author` references exactly one Author; `genre`
/// holds zero or more Genre ids with no meaningful order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Book {
    pub id: Uuid,
    pub title: String,
    pub author: Uuid,
    pub summary: String,
    pub isbn: String,
    pub genre: Vec<Uuid>,
}

impl Document for Book {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Book {
    pub fn new(
        title: String,
        author: Uuid,
        summary: String,
        isbn: String,
        genre: Vec<Uuid>,
    ) -> Self {
        Self {
            id: Uuid::now_v7(),
            title,
            author,
            summary,
            isbn,
            genre,
        }
    }

    /// Canonical detail-page path.
    pub fn url(&self) -> String {
        format!("/catalog/book/{}", self.id)
    }
}
