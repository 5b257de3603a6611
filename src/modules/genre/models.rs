use liber_store::Document;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A book genre. Name uniqueness is case-insensitive and enforced by
/// the create flow, not by the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Genre {
    pub id: Uuid,
    pub name: String,
}

impl Document for Genre {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Genre {
    pub fn new(name: String) -> Self {
        Self {
            id: Uuid::now_v7(),
            name,
        }
    }

    /// Canonical detail-page path.
    pub fn url(&self) -> String {
        format!("/catalog/genre/{}", self.id)
    }
}
