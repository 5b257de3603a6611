use liber_store::Document;
use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::views::fmt_date;

/// Loan status of a copy. The form passes the value through escaped
/// only; the enum is enforced when the record is constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Available,
    #[default]
    Maintenance,
    Loaned,
    Reserved,
}

impl Status {
    pub const ALL: [Status; 4] = [
        Status::Available,
        Status::Maintenance,
        Status::Loaned,
        Status::Reserved,
    ];

    /// Parse the form/wire value.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "available" => Some(Status::Available),
            "maintenance" => Some(Status::Maintenance),
            "loaned" => Some(Status::Loaned),
            "reserved" => Some(Status::Reserved),
            _ => None,
        }
    }

    /// Form/wire value.
    pub fn as_value(&self) -> &'static str {
        match self {
            Status::Available => "available",
            Status::Maintenance => "maintenance",
            Status::Loaned => "loaned",
            Status::Reserved => "reserved",
        }
    }

    /// Display label.
    pub fn label(&self) -> &'static str {
        match self {
            Status::Available => "Available",
            Status::Maintenance => "Maintenance",
            Status::Loaned => "Loaned",
            Status::Reserved => "Reserved",
        }
    }
}

/// A physical copy of a book.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookInstance {
    pub id: Uuid,
    pub book: Uuid,
    pub imprint: String,
    pub status: Status,
    pub due_back: Date,
}

impl Document for BookInstance {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl BookInstance {
    /// `due_back` defaults to the creation date when absent.
    pub fn new(book: Uuid, imprint: String, status: Status, due_back: Option<Date>) -> Self {
        Self {
            id: Uuid::now_v7(),
            book,
            imprint,
            status,
            due_back: due_back.unwrap_or_else(|| OffsetDateTime::now_utc().date()),
        }
    }

    /// Canonical detail-page path.
    pub fn url(&self) -> String {
        format!("/catalog/bookinstance/{}", self.id)
    }

    pub fn due_back_formatted(&self) -> String {
        fmt_date(Some(self.due_back))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parse_accepts_wire_values_only() {
        assert_eq!(Status::parse("available"), Some(Status::Available));
        assert_eq!(Status::parse("reserved"), Some(Status::Reserved));
        assert_eq!(Status::parse("Available"), None);
        assert_eq!(Status::parse("lost"), None);
    }

    #[test]
    fn default_status_is_maintenance() {
        assert_eq!(Status::default(), Status::Maintenance);
    }

    #[test]
    fn due_back_defaults_to_today() {
        let instance = BookInstance::new(Uuid::now_v7(), "Penguin".into(), Status::default(), None);
        assert_eq!(instance.due_back, OffsetDateTime::now_utc().date());
    }
}
