use liber_store::Document;
use serde::{Deserialize, Serialize};
use time::Date;
use uuid::Uuid;

use crate::views::fmt_date;

/// A book author. Name, URL, and lifespan are derived on read and
/// never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Author {
    pub id: Uuid,
    pub first_name: String,
    pub family_name: String,
    pub date_of_birth: Option<Date>,
    pub date_of_death: Option<Date>,
}

impl Document for Author {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Author {
    pub fn new(
        first_name: String,
        family_name: String,
        date_of_birth: Option<Date>,
        date_of_death: Option<Date>,
    ) -> Self {
        Self {
            id: Uuid::now_v7(),
            first_name,
            family_name,
            date_of_birth,
            date_of_death,
        }
    }

    /// Full name; the separating space appears only when both parts
    /// are present.
    pub fn name(&self) -> String {
        let mut fullname = String::new();
        if !self.first_name.is_empty() {
            fullname.push_str(&self.first_name);
        }
        if !fullname.is_empty() && !self.family_name.is_empty() {
            fullname.push(' ');
        }
        fullname.push_str(&self.family_name);
        fullname
    }

    /// Canonical detail-page path.
    pub fn url(&self) -> String {
        format!("/catalog/author/{}", self.id)
    }

    pub fn birth_formatted(&self) -> String {
        fmt_date(self.date_of_birth)
    }

    pub fn death_formatted(&self) -> String {
        fmt_date(self.date_of_death)
    }

    /// Lifespan string, e.g. "Dec 16, 1775 - Jul 18, 1817"; either side
    /// may be empty.
    pub fn lifespan(&self) -> String {
        format!("{} - {}", self.birth_formatted(), self.death_formatted())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_joins_both_parts_with_a_space() {
        let author = Author::new("Jane".into(), "Austen".into(), None, None);
        assert_eq!(author.name(), "Jane Austen");
    }

    #[test]
    fn name_omits_separator_when_a_part_is_missing() {
        let author = Author::new(String::new(), "Austen".into(), None, None);
        assert_eq!(author.name(), "Austen");

        let author = Author::new("Jane".into(), String::new(), None, None);
        assert_eq!(author.name(), "Jane");
    }

    #[test]
    fn url_is_rooted_under_catalog() {
        let author = Author::new("Jane".into(), "Austen".into(), None, None);
        assert_eq!(author.url(), format!("/catalog/author/{}", author.id));
    }

    #[test]
    fn lifespan_keeps_empty_sides() {
        let birth = Date::from_calendar_date(1775, time::Month::December, 16).unwrap();
        let author = Author::new("Jane".into(), "Austen".into(), Some(birth), None);
        assert_eq!(author.lifespan(), "Dec 16, 1775 - ");
    }
}
