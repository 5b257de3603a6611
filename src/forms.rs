//! Shared form decoding, sanitization, and field validation.
//!
//! Every write flow runs the same pipeline: decode the raw pairs,
//! sanitize each value (trim + HTML-escape), normalize multi-value
//! fields to an id set, then apply per-field rules. Validation is a
//! pure transform; failures re-render the originating form with the
//! sanitized input echoed back.

use time::{format_description::BorrowedFormatItem, macros::format_description, Date};
use uuid::Uuid;

const ISO_DATE: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Raw submitted form fields, in submission order.
///
/// Decoded from `Form<Vec<(String, String)>>` so repeated keys (the
/// genre multi-select) survive; a map-shaped decode would keep only
/// one value per key.
pub struct FormData {
    fields: Vec<(String, String)>,
}

impl FormData {
    pub fn new(fields: Vec<(String, String)>) -> Self {
        Self { fields }
    }

    /// First value submitted under `name`, or the empty string.
    pub fn first(&self, name: &str) -> &str {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value.as_str())
            .unwrap_or("")
    }

    /// Every value submitted under `name`, in order.
    pub fn all(&self, name: &str) -> Vec<&str> {
        self.fields
            .iter()
            .filter(|(field, _)| field == name)
            .map(|(_, value)| value.as_str())
            .collect()
    }
}

/// A single validation failure, naming the offending field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Trim and HTML-escape a raw form value.
pub fn sanitize(raw: &str) -> String {
    escape(raw.trim())
}

/// Escape characters unsafe for direct HTML embedding.
pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            other => out.push(other),
        }
    }
    out
}

/// Normalize a multi-value reference field into a set of ids.
///
/// Absent becomes the empty set, a single value a one-element set, and
/// repeated values collapse; values that are not well-formed ids are
/// dropped.
pub fn normalize_id_set(values: &[&str]) -> Vec<Uuid> {
    let mut ids = Vec::with_capacity(values.len());
    for value in values {
        if let Ok(id) = value.trim().parse::<Uuid>() {
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
    }
    ids
}

/// Render an optional date back into the form's input format.
pub fn iso_date_string(date: Option<Date>) -> String {
    date.and_then(|d| d.format(ISO_DATE).ok()).unwrap_or_default()
}

/// Collects field rules and their failures for one submission.
#[derive(Default)]
pub struct Validation {
    errors: Vec<FieldError>,
}

impl Validation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field,
            message: message.into(),
        });
    }

    /// Value must be non-empty after sanitization.
    pub fn require(&mut self, field: &'static str, value: &str, message: &str) {
        if value.is_empty() {
            self.push(field, message);
        }
    }

    /// Value must not exceed `max` characters. Empty values pass;
    /// `require` already covers those.
    pub fn max_length(&mut self, field: &'static str, value: &str, max: usize, message: &str) {
        if value.chars().count() > max {
            self.push(field, message);
        }
    }

    /// Value must have at least `min` characters.
    pub fn min_length(&mut self, field: &'static str, value: &str, min: usize, message: &str) {
        if value.chars().count() < min {
            self.push(field, message);
        }
    }

    /// Value may carry letters and digits only. Empty values pass.
    pub fn alphanumeric(&mut self, field: &'static str, value: &str, message: &str) {
        if !value.is_empty() && !value.chars().all(|c| c.is_alphanumeric()) {
            self.push(field, message);
        }
    }

    /// Optional ISO-8601 calendar date; empty parses as absent.
    pub fn optional_iso_date(
        &mut self,
        field: &'static str,
        value: &str,
        message: &str,
    ) -> Option<Date> {
        if value.is_empty() {
            return None;
        }
        match Date::parse(value, ISO_DATE) {
            Ok(date) => Some(date),
            Err(_) => {
                self.push(field, message);
                None
            }
        }
    }

    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    /// Consume the validation, yielding the collected failures.
    pub fn finish(self) -> Result<(), Vec<FieldError>> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self.errors)
        }
    }
}
