//! Shared HTML rendering helpers.
//!
//! Views are plain functions from data to `Html<String>`. Stored field
//! values are HTML-escaped at sanitization time, so they embed as-is;
//! ids and computed URLs are inert by construction.

use axum::response::Html;
use time::{format_description::BorrowedFormatItem, macros::format_description, Date};

use crate::forms::FieldError;

const DISPLAY_DATE: &[BorrowedFormatItem<'static>] =
    format_description!("[month repr:short] [day padding:none], [year]");

/// Format an optional date for display, e.g. "Dec 16, 1775".
pub fn fmt_date(date: Option<Date>) -> String {
    date.map(|d| d.format(DISPLAY_DATE).unwrap_or_else(|_| d.to_string()))
        .unwrap_or_default()
}

/// Wrap a body fragment in the shared page layout with the sidebar.
pub fn page(title: &str, body: &str) -> Html<String> {
    Html(format!(
        "<!DOCTYPE html>\n\
         <html lang=\"en\">\n\
         <head>\n\
         <meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>{title}</title>\n\
         </head>\n\
         <body>\n\
         <div class=\"container\">\n\
         <nav class=\"sidebar\">\n\
         <ul>\n\
         <li><a href=\"/catalog\">Home</a></li>\n\
         <li><a href=\"/catalog/books\">All books</a></li>\n\
         <li><a href=\"/catalog/authors\">All authors</a></li>\n\
         <li><a href=\"/catalog/genres\">All genres</a></li>\n\
         <li><a href=\"/catalog/bookinstances\">All book instances</a></li>\n\
         </ul>\n\
         <ul>\n\
         <li><a href=\"/catalog/author/create\">Create new author</a></li>\n\
         <li><a href=\"/catalog/genre/create\">Create new genre</a></li>\n\
         <li><a href=\"/catalog/book/create\">Create new book</a></li>\n\
         <li><a href=\"/catalog/bookinstance/create\">Create new book instance</a></li>\n\
         </ul>\n\
         </nav>\n\
         <main>\n\
         {body}\n\
         </main>\n\
         </div>\n\
         </body>\n\
         </html>"
    ))
}

/// Render validation failures above a form; empty input yields nothing.
pub fn error_list(errors: &[FieldError]) -> String {
    if errors.is_empty() {
        return String::new();
    }
    let items: String = errors
        .iter()
        .map(|e| format!("<li>{}</li>\n", e.message))
        .collect();
    format!("<ul class=\"form-errors\">\n{items}</ul>\n")
}
