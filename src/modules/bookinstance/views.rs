use axum::response::Html;

use super::models::{BookInstance, Status};
use super::InstanceInput;
use crate::forms::FieldError;
use crate::modules::book::models::Book;
use crate::views::{error_list, page};

pub fn list_page(rows: &[(BookInstance, Option<Book>)]) -> Html<String> {
    let mut items = String::new();
    for (instance, book) in rows {
        let title = book
            .as_ref()
            .map(|b| b.title.as_str())
            .unwrap_or("unknown book");
        items.push_str(&format!(
            "<li><a href=\"{url}\">{title}</a>: {imprint} - {status} (due {due})</li>\n",
            url = instance.url(),
            imprint = instance.imprint,
            status = instance.status.label(),
            due = instance.due_back_formatted(),
        ));
    }
    if items.is_empty() {
        items.push_str("<li>There are no book copies in this library.</li>\n");
    }
    page(
        "Book Instance List",
        &format!("<h1>Book Instance List</h1>\n<ul>\n{items}</ul>"),
    )
}

pub fn detail_page(instance: &BookInstance, book: Option<&Book>) -> Html<String> {
    let title_line = match book {
        Some(book) => format!(
            "<a href=\"{url}\">{title}</a>",
            url = book.url(),
            title = book.title
        ),
        None => "unknown book".to_string(),
    };
    page(
        "Book:",
        &format!(
            "<h1>ID: {id}</h1>\n\
             <p><strong>Title:</strong> {title_line}</p>\n\
             <p><strong>Imprint:</strong> {imprint}</p>\n\
             <p><strong>Status:</strong> {status}</p>\n\
             <p><strong>Due back:</strong> {due}</p>",
            id = instance.id,
            imprint = instance.imprint,
            status = instance.status.label(),
            due = instance.due_back_formatted(),
        ),
    )
}

pub fn form_page(
    title: &str,
    input: &InstanceInput,
    books: &[Book],
    errors: &[FieldError],
) -> Html<String> {
    let mut book_options = String::new();
    for book in books {
        let selected = if input.book == book.id.to_string() {
            " selected"
        } else {
            ""
        };
        book_options.push_str(&format!(
            "<option value=\"{id}\"{selected}>{title}</option>\n",
            id = book.id,
            title = book.title,
        ));
    }
    let mut status_options = String::new();
    for status in Status::ALL {
        let selected = if input.status == status.as_value() {
            " selected"
        } else {
            ""
        };
        status_options.push_str(&format!(
            "<option value=\"{value}\"{selected}>{label}</option>\n",
            value = status.as_value(),
            label = status.label(),
        ));
    }
    page(
        title,
        &format!(
            "<h1>{title}</h1>\n{errors}\
             <form method=\"post\">\n\
             <label>Book: <select name=\"book\">\n\
             <option value=\"\">--select--</option>\n{book_options}</select></label><br>\n\
             <label>Imprint: <input type=\"text\" name=\"imprint\" value=\"{imprint}\"></label><br>\n\
             <label>Date when book available: <input type=\"date\" name=\"due_back\" value=\"{due_back}\"></label><br>\n\
             <label>Status: <select name=\"status\">\n{status_options}</select></label><br>\n\
             <button type=\"submit\">Submit</button>\n\
             </form>",
            errors = error_list(errors),
            imprint = input.imprint,
            due_back = input.due_back,
        ),
    )
}

pub fn delete_page(instance: &BookInstance, book: Option<&Book>) -> Html<String> {
    let title = book
        .as_ref()
        .map(|b| b.title.as_str())
        .unwrap_or("unknown book");
    page(
        "Delete Bookinstance",
        &format!(
            "<h1>Delete Book Instance: {id}</h1>\n\
             <p><strong>Title:</strong> {title}</p>\n\
             <p><strong>Imprint:</strong> {imprint}</p>\n\
             <p>Do you really want to delete this copy?</p>\n\
             <form method=\"post\"><button type=\"submit\">Delete</button></form>",
            id = instance.id,
            imprint = instance.imprint,
        ),
    )
}
