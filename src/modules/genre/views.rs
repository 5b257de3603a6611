use axum::response::Html;

use super::models::Genre;
use super::GenreInput;
use crate::forms::FieldError;
use crate::modules::book::models::Book;
use crate::views::{error_list, page};

pub fn list_page(genres: &[Genre]) -> Html<String> {
    let mut items = String::new();
    for genre in genres {
        items.push_str(&format!(
            "<li><a href=\"{url}\">{name}</a></li>\n",
            url = genre.url(),
            name = genre.name,
        ));
    }
    if items.is_empty() {
        items.push_str("<li>There are no genres.</li>\n");
    }
    page(
        "Genre List",
        &format!("<h1>Genre List</h1>\n<ul>\n{items}</ul>"),
    )
}

pub fn detail_page(genre: &Genre, books: &[Book]) -> Html<String> {
    let mut book_items = String::new();
    for book in books {
        book_items.push_str(&format!(
            "<li><a href=\"{url}\">{title}</a>: {summary}</li>\n",
            url = book.url(),
            title = book.title,
            summary = book.summary,
        ));
    }
    if book_items.is_empty() {
        book_items.push_str("<li>This genre has no books.</li>\n");
    }
    page(
        "Genre Detail",
        &format!(
            "<h1>Genre: {name}</h1>\n<h2>Books</h2>\n<ul>\n{book_items}</ul>",
            name = genre.name,
        ),
    )
}

pub fn form_page(title: &str, input: &GenreInput, errors: &[FieldError]) -> Html<String> {
    page(
        title,
        &format!(
            "<h1>{title}</h1>\n{errors}\
             <form method=\"post\">\n\
             <label>Genre name: <input type=\"text\" name=\"name\" value=\"{name}\"></label><br>\n\
             <button type=\"submit\">Submit</button>\n\
             </form>",
            errors = error_list(errors),
            name = input.name,
        ),
    )
}

pub fn delete_page(genre: &Genre, books: &[Book]) -> Html<String> {
    let body = if books.is_empty() {
        format!(
            "<h1>Delete Genre: {name}</h1>\n\
             <p>Do you really want to delete this genre?</p>\n\
             <form method=\"post\"><button type=\"submit\">Delete</button></form>",
            name = genre.name,
        )
    } else {
        let mut book_items = String::new();
        for book in books {
            book_items.push_str(&format!(
                "<li><a href=\"{url}\">{title}</a>: {summary}</li>\n",
                url = book.url(),
                title = book.title,
                summary = book.summary,
            ));
        }
        format!(
            "<h1>Delete Genre: {name}</h1>\n\
             <p>Delete the following books before attempting to delete this genre.</p>\n\
             <h2>Books</h2>\n<ul>\n{book_items}</ul>",
            name = genre.name,
        )
    };
    page("Delete Genre", &body)
}
