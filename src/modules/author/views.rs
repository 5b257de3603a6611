use axum::response::Html;

use super::models::Author;
use super::AuthorInput;
use crate::forms::FieldError;
use crate::modules::book::models::Book;
use crate::views::{error_list, page};

pub fn list_page(authors: &[Author]) -> Html<String> {
    let mut items = String::new();
    for author in authors {
        items.push_str(&format!(
            "<li><a href=\"{url}\">{name}</a> ({lifespan})</li>\n",
            url = author.url(),
            name = author.name(),
            lifespan = author.lifespan(),
        ));
    }
    if items.is_empty() {
        items.push_str("<li>There are no authors.</li>\n");
    }
    page(
        "Author List",
        &format!("<h1>Author List</h1>\n<ul>\n{items}</ul>"),
    )
}

pub fn detail_page(author: &Author, books: &[Book]) -> Html<String> {
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
        book_items.push_str("<li>This author has no books.</li>\n");
    }
    page(
        "Author Detail",
        &format!(
            "<h1>Author: {name}</h1>\n<p>{lifespan}</p>\n<h2>Books</h2>\n<ul>\n{book_items}</ul>",
            name = author.name(),
            lifespan = author.lifespan(),
        ),
    )
}

pub fn form_page(title: &str, input: &AuthorInput, errors: &[FieldError]) -> Html<String> {
    page(
        title,
        &format!(
            "<h1>{title}</h1>\n{errors}\
             <form method=\"post\">\n\
             <label>First name: <input type=\"text\" name=\"first_name\" value=\"{first_name}\"></label><br>\n\
             <label>Family name: <input type=\"text\" name=\"family_name\" value=\"{family_name}\"></label><br>\n\
             <label>Date of birth: <input type=\"date\" name=\"date_of_birth\" value=\"{date_of_birth}\"></label><br>\n\
             <label>Date of death: <input type=\"date\" name=\"date_of_death\" value=\"{date_of_death}\"></label><br>\n\
             <button type=\"submit\">Submit</button>\n\
             </form>",
            errors = error_list(errors),
            first_name = input.first_name,
            family_name = input.family_name,
            date_of_birth = input.date_of_birth,
            date_of_death = input.date_of_death,
        ),
    )
}

pub fn delete_page(author: &Author, books: &[Book]) -> Html<String> {
    let body = if books.is_empty() {
        format!(
            "<h1>Delete Author: {name}</h1>\n\
             <p>Do you really want to delete this author?</p>\n\
             <form method=\"post\"><button type=\"submit\">Delete</button></form>",
            name = author.name(),
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
            "<h1>Delete Author: {name}</h1>\n\
             <p>Delete the following books before attempting to delete this author.</p>\n\
             <h2>Books</h2>\n<ul>\n{book_items}</ul>",
            name = author.name(),
        )
    };
    page("Delete Author", &body)
}
