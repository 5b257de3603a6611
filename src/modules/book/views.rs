use axum::response::Html;

use super::models::Book;
use super::BookInput;
use crate::forms::FieldError;
use crate::modules::author::models::Author;
use crate::modules::bookinstance::models::BookInstance;
use crate::modules::genre::models::Genre;
use crate::views::{error_list, page};

pub struct HomeCounts {
    pub books: usize,
    pub instances: usize,
    pub instances_available: usize,
    pub authors: usize,
    pub genres: usize,
}

pub fn index_page(counts: &HomeCounts) -> Html<String> {
    page(
        "Local Library Home",
        &format!(
            "<h1>Local Library Home</h1>\n\
             <p>The library has the following record counts:</p>\n\
             <ul>\n\
             <li><strong>Books:</strong> {books}</li>\n\
             <li><strong>Copies:</strong> {instances}</li>\n\
             <li><strong>Copies available:</strong> {available}</li>\n\
             <li><strong>Authors:</strong> {authors}</li>\n\
             <li><strong>Genres:</strong> {genres}</li>\n\
             </ul>",
            books = counts.books,
            instances = counts.instances,
            available = counts.instances_available,
            authors = counts.authors,
            genres = counts.genres,
        ),
    )
}

pub fn list_page(rows: &[(Book, Option<Author>)]) -> Html<String> {
    let mut items = String::new();
    for (book, author) in rows {
        let by = author
            .as_ref()
            .map(|a| a.name())
            .unwrap_or_else(|| "unknown author".to_string());
        items.push_str(&format!(
            "<li><a href=\"{url}\">{title}</a> ({by})</li>\n",
            url = book.url(),
            title = book.title,
        ));
    }
    if items.is_empty() {
        items.push_str("<li>There are no books.</li>\n");
    }
    page("Book List", &format!("<h1>Book List</h1>\n<ul>\n{items}</ul>"))
}

pub fn detail_page(
    book: &Book,
    author: Option<&Author>,
    genres: &[Genre],
    instances: &[BookInstance],
) -> Html<String> {
    let author_line = match author {
        Some(author) => format!(
            "<a href=\"{url}\">{name}</a>",
            url = author.url(),
            name = author.name()
        ),
        None => "unknown author".to_string(),
    };
    let genre_line = if genres.is_empty() {
        "none".to_string()
    } else {
        genres
            .iter()
            .map(|g| format!("<a href=\"{}\">{}</a>", g.url(), g.name))
            .collect::<Vec<_>>()
            .join(", ")
    };
    let mut copies = String::new();
    for instance in instances {
        copies.push_str(&format!(
            "<li><a href=\"{url}\">{imprint}</a>: {status} (due {due})</li>\n",
            url = instance.url(),
            imprint = instance.imprint,
            status = instance.status.label(),
            due = instance.due_back_formatted(),
        ));
    }
    if copies.is_empty() {
        copies.push_str("<li>There are no copies of this book in the library.</li>\n");
    }
    page(
        &book.title,
        &format!(
            "<h1>Title: {title}</h1>\n\
             <p><strong>Author:</strong> {author_line}</p>\n\
             <p><strong>Summary:</strong> {summary}</p>\n\
             <p><strong>ISBN:</strong> {isbn}</p>\n\
             <p><strong>Genre:</strong> {genre_line}</p>\n\
             <h2>Copies</h2>\n<ul>\n{copies}</ul>",
            title = book.title,
            summary = book.summary,
            isbn = book.isbn,
        ),
    )
}

pub fn form_page(
    title: &str,
    input: &BookInput,
    authors: &[Author],
    genres: &[Genre],
    errors: &[FieldError],
) -> Html<String> {
    let mut author_options = String::new();
    for author in authors {
        let selected = if input.author == author.id.to_string() {
            " selected"
        } else {
            ""
        };
        author_options.push_str(&format!(
            "<option value=\"{id}\"{selected}>{name}</option>\n",
            id = author.id,
            name = author.name(),
        ));
    }
    let mut genre_boxes = String::new();
    for genre in genres {
        let checked = if input.genres.contains(&genre.id) {
            " checked"
        } else {
            ""
        };
        genre_boxes.push_str(&format!(
            "<label><input type=\"checkbox\" name=\"genre\" value=\"{id}\"{checked}> {name}</label><br>\n",
            id = genre.id,
            name = genre.name,
        ));
    }
    page(
        title,
        &format!(
            "<h1>{title}</h1>\n{errors}\
             <form method=\"post\">\n\
             <label>Title: <input type=\"text\" name=\"title\" value=\"{book_title}\"></label><br>\n\
             <label>Author: <select name=\"author\">\n\
             <option value=\"\">--select--</option>\n{author_options}</select></label><br>\n\
             <label>Summary: <textarea name=\"summary\">{summary}</textarea></label><br>\n\
             <label>ISBN: <input type=\"text\" name=\"isbn\" value=\"{isbn}\"></label><br>\n\
             <fieldset><legend>Genre</legend>\n{genre_boxes}</fieldset>\n\
             <button type=\"submit\">Submit</button>\n\
             </form>",
            errors = error_list(errors),
            book_title = input.title,
            summary = input.summary,
            isbn = input.isbn,
        ),
    )
}

pub fn delete_page(book: &Book, instances: &[BookInstance]) -> Html<String> {
    let body = if instances.is_empty() {
        format!(
            "<h1>Delete Book: {title}</h1>\n\
             <p>Do you really want to delete this book?</p>\n\
             <form method=\"post\"><button type=\"submit\">Delete</button></form>",
            title = book.title,
        )
    } else {
        let mut items = String::new();
        for instance in instances {
            items.push_str(&format!(
                "<li><a href=\"{url}\">{imprint}</a>: {status}</li>\n",
                url = instance.url(),
                imprint = instance.imprint,
                status = instance.status.label(),
            ));
        }
        format!(
            "<h1>Delete Book: {title}</h1>\n\
             <p>Delete the following copies before attempting to delete this book.</p>\n\
             <h2>Copies</h2>\n<ul>\n{items}</ul>",
            title = book.title,
        )
    };
    page("Delete Book", &body)
}
