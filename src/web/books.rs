//! Book pages

use axum::{
    extract::{Path, State},
    response::Response,
    Form,
};
use axum_extra::extract::cookie::CookieJar;
use maud::{html, Markup};
use serde::Deserialize;

use super::{filled, page, parse_number, redirect_error, redirect_success, PageResult};
use crate::{
    error::AppError,
    models::book::{Book, CreateBook, UpdateBook},
    AppState,
};

const BOOKS_PAGE: &str = "/ui/books";

#[derive(Debug, Deserialize)]
pub struct BookForm {
    pub title: Option<String>,
    pub author: Option<String>,
    pub isbn: Option<String>,
    pub available_copies: Option<String>,
}

fn book_fields(book: Option<&Book>) -> Markup {
    html! {
        label { "Title " input name="title" value=[book.map(|b| &b.title)]; }
        " "
        label { "Author " input name="author" value=[book.map(|b| &b.author)]; }
        " "
        label { "ISBN " input name="isbn" value=[book.map(|b| &b.isbn)]; }
        " "
        label {
            "Copies "
            input name="available_copies" type="number" min="0"
                value=(book.map(|b| b.available_copies).unwrap_or(1));
        }
    }
}

pub async fn books_page(State(state): State<AppState>, jar: CookieJar) -> PageResult {
    let books = state.services.books.list().await?;

    Ok(page(jar, "Books", html! {
        form method="post" action=(BOOKS_PAGE) {
            (book_fields(None))
            " "
            button type="submit" { "Add book" }
        }
        table {
            tr { th { "ID" } th { "Title" } th { "Author" } th { "ISBN" } th { "Available" } th {} }
            @for book in &books {
                tr {
                    td { (book.id) }
                    td { (book.title) }
                    td { (book.author) }
                    td { (book.isbn) }
                    td { (book.available_copies) }
                    td {
                        a href={ "/ui/books/" (book.id) "/edit" } { "Edit" }
                        " "
                        form.inline method="post" action={ "/ui/books/" (book.id) "/delete" } {
                            button type="submit" { "Delete" }
                        }
                    }
                }
            }
        }
    }))
}

pub async fn books_submit(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<BookForm>,
) -> Response {
    let (Some(title), Some(author), Some(isbn), Some(copies)) = (
        filled(&form.title),
        filled(&form.author),
        filled(&form.isbn),
        filled(&form.available_copies),
    ) else {
        return redirect_error(jar, "All fields are required", BOOKS_PAGE);
    };

    let available_copies = match parse_number(&copies, "Available copies") {
        Ok(n) => n,
        Err(msg) => return redirect_error(jar, msg, BOOKS_PAGE),
    };

    let data = CreateBook {
        title,
        author,
        isbn,
        available_copies,
    };
    match state.services.books.create(data).await {
        Ok(_) => redirect_success(jar, "Book added successfully!", BOOKS_PAGE),
        Err(e) => redirect_error(jar, e.message(), BOOKS_PAGE),
    }
}

pub async fn edit_book_page(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(id): Path<i32>,
) -> PageResult {
    let book = state.services.books.get_by_id(id).await?;

    Ok(page(jar, "Edit book", html! {
        form method="post" action={ "/ui/books/" (book.id) "/edit" } {
            (book_fields(Some(&book)))
            " "
            button type="submit" { "Save" }
        }
        p { a href=(BOOKS_PAGE) { "Back to books" } }
    }))
}

pub async fn edit_book_submit(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(id): Path<i32>,
    Form(form): Form<BookForm>,
) -> Response {
    let edit_page = format!("/ui/books/{}/edit", id);

    let available_copies = match filled(&form.available_copies)
        .map(|c| parse_number(&c, "Available copies"))
        .transpose()
    {
        Ok(n) => n,
        Err(msg) => return redirect_error(jar, msg, &edit_page),
    };

    let data = UpdateBook {
        id: None,
        title: filled(&form.title),
        author: filled(&form.author),
        isbn: filled(&form.isbn),
        available_copies,
    };
    if data.is_empty() {
        return redirect_success(jar, "Nothing to update.", BOOKS_PAGE);
    }

    match state.services.books.update(id, data).await {
        Ok(_) => redirect_success(jar, "Book updated successfully!", BOOKS_PAGE),
        Err(e @ (AppError::Conflict(_) | AppError::Validation(_))) => {
            redirect_error(jar, e.message(), &edit_page)
        }
        Err(e) => redirect_error(jar, format!("Error updating book: {}", e.message()), BOOKS_PAGE),
    }
}

pub async fn delete_book_submit(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(id): Path<i32>,
) -> Response {
    match state.services.books.delete(id).await {
        Ok(()) => redirect_success(jar, "Book deleted successfully!", BOOKS_PAGE),
        Err(e) => redirect_error(jar, e.message(), BOOKS_PAGE),
    }
}
