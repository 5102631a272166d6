//! Loan page: borrow and return

use std::collections::HashMap;

use axum::{extract::State, response::Response, Form};
use axum_extra::extract::cookie::CookieJar;
use maud::html;
use serde::Deserialize;

use super::{filled, page, parse_number, redirect_error, redirect_success, PageResult};
use crate::{models::loan::CreateLoan, AppState};

const LOANS_PAGE: &str = "/ui/loans";

#[derive(Debug, Deserialize)]
pub struct LoanForm {
    pub user_id: Option<String>,
    pub book_id: Option<String>,
    /// Set by the "Return" buttons
    pub loan_id: Option<String>,
}

pub async fn loans_page(State(state): State<AppState>, jar: CookieJar) -> PageResult {
    let services = &state.services;
    let loans = services.loans.list().await?;
    let users = services.users.list().await?;
    let books = services.books.list().await?;
    let on_shelf = services.books.list_available().await?;

    let user_names: HashMap<i32, &str> = users.iter().map(|u| (u.id, u.full_name.as_str())).collect();
    let book_titles: HashMap<i32, &str> = books.iter().map(|b| (b.id, b.title.as_str())).collect();

    Ok(page(jar, "Loans", html! {
        form method="post" action=(LOANS_PAGE) {
            label {
                "User "
                select name="user_id" {
                    option value="" { "-- choose --" }
                    @for user in &users {
                        option value=(user.id) { (user.full_name) }
                    }
                }
            }
            " "
            label {
                "Book "
                select name="book_id" {
                    option value="" { "-- choose --" }
                    @for book in &on_shelf {
                        option value=(book.id) { (book.title) " (" (book.available_copies) " left)" }
                    }
                }
            }
            " "
            button type="submit" { "Borrow" }
        }
        table {
            tr { th { "ID" } th { "User" } th { "Book" } th { "Borrowed" } th { "Returned" } }
            @for loan in &loans {
                tr {
                    td { (loan.id) }
                    td { (user_names.get(&loan.user_id).copied().unwrap_or("Unknown user")) }
                    td { (book_titles.get(&loan.book_id).copied().unwrap_or("Unknown book")) }
                    td { (loan.borrowed_at.format("%Y-%m-%d %H:%M")) }
                    td {
                        @if let Some(returned_at) = loan.returned_at {
                            (returned_at.format("%Y-%m-%d %H:%M"))
                        } @else {
                            form.inline method="post" action=(LOANS_PAGE) {
                                input type="hidden" name="loan_id" value=(loan.id);
                                button type="submit" { "Return" }
                            }
                        }
                    }
                }
            }
        }
    }))
}

pub async fn loans_submit(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<LoanForm>,
) -> Response {
    let loans = &state.services.loans;

    if let Some(loan_id) = filled(&form.loan_id) {
        let id = match parse_number(&loan_id, "Loan") {
            Ok(id) => id,
            Err(msg) => return redirect_error(jar, msg, LOANS_PAGE),
        };
        return match loans.return_loan(id).await {
            Ok(_) => redirect_success(jar, "Book returned successfully!", LOANS_PAGE),
            Err(e) => redirect_error(jar, format!("Error returning book: {}", e.message()), LOANS_PAGE),
        };
    }

    let (Some(user_id), Some(book_id)) = (filled(&form.user_id), filled(&form.book_id)) else {
        return redirect_error(jar, "User and Book are required", LOANS_PAGE);
    };
    let ids = parse_number(&user_id, "User").and_then(|u| Ok((u, parse_number(&book_id, "Book")?)));
    let (user_id, book_id) = match ids {
        Ok(ids) => ids,
        Err(msg) => return redirect_error(jar, msg, LOANS_PAGE),
    };

    match loans.create(CreateLoan { user_id, book_id }).await {
        Ok(_) => redirect_success(jar, "Loan created successfully!", LOANS_PAGE),
        Err(e) => redirect_error(jar, e.message(), LOANS_PAGE),
    }
}
