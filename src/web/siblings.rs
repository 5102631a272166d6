//! Sibling page: link and unlink users

use std::collections::HashMap;

use axum::{extract::State, response::Response, Form};
use axum_extra::extract::cookie::CookieJar;
use maud::html;
use serde::Deserialize;

use super::{filled, page, parse_number, redirect_error, redirect_success, PageResult};
use crate::{models::sibling::CreateSibling, AppState};

const SIBLINGS_PAGE: &str = "/ui/siblings";

#[derive(Debug, Deserialize)]
pub struct SiblingForm {
    pub user_id_1: Option<String>,
    pub user_id_2: Option<String>,
    /// Set by the "Remove" buttons
    pub delete_id: Option<String>,
}

pub async fn siblings_page(State(state): State<AppState>, jar: CookieJar) -> PageResult {
    let siblings = state.services.siblings.list().await?;
    let users = state.services.users.list().await?;
    let user_names: HashMap<i32, &str> = users.iter().map(|u| (u.id, u.full_name.as_str())).collect();
    let name_of = |id: i32| user_names.get(&id).copied().unwrap_or("Unknown user");

    Ok(page(jar, "Siblings", html! {
        form method="post" action=(SIBLINGS_PAGE) {
            @for field in ["user_id_1", "user_id_2"] {
                select name=(field) {
                    option value="" { "-- choose --" }
                    @for user in &users {
                        option value=(user.id) { (user.full_name) }
                    }
                }
                " "
            }
            button type="submit" { "Link siblings" }
        }
        table {
            tr { th { "ID" } th { "First user" } th { "Second user" } th {} }
            @for sibling in &siblings {
                tr {
                    td { (sibling.sibling_id) }
                    td { (name_of(sibling.user_id_1)) }
                    td { (name_of(sibling.user_id_2)) }
                    td {
                        form.inline method="post" action=(SIBLINGS_PAGE) {
                            input type="hidden" name="delete_id" value=(sibling.sibling_id);
                            button type="submit" { "Remove" }
                        }
                    }
                }
            }
        }
    }))
}

pub async fn siblings_submit(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<SiblingForm>,
) -> Response {
    let siblings = &state.services.siblings;

    if let Some(delete_id) = filled(&form.delete_id) {
        let id = match parse_number(&delete_id, "Sibling relationship") {
            Ok(id) => id,
            Err(msg) => return redirect_error(jar, msg, SIBLINGS_PAGE),
        };
        return match siblings.delete(id).await {
            Ok(()) => redirect_success(jar, "Sibling relationship removed", SIBLINGS_PAGE),
            Err(e) => redirect_error(jar, e.message(), SIBLINGS_PAGE),
        };
    }

    let (Some(first), Some(second)) = (filled(&form.user_id_1), filled(&form.user_id_2)) else {
        return redirect_error(jar, "Both users are required", SIBLINGS_PAGE);
    };
    let ids = parse_number(&first, "User").and_then(|a| Ok((a, parse_number(&second, "User")?)));
    let (user_id_1, user_id_2) = match ids {
        Ok(ids) => ids,
        Err(msg) => return redirect_error(jar, msg, SIBLINGS_PAGE),
    };

    match siblings.create(CreateSibling { user_id_1, user_id_2 }).await {
        Ok(_) => redirect_success(jar, "Sibling relationship created!", SIBLINGS_PAGE),
        Err(e) => redirect_error(jar, e.message(), SIBLINGS_PAGE),
    }
}
