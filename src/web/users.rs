//! User pages

use axum::{
    extract::{Path, State},
    response::Response,
    Form,
};
use axum_extra::extract::cookie::CookieJar;
use maud::{html, Markup};
use serde::Deserialize;

use super::{filled, page, redirect_error, redirect_success, PageResult};
use crate::{
    error::AppError,
    models::user::{CreateUser, UpdateUser, User},
    AppState,
};

const USERS_PAGE: &str = "/ui/users";

#[derive(Debug, Deserialize)]
pub struct UserForm {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
}

fn user_fields(user: Option<&User>) -> Markup {
    html! {
        label { "First name " input name="first_name" value=[user.map(|u| &u.first_name)]; }
        " "
        label { "Last name " input name="last_name" value=[user.map(|u| &u.last_name)]; }
        " "
        label { "Email " input name="email" type="email" value=[user.map(|u| &u.email)]; }
    }
}

pub async fn users_page(State(state): State<AppState>, jar: CookieJar) -> PageResult {
    let users = state.services.users.list().await?;

    Ok(page(jar, "Users", html! {
        form method="post" action=(USERS_PAGE) {
            (user_fields(None))
            " "
            button type="submit" { "Add user" }
        }
        table {
            tr { th { "ID" } th { "Name" } th { "Email" } th { "Created" } th {} }
            @for user in &users {
                tr {
                    td { (user.id) }
                    td { (user.full_name) }
                    td { (user.email) }
                    td { (user.created_at.format("%Y-%m-%d %H:%M")) }
                    td {
                        a href={ "/ui/users/" (user.id) "/edit" } { "Edit" }
                        " "
                        form.inline method="post" action={ "/ui/users/" (user.id) "/delete" } {
                            button type="submit" { "Delete" }
                        }
                    }
                }
            }
        }
    }))
}

pub async fn users_submit(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<UserForm>,
) -> Response {
    let (Some(first_name), Some(last_name), Some(email)) =
        (filled(&form.first_name), filled(&form.last_name), filled(&form.email))
    else {
        return redirect_error(jar, "First and Last Name and Email are required", USERS_PAGE);
    };

    let data = CreateUser {
        first_name,
        last_name,
        email,
    };
    match state.services.users.create(data).await {
        Ok(_) => redirect_success(jar, "User created successfully!", USERS_PAGE),
        Err(e) => redirect_error(jar, e.message(), USERS_PAGE),
    }
}

pub async fn edit_user_page(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(id): Path<i32>,
) -> PageResult {
    let user = state.services.users.get_by_id(id).await?;

    Ok(page(jar, "Edit user", html! {
        form method="post" action={ "/ui/users/" (user.id) "/edit" } {
            (user_fields(Some(&user)))
            " "
            button type="submit" { "Save" }
        }
        p { a href=(USERS_PAGE) { "Back to users" } }
    }))
}

pub async fn edit_user_submit(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(id): Path<i32>,
    Form(form): Form<UserForm>,
) -> Response {
    let data = UpdateUser {
        id: None,
        first_name: filled(&form.first_name),
        last_name: filled(&form.last_name),
        email: filled(&form.email),
    };
    if data.is_empty() {
        return redirect_success(jar, "Nothing to update.", USERS_PAGE);
    }

    let edit_page = format!("/ui/users/{}/edit", id);
    match state.services.users.update(id, data).await {
        Ok(_) => redirect_success(jar, "User updated successfully!", USERS_PAGE),
        Err(e @ (AppError::Conflict(_) | AppError::Validation(_))) => {
            redirect_error(jar, e.message(), &edit_page)
        }
        Err(e) => redirect_error(jar, format!("Error updating user: {}", e.message()), USERS_PAGE),
    }
}

pub async fn delete_user_submit(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(id): Path<i32>,
) -> Response {
    match state.services.users.delete(id).await {
        Ok(()) => redirect_success(jar, "User deleted successfully!", USERS_PAGE),
        Err(e) => redirect_error(jar, e.message(), USERS_PAGE),
    }
}
