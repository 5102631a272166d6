//! Server-rendered HTML pages
//!
//! Every form post redirects back to a listing page and leaves a one-shot
//! flash message in a cookie; the next page render shows it and clears it.

pub mod books;
pub mod loans;
pub mod siblings;
pub mod users;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
    Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use maud::{html, Markup, PreEscaped, DOCTYPE};
use serde::{Deserialize, Serialize};

use crate::{error::AppError, AppState};

const FLASH_COOKIE: &str = "flash";

const STYLE: &str = r#"
body { font-family: sans-serif; margin: 2rem auto; max-width: 60rem; }
nav a { margin-right: 1rem; }
table { border-collapse: collapse; width: 100%; margin: 1rem 0; }
th, td { border: 1px solid #ccc; padding: 0.4rem; text-align: left; }
form.inline { display: inline; }
.flash { padding: 0.6rem; margin: 1rem 0; border-radius: 4px; }
.flash.success { background: #e3f6e3; color: #1d5e1d; }
.flash.error { background: #fbe4e4; color: #8a1f1f; }
"#;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashKind {
    Success,
    Error,
}

impl FlashKind {
    fn css_class(self) -> &'static str {
        match self {
            FlashKind::Success => "flash success",
            FlashKind::Error => "flash error",
        }
    }
}

/// One-shot feedback message carried across a redirect
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub kind: FlashKind,
    pub message: String,
}

impl Flash {
    fn encode(&self) -> String {
        // Serializing two plain fields cannot fail
        let json = serde_json::to_vec(self).unwrap_or_default();
        URL_SAFE_NO_PAD.encode(json)
    }

    fn decode(value: &str) -> Option<Self> {
        let bytes = URL_SAFE_NO_PAD.decode(value).ok()?;
        serde_json::from_slice(&bytes).ok()
    }
}

/// Store a flash message and redirect
pub fn redirect_with(jar: CookieJar, kind: FlashKind, message: impl Into<String>, to: &str) -> Response {
    let flash = Flash {
        kind,
        message: message.into(),
    };
    let cookie = Cookie::build((FLASH_COOKIE, flash.encode()))
        .path("/")
        .http_only(true);
    (jar.add(cookie), Redirect::to(to)).into_response()
}

pub fn redirect_success(jar: CookieJar, message: impl Into<String>, to: &str) -> Response {
    redirect_with(jar, FlashKind::Success, message, to)
}

pub fn redirect_error(jar: CookieJar, message: impl Into<String>, to: &str) -> Response {
    redirect_with(jar, FlashKind::Error, message, to)
}

/// Read and clear the pending flash message
pub fn take_flash(jar: CookieJar) -> (CookieJar, Option<Flash>) {
    let Some(cookie) = jar.get(FLASH_COOKIE) else {
        return (jar, None);
    };
    let flash = Flash::decode(cookie.value());
    let jar = jar.remove(Cookie::build(FLASH_COOKIE).path("/"));
    (jar, flash)
}

/// Render a full page around `content`
pub fn layout(title: &str, flash: Option<&Flash>, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html {
            head {
                meta charset="utf-8";
                title { (title) " - Library" }
                style { (PreEscaped(STYLE)) }
            }
            body {
                nav {
                    a href="/ui" { "Home" }
                    a href="/ui/users" { "Users" }
                    a href="/ui/books" { "Books" }
                    a href="/ui/loans" { "Loans" }
                    a href="/ui/siblings" { "Siblings" }
                }
                @if let Some(flash) = flash {
                    div class=(flash.kind.css_class()) { (flash.message) }
                }
                main {
                    h1 { (title) }
                    (content)
                }
            }
        }
    }
}

/// Full page carrying the cleared flash cookie
pub fn page(jar: CookieJar, title: &str, content: Markup) -> (CookieJar, Markup) {
    let (jar, flash) = take_flash(jar);
    let markup = layout(title, flash.as_ref(), content);
    (jar, markup)
}

/// Errors raised while rendering a page, shown as HTML instead of JSON
#[derive(Debug)]
pub struct PageError(AppError);

impl From<AppError> for PageError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        let status = self.0.status_code();
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("Page failed: {}", self.0);
        }
        let title = status.canonical_reason().unwrap_or("Error");
        let body = layout(title, None, html! {
            p { (self.0.message()) }
            p { a href="/ui" { "Back to the library" } }
        });
        (status, body).into_response()
    }
}

pub type PageResult<T = (CookieJar, Markup)> = Result<T, PageError>;

/// Form text field: trimmed, with empty treated as absent
pub fn filled(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Parse a numeric form field
pub fn parse_number(value: &str, what: &str) -> Result<i32, String> {
    value
        .trim()
        .parse()
        .map_err(|_| format!("{} must be a number.", what))
}

async fn index(jar: CookieJar) -> (CookieJar, Markup) {
    page(jar, "Library Management System", html! {
        ul {
            li { a href="/ui/users" { "Manage users" } }
            li { a href="/ui/books" { "Manage books" } }
            li { a href="/ui/loans" { "Borrow and return books" } }
            li { a href="/ui/siblings" { "Sibling relationships" } }
        }
    })
}

/// HTML routes, mounted under `/ui`
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/users", get(users::users_page).post(users::users_submit))
        .route("/users/:id/edit", get(users::edit_user_page).post(users::edit_user_submit))
        .route("/users/:id/delete", post(users::delete_user_submit))
        .route("/books", get(books::books_page).post(books::books_submit))
        .route("/books/:id/edit", get(books::edit_book_page).post(books::edit_book_submit))
        .route("/books/:id/delete", post(books::delete_book_submit))
        .route("/loans", get(loans::loans_page).post(loans::loans_submit))
        .route("/siblings", get(siblings::siblings_page).post(siblings::siblings_submit))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flash_survives_cookie_encoding() {
        let flash = Flash {
            kind: FlashKind::Error,
            message: "Email already exists; try \"another\" one".into(),
        };
        let encoded = flash.encode();
        assert!(encoded.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
        assert_eq!(Flash::decode(&encoded), Some(flash));
        assert_eq!(Flash::decode("%%%"), None);
    }

    #[test]
    fn test_take_flash_reads_and_clears() {
        let flash = Flash {
            kind: FlashKind::Success,
            message: "User created successfully!".into(),
        };
        let jar = CookieJar::new().add(Cookie::new(FLASH_COOKIE, flash.encode()));
        let (jar, taken) = take_flash(jar);
        assert_eq!(taken, Some(flash));
        assert!(jar.get(FLASH_COOKIE).is_none());
    }

    #[test]
    fn test_layout_escapes_flash_text() {
        let flash = Flash {
            kind: FlashKind::Error,
            message: "<script>".into(),
        };
        let rendered = layout("Users", Some(&flash), html! {}).into_string();
        assert!(rendered.contains("&lt;script&gt;"));
        assert!(rendered.contains("flash error"));
    }

    #[test]
    fn test_form_helpers() {
        assert_eq!(filled(&Some("  Ann ".into())), Some("Ann".to_string()));
        assert_eq!(filled(&Some("   ".into())), None);
        assert_eq!(filled(&None), None);
        assert_eq!(parse_number(" 3 ", "Available copies"), Ok(3));
        assert_eq!(
            parse_number("three", "Available copies"),
            Err("Available copies must be a number.".to_string())
        );
    }
}
