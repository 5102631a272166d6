//! API integration tests against a running server

use std::time::{SystemTime, UNIX_EPOCH};

use reqwest::{Client, StatusCode};
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:8080";

/// Per-run suffix so unique columns do not collide between runs
fn unique_suffix() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock before epoch")
        .as_nanos()
}

async fn create(client: &Client, path: &str, body: Value) -> Value {
    let response = client
        .post(format!("{}/{}", BASE_URL, path))
        .json(&body)
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::CREATED, "creating {}", path);
    let body: Value = response.json().await.expect("Failed to parse response");
    body["data"].clone()
}

async fn create_user(client: &Client, first_name: &str) -> i64 {
    let user = create(
        client,
        "users",
        json!({
            "first_name": first_name,
            "last_name": "Tester",
            "email": format!("{}.{}@example.com", first_name.to_lowercase(), unique_suffix())
        }),
    )
    .await;
    user["id"].as_i64().expect("user id")
}

async fn create_book(client: &Client, copies: i64) -> i64 {
    let book = create(
        client,
        "books",
        json!({
            "title": "Integration Testing in Practice",
            "author": "A. Author",
            "isbn": format!("T-{}", unique_suffix() % 1_000_000_000_000),
            "available_copies": copies
        }),
    )
    .await;
    book["id"].as_i64().expect("book id")
}

async fn available_copies(client: &Client, book_id: i64) -> i64 {
    let body: Value = client
        .get(format!("{}/books/{}", BASE_URL, book_id))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    body["data"]["available_copies"].as_i64().expect("available_copies")
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "success");
    assert_eq!(body["message"], "Library Management System API");
}

#[tokio::test]
#[ignore]
async fn test_unknown_user_is_not_found() {
    let client = Client::new();

    let response = client
        .get(format!("{}/users/{}", BASE_URL, i32::MAX))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "error");
}

#[tokio::test]
#[ignore]
async fn test_create_user_missing_fields() {
    let client = Client::new();

    let response = client
        .post(format!("{}/users", BASE_URL))
        .json(&json!({ "first_name": "Ann" }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore]
async fn test_duplicate_email_conflicts() {
    let client = Client::new();
    let email = format!("dup.{}@example.com", unique_suffix());
    let body = json!({ "first_name": "Dup", "last_name": "Licate", "email": email });

    create(&client, "users", body.clone()).await;

    let response = client
        .post(format!("{}/users", BASE_URL))
        .json(&body)
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
#[ignore]
async fn test_changing_identifier_is_rejected() {
    let client = Client::new();
    let id = create_user(&client, "Ident").await;

    let response = client
        .put(format!("{}/users/{}", BASE_URL, id))
        .json(&json!({ "id": id + 1, "first_name": "Other" }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["message"], "Updating primary key is forbidden");
}

#[tokio::test]
#[ignore]
async fn test_sibling_link_is_canonical_and_unique() {
    let client = Client::new();
    let first = create_user(&client, "Elder").await;
    let second = create_user(&client, "Younger").await;

    // Submitted in reverse order, stored low/high
    let link = create(
        &client,
        "siblings",
        json!({ "user_id_1": second, "user_id_2": first }),
    )
    .await;
    assert_eq!(link["user_id_1"].as_i64(), Some(first.min(second)));
    assert_eq!(link["user_id_2"].as_i64(), Some(first.max(second)));

    let response = client
        .post(format!("{}/siblings", BASE_URL))
        .json(&json!({ "user_id_1": first, "user_id_2": second }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = client
        .post(format!("{}/siblings", BASE_URL))
        .json(&json!({ "user_id_1": first, "user_id_2": first }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Linked users cannot be deleted
    let response = client
        .delete(format!("{}/users/{}", BASE_URL, first))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = client
        .delete(format!("{}/siblings/{}", BASE_URL, link["sibling_id"]))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
#[ignore]
async fn test_loan_takes_and_returns_a_copy() {
    let client = Client::new();
    let user_id = create_user(&client, "Reader").await;
    let book_id = create_book(&client, 1).await;

    let loan = create(&client, "loans", json!({ "user_id": user_id, "book_id": book_id })).await;
    assert!(loan["returned_at"].is_null());
    assert_eq!(available_copies(&client, book_id).await, 0);

    let response = client
        .post(format!("{}/loans", BASE_URL))
        .json(&json!({ "user_id": user_id, "book_id": book_id }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["message"], "Book not available");

    // Books with loans cannot be deleted
    let response = client
        .delete(format!("{}/books/{}", BASE_URL, book_id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = client
        .post(format!("{}/loans/{}/return", BASE_URL, loan["id"]))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["data"]["returned_at"].is_string());
    assert_eq!(available_copies(&client, book_id).await, 1);

    let response = client
        .post(format!("{}/loans/{}/return", BASE_URL, loan["id"]))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
#[ignore]
async fn test_loan_rejects_bad_timestamp() {
    let client = Client::new();
    let user_id = create_user(&client, "Dated").await;
    let book_id = create_book(&client, 2).await;
    let loan = create(&client, "loans", json!({ "user_id": user_id, "book_id": book_id })).await;

    let response = client
        .put(format!("{}/loans/{}", BASE_URL, loan["id"]))
        .json(&json!({ "returned_at": "yesterday" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = client
        .put(format!("{}/loans/{}", BASE_URL, loan["id"]))
        .json(&json!({ "returned_at": "2024-03-01T10:00:00Z" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(available_copies(&client, book_id).await, 2);
}

#[tokio::test]
#[ignore]
async fn test_ui_pages_render() {
    let client = Client::new();

    for page in ["ui", "ui/users", "ui/books", "ui/loans", "ui/siblings"] {
        let response = client
            .get(format!("{}/{}", BASE_URL, page))
            .send()
            .await
            .expect("Failed to send request");
        assert_eq!(response.status(), StatusCode::OK, "rendering {}", page);
        let html = response.text().await.expect("Failed to read body");
        assert!(html.contains("<nav>"));
    }
}
