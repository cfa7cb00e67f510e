//! API integration tests.
//!
//! These run against a live server with the bootstrap librarian
//! configured (librarian@example.com / admin123):
//! `cargo test -- --ignored`

use reqwest::Client;
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:8080";

/// Unique suffix so repeated runs do not collide on unique columns
fn unique_suffix() -> u128 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos()
}

/// Helper to get a librarian token
async fn get_librarian_token(client: &Client) -> String {
    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "email": "librarian@example.com",
            "password": "admin123"
        }))
        .send()
        .await
        .expect("Failed to send login request");

    let body: Value = response.json().await.expect("Failed to parse login response");
    body["data"]["access_token"]
        .as_str()
        .expect("No token in response")
        .to_string()
}

/// Helper to create a member and return (id, email, password)
async fn create_member(client: &Client, token: &str) -> (i64, String, String) {
    let email = format!("member{}@example.com", unique_suffix());
    let password = "reading-room".to_string();

    let response = client
        .post(format!("{}/auth/signup", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "name": "Test Member",
            "email": email,
            "password": password
        }))
        .send()
        .await
        .expect("Failed to send signup request");

    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse signup response");
    assert_eq!(body["status"], "success");
    let id = body["data"]["id"].as_i64().expect("No member ID");

    (id, email, password)
}

/// Helper to add a book and return its id
async fn add_book(client: &Client, token: &str, title: &str, stock: i64) -> i64 {
    let response = client
        .post(format!("{}/books/", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "title": title,
            "author": "Integration Author",
            "stock": stock,
            "per_day_fee": "10.00"
        }))
        .send()
        .await
        .expect("Failed to send add book request");

    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse add book response");
    body["data"]["id"].as_i64().expect("No book ID")
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
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_login() {
    let client = Client::new();

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "email": "librarian@example.com",
            "password": "admin123"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "success");
    assert!(body["data"]["access_token"].is_string());
}

#[tokio::test]
#[ignore]
async fn test_login_invalid_credentials() {
    let client = Client::new();

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "email": "librarian@example.com",
            "password": "wrong"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "error");
    assert_eq!(body["data"], json!({}));
}

#[tokio::test]
#[ignore]
async fn test_login_missing_fields() {
    let client = Client::new();

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({ "email": "librarian@example.com" }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 422);
}

#[tokio::test]
#[ignore]
async fn test_public_book_listing() {
    let client = Client::new();

    // No token: the catalog is public
    let response = client
        .get(format!("{}/books/", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "success");
    assert!(body["data"].is_array());
}

#[tokio::test]
#[ignore]
async fn test_book_round_trip() {
    let client = Client::new();
    let token = get_librarian_token(&client).await;

    let title = format!("Round Trip {}", unique_suffix());
    let book_id = add_book(&client, &token, &title, 2).await;

    // The new book is findable by exact title
    let response = client
        .get(format!("{}/books/?title={}", BASE_URL, title))
        .send()
        .await
        .expect("Failed to send request");
    let body: Value = response.json().await.expect("Failed to parse response");
    let found = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .any(|b| b["id"].as_i64() == Some(book_id));
    assert!(found, "created book missing from search results");

    // Delete and verify it is gone from the same query
    let response = client
        .delete(format!("{}/books/{}", BASE_URL, book_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());

    let response = client
        .get(format!("{}/books/?title={}", BASE_URL, title))
        .send()
        .await
        .expect("Failed to send request");
    let body: Value = response.json().await.expect("Failed to parse response");
    let found = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .any(|b| b["id"].as_i64() == Some(book_id));
    assert!(!found, "deleted book still in search results");
}

#[tokio::test]
#[ignore]
async fn test_member_token_cannot_manage_catalog() {
    let client = Client::new();
    let token = get_librarian_token(&client).await;
    let (_, email, password) = create_member(&client, &token).await;

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({ "email": email, "password": password }))
        .send()
        .await
        .expect("Failed to send request");
    let body: Value = response.json().await.expect("Failed to parse response");
    let member_token = body["data"]["access_token"].as_str().unwrap().to_string();

    // A member token is authenticated but not authorized
    let response = client
        .post(format!("{}/books/", BASE_URL))
        .header("Authorization", format!("Bearer {}", member_token))
        .json(&json!({ "title": "Nope", "author": "Nope" }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 403);
}

#[tokio::test]
#[ignore]
async fn test_issue_and_return_flow() {
    let client = Client::new();
    let token = get_librarian_token(&client).await;
    let (member_id, _, _) = create_member(&client, &token).await;
    let title = format!("Lending Flow {}", unique_suffix());
    let book_id = add_book(&client, &token, &title, 1).await;

    // Issue the only copy
    let response = client
        .post(format!("{}/transactions/issue", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "member_id": member_id, "book_id": book_id }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.expect("Failed to parse response");
    let transaction_id = body["data"]["transaction_id"].as_i64().expect("No transaction ID");

    // Second issue fails: out of stock
    let response = client
        .post(format!("{}/transactions/issue", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "member_id": member_id, "book_id": book_id }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 400);

    // Return bills a minimum of one day
    let response = client
        .post(format!("{}/transactions/return", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "transaction_id": transaction_id }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["data"]["transaction_id"].as_i64(), Some(transaction_id));
    assert_eq!(body["data"]["days_held"].as_i64(), Some(1));

    let fee = body["data"]["fee"].clone();

    // The fee landed on the member's debt, exactly
    let response = client
        .get(format!("{}/auth/members", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");
    let body: Value = response.json().await.expect("Failed to parse response");
    let member = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .find(|m| m["id"].as_i64() == Some(member_id))
        .expect("member missing from roster")
        .clone();
    assert_eq!(member["debt"], fee);

    // A second return on the same transaction is rejected
    let response = client
        .post(format!("{}/transactions/return", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "transaction_id": transaction_id }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 404);

    // Stock is back, so a fresh issue succeeds again
    let response = client
        .post(format!("{}/transactions/issue", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "member_id": member_id, "book_id": book_id }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 200);

    // The ledger lists both transactions, enriched with names
    let response = client
        .get(format!("{}/transactions/", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.expect("Failed to parse response");
    let entries: Vec<&Value> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|t| t["book_id"].as_i64() == Some(book_id))
        .collect();
    assert_eq!(entries.len(), 2);
    assert!(entries.iter().all(|t| t["book_title"].as_str() == Some(title.as_str())));
}

#[tokio::test]
#[ignore]
async fn test_debt_limit_blocks_issue() {
    let client = Client::new();
    let token = get_librarian_token(&client).await;
    let (member_id, _, _) = create_member(&client, &token).await;

    // An expensive one-day fee pushes the member past the 500 limit
    let title = format!("Expensive {}", unique_suffix());
    let response = client
        .post(format!("{}/books/", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "title": title,
            "author": "Integration Author",
            "stock": 2,
            "per_day_fee": "600.00"
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse response");
    let book_id = body["data"]["id"].as_i64().expect("No book ID");

    let response = client
        .post(format!("{}/transactions/issue", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "member_id": member_id, "book_id": book_id }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.expect("Failed to parse response");
    let transaction_id = body["data"]["transaction_id"].as_i64().unwrap();

    let response = client
        .post(format!("{}/transactions/return", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "transaction_id": transaction_id }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 200);

    // Debt is now 600: the next issue is rejected and leaves no trace
    let response = client
        .post(format!("{}/transactions/issue", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "member_id": member_id, "book_id": book_id }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 400);

    // Stock is untouched by the rejected issue
    let response = client
        .get(format!("{}/books/?title={}", BASE_URL, title))
        .send()
        .await
        .expect("Failed to send request");
    let body: Value = response.json().await.expect("Failed to parse response");
    let book = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .find(|b| b["id"].as_i64() == Some(book_id))
        .expect("book missing from search results")
        .clone();
    assert_eq!(book["stock"].as_i64(), Some(2));
}

#[tokio::test]
#[ignore]
async fn test_issue_unknown_member() {
    let client = Client::new();
    let token = get_librarian_token(&client).await;
    let title = format!("Orphan Issue {}", unique_suffix());
    let book_id = add_book(&client, &token, &title, 1).await;

    let response = client
        .post(format!("{}/transactions/issue", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "member_id": 0, "book_id": book_id }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 404);
}

#[tokio::test]
#[ignore]
async fn test_unauthorized_access() {
    let client = Client::new();

    let response = client
        .get(format!("{}/transactions/", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
}

#[tokio::test]
#[ignore]
async fn test_duplicate_signup_conflicts() {
    let client = Client::new();
    let token = get_librarian_token(&client).await;
    let (_, email, _) = create_member(&client, &token).await;

    let response = client
        .post(format!("{}/auth/signup", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "name": "Duplicate",
            "email": email,
            "password": "whatever"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 409);
}

#[tokio::test]
#[ignore]
async fn test_member_crud() {
    let client = Client::new();
    let token = get_librarian_token(&client).await;
    let (member_id, _, _) = create_member(&client, &token).await;

    // Update the member's name
    let response = client
        .put(format!("{}/auth/members/{}", BASE_URL, member_id))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "name": "Renamed Member" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 200);

    // The roster reflects the change
    let response = client
        .get(format!("{}/auth/members", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");
    let body: Value = response.json().await.expect("Failed to parse response");
    let member = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .find(|m| m["id"].as_i64() == Some(member_id))
        .expect("member missing from roster")
        .clone();
    assert_eq!(member["name"].as_str(), Some("Renamed Member"));

    // Delete and verify a second delete is a 404
    let response = client
        .delete(format!("{}/auth/members/{}", BASE_URL, member_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 200);

    let response = client
        .delete(format!("{}/auth/members/{}", BASE_URL, member_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 404);
}
