//! API integration tests
//!
//! These drive a running server backed by a migrated database and Redis.

use reqwest::{Client, StatusCode};
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:8080/api/v1";

/// Register a fresh account and return its bearer token
async fn get_auth_token(client: &Client) -> String {
    let email = format!("it-{}@example.com", chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default());

    let response = client
        .post(format!("{}/auth/signup", BASE_URL))
        .json(&json!({
            "username": "integration",
            "email": email,
            "password": "secret"
        }))
        .send()
        .await
        .expect("Failed to send signup request");
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "email": email,
            "password": "secret"
        }))
        .send()
        .await
        .expect("Failed to send login request");

    let body: Value = response.json().await.expect("Failed to parse login response");
    body["token"].as_str().expect("No token in response").to_string()
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
async fn test_login_invalid_credentials() {
    let client = Client::new();

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "email": "nobody@example.com",
            "password": "wrong"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore]
async fn test_library_without_session() {
    let client = Client::new();

    let response = client
        .get(format!("{}/library", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore]
async fn test_library_round_trip() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    // Seeded by migrations
    let response = client
        .post(format!("{}/library", BASE_URL))
        .bearer_auth(&token)
        .json(&json!({ "book_url": "dune" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = client
        .post(format!("{}/library", BASE_URL))
        .bearer_auth(&token)
        .json(&json!({ "book_url": "dune" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = client
        .put(format!("{}/library/rating", BASE_URL))
        .bearer_auth(&token)
        .json(&json!({ "book_url": "dune", "rating": 6 }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = client
        .put(format!("{}/library/rating", BASE_URL))
        .bearer_auth(&token)
        .json(&json!({ "book_url": "dune", "rating": 2 }))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());

    let response = client
        .get(format!("{}/library", BASE_URL))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["result"][0]["book_url"], "dune");
    assert_eq!(body["result"][0]["rating"], 2);

    let response = client
        .delete(format!("{}/library/entry?book_url=dune", BASE_URL))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = client
        .get(format!("{}/library/entry?book_url=dune", BASE_URL))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["exists"], false);
}

#[tokio::test]
#[ignore]
async fn test_unknown_book() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    let response = client
        .post(format!("{}/library", BASE_URL))
        .bearer_auth(&token)
        .json(&json!({ "book_url": "no-such-book" }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore]
async fn test_list_books() {
    let client = Client::new();

    let response = client
        .get(format!("{}/books", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["items"].is_array());
    assert!(body["total"].is_number());
}
