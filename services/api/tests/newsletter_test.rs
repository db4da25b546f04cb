//! Waitlist signup tests

mod common;

use common::{spawn_app, NewsletterFailure, TestOptions};
use rstest::rstest;
use launchpad_core::ports::DatabaseService;
use serde_json::json;

const WELCOME: &str = "Welcome to dassyor! We'll notify you when we launch.";

#[tokio::test]
async fn test_signup_is_stored_and_welcomed() {
    let app = spawn_app(TestOptions::default()).await;

    let response = app
        .server
        .post("/api/newsletter")
        .json(&json!({ "name": "Ada", "email": "ada@example.com", "telegramUsername": "@ada" }))
        .await;

    assert_eq!(response.status_code(), 200);
    let body: serde_json::Value = response.json();
    assert_eq!(body["message"], WELCOME);
    assert_eq!(body["status"], "success");

    let stored = app.db.list_newsletters().await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].telegram_username.as_deref(), Some("@ada"));
}

#[tokio::test]
async fn test_duplicate_email_ignoring_case_is_not_stored_twice() {
    let app = spawn_app(TestOptions::default()).await;

    let first = app
        .server
        .post("/api/newsletter")
        .json(&json!({ "name": "Ada", "email": "ada@example.com" }))
        .await;
    let second = app
        .server
        .post("/api/newsletter")
        .json(&json!({ "name": "Ada again", "email": "ADA@Example.com" }))
        .await;

    assert_eq!(first.status_code(), 200);
    assert_eq!(second.status_code(), 200);
    assert_eq!(
        first.json::<serde_json::Value>(),
        second.json::<serde_json::Value>()
    );
    assert_eq!(app.db.list_newsletters().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_invalid_email_is_rejected() {
    let app = spawn_app(TestOptions::default()).await;

    let response = app
        .server
        .post("/api/newsletter")
        .json(&json!({ "name": "Ada", "email": "not-an-email" }))
        .await;

    assert_eq!(response.status_code(), 400);
    let body: serde_json::Value = response.json();
    assert_eq!(body["message"], "Invalid email format");
    assert!(app.db.list_newsletters().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_missing_fields_are_rejected_like_a_bad_email() {
    let app = spawn_app(TestOptions::default()).await;

    let response = app
        .server
        .post("/api/newsletter")
        .json(&json!({ "email": "ada@example.com" }))
        .await;

    assert_eq!(response.status_code(), 400);
    let body: serde_json::Value = response.json();
    assert_eq!(body["message"], "Invalid email format");
}

#[rstest]
#[case(NewsletterFailure::Lookup)]
#[case(NewsletterFailure::Insert)]
#[tokio::test]
async fn test_storage_failure_still_reports_success(#[case] failure: NewsletterFailure) {
    let app = spawn_app(TestOptions {
        newsletter_failure: Some(failure),
        ..TestOptions::default()
    })
    .await;

    let response = app
        .server
        .post("/api/newsletter")
        .json(&json!({ "name": "Ada", "email": "ada@example.com" }))
        .await;

    assert_eq!(response.status_code(), 200);
    let body: serde_json::Value = response.json();
    assert_eq!(body["message"], WELCOME);
    assert_eq!(body["status"], "success");
    assert!(app.db.list_newsletters().await.unwrap().is_empty());
}
