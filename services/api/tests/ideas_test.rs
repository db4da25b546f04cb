//! Idea refinement and submission tests

mod common;

use common::{forwarded_for, spawn_app, TestOptions};
use serde_json::{json, Value};

fn complete_submission() -> Value {
    json!({
        "email": "nina@example.com",
        "idea": "meal plans for shift workers",
        "problem_statement": "Shift workers struggle to eat well",
        "target_audience": "Night shift nurses",
    })
}

#[tokio::test]
async fn test_refine_returns_both_fields() {
    let app = spawn_app(TestOptions::default()).await;

    let response = app
        .server
        .post("/api/refine-idea")
        .json(&json!({ "idea": "dating site for introverts" }))
        .await;

    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["target_audience"], "Introverted singles");
    assert!(body["problem_statement"].as_str().is_some());
    assert_eq!(
        app.refiner.seen.lock().unwrap().as_slice(),
        ["dating site for introverts".to_string()]
    );
}

#[tokio::test]
async fn test_refine_without_a_key_is_unavailable() {
    let app = spawn_app(TestOptions {
        with_refiner: false,
        ..TestOptions::default()
    })
    .await;

    let response = app
        .server
        .post("/api/refine-idea")
        .json(&json!({ "idea": "dating site for introverts" }))
        .await;

    assert_eq!(response.status_code(), 503);
    let body: Value = response.json();
    assert_eq!(body["message"], "OpenAI service not configured");
}

#[tokio::test]
async fn test_refine_requires_an_idea() {
    let app = spawn_app(TestOptions::default()).await;

    let response = app
        .server
        .post("/api/refine-idea")
        .json(&json!({ "idea": "   " }))
        .await;

    assert_eq!(response.status_code(), 400);
    let body: Value = response.json();
    assert_eq!(body["message"], "Idea is required");
    assert!(app.refiner.seen.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_refine_failure_is_a_server_error() {
    let app = spawn_app(TestOptions {
        refiner_fails: true,
        ..TestOptions::default()
    })
    .await;

    let response = app
        .server
        .post("/api/refine-idea")
        .json(&json!({ "idea": "dating site for introverts" }))
        .await;

    assert_eq!(response.status_code(), 500);
    let body: Value = response.json();
    assert_eq!(body["message"], "Failed to refine idea");
}

#[tokio::test]
async fn test_submit_returns_the_analysis_response() {
    let app = spawn_app(TestOptions::default()).await;

    let response = app
        .server
        .post("/api/submit-idea")
        .json(&complete_submission())
        .await;

    assert_eq!(response.status_code(), 200);
    assert_eq!(response.json::<Value>(), json!({ "status": "queued", "score": 87 }));

    let forwarded = app.scorer.submissions.lock().unwrap();
    assert_eq!(forwarded.len(), 1);
    assert_eq!(forwarded[0].idea, "meal plans for shift workers");
}

#[tokio::test]
async fn test_submit_acknowledges_when_the_analysis_api_fails() {
    let app = spawn_app(TestOptions {
        scorer_fails: true,
        ..TestOptions::default()
    })
    .await;

    let response = app
        .server
        .post("/api/submit-idea")
        .json(&complete_submission())
        .await;

    assert_eq!(response.status_code(), 200);
    assert_eq!(
        response.json::<Value>(),
        json!({
            "message": "Thank you! We'll analyze your idea and send the results to your email shortly.",
            "status": "success",
        })
    );
}

#[tokio::test]
async fn test_submit_reports_field_errors() {
    let app = spawn_app(TestOptions::default()).await;

    let response = app
        .server
        .post("/api/submit-idea")
        .json(&json!({ "email": "nope", "idea": "x" }))
        .await;

    assert_eq!(response.status_code(), 400);
    let body: Value = response.json();
    assert_eq!(body["message"], "Validation error");
    let fields: Vec<&str> = body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|e| e["field"].as_str())
        .collect();
    assert_eq!(fields, ["email", "problem_statement", "target_audience"]);
    assert!(app.scorer.submissions.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_sixth_submission_from_one_client_is_rate_limited() {
    let app = spawn_app(TestOptions::default()).await;

    for _ in 0..5 {
        let (name, value) = forwarded_for("203.0.113.50");
        let response = app
            .server
            .post("/api/submit-idea")
            .add_header(name, value)
            .json(&complete_submission())
            .await;
        assert_eq!(response.status_code(), 200);
    }

    let (name, value) = forwarded_for("203.0.113.50");
    let response = app
        .server
        .post("/api/submit-idea")
        .add_header(name, value)
        .json(&complete_submission())
        .await;

    assert_eq!(response.status_code(), 429);
    let body: Value = response.json();
    assert_eq!(body["message"], "Too many submissions from this IP, please try again");
    assert_eq!(app.scorer.submissions.lock().unwrap().len(), 5);
}
