use cv_lens::{build_rocket, EnvironmentConfig, GeminiClient};
use rocket::http::{ContentType, Header, Status};
use rocket::local::asynchronous::Client;
use serde_json::json;

async fn test_client() -> Client {
    // the model client is never exercised by /create
    let config = EnvironmentConfig::default();
    let gemini = GeminiClient::new(&config, "test-key".to_string()).unwrap();
    Client::tracked(build_rocket(config, gemini))
        .await
        .expect("valid rocket instance")
}

#[tokio::test]
async fn returns_a_pdf_document() {
    let client = test_client().await;

    let response = client
        .post("/create")
        .header(ContentType::JSON)
        .body(json!({ "text": "Dear Hiring Manager,\nThank you." }).to_string())
        .dispatch()
        .await;

    assert_eq!(response.status(), Status::Ok);
    assert_eq!(response.content_type(), Some(ContentType::PDF));
    let body = response.into_bytes().await.unwrap();
    assert!(body.starts_with(b"%PDF"));
    assert!(!body.is_empty());
}

#[tokio::test]
async fn empty_text_still_renders_a_valid_document() {
    let client = test_client().await;

    let response = client
        .post("/create")
        .header(ContentType::JSON)
        .body(json!({ "text": "" }).to_string())
        .dispatch()
        .await;

    assert_eq!(response.status(), Status::Ok);
    assert_eq!(response.content_type(), Some(ContentType::PDF));
    let body = response.into_bytes().await.unwrap();
    assert!(body.starts_with(b"%PDF"));
}

#[tokio::test]
async fn identical_input_renders_structurally_equivalent_documents() {
    let client = test_client().await;
    let payload = json!({ "text": "Dear Hiring Manager,\nThank you." }).to_string();

    let first = client
        .post("/create")
        .header(ContentType::JSON)
        .body(payload.clone())
        .dispatch()
        .await;
    let second = client
        .post("/create")
        .header(ContentType::JSON)
        .body(payload)
        .dispatch()
        .await;

    assert_eq!(first.status(), Status::Ok);
    assert_eq!(second.status(), Status::Ok);

    let first = first.into_bytes().await.unwrap();
    let second = second.into_bytes().await.unwrap();
    assert!(first.starts_with(b"%PDF"));
    assert!(second.starts_with(b"%PDF"));
    // the layout engine embeds a creation timestamp, so compare structure
    // rather than raw bytes
    assert_eq!(first.len(), second.len());
}

#[tokio::test]
async fn long_letters_paginate_instead_of_failing() {
    let client = test_client().await;
    let long_text = "I am writing to express my interest in the role.\n".repeat(300);

    let response = client
        .post("/create")
        .header(ContentType::JSON)
        .body(json!({ "text": long_text }).to_string())
        .dispatch()
        .await;

    assert_eq!(response.status(), Status::Ok);
    let body = response.into_bytes().await.unwrap();
    assert!(body.starts_with(b"%PDF"));
}

#[tokio::test]
async fn missing_text_field_is_a_client_error() {
    let client = test_client().await;

    let response = client
        .post("/create")
        .header(ContentType::JSON)
        .body(json!({ "body": "wrong field" }).to_string())
        .dispatch()
        .await;

    assert_ne!(response.status(), Status::Ok);
    assert!(response.status().code < 500);
}

#[tokio::test]
async fn allow_listed_origin_gets_cors_headers() {
    let client = test_client().await;

    let response = client
        .post("/create")
        .header(ContentType::JSON)
        .header(Header::new("Origin", "http://localhost:3000"))
        .body(json!({ "text": "Hello" }).to_string())
        .dispatch()
        .await;

    assert_eq!(
        response
            .headers()
            .get_one("Access-Control-Allow-Origin"),
        Some("http://localhost:3000")
    );
    assert_eq!(
        response
            .headers()
            .get_one("Access-Control-Allow-Credentials"),
        Some("true")
    );
}

#[tokio::test]
async fn unknown_origin_gets_no_cors_headers() {
    let client = test_client().await;

    let response = client
        .post("/create")
        .header(ContentType::JSON)
        .header(Header::new("Origin", "https://evil.example.com"))
        .body(json!({ "text": "Hello" }).to_string())
        .dispatch()
        .await;

    assert!(response
        .headers()
        .get_one("Access-Control-Allow-Origin")
        .is_none());
}

#[tokio::test]
async fn preflight_requests_succeed() {
    let client = test_client().await;

    let response = client
        .options("/create")
        .header(Header::new("Origin", "http://localhost:3000"))
        .dispatch()
        .await;

    assert_eq!(response.status(), Status::Ok);
    assert_eq!(
        response
            .headers()
            .get_one("Access-Control-Allow-Origin"),
        Some("http://localhost:3000")
    );
}
