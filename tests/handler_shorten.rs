mod common;

use axum::{Router, routing::post};
use axum_test::TestServer;
use serde_json::json;
use shortlink::api::handlers::{batch_shorten_handler, shorten_handler};
use shortlink::domain::repositories::LinkRepository;
use shortlink::state::AppState;

fn shorten_app(state: AppState) -> TestServer {
    let app = Router::new()
        .route("/shorten", post(shorten_handler))
        .route("/shorten/batch", post(batch_shorten_handler))
        .with_state(state);

    TestServer::new(app).unwrap()
}

#[tokio::test]
async fn test_shorten_single_url_success() {
    let ctx = common::create_test_state();
    let server = shorten_app(ctx.state);

    let response = server
        .post("/shorten")
        .json(&json!({ "targetUrl": "https://example.com/some/long/path" }))
        .await;

    response.assert_status_ok();

    let json = response.json::<serde_json::Value>();
    let code = json["code"].as_str().unwrap();
    assert_eq!(code.len(), 6);
    assert_eq!(json["shortUrl"], format!("{}/{}", common::BASE_URL, code));
    assert_eq!(json["targetUrl"], "https://example.com/some/long/path");
    assert_eq!(json["createdAt"], "2026-03-01T10:00:00Z");

    let stored = ctx.store.find_by_code(code).await.unwrap().unwrap();
    assert_eq!(stored.target_url, "https://example.com/some/long/path");
    assert!(!stored.custom);
}

#[tokio::test]
async fn test_shorten_defaults_to_thirty_minutes() {
    let ctx = common::create_test_state();
    let server = shorten_app(ctx.state);

    let response = server
        .post("/shorten")
        .json(&json!({ "targetUrl": "https://example.com" }))
        .await;

    response.assert_status_ok();
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["expiresAt"], "2026-03-01T10:30:00Z");
}

#[tokio::test]
async fn test_shorten_with_form_field_names() {
    let ctx = common::create_test_state();
    let server = shorten_app(ctx.state);

    let response = server
        .post("/shorten")
        .json(&json!({
            "url": "https://example.com",
            "validity": "90",
            "shortcode": "form-code"
        }))
        .await;

    response.assert_status_ok();
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["code"], "form-code");
    assert_eq!(json["expiresAt"], "2026-03-01T11:30:00Z");
}

#[tokio::test]
async fn test_shorten_unparsable_validity_uses_default() {
    let ctx = common::create_test_state();
    let server = shorten_app(ctx.state);

    let response = server
        .post("/shorten")
        .json(&json!({ "targetUrl": "https://example.com", "validityMinutes": "tomorrow" }))
        .await;

    response.assert_status_ok();
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["expiresAt"], "2026-03-01T10:30:00Z");
}

#[tokio::test]
async fn test_shorten_with_custom_code() {
    let ctx = common::create_test_state();
    let server = shorten_app(ctx.state);

    let response = server
        .post("/shorten")
        .json(&json!({
            "targetUrl": "https://example.com",
            "customCode": "mycode123"
        }))
        .await;

    response.assert_status_ok();
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["code"], "mycode123");

    let stored = ctx.store.find_by_code("mycode123").await.unwrap().unwrap();
    assert!(stored.custom);
}

#[tokio::test]
async fn test_shorten_custom_code_taken() {
    let ctx = common::create_test_state();
    common::create_test_link(&ctx.store, "taken", "https://first.example.com", 30).await;
    let server = shorten_app(ctx.state);

    let response = server
        .post("/shorten")
        .json(&json!({
            "targetUrl": "https://second.example.com",
            "customCode": "taken"
        }))
        .await;

    response.assert_status(axum::http::StatusCode::CONFLICT);
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["error"]["code"], "code_taken");

    let stored = ctx.store.find_by_code("taken").await.unwrap().unwrap();
    assert_eq!(stored.target_url, "https://first.example.com");
}

#[tokio::test]
async fn test_shorten_reserved_custom_code() {
    let ctx = common::create_test_state();
    let server = shorten_app(ctx.state);

    let response = server
        .post("/shorten")
        .json(&json!({ "targetUrl": "https://example.com", "customCode": "health" }))
        .await;

    response.assert_status_bad_request();
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["error"]["code"], "invalid_code");
}

#[tokio::test]
async fn test_shorten_invalid_url() {
    let ctx = common::create_test_state();
    let server = shorten_app(ctx.state);

    let response = server
        .post("/shorten")
        .json(&json!({ "targetUrl": "notaurl" }))
        .await;

    response.assert_status_bad_request();
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["error"]["code"], "invalid_url");
    assert_eq!(ctx.store.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_shorten_rejects_url_unusable_as_location_header() {
    let ctx = common::create_test_state();
    let server = shorten_app(ctx.state);

    for target in ["https://example.com/a\nb", "https://example.com/a\tb"] {
        let response = server
            .post("/shorten")
            .json(&json!({ "targetUrl": target }))
            .await;

        response.assert_status_bad_request();
        let json = response.json::<serde_json::Value>();
        assert_eq!(json["error"]["code"], "invalid_url");
    }

    assert_eq!(ctx.store.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_shorten_truncates_fractional_validity() {
    let ctx = common::create_test_state();
    let server = shorten_app(ctx.state);

    let response = server
        .post("/shorten")
        .json(&json!({ "url": "https://example.com", "validity": "10.5" }))
        .await;

    response.assert_status_ok();
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["expiresAt"], "2026-03-01T10:10:00Z");
}

#[tokio::test]
async fn test_shorten_url_too_long() {
    let ctx = common::create_test_state();
    let server = shorten_app(ctx.state);

    let response = server
        .post("/shorten")
        .json(&json!({ "targetUrl": format!("https://example.com/{}", "a".repeat(2100)) }))
        .await;

    response.assert_status_bad_request();
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["error"]["code"], "validation_error");
}

#[tokio::test]
async fn test_shorten_exhausted_code_space() {
    let generator = shortlink::utils::code_generator::RandomCodeGenerator::new("x", 1).unwrap();
    let ctx = common::create_test_state_with(
        std::sync::Arc::new(shortlink::infrastructure::cache::NullCache::new()),
        generator,
        3,
    );
    let server = shorten_app(ctx.state);

    server
        .post("/shorten")
        .json(&json!({ "targetUrl": "https://example.com/one" }))
        .await
        .assert_status_ok();

    let response = server
        .post("/shorten")
        .json(&json!({ "targetUrl": "https://example.com/two" }))
        .await;

    response.assert_status(axum::http::StatusCode::SERVICE_UNAVAILABLE);
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["error"]["code"], "allocation_exhausted");
    assert_eq!(ctx.store.count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_batch_shorten_mixed_results() {
    let ctx = common::create_test_state();
    let server = shorten_app(ctx.state);

    let response = server
        .post("/shorten/batch")
        .json(&json!({
            "urls": [
                { "targetUrl": "https://example.com" },
                { "url": "notaurl" },
                { "targetUrl": "https://rust-lang.org", "customCode": "rusty" }
            ]
        }))
        .await;

    response.assert_status_ok();

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["summary"]["total"], 3);
    assert_eq!(json["summary"]["successful"], 2);
    assert_eq!(json["summary"]["failed"], 1);

    let items = json["items"].as_array().unwrap();
    assert!(items[0]["code"].is_string());
    assert!(items[0]["shortUrl"].is_string());
    assert_eq!(items[1]["targetUrl"], "notaurl");
    assert_eq!(items[1]["error"]["code"], "invalid_url");
    assert_eq!(items[2]["code"], "rusty");

    assert_eq!(ctx.store.count().await.unwrap(), 2);
}

#[tokio::test]
async fn test_batch_shorten_too_many_urls() {
    let ctx = common::create_test_state();
    let server = shorten_app(ctx.state);

    let urls: Vec<_> = (0..6)
        .map(|i| json!({ "targetUrl": format!("https://example{}.com", i) }))
        .collect();

    let response = server
        .post("/shorten/batch")
        .json(&json!({ "urls": urls }))
        .await;

    response.assert_status_bad_request();
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["error"]["code"], "validation_error");
    assert_eq!(ctx.store.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_batch_shorten_empty() {
    let ctx = common::create_test_state();
    let server = shorten_app(ctx.state);

    let response = server
        .post("/shorten/batch")
        .json(&json!({ "urls": [] }))
        .await;

    response.assert_status_bad_request();
}
