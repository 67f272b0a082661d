//! Integration tests for the service surface: error shaping, submission
//! validation, liveness, and static frontend hosting.

use std::fs;

use axum::http::StatusCode;
use serde_json::json;

mod common;

#[tokio::test]
async fn test_store_failure_surfaces_generic_error() {
    let config = common::test_config(28421);
    let shutdown = common::spawn_server(config).await;

    let client = common::client();
    let res = client
        .get("http://127.0.0.1:28421/otherservice")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = res.text().await.unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(parsed["error"], "Internal server error");

    // The driver's error text must never leak to callers.
    let lowered = body.to_lowercase();
    assert!(!lowered.contains("postgres"));
    assert!(!lowered.contains("connection refused"));
    assert!(!lowered.contains("59999"));

    shutdown.trigger();
}

#[tokio::test]
async fn test_submission_with_empty_field_rejected() {
    let config = common::test_config(28422);
    let shutdown = common::spawn_server(config).await;

    let client = common::client();
    let res = client
        .post("http://127.0.0.1:28422/form_request")
        .json(&json!({
            "name": "Alice",
            "number": "",
            "email": "a@example.com",
            "message": "hi"
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "Missing required field: number");

    // An absent key is caught by deserialization.
    let res = client
        .post("http://127.0.0.1:28422/form_request")
        .json(&json!({
            "name": "Alice",
            "email": "a@example.com",
            "message": "hi"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);

    shutdown.trigger();
}

/// Requires a reachable PostgreSQL; provide TEST_DATABASE_URL and run
/// with `cargo test -- --ignored`.
#[tokio::test]
#[ignore]
async fn test_submission_round_trip() {
    let url = std::env::var("TEST_DATABASE_URL").expect("TEST_DATABASE_URL not set");

    let pool = sqlx::PgPool::connect(&url).await.unwrap();
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS form_request (\
             id SERIAL PRIMARY KEY, \
             name TEXT NOT NULL, \
             number TEXT NOT NULL, \
             email TEXT NOT NULL, \
             message TEXT NOT NULL, \
             created_at TIMESTAMPTZ NOT NULL DEFAULT now())",
    )
    .execute(&pool)
    .await
    .unwrap();

    let mut config = common::test_config(28425);
    config.database.url = url;
    let shutdown = common::spawn_server(config).await;

    let client = common::client();
    let res = client
        .post("http://127.0.0.1:28425/form_request")
        .json(&json!({
            "name": "Alice",
            "number": "555-0100",
            "email": "a@example.com",
            "message": "hi"
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::CREATED);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["message"], "Request submitted successfully");

    let data = &body["data"];
    assert!(data["id"].is_number());
    assert_eq!(data["name"], "Alice");
    assert_eq!(data["number"], "555-0100");
    assert_eq!(data["email"], "a@example.com");
    assert_eq!(data["message"], "hi");
    assert_eq!(
        data.as_object().unwrap().len(),
        5,
        "data should be the generated id plus exactly the four submitted fields"
    );

    shutdown.trigger();
}

#[tokio::test]
async fn test_health_endpoint() {
    let config = common::test_config(28423);
    let shutdown = common::spawn_server(config).await;

    let client = common::client();
    let res = client
        .get("http://127.0.0.1:28423/health")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["status"], "ok");

    shutdown.trigger();
}

#[tokio::test]
async fn test_static_fallback_serves_frontend() {
    let dir = std::env::temp_dir().join(format!("site-backend-static-{}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("index.html"), "<html>frontend index</html>").unwrap();
    fs::write(dir.join("app.js"), "console.log('app');").unwrap();

    let mut config = common::test_config(28424);
    config.server.static_dir = Some(dir.to_string_lossy().into_owned());
    let shutdown = common::spawn_server(config).await;

    let client = common::client();

    // Existing asset is served as-is.
    let res = client
        .get("http://127.0.0.1:28424/app.js")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.text().await.unwrap(), "console.log('app');");

    // Unknown routes fall back to the index document.
    let res = client
        .get("http://127.0.0.1:28424/some/client/route")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.text().await.unwrap(), "<html>frontend index</html>");

    // API routes still take precedence over the fallback.
    let res = client
        .get("http://127.0.0.1:28424/otherservice")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);

    shutdown.trigger();
    fs::remove_dir_all(&dir).unwrap_or_default();
}
