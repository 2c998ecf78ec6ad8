use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use hyper::body::Bytes;
use serde_json::Value;
use solutions_core::filename::filename_from_id;
use std::fs;
use tempfile::tempdir;
use tower::ServiceExt;

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Option<String>, Bytes) {
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let location = resp
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);
    let body = resp.into_body().collect().await.unwrap().to_bytes();
    (status, location, body)
}

async fn get(app: &Router, uri: &str) -> (StatusCode, String) {
    let (status, _, body) = send(app, Request::get(uri).body(Body::empty()).unwrap()).await;
    (status, String::from_utf8_lossy(&body).into_owned())
}

async fn post_form(app: &Router, uri: &str, form: &str) -> (StatusCode, Option<String>) {
    let req = Request::post(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(form.to_owned()))
        .unwrap();
    let (status, location, _) = send(app, req).await;
    (status, location)
}

#[tokio::test]
async fn compose_redirects_to_new_solution() {
    let dir = tempdir().unwrap();
    let app = solutions_server::build_app(dir.path()).unwrap();

    let (status, location) = post_form(&app, "/compose", "book=Dune&author=Herbert&problem=sandworms&solution=thumpers").await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(location.as_deref(), Some("/solution/0"));
    assert!(dir.path().join(filename_from_id(0)).is_file());

    let (status, body) = get(&app, "/solution/0").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Dune"));
    assert!(body.contains("thumpers"));

    let (_, location) = post_form(&app, "/compose", "book=Emma&author=Austen&problem=matchmaking").await;
    assert_eq!(location.as_deref(), Some("/solution/1"));
}

#[tokio::test]
async fn home_lists_every_solution() {
    let dir = tempdir().unwrap();
    let app = solutions_server::build_app(dir.path()).unwrap();

    let (status, body) = get(&app, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("No solutions yet"));

    post_form(&app, "/compose", "book=Dune&author=Herbert&problem=sandworms").await;
    post_form(&app, "/compose", "book=Emma&author=Austen&problem=matchmaking").await;
    let (status, body) = get(&app, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("href=\"/solution/0\""));
    assert!(body.contains("Austen"));
}

#[tokio::test]
async fn compose_page_has_form() {
    let dir = tempdir().unwrap();
    let app = solutions_server::build_app(dir.path()).unwrap();
    let (status, body) = get(&app, "/compose").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("<form method=\"post\" action=\"/compose\">"));
    for field in ["book", "author", "problem", "solution"] {
        assert!(body.contains(&format!("name=\"{field}\"")));
    }
}

#[tokio::test]
async fn unknown_and_malformed_ids() {
    let dir = tempdir().unwrap();
    let app = solutions_server::build_app(dir.path()).unwrap();
    assert_eq!(get(&app, "/solution/42").await.0, StatusCode::NOT_FOUND);
    assert_eq!(get(&app, "/solution/abc").await.0, StatusCode::BAD_REQUEST);
    assert_eq!(get(&app, "/api/solution/42").await.0, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn incomplete_record_fails_listing_only() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join(filename_from_id(0)), r#"{"author":"Anonymous","problem":"untitled"}"#).unwrap();
    let app = solutions_server::build_app(dir.path()).unwrap();

    let (status, body) = get(&app, "/").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.contains("missing required field"));

    let (status, body) = get(&app, "/api/solution/0").await;
    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json, serde_json::json!({ "author": "Anonymous", "problem": "untitled" }));
}

#[tokio::test]
async fn api_lists_summaries() {
    let dir = tempdir().unwrap();
    let app = solutions_server::build_app(dir.path()).unwrap();
    post_form(&app, "/compose", "book=Dune&author=Herbert&problem=sandworms&extra=ignored").await;

    let (status, body) = get(&app, "/api/solutions").await;
    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json, serde_json::json!([{ "id": 0, "book": "Dune", "author": "Herbert", "problem": "sandworms" }]));

    assert_eq!(get(&app, "/health").await, (StatusCode::OK, "ok".to_string()));
}

#[tokio::test]
async fn compose_fails_cleanly_when_ids_run_out() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join(filename_from_id(u64::MAX)), r#"{"book":"b","author":"a","problem":"p"}"#).unwrap();
    let app = solutions_server::build_app(dir.path()).unwrap();

    let (status, location) = post_form(&app, "/compose", "book=Dune&author=Herbert&problem=sandworms").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(location, None);

    // existing records stay readable
    let (status, body) = get(&app, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(&format!("href=\"/solution/{}\"", u64::MAX)));
}
