//! End-to-end tests: the archive endpoint against a live upstream stub.

use std::io::{Cursor, Read};

use axum::{http::StatusCode, response::IntoResponse, routing::get, Router};
use zipd_core::config::ZipdConfig;

use crate::routes::router;
use crate::state::AppState;

/// Binds `app` on an ephemeral port and serves it in the background.
async fn spawn(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

/// Upstream stub standing in for third-party dataset hosts.
async fn spawn_upstream() -> String {
    let app = Router::new()
        .route("/a.csv", get(|| async { "x" }))
        .route("/b.csv", get(|| async { "y" }))
        .route(
            "/missing.csv",
            get(|| async { (StatusCode::NOT_FOUND, "gone").into_response() }),
        );
    spawn(app).await
}

async fn spawn_zipd() -> String {
    let state = AppState::new(ZipdConfig::default()).unwrap();
    spawn(router(state)).await
}

async fn post_manifest(zipd: &str, body: String) -> reqwest::Response {
    reqwest::Client::new()
        .post(format!("{zipd}/api/archive"))
        .header("content-type", "application/json")
        .body(body)
        .send()
        .await
        .unwrap()
}

#[tokio::test]
async fn healthz_responds_ok() {
    let zipd = spawn_zipd().await;
    let response = reqwest::get(format!("{zipd}/healthz")).await.unwrap();
    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn two_file_manifest_yields_named_archive() {
    let upstream = spawn_upstream().await;
    let zipd = spawn_zipd().await;

    let body = format!(
        r#"{{"archiveName":"run1","files":[{{"url":"{upstream}/a.csv"}},{{"url":"{upstream}/b.csv","filename":"custom.csv"}}]}}"#
    );
    let response = post_manifest(&zipd, body).await;

    assert_eq!(response.status(), 200);
    let headers = response.headers().clone();
    assert_eq!(headers["content-type"], "application/zip");
    assert_eq!(
        headers["content-disposition"],
        "attachment; filename=\"run1.zip\""
    );
    assert_eq!(headers["x-content-type-options"], "nosniff");

    let bytes = response.bytes().await.unwrap();
    assert_eq!(
        headers["content-length"].to_str().unwrap(),
        bytes.len().to_string()
    );

    let mut archive = zip::ZipArchive::new(Cursor::new(bytes.to_vec())).unwrap();
    assert_eq!(archive.len(), 2);
    for (index, (name, content)) in [("a.csv", "x"), ("custom.csv", "y")].iter().enumerate() {
        let mut entry = archive.by_index(index).unwrap();
        assert_eq!(entry.name(), *name);
        let mut body = String::new();
        entry.read_to_string(&mut body).unwrap();
        assert_eq!(body, *content);
    }
}

#[tokio::test]
async fn control_chars_in_archive_name_are_sanitized() {
    let upstream = spawn_upstream().await;
    let zipd = spawn_zipd().await;

    // JSON escape for U+0001: the name reaches the resolver as "bad\u{1}name".
    let body = format!(
        "{{\"archiveName\":\"bad\\u0001name\",\"files\":[{{\"url\":\"{upstream}/a.csv\"}}]}}"
    );
    let response = post_manifest(&zipd, body).await;

    assert_eq!(response.status(), 200);
    assert_eq!(
        response.headers()["content-disposition"],
        "attachment; filename=\"bad_name.zip\""
    );
}

#[tokio::test]
async fn malformed_json_is_400() {
    let zipd = spawn_zipd().await;
    let response = post_manifest(&zipd, "{not json".to_string()).await;
    assert_eq!(response.status(), 400);
    assert_eq!(response.text().await.unwrap(), "Invalid JSON payload");
}

#[tokio::test]
async fn empty_manifest_is_400() {
    let zipd = spawn_zipd().await;
    let response = post_manifest(&zipd, r#"{"files":[]}"#.to_string()).await;
    assert_eq!(response.status(), 400);
    assert_eq!(response.text().await.unwrap(), "No files provided");
}

#[tokio::test]
async fn disallowed_scheme_is_400() {
    let zipd = spawn_zipd().await;
    let response = post_manifest(
        &zipd,
        r#"{"files":[{"url":"gopher://host/f.txt"}]}"#.to_string(),
    )
    .await;
    assert_eq!(response.status(), 400);
    assert_eq!(
        response.text().await.unwrap(),
        "Unsupported or invalid URL: gopher://host/f.txt"
    );
}

#[tokio::test]
async fn upstream_failure_is_502_with_no_partial_archive() {
    let upstream = spawn_upstream().await;
    let zipd = spawn_zipd().await;

    let body = format!(
        r#"{{"files":[{{"url":"{upstream}/a.csv"}},{{"url":"{upstream}/missing.csv"}}]}}"#
    );
    let response = post_manifest(&zipd, body).await;

    assert_eq!(response.status(), 502);
    let text = response.text().await.unwrap();
    assert_eq!(text, format!("Failed to fetch file: {upstream}/missing.csv"));
}

#[test]
fn cli_parses_bind_and_config_overrides() {
    use clap::Parser;

    let cli = crate::Cli::try_parse_from([
        "zipd",
        "--bind",
        "0.0.0.0:9000",
        "--config",
        "/etc/zipd/config.toml",
    ])
    .unwrap();
    assert_eq!(cli.bind.unwrap().port(), 9000);
    assert_eq!(
        cli.config.as_deref(),
        Some(std::path::Path::new("/etc/zipd/config.toml"))
    );

    let bare = crate::Cli::try_parse_from(["zipd"]).unwrap();
    assert!(bare.bind.is_none());
    assert!(bare.config.is_none());
}

#[tokio::test]
async fn oversized_manifest_is_400_before_any_fetch() {
    // No upstream is started at all: the count check must trip first.
    let mut config = ZipdConfig::default();
    config.max_files = 1;
    let state = AppState::new(config).unwrap();
    let zipd = spawn(router(state)).await;

    let body = r#"{"files":[{"url":"https://host/a"},{"url":"https://host/b"}]}"#.to_string();
    let response = post_manifest(&zipd, body).await;
    assert_eq!(response.status(), 400);
    assert!(response.text().await.unwrap().starts_with("Too many files"));
}
