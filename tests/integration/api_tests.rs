//! Read API tests over a real listener

use serde_json::Value;
use std::path::Path;
use tender_scrape::api::{serve_on, ApiState};
use tender_scrape::storage;
use tender_scrape::TenderRecord;
use tokio::net::TcpListener;

/// Starts the API on an ephemeral port and returns its base URL
async fn start_api(database_path: &Path) -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind listener");
    let addr = listener.local_addr().expect("Failed to read local addr");

    let state = ApiState::new(database_path);
    tokio::spawn(async move {
        let _ = serve_on(listener, state).await;
    });

    format!("http://{}", addr)
}

fn record(number: &str) -> TenderRecord {
    TenderRecord {
        number: number.to_string(),
        link: format!("https://example.com/tender/{}", number),
        customer: "N/A".to_string(),
        goods: format!("Goods {}", number),
        end_date: "01.02.2026".to_string(),
    }
}

#[tokio::test]
async fn test_empty_store_returns_empty_array() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let base = start_api(&dir.path().join("tenders.db")).await;

    let response = reqwest::get(format!("{}/tenders", base))
        .await
        .expect("Request failed");
    assert_eq!(response.status().as_u16(), 200);

    let body: Value = response.json().await.expect("Body is not JSON");
    assert_eq!(body, Value::Array(vec![]));
}

#[tokio::test]
async fn test_lists_every_stored_row() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let db_path = dir.path().join("tenders.db");
    storage::append_all(&db_path, &[record("1"), record("2")]).expect("Failed to seed store");

    let base = start_api(&db_path).await;
    let body: Value = reqwest::get(format!("{}/tenders", base))
        .await
        .expect("Request failed")
        .json()
        .await
        .expect("Body is not JSON");

    let rows = body.as_array().expect("Expected an array");
    assert_eq!(rows.len(), 2);

    let first = rows[0].as_object().expect("Expected an object");
    let mut keys: Vec<&str> = first.keys().map(String::as_str).collect();
    keys.sort_unstable();
    assert_eq!(
        keys,
        vec!["customer", "end_date", "goods", "id", "link", "number"]
    );
    assert_eq!(first["number"], "1");
    assert_eq!(first["link"], "https://example.com/tender/1");
    assert!(first["id"].is_i64());
    assert_eq!(rows[1]["number"], "2");
}

#[tokio::test]
async fn test_rows_appended_after_start_are_visible() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let db_path = dir.path().join("tenders.db");
    let base = start_api(&db_path).await;

    let before: Value = reqwest::get(format!("{}/tenders", base))
        .await
        .expect("Request failed")
        .json()
        .await
        .expect("Body is not JSON");
    assert_eq!(before.as_array().map(Vec::len), Some(0));

    storage::append_all(&db_path, &[record("9")]).expect("Failed to append");

    let after: Value = reqwest::get(format!("{}/tenders", base))
        .await
        .expect("Request failed")
        .json()
        .await
        .expect("Body is not JSON");
    assert_eq!(after.as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let base = start_api(&dir.path().join("tenders.db")).await;

    let response = reqwest::get(format!("{}/tenders/1", base))
        .await
        .expect("Request failed");
    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn test_unopenable_store_is_server_error() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let base = start_api(&dir.path().join("missing").join("tenders.db")).await;

    let response = reqwest::get(format!("{}/tenders", base))
        .await
        .expect("Request failed");
    assert_eq!(response.status().as_u16(), 500);
}
