//! Smoke tests against a running admin server.
//!
//! These tests require:
//! - A migrated `PostgreSQL` database seeded with `vt-cli seed demo`
//! - The admin server running (cargo run -p variation-table-admin)
//!
//! Run with: cargo test -p variation-table-integration-tests -- --ignored

use reqwest::{Client, StatusCode};

/// Base URL for the admin server (configurable via environment).
fn admin_base_url() -> String {
    std::env::var("ADMIN_BASE_URL").unwrap_or_else(|_| "http://localhost:3001".to_string())
}

fn client() -> Client {
    Client::builder()
        .build()
        .expect("Failed to create HTTP client")
}

#[tokio::test]
#[ignore = "requires a running admin server"]
async fn test_live_readiness() {
    let resp = client()
        .get(format!("{}/health/ready", admin_base_url()))
        .send()
        .await
        .expect("Failed to reach admin server");
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore = "requires a running admin server"]
async fn test_live_products_page_links_to_grid() {
    let resp = client()
        .get(format!("{}/products", admin_base_url()))
        .send()
        .await
        .expect("Failed to reach admin server");
    assert_eq!(resp.status(), StatusCode::OK);

    let body = resp.text().await.expect("Failed to read body");
    assert!(body.contains("/variations?product_id="));
}

#[tokio::test]
#[ignore = "requires a running admin server"]
async fn test_live_missing_product_id() {
    let resp = client()
        .get(format!("{}/variations", admin_base_url()))
        .send()
        .await
        .expect("Failed to reach admin server");
    assert_eq!(resp.status(), StatusCode::OK);

    let body = resp.text().await.expect("Failed to read body");
    assert!(body.contains("Product ID not provided."));
}
