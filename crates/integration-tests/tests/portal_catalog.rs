//! Integration tests for catalog browsing, filtering, and comparison.
//!
//! These tests require a running portal with demo data:
//!
//! ```bash
//! GALLERIA_SEED_DEMO=true cargo run -p galleria-portal
//! ```
//!
//! Run with: cargo test -p galleria-integration-tests -- --ignored

use reqwest::{Client, StatusCode, redirect::Policy};

/// Base URL for the portal (configurable via environment).
fn portal_base_url() -> String {
    std::env::var("PORTAL_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// Create a client logged in as the seeded demo shopper.
async fn shopper_client() -> Client {
    let client = Client::builder()
        .cookie_store(true)
        .redirect(Policy::none())
        .build()
        .expect("Failed to create HTTP client");

    let resp = client
        .post(format!("{}/auth/login", portal_base_url()))
        .form(&[
            ("email", "shopper@galleria.test"),
            ("password", "demo-shopper-pass"),
        ])
        .send()
        .await
        .expect("Failed to login as shopper");
    assert!(resp.status().is_redirection());

    client
}

#[tokio::test]
#[ignore = "Requires a running portal with seeded demo data"]
async fn test_dashboard_lists_seeded_shops() {
    let client = shopper_client().await;
    let base_url = portal_base_url();

    let resp = client
        .get(format!("{base_url}/dashboard"))
        .send()
        .await
        .expect("Failed to get dashboard");
    assert_eq!(resp.status(), StatusCode::OK);

    let body = resp.text().await.expect("Failed to read response");
    assert!(body.contains("Voltage"));
    assert!(body.contains("Bean There"));
}

#[tokio::test]
#[ignore = "Requires a running portal with seeded demo data"]
async fn test_category_filter_narrows_shops() {
    let client = shopper_client().await;
    let base_url = portal_base_url();

    let resp = client
        .get(format!("{base_url}/dashboard?category=Electronics"))
        .send()
        .await
        .expect("Failed to get filtered dashboard");
    assert_eq!(resp.status(), StatusCode::OK);

    let body = resp.text().await.expect("Failed to read response");
    assert!(body.contains("Voltage"));
    assert!(!body.contains("Coffee and cake"));
}

#[tokio::test]
#[ignore = "Requires a running portal with seeded demo data"]
async fn test_compare_highlights_cheapest_offer() {
    let client = shopper_client().await;
    let base_url = portal_base_url();

    let resp = client
        .get(format!("{base_url}/dashboard/compare?category=Electronics"))
        .send()
        .await
        .expect("Failed to get comparison");
    assert_eq!(resp.status(), StatusCode::OK);

    let body = resp.text().await.expect("Failed to read response");
    // Both headphone offers appear; the cheaper row carries the highlight.
    assert!(body.contains("129.99"));
    assert!(body.contains("99.99"));
    assert!(body.contains("cheapest"));
}

#[tokio::test]
#[ignore = "Requires a running portal with seeded demo data"]
async fn test_compare_with_no_matches_shows_empty_marker() {
    let client = shopper_client().await;
    let base_url = portal_base_url();

    let resp = client
        .get(format!(
            "{base_url}/dashboard/compare?category=NoSuchCategory"
        ))
        .send()
        .await
        .expect("Failed to get comparison");
    assert_eq!(resp.status(), StatusCode::OK);

    let body = resp.text().await.expect("Failed to read response");
    assert!(body.contains("No products to compare"));
}
