//! Integration tests for account registration, login, and role gating.
//!
//! These tests require a running portal:
//!
//! ```bash
//! GALLERIA_SEED_DEMO=true cargo run -p galleria-portal
//! ```
//!
//! Run with: cargo test -p galleria-integration-tests -- --ignored

use reqwest::{Client, StatusCode, redirect::Policy};
use uuid::Uuid;

/// Base URL for the portal (configurable via environment).
fn portal_base_url() -> String {
    std::env::var("PORTAL_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// Create a client that keeps cookies and does not follow redirects, so the
/// tests can assert on Location headers.
fn client() -> Client {
    Client::builder()
        .cookie_store(true)
        .redirect(Policy::none())
        .build()
        .expect("Failed to create HTTP client")
}

/// A unique throwaway email per test run.
fn unique_email() -> String {
    format!("it-{}@galleria.test", Uuid::new_v4())
}

#[tokio::test]
#[ignore = "Requires a running portal"]
async fn test_register_then_login_lands_on_dashboard() {
    let client = client();
    let base_url = portal_base_url();
    let email = unique_email();

    let resp = client
        .post(format!("{base_url}/auth/register"))
        .form(&[
            ("email", email.as_str()),
            ("password", "integration-pw"),
            ("role", "user"),
        ])
        .send()
        .await
        .expect("Failed to register");
    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.expect("Failed to read response");
    assert!(body.contains("Registered successfully"));

    let resp = client
        .post(format!("{base_url}/auth/login"))
        .form(&[("email", email.as_str()), ("password", "integration-pw")])
        .send()
        .await
        .expect("Failed to login");
    assert!(resp.status().is_redirection());
    let location = resp
        .headers()
        .get("location")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    assert_eq!(location, "/dashboard");
}

#[tokio::test]
#[ignore = "Requires a running portal"]
async fn test_duplicate_registration_shows_existing_role() {
    let client = client();
    let base_url = portal_base_url();
    let email = unique_email();

    let resp = client
        .post(format!("{base_url}/auth/register"))
        .form(&[
            ("email", email.as_str()),
            ("password", "integration-pw"),
            ("role", "user"),
        ])
        .send()
        .await
        .expect("Failed to register");
    assert_eq!(resp.status(), StatusCode::OK);

    // The second submission reports the duplicate with the stored role.
    let resp = client
        .post(format!("{base_url}/auth/register"))
        .form(&[
            ("email", email.as_str()),
            ("password", "other-long-pw"),
            ("role", "admin"),
        ])
        .send()
        .await
        .expect("Failed to register");
    let body = resp.text().await.expect("Failed to read response");
    assert!(body.contains("already registered as \"user\""));
}

#[tokio::test]
#[ignore = "Requires a running portal"]
async fn test_admin_request_login_is_routed_to_dashboard_pending() {
    let client = client();
    let base_url = portal_base_url();
    let email = unique_email();

    client
        .post(format!("{base_url}/auth/register"))
        .form(&[
            ("email", email.as_str()),
            ("password", "integration-pw"),
            ("role", "admin"),
        ])
        .send()
        .await
        .expect("Failed to register");

    let resp = client
        .post(format!("{base_url}/auth/login"))
        .form(&[("email", email.as_str()), ("password", "integration-pw")])
        .send()
        .await
        .expect("Failed to login");
    assert!(resp.status().is_redirection());
    let location = resp
        .headers()
        .get("location")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    assert_eq!(location, "/dashboard?pending=1");
}

#[tokio::test]
#[ignore = "Requires a running portal with seeded demo data"]
async fn test_admin_dashboard_requires_admin_role() {
    let client = client();
    let base_url = portal_base_url();

    // Anonymous: redirected to the admin login page.
    let resp = client
        .get(format!("{base_url}/admin"))
        .send()
        .await
        .expect("Failed to get admin page");
    assert!(resp.status().is_redirection());

    // Seeded admin: lands on the dashboard.
    let resp = client
        .post(format!("{base_url}/auth/login"))
        .form(&[
            ("email", "admin@galleria.test"),
            ("password", "demo-admin-pass"),
        ])
        .send()
        .await
        .expect("Failed to login as admin");
    assert!(resp.status().is_redirection());

    let resp = client
        .get(format!("{base_url}/admin"))
        .send()
        .await
        .expect("Failed to get admin page");
    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.expect("Failed to read response");
    assert!(body.contains("Admin Dashboard"));
}
