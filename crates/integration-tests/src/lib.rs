//! Integration tests for Galleria.
//!
//! # Running Tests
//!
//! ```bash
//! # Start the portal with demo data
//! GALLERIA_SEED_DEMO=true cargo run -p galleria-portal
//!
//! # Run integration tests
//! cargo test -p galleria-integration-tests -- --ignored
//! ```
//!
//! # Test Categories
//!
//! - `portal_accounts` - Registration, login, and role-gated routing
//! - `portal_catalog` - Browsing, filtering, and price comparison

#![cfg_attr(not(test), forbid(unsafe_code))]
