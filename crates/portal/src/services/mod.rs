//! Portal services.
//!
//! - [`account`] - registration, login, logout, admin approval
//! - [`catalog`] - pure filtering, distinct values, and price comparison
//! - [`audit`] - fire-and-forget action logging

pub mod account;
pub mod audit;
pub mod catalog;
