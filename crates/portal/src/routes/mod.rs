//! HTTP route handlers for the portal.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                        - Role-aware landing redirect
//! GET  /health                  - Health check
//!
//! # Auth
//! GET  /auth/login              - Login page (?role=admin switches title)
//! POST /auth/login              - Login action
//! GET  /auth/register           - Register page (?role=admin presets intent)
//! POST /auth/register           - Register action
//! POST /auth/logout             - Logout action
//!
//! # User dashboard (requires login)
//! GET  /dashboard               - Shop/offer browsing with filters
//! GET  /dashboard/compare       - Cross-shop price comparison
//!
//! # Admin dashboard (requires admin role)
//! GET  /admin                   - Shops, offers, admin requests, logs
//! POST /admin/shops             - Create shop
//! POST /admin/shops/{id}        - Update shop
//! POST /admin/shops/{id}/delete - Delete shop
//! POST /admin/offers            - Create offer
//! POST /admin/offers/{id}       - Update offer
//! POST /admin/offers/{id}/delete - Delete offer
//! POST /admin/requests/approve  - Approve a pending admin request
//! ```

pub mod admin;
pub mod auth;
pub mod dashboard;

use axum::{
    Router,
    response::Redirect,
    routing::{get, post},
};

use crate::middleware::OptionalUser;
use crate::state::AppState;

/// Role-aware landing redirect for the site root.
async fn home(OptionalUser(user): OptionalUser) -> Redirect {
    match user {
        Some(user) if user.role.is_admin() => Redirect::to("/admin"),
        Some(_) => Redirect::to("/dashboard"),
        None => Redirect::to("/auth/login"),
    }
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/register", get(auth::register_page).post(auth::register))
        .route("/logout", post(auth::logout))
}

/// Create the user dashboard routes router.
pub fn dashboard_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(dashboard::index))
        .route("/compare", get(dashboard::compare))
}

/// Create the admin routes router.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(admin::index))
        .route("/shops", post(admin::create_shop))
        .route("/shops/{id}", post(admin::update_shop))
        .route("/shops/{id}/delete", post(admin::delete_shop))
        .route("/offers", post(admin::create_offer))
        .route("/offers/{id}", post(admin::update_offer))
        .route("/offers/{id}/delete", post(admin::delete_offer))
        .route("/requests/approve", post(admin::approve_request))
}

/// Create all routes for the portal.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home))
        .nest("/auth", auth_routes())
        .nest("/dashboard", dashboard_routes())
        .nest("/admin", admin_routes())
}
