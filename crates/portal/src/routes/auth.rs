//! Authentication route handlers.
//!
//! Login and registration are role-aware: a `?role=admin` query switches the
//! page title and, for registration, presets the recorded intent to an admin
//! request. Outcomes render in place with a message; only successful logins
//! navigate away.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;

use galleria_core::{Role, RoleHint};

use crate::filters;
use crate::middleware::{OptionalUser, clear_current_user, set_current_user};
use crate::models::CurrentUser;
use crate::services::account::{AccountError, Landing};
use crate::state::AppState;

// =============================================================================
// Form & Query Types
// =============================================================================

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    /// Role hint carried through from the entry page (display only).
    #[serde(default)]
    pub role: String,
}

/// Registration form data.
#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub email: String,
    pub password: String,
    /// Requested role: `user` or `admin` (recorded as an admin request).
    #[serde(default)]
    pub role: String,
}

/// Query parameters for the entry pages.
#[derive(Debug, Deserialize)]
pub struct EntryQuery {
    /// Role hint: `admin` switches the page variant.
    pub role: Option<String>,
}

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub title: &'static str,
    pub role_hint: String,
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Register page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/register.html")]
pub struct RegisterTemplate {
    pub title: &'static str,
    pub role_hint: String,
    pub error: Option<String>,
    pub success: Option<String>,
}

// =============================================================================
// Login Routes
// =============================================================================

/// Display the login page.
pub async fn login_page(Query(query): Query<EntryQuery>) -> impl IntoResponse {
    let hint = query.role.unwrap_or_default();
    LoginTemplate {
        title: login_title(&hint),
        role_hint: hint,
        error: None,
        success: None,
    }
}

/// Handle login form submission.
///
/// On success the resolved [`CurrentUser`] goes into the session and the
/// response redirects to the landing view the resolver picked. Failures
/// render the page again with the message in place.
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Response {
    match state.accounts().login(&form.email, &form.password).await {
        Ok(success) => {
            let user = CurrentUser {
                uid: success.identity.uid.clone(),
                email: success.identity.email.clone(),
                role: success.role.clone(),
            };

            if let Err(e) = set_current_user(&session, &user).await {
                tracing::error!("Failed to set session: {}", e);
                return login_error(&form.role, "Session error, please try again.");
            }

            match success.landing {
                Landing::Admin => Redirect::to("/admin").into_response(),
                Landing::User {
                    pending_approval: true,
                } => Redirect::to("/dashboard?pending=1").into_response(),
                Landing::User { .. } => Redirect::to("/dashboard").into_response(),
            }
        }
        Err(err) => {
            tracing::warn!("Login failed: {}", err);
            login_error(&form.role, &flash_message(&err))
        }
    }
}

fn login_error(role_hint: &str, message: &str) -> Response {
    LoginTemplate {
        title: login_title(role_hint),
        role_hint: role_hint.to_owned(),
        error: Some(message.to_owned()),
        success: None,
    }
    .into_response()
}

fn login_title(hint: &str) -> &'static str {
    if hint == "admin" { "Admin Login" } else { "Login" }
}

// =============================================================================
// Registration Routes
// =============================================================================

/// Display the registration page.
pub async fn register_page(Query(query): Query<EntryQuery>) -> impl IntoResponse {
    let hint = query.role.unwrap_or_default();
    RegisterTemplate {
        title: register_title(&hint),
        role_hint: hint,
        error: None,
        success: None,
    }
}

/// Handle registration form submission.
///
/// Renders the page again with a success or failure message; the account is
/// not logged in automatically.
pub async fn register(
    State(state): State<AppState>,
    Form(form): Form<RegisterForm>,
) -> Response {
    let hint = RoleHint::parse(&form.role);

    match state
        .accounts()
        .register(&form.email, &form.password, hint)
        .await
    {
        Ok(registration) => {
            let message = if registration.role == Role::AdminRequest {
                "Registered. Admin approval pending."
            } else {
                "Registered successfully. You may login."
            };

            RegisterTemplate {
                title: register_title(&form.role),
                role_hint: form.role,
                error: None,
                success: Some(message.to_owned()),
            }
            .into_response()
        }
        Err(err) => {
            tracing::warn!("Registration failed: {}", err);
            RegisterTemplate {
                title: register_title(&form.role),
                role_hint: form.role.clone(),
                error: Some(flash_message(&err)),
                success: None,
            }
            .into_response()
        }
    }
}

fn register_title(hint: &str) -> &'static str {
    if hint == "admin" {
        "Register (Admin Request)"
    } else {
        "Register (User)"
    }
}

// =============================================================================
// Logout Route
// =============================================================================

/// Handle logout.
///
/// Ends the identity session, clears the cookie session, and returns to the
/// login page.
pub async fn logout(
    State(state): State<AppState>,
    session: Session,
    OptionalUser(user): OptionalUser,
) -> Response {
    let uid = user.map(|u| u.uid);
    if let Err(e) = state.accounts().logout(uid.as_ref()).await {
        tracing::warn!("Identity sign-out failed: {}", e);
    }

    if let Err(e) = clear_current_user(&session).await {
        tracing::error!("Failed to clear session: {}", e);
    }

    if let Err(e) = session.flush().await {
        tracing::error!("Failed to flush session: {}", e);
    }

    Redirect::to("/auth/login").into_response()
}

// =============================================================================
// Messages
// =============================================================================

/// The in-page message for an account failure.
///
/// Provider messages pass through verbatim; everything else gets a fixed
/// text.
fn flash_message(err: &AccountError) -> String {
    match err {
        AccountError::NoAccount => {
            "No account found with this email. Please register first.".to_owned()
        }
        AccountError::InvalidCredential => "Invalid email or password.".to_owned(),
        AccountError::DuplicateAccount { existing_role } => format!(
            "This email is already registered as \"{existing_role}\". Use that account or a different email."
        ),
        AccountError::IdentityCreationFailed(message) => message.clone(),
        AccountError::UnknownRole(role) => format!("Unknown role: {role}. Contact support."),
        AccountError::InvalidEmail(_) => "Please enter a valid email address.".to_owned(),
        AccountError::EmailNotFound
        | AccountError::ProfileWriteFailed { .. }
        | AccountError::Gateway(_) => "Something went wrong. Please try again.".to_owned(),
    }
}
