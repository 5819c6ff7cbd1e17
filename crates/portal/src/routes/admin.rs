//! Admin dashboard route handlers.
//!
//! Shop and offer CRUD, the pending admin-request queue, and the operational
//! log viewer. Every route requires the `admin` role; `admin_request`
//! accounts get 403 like any other non-admin.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use serde_json::json;

use galleria_core::{OfferId, Price, ShopId};

use crate::error::Result;
use crate::filters;
use crate::middleware::RequireAdmin;
use crate::models::{NewOffer, NewShop, OfferUpdate, Product, ShopUpdate};
use crate::services::account::AccountError;
use crate::state::AppState;

/// How many audit entries the log viewer shows.
const LOG_VIEW_LIMIT: usize = 20;

// =============================================================================
// Form & Query Types
// =============================================================================

/// Shop create/update form data.
#[derive(Debug, Deserialize)]
pub struct ShopForm {
    pub name: String,
    pub category: String,
    pub floor: String,
    #[serde(default)]
    pub description: String,
}

/// Offer create/update form data.
#[derive(Debug, Deserialize)]
pub struct OfferForm {
    pub shop_id: String,
    pub title: String,
    pub product_name: String,
    pub product_price: String,
    #[serde(default)]
    pub product_features: String,
}

/// Admin-request approval form data.
#[derive(Debug, Deserialize)]
pub struct ApproveForm {
    pub email: String,
}

/// Query parameters for message display.
#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    pub error: Option<String>,
}

// =============================================================================
// View Types
// =============================================================================

/// A shop row with its inline edit form.
pub struct ShopRow {
    pub id: String,
    pub name: String,
    pub category: String,
    pub floor: String,
    pub description: String,
}

/// An offer row with its inline edit form.
pub struct OfferRow {
    pub id: String,
    pub shop_id: String,
    pub shop_name: String,
    pub title: String,
    pub product_name: String,
    pub price: String,
    pub features: String,
}

/// A shop option for the offer forms' shop select.
pub struct ShopOption {
    pub id: String,
    pub name: String,
}

/// A pending admin request.
pub struct RequestRow {
    pub email: String,
}

/// A log viewer row.
pub struct LogRow {
    pub ts: String,
    pub action: String,
    pub meta: String,
}

// =============================================================================
// Templates
// =============================================================================

/// Admin dashboard template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/index.html")]
pub struct AdminTemplate {
    pub email: String,
    pub error: Option<String>,
    pub shops: Vec<ShopRow>,
    pub shop_options: Vec<ShopOption>,
    pub offers: Vec<OfferRow>,
    pub requests: Vec<RequestRow>,
    pub logs: Vec<LogRow>,
}

// =============================================================================
// Dashboard
// =============================================================================

/// Render the admin dashboard.
pub async fn index(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Query(query): Query<MessageQuery>,
) -> Result<AdminTemplate> {
    let shops = state.catalog().list_shops().await?;
    let offers = state.catalog().list_offers().await?;
    let requests = state.accounts().admin_requests().await?;
    let logs = state.audit_store().recent(LOG_VIEW_LIMIT).await?;

    let shop_rows = shops
        .iter()
        .map(|s| ShopRow {
            id: s.id.as_str().to_owned(),
            name: s.name.clone(),
            category: s.category.clone(),
            floor: s.floor.clone(),
            description: s.description.clone(),
        })
        .collect();

    let shop_options: Vec<ShopOption> = shops
        .iter()
        .map(|s| ShopOption {
            id: s.id.as_str().to_owned(),
            name: s.name.clone(),
        })
        .collect();

    let offer_rows = offers
        .iter()
        .map(|o| OfferRow {
            id: o.id.as_str().to_owned(),
            shop_id: o.shop_id.as_str().to_owned(),
            shop_name: shops
                .iter()
                .find(|s| s.id == o.shop_id)
                .map_or_else(|| "N/A".to_owned(), |s| s.name.clone()),
            title: o.title.clone(),
            product_name: o.product.name.clone(),
            price: o.product.price.to_string(),
            features: o.product.features.clone().unwrap_or_default(),
        })
        .collect();

    let request_rows = requests
        .into_iter()
        .map(|m| RequestRow {
            email: m.email.into_inner(),
        })
        .collect();

    let log_rows = logs
        .into_iter()
        .map(|entry| LogRow {
            ts: entry.ts.format("%Y-%m-%d %H:%M:%S").to_string(),
            action: entry.action,
            meta: entry.meta.to_string(),
        })
        .collect();

    Ok(AdminTemplate {
        email: admin.email.into_inner(),
        error: query.error.as_deref().map(error_message),
        shops: shop_rows,
        shop_options,
        offers: offer_rows,
        requests: request_rows,
        logs: log_rows,
    })
}

/// Map an error code from the redirect query to its display text.
fn error_message(code: &str) -> String {
    match code {
        "price" => "Invalid price: enter a non-negative number.".to_owned(),
        "email_not_found" => "Email not found.".to_owned(),
        "not_found" => "That record no longer exists.".to_owned(),
        other => format!("Operation failed ({other})."),
    }
}

// =============================================================================
// Shop CRUD
// =============================================================================

/// Create a shop.
pub async fn create_shop(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Form(form): Form<ShopForm>,
) -> Result<Redirect> {
    let shop_id = state
        .catalog()
        .create_shop(NewShop {
            name: form.name.clone(),
            category: form.category,
            floor: form.floor,
            description: form.description,
            owner_uid: admin.uid.clone(),
        })
        .await?;

    state.audit().record(
        Some(admin.uid),
        "createShop",
        json!({ "shopId": shop_id.as_str(), "name": form.name }),
    );
    Ok(Redirect::to("/admin"))
}

/// Update a shop.
pub async fn update_shop(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<String>,
    Form(form): Form<ShopForm>,
) -> Response {
    let shop_id = ShopId::new(id);
    let update = ShopUpdate {
        name: form.name,
        category: form.category,
        floor: form.floor,
        description: form.description,
    };

    match state.catalog().update_shop(&shop_id, update).await {
        Ok(()) => {
            state.audit().record(
                Some(admin.uid),
                "updateShop",
                json!({ "shopId": shop_id.as_str() }),
            );
            Redirect::to("/admin").into_response()
        }
        Err(crate::gateway::GatewayError::NotFound) => {
            Redirect::to("/admin?error=not_found").into_response()
        }
        Err(err) => crate::error::AppError::from(err).into_response(),
    }
}

/// Delete a shop.
pub async fn delete_shop(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<String>,
) -> Result<Redirect> {
    let shop_id = ShopId::new(id);
    state.catalog().delete_shop(&shop_id).await?;

    state.audit().record(
        Some(admin.uid),
        "deleteShop",
        json!({ "shopId": shop_id.as_str() }),
    );
    Ok(Redirect::to("/admin"))
}

// =============================================================================
// Offer CRUD
// =============================================================================

/// Create an offer.
///
/// The price field is validated here: an unparsable price redirects back
/// with an error instead of storing a non-numeric value.
pub async fn create_offer(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Form(form): Form<OfferForm>,
) -> Result<Response> {
    let Ok(price) = Price::parse(&form.product_price) else {
        return Ok(Redirect::to("/admin?error=price").into_response());
    };

    let offer_id = state
        .catalog()
        .create_offer(NewOffer {
            shop_id: ShopId::new(form.shop_id.clone()),
            title: form.title.clone(),
            product: Product {
                name: form.product_name,
                price,
                features: none_if_empty(form.product_features),
            },
            created_by: admin.uid.clone(),
        })
        .await?;

    state.audit().record(
        Some(admin.uid),
        "createOffer",
        json!({ "offerId": offer_id.as_str(), "shopId": form.shop_id, "title": form.title }),
    );
    Ok(Redirect::to("/admin").into_response())
}

/// Update an offer.
pub async fn update_offer(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<String>,
    Form(form): Form<OfferForm>,
) -> Response {
    let Ok(price) = Price::parse(&form.product_price) else {
        return Redirect::to("/admin?error=price").into_response();
    };

    let offer_id = OfferId::new(id);
    let update = OfferUpdate {
        shop_id: ShopId::new(form.shop_id),
        title: form.title,
        product: Product {
            name: form.product_name,
            price,
            features: none_if_empty(form.product_features),
        },
    };

    match state.catalog().update_offer(&offer_id, update).await {
        Ok(()) => {
            state.audit().record(
                Some(admin.uid),
                "updateOffer",
                json!({ "offerId": offer_id.as_str() }),
            );
            Redirect::to("/admin").into_response()
        }
        Err(crate::gateway::GatewayError::NotFound) => {
            Redirect::to("/admin?error=not_found").into_response()
        }
        Err(err) => crate::error::AppError::from(err).into_response(),
    }
}

/// Delete an offer.
pub async fn delete_offer(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<String>,
) -> Result<Redirect> {
    let offer_id = OfferId::new(id);
    state.catalog().delete_offer(&offer_id).await?;

    state.audit().record(
        Some(admin.uid),
        "deleteOffer",
        json!({ "offerId": offer_id.as_str() }),
    );
    Ok(Redirect::to("/admin"))
}

// =============================================================================
// Admin Requests
// =============================================================================

/// Approve a pending admin request.
pub async fn approve_request(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Form(form): Form<ApproveForm>,
) -> Response {
    match state.accounts().approve_admin(&form.email).await {
        Ok(()) => Redirect::to("/admin").into_response(),
        Err(AccountError::EmailNotFound | AccountError::InvalidEmail(_)) => {
            Redirect::to("/admin?error=email_not_found").into_response()
        }
        Err(err) => crate::error::AppError::from(err).into_response(),
    }
}

/// Turn an empty form field into `None`.
fn none_if_empty(value: String) -> Option<String> {
    if value.trim().is_empty() { None } else { Some(value) }
}
