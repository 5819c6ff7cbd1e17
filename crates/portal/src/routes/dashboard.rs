//! User dashboard route handlers.
//!
//! Browsing and comparison both fetch the full shop and offer collections
//! through the catalog store and hand them to `services::catalog`; the
//! handlers only shape the results for the templates.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Query, State};
use serde::Deserialize;

use crate::error::Result;
use crate::filters;
use crate::middleware::RequireUser;
use crate::models::{Offer, Shop};
use crate::services::catalog::{
    CatalogFilter, Comparison, ShopField, compare as compare_offers, distinct_values,
    filter_catalog,
};
use crate::state::AppState;

// =============================================================================
// Query Types
// =============================================================================

/// Filter query shared by browsing and comparison.
#[derive(Debug, Deserialize)]
pub struct FilterQuery {
    pub category: Option<String>,
    pub floor: Option<String>,
    /// Set by the login redirect for accounts awaiting admin approval.
    pub pending: Option<String>,
}

// =============================================================================
// View Types
// =============================================================================

/// A shop card.
pub struct ShopView {
    pub name: String,
    pub category: String,
    pub floor: String,
    pub description: String,
}

/// An offer card.
pub struct OfferView {
    pub title: String,
    pub shop_name: String,
    pub product_name: String,
    pub price: String,
    pub features: String,
}

/// A comparison table row.
pub struct CompareRowView {
    pub shop_name: String,
    pub product_name: String,
    pub price: String,
    pub features: String,
    pub is_cheapest: bool,
}

// =============================================================================
// Templates
// =============================================================================

/// User dashboard template.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard/index.html")]
pub struct DashboardTemplate {
    pub email: String,
    pub pending_approval: bool,
    pub categories: Vec<String>,
    pub floors: Vec<String>,
    pub selected_category: String,
    pub selected_floor: String,
    pub shops: Vec<ShopView>,
    pub offers: Vec<OfferView>,
}

/// Comparison page template.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard/compare.html")]
pub struct CompareTemplate {
    pub email: String,
    pub categories: Vec<String>,
    pub floors: Vec<String>,
    pub selected_category: String,
    pub selected_floor: String,
    /// `None` when no offers were eligible under the filter.
    pub rows: Option<Vec<CompareRowView>>,
}

// =============================================================================
// Handlers
// =============================================================================

/// Shop/offer browsing with category and floor filters.
pub async fn index(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Query(query): Query<FilterQuery>,
) -> Result<DashboardTemplate> {
    let shops = state.catalog().list_shops().await?;
    let offers = state.catalog().list_offers().await?;

    let filter = CatalogFilter::from_form(query.category, query.floor);
    let view = filter_catalog(&shops, &offers, &filter);

    let shop_views = view.shops.iter().map(|s| shop_view(s)).collect();
    let offer_views = view
        .offers
        .iter()
        .map(|o| offer_view(o, &shops))
        .collect();

    Ok(DashboardTemplate {
        email: user.email.into_inner(),
        pending_approval: query.pending.is_some(),
        categories: distinct_values(&shops, ShopField::Category),
        floors: distinct_values(&shops, ShopField::Floor),
        selected_category: filter.category.unwrap_or_default(),
        selected_floor: filter.floor.unwrap_or_default(),
        shops: shop_views,
        offers: offer_views,
    })
}

/// Cross-shop price comparison grouped by product name.
pub async fn compare(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Query(query): Query<FilterQuery>,
) -> Result<CompareTemplate> {
    let shops = state.catalog().list_shops().await?;
    let offers = state.catalog().list_offers().await?;

    let filter = CatalogFilter::from_form(query.category, query.floor);
    let rows = match compare_offers(&shops, &offers, &filter) {
        Comparison::Empty => None,
        Comparison::Table(rows) => Some(
            rows.into_iter()
                .map(|r| CompareRowView {
                    shop_name: r.shop_name,
                    product_name: r.product_name,
                    price: r.price.to_string(),
                    features: r.features,
                    is_cheapest: r.is_cheapest,
                })
                .collect(),
        ),
    };

    Ok(CompareTemplate {
        email: user.email.into_inner(),
        categories: distinct_values(&shops, ShopField::Category),
        floors: distinct_values(&shops, ShopField::Floor),
        selected_category: filter.category.unwrap_or_default(),
        selected_floor: filter.floor.unwrap_or_default(),
        rows,
    })
}

// =============================================================================
// View Builders
// =============================================================================

fn shop_view(shop: &Shop) -> ShopView {
    ShopView {
        name: shop.name.clone(),
        category: shop.category.clone(),
        floor: shop.floor.clone(),
        description: shop.description.clone(),
    }
}

fn offer_view(offer: &Offer, all_shops: &[Shop]) -> OfferView {
    let shop_name = all_shops
        .iter()
        .find(|s| s.id == offer.shop_id)
        .map_or_else(|| "N/A".to_owned(), |s| s.name.clone());

    OfferView {
        title: offer.title.clone(),
        shop_name,
        product_name: offer.product.name.clone(),
        price: offer.product.price.to_string(),
        features: offer
            .product
            .features
            .clone()
            .unwrap_or_else(|| "N/A".to_owned()),
    }
}
