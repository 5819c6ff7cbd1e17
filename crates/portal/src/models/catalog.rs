//! Catalog domain types: shops and the offers sold in them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use galleria_core::{OfferId, Price, ShopId, Uid};

/// A shop in the mall directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shop {
    /// Store-assigned id.
    pub id: ShopId,
    /// Display name.
    pub name: String,
    /// Category used for filtering (exact match).
    pub category: String,
    /// Floor label used for filtering (exact match, stored as text).
    pub floor: String,
    /// Free-text description.
    pub description: String,
    /// Admin who created the shop.
    pub owner_uid: Uid,
    /// When the shop was created (backend-assigned).
    pub created_at: DateTime<Utc>,
    /// When the shop was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Fields for creating a shop; the store assigns id and timestamps.
#[derive(Debug, Clone)]
pub struct NewShop {
    pub name: String,
    pub category: String,
    pub floor: String,
    pub description: String,
    pub owner_uid: Uid,
}

/// Mutable shop fields for an update.
#[derive(Debug, Clone)]
pub struct ShopUpdate {
    pub name: String,
    pub category: String,
    pub floor: String,
    pub description: String,
}

/// The product inside an offer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    /// Product name; comparison groups offers by this exact string.
    pub name: String,
    /// Validated price (non-numeric input is rejected at the form boundary).
    pub price: Price,
    /// Optional feature blurb.
    pub features: Option<String>,
}

/// An offer placed by a shop.
///
/// `shop_id` is a plain reference: the shop may have been deleted since,
/// and renderers show "N/A" for a dangling reference rather than fail.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Offer {
    /// Store-assigned id.
    pub id: OfferId,
    /// The shop this offer belongs to (dangling allowed).
    pub shop_id: ShopId,
    /// Offer headline.
    pub title: String,
    /// The product on offer.
    pub product: Product,
    /// Admin who created the offer.
    pub created_by: Uid,
    /// When the offer was created (backend-assigned).
    pub created_at: DateTime<Utc>,
    /// When the offer was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Fields for creating an offer; the store assigns id and timestamps.
#[derive(Debug, Clone)]
pub struct NewOffer {
    pub shop_id: ShopId,
    pub title: String,
    pub product: Product,
    pub created_by: Uid,
}

/// Mutable offer fields for an update.
#[derive(Debug, Clone)]
pub struct OfferUpdate {
    pub shop_id: ShopId,
    pub title: String,
    pub product: Product,
}
