//! Catalog aggregation: filtering, filter-picker values, and price
//! comparison.
//!
//! Pure functions over fully fetched collections - no I/O, no side effects.
//! Handlers fetch `(all_shops, all_offers)` once through the catalog store
//! and everything here runs synchronously in memory.

use std::collections::HashMap;

use galleria_core::Price;

use crate::models::{Offer, Shop};

/// User-chosen catalog filter.
///
/// Both fields are exact-match equality constraints; `None` means no
/// constraint on that field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogFilter {
    pub category: Option<String>,
    pub floor: Option<String>,
}

impl CatalogFilter {
    /// Build a filter from form values, treating empty strings ("All") as
    /// no constraint.
    #[must_use]
    pub fn from_form(category: Option<String>, floor: Option<String>) -> Self {
        Self {
            category: category.filter(|c| !c.is_empty()),
            floor: floor.filter(|f| !f.is_empty()),
        }
    }

    fn matches(&self, shop: &Shop) -> bool {
        self.category.as_ref().is_none_or(|c| &shop.category == c)
            && self.floor.as_ref().is_none_or(|f| &shop.floor == f)
    }
}

/// A filtered view over the catalog: the matching shops and the offers that
/// belong to them.
#[derive(Debug)]
pub struct FilteredCatalog<'a> {
    pub shops: Vec<&'a Shop>,
    pub offers: Vec<&'a Offer>,
}

/// Which shop field to collect distinct values for.
#[derive(Debug, Clone, Copy)]
pub enum ShopField {
    Category,
    Floor,
}

/// The subset of shops matching the filter, in their original order.
#[must_use]
pub fn filter_shops<'a>(shops: &'a [Shop], filter: &CatalogFilter) -> Vec<&'a Shop> {
    shops.iter().filter(|s| filter.matches(s)).collect()
}

/// Filter shops, then keep the offers whose shop is in the filtered set.
#[must_use]
pub fn filter_catalog<'a>(
    shops: &'a [Shop],
    offers: &'a [Offer],
    filter: &CatalogFilter,
) -> FilteredCatalog<'a> {
    let filtered_shops = filter_shops(shops, filter);
    let shop_ids: std::collections::HashSet<&str> =
        filtered_shops.iter().map(|s| s.id.as_str()).collect();

    let filtered_offers = offers
        .iter()
        .filter(|o| shop_ids.contains(o.shop_id.as_str()))
        .collect();

    FilteredCatalog {
        shops: filtered_shops,
        offers: filtered_offers,
    }
}

/// Distinct non-empty values of a shop field, in first-occurrence order.
///
/// Populates the filter pickers; both the browsing and the comparison picker
/// are fed from the same source collection, so one render sees one set.
#[must_use]
pub fn distinct_values(shops: &[Shop], field: ShopField) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    let mut values = Vec::new();

    for shop in shops {
        let value = match field {
            ShopField::Category => &shop.category,
            ShopField::Floor => &shop.floor,
        };

        if !value.is_empty() && seen.insert(value.clone()) {
            values.push(value.clone());
        }
    }

    values
}

/// One row of the comparison table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompareRow {
    /// Owning shop's name, or "N/A" if the shop id no longer resolves.
    pub shop_name: String,
    /// Product name the row was grouped by.
    pub product_name: String,
    /// This offer's price.
    pub price: Price,
    /// Product features, or "N/A" when absent.
    pub features: String,
    /// Whether this price equals the group minimum (ties all marked).
    pub is_cheapest: bool,
}

/// The outcome of a comparison.
///
/// "No eligible offers" is its own case so the renderer can distinguish an
/// empty table from a table with no rows matching the filter.
#[derive(Debug, PartialEq, Eq)]
pub enum Comparison {
    /// No offers were eligible under the filter.
    Empty,
    /// One row per eligible offer.
    Table(Vec<CompareRow>),
}

/// Cross-shop product comparison.
///
/// Eligible offers (per [`filter_catalog`]) are grouped by exact product
/// name; each group's minimum price marks its cheapest rows. Group order is
/// the first occurrence of each product name in the offer list, and offers
/// keep their original order within a group.
#[must_use]
pub fn compare(shops: &[Shop], offers: &[Offer], filter: &CatalogFilter) -> Comparison {
    let eligible = filter_catalog(shops, offers, filter).offers;
    if eligible.is_empty() {
        return Comparison::Empty;
    }

    // Group by product name, preserving first-occurrence order.
    let mut group_order: Vec<&str> = Vec::new();
    let mut groups: HashMap<&str, Vec<&Offer>> = HashMap::new();
    for offer in eligible {
        let name = offer.product.name.as_str();
        groups
            .entry(name)
            .or_insert_with(|| {
                group_order.push(name);
                Vec::new()
            })
            .push(offer);
    }

    let shop_names: HashMap<&str, &str> = shops
        .iter()
        .map(|s| (s.id.as_str(), s.name.as_str()))
        .collect();

    let mut rows = Vec::new();
    for name in group_order {
        let Some(group) = groups.get(name) else {
            continue;
        };
        let Some(min_price) = group.iter().map(|o| o.product.price).min() else {
            continue;
        };

        for offer in group {
            rows.push(CompareRow {
                shop_name: shop_names
                    .get(offer.shop_id.as_str())
                    .map_or_else(|| "N/A".to_owned(), |&n| n.to_owned()),
                product_name: offer.product.name.clone(),
                price: offer.product.price,
                features: offer
                    .product
                    .features
                    .clone()
                    .unwrap_or_else(|| "N/A".to_owned()),
                is_cheapest: offer.product.price == min_price,
            });
        }
    }

    Comparison::Table(rows)
}
