//! Normalized domain catalog.
//!
//! These types are what the rest of the system sees after the vendor's raw
//! record batch has been filtered and coerced by the storefront's
//! normalizer. Field names serialize in camelCase to match the public
//! catalog endpoint.

use serde::{Deserialize, Serialize};

use crate::cart::CartState;
use crate::money::Money;

/// A sellable item with its variations.
///
/// Every variation references exactly one owning item; the normalizer
/// guarantees the back-reference is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogItem {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Variations in display order.
    pub variations: Vec<Variation>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub image_ids: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

/// A purchasable variation of an item (e.g., one tree height).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Variation {
    pub id: String,
    pub name: String,
    pub price: Money,
    /// Owning item id.
    pub item_id: String,
    /// Display order within the item.
    pub ordinal: i64,
    /// False when the vendor has soft-deleted the variation.
    pub available: bool,
}

/// An image referenced by at least one catalog item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Image {
    pub id: String,
    pub url: String,
}

/// The configured target category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
}

/// The normalized catalog served to the frontend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub items: Vec<CatalogItem>,
    pub images: Vec<Image>,
    pub categories: Vec<Category>,
}

impl Catalog {
    /// Look up an item by id.
    #[must_use]
    pub fn item(&self, id: &str) -> Option<&CatalogItem> {
        self.items.iter().find(|i| i.id == id)
    }

    /// Look up an item by exact name.
    ///
    /// Used for delivery-fee items, whose reserved names identify pricing
    /// tiers. If two items ever share a name the first match wins.
    #[must_use]
    pub fn item_by_name(&self, name: &str) -> Option<&CatalogItem> {
        self.items.iter().find(|i| i.name == name)
    }

    /// Look up a variation by its composite key.
    #[must_use]
    pub fn variation(&self, item_id: &str, variation_id: &str) -> Option<&Variation> {
        self.item(item_id)?
            .variations
            .iter()
            .find(|v| v.id == variation_id)
    }

    /// Resolve an image id to its URL.
    #[must_use]
    pub fn image_url(&self, image_id: &str) -> Option<&str> {
        self.images
            .iter()
            .find(|i| i.id == image_id)
            .map(|i| i.url.as_str())
    }

    /// Resolve a category id to its name.
    #[must_use]
    pub fn category_name(&self, category_id: &str) -> Option<&str> {
        self.categories
            .iter()
            .find(|c| c.id == category_id)
            .map(|c| c.name.as_str())
    }

    /// Price a cart against this catalog.
    ///
    /// Lines whose item or variation is no longer in the catalog contribute
    /// nothing rather than failing the whole total.
    #[must_use]
    pub fn subtotal(&self, cart: &CartState) -> Money {
        cart.items()
            .iter()
            .filter_map(|line| {
                self.variation(&line.item_id, &line.variation_id)
                    .map(|v| v.price.times(line.quantity))
            })
            .fold(Money::zero(), Money::plus)
    }
}
