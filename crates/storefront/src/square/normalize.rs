//! Vendor catalog normalization.
//!
//! Turns the heterogeneous raw record batch into the typed domain
//! [`Catalog`]. Malformed individual records are excluded by the inclusion
//! rules rather than failing the batch; only an absent or empty batch is an
//! error.

use std::collections::HashSet;

use thiserror::Error;
use tracing::debug;

use tannenbaum_core::money::{CurrencyCode, Money};
use tannenbaum_core::{Catalog, CatalogItem, Category, Image, StoreConfig, Variation};

use super::types::{CatalogObject, ItemData};

/// The vendor returned nothing usable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("no catalog objects in vendor response")]
pub struct UpstreamDataError;

/// Filter and convert a raw record batch into the domain catalog.
///
/// # Errors
///
/// Returns [`UpstreamDataError`] when the batch is empty. Individual records
/// that fail the inclusion rules are dropped silently.
pub fn normalize(
    objects: &[CatalogObject],
    store: &StoreConfig,
) -> Result<Catalog, UpstreamDataError> {
    if objects.is_empty() {
        return Err(UpstreamDataError);
    }

    let items: Vec<CatalogItem> = objects
        .iter()
        .filter(|o| is_eligible_item(o, store))
        .map(convert_item)
        .collect();

    // Images survive only when an eligible item references them.
    let referenced: HashSet<&str> = items
        .iter()
        .flat_map(|i| i.image_ids.iter().map(String::as_str))
        .collect();
    let images: Vec<Image> = objects
        .iter()
        .filter(|o| o.object_type == "IMAGE" && referenced.contains(o.id.as_str()))
        .filter_map(convert_image)
        .collect();

    let categories: Vec<Category> = objects
        .iter()
        .filter(|o| o.object_type == "CATEGORY" && o.id == store.target_category_id)
        .filter_map(convert_category)
        .collect();

    debug!(
        items = items.len(),
        images = images.len(),
        categories = categories.len(),
        "normalized vendor catalog"
    );

    Ok(Catalog {
        items,
        images,
        categories,
    })
}

/// The item inclusion rule: a live `ITEM` with a name and a variations
/// array, belonging to the target category or carrying the delivery prefix.
fn is_eligible_item(obj: &CatalogObject, store: &StoreConfig) -> bool {
    if obj.object_type != "ITEM" || obj.is_deleted {
        return false;
    }
    let Some(data) = &obj.item_data else {
        return false;
    };
    let Some(name) = data.name.as_deref().filter(|n| !n.is_empty()) else {
        return false;
    };
    if data.variations.is_none() {
        return false;
    }

    // Delivery-fee items bypass the category test.
    name.starts_with(&store.delivery_item_prefix)
        || belongs_to_category(data, &store.target_category_id)
}

/// Collapse the three raw shapes a category reference may take into one
/// membership test, so nothing downstream branches on raw shape.
fn belongs_to_category(data: &ItemData, category_id: &str) -> bool {
    let in_categories = data
        .categories
        .iter()
        .flatten()
        .any(|c| c.id.as_deref() == Some(category_id));
    let in_reporting = data
        .reporting_category
        .as_ref()
        .is_some_and(|c| c.id.as_deref() == Some(category_id));
    let in_flat = data.category_id.as_deref() == Some(category_id);

    in_categories || in_reporting || in_flat
}

fn convert_item(obj: &CatalogObject) -> CatalogItem {
    let data = obj.item_data.clone().unwrap_or_default();
    let variations = data
        .variations
        .iter()
        .flatten()
        .map(|v| convert_variation(v, &obj.id))
        .collect();

    CatalogItem {
        id: obj.id.clone(),
        name: data.name.unwrap_or_default(),
        description: data.description,
        variations,
        image_ids: data.image_ids.unwrap_or_default(),
        category: data.category_id,
    }
}

/// Convert a nested variation record.
///
/// Availability tracks the variation's own soft-delete flag, independent of
/// the parent item. Missing prices and ordinals coerce to zero; negative
/// vendor amounts are clamped out.
fn convert_variation(obj: &CatalogObject, item_id: &str) -> Variation {
    let data = obj.item_variation_data.clone().unwrap_or_default();
    let raw_price = data.price_money.unwrap_or_default();
    let price = Money::new(
        raw_price.amount.unwrap_or(0).max(0),
        raw_price
            .currency
            .as_deref()
            .map_or(CurrencyCode::USD, CurrencyCode::from_code),
    );

    Variation {
        id: obj.id.clone(),
        name: data.name.unwrap_or_default(),
        price,
        item_id: data.item_id.unwrap_or_else(|| item_id.to_string()),
        ordinal: data.ordinal.unwrap_or(0),
        available: !obj.is_deleted,
    }
}

fn convert_image(obj: &CatalogObject) -> Option<Image> {
    let url = obj.image_data.as_ref()?.url.clone()?;
    Some(Image {
        id: obj.id.clone(),
        url,
    })
}

fn convert_category(obj: &CatalogObject) -> Option<Category> {
    let name = obj.category_data.as_ref()?.name.clone()?;
    Some(Category {
        id: obj.id.clone(),
        name,
    })
}
