//! Distance-tiered delivery pricing.
//!
//! The resolver only classifies a distance into a band. The actual fee is
//! whatever the catalog's matching delivery item sells for, so operators can
//! reprice tiers in the vendor dashboard without a deploy.

use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::money::Money;

/// Largest distance we deliver to, in miles.
pub const MAX_RADIUS_MILES: f64 = 8.0;

/// A delivery pricing band, keyed by distance range.
///
/// Each tier names a reserved catalog item. `Mile8` exists because the lot
/// carries the item, but the resolver never selects it: the `Mile7` band's
/// inclusive upper bound is the service radius.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeliveryTier {
    Under1,
    Mile1,
    Mile2,
    Mile3,
    Mile4,
    Mile5,
    Mile6,
    Mile7,
    Mile8,
}

impl DeliveryTier {
    /// Reserved catalog item name carrying this tier's price.
    #[must_use]
    pub const fn item_name(self) -> &'static str {
        match self {
            Self::Under1 => "DELIVERY-UNDER-1",
            Self::Mile1 => "DELIVERY-1-MILE",
            Self::Mile2 => "DELIVERY-2-MILE",
            Self::Mile3 => "DELIVERY-3-MILE",
            Self::Mile4 => "DELIVERY-4-MILE",
            Self::Mile5 => "DELIVERY-5-MILE",
            Self::Mile6 => "DELIVERY-6-MILE",
            Self::Mile7 => "DELIVERY-7-MILE",
            Self::Mile8 => "DELIVERY-8-MILE",
        }
    }
}

/// Classify a delivery distance into a pricing tier.
///
/// Upper bounds are inclusive: exactly 1.0 miles is still `Under1`, exactly
/// 8.0 miles is still served. Anything past the radius returns `None` and
/// must surface as a recoverable validation failure, never a price.
#[must_use]
pub fn resolve_tier(distance_miles: f64) -> Option<DeliveryTier> {
    if !distance_miles.is_finite() || distance_miles > MAX_RADIUS_MILES {
        return None;
    }

    let tier = if distance_miles <= 1.0 {
        DeliveryTier::Under1
    } else if distance_miles <= 2.0 {
        DeliveryTier::Mile1
    } else if distance_miles <= 3.0 {
        DeliveryTier::Mile2
    } else if distance_miles <= 4.0 {
        DeliveryTier::Mile3
    } else if distance_miles <= 5.0 {
        DeliveryTier::Mile4
    } else if distance_miles <= 6.0 {
        DeliveryTier::Mile5
    } else if distance_miles <= 7.0 {
        DeliveryTier::Mile6
    } else {
        DeliveryTier::Mile7
    };
    Some(tier)
}

/// Look up a tier's fee in the normalized catalog.
///
/// Returns `None` when the reserved item is missing or has no variations,
/// which callers treat as a configuration problem with the vendor catalog.
#[must_use]
pub fn tier_fee(catalog: &Catalog, tier: DeliveryTier) -> Option<Money> {
    catalog
        .item_by_name(tier.item_name())
        .and_then(|item| item.variations.first())
        .map(|v| v.price)
}
