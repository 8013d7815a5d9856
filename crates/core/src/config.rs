//! Injected store-level configuration.
//!
//! Target category, delivery-item prefix, lot locations, hours, and the
//! delivery radius are data, not code: every component that needs them takes
//! a [`StoreConfig`] reference instead of reaching for globals. The
//! storefront crate builds the value from environment defaults at startup.

use serde::{Deserialize, Serialize};

use crate::geo::Coordinates;

/// A physical lot customers can order from.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreLocation {
    /// Stable identifier used by the frontend (e.g., "los-angeles").
    pub id: String,
    /// Display name.
    pub name: String,
    /// The payment provider's location id for this lot.
    pub square_location_id: String,
    /// Lot coordinates, for delivery distance.
    pub coords: Coordinates,
    /// Formatted street address.
    pub address: String,
}

/// Daily opening hours on a 24-hour clock.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct StoreHours {
    /// Opening hour (e.g., 9 for 9 AM).
    pub open: u8,
    /// Closing hour (e.g., 21 for 9 PM).
    pub close: u8,
}

/// Store-wide configuration shared by catalog, cart, and checkout logic.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreConfig {
    /// The single vendor category whose items appear in the storefront.
    pub target_category_id: String,
    /// Items whose name starts with this prefix are delivery-fee lines and
    /// bypass the category test.
    pub delivery_item_prefix: String,
    /// Lots customers can pick up from or get delivery from.
    pub locations: Vec<StoreLocation>,
    /// Opening hours, used to build fulfillment time slots.
    pub hours: StoreHours,
    /// Largest distance we deliver to, in miles.
    pub max_delivery_radius_miles: f64,
}

impl StoreConfig {
    /// Look up a lot by its frontend id.
    #[must_use]
    pub fn location(&self, id: &str) -> Option<&StoreLocation> {
        self.locations.iter().find(|l| l.id == id)
    }
}
