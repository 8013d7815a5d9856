//! Pickup scheduling and delivery addresses.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::config::StoreHours;

/// How the customer receives the order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FulfillmentType {
    Pickup,
    Delivery,
}

/// A delivery destination as entered by the customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryAddress {
    pub address_line1: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_line2: Option<String>,
    pub city: String,
    pub state: String,
    pub postal_code: String,
}

impl DeliveryAddress {
    /// Single-line form handed to the geocoder.
    #[must_use]
    pub fn formatted(&self) -> String {
        let mut parts = vec![self.address_line1.as_str()];
        if let Some(line2) = self.address_line2.as_deref()
            && !line2.is_empty()
        {
            parts.push(line2);
        }
        parts.push(self.city.as_str());
        parts.push(self.state.as_str());
        parts.push(self.postal_code.as_str());
        parts.retain(|p| !p.is_empty());
        parts.join(", ")
    }

    /// Whether every required field has been filled in.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.address_line1.is_empty()
            && !self.city.is_empty()
            && !self.state.is_empty()
            && !self.postal_code.is_empty()
    }
}

/// A selectable fulfillment window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    /// Machine value, the 24-hour start time (e.g., "09:00").
    pub value: String,
    /// Display label (e.g., "9:00 AM - 12:00 PM").
    pub label: String,
}

/// Length of each fulfillment window in hours.
const SLOT_LENGTH_HOURS: u8 = 3;

/// Three-hour fulfillment windows within store hours.
///
/// A 9 AM - 9 PM day yields 09:00, 12:00, 15:00, and 18:00 starts.
#[must_use]
pub fn time_slots(hours: StoreHours) -> Vec<TimeSlot> {
    let mut slots = Vec::new();
    let mut hour = hours.open;
    while hour + SLOT_LENGTH_HOURS <= hours.close {
        slots.push(TimeSlot {
            value: format!("{hour:02}:00"),
            label: format!(
                "{} - {}",
                twelve_hour_label(hour),
                twelve_hour_label(hour + SLOT_LENGTH_HOURS)
            ),
        });
        hour += SLOT_LENGTH_HOURS;
    }
    slots
}

/// Whether a submitted time value is one of the offered slots.
#[must_use]
pub fn is_valid_slot(hours: StoreHours, value: &str) -> bool {
    time_slots(hours).iter().any(|s| s.value == value)
}

/// Earliest date offered for fulfillment: the day after `today`.
#[must_use]
pub fn next_day_date(today: NaiveDate) -> NaiveDate {
    today.checked_add_days(Days::new(1)).unwrap_or(today)
}

fn twelve_hour_label(hour: u8) -> String {
    let display = match hour % 12 {
        0 => 12,
        h => h,
    };
    let period = if hour % 24 < 12 { "AM" } else { "PM" };
    format!("{display}:00 {period}")
}
