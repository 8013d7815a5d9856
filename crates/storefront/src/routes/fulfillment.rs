//! Fulfillment scheduling route handler.

use axum::{Json, extract::State};
use chrono::NaiveDate;
use serde::Serialize;
use tracing::instrument;

use tannenbaum_core::fulfillment::{self, TimeSlot};

use crate::state::AppState;

/// Offered fulfillment scheduling options.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotsResponse {
    /// Earliest date an order can be fulfilled (tomorrow).
    pub pickup_date: NaiveDate,
    /// Three-hour windows within store hours.
    pub slots: Vec<TimeSlot>,
}

/// Return the next fulfillment date and the selectable time windows.
#[instrument(skip(state))]
pub async fn slots(State(state): State<AppState>) -> Json<SlotsResponse> {
    let today = chrono::Utc::now().date_naive();

    Json(SlotsResponse {
        pickup_date: fulfillment::next_day_date(today),
        slots: fulfillment::time_slots(state.store().hours),
    })
}
