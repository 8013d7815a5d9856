//! Delivery quote route handler.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use tannenbaum_core::delivery::{self, DeliveryTier};
use tannenbaum_core::geo;
use tannenbaum_core::money::Money;
use tannenbaum_core::{Coordinates, DeliveryAddress};

use crate::error::{AppError, Result};
use crate::state::AppState;

/// Delivery quote request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteBody {
    pub location_id: String,
    pub address: DeliveryAddress,
}

/// A priced delivery quote.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteResponse {
    pub distance_miles: f64,
    pub tier: DeliveryTier,
    pub fee: Money,
    pub fee_display: String,
}

/// Geocode a delivery address and price its distance tier.
///
/// Addresses past the service radius come back as a recoverable 422, not a
/// price; the fee itself is read from the catalog's reserved delivery item.
#[instrument(skip(state, body))]
pub async fn quote(
    State(state): State<AppState>,
    Json(body): Json<QuoteBody>,
) -> Result<Json<QuoteResponse>> {
    let location = state
        .store()
        .location(&body.location_id)
        .ok_or_else(|| AppError::BadRequest(format!("Unknown store location: {}", body.location_id)))?;

    if !body.address.is_complete() {
        return Err(AppError::Validation(
            "Delivery address is incomplete".to_string(),
        ));
    }

    let coords: Coordinates = state.geocoder().geocode(&body.address.formatted()).await?;
    let distance = geo::distance_miles(location.coords, coords);

    // The configured radius gates service; the resolver classifies within it.
    if distance > state.store().max_delivery_radius_miles {
        return Err(AppError::OutsideRadius { distance });
    }
    let tier = delivery::resolve_tier(distance).ok_or(AppError::OutsideRadius { distance })?;

    let catalog = state
        .square()
        .catalog(state.store())
        .await
        .map_err(AppError::Catalog)?;
    let fee = delivery::tier_fee(&catalog, tier).ok_or_else(|| {
        AppError::Validation("Delivery pricing is unavailable for this tier".to_string())
    })?;

    Ok(Json(QuoteResponse {
        distance_miles: distance,
        tier,
        fee,
        fee_display: fee.display(),
    }))
}
