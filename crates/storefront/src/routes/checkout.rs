//! Checkout route handlers.
//!
//! `review` and `back` drive the details/summary flow over the session
//! cart. `submit` is the stateless contract: it re-validates everything the
//! client claims (pickup slot, delivery address and radius), assembles the
//! payment-link request, and only then talks to the payment provider. The
//! session cart is cleared once the provider accepts the submission.

use axum::{Json, extract::State};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use tannenbaum_core::checkout::flow::FlowContext;
use tannenbaum_core::checkout::{self, CheckoutDraft};
use tannenbaum_core::delivery::{self, DeliveryTier};
use tannenbaum_core::geo;
use tannenbaum_core::{CartItem, CartState, DeliveryAddress, FulfillmentType, StoreLocation};

use crate::error::{AppError, Result};
use crate::session;
use crate::square::types::PaymentLink;
use crate::state::AppState;

/// Checkout submission body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutBody {
    pub cart_items: Vec<CartItem>,
    pub location_id: String,
    pub fulfillment_type: FulfillmentType,
    pub pickup_date: Option<NaiveDate>,
    pub pickup_time: Option<String>,
    pub delivery_address: Option<DeliveryAddress>,
}

/// Successful checkout response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutResponse {
    pub payment_link: PaymentLink,
}

/// Review/back request body: the fulfillment choice the customer made on
/// the details step.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowBody {
    pub fulfillment_type: FulfillmentType,
    pub pickup_time: Option<String>,
    pub delivery_tier: Option<DeliveryTier>,
}

/// Move the session checkout from details to summary.
///
/// For delivery orders this adds the resolved tier's fee line to the cart,
/// so the summary and the provider price the same lines.
#[instrument(skip(state, session, body))]
pub async fn review(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<FlowBody>,
) -> Result<Json<CartState>> {
    let catalog = state
        .square()
        .catalog(state.store())
        .await
        .map_err(AppError::Catalog)?;

    let ctx = FlowContext {
        catalog: &catalog,
        hours: state.store().hours,
        fulfillment: body.fulfillment_type,
        pickup_slot: body.pickup_time.as_deref(),
        delivery_tier: body.delivery_tier,
    };

    let mut flow = session::load_flow(&session).await?;
    let cart = session::load_cart(&session).await?;
    let cart = flow
        .proceed(cart, &ctx)
        .map_err(|e| AppError::Validation(e.to_string()))?;

    session::save_cart(&session, &cart).await?;
    session::save_flow(&session, flow).await?;
    Ok(Json(cart))
}

/// Move the session checkout from summary back to details, retracting the
/// delivery fee line added on the way forward.
#[instrument(skip(state, session, body))]
pub async fn back(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<FlowBody>,
) -> Result<Json<CartState>> {
    let catalog = state
        .square()
        .catalog(state.store())
        .await
        .map_err(AppError::Catalog)?;

    let ctx = FlowContext {
        catalog: &catalog,
        hours: state.store().hours,
        fulfillment: body.fulfillment_type,
        pickup_slot: body.pickup_time.as_deref(),
        delivery_tier: body.delivery_tier,
    };

    let mut flow = session::load_flow(&session).await?;
    let cart = session::load_cart(&session).await?;
    let cart = flow.back(cart, &ctx);

    session::save_cart(&session, &cart).await?;
    session::save_flow(&session, flow).await?;
    Ok(Json(cart))
}

/// Submit a checkout and return the hosted payment URL.
#[instrument(skip(state, session, body))]
pub async fn submit(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<CheckoutBody>,
) -> Result<Json<CheckoutResponse>> {
    let location = state
        .store()
        .location(&body.location_id)
        .ok_or_else(|| AppError::BadRequest(format!("Unknown store location: {}", body.location_id)))?;

    // Rebuild the cart from the submitted lines through the reducer, so
    // duplicate keys merge instead of producing duplicate order lines.
    let cart = body.cart_items.iter().fold(CartState::default(), |cart, line| {
        cart.apply_with_effects(
            &tannenbaum_core::CartAction::Add {
                item_id: line.item_id.clone(),
                variation_id: line.variation_id.clone(),
                quantity: line.quantity,
            },
            None,
        )
    });

    let delivery_tier = match body.fulfillment_type {
        FulfillmentType::Delivery => Some(resolve_delivery(&state, location, &body).await?),
        FulfillmentType::Pickup => None,
    };

    let draft = CheckoutDraft {
        cart: &cart,
        square_location_id: &location.square_location_id,
        fulfillment: body.fulfillment_type,
        pickup_date: body.pickup_date,
        pickup_slot: body.pickup_time.as_deref(),
        delivery_address: body.delivery_address.as_ref(),
        delivery_tier,
        base_url: &state.config().base_url,
    };

    let request = checkout::assemble(&draft, state.store().hours)
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let payment_link = state
        .square()
        .create_payment_link(&request)
        .await
        .map_err(AppError::Payment)?;

    // The submission is in the provider's hands now; the session cart and
    // flow restart clean.
    let mut flow = session::load_flow(&session).await?;
    flow.reset();
    session::save_cart(&session, &CartState::default()).await?;
    session::save_flow(&session, flow).await?;

    tracing::info!(order_id = ?payment_link.order_id, "checkout submitted");
    Ok(Json(CheckoutResponse { payment_link }))
}

/// Re-validate a delivery submission server-side: geocode the address,
/// measure the distance from the chosen lot, and resolve the tier.
async fn resolve_delivery(
    state: &AppState,
    location: &StoreLocation,
    body: &CheckoutBody,
) -> Result<DeliveryTier> {
    let address = body.delivery_address.as_ref().ok_or_else(|| {
        AppError::Validation("A delivery address is required for delivery orders".to_string())
    })?;
    if !address.is_complete() {
        return Err(AppError::Validation(
            "Delivery address is incomplete".to_string(),
        ));
    }

    let coords = state.geocoder().geocode(&address.formatted()).await?;
    let distance = geo::distance_miles(location.coords, coords);

    if distance > state.store().max_delivery_radius_miles {
        return Err(AppError::OutsideRadius { distance });
    }
    delivery::resolve_tier(distance).ok_or(AppError::OutsideRadius { distance })
}
