//! Cart route handlers.
//!
//! Each handler loads the session cart, dispatches exactly one reducer
//! action, and stores the result. Adding a line passes the cached catalog
//! along so the companion-stand rule can fire; if the catalog is
//! momentarily unavailable the add still succeeds without the suggestion.

use axum::{Json, extract::State};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use tannenbaum_core::{CartAction, CartState};

use crate::error::Result;
use crate::session;
use crate::state::AppState;

/// Add to cart request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddBody {
    pub item_id: String,
    pub variation_id: String,
    pub quantity: Option<u32>,
}

/// Update quantity request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBody {
    pub item_id: String,
    pub variation_id: String,
    pub quantity: u32,
}

/// Remove line request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveBody {
    pub item_id: String,
    pub variation_id: String,
}

/// Return the current session cart.
#[instrument(skip(session))]
pub async fn show(session: Session) -> Result<Json<CartState>> {
    let cart = session::load_cart(&session).await?;
    Ok(Json(cart))
}

/// Add a line to the cart.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<AddBody>,
) -> Result<Json<CartState>> {
    // The companion rule needs the catalog; an upstream hiccup should not
    // block adding the line itself.
    let catalog = match state.square().catalog(state.store()).await {
        Ok(catalog) => Some(catalog),
        Err(e) => {
            tracing::warn!("Adding without companion suggestions: {e}");
            None
        }
    };

    let action = CartAction::Add {
        item_id: body.item_id,
        variation_id: body.variation_id,
        quantity: body.quantity.unwrap_or(1).max(1),
    };

    let cart = session::load_cart(&session).await?;
    let cart = cart.apply_with_effects(&action, catalog.as_deref());
    session::save_cart(&session, &cart).await?;

    Ok(Json(cart))
}

/// Set a line's quantity; zero or less removes the line.
#[instrument(skip(session))]
pub async fn update(session: Session, Json(body): Json<UpdateBody>) -> Result<Json<CartState>> {
    let action = CartAction::SetQuantity {
        item_id: body.item_id,
        variation_id: body.variation_id,
        quantity: body.quantity,
    };

    let cart = session::load_cart(&session).await?;
    let cart = cart.apply_with_effects(&action, None);
    session::save_cart(&session, &cart).await?;

    Ok(Json(cart))
}

/// Remove a line entirely, regardless of quantity.
#[instrument(skip(session))]
pub async fn remove(session: Session, Json(body): Json<RemoveBody>) -> Result<Json<CartState>> {
    let action = CartAction::Remove {
        item_id: body.item_id,
        variation_id: body.variation_id,
    };

    let cart = session::load_cart(&session).await?;
    let cart = cart.apply_with_effects(&action, None);
    session::save_cart(&session, &cart).await?;

    Ok(Json(cart))
}

/// Empty the cart.
#[instrument(skip(session))]
pub async fn clear(session: Session) -> Result<Json<CartState>> {
    let cart = session::load_cart(&session).await?;
    let cart = cart.apply_with_effects(&CartAction::Clear, None);
    session::save_cart(&session, &cart).await?;

    Ok(Json(cart))
}
