//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health           - Health check
//! GET  /catalog          - Normalized vendor catalog
//!
//! # Cart (session-backed, reducer-driven)
//! GET  /cart             - Current session cart
//! POST /cart/add         - Add a line (runs the companion rule)
//! POST /cart/update      - Set a line's quantity (0 removes it)
//! POST /cart/remove      - Remove a line
//! POST /cart/clear       - Empty the cart
//!
//! # Fulfillment
//! GET  /fulfillment/slots - Next pickup date and selectable time windows
//!
//! # Delivery
//! POST /delivery/quote   - Geocode an address and price its tier
//!
//! # Checkout
//! POST /checkout/review  - Details -> summary (adds the delivery fee line)
//! POST /checkout/back    - Summary -> details (removes that same line)
//! POST /checkout         - Submit and receive the hosted payment URL
//! ```

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod delivery;
pub mod fulfillment;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/clear", post(cart::clear))
}

/// Create the checkout routes router.
pub fn checkout_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(checkout::submit))
        .route("/review", post(checkout::review))
        .route("/back", post(checkout::back))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/catalog", get(catalog::show))
        .nest("/cart", cart_routes())
        .route("/fulfillment/slots", get(fulfillment::slots))
        .route("/delivery/quote", post(delivery::quote))
        .nest("/checkout", checkout_routes())
}
