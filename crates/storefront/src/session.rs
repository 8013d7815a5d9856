//! Session storage for the cart and checkout flow.
//!
//! The session holds exactly two values: the cart and the current checkout
//! step. Both are written only by the route handlers, and the cart itself is
//! mutated only through the core reducer.

use tower_sessions::{Expiry, MemoryStore, Session, SessionManagerLayer};

use tannenbaum_core::CartState;
use tannenbaum_core::checkout::flow::CheckoutFlow;

use crate::config::StorefrontConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "tb_session";

/// Session expiry time in seconds (7 days).
const SESSION_EXPIRY_SECONDS: i64 = 7 * 24 * 60 * 60;

/// Session keys for cart and checkout state.
pub mod keys {
    /// Key for the session cart.
    pub const CART: &str = "cart";

    /// Key for the checkout flow step.
    pub const CHECKOUT_FLOW: &str = "checkout_flow";
}

/// Create the session layer with an in-memory store.
///
/// Carts are short-lived by nature (a lost session just means an empty
/// cart), so no persistent store is configured.
#[must_use]
pub fn create_session_layer(config: &StorefrontConfig) -> SessionManagerLayer<MemoryStore> {
    let store = MemoryStore::default();

    // Determine if we're in production (HTTPS)
    let is_secure = config.base_url.starts_with("https://");

    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(is_secure)
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}

/// Load the session cart, empty when none has been stored yet.
///
/// # Errors
///
/// Returns an error when the session backend fails.
pub async fn load_cart(session: &Session) -> Result<CartState, tower_sessions::session::Error> {
    Ok(session
        .get::<CartState>(keys::CART)
        .await?
        .unwrap_or_default())
}

/// Persist the cart back to the session.
///
/// # Errors
///
/// Returns an error when the session backend fails.
pub async fn save_cart(
    session: &Session,
    cart: &CartState,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(keys::CART, cart).await
}

/// Load the checkout flow state, starting at details.
///
/// # Errors
///
/// Returns an error when the session backend fails.
pub async fn load_flow(session: &Session) -> Result<CheckoutFlow, tower_sessions::session::Error> {
    Ok(session
        .get::<CheckoutFlow>(keys::CHECKOUT_FLOW)
        .await?
        .unwrap_or_default())
}

/// Persist the checkout flow state.
///
/// # Errors
///
/// Returns an error when the session backend fails.
pub async fn save_flow(
    session: &Session,
    flow: CheckoutFlow,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(keys::CHECKOUT_FLOW, flow).await
}
