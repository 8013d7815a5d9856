//! Application state shared across handlers.

use std::sync::Arc;

use tannenbaum_core::StoreConfig;

use crate::config::StorefrontConfig;
use crate::services::geocode::GeocodingClient;
use crate::square::{SquareClient, SquareError};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// vendor clients and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    square: SquareClient,
    geocoder: GeocodingClient,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if the Square client cannot be built from the
    /// configured credentials.
    pub fn new(config: StorefrontConfig) -> Result<Self, SquareError> {
        let square = SquareClient::new(&config.square)?;
        let geocoder = GeocodingClient::new(&config.geocoding);

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                square,
                geocoder,
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the injected store constants.
    #[must_use]
    pub fn store(&self) -> &StoreConfig {
        &self.inner.config.store
    }

    /// Get a reference to the Square API client.
    #[must_use]
    pub fn square(&self) -> &SquareClient {
        &self.inner.square
    }

    /// Get a reference to the geocoding client.
    #[must_use]
    pub fn geocoder(&self) -> &GeocodingClient {
        &self.inner.geocoder
    }
}
