//! Google Maps geocoding client.
//!
//! Resolves a customer's free-text delivery address to coordinates so the
//! delivery distance can be computed. No retry or cancellation is layered on
//! top of the transport; a stale response for an edited address is simply
//! last-write-wins at the caller.

use reqwest::Url;
use secrecy::ExposeSecret;
use serde::Deserialize;
use thiserror::Error;
use tracing::instrument;

use tannenbaum_core::geo::Coordinates;

use crate::config::GeocodingConfig;

/// Geocoding API endpoint.
const GEOCODE_URL: &str = "https://maps.googleapis.com/maps/api/geocode/json";

/// Errors that can occur while resolving an address.
#[derive(Debug, Error)]
pub enum GeocodeError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("geocoding service error: {status}")]
    Api { status: u16 },

    /// The address produced no results.
    #[error("Invalid address")]
    Unresolvable,
}

/// Client for the Google Maps Geocoding API.
#[derive(Clone)]
pub struct GeocodingClient {
    client: reqwest::Client,
    api_key: secrecy::SecretString,
}

/// Response envelope from the geocoding API.
#[derive(Debug, Deserialize)]
struct GeocodingResponse {
    #[serde(default)]
    results: Vec<GeocodingResult>,
}

#[derive(Debug, Deserialize)]
struct GeocodingResult {
    geometry: Geometry,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: Location,
}

#[derive(Debug, Deserialize)]
struct Location {
    lat: f64,
    lng: f64,
}

impl GeocodingClient {
    /// Create a new geocoding client.
    #[must_use]
    pub fn new(config: &GeocodingConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: config.api_key.clone(),
        }
    }

    /// Resolve a formatted address to coordinates.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError::Unresolvable`] when the service has no match
    /// for the address, or a transport/API error otherwise.
    #[instrument(skip(self, address))]
    pub async fn geocode(&self, address: &str) -> Result<Coordinates, GeocodeError> {
        let url = Url::parse_with_params(
            GEOCODE_URL,
            &[("address", address), ("key", self.api_key.expose_secret())],
        )
        .map_err(|_| GeocodeError::Unresolvable)?;

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(GeocodeError::Api {
                status: status.as_u16(),
            });
        }

        let body: GeocodingResponse = response.json().await?;
        body.results
            .first()
            .map(|r| Coordinates::new(r.geometry.location.lat, r.geometry.location.lng))
            .ok_or(GeocodeError::Unresolvable)
    }
}
