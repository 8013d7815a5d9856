//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `SQUARE_ACCESS_TOKEN` - Square API access token
//! - `BASE_URL` - Public URL for the storefront (redirect construction)
//! - `GOOGLE_MAPS_API_KEY` - Geocoding API key for delivery addresses
//!
//! ## Optional
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `SQUARE_ENV` - `sandbox` or `production` (default: sandbox)
//! - `SQUARE_API_VERSION` - Square-Version header (default: 2024-11-20)
//! - `SQUARE_LOCATION_ID_LA` - Provider location id for the downtown lot
//! - `SQUARE_LOCATION_ID_ALTADENA` - Provider location id for the Altadena lot
//! - `STORE_CATEGORY_ID` - Vendor category whose items are sold here

use std::net::{IpAddr, SocketAddr};

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

use tannenbaum_core::geo::Coordinates;
use tannenbaum_core::{StoreConfig, StoreHours, StoreLocation};

/// Default vendor category for the tree lot.
const DEFAULT_CATEGORY_ID: &str = "IQ6T2GWVZQBH33LUA7NLBG46";

/// Prefix reserved for delivery-fee catalog items.
const DELIVERY_ITEM_PREFIX: &str = "DELIVERY-";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Which Square environment to talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SquareEnvironment {
    Sandbox,
    Production,
}

impl SquareEnvironment {
    /// REST base URL for this environment.
    #[must_use]
    pub const fn base_url(self) -> &'static str {
        match self {
            Self::Sandbox => "https://connect.squareupsandbox.com",
            Self::Production => "https://connect.squareup.com",
        }
    }
}

/// Square API configuration.
///
/// Implements `Debug` manually to redact the access token.
#[derive(Clone)]
pub struct SquareConfig {
    /// API access token (server-side only).
    pub access_token: SecretString,
    /// Sandbox or production.
    pub environment: SquareEnvironment,
    /// Square-Version header value.
    pub api_version: String,
}

impl std::fmt::Debug for SquareConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SquareConfig")
            .field("access_token", &"[REDACTED]")
            .field("environment", &self.environment)
            .field("api_version", &self.api_version)
            .finish()
    }
}

/// Geocoding service configuration.
#[derive(Clone)]
pub struct GeocodingConfig {
    /// Google Maps Geocoding API key.
    pub api_key: SecretString,
}

impl std::fmt::Debug for GeocodingConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeocodingConfig")
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the storefront
    pub base_url: String,
    /// Square API configuration
    pub square: SquareConfig,
    /// Geocoding service configuration
    pub geocoding: GeocodingConfig,
    /// Store-level constants injected into the core components
    pub store: StoreConfig,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("STOREFRONT_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_HOST".to_string(), e.to_string())
            })?;
        let port = get_env_or_default("STOREFRONT_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_PORT".to_string(), e.to_string())
            })?;

        let base_url = get_required_env("BASE_URL")?;
        Url::parse(&base_url)
            .map_err(|e| ConfigError::InvalidEnvVar("BASE_URL".to_string(), e.to_string()))?;

        let square = SquareConfig::from_env()?;
        let geocoding = GeocodingConfig::from_env()?;
        let store = store_config_from_env();

        Ok(Self {
            host,
            port,
            base_url,
            square,
            geocoding,
            store,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl SquareConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let environment = match get_env_or_default("SQUARE_ENV", "sandbox").as_str() {
            "production" => SquareEnvironment::Production,
            _ => SquareEnvironment::Sandbox,
        };

        Ok(Self {
            access_token: get_required_secret("SQUARE_ACCESS_TOKEN")?,
            environment,
            api_version: get_env_or_default("SQUARE_API_VERSION", "2024-11-20"),
        })
    }
}

impl GeocodingConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            api_key: get_required_secret("GOOGLE_MAPS_API_KEY")?,
        })
    }
}

/// Build the injected store constants, with env overrides for the values
/// that differ between sandbox and production vendor accounts.
fn store_config_from_env() -> StoreConfig {
    StoreConfig {
        target_category_id: get_env_or_default("STORE_CATEGORY_ID", DEFAULT_CATEGORY_ID),
        delivery_item_prefix: DELIVERY_ITEM_PREFIX.to_string(),
        locations: vec![
            StoreLocation {
                id: "los-angeles".to_string(),
                name: "Los Angeles".to_string(),
                square_location_id: get_env_or_default("SQUARE_LOCATION_ID_LA", "L5BQY108WBHK4"),
                coords: Coordinates::new(34.044227, -118.272217),
                address: "1360 S Figueroa St, Los Angeles, CA 90015".to_string(),
            },
            StoreLocation {
                id: "altadena".to_string(),
                name: "Altadena".to_string(),
                square_location_id: get_env_or_default(
                    "SQUARE_LOCATION_ID_ALTADENA",
                    "LR7THQ45Q4P0V",
                ),
                coords: Coordinates::new(34.190141, -118.158531),
                address: "2308 N. Lincoln Ave, Altadena, CA 91001".to_string(),
            },
        ],
        hours: StoreHours { open: 9, close: 21 },
        max_delivery_radius_miles: 8.0,
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get a required environment variable as a secret.
fn get_required_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    Ok(SecretString::from(value))
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn config() -> StorefrontConfig {
        StorefrontConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            base_url: "http://localhost:3000".to_string(),
            square: SquareConfig {
                access_token: SecretString::from("EAAA-test-token"),
                environment: SquareEnvironment::Sandbox,
                api_version: "2024-11-20".to_string(),
            },
            geocoding: GeocodingConfig {
                api_key: SecretString::from("AIza-test-key"),
            },
            store: store_config_from_env(),
        }
    }

    #[test]
    fn test_socket_addr() {
        let config = config();
        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 3000);
    }

    #[test]
    fn test_environment_base_urls() {
        assert_eq!(
            SquareEnvironment::Sandbox.base_url(),
            "https://connect.squareupsandbox.com"
        );
        assert_eq!(
            SquareEnvironment::Production.base_url(),
            "https://connect.squareup.com"
        );
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = config();

        let debug_output = format!("{config:?}");
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("EAAA-test-token"));
        assert!(!debug_output.contains("AIza-test-key"));
    }

    #[test]
    fn test_store_defaults() {
        let store = store_config_from_env();
        assert_eq!(store.delivery_item_prefix, "DELIVERY-");
        assert_eq!(store.locations.len(), 2);
        assert!(store.location("altadena").is_some());
        assert!((store.max_delivery_radius_miles - 8.0).abs() < f64::EPSILON);
    }
}
