//! Unified error handling for the storefront.
//!
//! Provides a unified `AppError` type converting every failure class into a
//! structured JSON response. All route handlers return `Result<T, AppError>`;
//! nothing is silently swallowed at the boundary.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::config::ConfigError;
use crate::services::geocode::GeocodeError;
use crate::square::SquareError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Server configuration is missing or invalid. Fatal, never retried.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The vendor catalog could not be fetched or was empty/malformed.
    #[error("Catalog error: {0}")]
    Catalog(SquareError),

    /// The payment provider rejected or failed the payment-link call.
    #[error("Payment provider error: {0}")]
    Payment(SquareError),

    /// The delivery address could not be resolved to coordinates.
    #[error("Geocoding error: {0}")]
    Geocode(#[from] GeocodeError),

    /// The resolved address is beyond the delivery radius.
    #[error("Address is {distance:.1} miles away, outside the delivery radius")]
    OutsideRadius { distance: f64 },

    /// A recoverable precondition failure; checkout is blocked until fixed.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Session load/store failed.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),
}

/// JSON error body returned to clients.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if matches!(
            self,
            Self::Config(_) | Self::Catalog(_) | Self::Payment(_) | Self::Session(_)
        ) {
            tracing::error!(error = %self, "Request error");
        }

        let status = match &self {
            Self::Config(_) | Self::Catalog(_) | Self::Session(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::Payment(_) => StatusCode::BAD_GATEWAY,
            Self::Geocode(_) | Self::OutsideRadius { .. } | Self::Validation(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        };

        // Don't expose internal error details to clients; upstream catalog
        // failures keep their detail per the public API contract.
        let body = match &self {
            Self::Config(_) => ErrorBody {
                error: "Server configuration error".to_string(),
                details: None,
            },
            Self::Catalog(source) => ErrorBody {
                error: "Failed to fetch catalog".to_string(),
                details: Some(source.to_string()),
            },
            Self::Payment(_) => ErrorBody {
                error: "Failed to create checkout".to_string(),
                details: None,
            },
            Self::Session(_) => ErrorBody {
                error: "Internal server error".to_string(),
                details: None,
            },
            Self::Geocode(source) => ErrorBody {
                error: source.to_string(),
                details: None,
            },
            Self::OutsideRadius { .. } => ErrorBody {
                error: "Sorry, we only deliver within 8 miles of our location.".to_string(),
                details: None,
            },
            Self::Validation(message) | Self::BadRequest(message) => ErrorBody {
                error: message.clone(),
                details: None,
            },
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn get_status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_status_codes_follow_the_taxonomy() {
        assert_eq!(
            get_status(AppError::Config(ConfigError::MissingEnvVar(
                "SQUARE_ACCESS_TOKEN".to_string()
            ))),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            get_status(AppError::Catalog(SquareError::MissingPaymentLink)),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            get_status(AppError::Payment(SquareError::MissingPaymentLink)),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            get_status(AppError::Geocode(GeocodeError::Unresolvable)),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            get_status(AppError::OutsideRadius { distance: 9.3 }),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            get_status(AppError::Validation("missing pickup slot".to_string())),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            get_status(AppError::BadRequest("unknown location".to_string())),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_outside_radius_display() {
        let err = AppError::OutsideRadius { distance: 9.3 };
        assert_eq!(
            err.to_string(),
            "Address is 9.3 miles away, outside the delivery radius"
        );
    }
}
