//! Square REST API client.
//!
//! # Architecture
//!
//! - Square is the source of truth for the catalog - no local sync, direct
//!   API calls through `reqwest`
//! - The normalized catalog is cached in-memory via `moka` (5 minute TTL)
//! - Payment links are never cached
//!
//! # Example
//!
//! ```rust,ignore
//! use tannenbaum_storefront::square::SquareClient;
//!
//! let client = SquareClient::new(&config.square)?;
//!
//! // Fetch the normalized catalog (cached)
//! let catalog = client.catalog(&config.store).await?;
//!
//! // Create a hosted payment page
//! let link = client.create_payment_link(&request).await?;
//! ```

pub mod normalize;
pub mod types;

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use thiserror::Error;
use tracing::{debug, instrument};

use tannenbaum_core::checkout::PaymentLinkRequest;
use tannenbaum_core::{Catalog, StoreConfig};

use crate::config::SquareConfig;
use normalize::UpstreamDataError;
use types::{CatalogObject, CreatePaymentLinkResponse, ListCatalogResponse, PaymentLink};

/// Catalog object types requested from the vendor.
const CATALOG_TYPES: &str = "ITEM,IMAGE,CATEGORY";

/// How long a fetched catalog stays warm.
const CATALOG_TTL: Duration = Duration::from_secs(300);

/// Errors that can occur when interacting with the Square API.
#[derive(Debug, Error)]
pub enum SquareError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("Square API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Rate limited by Square.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// The access token could not be turned into a header.
    #[error("Invalid access token format")]
    InvalidToken,

    /// The vendor catalog batch was empty or absent.
    #[error("Upstream data error: {0}")]
    UpstreamData(#[from] UpstreamDataError),

    /// The provider accepted the request but returned no payment link.
    #[error("payment link missing from Square response")]
    MissingPaymentLink,
}

/// Client for the Square REST API.
///
/// Provides the normalized catalog and payment-link creation. The catalog
/// is cached for 5 minutes; payment links are not cached.
#[derive(Clone)]
pub struct SquareClient {
    inner: Arc<SquareClientInner>,
}

struct SquareClientInner {
    client: reqwest::Client,
    base_url: String,
    catalog_cache: Cache<&'static str, Arc<Catalog>>,
}

impl SquareClient {
    /// Create a new Square API client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build or the access
    /// token is not a valid header value.
    pub fn new(config: &SquareConfig) -> Result<Self, SquareError> {
        let mut headers = HeaderMap::new();
        let auth_value = format!("Bearer {}", config.access_token.expose_secret());
        let mut auth_header =
            HeaderValue::from_str(&auth_value).map_err(|_| SquareError::InvalidToken)?;
        auth_header.set_sensitive(true);
        headers.insert("Authorization", auth_header);
        headers.insert(
            "Square-Version",
            HeaderValue::from_str(&config.api_version).map_err(|_| SquareError::InvalidToken)?,
        );
        headers.insert("Content-Type", HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        let catalog_cache = Cache::builder()
            .max_capacity(4)
            .time_to_live(CATALOG_TTL)
            .build();

        Ok(Self {
            inner: Arc::new(SquareClientInner {
                client,
                base_url: config.environment.base_url().to_string(),
                catalog_cache,
            }),
        })
    }

    /// Fetch and normalize the catalog, serving from cache when warm.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or the batch is empty.
    #[instrument(skip(self, store))]
    pub async fn catalog(&self, store: &StoreConfig) -> Result<Arc<Catalog>, SquareError> {
        if let Some(catalog) = self.inner.catalog_cache.get("catalog").await {
            debug!("Cache hit for catalog");
            return Ok(catalog);
        }

        let objects = self.list_catalog_objects().await?;
        let catalog = Arc::new(normalize::normalize(&objects, store)?);

        self.inner
            .catalog_cache
            .insert("catalog", Arc::clone(&catalog))
            .await;

        Ok(catalog)
    }

    /// Drop the cached catalog so the next read refetches.
    pub async fn invalidate_catalog(&self) {
        self.inner.catalog_cache.invalidate("catalog").await;
    }

    /// Fetch every raw catalog record, following pagination cursors.
    async fn list_catalog_objects(&self) -> Result<Vec<CatalogObject>, SquareError> {
        let url = format!("{}/v2/catalog/list", self.inner.base_url);
        let mut objects = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let mut request = self
                .inner
                .client
                .get(&url)
                .query(&[("types", CATALOG_TYPES)]);
            if let Some(cursor) = &cursor {
                request = request.query(&[("cursor", cursor.as_str())]);
            }

            let response = request.send().await?;
            let page: ListCatalogResponse = Self::read_json(response).await?;

            objects.extend(page.objects);
            match page.cursor {
                Some(next) => cursor = Some(next),
                None => break,
            }
        }

        debug!(count = objects.len(), "fetched raw catalog objects");
        Ok(objects)
    }

    /// Create a hosted payment page for a validated checkout request.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or no link is returned.
    #[instrument(skip(self, request), fields(idempotency_key = %request.idempotency_key))]
    pub async fn create_payment_link(
        &self,
        request: &PaymentLinkRequest,
    ) -> Result<PaymentLink, SquareError> {
        let url = format!("{}/v2/online-checkout/payment-links", self.inner.base_url);

        let response = self.inner.client.post(&url).json(request).send().await?;
        let body: CreatePaymentLinkResponse = Self::read_json(response).await?;

        if let Some(error) = body.errors.first() {
            return Err(SquareError::Api {
                status: 400,
                message: error
                    .detail
                    .clone()
                    .or_else(|| error.code.clone())
                    .unwrap_or_else(|| "unknown provider error".to_string()),
            });
        }

        body.payment_link.ok_or(SquareError::MissingPaymentLink)
    }

    /// Check status and decode a JSON response body.
    async fn read_json<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, SquareError> {
        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(SquareError::RateLimited(retry_after));
        }

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            tracing::error!(
                status = %status,
                body = %message.chars().take(500).collect::<String>(),
                "Square API returned non-success status"
            );
            return Err(SquareError::Api {
                status: status.as_u16(),
                message: message.chars().take(200).collect(),
            });
        }

        Ok(response.json::<T>().await?)
    }
}
