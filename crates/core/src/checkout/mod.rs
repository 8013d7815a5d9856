//! Payment-link assembly and the details/summary checkout flow.
//!
//! [`assemble`] validates fulfillment preconditions and produces the
//! outbound payment-link request; the actual call to the payment provider
//! lives in the storefront crate. The [`flow`] module owns the two-step
//! details/summary transition over the session cart.

pub mod flow;

use std::collections::BTreeMap;

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::cart::CartState;
use crate::config::StoreHours;
use crate::delivery::DeliveryTier;
use crate::fulfillment::{self, DeliveryAddress, FulfillmentType};

/// Precondition failures raised before any external call is attempted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckoutError {
    /// The cart has no lines to submit.
    #[error("cart is empty")]
    EmptyCart,

    /// Pickup orders need a selected time slot.
    #[error("a pickup time slot is required")]
    MissingPickupSlot,

    /// The submitted pickup time is not one of the offered windows.
    #[error("pickup time {0:?} is not an offered slot")]
    InvalidPickupSlot(String),

    /// Delivery orders need a resolved, in-radius fee tier.
    #[error("a resolved delivery tier is required for delivery orders")]
    MissingDeliveryTier,

    /// Delivery orders need a complete destination address.
    #[error("delivery address is incomplete")]
    IncompleteAddress,
}

/// Everything the assembler needs to build one submission attempt.
#[derive(Debug)]
pub struct CheckoutDraft<'a> {
    pub cart: &'a CartState,
    /// The payment provider's id for the selected lot.
    pub square_location_id: &'a str,
    pub fulfillment: FulfillmentType,
    pub pickup_date: Option<NaiveDate>,
    pub pickup_slot: Option<&'a str>,
    pub delivery_address: Option<&'a DeliveryAddress>,
    pub delivery_tier: Option<DeliveryTier>,
    /// Public base URL the provider redirects back to.
    pub base_url: &'a str,
}

/// One order line sent to the payment provider.
///
/// Prices are not re-sent; the provider resolves them from the catalog
/// reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLineItem {
    /// Quantity as a decimal string, per the provider's wire format.
    pub quantity: String,
    pub catalog_object_id: String,
}

/// The order portion of a payment-link request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderRequest {
    pub location_id: String,
    pub line_items: Vec<OrderLineItem>,
    /// Fulfillment details the lot crew reads off the order.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, String>,
}

/// Redirect configuration for the hosted payment page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutOptions {
    pub redirect_url: String,
}

/// A validated payment-link request, ready for the provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentLinkRequest {
    /// Distinguishes this submission attempt so the provider can dedupe.
    pub idempotency_key: String,
    pub order: OrderRequest,
    pub checkout_options: CheckoutOptions,
}

/// Validate preconditions and build the payment-link request.
///
/// # Errors
///
/// Returns a [`CheckoutError`] when the cart is empty, a pickup order has a
/// missing or unoffered time slot, or a delivery order lacks a complete
/// address or resolved tier. All validation happens before any external
/// call.
pub fn assemble(
    draft: &CheckoutDraft<'_>,
    hours: StoreHours,
) -> Result<PaymentLinkRequest, CheckoutError> {
    if draft.cart.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }

    let metadata = match draft.fulfillment {
        FulfillmentType::Pickup => {
            let slot = draft.pickup_slot.ok_or(CheckoutError::MissingPickupSlot)?;
            if slot.is_empty() {
                return Err(CheckoutError::MissingPickupSlot);
            }
            if !fulfillment::is_valid_slot(hours, slot) {
                return Err(CheckoutError::InvalidPickupSlot(slot.to_string()));
            }
            pickup_metadata(draft.pickup_date, slot)
        }
        FulfillmentType::Delivery => {
            let address = draft
                .delivery_address
                .ok_or(CheckoutError::IncompleteAddress)?;
            if !address.is_complete() {
                return Err(CheckoutError::IncompleteAddress);
            }
            let tier = draft
                .delivery_tier
                .ok_or(CheckoutError::MissingDeliveryTier)?;
            delivery_metadata(address, tier)
        }
    };

    let line_items = draft
        .cart
        .items()
        .iter()
        .map(|line| OrderLineItem {
            quantity: line.quantity.to_string(),
            catalog_object_id: line.variation_id.clone(),
        })
        .collect();

    Ok(PaymentLinkRequest {
        idempotency_key: idempotency_key(),
        order: OrderRequest {
            location_id: draft.square_location_id.to_string(),
            line_items,
            metadata,
        },
        checkout_options: CheckoutOptions {
            redirect_url: format!(
                "{}/order-confirmation",
                draft.base_url.trim_end_matches('/')
            ),
        },
    })
}

/// Token unique to this submission attempt: millisecond timestamp plus a
/// short random suffix. Uniqueness is probabilistic; the provider's dedupe
/// window makes collisions harmless enough that no retry is attempted.
fn idempotency_key() -> String {
    let mut suffix = Uuid::new_v4().simple().to_string();
    suffix.truncate(8);
    format!("{}-{}", Utc::now().timestamp_millis(), suffix)
}

fn pickup_metadata(date: Option<NaiveDate>, slot: &str) -> BTreeMap<String, String> {
    let mut metadata = BTreeMap::new();
    metadata.insert("fulfillment_type".to_string(), "pickup".to_string());
    if let Some(date) = date {
        metadata.insert("pickup_date".to_string(), date.to_string());
    }
    metadata.insert("pickup_time".to_string(), slot.to_string());
    metadata
}

fn delivery_metadata(address: &DeliveryAddress, tier: DeliveryTier) -> BTreeMap<String, String> {
    let mut metadata = BTreeMap::new();
    metadata.insert("fulfillment_type".to_string(), "delivery".to_string());
    metadata.insert("delivery_address".to_string(), address.formatted());
    metadata.insert(
        "delivery_tier".to_string(),
        tier.item_name().to_string(),
    );
    metadata
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::CartAction;

    const HOURS: StoreHours = StoreHours { open: 9, close: 21 };

    fn cart_with_tree() -> CartState {
        CartState::default().apply_with_effects(
            &CartAction::Add {
                item_id: "tree-1".to_string(),
                variation_id: "tree-6-7".to_string(),
                quantity: 2,
            },
            None,
        )
    }

    fn address() -> DeliveryAddress {
        DeliveryAddress {
            address_line1: "2308 N Lincoln Ave".to_string(),
            address_line2: None,
            city: "Altadena".to_string(),
            state: "CA".to_string(),
            postal_code: "91001".to_string(),
        }
    }

    fn pickup_draft<'a>(cart: &'a CartState, slot: Option<&'a str>) -> CheckoutDraft<'a> {
        CheckoutDraft {
            cart,
            square_location_id: "L5BQY108WBHK4",
            fulfillment: FulfillmentType::Pickup,
            pickup_date: NaiveDate::from_ymd_opt(2024, 12, 20),
            pickup_slot: slot,
            delivery_address: None,
            delivery_tier: None,
            base_url: "https://tannenbaum.example.com",
        }
    }

    #[test]
    fn test_pickup_without_slot_fails_validation() {
        let cart = cart_with_tree();
        let result = assemble(&pickup_draft(&cart, None), HOURS);
        assert_eq!(result.unwrap_err(), CheckoutError::MissingPickupSlot);

        let result = assemble(&pickup_draft(&cart, Some("")), HOURS);
        assert_eq!(result.unwrap_err(), CheckoutError::MissingPickupSlot);
    }

    #[test]
    fn test_pickup_with_unoffered_slot_fails_validation() {
        let cart = cart_with_tree();
        let result = assemble(&pickup_draft(&cart, Some("23:00")), HOURS);
        assert_eq!(
            result.unwrap_err(),
            CheckoutError::InvalidPickupSlot("23:00".to_string())
        );
    }

    #[test]
    fn test_delivery_without_tier_fails_validation() {
        let cart = cart_with_tree();
        let binding = address();
        let draft = CheckoutDraft {
            cart: &cart,
            square_location_id: "LR7THQ45Q4P0V",
            fulfillment: FulfillmentType::Delivery,
            pickup_date: None,
            pickup_slot: None,
            delivery_address: Some(&binding),
            delivery_tier: None,
            base_url: "https://tannenbaum.example.com",
        };
        assert_eq!(
            assemble(&draft, HOURS).unwrap_err(),
            CheckoutError::MissingDeliveryTier
        );
    }

    #[test]
    fn test_empty_cart_fails_validation() {
        let cart = CartState::default();
        let result = assemble(&pickup_draft(&cart, Some("09:00")), HOURS);
        assert_eq!(result.unwrap_err(), CheckoutError::EmptyCart);
    }

    #[test]
    fn test_line_items_mirror_the_cart() {
        let cart = cart_with_tree();
        let request = assemble(&pickup_draft(&cart, Some("12:00")), HOURS).expect("valid draft");

        assert_eq!(request.order.location_id, "L5BQY108WBHK4");
        assert_eq!(
            request.order.line_items,
            vec![OrderLineItem {
                quantity: "2".to_string(),
                catalog_object_id: "tree-6-7".to_string(),
            }]
        );
        assert_eq!(
            request.checkout_options.redirect_url,
            "https://tannenbaum.example.com/order-confirmation"
        );
        assert_eq!(
            request.order.metadata.get("pickup_time"),
            Some(&"12:00".to_string())
        );
    }

    #[test]
    fn test_delivery_request_carries_address_and_tier() {
        let cart = cart_with_tree();
        let binding = address();
        let draft = CheckoutDraft {
            cart: &cart,
            square_location_id: "LR7THQ45Q4P0V",
            fulfillment: FulfillmentType::Delivery,
            pickup_date: None,
            pickup_slot: None,
            delivery_address: Some(&binding),
            delivery_tier: Some(DeliveryTier::Mile2),
            base_url: "https://tannenbaum.example.com/",
        };
        let request = assemble(&draft, HOURS).expect("valid draft");

        assert_eq!(
            request.order.metadata.get("delivery_tier"),
            Some(&"DELIVERY-2-MILE".to_string())
        );
        assert_eq!(
            request.checkout_options.redirect_url,
            "https://tannenbaum.example.com/order-confirmation"
        );
    }

    #[test]
    fn test_idempotency_keys_are_distinct_per_attempt() {
        let cart = cart_with_tree();
        let first = assemble(&pickup_draft(&cart, Some("09:00")), HOURS).expect("valid draft");
        let second = assemble(&pickup_draft(&cart, Some("09:00")), HOURS).expect("valid draft");

        assert_ne!(first.idempotency_key, second.idempotency_key);
        let (millis, suffix) = first
            .idempotency_key
            .split_once('-')
            .expect("timestamp-suffix shape");
        assert!(millis.parse::<i64>().is_ok());
        assert_eq!(suffix.len(), 8);
    }
}
