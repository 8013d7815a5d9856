//! The details/summary checkout flow.
//!
//! Two steps: the customer fills fulfillment details, reviews a summary,
//! then submits to the external payment page. Moving forward materializes
//! the delivery fee as a real cart line so the summary and the provider
//! both price it; moving back retracts that same line so the cart always
//! matches the currently selected fulfillment before resubmission.

use serde::{Deserialize, Serialize};

use crate::cart::{CartAction, CartState};
use crate::catalog::Catalog;
use crate::config::StoreHours;
use crate::delivery::DeliveryTier;
use crate::fulfillment::{self, FulfillmentType};

use super::CheckoutError;

/// Where the customer is in the checkout flow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckoutStep {
    #[default]
    Details,
    Summary,
}

/// Inputs the flow needs to move between steps.
#[derive(Debug)]
pub struct FlowContext<'a> {
    pub catalog: &'a Catalog,
    pub hours: StoreHours,
    pub fulfillment: FulfillmentType,
    pub pickup_slot: Option<&'a str>,
    pub delivery_tier: Option<DeliveryTier>,
}

/// The checkout flow state machine. Stored in the session next to the cart.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutFlow {
    pub step: CheckoutStep,
}

impl CheckoutFlow {
    /// Move from details to summary.
    ///
    /// Validates the fulfillment choice, then for delivery orders appends
    /// the resolved tier's fee line to the cart. Calling this while already
    /// on the summary is a no-op.
    ///
    /// # Errors
    ///
    /// Returns a [`CheckoutError`] when the cart is empty, a pickup slot is
    /// missing or unoffered, or no delivery tier has been resolved.
    pub fn proceed(
        &mut self,
        cart: CartState,
        ctx: &FlowContext<'_>,
    ) -> Result<CartState, CheckoutError> {
        if self.step == CheckoutStep::Summary {
            return Ok(cart);
        }
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let cart = match ctx.fulfillment {
            FulfillmentType::Pickup => {
                let slot = ctx.pickup_slot.ok_or(CheckoutError::MissingPickupSlot)?;
                if slot.is_empty() {
                    return Err(CheckoutError::MissingPickupSlot);
                }
                if !fulfillment::is_valid_slot(ctx.hours, slot) {
                    return Err(CheckoutError::InvalidPickupSlot(slot.to_string()));
                }
                cart
            }
            FulfillmentType::Delivery => {
                let tier = ctx.delivery_tier.ok_or(CheckoutError::MissingDeliveryTier)?;
                apply_fee_line(cart, ctx.catalog, tier, FeeLine::Add)
            }
        };

        self.step = CheckoutStep::Summary;
        Ok(cart)
    }

    /// Move from summary back to details, retracting the delivery fee line
    /// added on the way forward. Calling this from details is a no-op.
    #[must_use]
    pub fn back(&mut self, cart: CartState, ctx: &FlowContext<'_>) -> CartState {
        if self.step == CheckoutStep::Details {
            return cart;
        }
        self.step = CheckoutStep::Details;

        match (ctx.fulfillment, ctx.delivery_tier) {
            (FulfillmentType::Delivery, Some(tier)) => {
                apply_fee_line(cart, ctx.catalog, tier, FeeLine::Remove)
            }
            _ => cart,
        }
    }

    /// Reset after a successful submission.
    pub fn reset(&mut self) {
        self.step = CheckoutStep::Details;
    }
}

#[derive(Clone, Copy)]
enum FeeLine {
    Add,
    Remove,
}

/// Add or remove the tier's fee line on the cart.
///
/// The fee item is located by its reserved display name; if the catalog no
/// longer carries it (or it has no variations) the cart is left untouched.
/// Fee lines are applied without catalog context so the companion rule
/// never fires for them.
fn apply_fee_line(
    cart: CartState,
    catalog: &Catalog,
    tier: DeliveryTier,
    direction: FeeLine,
) -> CartState {
    let Some(fee_item) = catalog.item_by_name(tier.item_name()) else {
        return cart;
    };
    let Some(fee_variation) = fee_item.variations.first() else {
        return cart;
    };

    let action = match direction {
        FeeLine::Add => CartAction::Add {
            item_id: fee_item.id.clone(),
            variation_id: fee_variation.id.clone(),
            quantity: 1,
        },
        FeeLine::Remove => CartAction::Remove {
            item_id: fee_item.id.clone(),
            variation_id: fee_variation.id.clone(),
        },
    };
    cart.apply_with_effects(&action, None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CatalogItem, Variation};
    use crate::money::{CurrencyCode, Money};

    const HOURS: StoreHours = StoreHours { open: 9, close: 21 };

    fn variation(id: &str, item_id: &str, name: &str, cents: i64) -> Variation {
        Variation {
            id: id.to_string(),
            name: name.to_string(),
            price: Money::new(cents, CurrencyCode::USD),
            item_id: item_id.to_string(),
            ordinal: 0,
            available: true,
        }
    }

    fn catalog() -> Catalog {
        Catalog {
            items: vec![
                CatalogItem {
                    id: "tree-1".to_string(),
                    name: "Noble Fir".to_string(),
                    description: None,
                    variations: vec![variation("tree-6-7", "tree-1", "6-7 ft", 15000)],
                    image_ids: Vec::new(),
                    category: Some("CAT123".to_string()),
                },
                CatalogItem {
                    id: "fee-3".to_string(),
                    name: "DELIVERY-3-MILE".to_string(),
                    description: None,
                    variations: vec![variation("fee-3-var", "fee-3", "Regular", 2750)],
                    image_ids: Vec::new(),
                    category: None,
                },
            ],
            images: Vec::new(),
            categories: Vec::new(),
        }
    }

    fn cart_with_tree() -> CartState {
        CartState::default().apply_with_effects(
            &CartAction::Add {
                item_id: "tree-1".to_string(),
                variation_id: "tree-6-7".to_string(),
                quantity: 1,
            },
            None,
        )
    }

    fn delivery_ctx(catalog: &Catalog) -> FlowContext<'_> {
        FlowContext {
            catalog,
            hours: HOURS,
            fulfillment: FulfillmentType::Delivery,
            pickup_slot: None,
            delivery_tier: Some(DeliveryTier::Mile3),
        }
    }

    #[test]
    fn test_forward_adds_the_fee_line_and_back_removes_it() {
        let catalog = catalog();
        let ctx = delivery_ctx(&catalog);
        let mut flow = CheckoutFlow::default();

        let cart = flow
            .proceed(cart_with_tree(), &ctx)
            .expect("valid delivery details");
        assert_eq!(flow.step, CheckoutStep::Summary);
        assert_eq!(cart.quantity_of("fee-3", "fee-3-var"), 1);

        let cart = flow.back(cart, &ctx);
        assert_eq!(flow.step, CheckoutStep::Details);
        assert!(!cart.contains("fee-3", "fee-3-var"));
        assert_eq!(cart.quantity_of("tree-1", "tree-6-7"), 1);
    }

    #[test]
    fn test_pickup_forward_requires_a_slot() {
        let catalog = catalog();
        let mut flow = CheckoutFlow::default();
        let ctx = FlowContext {
            catalog: &catalog,
            hours: HOURS,
            fulfillment: FulfillmentType::Pickup,
            pickup_slot: None,
            delivery_tier: None,
        };

        let err = flow.proceed(cart_with_tree(), &ctx).unwrap_err();
        assert_eq!(err, CheckoutError::MissingPickupSlot);
        assert_eq!(flow.step, CheckoutStep::Details);
    }

    #[test]
    fn test_delivery_forward_requires_a_tier() {
        let catalog = catalog();
        let mut flow = CheckoutFlow::default();
        let ctx = FlowContext {
            delivery_tier: None,
            ..delivery_ctx(&catalog)
        };

        let err = flow.proceed(cart_with_tree(), &ctx).unwrap_err();
        assert_eq!(err, CheckoutError::MissingDeliveryTier);
    }

    #[test]
    fn test_proceed_is_idempotent_on_summary() {
        let catalog = catalog();
        let ctx = delivery_ctx(&catalog);
        let mut flow = CheckoutFlow::default();

        let cart = flow
            .proceed(cart_with_tree(), &ctx)
            .expect("valid delivery details");
        let cart = flow.proceed(cart, &ctx).expect("no-op on summary");
        assert_eq!(cart.quantity_of("fee-3", "fee-3-var"), 1);
    }

    #[test]
    fn test_back_from_details_is_a_no_op() {
        let catalog = catalog();
        let ctx = delivery_ctx(&catalog);
        let mut flow = CheckoutFlow::default();

        let cart = flow.back(cart_with_tree(), &ctx);
        assert_eq!(cart.quantity_of("tree-1", "tree-6-7"), 1);
        assert_eq!(flow.step, CheckoutStep::Details);
    }

    #[test]
    fn test_missing_fee_item_leaves_cart_untouched() {
        let catalog = Catalog {
            items: catalog()
                .items
                .into_iter()
                .filter(|i| i.id == "tree-1")
                .collect(),
            images: Vec::new(),
            categories: Vec::new(),
        };
        let ctx = delivery_ctx(&catalog);
        let mut flow = CheckoutFlow::default();

        let cart = flow
            .proceed(cart_with_tree(), &ctx)
            .expect("proceeds without a fee line");
        assert_eq!(cart.items().len(), 1);
        assert_eq!(flow.step, CheckoutStep::Summary);
    }
}
