//! Cart state reducer with derived companion effects.
//!
//! All cart mutation flows through [`CartState::apply`]; nothing else may
//! write to the state. The transition itself is pure and returns any derived
//! follow-on effects (a suggested tree stand) instead of performing them, so
//! the rule stays independently testable. [`CartState::apply_with_effects`]
//! is the thin orchestration layer that feeds effects back through the
//! reducer.

use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;

/// Item-name keyword identifying the companion stand product.
const STAND_ITEM_KEYWORD: &str = "water bowl & stand";

/// One line in the cart, keyed by (item, variation).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub item_id: String,
    pub variation_id: String,
    /// Always >= 1; the reducer removes lines instead of storing zero.
    pub quantity: u32,
}

impl CartItem {
    /// Create a new cart line.
    #[must_use]
    pub fn new(item_id: &str, variation_id: &str, quantity: u32) -> Self {
        Self {
            item_id: item_id.to_string(),
            variation_id: variation_id.to_string(),
            quantity,
        }
    }

    fn matches(&self, item_id: &str, variation_id: &str) -> bool {
        self.item_id == item_id && self.variation_id == variation_id
    }
}

/// The session cart. Empty at session start, cleared on successful checkout.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartState {
    items: Vec<CartItem>,
}

/// A user action against the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum CartAction {
    /// Add a line, merging quantity into an existing line with the same key.
    #[serde(rename_all = "camelCase")]
    Add {
        item_id: String,
        variation_id: String,
        quantity: u32,
    },
    /// Delete a line entirely, regardless of its quantity.
    #[serde(rename_all = "camelCase")]
    Remove {
        item_id: String,
        variation_id: String,
    },
    /// Replace a line's quantity; anything below 1 behaves as `Remove`.
    #[serde(rename_all = "camelCase")]
    SetQuantity {
        item_id: String,
        variation_id: String,
        quantity: u32,
    },
    /// Empty the cart unconditionally.
    Clear,
}

/// A follow-on effect derived from an action.
///
/// Effects are data, not mutations: the caller decides when to apply them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartEffect {
    /// Add one companion accessory line (the stand suggested for a tree).
    AddCompanion {
        item_id: String,
        variation_id: String,
    },
}

/// Stand size classes derived from tree variation names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StandSize {
    Small,
    Medium,
    Large,
    XLarge,
}

impl StandSize {
    /// Classify a tree variation by the height range in its name.
    ///
    /// Unrecognized names fall back to the smallest stand.
    fn from_variation_name(name: &str) -> Self {
        let name = name.to_lowercase();
        if name.contains("8-9") {
            Self::XLarge
        } else if name.contains("6-7") || name.contains("7-8") {
            Self::Large
        } else if name.contains("5-6") {
            Self::Medium
        } else {
            Self::Small
        }
    }

    /// Keyword matched against stand variation names.
    const fn keyword(self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
            Self::XLarge => "x-large",
        }
    }
}

impl CartState {
    /// The cart lines, in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Quantity of a line, or 0 when absent.
    #[must_use]
    pub fn quantity_of(&self, item_id: &str, variation_id: &str) -> u32 {
        self.items
            .iter()
            .find(|i| i.matches(item_id, variation_id))
            .map_or(0, |i| i.quantity)
    }

    /// Whether a line with this exact key is present.
    #[must_use]
    pub fn contains(&self, item_id: &str, variation_id: &str) -> bool {
        self.items.iter().any(|i| i.matches(item_id, variation_id))
    }

    /// Apply one action, returning the next state and any derived effects.
    ///
    /// The companion rule only fires for `Add`, and only when a catalog is
    /// supplied alongside the action.
    #[must_use]
    pub fn apply(&self, action: &CartAction, catalog: Option<&Catalog>) -> (Self, Vec<CartEffect>) {
        match action {
            CartAction::Add {
                item_id,
                variation_id,
                quantity,
            } => {
                let next = self.with_added(item_id, variation_id, *quantity);
                let effects = catalog
                    .and_then(|c| next.companion_effect(c, item_id, variation_id))
                    .into_iter()
                    .collect();
                (next, effects)
            }
            CartAction::Remove {
                item_id,
                variation_id,
            } => (self.with_removed(item_id, variation_id), Vec::new()),
            CartAction::SetQuantity {
                item_id,
                variation_id,
                quantity,
            } => {
                // Quantity cannot drop to zero; decrementing past one removes
                // the line.
                let next = if *quantity < 1 {
                    self.with_removed(item_id, variation_id)
                } else {
                    self.with_quantity(item_id, variation_id, *quantity)
                };
                (next, Vec::new())
            }
            CartAction::Clear => (Self::default(), Vec::new()),
        }
    }

    /// Apply an action and immediately feed derived effects back through the
    /// reducer.
    ///
    /// Effects are applied without catalog context, so they never cascade
    /// into further effects.
    #[must_use]
    pub fn apply_with_effects(&self, action: &CartAction, catalog: Option<&Catalog>) -> Self {
        let (mut state, effects) = self.apply(action, catalog);
        for effect in effects {
            let CartEffect::AddCompanion {
                item_id,
                variation_id,
            } = effect;
            let (next, _) = state.apply(
                &CartAction::Add {
                    item_id,
                    variation_id,
                    quantity: 1,
                },
                None,
            );
            state = next;
        }
        state
    }

    fn with_added(&self, item_id: &str, variation_id: &str, quantity: u32) -> Self {
        let mut items = self.items.clone();
        if let Some(existing) = items.iter_mut().find(|i| i.matches(item_id, variation_id)) {
            existing.quantity = existing.quantity.saturating_add(quantity);
        } else {
            items.push(CartItem::new(item_id, variation_id, quantity));
        }
        Self { items }
    }

    fn with_removed(&self, item_id: &str, variation_id: &str) -> Self {
        Self {
            items: self
                .items
                .iter()
                .filter(|i| !i.matches(item_id, variation_id))
                .cloned()
                .collect(),
        }
    }

    fn with_quantity(&self, item_id: &str, variation_id: &str, quantity: u32) -> Self {
        Self {
            items: self
                .items
                .iter()
                .map(|i| {
                    if i.matches(item_id, variation_id) {
                        CartItem::new(item_id, variation_id, quantity)
                    } else {
                        i.clone()
                    }
                })
                .collect(),
        }
    }

    /// Derive the companion-stand effect for a just-added tree line.
    ///
    /// Looks up the added item's variation, classifies its size, and finds
    /// the matching stand variation. Returns nothing when the added item is
    /// the stand itself, when no stand product exists, or when the matching
    /// stand size is already in the cart (the rule is idempotent per size).
    fn companion_effect(
        &self,
        catalog: &Catalog,
        item_id: &str,
        variation_id: &str,
    ) -> Option<CartEffect> {
        let added = catalog.item(item_id)?;
        let stand = catalog
            .items
            .iter()
            .find(|i| i.name.to_lowercase().contains(STAND_ITEM_KEYWORD))?;
        if added.id == stand.id {
            return None;
        }

        let tree_variation = added.variations.iter().find(|v| v.id == variation_id)?;
        let size = StandSize::from_variation_name(&tree_variation.name);
        let stand_variation = stand
            .variations
            .iter()
            .find(|v| v.name.to_lowercase().contains(size.keyword()))?;

        if self.contains(&stand.id, &stand_variation.id) {
            return None;
        }

        Some(CartEffect::AddCompanion {
            item_id: stand.id.clone(),
            variation_id: stand_variation.id.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Catalog, CatalogItem, Variation};
    use crate::money::{CurrencyCode, Money};

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

    fn item(id: &str, name: &str, variations: Vec<Variation>) -> CatalogItem {
        CatalogItem {
            id: id.to_string(),
            name: name.to_string(),
            description: None,
            variations,
            image_ids: Vec::new(),
            category: Some("CAT123".to_string()),
        }
    }

    /// One tree and one stand, as sold on the lot.
    fn catalog() -> Catalog {
        Catalog {
            items: vec![
                item(
                    "tree-1",
                    "Noble Fir",
                    vec![
                        variation("tree-5-6", "tree-1", "5-6 ft", 12000),
                        variation("tree-6-7", "tree-1", "6-7 ft", 15000),
                    ],
                ),
                item(
                    "stand-1",
                    "Water Bowl & Stand",
                    vec![
                        variation("stand-s", "stand-1", "Small", 2500),
                        variation("stand-m", "stand-1", "Medium", 3000),
                        variation("stand-l", "stand-1", "Large", 3500),
                    ],
                ),
            ],
            images: Vec::new(),
            categories: Vec::new(),
        }
    }

    fn add(item_id: &str, variation_id: &str, quantity: u32) -> CartAction {
        CartAction::Add {
            item_id: item_id.to_string(),
            variation_id: variation_id.to_string(),
            quantity,
        }
    }

    #[test]
    fn test_add_merges_duplicate_keys() {
        let cart = CartState::default();
        let cart = cart.apply_with_effects(&add("tree-1", "tree-5-6", 1), None);
        let cart = cart.apply_with_effects(&add("tree-1", "tree-5-6", 1), None);

        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.quantity_of("tree-1", "tree-5-6"), 2);
    }

    #[test]
    fn test_remove_deletes_regardless_of_quantity() {
        let cart = CartState::default().apply_with_effects(&add("tree-1", "tree-5-6", 4), None);
        let cart = cart.apply_with_effects(
            &CartAction::Remove {
                item_id: "tree-1".to_string(),
                variation_id: "tree-5-6".to_string(),
            },
            None,
        );

        assert!(cart.is_empty());
    }

    #[test]
    fn test_set_quantity_zero_is_remove() {
        let cart = CartState::default().apply_with_effects(&add("tree-1", "tree-5-6", 3), None);

        let via_set = cart.apply_with_effects(
            &CartAction::SetQuantity {
                item_id: "tree-1".to_string(),
                variation_id: "tree-5-6".to_string(),
                quantity: 0,
            },
            None,
        );
        let via_remove = cart.apply_with_effects(
            &CartAction::Remove {
                item_id: "tree-1".to_string(),
                variation_id: "tree-5-6".to_string(),
            },
            None,
        );

        assert_eq!(via_set, via_remove);
        assert!(via_set.is_empty());
    }

    #[test]
    fn test_set_quantity_replaces() {
        let cart = CartState::default().apply_with_effects(&add("tree-1", "tree-5-6", 1), None);
        let cart = cart.apply_with_effects(
            &CartAction::SetQuantity {
                item_id: "tree-1".to_string(),
                variation_id: "tree-5-6".to_string(),
                quantity: 5,
            },
            None,
        );

        assert_eq!(cart.quantity_of("tree-1", "tree-5-6"), 5);
    }

    #[test]
    fn test_clear_empties_cart() {
        let cart = CartState::default()
            .apply_with_effects(&add("tree-1", "tree-5-6", 1), None)
            .apply_with_effects(&add("tree-1", "tree-6-7", 1), None);
        let cart = cart.apply_with_effects(&CartAction::Clear, None);

        assert!(cart.is_empty());
    }

    #[test]
    fn test_adding_a_tree_suggests_the_matching_stand() {
        let catalog = catalog();
        let (cart, effects) =
            CartState::default().apply(&add("tree-1", "tree-6-7", 1), Some(&catalog));

        assert_eq!(cart.items().len(), 1);
        assert_eq!(
            effects,
            vec![CartEffect::AddCompanion {
                item_id: "stand-1".to_string(),
                variation_id: "stand-l".to_string(),
            }]
        );
    }

    #[test]
    fn test_companion_add_is_idempotent_per_size() {
        let catalog = catalog();
        let cart =
            CartState::default().apply_with_effects(&add("tree-1", "tree-6-7", 1), Some(&catalog));

        assert_eq!(cart.quantity_of("stand-1", "stand-l"), 1);

        // Re-adding the same tree size merges the tree line but does not
        // duplicate or increment the stand.
        let cart = cart.apply_with_effects(&add("tree-1", "tree-6-7", 1), Some(&catalog));
        assert_eq!(cart.quantity_of("tree-1", "tree-6-7"), 2);
        assert_eq!(cart.quantity_of("stand-1", "stand-l"), 1);
    }

    #[test]
    fn test_unrecognized_size_defaults_to_small_stand() {
        let mut catalog = catalog();
        catalog.items[0]
            .variations
            .push(variation("tree-odd", "tree-1", "Tabletop", 4000));

        let cart =
            CartState::default().apply_with_effects(&add("tree-1", "tree-odd", 1), Some(&catalog));
        assert!(cart.contains("stand-1", "stand-s"));
    }

    #[test]
    fn test_adding_the_stand_itself_has_no_effect() {
        let catalog = catalog();
        let (_, effects) =
            CartState::default().apply(&add("stand-1", "stand-m", 1), Some(&catalog));
        assert!(effects.is_empty());
    }

    #[test]
    fn test_no_catalog_means_no_companion() {
        let cart = CartState::default().apply_with_effects(&add("tree-1", "tree-6-7", 1), None);
        assert_eq!(cart.items().len(), 1);
    }

    #[test]
    fn test_end_to_end_tree_with_stand_subtotal() {
        let catalog = catalog();
        let cart =
            CartState::default().apply_with_effects(&add("tree-1", "tree-6-7", 1), Some(&catalog));

        assert_eq!(
            cart.items(),
            &[
                CartItem::new("tree-1", "tree-6-7", 1),
                CartItem::new("stand-1", "stand-l", 1),
            ]
        );
        let subtotal = catalog.subtotal(&cart);
        assert_eq!(subtotal.amount, 18500);
        assert_eq!(subtotal.display(), "$185.00");
    }
}
