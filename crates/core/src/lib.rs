//! Tannenbaum Core - Order-composition domain.
//!
//! This crate holds the storefront's actual logic, kept free of I/O so every
//! rule is testable in isolation:
//!
//! - [`catalog`] - Normalized domain catalog (items, variations, images,
//!   categories) and price lookups
//! - [`cart`] - Cart state reducer with derived companion-accessory effects
//! - [`geo`] - Great-circle distance between coordinates
//! - [`delivery`] - Distance-tiered delivery pricing
//! - [`fulfillment`] - Pickup scheduling and delivery addresses
//! - [`checkout`] - Payment-link assembly and the details/summary flow
//! - [`config`] - Injected store-level configuration
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no HTTP clients,
//! no sessions, no environment access. The `storefront` crate owns all of
//! that and feeds this crate normalized inputs.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod delivery;
pub mod fulfillment;
pub mod geo;
pub mod money;

pub use cart::{CartAction, CartEffect, CartItem, CartState};
pub use catalog::{Catalog, CatalogItem, Category, Image, Variation};
pub use config::{StoreConfig, StoreHours, StoreLocation};
pub use delivery::DeliveryTier;
pub use fulfillment::{DeliveryAddress, FulfillmentType};
pub use geo::Coordinates;
pub use money::{CurrencyCode, Money};
