//! Monetary amounts in minor currency units.
//!
//! The vendor reports prices in the smallest unit of the currency (cents for
//! USD), so that is what the domain stores. Display formatting goes through
//! `rust_decimal` to avoid floating-point cents.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// ISO 4217 currency codes accepted from the vendor catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    USD,
    EUR,
    GBP,
    CAD,
    AUD,
}

impl CurrencyCode {
    /// Currency symbol for display.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::USD | Self::CAD | Self::AUD => "$",
            Self::EUR => "\u{20ac}",
            Self::GBP => "\u{a3}",
        }
    }

    /// Parse an ISO 4217 code, falling back to USD for anything unknown.
    ///
    /// The vendor occasionally omits the currency on variations; the store
    /// only trades in USD, so that is the safe default.
    #[must_use]
    pub fn from_code(code: &str) -> Self {
        match code {
            "EUR" => Self::EUR,
            "GBP" => Self::GBP,
            "CAD" => Self::CAD,
            "AUD" => Self::AUD,
            _ => Self::USD,
        }
    }
}

/// A monetary amount in minor currency units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Money {
    /// Amount in the smallest currency unit (e.g., cents for USD).
    pub amount: i64,
    /// ISO 4217 currency code.
    pub currency: CurrencyCode,
}

impl Money {
    /// Create a new amount.
    #[must_use]
    pub const fn new(amount: i64, currency: CurrencyCode) -> Self {
        Self { amount, currency }
    }

    /// Zero dollars.
    #[must_use]
    pub const fn zero() -> Self {
        Self {
            amount: 0,
            currency: CurrencyCode::USD,
        }
    }

    /// Multiply by a line quantity.
    #[must_use]
    pub fn times(self, quantity: u32) -> Self {
        Self {
            amount: self.amount.saturating_mul(i64::from(quantity)),
            currency: self.currency,
        }
    }

    /// Add another amount. Mixed currencies keep the left-hand code; the
    /// catalog never mixes them in practice.
    #[must_use]
    pub const fn plus(self, other: Self) -> Self {
        Self {
            amount: self.amount.saturating_add(other.amount),
            currency: self.currency,
        }
    }

    /// Format for display (e.g., "$19.99").
    #[must_use]
    pub fn display(&self) -> String {
        format!("{}{}", self.currency.symbol(), Decimal::new(self.amount, 2))
    }
}
