//! External service clients that are not the payment vendor.

pub mod geocode;
