//! Great-circle distance between coordinates.

use serde::{Deserialize, Serialize};

/// Earth's radius in miles.
const EARTH_RADIUS_MILES: f64 = 3959.0;

/// A latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    /// Create a new coordinate pair.
    #[must_use]
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Great-circle distance in miles between two points.
///
/// Haversine formula, rounded to one decimal place. Deterministic, no I/O.
#[must_use]
pub fn distance_miles(a: Coordinates, b: Coordinates) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lng = (b.lng - a.lng).to_radians();

    let h = (d_lat / 2.0).sin().powi(2)
        + a.lat.to_radians().cos() * b.lat.to_radians().cos() * (d_lng / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    (EARTH_RADIUS_MILES * c * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_coordinates_are_zero_miles() {
        let origin = Coordinates::new(0.0, 0.0);
        assert!((distance_miles(origin, origin) - 0.0).abs() < f64::EPSILON);

        let downtown = Coordinates::new(34.044227, -118.272217);
        assert!((distance_miles(downtown, downtown) - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_distance_is_symmetric() {
        let downtown = Coordinates::new(34.044227, -118.272217);
        let altadena = Coordinates::new(34.190141, -118.158531);

        let there = distance_miles(downtown, altadena);
        let back = distance_miles(altadena, downtown);
        assert!((there - back).abs() < f64::EPSILON);
    }

    #[test]
    fn test_known_pair_lands_near_twelve_miles() {
        // Downtown LA lot to the Altadena lot.
        let downtown = Coordinates::new(34.044227, -118.272217);
        let altadena = Coordinates::new(34.190141, -118.158531);

        let d = distance_miles(downtown, altadena);
        assert!((11.5..=12.5).contains(&d), "unexpected distance: {d}");
    }

    #[test]
    fn test_result_is_rounded_to_one_decimal() {
        let downtown = Coordinates::new(34.044227, -118.272217);
        let nearby = Coordinates::new(34.052235, -118.243683);

        let d = distance_miles(downtown, nearby);
        assert!(((d * 10.0).round() - d * 10.0).abs() < 1e-9);
    }
}
