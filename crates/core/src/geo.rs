use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PositionError;

/// Distance within which a location counts as "nearby" and may unlock.
pub const NEARBY_THRESHOLD_METERS: f64 = 100.0;

/// Mean Earth radius in meters, used by the haversine formula.
const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// A geographic position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Great-circle distance to another point, in meters.
    #[must_use]
    pub fn distance_meters(&self, other: &GeoPoint) -> f64 {
        let lat_a = self.latitude.to_radians();
        let lat_b = other.latitude.to_radians();
        let d_lat = (other.latitude - self.latitude).to_radians();
        let d_lon = (other.longitude - self.longitude).to_radians();

        let h = (d_lat / 2.0).sin().powi(2)
            + lat_a.cos() * lat_b.cos() * (d_lon / 2.0).sin().powi(2);
        // Rounding can push h past 1.0 near the antipode; clamp so asin
        // stays defined.
        2.0 * EARTH_RADIUS_METERS * h.sqrt().min(1.0).asin()
    }
}

impl FromStr for GeoPoint {
    type Err = PositionError;

    /// Parses the backend's `"(lat, lon)"` position format.
    ///
    /// Whitespace is trimmed and enclosing parentheses stripped; both
    /// components must be finite decimal numbers.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let malformed = || PositionError::MalformedPosition {
            raw: raw.to_string(),
        };

        let inner = raw
            .trim()
            .trim_start_matches('(')
            .trim_end_matches(')')
            .trim();
        let (lat_raw, lon_raw) = inner.split_once(',').ok_or_else(malformed)?;

        let latitude: f64 = lat_raw.trim().parse().map_err(|_| malformed())?;
        let longitude: f64 = lon_raw.trim().parse().map_err(|_| malformed())?;
        if !latitude.is_finite() || !longitude.is_finite() {
            return Err(malformed());
        }

        Ok(GeoPoint {
            latitude,
            longitude,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_parenthesised_pair() {
        let point: GeoPoint = "(-27.4977, 153.0129)".parse().unwrap();
        assert!((point.latitude - -27.4977).abs() < 1e-9);
        assert!((point.longitude - 153.0129).abs() < 1e-9);
    }

    #[test]
    fn parses_without_parentheses_and_with_padding() {
        let point: GeoPoint = "  -27.5 ,153.01  ".parse().unwrap();
        assert!((point.latitude - -27.5).abs() < 1e-9);
        assert!((point.longitude - 153.01).abs() < 1e-9);
    }

    #[test]
    fn rejects_non_numeric_components() {
        assert!("abc, 10".parse::<GeoPoint>().is_err());
        assert!("(1.0, )".parse::<GeoPoint>().is_err());
        assert!("(nan, 0.0)".parse::<GeoPoint>().is_err());
        assert!("(inf, 0.0)".parse::<GeoPoint>().is_err());
    }

    #[test]
    fn rejects_missing_separator() {
        assert!("(-27.4977 153.0129)".parse::<GeoPoint>().is_err());
        assert!("".parse::<GeoPoint>().is_err());
    }

    #[test]
    fn distance_to_self_is_zero() {
        let point = GeoPoint::new(-27.4977, 153.0129);
        assert!(point.distance_meters(&point).abs() < 1e-9);
    }

    #[test]
    fn distance_is_symmetric() {
        let a = GeoPoint::new(-27.4977, 153.0129);
        let b = GeoPoint::new(-27.4968, 153.0146);
        assert!((a.distance_meters(&b) - b.distance_meters(&a)).abs() < 1e-9);
    }

    #[test]
    fn near_antipodal_points_stay_finite() {
        let a = GeoPoint::new(0.0, 0.0);
        let half_circumference = std::f64::consts::PI * 6_371_000.0;
        for b in [
            GeoPoint::new(0.0, 180.0),
            GeoPoint::new(0.000_000_1, 179.999_999_9),
            GeoPoint::new(-0.000_000_1, -179.999_999_9),
        ] {
            let d = a.distance_meters(&b);
            assert!(d.is_finite(), "got {d} for {b:?}");
            assert!((d - half_circumference).abs() < 1.0, "got {d} for {b:?}");
        }
    }

    #[test]
    fn one_degree_of_latitude_is_about_111_km() {
        let a = GeoPoint::new(0.0, 0.0);
        let b = GeoPoint::new(1.0, 0.0);
        let d = a.distance_meters(&b);
        assert!((d - 111_195.0).abs() < 200.0, "got {d}");
    }
}
