//! Great-circle distance evaluation.
//!
//! Geofence admission compares the haversine distance between the device
//! position and the site centre against the configured radius.

use crate::models::GeoPoint;

/// Mean Earth radius in meters used by the haversine formula.
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Returns the great-circle surface distance between two points in meters.
///
/// Pure and total: out-of-range coordinates still produce a number.
///
/// # Examples
///
/// ```
/// use site_payroll_engine::calculation::distance_meters;
/// use site_payroll_engine::models::GeoPoint;
///
/// let site = GeoPoint::new(34.0522, -118.2437);
/// assert!(distance_meters(site, site) < 1e-6);
/// ```
pub fn distance_meters(a: GeoPoint, b: GeoPoint) -> f64 {
    let phi_a = a.latitude.to_radians();
    let phi_b = b.latitude.to_radians();
    let delta_phi = (b.latitude - a.latitude).to_radians();
    let delta_lambda = (b.longitude - a.longitude).to_radians();

    let h = (delta_phi / 2.0).sin().powi(2)
        + phi_a.cos() * phi_b.cos() * (delta_lambda / 2.0).sin().powi(2);
    // Out-of-range latitudes can push h outside [0, 1].
    let h = h.clamp(0.0, 1.0);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_METERS * c
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_point_is_zero() {
        let p = GeoPoint::new(34.0522, -118.2437);
        assert!(distance_meters(p, p) < 1e-6);
    }

    #[test]
    fn test_known_pair() {
        let a = GeoPoint::new(34.0522, -118.2437);
        let b = GeoPoint::new(34.0622, -118.2537);
        let d = distance_meters(a, b);
        assert!((d - 1444.0).abs() < 5.0, "got {}", d);
    }

    #[test]
    fn test_symmetric() {
        let a = GeoPoint::new(-33.8688, 151.2093);
        let b = GeoPoint::new(51.5074, -0.1278);
        assert!((distance_meters(a, b) - distance_meters(b, a)).abs() < 1e-6);
    }

    #[test]
    fn test_one_degree_of_latitude() {
        let a = GeoPoint::new(0.0, 0.0);
        let b = GeoPoint::new(1.0, 0.0);
        // R * pi / 180
        assert!((distance_meters(a, b) - 111_194.93).abs() < 0.01);
    }

    #[test]
    fn test_out_of_range_input_is_still_a_number() {
        let a = GeoPoint::new(120.0, 400.0);
        let b = GeoPoint::new(-95.0, -720.0);
        assert!(distance_meters(a, b).is_finite());
    }
}
