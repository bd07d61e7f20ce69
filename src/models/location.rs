//! Geographic coordinate type.

use serde::{Deserialize, Serialize};

/// A position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Latitude in decimal degrees.
    pub latitude: f64,
    /// Longitude in decimal degrees.
    pub longitude: f64,
}

impl GeoPoint {
    /// Creates a point from latitude and longitude.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_point() {
        let json = r#"{ "latitude": 34.0522, "longitude": -118.2437 }"#;
        let point: GeoPoint = serde_json::from_str(json).unwrap();
        assert_eq!(point, GeoPoint::new(34.0522, -118.2437));
    }
}
