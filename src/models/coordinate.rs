use serde::{Deserialize, Serialize};
use validator::Validate;

/// A query point in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
pub struct Coordinate {
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,

    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Box of `half_width` degrees on each side of the point.
    pub fn bounding_box(&self, half_width: f64) -> BoundingBox {
        BoundingBox {
            min_lon: self.longitude - half_width,
            min_lat: self.latitude - half_width,
            max_lon: self.longitude + half_width,
            max_lat: self.latitude + half_width,
        }
    }

    /// Planar distance in degree space. Only meaningful over small extents.
    pub fn degree_distance(&self, latitude: f64, longitude: f64) -> f64 {
        let d_lat = latitude - self.latitude;
        let d_lon = longitude - self.longitude;
        (d_lat * d_lat + d_lon * d_lon).sqrt()
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.latitude, self.longitude)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
}

impl BoundingBox {
    /// `lon_min,lat_min,lon_max,lat_max`, the order catalog services expect.
    pub fn to_query_param(&self) -> String {
        format!(
            "{},{},{},{}",
            self.min_lon, self.min_lat, self.max_lon, self.max_lat
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinate_validation() {
        assert!(Coordinate::new(32.8032, 130.7075).validate().is_ok());
        assert!(Coordinate::new(91.0, 130.7075).validate().is_err());
        assert!(Coordinate::new(32.8032, -181.0).validate().is_err());
    }

    #[test]
    fn test_bounding_box() {
        let bbox = Coordinate::new(32.8, 130.7).bounding_box(0.5);

        assert!((bbox.min_lat - 32.3).abs() < 1e-9);
        assert!((bbox.max_lat - 33.3).abs() < 1e-9);
        assert!((bbox.min_lon - 130.2).abs() < 1e-9);
        assert!((bbox.max_lon - 131.2).abs() < 1e-9);
    }

    #[test]
    fn test_bbox_query_param_order() {
        let bbox = BoundingBox {
            min_lon: 130.0,
            min_lat: 32.0,
            max_lon: 131.0,
            max_lat: 33.0,
        };
        assert_eq!(bbox.to_query_param(), "130,32,131,33");
    }

    #[test]
    fn test_degree_distance() {
        let origin = Coordinate::new(0.0, 0.0);
        assert!((origin.degree_distance(3.0, 4.0) - 5.0).abs() < 1e-12);
        assert_eq!(origin.degree_distance(0.0, 0.0), 0.0);
    }
}
