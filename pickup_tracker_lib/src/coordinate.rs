use geo_types::{Coord, Point};
use serde::{Deserialize, Serialize};

/// A WGS84 position in degrees.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct LatLng {
    pub latitude: f64,
    pub longitude: f64,
}

impl LatLng {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && self.latitude.abs() <= 90.
            && self.longitude.abs() <= 180.
    }
}

// geo-types uses x = longitude, y = latitude
impl From<LatLng> for Point {
    fn from(value: LatLng) -> Self {
        Point::new(value.longitude, value.latitude)
    }
}

impl From<LatLng> for Coord {
    fn from(value: LatLng) -> Self {
        Coord { x: value.longitude, y: value.latitude }
    }
}

impl From<Coord> for LatLng {
    fn from(value: Coord) -> Self {
        LatLng::new(value.y, value.x)
    }
}

#[test]
fn validity() {
    assert!(LatLng::new(24.71, 46.67).is_valid());
    assert!(LatLng::new(0., 0.).is_valid());
    assert!(!LatLng::new(91., 0.).is_valid());
    assert!(!LatLng::new(0., -180.5).is_valid());
    assert!(!LatLng::new(f64::NAN, 10.).is_valid());
}

#[test]
fn geo_types_axis_order() {
    let pos = LatLng::new(55.5, 9.25);
    let coord: Coord = pos.into();
    assert_eq!(coord.x, 9.25);
    assert_eq!(coord.y, 55.5);
    assert_eq!(LatLng::from(coord), pos);
}
