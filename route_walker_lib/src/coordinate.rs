use geo_types::{Coord, Point};
use serde::{Deserialize, Serialize};

const EARTH_RADIUS_KM: f64 = 6372.8;

/// A WGS84 position in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }

    /// Great-circle distance in km.
    pub fn haversine_km(&self, other: &Coordinate) -> f64 {
        let d_lat = (other.lat - self.lat).to_radians();
        let d_lon = (other.lng - self.lng).to_radians();
        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();

        let a = f64::sin(d_lat / 2.).powi(2)
            + f64::cos(lat1) * f64::cos(lat2) * f64::sin(d_lon / 2.).powi(2);
        let c = 2. * f64::asin(f64::sqrt(a));

        EARTH_RADIUS_KM * c
    }
}

// geo-types is x/y, so longitude goes first.
impl From<Coordinate> for Coord {
    fn from(value: Coordinate) -> Self {
        Coord { x: value.lng, y: value.lat }
    }
}

impl From<Coord> for Coordinate {
    fn from(value: Coord) -> Self {
        Coordinate::new(value.y, value.x)
    }
}

impl From<Coordinate> for Point {
    fn from(value: Coordinate) -> Self {
        Point::new(value.lng, value.lat)
    }
}

impl From<(f64, f64)> for Coordinate {
    fn from((lat, lng): (f64, f64)) -> Self {
        Coordinate::new(lat, lng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn geo_conversion_swaps_axes() {
        let c = Coordinate::new(24.15555, -110.3224);
        let coord: Coord = c.into();
        assert_eq!(coord.x, -110.3224);
        assert_eq!(coord.y, 24.15555);
        assert_eq!(Coordinate::from(coord), c);
    }

    #[test]
    fn haversine_of_malecon_line() {
        let start = Coordinate::new(24.15555, -110.3224);
        let end = Coordinate::new(24.1679, -110.3091);
        let km = start.haversine_km(&end);
        assert!(km > 1.8 && km < 2.0, "got {km}");
        assert_eq!(start.haversine_km(&start), 0.0);
    }
}
