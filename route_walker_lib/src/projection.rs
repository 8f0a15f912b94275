use geo_types::{Coord, Line, LineString};

use crate::{coordinate::Coordinate, route::RouteDescriptor};

/// Fraction of the route covered, always within [0, 1].
pub fn progress(route: &RouteDescriptor, distance_km: f64) -> f64 {
    let progress = distance_km / route.max_distance_km();
    if progress.is_nan() {
        return 0.0;
    }
    progress.clamp(0.0, 1.0)
}

/// Position on the straight line from start to end after walking `distance_km`.
/// Never extrapolates past either endpoint.
pub fn project(route: &RouteDescriptor, distance_km: f64) -> Coordinate {
    let progress = progress(route, distance_km);
    if progress >= 1.0 {
        return route.end();
    }

    let start = route.start();
    let end = route.end();

    Coordinate::new(
        start.lat + (end.lat - start.lat) * progress,
        start.lng + (end.lng - start.lng) * progress,
    )
}

/// The part of the route walked so far, for drawing.
pub fn traversed_path(route: &RouteDescriptor, distance_km: f64) -> LineString {
    let start: Coord = route.start().into();
    let position: Coord = project(route, distance_km).into();
    LineString::new(vec![start, position])
}

pub fn route_line(route: &RouteDescriptor) -> Line {
    Line::new(Coord::from(route.start()), Coord::from(route.end()))
}

/// Great-circle length of the route line. Usually shorter than the walked
/// `max_distance_km`, since streets are not straight.
pub fn straight_line_km(route: &RouteDescriptor) -> f64 {
    route.start().haversine_km(&route.end())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn malecon() -> RouteDescriptor {
        RouteDescriptor::new(
            "maleconLaPaz",
            "Malecón de La Paz",
            "https://example.com/v.m3u8",
            Coordinate::new(24.15555, -110.3224),
            Coordinate::new(24.1679, -110.3091),
            3.0,
            None,
        ).unwrap()
    }

    #[test]
    fn starts_at_start() {
        let route = malecon();
        assert_eq!(project(&route, 0.0), route.start());
        assert_eq!(progress(&route, -1.0), 0.0);
        assert_eq!(project(&route, -1.0), route.start());
    }

    #[test]
    fn halfway() {
        let route = malecon();
        let mid = project(&route, 1.5);
        assert!((mid.lat - (24.15555 + 24.1679) / 2.0).abs() < 1e-12);
        assert!((mid.lng - (-110.3224 + -110.3091) / 2.0).abs() < 1e-12);
        assert_eq!(progress(&route, 1.5), 0.5);
    }

    #[test]
    fn overshoot_is_exactly_end() {
        let route = malecon();
        for km in [3.0, 3.0000001, 4.5, 1e9, f64::INFINITY] {
            assert_eq!(progress(&route, km), 1.0);
            assert_eq!(project(&route, km), route.end());
        }
    }

    #[test]
    fn path_runs_from_start_to_position() {
        let route = malecon();
        let path = traversed_path(&route, 3.0);
        let points: Vec<Coordinate> = path.coords().map(|c| Coordinate::from(*c)).collect();
        assert_eq!(points, vec![route.start(), route.end()]);

        let line = route_line(&route);
        assert_eq!(Coordinate::from(line.end), route.end());
        assert!(straight_line_km(&route) < route.max_distance_km());
    }
}
