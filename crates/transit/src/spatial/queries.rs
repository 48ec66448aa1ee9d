//! Distance calculations.
//!
//! Uses the Haversine formula on a spherical Earth. Distances are meters.

use std::f64::consts::FRAC_PI_2;

use geo::{HaversineDistance, Point};
use rstar::AABB;

/// Mean Earth radius used by the Haversine formula, in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_008.8;

/// Slack applied to envelope bounds so float rounding never excludes a
/// point sitting exactly on the radius.
const ENVELOPE_SLACK: f64 = 1.0 + 1e-6;

/// Calculate Haversine distance between two points in meters
pub fn haversine_distance(p1: Point, p2: Point) -> f64 {
    p1.haversine_distance(&p2)
}

/// Degree-space box containing every point within `radius_m` of `center`.
///
/// Follows the "bounding coordinates" construction: the latitude band is
/// the angular radius either side of the center, and the longitude half-width
/// is `asin(sin(r) / cos(lat))`. When the circle reaches a pole or crosses
/// the antimeridian the box spans all longitudes.
pub fn search_envelope(center: Point, radius_m: f64) -> AABB<[f64; 2]> {
    let angular = radius_m / EARTH_RADIUS_M;
    let lat = center.y().to_radians();

    let min_lat = lat - angular * ENVELOPE_SLACK;
    let max_lat = lat + angular * ENVELOPE_SLACK;
    let reaches_pole = min_lat <= -FRAC_PI_2 || max_lat >= FRAC_PI_2;

    let all_longitudes = AABB::from_corners(
        [-180.0, min_lat.to_degrees().max(-90.0)],
        [180.0, max_lat.to_degrees().min(90.0)],
    );
    if reaches_pole || angular.sin() >= lat.cos() {
        return all_longitudes;
    }

    let half_width = (angular.sin() / lat.cos()).asin().to_degrees() * ENVELOPE_SLACK;
    let min_lon = center.x() - half_width;
    let max_lon = center.x() + half_width;
    if min_lon < -180.0 || max_lon > 180.0 {
        return all_longitudes;
    }

    AABB::from_corners(
        [min_lon, min_lat.to_degrees()],
        [max_lon, max_lat.to_degrees()],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstar::Envelope;

    #[test]
    fn test_haversine_distance() {
        // Distance from NYC to LA is approximately 3,936 km
        let nyc = Point::new(-74.0060, 40.7128);
        let la = Point::new(-118.2437, 34.0522);

        let dist = haversine_distance(nyc, la);
        assert!((dist - 3_936_000.0).abs() < 50_000.0); // Within 50km
    }

    #[test]
    fn test_one_degree_of_latitude() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(0.0, 1.0);

        assert_relative_eq!(
            haversine_distance(a, b),
            EARTH_RADIUS_M * 1f64.to_radians(),
            max_relative = 1e-9
        );
    }

    #[test]
    fn test_envelope_contains_circle() {
        let center = Point::new(-122.27, 37.80);
        let radius = 5_000.0;
        let envelope = search_envelope(center, radius);

        // Walk the circle's boundary and check every point lands inside
        for step in 0..360 {
            let bearing = (step as f64).to_radians();
            let edge = destination(center, bearing, radius);
            assert!(
                envelope.contains_point(&[edge.x(), edge.y()]),
                "bearing {step} escapes the envelope"
            );
        }

        // But stays reasonably tight
        assert!(!envelope.contains_point(&[-122.0, 37.80]));
        assert!(!envelope.contains_point(&[-122.27, 38.0]));
    }

    #[test]
    fn test_envelope_near_pole_spans_all_longitudes() {
        let envelope = search_envelope(Point::new(10.0, 89.99), 5_000.0);
        assert!(envelope.contains_point(&[-170.0, 89.995]));
    }

    #[test]
    fn test_envelope_across_antimeridian() {
        let envelope = search_envelope(Point::new(179.99, -17.0), 10_000.0);
        assert!(envelope.contains_point(&[-179.99, -17.0]));
    }

    /// Point reached from `start` after `distance_m` along `bearing`.
    fn destination(start: Point, bearing: f64, distance_m: f64) -> Point {
        let angular = distance_m / EARTH_RADIUS_M;
        let lat1 = start.y().to_radians();
        let lon1 = start.x().to_radians();

        let lat2 = (lat1.sin() * angular.cos() + lat1.cos() * angular.sin() * bearing.cos()).asin();
        let lon2 = lon1
            + (bearing.sin() * angular.sin() * lat1.cos())
                .atan2(angular.cos() - lat1.sin() * lat2.sin());
        Point::new(lon2.to_degrees(), lat2.to_degrees())
    }
}
