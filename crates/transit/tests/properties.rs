//! Properties every query result holds for arbitrary feeds.

use std::collections::HashSet;

use geo::Point;
use proptest::prelude::*;
use trainbus_transit::index::Indices;
use trainbus_transit::prelude::*;
use trainbus_transit::spatial::haversine_distance;
use trainbus_transit::store::RecordStore;

/// Stops scattered over the Bay Area, named from a small pool so that
/// several stops share a display name.
fn bay_area_stops() -> impl Strategy<Value = Vec<(f64, f64, usize)>> {
    prop::collection::vec((37.0f64..38.2, -122.9f64..-121.7, 0usize..6), 0..40)
}

fn scattered_feed(stops: &[(f64, f64, usize)]) -> RawFeed {
    let stops: Vec<Stop> = stops
        .iter()
        .enumerate()
        .map(|(i, (lat, lon, name))| {
            Stop::new(format!("S{i}"), format!("Station {name}"), lat.to_string(), lon.to_string())
        })
        .collect();
    let stop_times = stops
        .iter()
        .enumerate()
        .map(|(i, stop)| StopTime::new("T", stop.id.clone(), (i + 1).to_string()))
        .collect();
    RawFeed {
        stops,
        stop_times,
        ..RawFeed::default()
    }
}

/// One trip calling at `sequences.len()` stations, listed in file order,
/// with the given (shuffled, distinct) sequence numbers.
fn shuffled_trip(sequences: &[u32]) -> RawFeed {
    let stops = (0..sequences.len())
        .map(|i| Stop::new(format!("S{i}"), format!("Station {i}"), "37.8", "-122.3"))
        .collect();
    let stop_times = sequences
        .iter()
        .enumerate()
        .map(|(i, sequence)| StopTime::new("T", format!("S{i}"), sequence.to_string()))
        .collect();
    RawFeed {
        stops,
        routes: vec![Route::new("R", "R", "Red")],
        trips: vec![Trip::new("T", "R", "0", "Terminal")],
        stop_times,
    }
}

fn sequences() -> impl Strategy<Value = Vec<u32>> {
    (2u32..9).prop_flat_map(|n| Just((1..=n).collect::<Vec<u32>>()).prop_shuffle())
}

proptest! {
    /// Every result lies within the radius, results are nearest first, and
    /// no display name appears twice
    #[test]
    fn stops_near_within_radius_sorted_and_deduplicated(
        stops in bay_area_stops(),
        lat in 37.0f64..38.2,
        lon in -122.9f64..-121.7,
        radius in 0.0f64..60_000.0,
    ) {
        let provider = StaticTransitProvider::from_feed(scattered_feed(&stops), AliasMap::default());
        let here = Point::new(lon, lat);

        let nearby = provider.stops_near(here, radius);

        prop_assert!(nearby.iter().all(|n| n.distance_m <= radius));
        prop_assert!(nearby.windows(2).all(|w| w[0].distance_m <= w[1].distance_m));
        let names: HashSet<&str> = nearby.iter().map(|n| &*n.stop.name).collect();
        prop_assert_eq!(names.len(), nearby.len());
    }

    /// Each name within the radius is reported once, by its first-listed
    /// stop within the radius
    #[test]
    fn stops_near_reports_first_listed_stop_per_name(
        stops in bay_area_stops(),
        lat in 37.0f64..38.2,
        lon in -122.9f64..-121.7,
        radius in 0.0f64..60_000.0,
    ) {
        let provider = StaticTransitProvider::from_feed(scattered_feed(&stops), AliasMap::default());
        let here = Point::new(lon, lat);

        let mut expected = Vec::new();
        let mut seen = HashSet::new();
        for stop in provider.store().stops() {
            if haversine_distance(here, stop.location()) <= radius && seen.insert(stop.name.clone()) {
                expected.push(stop.id.clone());
            }
        }
        expected.sort();

        let mut reported: Vec<StopIdentifier> = provider
            .stops_near(here, radius)
            .into_iter()
            .map(|n| n.stop.id.clone())
            .collect();
        reported.sort();

        prop_assert_eq!(reported, expected);
    }

    /// A trip connects two of its stations exactly when it calls at the
    /// first before the second
    #[test]
    fn connecting_trips_respect_direction_of_travel(
        sequences in sequences(),
        a in 0usize..8,
        b in 0usize..8,
    ) {
        let n = sequences.len();
        let (a, b) = (a % n, b % n);
        let provider = StaticTransitProvider::from_feed(shuffled_trip(&sequences), AliasMap::default());

        let trips = provider.connecting_trips(&format!("Station {a}"), &format!("Station {b}"));

        prop_assert_eq!(trips.len(), usize::from(sequences[a] < sequences[b]));
        let routes = provider.connecting_routes(&format!("Station {a}"), &format!("Station {b}"), &DirectionId::new("0"));
        prop_assert_eq!(routes.len(), trips.len());
    }

    /// The stops after a call are exactly the later calls, in calling order
    #[test]
    fn stops_after_lists_later_calls_in_order(sequences in sequences(), after in 0usize..8) {
        let after = after % sequences.len();
        let provider = StaticTransitProvider::from_feed(shuffled_trip(&sequences), AliasMap::default());

        let mut later: Vec<(u32, String)> = sequences
            .iter()
            .enumerate()
            .filter(|(_, sequence)| **sequence > sequences[after])
            .map(|(i, sequence)| (*sequence, format!("Station {i}")))
            .collect();
        later.sort();
        let expected: Vec<String> = later.into_iter().map(|(_, name)| name).collect();

        let reported: Vec<String> = provider
            .stops_after("T", &format!("S{after}"))
            .iter()
            .map(|name| name.to_string())
            .collect();

        prop_assert_eq!(reported, expected);
    }

    /// Building twice from the same records gives equal indices
    #[test]
    fn index_build_is_deterministic(sequences in sequences(), stops in bay_area_stops()) {
        let mut feed = shuffled_trip(&sequences);
        feed.stop_times.extend(scattered_feed(&stops).stop_times);
        let store = RecordStore::new(feed, AliasMap::bart());

        prop_assert_eq!(Indices::build(&store), Indices::build(&store));
    }
}

#[test]
fn trip_running_the_other_way_does_not_connect() {
    let feed = RawFeed {
        stops: vec![
            Stop::new("S_origin", "Origin Station", "37.80", "-122.27"),
            Stop::new("S_dest", "Dest Station", "37.85", "-122.25"),
        ],
        routes: vec![Route::new("R", "R", "Red")],
        trips: vec![Trip::new("T1", "R", "0", "Dest"), Trip::new("T2", "R", "1", "Origin")],
        stop_times: vec![
            StopTime::new("T1", "S_origin", "3"),
            StopTime::new("T1", "S_dest", "7"),
            StopTime::new("T2", "S_dest", "3"),
            StopTime::new("T2", "S_origin", "7"),
        ],
    };
    let provider = StaticTransitProvider::from_feed(feed, AliasMap::default());

    let trips = provider.connecting_trips("Origin Station", "Dest Station");

    let ids: Vec<&str> = trips.iter().map(|t| t.trip_id.as_str()).collect();
    assert_eq!(ids, vec!["T1"]);
}
