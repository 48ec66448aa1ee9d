//! Lookup indices derived from a [`RecordStore`].
//!
//! [`Indices::build`] is a pure function of the store. Each index is filled
//! by its own pass over the records, and the result is never mutated
//! afterwards: a new feed means a new `Indices` value.
//!
//! Sets are `BTreeSet`s so that everything iterating them (and therefore
//! every query result) comes out in the same order for the same feed.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use tracing::{debug, warn};

use crate::identifiers::*;
use crate::models::types::*;
use crate::store::RecordStore;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Indices {
    /// Lowercased display name → stops carrying it
    stop_ids_by_name: HashMap<String, BTreeSet<StopIdentifier>>,
    /// Last row wins when a feed repeats a trip id
    trips_by_id: HashMap<TripIdentifier, Arc<Trip>>,
    routes_by_id: HashMap<RouteIdentifier, Arc<Route>>,
    /// Sorted by parsed `stop_sequence`, unparseable ones last
    stop_times_by_trip: HashMap<TripIdentifier, Vec<Arc<StopTime>>>,
    route_ids_by_stop: HashMap<StopIdentifier, BTreeSet<RouteIdentifier>>,

    /// First row wins
    stops_by_id: HashMap<StopIdentifier, Arc<Stop>>,
    /// File order, only the trips held by `trips_by_id`
    trips_by_route: HashMap<RouteIdentifier, Vec<Arc<Trip>>>,
    trip_ids_by_stop: HashMap<StopIdentifier, BTreeSet<TripIdentifier>>,
}

impl Indices {
    pub fn build(store: &RecordStore) -> Self {
        let trips_by_id = build_trips_by_id(store);
        let indices = Self {
            stop_ids_by_name: build_stop_ids_by_name(store),
            routes_by_id: build_routes_by_id(store),
            stop_times_by_trip: build_stop_times_by_trip(store),
            route_ids_by_stop: build_route_ids_by_stop(store, &trips_by_id),
            stops_by_id: build_stops_by_id(store),
            trips_by_route: build_trips_by_route(store, &trips_by_id),
            trip_ids_by_stop: build_trip_ids_by_stop(store),
            trips_by_id,
        };

        for (index, entries) in [
            ("stop_ids_by_name", indices.stop_ids_by_name.len()),
            ("trips_by_id", indices.trips_by_id.len()),
            ("routes_by_id", indices.routes_by_id.len()),
            ("stop_times_by_trip", indices.stop_times_by_trip.len()),
            ("route_ids_by_stop", indices.route_ids_by_stop.len()),
            ("stops_by_id", indices.stops_by_id.len()),
            ("trips_by_route", indices.trips_by_route.len()),
            ("trip_ids_by_stop", indices.trip_ids_by_stop.len()),
        ] {
            debug!(index, entries, "Built index");
        }
        indices
    }

    // ---- Lookups ----

    /// Stops whose display name matches `name`, ignoring case.
    pub fn stop_ids_for_name(&self, name: &str) -> Option<&BTreeSet<StopIdentifier>> {
        self.stop_ids_by_name.get(&name.to_lowercase())
    }

    pub fn stop(&self, id: &str) -> Option<&Arc<Stop>> {
        self.stops_by_id.get(id)
    }

    pub fn trip(&self, id: &str) -> Option<&Arc<Trip>> {
        self.trips_by_id.get(id)
    }

    pub fn route(&self, id: &str) -> Option<&Arc<Route>> {
        self.routes_by_id.get(id)
    }

    /// A trip's stop times in sequence order.
    pub fn stop_times(&self, trip_id: &str) -> Option<&[Arc<StopTime>]> {
        self.stop_times_by_trip.get(trip_id).map(Vec::as_slice)
    }

    pub fn route_ids_at_stop(&self, stop_id: &str) -> Option<&BTreeSet<RouteIdentifier>> {
        self.route_ids_by_stop.get(stop_id)
    }

    pub fn trip_ids_at_stop(&self, stop_id: &str) -> Option<&BTreeSet<TripIdentifier>> {
        self.trip_ids_by_stop.get(stop_id)
    }

    /// Trips of a route in file order.
    pub fn trips_on_route(&self, route_id: &str) -> &[Arc<Trip>] {
        self.trips_by_route
            .get(route_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.stops_by_id.is_empty() && self.trips_by_id.is_empty() && self.routes_by_id.is_empty()
    }
}

/// Sort key putting parseable sequences first, in numeric order.
///
/// A stop time with an unusable sequence cannot be placed; it goes after
/// the others and keeps its file position relative to its peers (the sort
/// is stable).
fn sequence_key(stop_time: &StopTime) -> (bool, i64) {
    match stop_time.sequence() {
        Some(sequence) => (false, sequence),
        None => (true, 0),
    }
}

fn build_stop_ids_by_name(store: &RecordStore) -> HashMap<String, BTreeSet<StopIdentifier>> {
    let mut map: HashMap<String, BTreeSet<StopIdentifier>> = HashMap::new();
    for stop in store.stops() {
        if stop.id.is_empty() {
            warn!(name = %stop.name, "Skipping stop without an id");
            continue;
        }
        map.entry(stop.name.to_lowercase())
            .or_default()
            .insert(stop.id.clone());
    }
    map
}

fn build_stops_by_id(store: &RecordStore) -> HashMap<StopIdentifier, Arc<Stop>> {
    let mut map = HashMap::new();
    for stop in store.stops() {
        if !stop.id.is_empty() {
            map.entry(stop.id.clone()).or_insert_with(|| stop.clone());
        }
    }
    map
}

fn build_trips_by_id(store: &RecordStore) -> HashMap<TripIdentifier, Arc<Trip>> {
    let mut map = HashMap::new();
    for trip in store.trips() {
        if trip.id.is_empty() {
            warn!(route = %trip.route_id, "Skipping trip without an id");
            continue;
        }
        if let Some(previous) = map.insert(trip.id.clone(), trip.clone()) {
            debug!(trip = %previous.id, "Trip id repeated, keeping the later row");
        }
    }
    map
}

fn build_routes_by_id(store: &RecordStore) -> HashMap<RouteIdentifier, Arc<Route>> {
    let mut map = HashMap::new();
    for route in store.routes() {
        if route.id.is_empty() {
            warn!(name = %route.long_name, "Skipping route without an id");
            continue;
        }
        map.insert(route.id.clone(), route.clone());
    }
    map
}

fn build_stop_times_by_trip(store: &RecordStore) -> HashMap<TripIdentifier, Vec<Arc<StopTime>>> {
    let mut map: HashMap<TripIdentifier, Vec<Arc<StopTime>>> = HashMap::new();
    for stop_time in store.stop_times() {
        if stop_time.trip_id.is_empty() || stop_time.stop_id.is_empty() {
            warn!(
                trip = %stop_time.trip_id,
                stop = %stop_time.stop_id,
                "Skipping stop time without a trip or stop id"
            );
            continue;
        }
        map.entry(stop_time.trip_id.clone())
            .or_default()
            .push(stop_time.clone());
    }

    for (trip_id, stop_times) in map.iter_mut() {
        stop_times.sort_by_key(|st| sequence_key(st));
        let unordered = stop_times.iter().filter(|st| st.sequence().is_none()).count();
        if unordered > 0 {
            warn!(trip = %trip_id, unordered, "Stop times with unparseable stop_sequence");
        }
    }
    map
}

/// Joins stop time → trip → route. Stop times of unknown trips contribute
/// nothing.
fn build_route_ids_by_stop(
    store: &RecordStore,
    trips_by_id: &HashMap<TripIdentifier, Arc<Trip>>,
) -> HashMap<StopIdentifier, BTreeSet<RouteIdentifier>> {
    let mut map: HashMap<StopIdentifier, BTreeSet<RouteIdentifier>> = HashMap::new();
    for stop_time in store.stop_times() {
        if stop_time.stop_id.is_empty() {
            continue;
        }
        if let Some(trip) = trips_by_id.get(&stop_time.trip_id) {
            map.entry(stop_time.stop_id.clone())
                .or_default()
                .insert(trip.route_id.clone());
        }
    }
    map
}

fn build_trips_by_route(
    store: &RecordStore,
    trips_by_id: &HashMap<TripIdentifier, Arc<Trip>>,
) -> HashMap<RouteIdentifier, Vec<Arc<Trip>>> {
    let mut map: HashMap<RouteIdentifier, Vec<Arc<Trip>>> = HashMap::new();
    for trip in store.trips() {
        let is_current = trips_by_id
            .get(&trip.id)
            .is_some_and(|current| Arc::ptr_eq(current, trip));
        if is_current {
            map.entry(trip.route_id.clone()).or_default().push(trip.clone());
        }
    }
    map
}

fn build_trip_ids_by_stop(store: &RecordStore) -> HashMap<StopIdentifier, BTreeSet<TripIdentifier>> {
    let mut map: HashMap<StopIdentifier, BTreeSet<TripIdentifier>> = HashMap::new();
    for stop_time in store.stop_times() {
        if stop_time.trip_id.is_empty() || stop_time.stop_id.is_empty() {
            continue;
        }
        map.entry(stop_time.stop_id.clone())
            .or_default()
            .insert(stop_time.trip_id.clone());
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alias::AliasMap;
    use crate::feed::RawFeed;

    fn store() -> RecordStore {
        let feed = RawFeed {
            stops: vec![
                Stop::new("EMBR_1", "Embarcadero", "37.7929", "-122.3971"),
                Stop::new("EMBR_2", "Embarcadero", "37.7930", "-122.3970"),
                Stop::new("MONT_1", "Montgomery Street", "37.7894", "-122.4011"),
            ],
            routes: vec![
                Route::new("1", "Yellow-S", "Antioch to SFIA/Millbrae"),
                Route::new("2", "Yellow-N", "SFIA/Millbrae to Antioch"),
            ],
            trips: vec![
                Trip::new("T1", "1", "1", "SFIA / Millbrae"),
                Trip::new("T2", "2", "0", "Antioch"),
                Trip::new("T1", "2", "0", "Antioch"),
            ],
            stop_times: vec![
                StopTime::new("T1", "MONT_1", "10"),
                StopTime::new("T1", "EMBR_1", "9"),
                StopTime::new("T2", "EMBR_2", "2"),
                StopTime::new("T2", "MONT_1", "1"),
            ],
        };
        RecordStore::new(feed, AliasMap::default())
    }

    #[test]
    fn test_name_index_is_case_insensitive() {
        let indices = Indices::build(&store());

        let ids: Vec<&str> = indices
            .stop_ids_for_name("EMBARCADERO")
            .unwrap()
            .iter()
            .map(StopIdentifier::as_str)
            .collect();
        assert_eq!(ids, vec!["EMBR_1", "EMBR_2"]);
        assert!(indices.stop_ids_for_name("Embarcadero Plaza").is_none());
    }

    #[test]
    fn test_stop_times_sorted_numerically() {
        let indices = Indices::build(&store());

        let sequences: Vec<&str> = indices
            .stop_times("T1")
            .unwrap()
            .iter()
            .map(|st| &*st.stop_sequence)
            .collect();
        // "9" < "10" numerically even though not as text
        assert_eq!(sequences, vec!["9", "10"]);
    }

    #[test]
    fn test_duplicate_trip_last_row_wins() {
        let indices = Indices::build(&store());

        assert_eq!(indices.trip("T1").unwrap().route_id.as_str(), "2");
        assert!(indices.trips_on_route("1").is_empty());

        let on_route_2: Vec<&str> = indices
            .trips_on_route("2")
            .iter()
            .map(|t| t.id.as_str())
            .collect();
        assert_eq!(on_route_2, vec!["T2", "T1"]);
    }

    #[test]
    fn test_routes_by_stop_join() {
        let indices = Indices::build(&store());

        let at_mont: Vec<&str> = indices
            .route_ids_at_stop("MONT_1")
            .unwrap()
            .iter()
            .map(RouteIdentifier::as_str)
            .collect();
        assert_eq!(at_mont, vec!["2"]);
        assert_eq!(indices.trip_ids_at_stop("MONT_1").unwrap().len(), 2);
        assert!(indices.route("1").is_some());
    }

    #[test]
    fn test_unparseable_sequences_sort_last() {
        let feed = RawFeed {
            stop_times: vec![
                StopTime::new("T", "x1", "?"),
                StopTime::new("T", "a", "3"),
                StopTime::new("T", "x2", ""),
                StopTime::new("T", "b", "1"),
            ],
            ..RawFeed::default()
        };
        let indices = Indices::build(&RecordStore::new(feed, AliasMap::default()));

        let stops: Vec<&str> = indices
            .stop_times("T")
            .unwrap()
            .iter()
            .map(|st| st.stop_id.as_str())
            .collect();
        assert_eq!(stops, vec!["b", "a", "x1", "x2"]);
    }

    #[test]
    fn test_negative_sequences_order_before_zero() {
        let feed = RawFeed {
            stop_times: vec![
                StopTime::new("T", "b", "0"),
                StopTime::new("T", "c", "x"),
                StopTime::new("T", "a", "-2"),
            ],
            ..RawFeed::default()
        };
        let indices = Indices::build(&RecordStore::new(feed, AliasMap::default()));

        let stops: Vec<&str> = indices
            .stop_times("T")
            .unwrap()
            .iter()
            .map(|st| st.stop_id.as_str())
            .collect();
        assert_eq!(stops, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_blank_ids_are_skipped() {
        let feed = RawFeed {
            stops: vec![Stop::new("", "Ghost", "0", "0"), Stop::new("A", "Alpha", "0", "0")],
            trips: vec![Trip::new("", "R", "0", "Nowhere")],
            stop_times: vec![
                StopTime::new("", "A", "1"),
                StopTime::new("T", "", "2"),
                StopTime::new("T", "A", "3"),
            ],
            ..RawFeed::default()
        };
        let indices = Indices::build(&RecordStore::new(feed, AliasMap::default()));

        assert!(indices.stop_ids_for_name("ghost").is_none());
        assert!(indices.trip("").is_none());
        assert_eq!(indices.stop_times("T").unwrap().len(), 1);
        assert!(indices.stop_times("").is_none());
    }

    #[test]
    fn test_empty_store_builds_empty_indices() {
        let indices = Indices::build(&RecordStore::default());
        assert!(indices.is_empty());
        assert_eq!(indices, Indices::default());
    }

    #[test]
    fn test_build_is_deterministic() {
        let store = store();
        assert_eq!(Indices::build(&store), Indices::build(&store));
    }
}
