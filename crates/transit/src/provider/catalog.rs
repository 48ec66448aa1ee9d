//! Whole-network summaries: which stations each route serves, and which
//! routes serve each station.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use crate::identifiers::DirectionId;
use crate::index::Indices;
use crate::models::types::*;
use crate::store::RecordStore;

/// Every route in file order with, per direction, the stops of the first
/// trip running that way.
pub fn route_catalog(store: &RecordStore, indices: &Indices) -> Vec<RouteSummary> {
    store
        .routes()
        .iter()
        .map(|route| {
            let trips = indices.trips_on_route(route.id.as_str());
            let directions: BTreeSet<&DirectionId> = trips.iter().map(|trip| &trip.direction).collect();

            let directions = directions
                .into_iter()
                .map(|direction| {
                    let stop_names = trips
                        .iter()
                        .find(|trip| trip.direction == *direction)
                        .map(|trip| stop_names(indices, trip.id.as_str()))
                        .unwrap_or_default();
                    DirectionSummary {
                        direction: direction.clone(),
                        stop_names,
                    }
                })
                .collect();

            RouteSummary {
                route: route.clone(),
                directions,
            }
        })
        .collect()
}

/// Every station name in alphabetical order with the long names of the
/// routes serving any of its stops.
pub fn station_routes(store: &RecordStore, indices: &Indices) -> Vec<StationRoutes> {
    let mut by_name: BTreeMap<Arc<str>, BTreeSet<Arc<str>>> = BTreeMap::new();
    for stop in store.stops() {
        let long_names = by_name.entry(stop.name.clone()).or_default();
        let route_ids = indices.route_ids_at_stop(stop.id.as_str()).into_iter().flatten();
        for route_id in route_ids {
            if let Some(route) = indices.route(route_id.as_str()) {
                long_names.insert(route.long_name.clone());
            }
        }
    }

    by_name
        .into_iter()
        .map(|(name, long_names)| StationRoutes {
            name,
            route_long_names: long_names.into_iter().collect(),
        })
        .collect()
}

fn stop_names(indices: &Indices, trip_id: &str) -> Vec<Arc<str>> {
    indices
        .stop_times(trip_id)
        .unwrap_or_default()
        .iter()
        .filter_map(|st| indices.stop(st.stop_id.as_str()))
        .map(|stop| stop.name.clone())
        .collect()
}
