//! Station connectivity queries.
//!
//! Pure functions of the indices. Station names resolve through the
//! case-insensitive name index; an unknown name or id gives an empty result.
//!
//! A trip only connects A to B when it calls at A *before* B. Every
//! pairwise query checks that with the parsed `stop_sequence` of the first
//! visit to each station; a trip whose visit cannot be ordered is left out.

use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;

use tracing::debug;

use crate::identifiers::*;
use crate::index::Indices;
use crate::models::types::*;

/// Distinct (headsign, direction) services calling at the named station.
///
/// Routes are visited in id order and their trips in file order; the first
/// trip of each service decides its position in the result.
pub fn trips_through_station(indices: &Indices, name: &str) -> Vec<StationTrip> {
    let Some(stop_ids) = resolve(indices, "station", name) else {
        return Vec::new();
    };

    let route_ids: BTreeSet<&RouteIdentifier> = stop_ids
        .iter()
        .filter_map(|stop_id| indices.route_ids_at_stop(stop_id.as_str()))
        .flatten()
        .collect();

    let mut seen = HashSet::new();
    let mut services = Vec::new();
    for route_id in route_ids {
        for trip in indices.trips_on_route(route_id.as_str()) {
            // A route's trips do not all call at every station on it
            let calls_here = indices
                .stop_times(trip.id.as_str())
                .is_some_and(|stop_times| stop_times.iter().any(|st| stop_ids.contains(&st.stop_id)));
            if !calls_here {
                continue;
            }

            let service = StationTrip {
                headsign: trip.headsign.clone(),
                direction: trip.direction.clone(),
            };
            if seen.insert(service.clone()) {
                services.push(service);
            }
        }
    }

    debug!(station = name, services = services.len(), "Trips through station");
    services
}

/// Trips that call at `origin` and later at `destination`, by trip id.
pub fn connecting_trips(indices: &Indices, origin: &str, destination: &str) -> Vec<ConnectingTrip> {
    let (Some(from), Some(to)) = (
        resolve(indices, "origin", origin),
        resolve(indices, "destination", destination),
    ) else {
        return Vec::new();
    };

    let trips: Vec<ConnectingTrip> = ordered_trips(indices, from, to)
        .map(|trip| ConnectingTrip {
            trip_id: trip.id.clone(),
            headsign: trip.headsign.clone(),
            direction: trip.direction.clone(),
        })
        .collect();

    debug!(origin, destination, trips = trips.len(), "Connecting trips");
    trips
}

/// Routes having a trip in `direction` that calls at `origin` and later at
/// `destination`. Each route appears once, at its first qualifying trip.
pub fn connecting_routes(
    indices: &Indices,
    origin: &str,
    destination: &str,
    direction: &DirectionId,
) -> Vec<ConnectingRoute> {
    let (Some(from), Some(to)) = (
        resolve(indices, "origin", origin),
        resolve(indices, "destination", destination),
    ) else {
        return Vec::new();
    };

    let mut seen = HashSet::new();
    let routes: Vec<ConnectingRoute> = ordered_trips(indices, from, to)
        .filter(|trip| trip.direction == *direction)
        .filter_map(|trip| indices.route(trip.route_id.as_str()))
        .filter(|route| seen.insert(route.id.clone()))
        .map(|route| ConnectingRoute {
            route: route.clone(),
            direction: direction.clone(),
        })
        .collect();

    debug!(origin, destination, %direction, routes = routes.len(), "Connecting routes");
    routes
}

/// Names of the stops `trip_id` calls at after `after_stop_id`.
pub fn stops_after(indices: &Indices, trip_id: &str, after_stop_id: &str) -> Vec<Arc<str>> {
    let Some(stop_times) = indices.stop_times(trip_id) else {
        return Vec::new();
    };
    let Some(after) = stop_times
        .iter()
        .find(|st| st.stop_id.as_str() == after_stop_id)
        .and_then(|st| st.sequence())
    else {
        return Vec::new();
    };

    stop_times
        .iter()
        .filter(|st| st.sequence().is_some_and(|sequence| sequence > after))
        .filter_map(|st| indices.stop(st.stop_id.as_str()))
        .map(|stop| stop.name.clone())
        .collect()
}

fn resolve<'a>(indices: &'a Indices, role: &str, name: &str) -> Option<&'a BTreeSet<StopIdentifier>> {
    let stop_ids = indices.stop_ids_for_name(name);
    if stop_ids.is_none() {
        debug!(role, name, "Unknown station name");
    }
    stop_ids
}

fn trips_at<'a>(indices: &'a Indices, stop_ids: &BTreeSet<StopIdentifier>) -> BTreeSet<&'a TripIdentifier> {
    stop_ids
        .iter()
        .filter_map(|stop_id| indices.trip_ids_at_stop(stop_id.as_str()))
        .flatten()
        .collect()
}

/// Known trips calling at both stations in the right order, by trip id.
fn ordered_trips<'a>(
    indices: &'a Indices,
    from: &'a BTreeSet<StopIdentifier>,
    to: &'a BTreeSet<StopIdentifier>,
) -> impl Iterator<Item = &'a Arc<Trip>> + 'a {
    let via_origin = trips_at(indices, from);
    let via_destination = trips_at(indices, to);
    let shared: Vec<&TripIdentifier> = via_origin.intersection(&via_destination).copied().collect();

    shared
        .into_iter()
        .filter_map(move |trip_id| indices.trip(trip_id.as_str()))
        .filter(move |trip| calls_in_order(indices, trip.id.as_str(), from, to))
}

fn calls_in_order(
    indices: &Indices,
    trip_id: &str,
    from: &BTreeSet<StopIdentifier>,
    to: &BTreeSet<StopIdentifier>,
) -> bool {
    let Some(stop_times) = indices.stop_times(trip_id) else {
        return false;
    };
    let first_visit = |stop_ids: &BTreeSet<StopIdentifier>| {
        stop_times
            .iter()
            .find(|st| stop_ids.contains(&st.stop_id))
            .and_then(|st| st.sequence())
    };

    match (first_visit(from), first_visit(to)) {
        (Some(origin), Some(destination)) => destination > origin,
        _ => false,
    }
}
