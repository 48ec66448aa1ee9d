//! In-memory transit provider built from one loaded feed.
//!
//! Holds the record store, the lookup indices and a spatial index over the
//! stops. Nothing is mutated after construction, so a provider can be
//! shared between threads behind an `Arc` and queried without locking.

use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;

use geo::Point;
use rstar::RTree;
use tracing::{debug, info, Level};

use crate::alias::AliasMap;
use crate::feed::RawFeed;
use crate::identifiers::*;
use crate::index::Indices;
use crate::models::{traits::*, types::*};
use crate::provider::{catalog, connections};
use crate::spatial::{haversine_distance, search_envelope, StopNode};
use crate::store::RecordStore;

/// In-memory transit provider with spatial indexing
#[derive(Clone, Debug, Default)]
pub struct StaticTransitProvider {
    store: RecordStore,
    indices: Indices,
    stop_tree: RTree<StopNode>,
}

impl StaticTransitProvider {
    /// Create a new empty provider
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_feed(feed: RawFeed, aliases: AliasMap) -> Self {
        Self::from_store(RecordStore::new(feed, aliases))
    }

    pub fn from_store(store: RecordStore) -> Self {
        let indices = Indices::build(&store);
        let stop_tree = RTree::bulk_load(
            store
                .stops()
                .iter()
                .enumerate()
                .map(|(order, stop)| StopNode::new(order, stop.clone()))
                .collect(),
        );

        info!(
            stops = store.stops().len(),
            routes = store.routes().len(),
            trips = store.trips().len(),
            stop_times = store.stop_times().len(),
            "Transit provider built"
        );

        let provider = Self {
            store,
            indices,
            stop_tree,
        };
        if tracing::enabled!(Level::DEBUG) {
            for station in provider.station_routes() {
                debug!(station = %station.name, routes = ?station.route_long_names, "Station routes");
            }
        }
        provider
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    // ---- Lookups ----

    /// Stop ids sharing a display name, ignoring case.
    pub fn resolve_station(&self, name: &str) -> Option<&BTreeSet<StopIdentifier>> {
        self.indices.stop_ids_for_name(name)
    }

    /// Abbreviation a live departure service uses for a station name.
    pub fn abbreviation_for(&self, name: &str) -> Option<&str> {
        self.store.aliases().abbreviation(name).map(|a| &**a)
    }

    pub fn stop(&self, id: &str) -> Option<&Arc<Stop>> {
        self.indices.stop(id)
    }

    pub fn trip(&self, id: &str) -> Option<&Arc<Trip>> {
        self.indices.trip(id)
    }

    pub fn route(&self, id: &str) -> Option<&Arc<Route>> {
        self.indices.route(id)
    }

    pub fn stop_times(&self, trip_id: &str) -> Option<&[Arc<StopTime>]> {
        self.indices.stop_times(trip_id)
    }

    /// Departure filter for live trains from `origin` towards `destination`.
    pub fn connection_filter(&self, origin: &str, destination: &str) -> ConnectionFilter {
        let trips = self.connecting_trips(origin, destination);
        ConnectionFilter::from_trips(&trips, self.store.aliases())
    }

    // ---- Catalog ----

    pub fn route_catalog(&self) -> Vec<RouteSummary> {
        catalog::route_catalog(&self.store, &self.indices)
    }

    pub fn station_routes(&self) -> Vec<StationRoutes> {
        catalog::station_routes(&self.store, &self.indices)
    }
}

impl TransitQueries for StaticTransitProvider {
    /// Keeps the first-listed stop of each display name, which is not
    /// necessarily the nearest platform of that station.
    fn stops_near(&self, point: Point, radius_m: f64) -> Vec<NearbyStop> {
        let valid_point = point.y().abs() <= 90.0 && point.x().abs() <= 180.0;
        if !valid_point || radius_m < 0.0 || !radius_m.is_finite() {
            return Vec::new();
        }

        let mut within: Vec<(&StopNode, f64)> = self
            .stop_tree
            .locate_in_envelope(&search_envelope(point, radius_m))
            .map(|node| (node, haversine_distance(point, node.location())))
            .filter(|(_, distance)| *distance <= radius_m)
            .collect();
        within.sort_by_key(|(node, _)| node.order);

        let mut seen = HashSet::new();
        let mut nearby: Vec<NearbyStop> = within
            .into_iter()
            .filter(|(node, _)| seen.insert(node.stop.name.clone()))
            .map(|(node, distance_m)| NearbyStop {
                stop: node.stop.clone(),
                distance_m,
            })
            .collect();
        nearby.sort_by(|a, b| a.distance_m.total_cmp(&b.distance_m));
        nearby
    }

    fn trips_through_station(&self, name: &str) -> Vec<StationTrip> {
        connections::trips_through_station(&self.indices, name)
    }

    fn connecting_trips(&self, origin: &str, destination: &str) -> Vec<ConnectingTrip> {
        connections::connecting_trips(&self.indices, origin, destination)
    }

    fn connecting_routes(
        &self,
        origin: &str,
        destination: &str,
        direction: &DirectionId,
    ) -> Vec<ConnectingRoute> {
        connections::connecting_routes(&self.indices, origin, destination, direction)
    }

    fn stops_after(&self, trip_id: &str, after_stop_id: &str) -> Vec<Arc<str>> {
        connections::stops_after(&self.indices, trip_id, after_stop_id)
    }
}
