//! The read-only query surface handed to a dispatch layer.
//!
//! A chat front end or a command-line tool only needs these operations.
//! Every one of them is a pure function of its arguments and an immutable
//! snapshot of the feed, and every one fails soft: an unknown station name
//! or identifier gives an empty result, never an error.

use std::sync::Arc;

use geo::Point;

use crate::identifiers::DirectionId;
use crate::models::types::*;

pub trait TransitQueries: Send + Sync {
    /// Stops within `radius_m` meters of `point`, one per display name,
    /// nearest first.
    fn stops_near(&self, point: Point, radius_m: f64) -> Vec<NearbyStop>;

    /// Distinct (headsign, direction) services calling at a station.
    fn trips_through_station(&self, name: &str) -> Vec<StationTrip>;

    /// Trips that call at `origin` and later at `destination`.
    fn connecting_trips(&self, origin: &str, destination: &str) -> Vec<ConnectingTrip>;

    /// Routes with a trip in `direction` that calls at `origin` and later
    /// at `destination`, each route once.
    fn connecting_routes(
        &self,
        origin: &str,
        destination: &str,
        direction: &DirectionId,
    ) -> Vec<ConnectingRoute>;

    /// Names of the stops a trip calls at after `after_stop_id`, in order.
    fn stops_after(&self, trip_id: &str, after_stop_id: &str) -> Vec<Arc<str>>;
}
