//! Ground-truth records of one loaded feed.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::debug;

use crate::alias::AliasMap;
use crate::feed::RawFeed;
use crate::identifiers::StopIdentifier;
use crate::models::types::*;

/// The rows of a feed, in file order, plus the alias map.
///
/// Only stops that some stop time visits are kept: a stop no trip calls at
/// is not an operational station. Each kept stop is stamped with its
/// abbreviation from the alias map (exact display-name match).
#[derive(Clone, Debug, Default)]
pub struct RecordStore {
    stops: Vec<Arc<Stop>>,
    routes: Vec<Arc<Route>>,
    trips: Vec<Arc<Trip>>,
    stop_times: Vec<Arc<StopTime>>,
    aliases: AliasMap,
}

impl RecordStore {
    pub fn new(feed: RawFeed, aliases: AliasMap) -> Self {
        let RawFeed {
            stops,
            routes,
            trips,
            stop_times,
        } = feed;

        let total_stops = stops.len();
        let stops: Vec<Arc<Stop>> = {
            let visited: HashSet<&StopIdentifier> =
                stop_times.iter().map(|st| &st.stop_id).collect();
            stops
                .into_iter()
                .filter(|stop| visited.contains(&stop.id))
                .map(|mut stop| {
                    stop.alias = aliases.exact(&stop.name).cloned();
                    Arc::new(stop)
                })
                .collect()
        };
        debug!(
            kept = stops.len(),
            dropped = total_stops - stops.len(),
            "Filtered stops to those visited by a trip"
        );

        Self {
            stops,
            routes: routes.into_iter().map(Arc::new).collect(),
            trips: trips.into_iter().map(Arc::new).collect(),
            stop_times: stop_times.into_iter().map(Arc::new).collect(),
            aliases,
        }
    }

    pub fn stops(&self) -> &[Arc<Stop>] {
        &self.stops
    }

    pub fn routes(&self) -> &[Arc<Route>] {
        &self.routes
    }

    pub fn trips(&self) -> &[Arc<Trip>] {
        &self.trips
    }

    pub fn stop_times(&self) -> &[Arc<StopTime>] {
        &self.stop_times
    }

    pub fn aliases(&self) -> &AliasMap {
        &self.aliases
    }
}
