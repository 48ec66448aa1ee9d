//! Feed records, query results and errors.

use std::collections::BTreeSet;
use std::sync::Arc;

use geo::Point;
use tracing::warn;

use crate::alias::AliasMap;
use crate::identifiers::*;
use crate::models::parse::{parse_latitude, parse_longitude, parse_sequence};

// ============================================================================
// Feed Records
// ============================================================================

/// A boarding location as listed in `stops.txt`.
///
/// Display names are not unique: the platforms of one station usually share
/// a name. Coordinates are kept as the feed wrote them.
#[derive(Clone, Debug, PartialEq)]
pub struct Stop {
    pub id: StopIdentifier,
    pub name: Arc<str>,
    pub latitude: Arc<str>,
    pub longitude: Arc<str>,
    /// Station abbreviation from the alias map, filled in by the record store
    pub alias: Option<Arc<str>>,
}

impl Stop {
    pub fn new(
        id: impl Into<StopIdentifier>,
        name: impl Into<Arc<str>>,
        latitude: impl Into<Arc<str>>,
        longitude: impl Into<Arc<str>>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            latitude: latitude.into(),
            longitude: longitude.into(),
            alias: None,
        }
    }

    /// Location as `(lon, lat)`. Unparseable coordinates read as `0.0`.
    pub fn location(&self) -> Point {
        Point::new(
            parse_longitude(&self.longitude).unwrap_or(0.0),
            parse_latitude(&self.latitude).unwrap_or(0.0),
        )
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Route {
    pub id: RouteIdentifier,
    /// Short name (e.g., "Yellow-N")
    pub short_name: Arc<str>,
    /// Long name (e.g., "Antioch to SFIA/Millbrae")
    pub long_name: Arc<str>,
    pub description: Arc<str>,
}

impl Route {
    pub fn new(
        id: impl Into<RouteIdentifier>,
        short_name: impl Into<Arc<str>>,
        long_name: impl Into<Arc<str>>,
    ) -> Self {
        Self {
            id: id.into(),
            short_name: short_name.into(),
            long_name: long_name.into(),
            description: "".into(),
        }
    }

    pub fn with_description(mut self, description: impl Into<Arc<str>>) -> Self {
        self.description = description.into();
        self
    }
}

/// One scheduled run of a vehicle.
#[derive(Clone, Debug, PartialEq)]
pub struct Trip {
    pub id: TripIdentifier,
    pub route_id: RouteIdentifier,
    pub direction: DirectionId,
    /// Display name of the destination (e.g., "Daly City")
    pub headsign: Arc<str>,
}

impl Trip {
    pub fn new(
        id: impl Into<TripIdentifier>,
        route_id: impl Into<RouteIdentifier>,
        direction: impl Into<DirectionId>,
        headsign: impl Into<Arc<str>>,
    ) -> Self {
        Self {
            id: id.into(),
            route_id: route_id.into(),
            direction: direction.into(),
            headsign: headsign.into(),
        }
    }
}

/// A trip's scheduled visit to one stop.
///
/// Times are kept as text; nothing in this crate computes with them.
#[derive(Clone, Debug, PartialEq)]
pub struct StopTime {
    pub trip_id: TripIdentifier,
    pub stop_id: StopIdentifier,
    pub stop_sequence: Arc<str>,
    pub arrival_time: Arc<str>,
    pub departure_time: Arc<str>,
}

impl StopTime {
    pub fn new(
        trip_id: impl Into<TripIdentifier>,
        stop_id: impl Into<StopIdentifier>,
        stop_sequence: impl Into<Arc<str>>,
    ) -> Self {
        Self {
            trip_id: trip_id.into(),
            stop_id: stop_id.into(),
            stop_sequence: stop_sequence.into(),
            arrival_time: "".into(),
            departure_time: "".into(),
        }
    }

    pub fn with_times(
        mut self,
        arrival_time: impl Into<Arc<str>>,
        departure_time: impl Into<Arc<str>>,
    ) -> Self {
        self.arrival_time = arrival_time.into();
        self.departure_time = departure_time.into();
        self
    }

    /// Position of this visit within its trip, if the feed value is usable.
    pub fn sequence(&self) -> Option<i64> {
        parse_sequence(&self.stop_sequence)
    }
}

// ============================================================================
// Query Results
// ============================================================================

/// A logical service calling at a station.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct StationTrip {
    pub headsign: Arc<str>,
    pub direction: DirectionId,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConnectingTrip {
    pub trip_id: TripIdentifier,
    pub headsign: Arc<str>,
    pub direction: DirectionId,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ConnectingRoute {
    pub route: Arc<Route>,
    pub direction: DirectionId,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NearbyStop {
    pub stop: Arc<Stop>,
    /// Great-circle distance from the query point in meters
    pub distance_m: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RouteSummary {
    pub route: Arc<Route>,
    pub directions: Vec<DirectionSummary>,
}

/// Stops of the first trip running a route in one direction.
#[derive(Clone, Debug, PartialEq)]
pub struct DirectionSummary {
    pub direction: DirectionId,
    pub stop_names: Vec<Arc<str>>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct StationRoutes {
    pub name: Arc<str>,
    pub route_long_names: Vec<Arc<str>>,
}

/// Station abbreviations of the trains that lead from one station to
/// another.
///
/// Live departure boards key each train by the abbreviation of its final
/// stop. The filter maps the headsign of every connecting trip to such an
/// abbreviation, so a departure is kept when its abbreviation is one of
/// them.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConnectionFilter {
    abbreviations: BTreeSet<Arc<str>>,
}

impl ConnectionFilter {
    pub fn from_trips<'a>(trips: impl IntoIterator<Item = &'a ConnectingTrip>, aliases: &AliasMap) -> Self {
        let mut abbreviations = BTreeSet::new();
        for trip in trips {
            match aliases.headsign_abbreviation(&trip.headsign) {
                Some(abbreviation) => {
                    abbreviations.insert(Arc::from(abbreviation.to_lowercase()));
                }
                None => warn!(headsign = %trip.headsign, "No abbreviation for headsign"),
            }
        }
        Self { abbreviations }
    }

    /// Whether a departure bound for `abbreviation` (any case) leads to the
    /// destination.
    pub fn admits(&self, abbreviation: &str) -> bool {
        self.abbreviations.contains(abbreviation.to_lowercase().as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.abbreviations.is_empty()
    }

    pub fn abbreviations(&self) -> impl Iterator<Item = &str> {
        self.abbreviations.iter().map(|a| &**a)
    }
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum TransitError {
    #[cfg(feature = "loader")]
    #[error("Failed to read {}: {source}", .path.display())]
    Csv {
        path: std::path::PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Feed unavailable: {0}")]
    FeedUnavailable(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// A newer load was published while this one was still running
    #[error("Load {0} superseded by a newer snapshot")]
    Superseded(u64),
}

pub type Result<T> = std::result::Result<T, TransitError>;
