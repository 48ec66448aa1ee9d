//! GTFS text files on disk.
//!
//! Columns are matched by header name, so column order and extra columns do
//! not matter. A file that cannot be opened yields an empty sequence and a
//! row that cannot be read is skipped; both leave a warning behind.

use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::feed::config::FeedConfig;
use crate::feed::traits::{FeedSource, RawFeed};
use crate::models::types::*;

/// Reads `stops.txt`, `routes.txt`, `trips.txt` and `stop_times.txt` from a
/// directory.
#[derive(Clone, Debug)]
pub struct CsvFeedSource {
    config: FeedConfig,
}

impl CsvFeedSource {
    pub fn new(config: FeedConfig) -> Self {
        Self { config }
    }

    pub fn from_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(FeedConfig::new(dir.as_ref()))
    }

    pub fn config(&self) -> &FeedConfig {
        &self.config
    }
}

impl FeedSource for CsvFeedSource {
    fn load(&self) -> Result<RawFeed> {
        let dir = self.config.dir();
        if !dir.is_dir() {
            return Err(TransitError::FeedUnavailable(format!(
                "{} is not a directory",
                dir.display()
            )));
        }

        let feed = RawFeed {
            stops: read_table(&self.config.stops_path(), StopRecord::into_stop),
            routes: read_table(&self.config.routes_path(), RouteRecord::into_route),
            trips: read_table(&self.config.trips_path(), TripRecord::into_trip),
            stop_times: read_table(&self.config.stop_times_path(), StopTimeRecord::into_stop_time),
        };

        if feed.is_empty() {
            warn!(dir = %dir.display(), "Feed directory holds no readable records");
        }
        info!(
            dir = %dir.display(),
            stops = feed.stops.len(),
            routes = feed.routes.len(),
            trips = feed.trips.len(),
            stop_times = feed.stop_times.len(),
            "Loaded GTFS feed"
        );
        Ok(feed)
    }
}

fn read_table<R, T>(path: &Path, convert: fn(R) -> Result<T>) -> Vec<T>
where
    R: DeserializeOwned,
{
    let mut reader = match csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_path(path)
    {
        Ok(reader) => reader,
        Err(source) => {
            warn!("{}", TransitError::Csv { path: path.to_path_buf(), source });
            return Vec::new();
        }
    };

    if let Err(source) = reader.headers() {
        warn!("{}", TransitError::Csv { path: path.to_path_buf(), source });
        return Vec::new();
    }

    let mut rows = Vec::new();
    for (index, record) in reader.deserialize::<R>().enumerate() {
        // Line 1 is the header
        let line = index + 2;
        match record {
            Ok(record) => match convert(record) {
                Ok(row) => rows.push(row),
                Err(err) => warn!(file = %path.display(), line, "Skipping row: {err}"),
            },
            Err(source) if source.is_io_error() => {
                warn!("{}", TransitError::Csv { path: path.to_path_buf(), source });
                break;
            }
            Err(source) => warn!(file = %path.display(), line, "Skipping row: {source}"),
        }
    }

    debug!(file = %path.display(), rows = rows.len(), "Read feed file");
    rows
}

fn required(field: &str, value: String) -> Result<String> {
    if value.is_empty() {
        Err(TransitError::InvalidData(format!("empty {field}")))
    } else {
        Ok(value)
    }
}

// ============================================================================
// File Records
// ============================================================================

#[derive(Deserialize)]
struct StopRecord {
    stop_id: String,
    stop_name: String,
    #[serde(default)]
    stop_lat: String,
    #[serde(default)]
    stop_lon: String,
}

impl StopRecord {
    fn into_stop(self) -> Result<Stop> {
        Ok(Stop::new(
            required("stop_id", self.stop_id)?,
            self.stop_name,
            self.stop_lat,
            self.stop_lon,
        ))
    }
}

#[derive(Deserialize)]
struct RouteRecord {
    route_id: String,
    #[serde(default)]
    route_short_name: String,
    #[serde(default)]
    route_long_name: String,
    #[serde(default)]
    route_desc: String,
}

impl RouteRecord {
    fn into_route(self) -> Result<Route> {
        Ok(
            Route::new(
                required("route_id", self.route_id)?,
                self.route_short_name,
                self.route_long_name,
            )
            .with_description(self.route_desc),
        )
    }
}

#[derive(Deserialize)]
struct TripRecord {
    trip_id: String,
    route_id: String,
    #[serde(default)]
    direction_id: String,
    #[serde(default)]
    trip_headsign: String,
}

impl TripRecord {
    fn into_trip(self) -> Result<Trip> {
        Ok(Trip::new(
            required("trip_id", self.trip_id)?,
            required("route_id", self.route_id)?,
            self.direction_id,
            self.trip_headsign,
        ))
    }
}

#[derive(Deserialize)]
struct StopTimeRecord {
    trip_id: String,
    stop_id: String,
    stop_sequence: String,
    #[serde(default)]
    arrival_time: String,
    #[serde(default)]
    departure_time: String,
}

impl StopTimeRecord {
    fn into_stop_time(self) -> Result<StopTime> {
        Ok(StopTime::new(
            required("trip_id", self.trip_id)?,
            required("stop_id", self.stop_id)?,
            self.stop_sequence,
        )
        .with_times(self.arrival_time, self.departure_time))
    }
}
