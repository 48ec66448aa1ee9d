//! Feed location configuration.

use std::path::{Path, PathBuf};

/// Where a GTFS directory lives and what its files are called.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FeedConfig {
    pub dir: PathBuf,
    pub stops_file: String,
    pub routes_file: String,
    pub trips_file: String,
    pub stop_times_file: String,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
            stops_file: "stops.txt".to_string(),
            routes_file: "routes.txt".to_string(),
            trips_file: "trips.txt".to_string(),
            stop_times_file: "stop_times.txt".to_string(),
        }
    }
}

impl FeedConfig {
    /// Standard file names inside `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            ..Self::default()
        }
    }

    pub fn with_stops_file(mut self, name: impl Into<String>) -> Self {
        self.stops_file = name.into();
        self
    }

    pub fn with_routes_file(mut self, name: impl Into<String>) -> Self {
        self.routes_file = name.into();
        self
    }

    pub fn with_trips_file(mut self, name: impl Into<String>) -> Self {
        self.trips_file = name.into();
        self
    }

    pub fn with_stop_times_file(mut self, name: impl Into<String>) -> Self {
        self.stop_times_file = name.into();
        self
    }

    pub fn stops_path(&self) -> PathBuf {
        self.dir.join(&self.stops_file)
    }

    pub fn routes_path(&self) -> PathBuf {
        self.dir.join(&self.routes_file)
    }

    pub fn trips_path(&self) -> PathBuf {
        self.dir.join(&self.trips_file)
    }

    pub fn stop_times_path(&self) -> PathBuf {
        self.dir.join(&self.stop_times_file)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}
