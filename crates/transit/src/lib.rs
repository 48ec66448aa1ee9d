//! # trainbus-transit
//!
//! In-memory GTFS index with station, spatial and connection queries.
//!
//! ## Features
//!
//! - **Immutable indices**: Built once from a loaded feed, then shared freely
//! - **Spatial queries**: R-tree backed radius search over stops
//! - **Connection queries**: Direct trips and routes between two stations
//! - **Atomic reloads**: Publish a new snapshot without blocking readers
//! - **CSV loader**: Read a GTFS directory (`loader` feature, on by default)
//!
//! ## Example
//!
//! ```
//! use trainbus_transit::prelude::*;
//! use geo::Point;
//!
//! let feed = RawFeed {
//!     stops: vec![
//!         Stop::new("EMBR", "Embarcadero", "37.792874", "-122.397020"),
//!         Stop::new("MONT", "Montgomery Street", "37.789405", "-122.401066"),
//!     ],
//!     routes: vec![Route::new("Y", "Yellow-S", "Antioch to SFIA/Millbrae")],
//!     trips: vec![Trip::new("Y100", "Y", "1", "SFIA / Millbrae")],
//!     stop_times: vec![
//!         StopTime::new("Y100", "EMBR", "1"),
//!         StopTime::new("Y100", "MONT", "2"),
//!     ],
//! };
//!
//! let provider = StaticTransitProvider::from_feed(feed, AliasMap::bart());
//!
//! // Stops within 1km of Market & 2nd
//! let nearby = provider.stops_near(Point::new(-122.3990, 37.7895), 1_000.0);
//! assert_eq!(nearby.len(), 2);
//!
//! // Only one direction of travel connects them
//! assert_eq!(provider.connecting_trips("Embarcadero", "Montgomery Street").len(), 1);
//! assert!(provider.connecting_trips("Montgomery Street", "Embarcadero").is_empty());
//! ```

pub mod alias;
pub mod feed;
pub mod identifiers;
pub mod index;
pub mod models;
pub mod provider;
pub mod spatial;
pub mod store;

// Re-exports for convenience
pub mod prelude {
    pub use crate::alias::AliasMap;
    pub use crate::feed::{FeedConfig, FeedSource, RawFeed};
    #[cfg(feature = "loader")]
    pub use crate::feed::CsvFeedSource;
    pub use crate::identifiers::*;
    pub use crate::models::{traits::*, types::*};
    pub use crate::provider::{ProviderHandle, StaticTransitProvider};
}

pub use prelude::*;
