//! Where feed records come from.

pub mod config;
#[cfg(feature = "loader")]
pub mod csv_source;
pub mod traits;

pub use config::FeedConfig;
#[cfg(feature = "loader")]
pub use csv_source::CsvFeedSource;
pub use traits::{FeedSource, RawFeed};
