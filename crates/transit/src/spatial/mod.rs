//! Spatial indexing and distance utilities.

pub mod index;
pub mod queries;

pub use index::StopNode;
pub use queries::{haversine_distance, search_envelope, EARTH_RADIUS_M};
