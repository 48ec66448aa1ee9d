//! Feed records, query results, and the query trait.

pub mod parse;
pub mod traits;
pub mod types;

// Re-exports for convenience
pub use parse::{parse_latitude, parse_longitude, parse_sequence};
pub use traits::TransitQueries;
pub use types::*;
