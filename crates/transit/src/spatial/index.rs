//! R-tree nodes for nearby-stop search.
//!
//! ## Two-Stage Filtering
//!
//! 1. **R-tree filter**: a degree-space envelope that is guaranteed to
//!    contain every point within the radius (see
//!    [`search_envelope`](super::queries::search_envelope))
//! 2. **Haversine filter**: exact great-circle distance on the candidates
//!
//! Each node remembers its stop's position in the record store so that the
//! name deduplication can favor the earliest-listed stop.

use std::sync::Arc;

use geo::Point;
use rstar::{RTreeObject, AABB};

use crate::models::types::Stop;

#[derive(Clone, Debug)]
pub struct StopNode {
    pub stop: Arc<Stop>,
    /// Position of the stop in the record store
    pub order: usize,
    point: [f64; 2],
}

impl StopNode {
    pub fn new(order: usize, stop: Arc<Stop>) -> Self {
        let location = stop.location();
        Self {
            stop,
            order,
            point: [location.x(), location.y()],
        }
    }

    /// Parsed location, `(0, 0)` for unparseable coordinates.
    pub fn location(&self) -> Point {
        Point::new(self.point[0], self.point[1])
    }
}

impl RTreeObject for StopNode {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}
