//! Pluggable feed loading.
//!
//! External crates implement [`FeedSource`] to hand over already-parsed
//! records from wherever the feed lives (a directory, an app bundle, a
//! download cache).

use crate::models::types::*;

/// The four entity sequences of a static feed, in file order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawFeed {
    pub stops: Vec<Stop>,
    pub routes: Vec<Route>,
    pub trips: Vec<Trip>,
    pub stop_times: Vec<StopTime>,
}

impl RawFeed {
    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
            && self.routes.is_empty()
            && self.trips.is_empty()
            && self.stop_times.is_empty()
    }
}

/// Produce a complete feed.
///
/// Loading is the only blocking step in the crate; callers that must stay
/// responsive run it on a background thread (see
/// [`ProviderHandle::spawn_load`](crate::provider::ProviderHandle::spawn_load)).
/// An error means "nothing usable was loaded"; a source that could read some
/// files but not others returns the partial feed with the missing sequences
/// left empty.
pub trait FeedSource: Send + Sync {
    fn load(&self) -> Result<RawFeed>;
}

impl FeedSource for RawFeed {
    fn load(&self) -> Result<RawFeed> {
        Ok(self.clone())
    }
}
