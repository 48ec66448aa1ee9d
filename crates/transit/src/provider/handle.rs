//! Shared access to the current provider snapshot.
//!
//! The handle starts out not ready. A load builds a complete provider
//! without holding any lock and then swaps it in; readers either see the
//! previous snapshot or the new one, never a partly built index. A snapshot
//! a reader already holds stays valid until the reader drops it.
//!
//! Every load draws a generation number when it starts. When loads overlap,
//! the one that started last wins: an older load finishing afterwards is
//! discarded with [`TransitError::Superseded`].

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use std::thread::JoinHandle;

use geo::Point;
use tracing::{debug, info, warn};

use crate::alias::AliasMap;
use crate::feed::FeedSource;
use crate::identifiers::DirectionId;
use crate::models::{traits::*, types::*};
use crate::provider::static_provider::StaticTransitProvider;

#[derive(Debug, Default)]
struct Published {
    generation: u64,
    provider: Option<Arc<StaticTransitProvider>>,
}

#[derive(Clone, Debug, Default)]
pub struct ProviderHandle {
    current: Arc<RwLock<Published>>,
    generations: Arc<AtomicU64>,
}

impl ProviderHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// The current provider, or `None` while nothing has been published.
    pub fn snapshot(&self) -> Option<Arc<StaticTransitProvider>> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .provider
            .clone()
    }

    pub fn is_ready(&self) -> bool {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .provider
            .is_some()
    }

    /// Replace the current snapshot, returning the previous one.
    ///
    /// An explicit publish always takes effect and supersedes any load
    /// still running.
    pub fn publish(&self, provider: StaticTransitProvider) -> Option<Arc<StaticTransitProvider>> {
        let generation = self.next_generation();
        let mut published = self.current.write().unwrap_or_else(PoisonError::into_inner);
        published.generation = published.generation.max(generation);
        published.provider.replace(Arc::new(provider))
    }

    /// Load a feed, build a provider from it and publish it.
    ///
    /// On failure the previous snapshot (if any) stays in place.
    pub fn load(&self, source: &dyn FeedSource, aliases: AliasMap) -> Result<Arc<StaticTransitProvider>> {
        self.load_generation(self.next_generation(), source, aliases)
    }

    /// Run [`load`](Self::load) on a background thread.
    ///
    /// The generation is drawn before the thread starts, so of two calls the
    /// later one wins regardless of which thread finishes first.
    pub fn spawn_load<S>(&self, source: S, aliases: AliasMap) -> JoinHandle<Result<Arc<StaticTransitProvider>>>
    where
        S: FeedSource + 'static,
    {
        let generation = self.next_generation();
        let handle = self.clone();
        std::thread::spawn(move || handle.load_generation(generation, &source, aliases))
    }

    /// Departure filter against the current snapshot; empty while not ready.
    pub fn connection_filter(&self, origin: &str, destination: &str) -> ConnectionFilter {
        self.snapshot()
            .map(|p| p.connection_filter(origin, destination))
            .unwrap_or_default()
    }

    fn next_generation(&self) -> u64 {
        self.generations.fetch_add(1, Ordering::Relaxed) + 1
    }

    fn load_generation(
        &self,
        generation: u64,
        source: &dyn FeedSource,
        aliases: AliasMap,
    ) -> Result<Arc<StaticTransitProvider>> {
        let feed = source.load().inspect_err(|err| {
            warn!(generation, "Feed load failed, keeping current snapshot: {err}");
        })?;
        let provider = Arc::new(StaticTransitProvider::from_feed(feed, aliases));

        let mut published = self.current.write().unwrap_or_else(PoisonError::into_inner);
        if generation < published.generation {
            debug!(generation, current = published.generation, "Discarding superseded load");
            return Err(TransitError::Superseded(generation));
        }
        published.generation = generation;
        let replaced = published.provider.replace(provider.clone()).is_some();
        drop(published);

        info!(generation, stops = provider.store().stops().len(), replaced, "Published transit snapshot");
        Ok(provider)
    }
}

/// Queries against whatever snapshot is current. Before the first publish
/// every query is empty.
impl TransitQueries for ProviderHandle {
    fn stops_near(&self, point: Point, radius_m: f64) -> Vec<NearbyStop> {
        self.snapshot()
            .map(|p| p.stops_near(point, radius_m))
            .unwrap_or_default()
    }

    fn trips_through_station(&self, name: &str) -> Vec<StationTrip> {
        self.snapshot()
            .map(|p| p.trips_through_station(name))
            .unwrap_or_default()
    }

    fn connecting_trips(&self, origin: &str, destination: &str) -> Vec<ConnectingTrip> {
        self.snapshot()
            .map(|p| p.connecting_trips(origin, destination))
            .unwrap_or_default()
    }

    fn connecting_routes(
        &self,
        origin: &str,
        destination: &str,
        direction: &DirectionId,
    ) -> Vec<ConnectingRoute> {
        self.snapshot()
            .map(|p| p.connecting_routes(origin, destination, direction))
            .unwrap_or_default()
    }

    fn stops_after(&self, trip_id: &str, after_stop_id: &str) -> Vec<Arc<str>> {
        self.snapshot()
            .map(|p| p.stops_after(trip_id, after_stop_id))
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::RawFeed;
    use std::sync::{mpsc, Mutex};

    struct FailingSource;

    impl FeedSource for FailingSource {
        fn load(&self) -> Result<RawFeed> {
            Err(TransitError::FeedUnavailable("offline".to_string()))
        }
    }

    fn feed(headsign: &str) -> RawFeed {
        RawFeed {
            stops: vec![
                Stop::new("A", "Alpha", "37.0", "-122.0"),
                Stop::new("B", "Bravo", "37.1", "-122.0"),
            ],
            routes: vec![Route::new("R", "R", "Alpha to Bravo")],
            trips: vec![Trip::new("T", "R", "0", headsign)],
            stop_times: vec![StopTime::new("T", "A", "1"), StopTime::new("T", "B", "2")],
        }
    }

    #[test]
    fn test_not_ready_until_published() {
        let handle = ProviderHandle::new();

        assert!(!handle.is_ready());
        assert!(handle.snapshot().is_none());
        assert!(handle.trips_through_station("Alpha").is_empty());

        handle.load(&feed("Bravo"), AliasMap::default()).unwrap();

        assert!(handle.is_ready());
        assert_eq!(handle.connecting_trips("Alpha", "Bravo").len(), 1);
    }

    #[test]
    fn test_failed_load_keeps_previous_snapshot() {
        let handle = ProviderHandle::new();
        handle.load(&feed("Bravo"), AliasMap::default()).unwrap();

        assert!(handle.load(&FailingSource, AliasMap::default()).is_err());

        assert!(handle.is_ready());
        assert_eq!(&*handle.connecting_trips("Alpha", "Bravo")[0].headsign, "Bravo");
    }

    #[test]
    fn test_held_snapshot_survives_publish() {
        let handle = ProviderHandle::new();
        handle.load(&feed("Old"), AliasMap::default()).unwrap();
        let held = handle.snapshot().unwrap();

        handle.load(&feed("New"), AliasMap::default()).unwrap();

        assert_eq!(&*held.trips_through_station("Alpha")[0].headsign, "Old");
        assert_eq!(&*handle.trips_through_station("Alpha")[0].headsign, "New");
    }

    /// Hands out its feed only once the test releases it.
    struct GatedSource {
        feed: RawFeed,
        gate: Mutex<mpsc::Receiver<()>>,
    }

    impl FeedSource for GatedSource {
        fn load(&self) -> Result<RawFeed> {
            let _ = self.gate.lock().unwrap().recv();
            Ok(self.feed.clone())
        }
    }

    #[test]
    fn test_older_load_finishing_last_is_discarded() {
        let handle = ProviderHandle::new();
        let (release, gate) = mpsc::channel();
        let slow = handle.spawn_load(
            GatedSource {
                feed: feed("Old"),
                gate: Mutex::new(gate),
            },
            AliasMap::default(),
        );

        handle.load(&feed("New"), AliasMap::default()).unwrap();
        release.send(()).unwrap();

        assert!(matches!(slow.join().unwrap(), Err(TransitError::Superseded(_))));
        assert_eq!(&*handle.trips_through_station("Alpha")[0].headsign, "New");
    }

    #[test]
    fn test_publish_supersedes_running_load() {
        let handle = ProviderHandle::new();
        let (release, gate) = mpsc::channel();
        let slow = handle.spawn_load(
            GatedSource {
                feed: feed("Loaded"),
                gate: Mutex::new(gate),
            },
            AliasMap::default(),
        );

        let previous = handle.publish(StaticTransitProvider::from_feed(feed("Published"), AliasMap::default()));
        assert!(previous.is_none());
        release.send(()).unwrap();

        assert!(slow.join().unwrap().is_err());
        assert_eq!(&*handle.trips_through_station("Alpha")[0].headsign, "Published");
    }

    #[test]
    fn test_connection_filter_before_ready_is_empty() {
        let handle = ProviderHandle::new();
        assert!(handle.connection_filter("Alpha", "Bravo").is_empty());
    }

    #[test]
    fn test_spawn_load() {
        let handle = ProviderHandle::new();
        let provider = handle
            .spawn_load(feed("Bravo"), AliasMap::default())
            .join()
            .unwrap()
            .unwrap();

        assert_eq!(provider.store().stops().len(), 2);
        assert!(handle.is_ready());
    }
}
