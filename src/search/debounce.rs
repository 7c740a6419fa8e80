//! Debounced, cancel-on-supersede zone lookups.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use super::{Geocoder, LookupResult, ZoneLookup};

/// Results published by [`DebouncedLookup`], tagged with the issuing query's
/// sequence number.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Published {
    pub sequence: u64,
    pub result: LookupResult,
}

/// Runs lookups after a quiet period and publishes only the newest query's
/// result.
///
/// Each `submit` aborts the previous in-flight task. A task that finishes
/// anyway publishes only if no newer query was issued since.
pub struct DebouncedLookup<G> {
    lookup: Arc<ZoneLookup<G>>,
    delay: Duration,
    issued: Arc<AtomicU64>,
    in_flight: Option<JoinHandle<()>>,
    results: watch::Sender<Published>,
}

impl<G: Geocoder + 'static> DebouncedLookup<G> {
    pub fn new(lookup: ZoneLookup<G>, delay: Duration) -> Self {
        Self {
            lookup: Arc::new(lookup),
            delay,
            issued: Arc::new(AtomicU64::new(0)),
            in_flight: None,
            results: watch::channel(Published::default()).0,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<Published> {
        self.results.subscribe()
    }

    /// Schedule a lookup for `query`, superseding any pending one.
    pub fn submit(&mut self, query: impl Into<String>) -> u64 {
        let query = query.into();
        let sequence = self.issued.fetch_add(1, Ordering::SeqCst) + 1;

        if let Some(previous) = self.in_flight.take() {
            previous.abort();
        }

        let lookup = Arc::clone(&self.lookup);
        let issued = Arc::clone(&self.issued);
        let results = self.results.clone();
        let delay = self.delay;

        self.in_flight = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if issued.load(Ordering::SeqCst) != sequence {
                return;
            }

            let result = lookup.lookup(&query).await;
            results.send_if_modified(|current| {
                if issued.load(Ordering::SeqCst) != sequence || current.sequence >= sequence {
                    tracing::trace!("Dropping stale lookup for {:?}", query);
                    return false;
                }
                *current = Published { sequence, result };
                true
            });
        }));

        sequence
    }

    /// Abort any pending lookup without publishing.
    pub fn cancel(&mut self) {
        if let Some(previous) = self.in_flight.take() {
            previous.abort();
        }
        self.issued.fetch_add(1, Ordering::SeqCst);
    }
}

impl<G> Drop for DebouncedLookup<G> {
    fn drop(&mut self) {
        if let Some(task) = self.in_flight.take() {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AppError;
    use crate::search::{LookupTier, OfflineGeocoder, DEFAULT_LIMIT};
    use async_trait::async_trait;
    use std::sync::atomic::AtomicUsize;

    /// Slow for one place name, instant for everything else.
    struct SlowGeocoder {
        slow_place: &'static str,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl Geocoder for SlowGeocoder {
        async fn time_zone_for(&self, place: &str) -> Result<Option<String>, AppError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if place == self.slow_place {
                tokio::time::sleep(Duration::from_secs(5)).await;
                return Ok(Some("Pacific/Auckland".to_string()));
            }
            Ok(Some("Asia/Kolkata".to_string()))
        }
    }

    fn offline() -> DebouncedLookup<OfflineGeocoder> {
        DebouncedLookup::new(
            ZoneLookup::new(OfflineGeocoder, DEFAULT_LIMIT),
            Duration::from_millis(300),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_rapid_queries_collapse_to_last() {
        let mut debounced = offline();
        let mut rx = debounced.subscribe();

        debounced.submit("to");
        debounced.submit("tok");
        let last = debounced.submit("tokyo");

        rx.changed().await.unwrap();
        let published = rx.borrow_and_update().clone();
        assert_eq!(published.sequence, last);
        assert_eq!(published.result.query, "tokyo");
        assert_eq!(published.result.zones, vec!["Asia/Tokyo"]);
        assert_eq!(published.result.tier, Some(LookupTier::Catalog));
    }

    #[tokio::test(start_paused = true)]
    async fn test_nothing_published_before_quiet_period() {
        let mut debounced = offline();
        let rx = debounced.subscribe();

        debounced.submit("berlin");
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(!rx.has_changed().unwrap());

        tokio::time::sleep(Duration::from_millis(300)).await;
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow().result.zones, vec!["Europe/Berlin"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_superseded_lookup_never_overwrites() {
        let calls = Arc::new(AtomicUsize::new(0));
        let geocoder = SlowGeocoder {
            slow_place: "wellington town",
            calls: Arc::clone(&calls),
        };
        let mut debounced = DebouncedLookup::new(
            ZoneLookup::new(geocoder, DEFAULT_LIMIT),
            Duration::from_millis(300),
        );
        let mut rx = debounced.subscribe();

        debounced.submit("wellington town");
        // Let the first lookup reach the slow geocoder.
        tokio::time::sleep(Duration::from_millis(400)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        let last = debounced.submit("bangalore city");
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().sequence, last);

        tokio::time::sleep(Duration::from_secs(10)).await;
        let published = rx.borrow().clone();
        assert_eq!(published.sequence, last);
        assert_eq!(published.result.zones, vec!["Asia/Kolkata"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_suppresses_pending() {
        let mut debounced = offline();
        let rx = debounced.subscribe();

        debounced.submit("berlin");
        debounced.cancel();
        tokio::time::sleep(Duration::from_secs(1)).await;

        assert!(!rx.has_changed().unwrap());
        assert_eq!(rx.borrow().sequence, 0);
    }
}
