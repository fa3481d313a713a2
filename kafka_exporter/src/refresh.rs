use crate::aggregator::Aggregator;
use crate::snapshot::SnapshotStore;
use crate::upstream::Upstream;
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::select;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(120);

/// Single-flight flag. Only one `RefreshPermit` exists at a time.
#[derive(Debug, Default)]
pub struct RefreshGuard {
    in_progress: AtomicBool,
}

impl RefreshGuard {
    pub fn try_acquire(&self) -> Option<RefreshPermit<'_>> {
        self.in_progress
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| RefreshPermit { guard: self })
    }

    pub fn is_held(&self) -> bool {
        self.in_progress.load(Ordering::Acquire)
    }
}

/// Clears the guard when dropped.
#[derive(Debug)]
pub struct RefreshPermit<'a> {
    guard: &'a RefreshGuard,
}

impl Drop for RefreshPermit<'_> {
    fn drop(&mut self) {
        self.guard.in_progress.store(false, Ordering::Release);
    }
}

pub struct Refresher<U> {
    aggregator: Aggregator<U>,
    store: Arc<SnapshotStore>,
    guard: RefreshGuard,
}

impl<U: Upstream> Refresher<U> {
    pub fn new(upstream: U, store: Arc<SnapshotStore>) -> Self {
        Self {
            aggregator: Aggregator::new(upstream),
            store,
            guard: RefreshGuard::default(),
        }
    }

    /// Runs one refresh cycle and publishes its result. Returns the published
    /// snapshot version, or `None` when another cycle was already running.
    pub async fn trigger(&self) -> Option<u64> {
        let Some(_permit) = self.guard.try_acquire() else {
            debug!("Refresh already in progress, dropping trigger");
            return None;
        };

        let exposition = self.aggregator.collect().await;
        Some(self.store.publish(exposition).await)
    }

    pub fn is_refreshing(&self) -> bool {
        self.guard.is_held()
    }
}

/// Time left until the next multiple of `interval` since the Unix epoch.
pub fn delay_until_next_tick(now: DateTime<Utc>, interval: Duration) -> Duration {
    let interval_ms = (interval.as_millis() as i64).max(1);
    let now_ms = now.timestamp_millis();
    let next_tick_ms = (now_ms.div_euclid(interval_ms) + 1) * interval_ms;

    Duration::from_millis((next_tick_ms - now_ms) as u64)
}

/// Ticker whose first tick fires after `first_delay` and then every
/// `interval`, skipping ticks that were missed.
pub fn refresh_ticker(first_delay: Duration, interval: Duration) -> Interval {
    let interval = interval.max(Duration::from_millis(1));
    let mut ticker = interval_at(Instant::now() + first_delay, interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    ticker
}

/// Triggers a refresh immediately and then on every wall-clock multiple of
/// `interval` until `cancellation_token` is cancelled. Each trigger runs on its
/// own task so that an overrunning cycle makes later ticks no-ops instead of
/// delaying them.
pub fn start_refresh_schedule<U>(
    refresher: Arc<Refresher<U>>,
    interval: Duration,
    cancellation_token: CancellationToken,
) -> JoinHandle<()>
where
    U: Upstream + 'static,
{
    tokio::task::spawn(async move {
        spawn_trigger(&refresher);

        let first_delay = delay_until_next_tick(Utc::now(), interval);
        debug!("First scheduled refresh in {first_delay:?}, then every {interval:?}");
        let mut ticker = refresh_ticker(first_delay, interval);

        loop {
            select! {
                _ = ticker.tick() => spawn_trigger(&refresher),
                _ = cancellation_token.cancelled() => {
                    info!("Refresh schedule was cancelled");
                    break
                }
            }
        }
    })
}

fn spawn_trigger<U: Upstream + 'static>(refresher: &Arc<Refresher<U>>) {
    let refresher = refresher.clone();
    tokio::task::spawn(async move {
        refresher.trigger().await;
    });
}
