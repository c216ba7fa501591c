use std::sync::Arc;
use std::time::Duration;
use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::sync::{oneshot, Semaphore, TryAcquireError};
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, trace};

use crate::analytics::stats::Stats;
use crate::config::TimeUnit;
use crate::error::{Result, SubmitError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    Active,
    ShutDown,
}

/// Fixed-window rate gate: at most `capacity` permits per `window`.
///
/// A single background task resets the permit count to full once per window.
/// Permits are never handed back by callers, so up to `2 * capacity`
/// admissions can land close together around a window boundary.
///
/// No ordering among waiters is promised. Clones share the same gate; the
/// replenishment task stops on [`RateGate::shutdown`] or when the last clone
/// is dropped.
#[derive(Debug, Clone)]
pub struct RateGate {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    semaphore: Arc<Semaphore>,
    capacity: u32,
    window: Duration,
    stats: Arc<Stats>,
    stop_tx: Mutex<Option<oneshot::Sender<()>>>,
}

impl RateGate {
    /// Must be called from within a Tokio runtime.
    pub fn new(capacity: u32, window: Duration) -> Result<Self> {
        if capacity == 0 {
            return Err(SubmitError::InvalidConfiguration(
                "Request limit per window must be greater than 0".into(),
            ));
        }
        if window.is_zero() {
            return Err(SubmitError::InvalidConfiguration(
                "Window duration must be greater than 0".into(),
            ));
        }

        let handle = Handle::try_current()
            .map_err(|e| SubmitError::Init(format!("RateGate requires a Tokio runtime: {}", e)))?;

        // Two windows ahead must stay representable for the interval to advance.
        let now = Instant::now();
        let first_tick = window
            .checked_mul(2)
            .and_then(|span| now.checked_add(span))
            .map(|_| now + window)
            .ok_or_else(|| {
                SubmitError::InvalidConfiguration(format!("Window duration {:?} is too long", window))
            })?;

        let semaphore = Arc::new(Semaphore::new(capacity as usize));
        let stats = Arc::new(Stats::new());
        let (stop_tx, stop_rx) = oneshot::channel();

        handle.spawn(replenish_loop(
            semaphore.clone(),
            stats.clone(),
            capacity,
            window,
            first_tick,
            stop_rx,
        ));

        debug!(capacity, ?window, "Rate gate started");

        Ok(Self {
            inner: Arc::new(Inner {
                semaphore,
                capacity,
                window,
                stats,
                stop_tx: Mutex::new(Some(stop_tx)),
            }),
        })
    }

    /// `limit` permits per one `unit` of time.
    pub fn per_unit(unit: TimeUnit, limit: u32) -> Result<Self> {
        Self::new(limit, unit.as_duration())
    }

    /// Take one permit, waiting for the next window if none is left.
    ///
    /// Dropping the returned future before it completes consumes nothing.
    pub async fn acquire(&self) -> Result<()> {
        let permit = self
            .inner
            .semaphore
            .acquire()
            .await
            .map_err(|_| SubmitError::GateClosed)?;
        // Permits come back only through the window reset.
        permit.forget();
        self.inner.stats.inc_admitted();
        Ok(())
    }

    /// Take one permit if one is available right now.
    pub fn try_acquire(&self) -> Result<bool> {
        match self.inner.semaphore.try_acquire() {
            Ok(permit) => {
                permit.forget();
                self.inner.stats.inc_admitted();
                Ok(true)
            }
            Err(TryAcquireError::NoPermits) => Ok(false),
            Err(TryAcquireError::Closed) => Err(SubmitError::GateClosed),
        }
    }

    pub fn available_permits(&self) -> u32 {
        self.inner.semaphore.available_permits() as u32
    }

    pub fn capacity(&self) -> u32 {
        self.inner.capacity
    }

    pub fn window(&self) -> Duration {
        self.inner.window
    }

    pub fn state(&self) -> GateState {
        if self.inner.semaphore.is_closed() {
            GateState::ShutDown
        } else {
            GateState::Active
        }
    }

    pub fn stats(&self) -> Arc<Stats> {
        self.inner.stats.clone()
    }

    /// Stop replenishing and close the gate. Pending and later `acquire`
    /// calls fail with [`SubmitError::GateClosed`]. Calling it again is a no-op.
    pub fn shutdown(&self) {
        self.inner.shutdown();
    }
}

impl Inner {
    fn shutdown(&self) {
        if let Some(stop_tx) = self.stop_tx.lock().take() {
            let _ = stop_tx.send(());
            self.semaphore.close();
            debug!(capacity = self.capacity, "Rate gate shut down");
            self.stats.log_stats();
        }
    }
}

impl Drop for Inner {
    fn drop(&mut self) {
        self.shutdown();
    }
}

async fn replenish_loop(
    semaphore: Arc<Semaphore>,
    stats: Arc<Stats>,
    capacity: u32,
    window: Duration,
    first_tick: Instant,
    mut stop_rx: oneshot::Receiver<()>,
) {
    let mut interval = tokio::time::interval_at(first_tick, window);
    // A late tick would only reset to full again, so missed ones are dropped.
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = &mut stop_rx => break,
            _ = interval.tick() => {
                let restored = refill(&semaphore, capacity);
                stats.record_replenish(restored);
                trace!(restored, capacity, "Rate window reset");
            }
        }
    }

    debug!("Rate gate replenishment stopped");
}

/// Top the semaphore back up to `capacity`.
///
/// Only acquirers run concurrently with this and they only take permits, so
/// the count can shrink between the read and the add but never overshoot.
fn refill(semaphore: &Semaphore, capacity: u32) -> usize {
    let missing = (capacity as usize).saturating_sub(semaphore.available_permits());
    if missing > 0 {
        semaphore.add_permits(missing);
    }
    missing
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_capacity_rejected_without_runtime() {
        // Validation runs before the runtime lookup, so nothing gets spawned.
        let result = RateGate::new(0, Duration::from_secs(1));
        assert!(matches!(result, Err(SubmitError::InvalidConfiguration(_))));
    }

    #[test]
    fn test_zero_window_rejected() {
        let result = RateGate::new(5, Duration::ZERO);
        assert!(matches!(result, Err(SubmitError::InvalidConfiguration(_))));
    }

    #[tokio::test]
    async fn test_oversized_window_rejected() {
        let result = RateGate::new(1, Duration::MAX);
        assert!(matches!(result, Err(SubmitError::InvalidConfiguration(_))));

        let result = RateGate::new(1, Duration::from_secs(u64::MAX / 2));
        assert!(matches!(result, Err(SubmitError::InvalidConfiguration(_))));

        assert!(RateGate::per_unit(TimeUnit::Day, 1).is_ok());
    }

    #[test]
    fn test_requires_runtime() {
        let result = RateGate::new(5, Duration::from_secs(1));
        assert!(matches!(result, Err(SubmitError::Init(_))));
    }

    #[test]
    fn test_refill_tops_up_to_capacity() {
        let semaphore = Semaphore::new(1);
        assert_eq!(refill(&semaphore, 4), 3);
        assert_eq!(semaphore.available_permits(), 4);

        assert_eq!(refill(&semaphore, 4), 0);
        assert_eq!(semaphore.available_permits(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_try_acquire_exhausts() {
        let gate = RateGate::new(2, Duration::from_secs(1)).unwrap();

        assert!(gate.try_acquire().unwrap());
        assert!(gate.try_acquire().unwrap());
        assert!(!gate.try_acquire().unwrap());
        assert_eq!(gate.available_permits(), 0);
        assert_eq!(gate.stats().admitted(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_is_to_full_not_additive() {
        let gate = RateGate::new(3, Duration::from_secs(1)).unwrap();
        gate.acquire().await.unwrap();

        tokio::time::sleep(Duration::from_millis(3500)).await;

        assert_eq!(gate.available_permits(), 3);
        let stats = gate.stats();
        assert_eq!(stats.replenish_count(), 3);
        assert_eq!(stats.permits_restored.load(std::sync::atomic::Ordering::Relaxed), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_is_idempotent() {
        let gate = RateGate::per_unit(TimeUnit::Second, 1).unwrap();
        assert_eq!(gate.state(), GateState::Active);

        gate.shutdown();
        gate.shutdown();

        assert_eq!(gate.state(), GateState::ShutDown);
        assert!(matches!(gate.try_acquire(), Err(SubmitError::GateClosed)));
    }
}
