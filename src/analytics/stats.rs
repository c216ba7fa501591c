use std::sync::atomic::{AtomicU64, Ordering};
use tracing::info;

/// Counters shared by a gate and every client built on it.
#[derive(Debug, Default)]
pub struct Stats {
    pub permits_admitted: AtomicU64,
    pub replenishments: AtomicU64,
    pub permits_restored: AtomicU64,
    pub submissions_ok: AtomicU64,
    pub submissions_failed: AtomicU64,
}

impl Stats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn inc_admitted(&self) {
        self.permits_admitted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_replenish(&self, restored: usize) {
        self.replenishments.fetch_add(1, Ordering::Relaxed);
        self.permits_restored.fetch_add(restored as u64, Ordering::Relaxed);
    }

    pub fn inc_submissions_ok(&self) {
        self.submissions_ok.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_submissions_failed(&self) {
        self.submissions_failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn admitted(&self) -> u64 {
        self.permits_admitted.load(Ordering::Relaxed)
    }

    pub fn replenish_count(&self) -> u64 {
        self.replenishments.load(Ordering::Relaxed)
    }

    pub fn log_stats(&self) {
        let admitted = self.permits_admitted.load(Ordering::Relaxed);
        let ticks = self.replenishments.load(Ordering::Relaxed);
        let restored = self.permits_restored.load(Ordering::Relaxed);
        let ok = self.submissions_ok.load(Ordering::Relaxed);
        let failed = self.submissions_failed.load(Ordering::Relaxed);

        info!(
            "STATS: Permits: {} admitted, {} restored over {} windows | Submissions: {} OK, {} Failed",
            admitted, restored, ticks, ok, failed
        );
    }
}
