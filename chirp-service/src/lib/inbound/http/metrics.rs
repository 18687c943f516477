use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;

/// Request hit counter owned by the router state.
///
/// Shared across workers behind an `Arc`; relaxed ordering is enough for
/// a display-only counter.
#[derive(Debug, Default)]
pub struct HitCounter {
    hits: AtomicU64,
}

impl HitCounter {
    pub fn new() -> Self {
        Self {
            hits: AtomicU64::new(0),
        }
    }

    pub fn record(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn value(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn reset(&self) {
        self.hits.store(0, Ordering::Relaxed);
    }
}
