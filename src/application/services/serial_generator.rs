use std::sync::atomic::{AtomicI64, Ordering};

/// Hands out the human-facing catalog serial. Seeded from the highest serial
/// already persisted so restarts keep the sequence monotonic.
#[derive(Debug)]
pub struct SerialGenerator {
    counter: AtomicI64,
}

impl SerialGenerator {
    pub fn new(last_used: i64) -> Self {
        Self {
            counter: AtomicI64::new(last_used),
        }
    }

    pub fn next(&self) -> i64 {
        self.counter.fetch_add(1, Ordering::Relaxed) + 1
    }
}
