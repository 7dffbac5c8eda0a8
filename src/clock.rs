//! Clocks.
//!
//! The collector uses two unrelated time sources. Cache aging reads a
//! monotonic clock; record timestamps read the wall clock (microseconds since
//! the UNIX epoch), which may jump when the system time is changed.

use std::sync::atomic::{AtomicI64, Ordering};
use std::time::{Duration, Instant};

use chrono::Utc;

/// Time source for the collector.
pub trait Clock: Send + Sync {
    /// Monotonic microseconds since an arbitrary fixed origin.
    fn monotonic_us(&self) -> i64;

    /// Wall clock microseconds since the UNIX epoch.
    fn utc_us(&self) -> i64;
}

/// Real clocks: `Instant` for monotonic time, `chrono::Utc` for wall time.
#[derive(Debug)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn monotonic_us(&self) -> i64 {
        self.origin.elapsed().as_micros() as i64
    }

    fn utc_us(&self) -> i64 {
        Utc::now().timestamp_micros()
    }
}

/// Manually advanced clock for tests. Both readings move together.
#[derive(Debug, Default)]
pub struct FakeClock {
    now_us: AtomicI64,
}

impl FakeClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, by: Duration) {
        self.now_us.fetch_add(by.as_micros() as i64, Ordering::SeqCst);
    }
}

impl Clock for FakeClock {
    fn monotonic_us(&self) -> i64 {
        self.now_us.load(Ordering::SeqCst)
    }

    fn utc_us(&self) -> i64 {
        self.now_us.load(Ordering::SeqCst)
    }
}
