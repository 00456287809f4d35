//! Millisecond clocks

use std::time::{Duration, Instant};

/// Monotonic millisecond time source
pub trait Clock {
    fn now_ms(&self) -> u64;
    /// Block for `ms` milliseconds
    fn stall(&mut self, ms: u64);
}

/// Wall clock measured from construction, used by the binary in real-time mode
#[derive(Debug, Clone, Copy)]
pub struct StdClock {
    start: Instant,
}

impl Default for StdClock {
    fn default() -> Self {
        Self::new()
    }
}

impl StdClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Clock for StdClock {
    fn now_ms(&self) -> u64 {
        u64::try_from(self.start.elapsed().as_millis()).unwrap_or(u64::MAX)
    }

    fn stall(&mut self, ms: u64) {
        std::thread::sleep(Duration::from_millis(ms));
    }
}

/// Simulated clock for tests and headless runs. Stalling just moves time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SimClock {
    now_ms: u64,
}

impl SimClock {
    pub fn new(start_ms: u64) -> Self {
        Self { now_ms: start_ms }
    }

    pub fn advance(&mut self, ms: u64) {
        self.now_ms += ms;
    }
}

impl Clock for SimClock {
    fn now_ms(&self) -> u64 {
        self.now_ms
    }

    fn stall(&mut self, ms: u64) {
        self.advance(ms);
    }
}
