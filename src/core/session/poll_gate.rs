//=========================================================================
// Poll Gate
//=========================================================================
//
// Decides which ticks query engine state. A tick covering the window
// (now - delta, now] polls when that window contains a multiple of the
// interval, i.e. `now % interval < delta`. Polling is therefore aligned to
// the clock, not to the session start, and happens at most once per
// interval for ticks shorter than the interval.
//
//=========================================================================

/// Default state poll interval (10 Hz).
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollGate {
    interval_ms: u64,
}

impl PollGate {
    pub fn new(interval_ms: u64) -> Self {
        assert!(interval_ms > 0, "Poll interval must be positive");
        Self { interval_ms }
    }

    /// Whether the tick ending at `now_ms` after `delta_ms` should poll.
    pub fn should_poll(&self, now_ms: u64, delta_ms: u64) -> bool {
        now_ms % self.interval_ms < delta_ms
    }

    pub fn interval_ms(&self) -> u64 {
        self.interval_ms
    }
}

impl Default for PollGate {
    fn default() -> Self {
        Self::new(DEFAULT_POLL_INTERVAL_MS)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
