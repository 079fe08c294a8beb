//! Sync retry timer
//!
//! While the cache still shows the built-in mock data, sync requests
//! are re-broadcast on a fixed cadence. The retry is level-triggered:
//! each firing checks the mock flag, so running the same loop from
//! several owning contexts is harmless - re-requesting an already
//! synced set costs nothing but airtime. The first poll that observes
//! real data cancels the timer permanently; cancellation keys off the
//! data we hold, not off any acknowledgment of the requests.

/// Interval between sync re-requests while on mock data
pub const SYNC_RETRY_INTERVAL_MS: u64 = 5000;

/// Periodic re-request scheduler for recipe and pump sync
#[derive(Debug, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RetryTimer {
    interval_ms: u64,
    next_fire_ms: u64,
    cancelled: bool,
}

impl RetryTimer {
    /// Create a timer with the default cadence, first due one interval
    /// from `now_ms`
    pub fn new(now_ms: u64) -> Self {
        Self::with_interval(now_ms, SYNC_RETRY_INTERVAL_MS)
    }

    /// Create a timer with a custom cadence
    pub fn with_interval(now_ms: u64, interval_ms: u64) -> Self {
        Self {
            interval_ms,
            next_fire_ms: now_ms.saturating_add(interval_ms),
            cancelled: false,
        }
    }

    /// Check the timer. Returns true when a retry is due.
    ///
    /// The first call that sees `using_mocks == false` cancels the
    /// timer for good; it never fires again.
    pub fn poll(&mut self, now_ms: u64, using_mocks: bool) -> bool {
        if self.cancelled {
            return false;
        }
        if !using_mocks {
            debug!("real data present, sync retry cancelled");
            self.cancelled = true;
            return false;
        }
        if now_ms >= self.next_fire_ms {
            self.next_fire_ms = now_ms.saturating_add(self.interval_ms);
            return true;
        }
        false
    }

    /// Whether the timer has cancelled itself
    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }
}
