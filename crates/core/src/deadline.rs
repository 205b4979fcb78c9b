//! Completion deadlines with explicit units.
//!
//! A [`Deadline`] carries its own unit and is normalized to milliseconds
//! before any loop arithmetic. The [`Deadline::Never`] sentinel normalizes
//! to `u64::MAX` so that "wait forever" can never be confused with
//! "already timed out".

/// Maximum time to wait for a queued job to complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deadline {
    Seconds(u64),
    Milliseconds(u64),
    Microseconds(u64),
    Nanoseconds(u64),
    /// Wait indefinitely.
    Never,
}

impl Deadline {
    /// Convenience constructor for whole minutes.
    pub fn minutes(n: u64) -> Self {
        Deadline::Seconds(n.saturating_mul(60))
    }

    /// Normalize to milliseconds.
    ///
    /// Sub-millisecond units truncate toward zero. `Never` maps to
    /// `u64::MAX`, never to zero.
    pub fn as_millis(&self) -> u64 {
        match *self {
            Deadline::Seconds(s) => s.saturating_mul(1_000),
            Deadline::Milliseconds(ms) => ms,
            Deadline::Microseconds(us) => us / 1_000,
            Deadline::Nanoseconds(ns) => ns / 1_000_000,
            Deadline::Never => u64::MAX,
        }
    }
}

impl Default for Deadline {
    /// One minute, matching the default per-call timeout.
    fn default() -> Self {
        Deadline::Seconds(60)
    }
}
