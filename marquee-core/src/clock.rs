//! Injectable time source.
//!
//! Every "now"-relative computation (rolling windows, streaks, today's
//! marathon count) reads the clock through this trait. The UTC offset of
//! the returned instant is what the analytics treat as local time.

use chrono::{DateTime, FixedOffset, Local};

/// A source of the current instant.
pub trait Clock: Send + Sync {
    /// Current instant, carrying the caller's local UTC offset.
    fn now(&self) -> DateTime<FixedOffset>;
}

/// Wall clock in the system's local time zone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Local::now().fixed_offset()
    }
}

/// A clock frozen at one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    now: DateTime<FixedOffset>,
}

impl FixedClock {
    pub fn new(now: DateTime<FixedOffset>) -> Self {
        Self { now }
    }

    /// Parse an RFC 3339 timestamp such as `2024-06-12T15:00:00+00:00`.
    pub fn parse(rfc3339: &str) -> Option<Self> {
        DateTime::parse_from_rfc3339(rfc3339).ok().map(Self::new)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<FixedOffset> {
        self.now
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn test_fixed_clock_is_stable() {
        let clock = FixedClock::parse("2024-06-12T15:00:00+02:00").unwrap();
        assert_eq!(clock.now(), clock.now());
        assert_eq!(clock.now().hour(), 15);
        assert_eq!(clock.now().offset().local_minus_utc(), 7200);
    }

    #[test]
    fn test_fixed_clock_rejects_garbage() {
        assert!(FixedClock::parse("yesterday").is_none());
    }
}
