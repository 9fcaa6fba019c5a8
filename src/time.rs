//! Server-side time source.
//!
//! Gate decisions must always be evaluated against the server's own clock,
//! never a client-supplied timestamp. The [`Clock`] trait is the single
//! injection point: production code uses [`SystemClock`], tests pin time
//! with [`FixedClock`].

use chrono::{Local, NaiveDateTime};

/// A source of "now" for authorization decisions.
pub trait Clock: Send + Sync {
    /// Returns the current date and time.
    fn now(&self) -> NaiveDateTime;
}

/// The real system clock in local time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// A clock frozen at a fixed instant, for deterministic tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(NaiveDateTime);

impl FixedClock {
    /// Creates a clock pinned to the given instant.
    pub fn new(now: NaiveDateTime) -> Self {
        Self(now)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_clock_returns_pinned_instant() {
        let instant =
            NaiveDateTime::parse_from_str("2025-01-06 09:02:00", "%Y-%m-%d %H:%M:%S").unwrap();
        let clock = FixedClock::new(instant);
        assert_eq!(clock.now(), instant);
        assert_eq!(clock.now(), clock.now());
    }

    #[test]
    fn test_system_clock_is_monotonic_enough() {
        let clock = SystemClock;
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
    }
}
