//! Time-gated attendance windows and lateness assessment.
//!
//! A gate window is a short interval anchored at the scheduled shift
//! boundary: check-in opens at the shift start, check-out at the shift
//! end, and each stays open for the configured grace period. All decisions
//! are made against the server clock; client-reported times are never
//! trusted.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;

/// Where the server clock stands relative to a gate window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowState {
    /// The window has not opened yet.
    Upcoming,
    /// The window is open; the action is accepted.
    Open,
    /// The window has closed.
    Closed,
}

impl std::fmt::Display for WindowState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WindowState::Upcoming => write!(f, "upcoming"),
            WindowState::Open => write!(f, "open"),
            WindowState::Closed => write!(f, "closed"),
        }
    }
}

/// An action window `[opens_at, closes_at]`, inclusive at both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GateWindow {
    /// When the window opens (inclusive).
    pub opens_at: NaiveDateTime,
    /// When the window closes (inclusive).
    pub closes_at: NaiveDateTime,
}

impl GateWindow {
    /// The check-in window for a shift starting at `shift_start` on `date`.
    pub fn for_check_in(date: NaiveDate, shift_start: NaiveTime, grace_minutes: i64) -> Self {
        let opens_at = date.and_time(shift_start);
        Self {
            opens_at,
            closes_at: opens_at + Duration::minutes(grace_minutes),
        }
    }

    /// The check-out window for a shift ending at `shift_end` on `date`.
    pub fn for_check_out(date: NaiveDate, shift_end: NaiveTime, grace_minutes: i64) -> Self {
        let opens_at = date.and_time(shift_end);
        Self {
            opens_at,
            closes_at: opens_at + Duration::minutes(grace_minutes),
        }
    }

    /// Classifies `now` against the window.
    pub fn state_at(&self, now: NaiveDateTime) -> WindowState {
        if now < self.opens_at {
            WindowState::Upcoming
        } else if now <= self.closes_at {
            WindowState::Open
        } else {
            WindowState::Closed
        }
    }

    /// Whole seconds until the window opens (when upcoming) or closes
    /// (when open). Zero once the window has closed.
    pub fn countdown_seconds(&self, now: NaiveDateTime) -> i64 {
        match self.state_at(now) {
            WindowState::Upcoming => (self.opens_at - now).num_seconds(),
            WindowState::Open => (self.closes_at - now).num_seconds(),
            WindowState::Closed => 0,
        }
    }
}

/// Lateness assessment for a check-in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LatenessVerdict {
    /// True if the check-in happened after the scheduled start.
    pub is_late: bool,
    /// Whole minutes late, floored; zero for on-time check-ins.
    pub late_minutes: i64,
}

/// Assesses a check-in against the scheduled shift start.
///
/// A check-in at exactly the scheduled start is on time; lateness begins
/// strictly after it. Partial minutes are floored, so a check-in 59
/// seconds after the start is late with `late_minutes` 0.
pub fn assess_lateness(scheduled_start: NaiveDateTime, checked_in_at: NaiveDateTime) -> LatenessVerdict {
    let is_late = checked_in_at > scheduled_start;
    let late_minutes = if is_late {
        (checked_in_at - scheduled_start).num_minutes()
    } else {
        0
    };
    LatenessVerdict {
        is_late,
        late_minutes,
    }
}
