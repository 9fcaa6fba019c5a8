//! Sequential week propagation.
//!
//! A validated weekly template can be committed for `repeat_weeks`
//! consecutive weeks in one save. Propagation is strictly sequential:
//! weeks are written in ascending order and the first failure aborts the
//! run, so the committed prefix is always contiguous from the template
//! week.

use chrono::{Days, NaiveDate};
use serde::Serialize;
use tracing::{info, warn};

use crate::models::WeeklySchedule;

use super::store::ScheduleStore;

/// One successfully committed week of a propagation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeekCommit {
    /// Zero-based offset of the week from the template week.
    pub index: u32,
    /// The committed week's start date.
    pub week_start: NaiveDate,
}

/// The failure that aborted a propagation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PropagationFailure {
    /// Zero-based offset of the failed week.
    pub index: u32,
    /// The failed week's start date.
    pub week_start: NaiveDate,
    /// Why the week could not be committed.
    pub message: String,
}

/// Outcome of a propagation run: the contiguous committed prefix plus the
/// failure that stopped it, if any.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PropagationReport {
    /// Weeks committed, in ascending order.
    pub committed: Vec<WeekCommit>,
    /// The aborting failure, or `None` if every week was committed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed: Option<PropagationFailure>,
}

impl PropagationReport {
    /// Returns true if every requested week was committed.
    pub fn is_complete(&self) -> bool {
        self.failed.is_none()
    }
}

/// Commits `template` for `repeat_weeks` consecutive weeks starting at the
/// template's own week.
///
/// Week `i` gets the template's windows and assignments with its
/// `week_start` advanced by `7 * i` days and its overrides cleared; the
/// template week itself (`i = 0`) keeps the template as given, so a
/// re-save of an existing week preserves stored overrides via the store's
/// upsert semantics. On the first failed week the run aborts; earlier
/// commits are not rolled back.
pub fn propagate_weeks(
    store: &ScheduleStore,
    template: &WeeklySchedule,
    repeat_weeks: u32,
) -> PropagationReport {
    let mut committed = Vec::with_capacity(repeat_weeks as usize);

    for index in 0..repeat_weeks {
        let week_start = match template
            .week_start
            .checked_add_days(Days::new(u64::from(index) * 7))
        {
            Some(date) => date,
            None => {
                warn!(index, "Week propagation aborted: date arithmetic overflow");
                return PropagationReport {
                    committed,
                    failed: Some(PropagationFailure {
                        index,
                        week_start: template.week_start,
                        message: "week start out of calendar range".to_string(),
                    }),
                };
            }
        };

        let mut week = template.clone();
        week.week_start = week_start;
        if index > 0 {
            week.overrides.clear();
        }

        match store.upsert(week) {
            Ok(stored) => committed.push(WeekCommit {
                index,
                week_start: stored.week_start,
            }),
            Err(err) => {
                warn!(
                    index,
                    week_start = %week_start,
                    error = %err,
                    "Week propagation aborted"
                );
                return PropagationReport {
                    committed,
                    failed: Some(PropagationFailure {
                        index,
                        week_start,
                        message: err.to_string(),
                    }),
                };
            }
        }
    }

    info!(
        group = %template.group,
        week_start = %template.week_start,
        weeks = committed.len(),
        "Propagated weekly schedule"
    );

    PropagationReport {
        committed,
        failed: None,
    }
}
