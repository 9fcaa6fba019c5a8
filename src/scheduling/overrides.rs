//! Single-date override management and shift resolution.
//!
//! An override punches a `(date, staff)` exception into a stored weekly
//! schedule. Adding an override for a pair that already has one replaces
//! it; resolution always prefers the override over the weekly assignment.

use chrono::NaiveDate;
use tracing::info;

use crate::error::{EngineError, EngineResult};
use crate::models::{DayOverride, ShiftType, StaffGroup, WeeklySchedule};

use super::store::ScheduleStore;

/// Adds an override to the stored schedule for `(group, week_start)`.
///
/// The override date must fall within the owning week, otherwise
/// [`EngineError::OverrideOutOfRange`] is returned and the schedule is
/// untouched. An existing override for the same `(date, staff)` pair is
/// replaced. Returns the schedule's override list after the change.
pub fn add_override(
    store: &ScheduleStore,
    group: StaffGroup,
    week_start: NaiveDate,
    day_override: DayOverride,
) -> EngineResult<Vec<DayOverride>> {
    store.with_schedule_mut(group, week_start, |schedule| {
        if !schedule.contains(day_override.date) {
            return Err(EngineError::OverrideOutOfRange {
                date: day_override.date,
                week_start: schedule.week_start,
            });
        }

        schedule
            .overrides
            .retain(|o| !(o.date == day_override.date && o.staff == day_override.staff));

        info!(
            group = %group,
            date = %day_override.date,
            staff = %day_override.staff,
            shift = %day_override.shift_type,
            "Added day override"
        );

        schedule.overrides.push(day_override);
        Ok(schedule.overrides.clone())
    })
}

/// Removes the override for `(date, staff)` from the stored schedule.
///
/// Removing a pair that has no override is not an error. Returns the
/// number of overrides removed (0 or 1) and the list after the change.
pub fn remove_override(
    store: &ScheduleStore,
    group: StaffGroup,
    week_start: NaiveDate,
    date: NaiveDate,
    staff: &str,
) -> EngineResult<(usize, Vec<DayOverride>)> {
    store.with_schedule_mut(group, week_start, |schedule| {
        let before = schedule.overrides.len();
        schedule
            .overrides
            .retain(|o| !(o.date == date && o.staff == staff));
        let removed = before - schedule.overrides.len();

        if removed > 0 {
            info!(group = %group, date = %date, staff = %staff, "Removed day override");
        }

        Ok((removed, schedule.overrides.clone()))
    })
}

/// Resolves the shift a staff member works on `date` under `schedule`.
///
/// An override for `(staff, date)` wins over the weekly assignment;
/// returns `None` when the staff member has neither.
pub fn resolve_shift(schedule: &WeeklySchedule, staff: &str, date: NaiveDate) -> Option<ShiftType> {
    if let Some(o) = schedule.override_for(staff, date) {
        return Some(o.shift_type);
    }
    schedule.assignment_for(staff).map(|a| a.shift_type)
}
