//! Weekly schedule model and related types.
//!
//! This module defines the [`WeeklySchedule`] template together with the
//! closed enums for staff groups, shift types and schedule tasks. A weekly
//! schedule is keyed by `(group, week_start)` and carries the morning and
//! evening time windows, the staff assignments for the week, and any
//! single-date overrides punched into it.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Days, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// A staff category that scopes schedules and payroll independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StaffGroup {
    /// Field workers, paid a daily wage.
    Field,
    /// Delivery workers, paid a daily wage; overtime and bonus do not apply.
    Delivery,
    /// Laboratory staff, paid monthly.
    Lab,
    /// Accountants, paid monthly.
    Accountant,
    /// Company (office) staff, paid monthly.
    Company,
}

impl fmt::Display for StaffGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StaffGroup::Field => "field",
            StaffGroup::Delivery => "delivery",
            StaffGroup::Lab => "lab",
            StaffGroup::Accountant => "accountant",
            StaffGroup::Company => "company",
        };
        write!(f, "{}", s)
    }
}

/// A named time-of-day work window within a scheduled week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShiftType {
    /// The morning shift, bounded by the schedule's morning window.
    Morning,
    /// The evening shift, bounded by the schedule's evening window.
    Evening,
}

impl fmt::Display for ShiftType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShiftType::Morning => write!(f, "morning"),
            ShiftType::Evening => write!(f, "evening"),
        }
    }
}

impl FromStr for ShiftType {
    type Err = ();

    /// Parses a shift type case-insensitively, accepting both the wire
    /// form (`morning`) and the display form used by edit screens
    /// (`Morning`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "morning" => Ok(ShiftType::Morning),
            "evening" => Ok(ShiftType::Evening),
            _ => Err(()),
        }
    }
}

/// What a scheduled week is for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleTask {
    /// Regular work with no special focus.
    #[default]
    General,
    /// Production work.
    Production,
    /// Delivery runs.
    Delivery,
    /// Maintenance work.
    Maintenance,
}

/// A binding of one staff member to one shift within a week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    /// Opaque reference to the staff member (owned by the staff directory).
    pub staff: String,
    /// The shift the staff member works for the whole week.
    pub shift_type: ShiftType,
}

/// A single-date exception that supersedes the weekly assignment for one
/// staff member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayOverride {
    /// The date the override applies to; must fall within the owning week.
    pub date: NaiveDate,
    /// Opaque reference to the staff member.
    pub staff: String,
    /// The shift worked on that date instead of the weekly assignment.
    pub shift_type: ShiftType,
}

/// One weekly shift template for a staff group.
///
/// Keyed by `(group, week_start)` with upsert semantics. Assignments apply
/// to every day of the week; overrides punch single-date exceptions into
/// the template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklySchedule {
    /// The staff group this schedule belongs to.
    pub group: StaffGroup,
    /// The first day of the week (Sunday by convention).
    pub week_start: NaiveDate,
    /// Start of the morning shift.
    pub morning_start: NaiveTime,
    /// End of the morning shift; strictly later than `morning_start`.
    pub morning_end: NaiveTime,
    /// Start of the evening shift.
    pub evening_start: NaiveTime,
    /// End of the evening shift; strictly later than `evening_start`.
    pub evening_end: NaiveTime,
    /// What the week is for.
    #[serde(default)]
    pub task: ScheduleTask,
    /// Staff assignments for the week.
    #[serde(default)]
    pub assignments: Vec<Assignment>,
    /// Single-date exceptions to the assignments.
    #[serde(default)]
    pub overrides: Vec<DayOverride>,
}

impl WeeklySchedule {
    /// Returns the last day of the week (`week_start + 6`).
    pub fn week_end(&self) -> NaiveDate {
        self.week_start + Days::new(6)
    }

    /// Returns true if `date` falls within `[week_start, week_start + 6]`.
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.week_start && date <= self.week_end()
    }

    /// Returns the `(start, end)` clock times for the given shift.
    pub fn shift_window(&self, shift: ShiftType) -> (NaiveTime, NaiveTime) {
        match shift {
            ShiftType::Morning => (self.morning_start, self.morning_end),
            ShiftType::Evening => (self.evening_start, self.evening_end),
        }
    }

    /// Returns the weekly assignment for a staff member, if any.
    pub fn assignment_for(&self, staff: &str) -> Option<&Assignment> {
        self.assignments.iter().find(|a| a.staff == staff)
    }

    /// Returns the override for `(staff, date)`, if one exists.
    pub fn override_for(&self, staff: &str, date: NaiveDate) -> Option<&DayOverride> {
        self.overrides
            .iter()
            .find(|o| o.staff == staff && o.date == date)
    }
}

/// Returns the start (Sunday) of the week containing `date`.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use roster_engine::models::week_start_of;
///
/// // 2025-01-08 is a Wednesday; its week starts on Sunday 2025-01-05.
/// let wednesday = NaiveDate::from_ymd_opt(2025, 1, 8).unwrap();
/// assert_eq!(week_start_of(wednesday), NaiveDate::from_ymd_opt(2025, 1, 5).unwrap());
/// ```
pub fn week_start_of(date: NaiveDate) -> NaiveDate {
    date - Days::new(u64::from(date.weekday().num_days_from_sunday()))
}
