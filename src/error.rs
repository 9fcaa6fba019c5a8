//! Error types for the scheduling, attendance and payroll engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all failure conditions the engine can hit. Expected business
//! outcomes (a closed check-in window, a schedule conflict list) are *not*
//! errors and are modelled as ordinary return values instead.

use chrono::NaiveDate;
use thiserror::Error;

use crate::models::StaffGroup;

/// The main error type for the engine.
///
/// All fallible operations in the engine return this error type, making it
/// easy to handle errors consistently throughout the application.
///
/// # Example
///
/// ```
/// use roster_engine::error::EngineError;
///
/// let error = EngineError::ConfigNotFound {
///     path: "/missing/engine.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/engine.yaml");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// No weekly schedule exists for the given group and week.
    #[error("Schedule not found for group '{group}' in week starting {week_start}")]
    ScheduleNotFound {
        /// The staff group that was queried.
        group: StaffGroup,
        /// The week-start date that was queried.
        week_start: NaiveDate,
    },

    /// A weekly upsert targeted a week that lies before the earliest
    /// schedulable week.
    #[error("Cannot schedule week starting {week_start}: weeks before {earliest} are closed")]
    WeekInPast {
        /// The rejected week-start date.
        week_start: NaiveDate,
        /// The earliest week that may still be scheduled.
        earliest: NaiveDate,
    },

    /// A day override referenced a date outside its owning week.
    #[error("Override date {date} is outside the week starting {week_start}")]
    OverrideOutOfRange {
        /// The out-of-range override date.
        date: NaiveDate,
        /// The week-start date of the owning schedule.
        week_start: NaiveDate,
    },

    /// The staff member has no shift assigned for the given date.
    #[error("No shift assigned to staff '{staff}' on {date}")]
    NoShiftAssigned {
        /// The staff reference.
        staff: String,
        /// The date with no assignment.
        date: NaiveDate,
    },

    /// An attendance record was not found.
    #[error("Attendance record not found: {id}")]
    AttendanceNotFound {
        /// The id of the missing record.
        id: String,
    },

    /// A payslip already exists for the staff member and period.
    #[error("Payslip already exists for staff '{staff}' in {month}/{year}")]
    DuplicatePayslip {
        /// The staff reference.
        staff: String,
        /// The payslip year.
        year: i32,
        /// The payslip month.
        month: u32,
    },

    /// A payroll period was invalid (month outside 1-12, or a date that
    /// does not exist in the calendar).
    #[error("Invalid payroll period {month}/{year}")]
    InvalidPeriod {
        /// The requested year.
        year: i32,
        /// The requested month.
        month: u32,
    },

    /// A best-effort salary notification could not be delivered.
    ///
    /// Callers log this and still report the payslip save as successful;
    /// it must never surface as a save failure.
    #[error("Salary notification failed: {message}")]
    NotificationFailed {
        /// A description of the delivery failure.
        message: String,
    },

}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
