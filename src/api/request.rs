//! Request types for the engine API.
//!
//! This module defines the JSON request bodies and query parameters for
//! the scheduling, attendance and payroll endpoints. Note that attendance
//! requests carry no timestamps: the moment of a check-in or check-out is
//! always taken from the server clock.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{ScheduleTask, ShiftType, StaffGroup};
use crate::scheduling::AssignmentDraft;

/// Request body for `POST /schedules`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpsertScheduleRequest {
    /// The staff group the schedule belongs to.
    pub group: StaffGroup,
    /// Any date within the target week; normalized to the week's Sunday.
    pub week_start: NaiveDate,
    /// Start of the morning shift.
    pub morning_start: NaiveTime,
    /// End of the morning shift.
    pub morning_end: NaiveTime,
    /// Start of the evening shift.
    pub evening_start: NaiveTime,
    /// End of the evening shift.
    pub evening_end: NaiveTime,
    /// What the week is for.
    #[serde(default)]
    pub task: ScheduleTask,
    /// The assignment rows as entered on the edit screen.
    #[serde(default)]
    pub assignments: Vec<AssignmentEntry>,
    /// How many consecutive weeks to commit the template for.
    #[serde(default = "default_repeat_weeks")]
    pub repeat_weeks: u32,
}

fn default_repeat_weeks() -> u32 {
    1
}

/// One assignment row in an upsert request.
///
/// The shift type is a raw string so the conflict validator can report
/// invalid values row by row instead of failing deserialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignmentEntry {
    /// The staff id as entered.
    pub staff: String,
    /// The shift type as entered.
    pub shift_type: String,
}

impl From<AssignmentEntry> for AssignmentDraft {
    fn from(entry: AssignmentEntry) -> Self {
        AssignmentDraft {
            staff: entry.staff,
            shift_type: entry.shift_type,
        }
    }
}

/// Query parameters for `GET /schedules`.
#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleQuery {
    /// The staff group to fetch.
    pub group: StaffGroup,
    /// Any date within the target week.
    pub week_start: NaiveDate,
}

/// Request body for `POST /schedules/overrides`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddOverrideRequest {
    /// The staff group of the owning schedule.
    pub group: StaffGroup,
    /// Any date within the owning week.
    pub week_start: NaiveDate,
    /// The date the override applies to.
    pub date: NaiveDate,
    /// The staff member the override applies to.
    pub staff: String,
    /// The shift worked on that date.
    pub shift_type: ShiftType,
}

/// Request body for `DELETE /schedules/overrides`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoveOverrideRequest {
    /// The staff group of the owning schedule.
    pub group: StaffGroup,
    /// Any date within the owning week.
    pub week_start: NaiveDate,
    /// The date of the override to remove.
    pub date: NaiveDate,
    /// The staff member of the override to remove.
    pub staff: String,
}

/// Request body for `POST /attendance/check-in` and
/// `POST /attendance/check-out`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckRequest {
    /// The staff member checking in or out.
    pub staff: String,
    /// The staff group whose schedule governs the gate windows.
    pub group: StaffGroup,
    /// Free-form location, recorded as given.
    #[serde(default)]
    pub location: Option<String>,
    /// Optional note to attach to the record.
    #[serde(default)]
    pub notes: Option<String>,
}

/// Query parameters for `GET /attendance`.
#[derive(Debug, Clone, Deserialize)]
pub struct AttendanceQuery {
    /// Restrict to one staff member.
    #[serde(default)]
    pub staff: Option<String>,
    /// First date of the range (inclusive).
    pub from: NaiveDate,
    /// Last date of the range (inclusive).
    pub to: NaiveDate,
}

/// Request body for `POST /attendance/admin-mark`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminMarkRequest {
    /// The staff member the mark applies to.
    pub staff: String,
    /// The staff group, used to re-assess lateness against the schedule
    /// when given.
    #[serde(default)]
    pub group: Option<StaffGroup>,
    /// The date the mark applies to.
    pub date: NaiveDate,
    /// Check-in time to record, replacing any existing one.
    #[serde(default)]
    pub check_in_at: Option<NaiveDateTime>,
    /// Check-out time to record, replacing any existing one.
    #[serde(default)]
    pub check_out_at: Option<NaiveDateTime>,
    /// Note to append to the record.
    #[serde(default)]
    pub notes: Option<String>,
    /// Verification flag to set.
    #[serde(default)]
    pub verified: Option<bool>,
}

/// Request body for `POST /attendance/verify`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyRequest {
    /// Id of the attendance record.
    pub attendance_id: Uuid,
    /// The verification flag to set.
    pub verified: bool,
}

/// Query parameters for `GET /payroll/calculate`.
#[derive(Debug, Clone, Deserialize)]
pub struct PayrollQuery {
    /// The staff member to calculate for.
    pub staff: String,
    /// The staff group the payslip would be issued under.
    pub group: StaffGroup,
    /// The payroll year.
    pub year: i32,
    /// The payroll month (1-12).
    pub month: u32,
    /// The daily wage.
    pub daily_wage: Decimal,
    /// Externally supplied gross for monthly-paid groups.
    #[serde(default)]
    pub system_gross: Option<Decimal>,
    /// Salary advance already paid out.
    #[serde(default)]
    pub advance: Decimal,
}

/// Request body for `POST /payroll/payslips`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum PayslipRequest {
    /// Derive the payslip from the attendance ledger.
    Calculated {
        /// The staff member.
        staff: String,
        /// The staff group.
        group: StaffGroup,
        /// The payroll year.
        year: i32,
        /// The payroll month (1-12).
        month: u32,
        /// The daily wage.
        daily_wage: Decimal,
        /// Externally supplied gross for monthly-paid groups.
        #[serde(default)]
        system_gross: Option<Decimal>,
        /// Salary advance already paid out.
        #[serde(default)]
        advance: Decimal,
    },
    /// Save a manually entered payslip.
    Manual {
        /// The staff member.
        staff: String,
        /// The staff group.
        group: StaffGroup,
        /// The payroll year.
        year: i32,
        /// The payroll month (1-12).
        month: u32,
        /// Manually entered count of days worked.
        working_days: u32,
        /// The daily wage.
        daily_wage: Decimal,
        /// Overtime hours worked.
        #[serde(default)]
        overtime_hours: Decimal,
        /// Pay per overtime hour.
        #[serde(default)]
        overtime_rate: Decimal,
        /// Bonus amount.
        #[serde(default)]
        bonus: Decimal,
        /// Total deductions.
        #[serde(default)]
        deductions: Decimal,
        /// Salary advance already paid out.
        #[serde(default)]
        advance: Decimal,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upsert_request_defaults() {
        let json = r#"{
            "group": "field",
            "week_start": "2025-01-05",
            "morning_start": "09:00:00",
            "morning_end": "13:00:00",
            "evening_start": "13:30:00",
            "evening_end": "18:00:00"
        }"#;

        let request: UpsertScheduleRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.repeat_weeks, 1);
        assert_eq!(request.task, ScheduleTask::General);
        assert!(request.assignments.is_empty());
    }

    #[test]
    fn test_payslip_request_is_tagged_by_source() {
        let json = r#"{
            "source": "manual",
            "staff": "stf_001",
            "group": "lab",
            "year": 2025,
            "month": 1,
            "working_days": 20,
            "daily_wage": "800"
        }"#;

        let request: PayslipRequest = serde_json::from_str(json).unwrap();
        match request {
            PayslipRequest::Manual {
                working_days,
                overtime_hours,
                ..
            } => {
                assert_eq!(working_days, 20);
                assert_eq!(overtime_hours, Decimal::ZERO);
            }
            PayslipRequest::Calculated { .. } => panic!("Expected manual payslip request"),
        }
    }

    #[test]
    fn test_check_request_has_no_timestamp_field() {
        // Client-supplied timestamps must not round-trip into the gate.
        let json = r#"{"staff": "stf_001", "group": "lab", "checked_in_at": "2025-01-06T09:00:00"}"#;
        let request: CheckRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.staff, "stf_001");
        assert!(request.location.is_none());
    }
}
