//! Attendance ledger.
//!
//! The ledger holds at most one [`AttendanceRecord`] per `(staff, date)`
//! and enforces the gate rules on every check-in and check-out. Gate
//! refusals are expected business outcomes, not errors: they are returned
//! as [`CheckOutcome::Rejected`] so callers can report them without
//! conflating them with real failures.

use std::collections::BTreeMap;
use std::sync::RwLock;

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::config::GateSettings;
use crate::error::{EngineError, EngineResult};
use crate::models::{AttendanceRecord, WeeklySchedule};
use crate::scheduling::resolve_shift;

use super::gate::{GateWindow, WindowState, assess_lateness};

/// Why a check-in or check-out was refused.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum GateRejection {
    /// The action window is not open right now.
    WindowNotOpen {
        /// Whether the window is still upcoming or already closed.
        state: WindowState,
        /// Seconds until the window opens, when it is upcoming.
        countdown_seconds: i64,
    },
    /// The staff member already checked in today.
    AlreadyCheckedIn,
    /// The staff member already checked out today.
    AlreadyCheckedOut,
    /// A check-out was attempted without a prior check-in.
    NotCheckedIn,
    /// The check-out time would not be after the recorded check-in time.
    ///
    /// Reachable when an admin backfills a check-in later than the
    /// check-out window; the record must keep `check_out_at` after
    /// `check_in_at`.
    CheckOutPrecedesCheckIn,
}

/// Outcome of a gate-checked attendance action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CheckOutcome {
    /// The action was accepted; the updated record is returned.
    Accepted {
        /// The record after the action.
        record: AttendanceRecord,
    },
    /// The action was refused by the gate rules.
    Rejected {
        /// Why the action was refused.
        rejection: GateRejection,
    },
}

/// Thread-safe attendance store keyed by `(staff, date)`.
#[derive(Debug, Default)]
pub struct AttendanceLedger {
    records: RwLock<BTreeMap<(String, NaiveDate), AttendanceRecord>>,
}

impl AttendanceLedger {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attempts a check-in for `staff` at the server time `now`.
    ///
    /// The staff member's shift for the day is resolved from `schedule`
    /// (override first, weekly assignment second); having no shift is an
    /// error. The check-in must land inside the gate window anchored at
    /// the shift start, and a second check-in on the same day is refused.
    /// Lateness is assessed against the scheduled start using `now`.
    pub fn check_in(
        &self,
        schedule: &WeeklySchedule,
        gate: &GateSettings,
        staff: &str,
        now: NaiveDateTime,
        location: Option<String>,
        notes: Option<String>,
    ) -> EngineResult<CheckOutcome> {
        let date = now.date();
        let shift = resolve_shift(schedule, staff, date).ok_or_else(|| {
            EngineError::NoShiftAssigned {
                staff: staff.to_string(),
                date,
            }
        })?;

        let (shift_start, _) = schedule.shift_window(shift);
        let window = GateWindow::for_check_in(date, shift_start, gate.check_in_grace_minutes);
        let state = window.state_at(now);
        if state != WindowState::Open {
            info!(staff = %staff, date = %date, state = %state, "Check-in refused by gate");
            return Ok(CheckOutcome::Rejected {
                rejection: GateRejection::WindowNotOpen {
                    state,
                    countdown_seconds: window.countdown_seconds(now),
                },
            });
        }

        let mut records = self.records.write().expect("attendance ledger lock poisoned");
        let record = records
            .entry((staff.to_string(), date))
            .or_insert_with(|| AttendanceRecord::new(staff, date));

        if record.has_check_in() {
            return Ok(CheckOutcome::Rejected {
                rejection: GateRejection::AlreadyCheckedIn,
            });
        }

        let verdict = assess_lateness(date.and_time(shift_start), now);
        record.check_in_at = Some(now);
        record.check_in_location = location;
        record.is_late = verdict.is_late;
        record.late_minutes = verdict.late_minutes;
        if let Some(note) = notes {
            record.append_note(&note);
        }

        info!(
            staff = %staff,
            date = %date,
            is_late = verdict.is_late,
            late_minutes = verdict.late_minutes,
            "Check-in accepted"
        );

        Ok(CheckOutcome::Accepted {
            record: record.clone(),
        })
    }

    /// Attempts a check-out for `staff` at the server time `now`.
    ///
    /// Requires a prior check-in on the same day; the check-out must land
    /// inside the gate window anchored at the shift end and strictly after
    /// the recorded check-in time, and a second check-out is refused.
    pub fn check_out(
        &self,
        schedule: &WeeklySchedule,
        gate: &GateSettings,
        staff: &str,
        now: NaiveDateTime,
        location: Option<String>,
        notes: Option<String>,
    ) -> EngineResult<CheckOutcome> {
        let date = now.date();
        let shift = resolve_shift(schedule, staff, date).ok_or_else(|| {
            EngineError::NoShiftAssigned {
                staff: staff.to_string(),
                date,
            }
        })?;

        let (_, shift_end) = schedule.shift_window(shift);
        let window = GateWindow::for_check_out(date, shift_end, gate.check_out_grace_minutes);
        let state = window.state_at(now);
        if state != WindowState::Open {
            info!(staff = %staff, date = %date, state = %state, "Check-out refused by gate");
            return Ok(CheckOutcome::Rejected {
                rejection: GateRejection::WindowNotOpen {
                    state,
                    countdown_seconds: window.countdown_seconds(now),
                },
            });
        }

        let mut records = self.records.write().expect("attendance ledger lock poisoned");
        let Some(record) = records.get_mut(&(staff.to_string(), date)) else {
            return Ok(CheckOutcome::Rejected {
                rejection: GateRejection::NotCheckedIn,
            });
        };

        if !record.has_check_in() {
            return Ok(CheckOutcome::Rejected {
                rejection: GateRejection::NotCheckedIn,
            });
        }
        if record.has_check_out() {
            return Ok(CheckOutcome::Rejected {
                rejection: GateRejection::AlreadyCheckedOut,
            });
        }
        if record.check_in_at.is_some_and(|checked_in| now <= checked_in) {
            return Ok(CheckOutcome::Rejected {
                rejection: GateRejection::CheckOutPrecedesCheckIn,
            });
        }

        record.check_out_at = Some(now);
        record.check_out_location = location;
        if let Some(note) = notes {
            record.append_note(&note);
        }

        info!(staff = %staff, date = %date, "Check-out accepted");

        Ok(CheckOutcome::Accepted {
            record: record.clone(),
        })
    }

    /// Writes an attendance record directly, bypassing the gate windows.
    ///
    /// Used by managers to correct or backfill attendance. Timestamps are
    /// replaced by the given values (last write wins); notes are appended
    /// to whatever the record already carries. When `scheduled_start` is
    /// given and a check-in time is set, lateness is re-assessed against
    /// it.
    #[allow(clippy::too_many_arguments)]
    pub fn admin_mark(
        &self,
        staff: &str,
        date: NaiveDate,
        check_in_at: Option<NaiveDateTime>,
        check_out_at: Option<NaiveDateTime>,
        notes: Option<String>,
        verified: Option<bool>,
        scheduled_start: Option<NaiveDateTime>,
        now: NaiveDateTime,
    ) -> AttendanceRecord {
        let mut records = self.records.write().expect("attendance ledger lock poisoned");
        let record = records
            .entry((staff.to_string(), date))
            .or_insert_with(|| AttendanceRecord::new(staff, date));

        if check_in_at.is_some() {
            record.check_in_at = check_in_at;
        }
        if check_out_at.is_some() {
            record.check_out_at = check_out_at;
        }

        if let (Some(scheduled), Some(checked_in)) = (scheduled_start, record.check_in_at) {
            let verdict = assess_lateness(scheduled, checked_in);
            record.is_late = verdict.is_late;
            record.late_minutes = verdict.late_minutes;
        }

        if let Some(note) = notes {
            record.append_note(&note);
        }
        if let Some(verified) = verified {
            record.verified = verified;
            record.verified_at = verified.then_some(now);
        }

        info!(staff = %staff, date = %date, "Admin-marked attendance");

        record.clone()
    }

    /// Sets the verification flag on a record, located by id.
    pub fn verify(&self, id: Uuid, verified: bool, now: NaiveDateTime) -> EngineResult<AttendanceRecord> {
        let mut records = self.records.write().expect("attendance ledger lock poisoned");
        let record = records
            .values_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| EngineError::AttendanceNotFound { id: id.to_string() })?;

        record.verified = verified;
        record.verified_at = verified.then_some(now);

        info!(id = %id, verified, "Verified attendance record");

        Ok(record.clone())
    }

    /// Returns the record for `(staff, date)`, if one exists.
    pub fn get(&self, staff: &str, date: NaiveDate) -> Option<AttendanceRecord> {
        self.records
            .read()
            .expect("attendance ledger lock poisoned")
            .get(&(staff.to_string(), date))
            .cloned()
    }

    /// Returns records in `[from, to]`, optionally restricted to one staff
    /// member, ordered by staff then date.
    pub fn range(
        &self,
        staff: Option<&str>,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Vec<AttendanceRecord> {
        self.records
            .read()
            .expect("attendance ledger lock poisoned")
            .values()
            .filter(|r| r.date >= from && r.date <= to)
            .filter(|r| staff.is_none_or(|s| r.staff == s))
            .cloned()
            .collect()
    }

    /// Returns one staff member's records for a calendar month.
    pub fn monthly(&self, staff: &str, year: i32, month: u32) -> Vec<AttendanceRecord> {
        self.records
            .read()
            .expect("attendance ledger lock poisoned")
            .values()
            .filter(|r| r.staff == staff && r.date.year() == year && r.date.month() == month)
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Assignment, DayOverride, ScheduleTask, ShiftType, StaffGroup};
    use chrono::NaiveTime;

    fn make_date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn make_time(s: &str) -> NaiveTime {
        NaiveTime::parse_from_str(s, "%H:%M").unwrap()
    }

    fn make_datetime(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    fn make_schedule() -> WeeklySchedule {
        WeeklySchedule {
            group: StaffGroup::Lab,
            week_start: make_date("2025-01-05"),
            morning_start: make_time("09:00"),
            morning_end: make_time("17:00"),
            evening_start: make_time("17:30"),
            evening_end: make_time("22:00"),
            task: ScheduleTask::General,
            assignments: vec![Assignment {
                staff: "stf_001".to_string(),
                shift_type: ShiftType::Morning,
            }],
            overrides: vec![],
        }
    }

    fn accepted(outcome: CheckOutcome) -> AttendanceRecord {
        match outcome {
            CheckOutcome::Accepted { record } => record,
            CheckOutcome::Rejected { rejection } => panic!("unexpected rejection: {:?}", rejection),
        }
    }

    fn rejection(outcome: CheckOutcome) -> GateRejection {
        match outcome {
            CheckOutcome::Rejected { rejection } => rejection,
            CheckOutcome::Accepted { .. } => panic!("unexpected acceptance"),
        }
    }

    #[test]
    fn test_check_in_inside_window_is_accepted() {
        let ledger = AttendanceLedger::new();
        let outcome = ledger
            .check_in(
                &make_schedule(),
                &GateSettings::default(),
                "stf_001",
                make_datetime("2025-01-06 09:02:00"),
                Some("main lab".to_string()),
                None,
            )
            .unwrap();

        let record = accepted(outcome);
        assert_eq!(record.check_in_at, Some(make_datetime("2025-01-06 09:02:00")));
        assert_eq!(record.check_in_location.as_deref(), Some("main lab"));
        assert!(record.is_late);
        assert_eq!(record.late_minutes, 2);
    }

    #[test]
    fn test_check_in_at_opening_instant_is_on_time() {
        let ledger = AttendanceLedger::new();
        let outcome = ledger
            .check_in(
                &make_schedule(),
                &GateSettings::default(),
                "stf_001",
                make_datetime("2025-01-06 09:00:00"),
                None,
                None,
            )
            .unwrap();

        let record = accepted(outcome);
        assert!(!record.is_late);
        assert_eq!(record.late_minutes, 0);
    }

    /// Scenario: at 09:06 the 09:00-09:05 window is closed and the
    /// check-in is refused, not errored.
    #[test]
    fn test_check_in_after_window_is_rejected() {
        let ledger = AttendanceLedger::new();
        let outcome = ledger
            .check_in(
                &make_schedule(),
                &GateSettings::default(),
                "stf_001",
                make_datetime("2025-01-06 09:06:00"),
                None,
                None,
            )
            .unwrap();

        match rejection(outcome) {
            GateRejection::WindowNotOpen { state, .. } => {
                assert_eq!(state, WindowState::Closed);
            }
            other => panic!("Expected WindowNotOpen, got {:?}", other),
        }
        assert!(ledger.get("stf_001", make_date("2025-01-06")).is_none());
    }

    #[test]
    fn test_check_in_before_window_reports_countdown() {
        let ledger = AttendanceLedger::new();
        let outcome = ledger
            .check_in(
                &make_schedule(),
                &GateSettings::default(),
                "stf_001",
                make_datetime("2025-01-06 08:58:00"),
                None,
                None,
            )
            .unwrap();

        match rejection(outcome) {
            GateRejection::WindowNotOpen {
                state,
                countdown_seconds,
            } => {
                assert_eq!(state, WindowState::Upcoming);
                assert_eq!(countdown_seconds, 120);
            }
            other => panic!("Expected WindowNotOpen, got {:?}", other),
        }
    }

    #[test]
    fn test_double_check_in_is_rejected() {
        let ledger = AttendanceLedger::new();
        let schedule = make_schedule();
        let gate = GateSettings::default();
        let now = make_datetime("2025-01-06 09:01:00");

        ledger.check_in(&schedule, &gate, "stf_001", now, None, None).unwrap();
        let second = ledger
            .check_in(&schedule, &gate, "stf_001", make_datetime("2025-01-06 09:03:00"), None, None)
            .unwrap();

        assert_eq!(rejection(second), GateRejection::AlreadyCheckedIn);
    }

    #[test]
    fn test_check_in_without_shift_is_an_error() {
        let ledger = AttendanceLedger::new();
        let result = ledger.check_in(
            &make_schedule(),
            &GateSettings::default(),
            "stf_unassigned",
            make_datetime("2025-01-06 09:01:00"),
            None,
            None,
        );

        assert!(matches!(result, Err(EngineError::NoShiftAssigned { .. })));
    }

    #[test]
    fn test_check_in_honours_day_override() {
        let ledger = AttendanceLedger::new();
        let mut schedule = make_schedule();
        schedule.overrides.push(DayOverride {
            date: make_date("2025-01-06"),
            staff: "stf_001".to_string(),
            shift_type: ShiftType::Evening,
        });

        // The morning window no longer applies on the overridden date.
        let morning = ledger
            .check_in(
                &schedule,
                &GateSettings::default(),
                "stf_001",
                make_datetime("2025-01-06 09:01:00"),
                None,
                None,
            )
            .unwrap();
        assert!(matches!(morning, CheckOutcome::Rejected { .. }));

        let evening = ledger
            .check_in(
                &schedule,
                &GateSettings::default(),
                "stf_001",
                make_datetime("2025-01-06 17:31:00"),
                None,
                None,
            )
            .unwrap();
        assert!(matches!(evening, CheckOutcome::Accepted { .. }));
    }

    #[test]
    fn test_check_out_requires_prior_check_in() {
        let ledger = AttendanceLedger::new();
        let outcome = ledger
            .check_out(
                &make_schedule(),
                &GateSettings::default(),
                "stf_001",
                make_datetime("2025-01-06 17:02:00"),
                None,
                None,
            )
            .unwrap();

        assert_eq!(rejection(outcome), GateRejection::NotCheckedIn);
    }

    #[test]
    fn test_check_out_inside_window_completes_the_day() {
        let ledger = AttendanceLedger::new();
        let schedule = make_schedule();
        let gate = GateSettings::default();

        ledger
            .check_in(&schedule, &gate, "stf_001", make_datetime("2025-01-06 09:01:00"), None, None)
            .unwrap();
        let outcome = ledger
            .check_out(
                &schedule,
                &gate,
                "stf_001",
                make_datetime("2025-01-06 17:03:00"),
                Some("main lab".to_string()),
                None,
            )
            .unwrap();

        let record = accepted(outcome);
        assert_eq!(record.check_out_at, Some(make_datetime("2025-01-06 17:03:00")));
        assert_eq!(record.check_out_location.as_deref(), Some("main lab"));
    }

    #[test]
    fn test_double_check_out_is_rejected() {
        let ledger = AttendanceLedger::new();
        let schedule = make_schedule();
        let gate = GateSettings::default();

        ledger
            .check_in(&schedule, &gate, "stf_001", make_datetime("2025-01-06 09:01:00"), None, None)
            .unwrap();
        ledger
            .check_out(&schedule, &gate, "stf_001", make_datetime("2025-01-06 17:01:00"), None, None)
            .unwrap();
        let second = ledger
            .check_out(&schedule, &gate, "stf_001", make_datetime("2025-01-06 17:03:00"), None, None)
            .unwrap();

        assert_eq!(rejection(second), GateRejection::AlreadyCheckedOut);
    }

    #[test]
    fn test_check_out_before_backfilled_check_in_is_rejected() {
        let ledger = AttendanceLedger::new();
        // An admin backfills a check-in later than the check-out window.
        ledger.admin_mark(
            "stf_001",
            make_date("2025-01-06"),
            Some(make_datetime("2025-01-06 17:30:00")),
            None,
            None,
            None,
            None,
            make_datetime("2025-01-06 12:00:00"),
        );

        let outcome = ledger
            .check_out(
                &make_schedule(),
                &GateSettings::default(),
                "stf_001",
                make_datetime("2025-01-06 17:02:00"),
                None,
                None,
            )
            .unwrap();

        assert_eq!(rejection(outcome), GateRejection::CheckOutPrecedesCheckIn);
        let record = ledger.get("stf_001", make_date("2025-01-06")).unwrap();
        assert!(record.check_out_at.is_none());
    }

    #[test]
    fn test_check_out_at_exact_check_in_instant_is_rejected() {
        let ledger = AttendanceLedger::new();
        ledger.admin_mark(
            "stf_001",
            make_date("2025-01-06"),
            Some(make_datetime("2025-01-06 17:02:00")),
            None,
            None,
            None,
            None,
            make_datetime("2025-01-06 12:00:00"),
        );

        let outcome = ledger
            .check_out(
                &make_schedule(),
                &GateSettings::default(),
                "stf_001",
                make_datetime("2025-01-06 17:02:00"),
                None,
                None,
            )
            .unwrap();

        assert_eq!(rejection(outcome), GateRejection::CheckOutPrecedesCheckIn);
    }

    #[test]
    fn test_check_out_after_window_is_rejected() {
        let ledger = AttendanceLedger::new();
        let schedule = make_schedule();
        let gate = GateSettings::default();

        ledger
            .check_in(&schedule, &gate, "stf_001", make_datetime("2025-01-06 09:01:00"), None, None)
            .unwrap();
        let outcome = ledger
            .check_out(&schedule, &gate, "stf_001", make_datetime("2025-01-06 17:06:00"), None, None)
            .unwrap();

        assert!(matches!(
            rejection(outcome),
            GateRejection::WindowNotOpen {
                state: WindowState::Closed,
                ..
            }
        ));
    }

    #[test]
    fn test_admin_mark_creates_and_reassesses_lateness() {
        let ledger = AttendanceLedger::new();
        let record = ledger.admin_mark(
            "stf_001",
            make_date("2025-01-06"),
            Some(make_datetime("2025-01-06 09:10:00")),
            None,
            Some("arrived by bus".to_string()),
            None,
            Some(make_datetime("2025-01-06 09:00:00")),
            make_datetime("2025-01-06 12:00:00"),
        );

        assert!(record.is_late);
        assert_eq!(record.late_minutes, 10);
        assert_eq!(record.notes.as_deref(), Some("arrived by bus"));
    }

    #[test]
    fn test_admin_mark_appends_notes_and_overwrites_times() {
        let ledger = AttendanceLedger::new();
        let schedule = make_schedule();
        let gate = GateSettings::default();
        ledger
            .check_in(
                &schedule,
                &gate,
                "stf_001",
                make_datetime("2025-01-06 09:01:00"),
                None,
                Some("first note".to_string()),
            )
            .unwrap();

        let record = ledger.admin_mark(
            "stf_001",
            make_date("2025-01-06"),
            Some(make_datetime("2025-01-06 08:55:00")),
            None,
            Some("corrected".to_string()),
            Some(true),
            Some(make_datetime("2025-01-06 09:00:00")),
            make_datetime("2025-01-06 12:00:00"),
        );

        assert_eq!(record.check_in_at, Some(make_datetime("2025-01-06 08:55:00")));
        assert!(!record.is_late);
        assert_eq!(record.notes.as_deref(), Some("first note\ncorrected"));
        assert!(record.verified);
        assert_eq!(record.verified_at, Some(make_datetime("2025-01-06 12:00:00")));
    }

    #[test]
    fn test_verify_by_id() {
        let ledger = AttendanceLedger::new();
        let outcome = ledger
            .check_in(
                &make_schedule(),
                &GateSettings::default(),
                "stf_001",
                make_datetime("2025-01-06 09:01:00"),
                None,
                None,
            )
            .unwrap();
        let id = accepted(outcome).id;

        let verified = ledger
            .verify(id, true, make_datetime("2025-01-06 18:00:00"))
            .unwrap();
        assert!(verified.verified);
        assert_eq!(verified.verified_at, Some(make_datetime("2025-01-06 18:00:00")));

        let unverified = ledger
            .verify(id, false, make_datetime("2025-01-06 19:00:00"))
            .unwrap();
        assert!(!unverified.verified);
        assert!(unverified.verified_at.is_none());
    }

    #[test]
    fn test_verify_unknown_id_is_not_found() {
        let ledger = AttendanceLedger::new();
        let result = ledger.verify(Uuid::new_v4(), true, make_datetime("2025-01-06 18:00:00"));
        assert!(matches!(result, Err(EngineError::AttendanceNotFound { .. })));
    }

    #[test]
    fn test_range_filters_by_staff_and_dates() {
        let ledger = AttendanceLedger::new();
        let now = make_datetime("2025-01-06 12:00:00");
        ledger.admin_mark("stf_a", make_date("2025-01-06"), None, None, None, None, None, now);
        ledger.admin_mark("stf_a", make_date("2025-01-09"), None, None, None, None, None, now);
        ledger.admin_mark("stf_b", make_date("2025-01-06"), None, None, None, None, None, now);

        let all = ledger.range(None, make_date("2025-01-06"), make_date("2025-01-09"));
        assert_eq!(all.len(), 3);

        let only_a = ledger.range(Some("stf_a"), make_date("2025-01-06"), make_date("2025-01-09"));
        assert_eq!(only_a.len(), 2);

        let narrow = ledger.range(None, make_date("2025-01-07"), make_date("2025-01-09"));
        assert_eq!(narrow.len(), 1);
    }

    #[test]
    fn test_monthly_filters_by_calendar_month() {
        let ledger = AttendanceLedger::new();
        let now = make_datetime("2025-01-06 12:00:00");
        ledger.admin_mark("stf_a", make_date("2025-01-31"), None, None, None, None, None, now);
        ledger.admin_mark("stf_a", make_date("2025-02-01"), None, None, None, None, None, now);

        let january = ledger.monthly("stf_a", 2025, 1);
        assert_eq!(january.len(), 1);
        assert_eq!(january[0].date, make_date("2025-01-31"));
    }
}
