//! Attendance record model.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One per-staff, per-day check-in/check-out record.
///
/// At most one record exists per `(staff, date)`. The record is created on
/// check-in (or by an admin mark), mutated on check-out and verification,
/// and its date never changes afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    /// Unique identifier for the record.
    pub id: Uuid,
    /// Opaque reference to the staff member.
    pub staff: String,
    /// The calendar day the record covers. Immutable once created.
    pub date: NaiveDate,
    /// When the staff member checked in, if they have.
    pub check_in_at: Option<NaiveDateTime>,
    /// When the staff member checked out, if they have.
    pub check_out_at: Option<NaiveDateTime>,
    /// Free-form location reported at check-in.
    pub check_in_location: Option<String>,
    /// Free-form location reported at check-out.
    pub check_out_location: Option<String>,
    /// Whether the check-in happened after the scheduled shift start.
    pub is_late: bool,
    /// Whole minutes between the scheduled start and the check-in,
    /// floored at zero.
    pub late_minutes: i64,
    /// Whether a manager has verified the record.
    pub verified: bool,
    /// When the record was verified.
    pub verified_at: Option<NaiveDateTime>,
    /// Accumulated notes; admin marks append rather than replace.
    pub notes: Option<String>,
}

impl AttendanceRecord {
    /// Creates an empty record for a staff member and date.
    pub fn new(staff: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            staff: staff.into(),
            date,
            check_in_at: None,
            check_out_at: None,
            check_in_location: None,
            check_out_location: None,
            is_late: false,
            late_minutes: 0,
            verified: false,
            verified_at: None,
            notes: None,
        }
    }

    /// Returns true if the record carries a check-in.
    pub fn has_check_in(&self) -> bool {
        self.check_in_at.is_some()
    }

    /// Returns true if the record carries a check-out.
    pub fn has_check_out(&self) -> bool {
        self.check_out_at.is_some()
    }

    /// Appends a note, separating entries with a newline.
    pub fn append_note(&mut self, note: &str) {
        match &mut self.notes {
            Some(existing) => {
                existing.push('\n');
                existing.push_str(note);
            }
            None => self.notes = Some(note.to_string()),
        }
    }
}
