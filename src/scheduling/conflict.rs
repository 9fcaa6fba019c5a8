//! Conflict detection for weekly schedule drafts.
//!
//! The validator is a pure function over a raw edit draft. It runs on
//! every keystroke of the schedule editor and once more server-side
//! immediately before a save, so it performs no I/O and allocates only the
//! issue list it returns. A save is blocked while the list is non-empty.

use std::collections::HashMap;

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::config::SchedulingSettings;
use crate::models::{Assignment, ShiftType};

/// One row of the assignment editor, as entered.
///
/// The shift type is kept as the raw string so the validator can report
/// invalid values instead of failing deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentDraft {
    /// The staff id as typed.
    pub staff: String,
    /// The shift type as typed ("morning"/"evening", any case).
    pub shift_type: String,
}

/// A proposed weekly schedule, before validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleDraft {
    /// Start of the morning shift.
    pub morning_start: NaiveTime,
    /// End of the morning shift.
    pub morning_end: NaiveTime,
    /// Start of the evening shift.
    pub evening_start: NaiveTime,
    /// End of the evening shift.
    pub evening_end: NaiveTime,
    /// The assignment rows as entered.
    pub assignments: Vec<AssignmentDraft>,
    /// How many weeks the template should be committed for.
    pub repeat_weeks: u32,
}

impl ScheduleDraft {
    /// Converts the draft's assignment rows to typed assignments.
    ///
    /// Returns `None` if any row fails to parse; callers run
    /// [`validate_draft`] first, which reports those rows as issues.
    pub fn typed_assignments(&self) -> Option<Vec<Assignment>> {
        self.assignments
            .iter()
            .map(|row| {
                let shift_type: ShiftType = row.shift_type.parse().ok()?;
                Some(Assignment {
                    staff: row.staff.trim().to_string(),
                    shift_type,
                })
            })
            .collect()
    }
}

/// The kind of a detected schedule issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    /// An assignment row has an empty staff id.
    EmptyStaffId,
    /// A staff id contains whitespace.
    WhitespaceInStaffId,
    /// A shift type is missing or not morning/evening.
    InvalidShiftType,
    /// The same staff id appears in more than one assignment row.
    DuplicateStaff,
    /// The morning window does not end after it starts.
    MorningWindow,
    /// The evening window does not end after it starts.
    EveningWindow,
    /// The repeat-weeks count is out of bounds.
    RepeatCount,
}

/// One detected problem in a schedule draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleIssue {
    /// What kind of problem was found.
    pub kind: IssueKind,
    /// The zero-based assignment row the issue refers to, where applicable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row: Option<usize>,
    /// Human-readable description for the edit screen.
    pub message: String,
}

impl ScheduleIssue {
    fn row(kind: IssueKind, row: usize, message: String) -> Self {
        Self {
            kind,
            row: Some(row),
            message,
        }
    }

    fn global(kind: IssueKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            row: None,
            message: message.into(),
        }
    }
}

/// Validates a schedule draft, returning every detected issue.
///
/// The returned list is empty exactly when: every staff id is non-empty,
/// whitespace-free and unique across rows; every shift type parses; both
/// time windows end strictly after they start; and the repeat count lies
/// within the configured bounds (1-12 by default).
///
/// # Example
///
/// ```
/// use chrono::NaiveTime;
/// use roster_engine::config::SchedulingSettings;
/// use roster_engine::scheduling::{AssignmentDraft, ScheduleDraft, validate_draft};
///
/// let draft = ScheduleDraft {
///     morning_start: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
///     morning_end: NaiveTime::from_hms_opt(13, 0, 0).unwrap(),
///     evening_start: NaiveTime::from_hms_opt(13, 30, 0).unwrap(),
///     evening_end: NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
///     assignments: vec![AssignmentDraft {
///         staff: "stf_a".to_string(),
///         shift_type: "morning".to_string(),
///     }],
///     repeat_weeks: 3,
/// };
///
/// assert!(validate_draft(&draft, &SchedulingSettings::default()).is_empty());
/// ```
pub fn validate_draft(draft: &ScheduleDraft, bounds: &SchedulingSettings) -> Vec<ScheduleIssue> {
    let mut issues = Vec::new();
    let mut seen: HashMap<String, u32> = HashMap::new();

    for (idx, row) in draft.assignments.iter().enumerate() {
        let trimmed = row.staff.trim();
        if trimmed.is_empty() {
            issues.push(ScheduleIssue::row(
                IssueKind::EmptyStaffId,
                idx,
                format!("Row {}: staff id is required", idx + 1),
            ));
        } else if row.staff.chars().any(char::is_whitespace) {
            issues.push(ScheduleIssue::row(
                IssueKind::WhitespaceInStaffId,
                idx,
                format!("Row {}: staff id must not contain whitespace", idx + 1),
            ));
        }

        if !trimmed.is_empty() {
            *seen.entry(trimmed.to_string()).or_insert(0) += 1;
        }

        if row.shift_type.parse::<ShiftType>().is_err() {
            issues.push(ScheduleIssue::row(
                IssueKind::InvalidShiftType,
                idx,
                format!("Row {}: invalid shift type '{}'", idx + 1, row.shift_type),
            ));
        }
    }

    // Duplicates are counted per staff id regardless of shift.
    let mut duplicates: Vec<(&String, u32)> =
        seen.iter().filter(|&(_, &n)| n > 1).map(|(s, &n)| (s, n)).collect();
    duplicates.sort();
    for (staff, count) in duplicates {
        issues.push(ScheduleIssue::global(
            IssueKind::DuplicateStaff,
            format!("Staff {} appears {} times", staff, count),
        ));
    }

    if draft.morning_end <= draft.morning_start {
        issues.push(ScheduleIssue::global(
            IssueKind::MorningWindow,
            "Morning end must be after morning start",
        ));
    }
    if draft.evening_end <= draft.evening_start {
        issues.push(ScheduleIssue::global(
            IssueKind::EveningWindow,
            "Evening end must be after evening start",
        ));
    }

    if !bounds.repeat_in_bounds(draft.repeat_weeks) {
        issues.push(ScheduleIssue::global(
            IssueKind::RepeatCount,
            format!(
                "Repeat weeks must be between {} and {}",
                bounds.min_repeat_weeks, bounds.max_repeat_weeks
            ),
        ));
    }

    issues
}
