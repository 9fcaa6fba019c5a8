//! Response types for the engine API.
//!
//! This module defines the success envelopes, the error response
//! structures and the mapping from engine errors to HTTP statuses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::models::{AttendanceRecord, DayOverride, Payslip, WeeklySchedule};
use crate::payroll::AttendanceMonth;
use crate::scheduling::{PropagationReport, ScheduleIssue};

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    /// Conflict list for rejected schedule saves.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issues: Option<Vec<ScheduleIssue>>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
            issues: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
            issues: None,
        }
    }

    /// Creates the error returned when a schedule save is blocked by
    /// conflicts.
    pub fn schedule_conflicts(issues: Vec<ScheduleIssue>) -> Self {
        Self {
            code: "SCHEDULE_CONFLICTS".to_string(),
            message: format!("Schedule has {} unresolved conflict(s)", issues.len()),
            details: None,
            issues: Some(issues),
        }
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }
}

/// API error with HTTP status code.
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        match error {
            EngineError::ConfigNotFound { path } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "CONFIG_ERROR",
                    "Configuration error",
                    format!("Configuration file not found: {}", path),
                ),
            },
            EngineError::ConfigParseError { path, message } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "CONFIG_ERROR",
                    "Configuration parse error",
                    format!("Failed to parse {}: {}", path, message),
                ),
            },
            EngineError::ScheduleNotFound { group, week_start } => ApiErrorResponse {
                status: StatusCode::NOT_FOUND,
                error: ApiError::new(
                    "SCHEDULE_NOT_FOUND",
                    format!(
                        "Schedule not found for group '{}' in week starting {}",
                        group, week_start
                    ),
                ),
            },
            EngineError::WeekInPast {
                week_start,
                earliest,
            } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::with_details(
                    "WEEK_IN_PAST",
                    format!("Cannot schedule week starting {}", week_start),
                    format!("Weeks before {} are closed for scheduling", earliest),
                ),
            },
            EngineError::OverrideOutOfRange { date, week_start } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::new(
                    "OVERRIDE_OUT_OF_RANGE",
                    format!(
                        "Override date {} is outside the week starting {}",
                        date, week_start
                    ),
                ),
            },
            EngineError::NoShiftAssigned { staff, date } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::new(
                    "NO_SHIFT_ASSIGNED",
                    format!("No shift assigned to staff '{}' on {}", staff, date),
                ),
            },
            EngineError::AttendanceNotFound { id } => ApiErrorResponse {
                status: StatusCode::NOT_FOUND,
                error: ApiError::new(
                    "ATTENDANCE_NOT_FOUND",
                    format!("Attendance record not found: {}", id),
                ),
            },
            EngineError::DuplicatePayslip { staff, year, month } => ApiErrorResponse {
                status: StatusCode::CONFLICT,
                error: ApiError::new(
                    "DUPLICATE_PAYSLIP",
                    format!(
                        "Payslip already exists for staff '{}' in {}/{}",
                        staff, month, year
                    ),
                ),
            },
            EngineError::InvalidPeriod { year, month } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::new(
                    "INVALID_PERIOD",
                    format!("Invalid payroll period {}/{}", month, year),
                ),
            },
            EngineError::NotificationFailed { message } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "NOTIFICATION_FAILED",
                    "Salary notification failed",
                    message,
                ),
            },
        }
    }
}

/// Response body for `POST /schedules`.
#[derive(Debug, Clone, Serialize)]
pub struct UpsertScheduleResponse {
    /// The stored schedule for the template week.
    pub schedule: WeeklySchedule,
    /// What happened to each requested week.
    pub propagation: PropagationReport,
}

/// Response body for override mutations.
#[derive(Debug, Clone, Serialize)]
pub struct OverridesResponse {
    /// Overrides removed by the request (0 or 1 for removals, 0 for adds).
    pub removed: usize,
    /// The schedule's override list after the change.
    pub overrides: Vec<DayOverride>,
}

/// Response body for `GET /attendance`.
#[derive(Debug, Clone, Serialize)]
pub struct AttendanceListResponse {
    /// The matching records, ordered by staff then date.
    pub records: Vec<AttendanceRecord>,
}

/// Response body for `GET /payroll/calculate`.
#[derive(Debug, Clone, Serialize)]
pub struct PayrollCalculationResponse {
    /// Days with a check-in during the month.
    pub working_days: u32,
    /// The dates counted, in ascending order.
    pub days: Vec<chrono::NaiveDate>,
    /// The payslip the figures would produce. Not saved.
    pub payslip: Payslip,
}

impl PayrollCalculationResponse {
    /// Builds the response from a month summary and the resulting payslip.
    pub fn new(summary: AttendanceMonth, payslip: Payslip) -> Self {
        Self {
            working_days: summary.working_days,
            days: summary.days,
            payslip,
        }
    }
}

/// Response body for `POST /payroll/payslips`.
#[derive(Debug, Clone, Serialize)]
pub struct PayslipResponse {
    /// The saved payslip.
    pub payslip: Payslip,
    /// Whether the best-effort salary notice was delivered.
    pub notification_sent: bool,
}
