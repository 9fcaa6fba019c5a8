//! HTTP API module for the scheduling, attendance and payroll engine.
//!
//! This module provides the REST endpoints for managing weekly schedules
//! and overrides, recording time-gated attendance, and producing monthly
//! payslips.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{
    AddOverrideRequest, AdminMarkRequest, AssignmentEntry, AttendanceQuery, CheckRequest,
    PayrollQuery, PayslipRequest, RemoveOverrideRequest, ScheduleQuery, UpsertScheduleRequest,
    VerifyRequest,
};
pub use response::{
    ApiError, AttendanceListResponse, OverridesResponse, PayrollCalculationResponse,
    PayslipResponse, UpsertScheduleResponse,
};
pub use state::AppState;
