//! HTTP request handlers for the engine API.
//!
//! This module contains the handler functions for the scheduling,
//! attendance and payroll endpoints. Every time-sensitive decision uses
//! the server clock from [`AppState`]; timestamps sent by clients are
//! ignored.

use axum::{
    Json, Router,
    extract::{Query, State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::EngineError;
use crate::models::{DayOverride, WeeklySchedule, week_start_of};
use crate::payroll::{
    CalculatedPayslipInput, ManualPayslipInput, SalaryNotice, build_calculated, build_manual,
    summarize_month,
};
use crate::scheduling::{ScheduleDraft, add_override, propagate_weeks, remove_override,
    resolve_shift, validate_draft};

use super::request::{
    AddOverrideRequest, AdminMarkRequest, AttendanceQuery, CheckRequest, PayrollQuery,
    PayslipRequest, RemoveOverrideRequest, ScheduleQuery, UpsertScheduleRequest, VerifyRequest,
};
use super::response::{
    ApiError, ApiErrorResponse, AttendanceListResponse, OverridesResponse,
    PayrollCalculationResponse, PayslipResponse, UpsertScheduleResponse,
};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/schedules",
            get(get_schedule_handler).post(upsert_schedule_handler),
        )
        .route(
            "/schedules/overrides",
            post(add_override_handler).delete(remove_override_handler),
        )
        .route("/attendance", get(list_attendance_handler))
        .route("/attendance/check-in", post(check_in_handler))
        .route("/attendance/check-out", post(check_out_handler))
        .route("/attendance/admin-mark", post(admin_mark_handler))
        .route("/attendance/verify", post(verify_handler))
        .route("/payroll/calculate", get(calculate_payroll_handler))
        .route("/payroll/payslips", post(save_payslip_handler))
        .with_state(state)
}

fn json_ok<T: serde::Serialize>(body: T) -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
        .into_response()
}

fn engine_error(correlation_id: Uuid, error: EngineError) -> Response {
    warn!(correlation_id = %correlation_id, error = %error, "Request failed");
    let api_error: ApiErrorResponse = error.into();
    (
        api_error.status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(api_error.error),
    )
        .into_response()
}

fn bad_request(error: ApiError) -> Response {
    (
        StatusCode::BAD_REQUEST,
        [(header::CONTENT_TYPE, "application/json")],
        Json(error),
    )
        .into_response()
}

/// Handler for POST /schedules.
///
/// Validates the draft, saves the template week and propagates it for the
/// requested number of consecutive weeks. A draft with unresolved
/// conflicts is rejected wholesale with the conflict list.
async fn upsert_schedule_handler(
    State(state): State<AppState>,
    payload: Result<Json<UpsertScheduleRequest>, JsonRejection>,
) -> impl IntoResponse {
    // Generate correlation ID for request tracking
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing schedule upsert");

    // Handle JSON parsing errors
    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => {
            let error = match rejection {
                JsonRejection::JsonDataError(err) => {
                    let body_text = err.body_text();
                    warn!(
                        correlation_id = %correlation_id,
                        error = %body_text,
                        "JSON data error"
                    );
                    if body_text.contains("missing field") {
                        ApiError::new("VALIDATION_ERROR", body_text)
                    } else {
                        ApiError::malformed_json(body_text)
                    }
                }
                JsonRejection::JsonSyntaxError(err) => {
                    warn!(
                        correlation_id = %correlation_id,
                        error = %err,
                        "JSON syntax error"
                    );
                    ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
                }
                JsonRejection::MissingJsonContentType(_) => ApiError::new(
                    "MISSING_CONTENT_TYPE",
                    "Content-Type must be application/json",
                ),
                _ => ApiError::malformed_json("Failed to parse request body"),
            };
            return bad_request(error);
        }
    };

    let draft = ScheduleDraft {
        morning_start: request.morning_start,
        morning_end: request.morning_end,
        evening_start: request.evening_start,
        evening_end: request.evening_end,
        assignments: request.assignments.into_iter().map(Into::into).collect(),
        repeat_weeks: request.repeat_weeks,
    };

    let issues = validate_draft(&draft, &state.config().scheduling);
    if !issues.is_empty() {
        warn!(
            correlation_id = %correlation_id,
            group = %request.group,
            conflicts = issues.len(),
            "Schedule upsert rejected with conflicts"
        );
        return bad_request(ApiError::schedule_conflicts(issues));
    }

    // A clean validation guarantees every row parses.
    let Some(assignments) = draft.typed_assignments() else {
        return bad_request(ApiError::new(
            "VALIDATION_ERROR",
            "Assignment rows could not be parsed",
        ));
    };

    let template = WeeklySchedule {
        group: request.group,
        week_start: week_start_of(request.week_start),
        morning_start: request.morning_start,
        morning_end: request.morning_end,
        evening_start: request.evening_start,
        evening_end: request.evening_end,
        task: request.task,
        assignments,
        overrides: vec![],
    };

    let propagation = propagate_weeks(state.schedules(), &template, draft.repeat_weeks);
    if propagation.committed.is_empty() {
        let message = propagation
            .failed
            .map(|f| f.message)
            .unwrap_or_else(|| "No weeks were committed".to_string());
        return bad_request(ApiError::new("PROPAGATION_FAILED", message));
    }

    let schedule = match state.schedules().get(template.group, template.week_start) {
        Ok(schedule) => schedule,
        Err(err) => return engine_error(correlation_id, err),
    };

    info!(
        correlation_id = %correlation_id,
        group = %schedule.group,
        week_start = %schedule.week_start,
        weeks = propagation.committed.len(),
        complete = propagation.is_complete(),
        "Schedule upsert completed"
    );

    json_ok(UpsertScheduleResponse {
        schedule,
        propagation,
    })
}

/// Handler for GET /schedules.
async fn get_schedule_handler(
    State(state): State<AppState>,
    Query(query): Query<ScheduleQuery>,
) -> impl IntoResponse {
    let correlation_id = Uuid::new_v4();

    match state.schedules().get(query.group, query.week_start) {
        Ok(schedule) => json_ok(schedule),
        Err(err) => engine_error(correlation_id, err),
    }
}

/// Handler for POST /schedules/overrides.
async fn add_override_handler(
    State(state): State<AppState>,
    Json(request): Json<AddOverrideRequest>,
) -> impl IntoResponse {
    let correlation_id = Uuid::new_v4();

    let day_override = DayOverride {
        date: request.date,
        staff: request.staff,
        shift_type: request.shift_type,
    };

    match add_override(
        state.schedules(),
        request.group,
        request.week_start,
        day_override,
    ) {
        Ok(overrides) => json_ok(OverridesResponse {
            removed: 0,
            overrides,
        }),
        Err(err) => engine_error(correlation_id, err),
    }
}

/// Handler for DELETE /schedules/overrides.
async fn remove_override_handler(
    State(state): State<AppState>,
    Json(request): Json<RemoveOverrideRequest>,
) -> impl IntoResponse {
    let correlation_id = Uuid::new_v4();

    match remove_override(
        state.schedules(),
        request.group,
        request.week_start,
        request.date,
        &request.staff,
    ) {
        Ok((removed, overrides)) => json_ok(OverridesResponse { removed, overrides }),
        Err(err) => engine_error(correlation_id, err),
    }
}

/// Handler for POST /attendance/check-in.
///
/// The moment of the check-in is the server's current time; gate
/// refusals come back as 200 responses with a rejected status.
async fn check_in_handler(
    State(state): State<AppState>,
    Json(request): Json<CheckRequest>,
) -> impl IntoResponse {
    let correlation_id = Uuid::new_v4();
    let now = state.clock().now();

    let schedule = match state.schedules().week_for_date(request.group, now.date()) {
        Ok(schedule) => schedule,
        Err(err) => return engine_error(correlation_id, err),
    };

    match state.ledger().check_in(
        &schedule,
        &state.config().gate,
        &request.staff,
        now,
        request.location,
        request.notes,
    ) {
        Ok(outcome) => json_ok(outcome),
        Err(err) => engine_error(correlation_id, err),
    }
}

/// Handler for POST /attendance/check-out.
async fn check_out_handler(
    State(state): State<AppState>,
    Json(request): Json<CheckRequest>,
) -> impl IntoResponse {
    let correlation_id = Uuid::new_v4();
    let now = state.clock().now();

    let schedule = match state.schedules().week_for_date(request.group, now.date()) {
        Ok(schedule) => schedule,
        Err(err) => return engine_error(correlation_id, err),
    };

    match state.ledger().check_out(
        &schedule,
        &state.config().gate,
        &request.staff,
        now,
        request.location,
        request.notes,
    ) {
        Ok(outcome) => json_ok(outcome),
        Err(err) => engine_error(correlation_id, err),
    }
}

/// Handler for GET /attendance.
async fn list_attendance_handler(
    State(state): State<AppState>,
    Query(query): Query<AttendanceQuery>,
) -> impl IntoResponse {
    let records = state
        .ledger()
        .range(query.staff.as_deref(), query.from, query.to);
    json_ok(AttendanceListResponse { records })
}

/// Handler for POST /attendance/admin-mark.
///
/// Bypasses the gate windows; lateness is re-assessed when the group's
/// schedule covers the marked date.
async fn admin_mark_handler(
    State(state): State<AppState>,
    Json(request): Json<AdminMarkRequest>,
) -> impl IntoResponse {
    let correlation_id = Uuid::new_v4();
    let now = state.clock().now();

    let scheduled_start = request.group.and_then(|group| {
        let schedule = state.schedules().week_for_date(group, request.date).ok()?;
        let shift = resolve_shift(&schedule, &request.staff, request.date)?;
        let (start, _) = schedule.shift_window(shift);
        Some(request.date.and_time(start))
    });

    let record = state.ledger().admin_mark(
        &request.staff,
        request.date,
        request.check_in_at,
        request.check_out_at,
        request.notes,
        request.verified,
        scheduled_start,
        now,
    );

    info!(
        correlation_id = %correlation_id,
        staff = %record.staff,
        date = %record.date,
        "Admin mark applied"
    );

    json_ok(record)
}

/// Handler for POST /attendance/verify.
async fn verify_handler(
    State(state): State<AppState>,
    Json(request): Json<VerifyRequest>,
) -> impl IntoResponse {
    let correlation_id = Uuid::new_v4();
    let now = state.clock().now();

    match state
        .ledger()
        .verify(request.attendance_id, request.verified, now)
    {
        Ok(record) => json_ok(record),
        Err(err) => engine_error(correlation_id, err),
    }
}

/// Handler for GET /payroll/calculate.
///
/// Computes a payslip from the attendance ledger without saving it.
async fn calculate_payroll_handler(
    State(state): State<AppState>,
    Query(query): Query<PayrollQuery>,
) -> impl IntoResponse {
    let correlation_id = Uuid::new_v4();
    let now = state.clock().now();

    let records = state.ledger().monthly(&query.staff, query.year, query.month);
    let summary = summarize_month(&records);

    let input = CalculatedPayslipInput {
        staff: query.staff,
        group: query.group,
        year: query.year,
        month: query.month,
        daily_wage: query.daily_wage,
        system_gross: query.system_gross,
        advance: query.advance,
    };

    match build_calculated(&input, &summary, &state.config().payroll, now) {
        Ok(payslip) => json_ok(PayrollCalculationResponse::new(summary, payslip)),
        Err(err) => engine_error(correlation_id, err),
    }
}

/// Handler for POST /payroll/payslips.
///
/// Builds the payslip (from the ledger or from manual figures), saves it,
/// then attempts the best-effort salary notice. A failed notice never
/// fails the save.
async fn save_payslip_handler(
    State(state): State<AppState>,
    Json(request): Json<PayslipRequest>,
) -> impl IntoResponse {
    let correlation_id = Uuid::new_v4();
    let now = state.clock().now();

    let built = match request {
        PayslipRequest::Calculated {
            staff,
            group,
            year,
            month,
            daily_wage,
            system_gross,
            advance,
        } => {
            let records = state.ledger().monthly(&staff, year, month);
            let summary = summarize_month(&records);
            let input = CalculatedPayslipInput {
                staff,
                group,
                year,
                month,
                daily_wage,
                system_gross,
                advance,
            };
            build_calculated(&input, &summary, &state.config().payroll, now)
        }
        PayslipRequest::Manual {
            staff,
            group,
            year,
            month,
            working_days,
            daily_wage,
            overtime_hours,
            overtime_rate,
            bonus,
            deductions,
            advance,
        } => {
            let input = ManualPayslipInput {
                staff,
                group,
                year,
                month,
                working_days,
                daily_wage,
                overtime_hours,
                overtime_rate,
                bonus,
                deductions,
                advance,
            };
            build_manual(&input, &state.config().payroll, now)
        }
    };

    let payslip = match built {
        Ok(payslip) => payslip,
        Err(err) => return engine_error(correlation_id, err),
    };

    let payslip = match state.payslips().append(payslip) {
        Ok(payslip) => payslip,
        Err(err) => return engine_error(correlation_id, err),
    };

    let notice = SalaryNotice {
        staff: payslip.staff.clone(),
        year: payslip.year,
        month: payslip.month,
        gross_salary: payslip.gross_salary,
        net_pay: payslip.net_pay,
        payslip_id: payslip.id,
    };

    let notification_sent = match state.notifier().send(&notice) {
        Ok(()) => true,
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                staff = %payslip.staff,
                error = %err,
                "Salary notification failed; payslip save unaffected"
            );
            false
        }
    };

    json_ok(PayslipResponse {
        payslip,
        notification_sent,
    })
}
