//! Payroll calculation.
//!
//! All amounts use [`Decimal`] arithmetic; floats never touch money. The
//! calculator is pure: it takes an attendance summary (or manual figures)
//! plus the payroll policy and produces a finished [`Payslip`].

use chrono::{Days, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use tracing::info;

use crate::config::PayrollSettings;
use crate::error::{EngineError, EngineResult};
use crate::models::{AttendanceRecord, Payslip, PayslipSource, StaffGroup};
use uuid::Uuid;

/// An attendance ledger summarized for one payroll month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttendanceMonth {
    /// Number of days with a check-in.
    pub working_days: u32,
    /// The dates counted, in ascending order.
    pub days: Vec<NaiveDate>,
}

/// Summarizes attendance records into a payroll month.
///
/// A day counts as worked when its record carries a check-in; check-out
/// and verification status do not affect the count.
pub fn summarize_month(records: &[AttendanceRecord]) -> AttendanceMonth {
    let mut days: Vec<NaiveDate> = records
        .iter()
        .filter(|r| r.check_in_at.is_some())
        .map(|r| r.date)
        .collect();
    days.sort();
    days.dedup();

    AttendanceMonth {
        working_days: days.len() as u32,
        days,
    }
}

/// Returns the first and last day of a calendar month.
///
/// Fails with [`EngineError::InvalidPeriod`] for months outside 1-12 or
/// years the calendar cannot represent.
pub fn month_bounds(year: i32, month: u32) -> EngineResult<(NaiveDate, NaiveDate)> {
    let first =
        NaiveDate::from_ymd_opt(year, month, 1).ok_or(EngineError::InvalidPeriod { year, month })?;
    let next_month = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }
    .ok_or(EngineError::InvalidPeriod { year, month })?;

    Ok((first, next_month - Days::new(1)))
}

/// Inputs for a ledger-driven payslip.
#[derive(Debug, Clone)]
pub struct CalculatedPayslipInput {
    /// Opaque reference to the staff member.
    pub staff: String,
    /// The staff group the payslip is issued under.
    pub group: StaffGroup,
    /// The payroll year.
    pub year: i32,
    /// The payroll month (1-12).
    pub month: u32,
    /// The daily wage for rate-paid groups.
    pub daily_wage: Decimal,
    /// Externally supplied gross for monthly-paid groups.
    pub system_gross: Option<Decimal>,
    /// Salary advance already paid out.
    pub advance: Decimal,
}

/// Inputs for a manually entered payslip.
#[derive(Debug, Clone)]
pub struct ManualPayslipInput {
    /// Opaque reference to the staff member.
    pub staff: String,
    /// The staff group the payslip is issued under.
    pub group: StaffGroup,
    /// The payroll year.
    pub year: i32,
    /// The payroll month (1-12).
    pub month: u32,
    /// Manually entered count of days worked.
    pub working_days: u32,
    /// The daily wage.
    pub daily_wage: Decimal,
    /// Overtime hours worked.
    pub overtime_hours: Decimal,
    /// Pay per overtime hour.
    pub overtime_rate: Decimal,
    /// Bonus amount.
    pub bonus: Decimal,
    /// Total deductions.
    pub deductions: Decimal,
    /// Salary advance already paid out.
    pub advance: Decimal,
}

/// Net pay: gross minus deductions and advance, floored at zero.
pub fn net_pay(gross: Decimal, deductions: Decimal, advance: Decimal) -> Decimal {
    (gross - deductions - advance).max(Decimal::ZERO)
}

/// Builds a payslip from a month of attendance.
///
/// Rate-paid groups earn `working_days x daily_wage`; monthly-paid groups
/// use `system_gross` when supplied and fall back to days times wage
/// otherwise. Ledger-driven payslips carry no overtime, bonus or
/// deduction components.
pub fn build_calculated(
    input: &CalculatedPayslipInput,
    summary: &AttendanceMonth,
    policy: &PayrollSettings,
    created_at: NaiveDateTime,
) -> EngineResult<Payslip> {
    month_bounds(input.year, input.month)?;

    let days_pay = Decimal::from(summary.working_days) * input.daily_wage;
    let gross = if policy.is_rate_paid(input.group) {
        days_pay
    } else {
        input.system_gross.unwrap_or(days_pay)
    };
    let net = net_pay(gross, Decimal::ZERO, input.advance);

    info!(
        staff = %input.staff,
        group = %input.group,
        year = input.year,
        month = input.month,
        working_days = summary.working_days,
        gross = %gross,
        net = %net,
        "Calculated payslip"
    );

    Ok(Payslip {
        id: Uuid::new_v4(),
        staff: input.staff.clone(),
        group: input.group,
        year: input.year,
        month: input.month,
        source: PayslipSource::Calculated,
        working_days: summary.working_days,
        daily_wage: input.daily_wage,
        overtime_hours: Decimal::ZERO,
        overtime_rate: Decimal::ZERO,
        bonus: Decimal::ZERO,
        deductions: Decimal::ZERO,
        salary_advance: input.advance,
        gross_salary: gross,
        net_pay: net,
        created_at,
    })
}

/// Builds a payslip from manually entered figures.
///
/// Groups under the zero-overtime policy have their overtime and bonus
/// forced to zero before the gross is computed, regardless of what was
/// entered.
pub fn build_manual(
    input: &ManualPayslipInput,
    policy: &PayrollSettings,
    created_at: NaiveDateTime,
) -> EngineResult<Payslip> {
    month_bounds(input.year, input.month)?;

    let (overtime_hours, overtime_rate, bonus) = if policy.zeroes_overtime(input.group) {
        (Decimal::ZERO, Decimal::ZERO, Decimal::ZERO)
    } else {
        (input.overtime_hours, input.overtime_rate, input.bonus)
    };

    let gross = Decimal::from(input.working_days) * input.daily_wage
        + overtime_hours * overtime_rate
        + bonus;
    let net = net_pay(gross, input.deductions, input.advance);

    info!(
        staff = %input.staff,
        group = %input.group,
        year = input.year,
        month = input.month,
        gross = %gross,
        net = %net,
        "Built manual payslip"
    );

    Ok(Payslip {
        id: Uuid::new_v4(),
        staff: input.staff.clone(),
        group: input.group,
        year: input.year,
        month: input.month,
        source: PayslipSource::Manual,
        working_days: input.working_days,
        daily_wage: input.daily_wage,
        overtime_hours,
        overtime_rate,
        bonus,
        deductions: input.deductions,
        salary_advance: input.advance,
        gross_salary: gross,
        net_pay: net,
        created_at,
    })
}
