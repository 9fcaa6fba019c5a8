//! Payslip model.
//!
//! A payslip is the flat, serializable outcome of a payroll calculation.
//! Boundary layers (export, print) consume it directly without re-deriving
//! any of the amounts. Payslips are append-only: corrections are issued as
//! new payslips, never edits.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::schedule::StaffGroup;

/// How a payslip's amounts were produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayslipSource {
    /// Derived from the attendance ledger.
    Calculated,
    /// Entered by hand, bypassing the ledger (correction/backfill).
    Manual,
}

/// A single month's pay for one staff member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payslip {
    /// Unique identifier for the payslip.
    pub id: Uuid,
    /// Opaque reference to the staff member.
    pub staff: String,
    /// The staff group the payslip was issued under.
    pub group: StaffGroup,
    /// The payroll year.
    pub year: i32,
    /// The payroll month (1-12).
    pub month: u32,
    /// How the amounts were produced.
    pub source: PayslipSource,
    /// Days with an attendance check-in (or the manually entered count).
    pub working_days: u32,
    /// The daily wage used for base pay.
    pub daily_wage: Decimal,
    /// Overtime hours worked; zero for groups where overtime does not apply.
    pub overtime_hours: Decimal,
    /// Pay per overtime hour.
    pub overtime_rate: Decimal,
    /// Bonus amount; zero for groups where bonuses do not apply.
    pub bonus: Decimal,
    /// Total deductions.
    pub deductions: Decimal,
    /// Salary advance already paid out.
    pub salary_advance: Decimal,
    /// Total pay before deductions and advance.
    pub gross_salary: Decimal,
    /// Gross minus deductions and advance, floored at zero.
    pub net_pay: Decimal,
    /// When the payslip was created.
    pub created_at: NaiveDateTime,
}
