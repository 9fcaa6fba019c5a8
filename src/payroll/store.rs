//! Append-only payslip store.
//!
//! One payslip per `(staff, year, month)`; a second save for the same
//! period is refused so payroll can never double-issue a month.

use std::sync::RwLock;

use tracing::info;

use crate::error::{EngineError, EngineResult};
use crate::models::Payslip;

/// Thread-safe, append-only collection of saved payslips.
#[derive(Debug, Default)]
pub struct PayslipStore {
    slips: RwLock<Vec<Payslip>>,
}

impl PayslipStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a payslip.
    ///
    /// Fails with [`EngineError::DuplicatePayslip`] when one already
    /// exists for the same staff member and period.
    pub fn append(&self, payslip: Payslip) -> EngineResult<Payslip> {
        let mut slips = self.slips.write().expect("payslip store lock poisoned");

        if slips.iter().any(|p| {
            p.staff == payslip.staff && p.year == payslip.year && p.month == payslip.month
        }) {
            return Err(EngineError::DuplicatePayslip {
                staff: payslip.staff,
                year: payslip.year,
                month: payslip.month,
            });
        }

        info!(
            staff = %payslip.staff,
            year = payslip.year,
            month = payslip.month,
            net_pay = %payslip.net_pay,
            "Saved payslip"
        );

        slips.push(payslip.clone());
        Ok(payslip)
    }

    /// Returns all payslips for a staff member, in save order.
    pub fn for_staff(&self, staff: &str) -> Vec<Payslip> {
        self.slips
            .read()
            .expect("payslip store lock poisoned")
            .iter()
            .filter(|p| p.staff == staff)
            .cloned()
            .collect()
    }

    /// Returns the number of saved payslips.
    pub fn len(&self) -> usize {
        self.slips.read().expect("payslip store lock poisoned").len()
    }

    /// Returns true if no payslips are saved.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
