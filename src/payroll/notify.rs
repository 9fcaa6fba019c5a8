//! Best-effort salary notifications.
//!
//! After a payslip is saved, the staff member is told their salary is
//! ready. Delivery is strictly best-effort: a failed notification is
//! logged and reported in the response, and must never turn a successful
//! save into a failure.

use std::sync::Mutex;

use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};

/// The notification payload sent after a payslip save.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SalaryNotice {
    /// Opaque reference to the staff member.
    pub staff: String,
    /// The payroll year.
    pub year: i32,
    /// The payroll month.
    pub month: u32,
    /// Gross salary on the payslip.
    pub gross_salary: Decimal,
    /// Net pay on the payslip.
    pub net_pay: Decimal,
    /// Id of the saved payslip.
    pub payslip_id: Uuid,
}

/// Delivery channel for salary notices.
pub trait SalaryNotifier: Send + Sync {
    /// Delivers a notice. Failures are reported, never panicked on.
    fn send(&self, notice: &SalaryNotice) -> EngineResult<()>;
}

/// A notifier that discards every notice. The default channel when none
/// is configured.
#[derive(Debug, Default)]
pub struct NoopNotifier;

impl SalaryNotifier for NoopNotifier {
    fn send(&self, _notice: &SalaryNotice) -> EngineResult<()> {
        Ok(())
    }
}

/// A notifier that records every notice it is given, for tests.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<SalaryNotice>>,
}

impl RecordingNotifier {
    /// Creates an empty recording notifier.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the notices delivered so far.
    pub fn notices(&self) -> Vec<SalaryNotice> {
        self.notices.lock().expect("notifier lock poisoned").clone()
    }
}

impl SalaryNotifier for RecordingNotifier {
    fn send(&self, notice: &SalaryNotice) -> EngineResult<()> {
        self.notices
            .lock()
            .expect("notifier lock poisoned")
            .push(notice.clone());
        Ok(())
    }
}

/// A notifier that always fails, for exercising the best-effort path.
#[derive(Debug, Default)]
pub struct FailingNotifier;

impl SalaryNotifier for FailingNotifier {
    fn send(&self, _notice: &SalaryNotice) -> EngineResult<()> {
        Err(EngineError::NotificationFailed {
            message: "channel unavailable".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_notice() -> SalaryNotice {
        SalaryNotice {
            staff: "stf_001".to_string(),
            year: 2025,
            month: 1,
            gross_salary: Decimal::new(17600, 0),
            net_pay: Decimal::new(17100, 0),
            payslip_id: Uuid::new_v4(),
        }
    }

    #[test]
    fn test_noop_notifier_always_succeeds() {
        assert!(NoopNotifier.send(&make_notice()).is_ok());
    }

    #[test]
    fn test_recording_notifier_captures_notices() {
        let notifier = RecordingNotifier::new();
        let notice = make_notice();
        notifier.send(&notice).unwrap();

        let recorded = notifier.notices();
        assert_eq!(recorded.len(), 1);
        assert_eq!(recorded[0], notice);
    }

    #[test]
    fn test_failing_notifier_reports_delivery_failure() {
        let result = FailingNotifier.send(&make_notice());
        assert!(matches!(result, Err(EngineError::NotificationFailed { .. })));
    }
}
