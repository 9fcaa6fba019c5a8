//! Monthly payroll.
//!
//! The calculator turns an attendance summary (or manually entered
//! figures) into a payslip under the configured payroll policy; the store
//! enforces one payslip per staff member per month; the notifier delivers
//! best-effort salary notices after a save.

mod calculator;
mod notify;
mod store;

pub use calculator::{
    AttendanceMonth, CalculatedPayslipInput, ManualPayslipInput, build_calculated, build_manual,
    month_bounds, net_pay, summarize_month,
};
pub use notify::{FailingNotifier, NoopNotifier, RecordingNotifier, SalaryNotice, SalaryNotifier};
pub use store::PayslipStore;
