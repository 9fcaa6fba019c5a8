//! Application state for the engine API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use crate::attendance::AttendanceLedger;
use crate::config::EngineConfig;
use crate::payroll::{NoopNotifier, PayslipStore, SalaryNotifier};
use crate::scheduling::ScheduleStore;
use crate::time::{Clock, SystemClock};

/// Shared application state.
///
/// Contains the configuration, the in-memory stores, the notification
/// channel and the clock every gate decision is judged against.
#[derive(Clone)]
pub struct AppState {
    config: Arc<EngineConfig>,
    schedules: Arc<ScheduleStore>,
    ledger: Arc<AttendanceLedger>,
    payslips: Arc<PayslipStore>,
    notifier: Arc<dyn SalaryNotifier>,
    clock: Arc<dyn Clock>,
}

impl AppState {
    /// Creates a new application state with empty stores, the system
    /// clock and no notification channel.
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config: Arc::new(config),
            schedules: Arc::new(ScheduleStore::new()),
            ledger: Arc::new(AttendanceLedger::new()),
            payslips: Arc::new(PayslipStore::new()),
            notifier: Arc::new(NoopNotifier),
            clock: Arc::new(SystemClock),
        }
    }

    /// Replaces the clock. Tests use this to pin the server time.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Replaces the salary notification channel.
    pub fn with_notifier(mut self, notifier: Arc<dyn SalaryNotifier>) -> Self {
        self.notifier = notifier;
        self
    }

    /// Returns the engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Returns the schedule store.
    pub fn schedules(&self) -> &ScheduleStore {
        &self.schedules
    }

    /// Returns the attendance ledger.
    pub fn ledger(&self) -> &AttendanceLedger {
        &self.ledger
    }

    /// Returns the payslip store.
    pub fn payslips(&self) -> &PayslipStore {
        &self.payslips
    }

    /// Returns the salary notification channel.
    pub fn notifier(&self) -> &dyn SalaryNotifier {
        self.notifier.as_ref()
    }

    /// Returns the server clock.
    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }
}
