//! Time-gated attendance.
//!
//! Check-ins and check-outs are only accepted inside short windows
//! anchored at the scheduled shift boundaries, always judged against the
//! server clock. The ledger records one row per staff member per day.

mod gate;
mod ledger;

pub use gate::{GateWindow, LatenessVerdict, WindowState, assess_lateness};
pub use ledger::{AttendanceLedger, CheckOutcome, GateRejection};
