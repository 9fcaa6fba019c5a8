//! Core data models for the scheduling, attendance and payroll engine.
//!
//! This module contains all the domain models used throughout the engine.

mod attendance;
mod payslip;
mod schedule;

pub use attendance::AttendanceRecord;
pub use payslip::{Payslip, PayslipSource};
pub use schedule::{
    Assignment, DayOverride, ScheduleTask, ShiftType, StaffGroup, WeeklySchedule, week_start_of,
};
