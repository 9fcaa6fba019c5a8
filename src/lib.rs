//! Workforce Scheduling, Attendance and Payroll Engine
//!
//! This crate manages weekly shift schedules with conflict validation and
//! week-by-week propagation, records attendance through short server-timed
//! gate windows, and aggregates attendance into monthly payslips.

#![warn(missing_docs)]

pub mod api;
pub mod attendance;
pub mod config;
pub mod error;
pub mod models;
pub mod payroll;
pub mod scheduling;
pub mod time;
