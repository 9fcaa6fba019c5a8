//! Configuration types for the engine.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from the YAML configuration file.

use serde::Deserialize;

use crate::models::StaffGroup;

/// Attendance gate settings.
///
/// The check-in window opens at the scheduled shift start and closes
/// `check_in_grace_minutes` later; the check-out window is anchored to the
/// shift end the same way.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GateSettings {
    /// Length of the check-in window in minutes.
    pub check_in_grace_minutes: i64,
    /// Length of the check-out window in minutes.
    pub check_out_grace_minutes: i64,
}

impl Default for GateSettings {
    fn default() -> Self {
        Self {
            check_in_grace_minutes: 5,
            check_out_grace_minutes: 5,
        }
    }
}

/// Payroll policy settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PayrollSettings {
    /// Groups whose gross is always `working_days x daily_wage`.
    pub rate_paid_groups: Vec<StaffGroup>,
    /// Groups for which overtime and bonus are forced to zero.
    pub zero_overtime_groups: Vec<StaffGroup>,
}

impl PayrollSettings {
    /// Returns true if the group's gross comes from days times wage.
    pub fn is_rate_paid(&self, group: StaffGroup) -> bool {
        self.rate_paid_groups.contains(&group)
    }

    /// Returns true if overtime and bonus are zeroed for the group.
    pub fn zeroes_overtime(&self, group: StaffGroup) -> bool {
        self.zero_overtime_groups.contains(&group)
    }
}

impl Default for PayrollSettings {
    fn default() -> Self {
        Self {
            rate_paid_groups: vec![StaffGroup::Field, StaffGroup::Delivery],
            zero_overtime_groups: vec![StaffGroup::Delivery],
        }
    }
}

/// Scheduling settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SchedulingSettings {
    /// Smallest accepted repeat-weeks count.
    pub min_repeat_weeks: u32,
    /// Largest accepted repeat-weeks count.
    pub max_repeat_weeks: u32,
}

impl SchedulingSettings {
    /// Returns true if `repeat_weeks` lies within the accepted bounds.
    pub fn repeat_in_bounds(&self, repeat_weeks: u32) -> bool {
        repeat_weeks >= self.min_repeat_weeks && repeat_weeks <= self.max_repeat_weeks
    }
}

impl Default for SchedulingSettings {
    fn default() -> Self {
        Self {
            min_repeat_weeks: 1,
            max_repeat_weeks: 12,
        }
    }
}

/// The complete engine configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Attendance gate settings.
    pub gate: GateSettings,
    /// Payroll policy settings.
    pub payroll: PayrollSettings,
    /// Scheduling settings.
    pub scheduling: SchedulingSettings,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_reference_policy() {
        let config = EngineConfig::default();
        assert_eq!(config.gate.check_in_grace_minutes, 5);
        assert_eq!(config.gate.check_out_grace_minutes, 5);
        assert_eq!(config.scheduling.min_repeat_weeks, 1);
        assert_eq!(config.scheduling.max_repeat_weeks, 12);
        assert!(config.payroll.is_rate_paid(StaffGroup::Delivery));
        assert!(config.payroll.is_rate_paid(StaffGroup::Field));
        assert!(!config.payroll.is_rate_paid(StaffGroup::Lab));
        assert!(config.payroll.zeroes_overtime(StaffGroup::Delivery));
        assert!(!config.payroll.zeroes_overtime(StaffGroup::Field));
    }

    #[test]
    fn test_repeat_bounds_are_inclusive() {
        let settings = SchedulingSettings::default();
        assert!(settings.repeat_in_bounds(1));
        assert!(settings.repeat_in_bounds(12));
        assert!(!settings.repeat_in_bounds(0));
        assert!(!settings.repeat_in_bounds(13));
    }

    #[test]
    fn test_partial_yaml_fills_in_defaults() {
        let yaml = "gate:\n  check_in_grace_minutes: 10\n";
        let config: EngineConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.gate.check_in_grace_minutes, 10);
        assert_eq!(config.gate.check_out_grace_minutes, 5);
        assert_eq!(config.scheduling.max_repeat_weeks, 12);
    }
}
