//! In-memory weekly schedule store.
//!
//! Schedules are keyed by `(group, week_start)` and saved with upsert
//! semantics: re-saving a week replaces the template wholesale but keeps
//! any day overrides already punched into the stored copy.

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::NaiveDate;
use tracing::info;

use crate::error::{EngineError, EngineResult};
use crate::models::{StaffGroup, WeeklySchedule, week_start_of};

/// Thread-safe store of weekly schedules keyed by `(group, week_start)`.
#[derive(Debug, Default)]
pub struct ScheduleStore {
    schedules: RwLock<HashMap<(StaffGroup, NaiveDate), WeeklySchedule>>,
    earliest_week: Option<NaiveDate>,
}

impl ScheduleStore {
    /// Creates an empty store with no lower bound on schedulable weeks.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty store that rejects upserts for weeks before
    /// `earliest` (normalized to its week start).
    pub fn with_earliest_week(earliest: NaiveDate) -> Self {
        Self {
            schedules: RwLock::new(HashMap::new()),
            earliest_week: Some(week_start_of(earliest)),
        }
    }

    /// Inserts or replaces the schedule for `(group, week_start)`.
    ///
    /// The week start is normalized to the Sunday of its week before use.
    /// When a schedule already exists for the key, its day overrides are
    /// carried over into the new template; everything else is replaced by
    /// the incoming values. Returns the stored copy.
    pub fn upsert(&self, mut schedule: WeeklySchedule) -> EngineResult<WeeklySchedule> {
        schedule.week_start = week_start_of(schedule.week_start);

        if let Some(earliest) = self.earliest_week {
            if schedule.week_start < earliest {
                return Err(EngineError::WeekInPast {
                    week_start: schedule.week_start,
                    earliest,
                });
            }
        }

        let key = (schedule.group, schedule.week_start);
        let mut schedules = self.schedules.write().expect("schedule store lock poisoned");

        if let Some(existing) = schedules.get(&key) {
            schedule.overrides = existing.overrides.clone();
        }

        info!(
            group = %schedule.group,
            week_start = %schedule.week_start,
            assignments = schedule.assignments.len(),
            "Saved weekly schedule"
        );

        schedules.insert(key, schedule.clone());
        Ok(schedule)
    }

    /// Returns the schedule for `(group, week_start)`.
    ///
    /// The week start is normalized before lookup, so any date within the
    /// week resolves to the same schedule.
    pub fn get(&self, group: StaffGroup, week_start: NaiveDate) -> EngineResult<WeeklySchedule> {
        let week_start = week_start_of(week_start);
        self.schedules
            .read()
            .expect("schedule store lock poisoned")
            .get(&(group, week_start))
            .cloned()
            .ok_or(EngineError::ScheduleNotFound { group, week_start })
    }

    /// Returns the schedule covering `date` for the group.
    pub fn week_for_date(&self, group: StaffGroup, date: NaiveDate) -> EngineResult<WeeklySchedule> {
        self.get(group, week_start_of(date))
    }

    /// Runs a closure against the stored schedule for `(group, week_start)`,
    /// persisting any mutation it makes.
    ///
    /// Returns [`EngineError::ScheduleNotFound`] if no schedule exists for
    /// the key; if the closure fails, the schedule is left untouched only
    /// to the extent the closure left it untouched.
    pub fn with_schedule_mut<T>(
        &self,
        group: StaffGroup,
        week_start: NaiveDate,
        f: impl FnOnce(&mut WeeklySchedule) -> EngineResult<T>,
    ) -> EngineResult<T> {
        let week_start = week_start_of(week_start);
        let mut schedules = self.schedules.write().expect("schedule store lock poisoned");
        let schedule = schedules
            .get_mut(&(group, week_start))
            .ok_or(EngineError::ScheduleNotFound { group, week_start })?;
        f(schedule)
    }

    /// Returns the number of stored schedules.
    pub fn len(&self) -> usize {
        self.schedules
            .read()
            .expect("schedule store lock poisoned")
            .len()
    }

    /// Returns true if no schedules are stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Assignment, DayOverride, ScheduleTask, ShiftType};
    use chrono::NaiveTime;

    fn make_date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn make_time(s: &str) -> NaiveTime {
        NaiveTime::parse_from_str(s, "%H:%M").unwrap()
    }

    fn make_schedule(week_start: &str) -> WeeklySchedule {
        WeeklySchedule {
            group: StaffGroup::Field,
            week_start: make_date(week_start),
            morning_start: make_time("09:00"),
            morning_end: make_time("13:00"),
            evening_start: make_time("13:30"),
            evening_end: make_time("18:00"),
            task: ScheduleTask::General,
            assignments: vec![Assignment {
                staff: "stf_a".to_string(),
                shift_type: ShiftType::Morning,
            }],
            overrides: vec![],
        }
    }

    #[test]
    fn test_upsert_then_get_round_trip() {
        let store = ScheduleStore::new();
        let stored = store.upsert(make_schedule("2025-01-05")).unwrap();

        let fetched = store.get(StaffGroup::Field, make_date("2025-01-05")).unwrap();
        assert_eq!(fetched, stored);
    }

    #[test]
    fn test_upsert_normalizes_week_start_to_sunday() {
        let store = ScheduleStore::new();
        // 2025-01-08 is a Wednesday.
        let stored = store.upsert(make_schedule("2025-01-08")).unwrap();
        assert_eq!(stored.week_start, make_date("2025-01-05"));

        assert!(store.get(StaffGroup::Field, make_date("2025-01-05")).is_ok());
    }

    #[test]
    fn test_get_missing_schedule_returns_not_found() {
        let store = ScheduleStore::new();
        let result = store.get(StaffGroup::Lab, make_date("2025-01-05"));

        match result {
            Err(EngineError::ScheduleNotFound { group, week_start }) => {
                assert_eq!(group, StaffGroup::Lab);
                assert_eq!(week_start, make_date("2025-01-05"));
            }
            other => panic!("Expected ScheduleNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_upsert_is_last_write_wins() {
        let store = ScheduleStore::new();
        store.upsert(make_schedule("2025-01-05")).unwrap();

        let mut second = make_schedule("2025-01-05");
        second.assignments = vec![Assignment {
            staff: "stf_b".to_string(),
            shift_type: ShiftType::Evening,
        }];
        store.upsert(second).unwrap();

        let fetched = store.get(StaffGroup::Field, make_date("2025-01-05")).unwrap();
        assert_eq!(fetched.assignments.len(), 1);
        assert_eq!(fetched.assignments[0].staff, "stf_b");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_upsert_preserves_existing_overrides() {
        let store = ScheduleStore::new();
        let mut first = make_schedule("2025-01-05");
        first.overrides.push(DayOverride {
            date: make_date("2025-01-07"),
            staff: "stf_a".to_string(),
            shift_type: ShiftType::Evening,
        });
        store.upsert(first).unwrap();

        // Re-save the template with no overrides attached.
        let stored = store.upsert(make_schedule("2025-01-05")).unwrap();
        assert_eq!(stored.overrides.len(), 1);
        assert_eq!(stored.overrides[0].date, make_date("2025-01-07"));
    }

    #[test]
    fn test_schedules_are_scoped_per_group() {
        let store = ScheduleStore::new();
        store.upsert(make_schedule("2025-01-05")).unwrap();

        let mut lab = make_schedule("2025-01-05");
        lab.group = StaffGroup::Lab;
        store.upsert(lab).unwrap();

        assert_eq!(store.len(), 2);
        assert!(store.get(StaffGroup::Field, make_date("2025-01-05")).is_ok());
        assert!(store.get(StaffGroup::Lab, make_date("2025-01-05")).is_ok());
        assert!(store.get(StaffGroup::Delivery, make_date("2025-01-05")).is_err());
    }

    #[test]
    fn test_week_for_date_resolves_mid_week() {
        let store = ScheduleStore::new();
        store.upsert(make_schedule("2025-01-05")).unwrap();

        let fetched = store
            .week_for_date(StaffGroup::Field, make_date("2025-01-09"))
            .unwrap();
        assert_eq!(fetched.week_start, make_date("2025-01-05"));
    }

    #[test]
    fn test_earliest_week_guard_rejects_past_weeks() {
        let store = ScheduleStore::with_earliest_week(make_date("2025-01-05"));

        let result = store.upsert(make_schedule("2024-12-29"));
        match result {
            Err(EngineError::WeekInPast { week_start, earliest }) => {
                assert_eq!(week_start, make_date("2024-12-29"));
                assert_eq!(earliest, make_date("2025-01-05"));
            }
            other => panic!("Expected WeekInPast, got {:?}", other),
        }

        assert!(store.upsert(make_schedule("2025-01-05")).is_ok());
        assert!(store.upsert(make_schedule("2025-01-12")).is_ok());
    }

    #[test]
    fn test_with_schedule_mut_persists_changes() {
        let store = ScheduleStore::new();
        store.upsert(make_schedule("2025-01-05")).unwrap();

        store
            .with_schedule_mut(StaffGroup::Field, make_date("2025-01-05"), |s| {
                s.task = ScheduleTask::Production;
                Ok(())
            })
            .unwrap();

        let fetched = store.get(StaffGroup::Field, make_date("2025-01-05")).unwrap();
        assert_eq!(fetched.task, ScheduleTask::Production);
    }

    #[test]
    fn test_with_schedule_mut_missing_week_fails() {
        let store = ScheduleStore::new();
        let result = store.with_schedule_mut(StaffGroup::Field, make_date("2025-01-05"), |_| Ok(()));
        assert!(matches!(result, Err(EngineError::ScheduleNotFound { .. })));
    }
}
