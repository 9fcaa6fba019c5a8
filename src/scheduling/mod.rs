//! Weekly schedule planning.
//!
//! This module contains the conflict validator that gates every save, the
//! in-memory schedule store with upsert semantics, the week propagator that
//! replicates a validated template forward, and the override resolver for
//! single-date exceptions.

mod conflict;
mod overrides;
mod propagate;
mod store;

pub use conflict::{AssignmentDraft, IssueKind, ScheduleDraft, ScheduleIssue, validate_draft};
pub use overrides::{add_override, remove_override, resolve_shift};
pub use propagate::{PropagationFailure, PropagationReport, WeekCommit, propagate_weeks};
pub use store::ScheduleStore;
