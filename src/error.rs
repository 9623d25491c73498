//! Error types for schedule construction, propagation, and read-back.
//!
//! Every failure carries the id of the offending activity so callers can
//! point at the broken node of the input tree.

use chrono::NaiveDate;
use thiserror::Error;

use crate::models::ActivityKind;

/// Errors raised by activities and the propagation engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    /// A date the computation needs was never set.
    #[error("activity '{activity_id}': {field} is missing")]
    PlannedDateMissing {
        activity_id: String,
        field: &'static str,
    },

    /// An end date earlier than its paired start date was supplied.
    #[error("activity '{activity_id}': end date {end} is before start date {start}")]
    WrongInputEndDate {
        activity_id: String,
        start: NaiveDate,
        end: NaiveDate,
    },

    /// Projected dates may only be overridden on project activities.
    #[error("activity '{activity_id}': projected dates cannot be set on a {kind:?} activity")]
    ProjectedDateNotAllowed {
        activity_id: String,
        kind: ActivityKind,
    },

    /// Structural violation of the schedule.
    #[error("activity '{activity_id}': wrong schedule: {reason}")]
    WrongSchedule { activity_id: String, reason: String },

    /// A referenced predecessor, child, or parent does not exist.
    #[error("activity '{activity_id}' not found")]
    ActivityNotFound { activity_id: String },

    /// None of the status predicates matched.
    #[error("activity '{activity_id}': no status condition matched")]
    StatusConditionNotMatched { activity_id: String },

    /// Propagation re-entered an activity that is still being processed.
    #[error("activity '{activity_id}' is part of a cycle")]
    CycleDetected { activity_id: String },

    /// Two input records share the same id.
    #[error("duplicate activity '{activity_id}'")]
    DuplicateActivity { activity_id: String },

    /// Lag arithmetic left the representable calendar.
    #[error("activity '{activity_id}': date out of range")]
    DateOutOfRange { activity_id: String },
}

impl ScheduleError {
    pub(crate) fn not_found(activity_id: impl Into<String>) -> Self {
        Self::ActivityNotFound {
            activity_id: activity_id.into(),
        }
    }

    pub(crate) fn wrong_schedule(activity_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::WrongSchedule {
            activity_id: activity_id.into(),
            reason: reason.into(),
        }
    }

    /// The id of the activity the error refers to.
    pub fn activity_id(&self) -> &str {
        match self {
            Self::PlannedDateMissing { activity_id, .. }
            | Self::WrongInputEndDate { activity_id, .. }
            | Self::ProjectedDateNotAllowed { activity_id, .. }
            | Self::WrongSchedule { activity_id, .. }
            | Self::ActivityNotFound { activity_id }
            | Self::StatusConditionNotMatched { activity_id }
            | Self::CycleDetected { activity_id }
            | Self::DuplicateActivity { activity_id }
            | Self::DateOutOfRange { activity_id } => activity_id,
        }
    }
}

/// Result alias used throughout the crate.
pub type ScheduleResult<T> = Result<T, ScheduleError>;
