//! Per-activity read-back after processing.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::ScheduleResult;
use crate::models::{Activity, ActivityKind, ActivityStatus, Dependency, Schedule};

/// Snapshot of an activity's computed fields as of a reference date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityReport {
    pub id: String,
    pub kind: ActivityKind,
    pub parent_id: Option<String>,
    pub child_ids: Vec<String>,
    pub dependencies: Vec<Dependency>,
    pub planned_start_date: NaiveDate,
    pub planned_end_date: NaiveDate,
    pub actual_start_date: Option<NaiveDate>,
    pub actual_end_date: Option<NaiveDate>,
    /// Days, both ends inclusive (0 for milestones).
    pub duration: i64,
    pub completion_percentage: f64,
    pub projected_start_date: NaiveDate,
    pub projected_end_date: NaiveDate,
    pub status: ActivityStatus,
    /// Days late; 0 when on time.
    pub delayed_by: i64,
}

impl ActivityReport {
    /// Reads every computed field of `activity` as of `today`.
    ///
    /// # Errors
    /// `PlannedDateMissing` if a planned date (or, for projects and
    /// milestones, a stored projected date) is absent.
    pub fn from_activity(activity: &Activity, today: NaiveDate) -> ScheduleResult<Self> {
        Ok(Self {
            id: activity.id().to_string(),
            kind: activity.kind(),
            parent_id: activity.parent_id().map(str::to_string),
            child_ids: activity.child_ids().to_vec(),
            dependencies: activity.dependencies().to_vec(),
            planned_start_date: activity.require_planned_start()?,
            planned_end_date: activity.require_planned_end()?,
            actual_start_date: activity.actual_start_date(),
            actual_end_date: activity.actual_end_date(),
            duration: activity.duration()?,
            completion_percentage: activity.completion_percentage(),
            projected_start_date: activity.projected_start_date(today)?,
            projected_end_date: activity.projected_end_date(today)?,
            status: activity.status(today)?,
            delayed_by: activity.delayed_by(today)?,
        })
    }

    /// Whether the activity has finished.
    pub fn is_complete(&self) -> bool {
        self.actual_end_date.is_some()
    }
}

impl Schedule {
    /// Reports every activity, ordered by id.
    pub fn report(&self, today: NaiveDate) -> ScheduleResult<Vec<ActivityReport>> {
        self.activities()
            .map(|activity| ActivityReport::from_activity(activity, today))
            .collect()
    }
}
