//! Flat schedule format keyed by UUIDs.
//!
//! The schedule's `uuid` is also the id of its root activity. Each activity
//! names its parent through `parent_uuid` and lists its own dependencies.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{run, with_projection};
use crate::engine::{ActivityReport, ProcessOptions};
use crate::error::ScheduleResult;
use crate::models::{Activity, ActivityKind, ActivityStatus, Dependency, RelationKind, Schedule};

/// A dependency on another activity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyData {
    pub dependency_uuid: String,
    #[serde(default)]
    pub lag: i64,
    #[serde(rename = "type")]
    pub kind: RelationKind,
}

/// One activity record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActivityData {
    pub uuid: String,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<ActivityKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_uuid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub planned_start_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub planned_end_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion_percentage: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_start_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_end_date: Option<NaiveDate>,
    #[serde(default)]
    pub dependencies: Vec<DependencyData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub projected_start_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub projected_end_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ActivityStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delayed_by: Option<i64>,
}

/// A schedule as a flat list of activities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleData {
    pub uuid: String,
    pub activities: Vec<ActivityData>,
}

impl ActivityData {
    fn to_activity(&self) -> Activity {
        let mut activity = Activity::new(&self.uuid, self.kind.unwrap_or_default())
            .with_completion(self.completion_percentage.unwrap_or(0.0));
        activity.planned_start_date = self.planned_start_date;
        activity.planned_end_date = self.planned_end_date;
        activity.actual_start_date = self.actual_start_date;
        activity.actual_end_date = self.actual_end_date;
        activity.dependencies = self
            .dependencies
            .iter()
            .map(|dep| Dependency::new(&dep.dependency_uuid, dep.kind).with_lag(dep.lag))
            .collect();
        with_projection(activity, self.projected_start_date, self.projected_end_date)
    }

    fn from_report(report: &ActivityReport) -> Self {
        Self {
            uuid: report.id.clone(),
            kind: Some(report.kind),
            parent_uuid: report.parent_id.clone(),
            planned_start_date: Some(report.planned_start_date),
            planned_end_date: Some(report.planned_end_date),
            duration: Some(report.duration),
            completion_percentage: Some(report.completion_percentage),
            actual_start_date: report.actual_start_date,
            actual_end_date: report.actual_end_date,
            dependencies: report
                .dependencies
                .iter()
                .map(|dep| DependencyData {
                    dependency_uuid: dep.predecessor_id.clone(),
                    lag: dep.lag,
                    kind: dep.kind,
                })
                .collect(),
            projected_start_date: Some(report.projected_start_date),
            projected_end_date: Some(report.projected_end_date),
            status: Some(report.status),
            delayed_by: Some(report.delayed_by),
        }
    }
}

impl ScheduleData {
    /// Builds a schedule rooted at `uuid`.
    ///
    /// # Errors
    /// `DuplicateActivity` for repeated uuids, `ActivityNotFound` for an
    /// unknown `parent_uuid`. Unknown dependency uuids surface from
    /// `process` or `validate_schedule`.
    pub fn to_schedule(&self) -> ScheduleResult<Schedule> {
        let mut schedule = Schedule::new(&self.uuid);
        for data in &self.activities {
            schedule.add_activity(data.to_activity())?;
        }
        for data in &self.activities {
            if let Some(parent) = &data.parent_uuid {
                schedule.link_child(parent, &data.uuid)?;
            }
        }
        Ok(schedule)
    }

    /// Exports a processed schedule as of `today`.
    pub fn from_schedule(schedule: &Schedule, today: NaiveDate) -> ScheduleResult<Self> {
        let activities = schedule
            .report(today)?
            .iter()
            .map(ActivityData::from_report)
            .collect();
        Ok(Self {
            uuid: schedule.root_id().to_string(),
            activities,
        })
    }
}

/// Imports, checks for cycles, processes, and exports a flat schedule.
pub fn process(input: &ScheduleData, options: &ProcessOptions) -> ScheduleResult<ScheduleData> {
    let (schedule, today) = run(input.to_schedule()?, options)?;
    ScheduleData::from_schedule(&schedule, today)
}
