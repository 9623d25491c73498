//! Gantt task tree format.
//!
//! ```json
//! {
//!   "data": [
//!     {"id": "1", "type": "PROJECT"},
//!     {"id": "2", "start_date": "2024-12-01", "end_date": "2024-12-05", "parent": "1"}
//!   ],
//!   "links": [{"source": "2", "target": "3", "type": "FS", "lag": 1}],
//!   "root_id": "1"
//! }
//! ```
//!
//! `start_date`/`end_date` are the planned dates and `progress` is the
//! completion percentage. Output rows also carry `duration`, projected
//! dates, `status`, and `delayed_by`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{run, with_projection};
use crate::engine::{ActivityReport, ProcessOptions};
use crate::error::ScheduleResult;
use crate::models::{Activity, ActivityKind, ActivityStatus, Dependency, RelationKind, Schedule};

/// One row of the Gantt chart.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GanttTask {
    pub id: String,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<ActivityKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_start_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_end_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub projected_start_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub projected_end_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ActivityStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delayed_by: Option<i64>,
}

/// A dependency arrow from `source` (predecessor) to `target` (successor).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GanttLink {
    pub source: String,
    pub target: String,
    #[serde(rename = "type")]
    pub kind: RelationKind,
    #[serde(default)]
    pub lag: i64,
}

/// A full Gantt chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GanttTaskData {
    pub data: Vec<GanttTask>,
    #[serde(default)]
    pub links: Vec<GanttLink>,
    pub root_id: String,
}

impl GanttTask {
    fn to_activity(&self) -> Activity {
        let mut activity = Activity::new(&self.id, self.kind.unwrap_or_default())
            .with_completion(self.progress.unwrap_or(0.0));
        activity.planned_start_date = self.start_date;
        activity.planned_end_date = self.end_date;
        activity.actual_start_date = self.actual_start_date;
        activity.actual_end_date = self.actual_end_date;
        with_projection(activity, self.projected_start_date, self.projected_end_date)
    }

    fn from_report(report: &ActivityReport) -> Self {
        Self {
            id: report.id.clone(),
            kind: Some(report.kind),
            start_date: Some(report.planned_start_date),
            end_date: Some(report.planned_end_date),
            duration: Some(report.duration),
            progress: Some(report.completion_percentage),
            parent: report.parent_id.clone(),
            actual_start_date: report.actual_start_date,
            actual_end_date: report.actual_end_date,
            projected_start_date: Some(report.projected_start_date),
            projected_end_date: Some(report.projected_end_date),
            status: Some(report.status),
            delayed_by: Some(report.delayed_by),
        }
    }
}

impl GanttTaskData {
    /// Builds a schedule: rows become activities, `parent` becomes a
    /// composition edge (in row order), links become dependencies.
    ///
    /// # Errors
    /// `DuplicateActivity` for repeated ids, `ActivityNotFound` for parents
    /// or link ends that are not rows.
    pub fn to_schedule(&self) -> ScheduleResult<Schedule> {
        let mut schedule = Schedule::new(&self.root_id);
        for task in &self.data {
            schedule.add_activity(task.to_activity())?;
        }
        for task in &self.data {
            if let Some(parent) = &task.parent {
                schedule.link_child(parent, &task.id)?;
            }
        }
        for link in &self.links {
            schedule.add_dependency(
                &link.target,
                Dependency::new(&link.source, link.kind).with_lag(link.lag),
            )?;
        }
        Ok(schedule)
    }

    /// Exports a processed schedule as of `today`.
    pub fn from_schedule(schedule: &Schedule, today: NaiveDate) -> ScheduleResult<Self> {
        let reports = schedule.report(today)?;
        let data = reports.iter().map(GanttTask::from_report).collect();
        let links = reports
            .iter()
            .flat_map(|report| {
                report.dependencies.iter().map(|dep| GanttLink {
                    source: dep.predecessor_id.clone(),
                    target: report.id.clone(),
                    kind: dep.kind,
                    lag: dep.lag,
                })
            })
            .collect();
        Ok(Self {
            data,
            links,
            root_id: schedule.root_id().to_string(),
        })
    }
}

/// Imports, checks for cycles, processes, and exports a Gantt chart.
///
/// The reference date is `options.reference_date`, or the local date.
pub fn process(input: &GanttTaskData, options: &ProcessOptions) -> ScheduleResult<GanttTaskData> {
    let (schedule, today) = run(input.to_schedule()?, options)?;
    GanttTaskData::from_schedule(&schedule, today)
}
