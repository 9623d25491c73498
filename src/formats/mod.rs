//! Wire formats for exchanging schedules with front ends.
//!
//! | Format | Shape | Edges |
//! |--------|-------|-------|
//! | [`gantt`] | `{data, links, root_id}` | `parent` on tasks, `links` list |
//! | [`schedule_data`] | `{uuid, activities}` | `parent_uuid`, inline `dependencies` |
//!
//! Both formats import into a [`Schedule`], and export from a processed one
//! through [`ActivityReport`](crate::engine::ActivityReport). Dates are
//! `YYYY-MM-DD` strings.
//!
//! Projected dates in the input are honored only on `PROJECT` activities;
//! on other kinds they are outputs of an earlier run and are ignored.

pub mod gantt;
pub mod schedule_data;

use chrono::NaiveDate;
use tracing::info;

use crate::engine::{local_today, ProcessOptions};
use crate::error::{ScheduleError, ScheduleResult};
use crate::models::{Activity, ActivityKind, Schedule};

/// Applies input projected dates to project activities only.
fn with_projection(
    mut activity: Activity,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Activity {
    if activity.kind() == ActivityKind::Project {
        activity.projected_start_date = start;
        activity.projected_end_date = end;
    }
    activity
}

/// Checks for cycles, then processes with projected rollup enabled.
///
/// Returns the schedule together with the reference date used.
fn run(mut schedule: Schedule, options: &ProcessOptions) -> ScheduleResult<(Schedule, NaiveDate)> {
    info!(
        root_id = %schedule.root_id(),
        activities = schedule.activity_count(),
        "schedule imported"
    );
    if let Some(cycle) = schedule.find_cycle()? {
        return Err(ScheduleError::CycleDetected {
            activity_id: cycle[0].clone(),
        });
    }

    let today = options.reference_date.unwrap_or_else(local_today);
    schedule.process_with(&options.clone().with_reference_date(today))?;

    let root = schedule.root()?;
    info!(
        root_id = %root.id(),
        planned_start = ?root.planned_start_date(),
        planned_end = ?root.planned_end_date(),
        completion = root.completion_percentage(),
        "schedule processed"
    );
    Ok((schedule, today))
}
