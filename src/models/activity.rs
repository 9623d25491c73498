//! Activity model.
//!
//! An activity is one node of the schedule hierarchy: either a leaf governed
//! by precedence dependencies or a composite governed by its children.
//!
//! # Date Model
//!
//! Each activity carries three pairs of dates:
//! - **Planned**: the committed plan. The first assignment wins; later writes
//!   from dependency propagation or rollup never move an existing plan.
//! - **Actual**: observed progress, supplied externally or rolled up.
//! - **Projected**: best estimate of the real start/end. Derived for tasks,
//!   stored (override or rollup) for projects and milestones.
//!
//! All dates have day granularity. "Today" is always passed in by the caller.

use chrono::{NaiveDate, TimeDelta};
use serde::{Deserialize, Serialize};

use super::Dependency;
use crate::error::{ScheduleError, ScheduleResult};

/// Activity type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActivityKind {
    /// Regular work item. Projected dates are derived.
    #[default]
    Task,
    /// Container whose projected dates are stored (override or rollup).
    Project,
    /// Zero-duration checkpoint.
    Milestone,
}

/// Timeliness of an activity against its plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActivityStatus {
    /// Projected end is on or before the planned end.
    OnTime,
    /// Not started and the projected start is already past the planned end.
    Overdue,
    /// Projected end is after the planned end.
    Delayed,
}

/// Adds a signed number of days, `None` when the result leaves chrono's range.
pub(crate) fn shift_days(date: NaiveDate, days: i64) -> Option<NaiveDate> {
    TimeDelta::try_days(days).and_then(|delta| date.checked_add_signed(delta))
}

/// A schedulable unit of work.
///
/// Fields are reachable only through accessors so that the date-ordering
/// rules below always hold for values written by the engine:
/// - planned end ≥ planned start
/// - actual end ≥ actual start
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    pub(crate) id: String,
    #[serde(default)]
    pub(crate) kind: ActivityKind,
    #[serde(default)]
    pub(crate) planned_start_date: Option<NaiveDate>,
    #[serde(default)]
    pub(crate) planned_end_date: Option<NaiveDate>,
    #[serde(default)]
    pub(crate) actual_start_date: Option<NaiveDate>,
    #[serde(default)]
    pub(crate) actual_end_date: Option<NaiveDate>,
    #[serde(default)]
    pub(crate) projected_start_date: Option<NaiveDate>,
    #[serde(default)]
    pub(crate) projected_end_date: Option<NaiveDate>,
    /// 0..=100.
    #[serde(default)]
    pub(crate) completion_percentage: f64,
    #[serde(default)]
    pub(crate) parent_id: Option<String>,
    #[serde(default)]
    pub(crate) child_ids: Vec<String>,
    #[serde(default)]
    pub(crate) dependencies: Vec<Dependency>,
}

impl Activity {
    /// Creates an activity with no dates, children, or dependencies.
    pub fn new(id: impl Into<String>, kind: ActivityKind) -> Self {
        Self {
            id: id.into(),
            kind,
            planned_start_date: None,
            planned_end_date: None,
            actual_start_date: None,
            actual_end_date: None,
            projected_start_date: None,
            projected_end_date: None,
            completion_percentage: 0.0,
            parent_id: None,
            child_ids: Vec::new(),
            dependencies: Vec::new(),
        }
    }

    /// Creates a task activity.
    pub fn task(id: impl Into<String>) -> Self {
        Self::new(id, ActivityKind::Task)
    }

    /// Creates a project activity.
    pub fn project(id: impl Into<String>) -> Self {
        Self::new(id, ActivityKind::Project)
    }

    /// Creates a milestone activity.
    pub fn milestone(id: impl Into<String>) -> Self {
        Self::new(id, ActivityKind::Milestone)
    }

    // Builders take input values as given; `validation::validate_schedule`
    // reports inconsistent input before processing.

    /// Sets both planned dates.
    pub fn with_planned_dates(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.planned_start_date = Some(start);
        self.planned_end_date = Some(end);
        self
    }

    /// Sets the planned start date.
    pub fn with_planned_start(mut self, start: NaiveDate) -> Self {
        self.planned_start_date = Some(start);
        self
    }

    /// Sets the planned end date.
    pub fn with_planned_end(mut self, end: NaiveDate) -> Self {
        self.planned_end_date = Some(end);
        self
    }

    /// Sets the actual start date.
    pub fn with_actual_start(mut self, start: NaiveDate) -> Self {
        self.actual_start_date = Some(start);
        self
    }

    /// Sets the actual end date.
    pub fn with_actual_end(mut self, end: NaiveDate) -> Self {
        self.actual_end_date = Some(end);
        self
    }

    /// Sets externally supplied projected dates.
    pub fn with_projected_dates(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.projected_start_date = Some(start);
        self.projected_end_date = Some(end);
        self
    }

    /// Sets the completion percentage.
    pub fn with_completion(mut self, percentage: f64) -> Self {
        self.completion_percentage = percentage;
        self
    }

    /// Appends a child id. Prefer `Schedule::link_child`, which also sets the back-reference.
    pub fn with_child(mut self, child_id: impl Into<String>) -> Self {
        self.child_ids.push(child_id.into());
        self
    }

    /// Sets the parent back-reference.
    pub fn with_parent(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    /// Appends a precedence dependency.
    pub fn with_dependency(mut self, dependency: Dependency) -> Self {
        self.dependencies.push(dependency);
        self
    }

    /// Unique identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Task, project, or milestone.
    pub fn kind(&self) -> ActivityKind {
        self.kind
    }

    /// Planned start, once set or propagated.
    pub fn planned_start_date(&self) -> Option<NaiveDate> {
        self.planned_start_date
    }

    /// Planned end, once set or propagated.
    pub fn planned_end_date(&self) -> Option<NaiveDate> {
        self.planned_end_date
    }

    /// Date work actually started.
    pub fn actual_start_date(&self) -> Option<NaiveDate> {
        self.actual_start_date
    }

    /// Date work actually finished.
    pub fn actual_end_date(&self) -> Option<NaiveDate> {
        self.actual_end_date
    }

    /// Stored projected start (override or rollup), without derivation.
    pub fn stored_projected_start_date(&self) -> Option<NaiveDate> {
        self.projected_start_date
    }

    /// Stored projected end (override or rollup), without derivation.
    pub fn stored_projected_end_date(&self) -> Option<NaiveDate> {
        self.projected_end_date
    }

    /// Completion in percent (0..=100).
    pub fn completion_percentage(&self) -> f64 {
        self.completion_percentage
    }

    /// Parent composite, if any.
    pub fn parent_id(&self) -> Option<&str> {
        self.parent_id.as_deref()
    }

    /// Children in insertion order.
    pub fn child_ids(&self) -> &[String] {
        &self.child_ids
    }

    /// Predecessor dependencies.
    pub fn dependencies(&self) -> &[Dependency] {
        &self.dependencies
    }

    /// Whether this activity has children.
    pub fn is_composite(&self) -> bool {
        !self.child_ids.is_empty()
    }

    /// Planned start, failing with `PlannedDateMissing` when unset.
    pub fn require_planned_start(&self) -> ScheduleResult<NaiveDate> {
        self.planned_start_date
            .ok_or_else(|| self.missing("planned_start_date"))
    }

    /// Planned end, failing with `PlannedDateMissing` when unset.
    pub fn require_planned_end(&self) -> ScheduleResult<NaiveDate> {
        self.planned_end_date
            .ok_or_else(|| self.missing("planned_end_date"))
    }

    /// Sets the planned start unless one is already set.
    ///
    /// Postcondition: when the start is newly set and an existing planned end
    /// lies before it, the end is pulled forward to the same date.
    pub fn set_planned_start_date(&mut self, date: NaiveDate) {
        if self.planned_start_date.is_some() {
            return;
        }
        self.planned_start_date = Some(date);
        if self.planned_end_date.is_some_and(|end| end < date) {
            self.planned_end_date = Some(date);
        }
    }

    /// Sets the planned end unless one is already set.
    ///
    /// # Errors
    /// `WrongInputEndDate` if a planned start exists and `date` precedes it.
    pub fn set_planned_end_date(&mut self, date: NaiveDate) -> ScheduleResult<()> {
        if self.planned_end_date.is_some() {
            return Ok(());
        }
        if let Some(start) = self.planned_start_date {
            if date < start {
                return Err(self.wrong_end(start, date));
            }
        }
        self.planned_end_date = Some(date);
        Ok(())
    }

    pub fn set_actual_start_date(&mut self, date: Option<NaiveDate>) {
        self.actual_start_date = date;
    }

    /// Sets or clears the actual end.
    ///
    /// # Errors
    /// `WrongInputEndDate` if an actual start exists and `date` precedes it.
    pub fn set_actual_end_date(&mut self, date: Option<NaiveDate>) -> ScheduleResult<()> {
        if let (Some(end), Some(start)) = (date, self.actual_start_date) {
            if end < start {
                return Err(self.wrong_end(start, end));
            }
        }
        self.actual_end_date = date;
        Ok(())
    }

    /// The caller keeps the value within 0..=100.
    pub fn set_completion_percentage(&mut self, percentage: f64) {
        self.completion_percentage = percentage;
    }

    /// # Errors
    /// `ProjectedDateNotAllowed` unless this is a project activity.
    pub fn set_projected_start_date(&mut self, date: NaiveDate) -> ScheduleResult<()> {
        self.ensure_project()?;
        self.projected_start_date = Some(date);
        Ok(())
    }

    /// # Errors
    /// `ProjectedDateNotAllowed` unless this is a project activity.
    pub fn set_projected_end_date(&mut self, date: NaiveDate) -> ScheduleResult<()> {
        self.ensure_project()?;
        self.projected_end_date = Some(date);
        Ok(())
    }

    /// Planned duration in days, both ends inclusive. Milestones are always 0.
    pub fn duration(&self) -> ScheduleResult<i64> {
        if self.kind == ActivityKind::Milestone {
            return Ok(0);
        }
        Ok(self.planned_span()? + 1)
    }

    /// Days of planned span still outstanding at the current completion.
    ///
    /// `ceil(span * (100 - completion) / 100)` where `span = end - start`.
    pub fn remaining_duration(&self) -> ScheduleResult<i64> {
        let span = self.planned_span()? as f64;
        let remaining = (span * (100.0 - self.completion_percentage) / 100.0).ceil();
        if remaining.is_finite() {
            Ok(remaining as i64)
        } else {
            Ok(0)
        }
    }

    /// Projected start as of `today`.
    ///
    /// Tasks: the actual start if known, else the planned start while it is
    /// still ahead (today ≤ planned start), else today. Other kinds return
    /// the stored value.
    pub fn projected_start_date(&self, today: NaiveDate) -> ScheduleResult<NaiveDate> {
        if self.kind != ActivityKind::Task {
            return self
                .projected_start_date
                .ok_or_else(|| self.missing("projected_start_date"));
        }
        let planned_start = self.require_planned_start()?;
        if let Some(actual) = self.actual_start_date {
            return Ok(actual);
        }
        if today <= planned_start {
            Ok(planned_start)
        } else {
            Ok(today)
        }
    }

    /// Projected end as of `today`.
    ///
    /// Tasks: the actual end if known; otherwise the remaining duration is
    /// added to the projected start (not started) or to today (in progress).
    /// Other kinds return the stored value.
    pub fn projected_end_date(&self, today: NaiveDate) -> ScheduleResult<NaiveDate> {
        if self.kind != ActivityKind::Task {
            return self
                .projected_end_date
                .ok_or_else(|| self.missing("projected_end_date"));
        }
        self.require_planned_end()?;
        if let Some(actual) = self.actual_end_date {
            return Ok(actual);
        }
        let remaining = self.remaining_duration()?;
        let base = match self.actual_start_date {
            None => self.projected_start_date(today)?,
            Some(_) => today,
        };
        shift_days(base, remaining).ok_or_else(|| ScheduleError::DateOutOfRange {
            activity_id: self.id.clone(),
        })
    }

    /// Projected end on or before the planned end (inclusive).
    pub fn is_on_time(&self, today: NaiveDate) -> ScheduleResult<bool> {
        let planned_end = self.require_planned_end()?;
        Ok(self.projected_end_date(today)? <= planned_end)
    }

    /// Not started and the projected start already lies past the planned end.
    pub fn is_overdue(&self, today: NaiveDate) -> ScheduleResult<bool> {
        let planned_end = self.require_planned_end()?;
        if self.actual_start_date.is_some() {
            return Ok(false);
        }
        Ok(self.projected_start_date(today)? > planned_end)
    }

    /// Projected end after the planned end.
    pub fn is_delayed(&self, today: NaiveDate) -> ScheduleResult<bool> {
        let planned_end = self.require_planned_end()?;
        Ok(self.projected_end_date(today)? > planned_end)
    }

    /// Classifies the activity; predicates are checked on-time, overdue, delayed.
    pub fn status(&self, today: NaiveDate) -> ScheduleResult<ActivityStatus> {
        if self.is_on_time(today)? {
            Ok(ActivityStatus::OnTime)
        } else if self.is_overdue(today)? {
            Ok(ActivityStatus::Overdue)
        } else if self.is_delayed(today)? {
            Ok(ActivityStatus::Delayed)
        } else {
            Err(ScheduleError::StatusConditionNotMatched {
                activity_id: self.id.clone(),
            })
        }
    }

    /// Days past the planned end, measured from the projected start when
    /// overdue and from the projected end when delayed. 0 when on time.
    pub fn delayed_by(&self, today: NaiveDate) -> ScheduleResult<i64> {
        let planned_end = self.require_planned_end()?;
        let late = match self.status(today)? {
            ActivityStatus::OnTime => return Ok(0),
            ActivityStatus::Overdue => self.projected_start_date(today)?,
            ActivityStatus::Delayed => self.projected_end_date(today)?,
        };
        Ok((late - planned_end).num_days())
    }

    fn planned_span(&self) -> ScheduleResult<i64> {
        let start = self.require_planned_start()?;
        let end = self.require_planned_end()?;
        Ok((end - start).num_days())
    }

    fn ensure_project(&self) -> ScheduleResult<()> {
        if self.kind == ActivityKind::Project {
            Ok(())
        } else {
            Err(ScheduleError::ProjectedDateNotAllowed {
                activity_id: self.id.clone(),
                kind: self.kind,
            })
        }
    }

    fn missing(&self, field: &'static str) -> ScheduleError {
        ScheduleError::PlannedDateMissing {
            activity_id: self.id.clone(),
            field,
        }
    }

    fn wrong_end(&self, start: NaiveDate, end: NaiveDate) -> ScheduleError {
        ScheduleError::WrongInputEndDate {
            activity_id: self.id.clone(),
            start,
            end,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn jan_task() -> Activity {
        Activity::task("T1").with_planned_dates(d(2025, 1, 1), d(2025, 1, 10))
    }

    #[test]
    fn test_planned_start_first_write_wins() {
        let mut act = Activity::task("A").with_planned_start(d(2025, 1, 5));
        act.set_planned_start_date(d(2025, 1, 20));
        assert_eq!(act.planned_start_date(), Some(d(2025, 1, 5)));
    }

    #[test]
    fn test_planned_start_pulls_end_forward() {
        let mut act = Activity::task("A").with_planned_end(d(2025, 1, 3));
        act.set_planned_start_date(d(2025, 1, 8));
        assert_eq!(act.planned_start_date(), Some(d(2025, 1, 8)));
        assert_eq!(act.planned_end_date(), Some(d(2025, 1, 8)));

        // An end already after the new start stays put
        let mut act = Activity::task("B").with_planned_end(d(2025, 2, 1));
        act.set_planned_start_date(d(2025, 1, 8));
        assert_eq!(act.planned_end_date(), Some(d(2025, 2, 1)));
    }

    #[test]
    fn test_planned_end_rejected_before_start() {
        let mut act = Activity::task("A").with_planned_start(d(2025, 1, 8));
        let err = act.set_planned_end_date(d(2025, 1, 7)).unwrap_err();
        assert!(matches!(err, ScheduleError::WrongInputEndDate { .. }));
        assert_eq!(act.planned_end_date(), None);

        act.set_planned_end_date(d(2025, 1, 8)).unwrap();
        assert_eq!(act.planned_end_date(), Some(d(2025, 1, 8)));
    }

    #[test]
    fn test_planned_end_first_write_wins() {
        let mut act = jan_task();
        act.set_planned_end_date(d(2025, 3, 1)).unwrap();
        assert_eq!(act.planned_end_date(), Some(d(2025, 1, 10)));
    }

    #[test]
    fn test_actual_end_ordering() {
        let mut act = jan_task();
        act.set_actual_start_date(Some(d(2025, 1, 4)));
        assert!(act.set_actual_end_date(Some(d(2025, 1, 3))).is_err());
        act.set_actual_end_date(Some(d(2025, 1, 4))).unwrap();
        assert_eq!(act.actual_end_date(), Some(d(2025, 1, 4)));
        act.set_actual_end_date(None).unwrap();
        assert_eq!(act.actual_end_date(), None);
    }

    #[test]
    fn test_projected_setters_require_project() {
        let mut task = jan_task();
        let err = task.set_projected_start_date(d(2025, 1, 1)).unwrap_err();
        assert!(matches!(
            err,
            ScheduleError::ProjectedDateNotAllowed {
                kind: ActivityKind::Task,
                ..
            }
        ));
        assert!(Activity::milestone("M")
            .set_projected_end_date(d(2025, 1, 1))
            .is_err());

        let mut project = Activity::project("P");
        project.set_projected_start_date(d(2025, 1, 2)).unwrap();
        project.set_projected_end_date(d(2025, 1, 9)).unwrap();
        assert_eq!(project.projected_start_date(d(2030, 1, 1)).unwrap(), d(2025, 1, 2));
        assert_eq!(project.projected_end_date(d(2030, 1, 1)).unwrap(), d(2025, 1, 9));
    }

    #[test]
    fn test_duration() {
        assert_eq!(jan_task().duration().unwrap(), 10);
        assert_eq!(Activity::milestone("M").duration().unwrap(), 0);

        let err = Activity::task("X").with_planned_start(d(2025, 1, 1)).duration().unwrap_err();
        assert_eq!(
            err,
            ScheduleError::PlannedDateMissing {
                activity_id: "X".into(),
                field: "planned_end_date"
            }
        );
    }

    #[test]
    fn test_remaining_duration_rounds_up() {
        // span 9 days
        assert_eq!(jan_task().remaining_duration().unwrap(), 9);
        assert_eq!(jan_task().with_completion(50.0).remaining_duration().unwrap(), 5);
        assert_eq!(jan_task().with_completion(40.0).remaining_duration().unwrap(), 6);
        assert_eq!(jan_task().with_completion(100.0).remaining_duration().unwrap(), 0);
    }

    #[test]
    fn test_projected_start_task() {
        let act = jan_task();
        assert_eq!(act.projected_start_date(d(2024, 12, 20)).unwrap(), d(2025, 1, 1));
        assert_eq!(act.projected_start_date(d(2025, 1, 1)).unwrap(), d(2025, 1, 1));
        assert_eq!(act.projected_start_date(d(2025, 1, 2)).unwrap(), d(2025, 1, 2));

        let started = jan_task().with_actual_start(d(2024, 12, 30));
        assert_eq!(started.projected_start_date(d(2025, 1, 5)).unwrap(), d(2024, 12, 30));
    }

    #[test]
    fn test_projected_end_task() {
        // Not started: projected start + remaining
        assert_eq!(jan_task().projected_end_date(d(2025, 1, 3)).unwrap(), d(2025, 1, 12));
        // In progress: today + remaining
        let in_progress = jan_task().with_actual_start(d(2025, 1, 1)).with_completion(50.0);
        assert_eq!(in_progress.projected_end_date(d(2025, 1, 4)).unwrap(), d(2025, 1, 9));
        // Finished: actual end
        let done = jan_task()
            .with_actual_start(d(2025, 1, 1))
            .with_actual_end(d(2025, 1, 15))
            .with_completion(100.0);
        assert_eq!(done.projected_end_date(d(2025, 3, 1)).unwrap(), d(2025, 1, 15));
    }

    #[test]
    fn test_projected_non_task_requires_stored_value() {
        let project = Activity::project("P").with_planned_dates(d(2025, 1, 1), d(2025, 1, 10));
        let err = project.projected_start_date(d(2025, 1, 1)).unwrap_err();
        assert!(matches!(
            err,
            ScheduleError::PlannedDateMissing {
                field: "projected_start_date",
                ..
            }
        ));
        assert!(project.status(d(2025, 1, 1)).is_err());
    }

    #[test]
    fn test_status_on_time_boundary_inclusive() {
        let act = jan_task();
        let today = d(2024, 12, 25);
        assert_eq!(act.projected_end_date(today).unwrap(), d(2025, 1, 10));
        assert_eq!(act.status(today).unwrap(), ActivityStatus::OnTime);
        assert_eq!(act.delayed_by(today).unwrap(), 0);
    }

    #[test]
    fn test_status_delayed_one_day() {
        let act = jan_task().with_actual_start(d(2025, 1, 1)).with_completion(40.0);
        let today = d(2025, 1, 5);
        assert_eq!(act.projected_end_date(today).unwrap(), d(2025, 1, 11));
        assert_eq!(act.status(today).unwrap(), ActivityStatus::Delayed);
        assert_eq!(act.delayed_by(today).unwrap(), 1);
    }

    #[test]
    fn test_status_delayed_not_started() {
        let act = jan_task();
        let today = d(2025, 1, 3);
        assert_eq!(act.status(today).unwrap(), ActivityStatus::Delayed);
        assert_eq!(act.delayed_by(today).unwrap(), 2);
    }

    #[test]
    fn test_status_overdue() {
        let act = jan_task();
        let today = d(2025, 1, 12);
        assert!(act.is_overdue(today).unwrap());
        assert_eq!(act.status(today).unwrap(), ActivityStatus::Overdue);
        // Measured from the projected start, not the projected end
        assert_eq!(act.delayed_by(today).unwrap(), 2);

        // Started activities are never overdue
        let started = jan_task().with_actual_start(d(2025, 1, 1));
        assert!(!started.is_overdue(today).unwrap());
        assert_eq!(started.status(today).unwrap(), ActivityStatus::Delayed);
    }

    #[test]
    fn test_milestone_status_uses_stored_projection() {
        let m = Activity::milestone("M")
            .with_planned_dates(d(2025, 2, 1), d(2025, 2, 1))
            .with_projected_dates(d(2025, 2, 3), d(2025, 2, 3));
        assert_eq!(m.duration().unwrap(), 0);
        assert_eq!(m.status(d(2025, 1, 1)).unwrap(), ActivityStatus::Overdue);
        assert_eq!(m.delayed_by(d(2025, 1, 1)).unwrap(), 2);

        let reached = m.clone().with_actual_start(d(2025, 2, 3));
        assert_eq!(reached.status(d(2025, 1, 1)).unwrap(), ActivityStatus::Delayed);
    }

    #[test]
    fn test_shift_days_out_of_range() {
        assert_eq!(shift_days(d(2025, 1, 1), -1), Some(d(2024, 12, 31)));
        assert_eq!(shift_days(NaiveDate::MAX, 1), None);
        assert_eq!(shift_days(d(2025, 1, 1), i64::MAX), None);
    }
}
