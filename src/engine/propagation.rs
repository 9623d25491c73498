//! Date propagation and rollup.
//!
//! # Algorithm
//!
//! Post-order depth-first walk from the root over child edges (composites)
//! and dependency edges (leaves). Each activity moves through
//! `unvisited → in progress → visited`; a visited activity reachable through
//! several paths is computed once.
//!
//! - **Leaf**: every dependency yields a candidate planned start (FS, SS) or
//!   planned end (FF, SF) from the predecessor's planned dates plus lag. The
//!   latest candidate of each kind is written through the first-write-wins
//!   setters.
//! - **Composite**: planned window = [min child start, max child end]; actual
//!   start = min child actual start (cleared when none); completion =
//!   duration-weighted mean; at exactly 100% the actual end is the max child
//!   actual end.
//!
//! The walk uses an explicit stack, so hierarchy depth never bounds the
//! call stack, and re-entering an in-progress activity is reported as
//! `CycleDetected` instead of looping.
//!
//! # Complexity
//! O(V + E) over the activities and edges reachable from the root.

use chrono::NaiveDate;
use std::collections::HashMap;
use tracing::{debug, trace};

use super::options::{CompletionPolicy, ProcessOptions};
use crate::error::{ScheduleError, ScheduleResult};
use crate::models::{shift_days, Activity, ActivityKind, Schedule};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum VisitState {
    InProgress,
    Visited,
}

enum Frame {
    Enter(String),
    Exit(String),
}

/// Aggregates over the children of one composite.
#[derive(Debug, Default)]
struct ChildRollup {
    planned_start: Option<NaiveDate>,
    planned_end: Option<NaiveDate>,
    actual_start: Option<NaiveDate>,
    actual_end: Option<NaiveDate>,
    projected_start: Option<NaiveDate>,
    projected_end: Option<NaiveDate>,
    weighted_completion: f64,
    total_duration: i64,
}

fn earliest(current: Option<NaiveDate>, date: NaiveDate) -> Option<NaiveDate> {
    Some(current.map_or(date, |c| c.min(date)))
}

fn latest(current: Option<NaiveDate>, date: NaiveDate) -> Option<NaiveDate> {
    Some(current.map_or(date, |c| c.max(date)))
}

impl ChildRollup {
    fn add(&mut self, child: &Activity, projection_date: Option<NaiveDate>) -> ScheduleResult<()> {
        self.planned_start = earliest(self.planned_start, child.require_planned_start()?);
        self.planned_end = latest(self.planned_end, child.require_planned_end()?);
        if let Some(start) = child.actual_start_date() {
            self.actual_start = earliest(self.actual_start, start);
        }
        if let Some(end) = child.actual_end_date() {
            self.actual_end = latest(self.actual_end, end);
        }
        // Children with no projection (milestones, unprojected sub-projects) are skipped
        if let Some(today) = projection_date {
            if let Ok(start) = child.projected_start_date(today) {
                self.projected_start = earliest(self.projected_start, start);
            }
            if let Ok(end) = child.projected_end_date(today) {
                self.projected_end = latest(self.projected_end, end);
            }
        }

        let duration = child.duration()?;
        self.weighted_completion += child.completion_percentage() * duration as f64;
        self.total_duration += duration;
        Ok(())
    }

    fn completion(&self) -> f64 {
        if self.total_duration == 0 {
            0.0
        } else {
            self.weighted_completion / self.total_duration as f64
        }
    }
}

impl Schedule {
    /// Propagates planned dates and rolls up actual dates and completion
    /// with default options.
    ///
    /// A schedule holding only its root is left untouched.
    ///
    /// # Example
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use u_rollup::models::{Activity, Dependency, Schedule};
    ///
    /// let d = |m, day| NaiveDate::from_ymd_opt(2025, m, day).unwrap();
    /// let mut schedule = Schedule::new("P");
    /// schedule.add_activity(Activity::project("P")).unwrap();
    /// schedule.add_activity(Activity::task("A").with_planned_dates(d(1, 1), d(1, 10))).unwrap();
    /// schedule.add_activity(Activity::task("B").with_planned_end(d(1, 20))).unwrap();
    /// schedule.link_child("P", "A").unwrap();
    /// schedule.link_child("P", "B").unwrap();
    /// schedule.add_dependency("B", Dependency::finish_to_start("A").with_lag(1)).unwrap();
    ///
    /// schedule.process().unwrap();
    /// assert_eq!(schedule.get("B").unwrap().planned_start_date(), Some(d(1, 11)));
    /// assert_eq!(schedule.root().unwrap().planned_end_date(), Some(d(1, 20)));
    /// ```
    pub fn process(&mut self) -> ScheduleResult<()> {
        self.process_with(&ProcessOptions::default())
    }

    /// Like [`process`](Self::process) with explicit options.
    ///
    /// # Errors
    /// - `WrongSchedule`: an activity has both children and dependencies, or a
    ///   composite reaches 100% without any child actual end (strict policy).
    /// - `ActivityNotFound`: a child or predecessor id is not in the schedule.
    /// - `PlannedDateMissing`: a predecessor or child lacks a planned date.
    /// - `WrongInputEndDate`: a derived end falls before an existing start.
    /// - `CycleDetected`: the walk re-entered an in-progress activity.
    pub fn process_with(&mut self, options: &ProcessOptions) -> ScheduleResult<()> {
        if self.activities.len() == 1 && self.activities.contains_key(&self.root_id) {
            debug!(root_id = %self.root_id, "only the root activity present, nothing to process");
            return Ok(());
        }

        let mut states: HashMap<String, VisitState> = HashMap::new();
        let mut stack = vec![Frame::Enter(self.root_id.clone())];

        while let Some(frame) = stack.pop() {
            match frame {
                Frame::Enter(id) => {
                    match states.get(&id) {
                        Some(VisitState::Visited) => continue,
                        Some(VisitState::InProgress) => {
                            return Err(ScheduleError::CycleDetected { activity_id: id });
                        }
                        None => {}
                    }
                    let next = self.prerequisites(&id)?;
                    states.insert(id.clone(), VisitState::InProgress);
                    stack.push(Frame::Exit(id));
                    for next_id in next.into_iter().rev() {
                        if states.get(&next_id) != Some(&VisitState::Visited) {
                            stack.push(Frame::Enter(next_id));
                        }
                    }
                }
                Frame::Exit(id) => {
                    if self.get(&id)?.is_composite() {
                        self.roll_up(&id, options)?;
                    } else {
                        self.resolve_leaf(&id)?;
                    }
                    trace!(activity_id = %id, "activity processed");
                    states.insert(id, VisitState::Visited);
                }
            }
        }

        debug!(
            root_id = %self.root_id,
            processed = states.len(),
            "schedule processed"
        );
        Ok(())
    }

    /// Ids that must be processed before `id`: children of a composite,
    /// predecessors of a leaf.
    fn prerequisites(&self, id: &str) -> ScheduleResult<Vec<String>> {
        let activity = self.get(id)?;
        if activity.is_composite() && !activity.dependencies().is_empty() {
            return Err(ScheduleError::wrong_schedule(
                id,
                "an activity with children must not have dependencies",
            ));
        }
        if activity.is_composite() {
            Ok(activity.child_ids().to_vec())
        } else {
            Ok(activity
                .dependencies()
                .iter()
                .map(|dep| dep.predecessor_id.clone())
                .collect())
        }
    }

    fn resolve_leaf(&mut self, id: &str) -> ScheduleResult<()> {
        let activity = self.get(id)?;
        let mut latest_start = None;
        let mut latest_end = None;

        for dep in activity.dependencies() {
            let predecessor = self.get(&dep.predecessor_id)?;
            let anchor = if dep.kind.anchors_on_start() {
                predecessor.require_planned_start()?
            } else {
                predecessor.require_planned_end()?
            };
            let candidate = shift_days(anchor, dep.lag).ok_or_else(|| {
                ScheduleError::DateOutOfRange {
                    activity_id: id.to_string(),
                }
            })?;
            if dep.kind.constrains_start() {
                latest_start = latest(latest_start, candidate);
            } else {
                latest_end = latest(latest_end, candidate);
            }
        }

        let activity = self.get_mut(id)?;
        if let Some(start) = latest_start {
            activity.set_planned_start_date(start);
        }
        if let Some(end) = latest_end {
            activity.set_planned_end_date(end)?;
        }
        Ok(())
    }

    fn roll_up(&mut self, id: &str, options: &ProcessOptions) -> ScheduleResult<()> {
        let activity = self.get(id)?;
        let projection_date = options.reference_date.filter(|_| {
            activity.kind() == ActivityKind::Project
                && (activity.stored_projected_start_date().is_none()
                    || activity.stored_projected_end_date().is_none())
        });

        let mut rollup = ChildRollup::default();
        for child_id in activity.child_ids() {
            rollup.add(self.get(child_id)?, projection_date)?;
        }
        let completion = rollup.completion();

        let activity = self.get_mut(id)?;
        if let Some(start) = rollup.planned_start {
            activity.set_planned_start_date(start);
        }
        if let Some(end) = rollup.planned_end {
            activity.set_planned_end_date(end)?;
        }
        activity.set_actual_start_date(rollup.actual_start);
        activity.set_completion_percentage(completion);

        // Exact: only children that are all at 100% average to exactly 100.
        if completion == 100.0 {
            match (rollup.actual_end, options.completion_policy) {
                (Some(end), _) => activity.set_actual_end_date(Some(end))?,
                (None, CompletionPolicy::Strict) => {
                    return Err(ScheduleError::wrong_schedule(
                        id,
                        "completion is 100% but no child has an actual end date",
                    ));
                }
                (None, CompletionPolicy::Lenient) => {
                    debug!(activity_id = %id, "100% complete without child actual end dates");
                }
            }
        }

        if projection_date.is_some() {
            if let (None, Some(start)) = (activity.projected_start_date, rollup.projected_start) {
                activity.set_projected_start_date(start)?;
            }
            if let (None, Some(end)) = (activity.projected_end_date, rollup.projected_end) {
                activity.set_projected_end_date(end)?;
            }
        }
        Ok(())
    }
}
