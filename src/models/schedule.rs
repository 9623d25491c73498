//! Schedule model.
//!
//! A schedule is an arena of activities keyed by id plus the id of the root.
//! Composition (`child_ids` / `parent_id`) and precedence
//! (`Dependency::predecessor_id`) are plain id lookups into this arena;
//! no activity owns another.
//!
//! The propagation engine (`process`, `detect_cycle`) is implemented in
//! [`crate::engine`] on top of this type.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{Activity, Dependency};
use crate::error::{ScheduleError, ScheduleResult};

/// An activity hierarchy rooted at `root_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    pub(crate) root_id: String,
    pub(crate) activities: BTreeMap<String, Activity>,
}

impl Schedule {
    /// Creates an empty schedule. The root activity is added like any other.
    pub fn new(root_id: impl Into<String>) -> Self {
        Self {
            root_id: root_id.into(),
            activities: BTreeMap::new(),
        }
    }

    /// Builds a schedule from a list of activities.
    ///
    /// # Errors
    /// `DuplicateActivity` if two activities share an id.
    pub fn from_activities(
        root_id: impl Into<String>,
        activities: impl IntoIterator<Item = Activity>,
    ) -> ScheduleResult<Self> {
        let mut schedule = Self::new(root_id);
        for activity in activities {
            schedule.add_activity(activity)?;
        }
        Ok(schedule)
    }

    /// Adds an activity, replacing any activity with the same id.
    pub fn with_activity(mut self, activity: Activity) -> Self {
        self.activities.insert(activity.id.clone(), activity);
        self
    }

    /// Adds an activity.
    ///
    /// # Errors
    /// `DuplicateActivity` if the id is already present.
    pub fn add_activity(&mut self, activity: Activity) -> ScheduleResult<()> {
        if self.activities.contains_key(&activity.id) {
            return Err(ScheduleError::DuplicateActivity {
                activity_id: activity.id,
            });
        }
        self.activities.insert(activity.id.clone(), activity);
        Ok(())
    }

    /// Appends `child_id` to the parent's children and sets the child's back-reference.
    pub fn link_child(&mut self, parent_id: &str, child_id: &str) -> ScheduleResult<()> {
        if !self.activities.contains_key(parent_id) {
            return Err(ScheduleError::not_found(parent_id));
        }
        let child = self.get_mut(child_id)?;
        child.parent_id = Some(parent_id.to_string());

        let parent = self.get_mut(parent_id)?;
        if !parent.child_ids.iter().any(|id| id == child_id) {
            parent.child_ids.push(child_id.to_string());
        }
        Ok(())
    }

    /// Attaches a dependency to `successor_id`. Both ends must exist.
    pub fn add_dependency(&mut self, successor_id: &str, dependency: Dependency) -> ScheduleResult<()> {
        if !self.activities.contains_key(&dependency.predecessor_id) {
            return Err(ScheduleError::not_found(dependency.predecessor_id));
        }
        self.get_mut(successor_id)?.dependencies.push(dependency);
        Ok(())
    }

    pub fn root_id(&self) -> &str {
        &self.root_id
    }

    /// The root activity.
    pub fn root(&self) -> ScheduleResult<&Activity> {
        self.get(&self.root_id)
    }

    /// Looks up an activity.
    pub fn activity(&self, id: &str) -> Option<&Activity> {
        self.activities.get(id)
    }

    /// Looks up an activity, failing with `ActivityNotFound`.
    pub fn get(&self, id: &str) -> ScheduleResult<&Activity> {
        self.activities
            .get(id)
            .ok_or_else(|| ScheduleError::not_found(id))
    }

    pub(crate) fn get_mut(&mut self, id: &str) -> ScheduleResult<&mut Activity> {
        self.activities
            .get_mut(id)
            .ok_or_else(|| ScheduleError::not_found(id))
    }

    /// All activities, ordered by id.
    pub fn activities(&self) -> impl Iterator<Item = &Activity> {
        self.activities.values()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.activities.contains_key(id)
    }

    /// Number of activities, root included.
    pub fn activity_count(&self) -> usize {
        self.activities.len()
    }

    /// Consumes the schedule, returning the activity map.
    pub fn into_activities(self) -> BTreeMap<String, Activity> {
        self.activities
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_schedule() -> Schedule {
        let mut s = Schedule::new("P");
        s.add_activity(Activity::project("P")).unwrap();
        s.add_activity(Activity::task("A")).unwrap();
        s.add_activity(Activity::task("B")).unwrap();
        s.link_child("P", "A").unwrap();
        s.link_child("P", "B").unwrap();
        s.add_dependency("B", Dependency::finish_to_start("A").with_lag(1))
            .unwrap();
        s
    }

    #[test]
    fn test_link_child_sets_both_directions() {
        let s = sample_schedule();
        assert_eq!(s.get("P").unwrap().child_ids(), ["A", "B"]);
        assert_eq!(s.get("A").unwrap().parent_id(), Some("P"));
        assert_eq!(s.get("B").unwrap().dependencies().len(), 1);
        assert_eq!(s.root().unwrap().id(), "P");
        assert_eq!(s.activity_count(), 3);
    }

    #[test]
    fn test_link_child_is_not_duplicated() {
        let mut s = sample_schedule();
        s.link_child("P", "A").unwrap();
        assert_eq!(s.get("P").unwrap().child_ids().len(), 2);
    }

    #[test]
    fn test_unknown_references() {
        let mut s = sample_schedule();
        assert_eq!(
            s.link_child("P", "Z").unwrap_err(),
            ScheduleError::not_found("Z")
        );
        assert_eq!(
            s.link_child("Z", "A").unwrap_err(),
            ScheduleError::not_found("Z")
        );
        assert_eq!(
            s.add_dependency("A", Dependency::start_to_start("Z"))
                .unwrap_err(),
            ScheduleError::not_found("Z")
        );
        assert!(s.get("Z").is_err());
        assert!(s.activity("Z").is_none());
    }

    #[test]
    fn test_duplicate_activity() {
        let err = Schedule::from_activities("A", vec![Activity::task("A"), Activity::task("A")])
            .unwrap_err();
        assert!(matches!(err, ScheduleError::DuplicateActivity { .. }));

        // Builder replaces instead
        let s = Schedule::new("A")
            .with_activity(Activity::task("A"))
            .with_activity(Activity::milestone("A"));
        assert_eq!(s.activity_count(), 1);
        assert_eq!(s.get("A").unwrap().kind(), crate::models::ActivityKind::Milestone);
    }

    #[test]
    fn test_activities_are_ordered_by_id() {
        let s = sample_schedule();
        let ids: Vec<&str> = s.activities().map(|a| a.id()).collect();
        assert_eq!(ids, vec!["A", "B", "P"]);
    }
}
