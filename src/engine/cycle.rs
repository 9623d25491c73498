//! Cycle detection over composition and dependency edges.
//!
//! # Algorithm
//! Depth-first search from the root. An activity's outgoing edges are its
//! dependencies' predecessors and its children. Reaching an activity that
//! is on the current path is a back edge, hence a cycle. Activities whose
//! subtree was fully explored are not explored again.
//!
//! The search uses an explicit stack; exits are popped in LIFO order, so the
//! `path` vector always mirrors the current DFS path.
//!
//! # Reference
//! Cormen et al. (2009), "Introduction to Algorithms", Ch. 22.3 (edge classification)

use std::collections::HashSet;
use tracing::debug;

use crate::error::ScheduleResult;
use crate::models::Schedule;

impl Schedule {
    /// Whether a cycle is reachable from the root.
    ///
    /// Run this before [`process`](Self::process) on untrusted input.
    ///
    /// # Errors
    /// `ActivityNotFound` if a reachable edge points at an unknown id.
    pub fn detect_cycle(&self) -> ScheduleResult<bool> {
        Ok(self.find_cycle()?.is_some())
    }

    /// The first cycle reachable from the root, as a list of ids that starts
    /// and ends with the same activity.
    pub fn find_cycle(&self) -> ScheduleResult<Option<Vec<String>>> {
        let mut path: Vec<&str> = Vec::new();
        let mut on_path: HashSet<&str> = HashSet::new();
        let mut finished: HashSet<&str> = HashSet::new();
        let mut stack: Vec<(&str, bool)> = vec![(self.root_id.as_str(), false)];

        while let Some((id, exiting)) = stack.pop() {
            if exiting {
                path.pop();
                on_path.remove(id);
                finished.insert(id);
                continue;
            }
            if on_path.contains(id) {
                let from = path.iter().position(|p| *p == id).unwrap_or(0);
                let mut cycle: Vec<String> = path[from..].iter().map(|p| p.to_string()).collect();
                cycle.push(id.to_string());
                debug!(activity_id = %id, length = cycle.len() - 1, "cycle detected");
                return Ok(Some(cycle));
            }
            if finished.contains(id) {
                continue;
            }

            let activity = self.get(id)?;
            let id = activity.id();
            path.push(id);
            on_path.insert(id);
            stack.push((id, true));

            let next: Vec<&str> = activity
                .dependencies()
                .iter()
                .map(|dep| dep.predecessor_id.as_str())
                .chain(activity.child_ids().iter().map(String::as_str))
                .collect();
            for next_id in next.into_iter().rev() {
                stack.push((next_id, false));
            }
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use crate::error::ScheduleError;
    use crate::models::{Activity, Dependency, Schedule};
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};

    /// Leaves `ids`, each depending on the listed predecessors.
    fn dependency_graph(root: &str, edges: &[(&str, &[&str])]) -> Schedule {
        let mut s = Schedule::new(root);
        for (id, preds) in edges {
            let mut act = Activity::task(*id);
            for pred in *preds {
                act = act.with_dependency(Dependency::finish_to_start(*pred));
            }
            s = s.with_activity(act);
        }
        s
    }

    fn child_graph(root: &str, edges: &[(&str, &[&str])]) -> Schedule {
        let mut s = Schedule::new(root);
        for (id, children) in edges {
            let mut act = Activity::project(*id);
            for child in *children {
                act = act.with_child(*child);
            }
            s = s.with_activity(act);
        }
        s
    }

    #[test]
    fn test_dependency_cycle() {
        // 1 → 2 → 3 → 2
        let s = dependency_graph("1", &[("1", &["2"]), ("2", &["3"]), ("3", &["2"])]);
        assert!(s.detect_cycle().unwrap());
        assert_eq!(
            s.find_cycle().unwrap(),
            Some(vec!["2".to_string(), "3".to_string(), "2".to_string()])
        );
    }

    #[test]
    fn test_child_cycle() {
        let s = child_graph("1", &[("1", &["2"]), ("2", &["3"]), ("3", &["2"])]);
        assert!(s.detect_cycle().unwrap());
    }

    #[test]
    fn test_acyclic_same_size() {
        let s = dependency_graph("1", &[("1", &["2"]), ("2", &["3"]), ("3", &[])]);
        assert!(!s.detect_cycle().unwrap());
        let s = child_graph("1", &[("1", &["2"]), ("2", &["3"]), ("3", &[])]);
        assert!(!s.detect_cycle().unwrap());
    }

    #[test]
    fn test_two_node_cycle() {
        let s = dependency_graph("A", &[("A", &["B"]), ("B", &["A"])]);
        assert_eq!(
            s.find_cycle().unwrap(),
            Some(vec!["A".to_string(), "B".to_string(), "A".to_string()])
        );
    }

    #[test]
    fn test_self_dependency() {
        let s = dependency_graph("A", &[("A", &["A"])]);
        assert!(s.detect_cycle().unwrap());
    }

    #[test]
    fn test_diamond_is_acyclic() {
        // Root's children B and C both depend on A; D depends on both.
        let mut s = dependency_graph(
            "R",
            &[("A", &[]), ("B", &["A"]), ("C", &["A"]), ("D", &["B", "C"])],
        );
        s = s.with_activity(
            Activity::project("R")
                .with_child("A")
                .with_child("B")
                .with_child("C")
                .with_child("D"),
        );
        assert!(!s.detect_cycle().unwrap());
    }

    #[test]
    fn test_unreachable_cycle_is_ignored() {
        let s = dependency_graph("R", &[("R", &[]), ("X", &["Y"]), ("Y", &["X"])]);
        assert!(!s.detect_cycle().unwrap());
    }

    #[test]
    fn test_unknown_reference() {
        let s = dependency_graph("1", &[("1", &["2"])]);
        assert_eq!(s.detect_cycle().unwrap_err(), ScheduleError::not_found("2"));
    }

    #[test]
    fn test_random_chains() {
        let mut rng = SmallRng::seed_from_u64(7);
        for _ in 0..20 {
            let n = 30;
            let mut s = Schedule::new("P").with_activity(Activity::project("P"));
            for i in 0..n {
                let mut act = Activity::task(format!("T{i}"));
                if i > 0 {
                    act = act.with_dependency(Dependency::finish_to_start(format!("T{}", i - 1)));
                    for _ in 0..rng.random_range(0..3) {
                        let pred = rng.random_range(0..i);
                        act = act.with_dependency(Dependency::start_to_start(format!("T{pred}")));
                    }
                }
                s.add_activity(act).unwrap();
                s.link_child("P", &format!("T{i}")).unwrap();
            }
            assert!(!s.detect_cycle().unwrap());

            // Closing the chain creates a cycle through every activity
            s.add_dependency("T0", Dependency::finish_to_start(format!("T{}", n - 1)))
                .unwrap();
            assert!(s.detect_cycle().unwrap());
        }
    }

    #[test]
    fn test_deep_chain_does_not_overflow() {
        let n = 100_000;
        let last = format!("T{}", n - 1);
        let mut s = Schedule::new(last.as_str()).with_activity(Activity::task("T0"));
        for i in 1..n {
            s = s.with_activity(
                Activity::task(format!("T{i}"))
                    .with_dependency(Dependency::finish_to_start(format!("T{}", i - 1))),
            );
        }
        assert!(!s.detect_cycle().unwrap());

        s.add_dependency("T0", Dependency::finish_to_start(last.as_str()))
            .unwrap();
        assert_eq!(s.find_cycle().unwrap().map(|path| path.len()), Some(n + 1));
    }
}
