//! Precedence dependency between two leaf activities.
//!
//! # Relation Kinds
//!
//! | Kind | Constrains | Derived from |
//! |------|-----------|--------------|
//! | FS | successor start | predecessor end |
//! | SS | successor start | predecessor start |
//! | FF | successor end | predecessor end |
//! | SF | successor end | predecessor start |
//!
//! The lag is a signed number of calendar days added to the predecessor date.

use serde::{Deserialize, Serialize};

/// Relation between a predecessor and a successor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RelationKind {
    /// Finish-to-start.
    #[serde(rename = "FS")]
    FinishToStart,
    /// Start-to-start.
    #[serde(rename = "SS")]
    StartToStart,
    /// Finish-to-finish.
    #[serde(rename = "FF")]
    FinishToFinish,
    /// Start-to-finish.
    #[serde(rename = "SF")]
    StartToFinish,
}

impl RelationKind {
    /// Whether the predecessor's planned start (rather than end) is the anchor.
    pub fn anchors_on_start(self) -> bool {
        matches!(self, Self::StartToStart | Self::StartToFinish)
    }

    /// Whether the successor's planned start (rather than end) is constrained.
    pub fn constrains_start(self) -> bool {
        matches!(self, Self::FinishToStart | Self::StartToStart)
    }
}

/// A precedence edge stored on the successor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependency {
    /// Id of the activity this one depends on.
    pub predecessor_id: String,
    /// Signed offset in days.
    pub lag: i64,
    /// Relation kind.
    pub kind: RelationKind,
}

impl Dependency {
    /// Creates a dependency with zero lag.
    pub fn new(predecessor_id: impl Into<String>, kind: RelationKind) -> Self {
        Self {
            predecessor_id: predecessor_id.into(),
            lag: 0,
            kind,
        }
    }

    /// Finish-to-start dependency.
    pub fn finish_to_start(predecessor_id: impl Into<String>) -> Self {
        Self::new(predecessor_id, RelationKind::FinishToStart)
    }

    /// Start-to-start dependency.
    pub fn start_to_start(predecessor_id: impl Into<String>) -> Self {
        Self::new(predecessor_id, RelationKind::StartToStart)
    }

    /// Finish-to-finish dependency.
    pub fn finish_to_finish(predecessor_id: impl Into<String>) -> Self {
        Self::new(predecessor_id, RelationKind::FinishToFinish)
    }

    /// Start-to-finish dependency.
    pub fn start_to_finish(predecessor_id: impl Into<String>) -> Self {
        Self::new(predecessor_id, RelationKind::StartToFinish)
    }

    /// Sets the lag in days.
    pub fn with_lag(mut self, lag: i64) -> Self {
        self.lag = lag;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dependency_builder() {
        let dep = Dependency::finish_to_start("A").with_lag(-2);
        assert_eq!(dep.predecessor_id, "A");
        assert_eq!(dep.lag, -2);
        assert_eq!(dep.kind, RelationKind::FinishToStart);
    }

    #[test]
    fn test_relation_anchors() {
        assert!(RelationKind::FinishToStart.constrains_start());
        assert!(!RelationKind::FinishToStart.anchors_on_start());
        assert!(RelationKind::StartToStart.constrains_start());
        assert!(RelationKind::StartToStart.anchors_on_start());
        assert!(!RelationKind::FinishToFinish.constrains_start());
        assert!(!RelationKind::FinishToFinish.anchors_on_start());
        assert!(!RelationKind::StartToFinish.constrains_start());
        assert!(RelationKind::StartToFinish.anchors_on_start());
    }

    #[test]
    fn test_relation_kind_wire_names() {
        let json = serde_json::to_string(&RelationKind::StartToFinish).unwrap();
        assert_eq!(json, "\"SF\"");
        let kind: RelationKind = serde_json::from_str("\"FF\"").unwrap();
        assert_eq!(kind, RelationKind::FinishToFinish);
    }
}
