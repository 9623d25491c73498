//! Input validation for activity schedules.
//!
//! Checks structural integrity of a schedule before processing and reports
//! every issue at once. Detects:
//! - Missing root activity
//! - Unknown child, parent, or predecessor references
//! - Child lists and parent back-references that disagree
//! - Composites that also carry dependencies
//! - Planned or actual end dates before their start dates
//! - Completion percentages outside 0..=100
//! - Cycles reachable from the root
//!
//! # Reference
//! Cormen et al. (2009), "Introduction to Algorithms", Ch. 22.3

use crate::models::Schedule;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Activity the issue was found on.
    pub activity_id: String,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// The root id is not in the schedule.
    MissingRoot,
    /// A child, parent, or predecessor id is not in the schedule.
    UnknownReference,
    /// A child does not point back to the parent listing it, or vice versa.
    ParentMismatch,
    /// An activity has both children and dependencies.
    MixedComposition,
    /// Planned end before planned start.
    PlannedDateOrder,
    /// Actual end before actual start.
    ActualDateOrder,
    /// Completion outside 0..=100.
    CompletionOutOfRange,
    /// A cycle is reachable from the root.
    CyclicDependency,
}

impl ValidationError {
    fn new(
        kind: ValidationErrorKind,
        activity_id: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            activity_id: activity_id.into(),
            message: message.into(),
        }
    }
}

/// Validates a schedule before processing.
///
/// Checks:
/// 1. The root activity exists
/// 2. All child, parent, and predecessor references resolve
/// 3. Child lists and parent back-references agree
/// 4. No activity has both children and dependencies
/// 5. Planned and actual date pairs are ordered
/// 6. Completion is within 0..=100
/// 7. No cycle is reachable from the root (only when 1 and 2 pass)
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_schedule(schedule: &Schedule) -> ValidationResult {
    let mut errors = Vec::new();

    if !schedule.contains(schedule.root_id()) {
        errors.push(ValidationError::new(
            ValidationErrorKind::MissingRoot,
            schedule.root_id(),
            format!("Root activity '{}' not found", schedule.root_id()),
        ));
    }

    for act in schedule.activities() {
        let id = act.id();

        for child_id in act.child_ids() {
            match schedule.activity(child_id) {
                None => errors.push(ValidationError::new(
                    ValidationErrorKind::UnknownReference,
                    id,
                    format!("Activity '{id}' references unknown child '{child_id}'"),
                )),
                Some(child) if child.parent_id() != Some(id) => {
                    errors.push(ValidationError::new(
                        ValidationErrorKind::ParentMismatch,
                        child_id.as_str(),
                        format!(
                            "Activity '{child_id}' is a child of '{id}' but its parent is {:?}",
                            child.parent_id()
                        ),
                    ))
                }
                Some(_) => {}
            }
        }

        if let Some(parent_id) = act.parent_id() {
            match schedule.activity(parent_id) {
                None => errors.push(ValidationError::new(
                    ValidationErrorKind::UnknownReference,
                    id,
                    format!("Activity '{id}' references unknown parent '{parent_id}'"),
                )),
                Some(parent) if !parent.child_ids().iter().any(|c| c == id) => {
                    errors.push(ValidationError::new(
                        ValidationErrorKind::ParentMismatch,
                        id,
                        format!("Activity '{id}' names '{parent_id}' as parent but is not among its children"),
                    ))
                }
                Some(_) => {}
            }
        }

        for dep in act.dependencies() {
            if !schedule.contains(&dep.predecessor_id) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::UnknownReference,
                    id,
                    format!(
                        "Activity '{id}' references unknown predecessor '{}'",
                        dep.predecessor_id
                    ),
                ));
            }
        }

        if act.is_composite() && !act.dependencies().is_empty() {
            errors.push(ValidationError::new(
                ValidationErrorKind::MixedComposition,
                id,
                format!("Activity '{id}' has both children and dependencies"),
            ));
        }

        if let (Some(start), Some(end)) = (act.planned_start_date(), act.planned_end_date()) {
            if end < start {
                errors.push(ValidationError::new(
                    ValidationErrorKind::PlannedDateOrder,
                    id,
                    format!("Activity '{id}' planned end {end} is before planned start {start}"),
                ));
            }
        }

        if let (Some(start), Some(end)) = (act.actual_start_date(), act.actual_end_date()) {
            if end < start {
                errors.push(ValidationError::new(
                    ValidationErrorKind::ActualDateOrder,
                    id,
                    format!("Activity '{id}' actual end {end} is before actual start {start}"),
                ));
            }
        }

        if !(0.0..=100.0).contains(&act.completion_percentage()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::CompletionOutOfRange,
                id,
                format!(
                    "Activity '{id}' completion {} is outside 0..=100",
                    act.completion_percentage()
                ),
            ));
        }
    }

    // Cycle search needs a root and resolvable edges
    let resolvable = errors.iter().all(|e| {
        !matches!(
            e.kind,
            ValidationErrorKind::MissingRoot | ValidationErrorKind::UnknownReference
        )
    });
    if resolvable {
        if let Ok(Some(cycle)) = schedule.find_cycle() {
            errors.push(ValidationError::new(
                ValidationErrorKind::CyclicDependency,
                cycle[0].as_str(),
                format!("Circular dependency detected: {}", cycle.join(" -> ")),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
