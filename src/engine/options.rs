//! Processing options.

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

/// What a composite rolled up to exactly 100% does when none of its
/// children reports an actual end date.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionPolicy {
    /// Fail with `WrongSchedule`.
    #[default]
    Strict,
    /// Leave the composite's actual end untouched.
    Lenient,
}

/// Options for [`Schedule::process_with`](crate::models::Schedule::process_with).
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use u_rollup::engine::{CompletionPolicy, ProcessOptions};
///
/// let options = ProcessOptions::new()
///     .with_completion_policy(CompletionPolicy::Lenient)
///     .with_reference_date(NaiveDate::from_ymd_opt(2025, 1, 15).unwrap());
/// assert_eq!(options.completion_policy, CompletionPolicy::Lenient);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessOptions {
    /// 100% rollup without child actual ends.
    #[serde(default)]
    pub completion_policy: CompletionPolicy,
    /// When set, project composites without stored projected dates get them
    /// rolled up from their children as of this date.
    #[serde(default)]
    pub reference_date: Option<NaiveDate>,
}

impl ProcessOptions {
    /// Strict policy, no projected rollup.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the completion policy.
    pub fn with_completion_policy(mut self, policy: CompletionPolicy) -> Self {
        self.completion_policy = policy;
        self
    }

    /// Enables projected-date rollup as of `today`.
    pub fn with_reference_date(mut self, today: NaiveDate) -> Self {
        self.reference_date = Some(today);
        self
    }
}

/// Today in the local time zone.
pub fn local_today() -> NaiveDate {
    Local::now().date_naive()
}
