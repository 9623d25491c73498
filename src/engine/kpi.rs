//! Timeliness summary over a set of activity reports.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | On-Time Rate | Fraction of activities classified ON_TIME |
//! | Max Delay | Largest `delayed_by` (days) |
//! | Total Delay | Sum of `delayed_by` (days) |
//! | Avg Completion | Mean completion percentage |

use serde::{Deserialize, Serialize};

use super::ActivityReport;
use crate::models::ActivityStatus;

/// Status counts and delay metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusSummary {
    /// Number of activities summarized.
    pub activity_count: usize,
    pub on_time: usize,
    pub overdue: usize,
    pub delayed: usize,
    /// Fraction of on-time activities (0.0..1.0).
    pub on_time_rate: f64,
    /// Largest delay of any single activity (days).
    pub max_delayed_by: i64,
    /// Sum of delays (days).
    pub total_delayed_by: i64,
    /// Mean completion percentage (0.0..100.0).
    pub avg_completion: f64,
}

impl StatusSummary {
    /// Summarizes the given reports. An empty set counts as fully on time.
    pub fn calculate(reports: &[ActivityReport]) -> Self {
        let mut on_time = 0;
        let mut overdue = 0;
        let mut delayed = 0;
        let mut max_delayed_by: i64 = 0;
        let mut total_delayed_by: i64 = 0;
        let mut total_completion = 0.0;

        for report in reports {
            match report.status {
                ActivityStatus::OnTime => on_time += 1,
                ActivityStatus::Overdue => overdue += 1,
                ActivityStatus::Delayed => delayed += 1,
            }
            max_delayed_by = max_delayed_by.max(report.delayed_by);
            total_delayed_by += report.delayed_by;
            total_completion += report.completion_percentage;
        }

        let activity_count = reports.len();
        let (on_time_rate, avg_completion) = if activity_count == 0 {
            (1.0, 0.0)
        } else {
            (
                on_time as f64 / activity_count as f64,
                total_completion / activity_count as f64,
            )
        };

        Self {
            activity_count,
            on_time,
            overdue,
            delayed,
            on_time_rate,
            max_delayed_by,
            total_delayed_by,
            avg_completion,
        }
    }

    /// Whether no activity is late by more than `max_delay_days`.
    pub fn within_tolerance(&self, max_delay_days: i64) -> bool {
        self.max_delayed_by <= max_delay_days
    }
}
