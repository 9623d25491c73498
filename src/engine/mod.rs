//! Date propagation, rollup, cycle detection, and read-back.
//!
//! The engine adds `process`, `process_with`, `detect_cycle`, `find_cycle`,
//! and `report` to [`Schedule`](crate::models::Schedule).
//!
//! # Usage
//!
//! 1. Build a `Schedule` (directly or through [`crate::formats`]).
//! 2. Call `detect_cycle()` if the input is untrusted.
//! 3. Call `process()` to fill planned dates, actual dates, and completion.
//! 4. Read results with `report(today)`, optionally summarized by `StatusSummary`.
//!
//! # Concurrency
//!
//! Single-threaded and synchronous. `process` takes `&mut Schedule`, so one
//! traversal at a time is enforced by the borrow checker.

mod cycle;
mod kpi;
mod options;
mod propagation;
mod report;

pub use kpi::StatusSummary;
pub use options::{local_today, CompletionPolicy, ProcessOptions};
pub use report::ActivityReport;
