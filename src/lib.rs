//! Activity hierarchy scheduling for the U-Engine ecosystem.
//!
//! Computes planned dates, actual-date and completion rollups, projected
//! dates, and timeliness status for a tree of activities linked by
//! parent/child composition and by precedence dependencies.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Activity`, `Dependency`, `Schedule`
//! - **`engine`**: Propagation (`process`), cycle detection, reports, status summary
//! - **`validation`**: Input integrity checks (references, date order, cycles)
//! - **`formats`**: Gantt task tree and flat schedule wire formats
//! - **`error`**: `ScheduleError`, `ScheduleResult<T>`
//!
//! # Scope
//!
//! Calendar days only: no working-day calendars, resource leveling, or
//! critical path. Each `process` call recomputes everything reachable from
//! the root.
//!
//! # References
//!
//! - PMI (2021), "A Guide to the Project Management Body of Knowledge", 7th ed.
//! - Cormen et al. (2009), "Introduction to Algorithms", Ch. 22

pub mod engine;
pub mod error;
pub mod formats;
pub mod models;
pub mod validation;

pub use error::{ScheduleError, ScheduleResult};
