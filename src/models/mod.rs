//! Schedule domain models.
//!
//! Provides the activity hierarchy the engine operates on. Activities are
//! stored in an id-keyed arena (`Schedule`); composition and precedence are
//! id references into it.
//!
//! # Structure
//!
//! | Type | Role |
//! |------|------|
//! | Activity | One node: planned, actual, and projected dates plus completion |
//! | Dependency | Precedence edge (FS/SS/FF/SF + lag) stored on a leaf |
//! | Schedule | Root id + activity arena |

mod activity;
mod dependency;
mod schedule;

pub use activity::{Activity, ActivityKind, ActivityStatus};
pub(crate) use activity::shift_days;
pub use dependency::{Dependency, RelationKind};
pub use schedule::Schedule;
