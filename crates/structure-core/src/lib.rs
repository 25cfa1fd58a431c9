//! Structure Core - domain model and pure logic for workout routines
//!
//! This crate provides:
//! - Routine / Workout / Movement / MovementUserData / MovementSkeleton models
//! - Draft builders for routines under construction
//! - Session state with a command reducer (`session::apply`)
//! - Set log for an active workout session
//! - History grouping into per-session buckets
//! - Catalog search
//! - Error facility (`ExError`) and logging facility
//!
//! Nothing here performs I/O; persistence lives in `structure-store`.

pub mod draft;
pub mod errors;
pub mod history;
pub mod logging_facility;
pub mod model;
pub mod search;
pub mod session;
pub mod set_log;

// Used by the logging macros
#[doc(hidden)]
pub use structure_core_types;

// Re-export commonly used types
pub use draft::{DraftRoutine, DraftWorkout};
pub use errors::{ExError, ExErrorKind, Result, StructureError};
pub use history::{group_consecutive, group_sessions, SessionBucket};
pub use model::{Movement, MovementSkeleton, MovementUserData, Routine, Workout};
pub use session::{SessionCommand, SessionState};
pub use set_log::SetLog;
