//! Screen state reducers
//!
//! Each screen owns the subscriptions it renders from and maps them into a
//! `LoadState` of its own view state. Actions go through the repository or
//! the session handle; nothing here touches the store directly.

pub mod build_routine;
pub mod build_workout;
pub mod home;
pub mod my_routines;
pub mod single_routine;
pub mod workout;

pub use build_routine::BuildRoutineScreen;
pub use build_workout::{BuildWorkoutScreen, BuildWorkoutState};
pub use home::HomeScreen;
pub use my_routines::MyRoutinesScreen;
pub use single_routine::{SingleRoutineScreen, SingleRoutineState};
pub use workout::{WorkoutScreen, WorkoutState};
