//! Session state and its command reducer
//!
//! Cross-screen state (the selected routine and workout, and the routine
//! draft being built) is an owned value. It changes only by applying a
//! `SessionCommand`, which keeps a single writer in charge of it; the engine
//! runs that writer as an actor.
//!
//! ```
//! use structure_core::session::{apply, SessionCommand, SessionState};
//!
//! let state = SessionState::default();
//! let state = apply(state, SessionCommand::SetDraftName { name: "PPL".into() }).unwrap();
//! assert_eq!(state.draft.name, "PPL");
//! ```

use serde::{Deserialize, Serialize};

use crate::draft::{DraftRoutine, DraftWorkout};
use crate::errors::{Result, StructureError};
use crate::model::{Routine, Workout};

/// Process-lifetime UI session state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    /// Last routine the user navigated into
    pub selected_routine: Option<Routine>,

    /// Last workout the user navigated into
    pub selected_workout: Option<Workout>,

    /// The single in-flight routine draft
    pub draft: DraftRoutine,
}

impl SessionState {
    /// # Errors
    ///
    /// `NotSelected` when no routine has been selected
    pub fn require_routine(&self) -> Result<&Routine> {
        self.selected_routine
            .as_ref()
            .ok_or_else(|| StructureError::NotSelected {
                what: "routine".to_string(),
            })
    }

    /// # Errors
    ///
    /// `NotSelected` when no workout has been selected
    pub fn require_workout(&self) -> Result<&Workout> {
        self.selected_workout
            .as_ref()
            .ok_or_else(|| StructureError::NotSelected {
                what: "workout".to_string(),
            })
    }
}

/// Every mutation the session supports
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    SelectRoutine { routine: Routine },
    SelectWorkout { workout: Workout },
    SetDraftName { name: String },
    /// Append a finished workout draft to the routine draft
    AddDraftWorkout { workout: DraftWorkout },
    /// Discard the routine draft (on cancel)
    ClearDraft,
    /// The given snapshot of the draft was saved; drop only what it covered
    DraftCommitted { committed: DraftRoutine },
}

impl SessionCommand {
    /// Short stable name for logging
    pub fn name(&self) -> &'static str {
        match self {
            SessionCommand::SelectRoutine { .. } => "select_routine",
            SessionCommand::SelectWorkout { .. } => "select_workout",
            SessionCommand::SetDraftName { .. } => "set_draft_name",
            SessionCommand::AddDraftWorkout { .. } => "add_draft_workout",
            SessionCommand::ClearDraft => "clear_draft",
            SessionCommand::DraftCommitted { .. } => "draft_committed",
        }
    }
}

/// Apply a command, returning the next state
///
/// Takes ownership of the current state. On error the caller's previous
/// snapshot remains the valid state.
///
/// # Errors
///
/// `InvalidName` when a workout draft with a blank name is added to the
/// routine draft
pub fn apply(mut state: SessionState, cmd: SessionCommand) -> Result<SessionState> {
    match cmd {
        SessionCommand::SelectRoutine { routine } => {
            state.selected_routine = Some(routine);
        }
        SessionCommand::SelectWorkout { workout } => {
            state.selected_workout = Some(workout);
        }
        SessionCommand::SetDraftName { name } => {
            state.draft.set_name(name);
        }
        SessionCommand::AddDraftWorkout { workout } => {
            if workout.name.trim().is_empty() {
                return Err(StructureError::InvalidName {
                    reason: "Workout name cannot be empty or whitespace-only".to_string(),
                });
            }
            state.draft.add_workout(workout);
        }
        SessionCommand::ClearDraft => {
            state.draft = DraftRoutine::default();
        }
        SessionCommand::DraftCommitted { committed } => {
            state.draft.release_committed(&committed);
        }
    }
    Ok(state)
}
