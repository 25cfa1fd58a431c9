//! Session actor
//!
//! One task owns the `SessionState` and applies `SessionCommand`s in arrival
//! order. `SessionHandle` is a thin wrapper around the command sender and is
//! cheap to clone; every new state is also published on a watch channel.

use structure_core::draft::{DraftRoutine, DraftWorkout};
use structure_core::errors::{ExError, ExErrorKind};
use structure_core::model::{Routine, Workout};
use structure_core::session::{apply, SessionCommand, SessionState};
use tokio::sync::{mpsc, oneshot, watch};

type Result<T> = std::result::Result<T, ExError>;

const MAILBOX_CAPACITY: usize = 64;

struct Envelope {
    command: SessionCommand,
    reply: oneshot::Sender<Result<SessionState>>,
}

/// Handle for interacting with the session actor
#[derive(Clone)]
pub struct SessionHandle {
    tx: mpsc::Sender<Envelope>,
    snapshots: watch::Receiver<SessionState>,
}

impl SessionHandle {
    /// Spawn an actor with an empty session
    ///
    /// Must be called within a tokio runtime. The actor stops when the last
    /// handle is dropped.
    pub fn spawn() -> Self {
        Self::spawn_with(SessionState::default())
    }

    pub fn spawn_with(initial: SessionState) -> Self {
        let (tx, rx) = mpsc::channel(MAILBOX_CAPACITY);
        let (snapshot_tx, snapshots) = watch::channel(initial.clone());
        tokio::spawn(run_actor(initial, rx, snapshot_tx));
        Self { tx, snapshots }
    }

    /// Apply a command and return the resulting state
    ///
    /// # Errors
    ///
    /// The reducer's error (state unchanged), or `Concurrency` if the actor
    /// is gone
    pub async fn send(&self, command: SessionCommand) -> Result<SessionState> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(Envelope {
                command,
                reply: reply_tx,
            })
            .await
            .map_err(|_| actor_shutdown())?;

        reply_rx.await.map_err(|_| actor_shutdown())?
    }

    /// Latest published state
    pub fn snapshot(&self) -> SessionState {
        self.snapshots.borrow().clone()
    }

    /// Observe every new state
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.snapshots.clone()
    }

    // ------------------------------------------------------------------------
    // Commands
    // ------------------------------------------------------------------------

    /// # Errors
    ///
    /// `Concurrency` if the actor is gone
    pub async fn select_routine(&self, routine: Routine) -> Result<SessionState> {
        self.send(SessionCommand::SelectRoutine { routine }).await
    }

    /// # Errors
    ///
    /// `Concurrency` if the actor is gone
    pub async fn select_workout(&self, workout: Workout) -> Result<SessionState> {
        self.send(SessionCommand::SelectWorkout { workout }).await
    }

    /// # Errors
    ///
    /// `Concurrency` if the actor is gone
    pub async fn set_draft_name(&self, name: impl Into<String>) -> Result<SessionState> {
        self.send(SessionCommand::SetDraftName { name: name.into() })
            .await
    }

    /// # Errors
    ///
    /// `InvalidName` for a blank workout name, or `Concurrency` if the actor
    /// is gone
    pub async fn add_draft_workout(&self, workout: DraftWorkout) -> Result<SessionState> {
        self.send(SessionCommand::AddDraftWorkout { workout }).await
    }

    /// # Errors
    ///
    /// `Concurrency` if the actor is gone
    pub async fn clear_draft(&self) -> Result<SessionState> {
        self.send(SessionCommand::ClearDraft).await
    }

    /// Drop the part of the draft that `committed` saved
    ///
    /// # Errors
    ///
    /// `Concurrency` if the actor is gone
    pub async fn draft_committed(&self, committed: DraftRoutine) -> Result<SessionState> {
        self.send(SessionCommand::DraftCommitted { committed }).await
    }
}

async fn run_actor(
    mut state: SessionState,
    mut rx: mpsc::Receiver<Envelope>,
    snapshots: watch::Sender<SessionState>,
) {
    while let Some(Envelope { command, reply }) = rx.recv().await {
        let name = command.name();
        let result = apply(state.clone(), command).map_err(ExError::from);

        match &result {
            Ok(next) => {
                state = next.clone();
                snapshots.send_replace(next.clone());
                tracing::debug!(op = "session_apply", command = name, "session updated");
            }
            Err(err) => {
                tracing::debug!(
                    op = "session_apply",
                    command = name,
                    err_code = err.code(),
                    "session command rejected"
                );
            }
        }

        // The caller may have stopped waiting
        let _ = reply.send(result);
    }
}

fn actor_shutdown() -> ExError {
    ExError::new(ExErrorKind::Concurrency)
        .with_op("session")
        .with_message("Session actor has shut down")
}
