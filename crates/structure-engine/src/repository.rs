//! Repository facade
//!
//! The only gateway between screens and the store. Writes resolve to a
//! `Result` once the blocking worker has committed; reads are live queries.

use std::time::Duration;

use async_trait::async_trait;
use structure_core::draft::DraftRoutine;
use structure_core::errors::ExError;
use structure_core::model::{Movement, MovementSkeleton, MovementUserData, Routine, Workout};
use structure_core::{log_op_end, log_op_error, log_op_start};
use structure_core_types::RequestContext;
use structure_store::repo::hydration::{self, Depth};
use structure_store::{CascadeReport, MaterializedRoutine, SqliteRepo};

use crate::database::{Database, Table};
use crate::live::LiveQuery;

type Result<T> = std::result::Result<T, ExError>;

#[async_trait]
pub trait StructureRepository: Send + Sync {
    /// Upsert by name
    async fn insert_routine(&self, routine: Routine) -> Result<()>;

    /// Upsert by id
    async fn insert_workout(&self, workout: Workout) -> Result<()>;

    /// Insert; `AlreadyExists` if the id is taken
    async fn insert_movement(&self, movement: Movement) -> Result<()>;

    /// Commit a routine draft in one transaction
    async fn insert_draft_routine(&self, draft: &DraftRoutine) -> Result<MaterializedRoutine>;

    /// Append set-log rows sharing one creation timestamp
    async fn insert_user_data_with_timestamp(&self, rows: Vec<MovementUserData>)
        -> Result<Vec<i64>>;

    /// Rewrite persisted set-log rows
    async fn update_user_data(&self, rows: Vec<MovementUserData>) -> Result<usize>;

    /// Make one routine the only current one
    async fn set_current_routine(&self, name: &str) -> Result<()>;

    /// Rows of the `session_count` most recent saves of a movement
    async fn get_history_for_movement(
        &self,
        movement_id: i64,
        session_count: u32,
    ) -> Result<Vec<MovementUserData>>;

    /// Delete a routine with its workouts and movements
    async fn delete_routine_cascade(&self, routine: &Routine) -> Result<CascadeReport>;

    /// Every routine with its workouts, ordered by name
    fn load_all_routines(&self) -> LiveQuery<Vec<Routine>>;

    /// Workouts of one routine, ordered by id
    fn load_workouts_for(&self, routine_name: &str) -> LiveQuery<Vec<Workout>>;

    /// Movements of one workout, ordered by id
    fn load_movements_for(&self, workout_id: i64) -> LiveQuery<Vec<Movement>>;

    /// The current routine with its workouts, if one is flagged
    fn load_current_routine(&self) -> LiveQuery<Option<Routine>>;

    /// Catalog ordered by muscle group, then name
    fn load_all_movement_skeletons(&self) -> LiveQuery<Vec<MovementSkeleton>>;
}

/// `StructureRepository` over the SQLite store
///
/// Clones share the same database, so a clone can be moved into a spawned
/// task to run a write without awaiting it.
#[derive(Clone)]
pub struct SqliteStructureRepository {
    db: Database,
    idle_timeout: Duration,
}

impl SqliteStructureRepository {
    pub fn new(db: Database, idle_timeout: Duration) -> Self {
        Self { db, idle_timeout }
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Run a logged write tagged with a fresh request id
    async fn logged_write<T, F>(
        &self,
        op: &'static str,
        tables: &'static [Table],
        f: F,
    ) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut rusqlite::Connection) -> Result<T> + Send + 'static,
    {
        let ctx = RequestContext::new();
        log_op_start!(op, request_id = %ctx.request_id);

        let result = self
            .db
            .write(tables, f)
            .await
            .map_err(|err| err.with_request_id(ctx.request_id));

        match &result {
            Ok(_) => log_op_end!(op, duration_ms = ctx.elapsed_ms(), request_id = %ctx.request_id),
            Err(err) => log_op_error!(
                op,
                err,
                duration_ms = ctx.elapsed_ms(),
                request_id = %ctx.request_id
            ),
        }
        result
    }

    fn live<T, F>(&self, name: &'static str, tables: &[Table], query: F) -> LiveQuery<T>
    where
        T: Clone + Send + Sync + 'static,
        F: Fn(&rusqlite::Connection) -> Result<T> + Send + Sync + 'static,
    {
        LiveQuery::new(name, self.db.clone(), tables, self.idle_timeout, query)
    }
}

const ROUTINE_GRAPH: &[Table] = &[Table::Routine, Table::Workout, Table::Movement];

#[async_trait]
impl StructureRepository for SqliteStructureRepository {
    async fn insert_routine(&self, routine: Routine) -> Result<()> {
        self.logged_write("insert_routine", &[Table::Routine], move |conn| {
            SqliteRepo::insert_routine(conn, &routine)
        })
        .await
    }

    async fn insert_workout(&self, workout: Workout) -> Result<()> {
        self.logged_write("insert_workout", &[Table::Workout], move |conn| {
            SqliteRepo::insert_workout(conn, &workout)
        })
        .await
    }

    async fn insert_movement(&self, movement: Movement) -> Result<()> {
        self.logged_write("insert_movement", &[Table::Movement], move |conn| {
            SqliteRepo::insert_movement(conn, &movement)
        })
        .await
    }

    async fn insert_draft_routine(&self, draft: &DraftRoutine) -> Result<MaterializedRoutine> {
        let draft = draft.clone();
        self.logged_write("insert_draft_routine", ROUTINE_GRAPH, move |conn| {
            SqliteRepo::materialize_draft(conn, &draft)
        })
        .await
    }

    async fn insert_user_data_with_timestamp(
        &self,
        rows: Vec<MovementUserData>,
    ) -> Result<Vec<i64>> {
        let now_ms = chrono::Utc::now().timestamp_millis();
        self.logged_write(
            "insert_user_data_with_timestamp",
            &[Table::MovementUserData],
            move |conn| SqliteRepo::insert_user_data_with_timestamp(conn, &rows, now_ms),
        )
        .await
    }

    async fn update_user_data(&self, rows: Vec<MovementUserData>) -> Result<usize> {
        let now_ms = chrono::Utc::now().timestamp_millis();
        self.logged_write("update_user_data", &[Table::MovementUserData], move |conn| {
            SqliteRepo::update_user_data(conn, &rows, now_ms)
        })
        .await
    }

    async fn set_current_routine(&self, name: &str) -> Result<()> {
        let name = name.to_string();
        self.logged_write("set_current_routine", &[Table::Routine], move |conn| {
            SqliteRepo::set_current_routine(conn, &name)
        })
        .await
    }

    async fn get_history_for_movement(
        &self,
        movement_id: i64,
        session_count: u32,
    ) -> Result<Vec<MovementUserData>> {
        self.db
            .read(move |conn| SqliteRepo::movement_history(conn, movement_id, session_count))
            .await
    }

    async fn delete_routine_cascade(&self, routine: &Routine) -> Result<CascadeReport> {
        let routine = routine.clone();
        self.logged_write("delete_routine_cascade", ROUTINE_GRAPH, move |conn| {
            SqliteRepo::delete_routine_cascade(conn, &routine)
        })
        .await
    }

    fn load_all_routines(&self) -> LiveQuery<Vec<Routine>> {
        self.live(
            "load_all_routines",
            &[Table::Routine, Table::Workout],
            hydration::load_routines_with_workouts,
        )
    }

    fn load_workouts_for(&self, routine_name: &str) -> LiveQuery<Vec<Workout>> {
        let routine_name = routine_name.to_string();
        self.live("load_workouts_for", &[Table::Workout], move |conn| {
            SqliteRepo::load_workouts(conn, &routine_name)
        })
    }

    fn load_movements_for(&self, workout_id: i64) -> LiveQuery<Vec<Movement>> {
        self.live("load_movements_for", &[Table::Movement], move |conn| {
            SqliteRepo::load_movements(conn, workout_id)
        })
    }

    fn load_current_routine(&self) -> LiveQuery<Option<Routine>> {
        self.live(
            "load_current_routine",
            &[Table::Routine, Table::Workout],
            |conn| hydration::load_current_routine_tree(conn, Depth::Workouts),
        )
    }

    fn load_all_movement_skeletons(&self) -> LiveQuery<Vec<MovementSkeleton>> {
        self.live(
            "load_all_movement_skeletons",
            &[Table::MovementSkeleton],
            SqliteRepo::load_all_movement_skeletons,
        )
    }
}
