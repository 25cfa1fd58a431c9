//! Multi-table transactions over the routine/workout/movement graph

#![allow(clippy::result_large_err)]

use std::time::Instant;

use crate::errors::{from_rusqlite, Result};
use crate::repo::SqliteRepo;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use structure_core::draft::DraftRoutine;
use structure_core::errors::ExError;
use structure_core::model::Routine;
use structure_core::{log_op_end, log_op_error, log_op_start};

/// Ids assigned while committing a draft
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaterializedRoutine {
    pub routine_name: String,

    /// In draft order
    pub workout_ids: Vec<i64>,

    /// In draft order, workout by workout
    pub movement_ids: Vec<i64>,
}

/// Rows removed by a cascading routine delete
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CascadeReport {
    pub routine_name: String,
    pub workouts_deleted: usize,
    pub movements_deleted: usize,
}

impl SqliteRepo {
    /// Write a routine draft as routine, workout and movement rows
    ///
    /// Runs in one transaction: the routine is upserted with
    /// `is_current = false`, then every workout and movement gets the next id
    /// after the current table maximum. Any failure rolls everything back.
    ///
    /// # Errors
    ///
    /// `InvalidName` for a blank routine name, `MissingMapping` if a draft
    /// skeleton has no set count, or any persistence error
    pub fn materialize_draft(
        conn: &mut Connection,
        draft: &DraftRoutine,
    ) -> Result<MaterializedRoutine> {
        let start = Instant::now();
        log_op_start!(
            "materialize_draft",
            routine_name = draft.name.as_str(),
            workout_count = draft.workout_count(),
            movement_count = draft.movement_count()
        );

        let result = materialize_inner(conn, draft);

        let duration_ms = start.elapsed().as_millis() as u64;
        match &result {
            Ok(materialized) => log_op_end!(
                "materialize_draft",
                duration_ms = duration_ms,
                routine_name = materialized.routine_name.as_str(),
                workout_count = materialized.workout_ids.len(),
                movement_count = materialized.movement_ids.len()
            ),
            Err(err) => log_op_error!(
                "materialize_draft",
                err,
                duration_ms = duration_ms,
                routine_name = draft.name.as_str()
            ),
        }
        result
    }

    /// Delete a routine with all of its workouts and their movements
    ///
    /// Children go before parents, in one transaction. Set-log rows are
    /// kept. An unknown routine is a no-op reporting zero deletions.
    pub fn delete_routine_cascade(conn: &mut Connection, routine: &Routine) -> Result<CascadeReport> {
        let start = Instant::now();
        log_op_start!("delete_routine_cascade", routine_name = routine.name.as_str());

        let result = delete_cascade_inner(conn, &routine.name);

        let duration_ms = start.elapsed().as_millis() as u64;
        match &result {
            Ok(report) => log_op_end!(
                "delete_routine_cascade",
                duration_ms = duration_ms,
                routine_name = report.routine_name.as_str(),
                workout_count = report.workouts_deleted,
                movement_count = report.movements_deleted
            ),
            Err(err) => log_op_error!(
                "delete_routine_cascade",
                err,
                duration_ms = duration_ms,
                routine_name = routine.name.as_str()
            ),
        }
        result
    }
}

fn materialize_inner(conn: &mut Connection, draft: &DraftRoutine) -> Result<MaterializedRoutine> {
    draft.validate().map_err(ExError::from)?;

    let tx = conn.transaction().map_err(from_rusqlite)?;

    SqliteRepo::insert_routine(&tx, &draft.to_routine(false))?;

    let mut workout_id = SqliteRepo::max_workout_id(&tx)?;
    let mut movement_id = SqliteRepo::max_movement_id(&tx)?;

    let mut materialized = MaterializedRoutine {
        routine_name: draft.name.clone(),
        ..MaterializedRoutine::default()
    };

    for workout_draft in &draft.workouts {
        workout_id += 1;
        SqliteRepo::insert_workout(&tx, &workout_draft.to_workout(workout_id, &draft.name))?;
        materialized.workout_ids.push(workout_id);

        for skeleton in workout_draft.skeletons() {
            movement_id += 1;
            let movement = workout_draft
                .movement_for(skeleton, workout_id, movement_id)
                .map_err(|e| ExError::from(e).with_op("materialize_draft"))?;
            SqliteRepo::insert_movement(&tx, &movement)?;
            materialized.movement_ids.push(movement_id);
        }
    }

    // Early returns drop `tx` uncommitted, which rolls it back
    tx.commit().map_err(from_rusqlite)?;

    Ok(materialized)
}

fn delete_cascade_inner(conn: &mut Connection, routine_name: &str) -> Result<CascadeReport> {
    let tx = conn.transaction().map_err(from_rusqlite)?;

    let mut report = CascadeReport {
        routine_name: routine_name.to_string(),
        ..CascadeReport::default()
    };

    for workout in SqliteRepo::load_workouts(&tx, routine_name)? {
        report.movements_deleted += tx
            .execute(
                "DELETE FROM movement WHERE parent_workout_id = ?1",
                [workout.workout_id],
            )
            .map_err(from_rusqlite)?;
        report.workouts_deleted += tx
            .execute(
                "DELETE FROM workout WHERE workout_id = ?1",
                [workout.workout_id],
            )
            .map_err(from_rusqlite)?;
    }

    tx.execute("DELETE FROM routine WHERE name = ?1", [routine_name])
        .map_err(from_rusqlite)?;

    tx.commit().map_err(from_rusqlite)?;

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::migrations::apply_migrations;
    use structure_core::draft::DraftWorkout;
    use structure_core::model::MovementSkeleton;
    use structure_core::ExErrorKind;

    fn setup_test_db() -> Connection {
        let mut conn = Connection::open_in_memory().unwrap();
        conn.pragma_update(None, "foreign_keys", true).unwrap();
        apply_migrations(&mut conn).unwrap();
        conn
    }

    #[test]
    fn test_first_commit_starts_at_one() {
        let mut conn = setup_test_db();
        let draft = DraftRoutine::new("Full Body").with_workout(
            DraftWorkout::new("A")
                .with_movement(MovementSkeleton::new("Squat", "Quadriceps"), 3)
                .with_movement(MovementSkeleton::new("Bench Press", "Chest"), 3),
        );

        let materialized = SqliteRepo::materialize_draft(&mut conn, &draft).unwrap();

        assert_eq!(materialized.workout_ids, vec![1]);
        assert_eq!(materialized.movement_ids, vec![1, 2]);
    }

    #[test]
    fn test_blank_name_rejected_before_writing() {
        let mut conn = setup_test_db();
        let err = SqliteRepo::materialize_draft(&mut conn, &DraftRoutine::new("  ")).unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::InvalidName);
        assert_eq!(SqliteRepo::count_rows(&conn, "routine").unwrap(), 0);
    }

    #[test]
    fn test_unknown_routine_cascade_is_noop() {
        let mut conn = setup_test_db();
        let report =
            SqliteRepo::delete_routine_cascade(&mut conn, &Routine::new("Ghost", false)).unwrap();
        assert_eq!(report.workouts_deleted, 0);
        assert_eq!(report.movements_deleted, 0);
    }
}
