//! SQLite repository implementation
//!
//! Row-level reads and writes for every table. Functions take a plain
//! `&Connection`; pass a `&Transaction` (it derefs to a connection) to run
//! them inside a caller-owned transaction.

#![allow(clippy::result_large_err)]

use crate::errors::{from_rusqlite, not_found, Result};
use rusqlite::{Connection, OptionalExtension, Row};
use structure_core::errors::{ExError, ExErrorKind};
use structure_core::model::{Movement, MovementSkeleton, MovementUserData, Routine, Workout};

/// SQLite repository for routines, workouts, movements and set logs
pub struct SqliteRepo;

impl SqliteRepo {
    // ----- routine -----

    /// Insert a routine, replacing `is_current` if the name already exists
    pub fn insert_routine(conn: &Connection, routine: &Routine) -> Result<()> {
        conn.execute(
            "INSERT INTO routine (name, is_current) VALUES (?1, ?2)
             ON CONFLICT(name) DO UPDATE SET is_current = excluded.is_current",
            rusqlite::params![routine.name, routine.is_current],
        )
        .map_err(from_rusqlite)?;

        Ok(())
    }

    /// Get a routine row by name (workouts not loaded)
    pub fn get_routine(conn: &Connection, name: &str) -> Result<Option<Routine>> {
        conn.query_row(
            "SELECT name, is_current FROM routine WHERE name = ?1",
            [name],
            routine_from_row,
        )
        .optional()
        .map_err(from_rusqlite)
    }

    /// All routine rows ordered by name (workouts not loaded)
    pub fn load_all_routines(conn: &Connection) -> Result<Vec<Routine>> {
        let mut stmt = conn
            .prepare("SELECT name, is_current FROM routine ORDER BY name")
            .map_err(from_rusqlite)?;
        let routines = stmt
            .query_map([], routine_from_row)
            .map_err(from_rusqlite)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(from_rusqlite)?;
        Ok(routines)
    }

    /// The routine flagged current, if any (workouts not loaded)
    pub fn load_current_routine(conn: &Connection) -> Result<Option<Routine>> {
        conn.query_row(
            "SELECT name, is_current FROM routine WHERE is_current = 1 ORDER BY name LIMIT 1",
            [],
            routine_from_row,
        )
        .optional()
        .map_err(from_rusqlite)
    }

    /// Flag one routine as current and clear the flag on every other
    ///
    /// # Errors
    ///
    /// `NotFound` if no routine has this name; nothing is changed in that case
    pub fn set_current_routine(conn: &mut Connection, name: &str) -> Result<()> {
        let tx = conn.transaction().map_err(from_rusqlite)?;

        let updated = tx
            .execute("UPDATE routine SET is_current = 1 WHERE name = ?1", [name])
            .map_err(from_rusqlite)?;
        if updated == 0 {
            return Err(not_found("set_current_routine", name));
        }

        tx.execute(
            "UPDATE routine SET is_current = 0 WHERE name <> ?1 AND is_current <> 0",
            [name],
        )
        .map_err(from_rusqlite)?;

        tx.commit().map_err(from_rusqlite)?;
        Ok(())
    }

    // ----- workout -----

    /// Insert a workout, replacing name and parent if the id already exists
    pub fn insert_workout(conn: &Connection, workout: &Workout) -> Result<()> {
        conn.execute(
            "INSERT INTO workout (workout_id, parent_routine_name, name) VALUES (?1, ?2, ?3)
             ON CONFLICT(workout_id) DO UPDATE SET
                parent_routine_name = excluded.parent_routine_name,
                name = excluded.name",
            rusqlite::params![workout.workout_id, workout.parent_routine_name, workout.name],
        )
        .map_err(from_rusqlite)?;

        Ok(())
    }

    /// Workouts of a routine ordered by id (movements not loaded)
    pub fn load_workouts(conn: &Connection, routine_name: &str) -> Result<Vec<Workout>> {
        let mut stmt = conn
            .prepare(
                "SELECT workout_id, parent_routine_name, name FROM workout
                 WHERE parent_routine_name = ?1 ORDER BY workout_id",
            )
            .map_err(from_rusqlite)?;
        let workouts = stmt
            .query_map([routine_name], workout_from_row)
            .map_err(from_rusqlite)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(from_rusqlite)?;
        Ok(workouts)
    }

    /// Largest workout id in use, 0 for an empty table
    pub fn max_workout_id(conn: &Connection) -> Result<i64> {
        conn.query_row("SELECT COALESCE(MAX(workout_id), 0) FROM workout", [], |row| {
            row.get(0)
        })
        .map_err(from_rusqlite)
    }

    // ----- movement -----

    /// Insert a movement
    ///
    /// # Errors
    ///
    /// `AlreadyExists` if the id is taken; `InvalidInput` if the parent
    /// workout does not exist
    pub fn insert_movement(conn: &Connection, movement: &Movement) -> Result<()> {
        conn.execute(
            "INSERT INTO movement (id, parent_workout_id, name, muscle_group, sets)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            rusqlite::params![
                movement.id,
                movement.parent_workout_id,
                movement.name,
                movement.muscle_group,
                movement.sets,
            ],
        )
        .map_err(|e| from_rusqlite(e).with_entity_id(movement.id.to_string()))?;

        Ok(())
    }

    /// Movements of a workout ordered by id
    pub fn load_movements(conn: &Connection, workout_id: i64) -> Result<Vec<Movement>> {
        let mut stmt = conn
            .prepare(
                "SELECT id, parent_workout_id, name, muscle_group, sets FROM movement
                 WHERE parent_workout_id = ?1 ORDER BY id",
            )
            .map_err(from_rusqlite)?;
        let movements = stmt
            .query_map([workout_id], movement_from_row)
            .map_err(from_rusqlite)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(from_rusqlite)?;
        Ok(movements)
    }

    /// Largest movement id in use, 0 for an empty table
    pub fn max_movement_id(conn: &Connection) -> Result<i64> {
        conn.query_row("SELECT COALESCE(MAX(id), 0) FROM movement", [], |row| row.get(0))
            .map_err(from_rusqlite)
    }

    // ----- movement_user_data -----

    /// Append one set-log row, returning its id
    ///
    /// A row with `id == 0` gets a fresh id from SQLite.
    pub fn insert_user_data(conn: &Connection, data: &MovementUserData) -> Result<i64> {
        let id = if data.id == 0 { None } else { Some(data.id) };
        conn.execute(
            "INSERT INTO movement_user_data
                (id, movement_id, reps, weight, set_index, created, updated)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            rusqlite::params![
                id,
                data.movement_id,
                data.reps,
                data.weight,
                data.set_index,
                data.created,
                data.updated,
            ],
        )
        .map_err(from_rusqlite)?;

        Ok(conn.last_insert_rowid())
    }

    /// Append rows stamped with one shared `created`/`updated` instant
    ///
    /// All rows land in one transaction, so one call forms exactly one
    /// history session.
    pub fn insert_user_data_with_timestamp(
        conn: &mut Connection,
        rows: &[MovementUserData],
        now_ms: i64,
    ) -> Result<Vec<i64>> {
        let tx = conn.transaction().map_err(from_rusqlite)?;

        let mut ids = Vec::with_capacity(rows.len());
        for row in rows {
            let stamped = row.clone().stamped(now_ms);
            ids.push(Self::insert_user_data(&tx, &stamped)?);
        }

        tx.commit().map_err(from_rusqlite)?;
        Ok(ids)
    }

    /// Rewrite reps/weight of persisted rows and refresh `updated`
    ///
    /// # Errors
    ///
    /// `InvalidInput` for a row that was never saved; `NotFound` for an id
    /// with no row. Either aborts the whole batch.
    pub fn update_user_data(
        conn: &mut Connection,
        rows: &[MovementUserData],
        now_ms: i64,
    ) -> Result<usize> {
        let tx = conn.transaction().map_err(from_rusqlite)?;

        for row in rows {
            if !row.is_persisted() {
                return Err(ExError::new(ExErrorKind::InvalidInput)
                    .with_op("update_user_data")
                    .with_message("Cannot update a set log row that was never saved"));
            }
            let changed = tx
                .execute(
                    "UPDATE movement_user_data
                     SET reps = ?2, weight = ?3, set_index = ?4, updated = ?5
                     WHERE id = ?1",
                    rusqlite::params![row.id, row.reps, row.weight, row.set_index, now_ms],
                )
                .map_err(from_rusqlite)?;
            if changed == 0 {
                return Err(not_found("update_user_data", row.id.to_string()));
            }
        }

        tx.commit().map_err(from_rusqlite)?;
        Ok(rows.len())
    }

    /// Rows of one movement from its `session_count` most recent saves
    ///
    /// Newest session first; within a session rows follow `set_index`.
    pub fn movement_history(
        conn: &Connection,
        movement_id: i64,
        session_count: u32,
    ) -> Result<Vec<MovementUserData>> {
        let mut stmt = conn
            .prepare(
                "SELECT id, movement_id, reps, weight, set_index, created, updated
                 FROM movement_user_data
                 WHERE movement_id = ?1 AND created IN (
                     SELECT DISTINCT created FROM movement_user_data
                     WHERE movement_id = ?1 AND created IS NOT NULL
                     ORDER BY created DESC
                     LIMIT ?2
                 )
                 ORDER BY created DESC, set_index ASC, id ASC",
            )
            .map_err(from_rusqlite)?;
        let rows = stmt
            .query_map(rusqlite::params![movement_id, session_count], user_data_from_row)
            .map_err(from_rusqlite)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(from_rusqlite)?;
        Ok(rows)
    }

    // ----- movement_skeleton -----

    /// Insert or refresh a catalog entry keyed by name
    pub fn upsert_movement_skeleton(conn: &Connection, skeleton: &MovementSkeleton) -> Result<()> {
        conn.execute(
            "INSERT INTO movement_skeleton
                (name, muscle_group, secondary_muscle_group, quaternary_muscle_group)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(name) DO UPDATE SET
                muscle_group = excluded.muscle_group,
                secondary_muscle_group = excluded.secondary_muscle_group,
                quaternary_muscle_group = excluded.quaternary_muscle_group",
            rusqlite::params![
                skeleton.name,
                skeleton.muscle_group,
                skeleton.secondary_muscle_group,
                skeleton.quaternary_muscle_group,
            ],
        )
        .map_err(from_rusqlite)?;

        Ok(())
    }

    /// Whole catalog ordered by muscle group, then name
    pub fn load_all_movement_skeletons(conn: &Connection) -> Result<Vec<MovementSkeleton>> {
        let mut stmt = conn
            .prepare(
                "SELECT name, muscle_group, secondary_muscle_group, quaternary_muscle_group
                 FROM movement_skeleton ORDER BY muscle_group, name",
            )
            .map_err(from_rusqlite)?;
        let skeletons = stmt
            .query_map([], |row| {
                Ok(MovementSkeleton {
                    name: row.get(0)?,
                    muscle_group: row.get(1)?,
                    secondary_muscle_group: row.get(2)?,
                    quaternary_muscle_group: row.get(3)?,
                })
            })
            .map_err(from_rusqlite)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(from_rusqlite)?;
        Ok(skeletons)
    }

    // ----- counts -----

    /// Row count of one of the store's tables
    ///
    /// # Errors
    ///
    /// `InvalidInput` for a table name outside the store schema
    pub fn count_rows(conn: &Connection, table: &str) -> Result<i64> {
        const TABLES: [&str; 5] = [
            "routine",
            "workout",
            "movement",
            "movement_user_data",
            "movement_skeleton",
        ];
        if !TABLES.contains(&table) {
            return Err(ExError::new(ExErrorKind::InvalidInput)
                .with_op("count_rows")
                .with_entity_id(table)
                .with_message("Unknown table"));
        }
        conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| row.get(0))
            .map_err(from_rusqlite)
    }
}

fn routine_from_row(row: &Row<'_>) -> rusqlite::Result<Routine> {
    Ok(Routine::new(row.get::<_, String>(0)?, row.get::<_, bool>(1)?))
}

fn workout_from_row(row: &Row<'_>) -> rusqlite::Result<Workout> {
    Ok(Workout::new(
        row.get::<_, i64>(0)?,
        row.get::<_, String>(1)?,
        row.get::<_, String>(2)?,
    ))
}

fn movement_from_row(row: &Row<'_>) -> rusqlite::Result<Movement> {
    Ok(Movement::new(
        row.get::<_, i64>(0)?,
        row.get::<_, i64>(1)?,
        row.get::<_, String>(2)?,
        row.get::<_, String>(3)?,
        row.get::<_, u32>(4)?,
    ))
}

fn user_data_from_row(row: &Row<'_>) -> rusqlite::Result<MovementUserData> {
    Ok(MovementUserData {
        id: row.get(0)?,
        movement_id: row.get(1)?,
        reps: row.get(2)?,
        weight: row.get(3)?,
        set_index: row.get(4)?,
        created: row.get(5)?,
        updated: row.get(6)?,
    })
}
