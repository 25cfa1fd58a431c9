//! Routine tree hydration
//!
//! Reads a routine together with its workouts and, optionally, each
//! workout's movements.

#![allow(clippy::result_large_err)]

use crate::errors::Result;
use crate::repo::SqliteRepo;
use rusqlite::Connection;
use structure_core::model::Routine;

/// How deep to load below the routine row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Depth {
    Workouts,
    Movements,
}

/// Load one routine with its children
pub fn load_routine_tree(conn: &Connection, name: &str, depth: Depth) -> Result<Option<Routine>> {
    SqliteRepo::get_routine(conn, name)?
        .map(|routine| hydrate(conn, routine, depth))
        .transpose()
}

/// Load the current routine with its children
pub fn load_current_routine_tree(conn: &Connection, depth: Depth) -> Result<Option<Routine>> {
    SqliteRepo::load_current_routine(conn)?
        .map(|routine| hydrate(conn, routine, depth))
        .transpose()
}

/// Load every routine with its workouts, ordered by name
pub fn load_routines_with_workouts(conn: &Connection) -> Result<Vec<Routine>> {
    SqliteRepo::load_all_routines(conn)?
        .into_iter()
        .map(|routine| hydrate(conn, routine, Depth::Workouts))
        .collect()
}

fn hydrate(conn: &Connection, routine: Routine, depth: Depth) -> Result<Routine> {
    let mut workouts = SqliteRepo::load_workouts(conn, &routine.name)?;
    if depth == Depth::Movements {
        for workout in &mut workouts {
            workout.movements = SqliteRepo::load_movements(conn, workout.workout_id)?;
        }
    }
    Ok(routine.with_workouts(workouts))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::migrations::apply_migrations;
    use structure_core::draft::{DraftRoutine, DraftWorkout};
    use structure_core::model::MovementSkeleton;

    #[test]
    fn test_load_tree_with_movements() {
        let mut conn = Connection::open_in_memory().unwrap();
        apply_migrations(&mut conn).unwrap();

        let draft = DraftRoutine::new("Upper/Lower")
            .with_workout(
                DraftWorkout::new("Upper").with_movement(MovementSkeleton::new("Pull Up", "Back"), 4),
            )
            .with_workout(
                DraftWorkout::new("Lower").with_movement(MovementSkeleton::new("Squat", "Quadriceps"), 5),
            );
        SqliteRepo::materialize_draft(&mut conn, &draft).unwrap();

        let tree = load_routine_tree(&conn, "Upper/Lower", Depth::Movements)
            .unwrap()
            .unwrap();
        assert_eq!(tree.workouts.len(), 2);
        assert_eq!(tree.workouts[0].name, "Upper");
        assert_eq!(tree.workouts[1].movements[0].sets, 5);

        let shallow = load_routine_tree(&conn, "Upper/Lower", Depth::Workouts)
            .unwrap()
            .unwrap();
        assert!(shallow.workouts[0].movements.is_empty());

        assert!(load_routine_tree(&conn, "Missing", Depth::Workouts)
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_no_current_routine() {
        let mut conn = Connection::open_in_memory().unwrap();
        apply_migrations(&mut conn).unwrap();
        SqliteRepo::insert_routine(&conn, &Routine::new("A", false)).unwrap();
        assert!(load_current_routine_tree(&conn, Depth::Workouts)
            .unwrap()
            .is_none());
        assert_eq!(load_routines_with_workouts(&conn).unwrap().len(), 1);
    }
}
