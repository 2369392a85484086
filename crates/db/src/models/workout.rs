//! Workout session rows.

use ironquest_core::types::{DbId, Timestamp};
use ironquest_core::workout::{Exercise, WorkoutSession};
use sqlx::types::Json;
use sqlx::FromRow;

/// Raw `workout_sessions` row; exercises are a JSON column.
#[derive(Debug, Clone, FromRow)]
pub struct WorkoutSessionRow {
    pub id: DbId,
    pub user_id: DbId,
    pub performed_at: Timestamp,
    pub exercises: Json<Vec<Exercise>>,
    pub gained_exp: i64,
    pub created_at: Timestamp,
}

impl From<WorkoutSessionRow> for WorkoutSession {
    fn from(row: WorkoutSessionRow) -> Self {
        Self {
            id: row.id,
            performed_at: row.performed_at,
            exercises: row.exercises.0,
        }
    }
}

/// DTO for saving a prepared session.
#[derive(Debug)]
pub struct CreateWorkoutSession {
    pub user_id: DbId,
    pub performed_at: Timestamp,
    pub exercises: Vec<Exercise>,
    pub gained_exp: u64,
}
