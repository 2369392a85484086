//! Repository for the `workout_sessions` table.

use chrono::Utc;
use ironquest_core::types::DbId;
use ironquest_core::workout::WorkoutSession;
use sqlx::types::Json;
use sqlx::SqliteExecutor;

use crate::models::workout::{CreateWorkoutSession, WorkoutSessionRow};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, performed_at, exercises, gained_exp, created_at";

/// Provides append and history queries for workout sessions.
pub struct WorkoutRepo;

impl WorkoutRepo {
    /// Insert a session, returning it as saved.
    pub async fn create<'e, E>(
        executor: E,
        input: &CreateWorkoutSession,
    ) -> Result<WorkoutSession, sqlx::Error>
    where
        E: SqliteExecutor<'e>,
    {
        let gained_exp = i64::try_from(input.gained_exp).map_err(|_| {
            sqlx::Error::Encode(format!("gained_exp {} exceeds INTEGER range", input.gained_exp).into())
        })?;
        let query = format!(
            "INSERT INTO workout_sessions (user_id, performed_at, exercises, gained_exp, created_at)
             VALUES (?, ?, ?, ?, ?)
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, WorkoutSessionRow>(&query)
            .bind(input.user_id)
            .bind(input.performed_at)
            .bind(Json(&input.exercises))
            .bind(gained_exp)
            .bind(Utc::now())
            .fetch_one(executor)
            .await?;
        Ok(row.into())
    }

    /// A page of a user's history, most recently saved first.
    ///
    /// Ordered by save, not by `performed_at`, so a backdated session still
    /// lands at the front.
    pub async fn list_for_user<'e, E>(
        executor: E,
        user_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<WorkoutSession>, sqlx::Error>
    where
        E: SqliteExecutor<'e>,
    {
        let query = format!(
            "SELECT {COLUMNS} FROM workout_sessions
             WHERE user_id = ?
             ORDER BY id DESC
             LIMIT ? OFFSET ?"
        );
        let rows = sqlx::query_as::<_, WorkoutSessionRow>(&query)
            .bind(user_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(executor)
            .await?;
        Ok(rows.into_iter().map(WorkoutSession::from).collect())
    }

    /// A user's full history, most recently saved first.
    pub async fn list_all_for_user<'e, E>(
        executor: E,
        user_id: DbId,
    ) -> Result<Vec<WorkoutSession>, sqlx::Error>
    where
        E: SqliteExecutor<'e>,
    {
        let query = format!(
            "SELECT {COLUMNS} FROM workout_sessions
             WHERE user_id = ?
             ORDER BY id DESC"
        );
        let rows = sqlx::query_as::<_, WorkoutSessionRow>(&query)
            .bind(user_id)
            .fetch_all(executor)
            .await?;
        Ok(rows.into_iter().map(WorkoutSession::from).collect())
    }

    /// Number of sessions a user has logged.
    pub async fn count_for_user<'e, E>(executor: E, user_id: DbId) -> Result<i64, sqlx::Error>
    where
        E: SqliteExecutor<'e>,
    {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM workout_sessions WHERE user_id = ?")
                .bind(user_id)
                .fetch_one(executor)
                .await?;
        Ok(count)
    }
}
