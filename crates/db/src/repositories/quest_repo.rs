//! Repository for the `quests` and `quest_completions` tables.

use chrono::Utc;
use ironquest_core::types::DbId;
use sqlx::SqliteExecutor;

use crate::models::quest::{CreateQuest, Quest, QuestWithStatus};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, title, description, reward_exp, reward_points, quest_type, \
                        created_by, created_at";

/// Same columns qualified for the joined status queries, plus the flag.
const STATUS_COLUMNS: &str = "q.id, q.title, q.description, q.reward_exp, q.reward_points, \
                              q.quest_type, q.created_by, q.created_at, \
                              EXISTS (SELECT 1 FROM quest_completions c \
                                      WHERE c.quest_id = q.id AND c.user_id = ?) AS is_completed";

/// Provides CRUD operations for quests and per-user completion.
pub struct QuestRepo;

impl QuestRepo {
    /// Insert a new quest, returning the created row.
    ///
    /// Title and description are stored trimmed.
    pub async fn create<'e, E>(
        executor: E,
        input: &CreateQuest,
        created_by: DbId,
    ) -> Result<Quest, sqlx::Error>
    where
        E: SqliteExecutor<'e>,
    {
        let query = format!(
            "INSERT INTO quests
                (title, description, reward_exp, reward_points, quest_type, created_by, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Quest>(&query)
            .bind(input.title.trim())
            .bind(input.description.trim())
            .bind(i64::from(input.reward_exp))
            .bind(i64::from(input.reward_points))
            .bind(input.quest_type.as_str())
            .bind(created_by)
            .bind(Utc::now())
            .fetch_one(executor)
            .await
    }

    /// Find a quest by ID.
    pub async fn find_by_id<'e, E>(executor: E, id: DbId) -> Result<Option<Quest>, sqlx::Error>
    where
        E: SqliteExecutor<'e>,
    {
        let query = format!("SELECT {COLUMNS} FROM quests WHERE id = ?");
        sqlx::query_as::<_, Quest>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Find a quest by ID with `user_id`'s completion flag.
    pub async fn find_for_user<'e, E>(
        executor: E,
        id: DbId,
        user_id: DbId,
    ) -> Result<Option<QuestWithStatus>, sqlx::Error>
    where
        E: SqliteExecutor<'e>,
    {
        let query = format!("SELECT {STATUS_COLUMNS} FROM quests q WHERE q.id = ?");
        sqlx::query_as::<_, QuestWithStatus>(&query)
            .bind(user_id)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// List every quest, newest first, with `user_id`'s completion flags.
    pub async fn list_for_user<'e, E>(
        executor: E,
        user_id: DbId,
    ) -> Result<Vec<QuestWithStatus>, sqlx::Error>
    where
        E: SqliteExecutor<'e>,
    {
        let query =
            format!("SELECT {STATUS_COLUMNS} FROM quests q ORDER BY q.created_at DESC, q.id DESC");
        sqlx::query_as::<_, QuestWithStatus>(&query)
            .bind(user_id)
            .fetch_all(executor)
            .await
    }

    /// Delete a quest and its completions. Returns `true` if a row was removed.
    pub async fn delete<'e, E>(executor: E, id: DbId) -> Result<bool, sqlx::Error>
    where
        E: SqliteExecutor<'e>,
    {
        let result = sqlx::query("DELETE FROM quests WHERE id = ?")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Record that `user_id` completed `quest_id`.
    ///
    /// Returns `true` only if this call recorded the completion; a repeat
    /// completion is ignored and returns `false`.
    pub async fn mark_completed<'e, E>(
        executor: E,
        user_id: DbId,
        quest_id: DbId,
    ) -> Result<bool, sqlx::Error>
    where
        E: SqliteExecutor<'e>,
    {
        let result = sqlx::query(
            "INSERT OR IGNORE INTO quest_completions (user_id, quest_id, completed_at)
             VALUES (?, ?, ?)",
        )
        .bind(user_id)
        .bind(quest_id)
        .bind(Utc::now())
        .execute(executor)
        .await?;
        Ok(result.rows_affected() == 1)
    }
}
