//! Repository for the `character_stats` table.
//!
//! Writes are optimistic: every update names the `version` it was computed
//! from and only lands if that version is still current.

use chrono::Utc;
use ironquest_core::progression::CharacterStats;
use ironquest_core::types::DbId;
use sqlx::SqliteExecutor;

use crate::models::character::{CharacterRow, StoredStats};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "user_id, level, exp, next_level_exp, points, \
                        strength, agility, stamina, intelligence, version, updated_at";

/// Provides read and versioned write access to character sheets.
pub struct CharacterRepo;

impl CharacterRepo {
    /// Load a user's sheet, or `None` if it was never written.
    pub async fn find<'e, E>(executor: E, user_id: DbId) -> Result<Option<StoredStats>, sqlx::Error>
    where
        E: SqliteExecutor<'e>,
    {
        let query = format!("SELECT {COLUMNS} FROM character_stats WHERE user_id = ?");
        sqlx::query_as::<_, CharacterRow>(&query)
            .bind(user_id)
            .fetch_optional(executor)
            .await?
            .map(StoredStats::try_from)
            .transpose()
    }

    /// Load a user's sheet, falling back to the starting sheet.
    pub async fn get_or_default<'e, E>(executor: E, user_id: DbId) -> Result<StoredStats, sqlx::Error>
    where
        E: SqliteExecutor<'e>,
    {
        Ok(Self::find(executor, user_id)
            .await?
            .unwrap_or_else(StoredStats::fresh))
    }

    /// Persist `stats` for `user_id`, conditional on `expected_version`.
    ///
    /// `expected_version` is the version the stats were read at (`None` for a
    /// sheet that did not exist yet). Returns `false` without writing if
    /// another writer got there first.
    pub async fn save<'e, E>(
        executor: E,
        user_id: DbId,
        stats: &CharacterStats,
        expected_version: Option<i64>,
    ) -> Result<bool, sqlx::Error>
    where
        E: SqliteExecutor<'e>,
    {
        let result = match expected_version {
            None => {
                sqlx::query(
                    "INSERT INTO character_stats
                        (user_id, level, exp, next_level_exp, points,
                         strength, agility, stamina, intelligence, version, updated_at)
                     VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, 1, ?)
                     ON CONFLICT (user_id) DO NOTHING",
                )
                .bind(user_id)
                .bind(i64::from(stats.level))
                .bind(to_i64(stats.exp)?)
                .bind(to_i64(stats.next_level_exp)?)
                .bind(i64::from(stats.points))
                .bind(i64::from(stats.strength))
                .bind(i64::from(stats.agility))
                .bind(i64::from(stats.stamina))
                .bind(i64::from(stats.intelligence))
                .bind(Utc::now())
                .execute(executor)
                .await?
            }
            Some(version) => {
                sqlx::query(
                    "UPDATE character_stats SET
                        level = ?, exp = ?, next_level_exp = ?, points = ?,
                        strength = ?, agility = ?, stamina = ?, intelligence = ?,
                        version = version + 1, updated_at = ?
                     WHERE user_id = ? AND version = ?",
                )
                .bind(i64::from(stats.level))
                .bind(to_i64(stats.exp)?)
                .bind(to_i64(stats.next_level_exp)?)
                .bind(i64::from(stats.points))
                .bind(i64::from(stats.strength))
                .bind(i64::from(stats.agility))
                .bind(i64::from(stats.stamina))
                .bind(i64::from(stats.intelligence))
                .bind(Utc::now())
                .bind(user_id)
                .bind(version)
                .execute(executor)
                .await?
            }
        };
        Ok(result.rows_affected() == 1)
    }
}

fn to_i64(value: u64) -> Result<i64, sqlx::Error> {
    i64::try_from(value)
        .map_err(|_| sqlx::Error::Encode(format!("value {value} exceeds INTEGER range").into()))
}
