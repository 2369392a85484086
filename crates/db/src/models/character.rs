//! Persisted character sheet.

use ironquest_core::progression::CharacterStats;
use ironquest_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// Raw `character_stats` row. SQLite integers are signed; see
/// [`StoredStats`] for the checked conversion into the domain type.
#[derive(Debug, Clone, FromRow)]
pub struct CharacterRow {
    pub user_id: DbId,
    pub level: i64,
    pub exp: i64,
    pub next_level_exp: i64,
    pub points: i64,
    pub strength: i64,
    pub agility: i64,
    pub stamina: i64,
    pub intelligence: i64,
    pub version: i64,
    pub updated_at: Timestamp,
}

/// A character sheet together with the row version it was read at.
///
/// `version` is `None` when the user has no row yet and the sheet is the
/// default one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StoredStats {
    pub stats: CharacterStats,
    pub version: Option<i64>,
}

impl StoredStats {
    pub fn fresh() -> Self {
        Self {
            stats: CharacterStats::default(),
            version: None,
        }
    }
}

fn narrow<T: TryFrom<i64>>(column: &'static str, value: i64) -> Result<T, sqlx::Error> {
    T::try_from(value).map_err(|_| {
        sqlx::Error::Decode(format!("character_stats.{column} out of range: {value}").into())
    })
}

impl TryFrom<CharacterRow> for StoredStats {
    type Error = sqlx::Error;

    fn try_from(row: CharacterRow) -> Result<Self, Self::Error> {
        let stats = CharacterStats {
            level: narrow("level", row.level)?,
            exp: narrow("exp", row.exp)?,
            next_level_exp: narrow("next_level_exp", row.next_level_exp)?,
            points: narrow("points", row.points)?,
            strength: narrow("strength", row.strength)?,
            agility: narrow("agility", row.agility)?,
            stamina: narrow("stamina", row.stamina)?,
            intelligence: narrow("intelligence", row.intelligence)?,
        };
        Ok(Self {
            stats,
            version: Some(row.version),
        })
    }
}
