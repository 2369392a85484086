//! Quest entity model and DTOs.

use ironquest_core::error::CoreError;
use ironquest_core::quest::{QuestReward, QuestStatus, QuestType};
use ironquest_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `quests` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Quest {
    pub id: DbId,
    pub title: String,
    pub description: String,
    pub reward_exp: i64,
    pub reward_points: i64,
    #[serde(rename = "type")]
    pub quest_type: String,
    pub created_by: Option<DbId>,
    pub created_at: Timestamp,
}

impl Quest {
    /// The fixed reward this quest pays out.
    pub fn reward(&self) -> Result<QuestReward, CoreError> {
        let exp = u32::try_from(self.reward_exp).map_err(|_| {
            CoreError::Internal(format!("quest {} has invalid reward_exp", self.id))
        })?;
        let points = u32::try_from(self.reward_points).map_err(|_| {
            CoreError::Internal(format!("quest {} has invalid reward_points", self.id))
        })?;
        Ok(QuestReward { exp, points })
    }
}

/// A quest as seen by one user, with that user's completion flag.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct QuestWithStatus {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub quest: Quest,
    pub is_completed: bool,
}

impl QuestWithStatus {
    pub fn status(&self) -> QuestStatus {
        QuestStatus::from_completed(self.is_completed)
    }
}

/// DTO for creating a new quest.
#[derive(Debug, Clone)]
pub struct CreateQuest {
    pub title: String,
    pub description: String,
    pub reward_exp: u32,
    pub reward_points: u32,
    pub quest_type: QuestType,
}
