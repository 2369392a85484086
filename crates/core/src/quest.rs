//! Quest types, creation rules, and the completion state machine.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::progression::CharacterStats;

/// Maximum quest title length, in characters.
pub const MAX_TITLE_LEN: usize = 120;
/// Maximum quest description length, in characters.
pub const MAX_DESCRIPTION_LEN: usize = 2000;
/// Upper bound on a single quest's experience reward.
pub const MAX_REWARD_EXP: u32 = 1_000_000;
/// Upper bound on a single quest's skill-point reward.
pub const MAX_REWARD_POINTS: u32 = 1_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestType {
    Daily,
    Weekly,
    Achievement,
}

impl QuestType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Achievement => "achievement",
        }
    }
}

impl fmt::Display for QuestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuestType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "achievement" => Ok(Self::Achievement),
            other => Err(CoreError::Validation(format!(
                "Invalid quest type '{other}'. Must be one of: daily, weekly, achievement"
            ))),
        }
    }
}

/// Validate the admin-supplied fields of a new quest.
pub fn validate_new_quest(
    title: &str,
    description: &str,
    reward_exp: u32,
    reward_points: u32,
) -> Result<(), CoreError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(CoreError::Validation("Quest title must not be empty".into()));
    }
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(CoreError::Validation(format!(
            "Quest title must be at most {MAX_TITLE_LEN} characters"
        )));
    }
    if description.trim().is_empty() {
        return Err(CoreError::Validation(
            "Quest description must not be empty".into(),
        ));
    }
    if description.chars().count() > MAX_DESCRIPTION_LEN {
        return Err(CoreError::Validation(format!(
            "Quest description must be at most {MAX_DESCRIPTION_LEN} characters"
        )));
    }
    if reward_exp > MAX_REWARD_EXP {
        return Err(CoreError::Validation(format!(
            "reward_exp must be at most {MAX_REWARD_EXP}"
        )));
    }
    if reward_points > MAX_REWARD_POINTS {
        return Err(CoreError::Validation(format!(
            "reward_points must be at most {MAX_REWARD_POINTS}"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Completion state machine
// ---------------------------------------------------------------------------

/// Per-user lifecycle of a quest: `Active -> Completed`, never back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestStatus {
    Active,
    Completed,
}

impl QuestStatus {
    pub fn from_completed(is_completed: bool) -> Self {
        if is_completed {
            Self::Completed
        } else {
            Self::Active
        }
    }

    pub fn is_completed(self) -> bool {
        self == Self::Completed
    }

    /// Fire the completion transition.
    ///
    /// Returns the new status and whether the transition actually happened;
    /// completing a completed quest changes nothing.
    pub fn complete(self) -> (Self, bool) {
        match self {
            Self::Active => (Self::Completed, true),
            Self::Completed => (Self::Completed, false),
        }
    }
}

/// Fixed reward granted by completing a quest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuestReward {
    pub exp: u32,
    pub points: u32,
}

impl QuestReward {
    /// Experience goes through the leveling loop; points are added on top
    /// and never multiplied by level-ups.
    #[must_use]
    pub fn apply(self, stats: CharacterStats) -> CharacterStats {
        stats
            .apply_experience(u64::from(self.exp))
            .grant_points(self.points)
    }
}
