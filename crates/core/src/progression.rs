//! Character progression: the leveling curve, experience carry-over, and
//! skill-point spending.
//!
//! Everything here is pure. Callers load a [`CharacterStats`], fold rewards
//! into it, and persist the result; the engine itself never deduplicates, so
//! a caller that applies the same reward twice gets it twice.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Leveling curve
// ---------------------------------------------------------------------------

/// Level every new character starts at.
pub const STARTING_LEVEL: u32 = 1;
/// Experience required to leave the starting level.
pub const STARTING_NEXT_LEVEL_EXP: u64 = 1000;
/// Starting value of each of the four attributes.
pub const STARTING_ATTRIBUTE: u32 = 10;
/// Skill points granted per level-up.
pub const POINTS_PER_LEVEL: u32 = 5;

/// The threshold grows by a factor of 1.2 per level. Kept as an integer
/// ratio so `floor(next * 1.2)` is exact.
const CURVE_NUMERATOR: u64 = 6;
const CURVE_DENOMINATOR: u64 = 5;

/// Threshold for the level after one whose threshold is `current`.
pub fn next_threshold(current: u64) -> u64 {
    current.saturating_mul(CURVE_NUMERATOR) / CURVE_DENOMINATOR
}

// ---------------------------------------------------------------------------
// Attributes
// ---------------------------------------------------------------------------

/// One of the four upgradable character attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Attribute {
    Strength,
    Agility,
    Stamina,
    Intelligence,
}

impl Attribute {
    pub const ALL: [Attribute; 4] = [
        Attribute::Strength,
        Attribute::Agility,
        Attribute::Stamina,
        Attribute::Intelligence,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Strength => "strength",
            Self::Agility => "agility",
            Self::Stamina => "stamina",
            Self::Intelligence => "intelligence",
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Attribute {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| {
                CoreError::Validation(format!(
                    "Unknown attribute '{s}'. Must be one of: strength, agility, stamina, intelligence"
                ))
            })
    }
}

// ---------------------------------------------------------------------------
// Character stats
// ---------------------------------------------------------------------------

/// A user's character sheet.
///
/// Invariant: `exp < next_level_exp` and `next_level_exp > 0`. Every method
/// here preserves it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterStats {
    pub level: u32,
    pub exp: u64,
    pub next_level_exp: u64,
    pub points: u32,
    pub strength: u32,
    pub agility: u32,
    pub stamina: u32,
    pub intelligence: u32,
}

impl Default for CharacterStats {
    fn default() -> Self {
        Self {
            level: STARTING_LEVEL,
            exp: 0,
            next_level_exp: STARTING_NEXT_LEVEL_EXP,
            points: 0,
            strength: STARTING_ATTRIBUTE,
            agility: STARTING_ATTRIBUTE,
            stamina: STARTING_ATTRIBUTE,
            intelligence: STARTING_ATTRIBUTE,
        }
    }
}

impl CharacterStats {
    /// Whether the level invariant holds.
    pub fn is_normalized(&self) -> bool {
        self.level >= STARTING_LEVEL && self.next_level_exp > 0 && self.exp < self.next_level_exp
    }

    /// Fold `amount` experience into the sheet, rolling over as many levels
    /// as it pays for.
    ///
    /// The amount is added once, then each full threshold is consumed: the
    /// level goes up, the threshold grows by 1.2x, and [`POINTS_PER_LEVEL`]
    /// skill points are granted. Terminates because the threshold is never 0.
    ///
    /// # Panics
    ///
    /// Panics if `next_level_exp` is 0, which only a corrupted sheet can have.
    #[must_use]
    pub fn apply_experience(self, amount: u64) -> Self {
        assert!(
            self.next_level_exp > 0,
            "next_level_exp must be positive (got a corrupted character sheet)"
        );

        let mut out = self;
        out.exp = out.exp.saturating_add(amount);

        while out.exp >= out.next_level_exp {
            out.exp -= out.next_level_exp;
            out.level = out.level.saturating_add(1);
            out.next_level_exp = next_threshold(out.next_level_exp);
            out.points = out.points.saturating_add(POINTS_PER_LEVEL);
        }

        out
    }

    /// Add skill points directly, outside the leveling loop.
    #[must_use]
    pub fn grant_points(self, points: u32) -> Self {
        Self {
            points: self.points.saturating_add(points),
            ..self
        }
    }

    /// Spend one skill point on `attribute`.
    ///
    /// Returns `None` (and leaves the sheet alone) when there are no points
    /// to spend.
    pub fn upgrade_attribute(self, attribute: Attribute) -> Option<Self> {
        if self.points == 0 {
            return None;
        }

        let mut out = self;
        out.points -= 1;
        let slot = match attribute {
            Attribute::Strength => &mut out.strength,
            Attribute::Agility => &mut out.agility,
            Attribute::Stamina => &mut out.stamina,
            Attribute::Intelligence => &mut out.intelligence,
        };
        *slot = slot.saturating_add(1);
        Some(out)
    }

    /// Current value of `attribute`.
    pub fn attribute(&self, attribute: Attribute) -> u32 {
        match attribute {
            Attribute::Strength => self.strength,
            Attribute::Agility => self.agility,
            Attribute::Stamina => self.stamina,
            Attribute::Intelligence => self.intelligence,
        }
    }
}

/// Number of level-ups between two snapshots of the same sheet.
pub fn levels_gained(before: &CharacterStats, after: &CharacterStats) -> u32 {
    after.level.saturating_sub(before.level)
}
