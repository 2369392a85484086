//! Workout sessions, exercises and sets.
//!
//! Covers the shape of a logged session, sanitizing a client-supplied draft
//! before it is rewarded and saved, and the two history lookups the workout
//! editor relies on (name suggestions and quick-adding previous sets).

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::CoreError;
use crate::types::{DbId, Timestamp};

/// Maximum exercises accepted in a single session.
pub const MAX_EXERCISES_PER_SESSION: usize = 50;
/// Maximum sets accepted per exercise.
pub const MAX_SETS_PER_EXERCISE: usize = 100;
/// Maximum length of an exercise name, in characters.
pub const MAX_EXERCISE_NAME_LEN: usize = 100;
/// Heaviest weight accepted for a single set, in kilograms.
pub const MAX_SET_WEIGHT: f64 = 1000.0;
/// Most repetitions accepted for a single set.
pub const MAX_SET_REPS: u32 = 1000;

/// Names offered when a user has no history yet.
pub const DEFAULT_EXERCISE_NAMES: &[&str] = &[
    "Bench Press",
    "Squat",
    "Deadlift",
    "Overhead Press",
    "Barbell Row",
    "Pull Ups",
    "Push Ups",
    "Dips",
];

// ---------------------------------------------------------------------------
// Saved shapes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutSet {
    pub id: String,
    pub weight: f64,
    pub reps: u32,
    pub completed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exercise {
    pub id: String,
    pub name: String,
    pub sets: Vec<WorkoutSet>,
}

/// A saved session. Immutable once saved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutSession {
    pub id: DbId,
    pub performed_at: Timestamp,
    pub exercises: Vec<Exercise>,
}

// ---------------------------------------------------------------------------
// Drafts (client input)
// ---------------------------------------------------------------------------

/// A set as submitted by a client. Identifiers are optional.
#[derive(Debug, Clone, Deserialize)]
pub struct SetDraft {
    pub id: Option<String>,
    pub weight: f64,
    pub reps: u32,
    #[serde(default)]
    pub completed: bool,
}

/// An exercise as submitted by a client.
#[derive(Debug, Clone, Deserialize)]
pub struct ExerciseDraft {
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub sets: Vec<SetDraft>,
}

/// Clamp a weight to a non-negative finite value.
pub fn clamp_weight(weight: f64) -> f64 {
    if weight.is_finite() && weight > 0.0 {
        weight
    } else {
        0.0
    }
}

fn fresh_id() -> String {
    Uuid::new_v4().to_string()
}

fn keep_or_fresh(id: Option<String>) -> String {
    match id {
        Some(id) if !id.trim().is_empty() => id,
        _ => fresh_id(),
    }
}

/// Validate and normalize a draft into saveable exercises.
///
/// Rejects empty or oversized sessions, blank or overlong names, and sets
/// above [`MAX_SET_WEIGHT`] or [`MAX_SET_REPS`]. Trims names, assigns missing
/// identifiers and clamps negative or non-finite weights to zero rather than
/// rejecting them.
pub fn prepare_exercises(drafts: Vec<ExerciseDraft>) -> Result<Vec<Exercise>, CoreError> {
    if drafts.is_empty() {
        return Err(CoreError::Validation(
            "A workout must contain at least one exercise".to_string(),
        ));
    }
    if drafts.len() > MAX_EXERCISES_PER_SESSION {
        return Err(CoreError::Validation(format!(
            "A workout may contain at most {MAX_EXERCISES_PER_SESSION} exercises"
        )));
    }

    drafts
        .into_iter()
        .map(|draft| {
            let name = draft.name.trim().to_string();
            if name.is_empty() {
                return Err(CoreError::Validation(
                    "Exercise name must not be empty".to_string(),
                ));
            }
            if name.chars().count() > MAX_EXERCISE_NAME_LEN {
                return Err(CoreError::Validation(format!(
                    "Exercise name must be at most {MAX_EXERCISE_NAME_LEN} characters"
                )));
            }
            if draft.sets.len() > MAX_SETS_PER_EXERCISE {
                return Err(CoreError::Validation(format!(
                    "Exercise '{name}' has more than {MAX_SETS_PER_EXERCISE} sets"
                )));
            }

            let sets = draft
                .sets
                .into_iter()
                .map(|s| {
                    let weight = clamp_weight(s.weight);
                    if weight > MAX_SET_WEIGHT {
                        return Err(CoreError::Validation(format!(
                            "Set weight on '{name}' must be at most {MAX_SET_WEIGHT} kg"
                        )));
                    }
                    if s.reps > MAX_SET_REPS {
                        return Err(CoreError::Validation(format!(
                            "Set reps on '{name}' must be at most {MAX_SET_REPS}"
                        )));
                    }
                    Ok(WorkoutSet {
                        id: keep_or_fresh(s.id),
                        weight,
                        reps: s.reps,
                        completed: s.completed,
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;

            Ok(Exercise {
                id: keep_or_fresh(draft.id),
                name,
                sets,
            })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// History lookups
// ---------------------------------------------------------------------------

/// Distinct exercise names across `history`, sorted. Falls back to
/// [`DEFAULT_EXERCISE_NAMES`] when the history has none.
pub fn exercise_suggestions(history: &[WorkoutSession]) -> Vec<String> {
    let mut names: BTreeSet<String> = history
        .iter()
        .flat_map(|s| s.exercises.iter())
        .filter(|e| !e.name.is_empty())
        .map(|e| e.name.clone())
        .collect();

    if names.is_empty() {
        names = DEFAULT_EXERCISE_NAMES.iter().map(|n| n.to_string()).collect();
    }

    names.into_iter().collect()
}

/// Sets from the most recent logging of `exercise_name`, ready to reuse.
///
/// `history` must be ordered newest first. The name match is
/// case-insensitive. Returned sets get fresh identifiers and are marked not
/// completed.
pub fn previous_sets(history: &[WorkoutSession], exercise_name: &str) -> Option<Vec<WorkoutSet>> {
    let wanted = exercise_name.trim().to_lowercase();
    if wanted.is_empty() {
        return None;
    }

    let previous = history
        .iter()
        .flat_map(|s| s.exercises.iter())
        .find(|e| e.name.to_lowercase() == wanted)?;

    Some(
        previous
            .sets
            .iter()
            .map(|s| WorkoutSet {
                id: fresh_id(),
                completed: false,
                ..s.clone()
            })
            .collect(),
    )
}
