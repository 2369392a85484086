//! Experience reward for a finished workout.

use serde::Serialize;

use crate::workout::{clamp_weight, Exercise, WorkoutSet};

/// Volume (weight x reps) worth one experience point.
pub const VOLUME_PER_EXP: f64 = 10.0;
/// Flat experience per completed set.
pub const EXP_PER_COMPLETED_SET: u64 = 50;
/// Ceiling on a single reward, so it always fits a signed 64-bit column.
pub const MAX_GAINED_EXP: u64 = i64::MAX as u64;

/// What a session earned, and why.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WorkoutReward {
    pub total_volume: f64,
    pub completed_sets: u32,
    pub gained_exp: u64,
}

/// Volume of a single set. Incomplete sets count for nothing.
pub fn set_volume(set: &WorkoutSet) -> f64 {
    if set.completed {
        clamp_weight(set.weight) * f64::from(set.reps)
    } else {
        0.0
    }
}

/// `floor(volume / 10) + 50 * completed_sets`, over completed sets only.
///
/// Call once per save. Negative or non-finite weights count as zero.
pub fn compute_reward(exercises: &[Exercise]) -> WorkoutReward {
    let (total_volume, completed_sets) = exercises
        .iter()
        .flat_map(|e| e.sets.iter())
        .filter(|s| s.completed)
        .fold((0.0_f64, 0_u32), |(volume, count), s| {
            (volume + set_volume(s), count.saturating_add(1))
        });

    // Float-to-int `as` saturates, so a pathological volume cannot wrap.
    let volume_exp = (total_volume / VOLUME_PER_EXP).floor() as u64;
    let gained_exp = volume_exp
        .saturating_add(u64::from(completed_sets) * EXP_PER_COMPLETED_SET)
        .min(MAX_GAINED_EXP);

    WorkoutReward {
        total_volume,
        completed_sets,
        gained_exp,
    }
}
