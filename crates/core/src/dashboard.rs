//! Training dashboard aggregates over a user's workout history.

use serde::Serialize;

use crate::reward::set_volume;
use crate::types::{DbId, Timestamp};
use crate::workout::{clamp_weight, WorkoutSession};

/// Per-session point on the volume / max-weight charts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSummary {
    pub session_id: DbId,
    pub performed_at: Timestamp,
    pub volume: f64,
    pub max_weight: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
    /// Oldest first, ready for charting.
    pub sessions: Vec<SessionSummary>,
    pub session_count: usize,
    pub total_volume: f64,
    /// Mean volume per session, rounded to the nearest whole number.
    pub avg_volume: f64,
    pub peak_max_weight: f64,
}

fn summarize_session(session: &WorkoutSession) -> SessionSummary {
    let completed = session
        .exercises
        .iter()
        .flat_map(|e| e.sets.iter())
        .filter(|s| s.completed);

    let (volume, max_weight) = completed.fold((0.0_f64, 0.0_f64), |(volume, max), s| {
        (volume + set_volume(s), max.max(clamp_weight(s.weight)))
    });

    SessionSummary {
        session_id: session.id,
        performed_at: session.performed_at,
        volume,
        max_weight,
    }
}

/// Build the dashboard from `history` (newest first, as stored).
pub fn summarize(history: &[WorkoutSession]) -> DashboardSummary {
    let sessions: Vec<SessionSummary> = history.iter().rev().map(summarize_session).collect();

    let total_volume: f64 = sessions.iter().map(|s| s.volume).sum();
    let avg_volume = if sessions.is_empty() {
        0.0
    } else {
        (total_volume / sessions.len() as f64).round()
    };
    let peak_max_weight = sessions.iter().map(|s| s.max_weight).fold(0.0, f64::max);

    DashboardSummary {
        session_count: sessions.len(),
        sessions,
        total_volume,
        avg_volume,
        peak_max_weight,
    }
}
