//! Read-only aggregate statistics over a profile's persisted sessions.
//!
//! Deterministic given the set of sessions and the query date; duplicates on
//! the same local date collapse to one streak day.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::model::SessionRecord;

/// Aggregate statistics snapshot for one profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    /// Consecutive local dates with at least one session, counting back from
    /// the query date.
    pub current_streak: u32,
    /// Longest run of consecutive local dates ever recorded.
    pub best_streak: u32,
    /// Number of session rows recorded.
    pub sessions_recorded: u32,
    pub lifetime_correct: u64,
    pub lifetime_total: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_session_date: Option<NaiveDate>,
}

/// Compute the statistics snapshot for a set of sessions as of `today`.
#[must_use]
pub fn compute(sessions: &[SessionRecord], today: NaiveDate) -> StatsSnapshot {
    let days: BTreeSet<NaiveDate> = sessions.iter().map(SessionRecord::local_date).collect();

    let mut current_streak = 0_u32;
    let mut cursor = Some(today);
    while let Some(day) = cursor {
        if !days.contains(&day) {
            break;
        }
        current_streak += 1;
        cursor = day.pred_opt();
    }

    let mut best_streak = 0_u32;
    let mut run = 0_u32;
    let mut prev: Option<NaiveDate> = None;
    for day in &days {
        match prev.and_then(|d| d.succ_opt()) {
            Some(expected) if expected == *day => run += 1,
            _ => run = 1,
        }
        best_streak = best_streak.max(run);
        prev = Some(*day);
    }

    let sessions_recorded = u32::try_from(sessions.len()).unwrap_or(u32::MAX);
    let lifetime_correct = sessions.iter().map(|s| u64::from(s.correct())).sum();
    let lifetime_total = sessions.iter().map(|s| u64::from(s.total())).sum();

    StatsSnapshot {
        current_streak,
        best_streak,
        sessions_recorded,
        lifetime_correct,
        lifetime_total,
        last_session_date: days.iter().next_back().copied(),
    }
}
