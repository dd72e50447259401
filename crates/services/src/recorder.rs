use std::sync::Arc;

use chrono::NaiveDate;

use reps_core::Clock;
use reps_core::model::{ProfileCode, SessionRecord};
use reps_core::stats::{self, StatsSnapshot};
use reps_core::time::local_date;
use storage::repository::{
    AttemptRecord, AttemptRepository, ProfileRepository, SessionRepository,
};

use crate::error::RecorderError;

/// Raw session-completion report as received from a client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionReport {
    pub profile_code: String,
    pub correct: u32,
    pub total: u32,
    pub duration_sec: u32,
    pub tz_offset_min: i32,
}

/// Result of persisting a session report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedSession {
    pub session_id: i64,
    pub saved_local_date: NaiveDate,
    pub stats: StatsSnapshot,
}

/// One fire-and-forget attempt event from the player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptEvent {
    pub play_id: String,
    pub item_id: String,
    pub item_type: String,
    pub correct: bool,
    pub response: String,
}

/// The Session Recorder: validates reports, resolves profiles lazily, and
/// serves aggregate statistics derived from the stored sessions.
///
/// Each request is independent; the repositories are the only shared state.
#[derive(Clone)]
pub struct RecorderService {
    clock: Clock,
    profiles: Arc<dyn ProfileRepository>,
    sessions: Arc<dyn SessionRepository>,
    attempts: Arc<dyn AttemptRepository>,
}

impl RecorderService {
    #[must_use]
    pub fn new(
        clock: Clock,
        profiles: Arc<dyn ProfileRepository>,
        sessions: Arc<dyn SessionRepository>,
        attempts: Arc<dyn AttemptRepository>,
    ) -> Self {
        Self {
            clock,
            profiles,
            sessions,
            attempts,
        }
    }

    /// Persist a completed session and return the saved local date plus a
    /// fresh statistics snapshot.
    ///
    /// Validation happens before any write: a blank profile code, a
    /// non-positive total, or `correct > total` leaves storage untouched.
    ///
    /// # Errors
    ///
    /// Returns `RecorderError::Profile`/`RecorderError::Counts` for invalid
    /// input and `RecorderError::Storage` for persistence failures.
    pub async fn record_session_complete(
        &self,
        report: &SessionReport,
    ) -> Result<SavedSession, RecorderError> {
        let code = ProfileCode::parse(&report.profile_code)?;
        let now = self.clock.now();
        let saved_local_date = local_date(now, report.tz_offset_min);
        let record = SessionRecord::new(
            saved_local_date,
            report.correct,
            report.total,
            report.duration_sec,
            now,
        )?;

        self.profiles.ensure_profile(&code, now).await?;
        let session_id = self.sessions.append_session(&code, &record).await?;
        let stats = self.stats_for(&code, saved_local_date).await?;

        Ok(SavedSession {
            session_id,
            saved_local_date,
            stats,
        })
    }

    /// Read-only statistics for a profile, as of the caller's local date.
    ///
    /// Resolves (creating if needed) the profile the same way the completion
    /// path does; two calls with no intervening writes return identical
    /// snapshots.
    ///
    /// # Errors
    ///
    /// Returns `RecorderError::Profile` for a blank code and
    /// `RecorderError::Storage` for lookup failures.
    pub async fn stats(
        &self,
        profile_code: &str,
        tz_offset_min: i32,
    ) -> Result<StatsSnapshot, RecorderError> {
        let code = ProfileCode::parse(profile_code)?;
        let now = self.clock.now();
        self.profiles.ensure_profile(&code, now).await?;
        self.stats_for(&code, local_date(now, tz_offset_min)).await
    }

    /// Persist one per-item attempt event.
    ///
    /// # Errors
    ///
    /// Returns `RecorderError::Storage` if the insert fails.
    pub async fn record_attempt(&self, event: &AttemptEvent) -> Result<i64, RecorderError> {
        let record = AttemptRecord {
            play_id: event.play_id.clone(),
            item_id: event.item_id.clone(),
            item_type: event.item_type.clone(),
            correct: event.correct,
            response: event.response.clone(),
            created_at: self.clock.now(),
        };
        Ok(self.attempts.append_attempt(&record).await?)
    }

    /// Mark the end of a played sequence. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns `RecorderError::Storage` if the write fails.
    pub async fn record_play_complete(&self, play_id: &str) -> Result<(), RecorderError> {
        Ok(self
            .attempts
            .mark_play_completed(play_id, self.clock.now())
            .await?)
    }

    async fn stats_for(
        &self,
        code: &ProfileCode,
        today: NaiveDate,
    ) -> Result<StatsSnapshot, RecorderError> {
        let sessions = self.sessions.list_sessions(code).await?;
        Ok(stats::compute(&sessions, today))
    }
}
