//! Ties the state machine to the reporting sink.
//!
//! [`PlayerLoop`] owns what happens around each interaction: grade locally,
//! then ship the attempt to the recorder in the background. Reporting is
//! strictly advisory. A dead recorder never blocks the learner, and the
//! completion report goes out at most once per session no matter which path
//! finished it.

use std::sync::Arc;

use reps_core::Clock;
use reps_core::model::{Attempt, AttemptResponse};

use crate::error::PlayerError;
use crate::progress::PlayerProgress;
use crate::report::{AttemptSink, CompletePayload, SubmitPayload};
use crate::session::{PlayerSession, PlayerState};

/// What a single recorded interaction produced.
#[derive(Debug, Clone)]
pub struct AttemptOutcome {
    pub attempt: Attempt,
    pub progress: PlayerProgress,
    /// Whether this interaction triggered the one-time completion report.
    pub completion_sent: bool,
}

/// Drives a [`PlayerSession`] and reports attempts as they happen.
pub struct PlayerLoop {
    clock: Clock,
    play_id: String,
    sink: Arc<dyn AttemptSink>,
}

impl PlayerLoop {
    #[must_use]
    pub fn new(clock: Clock, play_id: impl Into<String>, sink: Arc<dyn AttemptSink>) -> Self {
        Self {
            clock,
            play_id: play_id.into(),
            sink,
        }
    }

    #[must_use]
    pub fn play_id(&self) -> &str {
        &self.play_id
    }

    /// Grade the current item, then report the attempt in the background.
    ///
    /// The local session state is the source of truth: it is updated before
    /// any network activity, and sink failures only produce a warning.
    ///
    /// # Errors
    ///
    /// Returns the state machine's error unchanged; nothing is reported when
    /// the attempt is rejected locally.
    pub fn record_attempt(
        &self,
        session: &mut PlayerSession,
        response: AttemptResponse,
    ) -> Result<AttemptOutcome, PlayerError> {
        let item_type = session
            .current_item()
            .ok_or(PlayerError::Completed)?
            .kind()
            .tag()
            .to_owned();

        let attempt = session.record_attempt(response, self.clock.now())?.clone();

        let payload = SubmitPayload {
            session_id: self.play_id.clone(),
            item_id: attempt.item_id().to_string(),
            item_type,
            correct: u8::from(attempt.correct()),
            response: attempt.response().wire_text(),
        };
        let sink = Arc::clone(&self.sink);
        tokio::spawn(async move {
            if let Err(err) = sink.submit_attempt(payload).await {
                tracing::warn!(error = %err, "attempt report failed");
            }
        });

        let completion_sent = self.finalize_if_complete(session);
        Ok(AttemptOutcome {
            attempt,
            progress: session.progress(),
            completion_sent,
        })
    }

    /// Move forward, reporting completion when the final gate passes.
    ///
    /// # Errors
    ///
    /// Propagates [`PlayerError::Incomplete`] from the completion gate and
    /// [`PlayerError::Completed`] after the session has ended.
    pub fn advance(&self, session: &mut PlayerSession) -> Result<PlayerState, PlayerError> {
        let state = session.advance(self.clock.now())?;
        if state == PlayerState::Completed {
            self.finalize_if_complete(session);
        }
        Ok(state)
    }

    /// Move backward. Never triggers reporting.
    ///
    /// # Errors
    ///
    /// Returns [`PlayerError::Completed`] after the session has ended.
    pub fn retreat(&self, session: &mut PlayerSession) -> Result<PlayerState, PlayerError> {
        session.retreat()
    }

    fn finalize_if_complete(&self, session: &mut PlayerSession) -> bool {
        if !session.begin_finalize() {
            return false;
        }
        let payload = CompletePayload {
            session_id: self.play_id.clone(),
        };
        let sink = Arc::clone(&self.sink);
        tokio::spawn(async move {
            if let Err(err) = sink.submit_completion(payload).await {
                tracing::warn!(error = %err, "completion report failed");
            }
        });
        true
    }
}
