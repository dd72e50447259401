//! End-to-end exercise of the player loop against a captured sink.

use std::sync::Arc;

use tokio::sync::mpsc;

use player::{
    AttemptSink, CompletePayload, PlayerError, PlayerLoop, PlayerSession, PlayerState, SinkError,
    SubmitPayload,
};
use reps_core::model::{AttemptResponse, ItemRecord, SelfVerdict};
use reps_core::time::{fixed_clock, fixed_now};

struct CaptureSink {
    attempts: mpsc::UnboundedSender<SubmitPayload>,
    completions: mpsc::UnboundedSender<CompletePayload>,
}

#[async_trait::async_trait]
impl AttemptSink for CaptureSink {
    async fn submit_attempt(&self, payload: SubmitPayload) -> Result<(), SinkError> {
        let _ = self.attempts.send(payload);
        Ok(())
    }

    async fn submit_completion(&self, payload: CompletePayload) -> Result<(), SinkError> {
        let _ = self.completions.send(payload);
        Ok(())
    }
}

struct FailingSink;

#[async_trait::async_trait]
impl AttemptSink for FailingSink {
    async fn submit_attempt(&self, _payload: SubmitPayload) -> Result<(), SinkError> {
        Err(SinkError::HttpStatus(reqwest::StatusCode::BAD_GATEWAY))
    }

    async fn submit_completion(&self, _payload: CompletePayload) -> Result<(), SinkError> {
        Err(SinkError::HttpStatus(reqwest::StatusCode::BAD_GATEWAY))
    }
}

fn capture() -> (
    Arc<CaptureSink>,
    mpsc::UnboundedReceiver<SubmitPayload>,
    mpsc::UnboundedReceiver<CompletePayload>,
) {
    let (attempts_tx, attempts_rx) = mpsc::unbounded_channel();
    let (completions_tx, completions_rx) = mpsc::unbounded_channel();
    (
        Arc::new(CaptureSink {
            attempts: attempts_tx,
            completions: completions_tx,
        }),
        attempts_rx,
        completions_rx,
    )
}

fn flash(id: &str) -> ItemRecord {
    ItemRecord {
        id: Some(id.to_string()),
        kind: Some("flash".into()),
        front: Some("Q".into()),
        back: Some("A".into()),
        ..ItemRecord::default()
    }
}

fn tradeoff(id: &str) -> ItemRecord {
    ItemRecord {
        id: Some(id.to_string()),
        kind: Some("tradeoff".into()),
        question: Some("pick".into()),
        options: Some(vec!["a".into(), "b".into()]),
        answer: Some(0),
        ..ItemRecord::default()
    }
}

fn unknown(id: &str) -> ItemRecord {
    ItemRecord {
        id: Some(id.to_string()),
        kind: Some("mystery".into()),
        ..ItemRecord::default()
    }
}

#[tokio::test]
async fn attempts_and_completion_are_reported() {
    let (sink, mut attempts_rx, mut completions_rx) = capture();
    let loop_ = PlayerLoop::new(fixed_clock(), "REPS-PLAY01", sink);
    let mut session =
        PlayerSession::from_records(vec![flash("f1"), tradeoff("t1")], fixed_now()).unwrap();

    let outcome = loop_
        .record_attempt(
            &mut session,
            AttemptResponse::Verdict(SelfVerdict::NeedsWork),
        )
        .unwrap();
    assert!(!outcome.completion_sent);
    assert!(!outcome.attempt.correct());

    let wire = attempts_rx.recv().await.unwrap();
    assert_eq!(wire.session_id, "REPS-PLAY01");
    assert_eq!(wire.item_id, "f1");
    assert_eq!(wire.item_type, "flash");
    assert_eq!(wire.correct, 0);
    assert_eq!(wire.response, "needs-work");

    loop_.advance(&mut session).unwrap();
    let outcome = loop_
        .record_attempt(&mut session, AttemptResponse::Choice(0))
        .unwrap();
    assert!(outcome.completion_sent);
    assert!(session.is_complete());

    let wire = attempts_rx.recv().await.unwrap();
    assert_eq!(wire.item_type, "tradeoff");
    assert_eq!(wire.correct, 1);
    assert_eq!(wire.response, "picked=0");

    let done = completions_rx.recv().await.unwrap();
    assert_eq!(done.session_id, "REPS-PLAY01");

    // Terminal state rejects further interaction, and no second completion
    // report is ever queued.
    assert!(matches!(
        loop_.record_attempt(&mut session, AttemptResponse::Choice(0)),
        Err(PlayerError::Completed)
    ));
    assert!(completions_rx.try_recv().is_err());
}

#[tokio::test]
async fn unplayable_plan_completes_through_the_advance_gate() {
    let (sink, _attempts_rx, mut completions_rx) = capture();
    let loop_ = PlayerLoop::new(fixed_clock(), "REPS-PLAY02", sink);
    let mut session =
        PlayerSession::from_records(vec![unknown("x1"), unknown("x2")], fixed_now()).unwrap();

    assert_eq!(
        loop_.advance(&mut session).unwrap(),
        PlayerState::Viewing(1)
    );
    assert_eq!(loop_.advance(&mut session).unwrap(), PlayerState::Completed);

    let done = completions_rx.recv().await.unwrap();
    assert_eq!(done.session_id, "REPS-PLAY02");
    assert!(completions_rx.try_recv().is_err());
}

#[tokio::test]
async fn sink_failures_leave_local_state_intact() {
    let loop_ = PlayerLoop::new(fixed_clock(), "REPS-PLAY03", Arc::new(FailingSink));
    let mut session = PlayerSession::from_records(vec![flash("f1")], fixed_now()).unwrap();

    let outcome = loop_
        .record_attempt(
            &mut session,
            AttemptResponse::Verdict(SelfVerdict::NailedIt),
        )
        .unwrap();

    assert!(outcome.completion_sent);
    assert_eq!(outcome.progress.answered, 1);
    assert!(session.is_complete());
    assert_eq!(session.correct_count(), 1);
}

#[tokio::test]
async fn rejected_attempts_report_nothing() {
    let (sink, mut attempts_rx, _completions_rx) = capture();
    let loop_ = PlayerLoop::new(fixed_clock(), "REPS-PLAY04", sink);
    let mut session = PlayerSession::from_records(vec![tradeoff("t1")], fixed_now()).unwrap();

    let err = loop_
        .record_attempt(
            &mut session,
            AttemptResponse::Verdict(SelfVerdict::NailedIt),
        )
        .unwrap_err();
    assert!(matches!(err, PlayerError::Attempt(_)));
    assert!(attempts_rx.try_recv().is_err());
    assert_eq!(session.progress().answered, 0);
}
