use std::sync::Arc;

use chrono::Duration;
use reps_core::model::ProfileCode;
use reps_core::time::{fixed_clock, fixed_now, local_date};
use services::{AttemptEvent, RecorderService, SessionReport};
use storage::repository::Storage;

fn recorder(storage: &Storage, clock: reps_core::Clock) -> RecorderService {
    RecorderService::new(
        clock,
        Arc::clone(&storage.profiles),
        Arc::clone(&storage.sessions),
        Arc::clone(&storage.attempts),
    )
}

fn report(correct: u32, total: u32, tz_offset_min: i32) -> SessionReport {
    SessionReport {
        profile_code: "flow1".to_owned(),
        correct,
        total,
        duration_sec: 300,
        tz_offset_min,
    }
}

#[tokio::test]
async fn full_day_flow_persists_attempts_and_session() {
    let storage = Storage::in_memory();
    let recorder = recorder(&storage, fixed_clock());

    // Attempts stream in fire-and-forget while the learner plays.
    for (item_id, item_type, correct) in [
        ("f1", "flash", true),
        ("t1", "tradeoff", false),
        ("w1", "whiteboard", true),
    ] {
        recorder
            .record_attempt(&AttemptEvent {
                play_id: "play-1".to_owned(),
                item_id: item_id.to_owned(),
                item_type: item_type.to_owned(),
                correct,
                response: "r".to_owned(),
            })
            .await
            .unwrap();
    }
    recorder.record_play_complete("play-1").await.unwrap();

    // Session completion lands once at the end.
    let saved = recorder
        .record_session_complete(&report(7, 10, 0))
        .await
        .unwrap();
    assert_eq!(saved.saved_local_date, local_date(fixed_now(), 0));
    assert_eq!(saved.stats.current_streak, 1);
    assert_eq!(saved.stats.best_streak, 1);

    let attempts = storage.attempts.list_attempts("play-1").await.unwrap();
    assert_eq!(attempts.len(), 3);
    assert_eq!(attempts[1].item_type, "tradeoff");

    let code = ProfileCode::parse("flow1").unwrap();
    let sessions = storage.sessions.list_sessions(&code).await.unwrap();
    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0].correct(), 7);
}

#[tokio::test]
async fn streak_spans_days_and_respects_tz_offsets() {
    let storage = Storage::in_memory();
    let mut clock = fixed_clock();

    for _ in 0..2 {
        recorder(&storage, clock)
            .record_session_complete(&report(8, 10, 0))
            .await
            .unwrap();
        clock.advance(Duration::days(1));
    }
    let saved = recorder(&storage, clock)
        .record_session_complete(&report(9, 10, 0))
        .await
        .unwrap();
    assert_eq!(saved.stats.current_streak, 3);
    assert_eq!(saved.stats.best_streak, 3);

    // A client east of UTC asks for stats past its local midnight: the
    // query date moves forward a day, so the current streak resets while
    // history stays intact.
    let east = recorder(&storage, clock)
        .stats("flow1", -24 * 60)
        .await
        .unwrap();
    assert_eq!(east.best_streak, 3);
    assert_eq!(east.current_streak, 0);
}

#[tokio::test]
async fn validation_failures_leave_no_partial_writes() {
    let storage = Storage::in_memory();
    let recorder = recorder(&storage, fixed_clock());

    assert!(recorder.record_session_complete(&report(1, 0, 0)).await.is_err());
    assert!(recorder.record_session_complete(&report(11, 10, 0)).await.is_err());

    let code = ProfileCode::parse("flow1").unwrap();
    assert!(!storage.profiles.profile_exists(&code).await.unwrap());
    assert!(storage.sessions.list_sessions(&code).await.unwrap().is_empty());
}
