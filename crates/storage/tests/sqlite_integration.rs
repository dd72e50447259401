use chrono::NaiveDate;
use reps_core::model::{ProfileCode, SessionRecord};
use reps_core::time::fixed_now;
use storage::repository::{
    AttemptRecord, AttemptRepository, ProfileRepository, SessionRepository,
};
use storage::sqlite::SqliteRepository;

fn code(raw: &str) -> ProfileCode {
    ProfileCode::parse(raw).expect("valid code")
}

fn session_on(day: u32, correct: u32, total: u32) -> SessionRecord {
    SessionRecord::new(
        NaiveDate::from_ymd_opt(2024, 6, day).unwrap(),
        correct,
        total,
        300,
        fixed_now(),
    )
    .unwrap()
}

#[tokio::test]
async fn sqlite_profile_is_created_once() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_profiles?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    let code = code("abc123");
    assert!(!repo.profile_exists(&code).await.unwrap());
    repo.ensure_profile(&code, fixed_now()).await.unwrap();
    repo.ensure_profile(&code, fixed_now()).await.unwrap();
    assert!(repo.profile_exists(&code).await.unwrap());
}

#[tokio::test]
async fn sqlite_sessions_roundtrip_and_accumulate() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_sessions?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    let code = code("abc123");
    repo.ensure_profile(&code, fixed_now()).await.unwrap();

    let first = repo.append_session(&code, &session_on(1, 7, 10)).await.unwrap();
    let second = repo.append_session(&code, &session_on(1, 9, 10)).await.unwrap();
    assert_ne!(first, second);

    // Two rows for the same local date are allowed: no dedup is enforced.
    let rows = repo.list_sessions(&code).await.unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].local_date(), rows[1].local_date());
    assert_eq!(rows[0].correct(), 7);
    assert_eq!(rows[1].correct(), 9);

    let other = self::code("nobody");
    repo.ensure_profile(&other, fixed_now()).await.unwrap();
    assert!(repo.list_sessions(&other).await.unwrap().is_empty());
}

#[tokio::test]
async fn sqlite_attempts_preserve_insertion_order() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_attempts?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    for (item_id, correct) in [("f1", true), ("t1", false), ("w1", true)] {
        repo.append_attempt(&AttemptRecord {
            play_id: "play-7".into(),
            item_id: item_id.into(),
            item_type: "flash".into(),
            correct,
            response: "r".into(),
            created_at: fixed_now(),
        })
        .await
        .unwrap();
    }

    let rows = repo.list_attempts("play-7").await.unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].item_id, "f1");
    assert_eq!(rows[2].item_id, "w1");
    assert!(!rows[1].correct);
    assert!(repo.list_attempts("play-8").await.unwrap().is_empty());
}

#[tokio::test]
async fn sqlite_play_completion_upserts() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_plays?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    repo.mark_play_completed("play-1", fixed_now()).await.unwrap();
    // Second completion for the same play must not error.
    repo.mark_play_completed("play-1", fixed_now()).await.unwrap();
}
