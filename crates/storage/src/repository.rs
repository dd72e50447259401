use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

use reps_core::model::{ProfileCode, SessionRecord};

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("conflict")]
    Conflict,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Persisted shape for one per-item attempt event.
///
/// Attempts arrive fire-and-forget from the player; rows are append-only and
/// keyed by the client-generated play id, not by the profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptRecord {
    pub play_id: String,
    pub item_id: String,
    pub item_type: String,
    pub correct: bool,
    pub response: String,
    pub created_at: DateTime<Utc>,
}

/// Repository contract for profile identities.
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Create the profile if it does not exist yet. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the write fails.
    async fn ensure_profile(
        &self,
        code: &ProfileCode,
        created_at: DateTime<Utc>,
    ) -> Result<(), StorageError>;

    /// Check whether the profile exists.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the lookup fails.
    async fn profile_exists(&self, code: &ProfileCode) -> Result<bool, StorageError>;
}

/// Repository contract for completed-session rows.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Append one session row and return its row id.
    ///
    /// Rows are append-only; several rows may share a profile and local date.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the insert fails.
    async fn append_session(
        &self,
        code: &ProfileCode,
        record: &SessionRecord,
    ) -> Result<i64, StorageError>;

    /// Fetch all session rows for a profile, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the query fails or a row fails validation.
    async fn list_sessions(&self, code: &ProfileCode) -> Result<Vec<SessionRecord>, StorageError>;
}

/// Repository contract for per-item attempt events and play completion.
#[async_trait]
pub trait AttemptRepository: Send + Sync {
    /// Append one attempt row and return its row id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the insert fails.
    async fn append_attempt(&self, record: &AttemptRecord) -> Result<i64, StorageError>;

    /// Mark a play as completed. Upserts, so repeated calls are harmless.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the write fails.
    async fn mark_play_completed(
        &self,
        play_id: &str,
        completed_at: DateTime<Utc>,
    ) -> Result<(), StorageError>;

    /// Fetch attempts for a play, in insertion order.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the query fails.
    async fn list_attempts(&self, play_id: &str) -> Result<Vec<AttemptRecord>, StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    profiles: Arc<Mutex<HashMap<String, DateTime<Utc>>>>,
    sessions: Arc<Mutex<HashMap<String, Vec<SessionRecord>>>>,
    attempts: Arc<Mutex<Vec<AttemptRecord>>>,
    completed_plays: Arc<Mutex<HashMap<String, DateTime<Utc>>>>,
    next_row_id: Arc<Mutex<i64>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&self) -> Result<i64, StorageError> {
        let mut guard = self
            .next_row_id
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        *guard += 1;
        Ok(*guard)
    }
}

#[async_trait]
impl ProfileRepository for InMemoryRepository {
    async fn ensure_profile(
        &self,
        code: &ProfileCode,
        created_at: DateTime<Utc>,
    ) -> Result<(), StorageError> {
        let mut guard = self
            .profiles
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.entry(code.as_str().to_owned()).or_insert(created_at);
        Ok(())
    }

    async fn profile_exists(&self, code: &ProfileCode) -> Result<bool, StorageError> {
        let guard = self
            .profiles
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.contains_key(code.as_str()))
    }
}

#[async_trait]
impl SessionRepository for InMemoryRepository {
    async fn append_session(
        &self,
        code: &ProfileCode,
        record: &SessionRecord,
    ) -> Result<i64, StorageError> {
        let id = self.next_id()?;
        let mut guard = self
            .sessions
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard
            .entry(code.as_str().to_owned())
            .or_default()
            .push(record.clone());
        Ok(id)
    }

    async fn list_sessions(&self, code: &ProfileCode) -> Result<Vec<SessionRecord>, StorageError> {
        let guard = self
            .sessions
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(code.as_str()).cloned().unwrap_or_default())
    }
}

#[async_trait]
impl AttemptRepository for InMemoryRepository {
    async fn append_attempt(&self, record: &AttemptRecord) -> Result<i64, StorageError> {
        let id = self.next_id()?;
        let mut guard = self
            .attempts
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.push(record.clone());
        Ok(id)
    }

    async fn mark_play_completed(
        &self,
        play_id: &str,
        completed_at: DateTime<Utc>,
    ) -> Result<(), StorageError> {
        let mut guard = self
            .completed_plays
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(play_id.to_owned(), completed_at);
        Ok(())
    }

    async fn list_attempts(&self, play_id: &str) -> Result<Vec<AttemptRecord>, StorageError> {
        let guard = self
            .attempts
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard
            .iter()
            .filter(|a| a.play_id == play_id)
            .cloned()
            .collect())
    }
}

/// Aggregates the repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub profiles: Arc<dyn ProfileRepository>,
    pub sessions: Arc<dyn SessionRepository>,
    pub attempts: Arc<dyn AttemptRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let repo = InMemoryRepository::new();
        let profiles: Arc<dyn ProfileRepository> = Arc::new(repo.clone());
        let sessions: Arc<dyn SessionRepository> = Arc::new(repo.clone());
        let attempts: Arc<dyn AttemptRepository> = Arc::new(repo);
        Self {
            profiles,
            sessions,
            attempts,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use reps_core::time::fixed_now;

    fn code(raw: &str) -> ProfileCode {
        ProfileCode::parse(raw).unwrap()
    }

    fn record(day: u32) -> SessionRecord {
        SessionRecord::new(
            NaiveDate::from_ymd_opt(2024, 5, day).unwrap(),
            7,
            10,
            300,
            fixed_now(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn ensure_profile_is_idempotent() {
        let repo = InMemoryRepository::new();
        let code = code("abc123");
        repo.ensure_profile(&code, fixed_now()).await.unwrap();
        repo.ensure_profile(&code, fixed_now()).await.unwrap();
        assert!(repo.profile_exists(&code).await.unwrap());
        assert!(!repo.profile_exists(&self::code("other")).await.unwrap());
    }

    #[tokio::test]
    async fn sessions_accumulate_per_profile() {
        let repo = InMemoryRepository::new();
        let code = code("abc123");
        repo.append_session(&code, &record(1)).await.unwrap();
        repo.append_session(&code, &record(1)).await.unwrap();
        repo.append_session(&code, &record(2)).await.unwrap();

        let rows = repo.list_sessions(&code).await.unwrap();
        assert_eq!(rows.len(), 3);
        assert!(repo.list_sessions(&self::code("other")).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn attempts_are_scoped_by_play() {
        let repo = InMemoryRepository::new();
        let attempt = AttemptRecord {
            play_id: "play-1".into(),
            item_id: "f1".into(),
            item_type: "flash".into(),
            correct: true,
            response: "nailed-it".into(),
            created_at: fixed_now(),
        };
        repo.append_attempt(&attempt).await.unwrap();
        repo.append_attempt(&AttemptRecord {
            play_id: "play-2".into(),
            ..attempt.clone()
        })
        .await
        .unwrap();

        assert_eq!(repo.list_attempts("play-1").await.unwrap().len(), 1);
        repo.mark_play_completed("play-1", fixed_now()).await.unwrap();
        repo.mark_play_completed("play-1", fixed_now()).await.unwrap();
    }
}
