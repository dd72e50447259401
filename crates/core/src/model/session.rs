use chrono::{DateTime, NaiveDate, Utc};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionRecordError {
    #[error("session total must be positive, got {total}")]
    NonPositiveTotal { total: u32 },

    #[error("correct count {correct} exceeds total {total}")]
    CorrectOutOfRange { correct: u32, total: u32 },
}

/// Summary of one completed run through a day's items, owned by a profile.
///
/// Immutable once constructed; the same invariants are enforced on creation
/// and on rehydration from storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRecord {
    local_date: NaiveDate,
    correct: u32,
    total: u32,
    duration_sec: u32,
    created_at: DateTime<Utc>,
}

impl SessionRecord {
    /// Build a validated session record.
    ///
    /// # Errors
    ///
    /// Returns `SessionRecordError::NonPositiveTotal` if `total` is zero and
    /// `SessionRecordError::CorrectOutOfRange` if `correct > total`.
    pub fn new(
        local_date: NaiveDate,
        correct: u32,
        total: u32,
        duration_sec: u32,
        created_at: DateTime<Utc>,
    ) -> Result<Self, SessionRecordError> {
        if total == 0 {
            return Err(SessionRecordError::NonPositiveTotal { total });
        }
        if correct > total {
            return Err(SessionRecordError::CorrectOutOfRange { correct, total });
        }
        Ok(Self {
            local_date,
            correct,
            total,
            duration_sec,
            created_at,
        })
    }

    /// Rehydrate a session record from persisted storage.
    ///
    /// # Errors
    ///
    /// Applies the same validation as [`SessionRecord::new`].
    pub fn from_persisted(
        local_date: NaiveDate,
        correct: u32,
        total: u32,
        duration_sec: u32,
        created_at: DateTime<Utc>,
    ) -> Result<Self, SessionRecordError> {
        Self::new(local_date, correct, total, duration_sec, created_at)
    }

    #[must_use]
    pub fn local_date(&self) -> NaiveDate {
        self.local_date
    }

    #[must_use]
    pub fn correct(&self) -> u32 {
        self.correct
    }

    #[must_use]
    pub fn total(&self) -> u32 {
        self.total
    }

    #[must_use]
    pub fn duration_sec(&self) -> u32 {
        self.duration_sec
    }

    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
