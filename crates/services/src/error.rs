//! Shared error types for the services crate.

use thiserror::Error;

use reps_core::model::{ProfileCodeError, SessionRecordError};
use storage::repository::StorageError;

/// Errors emitted by `RecorderService`.
///
/// Profile and count variants are validation failures the HTTP layer maps to
/// 400 responses; storage failures map to 500.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RecorderError {
    #[error(transparent)]
    Profile(#[from] ProfileCodeError),
    #[error(transparent)]
    Counts(#[from] SessionRecordError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl RecorderError {
    /// Whether this error was caused by invalid caller input.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, RecorderError::Profile(_) | RecorderError::Counts(_))
    }
}
