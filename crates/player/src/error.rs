//! Shared error types for the player crate.

use thiserror::Error;

use reps_core::model::{AttemptError, ItemError, ItemId};

/// Errors emitted by the item-player state machine.
///
/// Everything here is recoverable at the interaction level: the UI shows a
/// warning and the session keeps its current state.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PlayerError {
    #[error("no items to play")]
    Empty,

    #[error("session already completed")]
    Completed,

    #[error("item `{item_id}` already has a recorded attempt")]
    AlreadyAnswered { item_id: ItemId },

    #[error("{answered} of {required} items answered; finish the rest before completing")]
    Incomplete { answered: usize, required: usize },

    #[error(transparent)]
    Attempt(#[from] AttemptError),

    #[error(transparent)]
    Item(#[from] ItemError),
}

/// Errors emitted by attempt sinks.
///
/// Sink failures are advisory: they are logged and never block progression.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SinkError {
    #[error("report failed with status {0}")]
    HttpStatus(reqwest::StatusCode),

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}
