//! Item-player state machine.
//!
//! A [`PlayerSession`] walks a fixed, ordered list of items. Navigation and
//! answering are independent: the learner may move back and forth freely,
//! but each item accepts exactly one attempt, and the session only completes
//! once every answerable item has one.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use reps_core::model::{Attempt, AttemptResponse, Item, ItemId, ItemRecord};

use crate::error::PlayerError;
use crate::progress::PlayerProgress;
use crate::view::ItemView;

/// Where the player currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerState {
    /// Viewing the item at this position.
    Viewing(usize),
    /// All answerable items are answered and completion was confirmed.
    Completed,
}

/// One sitting with a plan of items.
///
/// Completion is terminal. Attempts are first-answer-wins: re-answering an
/// item yields [`PlayerError::AlreadyAnswered`] and leaves the recorded
/// attempt untouched.
#[derive(Debug, Clone)]
pub struct PlayerSession {
    items: Vec<Item>,
    current: usize,
    attempts: Vec<Attempt>,
    answered: HashMap<ItemId, usize>,
    started_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
    finalized: bool,
}

impl PlayerSession {
    /// Start a session over an ordered plan of items.
    ///
    /// # Errors
    ///
    /// Returns [`PlayerError::Empty`] when `items` is empty.
    pub fn new(items: Vec<Item>, started_at: DateTime<Utc>) -> Result<Self, PlayerError> {
        if items.is_empty() {
            return Err(PlayerError::Empty);
        }
        Ok(Self {
            items,
            current: 0,
            attempts: Vec::new(),
            answered: HashMap::new(),
            started_at,
            completed_at: None,
            finalized: false,
        })
    }

    /// Start a session from raw records, assigning positional ids where
    /// records carry none.
    ///
    /// # Errors
    ///
    /// Returns [`PlayerError::Empty`] for an empty batch, or an item
    /// validation error for malformed records.
    pub fn from_records(
        records: Vec<ItemRecord>,
        started_at: DateTime<Utc>,
    ) -> Result<Self, PlayerError> {
        let items = records
            .into_iter()
            .enumerate()
            .map(|(position, record)| Item::from_record(record, position))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(items, started_at)
    }

    // ─── Inspection ──────────────────────────────────────────────────────

    #[must_use]
    pub fn state(&self) -> PlayerState {
        if self.completed_at.is_some() {
            PlayerState::Completed
        } else {
            PlayerState::Viewing(self.current)
        }
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.completed_at.is_some()
    }

    #[must_use]
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    #[must_use]
    pub fn attempts(&self) -> &[Attempt] {
        &self.attempts
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// Elapsed whole seconds from start to completion.
    #[must_use]
    pub fn duration_sec(&self) -> Option<u32> {
        self.completed_at.map(|done| {
            u32::try_from((done - self.started_at).num_seconds().max(0)).unwrap_or(u32::MAX)
        })
    }

    /// The item under the cursor, or `None` once completed.
    #[must_use]
    pub fn current_item(&self) -> Option<&Item> {
        if self.is_complete() {
            None
        } else {
            self.items.get(self.current)
        }
    }

    /// Look an item up by id.
    #[must_use]
    pub fn item(&self, item_id: &ItemId) -> Option<&Item> {
        self.items.iter().find(|item| item.id() == item_id)
    }

    /// The recorded attempt for an item, if it has been answered.
    #[must_use]
    pub fn attempt_for(&self, item_id: &ItemId) -> Option<&Attempt> {
        self.answered.get(item_id).map(|&idx| &self.attempts[idx])
    }

    /// Count of correct attempts so far.
    #[must_use]
    pub fn correct_count(&self) -> u32 {
        u32::try_from(self.attempts.iter().filter(|a| a.correct()).count()).unwrap_or(u32::MAX)
    }

    /// Items that must be answered before the session can complete.
    #[must_use]
    pub fn required(&self) -> usize {
        self.items
            .iter()
            .filter(|item| item.kind().is_answerable())
            .count()
    }

    #[must_use]
    pub fn progress(&self) -> PlayerProgress {
        PlayerProgress {
            total: self.items.len(),
            required: self.required(),
            answered: self.attempts.len(),
            is_complete: self.is_complete(),
        }
    }

    /// View model for the item under the cursor.
    #[must_use]
    pub fn current_view(&self) -> Option<ItemView> {
        self.current_item()
            .map(|item| ItemView::for_item(item, self.attempt_for(item.id())))
    }

    /// View model for the item at `position`, restoring any saved response.
    #[must_use]
    pub fn view_at(&self, position: usize) -> Option<ItemView> {
        self.items
            .get(position)
            .map(|item| ItemView::for_item(item, self.attempt_for(item.id())))
    }

    // ─── Transitions ─────────────────────────────────────────────────────

    /// Record the learner's response for the item under the cursor.
    ///
    /// Completion happens implicitly here when this was the last unanswered
    /// answerable item.
    ///
    /// # Errors
    ///
    /// Returns [`PlayerError::Completed`] after completion,
    /// [`PlayerError::AlreadyAnswered`] on a repeat answer, and attempt
    /// validation errors for responses that do not fit the item.
    pub fn record_attempt(
        &mut self,
        response: AttemptResponse,
        recorded_at: DateTime<Utc>,
    ) -> Result<&Attempt, PlayerError> {
        if self.is_complete() {
            return Err(PlayerError::Completed);
        }
        let item = &self.items[self.current];
        if self.answered.contains_key(item.id()) {
            return Err(PlayerError::AlreadyAnswered {
                item_id: item.id().clone(),
            });
        }

        let attempt = Attempt::grade(item, response, recorded_at)?;
        let slot = self.attempts.len();
        self.answered.insert(item.id().clone(), slot);
        self.attempts.push(attempt);

        if self.attempts.len() >= self.required() {
            self.completed_at = Some(recorded_at);
        }
        Ok(&self.attempts[slot])
    }

    /// Move the cursor forward one item.
    ///
    /// At the last item this acts as the completion gate: it succeeds only
    /// once every answerable item has an attempt, otherwise the cursor stays
    /// put.
    ///
    /// # Errors
    ///
    /// Returns [`PlayerError::Completed`] after completion and
    /// [`PlayerError::Incomplete`] when finishing is attempted with items
    /// still unanswered.
    pub fn advance(&mut self, now: DateTime<Utc>) -> Result<PlayerState, PlayerError> {
        if self.is_complete() {
            return Err(PlayerError::Completed);
        }
        if self.current + 1 < self.items.len() {
            self.current += 1;
            return Ok(PlayerState::Viewing(self.current));
        }
        let answered = self.attempts.len();
        let required = self.required();
        if answered < required {
            return Err(PlayerError::Incomplete { answered, required });
        }
        self.completed_at.get_or_insert(now);
        Ok(PlayerState::Completed)
    }

    /// Move the cursor back one item. A no-op at the first item.
    ///
    /// # Errors
    ///
    /// Returns [`PlayerError::Completed`] after completion.
    pub fn retreat(&mut self) -> Result<PlayerState, PlayerError> {
        if self.is_complete() {
            return Err(PlayerError::Completed);
        }
        self.current = self.current.saturating_sub(1);
        Ok(PlayerState::Viewing(self.current))
    }

    /// One-shot guard for the completion report. Returns `true` exactly once
    /// per session, and only after completion.
    pub(crate) fn begin_finalize(&mut self) -> bool {
        if self.is_complete() && !self.finalized {
            self.finalized = true;
            true
        } else {
            false
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────
