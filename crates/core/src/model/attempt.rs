use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::ItemId;
use crate::model::item::{Item, ItemKind};

//
// ─── ERRORS ───────────────────────────────────────────────────────────────────
//

/// Errors raised while grading a learner response against an item.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AttemptError {
    #[error("items of type `{item_type}` cannot be answered")]
    Unanswerable { item_type: String },

    #[error("response shape does not match a {expected} item")]
    ResponseMismatch { expected: &'static str },

    #[error("selected option {selected} is out of range for {options} options")]
    ChoiceOutOfRange { selected: usize, options: usize },
}

//
// ─── RESPONSES ────────────────────────────────────────────────────────────────
//

/// Binary self-assessment for flash cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelfVerdict {
    /// "Nailed it": the learner asserts recall succeeded.
    NailedIt,
    /// "Needs work": the learner asserts recall failed.
    NeedsWork,
}

impl SelfVerdict {
    #[must_use]
    pub fn is_correct(self) -> bool {
        matches!(self, SelfVerdict::NailedIt)
    }
}

/// The learner's captured response to one item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum AttemptResponse {
    /// Flash self-assessment.
    Verdict(SelfVerdict),
    /// Selected option index for a tradeoff question.
    Choice(usize),
    /// Free-text note for whiteboard/behavioral prompts.
    Note(String),
}

impl AttemptResponse {
    /// Flat string form for the `/submit` wire payload.
    #[must_use]
    pub fn wire_text(&self) -> String {
        match self {
            AttemptResponse::Verdict(SelfVerdict::NailedIt) => "nailed-it".to_owned(),
            AttemptResponse::Verdict(SelfVerdict::NeedsWork) => "needs-work".to_owned(),
            AttemptResponse::Choice(i) => format!("picked={i}"),
            AttemptResponse::Note(text) => text.trim().to_owned(),
        }
    }
}

//
// ─── ATTEMPT ──────────────────────────────────────────────────────────────────
//

/// The recorded outcome of one interaction with one item.
///
/// Created at most once per item within a session; correctness is computed
/// here so every caller applies the same rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attempt {
    item_id: ItemId,
    correct: bool,
    response: AttemptResponse,
    recorded_at: DateTime<Utc>,
}

impl Attempt {
    /// Grade a response against an item.
    ///
    /// Correctness rules:
    /// - flash: learner-asserted, never computed;
    /// - tradeoff: selected index equals the answer index;
    /// - whiteboard/behavioral: non-empty note after trimming;
    /// - unknown item types are unanswerable.
    ///
    /// # Errors
    ///
    /// Returns `AttemptError` for unanswerable items, mismatched response
    /// shapes, or an out-of-range option choice.
    pub fn grade(
        item: &Item,
        response: AttemptResponse,
        recorded_at: DateTime<Utc>,
    ) -> Result<Self, AttemptError> {
        let correct = match (item.kind(), &response) {
            (ItemKind::Unknown { raw_type }, _) => {
                return Err(AttemptError::Unanswerable {
                    item_type: raw_type.clone(),
                });
            }
            (ItemKind::Flash { .. }, AttemptResponse::Verdict(v)) => v.is_correct(),
            (ItemKind::Flash { .. }, _) => {
                return Err(AttemptError::ResponseMismatch { expected: "flash" });
            }
            (ItemKind::Tradeoff { options, answer, .. }, AttemptResponse::Choice(selected)) => {
                if *selected >= options.len() {
                    return Err(AttemptError::ChoiceOutOfRange {
                        selected: *selected,
                        options: options.len(),
                    });
                }
                selected == answer
            }
            (ItemKind::Tradeoff { .. }, _) => {
                return Err(AttemptError::ResponseMismatch { expected: "tradeoff" });
            }
            (
                ItemKind::Whiteboard { .. } | ItemKind::Behavioral { .. },
                AttemptResponse::Note(note),
            ) => !note.trim().is_empty(),
            (ItemKind::Whiteboard { .. }, _) => {
                return Err(AttemptError::ResponseMismatch { expected: "whiteboard" });
            }
            (ItemKind::Behavioral { .. }, _) => {
                return Err(AttemptError::ResponseMismatch { expected: "behavioral" });
            }
        };

        Ok(Self {
            item_id: item.id().clone(),
            correct,
            response,
            recorded_at,
        })
    }

    #[must_use]
    pub fn item_id(&self) -> &ItemId {
        &self.item_id
    }

    #[must_use]
    pub fn correct(&self) -> bool {
        self.correct
    }

    #[must_use]
    pub fn response(&self) -> &AttemptResponse {
        &self.response
    }

    #[must_use]
    pub fn recorded_at(&self) -> DateTime<Utc> {
        self.recorded_at
    }
}

//
// ─── TESTS ────────────────────────────────────────────────────────────────────
//
