use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::ItemId;

//
// ─── ERRORS ───────────────────────────────────────────────────────────────────
//

/// Errors raised while turning raw seed/wire records into items.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ItemError {
    #[error("flash item is missing front or back text")]
    MissingFlashFields,

    #[error("tradeoff item is missing its question, options, or answer")]
    MissingTradeoffFields,

    #[error("tradeoff item has an empty option list")]
    EmptyOptions,

    #[error("tradeoff answer index {answer} is out of range for {options} options")]
    AnswerOutOfRange { answer: usize, options: usize },

    #[error("{kind} item is missing its prompt")]
    MissingPrompt { kind: String },
}

//
// ─── ITEM KIND ────────────────────────────────────────────────────────────────
//

/// One study unit of a fixed type.
///
/// The `type` field on the wire is duck-typed; it maps to one variant per
/// recognized tag plus an explicit fallback for anything else. Unknown items
/// render a placeholder and never count toward session completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemKind {
    Flash {
        front: String,
        back: String,
    },
    Tradeoff {
        question: String,
        options: Vec<String>,
        answer: usize,
        explain: Option<String>,
    },
    Whiteboard {
        prompt: String,
    },
    Behavioral {
        prompt: String,
    },
    Unknown {
        raw_type: String,
    },
}

impl ItemKind {
    /// Wire tag for this kind. Unknown kinds keep the tag they arrived with.
    #[must_use]
    pub fn tag(&self) -> &str {
        match self {
            ItemKind::Flash { .. } => "flash",
            ItemKind::Tradeoff { .. } => "tradeoff",
            ItemKind::Whiteboard { .. } => "whiteboard",
            ItemKind::Behavioral { .. } => "behavioral",
            ItemKind::Unknown { raw_type } => raw_type,
        }
    }

    /// Whether the learner can record an attempt against this item.
    #[must_use]
    pub fn is_answerable(&self) -> bool {
        !matches!(self, ItemKind::Unknown { .. })
    }
}

//
// ─── INTAKE RECORD ────────────────────────────────────────────────────────────
//

/// Loosely-typed item shape used at the JSON boundary (seed files and the
/// daily-plan endpoint). Every field is optional; `Item::from_record` decides
/// what the record actually is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub front: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub back: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explain: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
}

impl ItemRecord {
    fn infer_tag(&self) -> &str {
        if self.front.is_some() && self.back.is_some() {
            return "flash";
        }
        if self.question.is_some() && self.options.is_some() {
            return "tradeoff";
        }
        // Legacy seed content encodes whiteboard/behavioral only in the id.
        match self.id.as_deref() {
            Some(id) if id.starts_with('w') => "whiteboard",
            Some(id) if id.starts_with('b') => "behavioral",
            _ => "other",
        }
    }
}

//
// ─── ITEM ─────────────────────────────────────────────────────────────────────
//

/// An immutable study item with a stable identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    id: ItemId,
    kind: ItemKind,
}

impl Item {
    #[must_use]
    pub fn new(id: ItemId, kind: ItemKind) -> Self {
        Self { id, kind }
    }

    /// Resolve a raw record into a typed item.
    ///
    /// The explicit `type` tag wins; records without one fall back to shape
    /// inference. A record without a usable id gets the deterministic
    /// synthetic id `"{tag}-{position}"`, so re-parsing the same sequence
    /// always reproduces the same identities.
    ///
    /// # Errors
    ///
    /// Returns `ItemError` when a recognized type is missing required fields
    /// or carries an out-of-range answer index.
    pub fn from_record(record: ItemRecord, position: usize) -> Result<Self, ItemError> {
        let tag = record
            .kind
            .clone()
            .unwrap_or_else(|| record.infer_tag().to_owned());

        let kind = match tag.as_str() {
            "flash" => {
                let (Some(front), Some(back)) = (record.front, record.back) else {
                    return Err(ItemError::MissingFlashFields);
                };
                ItemKind::Flash { front, back }
            }
            "tradeoff" => {
                let (Some(question), Some(options)) = (record.question, record.options) else {
                    return Err(ItemError::MissingTradeoffFields);
                };
                if options.is_empty() {
                    return Err(ItemError::EmptyOptions);
                }
                // Without an answer index nothing could ever grade correct,
                // so the record is incomplete rather than defaulted.
                let Some(answer) = record.answer else {
                    return Err(ItemError::MissingTradeoffFields);
                };
                if answer >= options.len() {
                    return Err(ItemError::AnswerOutOfRange {
                        answer,
                        options: options.len(),
                    });
                }
                ItemKind::Tradeoff {
                    question,
                    options,
                    answer,
                    explain: record.explain,
                }
            }
            "whiteboard" | "behavioral" => {
                let Some(prompt) = record.prompt else {
                    return Err(ItemError::MissingPrompt { kind: tag });
                };
                if tag == "whiteboard" {
                    ItemKind::Whiteboard { prompt }
                } else {
                    ItemKind::Behavioral { prompt }
                }
            }
            _ => ItemKind::Unknown {
                raw_type: if tag.is_empty() { "other".to_owned() } else { tag },
            },
        };

        let id = match record.id {
            Some(raw) if !raw.trim().is_empty() => ItemId::new(raw),
            _ => ItemId::new(format!("{}-{position}", kind.tag())),
        };

        Ok(Self { id, kind })
    }

    #[must_use]
    pub fn id(&self) -> &ItemId {
        &self.id
    }

    #[must_use]
    pub fn kind(&self) -> &ItemKind {
        &self.kind
    }

    /// Serialize back to the wire shape.
    #[must_use]
    pub fn to_record(&self) -> ItemRecord {
        let mut record = ItemRecord {
            id: Some(self.id.as_str().to_owned()),
            kind: Some(self.kind.tag().to_owned()),
            ..ItemRecord::default()
        };
        match &self.kind {
            ItemKind::Flash { front, back } => {
                record.front = Some(front.clone());
                record.back = Some(back.clone());
            }
            ItemKind::Tradeoff {
                question,
                options,
                answer,
                explain,
            } => {
                record.question = Some(question.clone());
                record.options = Some(options.clone());
                record.answer = Some(*answer);
                record.explain = explain.clone();
            }
            ItemKind::Whiteboard { prompt } | ItemKind::Behavioral { prompt } => {
                record.prompt = Some(prompt.clone());
            }
            ItemKind::Unknown { .. } => {}
        }
        record
    }
}

//
// ─── TESTS ────────────────────────────────────────────────────────────────────
//
