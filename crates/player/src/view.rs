use reps_core::model::{Attempt, AttemptResponse, Item, ItemKind, SelfVerdict};

/// Presentation flavor for free-text prompts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteStyle {
    Whiteboard,
    Behavioral,
}

/// Renderer-facing view model for one item.
///
/// Built from the item plus its stored attempt (if any), so re-rendering an
/// answered item always restores the saved response with editing locked.
/// This is the "what" of the rendering contract; markup is someone else's
/// concern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemView {
    Flash {
        front: String,
        back: String,
        verdict: Option<SelfVerdict>,
        locked: bool,
    },
    Tradeoff {
        question: String,
        options: Vec<String>,
        selected: Option<usize>,
        /// Revealed only after submission so both the chosen and the correct
        /// option can be distinguished.
        answer: Option<usize>,
        explain: Option<String>,
        locked: bool,
    },
    FreeText {
        style: NoteStyle,
        prompt: String,
        note: Option<String>,
        locked: bool,
    },
    /// Fallback notice naming the unknown type.
    Unknown { raw_type: String },
}

impl ItemView {
    /// Build the view model for an item and its recorded attempt.
    #[must_use]
    pub fn for_item(item: &Item, attempt: Option<&Attempt>) -> Self {
        let locked = attempt.is_some();
        let response = attempt.map(Attempt::response);

        match item.kind() {
            ItemKind::Flash { front, back } => ItemView::Flash {
                front: front.clone(),
                back: back.clone(),
                verdict: match response {
                    Some(AttemptResponse::Verdict(v)) => Some(*v),
                    _ => None,
                },
                locked,
            },
            ItemKind::Tradeoff {
                question,
                options,
                answer,
                explain,
            } => ItemView::Tradeoff {
                question: question.clone(),
                options: options.clone(),
                selected: match response {
                    Some(AttemptResponse::Choice(i)) => Some(*i),
                    _ => None,
                },
                answer: locked.then_some(*answer),
                explain: explain.clone(),
                locked,
            },
            ItemKind::Whiteboard { prompt } | ItemKind::Behavioral { prompt } => {
                ItemView::FreeText {
                    style: if matches!(item.kind(), ItemKind::Whiteboard { .. }) {
                        NoteStyle::Whiteboard
                    } else {
                        NoteStyle::Behavioral
                    },
                    prompt: prompt.clone(),
                    note: match response {
                        Some(AttemptResponse::Note(text)) => Some(text.clone()),
                        _ => None,
                    },
                    locked,
                }
            }
            ItemKind::Unknown { raw_type } => ItemView::Unknown {
                raw_type: raw_type.clone(),
            },
        }
    }

    /// Whether further edits are disabled for this item.
    #[must_use]
    pub fn locked(&self) -> bool {
        match self {
            ItemView::Flash { locked, .. }
            | ItemView::Tradeoff { locked, .. }
            | ItemView::FreeText { locked, .. } => *locked,
            ItemView::Unknown { .. } => true,
        }
    }
}
