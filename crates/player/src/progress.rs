/// Aggregated view of player progress, useful for UI.
///
/// `required` counts only answerable items; unrecognized item types render a
/// placeholder and are excluded from the completion requirement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerProgress {
    pub total: usize,
    pub required: usize,
    pub answered: usize,
    pub is_complete: bool,
}

impl PlayerProgress {
    /// Items still needed before the session can complete.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.required.saturating_sub(self.answered)
    }
}
