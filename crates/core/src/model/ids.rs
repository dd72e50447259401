use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Stable identifier for a study item.
///
/// Items arrive with string ids from the seed content; items without one
/// are assigned a deterministic synthetic id during intake.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ItemId({})", self.0)
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ItemId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

/// Error type for parsing a profile code from raw input.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ProfileCodeError {
    #[error("profile code must not be blank")]
    Blank,
}

/// Anonymous identity held by the client and used to group sessions.
///
/// Codes are normalized on intake: surrounding whitespace is trimmed and
/// letters are uppercased, so `" abc1 "` and `"ABC1"` name the same profile.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProfileCode(String);

impl ProfileCode {
    /// Normalize and validate a raw profile code.
    ///
    /// # Errors
    ///
    /// Returns `ProfileCodeError::Blank` if the code is empty after trimming.
    pub fn parse(raw: &str) -> Result<Self, ProfileCodeError> {
        let normalized = raw.trim().to_uppercase();
        if normalized.is_empty() {
            return Err(ProfileCodeError::Blank);
        }
        Ok(Self(normalized))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProfileCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
