mod attempt;
mod ids;
mod item;
mod session;

pub use attempt::{Attempt, AttemptError, AttemptResponse, SelfVerdict};
pub use ids::{ItemId, ProfileCode, ProfileCodeError};
pub use item::{Item, ItemError, ItemKind, ItemRecord};
pub use session::{SessionRecord, SessionRecordError};
