#![forbid(unsafe_code)]

pub mod error;
pub mod profile;
pub mod progress;
pub mod report;
pub mod session;
pub mod view;
pub mod workflow;

pub use reps_core::Clock;

pub use error::{PlayerError, SinkError};
pub use profile::{PROFILE_CODE_PREFIX, generate_profile_code};
pub use progress::PlayerProgress;
pub use report::{AttemptSink, CompletePayload, HttpAttemptSink, SubmitPayload};
pub use session::{PlayerSession, PlayerState};
pub use view::{ItemView, NoteStyle};
pub use workflow::{AttemptOutcome, PlayerLoop};
