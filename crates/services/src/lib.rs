#![forbid(unsafe_code)]

pub mod error;
pub mod plan;
pub mod recorder;

pub use reps_core::Clock;

pub use error::RecorderError;
pub use plan::{PlanBuilder, SeedCatalog};
pub use recorder::{AttemptEvent, RecorderService, SavedSession, SessionReport};
