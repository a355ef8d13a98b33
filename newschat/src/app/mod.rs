//! Application controller: send orchestration and the view event surface.

mod events;
mod loading;
mod orchestrator;

pub use events::{AppEvent, AppSnapshot, SendOutcome, ViewEvent};
pub use loading::{LoadingTracker, PendingGuard};
pub use orchestrator::ChatApp;
