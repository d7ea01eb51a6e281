mod controller;
mod plan;
mod progress;
mod view;
mod workflow;

// Public API of the session subsystem.
pub use crate::error::StartError;
pub use controller::{ConfigToken, SessionController};
pub use plan::SessionConfig;
pub use progress::SessionProgress;
pub use view::{QuestionView, SessionView, format_clock};
pub use workflow::{FinishOutcome, SessionWorkflow};
