#![forbid(unsafe_code)]

pub mod error;
pub mod sessions;

pub use quiz_core::Clock;

pub use error::StartError;
pub use sessions::{
    ConfigToken, FinishOutcome, QuestionView, SessionConfig, SessionController, SessionProgress,
    SessionView, SessionWorkflow, format_clock,
};
