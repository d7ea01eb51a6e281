#![forbid(unsafe_code)]

pub mod evaluate;
pub mod model;
pub mod report;
pub mod time;

pub use evaluate::evaluate;
pub use report::{EndReason, QuestionOutcome, SessionReport};
pub use time::Clock;
