//! Shared error types for the services crate.

use thiserror::Error;

use backend::SourceError;
use quiz_core::model::SessionError;

/// Configuration errors surfaced before any session exists.
///
/// All of these leave the caller in the configuring phase; the user may fix
/// the selection and try again.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StartError {
    #[error("question supplier returned no questions for this selection")]
    NoQuestions,

    #[error("the category strategy requires a category filter")]
    MissingCategory,

    #[error("the difficulty strategy requires a difficulty filter")]
    MissingDifficulty,

    #[error("question count must be at least 1")]
    InvalidCount,

    #[error("exam time limit must be at least 1 second")]
    InvalidTimeLimit,

    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Session(#[from] SessionError),
}
