use serde::{Deserialize, Serialize};

use crate::model::question::Difficulty;

/// How the question supplier picks items for a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionStrategy {
    /// Draw from the whole bank, order randomized.
    Random,
    /// Restrict to one category; requires `QuestionFilters::category`.
    ByCategory,
    /// Restrict to one difficulty; requires `QuestionFilters::difficulty`.
    ByDifficulty,
    /// Re-serve questions the user previously answered incorrectly.
    WrongRetry,
    /// Serve the user's favorited questions.
    Favorites,
    /// Serve the bank in stored order.
    Sequential,
}

/// Optional narrowing applied by the supplier before selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionFilters {
    pub category: Option<String>,
    pub difficulty: Option<Difficulty>,
}

impl QuestionFilters {
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn category(name: impl Into<String>) -> Self {
        Self {
            category: Some(name.into()),
            difficulty: None,
        }
    }

    #[must_use]
    pub fn difficulty(level: Difficulty) -> Self {
        Self {
            category: None,
            difficulty: Some(level),
        }
    }
}

/// A validated request to the question supplier.
///
/// The supplier may return fewer than `count` questions; a short list is a
/// valid response, an empty one is a configuration error surfaced by the
/// caller before any session exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionRequest {
    pub strategy: SelectionStrategy,
    pub filters: QuestionFilters,
    pub count: usize,
}
