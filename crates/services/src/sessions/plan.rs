use rand::rng;
use rand::seq::SliceRandom;

use quiz_core::model::{
    Question, QuestionFilters, QuestionRequest, SelectionStrategy, SessionMode,
};

use crate::error::StartError;

/// User-chosen configuration for one session run.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    pub strategy: SelectionStrategy,
    pub filters: QuestionFilters,
    pub count: usize,
    pub mode: SessionMode,
}

impl SessionConfig {
    /// Practice run over `count` questions, no global countdown.
    #[must_use]
    pub fn practice(strategy: SelectionStrategy, count: usize) -> Self {
        Self {
            strategy,
            filters: QuestionFilters::none(),
            count,
            mode: SessionMode::Practice,
        }
    }

    /// Formal exam with a countdown and pass mark.
    #[must_use]
    pub fn exam(
        strategy: SelectionStrategy,
        count: usize,
        time_limit_secs: u32,
        pass_mark: f64,
    ) -> Self {
        Self {
            strategy,
            filters: QuestionFilters::none(),
            count,
            mode: SessionMode::Exam {
                time_limit_secs,
                pass_mark,
            },
        }
    }

    #[must_use]
    pub fn with_filters(mut self, filters: QuestionFilters) -> Self {
        self.filters = filters;
        self
    }
}

/// Validates a config into a supplier request.
///
/// # Errors
///
/// Returns the matching `StartError` when the strategy lacks its required
/// filter, the count is zero, or an exam carries no usable time limit.
pub(crate) fn build_request(config: &SessionConfig) -> Result<QuestionRequest, StartError> {
    if config.count == 0 {
        return Err(StartError::InvalidCount);
    }
    if let SessionMode::Exam {
        time_limit_secs, ..
    } = config.mode
        && time_limit_secs == 0
    {
        return Err(StartError::InvalidTimeLimit);
    }

    match config.strategy {
        SelectionStrategy::ByCategory if config.filters.category.is_none() => {
            Err(StartError::MissingCategory)
        }
        SelectionStrategy::ByDifficulty if config.filters.difficulty.is_none() => {
            Err(StartError::MissingDifficulty)
        }
        _ => Ok(QuestionRequest {
            strategy: config.strategy,
            filters: config.filters.clone(),
            count: config.count,
        }),
    }
}

/// Orders the fetched list for presentation and enforces the requested size.
///
/// `Random` shuffles client-side so suppliers can stay deterministic; every
/// other strategy keeps the supplier's order.
pub(crate) fn arrange(
    strategy: SelectionStrategy,
    mut questions: Vec<Question>,
    count: usize,
) -> Vec<Question> {
    if strategy == SelectionStrategy::Random {
        let mut r = rng();
        questions.as_mut_slice().shuffle(&mut r);
    }
    questions.truncate(count);
    questions
}
