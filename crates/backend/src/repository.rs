use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use thiserror::Error;

use quiz_core::model::{
    AnswerValue, CorrectAnswer, Difficulty, Question, QuestionError, QuestionId, QuestionKind,
    QuestionRequest, SelectionStrategy,
};
use quiz_core::report::SessionReport;

/// Errors surfaced by question suppliers and result sinks.
///
/// A short or empty question list is NOT an error; suppliers only fail on
/// transport or payload problems.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SourceError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("backend responded with status {0}")]
    Status(u16),

    #[error("malformed payload: {0}")]
    Decode(String),
}

impl From<QuestionError> for SourceError {
    fn from(err: QuestionError) -> Self {
        SourceError::Decode(err.to_string())
    }
}

//
// ─── WIRE RECORDS ─────────────────────────────────────────────────────────────
//

/// Wire shape for a question, as served by the platform REST API.
///
/// This mirrors the domain `Question` so adapters can deserialize and then
/// validate, without leaking transport concerns into the domain layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionRecord {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub title: String,
    pub content: String,
    #[serde(rename = "type")]
    pub kind: QuestionKind,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(rename = "correctAnswer")]
    pub correct_answer: CorrectAnswer,
    pub difficulty: Difficulty,
    pub category: String,
}

impl QuestionRecord {
    #[must_use]
    pub fn from_question(question: &Question) -> Self {
        Self {
            id: question.id().as_str().to_owned(),
            title: question.title().to_owned(),
            content: question.content().to_owned(),
            kind: question.kind(),
            options: question.options().to_vec(),
            correct_answer: question.correct().clone(),
            difficulty: question.difficulty(),
            category: question.category().to_owned(),
        }
    }

    /// Convert the record into a validated domain `Question`.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` when the payload violates the domain invariants
    /// (answer shape not matching the kind, choice answers not offered, ...).
    pub fn into_question(self) -> Result<Question, QuestionError> {
        Question::new(
            QuestionId::new(self.id),
            self.title,
            self.content,
            self.kind,
            self.options,
            self.correct_answer,
            self.difficulty,
            self.category,
        )
    }
}

/// Per-question entry of a submitted session result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutcomeRecord {
    pub question_id: String,
    pub user_answer: Option<AnswerValue>,
    pub is_correct: bool,
    pub time_spent: u32,
}

/// Wire shape for a finished session, posted to the persistence collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRecord {
    pub total_questions: usize,
    pub correct_count: usize,
    pub accuracy: f64,
    pub total_time: u32,
    pub passed: bool,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
    pub results: Vec<OutcomeRecord>,
}

impl ReportRecord {
    #[must_use]
    pub fn from_report(report: &SessionReport) -> Self {
        Self {
            total_questions: report.total_questions(),
            correct_count: report.correct_count(),
            accuracy: report.accuracy(),
            total_time: report.total_time_secs(),
            passed: report.passed(),
            started_at: report.started_at(),
            completed_at: report.completed_at(),
            results: report
                .outcomes()
                .iter()
                .map(|outcome| OutcomeRecord {
                    question_id: outcome.question.id().as_str().to_owned(),
                    user_answer: outcome.answer.clone(),
                    is_correct: outcome.is_correct,
                    time_spent: outcome.time_spent_secs,
                })
                .collect(),
        }
    }
}

//
// ─── PORTS ────────────────────────────────────────────────────────────────────
//

/// Question supplier contract.
///
/// Implementations may return fewer questions than requested; an empty list
/// is a valid response that callers must treat as a configuration error, not
/// a crash.
#[async_trait]
pub trait QuestionSource: Send + Sync {
    /// Fetch questions for the given selection request.
    ///
    /// # Errors
    ///
    /// Returns `SourceError` on transport or payload failures only.
    async fn fetch_questions(&self, request: &QuestionRequest)
    -> Result<Vec<Question>, SourceError>;
}

/// Persistence collaborator for finished sessions. Fire-and-forget from the
/// engine's perspective: a failed submission never alters the in-memory
/// report.
#[async_trait]
pub trait ResultSink: Send + Sync {
    /// Submit a finished session summary.
    ///
    /// # Errors
    ///
    /// Returns `SourceError` when the collaborator cannot be reached or
    /// rejects the payload.
    async fn submit_report(&self, report: &ReportRecord) -> Result<(), SourceError>;
}

//
// ─── IN-MEMORY BANK ───────────────────────────────────────────────────────────
//

/// In-memory question bank honoring all six selection strategies.
///
/// Used as the offline/demo bank and as the test double for the REST
/// supplier. `Random` is served in stored order here; shuffling is the
/// planner's job so the bank stays deterministic.
#[derive(Clone, Default)]
pub struct InMemoryQuestionBank {
    questions: Arc<Mutex<Vec<Question>>>,
    wrong_ids: Arc<Mutex<HashSet<QuestionId>>>,
    favorite_ids: Arc<Mutex<HashSet<QuestionId>>>,
}

impl InMemoryQuestionBank {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_questions(questions: Vec<Question>) -> Self {
        let bank = Self::new();
        bank.extend(questions);
        bank
    }

    pub fn extend(&self, questions: impl IntoIterator<Item = Question>) {
        if let Ok(mut guard) = self.questions.lock() {
            guard.extend(questions);
        }
    }

    /// Marks a question as previously answered wrong, making it eligible for
    /// the `WrongRetry` strategy.
    pub fn mark_wrong(&self, id: QuestionId) {
        if let Ok(mut guard) = self.wrong_ids.lock() {
            guard.insert(id);
        }
    }

    /// Adds a question to the favorites set.
    pub fn mark_favorite(&self, id: QuestionId) {
        if let Ok(mut guard) = self.favorite_ids.lock() {
            guard.insert(id);
        }
    }

    fn locked_ids(set: &Arc<Mutex<HashSet<QuestionId>>>) -> Result<HashSet<QuestionId>, SourceError> {
        set.lock()
            .map(|guard| guard.clone())
            .map_err(|e| SourceError::Transport(e.to_string()))
    }
}

#[async_trait]
impl QuestionSource for InMemoryQuestionBank {
    async fn fetch_questions(
        &self,
        request: &QuestionRequest,
    ) -> Result<Vec<Question>, SourceError> {
        let pool: Vec<Question> = self
            .questions
            .lock()
            .map_err(|e| SourceError::Transport(e.to_string()))?
            .clone();

        let keep_ids = match request.strategy {
            SelectionStrategy::WrongRetry => Some(Self::locked_ids(&self.wrong_ids)?),
            SelectionStrategy::Favorites => Some(Self::locked_ids(&self.favorite_ids)?),
            _ => None,
        };

        let filters = &request.filters;
        let selected = pool
            .into_iter()
            .filter(|question| {
                if let Some(ids) = &keep_ids {
                    if !ids.contains(question.id()) {
                        return false;
                    }
                }
                if let Some(category) = &filters.category {
                    if question.category() != category {
                        return false;
                    }
                }
                if let Some(difficulty) = filters.difficulty {
                    if question.difficulty() != difficulty {
                        return false;
                    }
                }
                true
            })
            .take(request.count)
            .collect();

        Ok(selected)
    }
}

//
// ─── RECORDING SINK ───────────────────────────────────────────────────────────
//

/// Result sink that captures submissions in memory. Can be switched into a
/// failing mode to exercise the fire-and-forget path.
#[derive(Clone, Default)]
pub struct RecordingResultSink {
    records: Arc<Mutex<Vec<ReportRecord>>>,
    failing: Arc<AtomicBool>,
}

impl RecordingResultSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent submission fail with a transport error.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Reports submitted so far.
    #[must_use]
    pub fn submitted(&self) -> Vec<ReportRecord> {
        self.records.lock().map(|g| g.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl ResultSink for RecordingResultSink {
    async fn submit_report(&self, report: &ReportRecord) -> Result<(), SourceError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(SourceError::Transport("sink unavailable".into()));
        }
        let mut guard = self
            .records
            .lock()
            .map_err(|e| SourceError::Transport(e.to_string()))?;
        guard.push(report.clone());
        Ok(())
    }
}

//
// ─── TESTS ────────────────────────────────────────────────────────────────────
//
