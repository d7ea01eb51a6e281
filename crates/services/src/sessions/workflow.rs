use std::sync::Arc;

use backend::{QuestionSource, ReportRecord, ResultSink};
use quiz_core::Clock;
use quiz_core::model::{QuizSession, SessionError};
use quiz_core::report::SessionReport;

use super::plan::{self, SessionConfig};
use crate::error::StartError;

/// Outcome of finishing a session: the report always exists in memory; the
/// saved flag tells the caller whether the persistence echo succeeded.
#[derive(Debug, Clone, PartialEq)]
pub struct FinishOutcome {
    pub report: SessionReport,
    pub report_saved: bool,
}

/// Orchestrates session start (supplier fetch) and completion (result
/// submission) around the synchronous state machine.
#[derive(Clone)]
pub struct SessionWorkflow {
    clock: Clock,
    questions: Arc<dyn QuestionSource>,
    results: Arc<dyn ResultSink>,
}

impl SessionWorkflow {
    #[must_use]
    pub fn new(
        clock: Clock,
        questions: Arc<dyn QuestionSource>,
        results: Arc<dyn ResultSink>,
    ) -> Self {
        Self {
            clock,
            questions,
            results,
        }
    }

    /// Fetches questions for the config and starts a session over them.
    ///
    /// # Errors
    ///
    /// Returns `StartError::NoQuestions` when the supplier has nothing
    /// matching the selection, the filter-validation errors for incomplete
    /// configs, and `StartError::Source` on supplier transport failures.
    /// Transport failures are surfaced, never papered over with sample data.
    pub async fn start(&self, config: &SessionConfig) -> Result<QuizSession, StartError> {
        let request = plan::build_request(config)?;
        let fetched = self.questions.fetch_questions(&request).await?;
        let questions = plan::arrange(config.strategy, fetched, config.count);
        if questions.is_empty() {
            return Err(StartError::NoQuestions);
        }

        Ok(QuizSession::start(questions, config.mode, self.clock.now())?)
    }

    /// Completes the session (submitting it if still active) and posts the
    /// report to the result sink.
    ///
    /// Sink failures are logged and reported through `report_saved`; the
    /// in-memory report is returned either way.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::QuestionsRemaining` when an explicit submit is
    /// attempted before the final question.
    pub async fn finish(&self, session: &mut QuizSession) -> Result<FinishOutcome, SessionError> {
        let report = if session.is_complete() {
            session.report().cloned().ok_or(SessionError::Completed)?
        } else {
            session.submit()?.clone()
        };

        let record = ReportRecord::from_report(&report);
        let report_saved = match self.results.submit_report(&record).await {
            Ok(()) => true,
            Err(err) => {
                log::warn!("result submission failed, keeping local report: {err}");
                false
            }
        };

        Ok(FinishOutcome {
            report,
            report_saved,
        })
    }
}
