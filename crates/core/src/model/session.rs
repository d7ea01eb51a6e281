use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

use crate::model::{AnswerValue, Question, QuestionId};
use crate::report::{EndReason, SessionReport};

//
// ─── ERRORS ───────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("no questions available for session")]
    Empty,
    #[error("session already completed")]
    Completed,
    #[error("already at the first question")]
    AtFirstQuestion,
    #[error("already at the last question")]
    AtLastQuestion,
    #[error("{remaining} question(s) still ahead of the cursor")]
    QuestionsRemaining { remaining: usize },
}

//
// ─── MODE & PHASE ─────────────────────────────────────────────────────────────
//

/// Session flavor. Practice has no global countdown; exams auto-submit when
/// their time limit runs out and carry their own pass mark.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SessionMode {
    Practice,
    Exam { time_limit_secs: u32, pass_mark: f64 },
}

impl SessionMode {
    /// Pass mark applied by the aggregator. Practice uses the platform-wide
    /// 60% threshold; exams carry a configured one.
    #[must_use]
    pub fn pass_mark(&self) -> f64 {
        match self {
            SessionMode::Practice => 60.0,
            SessionMode::Exam { pass_mark, .. } => *pass_mark,
        }
    }

    /// Global countdown in seconds, if this mode has one.
    #[must_use]
    pub fn time_limit_secs(&self) -> Option<u32> {
        match self {
            SessionMode::Practice => None,
            SessionMode::Exam {
                time_limit_secs, ..
            } => Some(*time_limit_secs),
        }
    }
}

/// State machine position of a session run.
///
/// `Configuring` is the phase before any `QuizSession` exists; a constructed
/// session is born `Active`. The services-layer controller surfaces
/// `Configuring` while it still owns no session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Configuring,
    Active,
    Completed,
}

/// What a one-second tick did to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The session is no longer active; the tick was dropped.
    Ignored,
    /// Time was accounted and the session stays active.
    Counted,
    /// This tick exhausted the exam countdown and forced completion.
    /// Emitted exactly once per session.
    Expired,
}

//
// ─── SESSION ──────────────────────────────────────────────────────────────────
//

/// One user's run through an ordered question list.
///
/// Owns the cursor, the captured answers, and per-question elapsed time. All
/// timekeeping is driven by explicit `tick` events so the machine stays
/// synchronous and deterministic under test; `started_at` is the only
/// wall-clock anchor.
pub struct QuizSession {
    questions: Vec<Question>,
    cursor: usize,
    answers: HashMap<QuestionId, AnswerValue>,
    time_spent: HashMap<QuestionId, u32>,
    started_at: DateTime<Utc>,
    elapsed_secs: u32,
    time_remaining: Option<u32>,
    mode: SessionMode,
    phase: Phase,
    report: Option<SessionReport>,
}

impl QuizSession {
    /// Starts a session over a fixed, ordered question list.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Empty` if the list is empty. An empty supplier
    /// response is a configuration error and must never reach this point as a
    /// started session.
    pub fn start(
        questions: Vec<Question>,
        mode: SessionMode,
        started_at: DateTime<Utc>,
    ) -> Result<Self, SessionError> {
        if questions.is_empty() {
            return Err(SessionError::Empty);
        }

        Ok(Self {
            questions,
            cursor: 0,
            answers: HashMap::new(),
            time_spent: HashMap::new(),
            started_at,
            elapsed_secs: 0,
            time_remaining: mode.time_limit_secs(),
            mode,
            phase: Phase::Active,
            report: None,
        })
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn mode(&self) -> SessionMode {
        self.mode
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Seconds elapsed since the session started, counted in ticks.
    #[must_use]
    pub fn elapsed_secs(&self) -> u32 {
        self.elapsed_secs
    }

    /// Remaining seconds on the exam countdown. `None` in practice mode.
    #[must_use]
    pub fn time_remaining(&self) -> Option<u32> {
        self.time_remaining
    }

    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    #[must_use]
    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.cursor)
    }

    /// The captured answer for the question under the cursor, if any.
    /// Presentation layers use this to restore the editable value when the
    /// user navigates back.
    #[must_use]
    pub fn current_answer(&self) -> Option<&AnswerValue> {
        let question = self.current_question()?;
        self.answers.get(question.id())
    }

    #[must_use]
    pub fn answer_for(&self, id: &QuestionId) -> Option<&AnswerValue> {
        self.answers.get(id)
    }

    /// Accumulated display seconds for one question, across all visits.
    #[must_use]
    pub fn time_spent_for(&self, id: &QuestionId) -> u32 {
        self.time_spent.get(id).copied().unwrap_or(0)
    }

    /// Number of questions with a captured answer.
    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.answers.len()
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.phase == Phase::Completed
    }

    /// The finished report. Present exactly when the phase is `Completed`.
    #[must_use]
    pub fn report(&self) -> Option<&SessionReport> {
        self.report.as_ref()
    }

    /// Advances the cursor to the next question.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Completed` after the session ends and
    /// `SessionError::AtLastQuestion` when the cursor is already on the final
    /// question (completion from there goes through `submit`).
    pub fn next(&mut self) -> Result<(), SessionError> {
        self.ensure_active()?;
        if self.cursor + 1 >= self.questions.len() {
            return Err(SessionError::AtLastQuestion);
        }
        self.cursor += 1;
        Ok(())
    }

    /// Moves the cursor back to the previous question. Recorded answers and
    /// accumulated time are left untouched; re-visiting only re-opens the
    /// captured value for editing.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Completed` after the session ends and
    /// `SessionError::AtFirstQuestion` at the start of the list.
    pub fn previous(&mut self) -> Result<(), SessionError> {
        self.ensure_active()?;
        if self.cursor == 0 {
            return Err(SessionError::AtFirstQuestion);
        }
        self.cursor -= 1;
        Ok(())
    }

    /// Stores the answer for the question under the cursor, overwriting any
    /// prior value. No shape checking happens here; the evaluator resolves
    /// kind/answer pairing at scoring time.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Completed` if the session has ended.
    pub fn record_answer(&mut self, answer: AnswerValue) -> Result<(), SessionError> {
        self.ensure_active()?;
        let Some(question) = self.questions.get(self.cursor) else {
            return Err(SessionError::Completed);
        };
        self.answers.insert(question.id().clone(), answer);
        Ok(())
    }

    /// Consumes one one-second timer event.
    ///
    /// While active, the tick accumulates display time for the cursor
    /// question and, in exam mode, decrements the countdown; the tick that
    /// reaches zero forces completion and reports `TickOutcome::Expired`
    /// exactly once. Ticks after completion are ignored.
    pub fn tick(&mut self) -> TickOutcome {
        if self.phase != Phase::Active {
            return TickOutcome::Ignored;
        }

        self.elapsed_secs = self.elapsed_secs.saturating_add(1);
        if let Some(question) = self.questions.get(self.cursor) {
            *self.time_spent.entry(question.id().clone()).or_insert(0) += 1;
        }

        if let Some(remaining) = self.time_remaining.as_mut() {
            *remaining = remaining.saturating_sub(1);
            if *remaining == 0 {
                self.finish(EndReason::TimeExpired);
                return TickOutcome::Expired;
            }
        }

        TickOutcome::Counted
    }

    /// Explicit submission from the final question. Unanswered questions are
    /// scored as incorrect. Calling `submit` on an already-completed session
    /// is a no-op that returns the existing report, so a user submission
    /// racing the timeout tick cannot re-run the aggregator.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::QuestionsRemaining` when the cursor is not on
    /// the final question.
    pub fn submit(&mut self) -> Result<&SessionReport, SessionError> {
        if self.phase == Phase::Completed {
            return self.report.as_ref().ok_or(SessionError::Completed);
        }

        let remaining = self.questions.len() - self.cursor - 1;
        if remaining > 0 {
            return Err(SessionError::QuestionsRemaining { remaining });
        }

        self.finish(EndReason::Submitted);
        self.report.as_ref().ok_or(SessionError::Completed)
    }

    fn ensure_active(&self) -> Result<(), SessionError> {
        if self.phase == Phase::Completed {
            return Err(SessionError::Completed);
        }
        Ok(())
    }

    fn finish(&mut self, end_reason: EndReason) {
        let completed_at = self.started_at + Duration::seconds(i64::from(self.elapsed_secs));
        let report = SessionReport::aggregate(
            &self.questions,
            &self.answers,
            &self.time_spent,
            self.mode.pass_mark(),
            end_reason,
            self.started_at,
            completed_at,
        );
        self.report = Some(report);
        self.phase = Phase::Completed;
    }
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("questions_len", &self.questions.len())
            .field("cursor", &self.cursor)
            .field("answers_len", &self.answers.len())
            .field("phase", &self.phase)
            .field("elapsed_secs", &self.elapsed_secs)
            .field("time_remaining", &self.time_remaining)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ────────────────────────────────────────────────────────────────────
//
