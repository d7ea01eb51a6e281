use quiz_core::model::{AnswerValue, Phase, QuestionKind, QuizSession};

use super::controller::SessionController;
use super::progress::SessionProgress;

/// Formats a second count as `MM:SS` for countdown and elapsed displays.
#[must_use]
pub fn format_clock(total_secs: u32) -> String {
    format!("{:02}:{:02}", total_secs / 60, total_secs % 60)
}

/// What the presentation layer may see of the current question.
///
/// Deliberately excludes the correct answer so a view snapshot can never
/// leak it mid-session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionView {
    pub id: String,
    /// 1-based position for "question N of M" headers.
    pub number: usize,
    pub title: String,
    pub content: String,
    pub kind: QuestionKind,
    pub options: Vec<String>,
    pub category: String,
}

/// Presentation snapshot of one session run.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionView {
    pub phase: Phase,
    pub cursor: usize,
    pub total: usize,
    pub question: Option<QuestionView>,
    pub current_answer: Option<AnswerValue>,
    /// Formatted countdown, present only in exam mode.
    pub time_remaining: Option<String>,
    pub elapsed: String,
    pub progress: Option<SessionProgress>,
}

impl SessionView {
    /// Snapshot of the controller's current state, covering the configuring
    /// phase as well.
    #[must_use]
    pub fn snapshot(controller: &SessionController) -> Self {
        match controller.session() {
            Some(session) => Self::from_session(session),
            None => Self {
                phase: Phase::Configuring,
                cursor: 0,
                total: 0,
                question: None,
                current_answer: None,
                time_remaining: None,
                elapsed: format_clock(0),
                progress: None,
            },
        }
    }

    #[must_use]
    pub fn from_session(session: &QuizSession) -> Self {
        let question = session.current_question().map(|question| QuestionView {
            id: question.id().as_str().to_owned(),
            number: session.cursor() + 1,
            title: question.title().to_owned(),
            content: question.content().to_owned(),
            kind: question.kind(),
            options: question.options().to_vec(),
            category: question.category().to_owned(),
        });

        Self {
            phase: session.phase(),
            cursor: session.cursor(),
            total: session.total_questions(),
            question,
            current_answer: session.current_answer().cloned(),
            time_remaining: session.time_remaining().map(format_clock),
            elapsed: format_clock(session.elapsed_secs()),
            progress: Some(SessionProgress::from_session(session)),
        }
    }
}
