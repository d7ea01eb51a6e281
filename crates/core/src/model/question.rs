use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;

use crate::model::ids::QuestionId;

//
// ─── ERRORS ───────────────────────────────────────────────────────────────────
//

/// Errors that can occur while constructing a question.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QuestionError {
    #[error("choice question {id} has no options")]
    MissingOptions { id: QuestionId },

    #[error("question {id} expects a single correct answer")]
    ExpectedSingleAnswer { id: QuestionId },

    #[error("multiple-choice question {id} expects a set of correct answers")]
    ExpectedMultipleAnswers { id: QuestionId },

    #[error("multiple-choice question {id} has an empty correct-answer set")]
    EmptyAnswerSet { id: QuestionId },

    #[error("correct answer {answer:?} of question {id} is not among its options")]
    AnswerNotInOptions { id: QuestionId, answer: String },
}

//
// ─── QUESTION KIND ────────────────────────────────────────────────────────────
//

/// The five answer formats the engine scores.
///
/// Serde names match the wire values used by the question backend
/// (`single_choice`, `multiple_choice`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    /// Pick exactly one of the listed options.
    SingleChoice,
    /// Pick a subset of the listed options; scored as set equality.
    MultipleChoice,
    /// Two fixed options, still compared as plain strings.
    TrueFalse,
    /// Free text compared verbatim against the expected string.
    FillBlank,
    /// Long-form free text, same literal comparison as `FillBlank`.
    CaseAnalysis,
}

impl QuestionKind {
    /// Returns true for kinds that present a list of options.
    #[must_use]
    pub fn has_options(self) -> bool {
        matches!(self, Self::SingleChoice | Self::MultipleChoice)
    }

    /// Returns true for kinds answered with free text.
    #[must_use]
    pub fn is_free_text(self) -> bool {
        matches!(self, Self::FillBlank | Self::CaseAnalysis)
    }
}

/// Difficulty label attached by the question backend. Opaque to scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

//
// ─── CORRECT ANSWER ───────────────────────────────────────────────────────────
//

/// The expected answer, shaped by the question kind.
///
/// The wire format is `string | string[]`, hence the untagged serde repr.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CorrectAnswer {
    Single(String),
    Multiple(BTreeSet<String>),
}

impl CorrectAnswer {
    #[must_use]
    pub fn single(value: impl Into<String>) -> Self {
        Self::Single(value.into())
    }

    #[must_use]
    pub fn multiple<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Multiple(values.into_iter().map(Into::into).collect())
    }
}

//
// ─── QUESTION ─────────────────────────────────────────────────────────────────
//

/// A single quiz item. Immutable once fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    id: QuestionId,
    title: String,
    content: String,
    kind: QuestionKind,
    options: Vec<String>,
    correct: CorrectAnswer,
    difficulty: Difficulty,
    category: String,
}

impl Question {
    /// Creates a validated question.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::MissingOptions` if a choice kind has no options,
    /// `QuestionError::ExpectedSingleAnswer` / `ExpectedMultipleAnswers` if the
    /// correct-answer shape does not fit the kind, and
    /// `QuestionError::AnswerNotInOptions` if a multiple-choice answer names an
    /// option that is not offered.
    pub fn new(
        id: QuestionId,
        title: impl Into<String>,
        content: impl Into<String>,
        kind: QuestionKind,
        options: Vec<String>,
        correct: CorrectAnswer,
        difficulty: Difficulty,
        category: impl Into<String>,
    ) -> Result<Self, QuestionError> {
        if kind.has_options() && options.is_empty() {
            return Err(QuestionError::MissingOptions { id });
        }

        match (kind, &correct) {
            (QuestionKind::MultipleChoice, CorrectAnswer::Multiple(set)) => {
                if set.is_empty() {
                    return Err(QuestionError::EmptyAnswerSet { id });
                }
                for member in set {
                    if !options.iter().any(|option| option == member) {
                        return Err(QuestionError::AnswerNotInOptions {
                            id,
                            answer: member.clone(),
                        });
                    }
                }
            }
            (QuestionKind::MultipleChoice, CorrectAnswer::Single(_)) => {
                return Err(QuestionError::ExpectedMultipleAnswers { id });
            }
            (_, CorrectAnswer::Multiple(_)) => {
                return Err(QuestionError::ExpectedSingleAnswer { id });
            }
            (_, CorrectAnswer::Single(_)) => {}
        }

        Ok(Self {
            id,
            title: title.into(),
            content: content.into(),
            kind,
            options,
            correct,
            difficulty,
            category: category.into(),
        })
    }

    #[must_use]
    pub fn id(&self) -> &QuestionId {
        &self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    #[must_use]
    pub fn kind(&self) -> QuestionKind {
        self.kind
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn correct(&self) -> &CorrectAnswer {
        &self.correct
    }

    #[must_use]
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    #[must_use]
    pub fn category(&self) -> &str {
        &self.category
    }
}

//
// ─── TESTS ────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn id(raw: &str) -> QuestionId {
        QuestionId::new(raw)
    }

    #[test]
    fn single_choice_question_builds() {
        let question = Question::new(
            id("q1"),
            "Rules",
            "Which flag ends the race?",
            QuestionKind::SingleChoice,
            vec!["Red".into(), "Checkered".into()],
            CorrectAnswer::single("Checkered"),
            Difficulty::Easy,
            "racing",
        )
        .unwrap();

        assert_eq!(question.kind(), QuestionKind::SingleChoice);
        assert_eq!(question.options().len(), 2);
    }

    #[test]
    fn choice_question_requires_options() {
        let err = Question::new(
            id("q1"),
            "t",
            "c",
            QuestionKind::SingleChoice,
            Vec::new(),
            CorrectAnswer::single("A"),
            Difficulty::Easy,
            "cat",
        )
        .unwrap_err();

        assert!(matches!(err, QuestionError::MissingOptions { .. }));
    }

    #[test]
    fn multiple_choice_answers_must_be_offered() {
        let err = Question::new(
            id("q2"),
            "t",
            "c",
            QuestionKind::MultipleChoice,
            vec!["A".into(), "B".into()],
            CorrectAnswer::multiple(["A", "Z"]),
            Difficulty::Medium,
            "cat",
        )
        .unwrap_err();

        assert!(matches!(err, QuestionError::AnswerNotInOptions { answer, .. } if answer == "Z"));
    }

    #[test]
    fn multiple_choice_rejects_single_answer_shape() {
        let err = Question::new(
            id("q3"),
            "t",
            "c",
            QuestionKind::MultipleChoice,
            vec!["A".into()],
            CorrectAnswer::single("A"),
            Difficulty::Hard,
            "cat",
        )
        .unwrap_err();

        assert!(matches!(err, QuestionError::ExpectedMultipleAnswers { .. }));
    }

    #[test]
    fn fill_blank_rejects_answer_set() {
        let err = Question::new(
            id("q4"),
            "t",
            "c",
            QuestionKind::FillBlank,
            Vec::new(),
            CorrectAnswer::multiple(["A"]),
            Difficulty::Easy,
            "cat",
        )
        .unwrap_err();

        assert!(matches!(err, QuestionError::ExpectedSingleAnswer { .. }));
    }

    #[test]
    fn kind_serde_uses_wire_names() {
        let json = serde_json::to_string(&QuestionKind::MultipleChoice).unwrap();
        assert_eq!(json, "\"multiple_choice\"");
        let kind: QuestionKind = serde_json::from_str("\"true_false\"").unwrap();
        assert_eq!(kind, QuestionKind::TrueFalse);
    }
}
