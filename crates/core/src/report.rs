//! The result aggregator: reduces a finished session into summary statistics.

use chrono::{DateTime, Utc};
use std::collections::HashMap;

use crate::evaluate::evaluate;
use crate::model::{AnswerValue, Question, QuestionId};

/// How a session reached the completed phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndReason {
    /// Explicit submission on the final question.
    Submitted,
    /// The exam countdown reached zero and forced submission.
    TimeExpired,
}

/// Per-question breakdown entry, in presentation order.
#[derive(Debug, Clone, PartialEq)]
pub struct QuestionOutcome {
    pub question: Question,
    pub answer: Option<AnswerValue>,
    pub is_correct: bool,
    pub time_spent_secs: u32,
}

/// Immutable summary produced once a session completes.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionReport {
    total_questions: usize,
    correct_count: usize,
    accuracy: f64,
    total_time_secs: u32,
    passed: bool,
    end_reason: EndReason,
    started_at: DateTime<Utc>,
    completed_at: DateTime<Utc>,
    outcomes: Vec<QuestionOutcome>,
}

impl SessionReport {
    /// Runs the evaluator over every question, in question order.
    ///
    /// Callers guarantee a non-empty question list (sessions refuse to start
    /// without one), so `accuracy` is always well defined.
    #[must_use]
    pub fn aggregate(
        questions: &[Question],
        answers: &HashMap<QuestionId, AnswerValue>,
        time_spent: &HashMap<QuestionId, u32>,
        pass_mark: f64,
        end_reason: EndReason,
        started_at: DateTime<Utc>,
        completed_at: DateTime<Utc>,
    ) -> Self {
        let mut correct_count = 0;
        let mut total_time_secs = 0_u32;
        let mut outcomes = Vec::with_capacity(questions.len());

        for question in questions {
            let answer = answers.get(question.id());
            let is_correct = evaluate(question, answer);
            let spent = time_spent.get(question.id()).copied().unwrap_or(0);

            if is_correct {
                correct_count += 1;
            }
            total_time_secs = total_time_secs.saturating_add(spent);

            outcomes.push(QuestionOutcome {
                question: question.clone(),
                answer: answer.cloned(),
                is_correct,
                time_spent_secs: spent,
            });
        }

        let total_questions = questions.len();
        let accuracy = if total_questions == 0 {
            0.0
        } else {
            round_to_tenth(correct_count as f64 / total_questions as f64 * 100.0)
        };

        Self {
            total_questions,
            correct_count,
            accuracy,
            total_time_secs,
            passed: accuracy >= pass_mark,
            end_reason,
            started_at,
            completed_at,
            outcomes,
        }
    }

    #[must_use]
    pub fn total_questions(&self) -> usize {
        self.total_questions
    }

    #[must_use]
    pub fn correct_count(&self) -> usize {
        self.correct_count
    }

    /// Percentage of correct answers, rounded to one decimal place.
    #[must_use]
    pub fn accuracy(&self) -> f64 {
        self.accuracy
    }

    #[must_use]
    pub fn total_time_secs(&self) -> u32 {
        self.total_time_secs
    }

    #[must_use]
    pub fn passed(&self) -> bool {
        self.passed
    }

    #[must_use]
    pub fn end_reason(&self) -> EndReason {
        self.end_reason
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> DateTime<Utc> {
        self.completed_at
    }

    #[must_use]
    pub fn outcomes(&self) -> &[QuestionOutcome] {
        &self.outcomes
    }

    /// Average seconds spent per question, rounded to one decimal place.
    #[must_use]
    pub fn average_time_secs(&self) -> f64 {
        if self.total_questions == 0 {
            0.0
        } else {
            round_to_tenth(f64::from(self.total_time_secs) / self.total_questions as f64)
        }
    }
}

fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CorrectAnswer, Difficulty, QuestionKind};
    use crate::time::fixed_now;

    fn build_question(id: &str, correct: &str) -> Question {
        Question::new(
            QuestionId::new(id),
            "t",
            "c",
            QuestionKind::SingleChoice,
            vec!["A".into(), "B".into()],
            CorrectAnswer::single(correct),
            Difficulty::Easy,
            "cat",
        )
        .unwrap()
    }

    #[test]
    fn aggregate_counts_and_orders_outcomes() {
        let questions = vec![
            build_question("q1", "A"),
            build_question("q2", "B"),
            build_question("q3", "A"),
        ];
        let mut answers = HashMap::new();
        answers.insert(QuestionId::new("q1"), AnswerValue::choice("A"));
        answers.insert(QuestionId::new("q3"), AnswerValue::choice("B"));
        let mut time_spent = HashMap::new();
        time_spent.insert(QuestionId::new("q1"), 4);
        time_spent.insert(QuestionId::new("q2"), 7);

        let now = fixed_now();
        let report = SessionReport::aggregate(
            &questions,
            &answers,
            &time_spent,
            60.0,
            EndReason::Submitted,
            now,
            now + chrono::Duration::seconds(11),
        );

        assert_eq!(report.total_questions(), 3);
        assert_eq!(report.correct_count(), 1);
        assert_eq!(report.accuracy(), 33.3);
        assert_eq!(report.total_time_secs(), 11);
        assert!(!report.passed());

        let ids: Vec<&str> = report
            .outcomes()
            .iter()
            .map(|o| o.question.id().as_str())
            .collect();
        assert_eq!(ids, vec!["q1", "q2", "q3"]);
        // unanswered question scores incorrect with zero time
        assert!(!report.outcomes()[1].is_correct);
        assert_eq!(report.outcomes()[2].time_spent_secs, 0);
    }

    #[test]
    fn accuracy_rounds_to_one_decimal() {
        let questions = vec![
            build_question("q1", "A"),
            build_question("q2", "A"),
            build_question("q3", "A"),
        ];
        let mut answers = HashMap::new();
        answers.insert(QuestionId::new("q1"), AnswerValue::choice("A"));
        answers.insert(QuestionId::new("q2"), AnswerValue::choice("A"));

        let now = fixed_now();
        let report = SessionReport::aggregate(
            &questions,
            &answers,
            &HashMap::new(),
            60.0,
            EndReason::Submitted,
            now,
            now,
        );

        assert_eq!(report.accuracy(), 66.7);
        assert!(report.passed());
    }

    #[test]
    fn pass_mark_is_inclusive() {
        let questions = vec![build_question("q1", "A"), build_question("q2", "A")];
        let mut answers = HashMap::new();
        answers.insert(QuestionId::new("q1"), AnswerValue::choice("A"));

        let now = fixed_now();
        let report = SessionReport::aggregate(
            &questions,
            &answers,
            &HashMap::new(),
            50.0,
            EndReason::TimeExpired,
            now,
            now,
        );

        assert_eq!(report.accuracy(), 50.0);
        assert!(report.passed());
        assert_eq!(report.end_reason(), EndReason::TimeExpired);
    }

    #[test]
    fn average_time_is_rounded() {
        let questions = vec![build_question("q1", "A"), build_question("q2", "A")];
        let mut time_spent = HashMap::new();
        time_spent.insert(QuestionId::new("q1"), 3);
        time_spent.insert(QuestionId::new("q2"), 4);

        let now = fixed_now();
        let report = SessionReport::aggregate(
            &questions,
            &HashMap::new(),
            &time_spent,
            60.0,
            EndReason::Submitted,
            now,
            now,
        );

        assert_eq!(report.average_time_secs(), 3.5);
    }
}
