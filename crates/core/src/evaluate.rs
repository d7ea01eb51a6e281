//! The answer evaluator: one pure correctness rule per question kind.

use std::collections::BTreeSet;

use crate::model::{AnswerValue, CorrectAnswer, Question};

/// Scores a candidate answer against a question.
///
/// Rules:
/// - single-valued kinds (single choice, true/false, fill-in-the-blank, case
///   analysis): exact string equality. No trimming or case folding is applied;
///   the platform's literal-match behavior is part of the contract.
/// - multiple choice: set equality, independent of order and of duplicated
///   selections. A candidate covering only part of the expected set is
///   incorrect (cardinality must match).
/// - a missing answer, or an answer whose shape does not fit the question,
///   is incorrect. This function never panics.
#[must_use]
pub fn evaluate(question: &Question, answer: Option<&AnswerValue>) -> bool {
    let Some(answer) = answer else {
        return false;
    };

    match (question.correct(), answer) {
        (CorrectAnswer::Single(expected), AnswerValue::Choice(candidate))
        | (CorrectAnswer::Single(expected), AnswerValue::Text(candidate)) => {
            expected == candidate
        }
        (CorrectAnswer::Multiple(expected), AnswerValue::Choices(candidate)) => {
            let candidate: BTreeSet<&str> = candidate.iter().map(String::as_str).collect();
            candidate.len() == expected.len()
                && candidate.iter().all(|member| expected.contains(*member))
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Difficulty, QuestionId, QuestionKind};

    fn single_choice() -> Question {
        Question::new(
            QuestionId::new("s1"),
            "t",
            "pick one",
            QuestionKind::SingleChoice,
            vec!["A".into(), "B".into(), "C".into()],
            CorrectAnswer::single("B"),
            Difficulty::Easy,
            "cat",
        )
        .unwrap()
    }

    fn multi_choice(correct: &[&str]) -> Question {
        Question::new(
            QuestionId::new("m1"),
            "t",
            "pick several",
            QuestionKind::MultipleChoice,
            vec!["A".into(), "B".into(), "C".into(), "D".into()],
            CorrectAnswer::multiple(correct.iter().copied()),
            Difficulty::Medium,
            "cat",
        )
        .unwrap()
    }

    fn fill_blank(expected: &str) -> Question {
        Question::new(
            QuestionId::new("f1"),
            "t",
            "fill in",
            QuestionKind::FillBlank,
            Vec::new(),
            CorrectAnswer::single(expected),
            Difficulty::Hard,
            "cat",
        )
        .unwrap()
    }

    #[test]
    fn single_choice_exact_match() {
        let q = single_choice();
        assert!(evaluate(&q, Some(&AnswerValue::choice("B"))));
        assert!(!evaluate(&q, Some(&AnswerValue::choice("A"))));
    }

    #[test]
    fn missing_answer_is_incorrect() {
        assert!(!evaluate(&single_choice(), None));
    }

    #[test]
    fn mismatched_shape_is_incorrect() {
        let q = single_choice();
        assert!(!evaluate(&q, Some(&AnswerValue::choices(["B"]))));

        let m = multi_choice(&["A", "B"]);
        assert!(!evaluate(&m, Some(&AnswerValue::choice("A"))));
    }

    #[test]
    fn free_text_is_literal() {
        let q = fill_blank("offside");
        assert!(evaluate(&q, Some(&AnswerValue::text("offside"))));
        // deliberately no normalization
        assert!(!evaluate(&q, Some(&AnswerValue::text("Offside"))));
        assert!(!evaluate(&q, Some(&AnswerValue::text(" offside "))));
    }

    #[test]
    fn multi_choice_is_order_independent() {
        let q = multi_choice(&["A", "B"]);
        assert!(evaluate(&q, Some(&AnswerValue::choices(["A", "B"]))));
        assert!(evaluate(&q, Some(&AnswerValue::choices(["B", "A"]))));
    }

    #[test]
    fn multi_choice_is_duplicate_independent() {
        let q = multi_choice(&["A", "B"]);
        assert!(evaluate(&q, Some(&AnswerValue::choices(["A", "A", "B"]))));
        // a duplicated single selection must not pass the cardinality check
        assert!(!evaluate(&q, Some(&AnswerValue::choices(["A", "A"]))));
    }

    #[test]
    fn multi_choice_partial_selection_is_incorrect() {
        let q = multi_choice(&["A", "B", "C"]);
        assert!(!evaluate(&q, Some(&AnswerValue::choices(["C", "A"]))));
        assert!(!evaluate(&q, Some(&AnswerValue::choices(["A", "B", "C", "D"]))));
    }

    #[test]
    fn empty_selection_is_incorrect() {
        let q = multi_choice(&["A"]);
        assert!(!evaluate(&q, Some(&AnswerValue::choices(Vec::<String>::new()))));
    }
}
