use std::sync::Arc;

use backend::{InMemoryQuestionBank, RecordingResultSink};
use quiz_core::model::{
    AnswerValue, CorrectAnswer, Difficulty, Question, QuestionFilters, QuestionId, QuestionKind,
    SelectionStrategy, TickOutcome,
};
use quiz_core::time::fixed_now;
use services::{Clock, SessionConfig, SessionWorkflow, StartError};

fn build_question(id: &str, category: &str) -> Question {
    Question::new(
        QuestionId::new(id),
        format!("Question {id}"),
        "Pick the right option",
        QuestionKind::SingleChoice,
        vec!["A".into(), "B".into()],
        CorrectAnswer::single("A"),
        Difficulty::Medium,
        category,
    )
    .unwrap()
}

fn workflow_over(bank: InMemoryQuestionBank, sink: RecordingResultSink) -> SessionWorkflow {
    SessionWorkflow::new(Clock::fixed(fixed_now()), Arc::new(bank), Arc::new(sink))
}

#[tokio::test]
async fn practice_flow_submits_report() {
    let bank = InMemoryQuestionBank::with_questions(vec![
        build_question("q1", "football"),
        build_question("q2", "football"),
        build_question("q3", "football"),
    ]);
    let sink = RecordingResultSink::new();
    let workflow = workflow_over(bank, sink.clone());

    let config = SessionConfig::practice(SelectionStrategy::Sequential, 3);
    let mut session = workflow.start(&config).await.unwrap();

    session.record_answer(AnswerValue::choice("A")).unwrap();
    session.tick();
    session.next().unwrap();
    session.record_answer(AnswerValue::choice("A")).unwrap();
    session.tick();
    session.next().unwrap();
    session.record_answer(AnswerValue::choice("A")).unwrap();
    session.tick();

    let outcome = workflow.finish(&mut session).await.unwrap();
    assert!(outcome.report_saved);
    assert_eq!(outcome.report.correct_count(), 3);
    assert_eq!(outcome.report.accuracy(), 100.0);
    assert!(outcome.report.passed());

    let submitted = sink.submitted();
    assert_eq!(submitted.len(), 1);
    assert_eq!(submitted[0].total_questions, 3);
    assert_eq!(submitted[0].total_time, 3);
}

#[tokio::test]
async fn exam_timeout_completes_and_persists() {
    let bank = InMemoryQuestionBank::with_questions(vec![build_question("q1", "rules")]);
    let sink = RecordingResultSink::new();
    let workflow = workflow_over(bank, sink.clone());

    let config = SessionConfig::exam(SelectionStrategy::Sequential, 1, 60, 60.0);
    let mut session = workflow.start(&config).await.unwrap();

    let mut outcomes = Vec::new();
    for _ in 0..61 {
        outcomes.push(session.tick());
    }
    assert_eq!(
        outcomes.iter().filter(|o| **o == TickOutcome::Expired).count(),
        1
    );
    assert!(session.is_complete());

    let outcome = workflow.finish(&mut session).await.unwrap();
    assert_eq!(outcome.report.correct_count(), 0);
    assert_eq!(outcome.report.accuracy(), 0.0);
    assert!(!outcome.report.passed());
    assert_eq!(sink.submitted().len(), 1);
}

#[tokio::test]
async fn empty_selection_is_a_configuration_error() {
    let bank = InMemoryQuestionBank::new();
    let workflow = workflow_over(bank, RecordingResultSink::new());

    let config = SessionConfig::practice(SelectionStrategy::Sequential, 5);
    let err = workflow.start(&config).await.unwrap_err();
    assert!(matches!(err, StartError::NoQuestions));
}

#[tokio::test]
async fn incomplete_filters_fail_before_fetch() {
    let bank = InMemoryQuestionBank::with_questions(vec![build_question("q1", "football")]);
    let workflow = workflow_over(bank, RecordingResultSink::new());

    let config = SessionConfig::practice(SelectionStrategy::ByCategory, 5);
    let err = workflow.start(&config).await.unwrap_err();
    assert!(matches!(err, StartError::MissingCategory));
}

#[tokio::test]
async fn category_filter_reaches_the_supplier() {
    let bank = InMemoryQuestionBank::with_questions(vec![
        build_question("q1", "football"),
        build_question("q2", "swimming"),
    ]);
    let workflow = workflow_over(bank, RecordingResultSink::new());

    let config = SessionConfig::practice(SelectionStrategy::ByCategory, 5)
        .with_filters(QuestionFilters::category("swimming"));
    let session = workflow.start(&config).await.unwrap();

    assert_eq!(session.total_questions(), 1);
    assert_eq!(
        session.current_question().unwrap().id(),
        &QuestionId::new("q2")
    );
}

#[tokio::test]
async fn sink_failure_keeps_the_local_report() {
    let bank = InMemoryQuestionBank::with_questions(vec![build_question("q1", "rules")]);
    let sink = RecordingResultSink::new();
    sink.set_failing(true);
    let workflow = workflow_over(bank, sink.clone());

    let config = SessionConfig::practice(SelectionStrategy::Sequential, 1);
    let mut session = workflow.start(&config).await.unwrap();
    session.record_answer(AnswerValue::choice("A")).unwrap();

    let outcome = workflow.finish(&mut session).await.unwrap();
    assert!(!outcome.report_saved);
    assert_eq!(outcome.report.correct_count(), 1);
    assert!(sink.submitted().is_empty());
}
