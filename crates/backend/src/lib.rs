#![forbid(unsafe_code)]

pub mod repository;
pub mod rest;

pub use repository::{
    InMemoryQuestionBank, OutcomeRecord, QuestionRecord, QuestionSource, RecordingResultSink,
    ReportRecord, ResultSink, SourceError,
};
pub use rest::RestBackend;
