mod answer;
mod ids;
mod question;
mod selection;
mod session;

pub use answer::AnswerValue;
pub use ids::QuestionId;
pub use question::{CorrectAnswer, Difficulty, Question, QuestionError, QuestionKind};
pub use selection::{QuestionFilters, QuestionRequest, SelectionStrategy};
pub use session::{Phase, QuizSession, SessionError, SessionMode, TickOutcome};
