use serde::{Deserialize, Serialize};
use thiserror::Error;
use ts_rs::TS;

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum QuizError {
    #[error("Quiz session has not started")]
    SessionNotStarted,
    #[error("Quiz attempt is already completed")]
    AttemptCompleted,
    #[error("Question index {index} is out of range (quiz has {total} questions)")]
    QuestionOutOfRange { index: usize, total: usize },
    #[error("A {found} answer does not fit a {expected} question")]
    AnswerShapeMismatch { expected: String, found: String },
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },
    #[error("This timer cannot be paused")]
    PauseNotAllowed,
    #[error("Timer cannot {action} while {status}")]
    InvalidTimerState { action: String, status: String },
    #[error("Only a failed session start can be retried")]
    RetryNotAllowed,
}
