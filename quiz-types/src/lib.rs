pub mod answer;
pub mod errors;
pub mod messages;
pub mod quiz;
pub mod result;

pub type QuizId = String;
pub type QuestionId = String;
pub type AnswerId = String;
pub type SessionId = String;

// Re-export all types
pub use answer::*;
pub use errors::*;
pub use messages::*;
pub use quiz::*;
pub use result::*;
