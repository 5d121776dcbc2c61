use quiz_types::{
    AnswerMap, AnswerValue, CompleteSessionResponse, Quiz, QuizError, QuizResult, SessionId,
};
use std::sync::Arc;

use crate::ScoringEngine;

#[derive(Debug, Clone, PartialEq)]
pub enum AttemptPhase {
    /// Waiting for the backend to open a session
    Initializing,
    /// Session start failed; only a retry leaves this phase
    Failed { message: String },
    InProgress { session_id: SessionId },
    /// Local result computed, backend completion call outstanding
    Completing {
        session_id: SessionId,
        local_result: QuizResult,
    },
    Completed { result: QuizResult },
}

#[derive(Debug, Clone)]
pub enum AttemptAction {
    SessionStarted(SessionId),
    SessionFailed(String),
    Retry,
    Answer { index: usize, value: AnswerValue },
    Advance,
    Retreat,
    GoTo(usize),
    /// User finished early or the timer ran out
    Complete,
    /// Outcome of the completion call; `None` when it failed
    RemoteResult(Option<CompleteSessionResponse>),
}

/// Side effects the driver must perform after a transition.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    StartSession,
    SubmitAnswer {
        session_id: SessionId,
        index: usize,
        value: AnswerValue,
    },
    CompleteSession { session_id: SessionId },
}

#[derive(Debug, Clone)]
pub struct Transition {
    pub state: AttemptState,
    pub effect: Option<Effect>,
}

/// Everything one quiz attempt knows. Transitions produce a new value and never
/// mutate the old one.
#[derive(Debug, Clone)]
pub struct AttemptState {
    pub quiz: Arc<Quiz>,
    pub phase: AttemptPhase,
    pub cursor: usize,
    pub answers: AnswerMap,
}

impl AttemptState {
    pub fn new(quiz: Arc<Quiz>) -> Self {
        Self {
            quiz,
            phase: AttemptPhase::Initializing,
            cursor: 0,
            answers: AnswerMap::new(),
        }
    }

    pub fn total_questions(&self) -> usize {
        self.quiz.questions.len()
    }

    pub fn session_id(&self) -> Option<&SessionId> {
        match &self.phase {
            AttemptPhase::InProgress { session_id }
            | AttemptPhase::Completing { session_id, .. } => Some(session_id),
            _ => None,
        }
    }

    pub fn is_last_question(&self) -> bool {
        self.cursor + 1 >= self.total_questions()
    }

    pub fn answered_count(&self) -> usize {
        self.answers.values().filter(|a| !a.is_empty()).count()
    }

    pub fn is_completed(&self) -> bool {
        matches!(self.phase, AttemptPhase::Completed { .. })
    }

    pub fn result(&self) -> Option<&QuizResult> {
        match &self.phase {
            AttemptPhase::Completed { result } => Some(result),
            _ => None,
        }
    }

    pub fn reduce(&self, action: AttemptAction) -> Result<Transition, QuizError> {
        let mut next = self.clone();

        let effect = match action {
            AttemptAction::SessionStarted(session_id) => {
                self.require_initializing()?;
                next.phase = AttemptPhase::InProgress { session_id };
                next.cursor = 0;
                None
            }
            AttemptAction::SessionFailed(message) => {
                self.require_initializing()?;
                next.phase = AttemptPhase::Failed { message };
                None
            }
            AttemptAction::Retry => {
                if !matches!(self.phase, AttemptPhase::Failed { .. }) {
                    return Err(QuizError::RetryNotAllowed);
                }
                next.phase = AttemptPhase::Initializing;
                Some(Effect::StartSession)
            }
            AttemptAction::Answer { index, value } => {
                let session_id = self.require_in_progress()?.clone();
                let question = self.question(index)?;
                if !value.fits(&question.kind) {
                    return Err(QuizError::AnswerShapeMismatch {
                        expected: question.kind.type_name().to_string(),
                        found: value.shape_name().to_string(),
                    });
                }
                next.answers.insert(index, value.clone());
                Some(Effect::SubmitAnswer {
                    session_id,
                    index,
                    value,
                })
            }
            AttemptAction::Advance => {
                self.require_in_progress()?;
                if self.is_last_question() {
                    return self.reduce(AttemptAction::Complete);
                }
                next.cursor += 1;
                None
            }
            AttemptAction::Retreat => {
                self.require_in_progress()?;
                next.cursor = self.cursor.saturating_sub(1);
                None
            }
            AttemptAction::GoTo(index) => {
                self.require_in_progress()?;
                self.question(index)?;
                next.cursor = index;
                None
            }
            AttemptAction::Complete => {
                let session_id = self.require_in_progress()?.clone();
                let local_result = ScoringEngine::score(&self.quiz.questions, &self.answers);
                next.phase = AttemptPhase::Completing {
                    session_id: session_id.clone(),
                    local_result,
                };
                Some(Effect::CompleteSession { session_id })
            }
            AttemptAction::RemoteResult(remote) => {
                let AttemptPhase::Completing { local_result, .. } = &self.phase else {
                    return Err(match self.phase {
                        AttemptPhase::Completed { .. } => QuizError::AttemptCompleted,
                        _ => QuizError::SessionNotStarted,
                    });
                };
                let result = match remote {
                    Some(remote) => local_result.clone().merge_remote(&remote),
                    None => local_result.clone(),
                };
                next.phase = AttemptPhase::Completed { result };
                None
            }
        };

        tracing::debug!(
            phase = ?next.phase,
            cursor = next.cursor,
            ?effect,
            "attempt transition"
        );
        Ok(Transition {
            state: next,
            effect,
        })
    }

    fn require_initializing(&self) -> Result<(), QuizError> {
        match self.phase {
            AttemptPhase::Initializing => Ok(()),
            AttemptPhase::Completing { .. } | AttemptPhase::Completed { .. } => {
                Err(QuizError::AttemptCompleted)
            }
            _ => Err(QuizError::InvalidInput {
                message: "session already resolved".to_string(),
            }),
        }
    }

    fn require_in_progress(&self) -> Result<&SessionId, QuizError> {
        match &self.phase {
            AttemptPhase::InProgress { session_id } => Ok(session_id),
            AttemptPhase::Completing { .. } | AttemptPhase::Completed { .. } => {
                Err(QuizError::AttemptCompleted)
            }
            AttemptPhase::Initializing | AttemptPhase::Failed { .. } => {
                Err(QuizError::SessionNotStarted)
            }
        }
    }

    fn question(&self, index: usize) -> Result<&quiz_types::Question, QuizError> {
        self.quiz
            .questions
            .get(index)
            .ok_or(QuizError::QuestionOutOfRange {
                index,
                total: self.total_questions(),
            })
    }
}
