use quiz_types::{AnswerValue, QuizId, QuizResult, SessionId};

#[derive(Debug, Clone, PartialEq)]
pub enum AttemptEvent {
    SessionStarted {
        quiz_id: QuizId,
        session_id: SessionId,
    },
    SessionFailed {
        quiz_id: QuizId,
        message: String,
    },
    AnswerRecorded {
        quiz_id: QuizId,
        index: usize,
        value: AnswerValue,
    },
    CursorMoved {
        quiz_id: QuizId,
        index: usize,
    },
    TimerWarning {
        quiz_id: QuizId,
        seconds_remaining: u32,
    },
    TimerExpired {
        quiz_id: QuizId,
    },
    Completed {
        quiz_id: QuizId,
        result: QuizResult,
        /// False when the backend call failed and the local score was kept
        confirmed_by_backend: bool,
        completed_at: String, // ISO 8601 string
    },
}

impl AttemptEvent {
    pub fn quiz_id(&self) -> &QuizId {
        match self {
            AttemptEvent::SessionStarted { quiz_id, .. } => quiz_id,
            AttemptEvent::SessionFailed { quiz_id, .. } => quiz_id,
            AttemptEvent::AnswerRecorded { quiz_id, .. } => quiz_id,
            AttemptEvent::CursorMoved { quiz_id, .. } => quiz_id,
            AttemptEvent::TimerWarning { quiz_id, .. } => quiz_id,
            AttemptEvent::TimerExpired { quiz_id } => quiz_id,
            AttemptEvent::Completed { quiz_id, .. } => quiz_id,
        }
    }
}

/// Receives attempt events; the only way state leaves a running attempt.
pub trait AttemptEventHandler: Send {
    fn handle_event(&mut self, event: AttemptEvent);
}

/// Simple event bus for distributing attempt events
pub struct AttemptEventBus {
    handlers: Vec<Box<dyn AttemptEventHandler>>,
}

impl AttemptEventBus {
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    pub fn add_handler(&mut self, handler: Box<dyn AttemptEventHandler>) {
        self.handlers.push(handler);
    }

    pub fn publish(&mut self, event: AttemptEvent) {
        tracing::debug!(?event, "publishing attempt event");
        for handler in &mut self.handlers {
            handler.handle_event(event.clone());
        }
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }
}

impl Default for AttemptEventBus {
    fn default() -> Self {
        Self::new()
    }
}
