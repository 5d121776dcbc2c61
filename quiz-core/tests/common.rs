#![allow(dead_code)]

use quiz_core::{AttemptAction, AttemptEvent, AttemptEventHandler, AttemptState};
use quiz_types::{AnswerOption, AnswerValue, Difficulty, Question, QuestionKind, Quiz};
use std::sync::{Arc, Mutex};

pub fn create_option(id: &str, text: &str, is_correct: bool) -> AnswerOption {
    AnswerOption {
        id: id.to_string(),
        text: text.to_string(),
        is_correct,
        order: 0,
    }
}

/// Single-choice question whose correct answer id is `A`
pub fn create_single_choice(id: &str, points: u32) -> Question {
    Question {
        id: id.to_string(),
        prompt: "Which word means cat?".to_string(),
        points,
        kind: QuestionKind::SingleChoice {
            answers: vec![
                create_option("A", "chat", true),
                create_option("B", "chien", false),
                create_option("C", "cheval", false),
            ],
        },
    }
}

pub fn create_short_answer(id: &str, points: u32, accepted: &str) -> Question {
    Question {
        id: id.to_string(),
        prompt: "Translate 'cat' into French".to_string(),
        points,
        kind: QuestionKind::ShortAnswer {
            answers: vec![create_option("x", accepted, true)],
        },
    }
}

pub fn create_quiz(questions: Vec<Question>) -> Arc<Quiz> {
    Arc::new(Quiz {
        id: "quiz-animals".to_string(),
        title: "Animals".to_string(),
        description: "French animal vocabulary".to_string(),
        category: "vocabulary".to_string(),
        difficulty: Difficulty::Beginner,
        time_limit: Some(1),
        is_public: true,
        questions,
    })
}

/// Q1 single-choice worth 1pt (correct `A`), Q2 short-answer worth 1pt (correct `chat`)
pub fn create_standard_quiz() -> Arc<Quiz> {
    create_quiz(vec![
        create_single_choice("q1", 1),
        create_short_answer("q2", 1, "chat"),
    ])
}

pub fn start_attempt(quiz: Arc<Quiz>) -> AttemptState {
    AttemptState::new(quiz)
        .reduce(AttemptAction::SessionStarted("session-1".to_string()))
        .unwrap()
        .state
}

pub fn apply(state: AttemptState, action: AttemptAction) -> AttemptState {
    state.reduce(action).unwrap().state
}

pub fn answer(state: AttemptState, index: usize, value: AnswerValue) -> AttemptState {
    apply(state, AttemptAction::Answer { index, value })
}

pub fn choice(id: &str) -> AnswerValue {
    AnswerValue::Choice(id.to_string())
}

pub fn text(value: &str) -> AnswerValue {
    AnswerValue::Text(value.to_string())
}

/// Event collector for testing event emissions
#[derive(Clone)]
pub struct EventCollector {
    events: Arc<Mutex<Vec<AttemptEvent>>>,
}

impl EventCollector {
    pub fn new() -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn get_events(&self) -> Vec<AttemptEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn event_count(&self) -> usize {
        self.events.lock().unwrap().len()
    }

    pub fn has_event_type(&self, check_fn: impl Fn(&AttemptEvent) -> bool) -> bool {
        self.events.lock().unwrap().iter().any(check_fn)
    }
}

impl AttemptEventHandler for EventCollector {
    fn handle_event(&mut self, event: AttemptEvent) {
        self.events.lock().unwrap().push(event);
    }
}
