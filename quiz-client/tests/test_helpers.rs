#![allow(dead_code)]

use async_trait::async_trait;
use quiz_client::{ClientError, PlayerSettings, QuizApi};
use quiz_core::{AttemptEvent, AttemptEventHandler};
use quiz_types::{
    AnswerOption, AnswerValue, CompleteSessionRequest, CompleteSessionResponse, Difficulty,
    Question, QuestionKind, Quiz, StartSessionResponse, SubmitAnswerRequest,
};
use reqwest::StatusCode;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Notify;

/// In-memory backend with scriptable failures and a log of every call
#[derive(Default)]
pub struct FakeQuizApi {
    quiz: Option<Quiz>,
    start_failures: AtomicUsize,
    fail_complete: bool,
    complete_response: CompleteSessionResponse,
    complete_gate: Option<Arc<Notify>>,
    submit_delay: Option<Duration>,
    /// Notified each time `complete_session` is entered
    pub complete_entered: Notify,
    calls: Mutex<Vec<String>>,
    submissions: Mutex<Vec<SubmitAnswerRequest>>,
}

impl FakeQuizApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quiz(mut self, quiz: Quiz) -> Self {
        self.quiz = Some(quiz);
        self
    }

    /// The next `count` session starts fail
    pub fn failing_start(self, count: usize) -> Self {
        self.start_failures.store(count, Ordering::SeqCst);
        self
    }

    pub fn failing_complete(mut self) -> Self {
        self.fail_complete = true;
        self
    }

    pub fn with_complete_response(mut self, response: CompleteSessionResponse) -> Self {
        self.complete_response = response;
        self
    }

    /// `complete_session` blocks until the gate is notified
    pub fn with_complete_gate(mut self, gate: Arc<Notify>) -> Self {
        self.complete_gate = Some(gate);
        self
    }

    pub fn with_submit_delay(mut self, delay: Duration) -> Self {
        self.submit_delay = Some(delay);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self, name: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| *c == name).count()
    }

    pub fn submissions(&self) -> Vec<SubmitAnswerRequest> {
        self.submissions.lock().unwrap().clone()
    }

    fn record(&self, name: &str) {
        self.calls.lock().unwrap().push(name.to_string());
    }
}

#[async_trait]
impl QuizApi for FakeQuizApi {
    async fn fetch_quiz(&self, quiz_id: &str) -> Result<Quiz, ClientError> {
        self.record("fetch_quiz");
        self.quiz
            .clone()
            .filter(|quiz| quiz.id == quiz_id)
            .ok_or_else(|| ClientError::Api(StatusCode::NOT_FOUND, "Not found".to_string()))
    }

    async fn start_session(&self, _quiz_id: &str) -> Result<StartSessionResponse, ClientError> {
        self.record("start_session");
        let remaining = self.start_failures.load(Ordering::SeqCst);
        if remaining > 0 {
            self.start_failures.store(remaining - 1, Ordering::SeqCst);
            return Err(ClientError::Api(
                StatusCode::SERVICE_UNAVAILABLE,
                "Backend unavailable".to_string(),
            ));
        }
        Ok(StartSessionResponse {
            id: "session-1".to_string(),
        })
    }

    async fn submit_answer(
        &self,
        _quiz_id: &str,
        request: &SubmitAnswerRequest,
    ) -> Result<(), ClientError> {
        if let Some(delay) = self.submit_delay {
            tokio::time::sleep(delay).await;
        }
        self.record("submit_answer");
        self.submissions.lock().unwrap().push(request.clone());
        Ok(())
    }

    async fn complete_session(
        &self,
        _quiz_id: &str,
        _request: &CompleteSessionRequest,
    ) -> Result<CompleteSessionResponse, ClientError> {
        self.record("complete_session");
        self.complete_entered.notify_one();
        if let Some(gate) = &self.complete_gate {
            gate.notified().await;
        }
        if self.fail_complete {
            return Err(ClientError::Api(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Scoring failed".to_string(),
            ));
        }
        Ok(self.complete_response.clone())
    }
}

pub fn create_option(id: &str, text: &str, is_correct: bool) -> AnswerOption {
    AnswerOption {
        id: id.to_string(),
        text: text.to_string(),
        is_correct,
        order: 0,
    }
}

/// Two questions worth one point each: choice `A` and the text `chat`
pub fn create_test_quiz(time_limit: Option<u32>) -> Quiz {
    Quiz {
        id: "quiz-animals".to_string(),
        title: "Animals".to_string(),
        description: "French animal vocabulary".to_string(),
        category: "vocabulary".to_string(),
        difficulty: Difficulty::Beginner,
        time_limit,
        is_public: true,
        questions: vec![
            Question {
                id: "q1".to_string(),
                prompt: "Which word means cat?".to_string(),
                points: 1,
                kind: QuestionKind::SingleChoice {
                    answers: vec![
                        create_option("A", "chat", true),
                        create_option("B", "chien", false),
                    ],
                },
            },
            Question {
                id: "q2".to_string(),
                prompt: "Translate 'cat' into French".to_string(),
                points: 1,
                kind: QuestionKind::ShortAnswer {
                    answers: vec![create_option("x", "chat", true)],
                },
            },
        ],
    }
}

pub fn quiet_settings() -> PlayerSettings {
    PlayerSettings {
        warning_thresholds: Vec::new(),
        ..PlayerSettings::default()
    }
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

    pub fn count(&self, check_fn: impl Fn(&AttemptEvent) -> bool) -> usize {
        self.events.lock().unwrap().iter().filter(|e| check_fn(e)).count()
    }

    pub fn warnings(&self) -> Vec<u32> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter_map(|event| match event {
                AttemptEvent::TimerWarning {
                    seconds_remaining, ..
                } => Some(*seconds_remaining),
                _ => None,
            })
            .collect()
    }

    /// `confirmed_by_backend` of the completion event, if one was published
    pub fn completion(&self) -> Option<bool> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .find_map(|event| match event {
                AttemptEvent::Completed {
                    confirmed_by_backend,
                    ..
                } => Some(*confirmed_by_backend),
                _ => None,
            })
    }
}

impl AttemptEventHandler for EventCollector {
    fn handle_event(&mut self, event: AttemptEvent) {
        self.events.lock().unwrap().push(event);
    }
}
