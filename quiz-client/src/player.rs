use quiz_core::{
    AttemptAction, AttemptEvent, AttemptEventBus, AttemptEventHandler, AttemptPhase, AttemptState,
    CountdownTimer, Effect, TimerConfig, TimerEvent, parse_input,
};
use quiz_types::{
    AnswerValue, CompleteSessionRequest, Quiz, QuizError, QuizResult, SessionId,
    SubmitAnswerRequest,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{Instrument, debug, info, info_span, warn};
use uuid::Uuid;

use crate::api::QuizApi;
use crate::config::Config;
use crate::error::ClientError;

const TICK: Duration = Duration::from_secs(1);

#[derive(Debug, Clone)]
pub struct PlayerSettings {
    pub warning_thresholds: Vec<u32>,
    pub allow_pause: bool,
    /// Start counting down as soon as the session opens
    pub auto_start: bool,
    /// Send each answer to the backend as it is recorded
    pub submit_answers: bool,
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self {
            warning_thresholds: vec![60, 30, 10],
            allow_pause: true,
            auto_start: true,
            submit_answers: false,
        }
    }
}

impl From<&Config> for PlayerSettings {
    fn from(config: &Config) -> Self {
        Self {
            warning_thresholds: config.timer_warnings.clone(),
            allow_pause: config.allow_timer_pause,
            auto_start: config.timer_auto_start,
            submit_answers: config.submit_answers,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PlayerCommand {
    Answer { index: usize, value: AnswerValue },
    /// Raw text answering the question under the cursor
    Input(String),
    Advance,
    Retreat,
    GoTo(usize),
    Complete,
    Retry,
    StartTimer,
    PauseTimer,
    ResumeTimer,
}

/// Drives one quiz attempt: owns the attempt state and its timer, performs the
/// network effects the reducer asks for, and reports every change as an event.
pub struct QuizPlayer<A: QuizApi> {
    attempt_id: Uuid,
    api: Arc<A>,
    state: AttemptState,
    timer: Option<CountdownTimer>,
    settings: PlayerSettings,
    events: AttemptEventBus,
    submissions: JoinSet<()>,
}

impl<A: QuizApi> QuizPlayer<A> {
    pub fn new(api: Arc<A>, quiz: Arc<Quiz>, settings: PlayerSettings) -> Self {
        Self {
            attempt_id: Uuid::new_v4(),
            api,
            state: AttemptState::new(quiz),
            timer: None,
            settings,
            events: AttemptEventBus::new(),
            submissions: JoinSet::new(),
        }
    }

    pub fn add_handler(&mut self, handler: Box<dyn AttemptEventHandler>) {
        self.events.add_handler(handler);
    }

    pub fn state(&self) -> &AttemptState {
        &self.state
    }

    pub fn timer(&self) -> Option<&CountdownTimer> {
        self.timer.as_ref()
    }

    pub fn timer_running(&self) -> bool {
        self.timer.as_ref().is_some_and(CountdownTimer::is_running)
    }

    fn quiz_id(&self) -> String {
        self.state.quiz.id.clone()
    }

    fn dispatch(&mut self, action: AttemptAction) -> Result<Option<Effect>, QuizError> {
        let transition = self.state.reduce(action)?;
        self.state = transition.state;
        Ok(transition.effect)
    }

    /// Open a backend session. On failure the attempt waits in `Failed` for a retry.
    pub async fn initialize(&mut self) -> Result<(), ClientError> {
        let quiz_id = self.quiz_id();
        let api = self.api.clone();

        match api.start_session(&quiz_id).await {
            Ok(session) => {
                self.dispatch(AttemptAction::SessionStarted(session.id.clone()))?;
                info!("Started session {} for quiz {}", session.id, quiz_id);
                self.events.publish(AttemptEvent::SessionStarted {
                    quiz_id: quiz_id.clone(),
                    session_id: session.id,
                });
                self.events.publish(AttemptEvent::CursorMoved {
                    quiz_id,
                    index: self.state.cursor,
                });
                self.arm_timer().await
            }
            Err(e) => {
                warn!("Failed to start session for quiz {}: {}", quiz_id, e);
                self.dispatch(AttemptAction::SessionFailed(e.to_string()))?;
                self.events.publish(AttemptEvent::SessionFailed {
                    quiz_id,
                    message: e.to_string(),
                });
                Err(e)
            }
        }
    }

    pub async fn retry(&mut self) -> Result<(), ClientError> {
        self.dispatch(AttemptAction::Retry)?;
        info!("Retrying session start for quiz {}", self.state.quiz.id);
        self.initialize().await
    }

    async fn arm_timer(&mut self) -> Result<(), ClientError> {
        let Some(total_seconds) = self.state.quiz.time_limit_seconds() else {
            return Ok(());
        };

        let mut timer = CountdownTimer::new(TimerConfig {
            total_seconds,
            warning_thresholds: self.settings.warning_thresholds.clone(),
            allow_pause: self.settings.allow_pause,
            auto_start: self.settings.auto_start,
        });
        let events = if timer.config().auto_start {
            timer.start()?
        } else {
            Vec::new()
        };
        debug!(
            "Timer armed with {} seconds (auto start: {})",
            total_seconds,
            timer.config().auto_start
        );
        self.timer = Some(timer);
        self.on_timer_events(events).await
    }

    pub async fn answer(&mut self, index: usize, value: AnswerValue) -> Result<(), ClientError> {
        let effect = self.dispatch(AttemptAction::Answer {
            index,
            value: value.clone(),
        })?;
        debug!("Recorded {} answer for question {}", value.shape_name(), index);

        if let Some(Effect::SubmitAnswer {
            session_id,
            index,
            value,
        }) = &effect
        {
            if self.settings.submit_answers {
                self.submit_in_background(session_id.clone(), *index, value);
            }
        }

        self.events.publish(AttemptEvent::AnswerRecorded {
            quiz_id: self.quiz_id(),
            index,
            value,
        });
        Ok(())
    }

    /// Answer the current question from raw user input.
    pub async fn input(&mut self, raw: &str) -> Result<(), ClientError> {
        let index = self.state.cursor;
        let question = self
            .state
            .quiz
            .questions
            .get(index)
            .ok_or(QuizError::QuestionOutOfRange {
                index,
                total: self.state.total_questions(),
            })?;
        let value = parse_input(question, raw)?;
        self.answer(index, value).await
    }

    fn submit_in_background(&mut self, session_id: SessionId, index: usize, value: &AnswerValue) {
        let Some(question) = self.state.quiz.questions.get(index) else {
            return;
        };
        let request = SubmitAnswerRequest::new(session_id, question.id.clone(), value);
        let api = self.api.clone();
        let quiz_id = self.quiz_id();

        self.submissions.spawn(async move {
            if let Err(e) = api.submit_answer(&quiz_id, &request).await {
                warn!(
                    "Failed to submit answer for question {}: {}",
                    request.question_id, e
                );
            }
        });
    }

    pub async fn advance(&mut self) -> Result<(), ClientError> {
        match self.dispatch(AttemptAction::Advance)? {
            Some(Effect::CompleteSession { session_id }) => self.finish(session_id).await,
            _ => {
                self.publish_cursor();
                Ok(())
            }
        }
    }

    pub fn retreat(&mut self) -> Result<(), ClientError> {
        self.dispatch(AttemptAction::Retreat)?;
        self.publish_cursor();
        Ok(())
    }

    pub fn go_to(&mut self, index: usize) -> Result<(), ClientError> {
        self.dispatch(AttemptAction::GoTo(index))?;
        self.publish_cursor();
        Ok(())
    }

    pub async fn complete(&mut self) -> Result<(), ClientError> {
        match self.dispatch(AttemptAction::Complete)? {
            Some(Effect::CompleteSession { session_id }) => self.finish(session_id).await,
            _ => Ok(()),
        }
    }

    /// Start a timer that was armed without auto start.
    pub async fn start_timer(&mut self) -> Result<(), ClientError> {
        if !matches!(self.state.phase, AttemptPhase::InProgress { .. }) {
            return Err(QuizError::SessionNotStarted.into());
        }
        let events = self.timer_mut("start")?.start()?;
        info!("Timer started for quiz {}", self.state.quiz.id);
        self.on_timer_events(events).await
    }

    pub fn pause_timer(&mut self) -> Result<(), ClientError> {
        self.timer_mut("pause")?.pause()?;
        info!("Timer paused for quiz {}", self.state.quiz.id);
        Ok(())
    }

    pub fn resume_timer(&mut self) -> Result<(), ClientError> {
        self.timer_mut("resume")?.resume()?;
        info!("Timer resumed for quiz {}", self.state.quiz.id);
        Ok(())
    }

    fn timer_mut(&mut self, action: &str) -> Result<&mut CountdownTimer, QuizError> {
        self.timer.as_mut().ok_or_else(|| QuizError::InvalidTimerState {
            action: action.to_string(),
            status: "untimed".to_string(),
        })
    }

    /// One elapsed second.
    pub async fn tick(&mut self) -> Result<(), ClientError> {
        let events = match self.timer.as_mut() {
            Some(timer) => timer.tick(),
            None => return Ok(()),
        };
        self.on_timer_events(events).await
    }

    async fn on_timer_events(&mut self, events: Vec<TimerEvent>) -> Result<(), ClientError> {
        for event in events {
            match event {
                TimerEvent::Warning { seconds_remaining } => {
                    debug!("Timer warning at {} seconds", seconds_remaining);
                    self.events.publish(AttemptEvent::TimerWarning {
                        quiz_id: self.quiz_id(),
                        seconds_remaining,
                    });
                }
                TimerEvent::Expired => {
                    info!("Time is up for quiz {}", self.state.quiz.id);
                    self.events.publish(AttemptEvent::TimerExpired {
                        quiz_id: self.quiz_id(),
                    });
                    if matches!(self.state.phase, AttemptPhase::InProgress { .. }) {
                        self.complete().await?;
                    }
                }
            }
        }
        Ok(())
    }

    /// Report the locally scored attempt to the backend and settle on a final result.
    async fn finish(&mut self, session_id: SessionId) -> Result<(), ClientError> {
        if let Some(timer) = self.timer.as_mut() {
            timer.stop();
        }

        // Answers already in flight must land before the session is closed
        while self.submissions.join_next().await.is_some() {}

        let quiz_id = self.quiz_id();
        let api = self.api.clone();
        let request = CompleteSessionRequest {
            session_id: session_id.clone(),
        };

        let remote = match api.complete_session(&quiz_id, &request).await {
            Ok(response) => Some(response),
            Err(e) => {
                warn!(
                    "Completing session {} failed, keeping local score: {}",
                    session_id, e
                );
                None
            }
        };
        let confirmed_by_backend = remote.is_some();

        self.dispatch(AttemptAction::RemoteResult(remote))?;
        let result = self.state.result().cloned().ok_or(QuizError::SessionNotStarted)?;
        info!(
            "Completed quiz {}: {}/{} correct, {}%",
            quiz_id, result.correct_answers, result.total_questions, result.percentage
        );

        self.events.publish(AttemptEvent::Completed {
            quiz_id,
            result,
            confirmed_by_backend,
            completed_at: chrono::Utc::now().to_rfc3339(),
        });
        Ok(())
    }

    fn publish_cursor(&mut self) {
        self.events.publish(AttemptEvent::CursorMoved {
            quiz_id: self.quiz_id(),
            index: self.state.cursor,
        });
    }

    pub async fn handle(&mut self, command: PlayerCommand) -> Result<(), ClientError> {
        match command {
            PlayerCommand::Answer { index, value } => self.answer(index, value).await,
            PlayerCommand::Input(raw) => self.input(&raw).await,
            PlayerCommand::Advance => self.advance().await,
            PlayerCommand::Retreat => self.retreat(),
            PlayerCommand::GoTo(index) => self.go_to(index),
            PlayerCommand::Complete => self.complete().await,
            PlayerCommand::Retry => self.retry().await,
            PlayerCommand::StartTimer => self.start_timer().await,
            PlayerCommand::PauseTimer => self.pause_timer(),
            PlayerCommand::ResumeTimer => self.resume_timer(),
        }
    }

    /// Event loop for the whole attempt. Commands and timer ticks are handled
    /// strictly one at a time; the loop ends when the attempt is completed.
    pub async fn run(
        mut self,
        mut commands: mpsc::Receiver<PlayerCommand>,
    ) -> Result<QuizResult, ClientError> {
        let span = info_span!("quiz_attempt", attempt_id = %self.attempt_id, quiz_id = %self.state.quiz.id);

        async move {
            if let Err(e) = self.initialize().await {
                warn!("Waiting for retry: {}", e);
            }

            let mut ticker = time::interval_at(Instant::now() + TICK, TICK);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                if let Some(result) = self.state.result() {
                    return Ok(result.clone());
                }

                let was_running = self.timer_running();
                tokio::select! {
                    command = commands.recv() => {
                        let Some(command) = command else {
                            info!("Command channel closed, abandoning attempt");
                            return Err(ClientError::Abandoned);
                        };
                        if let Err(e) = self.handle(command).await {
                            warn!("Command rejected: {}", e);
                        }
                    }
                    _ = ticker.tick(), if was_running => {
                        self.tick().await?;
                    }
                }

                // A freshly started or resumed timer waits a full second before its next tick
                if !was_running && self.timer_running() {
                    ticker.reset();
                }
            }
        }
        .instrument(span)
        .await
    }

    /// Run the attempt on its own task. Dropping the returned handle tears it down.
    pub fn spawn(self) -> PlayerHandle {
        let (commands, receiver) = mpsc::channel(32);
        let task = tokio::spawn(self.run(receiver));
        PlayerHandle {
            commands,
            task: Some(task),
        }
    }
}

/// Owning handle to a spawned attempt.
///
/// The attempt lives exactly as long as this handle: dropping it aborts the task,
/// which cancels the timer and any in-flight request without further events.
pub struct PlayerHandle {
    commands: mpsc::Sender<PlayerCommand>,
    task: Option<JoinHandle<Result<QuizResult, ClientError>>>,
}

impl PlayerHandle {
    pub async fn send(&self, command: PlayerCommand) -> Result<(), ClientError> {
        self.commands
            .send(command)
            .await
            .map_err(|_| ClientError::Abandoned)
    }

    pub fn commands(&self) -> mpsc::Sender<PlayerCommand> {
        self.commands.clone()
    }

    pub fn is_finished(&self) -> bool {
        self.task.as_ref().is_none_or(JoinHandle::is_finished)
    }

    /// Wait for the attempt to complete.
    pub async fn finished(&mut self) -> Result<QuizResult, ClientError> {
        let task = self.task.as_mut().ok_or(ClientError::Abandoned)?;
        let outcome = task.await;
        self.task = None;
        match outcome {
            Ok(result) => result,
            Err(e) => {
                warn!("Quiz player task ended abnormally: {}", e);
                Err(ClientError::Abandoned)
            }
        }
    }
}

impl Drop for PlayerHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
