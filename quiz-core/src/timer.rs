use quiz_types::QuizError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerConfig {
    pub total_seconds: u32,
    /// Seconds-remaining marks that trigger a warning, e.g. `[60, 30, 10]`
    pub warning_thresholds: Vec<u32>,
    pub allow_pause: bool,
    pub auto_start: bool,
}

impl TimerConfig {
    pub fn new(total_seconds: u32) -> Self {
        Self {
            total_seconds,
            warning_thresholds: vec![60, 30, 10],
            allow_pause: true,
            auto_start: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimerStatus {
    Stopped,
    Running,
    Paused,
    Expired,
}

impl fmt::Display for TimerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimerStatus::Stopped => write!(f, "stopped"),
            TimerStatus::Running => write!(f, "running"),
            TimerStatus::Paused => write!(f, "paused"),
            TimerStatus::Expired => write!(f, "expired"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    Warning { seconds_remaining: u32 },
    Expired,
}

/// A one-second-resolution countdown. It does not own a clock; whoever drives it
/// calls [`CountdownTimer::tick`] once per elapsed second.
#[derive(Debug, Clone)]
pub struct CountdownTimer {
    config: TimerConfig,
    remaining: u32,
    status: TimerStatus,
    fired: BTreeSet<u32>,
}

impl CountdownTimer {
    pub fn new(config: TimerConfig) -> Self {
        Self {
            remaining: config.total_seconds,
            config,
            status: TimerStatus::Stopped,
            fired: BTreeSet::new(),
        }
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn status(&self) -> TimerStatus {
        self.status
    }

    pub fn config(&self) -> &TimerConfig {
        &self.config
    }

    pub fn is_running(&self) -> bool {
        self.status == TimerStatus::Running
    }

    /// Begin counting down. Warnings whose threshold equals the starting time fire here,
    /// and a zero-length timer expires immediately.
    pub fn start(&mut self) -> Result<Vec<TimerEvent>, QuizError> {
        if self.status != TimerStatus::Stopped {
            return Err(self.invalid("start"));
        }
        self.status = TimerStatus::Running;
        Ok(self.check_remaining())
    }

    /// Advance one second. Does nothing unless the timer is running.
    pub fn tick(&mut self) -> Vec<TimerEvent> {
        if self.status != TimerStatus::Running {
            return Vec::new();
        }
        self.remaining = self.remaining.saturating_sub(1);
        tracing::trace!(remaining = self.remaining, "timer tick");
        self.check_remaining()
    }

    pub fn pause(&mut self) -> Result<(), QuizError> {
        if !self.config.allow_pause {
            return Err(QuizError::PauseNotAllowed);
        }
        if self.status != TimerStatus::Running {
            return Err(self.invalid("pause"));
        }
        self.status = TimerStatus::Paused;
        Ok(())
    }

    pub fn resume(&mut self) -> Result<(), QuizError> {
        if !self.config.allow_pause {
            return Err(QuizError::PauseNotAllowed);
        }
        if self.status != TimerStatus::Paused {
            return Err(self.invalid("resume"));
        }
        self.status = TimerStatus::Running;
        Ok(())
    }

    /// Halt without expiring, e.g. when the attempt completes early.
    pub fn stop(&mut self) {
        if self.status != TimerStatus::Expired {
            self.status = TimerStatus::Stopped;
        }
    }

    pub fn formatted(&self) -> String {
        format_clock(self.remaining)
    }

    fn check_remaining(&mut self) -> Vec<TimerEvent> {
        let mut events = Vec::new();

        for &threshold in &self.config.warning_thresholds {
            if threshold == self.remaining && self.fired.insert(threshold) {
                events.push(TimerEvent::Warning {
                    seconds_remaining: threshold,
                });
            }
        }

        if self.remaining == 0 {
            self.status = TimerStatus::Expired;
            events.push(TimerEvent::Expired);
        }

        events
    }

    fn invalid(&self, action: &str) -> QuizError {
        QuizError::InvalidTimerState {
            action: action.to_string(),
            status: self.status.to_string(),
        }
    }
}

/// `H:MM:SS` from one hour up, `M:SS` below.
pub fn format_clock(seconds: u32) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{}:{:02}", minutes, secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(total: u32, thresholds: &[u32]) -> TimerConfig {
        TimerConfig {
            total_seconds: total,
            warning_thresholds: thresholds.to_vec(),
            allow_pause: true,
            auto_start: true,
        }
    }

    #[test]
    fn test_expires_once_after_total_ticks() {
        let mut timer = CountdownTimer::new(config(10, &[]));
        assert!(timer.start().unwrap().is_empty());

        let mut expirations = 0;
        for _ in 0..10 {
            expirations += timer
                .tick()
                .iter()
                .filter(|e| matches!(e, TimerEvent::Expired))
                .count();
        }
        assert_eq!(timer.remaining(), 0);
        assert_eq!(timer.status(), TimerStatus::Expired);
        assert_eq!(expirations, 1);

        // Further ticks are inert
        for _ in 0..5 {
            assert!(timer.tick().is_empty());
        }
        assert_eq!(timer.remaining(), 0);
    }

    #[test]
    fn test_threshold_equal_to_total_fires_once() {
        let mut timer = CountdownTimer::new(config(5, &[5]));
        let mut warnings = timer.start().unwrap();
        for _ in 0..10 {
            warnings.extend(timer.tick());
        }

        let fired: Vec<_> = warnings
            .iter()
            .filter(|e| matches!(e, TimerEvent::Warning { .. }))
            .collect();
        assert_eq!(fired, vec![&TimerEvent::Warning { seconds_remaining: 5 }]);
    }

    #[test]
    fn test_warnings_fire_in_countdown_order() {
        let mut timer = CountdownTimer::new(config(65, &[60, 30, 10]));
        timer.start().unwrap();

        let mut events = Vec::new();
        for _ in 0..65 {
            events.extend(timer.tick());
        }

        assert_eq!(
            events,
            vec![
                TimerEvent::Warning { seconds_remaining: 60 },
                TimerEvent::Warning { seconds_remaining: 30 },
                TimerEvent::Warning { seconds_remaining: 10 },
                TimerEvent::Expired,
            ]
        );
    }

    #[test]
    fn test_ticks_ignored_unless_running() {
        let mut timer = CountdownTimer::new(config(3, &[]));
        assert!(timer.tick().is_empty());
        assert_eq!(timer.remaining(), 3);

        timer.start().unwrap();
        timer.tick();
        timer.pause().unwrap();
        timer.tick();
        timer.tick();
        assert_eq!(timer.remaining(), 2);
        assert_eq!(timer.status(), TimerStatus::Paused);

        timer.resume().unwrap();
        timer.tick();
        assert_eq!(timer.remaining(), 1);
    }

    #[test]
    fn test_pause_requires_permission() {
        let mut cfg = config(30, &[]);
        cfg.allow_pause = false;
        let mut timer = CountdownTimer::new(cfg);
        timer.start().unwrap();

        assert_eq!(timer.pause(), Err(QuizError::PauseNotAllowed));
        assert_eq!(timer.resume(), Err(QuizError::PauseNotAllowed));
        assert!(timer.is_running());
    }

    #[test]
    fn test_invalid_transitions() {
        let mut timer = CountdownTimer::new(config(30, &[]));
        assert!(matches!(
            timer.pause(),
            Err(QuizError::InvalidTimerState { .. })
        ));

        timer.start().unwrap();
        assert!(matches!(
            timer.start(),
            Err(QuizError::InvalidTimerState { .. })
        ));
        assert!(matches!(
            timer.resume(),
            Err(QuizError::InvalidTimerState { .. })
        ));
    }

    #[test]
    fn test_zero_length_timer_expires_on_start() {
        let mut timer = CountdownTimer::new(config(0, &[]));
        assert_eq!(timer.start().unwrap(), vec![TimerEvent::Expired]);
        assert_eq!(timer.status(), TimerStatus::Expired);
    }

    #[test]
    fn test_stop_keeps_remaining_time() {
        let mut timer = CountdownTimer::new(config(30, &[]));
        timer.start().unwrap();
        timer.tick();
        timer.stop();
        assert_eq!(timer.status(), TimerStatus::Stopped);
        assert_eq!(timer.remaining(), 29);
        assert!(timer.tick().is_empty());
    }

    #[test]
    fn test_format_clock() {
        assert_eq!(format_clock(0), "0:00");
        assert_eq!(format_clock(9), "0:09");
        assert_eq!(format_clock(75), "1:15");
        assert_eq!(format_clock(3599), "59:59");
        assert_eq!(format_clock(3600), "1:00:00");
        assert_eq!(format_clock(3723), "1:02:03");
    }
}
