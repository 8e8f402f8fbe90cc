//! Pomodoro timer state machine.
//!
//! Two orthogonal flags (`is_running`, `is_break`) plus a seconds countdown.
//! The timer has no internal clock: the owner calls [`PomodoroTimer::tick`]
//! once per second, and completion is reported back so the owner can feed the
//! finished work interval into the streak engine.

use thiserror::Error;

use crate::models::{
    PomodoroConfig, MAX_BREAK_MINS, MAX_WORK_MINS, MIN_BREAK_MINS, MIN_WORK_MINS,
};

#[derive(Error, Debug, PartialEq, Eq)]
pub enum TimerError {
    #[error(
        "work duration must be between {MIN_WORK_MINS} and {MAX_WORK_MINS} minutes, got {0}"
    )]
    WorkDurationOutOfRange(u32),
    #[error(
        "break duration must be between {MIN_BREAK_MINS} and {MAX_BREAK_MINS} minutes, got {0}"
    )]
    BreakDurationOutOfRange(u32),
}

/// Reported when a countdown reaches zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerCompletion {
    /// A work interval finished; `minutes` is the configured duration to
    /// credit as study time.
    Work { minutes: u32 },
    Break,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PomodoroTimer {
    config: PomodoroConfig,
    is_running: bool,
    is_break: bool,
    time_left_secs: u32,
}

impl PomodoroTimer {
    pub fn new(config: PomodoroConfig) -> Self {
        let time_left_secs = config.work_duration * 60;
        Self {
            config,
            is_running: false,
            is_break: false,
            time_left_secs,
        }
    }

    pub fn config(&self) -> &PomodoroConfig {
        &self.config
    }

    pub fn is_running(&self) -> bool {
        self.is_running
    }

    pub fn is_break(&self) -> bool {
        self.is_break
    }

    pub fn time_left_secs(&self) -> u32 {
        self.time_left_secs
    }

    /// Starts the countdown. No-op if already running. Returns whether the
    /// timer actually started, so the owner knows to open a study session
    /// when entering work mode.
    pub fn start(&mut self) -> bool {
        if self.is_running {
            return false;
        }
        self.is_running = true;
        true
    }

    /// Stops the countdown, keeping the remaining time. Returns whether the
    /// timer was running.
    pub fn pause(&mut self) -> bool {
        if !self.is_running {
            return false;
        }
        self.is_running = false;
        true
    }

    /// Advances the countdown by one second. On reaching zero the interval
    /// completes: the mode flips, the countdown is reloaded from the config,
    /// and the break/work auto-start flags decide whether ticking continues.
    pub fn tick(&mut self) -> Option<TimerCompletion> {
        if !self.is_running {
            return None;
        }
        self.time_left_secs = self.time_left_secs.saturating_sub(1);
        if self.time_left_secs == 0 {
            Some(self.complete())
        } else {
            None
        }
    }

    fn complete(&mut self) -> TimerCompletion {
        self.is_running = false;
        if !self.is_break {
            let minutes = self.config.work_duration;
            self.is_break = true;
            self.time_left_secs = self.config.break_duration * 60;
            if self.config.auto_start_break {
                self.is_running = true;
            }
            TimerCompletion::Work { minutes }
        } else {
            self.is_break = false;
            self.time_left_secs = self.config.work_duration * 60;
            if self.config.auto_start_work {
                self.is_running = true;
            }
            TimerCompletion::Break
        }
    }

    /// Stops the countdown and restores the current mode's configured
    /// duration.
    pub fn reset(&mut self) {
        self.is_running = false;
        self.time_left_secs = self.current_mode_secs();
    }

    /// Replaces the configuration after validating it; a rejected config
    /// leaves the prior one untouched. An idle countdown is reloaded to the
    /// new duration.
    pub fn set_config(&mut self, config: PomodoroConfig) -> Result<(), TimerError> {
        validate_config(&config)?;
        self.config = config;
        if !self.is_running {
            self.time_left_secs = self.current_mode_secs();
        }
        Ok(())
    }

    /// Remaining time as `mm:ss`.
    pub fn display(&self) -> String {
        format_time(self.time_left_secs)
    }

    fn current_mode_secs(&self) -> u32 {
        let minutes = if self.is_break {
            self.config.break_duration
        } else {
            self.config.work_duration
        };
        minutes * 60
    }
}

/// Validates user-supplied durations. The work floor is policy-coupled to the
/// streak minimum: intervals shorter than it could never qualify a day.
pub fn validate_config(config: &PomodoroConfig) -> Result<(), TimerError> {
    if !(MIN_WORK_MINS..=MAX_WORK_MINS).contains(&config.work_duration) {
        return Err(TimerError::WorkDurationOutOfRange(config.work_duration));
    }
    if !(MIN_BREAK_MINS..=MAX_BREAK_MINS).contains(&config.break_duration) {
        return Err(TimerError::BreakDurationOutOfRange(config.break_duration));
    }
    Ok(())
}

/// Formats seconds as `mm:ss`.
pub fn format_time(secs: u32) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn timer_25_5() -> PomodoroTimer {
        PomodoroTimer::new(PomodoroConfig {
            work_duration: 25,
            break_duration: 5,
            ..PomodoroConfig::default()
        })
    }

    #[test]
    fn test_initial_state() {
        let timer = timer_25_5();
        assert!(!timer.is_running());
        assert!(!timer.is_break());
        assert_eq!(timer.time_left_secs(), 25 * 60);
    }

    #[test]
    fn test_start_is_noop_while_running() {
        let mut timer = timer_25_5();
        assert!(timer.start());
        assert!(!timer.start());
        assert!(timer.is_running());
    }

    #[test]
    fn test_tick_only_counts_while_running() {
        let mut timer = timer_25_5();
        assert_eq!(timer.tick(), None);
        assert_eq!(timer.time_left_secs(), 25 * 60);

        timer.start();
        timer.tick();
        assert_eq!(timer.time_left_secs(), 25 * 60 - 1);

        assert!(timer.pause());
        timer.tick();
        assert_eq!(timer.time_left_secs(), 25 * 60 - 1);
        assert!(!timer.pause());
    }

    #[test]
    fn test_full_work_interval_completes_to_break() {
        let mut timer = timer_25_5();
        timer.start();

        let mut completions = Vec::new();
        for _ in 0..1500 {
            if let Some(c) = timer.tick() {
                completions.push(c);
            }
        }

        assert_eq!(completions, vec![TimerCompletion::Work { minutes: 25 }]);
        assert!(timer.is_break());
        assert_eq!(timer.time_left_secs(), 300);
        assert!(!timer.is_running()); // auto-start disabled
    }

    #[test]
    fn test_break_completes_back_to_work() {
        let mut timer = timer_25_5();
        timer.start();
        for _ in 0..1500 {
            timer.tick();
        }
        assert!(timer.is_break());

        timer.start();
        let mut completion = None;
        for _ in 0..300 {
            if let Some(c) = timer.tick() {
                completion = Some(c);
            }
        }

        assert_eq!(completion, Some(TimerCompletion::Break));
        assert!(!timer.is_break());
        assert_eq!(timer.time_left_secs(), 25 * 60);
    }

    #[test]
    fn test_auto_start_flags() {
        let mut timer = PomodoroTimer::new(PomodoroConfig {
            work_duration: 25,
            break_duration: 5,
            auto_start_break: true,
            auto_start_work: true,
            ..PomodoroConfig::default()
        });
        timer.start();
        for _ in 0..1500 {
            timer.tick();
        }
        // Break began ticking on its own.
        assert!(timer.is_break());
        assert!(timer.is_running());

        for _ in 0..300 {
            timer.tick();
        }
        assert!(!timer.is_break());
        assert!(timer.is_running());
    }

    #[test]
    fn test_reset_restores_current_mode_duration() {
        let mut timer = timer_25_5();
        timer.start();
        for _ in 0..100 {
            timer.tick();
        }

        timer.reset();
        assert!(!timer.is_running());
        assert_eq!(timer.time_left_secs(), 25 * 60);

        // During a break, reset restores the break duration.
        timer.start();
        for _ in 0..1500 {
            timer.tick();
        }
        timer.start();
        timer.tick();
        timer.reset();
        assert!(timer.is_break());
        assert_eq!(timer.time_left_secs(), 300);
    }

    #[test]
    fn test_set_config_rejects_work_below_floor() {
        let mut timer = timer_25_5();
        let result = timer.set_config(PomodoroConfig {
            work_duration: 29,
            ..PomodoroConfig::default()
        });

        assert_eq!(result, Err(TimerError::WorkDurationOutOfRange(29)));
        // Prior config retained.
        assert_eq!(timer.config().work_duration, 25);
        assert_eq!(timer.time_left_secs(), 25 * 60);
    }

    #[test]
    fn test_set_config_rejects_break_out_of_bounds() {
        let mut timer = timer_25_5();
        for bad in [0, 31] {
            let result = timer.set_config(PomodoroConfig {
                work_duration: 45,
                break_duration: bad,
                ..PomodoroConfig::default()
            });
            assert_eq!(result, Err(TimerError::BreakDurationOutOfRange(bad)));
            assert_eq!(timer.config().break_duration, 5);
        }
    }

    #[test]
    fn test_set_config_reloads_idle_countdown() {
        let mut timer = timer_25_5();
        timer
            .set_config(PomodoroConfig {
                work_duration: 45,
                break_duration: 10,
                ..PomodoroConfig::default()
            })
            .unwrap();
        assert_eq!(timer.time_left_secs(), 45 * 60);

        // A running countdown is not disturbed.
        timer.start();
        for _ in 0..60 {
            timer.tick();
        }
        timer
            .set_config(PomodoroConfig {
                work_duration: 30,
                break_duration: 10,
                ..PomodoroConfig::default()
            })
            .unwrap();
        assert_eq!(timer.time_left_secs(), 45 * 60 - 60);
    }

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(0), "00:00");
        assert_eq!(format_time(59), "00:59");
        assert_eq!(format_time(60), "01:00");
        assert_eq!(format_time(125), "02:05");
        assert_eq!(format_time(1500), "25:00");
        assert_eq!(format_time(3599), "59:59");
    }
}
