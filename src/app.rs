//! Top-level application controller.
//!
//! Owns the persisted state, the pomodoro timer and the persistence cache,
//! and wires timer transitions into the streak engine. The embedder drives it
//! with a once-per-second [`App::tick`]; the slower cadences (real-time
//! projection, continuity re-checks, deferred flushes) all hang off that same
//! tick, mirroring the single-threaded event-loop model of the original
//! client.

use chrono::{DateTime, Duration, Local};
use thiserror::Error;

use crate::cache::StateCache;
use crate::clock::{Clock, SystemClock};
use crate::models::{AppState, PomodoroConfig, PomodoroSession};
use crate::storage::{Store, StoreError};
use crate::streak::{StreakError, StreakEvent, StreakStats};
use crate::timer::{PomodoroTimer, TimerCompletion, TimerError};

/// How often the live study-time projection is recomputed.
pub const REAL_TIME_UPDATE_SECS: i64 = 60;
/// How often streak continuity is re-checked after startup.
pub const CONTINUITY_CHECK_SECS: i64 = 2 * 60 * 60;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),
}

/// Events surfaced to the embedding view layer for notification/rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEvent {
    Streak(StreakEvent),
    WorkIntervalComplete { minutes: u32 },
    BreakComplete,
    /// A state write failed. The in-memory state is still correct; the
    /// embedder should tell the user to check storage.
    SaveFailed,
}

pub struct App<C: Clock = SystemClock> {
    state: AppState,
    timer: PomodoroTimer,
    cache: StateCache<C>,
    clock: C,
    last_real_time_update: DateTime<Local>,
    last_continuity_check: DateTime<Local>,
    pending_events: Vec<AppEvent>,
}

impl App<SystemClock> {
    /// Creates the application, loading persisted state from the default
    /// per-user store.
    pub fn new() -> Result<Self, AppError> {
        let store = Store::open()?;
        Ok(Self::with_parts(store, SystemClock))
    }
}

impl<C: Clock + Clone> App<C> {
    /// Creates the application over an explicit store and clock.
    pub fn with_parts(store: Store, clock: C) -> Self {
        let mut cache = StateCache::with_clock(store, clock.clone());
        let mut state = cache.load();
        let timer = PomodoroTimer::new(cache.load_pomodoro_config());
        let now = clock.now();

        // Startup continuity check; the result is delivered on the first tick.
        let mut pending_events = Vec::new();
        if let Some(event) = state.streak_data.check_continuity(now.date_naive()) {
            pending_events.push(AppEvent::Streak(event));
            cache.save(&state, false);
        }

        Self {
            state,
            timer,
            cache,
            clock,
            last_real_time_update: now,
            last_continuity_check: now,
            pending_events,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn timer(&self) -> &PomodoroTimer {
        &self.timer
    }

    /// Advances the application by one second. Returns the events the view
    /// layer should surface.
    pub fn tick(&mut self) -> Vec<AppEvent> {
        let now = self.clock.now();
        let mut events = std::mem::take(&mut self.pending_events);

        if let Some(completion) = self.timer.tick() {
            match completion {
                TimerCompletion::Work { minutes } => {
                    let streak_events = self
                        .state
                        .streak_data
                        .complete_work_interval(minutes, now.date_naive());
                    self.state.pomodoro.sessions.push(PomodoroSession {
                        date: now,
                        duration: minutes,
                        subject: None,
                    });
                    events.extend(streak_events.into_iter().map(AppEvent::Streak));
                    events.push(AppEvent::WorkIntervalComplete { minutes });
                }
                TimerCompletion::Break => {
                    events.push(AppEvent::BreakComplete);
                    // Auto-started work begins a fresh study session.
                    if self.timer.is_running() && !self.timer.is_break() {
                        self.state.streak_data.start_session(now);
                    }
                }
            }
            if !self.cache.save(&self.state, true) {
                events.push(AppEvent::SaveFailed);
            }
        }

        if now - self.last_real_time_update >= Duration::seconds(REAL_TIME_UPDATE_SECS) {
            self.last_real_time_update = now;
            self.state.streak_data.update_real_time(now);
        }

        if now - self.last_continuity_check >= Duration::seconds(CONTINUITY_CHECK_SECS) {
            self.last_continuity_check = now;
            if let Some(event) = self.state.streak_data.check_continuity(now.date_naive()) {
                events.push(AppEvent::Streak(event));
                self.cache.save(&self.state, false);
            }
        }

        if !self.cache.maybe_flush() {
            events.push(AppEvent::SaveFailed);
        }
        events
    }

    /// Starts the timer; entering work mode opens a study session.
    pub fn start_timer(&mut self) {
        if self.timer.start() && !self.timer.is_break() {
            let now = self.clock.now();
            self.state.streak_data.start_session(now);
            self.cache.save(&self.state, false);
        }
    }

    /// Pauses the timer; pausing out of work mode ends the study session and
    /// commits its elapsed whole minutes.
    pub fn pause_timer(&mut self) -> Vec<AppEvent> {
        let was_work = !self.timer.is_break();
        if !self.timer.pause() {
            return Vec::new();
        }
        let mut events = Vec::new();
        if was_work {
            let now = self.clock.now();
            events.extend(
                self.state
                    .streak_data
                    .end_session(now)
                    .into_iter()
                    .map(AppEvent::Streak),
            );
        }
        self.cache.save(&self.state, false);
        events
    }

    /// Stops the timer, ends any active session, and restores the configured
    /// duration for the current mode.
    pub fn reset_timer(&mut self) -> Vec<AppEvent> {
        self.timer.reset();
        let now = self.clock.now();
        let events: Vec<AppEvent> = self
            .state
            .streak_data
            .end_session(now)
            .into_iter()
            .map(AppEvent::Streak)
            .collect();
        self.cache.save(&self.state, false);
        events
    }

    /// Sets the daily study goal, rejecting out-of-range values.
    pub fn set_daily_goal(&mut self, minutes: u32) -> Result<(), StreakError> {
        self.state.streak_data.set_daily_goal(minutes)?;
        self.cache.save(&self.state, false);
        Ok(())
    }

    /// Replaces the timer configuration after validation and persists it
    /// under its own storage key.
    pub fn update_pomodoro_config(&mut self, config: PomodoroConfig) -> Result<(), TimerError> {
        self.timer.set_config(config)?;
        self.cache.save_pomodoro_config(self.timer.config());
        Ok(())
    }

    /// Display snapshot for the streak panel.
    pub fn streak_stats(&self) -> StreakStats {
        self.state.streak_data.streak_stats(self.clock.today())
    }

    /// Schedules a deferred save of the current state.
    pub fn save_data(&mut self) -> bool {
        self.cache.save(&self.state, false)
    }

    /// Flushes everything synchronously. Call on shutdown, where no further
    /// ticks are guaranteed.
    pub fn shutdown(&mut self) -> bool {
        self.cache.save(&self.state, true)
    }
}
