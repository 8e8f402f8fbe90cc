//! Cached persistence layer over [`Store`].
//!
//! Serves reads from an in-memory copy for up to five seconds and coalesces
//! bursts of writes into a single deferred store write. There are no internal
//! timers: the owner calls [`StateCache::maybe_flush`] periodically and
//! [`StateCache::force_save`] on shutdown, with time injected through
//! [`Clock`].
//!
//! Failure contract: nothing here panics or returns an error to the caller.
//! A malformed persisted record degrades to a fresh default state, and a
//! failed write reports `false` so the embedder can notify the user; in both
//! cases the in-memory state stays correct.

use chrono::{DateTime, Duration, Local};
use tracing::{error, warn};

use crate::clock::{Clock, SystemClock};
use crate::models::{AppState, PomodoroConfig};
use crate::storage::{Store, KEY_APP_STATE, KEY_POMODORO_CONFIG};

/// How long a cached read stays fresh.
pub const LOAD_CACHE_TTL_MS: i64 = 5_000;
/// How long a deferred write waits for further mutations to coalesce.
pub const SAVE_DEBOUNCE_MS: i64 = 500;

/// Deferred-write scheduler state. At most one write is ever pending.
#[derive(Debug, Clone, Copy, PartialEq)]
enum SaveState {
    Idle,
    Scheduled { due: DateTime<Local> },
}

pub struct StateCache<C: Clock = SystemClock> {
    store: Store,
    clock: C,
    cached: Option<AppState>,
    fetched_at: Option<DateTime<Local>>,
    save_state: SaveState,
}

impl StateCache<SystemClock> {
    pub fn new(store: Store) -> Self {
        Self::with_clock(store, SystemClock)
    }
}

impl<C: Clock> StateCache<C> {
    pub fn with_clock(store: Store, clock: C) -> Self {
        Self {
            store,
            clock,
            cached: None,
            fetched_at: None,
            save_state: SaveState::Idle,
        }
    }

    /// Returns the application state, served from the in-memory copy if it was
    /// fetched within the last [`LOAD_CACHE_TTL_MS`].
    ///
    /// Callers must treat the result as a snapshot that may be up to five
    /// seconds stale; use [`StateCache::reload`] after a known external
    /// mutation.
    pub fn load(&mut self) -> AppState {
        let now = self.clock.now();
        if let (Some(cached), Some(at)) = (&self.cached, self.fetched_at) {
            if now - at < Duration::milliseconds(LOAD_CACHE_TTL_MS) {
                return cached.clone();
            }
        }

        let state = match self.store.get::<AppState>(KEY_APP_STATE) {
            Ok(Some(state)) => state,
            Ok(None) => AppState::default(),
            Err(err) => {
                warn!("discarding unreadable app state record: {err}");
                AppState::default()
            }
        };

        self.cached = Some(state.clone());
        self.fetched_at = Some(now);
        state
    }

    /// Discards the cached copy and reads the store again.
    pub fn reload(&mut self) -> AppState {
        self.fetched_at = None;
        self.load()
    }

    /// Records `data` as the current state. With `immediate` the store is
    /// written through now (cancelling any pending deferred write); otherwise
    /// a single deferred write is armed [`SAVE_DEBOUNCE_MS`] in the future,
    /// and further saves inside that window just replace the payload.
    ///
    /// Returns `false` only when an immediate write fails.
    pub fn save(&mut self, data: &AppState, immediate: bool) -> bool {
        let now = self.clock.now();
        self.cached = Some(data.clone());
        self.fetched_at = Some(now);

        if immediate {
            self.save_state = SaveState::Idle;
            return self.write_through();
        }

        if self.save_state == SaveState::Idle {
            self.save_state = SaveState::Scheduled {
                due: now + Duration::milliseconds(SAVE_DEBOUNCE_MS),
            };
        }
        true
    }

    /// Writes the pending deferred save if its window has elapsed. Call this
    /// from the owner's periodic tick.
    pub fn maybe_flush(&mut self) -> bool {
        if let SaveState::Scheduled { due } = self.save_state {
            if self.clock.now() >= due {
                self.save_state = SaveState::Idle;
                return self.write_through();
            }
        }
        true
    }

    /// Synchronously flushes any pending deferred write. Invoked on shutdown,
    /// where no further ticks are guaranteed.
    pub fn force_save(&mut self) -> bool {
        if matches!(self.save_state, SaveState::Scheduled { .. }) {
            self.save_state = SaveState::Idle;
            return self.write_through();
        }
        true
    }

    pub fn has_pending_save(&self) -> bool {
        matches!(self.save_state, SaveState::Scheduled { .. })
    }

    fn write_through(&mut self) -> bool {
        let Some(cached) = &self.cached else {
            return true;
        };
        match self.store.set(KEY_APP_STATE, cached) {
            Ok(()) => true,
            Err(err) => {
                error!("failed to persist app state: {err}");
                false
            }
        }
    }

    /// Loads the pomodoro config, falling back to defaults if absent or
    /// unreadable. Config records are small and written rarely, so they are
    /// not cached or coalesced.
    pub fn load_pomodoro_config(&self) -> PomodoroConfig {
        match self.store.get::<PomodoroConfig>(KEY_POMODORO_CONFIG) {
            Ok(Some(config)) => config,
            Ok(None) => PomodoroConfig::default(),
            Err(err) => {
                warn!("discarding unreadable pomodoro config record: {err}");
                PomodoroConfig::default()
            }
        }
    }

    /// Writes the pomodoro config through immediately.
    pub fn save_pomodoro_config(&self, config: &PomodoroConfig) -> bool {
        match self.store.set(KEY_POMODORO_CONFIG, config) {
            Ok(()) => true,
            Err(err) => {
                error!("failed to persist pomodoro config: {err}");
                false
            }
        }
    }
}
