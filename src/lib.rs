//! estudia-core - study-tracking engine.
//!
//! The in-process core behind a study-tracking application: cached
//! persistence, a daily study-streak engine, and a pomodoro timer state
//! machine. There is no rendering or notification display here; the embedder
//! drives [`App::tick`] once per second, calls the timer/session entry
//! points, and renders the state and [`AppEvent`]s it gets back.

pub mod app;
pub mod cache;
pub mod clock;
pub mod models;
pub mod storage;
pub mod streak;
pub mod timer;

pub use app::{App, AppError, AppEvent};
pub use cache::StateCache;
pub use clock::{Clock, ManualClock, SystemClock};
pub use models::{AppState, PomodoroConfig, StreakData, StreakDay};
pub use storage::{Store, StoreError};
pub use streak::{StreakError, StreakEvent, StreakStats};
pub use timer::{PomodoroTimer, TimerCompletion, TimerError};
