//! Data models for the estudia core.
//!
//! Everything in this module is persisted as JSON under the storage keys
//! described in [`crate::storage`]. Field names are serialized in camelCase so
//! the records stay compatible with payloads written by the original web
//! client.

use chrono::{DateTime, Local, NaiveDate};
use serde::{Deserialize, Serialize};

/// Inclusive bounds for the daily study goal, in minutes.
pub const MIN_DAILY_GOAL_MINS: u32 = 15;
pub const MAX_DAILY_GOAL_MINS: u32 = 480;
pub const DEFAULT_DAILY_GOAL_MINS: u32 = 60;

/// Floor required to preserve (but not increment) a streak.
pub const DEFAULT_MINIMUM_DAILY_MINS: u32 = 30;

/// Bounds for pomodoro work/break durations, in minutes. The work floor
/// matches the streak minimum: a full work interval must always be able to
/// keep a streak alive.
pub const MIN_WORK_MINS: u32 = 30;
pub const MAX_WORK_MINS: u32 = 90;
pub const MIN_BREAK_MINS: u32 = 1;
pub const MAX_BREAK_MINS: u32 = 30;

pub const DEFAULT_WORK_MINS: u32 = 25;
pub const DEFAULT_BREAK_MINS: u32 = 5;

/// Root persisted object. Loaded once at startup, mutated in place, and
/// persisted wholesale on every save.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppState {
    pub subjects: Vec<Subject>,
    pub reminders: Vec<Reminder>,
    pub streak_data: StreakData,
    pub stats: Stats,
    pub pomodoro: PomodoroLog,
}

/// A course/subject record. The core persists these opaquely; all CRUD and
/// rendering lives in the embedding application.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Subject {
    pub id: String,
    pub name: String,
    pub professor: String,
    pub schedule: String,
    pub color: String,
    pub notes: String,
}

/// A reminder record, persisted opaquely like [`Subject`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Reminder {
    pub id: String,
    pub title: String,
    pub date: Option<NaiveDate>,
    pub completed: bool,
}

/// Streak and daily study-time tracking state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StreakData {
    /// Consecutive qualifying days.
    pub current_streak: u32,
    /// Historical maximum of `current_streak`.
    pub best_streak: u32,
    /// Daily goal in minutes, bounded [15, 480].
    pub daily_goal: u32,
    /// Floor in minutes required to preserve a streak without incrementing it.
    pub minimum_daily_time: u32,
    /// Minutes durably committed today.
    pub today_study_time: u32,
    /// Live projection: `today_study_time` plus the in-progress session.
    /// Display only; never the permanent record.
    pub real_time_minutes: u32,
    /// Calendar day of the last recorded activity.
    pub last_study_date: Option<NaiveDate>,
    pub is_session_active: bool,
    pub session_start_time: Option<DateTime<Local>>,
    /// One entry per calendar day, insertion order chronological.
    pub streak_history: Vec<StreakDay>,
}

impl Default for StreakData {
    fn default() -> Self {
        Self {
            current_streak: 0,
            best_streak: 0,
            daily_goal: DEFAULT_DAILY_GOAL_MINS,
            minimum_daily_time: DEFAULT_MINIMUM_DAILY_MINS,
            today_study_time: 0,
            real_time_minutes: 0,
            last_study_date: None,
            is_session_active: false,
            session_start_time: None,
            streak_history: Vec::new(),
        }
    }
}

impl StreakData {
    /// Returns the history entry for the given day, if one has been recorded.
    pub fn history_entry(&self, date: NaiveDate) -> Option<&StreakDay> {
        self.streak_history.iter().find(|d| d.date == date)
    }

    pub(crate) fn history_entry_mut(&mut self, date: NaiveDate) -> Option<&mut StreakDay> {
        self.streak_history.iter_mut().find(|d| d.date == date)
    }
}

/// Per-day streak history record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StreakDay {
    pub date: NaiveDate,
    /// Minutes studied that day, as of the last goal evaluation.
    pub study_time: u32,
    pub goal_completed: bool,
    pub minimum_met: bool,
}

/// Legacy stats mirror. Injected with defaults on load and carried opaquely;
/// nothing in the core consults it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Stats {
    pub streak: LegacyStreak,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LegacyStreak {
    pub current: u32,
    pub longest: u32,
    pub last_date: Option<NaiveDate>,
}

/// Log of completed pomodoro work intervals.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PomodoroLog {
    pub sessions: Vec<PomodoroSession>,
}

/// One completed work interval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PomodoroSession {
    pub date: DateTime<Local>,
    /// Duration in minutes.
    pub duration: u32,
    #[serde(default)]
    pub subject: Option<String>,
}

/// User-configurable pomodoro timer settings, persisted independently from
/// [`AppState`] under its own storage key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PomodoroConfig {
    /// Work interval duration in minutes.
    pub work_duration: u32,
    /// Break interval duration in minutes.
    pub break_duration: u32,
    pub auto_start_break: bool,
    pub auto_start_work: bool,
    pub mode: TimerMode,
}

impl Default for PomodoroConfig {
    fn default() -> Self {
        Self {
            work_duration: DEFAULT_WORK_MINS,
            break_duration: DEFAULT_BREAK_MINS,
            auto_start_break: false,
            auto_start_work: false,
            mode: TimerMode::Simple,
        }
    }
}

/// Timer operating mode. Only `Simple` has dedicated behavior in the core;
/// `Advanced` is preserved for round-tripping configs that use it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerMode {
    #[default]
    Simple,
    Advanced,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_streak_data_defaults() {
        let data = StreakData::default();
        assert_eq!(data.current_streak, 0);
        assert_eq!(data.best_streak, 0);
        assert_eq!(data.daily_goal, 60);
        assert_eq!(data.minimum_daily_time, 30);
        assert_eq!(data.today_study_time, 0);
        assert_eq!(data.last_study_date, None);
        assert!(!data.is_session_active);
        assert!(data.streak_history.is_empty());
    }

    #[test]
    fn test_pomodoro_config_defaults() {
        let config = PomodoroConfig::default();
        assert_eq!(config.work_duration, 25);
        assert_eq!(config.break_duration, 5);
        assert!(!config.auto_start_break);
        assert!(!config.auto_start_work);
        assert_eq!(config.mode, TimerMode::Simple);
    }

    #[test]
    fn test_app_state_round_trips_camel_case() {
        let mut state = AppState::default();
        state.streak_data.current_streak = 3;
        state.streak_data.last_study_date = NaiveDate::from_ymd_opt(2024, 3, 1);

        let json = serde_json::to_string(&state).unwrap();
        assert!(json.contains("\"currentStreak\":3"));
        assert!(json.contains("\"streakData\""));
        assert!(json.contains("\"lastStudyDate\""));

        let back: AppState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, state);
    }

    #[test]
    fn test_missing_sub_objects_get_defaults() {
        // Older records may predate streakData/stats entirely.
        let state: AppState = serde_json::from_str(r#"{"subjects":[],"reminders":[]}"#).unwrap();
        assert_eq!(state.streak_data, StreakData::default());
        assert_eq!(state.stats, Stats::default());
        assert!(state.pomodoro.sessions.is_empty());
    }

    #[test]
    fn test_config_round_trips_mode() {
        let json = r#"{"workDuration":45,"breakDuration":10,"autoStartBreak":true,"mode":"advanced"}"#;
        let config: PomodoroConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.work_duration, 45);
        assert_eq!(config.break_duration, 10);
        assert!(config.auto_start_break);
        assert!(!config.auto_start_work);
        assert_eq!(config.mode, TimerMode::Advanced);
    }

    #[test]
    fn test_history_entry_lookup() {
        let mut data = StreakData::default();
        let day = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        data.streak_history.push(StreakDay {
            date: day,
            study_time: 45,
            goal_completed: false,
            minimum_met: true,
        });

        assert!(data.history_entry(day).is_some());
        assert_eq!(data.history_entry(day).unwrap().study_time, 45);
        let other = NaiveDate::from_ymd_opt(2024, 3, 2).unwrap();
        assert!(data.history_entry(other).is_none());
    }
}
