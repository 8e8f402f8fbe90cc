//! Streak engine: daily study-time accounting and streak continuity.
//!
//! All transitions are methods on [`StreakData`] taking explicit `now`/`today`
//! arguments, so the state machine has no hidden clock. Mutations that the
//! user should hear about return [`StreakEvent`] values; surfacing them is the
//! embedder's job.
//!
//! The per-day [`StreakDay`](crate::models::StreakDay) history entry is the
//! single source of truth for "already counted today" — multiple qualifying
//! events on the same day never double-increment the streak.

use chrono::{DateTime, Local, NaiveDate};
use thiserror::Error;

use crate::models::{StreakData, StreakDay, MAX_DAILY_GOAL_MINS, MIN_DAILY_GOAL_MINS};

#[derive(Error, Debug, PartialEq, Eq)]
pub enum StreakError {
    #[error(
        "daily goal must be between {MIN_DAILY_GOAL_MINS} and {MAX_DAILY_GOAL_MINS} minutes, got {0}"
    )]
    GoalOutOfRange(u32),
}

/// Signals emitted by streak mutations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreakEvent {
    /// Today's daily goal was reached for the first time.
    DailyGoalReached { goal: u32 },
    /// The current streak surpassed the previous best.
    NewBestStreak { best: u32 },
    /// The streak was reset after a missed day. Carries the length lost.
    StreakLost { lost: u32 },
}

/// Snapshot summary for display: counters plus a seven-day history window.
#[derive(Debug, Clone, PartialEq)]
pub struct StreakStats {
    pub current_streak: u32,
    pub best_streak: u32,
    pub today_study_time: u32,
    pub daily_goal: u32,
    /// Last seven days ending today, oldest first. Days without a history
    /// entry appear zeroed.
    pub weekly: Vec<StreakDay>,
    pub total_days_studied: usize,
}

impl StreakData {
    /// Marks a study session as started at `now`. A new calendar day zeroes
    /// today's counters first.
    pub fn start_session(&mut self, now: DateTime<Local>) {
        let today = now.date_naive();
        if self.last_study_date != Some(today) {
            self.today_study_time = 0;
            self.real_time_minutes = 0;
        }
        self.is_session_active = true;
        self.session_start_time = Some(now);
    }

    /// Ends the active session, committing the elapsed whole minutes if at
    /// least one has passed. Shorter sessions are discarded.
    pub fn end_session(&mut self, now: DateTime<Local>) -> Vec<StreakEvent> {
        if !self.is_session_active {
            return Vec::new();
        }
        let start = self.session_start_time.take();
        self.is_session_active = false;

        let Some(start) = start else {
            return Vec::new();
        };
        let minutes = elapsed_whole_minutes(start, now);
        if minutes < 1 {
            return Vec::new();
        }

        let events = self.record_study_time(minutes, now.date_naive());
        self.real_time_minutes = self.today_study_time;
        events
    }

    /// Commits `minutes` of study to `today` and re-evaluates the daily goal.
    pub fn record_study_time(&mut self, minutes: u32, today: NaiveDate) -> Vec<StreakEvent> {
        if self.last_study_date != Some(today) {
            self.today_study_time = 0;
            self.real_time_minutes = 0;
        }
        self.today_study_time += minutes;
        self.last_study_date = Some(today);
        self.check_goal_completion(today)
    }

    /// Commits a completed pomodoro work interval of `minutes`, ending the
    /// live session without an elapsed-time commit. The countdown's ticks are
    /// the time base for a full interval; committing wall-clock elapsed time
    /// on top would count the same interval twice.
    pub fn complete_work_interval(&mut self, minutes: u32, today: NaiveDate) -> Vec<StreakEvent> {
        self.is_session_active = false;
        self.session_start_time = None;
        let events = self.record_study_time(minutes, today);
        self.real_time_minutes = self.today_study_time;
        events
    }

    /// Recomputes the live projection of today's minutes while a session is
    /// active. Display only: `today_study_time` is untouched until the
    /// session ends.
    pub fn update_real_time(&mut self, now: DateTime<Local>) {
        if !self.is_session_active {
            return;
        }
        let Some(start) = self.session_start_time else {
            return;
        };
        let elapsed = elapsed_whole_minutes(start, now);
        let today = now.date_naive();
        self.real_time_minutes = if self.last_study_date == Some(today) {
            self.today_study_time + elapsed
        } else {
            elapsed
        };
    }

    /// Evaluates today's minutes against the goal and the streak minimum,
    /// updating counters and the per-day history entry.
    pub fn check_goal_completion(&mut self, today: NaiveDate) -> Vec<StreakEvent> {
        let mut events = Vec::new();
        let current = self.effective_minutes();
        let goal_completed = current >= self.daily_goal;
        let minimum_met = current >= self.minimum_daily_time;

        if goal_completed {
            let already_counted = self
                .history_entry(today)
                .map_or(false, |entry| entry.goal_completed);
            if !already_counted {
                self.current_streak += 1;
                if self.current_streak > self.best_streak {
                    self.best_streak = self.current_streak;
                    events.push(StreakEvent::NewBestStreak {
                        best: self.best_streak,
                    });
                }
                if let Some(entry) = self.history_entry_mut(today) {
                    entry.goal_completed = true;
                    entry.minimum_met = minimum_met;
                    entry.study_time = current;
                } else {
                    self.streak_history.push(StreakDay {
                        date: today,
                        study_time: current,
                        goal_completed: true,
                        minimum_met,
                    });
                }
                events.push(StreakEvent::DailyGoalReached {
                    goal: self.daily_goal,
                });
            }
        } else if minimum_met {
            // Qualifies for continuity without incrementing the streak.
            if let Some(entry) = self.history_entry_mut(today) {
                entry.minimum_met = true;
            } else {
                self.streak_history.push(StreakDay {
                    date: today,
                    study_time: current,
                    goal_completed: false,
                    minimum_met: true,
                });
            }
        }

        events
    }

    /// Decides whether the streak survived to `today`. Run at startup and
    /// periodically. The streak is lost when yesterday's entry failed the
    /// minimum, or when the gap since the last study day exceeds one day.
    pub fn check_continuity(&mut self, today: NaiveDate) -> Option<StreakEvent> {
        let Some(last) = self.last_study_date else {
            self.current_streak = 0;
            return None;
        };
        if last == today {
            return None;
        }

        let yesterday = today.pred_opt()?;
        if last == yesterday {
            let minimum_met = self
                .history_entry(yesterday)
                .map_or(false, |entry| entry.minimum_met);
            if minimum_met {
                return None;
            }
        }
        self.reset_streak()
    }

    /// Sets the daily goal, rejecting out-of-range values without touching
    /// the prior one.
    pub fn set_daily_goal(&mut self, minutes: u32) -> Result<(), StreakError> {
        if !(MIN_DAILY_GOAL_MINS..=MAX_DAILY_GOAL_MINS).contains(&minutes) {
            return Err(StreakError::GoalOutOfRange(minutes));
        }
        self.daily_goal = minutes;
        Ok(())
    }

    /// Builds a display snapshot with a seven-day history window.
    pub fn streak_stats(&self, today: NaiveDate) -> StreakStats {
        let mut weekly = Vec::with_capacity(7);
        for offset in (0..7).rev() {
            let date = today - chrono::Duration::days(offset);
            let day = self
                .history_entry(date)
                .cloned()
                .unwrap_or_else(|| StreakDay {
                    date,
                    ..StreakDay::default()
                });
            weekly.push(day);
        }

        StreakStats {
            current_streak: self.current_streak,
            best_streak: self.best_streak,
            today_study_time: self.today_study_time,
            daily_goal: self.daily_goal,
            weekly,
            total_days_studied: self.streak_history.len(),
        }
    }

    /// Minutes to evaluate against goal thresholds: the live projection while
    /// a session is active (never less than the committed total), otherwise
    /// the durable count.
    fn effective_minutes(&self) -> u32 {
        if self.is_session_active {
            self.real_time_minutes.max(self.today_study_time)
        } else {
            self.today_study_time
        }
    }

    fn reset_streak(&mut self) -> Option<StreakEvent> {
        if self.current_streak > 0 {
            let lost = self.current_streak;
            self.current_streak = 0;
            Some(StreakEvent::StreakLost { lost })
        } else {
            None
        }
    }
}

fn elapsed_whole_minutes(start: DateTime<Local>, end: DateTime<Local>) -> u32 {
    (end - start).num_minutes().max(0) as u32
}
