//! Time source abstraction.
//!
//! The cache scheduler and the app controller never read the wall clock
//! directly; they go through [`Clock`] so tests can drive time forward
//! without sleeping.

use chrono::{DateTime, Local};
use std::sync::{Arc, Mutex};

pub trait Clock {
    fn now(&self) -> DateTime<Local>;

    fn today(&self) -> chrono::NaiveDate {
        self.now().date_naive()
    }
}

/// Production clock reading the system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

impl<C: Clock + ?Sized> Clock for Arc<C> {
    fn now(&self) -> DateTime<Local> {
        (**self).now()
    }
}

/// Manually advanced clock for tests. Clone/share it with `Arc` so the test
/// keeps a handle while the component under test owns the clock.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Local>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Local>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    pub fn advance(&self, delta: chrono::Duration) {
        let mut now = self.now.lock().unwrap();
        *now += delta;
    }

    pub fn set(&self, at: DateTime<Local>) {
        *self.now.lock().unwrap() = at;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Local> {
        *self.now.lock().unwrap()
    }
}
