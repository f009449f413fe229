use std::sync::Mutex;

use chrono::{Local, NaiveDate, NaiveDateTime, TimeDelta};

/// Source of local wall-clock time.
///
/// Every date and timestamp in the feed comes from one `Clock`, so pinning it
/// in tests pins the whole rollover behaviour.
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;

    fn today(&self) -> NaiveDate {
        self.now().date()
    }
}

/// The system clock in the local time zone.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<NaiveDateTime>,
}

impl ManualClock {
    pub fn new(now: NaiveDateTime) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    /// Start at midnight plus `hms` on the given date.
    pub fn at(date: NaiveDate, hour: u32, min: u32, sec: u32) -> Self {
        let time = chrono::NaiveTime::from_hms_opt(hour, min, sec).unwrap_or_default();
        Self::new(date.and_time(time))
    }

    pub fn advance(&self, delta: TimeDelta) {
        let mut now = self.now.lock().expect("clock lock poisoned");
        *now += delta;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> NaiveDateTime {
        *self.now.lock().expect("clock lock poisoned")
    }
}
