use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{Day, Event};

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIME_FORMAT: &str = "%H:%M:%S";

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// The date `yesterday` stands for, relative to `today`.
pub fn previous_day(today: NaiveDate) -> Option<NaiveDate> {
    today.pred_opt()
}

/// The two retained buckets, each newest first.
///
/// This is also the on-disk layout: an object with exactly the keys `today`
/// and `yesterday`. Missing keys load as empty buckets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Store {
    #[serde(default)]
    pub today: Vec<Event>,
    #[serde(default)]
    pub yesterday: Vec<Event>,
}

impl Store {
    pub fn bucket(&self, day: Day) -> &[Event] {
        match day {
            Day::Today => &self.today,
            Day::Yesterday => &self.yesterday,
        }
    }

    fn bucket_mut(&mut self, day: Day) -> &mut Vec<Event> {
        match day {
            Day::Today => &mut self.today,
            Day::Yesterday => &mut self.yesterday,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.today.is_empty() && self.yesterday.is_empty()
    }

    /// Bring the buckets in line with `current`.
    ///
    /// If the newest event in `today` is from another date, the whole of
    /// `today` replaces `yesterday`. Then `yesterday` keeps only events dated
    /// exactly one day before `current`. Only a single day boundary is
    /// handled: events that skipped more than one day are dropped by the
    /// filter, never cascaded.
    ///
    /// Returns whether anything changed.
    pub fn roll_over(&mut self, current: NaiveDate) -> bool {
        let today = format_date(current);
        let mut changed = false;

        // An undated newest entry counts as today's.
        if let Some(newest) = self.today.first() {
            if !newest.date.is_empty() && newest.date != today {
                self.yesterday = std::mem::take(&mut self.today);
                changed = true;
            }
        }

        let yesterday = previous_day(current).map(format_date);
        let before = self.yesterday.len();
        self.yesterday
            .retain(|event| Some(&event.date) == yesterday.as_ref());

        changed || self.yesterday.len() != before
    }

    /// Insert `event` at the head of `today`, evicting from the tail first so
    /// the bucket never exceeds `capacity`.
    ///
    /// Eviction truncates to `capacity - 1` before the insert, so the new
    /// event is always kept. A capacity of zero behaves like one.
    pub fn push_today(&mut self, event: Event, capacity: usize) {
        let keep = capacity.saturating_sub(1);
        if self.today.len() > keep {
            self.today.truncate(keep);
        }
        self.today.insert(0, event);
    }

    /// Empty one bucket, returning how many events it held.
    pub fn clear(&mut self, day: Day) -> usize {
        let bucket = self.bucket_mut(day);
        let count = bucket.len();
        bucket.clear();
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    fn event(title: &str, on: NaiveDate) -> Event {
        Event {
            kind: "motion".to_string(),
            title: title.to_string(),
            text: "seen".to_string(),
            image: None,
            timestamp: "12:00:00".to_string(),
            date: format_date(on),
        }
    }

    #[test]
    fn roll_over_on_empty_store_is_a_no_op() {
        let mut store = Store::default();
        assert!(!store.roll_over(date(10)));
        assert!(store.is_empty());
    }

    #[test]
    fn roll_over_only_looks_at_the_newest_event() {
        // An older entry from a previous day under a current newest entry
        // does not trigger migration.
        let mut store = Store {
            today: vec![event("new", date(10)), event("old", date(9))],
            yesterday: vec![],
        };

        assert!(!store.roll_over(date(10)));
        assert_eq!(store.today.len(), 2);
    }

    #[test]
    fn roll_over_treats_an_undated_newest_event_as_today() {
        let mut undated = event("legacy", date(10));
        undated.date.clear();
        let mut store = Store {
            today: vec![undated, event("new", date(10))],
            yesterday: vec![],
        };

        assert!(!store.roll_over(date(10)));
        assert_eq!(store.today.len(), 2);
    }

    #[test]
    fn roll_over_drops_stale_yesterday_without_today_events() {
        let mut store = Store {
            today: vec![],
            yesterday: vec![event("stale", date(7))],
        };

        assert!(store.roll_over(date(10)));
        assert!(store.yesterday.is_empty());
    }

    #[test]
    fn push_today_with_zero_capacity_keeps_the_new_event() {
        let mut store = Store::default();
        store.push_today(event("a", date(10)), 0);
        store.push_today(event("b", date(10)), 0);

        assert_eq!(store.today.len(), 1);
        assert_eq!(store.today[0].title, "b");
    }

    #[test]
    fn persisted_layout_has_both_keys() {
        let json = serde_json::to_value(Store::default()).unwrap();
        assert_eq!(json, serde_json::json!({ "today": [], "yesterday": [] }));
    }

    #[test]
    fn missing_keys_load_as_empty_buckets() {
        let store: Store = serde_json::from_str("{}").unwrap();
        assert!(store.is_empty());
    }
}
