//! The two-day event log.
//!
//! [`EventStore`] owns the only mutable state in the service: a [`Store`] of
//! two buckets, `today` and `yesterday`. Every operation holds one lock for
//! its whole rollover, mutate and persist cycle, so concurrent requests never
//! observe a half-applied rollover or evict from a stale length.

mod buckets;
mod clock;
mod file;

use std::sync::Arc;

use chrono::NaiveDate;
use tokio::sync::Mutex;

pub use buckets::{format_date, previous_day, Store, DATE_FORMAT, TIME_FORMAT};
pub use clock::{Clock, ManualClock, SystemClock};
pub use file::{LogFile, EVENTS_FILE};

use crate::error::Result;
use crate::models::{CreateEventInput, Day, DayEvents, Event};

/// Default number of events kept in `today`.
pub const DEFAULT_CAPACITY: usize = 100;

struct State {
    store: Store,
    /// In-memory changes that have not reached disk yet.
    dirty: bool,
}

pub struct EventStore {
    file: LogFile,
    clock: Arc<dyn Clock>,
    capacity: usize,
    state: Mutex<State>,
}

impl EventStore {
    /// Load the persisted log and bring it up to date with the clock.
    pub async fn open(file: LogFile, clock: Arc<dyn Clock>, capacity: usize) -> Self {
        let store = file.load().await;
        let event_store = Self {
            file,
            clock,
            capacity,
            state: Mutex::new(State {
                store,
                dirty: false,
            }),
        };

        {
            let mut state = event_store.state.lock().await;
            let today = event_store.clock.today();
            event_store.roll_over(&mut state, today).await;
        }

        event_store
    }

    /// Run the day rollover check on its own.
    pub async fn refresh(&self) {
        let mut state = self.state.lock().await;
        let today = self.clock.today();
        self.roll_over(&mut state, today).await;
    }

    /// Stamp and store a new event at the head of `today`.
    ///
    /// A failed write is logged, not returned: the event is still in memory
    /// and the next operation retries the write.
    pub async fn append(&self, input: CreateEventInput) -> Event {
        let mut state = self.state.lock().await;
        // One clock read: the rollover check and the stamp must agree on the date.
        let now = self.clock.now();
        self.roll_over(&mut state, now.date()).await;

        let event = Event {
            kind: input.kind,
            title: input.title,
            text: input.text,
            image: input.image,
            timestamp: now.format(TIME_FORMAT).to_string(),
            date: now.format(DATE_FORMAT).to_string(),
        };

        state.store.push_today(event.clone(), self.capacity);
        state.dirty = true;
        tracing::info!(kind = %event.kind, title = %event.title, "Event added");

        self.persist(&mut state).await;
        event
    }

    /// Contents of one bucket, newest first.
    pub async fn query(&self, day: Day) -> DayEvents {
        let mut state = self.state.lock().await;
        let today = self.clock.today();
        self.roll_over(&mut state, today).await;

        let date = match day {
            Day::Today => format_date(today),
            Day::Yesterday => previous_day(today).map(format_date).unwrap_or_default(),
        };
        let events = state.store.bucket(day).to_vec();

        DayEvents {
            date,
            count: events.len(),
            events,
        }
    }

    /// Empty one bucket without a rollover check, returning the prior count.
    pub async fn clear(&self, day: Day) -> usize {
        let mut state = self.state.lock().await;

        let count = state.store.clear(day);
        state.dirty = true;
        tracing::info!(day = %day, count, "Cleared events");

        self.persist(&mut state).await;
        count
    }

    /// Write any unsaved changes, reporting the failure if there is one.
    pub async fn flush(&self) -> Result<()> {
        let mut state = self.state.lock().await;
        if !state.dirty {
            return Ok(());
        }
        self.file.save(&state.store).await?;
        state.dirty = false;
        Ok(())
    }

    /// A copy of the current buckets without a rollover check.
    pub async fn snapshot(&self) -> Store {
        self.state.lock().await.store.clone()
    }

    async fn roll_over(&self, state: &mut State, today: NaiveDate) {
        if state.store.roll_over(today) {
            tracing::info!(
                date = %format_date(today),
                yesterday = state.store.yesterday.len(),
                "Rolled over to a new day"
            );
            state.dirty = true;
        }
        self.persist(state).await;
    }

    async fn persist(&self, state: &mut State) {
        if !state.dirty {
            return;
        }
        match self.file.save(&state.store).await {
            Ok(()) => state.dirty = false,
            Err(e) => tracing::error!(
                path = %self.file.path().display(),
                "Error saving events, keeping them in memory: {}",
                e
            ),
        }
    }
}
