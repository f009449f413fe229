//! Client-side helpers behind the `show` and `watch` subcommands.

use std::ops::ControlFlow;
use std::time::Duration;

use crate::client::{ClientError, FeedClient};
use crate::models::*;

/// Render one day's events as plain text, newest first.
///
/// ```text
/// today (2024-03-10): 2 events
///   08:15:00  [motion] Front door - Person detected (/local/daf_1.jpg)
///   07:02:11  [door] Garage - Opened
/// ```
pub fn render_day(day: Day, events: &DayEvents) -> String {
    let noun = if events.count == 1 { "event" } else { "events" };
    let mut output = format!("{} ({}): {} {}\n", day, events.date, events.count, noun);

    for event in &events.events {
        output.push_str(&format!(
            "  {}  [{}] {} - {}",
            event.timestamp, event.kind, event.title, event.text
        ));
        if let Some(image) = &event.image {
            output.push_str(&format!(" ({})", image));
        }
        output.push('\n');
    }

    output
}

/// Count of one bucket as seen by a poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayCount {
    pub day: Day,
    pub date: String,
    pub count: usize,
}

/// Fetch the counts of both days.
pub async fn poll_counts(client: &FeedClient) -> Result<Vec<DayCount>, ClientError> {
    let mut counts = Vec::with_capacity(Day::ALL.len());
    for day in Day::ALL {
        let events = client.events(day).await?;
        counts.push(DayCount {
            day,
            date: events.date,
            count: events.count,
        });
    }
    Ok(counts)
}

/// Entries of `next` that differ from the matching day in `prev`.
pub fn changed_counts(prev: &[DayCount], next: &[DayCount]) -> Vec<DayCount> {
    next.iter()
        .filter(|count| !prev.contains(count))
        .cloned()
        .collect()
}

/// Poll both days every `interval` and report changed counts.
///
/// The first successful poll reports every day. Failed polls are logged and
/// retried on the next tick. Returns when `on_change` breaks.
pub async fn watch<F>(client: &FeedClient, interval: Duration, mut on_change: F)
where
    F: FnMut(&DayCount) -> ControlFlow<()>,
{
    let mut ticker = tokio::time::interval(interval);
    let mut last: Vec<DayCount> = Vec::new();

    loop {
        ticker.tick().await;

        let counts = match poll_counts(client).await {
            Ok(counts) => counts,
            Err(e) => {
                tracing::warn!(url = client.base_url(), "Error fetching counts: {}", e);
                continue;
            }
        };

        for count in changed_counts(&last, &counts) {
            if on_change(&count).is_break() {
                return;
            }
        }
        last = counts;
    }
}
