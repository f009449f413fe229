//! FeedClient against a live server on an ephemeral port.

use std::ops::ControlFlow;
use std::sync::Arc;
use std::time::Duration;

use activity_feed::api::create_router;
use activity_feed::cli::{self, DayCount};
use activity_feed::client::{ClientError, FeedClient};
use activity_feed::models::*;
use activity_feed::service::ActivityService;
use activity_feed::store::{EventStore, LogFile, ManualClock};
use chrono::NaiveDate;
use tempfile::TempDir;

async fn spawn_server() -> (FeedClient, TempDir) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let date = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
    let clock = Arc::new(ManualClock::at(date, 18, 0, 0));
    let file = LogFile::in_dir(dir.path(), Duration::from_secs(5));
    let store = EventStore::open(file, clock, 100).await;
    let app = create_router(ActivityService::new(Arc::new(store), 0));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind");
    let addr = listener.local_addr().expect("No local address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Server failed");
    });

    let client = FeedClient::new(format!("http://{}/", addr)).expect("Failed to build client");
    (client, dir)
}

fn input(title: &str) -> CreateEventInput {
    CreateEventInput {
        kind: "motion".to_string(),
        title: title.to_string(),
        text: "Person detected".to_string(),
        ..Default::default()
    }
}

#[tokio::test]
async fn status_reports_ok() {
    let (client, _dir) = spawn_server().await;

    let status = client.status().await.unwrap();

    assert_eq!(status.status, "ok");
}

#[tokio::test]
async fn add_event_then_list_today() {
    let (client, _dir) = spawn_server().await;

    let event = client.add_event(&input("Front door")).await.unwrap();
    let today = client.events(Day::Today).await.unwrap();

    assert_eq!(event.date, "2024-03-10");
    assert_eq!(today.count, 1);
    assert_eq!(today.events, vec![event]);
}

#[tokio::test]
async fn empty_field_is_a_bad_request() {
    let (client, _dir) = spawn_server().await;

    let err = client.add_event(&input("")).await.unwrap_err();

    assert!(matches!(err, ClientError::BadRequest(_)));
}

#[tokio::test]
async fn clear_reports_count_and_rejects_unknown_day() {
    let (client, _dir) = spawn_server().await;
    client.add_event(&input("a")).await.unwrap();

    let result = client.clear("today").await.unwrap();
    assert_eq!(result.count, 1);
    assert_eq!(result.cleared, Day::Today);

    let err = client.clear("lastweek").await.unwrap_err();
    assert!(matches!(err, ClientError::BadRequest(_)));
}

#[tokio::test]
async fn poll_counts_covers_both_days() {
    let (client, _dir) = spawn_server().await;
    client.add_event(&input("a")).await.unwrap();

    let counts = cli::poll_counts(&client).await.unwrap();

    assert_eq!(
        counts,
        vec![
            DayCount {
                day: Day::Today,
                date: "2024-03-10".to_string(),
                count: 1
            },
            DayCount {
                day: Day::Yesterday,
                date: "2024-03-09".to_string(),
                count: 0
            },
        ]
    );
}

#[tokio::test]
async fn watch_reports_new_events() {
    let (client, _dir) = spawn_server().await;
    let poster = client.clone();

    let mut seen = Vec::new();
    let watching = cli::watch(&client, Duration::from_millis(20), |count| {
        seen.push(count.clone());
        if count.day == Day::Today && count.count == 1 {
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    });
    let posting = async {
        tokio::time::sleep(Duration::from_millis(300)).await;
        poster.add_event(&input("a")).await.unwrap();
    };

    tokio::time::timeout(Duration::from_secs(5), async {
        tokio::join!(watching, posting);
    })
    .await
    .expect("watch never saw the new event");

    assert_eq!(seen[0].day, Day::Today);
    assert_eq!(seen[0].count, 0);
    assert_eq!(seen.last().map(|c| c.count), Some(1));
}
