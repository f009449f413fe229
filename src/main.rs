use std::ops::ControlFlow;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use activity_feed::capture::HttpSnapshot;
use activity_feed::client::FeedClient;
use activity_feed::config::{clamp_scan_interval, FeedConfig};
use activity_feed::models::{CreateEventInput, Day};
use activity_feed::service::ActivityService;
use activity_feed::store::{Clock, EventStore, SystemClock};
use activity_feed::{api, cli};

#[derive(Parser)]
#[command(name = "activity-feed")]
#[command(about = "Two-day rolling activity log")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the activity feed server
    Serve {
        /// Port for HTTP API (overrides PORT)
        #[arg(short, long)]
        port: Option<u16>,

        /// Directory holding events.json (overrides DAF_DATA_DIR)
        #[arg(short, long)]
        data_dir: Option<PathBuf>,

        /// Maximum events kept for today (overrides DAF_MAX_EVENTS)
        #[arg(short = 'n', long)]
        max_events: Option<usize>,
    },
    /// Submit an event to a running server
    Post {
        /// Event category, e.g. motion
        #[arg(short = 't', long = "type")]
        kind: String,
        #[arg(long)]
        title: String,
        #[arg(long)]
        text: String,
        /// Image path or URL
        #[arg(long)]
        image: Option<String>,
        /// Camera snapshot URL to capture when no image is given
        #[arg(long)]
        camera: Option<String>,
    },
    /// Print the events of one day
    Show {
        /// today or yesterday
        #[arg(default_value = "today")]
        day: String,
    },
    /// Clear the events of one day
    Clear {
        /// today or yesterday
        day: String,
    },
    /// Poll both days and print count changes
    Watch {
        /// Seconds between polls (overrides DAF_SCAN_INTERVAL)
        #[arg(short, long)]
        interval: Option<u64>,
    },
}

/// Initialize tracing with output to stderr (client commands) or stdout
fn init_tracing(use_stderr: bool) {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG")
            .unwrap_or_else(|_| "activity_feed=debug,tower_http=debug".into()),
    );

    if use_stderr {
        // Client mode: keep stdout for command output
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

async fn serve(config: FeedConfig) -> anyhow::Result<()> {
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let file = config.log_file()?;
    tracing::info!(
        path = %file.path().display(),
        max_events = config.max_events,
        "Opening event log"
    );

    let store = Arc::new(EventStore::open(file, clock.clone(), config.max_events).await);
    let mut service = ActivityService::new(store, config.port);

    if let Some(dir) = &config.snapshot_dir {
        let capture = HttpSnapshot::new(dir, config.snapshot_prefix.clone(), clock)?;
        service = service.with_capture(Arc::new(capture));
        tracing::info!(dir = %dir.display(), "Camera snapshots enabled");
    }

    let app = api::create_router(service);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Daily Activity Feed API listening on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}

fn parse_day(day: &str) -> anyhow::Result<Day> {
    Day::parse(day).ok_or_else(|| anyhow::anyhow!("Day must be 'today' or 'yesterday'"))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    let use_stderr = !matches!(args.command, None | Some(Commands::Serve { .. }));
    init_tracing(use_stderr);

    let mut config = FeedConfig::from_env();

    match args.command {
        Some(Commands::Serve {
            port,
            data_dir,
            max_events,
        }) => {
            if let Some(port) = port {
                config.port = port;
            }
            if let Some(dir) = data_dir {
                config.data_dir = Some(dir);
            }
            if let Some(max) = max_events {
                config.max_events = max.max(1);
            }
            serve(config).await?;
        }
        Some(Commands::Post {
            kind,
            title,
            text,
            image,
            camera,
        }) => {
            let client = FeedClient::new(&config.url)?;
            let event = client
                .add_event(&CreateEventInput {
                    kind,
                    title,
                    text,
                    image,
                    camera,
                })
                .await?;
            println!("{}", serde_json::to_string_pretty(&event)?);
        }
        Some(Commands::Show { day }) => {
            let day = parse_day(&day)?;
            let client = FeedClient::new(&config.url)?;
            let events = client.events(day).await?;
            print!("{}", cli::render_day(day, &events));
        }
        Some(Commands::Clear { day }) => {
            let client = FeedClient::new(&config.url)?;
            let result = client.clear(&day).await?;
            println!("Cleared {} events from {}", result.count, result.cleared);
        }
        Some(Commands::Watch { interval }) => {
            let interval = interval
                .map(clamp_scan_interval)
                .unwrap_or(config.scan_interval);
            let client = FeedClient::new(&config.url)?;
            tracing::info!(url = client.base_url(), ?interval, "Watching activity feed");

            cli::watch(&client, interval, |count| {
                println!("{} ({}): {}", count.day, count.date, count.count);
                ControlFlow::Continue(())
            })
            .await;
        }
        None => {
            serve(config).await?;
        }
    }

    Ok(())
}
