mod app;
mod config;
mod presenter;
mod store;
mod tasks;
mod theme;
mod ui;

use anyhow::Result;
use app::App;
use chrono::{Local, SecondsFormat, TimeZone};
use config::WidgetConfig;
use store::{Store, Task};
use theme::WidgetTheme;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();

    // ── tw seed ───────────────────────────────────────────────────────────────
    if args.get(1).map(|s| s.as_str()) == Some("seed") {
        return cmd_seed().await;
    }

    // ── tw dump ───────────────────────────────────────────────────────────────
    if args.get(1).map(|s| s.as_str()) == Some("dump") {
        return cmd_dump().await;
    }

    // ── tw (TUI) ──────────────────────────────────────────────────────────────
    run_tui().await
}

// ─── Seed command ─────────────────────────────────────────────────────────────

/// Fills the store with sample tasks so the widget can be tried without the
/// companion app. Covers every presentation rule: each priority slot, a
/// date-only deadline, a missing deadline, and one malformed due string.
async fn cmd_seed() -> Result<()> {
    // Logging to stderr so it doesn't interfere with terminal output
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cfg   = WidgetConfig::load()?;
    let path  = cfg.store_db_path();
    let store = Store::open(&path).await?;
    store.migrate().await?;

    let now    = Local::now();
    let offset = *now.offset();
    let today  = now.date_naive();
    let at = |h: u32, m: u32| {
        offset
            .from_local_datetime(&today.and_hms_opt(h, m, 0).unwrap())
            .unwrap()
            .to_rfc3339_opts(SecondsFormat::Millis, true)
    };

    let samples = vec![
        sample("Morning stand-up", "Workspace core team", Some(at(9, 0)), 1, false),
        sample("Ship widget build", "Upload to TestFlight", Some(at(18, 0)), 2, false),
        sample("Pay rent", "Transfer before the weekend", Some(at(0, 0)), 3, false),
        sample("Water the plants", "Kitchen and balcony", None, 4, true),
        // Malformed on purpose — renders the "F" data-quality flag.
        sample("Imported reminder", "Synced from the old app", Some("not-a-date".into()), 9, false),
    ];

    for t in &samples {
        store.upsert_task(t).await?;
    }

    println!("Seeded {} sample tasks into {}", samples.len(), path.display());
    println!("Run  tw  to open the widget.");
    Ok(())
}

fn sample(title: &str, description: &str, due: Option<String>, priority: i64, completed: bool) -> Task {
    Task {
        id: Uuid::new_v4().to_string(),
        title: title.to_owned(),
        description: description.to_owned(),
        due,
        priority,
        completed,
    }
}

// ─── Dump command ─────────────────────────────────────────────────────────────

/// Prints the raw task records as JSON, in widget order. Handy for chasing
/// down where an on-screen "F" came from.
async fn cmd_dump() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cfg   = WidgetConfig::load()?;
    let store = Store::open(&cfg.store_db_path()).await?;
    store.migrate().await?;

    let mut list = store.tasks_for_today().await?;
    tasks::sort_tasks(&mut list);
    println!("{}", serde_json::to_string_pretty(&list)?);
    Ok(())
}

// ─── TUI ─────────────────────────────────────────────────────────────────────

async fn run_tui() -> Result<()> {
    let log_dir = dirs::data_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .join("taskwidget");
    std::fs::create_dir_all(&log_dir)?;
    let file_appender = tracing_appender::rolling::daily(&log_dir, "taskwidget.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(non_blocking))
        .init();

    tracing::info!("Starting task widget");

    let cfg   = WidgetConfig::load().unwrap_or_default();
    let theme = WidgetTheme::load()?;
    let store = Store::open(&cfg.store_db_path()).await?;
    store.migrate().await?;

    let mut app = App::new(store, theme, cfg.refresh_interval()).await?;
    app.run().await?;
    Ok(())
}
