use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{Local, Months, NaiveDate};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use birthday_tracker::api::state::AppState;
use birthday_tracker::api::{build_router, cors_layer};
use birthday_tracker::config::AppConfig;
use birthday_tracker::entities::{self, SensorRegistry};
use birthday_tracker::models::EnrichedBirthday;
use birthday_tracker::notify::{LogObserver, WebhookObserver};
use birthday_tracker::service::{BirthdayEdit, BirthdayService, NewBirthday, ServiceError};
use birthday_tracker::storage::{JsonFileStore, StorageConfig};

#[derive(Parser)]
#[command(name = "birthday-tracker")]
#[command(about = "Birthday tracker with daily reminders")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./config.toml")]
    config: String,

    /// Data directory path (overrides the config file)
    #[arg(long)]
    data_dir: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a birthday
    Add {
        /// Person's name
        name: String,

        /// Date as D-M or D-M-Y
        date: String,

        /// Comma-separated days before the birthday to remind on
        #[arg(long)]
        reminder_days: Option<String>,

        #[arg(long)]
        notes: Option<String>,
    },

    /// Remove a birthday by ID
    Remove { id: String },

    /// Change fields of an existing birthday
    Edit {
        id: String,

        #[arg(long)]
        name: Option<String>,

        /// Date as D-M or D-M-Y
        #[arg(long)]
        date: Option<String>,

        #[arg(long)]
        reminder_days: Option<String>,

        #[arg(long)]
        notes: Option<String>,
    },

    /// Show one birthday
    Get {
        id: String,

        /// Reference date (YYYY-MM-DD, default: today)
        #[arg(long)]
        today: Option<String>,
    },

    /// List all birthdays, soonest first
    List {
        /// Reference date (YYYY-MM-DD, default: today)
        #[arg(long)]
        today: Option<String>,
    },

    /// Show birthdays as calendar events
    Calendar {
        /// Range start (YYYY-MM-DD, default: today)
        #[arg(long)]
        from: Option<String>,

        /// Range end, exclusive (YYYY-MM-DD, default: one year after start)
        #[arg(long)]
        to: Option<String>,

        /// Only the next upcoming event
        #[arg(long)]
        next: bool,

        /// Reference date for --next (YYYY-MM-DD, default: today)
        #[arg(long)]
        today: Option<String>,
    },

    /// Show the per-person days-until sensors
    Sensors {
        /// Reference date (YYYY-MM-DD, default: today)
        #[arg(long)]
        today: Option<String>,
    },

    /// Run the reminder check once and print what fires
    Check {
        /// Date to check (YYYY-MM-DD, default: today)
        #[arg(long)]
        today: Option<String>,
    },

    /// Start the API server and the daily reminder schedule
    Serve {
        /// Bind address (overrides the config file)
        #[arg(long)]
        host: Option<String>,

        /// Port number (overrides the config file)
        #[arg(long)]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load_or_default(Path::new(&cli.config))
        .with_context(|| format!("Failed to load config from {}", cli.config))?;
    if let Some(ref data_dir) = cli.data_dir {
        config.data_dir = PathBuf::from(data_dir);
    }
    if let Some(ref log_level) = cli.log_level {
        config.log_level = log_level.clone();
    }

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(cli.json_logs.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!cli.json_logs).then(tracing_subscriber::fmt::layer))
        .init();

    tracing::info!("Starting birthday-tracker v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Add {
            name,
            date,
            reminder_days,
            notes,
        } => {
            let mut service = load_service(&config).await?;
            let record = service
                .add(NewBirthday {
                    name,
                    date,
                    reminder_days_before: reminder_days,
                    notes,
                })
                .await?;
            print_json(&record)?;
        }
        Commands::Remove { id } => {
            let mut service = load_service(&config).await?;
            if !service.remove(&id).await? {
                return Err(ServiceError::NotFound(id).into());
            }
            println!("Removed {}", id);
        }
        Commands::Edit {
            id,
            name,
            date,
            reminder_days,
            notes,
        } => {
            let mut service = load_service(&config).await?;
            let record = service
                .edit(
                    &id,
                    BirthdayEdit {
                        name,
                        date,
                        reminder_days_before: reminder_days,
                        notes,
                    },
                )
                .await?;
            print_json(&record)?;
        }
        Commands::Get { id, today } => {
            let today = parse_date_arg("--today", today.as_deref())?;
            let service = load_service(&config).await?;
            let record = service
                .get(&id)
                .ok_or_else(|| ServiceError::NotFound(id.clone()))?;
            print_json(&EnrichedBirthday::from_record(&record, today))?;
        }
        Commands::List { today } => {
            let today = parse_date_arg("--today", today.as_deref())?;
            let service = load_service(&config).await?;
            print_json(&service.list(today))?;
        }
        Commands::Calendar {
            from,
            to,
            next,
            today,
        } => {
            let service = load_service(&config).await?;
            let records = service.records();
            if next {
                let today = parse_date_arg("--today", today.as_deref())?;
                print_json(&entities::next_event(&records, today))?;
            } else {
                let start = parse_date_arg("--from", from.as_deref())?;
                let end = match to.as_deref() {
                    Some(to) => parse_date(to).with_context(|| format!("Invalid --to: {}", to))?,
                    None => start
                        .checked_add_months(Months::new(12))
                        .context("Range end out of bounds")?,
                };
                print_json(&entities::events_between(&records, start, end))?;
            }
        }
        Commands::Sensors { today } => {
            let today = parse_date_arg("--today", today.as_deref())?;
            let service = load_service(&config).await?;
            let sensors = SensorRegistry::from_records(&service.records());
            print_json(&sensors.states(today))?;
        }
        Commands::Check { today } => {
            let today = parse_date_arg("--today", today.as_deref())?;
            let service = load_service(&config).await?;
            let reminders = service.check_reminders(today);
            if reminders.is_empty() {
                tracing::info!("No reminders due on {}", today);
            }
            print_json(&reminders)?;
        }
        Commands::Serve { host, port } => {
            let mut service = load_service(&config).await?;
            if let Some(url) = config.notify.webhook_url.clone() {
                let webhook = WebhookObserver::new(
                    url,
                    Duration::from_secs(config.notify.timeout_seconds),
                )
                .context("Failed to build webhook client")?;
                tracing::info!("Delivering reminders to {}", webhook.url());
                service.subscribe(Arc::new(webhook));
            }

            let state = AppState::new(service, config.reminders.clone());
            state
                .scheduler
                .lock()
                .await
                .schedule(config.reminders.notification_time);

            let cors = cors_layer(&config.server.cors_origin).with_context(|| {
                format!("Invalid CORS origin: {}", config.server.cors_origin)
            })?;
            let app = build_router(state).layer(cors);

            let host = host.unwrap_or(config.server.host);
            let port = port.unwrap_or(config.server.port);
            let addr = format!("{}:{}", host, port);
            let listener = tokio::net::TcpListener::bind(&addr)
                .await
                .with_context(|| format!("Failed to bind {}", addr))?;
            tracing::info!("API: http://{}", addr);
            axum::serve(listener, app).await?;
        }
    }

    Ok(())
}

/// Load the stored collection with the log observer attached.
async fn load_service(config: &AppConfig) -> Result<BirthdayService> {
    let storage = StorageConfig::new(config.data_dir.clone());
    let persistence = Arc::new(JsonFileStore::for_config(&storage));
    let mut service =
        BirthdayService::load(persistence, config.reminders.default_reminder_days.clone())
            .await
            .with_context(|| format!("Failed to load {:?}", storage.birthdays_path()))?;
    service.subscribe(Arc::new(LogObserver));
    Ok(service)
}

fn parse_date(s: &str) -> Result<NaiveDate> {
    Ok(NaiveDate::parse_from_str(s, "%Y-%m-%d")?)
}

/// Parse an optional `YYYY-MM-DD` argument, defaulting to today.
fn parse_date_arg(flag: &str, value: Option<&str>) -> Result<NaiveDate> {
    match value {
        Some(s) => parse_date(s)
            .with_context(|| format!("Invalid {} (expected YYYY-MM-DD): {}", flag, s)),
        None => Ok(Local::now().date_naive()),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
