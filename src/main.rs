use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use grid_picks::api::{build_router, state::AppState};
use grid_picks::config::AppConfig;
use grid_picks::league::League;
use grid_picks::models::{DriverId, Event, EventStatus, Session};
use grid_picks::storage::StorageConfig;

#[derive(Parser)]
#[command(name = "grid-picks")]
#[command(about = "Racing prediction league: picks, results, scoring and leaderboard")]
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
    /// Start the API server
    Serve {
        /// Bind address
        #[arg(long)]
        host: Option<String>,

        /// Port number
        #[arg(long)]
        port: Option<u16>,
    },

    /// Recompute every member's points and rank
    Score,

    /// Print the leaderboard
    Leaderboard {
        /// Only show the top N
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Print the consensus meter for an event
    Community {
        #[arg(long)]
        event: u32,
    },

    /// Register a league member
    AddUser {
        #[arg(long)]
        name: String,
    },

    /// Add or replace a calendar event
    AddEvent {
        /// Calendar round number
        #[arg(long)]
        id: u32,

        #[arg(long)]
        name: String,

        /// Sprint weekend
        #[arg(long)]
        sprint: bool,

        /// Race day (YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,

        /// upcoming, open, closed or finished
        #[arg(long, default_value = "upcoming")]
        status: String,
    },

    /// Enter the official top five for a session
    EnterResults {
        #[arg(long)]
        event: u32,

        /// Session name, e.g. RaceMain
        #[arg(long)]
        session: String,

        /// Comma-separated driver ids, winner first
        #[arg(long, value_delimiter = ',')]
        top5: Vec<String>,
    },

    /// Close (or reopen) a session for predictions
    SetSession {
        #[arg(long)]
        event: u32,

        #[arg(long)]
        session: String,

        /// Reopen instead of closing
        #[arg(long)]
        open: bool,
    },
}

fn parse_session(raw: &str) -> Result<Session> {
    raw.parse::<Session>().map_err(anyhow::Error::msg)
}

fn load_config(cli: &Cli) -> Result<AppConfig> {
    let mut config = AppConfig::load_or_default(Path::new(&cli.config))
        .with_context(|| format!("Failed to load config from {}", cli.config))?;
    if let Some(ref data_dir) = cli.data_dir {
        config.data_dir = PathBuf::from(data_dir);
    }
    if let Some(ref level) = cli.log_level {
        config.log_level = level.clone();
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level));
    let registry = tracing_subscriber::registry().with(filter);
    if cli.json_logs {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    tracing::info!("Starting grid-picks v{}", env!("CARGO_PKG_VERSION"));

    let league = League::new(StorageConfig::new(config.data_dir.clone()), &config.league);

    match cli.command {
        Commands::Serve { host, port } => {
            let host = host.unwrap_or_else(|| config.server.host.clone());
            let port = port.unwrap_or(config.server.port);

            let app = build_router(AppState::from_config(&config));
            let addr = format!("{}:{}", host, port);
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            tracing::info!("Listening on http://{}", addr);
            axum::serve(listener, app).await?;
        }
        Commands::Score => {
            let summary = league.run_scoring_pass()?;
            println!(
                "Scored {} members over {} events ({} sessions)",
                summary.users_scored, summary.events_scored, summary.sessions_scored
            );
            if let Some(leader) = summary.leader {
                println!("Leader: {}", leader);
            }
        }
        Commands::Leaderboard { limit } => {
            let entries = league.leaderboard()?;
            let shown = limit.unwrap_or(entries.len());

            println!("{}", config.league.name);
            println!("{:>4}  {:<24} {:>6}  {:>3}  {:>5}", "#", "Member", "Pts", "", "Lead");
            for entry in entries.iter().take(shown) {
                println!(
                    "{:>4}  {:<24} {:>6}  {:>3}  {:>5}",
                    entry.rank,
                    entry.display_name,
                    entry.points,
                    entry.movement.to_string(),
                    entry.weeks_at_one
                );
            }
        }
        Commands::Community { event } => {
            let report = league.community(event)?;
            println!(
                "Event {}: {} participants",
                report.event_id, report.participants
            );
            for (session, shares) in &report.sessions {
                println!("  {}", session);
                for share in shares {
                    println!(
                        "    {:<16} {:>3}  {:>5.1}%",
                        share.driver_id.as_str(),
                        share.count,
                        share.percent
                    );
                }
            }
        }
        Commands::AddUser { name } => {
            let user = league.register_user(&name)?;
            println!("{} {}", user.id, user.display_name);
        }
        Commands::AddEvent {
            id,
            name,
            sprint,
            date,
            status,
        } => {
            let status: EventStatus = status.parse().map_err(anyhow::Error::msg)?;
            let mut event = Event::new(id, name, sprint).with_status(status);
            if let Some(date) = date {
                let date = NaiveDate::parse_from_str(&date, "%Y-%m-%d")
                    .with_context(|| format!("Invalid --date (expected YYYY-MM-DD): {}", date))?;
                event = event.with_date(date);
            }
            let sessions: Vec<&str> = event.sessions().iter().map(Session::as_str).collect();
            println!("Round {}: {} [{}]", event.id, event.name, sessions.join(", "));
            league.upsert_event(event)?;
        }
        Commands::EnterResults {
            event,
            session,
            top5,
        } => {
            let session = parse_session(&session)?;
            let top5: Vec<DriverId> = top5.iter().map(|d| DriverId::from(d.trim())).collect();
            if top5.is_empty() {
                bail!("--top5 needs five comma-separated driver ids");
            }
            league.enter_results(event, session, top5)?;
            println!(
                "Stored {} result for round {}. Run `score` to update standings.",
                session, event
            );
        }
        Commands::SetSession {
            event,
            session,
            open,
        } => {
            let session = parse_session(&session)?;
            league.set_session_open(event, session, open)?;
            println!(
                "Round {} {} is now {}",
                event,
                session,
                if open { "open" } else { "closed" }
            );
        }
    }

    Ok(())
}
