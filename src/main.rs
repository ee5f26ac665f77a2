use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use matchstats::api::state::AppState;
use matchstats::config::AppConfig;
use matchstats::service::{PredictionRequest, StatsService};
use matchstats::storage::{JsonlMatchRepository, MatchStore, StorageConfig};

#[derive(Parser)]
#[command(name = "matchstats")]
#[command(about = "Football league statistics and Poisson match prediction")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Data directory path (overrides the config file)
    #[arg(long)]
    data_dir: Option<PathBuf>,

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

    /// Import results CSV files into the match store
    Import {
        /// Directory holding the CSV files
        #[arg(long)]
        dir: Option<PathBuf>,

        /// Clear the store before importing
        #[arg(long)]
        replace: bool,
    },

    /// Print a league table
    Table {
        #[arg(long)]
        league: String,

        #[arg(long)]
        season: String,
    },

    /// Print a team's season stats
    Team {
        #[arg(long)]
        league: String,

        #[arg(long)]
        season: String,

        #[arg(long)]
        team: String,

        /// Form length
        #[arg(long)]
        last_n: Option<u32>,
    },

    /// Print the head-to-head record of two teams
    H2h {
        #[arg(long)]
        league: String,

        #[arg(long)]
        season: Option<String>,

        #[arg(long)]
        team_a: String,

        #[arg(long)]
        team_b: String,

        /// Number of most recent meetings
        #[arg(long)]
        last_n: Option<u32>,
    },

    /// Predict a fixture
    Predict {
        #[arg(long)]
        league: String,

        #[arg(long)]
        season: Option<String>,

        #[arg(long)]
        home: String,

        #[arg(long)]
        away: String,

        /// Only learn from matches before this date (YYYY-MM-DD)
        #[arg(long)]
        cutoff: Option<NaiveDate>,

        /// History window: "last_n" or "last_days"
        #[arg(long)]
        mode: Option<String>,

        #[arg(long)]
        last_n: Option<u32>,

        #[arg(long)]
        last_days: Option<u32>,
    },

    /// Print the number of stored matches
    Count,
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load(cli.config.as_deref()).context("Failed to load config")?;
    if let Some(dir) = &cli.data_dir {
        config.data_dir = dir.clone();
    }

    // Initialize tracing
    let level = cli.log_level.clone().unwrap_or_else(|| config.log_level.clone());
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&level));
    let json = cli.json_logs;

    tracing_subscriber::registry()
        .with(filter)
        .with(json.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json).then(|| tracing_subscriber::fmt::layer()))
        .init();

    tracing::info!("Starting matchstats v{}", env!("CARGO_PKG_VERSION"));

    let storage = StorageConfig::new(config.data_dir.clone());
    let store = MatchStore::open(&storage);
    let service = StatsService::new(
        Arc::new(JsonlMatchRepository::new(store.clone())),
        config.prediction.clone(),
    );

    match cli.command {
        Commands::Serve { host, port } => {
            let host = host.unwrap_or_else(|| config.server.host.clone());
            let port = port.unwrap_or(config.server.port);
            tracing::info!("Serving matches from {:?}", store.path());

            let state = AppState::new(service, &config.server.cors_origin);
            let app = matchstats::api::build_router(state);
            let addr = format!("{}:{}", host, port);
            let listener = tokio::net::TcpListener::bind(&addr)
                .await
                .with_context(|| format!("Failed to bind {}", addr))?;
            tracing::info!("Listening on http://{}", addr);
            axum::serve(listener, app).await?;
        }
        Commands::Import { dir, replace } => {
            let dir = dir.unwrap_or_else(|| config.import.csv_dir.clone());
            let summary = matchstats::ingest::import_dir(&dir, &store, replace)?;
            println!(
                "Imported {} files ({} skipped): {} inserted, {} updated, {} rows dropped",
                summary.files_imported,
                summary.files_skipped,
                summary.inserted,
                summary.updated,
                summary.rows_dropped
            );
        }
        Commands::Table { league, season } => {
            print_json(&service.league_table(&league, &season)?)?;
        }
        Commands::Team {
            league,
            season,
            team,
            last_n,
        } => {
            print_json(&service.team_stats(&league, &season, &team, last_n)?)?;
        }
        Commands::H2h {
            league,
            season,
            team_a,
            team_b,
            last_n,
        } => {
            let summary =
                service.head_to_head(&league, season.as_deref(), &team_a, &team_b, last_n)?;
            print_json(&summary)?;
        }
        Commands::Predict {
            league,
            season,
            home,
            away,
            cutoff,
            mode,
            last_n,
            last_days,
        } => {
            let request = PredictionRequest {
                league,
                season,
                home_team: home,
                away_team: away,
                cutoff,
                mode,
                last_n,
                last_days,
            };
            print_json(&service.predict(&request)?)?;
        }
        Commands::Count => {
            println!("{}", service.count()?);
        }
    }

    Ok(())
}
