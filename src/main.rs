use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use roster_tracker::api::state::AppState;
use roster_tracker::config::AppConfig;
use roster_tracker::fetch::Fetcher;
use roster_tracker::models::{RankingRecord, TournamentInfo};
use roster_tracker::rankings::{project, RankingsEngine};
use roster_tracker::source::FortniteClient;

#[derive(Parser)]
#[command(name = "roster-tracker")]
#[command(about = "Fortnite competitive rankings for a fixed roster")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./config.toml")]
    config: PathBuf,

    /// Log level (trace, debug, info, warn, error); overrides the config file
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
    /// List selectable tournaments, newest first
    Tournaments {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Roster rankings for one window (real or cumulative)
    Rankings {
        /// Event id
        #[arg(long)]
        event: String,

        /// Window id, e.g. "<event>_Week2_Cumulative"
        #[arg(long)]
        window: String,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Match-by-match results of one roster player
    Matches {
        #[arg(long)]
        event: String,

        #[arg(long)]
        window: String,

        /// Account id or roster name
        #[arg(long)]
        player: String,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Start the API server
    Serve {
        /// Bind address (defaults to server.host)
        #[arg(long)]
        host: Option<String>,

        /// Port number (defaults to server.port)
        #[arg(long)]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli.config)?;

    // Initialize tracing
    let log_level = cli.log_level.as_deref().unwrap_or(&config.log_level);
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));

    if cli.json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    tracing::info!("Starting roster-tracker v{}", env!("CARGO_PKG_VERSION"));

    let engine = build_engine(&config)?;

    match cli.command {
        Commands::Tournaments { json } => {
            let tournaments = match &engine {
                Some(engine) => engine.tournaments().await,
                None => Vec::new(),
            };
            if json {
                println!("{}", serde_json::to_string_pretty(&tournaments)?);
            } else {
                print_tournaments(&tournaments);
            }
        }
        Commands::Rankings {
            event,
            window,
            json,
        } => {
            let records = match &engine {
                Some(engine) => engine.rankings(&event, &window).await,
                None => Vec::new(),
            };
            if json {
                println!("{}", serde_json::to_string_pretty(&records)?);
            } else {
                print_rankings(&records);
            }
        }
        Commands::Matches {
            event,
            window,
            player,
            json,
        } => {
            let records = match &engine {
                Some(engine) => engine.rankings(&event, &window).await,
                None => Vec::new(),
            };
            let Some(record) = records.iter().find(|r| {
                r.account_id == player || r.player.eq_ignore_ascii_case(&player)
            }) else {
                tracing::warn!("{} not found in {}/{}", player, event, window);
                if json {
                    println!("[]");
                }
                return Ok(());
            };

            let details = project(record);
            if json {
                println!("{}", serde_json::to_string_pretty(&details)?);
            } else {
                println!("\n=== {} ({} matches) ===", record.player, details.len());
                println!("{:<10} {:>9} {:>6} {:>6}  Match", "Time", "Placement", "Kills", "Points");
                for d in &details {
                    println!(
                        "{:<10} {:>9} {:>6} {:>6}  {}",
                        d.time, d.placement, d.kills, d.points, d.match_id
                    );
                }
            }
        }
        Commands::Serve { host, port } => {
            let state = match engine {
                Some(engine) => AppState::new(engine),
                None => AppState::without_credential(),
            };
            let app = roster_tracker::api::build_router(state, &config.server.cors_origin);
            let addr = format!(
                "{}:{}",
                host.unwrap_or(config.server.host.clone()),
                port.unwrap_or(config.server.port)
            );
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            tracing::info!("API: http://{}", addr);
            axum::serve(listener, app).await?;
        }
    }

    Ok(())
}

fn load_config(path: &PathBuf) -> Result<AppConfig> {
    if !path.exists() {
        let config = AppConfig::default();
        config.validate()?;
        return Ok(config);
    }
    Ok(AppConfig::from_file(path)?)
}

/// `None` when no API key is available: every command then reports nothing.
fn build_engine(config: &AppConfig) -> Result<Option<Arc<RankingsEngine>>> {
    let Some(api_key) = config.api.api_key() else {
        tracing::warn!(
            "{} is not set; rankings and tournaments will be empty",
            config.api.api_key_env
        );
        return Ok(None);
    };

    let fetcher = Fetcher::new(config.api.fetcher_config(api_key))?;
    let client = FortniteClient::new(fetcher, config.api.client_config()?);
    Ok(Some(Arc::new(RankingsEngine::new(
        Arc::new(client),
        config.roster.clone(),
        config.leaderboard,
    ))))
}

fn print_tournaments(tournaments: &[TournamentInfo]) {
    println!("\n=== Tournaments ({}) ===", tournaments.len());
    for t in tournaments {
        println!(
            "{:<10}  {:<45}  {} / {}",
            t.display_date.as_deref().unwrap_or("-"),
            t.event_name,
            t.event_id,
            t.event_window_id
        );
    }
}

fn print_rankings(records: &[RankingRecord]) {
    println!("\n=== Rankings ({} players) ===", records.len());
    println!(
        "{:>6}  {:<16} {:>6} {:>6} {:>5} {:>7}",
        "Rank", "Player", "Points", "Kills", "Wins", "Matches"
    );
    for r in records {
        println!(
            "{:>6}  {:<16} {:>6} {:>6} {:>5} {:>7}",
            r.rank, r.player, r.points, r.kills, r.wins, r.matches
        );
    }
}
