//! Operator binary for the Courtside tracker.
//!
//! Runs maintenance against the `PostgreSQL` event log outside the live
//! screen:
//!
//! - `migrate` applies pending schema migrations
//! - `repair <GAME_ID>` inserts the quarter-boundary substitutions a scorer
//!   skipped by advancing quarters by hand
//! - `summary <GAME_ID>` prints the box score replayed from the log
//! - `end <GAME_ID>` stores the final score computed from the log
//!
//! # Startup Sequence
//!
//! 1. Parse the command line
//! 2. Load configuration from `courtside-config.yaml` (defaults if absent)
//! 3. Initialize structured logging (tracing)
//! 4. Connect to `PostgreSQL`
//! 5. Run the command

mod error;
mod pg_store;
mod report;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use courtside_core::config::{CourtsideConfig, LoggingConfig};
use courtside_core::session::LiveSession;
use courtside_db::{PgEventStore, PgGameStore, PostgresConfig, PostgresPool};
use courtside_types::GameId;
use tracing::info;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use crate::error::EngineError;
use crate::pg_store::PgSessionStore;

/// Courtside operator commands.
#[derive(Parser, Debug)]
#[command(name = "courtside-engine")]
#[command(author, version, about = "Maintenance commands for the Courtside live game tracker")]
struct Cli {
    /// Configuration file.
    #[arg(long, default_value = "courtside-config.yaml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Apply pending database migrations.
    Migrate,
    /// Insert missing quarter-boundary substitutions for a game.
    Repair {
        /// Game id.
        game_id: Uuid,
    },
    /// Print the box score of a game.
    Summary {
        /// Game id.
        game_id: Uuid,
        /// Emit JSON instead of a table.
        #[arg(long)]
        json: bool,
    },
    /// Store the final score computed from the game's event log.
    End {
        /// Game id.
        game_id: Uuid,
    },
}

/// Application entry point.
///
/// # Errors
///
/// Returns an error if configuration, the database connection, or the
/// command itself fails.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_config(&cli.config)?;
    init_tracing(&config.logging);
    info!(
        config = %cli.config.display(),
        quarter_length_sec = config.game.quarter_length_sec,
        quarters_count = config.game.quarters_count,
        carry_over = ?config.game.carry_over,
        "courtside-engine starting"
    );

    let pg_config = PostgresConfig::new(&config.infrastructure.postgres_url)
        .with_max_connections(config.infrastructure.max_connections);
    let pool = PostgresPool::connect(&pg_config).await?;

    let result = run(cli.command, &config, &pool).await;
    pool.close().await;
    result?;
    Ok(())
}

async fn run(
    command: Command,
    config: &CourtsideConfig,
    pool: &PostgresPool,
) -> Result<(), EngineError> {
    match command {
        Command::Migrate => pool.run_migrations().await?,
        Command::Repair { game_id } => {
            let game_id = GameId::from(game_id);
            let store = PgSessionStore::new(pool.pool().clone())?;
            let mut session = LiveSession::open(store, game_id, &config.game)?;
            let inserted = session.repair_boundaries()?;
            println!("Inserted {inserted} boundary substitution(s) for game {game_id}");
        }
        Command::Summary { game_id, json } => {
            let game_id = GameId::from(game_id);
            let meta = PgGameStore::new(pool.pool())
                .game(game_id)
                .await?
                .ok_or(EngineError::GameNotFound(game_id))?;
            let events = PgEventStore::new(pool.pool())
                .events_for_game(game_id)
                .await?;
            let summary = report::build_summary(&meta, &events);
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                print!("{}", report::render_table(&summary));
            }
        }
        Command::End { game_id } => {
            let game_id = GameId::from(game_id);
            let store = PgSessionStore::new(pool.pool().clone())?;
            let mut session = LiveSession::open(store, game_id, &config.game)?;
            let board = session.end_game()?;
            println!(
                "Game {game_id} final: {}-{}",
                board.team, board.opponent
            );
        }
    }
    Ok(())
}

/// Load configuration, falling back to defaults when the file is absent.
fn load_config(path: &Path) -> Result<CourtsideConfig, EngineError> {
    if path.exists() {
        Ok(CourtsideConfig::from_file(path)?)
    } else {
        let mut config = CourtsideConfig::default();
        config.infrastructure.apply_env_overrides();
        Ok(config)
    }
}

/// `RUST_LOG` wins; otherwise the configured level.
fn init_tracing(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);
    if logging.json {
        builder.json().init();
    } else {
        builder.init();
    }
}
