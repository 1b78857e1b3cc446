//! Balloon Tracker CLI
//!
//! Local execution entry point: watch a contest's standings page and track
//! balloon deliveries from the command line.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use balloontrack::{
    error::{AppError, Result},
    ledger::{Ledger, LocalLedger},
    models::{BalloonStatus, Config},
    pipeline::Poller,
    services::HttpStandingsSource,
    utils::contest_id_for_url,
};
use clap::{Parser, Subcommand};

/// balloontrack - Contest Balloon Tracker
#[derive(Parser, Debug)]
#[command(
    name = "balloontrack",
    version,
    about = "Tracks balloon deliveries for contest teams"
)]
struct Cli {
    /// Path to storage directory containing config and ledger files
    #[arg(short, long, default_value = "storage")]
    storage_dir: PathBuf,

    /// Standings URL override (defaults to poller.contest_url from config)
    #[arg(short, long)]
    url: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Poll the standings page periodically until interrupted
    Watch {
        /// Seconds between cycles (default: poller.interval_secs from config)
        #[arg(long)]
        interval: Option<u64>,
    },

    /// Run a single fetch-parse-reconcile cycle
    Once,

    /// List the active contest's balloons, waiting first
    List,

    /// Mark a balloon as delivered
    Deliver {
        /// Record id (shown by `list`)
        id: String,
    },

    /// Mark a delivered balloon as waiting again
    Revert {
        /// Record id (shown by `list`)
        id: String,
    },

    /// Delete all records for the active contest
    Reset,

    /// Validate configuration files
    Validate,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

fn build_poller(config: &Config, ledger: Arc<LocalLedger>) -> Result<Poller> {
    let source = Arc::new(HttpStandingsSource::new(&config.fetcher)?);
    Poller::new(config, source, ledger)
}

async fn set_status(
    ledger: &LocalLedger,
    id: &str,
    contest_id: &str,
    status: BalloonStatus,
) -> Result<()> {
    let record = ledger.update_status(id, contest_id, status).await?;
    log::info!(
        "{} / problem {} is now {}",
        record.team_name,
        record.problem_code,
        record.status.as_str()
    );
    Ok(())
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // Load configuration
    let config_path = cli.storage_dir.join("config.toml");
    let mut config = Config::load_or_default(&config_path);
    if let Some(url) = cli.url {
        config.poller.contest_url = url;
    }

    if config.poller.contest_url.trim().is_empty() {
        log::error!("No contest URL configured. Set poller.contest_url or pass --url.");
        return Err(AppError::config("Missing contest URL"));
    }

    let contest_id = contest_id_for_url(&config.poller.contest_url);
    let ledger = Arc::new(LocalLedger::new(&cli.storage_dir));

    match cli.command {
        Command::Watch { interval } => {
            let interval_secs = interval.unwrap_or(config.poller.interval_secs);
            log::info!(
                "Watching {} (contest {}) every {}s",
                config.poller.contest_url,
                contest_id,
                interval_secs
            );

            let poller = build_poller(&config, Arc::clone(&ledger))?;
            poller.start(Duration::from_secs(interval_secs)).await;

            tokio::signal::ctrl_c().await?;
            log::info!("Interrupted, stopping scheduler...");
            poller.stop().await;
        }

        Command::Once => {
            let poller = build_poller(&config, Arc::clone(&ledger))?;
            match poller.trigger_now().await {
                Some(outcome) if outcome.fetch_failed => {
                    log::warn!("Fetch failed, nothing ingested this cycle.");
                }
                Some(outcome) => {
                    log::info!(
                        "Cycle done: {} candidates, {} new, {} existing, {} failed",
                        outcome.candidate_count,
                        outcome.reconcile.new_count,
                        outcome.reconcile.existing_count,
                        outcome.reconcile.failed_count
                    );
                }
                None => log::warn!("A cycle is already running."),
            }
        }

        Command::List => {
            let records = ledger.list_for_contest(&contest_id).await?;
            if records.is_empty() {
                log::info!("No balloons recorded for contest {}.", contest_id);
            }
            for record in records {
                println!(
                    "{}  [{:9}]  {:<3} {:>5}m  {}",
                    record.id,
                    record.status.as_str(),
                    record.problem_code,
                    record.time,
                    record.team_name
                );
            }
        }

        Command::Deliver { id } => {
            set_status(&ledger, &id, &contest_id, BalloonStatus::Delivered).await?;
        }

        Command::Revert { id } => {
            set_status(&ledger, &id, &contest_id, BalloonStatus::Waiting).await?;
        }

        Command::Reset => {
            let removed = ledger.delete_all_for_contest(&contest_id).await?;
            log::info!("Removed {} records for contest {}.", removed, contest_id);
        }

        Command::Validate => {
            log::info!("Validating configuration...");
            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!("All validations passed!");
        }
    }

    Ok(())
}
