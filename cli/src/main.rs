//! marketd: runs the fee & escrow engine as a service
//!
//! Serves the HTTP API and drives the periodic release sweep. The
//! sweep is the only thing that ever triggers a scheduled release;
//! the engine itself owns no timers.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use owo_colors::OwoColorize;
use tracing::{error, info};

use market_api::{start_server, ApiState};
use market_core::{EngineConfig, TaskType};
use market_escrow::{EscrowStore, MemoryStore};
use market_storage::SledStore;

#[derive(Parser)]
#[command(name = "marketd")]
#[command(about = "Taskmarket fee & escrow engine")]
struct Cli {
    /// Path to configuration file (TOML); standard schedule if omitted
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Listen address for the API
    #[arg(short, long, default_value = "127.0.0.1:8080")]
    listen: SocketAddr,

    /// Data directory for the escrow database
    #[arg(short, long, default_value = "./market-data")]
    data_dir: PathBuf,

    /// Keep escrow entries in memory only (development)
    #[arg(long)]
    ephemeral: bool,

    /// Seconds between release sweeps
    #[arg(long, default_value_t = 60)]
    sweep_interval: u64,
}

fn display_banner(config: &EngineConfig, cli: &Cli) {
    println!("\n{}", "Taskmarket Fee & Escrow Engine".cyan().bold());
    println!("{}: {}", "Listen".yellow(), cli.listen);
    println!(
        "{}: {}",
        "Store".yellow(),
        if cli.ephemeral {
            "in-memory (ephemeral)".to_string()
        } else {
            cli.data_dir.display().to_string()
        }
    );
    println!(
        "{}: {}s",
        "Hold period".yellow(),
        config.hold_period_secs
    );
    for task_type in TaskType::ALL {
        if let Ok(model) = config.schedule.model(task_type) {
            println!(
                "  {:<10} rate {:>5} bps, flat {:>4}, threshold {}",
                task_type.to_string(),
                model.rate_bps,
                model.flat_processing_fee,
                match model.escrow_threshold {
                    Some(t) => t.to_string(),
                    None => "never".to_string(),
                }
            );
        }
    }
    println!();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::standard(),
    };
    display_banner(&config, &cli);

    let store: Arc<dyn EscrowStore> = if cli.ephemeral {
        Arc::new(MemoryStore::new())
    } else {
        Arc::new(SledStore::open(cli.data_dir.join("escrow-db"))?)
    };

    let state = ApiState::new(&config, store);

    // periodic sweep: the external driver of the scheduled-release path
    let scheduler = state.scheduler.clone();
    let sweep_interval = cli.sweep_interval;
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(Duration::from_secs(sweep_interval));
        loop {
            ticker.tick().await;
            let now = chrono::Utc::now().timestamp();
            match scheduler.sweep(now) {
                Ok(released) if !released.is_empty() => {
                    info!(count = released.len(), "sweep released held entries");
                }
                Ok(_) => {}
                Err(e) => error!("release sweep failed: {}", e),
            }
        }
    });

    start_server(cli.listen, state).await
}
