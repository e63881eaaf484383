use std::path::PathBuf;

use clap::Parser;
use gaffer::app::{App, AppOptions};
use gaffer::config::Config;
use tokio::signal;
use tracing::{error, info};

/// Fetch an FPL classic league and print its rank history.
#[derive(Parser)]
#[command(name = "gaffer", version, about)]
struct Cli {
    /// Classic league id (the number in the league URL).
    league_id: u64,

    /// Path to the config file.
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,

    /// Dump the full view (standings, histories, series, form) as JSON.
    #[arg(long)]
    json: bool,

    /// Skip the response cache for this run.
    #[arg(long)]
    no_cache: bool,
}

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let config = if cli.config.exists() {
        match Config::load(&cli.config) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Failed to load config: {e}");
                std::process::exit(1);
            }
        }
    } else {
        Config::default()
    };

    config.init_logging();
    info!("gaffer starting");

    let options = AppOptions {
        league_id: cli.league_id,
        json: cli.json,
        no_cache: cli.no_cache,
    };

    tokio::select! {
        result = App::run(config, options) => {
            if let Err(e) = result {
                error!(error = %e, "Fatal error");
                std::process::exit(1);
            }
        }
        _ = signal::ctrl_c() => {
            info!("Shutdown signal received");
        }
    }

    info!("gaffer stopped");
}
