use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};

use fx_status_checker::config::{Config, default_config_path, log_dir};
use fx_status_checker::logging;
use fx_status_checker::monitor::Monitor;

#[derive(Parser)]
#[command(name = "fx-status-checker")]
#[command(version, about = "Checks FX client compatibility and reports it to Discord")]
struct Cli {
    /// Path to the JSON config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG is set
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run one status check (default)
    Check,
    /// Liveness probe
    Ping,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command.unwrap_or(Command::Check) {
        Command::Ping => {
            println!("ok");
            Ok(())
        }
        Command::Check => {
            let _guard = logging::init(&log_dir(), cli.verbose)?;

            let config_path = cli.config.unwrap_or_else(default_config_path);
            let config = Config::load(&config_path)
                .with_context(|| format!("Failed to load config from {}", config_path.display()))?;
            let monitor = Monitor::new(config).context("Failed to initialize monitor")?;

            tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()?
                .block_on(monitor.run());
            Ok(())
        }
    }
}
