mod app;
mod cli;
mod commands;
mod config;
mod data;
mod input;
mod logging;
mod ui;

use clap::Parser;
use color_eyre::eyre::Result;
use tracing::info;

use cli::{Cli, Commands};
use config::{ensure_dirs, log_dir, UserConfig};

fn main() -> Result<()> {
    color_eyre::install()?;
    let _ = ensure_dirs();

    let cli = Cli::parse();
    let config = UserConfig::load();
    let level = logging::effective_level(config.log_level, cli.log_level);

    match cli.command {
        Some(Commands::Config { path, reset }) => {
            logging::init_command(level);
            commands::config::run(path, reset)
        }
        None => {
            let _guard = logging::init_dashboard(level, &log_dir());
            let mut config = config;
            config.merge_with_args(cli.ascii);

            info!(version = env!("CARGO_PKG_VERSION"), "Starting dashboard");
            app::run_tui(config)?;
            info!("Dashboard closed");

            println!("\nPower Monitor closed.");
            Ok(())
        }
    }
}
