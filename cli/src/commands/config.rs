use chrono::Utc;
use color_eyre::eyre::Result;
use tracing::info;

use crate::config::{config_path, log_file_for, UserConfig};

pub fn run(path: bool, reset: bool) -> Result<()> {
    let config_file = config_path();

    if path {
        println!("{}", config_file.display());
        return Ok(());
    }

    if reset {
        let config = UserConfig::default();
        config.save()?;
        info!(path = %config_file.display(), "Config reset");
        println!("Config reset to defaults at: {}", config_file.display());
        return Ok(());
    }

    let config = UserConfig::load();
    println!("Config file: {}", config_file.display());
    println!("Log file:    {}", log_file_for(Utc::now().date_naive()).display());
    println!();
    println!("{}", toml::to_string_pretty(&config)?);

    Ok(())
}
