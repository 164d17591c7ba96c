use clap::{Parser, Subcommand};

use crate::config::LogLevel;

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show, locate or reset the config file
    Config {
        /// Print the config file path
        #[arg(long)]
        path: bool,

        /// Overwrite the config file with defaults
        #[arg(long)]
        reset: bool,
    },
}

/// Live power, battery and system load dashboard for macOS laptops
#[derive(Debug, Parser)]
#[command(name = "powerdash", version, verbatim_doc_comment)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, global = true, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Draw gauges with ASCII characters
    #[arg(long)]
    pub ascii: bool,
}
