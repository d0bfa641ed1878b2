// Command-line arguments
use clap::{Parser, Subcommand};

use crate::infrastructure::config::DEFAULT_CONFIG_PATH;

#[derive(Debug, Parser)]
#[command(name = "suspension-analytics")]
#[command(about = "Analyze recorded suspension telemetry sessions", long_about = None)]
pub struct Cli {
    /// Configuration file, without extension
    #[arg(short, long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    pub config: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List stored session IDs
    List,
    /// Analyze one or more sessions, optionally over a time window
    Filter {
        /// Session IDs to analyze
        #[arg(required = true, value_name = "ID")]
        ids: Vec<String>,

        /// Window start in seconds
        #[arg(long, allow_hyphen_values = true)]
        start: Option<f64>,

        /// Window end in seconds
        #[arg(long, allow_hyphen_values = true)]
        end: Option<f64>,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },
}
