//! CLI command definitions and subcommands

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::debug;

use crate::config::{API_URL_ENV, DEFAULT_BASE_URL};

/// tp - plan a trip from the terminal
#[derive(Parser)]
#[command(
    name = "tp",
    about = "Trip planner: itineraries, weather, maps and a trip assistant",
    version
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(
        short = 'l',
        long = "log-level",
        global = true,
        help = "Log level (TRACE, DEBUG, INFO, WARN, ERROR)"
    )]
    pub log_level: Option<String>,

    /// Destination to plan as soon as the TUI starts
    #[arg(short, long, help = "Destination to plan as soon as the TUI starts")]
    pub destination: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Plan a trip and print the itinerary (batch mode)
    Plan {
        /// City or place to visit
        destination: String,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Plan a trip, then ask the trip assistant one question about it
    Ask {
        /// City or place to visit
        destination: String,

        /// Question for the assistant
        question: String,
    },
}

/// Output format for batch planning
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        debug!(%s, "OutputFormat::from_str: called");
        match s.to_lowercase().as_str() {
            "text" | "plain" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(format!("Unknown format '{}'. Expected text or json", s)),
        }
    }
}

/// Where the log file lives
pub fn get_log_path() -> PathBuf {
    let path = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("tripplanner")
        .join("logs")
        .join("tripplanner.log");
    debug!(?path, "get_log_path: returning path");
    path
}

/// Help footer with the backend and log locations
pub fn generate_after_help() -> String {
    let backend = std::env::var(API_URL_ENV)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| format!("{} (or api.base-url in config)", DEFAULT_BASE_URL));

    let mut help = String::new();
    help.push_str(&format!("Backend: {}\n", backend));
    help.push_str(&format!("  override with {}\n", API_URL_ENV));
    help.push('\n');
    help.push_str(&format!("Logs are written to: {}\n", get_log_path().display()));
    help
}
