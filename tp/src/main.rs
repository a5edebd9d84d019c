//! tp - trip planner
//!
//! CLI entry point: launches the TUI by default, or plans/asks in batch mode.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{CommandFactory, FromArgMatches};
use colored::Colorize;
use eyre::{Context, Result, eyre};
use tracing::{debug, info, warn};

use tripplanner::backend::{TripBackend, create_backend};
use tripplanner::chat::ChatSession;
use tripplanner::cli::{Cli, Command, OutputFormat, generate_after_help};
use tripplanner::config::Config;
use tripplanner::domain::TripResult;
use tripplanner::presenter::{present, text};
use tripplanner::store::{RequestLifecycle, ResultStore};
use tripplanner::tui;

fn setup_logging(cli_log_level: Option<&str>, config_log_level: Option<&str>) -> Result<()> {
    // Logging isn't initialized yet, so nothing below is recorded until init()
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("tripplanner")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    // CLI --log-level > config file > INFO
    let level = match cli_log_level.or(config_log_level) {
        Some(s) => match s.to_uppercase().as_str() {
            "TRACE" => tracing::Level::TRACE,
            "DEBUG" => tracing::Level::DEBUG,
            "INFO" => tracing::Level::INFO,
            "WARN" | "WARNING" => tracing::Level::WARN,
            "ERROR" => tracing::Level::ERROR,
            _ => {
                eprintln!("Warning: Unknown log-level '{}', defaulting to INFO", s);
                tracing::Level::INFO
            }
        },
        None => tracing::Level::INFO,
    };

    let log_file = fs::File::create(log_dir.join("tripplanner.log")).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (level: {:?})", level);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cmd = Cli::command().after_help(generate_after_help());
    let cli = Cli::from_arg_matches(&cmd.get_matches())?;

    // Log level comes from the config file before the full load
    let config_log_level = Config::load_log_level(cli.config.as_ref());
    setup_logging(cli.log_level.as_deref(), config_log_level.as_deref()).context("Failed to setup logging")?;

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;
    info!(base_url = %config.api.resolved_base_url(), "tp loaded config");

    let backend = create_backend(&config.api).context("Failed to create backend client")?;

    debug!(command = ?cli.command, "main: dispatching command");
    match cli.command {
        Some(Command::Plan { destination, format }) => {
            debug!(%destination, ?format, "main: matched Plan command");
            cmd_plan(backend, &destination, format).await
        }
        Some(Command::Ask { destination, question }) => {
            debug!(%destination, %question, "main: matched Ask command");
            cmd_ask(backend, &destination, &question).await
        }
        None => {
            debug!(destination = ?cli.destination, "main: no command specified, launching TUI");
            cmd_tui(&config, backend, cli.destination).await
        }
    }
}

/// Launch the interactive interface
async fn cmd_tui(config: &Config, backend: Arc<dyn TripBackend>, destination: Option<String>) -> Result<()> {
    debug!(?destination, "cmd_tui: called");
    tui::run(config, backend, destination).await
}

/// Plan one trip and wait for the outcome
async fn plan(backend: Arc<dyn TripBackend>, destination: &str) -> Result<Arc<TripResult>> {
    debug!(%destination, "plan: called");
    let destination = destination.trim();
    if destination.is_empty() {
        return Err(eyre!("Destination must not be empty"));
    }

    let mut store = ResultStore::new(backend);
    store.submit(destination);
    store.settle().await;

    match store.lifecycle() {
        RequestLifecycle::Succeeded(result) => Ok(result.clone()),
        RequestLifecycle::Failed(message) => Err(eyre!("{}", message)),
        other => Err(eyre!("Trip request did not finish: {:?}", other.status())),
    }
}

/// Plan a trip and print it
async fn cmd_plan(backend: Arc<dyn TripBackend>, destination: &str, format: OutputFormat) -> Result<()> {
    debug!(%destination, ?format, "cmd_plan: called");
    let result = plan(backend, destination).await?;

    match format {
        OutputFormat::Text => {
            print!("{}", text::render(&present(&result)));
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(result.as_ref()).context("Failed to serialize trip")?;
            println!("{}", json);
        }
    }
    Ok(())
}

/// Plan a trip, then put one question to the assistant
async fn cmd_ask(backend: Arc<dyn TripBackend>, destination: &str, question: &str) -> Result<()> {
    debug!(%destination, %question, "cmd_ask: called");
    if question.trim().is_empty() {
        return Err(eyre!("Question must not be empty"));
    }

    let result = plan(backend.clone(), destination).await?;
    let context = result.structured_itinerary.clone();
    if context.is_none() {
        warn!(%destination, "cmd_ask: no structured itinerary, asking without context");
        eprintln!(
            "{} no structured itinerary for {}, asking without trip context",
            "Warning:".yellow().bold(),
            result.destination
        );
    }

    let mut chat = ChatSession::new(backend);
    chat.send(question, context);
    chat.settle().await;

    let reply = chat.last_reply().unwrap_or_default();
    println!("{} {}", "You:".cyan().bold(), question.trim());
    println!("{} {}", "Assistant:".green().bold(), reply);
    Ok(())
}
