//! parley CLI: ask questions of an answering service, in a TUI or one-shot

use clap::{Parser, Subcommand};
use parley_engine::{Config, Controller, HttpAnswerService, Role, SubmitOutcome};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter.
const LOG_ENV: &str = "PARLEY_LOG";

const DEFAULT_LOG_FILTER: &str = "parley=info";

/// Terminal client for a question-answering service
#[derive(Parser)]
#[command(name = "parley")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Answer endpoint URL (overrides the config file)
    #[arg(long, global = true)]
    endpoint: Option<String>,

    /// Path to the config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Write logs to this file
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the TUI (default when no command specified)
    Tui,

    /// Ask a single question and print the conversation
    Ask {
        /// The question to send
        question: String,
    },

    /// Print the effective configuration
    Config {
        /// Write the default config file
        #[arg(long)]
        init: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match &cli.command {
        None | Some(Commands::Tui) => cmd_tui(&cli),
        Some(Commands::Ask { question }) => cmd_ask(&cli, question),
        Some(Commands::Config { init }) => cmd_config(&cli, *init),
    };

    match result {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}

type CmdResult = Result<bool, Box<dyn std::error::Error>>;

fn cmd_tui(cli: &Cli) -> CmdResult {
    init_logging(cli.log_file.as_deref(), false)?;
    let config = load_config(cli)?;

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(parley_tui::run_tui(&config))?;
    Ok(true)
}

/// One submission through the controller. Returns false if the answer failed.
fn cmd_ask(cli: &Cli, question: &str) -> CmdResult {
    init_logging(cli.log_file.as_deref(), true)?;
    let config = load_config(cli)?;
    let service = HttpAnswerService::from_config(&config)?;
    info!(endpoint = %service.endpoint(), "asking");

    let mut controller = Controller::new();
    controller.update_draft(question);

    let rt = tokio::runtime::Runtime::new()?;
    if let SubmitOutcome::Ignored(reason) = rt.block_on(controller.ask(&service)) {
        return Err(format!("question not sent: {reason}").into());
    }

    for message in controller.visible_messages() {
        println!("{}: {}", message.role(), message.text());
    }

    let failed = controller
        .transcript()
        .last()
        .is_some_and(|m| m.role() == Role::Error);
    Ok(!failed)
}

fn cmd_config(cli: &Cli, init: bool) -> CmdResult {
    let path = config_path(cli)?;

    if init {
        if path.exists() {
            println!("Config already exists at {}", path.display());
        } else {
            Config::default().save(&path)?;
            println!("Wrote default config to {}", path.display());
        }
        return Ok(true);
    }

    let config = load_config(cli)?;
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(true)
}

fn config_path(cli: &Cli) -> Result<PathBuf, parley_engine::ConfigError> {
    match &cli.config {
        Some(path) => Ok(path.clone()),
        None => Config::default_path(),
    }
}

/// Load the config file (defaults if absent) and apply command-line overrides.
fn load_config(cli: &Cli) -> Result<Config, parley_engine::ConfigError> {
    let path = config_path(cli)?;
    let mut config = Config::load_or_default(&path)?;
    if let Some(endpoint) = &cli.endpoint {
        config.endpoint.clone_from(endpoint);
    }
    debug!(path = %path.display(), endpoint = %config.endpoint, "loaded config");
    Ok(config)
}

/// Install the tracing subscriber.
///
/// Logs go to `log_file` when given. Otherwise they go to stderr when
/// `stderr_fallback` is set and are discarded when it is not, since the TUI
/// owns the terminal.
fn init_logging(log_file: Option<&Path>, stderr_fallback: bool) -> Result<(), std::io::Error> {
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match log_file {
        Some(path) => {
            let file = File::create(path)?;
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None if stderr_fallback => builder.with_writer(std::io::stderr).init(),
        None => builder.with_writer(std::io::sink).init(),
    }
    Ok(())
}
