//! QuizDeck - terminal client for AI-checked certification question banks
//!
//! Main entry point for the CLI application.
//!
//! # Overview
//!
//! This binary crate parses the command line and initializes:
//! - Configuration loading ([`ConfigManager`], `QUIZDECK_*` overrides, CLI flags)
//! - Logging infrastructure (daily file rotation + optional console output)
//! - Tokio async runtime (4 worker threads for API requests)
//! - State management ([`StateManager`]) and the [`QuizController`]
//!
//! # Execution Flow
//!
//! 1. Load `QuizDeck Data/QuizDeck Settings.yaml` and apply CLI overrides
//! 2. Initialize logging → logs/quizdeck.<date>
//! 3. Create tokio runtime with 4 worker threads
//! 4. Run the selected subcommand (interactive `play` by default)
//! 5. Log the metrics summary
//! 6. Shutdown tokio runtime with 5s timeout

use anyhow::{Context, Result};
use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};
use quizdeck::config::DEFAULT_CONFIG_DIR;
use quizdeck::logging::{self, LogOptions};
use quizdeck::metrics::Metrics;
use quizdeck::services::{HttpQuizApi, OnboardingGuide};
use quizdeck::ui::{QuizController, TerminalApp, spawn_state_logger, terminal};
use quizdeck::{APP_NAME, ConfigManager, Language, StateManager, UserConfig, VERSION};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

#[derive(Parser, Debug)]
#[command(name = "quizdeck", version, about = "Terminal quiz client for AI-checked question banks")]
struct Cli {
    /// Directory holding `QuizDeck Settings.yaml`
    #[arg(long, default_value = DEFAULT_CONFIG_DIR)]
    config_dir: Utf8PathBuf,

    /// Base URL of the quiz API (overrides the settings file)
    #[arg(long)]
    api_base: Option<String>,

    /// Interface language: en or ru
    #[arg(long)]
    lang: Option<Language>,

    /// Directory for log files
    #[arg(long, default_value = "logs")]
    log_dir: Utf8PathBuf,

    /// Also print log lines to stderr
    #[arg(short, long)]
    verbose: bool,

    /// Debug-level logging
    #[arg(long)]
    debug: bool,

    /// Write the log file as JSON lines
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Option<CliCommand>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
enum CliCommand {
    /// Interactive quiz (default)
    Play,
    /// Show question bank statistics
    Stats,
    /// Show question counts per deck category
    Decks,
    /// Check that the API is up
    Health,
    /// Upload a Telegram chat export (result.json)
    Upload { path: Utf8PathBuf },
    /// Show how to export a chat from Telegram
    Guide,
}

impl Cli {
    fn apply_overrides(&self, config: &mut UserConfig) {
        if let Some(api_base) = &self.api_base {
            config.api_base = api_base.clone();
        }
        if let Some(language) = self.lang {
            config.language = language;
        }
        if self.debug {
            config.debug_mode = true;
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_manager = ConfigManager::new(&cli.config_dir)?;
    let mut user_config = config_manager.load_user_config()?;
    cli.apply_overrides(&mut user_config);

    let _guard = logging::setup_logging(&LogOptions {
        log_dir: cli.log_dir.clone(),
        debug_mode: user_config.debug_mode,
        console_output: cli.verbose,
        json: cli.json_logs,
        ..Default::default()
    })?;

    tracing::info!("Starting {} v{}", APP_NAME, VERSION);

    // Create tokio runtime for API requests and the input loop
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .worker_threads(4)
        .thread_name("quizdeck-worker")
        .build()
        .context("Failed to create tokio runtime")?;

    tracing::info!("Tokio runtime initialized with {} worker threads", 4);

    let metrics = Arc::new(Metrics::new());
    let command = cli.command.clone().unwrap_or(CliCommand::Play);

    let result = runtime.block_on(run(
        command,
        config_manager,
        user_config,
        Arc::clone(&metrics),
    ));

    metrics.log_summary();

    // Shutdown the tokio runtime gracefully
    runtime.shutdown_timeout(Duration::from_secs(5));

    tracing::info!("Application shutdown complete");

    result.inspect_err(|e| tracing::error!("Fatal error: {:#}", e))
}

async fn run(
    command: CliCommand,
    config_manager: ConfigManager,
    user_config: UserConfig,
    metrics: Arc<Metrics>,
) -> Result<()> {
    let language = user_config.language;

    if command == CliCommand::Guide {
        let (_pause_tx, pause_rx) = watch::channel(false);
        let mut guide = OnboardingGuide::new();
        guide
            .run(pause_rx, |guide| {
                println!("{}", terminal::render_guide(language, guide))
            })
            .await;
        return Ok(());
    }

    let api = Arc::new(HttpQuizApi::from_config(&user_config).context("Failed to create API client")?);
    tracing::info!("Using quiz API at {}", api.base_url());

    let state = StateManager::new();
    let _state_logger = spawn_state_logger(&state);

    let (controller, toasts) = QuizController::new(api, state, user_config, metrics);
    let controller = controller.with_config_manager(config_manager);
    let mut app = TerminalApp::new(controller, toasts);

    match command {
        CliCommand::Play => app.run().await?,
        CliCommand::Stats => {
            if let Some(stats) = app.controller().stats().await {
                println!("{}", terminal::render_stats(language, &stats));
            }
        }
        CliCommand::Decks => {
            if let Some(stats) = app.controller().deck_stats().await {
                println!("{}", terminal::render_deck_stats(language, &stats));
            }
        }
        CliCommand::Health => {
            if let Some(health) = app.controller().health().await {
                terminal::print_health(&health);
            }
        }
        CliCommand::Upload { path } => {
            if let Some(summary) = app.controller().upload(&path).await {
                println!("{}", terminal::render_upload(language, &summary));
            }
        }
        CliCommand::Guide => {}
    }

    app.flush_toasts();
    Ok(())
}
