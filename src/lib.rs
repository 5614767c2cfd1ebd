// QuizDeck - terminal client for AI-checked quiz question banks
//
// This is the library crate containing the quiz state, the remote API client and the
// terminal front end. The binary crate (main.rs) provides the CLI entry point.

pub mod config;
pub mod i18n;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod services;
pub mod state;
pub mod ui;

// Re-export commonly used types for convenience
pub use config::ConfigManager;
pub use models::{AppState, Language, Question, QuizSession, Screen, Selection, UserConfig, Verdict};
pub use state::{RequestChannel, RequestTracker, StateChange, StateManager};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
