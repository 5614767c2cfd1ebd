//! Data models for the QuizDeck client.
//!
//! This module contains all the core data structures used throughout the application:
//! - [`Question`], [`Verdict`], [`OptionKey`]: wire types received from the quiz API
//! - [`Selection`]: the answer selector for the current question
//! - [`Hints`]: study hints shown next to the current question
//! - [`QuizSession`]: questions, answer records and score for one quiz run
//! - [`Screen`]: the screen state machine (welcome, quiz, browse, results)
//! - [`AppState`]: the central state container held by [`StateManager`](crate::state::StateManager)
//! - [`UserConfig`]: user preferences loaded from `QuizDeck Settings.yaml`
//!
//! # Architecture Note
//!
//! Questions and verdicts are created by the server and never mutated locally apart from
//! swapping in translated text. All session mutations go through
//! [`StateManager::update()`](crate::state::StateManager::update) so that change events
//! are emitted consistently.

pub mod api;
pub mod app_state;
pub mod config;
pub mod hints;
pub mod question;
pub mod screen;
pub mod selection;
pub mod session;

pub use api::{
    ApiStats, CheckRequest, DeckCheckRequest, DeckQuestions, HealthStatus, QuestionPage,
    TranslateRequest, TranslatedQuestion, UploadSummary,
};
pub use app_state::{AppState, BrowseState};
pub use config::UserConfig;
pub use hints::Hints;
pub use question::{AnswerKeys, Language, OptionKey, Question, Verdict};
pub use screen::{Screen, ScreenAction};
pub use selection::{Selection, SelectionUpdate};
pub use session::{AnswerRecord, QuizSession, QuizSource, SessionError, SessionStats};
