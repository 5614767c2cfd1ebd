// UI module - terminal front end and the controller behind it
//
// This module contains:
// - QuizController: turns user commands into state transitions and API calls
// - TerminalApp: reads commands from stdin and renders screens
// - ToastSender: bounded channel of transient notifications

pub mod controller;
pub mod terminal;
pub mod toast;

pub use controller::{BackOutcome, QuizController, spawn_state_logger};
pub use terminal::{Command, CommandError, TerminalApp};
pub use toast::{Toast, ToastLevel, ToastSender};
