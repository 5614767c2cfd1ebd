// State management module
//
// This module provides the StateManager which wraps AppState with thread-safe access
// using Arc<RwLock<T>> and emits change events for the terminal UI.

mod generation;

pub use generation::{RequestChannel, RequestToken, RequestTracker};

use crate::models::{AppState, Language, OptionKey, QuizSession, Screen, SessionStats, UserConfig};
use std::sync::{Arc, RwLock};
use tokio::sync::broadcast;

/// Change events emitted when state is modified
///
/// These events notify interested parties (the renderer and the event logger)
/// about state changes without requiring them to poll the state.
#[derive(Clone, Debug, PartialEq)]
pub enum StateChange {
    /// The visible screen changed
    ScreenChanged { from: Screen, to: Screen },

    /// Interface language changed
    LanguageChanged { language: Language },

    /// A different question is current (or none at all)
    QuestionChanged {
        question_id: Option<String>,
        index: usize,
        total: usize,
    },

    /// The question text or options were replaced in place, e.g. by a translation
    QuestionUpdated { question_id: String },

    /// Selection for the current question changed
    SelectionChanged {
        selected: Vec<OptionKey>,
        required: usize,
        can_submit: bool,
    },

    /// A verdict was stored for the current question
    VerdictRecorded { question_id: String, correct: bool },

    /// Session score changed
    StatsChanged { stats: SessionStats },

    /// A network request started or finished
    LoadingChanged { is_loading: bool },

    /// A page of the question browser was loaded
    BrowsePageLoaded {
        page: usize,
        pages: usize,
        total: usize,
    },

    /// Hints were shown or hidden
    HintsChanged { visible: bool },

    /// The quiz run was discarded
    SessionReset,
}

/// Thread-safe state manager with event emission
///
/// This is the central state management component that:
/// - Provides thread-safe access to [`AppState`] via `Arc<RwLock<T>>`
/// - Detects state changes and emits [`StateChange`] events
/// - Supports subscribing to state changes via tokio broadcast channels
///
/// # Usage
///
/// Always use `StateManager` instead of accessing [`AppState`] directly:
/// - [`read()`](Self::read) for reading state through a closure
/// - [`update()`](Self::update) for mutations with automatic event emission
/// - [`subscribe()`](Self::subscribe) for listening to state changes
///
/// # Related Types
///
/// - [`crate::models::AppState`]: The underlying state structure
/// - [`StateChange`]: Event types emitted on state mutations
/// - [`crate::ui::controller::QuizController`]: Primary writer of state
pub struct StateManager {
    /// The application state protected by RwLock for thread-safe access
    state: Arc<RwLock<AppState>>,

    /// Broadcast channel for emitting state change events
    state_tx: broadcast::Sender<StateChange>,
}

impl StateManager {
    /// Create a new StateManager with default state
    ///
    /// The broadcast channel buffers 100 events.
    pub fn new() -> Self {
        let (state_tx, _) = broadcast::channel(100);
        Self {
            state: Arc::new(RwLock::new(AppState::default())),
            state_tx,
        }
    }

    /// Get a read-only snapshot of the current state
    ///
    /// This clones the entire state, so it's safe to use without holding locks.
    pub fn snapshot(&self) -> AppState {
        self.state
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Execute a function with read access to the state
    ///
    /// # Example
    /// ```ignore
    /// let screen = state_manager.read(|state| state.screen);
    /// ```
    pub fn read<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&AppState) -> R,
    {
        let state = self
            .state
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&state)
    }

    /// Update the state and emit change events
    ///
    /// This is the primary way to modify state. It:
    /// 1. Captures the old state
    /// 2. Applies the update function
    /// 3. Detects what changed
    /// 4. Emits appropriate events
    ///
    /// # Returns
    /// A vector of StateChange events that were emitted
    pub fn update<F>(&self, update_fn: F) -> Vec<StateChange>
    where
        F: FnOnce(&mut AppState),
    {
        let mut state = self
            .state
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let old_state = state.clone();

        update_fn(&mut state);

        let changes = Self::detect_changes(&old_state, &state);

        for change in &changes {
            // Ignore send errors - it's OK if no one is listening
            let _ = self.state_tx.send(change.clone());
        }

        changes
    }

    /// Subscribe to state change events
    ///
    /// Returns a receiver that will get notified of all future state changes.
    pub fn subscribe(&self) -> broadcast::Receiver<StateChange> {
        self.state_tx.subscribe()
    }

    /// Detect what changed between two states and generate events
    fn detect_changes(old: &AppState, new: &AppState) -> Vec<StateChange> {
        let mut changes = Vec::new();

        if old.screen != new.screen {
            changes.push(StateChange::ScreenChanged {
                from: old.screen,
                to: new.screen,
            });
        }

        if old.language != new.language {
            changes.push(StateChange::LanguageChanged {
                language: new.language,
            });
        }

        if old.session.is_some() && new.session.is_none() {
            changes.push(StateChange::SessionReset);
        }

        let old_session = old.session.as_ref();
        let new_session = new.session.as_ref();
        let old_question = old_session.and_then(QuizSession::current);
        let new_question = new_session.and_then(QuizSession::current);

        let position = |session: Option<&QuizSession>| {
            session.map(|s| (s.index(), s.len())).unwrap_or((0, 0))
        };
        let same_question = old_question.map(|q| &q.id) == new_question.map(|q| &q.id);

        if !same_question || position(old_session) != position(new_session) {
            let (index, total) = position(new_session);
            changes.push(StateChange::QuestionChanged {
                question_id: new_question.map(|q| q.id.clone()),
                index,
                total,
            });
        } else if let (Some(before), Some(after)) = (old_question, new_question) {
            if before.text != after.text || before.options != after.options {
                changes.push(StateChange::QuestionUpdated {
                    question_id: after.id.clone(),
                });
            }
        }

        if let Some(session) = new_session {
            let old_selection = old_session.map(QuizSession::selection);
            if old_selection != Some(session.selection()) {
                changes.push(StateChange::SelectionChanged {
                    selected: session.selection().keys().to_vec(),
                    required: session.required_count(),
                    can_submit: session.can_submit(),
                });
            }

            let old_record = old_session.and_then(QuizSession::current_record);
            if let (Some(record), Some(question)) = (session.current_record(), new_question) {
                if !same_question || old_record != Some(record) {
                    changes.push(StateChange::VerdictRecorded {
                        question_id: question.id.clone(),
                        correct: record.correct,
                    });
                }
            }

            if old_session.map(QuizSession::stats) != Some(session.stats()) {
                changes.push(StateChange::StatsChanged {
                    stats: session.stats(),
                });
            }
        }

        if old.is_loading != new.is_loading {
            changes.push(StateChange::LoadingChanged {
                is_loading: new.is_loading,
            });
        }

        if old.browse.last != new.browse.last {
            if let Some(page) = &new.browse.last {
                changes.push(StateChange::BrowsePageLoaded {
                    page: page.current_page,
                    pages: page.pages,
                    total: page.total,
                });
            }
        }

        if old.hints.is_some() != new.hints.is_some() {
            changes.push(StateChange::HintsChanged {
                visible: new.hints.is_some(),
            });
        }

        changes
    }

    // Convenience methods for common state updates

    pub fn set_screen(&self, screen: Screen) -> Vec<StateChange> {
        self.update(|state| state.screen = screen)
    }

    pub fn set_loading(&self, is_loading: bool) -> Vec<StateChange> {
        self.update(|state| state.is_loading = is_loading)
    }

    pub fn set_language(&self, language: Language) -> Vec<StateChange> {
        self.update(|state| state.language = language)
    }

    /// Replace the quiz run and show the quiz screen
    pub fn start_session(&self, session: QuizSession) -> Vec<StateChange> {
        self.update(|state| {
            state.hints = None;
            state.session = Some(session);
            state.screen = Screen::Quiz;
        })
    }

    /// Discard the quiz run
    pub fn reset_session(&self) -> Vec<StateChange> {
        self.update(AppState::reset_session)
    }

    /// Load preferences from UserConfig
    ///
    /// # Returns
    /// A vector of StateChange events that were emitted
    pub fn load_from_user_config(&self, user_config: &UserConfig) -> Vec<StateChange> {
        self.update(|state| {
            state.language = user_config.language;
            state.browse.per_page = user_config.per_page.max(1);

            tracing::info!(
                "Loaded user config: api_base={}, language={}, per_page={}, confirm_discard={}",
                user_config.api_base(),
                user_config.language,
                state.browse.per_page,
                user_config.confirm_discard
            );
        })
    }
}

impl Default for StateManager {
    fn default() -> Self {
        Self::new()
    }
}

// Make StateManager cloneable for sharing across tasks
impl Clone for StateManager {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            state_tx: self.state_tx.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AnswerKeys, Question, QuestionPage, QuizSource, Verdict};

    fn question(id: &str, multi: bool, count: usize) -> Question {
        Question {
            id: id.to_string(),
            number: 1,
            text: format!("Question {id}"),
            options: vec!["A) a".into(), "B) b".into(), "C) c".into()],
            is_multiple_choice: multi,
            select_count: count,
            category: None,
            correct: None,
            has_translation: false,
            ai_verified: None,
        }
    }

    fn verdict(answers: &[&str]) -> Verdict {
        Verdict {
            correct: None,
            correct_answers: AnswerKeys::Many(answers.iter().map(|a| a.to_string()).collect()),
            explanation: "x".to_string(),
            has_translation: false,
        }
    }

    #[test]
    fn test_new_state_manager() {
        let manager = StateManager::new();
        let state = manager.snapshot();

        assert_eq!(state.screen, Screen::Welcome);
        assert!(state.session.is_none());
        assert!(!state.is_loading);
    }

    #[test]
    fn test_start_session_emits_screen_and_question() {
        let manager = StateManager::new();
        let session = QuizSession::new(QuizSource::Random, vec![question("q1", false, 1)]);

        let changes = manager.start_session(session);

        assert!(changes.contains(&StateChange::ScreenChanged {
            from: Screen::Welcome,
            to: Screen::Quiz
        }));
        assert!(changes.contains(&StateChange::QuestionChanged {
            question_id: Some("q1".to_string()),
            index: 0,
            total: 1
        }));
    }

    #[test]
    fn test_selection_change_detection() {
        let manager = StateManager::new();
        manager.start_session(QuizSession::new(
            QuizSource::Random,
            vec![question("q1", true, 2)],
        ));

        let changes = manager.update(|state| {
            if let Some(session) = state.session.as_mut() {
                session.select(&OptionKey::new("A")).unwrap();
            }
        });

        assert_eq!(
            changes,
            vec![StateChange::SelectionChanged {
                selected: vec![OptionKey::new("A")],
                required: 2,
                can_submit: false
            }]
        );
    }

    #[test]
    fn test_verdict_and_stats_detection() {
        let manager = StateManager::new();
        manager.start_session(QuizSession::new(
            QuizSource::Random,
            vec![question("q1", false, 1)],
        ));

        let changes = manager.update(|state| {
            if let Some(session) = state.session.as_mut() {
                session.select(&OptionKey::new("B")).unwrap();
                session
                    .record_verdict("q1", &[OptionKey::new("B")], verdict(&["B"]))
                    .unwrap();
            }
        });

        assert!(changes.contains(&StateChange::VerdictRecorded {
            question_id: "q1".to_string(),
            correct: true
        }));
        assert!(changes.iter().any(|c| matches!(
            c,
            StateChange::StatsChanged { stats } if stats.correct == 1 && stats.total == 1
        )));
    }

    #[test]
    fn test_reset_session_event() {
        let manager = StateManager::new();
        manager.start_session(QuizSession::new(QuizSource::Random, Vec::new()));

        let changes = manager.reset_session();

        assert!(changes.contains(&StateChange::SessionReset));
        assert!(manager.read(|state| state.session.is_none()));
    }

    #[test]
    fn test_browse_page_detection() {
        let manager = StateManager::new();
        let changes = manager.update(|state| {
            state.browse.last = Some(QuestionPage {
                current_page: 2,
                pages: 4,
                total: 40,
                ..Default::default()
            });
        });

        assert_eq!(
            changes,
            vec![StateChange::BrowsePageLoaded {
                page: 2,
                pages: 4,
                total: 40
            }]
        );
    }

    #[test]
    fn test_load_from_user_config() {
        let manager = StateManager::new();
        let config = UserConfig {
            language: Language::Ru,
            per_page: 24,
            ..Default::default()
        };

        let changes = manager.load_from_user_config(&config);

        assert_eq!(
            changes,
            vec![StateChange::LanguageChanged {
                language: Language::Ru
            }]
        );
        assert_eq!(manager.read(|state| state.browse.per_page), 24);
    }

    #[test]
    fn test_subscribe_to_changes() {
        let manager = StateManager::new();
        let mut rx = manager.subscribe();

        manager.set_loading(true);

        let event = rx.try_recv();
        assert!(matches!(
            event,
            Ok(StateChange::LoadingChanged { is_loading: true })
        ));
    }

    #[test]
    fn test_multiple_subscribers() {
        let manager = StateManager::new();
        let mut rx1 = manager.subscribe();
        let mut rx2 = manager.subscribe();

        manager.set_screen(Screen::Browse);

        assert!(rx1.try_recv().is_ok());
        assert!(rx2.try_recv().is_ok());
    }

    #[test]
    fn test_no_events_without_changes() {
        let manager = StateManager::new();
        let changes = manager.set_screen(Screen::Welcome);
        assert!(changes.is_empty());
    }

    #[test]
    fn test_clone_state_manager() {
        let manager1 = StateManager::new();
        let manager2 = manager1.clone();

        manager1.set_language(Language::Ru);

        assert_eq!(manager2.snapshot().language, Language::Ru);
    }
}
