use super::api::QuestionPage;
use super::question::Language;
use super::screen::Screen;
use super::session::QuizSession;
use super::hints::Hints;

/// Query and last result of the question browser.
#[derive(Clone, Debug, PartialEq)]
pub struct BrowseState {
    pub page: usize,
    pub per_page: usize,
    pub search: String,
    pub last: Option<QuestionPage>,
}

impl Default for BrowseState {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: 12,
            search: String::new(),
            last: None,
        }
    }
}

/// Single source of truth for the client's UI state.
///
/// `AppState` is wrapped in `Arc<RwLock<AppState>>` by [`crate::state::StateManager`].
/// Never mutate it directly; go through
/// [`update()`](crate::state::StateManager::update) so that change events are emitted.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AppState {
    pub screen: Screen,
    pub language: Language,

    // Active quiz run, discarded when returning to the welcome screen
    pub session: Option<QuizSession>,

    pub browse: BrowseState,

    // Hints for the current question, when shown
    pub hints: Option<Hints>,

    pub is_loading: bool,
}

impl AppState {
    /// Leaving now would throw away recorded answers.
    pub fn has_unsaved_progress(&self) -> bool {
        self.session.as_ref().is_some_and(QuizSession::has_progress)
    }

    /// Drop the active quiz run and everything derived from it.
    pub fn reset_session(&mut self) {
        self.session = None;
        self.hints = None;
    }

    pub fn current_question_id(&self) -> Option<String> {
        self.session
            .as_ref()
            .and_then(QuizSession::current)
            .map(|question| question.id.clone())
    }
}
