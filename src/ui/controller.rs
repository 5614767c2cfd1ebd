// Quiz Controller - Bridges user commands with state management and the quiz API
//
// This module contains the QuizController which coordinates between:
// - StateManager (application state)
// - QuizApi (remote questions, verdicts, translations)
// - RequestTracker (dropping superseded responses)
// - ToastSender (transient notifications)
//
// It handles:
// - Quiz flows (random stream, shuffled deck, single question from the browser)
// - Answer selection and checking
// - Language switching with server-side translation
// - Browsing, uploads and statistics

use crate::config::ConfigManager;
use crate::i18n::{self, Text};
use crate::metrics::Metrics;
use crate::models::{
    AnswerKeys, ApiStats, CheckRequest, DeckCheckRequest, HealthStatus, Language, OptionKey,
    Question, QuizSession, QuizSource, Screen, ScreenAction, SelectionUpdate, SessionError,
    UploadSummary, UserConfig, Verdict,
};
use crate::services::{ApiError, HintService, ImportService, PageQuery, QuizApi};
use crate::state::{RequestChannel, RequestToken, RequestTracker, StateChange, StateManager};
use crate::ui::toast::{Toast, ToastSender};
use camino::Utf8Path;
use rand::seq::SliceRandom;
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Instant;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;

/// Page size used to look up a question in another language
const LOOKUP_PAGE_SIZE: usize = 100;

/// Result of asking to leave the current quiz
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackOutcome {
    /// Returned to the welcome screen
    Left,
    /// Recorded answers would be lost; call again with `confirmed = true`
    NeedsConfirmation,
}

/// Controller that turns user commands into state transitions and API calls
///
/// Every API failure is caught here: it is logged, shown as a toast and leaves the
/// state exactly as it was before the command.
///
/// # Example
/// ```ignore
/// let state = StateManager::new();
/// let api = Arc::new(HttpQuizApi::from_config(&config)?);
/// let (controller, toasts) = QuizController::new(api, state, config, metrics);
///
/// controller.start_quiz().await;
/// controller.select_option("b")?;
/// controller.check_answer().await;
/// ```
pub struct QuizController<A: QuizApi> {
    api: Arc<A>,

    /// Shared state manager
    state: StateManager,

    /// User settings in effect for this run
    config: UserConfig,

    /// Persists the language choice when present
    config_manager: Option<ConfigManager>,

    tracker: RequestTracker,
    toasts: ToastSender,
    metrics: Arc<Metrics>,

    hint_service: HintService,
    import_service: ImportService,

    /// English renditions of questions translated during this run, keyed by id
    originals: Mutex<HashMap<String, Question>>,
}

impl<A: QuizApi> QuizController<A> {
    /// Create a new controller and the receiving end of its toast channel
    pub fn new(
        api: Arc<A>,
        state: StateManager,
        config: UserConfig,
        metrics: Arc<Metrics>,
    ) -> (Self, mpsc::Receiver<Toast>) {
        let (toasts, toast_rx) = ToastSender::channel(Arc::clone(&metrics));
        state.load_from_user_config(&config);

        tracing::info!("Quiz controller initialized");

        let controller = Self {
            api,
            state,
            config,
            config_manager: None,
            tracker: RequestTracker::new(),
            toasts,
            metrics,
            hint_service: HintService::new(),
            import_service: ImportService::new(),
            originals: Mutex::new(HashMap::new()),
        };
        (controller, toast_rx)
    }

    /// Persist language changes through `config_manager`
    pub fn with_config_manager(mut self, config_manager: ConfigManager) -> Self {
        self.config_manager = Some(config_manager);
        self
    }

    pub fn state(&self) -> &StateManager {
        &self.state
    }

    pub fn tracker(&self) -> &RequestTracker {
        &self.tracker
    }

    pub fn config(&self) -> &UserConfig {
        &self.config
    }

    fn language(&self) -> Language {
        self.state.read(|state| state.language)
    }

    fn text(&self, text: Text) -> &'static str {
        i18n::t(self.language(), text)
    }

    /// Whether the active quiz runs on the category deck bank
    fn in_deck(&self) -> bool {
        self.state.read(|state| {
            state
                .session
                .as_ref()
                .is_some_and(|s| matches!(s.source, QuizSource::Deck { .. }))
        })
    }

    /// Await an API call with the loading indicator shown
    async fn call<T, F>(&self, request: F) -> Result<T, ApiError>
    where
        F: Future<Output = Result<T, ApiError>>,
    {
        let started = Instant::now();
        self.state.set_loading(true);
        let result = request.await;
        self.state.set_loading(false);
        self.metrics.record_api_time(started.elapsed());
        result
    }

    /// Whether a response for `token` may still be applied
    fn accept(&self, token: &RequestToken) -> bool {
        if self.tracker.is_current(token) {
            return true;
        }
        tracing::debug!(
            "Dropping stale {:?} response (generation {})",
            token.channel,
            token.generation
        );
        self.metrics.record_stale_response();
        false
    }

    /// Report an API failure as a toast
    fn report(&self, action: &str, error: &ApiError) {
        tracing::warn!("{} failed: {}", action, error);
        if error.is_rate_limited() {
            self.metrics.record_rate_limited();
        }
        let message = match error {
            ApiError::RateLimited { retry_after } => {
                format!("{} {}s", self.text(Text::RateLimited), retry_after)
            }
            ApiError::Http(_) => self.text(Text::NetworkError).to_string(),
            other => other.to_string(),
        };
        self.toasts.error(message);
    }

    /// Responses for the previous question must not land on the next one
    fn invalidate_question_requests(&self) {
        self.tracker.invalidate(RequestChannel::Translation);
        self.tracker.invalidate(RequestChannel::Verdict);
        self.tracker.invalidate(RequestChannel::Hints);
    }

    // ------------------------------------------------------------------
    // Quiz flows
    // ------------------------------------------------------------------

    /// Start a random-stream quiz with a freshly fetched question
    pub async fn start_quiz(&self) -> bool {
        let token = self.tracker.issue(RequestChannel::Question);
        let language = self.language();

        let question = match self.call(self.api.random_question(language)).await {
            Ok(question) => question,
            Err(e) => {
                self.report("Loading a question", &e);
                return false;
            }
        };
        if !self.accept(&token) {
            return false;
        }

        self.metrics.record_questions_loaded(1);
        self.begin(QuizSession::new(QuizSource::Random, vec![question]))
            .await;
        true
    }

    /// Start a shuffled deck from the category bank, optionally restricted to `category`
    /// (`all` means no filter)
    pub async fn start_deck(&self, category: Option<&str>) -> bool {
        let category = category
            .map(str::trim)
            .filter(|c| !c.is_empty() && !c.eq_ignore_ascii_case("all"))
            .map(str::to_string);

        let token = self.tracker.issue(RequestChannel::Question);

        let bank = match self.call(self.api.deck_questions()).await {
            Ok(bank) => bank,
            Err(e) => {
                self.report("Loading the deck", &e);
                return false;
            }
        };
        if !self.accept(&token) {
            return false;
        }

        let mut questions: Vec<Question> = bank
            .questions
            .into_iter()
            .filter(|question| match &category {
                Some(wanted) => question
                    .category
                    .as_deref()
                    .is_some_and(|c| c.eq_ignore_ascii_case(wanted)),
                None => true,
            })
            .collect();

        if questions.is_empty() {
            tracing::info!("Deck for category {:?} is empty", category);
            self.toasts.warning(self.text(Text::EmptyDeck));
            return false;
        }

        questions.shuffle(&mut rand::thread_rng());
        questions.truncate(self.config.deck_size.max(1));
        self.metrics.record_questions_loaded(questions.len());
        tracing::info!(
            "Starting deck with {} questions (category: {:?})",
            questions.len(),
            category
        );

        self.begin(QuizSession::new(QuizSource::Deck { category }, questions))
            .await;
        true
    }

    /// Start again with the same kind of quiz as the current one
    pub async fn restart(&self) -> bool {
        let source = self
            .state
            .read(|state| state.session.as_ref().map(|s| s.source.clone()));
        match source {
            Some(QuizSource::Deck { category }) => self.start_deck(category.as_deref()).await,
            _ => self.start_quiz().await,
        }
    }

    async fn begin(&self, session: QuizSession) {
        self.invalidate_question_requests();
        self.state.start_session(session);
        if self.config.show_hints_by_default {
            self.load_hints().await;
        }
    }

    /// Move to the next question, fetching a new one at the end of a random stream
    pub async fn next_question(&self) -> bool {
        let (source, at_end) = match self.state.read(|state| {
            state
                .session
                .as_ref()
                .map(|s| (s.source.clone(), s.is_last()))
        }) {
            Some(position) => position,
            None => return false,
        };

        if !at_end {
            self.invalidate_question_requests();
            self.state.update(|state| {
                state.hints = None;
                if let Some(session) = state.session.as_mut() {
                    session.advance();
                }
            });
            return self.after_navigation().await;
        }

        if source != QuizSource::Random {
            return false;
        }

        let token = self.tracker.issue(RequestChannel::Question);
        let question = match self.call(self.api.random_question(self.language())).await {
            Ok(question) => question,
            Err(e) => {
                self.report("Loading the next question", &e);
                return false;
            }
        };
        if !self.accept(&token) {
            return false;
        }

        self.metrics.record_questions_loaded(1);
        self.invalidate_question_requests();
        self.state.update(|state| {
            state.hints = None;
            if let Some(session) = state.session.as_mut() {
                session.push_question(question);
            }
        });
        self.after_navigation().await
    }

    /// Move back to the previous question, showing its recorded answer
    pub async fn prev_question(&self) -> bool {
        let can_go_back = self
            .state
            .read(|state| state.session.as_ref().is_some_and(|s| !s.is_first()));
        if !can_go_back {
            return false;
        }

        self.invalidate_question_requests();
        self.state.update(|state| {
            state.hints = None;
            if let Some(session) = state.session.as_mut() {
                session.retreat();
            }
        });
        self.after_navigation().await
    }

    async fn after_navigation(&self) -> bool {
        if self.config.show_hints_by_default {
            self.load_hints().await;
        }
        true
    }

    /// Apply a click on the option named by `input` (letter or 1-based number)
    pub fn select_option(&self, input: &str) -> Result<SelectionUpdate, SessionError> {
        let mut result = Err(SessionError::NoQuestion);
        self.state.update(|state| {
            let Some(session) = state.session.as_mut() else {
                return;
            };
            let Some(question) = session.current() else {
                return;
            };
            result = match question.resolve_option(input) {
                Some(option) => session.select(&option),
                None => Err(SessionError::UnknownOption(input.trim().to_string())),
            };
        });

        match &result {
            Ok(update) => {
                if update.evicted.is_some() {
                    let required = self.state.read(|state| {
                        state
                            .session
                            .as_ref()
                            .map(QuizSession::required_count)
                            .unwrap_or(1)
                    });
                    self.toasts
                        .info(i18n::only_select(self.language(), required));
                }
            }
            Err(SessionError::AlreadyAnswered) => {
                tracing::debug!("Ignoring selection on answered question");
            }
            Err(e) => self.toasts.warning(e.to_string()),
        }
        result
    }

    /// `Selected k of n` while a multi-select answer is incomplete
    pub fn selection_hint(&self) -> Option<String> {
        self.state.read(|state| {
            let session = state.session.as_ref()?;
            let question = session.current()?;
            let selected = session.selection().len();
            let required = session.required_count();
            if question.is_multiple_choice
                && session.current_record().is_none()
                && selected > 0
                && selected < required
            {
                Some(i18n::selected_of(state.language, selected, required))
            } else {
                None
            }
        })
    }

    /// Send the selection for the current question and record the verdict
    ///
    /// Returns false when nothing was recorded: incomplete selection, already answered,
    /// failed request or a response that arrived after navigation.
    pub async fn check_answer(&self) -> bool {
        let pending = self.state.read(|state| {
            state
                .session
                .as_ref()
                .map(QuizSession::pending_check)
                .unwrap_or(Err(SessionError::NoQuestion))
        });
        let (question, selection) = match pending {
            Ok(pending) => pending,
            Err(SessionError::AlreadyAnswered) => return false,
            Err(e) => {
                self.toasts.warning(e.to_string());
                return false;
            }
        };

        let token = self.tracker.issue(RequestChannel::Verdict);
        self.metrics.record_check_sent();
        let result = if self.in_deck() {
            match DeckCheckRequest::for_selection(&question, &selection) {
                Some(request) => self.call(self.api.check_deck_answer(&request)).await,
                None => {
                    tracing::warn!(
                        "Selection {:?} does not match the options of {}",
                        selection,
                        question.id
                    );
                    return false;
                }
            }
        } else {
            let request = CheckRequest {
                question_id: question.id.clone(),
                lang: self.language(),
                answer: selection.clone(),
                is_multi_select: question.is_multiple_choice,
            };
            self.call(self.api.check_answer(&request)).await
        };
        let verdict = match result {
            Ok(verdict) => verdict,
            Err(e) => {
                self.metrics.record_check_failed();
                self.report("Checking the answer", &e);
                return false;
            }
        };
        if !self.accept(&token) {
            return false;
        }

        let mut recorded = None;
        self.state.update(|state| {
            if let Some(session) = state.session.as_mut() {
                recorded = session
                    .record_verdict(&question.id, &selection, verdict)
                    .map(|record| record.correct)
                    .ok();
            }
        });

        match recorded {
            Some(correct) => {
                tracing::info!("Question {} answered (correct: {})", question.id, correct);
                true
            }
            None => {
                self.metrics.record_stale_response();
                false
            }
        }
    }

    /// Show the results screen
    pub fn finish(&self) -> bool {
        let next = self
            .state
            .read(|state| state.screen.transition(ScreenAction::Finish));
        match next {
            Some(screen) => {
                self.invalidate_question_requests();
                self.state.update(|state| {
                    state.screen = screen;
                    state.hints = None;
                });
                true
            }
            None => false,
        }
    }

    /// Return to the welcome screen, discarding the quiz run
    pub fn back(&self, confirmed: bool) -> BackOutcome {
        let needs_confirmation = self.config.confirm_discard
            && self.state.read(|state| {
                state.screen == Screen::Quiz && state.has_unsaved_progress()
            });
        if needs_confirmation && !confirmed {
            return BackOutcome::NeedsConfirmation;
        }

        self.tracker.invalidate_all();
        self.state.update(|state| {
            state.reset_session();
            state.screen = Screen::Welcome;
            state.is_loading = false;
        });
        BackOutcome::Left
    }

    // ------------------------------------------------------------------
    // Hints
    // ------------------------------------------------------------------

    /// Show hints for the current question, or hide them when shown
    pub async fn toggle_hints(&self) -> bool {
        if self.state.read(|state| state.hints.is_some()) {
            self.tracker.invalidate(RequestChannel::Hints);
            self.state.update(|state| state.hints = None);
            return true;
        }
        self.load_hints().await
    }

    async fn load_hints(&self) -> bool {
        let Some(question) = self
            .state
            .read(|state| state.session.as_ref().and_then(|s| s.current().cloned()))
        else {
            return false;
        };

        let language = self.language();
        let token = self.tracker.issue(RequestChannel::Hints);
        let result = if self.in_deck() {
            self.deck_hint_verdict(&question).await
        } else {
            self.hint_verdict(&question, language).await
        };
        let verdict = match result {
            Ok(verdict) => verdict,
            Err(e) => {
                tracing::warn!("Loading hints failed: {}", e);
                self.toasts.error(self.text(Text::HintsError));
                return false;
            }
        };
        if !self.accept(&token) {
            return false;
        }

        let hints = self
            .hint_service
            .from_explanation(&question.id, &verdict.explanation);
        self.state.update(|state| {
            if state.current_question_id().as_deref() == Some(hints.question_id.as_str()) {
                state.hints = Some(hints);
            }
        });
        true
    }

    /// Verdict to derive hints from: the server's cached verdict, or a check without an answer
    async fn hint_verdict(
        &self,
        question: &Question,
        language: Language,
    ) -> Result<Verdict, ApiError> {
        match self.call(self.api.cached_verdict(&question.id, language)).await {
            Err(ApiError::NotFound(_)) => {
                let request = CheckRequest {
                    question_id: question.id.clone(),
                    lang: language,
                    answer: Vec::new(),
                    is_multi_select: question.is_multiple_choice,
                };
                self.call(self.api.check_answer(&request)).await
            }
            other => other,
        }
    }

    /// Deck questions have no verdict cache; the recorded verdict or an empty check is used
    async fn deck_hint_verdict(&self, question: &Question) -> Result<Verdict, ApiError> {
        let recorded = self.state.read(|state| {
            state
                .session
                .as_ref()
                .and_then(QuizSession::current_record)
                .map(|record| record.verdict.clone())
        });
        if let Some(verdict) = recorded {
            return Ok(verdict);
        }

        let request = DeckCheckRequest {
            question_id: question.id.clone(),
            answer: AnswerKeys::Many(Vec::new()),
            is_multi_select: question.is_multiple_choice,
        };
        self.call(self.api.check_deck_answer(&request)).await
    }

    // ------------------------------------------------------------------
    // Language
    // ------------------------------------------------------------------

    /// Switch between English and Russian
    ///
    /// In the quiz the displayed question is swapped for its rendition in the new language
    /// and an existing verdict explanation is re-fetched. A failed translation keeps the
    /// switch and the untranslated question; only a failed question lookup undoes it.
    /// Deck questions come from a single-language bank, so only the interface changes.
    pub async fn toggle_language(&self) -> bool {
        let previous = self.language();
        let next = previous.toggled();
        let token = self.tracker.issue(RequestChannel::Translation);
        if !self.in_deck() {
            // Verdicts carry language-specific explanations
            self.tracker.invalidate(RequestChannel::Verdict);
        }
        self.state.set_language(next);

        let (screen, question, answered, hints_shown) = self.state.read(|state| {
            let session = state.session.as_ref();
            (
                state.screen,
                session.and_then(QuizSession::current).cloned(),
                session.and_then(QuizSession::current_record).cloned(),
                state.hints.is_some(),
            )
        });

        match (screen, question) {
            (Screen::Quiz, Some(_)) if self.in_deck() => {}
            (Screen::Quiz, Some(question)) => {
                let replacement = match self.localized_question(&question, next).await {
                    Ok(replacement) => replacement,
                    Err(e) => {
                        if self.tracker.is_current(&token) {
                            self.state.set_language(previous);
                            tracing::warn!("Looking up {} failed: {}", question.id, e);
                            self.toasts.error(i18n::t(previous, Text::TranslationFailed));
                        }
                        return false;
                    }
                };
                if !self.accept(&token) {
                    return false;
                }

                self.state.update(|state| {
                    if let Some(session) = state.session.as_mut() {
                        session.replace_current(replacement);
                    }
                });

                if let Some(record) = answered {
                    self.reload_explanation(&question, &record.selection, next)
                        .await;
                }
                if hints_shown {
                    self.load_hints().await;
                }
            }
            (Screen::Browse, _) => {
                self.load_page().await;
            }
            _ => {}
        }

        self.persist_language(next);
        self.toasts
            .info(format!("{}: {}", i18n::t(next, Text::LanguageChanged), next));
        true
    }

    /// Find `question` in `language`, translating it on the server when needed
    async fn localized_question(
        &self,
        question: &Question,
        language: Language,
    ) -> Result<Question, ApiError> {
        let listed = self.lookup_question(&question.id, language).await?;

        match language {
            Language::Ru => {
                if let Some(found) = listed.as_ref().filter(|q| q.has_translation) {
                    self.remember_original(question);
                    return Ok(found.clone());
                }

                self.metrics.record_translation();
                let translated = match self.call(self.api.translate_question(&question.id)).await
                {
                    Ok(translated) => translated,
                    Err(e) => {
                        tracing::warn!(
                            "Translation of {} failed, showing it untranslated: {}",
                            question.id,
                            e
                        );
                        if e.is_rate_limited() {
                            self.metrics.record_rate_limited();
                        }
                        self.toasts.error(i18n::t(language, Text::TranslationFailed));
                        return Ok(listed.unwrap_or_else(|| question.clone()));
                    }
                };
                self.remember_original(question);

                let mut replacement = question.clone();
                replacement.text = translated.question;
                replacement.options = translated.options;
                replacement.has_translation = true;
                Ok(replacement)
            }
            Language::En => {
                let original = self
                    .originals
                    .lock()
                    .unwrap_or_else(|poisoned| poisoned.into_inner())
                    .get(&question.id)
                    .cloned();
                Ok(listed.or(original).unwrap_or_else(|| question.clone()))
            }
        }
    }

    async fn lookup_question(
        &self,
        question_id: &str,
        language: Language,
    ) -> Result<Option<Question>, ApiError> {
        let query = PageQuery::new(1, LOOKUP_PAGE_SIZE, language);
        let page = self.call(self.api.list_questions(&query)).await?;
        Ok(page.questions.into_iter().find(|q| q.id == question_id))
    }

    fn remember_original(&self, question: &Question) {
        self.originals
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .entry(question.id.clone())
            .or_insert_with(|| question.clone());
    }

    async fn reload_explanation(
        &self,
        question: &Question,
        selection: &[OptionKey],
        language: Language,
    ) {
        let request = CheckRequest {
            question_id: question.id.clone(),
            lang: language,
            answer: selection.to_vec(),
            is_multi_select: question.is_multiple_choice,
        };

        let token = self.tracker.issue(RequestChannel::Verdict);
        let verdict: Verdict = match self.call(self.api.check_answer(&request)).await {
            Ok(verdict) => verdict,
            Err(e) => {
                // The old explanation stays; the question itself is already translated
                tracing::warn!("Reloading explanation for {} failed: {}", question.id, e);
                return;
            }
        };
        if !self.accept(&token) {
            return;
        }

        self.state.update(|state| {
            if let Some(session) = state.session.as_mut() {
                if let Err(e) = session.record_verdict(&question.id, selection, verdict) {
                    tracing::debug!(
                        "Discarding reloaded explanation for {}: {}",
                        question.id,
                        e
                    );
                }
            }
        });
    }

    fn persist_language(&self, language: Language) {
        if let Some(config_manager) = &self.config_manager {
            if let Err(e) = config_manager.update_user_config(|config| config.language = language)
            {
                tracing::warn!("Failed to save language preference: {:#}", e);
            }
        }
    }

    // ------------------------------------------------------------------
    // Browse
    // ------------------------------------------------------------------

    /// Open the question browser on its current page
    pub async fn browse(&self) -> bool {
        let next = self
            .state
            .read(|state| state.screen.transition(ScreenAction::Browse));
        if let Some(screen) = next {
            self.state.set_screen(screen);
        }
        self.load_page().await
    }

    /// Search question text; results start at page 1
    pub async fn search(&self, text: &str) -> bool {
        self.state.update(|state| {
            state.browse.search = text.trim().to_string();
            state.browse.page = 1;
        });
        self.load_page().await
    }

    pub async fn goto_page(&self, page: usize) -> bool {
        let pages = self
            .state
            .read(|state| state.browse.last.as_ref().map(|p| p.pages));
        let page = match pages {
            Some(pages) if pages > 0 => page.clamp(1, pages),
            _ => page.max(1),
        };
        self.state.update(|state| state.browse.page = page);
        self.load_page().await
    }

    pub async fn next_page(&self) -> bool {
        let next = self.state.read(|state| {
            state
                .browse
                .last
                .as_ref()
                .filter(|page| page.has_next)
                .map(|page| page.current_page + 1)
        });
        match next {
            Some(page) => self.goto_page(page).await,
            None => false,
        }
    }

    pub async fn prev_page(&self) -> bool {
        let prev = self.state.read(|state| {
            state
                .browse
                .last
                .as_ref()
                .filter(|page| page.has_prev)
                .map(|page| page.current_page.saturating_sub(1))
        });
        match prev {
            Some(page) => self.goto_page(page).await,
            None => false,
        }
    }

    pub async fn set_per_page(&self, per_page: usize) -> bool {
        self.state.update(|state| {
            state.browse.per_page = per_page.max(1);
            state.browse.page = 1;
        });
        self.load_page().await
    }

    async fn load_page(&self) -> bool {
        let (page, per_page, search, language) = self.state.read(|state| {
            (
                state.browse.page,
                state.browse.per_page,
                state.browse.search.clone(),
                state.language,
            )
        });
        let query = PageQuery::new(page, per_page, language).with_search(search);

        let token = self.tracker.issue(RequestChannel::Browse);
        let result = match self.call(self.api.list_questions(&query)).await {
            Ok(result) => result,
            Err(e) => {
                self.report("Loading questions", &e);
                return false;
            }
        };
        if !self.accept(&token) {
            return false;
        }

        self.metrics.record_questions_loaded(result.questions.len());
        self.state.update(|state| {
            state.browse.page = result.current_page;
            state.browse.last = Some(result);
        });
        true
    }

    /// Open question `index` (0-based) of the current page as a single-question quiz
    pub async fn view_question(&self, index: usize) -> bool {
        let (next, question) = self.state.read(|state| {
            (
                state.screen.transition(ScreenAction::ViewQuestion),
                state
                    .browse
                    .last
                    .as_ref()
                    .and_then(|page| page.questions.get(index).cloned()),
            )
        });

        match (next, question) {
            (Some(_), Some(question)) => {
                self.begin(QuizSession::new(QuizSource::Single, vec![question]))
                    .await;
                true
            }
            _ => false,
        }
    }

    // ------------------------------------------------------------------
    // Upload and statistics
    // ------------------------------------------------------------------

    /// Validate, preview and upload a Telegram export
    pub async fn upload(&self, path: &Utf8Path) -> Option<UploadSummary> {
        let export = match self.import_service.read_export(path).await {
            Ok(export) => export,
            Err(e) => {
                tracing::warn!("Rejected export {}: {}", path, e);
                self.toasts
                    .error(format!("{} ({})", self.text(Text::UploadFailed), e));
                return None;
            }
        };

        match self.call(self.api.upload(&export.payload)).await {
            Ok(summary) => {
                self.toasts.success(format!(
                    "{} {}: {}, {}: {}",
                    self.text(Text::UploadSuccess),
                    self.text(Text::NewQuestions),
                    summary.new,
                    self.text(Text::Duplicates),
                    summary.duplicates
                ));
                Some(summary)
            }
            Err(e) => {
                self.report("Uploading questions", &e);
                None
            }
        }
    }

    pub async fn stats(&self) -> Option<ApiStats> {
        match self.call(self.api.stats()).await {
            Ok(stats) => Some(stats),
            Err(e) => {
                self.report("Loading statistics", &e);
                None
            }
        }
    }

    /// Question counts of the category deck bank
    pub async fn deck_stats(&self) -> Option<ApiStats> {
        match self.call(self.api.deck_stats()).await {
            Ok(stats) => Some(stats),
            Err(e) => {
                self.report("Loading deck statistics", &e);
                None
            }
        }
    }

    pub async fn health(&self) -> Option<HealthStatus> {
        match self.call(self.api.health()).await {
            Ok(health) => Some(health),
            Err(e) => {
                self.report("Health check", &e);
                None
            }
        }
    }
}

/// Log state change events in a background task
///
/// The task ends when the state manager (and every clone of it) is dropped.
pub fn spawn_state_logger(state: &StateManager) -> JoinHandle<()> {
    let mut rx = state.subscribe();

    tokio::spawn(async move {
        tracing::debug!("State subscription task started");

        loop {
            match rx.recv().await {
                Ok(change) => match change {
                    StateChange::ScreenChanged { from, to } => {
                        tracing::info!("Screen changed: {} -> {}", from, to);
                    }
                    StateChange::VerdictRecorded {
                        question_id,
                        correct,
                    } => {
                        tracing::info!("Verdict for {}: correct={}", question_id, correct);
                    }
                    StateChange::SessionReset => {
                        tracing::info!("Quiz session discarded");
                    }
                    other => {
                        tracing::trace!("State change received: {:?}", other);
                    }
                },
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("State broadcast channel closed - stopping state logger");
                    break;
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(
                        "State subscription lagged - {} events were skipped",
                        skipped
                    );
                }
            }
        }

        tracing::debug!("State subscription task terminated");
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DeckQuestions;
    use crate::services::api::MockQuizApi;
    use std::sync::atomic::Ordering;

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

    fn controller(mock: MockQuizApi) -> (QuizController<MockQuizApi>, mpsc::Receiver<Toast>) {
        QuizController::new(
            Arc::new(mock),
            StateManager::new(),
            UserConfig::default(),
            Arc::new(Metrics::new()),
        )
    }

    #[tokio::test]
    async fn test_start_quiz_failure_keeps_welcome_screen() {
        let mut mock = MockQuizApi::new();
        mock.expect_random_question()
            .returning(|_| Err(ApiError::Http("connection refused".to_string())));

        let (controller, mut toasts) = controller(mock);
        assert!(!controller.start_quiz().await);

        let state = controller.state().snapshot();
        assert_eq!(state.screen, Screen::Welcome);
        assert!(state.session.is_none());
        assert!(!state.is_loading);
        assert_eq!(
            toasts.try_recv().unwrap().message,
            "Network error. Please try again."
        );
    }

    #[tokio::test]
    async fn test_check_answer_records_verdict() {
        let mut mock = MockQuizApi::new();
        mock.expect_random_question()
            .returning(|_| Ok(question("q1", false, 1)));
        mock.expect_check_answer()
            .withf(|request| request.answer == vec![OptionKey::new("B")])
            .times(1)
            .returning(|_| {
                Ok(Verdict {
                    correct: None,
                    correct_answers: AnswerKeys::Many(vec!["B".to_string()]),
                    explanation: "B is right.".to_string(),
                    has_translation: false,
                })
            });

        let (controller, _toasts) = controller(mock);
        controller.start_quiz().await;
        controller.select_option("b").unwrap();

        assert!(controller.check_answer().await);
        let stats = controller
            .state()
            .read(|state| state.session.as_ref().map(QuizSession::stats));
        assert_eq!(stats.map(|s| s.correct), Some(1));

        // A second check is a no-op
        assert!(!controller.check_answer().await);
    }

    #[tokio::test]
    async fn test_empty_deck_shows_toast() {
        let mut mock = MockQuizApi::new();
        mock.expect_deck_questions().returning(|| {
            let mut aws = question("q1", false, 1);
            aws.category = Some("aws".to_string());
            Ok(DeckQuestions {
                questions: vec![aws],
            })
        });

        let (controller, mut toasts) = controller(mock);
        assert!(!controller.start_deck(Some("docker")).await);

        assert_eq!(controller.state().read(|state| state.screen), Screen::Welcome);
        assert_eq!(
            toasts.try_recv().unwrap().message,
            "No questions in this category"
        );
    }

    #[tokio::test]
    async fn test_deck_check_uses_deck_endpoint() {
        let mut mock = MockQuizApi::new();
        mock.expect_deck_questions().returning(|| {
            let mut docker = question("docker_1", false, 1);
            docker.category = Some("docker".to_string());
            docker.options = vec!["containerd".into(), "nginx".into()];
            Ok(DeckQuestions {
                questions: vec![docker],
            })
        });
        mock.expect_check_deck_answer()
            .withf(|request| request.answer == AnswerKeys::One("containerd".to_string()))
            .times(1)
            .returning(|_| {
                Ok(Verdict {
                    correct: Some(true),
                    correct_answers: AnswerKeys::One("containerd".to_string()),
                    explanation: "containerd is a runtime.".to_string(),
                    has_translation: false,
                })
            });
        mock.expect_check_answer().never();

        let (controller, _toasts) = controller(mock);
        assert!(controller.start_deck(Some("Docker")).await);
        controller.select_option("a").unwrap();

        assert!(controller.check_answer().await);
        let correct = controller.state().read(|state| {
            state
                .session
                .as_ref()
                .and_then(QuizSession::current_record)
                .map(|record| record.correct)
        });
        assert_eq!(correct, Some(true));
    }

    #[tokio::test]
    async fn test_rate_limit_is_counted() {
        let mut mock = MockQuizApi::new();
        mock.expect_stats()
            .returning(|| Err(ApiError::RateLimited { retry_after: 30 }));

        let metrics = Arc::new(Metrics::new());
        let (controller, mut toasts) = QuizController::new(
            Arc::new(mock),
            StateManager::new(),
            UserConfig::default(),
            Arc::clone(&metrics),
        );

        assert!(controller.stats().await.is_none());
        assert_eq!(metrics.rate_limited.load(Ordering::Relaxed), 1);
        assert_eq!(
            toasts.try_recv().unwrap().message,
            "Too many requests. Please wait 30s"
        );
    }

    #[test]
    fn test_select_without_session() {
        let (controller, _toasts) = controller(MockQuizApi::new());
        assert_eq!(
            controller.select_option("a"),
            Err(SessionError::NoQuestion)
        );
    }
}
