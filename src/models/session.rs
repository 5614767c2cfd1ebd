use super::question::{OptionKey, Question, Verdict};
use super::selection::{Selection, SelectionUpdate};
use thiserror::Error;

/// Errors raised by session transitions.
///
/// These are user-level mistakes (wrong option letter, checking too early) and are
/// reported as toasts rather than propagated.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("No question is loaded")]
    NoQuestion,

    #[error("Option {0} does not exist for this question")]
    UnknownOption(String),

    #[error("Question already answered")]
    AlreadyAnswered,

    #[error("Select {required} option(s) before checking (selected {selected})")]
    IncompleteSelection { selected: usize, required: usize },

    #[error("Verdict belongs to question {0}, which is no longer current")]
    StaleQuestion(String),
}

/// Where the questions of a session come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuizSource {
    /// One random question per "next", appended to the session.
    Random,
    /// A shuffled, pre-fetched deck, optionally restricted to one category.
    Deck { category: Option<String> },
    /// A single question opened from the browser.
    Single,
}

/// Running score for the active quiz run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionStats {
    pub correct: usize,
    pub incorrect: usize,
    pub total: usize,
}

impl SessionStats {
    pub fn record(&mut self, correct: bool) {
        if correct {
            self.correct += 1;
        } else {
            self.incorrect += 1;
        }
        self.total += 1;
    }

    /// Rounded share of correct answers, 0 before the first answer.
    pub fn percent(&self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        ((self.correct as f64 / self.total as f64) * 100.0).round() as u32
    }
}

/// The user's answer to one question together with the server's verdict.
#[derive(Debug, Clone, PartialEq)]
pub struct AnswerRecord {
    pub selection: Vec<OptionKey>,
    pub verdict: Verdict,
    pub correct: bool,
}

impl AnswerRecord {
    pub fn correct_keys(&self, question: &Question) -> Vec<OptionKey> {
        self.verdict.correct_keys(question).into_iter().collect()
    }
}

/// State of one quiz run, from start to reset or completion.
#[derive(Debug, Clone, PartialEq)]
pub struct QuizSession {
    pub source: QuizSource,
    questions: Vec<Question>,
    records: Vec<Option<AnswerRecord>>,
    index: usize,
    selection: Selection,
    stats: SessionStats,
}

impl QuizSession {
    pub fn new(source: QuizSource, questions: Vec<Question>) -> Self {
        let records = vec![None; questions.len()];
        Self {
            source,
            questions,
            records,
            index: 0,
            selection: Selection::new(),
            stats: SessionStats::default(),
        }
    }

    pub fn current(&self) -> Option<&Question> {
        self.questions.get(self.index)
    }

    pub fn current_record(&self) -> Option<&AnswerRecord> {
        self.records.get(self.index).and_then(Option::as_ref)
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn is_first(&self) -> bool {
        self.index == 0
    }

    pub fn is_last(&self) -> bool {
        self.index + 1 >= self.questions.len()
    }

    /// True once at least one answer has been recorded.
    pub fn has_progress(&self) -> bool {
        self.records.iter().any(Option::is_some)
    }

    pub fn required_count(&self) -> usize {
        self.current().map(Question::required_count).unwrap_or(1)
    }

    /// Submit is enabled when the selection is complete and the question is unanswered.
    pub fn can_submit(&self) -> bool {
        self.current().is_some()
            && self.current_record().is_none()
            && self.selection.is_complete(self.required_count())
    }

    /// Apply a click on `option` for the current question.
    pub fn select(&mut self, option: &OptionKey) -> Result<SelectionUpdate, SessionError> {
        let question = self.current().ok_or(SessionError::NoQuestion)?;
        if self.current_record().is_some() {
            return Err(SessionError::AlreadyAnswered);
        }
        if !question.option_keys().contains(option) {
            return Err(SessionError::UnknownOption(option.to_string()));
        }

        let update = self.selection.select(
            option.clone(),
            question.is_multiple_choice,
            question.required_count(),
        );
        self.selection = update.selection.clone();
        Ok(update)
    }

    /// Payload for a check request on the current question.
    pub fn pending_check(&self) -> Result<(Question, Vec<OptionKey>), SessionError> {
        let question = self.current().ok_or(SessionError::NoQuestion)?;
        if self.current_record().is_some() {
            return Err(SessionError::AlreadyAnswered);
        }
        let required = question.required_count();
        if !self.selection.is_complete(required) {
            return Err(SessionError::IncompleteSelection {
                selected: self.selection.len(),
                required,
            });
        }
        Ok((question.clone(), self.selection.keys().to_vec()))
    }

    /// Record the verdict for `question_id`.
    ///
    /// The first verdict for a question creates its record and updates the stats. A verdict
    /// for an already answered question (for example re-fetched in another language) only
    /// replaces the stored explanation; correctness and stats are left alone.
    pub fn record_verdict(
        &mut self,
        question_id: &str,
        selection: &[OptionKey],
        verdict: Verdict,
    ) -> Result<&AnswerRecord, SessionError> {
        let question = self.current().ok_or(SessionError::NoQuestion)?;
        if question.id != question_id {
            return Err(SessionError::StaleQuestion(question_id.to_string()));
        }
        let correct = verdict.is_correct_for(question, selection);

        let index = self.index;
        match self.records[index].as_mut() {
            Some(existing) => {
                existing.verdict.explanation = verdict.explanation;
                existing.verdict.has_translation = verdict.has_translation;
            }
            None => {
                self.stats.record(correct);
                self.selection = Selection::from_keys(selection.iter().cloned());
                self.records[index] = Some(AnswerRecord {
                    selection: selection.to_vec(),
                    verdict,
                    correct,
                });
            }
        }

        self.records[index].as_ref().ok_or(SessionError::NoQuestion)
    }

    /// Append a freshly fetched question and make it current.
    pub fn push_question(&mut self, question: Question) {
        self.questions.push(question);
        self.records.push(None);
        self.index = self.questions.len() - 1;
        self.selection = Selection::new();
    }

    /// Move to the next question. Returns false at the end of the session.
    pub fn advance(&mut self) -> bool {
        if self.is_last() {
            return false;
        }
        self.index += 1;
        self.restore_selection();
        true
    }

    /// Move to the previous question. Returns false at the start of the session.
    pub fn retreat(&mut self) -> bool {
        if self.is_first() {
            return false;
        }
        self.index -= 1;
        self.restore_selection();
        true
    }

    /// Swap in another rendition (usually a translation) of the current question.
    ///
    /// The selection and any recorded answer are kept. Ignored when `replacement` is not
    /// the current question.
    pub fn replace_current(&mut self, replacement: Question) -> bool {
        let index = self.index;
        match self.questions.get_mut(index) {
            Some(question) if question.id == replacement.id => {
                let options_match = replacement.options.len() == question.options.len();
                question.text = replacement.text;
                if options_match {
                    question.options = replacement.options;
                }
                question.has_translation = replacement.has_translation;
                true
            }
            _ => false,
        }
    }

    fn restore_selection(&mut self) {
        self.selection = match self.current_record() {
            Some(record) => Selection::from_keys(record.selection.iter().cloned()),
            None => Selection::new(),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::question::AnswerKeys;

    fn question(id: &str, multi: bool, count: usize) -> Question {
        Question {
            id: id.to_string(),
            number: 1,
            text: format!("Question {id}"),
            options: vec![
                "A) one".to_string(),
                "B) two".to_string(),
                "C) three".to_string(),
                "D) four".to_string(),
            ],
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
            explanation: "Because.".to_string(),
            has_translation: false,
        }
    }

    fn key(k: &str) -> OptionKey {
        OptionKey::new(k)
    }

    #[test]
    fn test_select_and_submit_multi() {
        let mut session = QuizSession::new(QuizSource::Random, vec![question("q1", true, 2)]);

        session.select(&key("A")).unwrap();
        assert!(!session.can_submit());
        session.select(&key("B")).unwrap();
        session.select(&key("C")).unwrap();

        assert_eq!(session.selection().keys(), &[key("B"), key("C")]);
        assert!(session.can_submit());
    }

    #[test]
    fn test_unknown_option_rejected() {
        let mut session = QuizSession::new(QuizSource::Random, vec![question("q1", false, 1)]);
        assert_eq!(
            session.select(&key("Z")),
            Err(SessionError::UnknownOption("Z".to_string()))
        );
    }

    #[test]
    fn test_record_verdict_updates_stats_once() {
        let mut session = QuizSession::new(QuizSource::Random, vec![question("q1", false, 1)]);
        session.select(&key("B")).unwrap();
        let (q, selection) = session.pending_check().unwrap();

        let record = session.record_verdict(&q.id, &selection, verdict(&["B"])).unwrap();
        assert!(record.correct);
        assert_eq!(session.stats().total, 1);

        // A re-fetched verdict (e.g. translated) keeps the stats
        let mut translated = verdict(&["B"]);
        translated.explanation = "Потому что.".to_string();
        session.record_verdict(&q.id, &selection, translated).unwrap();

        assert_eq!(session.stats(), SessionStats { correct: 1, incorrect: 0, total: 1 });
        assert_eq!(session.current_record().unwrap().verdict.explanation, "Потому что.");
    }

    #[test]
    fn test_answered_question_is_locked() {
        let mut session = QuizSession::new(QuizSource::Random, vec![question("q1", false, 1)]);
        session.select(&key("A")).unwrap();
        session.record_verdict("q1", &[key("A")], verdict(&["C"])).unwrap();

        assert_eq!(session.select(&key("C")), Err(SessionError::AlreadyAnswered));
        assert!(!session.can_submit());
        assert_eq!(session.stats().incorrect, 1);
    }

    #[test]
    fn test_stale_verdict_rejected() {
        let mut session = QuizSession::new(
            QuizSource::Deck { category: None },
            vec![question("q1", false, 1), question("q2", false, 1)],
        );
        session.advance();
        let result = session.record_verdict("q1", &[key("A")], verdict(&["A"]));
        assert_eq!(result, Err(SessionError::StaleQuestion("q1".to_string())));
        assert_eq!(session.stats().total, 0);
    }

    #[test]
    fn test_back_navigation_restores_answer() {
        let mut session = QuizSession::new(
            QuizSource::Deck { category: None },
            vec![question("q1", false, 1), question("q2", false, 1)],
        );
        session.select(&key("D")).unwrap();
        session.record_verdict("q1", &[key("D")], verdict(&["D"])).unwrap();

        assert!(session.advance());
        assert!(session.selection().is_empty());
        assert!(session.is_last());
        assert!(!session.advance());

        assert!(session.retreat());
        assert_eq!(session.selection().keys(), &[key("D")]);
        assert!(session.current_record().is_some());
    }

    #[test]
    fn test_push_question_makes_it_current() {
        let mut session = QuizSession::new(QuizSource::Random, Vec::new());
        assert!(session.current().is_none());

        session.push_question(question("q1", false, 1));
        session.push_question(question("q2", false, 1));
        assert_eq!(session.current().unwrap().id, "q2");
        assert_eq!(session.len(), 2);
    }

    #[test]
    fn test_incomplete_selection_cannot_be_checked() {
        let mut session = QuizSession::new(QuizSource::Random, vec![question("q1", true, 3)]);
        session.select(&key("A")).unwrap();
        assert_eq!(
            session.pending_check(),
            Err(SessionError::IncompleteSelection { selected: 1, required: 3 })
        );
    }

    #[test]
    fn test_replace_current_ignores_other_question() {
        let mut session = QuizSession::new(QuizSource::Random, vec![question("q1", false, 1)]);
        session.select(&key("B")).unwrap();

        let mut other = question("q2", false, 1);
        other.text = "Вопрос".to_string();
        assert!(!session.replace_current(other));

        let mut translated = question("q1", false, 1);
        translated.text = "Вопрос".to_string();
        translated.options = vec!["A) один".into(), "B) два".into(), "C) три".into(), "D) четыре".into()];
        translated.has_translation = true;
        assert!(session.replace_current(translated));

        let current = session.current().unwrap();
        assert_eq!(current.text, "Вопрос");
        assert_eq!(current.option_label(1).unwrap(), "B) два");
        assert_eq!(session.selection().keys(), &[key("B")]);
    }

    #[test]
    fn test_stats_percent() {
        let mut stats = SessionStats::default();
        assert_eq!(stats.percent(), 0);
        stats.record(true);
        stats.record(true);
        stats.record(false);
        assert_eq!(stats.percent(), 67);
    }
}
