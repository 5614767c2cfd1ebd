use super::question::{AnswerKeys, Language, OptionKey, Question};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One page of the question listing (`GET /questions/paginated`).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionPage {
    pub questions: Vec<Question>,
    #[serde(default)]
    pub total: usize,
    #[serde(default)]
    pub pages: usize,
    #[serde(default = "first_page")]
    pub current_page: usize,
    #[serde(default)]
    pub per_page: usize,
    #[serde(default)]
    pub has_next: bool,
    #[serde(default)]
    pub has_prev: bool,
}

fn first_page() -> usize {
    1
}

impl QuestionPage {
    /// Page numbers shown around the current page (two on either side).
    pub fn page_window(&self) -> Vec<usize> {
        if self.pages <= 1 {
            return Vec::new();
        }
        let start = self.current_page.saturating_sub(2).max(1);
        let end = (self.current_page + 2).min(self.pages);
        (start..=end).collect()
    }
}

/// Body of `POST /ai/check-answer`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckRequest {
    pub question_id: String,
    pub lang: Language,
    pub answer: Vec<OptionKey>,
    pub is_multi_select: bool,
}

/// Question bank of the category decks (`GET /academo/questions`).
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct DeckQuestions {
    #[serde(default)]
    pub questions: Vec<Question>,
}

/// Body of `POST /academo/check`.
///
/// Deck answers are option texts: one string for single-select questions and a list for
/// multi-select ones.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckCheckRequest {
    pub question_id: String,
    pub answer: AnswerKeys,
    pub is_multi_select: bool,
}

impl DeckCheckRequest {
    /// Build the request for `selection` on `question`; `None` if a key has no option.
    pub fn for_selection(question: &Question, selection: &[OptionKey]) -> Option<Self> {
        let texts = selection
            .iter()
            .map(|key| question.option_text(key).map(str::to_string))
            .collect::<Option<Vec<_>>>()?;

        let answer = match (question.is_multiple_choice, texts.as_slice()) {
            (false, [single]) => AnswerKeys::One(single.clone()),
            _ => AnswerKeys::Many(texts),
        };
        Some(Self {
            question_id: question.id.clone(),
            answer,
            is_multi_select: question.is_multiple_choice,
        })
    }
}

/// Body of `POST /ai/translate-question`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslateRequest {
    pub question_id: String,
}

/// Translated question text and options.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TranslatedQuestion {
    pub question: String,
    pub options: Vec<String>,
}

/// Aggregate statistics (`GET /stats`, or `GET /academo/stats` with per-category counts).
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiStats {
    #[serde(default)]
    pub total_questions: usize,
    #[serde(default)]
    pub cached_answers: usize,
    #[serde(default)]
    pub translations_count: usize,
    #[serde(default)]
    pub coverage: f64,
    #[serde(default)]
    pub categories: IndexMap<String, usize>,
}

/// Result of `POST /questions/upload`.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct UploadSummary {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub new: usize,
    #[serde(default)]
    pub duplicates: usize,
    #[serde(default)]
    pub total: usize,
}

/// Service status (`GET /health`).
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub database: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}
