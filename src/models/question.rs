use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Interface and content language.
///
/// The API accepts the language as a `lang` query/body parameter using these codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Ru,
}

impl Language {
    /// The `lang` code sent to the API.
    pub fn code(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Ru => "ru",
        }
    }

    /// The other supported language.
    pub fn toggled(self) -> Self {
        match self {
            Language::En => Language::Ru,
            Language::Ru => Language::En,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" | "english" => Ok(Language::En),
            "ru" | "russian" => Ok(Language::Ru),
            other => Err(format!("unsupported language: {other}")),
        }
    }
}

/// Identifier of one selectable option.
///
/// Options formatted as `"A) text"` are keyed by their leading letter, anything else by
/// its position (`A`, `B`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OptionKey(String);

impl OptionKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into().trim().to_ascii_uppercase())
    }

    /// Positional key for the option at `index`.
    pub fn positional(index: usize) -> Self {
        if index < 26 {
            Self(((b'A' + index as u8) as char).to_string())
        } else {
            Self((index + 1).to_string())
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One or more answer markers.
///
/// The check endpoint reports canonical answers either as `correctAnswers: ["A", "C"]`
/// or as `correctAnswer: "text"` / `correctAnswer: ["text", ...]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerKeys {
    One(String),
    Many(Vec<String>),
}

impl AnswerKeys {
    pub fn to_vec(&self) -> Vec<String> {
        match self {
            AnswerKeys::One(answer) => vec![answer.clone()],
            AnswerKeys::Many(answers) => answers.clone(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            AnswerKeys::One(_) => 1,
            AnswerKeys::Many(answers) => answers.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for AnswerKeys {
    fn default() -> Self {
        AnswerKeys::Many(Vec::new())
    }
}

/// Question as served by the quiz API.
///
/// Two payload dialects are accepted: the paginated/random endpoints
/// (`isMultipleChoice` + `selectCount`) and the category deck endpoints
/// (`multiSelect` + `correct`, where the required count is the number of correct answers).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: String,

    #[serde(default)]
    pub number: u32,

    #[serde(rename = "question")]
    pub text: String,

    pub options: Vec<String>,

    #[serde(default, alias = "multiSelect")]
    pub is_multiple_choice: bool,

    #[serde(default = "default_select_count")]
    pub select_count: usize,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correct: Option<AnswerKeys>,

    #[serde(default)]
    pub has_translation: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_verified: Option<Verdict>,
}

fn default_select_count() -> usize {
    1
}

impl Question {
    /// Number of options that must be selected before the answer can be submitted.
    pub fn required_count(&self) -> usize {
        if !self.is_multiple_choice {
            return 1;
        }
        let embedded = self.correct.as_ref().map(AnswerKeys::len).unwrap_or(0);
        if self.select_count > 1 {
            self.select_count
        } else {
            embedded.max(self.select_count).max(1)
        }
    }

    /// Option text with export residue such as `Your response:` removed.
    pub fn option_label(&self, index: usize) -> Option<String> {
        self.options.get(index).map(|option| clean_option(option))
    }

    /// Key of the option at `index`.
    ///
    /// Letters are used only when every option carries a distinct `X)` prefix; a single
    /// unlettered option switches the whole question to positional keys.
    pub fn option_key(&self, index: usize) -> Option<OptionKey> {
        let label = self.option_label(index)?;
        if self.is_lettered() {
            key_from_label(&label)
        } else {
            Some(OptionKey::positional(index))
        }
    }

    fn is_lettered(&self) -> bool {
        let mut seen = BTreeSet::new();
        !self.options.is_empty()
            && self.options.iter().all(|option| {
                key_from_label(&clean_option(option)).is_some_and(|key| seen.insert(key))
            })
    }

    /// Raw option text for `key`, as sent to endpoints that compare option texts.
    pub fn option_text(&self, key: &OptionKey) -> Option<&str> {
        (0..self.options.len())
            .find(|&index| self.option_key(index).as_ref() == Some(key))
            .map(|index| self.options[index].as_str())
    }

    pub fn option_keys(&self) -> Vec<OptionKey> {
        (0..self.options.len())
            .filter_map(|index| self.option_key(index))
            .collect()
    }

    /// Resolve user input (`"b"`, `"B"`, `"2"`) to an option key of this question.
    pub fn resolve_option(&self, input: &str) -> Option<OptionKey> {
        let input = input.trim();
        if let Ok(position) = input.parse::<usize>() {
            return position.checked_sub(1).and_then(|index| self.option_key(index));
        }
        let wanted = OptionKey::new(input);
        self.option_keys().into_iter().find(|key| *key == wanted)
    }

    /// Map canonical answers (letters or full option texts) onto option keys.
    pub fn keys_for_answers(&self, answers: &[String]) -> BTreeSet<OptionKey> {
        let labels: Vec<(OptionKey, String)> = (0..self.options.len())
            .filter_map(|index| Some((self.option_key(index)?, self.option_label(index)?)))
            .collect();

        answers
            .iter()
            .filter_map(|answer| {
                let answer = answer.trim();
                let as_key = OptionKey::new(answer);
                if labels.iter().any(|(key, _)| *key == as_key) {
                    return Some(as_key);
                }
                if let Some((key, _)) = labels.iter().find(|(_, label)| label == answer) {
                    return Some(key.clone());
                }
                key_from_label(answer).filter(|_| self.is_lettered())
            })
            .collect()
    }

    /// Question text with a `(Select N)` suffix for multi-select questions that lack one.
    pub fn display_text(&self, select_label: &str) -> String {
        let required = self.required_count();
        if self.is_multiple_choice && required > 1 {
            let lower = self.text.to_lowercase();
            if !lower.contains("select") && !self.text.contains("Выбери") {
                return format!("{} {}", self.text, select_label);
            }
        }
        self.text.clone()
    }
}

fn clean_option(option: &str) -> String {
    let mut cleaned = option.to_string();
    for residue in ["Your responses:", "Your response:", "Your responses", "Your response"] {
        cleaned = cleaned.replace(residue, "");
    }
    cleaned.trim().to_string()
}

fn key_from_label(label: &str) -> Option<OptionKey> {
    let mut chars = label.chars();
    match (chars.next(), chars.next()) {
        (Some(letter), Some(')')) if letter.is_ascii_uppercase() => {
            Some(OptionKey(letter.to_string()))
        }
        _ => None,
    }
}

/// Server response indicating correctness and supplying the canonical answer and explanation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Verdict {
    /// Correctness flag; only the deck endpoint reports it directly.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correct: Option<bool>,

    #[serde(default, alias = "correctAnswer")]
    pub correct_answers: AnswerKeys,

    #[serde(default)]
    pub explanation: String,

    #[serde(default)]
    pub has_translation: bool,
}

impl Verdict {
    /// Canonical answers as option keys of `question`.
    pub fn correct_keys(&self, question: &Question) -> BTreeSet<OptionKey> {
        question.keys_for_answers(&self.correct_answers.to_vec())
    }

    /// Whether `selected` is right for `question`.
    ///
    /// The server's flag wins when present; otherwise the selection must equal the
    /// canonical answer set the server returned.
    pub fn is_correct_for(&self, question: &Question, selected: &[OptionKey]) -> bool {
        if let Some(correct) = self.correct {
            return correct;
        }
        let expected = self.correct_keys(question);
        let chosen: BTreeSet<OptionKey> = selected.iter().cloned().collect();
        !expected.is_empty() && expected == chosen
    }
}
