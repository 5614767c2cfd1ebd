use camino::{Utf8Path, Utf8PathBuf};
use regex::Regex;
use serde_json::Value;
use thiserror::Error;

/// A question recognized in a Telegram chat export
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedQuestion {
    pub number: u32,
    pub text: String,
    pub options: Vec<String>,
    pub is_multiple_choice: bool,
    pub select_count: usize,
}

/// Local summary of an export, computed before uploading it
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportPreview {
    pub messages: usize,
    pub questions: Vec<ParsedQuestion>,
}

impl ImportPreview {
    pub fn multi_select_count(&self) -> usize {
        self.questions
            .iter()
            .filter(|question| question.is_multiple_choice)
            .count()
    }
}

/// An export read from disk, ready for upload
#[derive(Debug, Clone)]
pub struct TelegramExport {
    pub path: Utf8PathBuf,
    pub payload: Value,
    pub preview: ImportPreview,
}

/// Errors that can occur while reading an export
#[derive(Error, Debug)]
pub enum ImportError {
    #[error("Not a JSON file: {0}")]
    NotJson(Utf8PathBuf),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in {path}: {source}")]
    Parse {
        path: Utf8PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("No messages found in export")]
    NoMessages,

    #[error("No questions found in file")]
    NoQuestions,
}

/// Reader for Telegram "Export chat history" JSON files
///
/// Quiz bot messages look like:
///
/// ```text
/// Question #12
///
/// Which services are serverless? (Select 2)
///
/// A) AWS Lambda
/// B) Amazon EC2
/// C) AWS Fargate
/// ```
///
/// The same grammar is applied by the server on upload; parsing locally lets empty or
/// unrelated exports be rejected without a round trip.
pub struct ImportService {
    /// `Question #N`, blank line, question text, blank line, options starting at `A)`
    question_pattern: Regex,

    /// `(Select N)` marker of multi-select questions
    select_pattern: Regex,

    /// Start of one option line, `B) text`
    option_pattern: Regex,
}

impl ImportService {
    pub fn new() -> Self {
        Self {
            question_pattern: Regex::new(r"(?s)Question #(\d+)\n\n(.+?)\n\n([A-Z]\).+)")
                .expect("Invalid question regex"),
            select_pattern: Regex::new(r"\(Select (\d+)\)").expect("Invalid select regex"),
            option_pattern: Regex::new(r"^([A-Z])\)\s*(.*)$").expect("Invalid option regex"),
        }
    }

    /// Only `.json` exports are accepted
    pub fn validate_path(&self, path: &Utf8Path) -> Result<(), ImportError> {
        match path.extension() {
            Some(extension) if extension.eq_ignore_ascii_case("json") => Ok(()),
            _ => Err(ImportError::NotJson(path.to_path_buf())),
        }
    }

    /// Read and preview an export file
    ///
    /// Fails when the file is not JSON or contains no quiz questions.
    pub async fn read_export(&self, path: &Utf8Path) -> Result<TelegramExport, ImportError> {
        self.validate_path(path)?;

        let contents = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ImportError::Io {
                path: path.to_path_buf(),
                source,
            })?;

        let payload: Value =
            serde_json::from_str(&contents).map_err(|source| ImportError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        let preview = self.preview(&payload)?;
        tracing::info!(
            "Read export {}: {} messages, {} questions ({} multi-select)",
            path,
            preview.messages,
            preview.questions.len(),
            preview.multi_select_count()
        );

        Ok(TelegramExport {
            path: path.to_path_buf(),
            payload,
            preview,
        })
    }

    /// Count the quiz questions in an export payload
    pub fn preview(&self, payload: &Value) -> Result<ImportPreview, ImportError> {
        let messages = payload
            .get("messages")
            .and_then(Value::as_array)
            .ok_or(ImportError::NoMessages)?;

        let questions: Vec<ParsedQuestion> = messages
            .iter()
            .filter_map(message_text)
            .filter_map(|text| self.parse_question(&text))
            .collect();

        if questions.is_empty() {
            return Err(ImportError::NoQuestions);
        }

        Ok(ImportPreview {
            messages: messages.len(),
            questions,
        })
    }

    /// Parse one message text, returning `None` when it is not a quiz question
    pub fn parse_question(&self, text: &str) -> Option<ParsedQuestion> {
        let captures = self.question_pattern.captures(text)?;
        let number = captures[1].parse().ok()?;
        let raw_question = &captures[2];
        let options_text = &captures[3];

        let select_count = self
            .select_pattern
            .captures(raw_question)
            .and_then(|select| select[1].parse().ok());
        let text = self
            .select_pattern
            .replace_all(raw_question, "")
            .trim()
            .to_string();

        let options = self.parse_options(options_text);
        if options.is_empty() {
            return None;
        }

        Some(ParsedQuestion {
            number,
            text,
            options,
            is_multiple_choice: select_count.is_some(),
            select_count: select_count.unwrap_or(1),
        })
    }

    /// Split `A) ...\nB) ...` into options; continuation lines belong to the previous option
    fn parse_options(&self, options_text: &str) -> Vec<String> {
        let mut options: Vec<(String, String)> = Vec::new();

        for line in options_text.lines() {
            if let Some(option) = self.option_pattern.captures(line) {
                options.push((option[1].to_string(), option[2].to_string()));
            } else if let Some((_, body)) = options.last_mut() {
                body.push('\n');
                body.push_str(line);
            }
        }

        options
            .into_iter()
            .map(|(letter, body)| format!("{}) {}", letter, body.trim()))
            .collect()
    }
}

impl Default for ImportService {
    fn default() -> Self {
        Self::new()
    }
}

/// Flatten a message's `text`, which is either a string or a list of strings and
/// formatted entities (`{"type": "bold", "text": "..."}`)
fn message_text(message: &Value) -> Option<String> {
    match message.get("text")? {
        Value::String(text) if !text.is_empty() => Some(text.clone()),
        Value::Array(parts) => {
            let text: String = parts
                .iter()
                .map(|part| match part {
                    Value::String(text) => text.as_str(),
                    other => other.get("text").and_then(Value::as_str).unwrap_or(""),
                })
                .collect();
            (!text.is_empty()).then_some(text)
        }
        _ => None,
    }
}
