use super::question::Language;
use serde::{Deserialize, Serialize};

/// User configuration from `QuizDeck Settings.yaml`.
///
/// Every field has a default so partial files (and a missing file) load cleanly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserConfig {
    /// Base URL of the quiz API, without a trailing slash.
    pub api_base: String,

    pub language: Language,

    pub request_timeout_secs: u64,

    /// Questions per page in the browser.
    pub per_page: usize,

    /// Maximum number of questions fetched for a shuffled deck.
    pub deck_size: usize,

    /// Ask before leaving a quiz that has recorded answers.
    pub confirm_discard: bool,

    pub debug_mode: bool,

    pub show_hints_by_default: bool,
}

impl Default for UserConfig {
    fn default() -> Self {
        Self {
            api_base: "http://localhost:5000/api".to_string(),
            language: Language::En,
            request_timeout_secs: 15,
            per_page: 12,
            deck_size: 100,
            confirm_discard: true,
            debug_mode: false,
            show_hints_by_default: false,
        }
    }
}

impl UserConfig {
    pub fn api_base(&self) -> &str {
        self.api_base.trim_end_matches('/')
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_config_defaults() {
        let config = UserConfig::default();
        assert_eq!(config.api_base, "http://localhost:5000/api");
        assert_eq!(config.request_timeout_secs, 15);
        assert_eq!(config.per_page, 12);
        assert!(config.confirm_discard);
        assert!(!config.show_hints_by_default);
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let config: UserConfig = serde_yaml_ng::from_str("language: ru\nper_page: 24\n").unwrap();
        assert_eq!(config.language, Language::Ru);
        assert_eq!(config.per_page, 24);
        assert_eq!(config.deck_size, 100);
    }

    #[test]
    fn test_api_base_trims_trailing_slash() {
        let config = UserConfig {
            api_base: "https://quiz.example.com/api/".to_string(),
            ..Default::default()
        };
        assert_eq!(config.api_base(), "https://quiz.example.com/api");
    }
}
