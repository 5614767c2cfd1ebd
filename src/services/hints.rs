use crate::models::Hints;
use regex::Regex;

const DEFAULT_KEY_CONCEPT: &str = "This question tests your AWS knowledge.";
const DEFAULT_THINK_ABOUT: &str = "Consider the AWS best practices and service characteristics.";

pub struct HintService {
    sentence_break: Regex,
    service_name: Regex,
}

impl HintService {
    pub fn new() -> Self {
        Self {
            sentence_break: Regex::new(r"[.!?]+").expect("Invalid sentence regex"),
            service_name: Regex::new(r"AWS [A-Z][a-z]+(?:\s[A-Z][a-z]+)*")
                .expect("Invalid service name regex"),
        }
    }

    /// Build hints for `question_id` from `explanation`
    ///
    /// The key concept is the first sentence and "think about" joins sentences two and
    /// three. Sections that cannot be filled fall back to generic advice.
    pub fn from_explanation(&self, question_id: &str, explanation: &str) -> Hints {
        let sentences: Vec<&str> = self
            .sentence_break
            .split(explanation)
            .filter(|sentence| !sentence.trim().is_empty())
            .collect();

        let key_concept = sentences
            .first()
            .map(|sentence| sentence.trim().to_string())
            .unwrap_or_else(|| DEFAULT_KEY_CONCEPT.to_string());

        let think_about = sentences
            .iter()
            .skip(1)
            .take(2)
            .map(|sentence| sentence.trim())
            .collect::<Vec<_>>()
            .join(". ");
        let think_about = if think_about.is_empty() {
            DEFAULT_THINK_ABOUT.to_string()
        } else {
            think_about
        };

        let mut related_services: Vec<String> = Vec::new();
        for found in self.service_name.find_iter(explanation) {
            let name = found.as_str().to_string();
            if !related_services.contains(&name) {
                related_services.push(name);
            }
        }

        Hints {
            question_id: question_id.to_string(),
            key_concept,
            think_about,
            related_services,
        }
    }
}

impl Default for HintService {
    fn default() -> Self {
        Self::new()
    }
}
