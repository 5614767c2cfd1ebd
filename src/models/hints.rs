/// Shown when an explanation names no AWS service
const DEFAULT_RELATED: &str = "Review AWS core services and their use cases.";

/// Study hints derived from a verdict explanation
///
/// Hints never reveal the answer letters; they are built from the explanation text only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hints {
    pub question_id: String,
    pub key_concept: String,
    pub think_about: String,
    /// Unique `AWS Xxx` service names mentioned in the explanation, in order of appearance
    pub related_services: Vec<String>,
}

impl Hints {
    pub fn related_topics(&self) -> String {
        if self.related_services.is_empty() {
            DEFAULT_RELATED.to_string()
        } else {
            format!("Related AWS services: {}", self.related_services.join(", "))
        }
    }
}
