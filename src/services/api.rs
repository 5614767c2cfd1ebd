//! HTTP client for the quiz API.
//!
//! [`QuizApi`] is the seam between the controller and the network; [`HttpQuizApi`] is the
//! reqwest implementation. Nothing here retries: every failure is mapped to an [`ApiError`]
//! and handed back to the caller.

use crate::models::{
    ApiStats, CheckRequest, DeckCheckRequest, DeckQuestions, HealthStatus, Language, Question,
    QuestionPage, TranslateRequest, TranslatedQuestion, UploadSummary, UserConfig, Verdict,
};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error, info, instrument, warn};

/// Seconds to wait after a 429 when the server does not say.
const DEFAULT_RETRY_AFTER: u64 = 60;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Rate limit exceeded, retry after {retry_after}s")]
    RateLimited { retry_after: u64 },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("API error ({status}): {message}")]
    Status { status: u16, message: String },

    #[error("Invalid response: {0}")]
    Decode(String),
}

impl ApiError {
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, ApiError::RateLimited { .. })
    }
}

/// Query of the paginated question listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageQuery {
    pub page: usize,
    pub per_page: usize,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub search: String,
    pub lang: Language,
}

impl PageQuery {
    pub fn new(page: usize, per_page: usize, lang: Language) -> Self {
        Self {
            page: page.max(1),
            per_page: per_page.max(1),
            search: String::new(),
            lang,
        }
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }
}

/// Operations of the quiz API used by the client.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuizApi: Send + Sync {
    /// `GET /questions/paginated`
    async fn list_questions(&self, query: &PageQuery) -> Result<QuestionPage, ApiError>;

    /// `GET /questions/random?lang=`
    async fn random_question(&self, lang: Language) -> Result<Question, ApiError>;

    /// `POST /ai/check-answer`
    async fn check_answer(&self, request: &CheckRequest) -> Result<Verdict, ApiError>;

    /// `POST /ai/translate-question`
    async fn translate_question(&self, question_id: &str)
    -> Result<TranslatedQuestion, ApiError>;

    /// `GET /ai-cache/{id}?lang=`
    async fn cached_verdict(&self, question_id: &str, lang: Language)
    -> Result<Verdict, ApiError>;

    /// `GET /stats`
    async fn stats(&self) -> Result<ApiStats, ApiError>;

    /// `GET /academo/questions`: the categorised deck bank
    async fn deck_questions(&self) -> Result<DeckQuestions, ApiError>;

    /// `POST /academo/check`
    async fn check_deck_answer(&self, request: &DeckCheckRequest) -> Result<Verdict, ApiError>;

    /// `GET /academo/stats`
    async fn deck_stats(&self) -> Result<ApiStats, ApiError>;

    /// `POST /questions/upload`
    async fn upload(&self, export: &serde_json::Value) -> Result<UploadSummary, ApiError>;

    /// `GET /health`
    async fn health(&self) -> Result<HealthStatus, ApiError>;
}

/// reqwest-backed [`QuizApi`].
#[derive(Debug, Clone)]
pub struct HttpQuizApi {
    client: Client,
    base_url: String,
}

impl HttpQuizApi {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Http(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &UserConfig) -> Result<Self, ApiError> {
        Self::new(
            config.api_base(),
            Duration::from_secs(config.request_timeout_secs.max(1)),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        let response = request.send().await.map_err(|e| {
            error!(error = %e, "HTTP request failed");
            ApiError::Http(e.to_string())
        })?;

        debug!(status = %response.status(), url = %response.url(), "Received response");
        Ok(response)
    }

    async fn fetch<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let response = self.send(request).await?;
        let response = check_status(response).await?;

        response.json::<T>().await.map_err(|e| {
            error!(error = %e, "Failed to parse response JSON");
            ApiError::Decode(e.to_string())
        })
    }
}

/// Map non-success statuses to [`ApiError`], carrying the server's `error` message.
async fn check_status(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());
    let payload: Option<serde_json::Value> = serde_json::from_str(&body).ok();
    let message = payload
        .as_ref()
        .and_then(|value| value.get("error"))
        .and_then(|value| value.as_str())
        .map(str::to_string)
        .unwrap_or(body);

    if status == StatusCode::TOO_MANY_REQUESTS {
        let retry_after = payload
            .as_ref()
            .and_then(|value| value.get("retryAfter"))
            .and_then(|value| value.as_u64())
            .unwrap_or(DEFAULT_RETRY_AFTER);
        warn!(retry_after, "Quiz API rate limit exceeded");
        return Err(ApiError::RateLimited { retry_after });
    }

    if status == StatusCode::NOT_FOUND {
        warn!(error = %message, "Quiz API resource not found");
        return Err(ApiError::NotFound(message));
    }

    error!(status = %status, error = %message, "Quiz API error");
    Err(ApiError::Status {
        status: status.as_u16(),
        message,
    })
}

#[async_trait]
impl QuizApi for HttpQuizApi {
    #[instrument(skip(self))]
    async fn list_questions(&self, query: &PageQuery) -> Result<QuestionPage, ApiError> {
        let request = self
            .client
            .get(self.endpoint("questions/paginated"))
            .query(query);
        let page: QuestionPage = self.fetch(request).await?;
        debug!(count = page.questions.len(), total = page.total, "Loaded question page");
        Ok(page)
    }

    #[instrument(skip(self))]
    async fn random_question(&self, lang: Language) -> Result<Question, ApiError> {
        let request = self
            .client
            .get(self.endpoint("questions/random"))
            .query(&[("lang", lang.code())]);
        self.fetch(request).await
    }

    #[instrument(skip(self, request), fields(question_id = %request.question_id))]
    async fn check_answer(&self, request: &CheckRequest) -> Result<Verdict, ApiError> {
        let builder = self
            .client
            .post(self.endpoint("ai/check-answer"))
            .json(request);
        let verdict: Verdict = self.fetch(builder).await?;
        info!(answers = verdict.correct_answers.len(), "Received verdict");
        Ok(verdict)
    }

    #[instrument(skip(self))]
    async fn translate_question(
        &self,
        question_id: &str,
    ) -> Result<TranslatedQuestion, ApiError> {
        let body = TranslateRequest {
            question_id: question_id.to_string(),
        };
        let request = self
            .client
            .post(self.endpoint("ai/translate-question"))
            .json(&body);
        self.fetch(request).await
    }

    #[instrument(skip(self))]
    async fn cached_verdict(
        &self,
        question_id: &str,
        lang: Language,
    ) -> Result<Verdict, ApiError> {
        let request = self
            .client
            .get(self.endpoint(&format!("ai-cache/{question_id}")))
            .query(&[("lang", lang.code())]);
        self.fetch(request).await
    }

    async fn stats(&self) -> Result<ApiStats, ApiError> {
        self.fetch(self.client.get(self.endpoint("stats"))).await
    }

    async fn deck_questions(&self) -> Result<DeckQuestions, ApiError> {
        let bank: DeckQuestions = self
            .fetch(self.client.get(self.endpoint("academo/questions")))
            .await?;
        debug!(count = bank.questions.len(), "Loaded deck questions");
        Ok(bank)
    }

    #[instrument(skip(self, request), fields(question_id = %request.question_id))]
    async fn check_deck_answer(&self, request: &DeckCheckRequest) -> Result<Verdict, ApiError> {
        let builder = self
            .client
            .post(self.endpoint("academo/check"))
            .json(request);
        let verdict: Verdict = self.fetch(builder).await?;
        info!(correct = ?verdict.correct, "Received deck verdict");
        Ok(verdict)
    }

    async fn deck_stats(&self) -> Result<ApiStats, ApiError> {
        self.fetch(self.client.get(self.endpoint("academo/stats")))
            .await
    }

    #[instrument(skip(self, export))]
    async fn upload(&self, export: &serde_json::Value) -> Result<UploadSummary, ApiError> {
        let request = self
            .client
            .post(self.endpoint("questions/upload"))
            .json(export);
        let summary: UploadSummary = self.fetch(request).await?;
        info!(
            new = summary.new,
            duplicates = summary.duplicates,
            total = summary.total,
            "Upload processed"
        );
        Ok(summary)
    }

    async fn health(&self) -> Result<HealthStatus, ApiError> {
        // An unhealthy service answers 500 with a status body; report that body as-is.
        let response = self.send(self.client.get(self.endpoint("health"))).await?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Http(e.to_string()))?;

        serde_json::from_str::<HealthStatus>(&body).map_err(|e| {
            if status.is_success() {
                ApiError::Decode(e.to_string())
            } else {
                ApiError::Status {
                    status: status.as_u16(),
                    message: body.clone(),
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_paths() {
        let api = HttpQuizApi::new("http://localhost:5000/api/", Duration::from_secs(5)).unwrap();
        assert_eq!(api.base_url(), "http://localhost:5000/api");
        assert_eq!(
            api.endpoint("/questions/random"),
            "http://localhost:5000/api/questions/random"
        );
    }

    #[test]
    fn test_page_query_serialization() {
        let query = PageQuery::new(0, 12, Language::Ru);
        let encoded = serde_json::to_value(&query).unwrap();
        assert_eq!(
            encoded,
            serde_json::json!({"page": 1, "per_page": 12, "lang": "ru"})
        );

        let searched = PageQuery::new(2, 24, Language::En).with_search("lambda");
        let encoded = serde_json::to_value(&searched).unwrap();
        assert_eq!(encoded["search"], "lambda");
    }

    #[test]
    fn test_rate_limited_flag() {
        assert!(ApiError::RateLimited { retry_after: 60 }.is_rate_limited());
        assert!(!ApiError::NotFound("x".to_string()).is_rate_limited());
    }

    #[tokio::test]
    async fn test_automock_trait() {
        let mut mock = MockQuizApi::new();
        mock.expect_random_question()
            .withf(|lang| *lang == Language::Ru)
            .times(1)
            .returning(|_| Err(ApiError::NotFound("No questions available".to_string())));

        let result = mock.random_question(Language::Ru).await;
        assert!(matches!(result, Err(ApiError::NotFound(_))));
    }
}
