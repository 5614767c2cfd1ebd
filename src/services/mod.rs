//! Services module - network access and pure helpers behind the quiz controller.
//!
//! The services are **framework-agnostic** and have no dependencies on the UI layer,
//! making them testable and reusable.
//!
//! # Components
//!
//! - [`QuizApi`]: the operations of the remote quiz API, implemented over HTTP by
//!   [`HttpQuizApi`]. Failures are reported as [`ApiError`] and never retried.
//! - [`ImportService`]: validates and previews Telegram chat exports before upload.
//! - [`HintService`]: derives study hints from a verdict explanation.
//! - [`OnboardingGuide`]: the scripted four-step upload walkthrough.
//!
//! # Usage Example
//!
//! ```ignore
//! use quizdeck::services::{HttpQuizApi, QuizApi};
//! use quizdeck::models::Language;
//!
//! let api = HttpQuizApi::from_config(&user_config)?;
//! let question = api.random_question(Language::En).await?;
//! ```

pub mod api;
pub mod hints;
pub mod import;
pub mod onboarding;

pub use api::{ApiError, HttpQuizApi, PageQuery, QuizApi};
pub use hints::HintService;
pub use import::{ImportError, ImportPreview, ImportService, ParsedQuestion, TelegramExport};
pub use onboarding::{GuideOutcome, GuideStep, OnboardingGuide, StepStatus};
