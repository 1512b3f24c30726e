//! Capability gateway trait.
//!
//! The gateway is the only way Parley reaches the language detection,
//! translation and summarization engines. Implementations live in
//! `parley-interaction`; tests provide their own.

use crate::error::Result;
use crate::language::DetectedLanguage;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// The engines a gateway can expose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    LanguageDetector,
    Translator,
    Summarizer,
}

/// Readiness of a single capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Availability {
    /// Usable immediately.
    Readily,
    /// Usable once its model has been downloaded.
    AfterDownload,
    /// Not usable in this environment.
    #[default]
    No,
}

impl Availability {
    pub fn is_available(self) -> bool {
        !matches!(self, Self::No)
    }
}

/// Result of probing a gateway once at start-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapabilityReport {
    #[serde(default)]
    pub language_detector: Availability,
    #[serde(default)]
    pub translator: Availability,
    #[serde(default)]
    pub summarizer: Availability,
}

impl CapabilityReport {
    pub fn availability(&self, capability: Capability) -> Availability {
        match capability {
            Capability::LanguageDetector => self.language_detector,
            Capability::Translator => self.translator,
            Capability::Summarizer => self.summarizer,
        }
    }
}

/// Style of summary requested from the summarizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SummaryKind {
    #[default]
    #[serde(rename = "tl;dr")]
    TlDr,
    KeyPoints,
    Teaser,
    Headline,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SummaryFormat {
    #[default]
    PlainText,
    Markdown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SummaryLength {
    Short,
    #[default]
    Medium,
    Long,
}

/// Options forwarded with every summarize request.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SummarizeOptions {
    /// Extra context for the summarizer; empty when none.
    #[serde(default)]
    pub context: String,
    #[serde(rename = "type", default)]
    pub kind: SummaryKind,
    #[serde(default)]
    pub format: SummaryFormat,
    #[serde(default)]
    pub length: SummaryLength,
}

impl SummarizeOptions {
    pub fn with_context(context: impl Into<String>) -> Self {
        Self {
            context: context.into(),
            ..Self::default()
        }
    }
}

/// Narrow, typed boundary to the language engines.
#[async_trait]
pub trait CapabilityGateway: Send + Sync {
    /// Reports which capabilities exist in this environment.
    async fn probe(&self) -> Result<CapabilityReport>;

    /// Waits until a capability reported as `AfterDownload` is ready.
    async fn prepare(&self, capability: Capability) -> Result<()>;

    /// Returns language guesses for `text`, most likely first.
    async fn detect_language(&self, text: &str) -> Result<Vec<DetectedLanguage>>;

    /// Translates `text` from `source` to `target` (BCP 47 tags).
    async fn translate(&self, text: &str, source: &str, target: &str) -> Result<String>;

    /// Summarizes `text`.
    async fn summarize(&self, text: &str, options: &SummarizeOptions) -> Result<String>;
}
