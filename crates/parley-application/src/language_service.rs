//! LanguageService - typed wrapper around the capability gateway.
//!
//! Holds the provider state for a session: the capability report probed once
//! at start-up, the persistent capability errors, and the lazily prepared
//! summarizer. Callers see derived state and action functions only.

use parley_core::capability::{Availability, Capability, CapabilityGateway, CapabilityReport, SummarizeOptions};
use parley_core::error::Result;
use parley_core::language::{
    DetectedLanguage, Detection, DetectionPolicy, LanguageNameResolver, SUPPORTED_LANGUAGES, SupportedLanguage,
};
use parley_core::ParleyError;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::OnceCell;

pub const UNSUPPORTED_ENVIRONMENT: &str = "AI APIs are not supported in this environment.";
pub const INITIALIZATION_FAILED: &str = "Failed to initialize AI APIs.";
pub const SUMMARIZER_UNSUPPORTED: &str = "Summarizer API is not supported in this environment.";
pub const SUMMARIZER_UNAVAILABLE: &str = "Summarizer API is unavailable due to system limitations.";
pub const SUMMARIZER_INIT_FAILED: &str = "Error initializing Summarizer API.";
pub const TRANSLATE_FAILED: &str = "Error translating text.";
pub const SUMMARIZE_FAILED: &str = "Error summarizing text... Try again!";

/// Read-only view of the provider state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceStatus {
    pub initialized: bool,
    pub shut_down: bool,
    pub report: Option<CapabilityReport>,
    /// Persistent detector/translator error; disables dependent actions.
    pub error: Option<String>,
    /// Persistent summarizer error from the last preparation attempt.
    pub summarizer_error: Option<String>,
}

/// Result of a translation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranslationOutcome {
    Translated(String),
    /// The gateway answered with blank text.
    Empty,
    /// A language outside the allow-list; carries the user-facing message.
    Rejected(String),
    /// The gateway failed; carries the user-facing message.
    Failed(String),
}

/// Result of a summarization request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SummaryOutcome {
    Summarized(String),
    Empty,
    /// The summarizer cannot be used; carries the persistent error.
    Unavailable(String),
    Failed(String),
}

#[derive(Debug, Default)]
struct SummarizerState {
    ready: bool,
}

pub struct LanguageService {
    gateway: Arc<dyn CapabilityGateway>,
    policy: DetectionPolicy,
    resolver: LanguageNameResolver,
    init: OnceCell<()>,
    status: Mutex<ServiceStatus>,
    summarizer: tokio::sync::Mutex<SummarizerState>,
    shut_down: AtomicBool,
}

impl LanguageService {
    pub fn new(
        gateway: Arc<dyn CapabilityGateway>,
        policy: DetectionPolicy,
        resolver: LanguageNameResolver,
    ) -> Self {
        Self {
            gateway,
            policy,
            resolver,
            init: OnceCell::new(),
            status: Mutex::new(ServiceStatus::default()),
            summarizer: tokio::sync::Mutex::new(SummarizerState::default()),
            shut_down: AtomicBool::new(false),
        }
    }

    // ============================================================================
    // Lifecycle
    // ============================================================================

    /// Probes the gateway and prepares the detector and translator.
    ///
    /// Runs once; later calls return the state established by the first.
    pub async fn initialize(&self) -> ServiceStatus {
        self.init
            .get_or_init(|| async {
                let outcome = self.probe_and_prepare().await;
                let mut status = self.lock_status();
                status.initialized = true;
                match outcome {
                    Ok(report) => {
                        tracing::info!("[LanguageService] Capabilities ready: {:?}", report);
                        status.report = Some(report);
                    }
                    Err((report, message)) => {
                        tracing::error!("[LanguageService] {}", message);
                        status.report = report;
                        status.error = Some(message.to_string());
                    }
                }
            })
            .await;
        self.status()
    }

    async fn probe_and_prepare(
        &self,
    ) -> std::result::Result<CapabilityReport, (Option<CapabilityReport>, &'static str)> {
        let report = self.gateway.probe().await.map_err(|e| {
            tracing::warn!("[LanguageService] Probe failed: {}", e);
            let message = if e.is_unavailable() {
                UNSUPPORTED_ENVIRONMENT
            } else {
                INITIALIZATION_FAILED
            };
            (None, message)
        })?;

        if !report.language_detector.is_available() || !report.translator.is_available() {
            return Err((Some(report), UNSUPPORTED_ENVIRONMENT));
        }

        for capability in [Capability::LanguageDetector, Capability::Translator] {
            if report.availability(capability) == Availability::AfterDownload {
                self.gateway.prepare(capability).await.map_err(|e| {
                    tracing::warn!("[LanguageService] Failed to prepare {:?}: {}", capability, e);
                    (Some(report), INITIALIZATION_FAILED)
                })?;
            }
        }

        Ok(report)
    }

    /// Tears the provider state down; every action is disabled afterwards.
    pub async fn shutdown(&self) {
        self.shut_down.store(true, Ordering::SeqCst);
        self.summarizer.lock().await.ready = false;
        self.lock_status().shut_down = true;
        tracing::info!("[LanguageService] Shut down");
    }

    // ============================================================================
    // Derived state
    // ============================================================================

    pub fn status(&self) -> ServiceStatus {
        self.lock_status().clone()
    }

    /// True once initialization succeeded and until shutdown.
    pub fn is_ready(&self) -> bool {
        let status = self.lock_status();
        status.initialized && status.error.is_none() && !self.shut_down.load(Ordering::SeqCst)
    }

    /// The persistent detector/translator error, if any.
    pub fn error(&self) -> Option<String> {
        self.lock_status().error.clone()
    }

    pub fn summarizer_error(&self) -> Option<String> {
        self.lock_status().summarizer_error.clone()
    }

    pub fn resolver(&self) -> &LanguageNameResolver {
        &self.resolver
    }

    pub fn policy(&self) -> DetectionPolicy {
        self.policy
    }

    /// Display name of `code` in the session's display locale.
    pub fn language_name(&self, code: &str) -> String {
        self.resolver.name_of(code)
    }

    fn lock_status(&self) -> MutexGuard<'_, ServiceStatus> {
        self.status.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    // ============================================================================
    // Actions
    // ============================================================================

    /// Detects the language of `text`, keeping up to `count` candidates.
    ///
    /// `Ok(None)` means no candidate cleared the minimum confidence.
    pub async fn detect(&self, text: &str, count: usize) -> Result<Option<Detection>> {
        if !self.is_ready() {
            return Err(ParleyError::unavailable(
                self.error().unwrap_or_else(|| UNSUPPORTED_ENVIRONMENT.to_string()),
            ));
        }
        let candidates = self.gateway.detect_language(text).await?;
        Ok(self.policy.apply(candidates, count))
    }

    /// Best guess for `text`, or `None` when detection fails or finds nothing.
    pub async fn detect_top(&self, text: &str) -> Option<DetectedLanguage> {
        match self.detect(text, 1).await {
            Ok(detection) => detection.and_then(|d| d.top().cloned()),
            Err(e) => {
                tracing::warn!("[LanguageService] Language detection failed: {}", e);
                None
            }
        }
    }

    /// Display name of the best guess for `text`.
    pub async fn detect_language_name(&self, text: &str) -> Option<String> {
        let top = self.detect_top(text).await?;
        Some(self.resolver.name_of(&top.detected_language))
    }

    /// Translates `text` from `source` to `target`.
    ///
    /// Both codes must be on the allow-list; otherwise the outcome carries a
    /// message naming the offending language and listing the supported ones.
    pub async fn translate(&self, text: &str, source: &str, target: &str) -> TranslationOutcome {
        let Some(target_lang) = SupportedLanguage::parse(target) else {
            return TranslationOutcome::Rejected(self.unsupported_message("Target", target));
        };
        let Some(source_lang) = SupportedLanguage::parse(source) else {
            return TranslationOutcome::Rejected(self.unsupported_message("Detected", source));
        };
        if !self.is_ready() {
            return TranslationOutcome::Failed(
                self.error().unwrap_or_else(|| UNSUPPORTED_ENVIRONMENT.to_string()),
            );
        }

        match self
            .gateway
            .translate(text, source_lang.code(), target_lang.code())
            .await
        {
            Ok(translated) if translated.trim().is_empty() => TranslationOutcome::Empty,
            Ok(translated) => TranslationOutcome::Translated(translated),
            Err(e) => {
                tracing::error!("[LanguageService] Translation failed: {}", e);
                TranslationOutcome::Failed(TRANSLATE_FAILED.to_string())
            }
        }
    }

    /// Summarizes `text`, preparing the summarizer on first use.
    pub async fn summarize(&self, text: &str, context: &str) -> SummaryOutcome {
        if let Err(message) = self.ensure_summarizer().await {
            return SummaryOutcome::Unavailable(message);
        }

        let options = SummarizeOptions::with_context(context);
        match self.gateway.summarize(text, &options).await {
            Ok(summary) if summary.trim().is_empty() => SummaryOutcome::Empty,
            Ok(summary) => SummaryOutcome::Summarized(summary),
            Err(e) => {
                tracing::error!("[LanguageService] Summarization failed: {}", e);
                SummaryOutcome::Failed(SUMMARIZE_FAILED.to_string())
            }
        }
    }

    async fn ensure_summarizer(&self) -> std::result::Result<(), String> {
        if self.shut_down.load(Ordering::SeqCst) {
            return Err(SUMMARIZER_UNSUPPORTED.to_string());
        }

        let mut summarizer = self.summarizer.lock().await;
        if summarizer.ready {
            return Ok(());
        }

        let result = self.prepare_summarizer().await;
        let mut status = self.lock_status();
        match result {
            Ok(()) => {
                summarizer.ready = true;
                status.summarizer_error = None;
                Ok(())
            }
            Err(message) => {
                tracing::warn!("[LanguageService] {}", message);
                status.summarizer_error = Some(message.to_string());
                Err(message.to_string())
            }
        }
    }

    async fn prepare_summarizer(&self) -> std::result::Result<(), &'static str> {
        let report = self.gateway.probe().await.map_err(|e| {
            if e.is_unavailable() {
                SUMMARIZER_UNSUPPORTED
            } else {
                SUMMARIZER_INIT_FAILED
            }
        })?;

        match report.summarizer {
            Availability::No => Err(SUMMARIZER_UNAVAILABLE),
            Availability::Readily => Ok(()),
            Availability::AfterDownload => {
                tracing::info!("[LanguageService] Waiting for the summarizer model download");
                self.gateway
                    .prepare(Capability::Summarizer)
                    .await
                    .map_err(|e| {
                        if e.is_unavailable() {
                            SUMMARIZER_UNSUPPORTED
                        } else {
                            SUMMARIZER_INIT_FAILED
                        }
                    })
            }
        }
    }

    fn unsupported_message(&self, role: &str, code: &str) -> String {
        let supported: Vec<String> = SUPPORTED_LANGUAGES
            .iter()
            .map(|lang| self.resolver.name_of(lang.code()))
            .collect();
        format!(
            "Error: {} language '{}' is not supported. Supported languages: {}",
            role,
            self.resolver.name_of(code),
            supported.join(", ")
        )
    }
}
