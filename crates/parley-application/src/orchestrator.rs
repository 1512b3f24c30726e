//! EnrichmentOrchestrator - translate and summarize actions.
//!
//! Drives the language service for a target message and applies the derived
//! message to the store: translations replace the previous translation of the
//! same source in place, summaries are always inserted. Failures never reach
//! the store; they become the action panel's inline error.

use crate::language_service::{LanguageService, SummaryOutcome, TranslationOutcome, UNSUPPORTED_ENVIRONMENT};
use crate::message_store::MessageStore;
use parley_core::chat::{
    Message, MessageId, Selection, SelectionState, can_summarize, translation_label, translation_targets,
};
use parley_core::language::{SupportedLanguage, UNKNOWN_LANGUAGE};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

/// What an enrichment action did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnrichmentOutcome {
    /// A derived message was written; carries its id.
    Applied(MessageId),
    /// Nothing to do (blank text, same language, no result, vanished source).
    Skipped,
    /// Shown in the action panel; the log is unchanged.
    Failed(String),
}

#[derive(Debug, Default)]
struct PanelState {
    selection: SelectionState,
    target: SupportedLanguage,
    error: Option<String>,
}

pub struct EnrichmentOrchestrator {
    service: Arc<LanguageService>,
    store: Arc<MessageStore>,
    panel: Mutex<PanelState>,
    has_translated: AtomicBool,
    translating: AtomicUsize,
    summarizing: AtomicUsize,
    summarize_min_chars: usize,
}

/// Counts an action as in flight until dropped.
struct InFlight<'a>(&'a AtomicUsize);

impl<'a> InFlight<'a> {
    fn start(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl EnrichmentOrchestrator {
    pub fn new(
        service: Arc<LanguageService>,
        store: Arc<MessageStore>,
        default_target: SupportedLanguage,
        summarize_min_chars: usize,
    ) -> Self {
        Self {
            service,
            store,
            panel: Mutex::new(PanelState {
                target: default_target,
                ..PanelState::default()
            }),
            has_translated: AtomicBool::new(false),
            translating: AtomicUsize::new(0),
            summarizing: AtomicUsize::new(0),
            summarize_min_chars,
        }
    }

    fn panel(&self) -> MutexGuard<'_, PanelState> {
        self.panel.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    // ============================================================================
    // Sending
    // ============================================================================

    /// Appends a user message labelled with its detected language.
    ///
    /// Blank text is ignored. A failed detection labels the message
    /// `Unknown`.
    pub async fn send_message(&self, text: &str) -> Option<Message> {
        if text.trim().is_empty() {
            return None;
        }

        let language = self
            .service
            .detect_language_name(text.trim())
            .await
            .unwrap_or_else(|| UNKNOWN_LANGUAGE.to_string());
        let message = Message::user(text, language);
        self.store.append(message.clone()).await;
        Some(message)
    }

    // ============================================================================
    // Action panel
    // ============================================================================

    /// Opens the panel for `id`, replacing any open panel.
    pub fn open_options(&self, id: MessageId) -> bool {
        let Some(message) = self.store.get(id) else {
            return false;
        };
        let mut panel = self.panel();
        panel.selection.open(&message);
        panel.error = None;
        true
    }

    pub fn close_options(&self) {
        let mut panel = self.panel();
        panel.selection.close();
        panel.error = None;
    }

    pub fn selection(&self) -> Option<Selection> {
        self.panel().selection.current().cloned()
    }

    pub fn target_language(&self) -> SupportedLanguage {
        self.panel().target
    }

    pub fn set_target_language(&self, target: SupportedLanguage) {
        self.panel().target = target;
    }

    /// The panel's inline error from the last failed action.
    pub fn panel_error(&self) -> Option<String> {
        self.panel().error.clone()
    }

    pub fn has_translated(&self) -> bool {
        self.has_translated.load(Ordering::SeqCst)
    }

    pub fn is_translating(&self) -> bool {
        self.translating.load(Ordering::SeqCst) > 0
    }

    pub fn is_summarizing(&self) -> bool {
        self.summarizing.load(Ordering::SeqCst) > 0
    }

    /// Target languages offered in the panel of `id`.
    pub fn translation_targets(&self, id: MessageId) -> Vec<SupportedLanguage> {
        match self.store.get(id) {
            Some(message) => translation_targets(&message, self.has_translated(), self.service.resolver()),
            None => Vec::new(),
        }
    }

    /// Whether the panel of `id` offers summarize.
    pub fn can_summarize(&self, id: MessageId) -> bool {
        self.store
            .get(id)
            .is_some_and(|m| can_summarize(&m.text, self.summarize_min_chars))
    }

    fn fail(&self, message: String) -> EnrichmentOutcome {
        self.panel().error = Some(message.clone());
        EnrichmentOutcome::Failed(message)
    }

    fn finish(&self, outcome: EnrichmentOutcome) -> EnrichmentOutcome {
        self.close_options();
        outcome
    }

    // ============================================================================
    // Translate
    // ============================================================================

    /// Translates the selected message to the selected target language.
    pub async fn translate_selected(&self) -> EnrichmentOutcome {
        match self.selection() {
            Some(selection) => self.translate(&selection.text, selection.id).await,
            None => EnrichmentOutcome::Skipped,
        }
    }

    /// Translates `text` (the text of message `id`) to the current target.
    pub async fn translate(&self, text: &str, id: MessageId) -> EnrichmentOutcome {
        if text.trim().is_empty() {
            return EnrichmentOutcome::Skipped;
        }
        if !self.service.is_ready() {
            return self.fail(
                self.service
                    .error()
                    .unwrap_or_else(|| UNSUPPORTED_ENVIRONMENT.to_string()),
            );
        }

        let _in_flight = InFlight::start(&self.translating);
        let target = self.target_language();

        let Some(source) = self.service.detect_top(text).await else {
            tracing::debug!("[EnrichmentOrchestrator] No source language for {}", id);
            return EnrichmentOutcome::Skipped;
        };
        let source_name = self.service.language_name(&source.detected_language);
        let target_name = self.service.language_name(target.code());
        if source_name == target_name {
            tracing::debug!("[EnrichmentOrchestrator] {} is already in {}", id, target_name);
            return self.finish(EnrichmentOutcome::Skipped);
        }

        let translated = match self
            .service
            .translate(text, &source.detected_language, target.code())
            .await
        {
            TranslationOutcome::Translated(text) => text,
            TranslationOutcome::Empty => return EnrichmentOutcome::Skipped,
            TranslationOutcome::Rejected(message) | TranslationOutcome::Failed(message) => {
                return self.fail(message);
            }
        };

        let translation = Message::translation(id, translated, translation_label(&source_name, &target_name));
        match self.store.place_translation(id, translation).await {
            Some(placed) => {
                self.has_translated.store(true, Ordering::SeqCst);
                tracing::debug!("[EnrichmentOrchestrator] Translation of {} is {}", id, placed);
                self.finish(EnrichmentOutcome::Applied(placed))
            }
            None => self.finish(EnrichmentOutcome::Skipped),
        }
    }

    // ============================================================================
    // Summarize
    // ============================================================================

    pub async fn summarize_selected(&self) -> EnrichmentOutcome {
        match self.selection() {
            Some(selection) => self.summarize(&selection.text, selection.id).await,
            None => EnrichmentOutcome::Skipped,
        }
    }

    /// Summarizes `text` (the text of message `id`) into a new message.
    pub async fn summarize(&self, text: &str, id: MessageId) -> EnrichmentOutcome {
        if text.trim().is_empty() || !can_summarize(text, self.summarize_min_chars) {
            return EnrichmentOutcome::Skipped;
        }

        let _in_flight = InFlight::start(&self.summarizing);
        let summary = match self.service.summarize(text, "").await {
            SummaryOutcome::Summarized(summary) => summary,
            SummaryOutcome::Empty => return EnrichmentOutcome::Skipped,
            SummaryOutcome::Unavailable(message) | SummaryOutcome::Failed(message) => {
                return self.fail(message);
            }
        };

        let language = match self.service.detect_language_name(text).await {
            Some(name) => name,
            None => self
                .store
                .get(id)
                .and_then(|m| m.language)
                .unwrap_or_else(|| UNKNOWN_LANGUAGE.to_string()),
        };

        let message = Message::summary(id, format!("Summary: {summary}"), language);
        let summary_id = message.id;
        if self.store.insert_summary(id, message).await {
            self.finish(EnrichmentOutcome::Applied(summary_id))
        } else {
            tracing::debug!("[EnrichmentOrchestrator] Source {} vanished before its summary", id);
            EnrichmentOutcome::Skipped
        }
    }
}
