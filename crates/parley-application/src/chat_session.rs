//! ChatSession - the façade a front end drives.
//!
//! Wires the language service, typing detector, message store and
//! orchestrator together from a `ParleyConfig`, and renders their state into
//! a `ChatSnapshot`.

use crate::language_service::{LanguageService, ServiceStatus};
use crate::message_store::MessageStore;
use crate::orchestrator::{EnrichmentOrchestrator, EnrichmentOutcome};
use crate::typing_detector::TypingDetector;
use parley_core::capability::CapabilityGateway;
use parley_core::chat::{ConversationRepository, Message, MessageId, Selection};
use parley_core::config::ParleyConfig;
use parley_core::error::Result;
use parley_core::language::{LanguageNameResolver, SupportedLanguage};
use std::sync::Arc;

/// Everything the action panel shows for the selected message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelView {
    pub selection: Selection,
    pub target: SupportedLanguage,
    pub targets: Vec<SupportedLanguage>,
    pub can_summarize: bool,
    pub translating: bool,
    pub summarizing: bool,
    /// Inline errors, capability errors first.
    pub errors: Vec<String>,
}

/// A render-ready view of the whole session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatSnapshot {
    pub messages: Vec<Message>,
    pub panel: Option<PanelView>,
    pub typing_language: Option<String>,
    pub status_line: String,
}

pub struct ChatSession {
    service: Arc<LanguageService>,
    store: Arc<MessageStore>,
    typing: TypingDetector,
    orchestrator: EnrichmentOrchestrator,
}

impl ChatSession {
    pub fn new(
        gateway: Arc<dyn CapabilityGateway>,
        repository: Arc<dyn ConversationRepository>,
        config: &ParleyConfig,
    ) -> Self {
        let service = Arc::new(LanguageService::new(
            gateway,
            config.detection.policy(),
            LanguageNameResolver::new(config.chat.display_locale.clone()),
        ));
        let store = Arc::new(MessageStore::new(repository));
        let typing = TypingDetector::new(service.clone(), &config.detection);
        let orchestrator = EnrichmentOrchestrator::new(
            service.clone(),
            store.clone(),
            config.chat.default_target_language,
            config.chat.summarize_min_chars,
        );

        Self {
            service,
            store,
            typing,
            orchestrator,
        }
    }

    /// Initializes the provider and restores the persisted conversation.
    ///
    /// A snapshot that cannot be read is logged and the seed is kept.
    pub async fn start(&self) -> ServiceStatus {
        let status = self.service.initialize().await;
        if let Err(e) = self.store.hydrate().await {
            tracing::warn!("[ChatSession] Could not restore conversation: {}", e);
        }
        status
    }

    pub async fn shutdown(&self) {
        self.typing.cancel();
        self.service.shutdown().await;
    }

    pub fn service(&self) -> &LanguageService {
        &self.service
    }

    pub fn store(&self) -> &MessageStore {
        &self.store
    }

    pub fn typing(&self) -> &TypingDetector {
        &self.typing
    }

    pub fn orchestrator(&self) -> &EnrichmentOrchestrator {
        &self.orchestrator
    }

    // ============================================================================
    // Input
    // ============================================================================

    /// Feeds the live input buffer to the typing detector.
    pub fn on_input(&self, buffer: &str) {
        self.typing.on_input(buffer);
    }

    /// Sends `text` and clears the input buffer.
    pub async fn send(&self, text: &str) -> Option<Message> {
        let sent = self.orchestrator.send_message(text).await;
        if sent.is_some() {
            self.typing.clear();
        }
        sent
    }

    // ============================================================================
    // Action panel
    // ============================================================================

    pub fn open_options(&self, id: MessageId) -> bool {
        self.orchestrator.open_options(id)
    }

    pub fn close_options(&self) {
        self.orchestrator.close_options();
    }

    pub fn set_target_language(&self, target: SupportedLanguage) {
        self.orchestrator.set_target_language(target);
    }

    pub async fn translate_selected(&self) -> EnrichmentOutcome {
        self.orchestrator.translate_selected().await
    }

    pub async fn summarize_selected(&self) -> EnrichmentOutcome {
        self.orchestrator.summarize_selected().await
    }

    /// Restores the seed conversation when it has grown past it.
    pub async fn reset(&self) -> Result<bool> {
        let reset = self.store.reset().await?;
        if reset {
            self.orchestrator.close_options();
        }
        Ok(reset)
    }

    // ============================================================================
    // Rendering
    // ============================================================================

    /// The capability error if any, else the typing indicator.
    pub fn status_line(&self) -> String {
        match self.service.error() {
            Some(error) => error,
            None => format!(
                "You are typing in {}",
                self.typing.current().as_deref().unwrap_or("...")
            ),
        }
    }

    pub fn panel(&self) -> Option<PanelView> {
        let selection = self.orchestrator.selection()?;

        let errors = [
            self.service.error(),
            self.orchestrator.panel_error(),
            self.service.summarizer_error(),
        ]
        .into_iter()
        .flatten()
        .fold(Vec::new(), |mut acc: Vec<String>, e| {
            if !acc.contains(&e) {
                acc.push(e);
            }
            acc
        });

        Some(PanelView {
            target: self.orchestrator.target_language(),
            targets: self.orchestrator.translation_targets(selection.id),
            can_summarize: self.orchestrator.can_summarize(selection.id),
            translating: self.orchestrator.is_translating(),
            summarizing: self.orchestrator.is_summarizing(),
            errors,
            selection,
        })
    }

    pub fn snapshot(&self) -> ChatSnapshot {
        ChatSnapshot {
            messages: self.store.snapshot().into_messages(),
            panel: self.panel(),
            typing_language: self.typing.current(),
            status_line: self.status_line(),
        }
    }
}
