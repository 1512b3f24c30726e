//! Application layer for Parley.
//!
//! This crate coordinates the capability gateway and the conversation
//! repository to implement the chat use cases: live typing detection,
//! sending messages, and enriching them with translations and summaries.

pub mod chat_session;
pub mod language_service;
pub mod message_store;
pub mod orchestrator;
pub mod typing_detector;

#[cfg(test)]
mod test_support;

pub use chat_session::{ChatSession, ChatSnapshot, PanelView};
pub use language_service::{LanguageService, ServiceStatus, SummaryOutcome, TranslationOutcome};
pub use message_store::MessageStore;
pub use orchestrator::{EnrichmentOrchestrator, EnrichmentOutcome};
pub use typing_detector::TypingDetector;
