//! End-to-end chat flow against a scripted gateway and a TOML snapshot.

use async_trait::async_trait;
use parley_application::{ChatSession, EnrichmentOutcome};
use parley_core::capability::{
    Availability, Capability, CapabilityGateway, CapabilityReport, SummarizeOptions,
};
use parley_core::chat::{MessagePurpose, SEED_LEN, Sender};
use parley_core::config::ParleyConfig;
use parley_core::error::{ParleyError, Result};
use parley_core::language::{DetectedLanguage, SupportedLanguage};
use parley_infrastructure::TomlConversationRepository;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

struct ScriptedGateway {
    translations: Mutex<VecDeque<String>>,
}

impl ScriptedGateway {
    fn new(translations: &[&str]) -> Self {
        Self {
            translations: Mutex::new(translations.iter().map(|t| t.to_string()).collect()),
        }
    }
}

#[async_trait]
impl CapabilityGateway for ScriptedGateway {
    async fn probe(&self) -> Result<CapabilityReport> {
        Ok(CapabilityReport {
            language_detector: Availability::Readily,
            translator: Availability::Readily,
            summarizer: Availability::Readily,
        })
    }

    async fn prepare(&self, _capability: Capability) -> Result<()> {
        Ok(())
    }

    async fn detect_language(&self, text: &str) -> Result<Vec<DetectedLanguage>> {
        if text.starts_with("Bonjour") {
            Ok(vec![
                DetectedLanguage::new("fr", 0.91),
                DetectedLanguage::new("it", 0.002),
            ])
        } else {
            Ok(vec![DetectedLanguage::new("en", 0.88)])
        }
    }

    async fn translate(&self, _text: &str, _source: &str, _target: &str) -> Result<String> {
        self.translations
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| ParleyError::gateway("translate", "script exhausted"))
    }

    async fn summarize(&self, text: &str, _options: &SummarizeOptions) -> Result<String> {
        Ok(format!("{} words", text.split_whitespace().count()))
    }
}

fn session(dir: &TempDir, gateway: Arc<ScriptedGateway>) -> ChatSession {
    let repository = Arc::new(TomlConversationRepository::with_path(
        dir.path().join("conversation.toml"),
    ));
    ChatSession::new(gateway, repository, &ParleyConfig::default())
}

#[tokio::test]
async fn test_bonjour_le_monde() {
    let dir = TempDir::new().unwrap();
    let gateway = Arc::new(ScriptedGateway::new(&["Hello world", "Hello, world!"]));
    let chat = session(&dir, gateway.clone());
    chat.start().await;

    let t1 = chat.send("Bonjour le monde").await.unwrap();
    assert_eq!(t1.language.as_deref(), Some("French"));
    assert_eq!(t1.sender, Sender::User);

    chat.set_target_language(SupportedLanguage::En);
    assert!(chat.open_options(t1.id));
    let EnrichmentOutcome::Applied(translation_id) = chat.translate_selected().await else {
        panic!("translation was not applied");
    };

    let messages = chat.snapshot().messages;
    assert_eq!(messages.len(), SEED_LEN + 2);
    let translation = &messages[SEED_LEN + 1];
    assert_eq!(translation.id, translation_id);
    assert_eq!(translation.text, "Hello world");
    assert_eq!(translation.language.as_deref(), Some("French ➝ English"));
    assert_eq!(translation.purpose, Some(MessagePurpose::Translation));
    assert_eq!(translation.original_message_id, Some(t1.id));

    assert!(chat.open_options(t1.id));
    assert_eq!(
        chat.translate_selected().await,
        EnrichmentOutcome::Applied(translation_id)
    );
    let messages = chat.snapshot().messages;
    assert_eq!(messages.len(), SEED_LEN + 2);
    assert_eq!(messages[SEED_LEN + 1].text, "Hello, world!");

    // A fresh session restores the mirrored snapshot.
    let restored = session(&dir, gateway);
    restored.start().await;
    assert_eq!(restored.snapshot().messages, messages);
}

#[tokio::test]
async fn test_reset_clears_snapshot() {
    let dir = TempDir::new().unwrap();
    let gateway = Arc::new(ScriptedGateway::new(&[]));
    let chat = session(&dir, gateway.clone());
    chat.start().await;

    chat.send("Bonjour le monde").await.unwrap();
    assert!(dir.path().join("conversation.toml").exists());

    assert!(chat.reset().await.unwrap());
    assert!(!dir.path().join("conversation.toml").exists());

    let restored = session(&dir, gateway);
    restored.start().await;
    assert_eq!(restored.snapshot().messages.len(), SEED_LEN);
}

#[tokio::test]
async fn test_failed_translation_leaves_log_unchanged() {
    let dir = TempDir::new().unwrap();
    let chat = session(&dir, Arc::new(ScriptedGateway::new(&[])));
    chat.start().await;

    let t1 = chat.send("Bonjour le monde").await.unwrap();
    assert!(chat.open_options(t1.id));
    assert_eq!(
        chat.translate_selected().await,
        EnrichmentOutcome::Failed("Error translating text.".to_string())
    );

    let snapshot = chat.snapshot();
    assert_eq!(snapshot.messages.len(), SEED_LEN + 1);
    assert_eq!(
        snapshot.panel.map(|p| p.errors),
        Some(vec!["Error translating text.".to_string()])
    );
}
