//! TOML-backed conversation repository.

use crate::dto::{CONVERSATION_ENTITY, UNVERSIONED_SNAPSHOT, create_conversation_migrator};
use crate::paths::ParleyPaths;
use crate::storage::AtomicTomlFile;
use async_trait::async_trait;
use parley_core::chat::{ConversationRepository, Message, MessageLog};
use parley_core::error::{ParleyError, Result};
use std::path::PathBuf;
use std::sync::Arc;

/// Stores the single conversation slot in one TOML file.
///
/// File operations run on the blocking pool so callers on the async runtime
/// are never stalled by disk I/O. Snapshots go through the conversation
/// migrator, so older layouts are upgraded on load and saves always write
/// the latest version.
#[derive(Clone)]
pub struct TomlConversationRepository {
    file: Arc<AtomicTomlFile<toml::Value>>,
}

impl TomlConversationRepository {
    /// Creates a repository at the default location
    /// (`~/.config/parley/conversation.toml`).
    pub fn new() -> Result<Self> {
        Ok(Self::with_path(ParleyPaths::conversation_file()?))
    }

    /// Creates a repository backed by `path`.
    pub fn with_path(path: PathBuf) -> Self {
        Self {
            file: Arc::new(AtomicTomlFile::new(path)),
        }
    }

    async fn run_blocking<T, F>(&self, op: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&AtomicTomlFile<toml::Value>) -> Result<T> + Send + 'static,
    {
        let file = self.file.clone();
        tokio::task::spawn_blocking(move || op(&file))
            .await
            .map_err(|e| ParleyError::internal(format!("Failed to join task: {}", e)))?
    }
}

fn migration_error(e: impl std::fmt::Display) -> ParleyError {
    ParleyError::Serialization {
        format: "TOML".to_string(),
        message: format!("Failed to migrate conversation snapshot: {}", e),
    }
}

/// Converts a stored snapshot to domain messages.
///
/// Snapshots written before the `version` key existed are read as
/// version 1.0.0.
fn decode_snapshot(mut toml_value: toml::Value) -> Result<Vec<Message>> {
    let table = toml_value
        .as_table_mut()
        .ok_or_else(|| migration_error("snapshot is not a table"))?;
    if !table.contains_key("version") {
        table.insert(
            "version".to_string(),
            toml::Value::String(UNVERSIONED_SNAPSHOT.to_string()),
        );
    }

    let migrator = create_conversation_migrator()?;
    let log: MessageLog = migrator
        .load_flat_from(CONVERSATION_ENTITY, toml_value)
        .map_err(migration_error)?;
    Ok(log.into_messages())
}

/// Converts domain messages to the latest snapshot layout.
fn encode_snapshot(messages: &[Message]) -> Result<toml::Value> {
    let migrator = create_conversation_migrator()?;
    let log = MessageLog::from_messages(messages.to_vec());
    // The migrator writes JSON; the same tree is stored as TOML.
    let json_str = migrator
        .save_domain_flat(CONVERSATION_ENTITY, &log)
        .map_err(migration_error)?;
    Ok(serde_json::from_str(&json_str)?)
}

#[async_trait]
impl ConversationRepository for TomlConversationRepository {
    async fn load(&self) -> Result<Option<Vec<Message>>> {
        let stored = self.run_blocking(|file| Ok(file.load()?)).await?;
        let messages = stored.map(decode_snapshot).transpose()?;
        tracing::debug!(
            "[TomlConversationRepository] loaded {} messages from {:?}",
            messages.as_ref().map_or(0, Vec::len),
            self.file.path()
        );
        Ok(messages)
    }

    async fn save(&self, messages: &[Message]) -> Result<()> {
        let snapshot = encode_snapshot(messages)?;
        self.run_blocking(move |file| Ok(file.save(&snapshot)?)).await?;
        tracing::debug!(
            "[TomlConversationRepository] saved {} messages",
            messages.len()
        );
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        self.run_blocking(|file| Ok(file.remove()?)).await?;
        tracing::debug!("[TomlConversationRepository] cleared snapshot");
        Ok(())
    }
}
