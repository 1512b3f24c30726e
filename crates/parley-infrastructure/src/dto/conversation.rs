//! Conversation snapshot DTOs and migrations.
//!
//! Version 1.0.0 stored `sender` and `purpose` as free-form strings and had no
//! link from a derived message to its source. Version 2.0.0 stores the typed
//! fields and the link. Snapshots are written flat, with the `version` key
//! next to the fields.

use parley_core::chat::{Message, MessageId, MessageLog, MessagePurpose, Sender};
use parley_core::error::{ParleyError, Result};
use serde::{Deserialize, Serialize};
use version_migrate::{IntoDomain, Versioned};

/// Entity name of the conversation migration path.
pub const CONVERSATION_ENTITY: &str = "conversation";

/// Version assumed for snapshots written before the `version` key existed.
pub const UNVERSIONED_SNAPSHOT: &str = "1.0.0";

/// Message DTO for V1.0.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageV1_0 {
    pub id: u64,
    pub text: String,
    #[serde(default)]
    pub language: Option<String>,
    pub sender: String,
    #[serde(default)]
    pub purpose: Option<String>,
}

/// Conversation snapshot V1.0.0 (initial version).
#[derive(Debug, Clone, Default, Serialize, Deserialize, Versioned)]
#[versioned(version = "1.0.0")]
pub struct ConversationV1_0 {
    #[serde(default)]
    pub messages: Vec<MessageV1_0>,
}

/// Message DTO for V2.0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageV2_0 {
    pub id: u64,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    pub sender: Sender,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purpose: Option<MessagePurpose>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_message_id: Option<u64>,
}

/// Conversation snapshot V2.0.0.
///
/// Typed sender and purpose, plus `original_message_id` on derived messages.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Versioned)]
#[versioned(version = "2.0.0")]
pub struct ConversationV2_0 {
    /// RFC 3339 time of the save. Absent on migrated snapshots.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_at: Option<String>,
    #[serde(default)]
    pub messages: Vec<MessageV2_0>,
}

/// Type alias for the latest conversation snapshot version.
pub type ConversationDTO = ConversationV2_0;

// ============================================================================
// Migration implementations
// ============================================================================

/// Migration from ConversationV1_0 to ConversationV2_0.
///
/// A derived message is linked to the closest preceding authored message,
/// which is where derived messages were always inserted.
impl version_migrate::MigratesTo<ConversationV2_0> for ConversationV1_0 {
    fn migrate(self) -> ConversationV2_0 {
        let mut last_authored: Option<u64> = None;
        let messages = self
            .messages
            .into_iter()
            .map(|dto| {
                let purpose = parse_v1_purpose(dto.purpose.as_deref());
                let original_message_id = match purpose {
                    Some(_) => last_authored,
                    None => {
                        last_authored = Some(dto.id);
                        None
                    }
                };
                MessageV2_0 {
                    id: dto.id,
                    text: dto.text,
                    language: dto.language,
                    sender: parse_v1_sender(&dto.sender),
                    purpose,
                    original_message_id,
                }
            })
            .collect();

        ConversationV2_0 {
            saved_at: None,
            messages,
        }
    }
}

fn parse_v1_sender(sender: &str) -> Sender {
    if sender.eq_ignore_ascii_case("user") {
        Sender::User
    } else {
        Sender::Bot
    }
}

fn parse_v1_purpose(purpose: Option<&str>) -> Option<MessagePurpose> {
    match purpose?.to_ascii_lowercase().as_str() {
        "translation" => Some(MessagePurpose::Translation),
        "summary" | "summarization" => Some(MessagePurpose::Summary),
        _ => None,
    }
}

// ============================================================================
// Domain model conversions
// ============================================================================

impl From<Message> for MessageV2_0 {
    fn from(message: Message) -> Self {
        Self {
            id: message.id.get(),
            text: message.text,
            language: message.language,
            sender: message.sender,
            purpose: message.purpose,
            original_message_id: message.original_message_id.map(MessageId::get),
        }
    }
}

impl From<MessageV2_0> for Message {
    fn from(dto: MessageV2_0) -> Self {
        Message {
            id: MessageId::new(dto.id),
            text: dto.text,
            language: dto.language,
            sender: dto.sender,
            purpose: dto.purpose,
            original_message_id: dto.original_message_id.map(MessageId::new),
        }
    }
}

impl IntoDomain<MessageLog> for ConversationV2_0 {
    fn into_domain(self) -> MessageLog {
        MessageLog::from_messages(self.messages.into_iter().map(Into::into).collect())
    }
}

impl version_migrate::FromDomain<MessageLog> for ConversationV2_0 {
    fn from_domain(log: MessageLog) -> Self {
        ConversationV2_0 {
            saved_at: Some(chrono::Utc::now().to_rfc3339()),
            messages: log.into_messages().into_iter().map(Into::into).collect(),
        }
    }
}

// ============================================================================
// Migrator factory
// ============================================================================

/// Creates the migrator for conversation snapshots.
///
/// # Migration Path
///
/// - V1.0 → V2.0: Types sender and purpose, links derived messages
/// - V2.0 → MessageLog: Converts DTO to domain model
pub fn create_conversation_migrator() -> Result<version_migrate::Migrator> {
    let mut migrator = version_migrate::Migrator::builder().build();

    let conversation_path = version_migrate::Migrator::define(CONVERSATION_ENTITY)
        .from::<ConversationV1_0>()
        .step::<ConversationV2_0>()
        .into_with_save::<MessageLog>();

    migrator.register(conversation_path).map_err(|e| {
        ParleyError::internal(format!(
            "Failed to register conversation migration path: {}",
            e
        ))
    })?;

    Ok(migrator)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load(toml_str: &str) -> std::result::Result<MessageLog, String> {
        let migrator = create_conversation_migrator().unwrap();
        let toml_value: toml::Value = toml::from_str(toml_str).unwrap();
        migrator
            .load_flat_from(CONVERSATION_ENTITY, toml_value)
            .map_err(|e| e.to_string())
    }

    #[test]
    fn test_conversation_migration_v1_0_to_domain() {
        let log = load(
            r#"
version = "1.0.0"

[[messages]]
id = 10
text = "Bonjour"
language = "French"
sender = "user"

[[messages]]
id = 11
text = "Hello"
language = "French  ➝  English"
sender = "bot"
purpose = "Translation"

[[messages]]
id = 12
text = "hi"
sender = "user"
purpose = "chat"
"#,
        )
        .unwrap();

        let messages = log.messages();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[0].sender, Sender::User);
        assert_eq!(messages[1].sender, Sender::Bot);
        assert_eq!(messages[1].purpose, Some(MessagePurpose::Translation));
        assert_eq!(messages[1].original_message_id, Some(MessageId::new(10)));
        assert_eq!(messages[2].purpose, None);
        assert_eq!(messages[2].language, None);
    }

    #[test]
    fn test_conversation_v2_0_rejects_invalid_sender() {
        let result = load(
            r#"
version = "2.0.0"

[[messages]]
id = 11
text = "Hello"
sender = "system"
purpose = "Translation"
original_message_id = 10
"#,
        );

        assert!(result.is_err(), "invalid v2 snapshot was accepted: {:?}", result);
    }

    #[test]
    fn test_conversation_save_writes_latest_version() {
        let migrator = create_conversation_migrator().unwrap();
        let source = Message::user("Bonjour", "French");
        let translation = Message::translation(source.id, "Hello", "French ➝ English");
        let log = MessageLog::from_messages(vec![source, translation]);

        let json_str = migrator
            .save_domain_flat(CONVERSATION_ENTITY, &log)
            .unwrap();
        assert!(json_str.contains("\"version\":\"2.0.0\""));
        assert!(json_str.contains("\"saved_at\""));

        let toml_value: toml::Value = serde_json::from_str(&json_str).unwrap();
        let reloaded: MessageLog = migrator
            .load_flat_from(CONVERSATION_ENTITY, toml_value)
            .unwrap();
        assert_eq!(reloaded, log);
    }
}
