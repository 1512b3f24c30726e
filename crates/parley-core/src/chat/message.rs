//! Chat message types.
//!
//! Messages are authored by the user, seeded by the bot, or derived from an
//! existing message by an enrichment operation (translation or summary).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static LAST_ISSUED_ID: AtomicU64 = AtomicU64::new(0);

/// Time-based message identifier, strictly increasing within a process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(u64);

impl MessageId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> u64 {
        self.0
    }

    /// Issues a fresh id: the current Unix time in milliseconds, bumped past
    /// any id issued or observed before.
    pub fn next() -> Self {
        let now = u64::try_from(chrono::Utc::now().timestamp_millis()).unwrap_or(0);
        let previous = LAST_ISSUED_ID
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                Some(now.max(last + 1))
            })
            .unwrap_or_else(|last| last);
        Self(now.max(previous + 1))
    }

    /// Records an id loaded from storage so later ids sort after it.
    pub fn observe(id: MessageId) {
        LAST_ISSUED_ID.fetch_max(id.0, Ordering::SeqCst);
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Who authored a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

/// Why a derived message exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessagePurpose {
    Translation,
    Summary,
}

impl fmt::Display for MessagePurpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Translation => f.write_str("Translation"),
            Self::Summary => f.write_str("Summary"),
        }
    }
}

/// A single entry in the conversation log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub text: String,
    /// Display label, e.g. `"French"` or `"French ➝ English"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    pub sender: Sender,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purpose: Option<MessagePurpose>,
    /// Source message of a derived message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_message_id: Option<MessageId>,
}

impl Message {
    /// A message typed by the user.
    pub fn user(text: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            id: MessageId::next(),
            text: text.into(),
            language: Some(language.into()),
            sender: Sender::User,
            purpose: None,
            original_message_id: None,
        }
    }

    /// A translation of `source`.
    pub fn translation(source: MessageId, text: impl Into<String>, language: impl Into<String>) -> Self {
        Self::derived(source, MessagePurpose::Translation, text.into(), language.into())
    }

    /// A summary of `source`.
    pub fn summary(source: MessageId, text: impl Into<String>, language: impl Into<String>) -> Self {
        Self::derived(source, MessagePurpose::Summary, text.into(), language.into())
    }

    fn derived(source: MessageId, purpose: MessagePurpose, text: String, language: String) -> Self {
        Self {
            id: MessageId::next(),
            text,
            language: Some(language),
            sender: Sender::Bot,
            purpose: Some(purpose),
            original_message_id: Some(source),
        }
    }

    /// True for translations and summaries.
    pub fn is_derived(&self) -> bool {
        self.purpose.is_some()
    }

    /// True when this message is the translation of `source`.
    pub fn is_translation_of(&self, source: MessageId) -> bool {
        self.purpose == Some(MessagePurpose::Translation) && self.original_message_id == Some(source)
    }
}

/// Builds the label of a translated message.
pub fn translation_label(source_name: &str, target_name: &str) -> String {
    format!("{source_name} ➝ {target_name}")
}
