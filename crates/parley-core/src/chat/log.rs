//! The ordered conversation log.
//!
//! Every mutation is a state transition: it borrows the current log and
//! returns the next one, leaving the original untouched. Transitions that
//! cannot apply return `None` so callers can tell a no-op from a change.

use super::message::{Message, MessageId, MessagePurpose, Sender};
use serde::{Deserialize, Serialize};

/// Number of messages in the seed conversation.
pub const SEED_LEN: usize = 3;

/// Replacement fields for [`MessageLog::replaced`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageUpdate {
    pub text: String,
    pub language: Option<String>,
}

/// An ordered list of messages with stable identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageLog {
    messages: Vec<Message>,
}

impl MessageLog {
    /// The greeting exchange every conversation starts from.
    pub fn seed() -> Self {
        let english = Some("English".to_string());
        let seed = |id: u64, text: &str, sender: Sender| Message {
            id: MessageId::new(id),
            text: text.to_string(),
            language: english.clone(),
            sender,
            purpose: None,
            original_message_id: None,
        };

        Self {
            messages: vec![
                seed(1, "Hello! How can I help you?", Sender::Bot),
                seed(2, "Can you translate this text?", Sender::User),
                seed(
                    3,
                    "Yes, I can! I can detect the message language as you type. Click the \"⋮\" button to access options for translation and summarization.",
                    Sender::Bot,
                ),
            ],
        }
    }

    /// Wraps messages restored from storage.
    pub fn from_messages(messages: Vec<Message>) -> Self {
        Self { messages }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn into_messages(self) -> Vec<Message> {
        self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// True once the log holds more than the seed conversation.
    pub fn exceeds_seed(&self) -> bool {
        self.messages.len() > SEED_LEN
    }

    pub fn get(&self, id: MessageId) -> Option<&Message> {
        self.messages.iter().find(|m| m.id == id)
    }

    pub fn position(&self, id: MessageId) -> Option<usize> {
        self.messages.iter().position(|m| m.id == id)
    }

    /// Finds the first message derived from `original` for `purpose`.
    pub fn find_by_original_id(&self, original: MessageId, purpose: MessagePurpose) -> Option<&Message> {
        self.messages
            .iter()
            .find(|m| m.purpose == Some(purpose) && m.original_message_id == Some(original))
    }

    /// All messages derived from `original`, in log order.
    pub fn derived_from(&self, original: MessageId) -> impl Iterator<Item = &Message> {
        self.messages
            .iter()
            .filter(move |m| m.original_message_id == Some(original))
    }

    // ============================================================================
    // Transitions
    // ============================================================================

    /// Appends `message` at the end.
    pub fn appended(&self, message: Message) -> Self {
        let mut messages = self.messages.clone();
        messages.push(message);
        Self { messages }
    }

    /// Inserts `message` immediately after `anchor`.
    ///
    /// Returns `None` if `anchor` is not in the log.
    pub fn inserted_after(&self, anchor: MessageId, message: Message) -> Option<Self> {
        let index = self.position(anchor)?;
        let mut messages = self.messages.clone();
        messages.insert(index + 1, message);
        Some(Self { messages })
    }

    /// Replaces the text and language of `id`, keeping its id and position.
    ///
    /// Returns `None` if `id` is not in the log.
    pub fn replaced(&self, id: MessageId, update: MessageUpdate) -> Option<Self> {
        let index = self.position(id)?;
        let mut messages = self.messages.clone();
        let target = &mut messages[index];
        target.text = update.text;
        target.language = update.language;
        Some(Self { messages })
    }

    /// Places `translation` as the single translation of `source`.
    ///
    /// An existing translation of `source` is updated in place; otherwise
    /// `translation` is inserted right after `source`. Either way the result
    /// holds exactly one translation of `source`. Returns `None` when `source`
    /// is no longer in the log.
    pub fn with_translation(&self, source: MessageId, translation: Message) -> Option<Self> {
        self.position(source)?;

        match self.find_by_original_id(source, MessagePurpose::Translation) {
            Some(existing) => {
                let keep = existing.id;
                let mut next = self.replaced(
                    keep,
                    MessageUpdate {
                        text: translation.text,
                        language: translation.language,
                    },
                )?;
                next.messages
                    .retain(|m| !m.is_translation_of(source) || m.id == keep);
                Some(next)
            }
            None => {
                let mut pruned = self.clone();
                pruned.messages.retain(|m| !m.is_translation_of(source));
                pruned.inserted_after(source, translation)
            }
        }
    }

    /// Inserts `summary` right after `source`. Earlier summaries are kept.
    pub fn with_summary(&self, source: MessageId, summary: Message) -> Option<Self> {
        self.inserted_after(source, summary)
    }

    /// Returns the seed conversation when the log has grown past it.
    pub fn reset(&self) -> Option<Self> {
        self.exceeds_seed().then(Self::seed)
    }
}

impl Default for MessageLog {
    fn default() -> Self {
        Self::seed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn log_with_user_message() -> (MessageLog, MessageId) {
        let message = Message::user("Bonjour le monde", "French");
        let id = message.id;
        (MessageLog::seed().appended(message), id)
    }

    #[test]
    fn test_seed_has_three_messages() {
        let log = MessageLog::seed();
        assert_eq!(log.len(), SEED_LEN);
        assert!(!log.exceeds_seed());
        assert_eq!(log.messages()[0].sender, Sender::Bot);
        assert_eq!(log.messages()[1].sender, Sender::User);
    }

    #[test]
    fn test_transitions_do_not_touch_original() {
        let log = MessageLog::seed();
        let next = log.appended(Message::user("hi there", "English"));
        assert_eq!(log.len(), 3);
        assert_eq!(next.len(), 4);
    }

    #[test]
    fn test_insert_after_anchor() {
        let log = MessageLog::seed();
        let inserted = Message::summary(MessageId::new(1), "Summary: greeting", "English");
        let inserted_id = inserted.id;
        let next = log.inserted_after(MessageId::new(1), inserted).unwrap();
        assert_eq!(next.position(inserted_id), Some(1));
        assert_eq!(next.position(MessageId::new(2)), Some(2));
    }

    #[test]
    fn test_insert_after_missing_anchor() {
        let log = MessageLog::seed();
        let inserted = Message::summary(MessageId::new(99), "x", "English");
        assert!(log.inserted_after(MessageId::new(99), inserted).is_none());
    }

    #[test]
    fn test_translation_inserted_then_replaced_in_place() {
        let (log, source) = log_with_user_message();

        let first = Message::translation(source, "Hello world", "French ➝ English");
        let first_id = first.id;
        let log = log.with_translation(source, first).unwrap();
        assert_eq!(log.len(), 5);
        assert_eq!(log.position(first_id), Some(4));

        let second = Message::translation(source, "Hello, world!", "French ➝ English");
        let log = log.with_translation(source, second).unwrap();
        assert_eq!(log.len(), 5);
        let kept = log.get(first_id).unwrap();
        assert_eq!(kept.text, "Hello, world!");
        assert_eq!(log.position(first_id), Some(4));
        assert_eq!(log.derived_from(source).count(), 1);
    }

    #[test]
    fn test_translation_replace_survives_drift() {
        let (log, source) = log_with_user_message();
        let translation = Message::translation(source, "Hello world", "French ➝ English");
        let translation_id = translation.id;
        let log = log.with_translation(source, translation).unwrap();
        let log = log
            .with_summary(source, Message::summary(source, "Summary: greeting", "French"))
            .unwrap();
        // summary now sits between the source and its translation
        assert_eq!(log.position(translation_id), Some(5));

        let log = log
            .with_translation(source, Message::translation(source, "Hi world", "French ➝ English"))
            .unwrap();
        assert_eq!(log.len(), 6);
        assert_eq!(log.get(translation_id).unwrap().text, "Hi world");
    }

    #[test]
    fn test_duplicate_translations_are_collapsed() {
        let (log, source) = log_with_user_message();
        let a = Message::translation(source, "a", "French ➝ English");
        let a_id = a.id;
        let b = Message::translation(source, "b", "French ➝ English");
        let log = log.appended(a).appended(b);

        let log = log
            .with_translation(source, Message::translation(source, "c", "French ➝ English"))
            .unwrap();
        let translations: Vec<&Message> = log
            .messages()
            .iter()
            .filter(|m| m.is_translation_of(source))
            .collect();
        assert_eq!(translations.len(), 1);
        assert_eq!(translations[0].id, a_id);
        assert_eq!(translations[0].text, "c");
    }

    #[test]
    fn test_translation_of_missing_source_is_noop() {
        let log = MessageLog::seed();
        let orphan = Message::translation(MessageId::new(404), "x", "y");
        assert!(log.with_translation(MessageId::new(404), orphan).is_none());
    }

    #[test]
    fn test_summaries_accumulate() {
        let (log, source) = log_with_user_message();
        let log = log
            .with_summary(source, Message::summary(source, "Summary: one", "French"))
            .unwrap();
        let log = log
            .with_summary(source, Message::summary(source, "Summary: two", "French"))
            .unwrap();
        assert_eq!(log.len(), 6);
        assert_eq!(log.derived_from(source).count(), 2);
        // newest summary sits directly after the source
        assert_eq!(log.messages()[4].text, "Summary: two");
        assert_eq!(log.messages()[5].text, "Summary: one");
    }

    #[test]
    fn test_reset_guard() {
        assert!(MessageLog::seed().reset().is_none());

        let (log, _) = log_with_user_message();
        let reset = log.reset().unwrap();
        assert_eq!(reset, MessageLog::seed());
    }

    #[test]
    fn test_replaced_keeps_position() {
        let log = MessageLog::seed();
        let next = log
            .replaced(
                MessageId::new(2),
                MessageUpdate {
                    text: "edited".to_string(),
                    language: None,
                },
            )
            .unwrap();
        assert_eq!(next.position(MessageId::new(2)), Some(1));
        assert_eq!(next.get(MessageId::new(2)).unwrap().text, "edited");
        assert!(next.get(MessageId::new(2)).unwrap().language.is_none());
    }
}
