//! Action panel state.

use super::message::{Message, MessageId};
use crate::language::{LanguageNameResolver, SUPPORTED_LANGUAGES, SupportedLanguage};

/// Snapshot of the message whose action panel is open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub id: MessageId,
    pub text: String,
}

/// Single-selection state for the action panel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    current: Option<Selection>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens the panel for `message`, replacing any prior selection.
    pub fn open(&mut self, message: &Message) {
        self.current = Some(Selection {
            id: message.id,
            text: message.text.clone(),
        });
    }

    /// Closes the panel whatever is selected.
    pub fn close(&mut self) {
        self.current = None;
    }

    pub fn current(&self) -> Option<&Selection> {
        self.current.as_ref()
    }

    pub fn is_open(&self, id: MessageId) -> bool {
        self.current.as_ref().is_some_and(|s| s.id == id)
    }
}

/// Target languages offered for `message` in the panel.
///
/// The language matching the message's own label is hidden until a
/// translation has been made in this session.
pub fn translation_targets(
    message: &Message,
    has_translated: bool,
    resolver: &LanguageNameResolver,
) -> Vec<SupportedLanguage> {
    SUPPORTED_LANGUAGES
        .into_iter()
        .filter(|lang| {
            has_translated || message.language.as_deref() != Some(resolver.name_of(lang.code()).as_str())
        })
        .collect()
}

/// Whether the summarize action is offered for `text`.
pub fn can_summarize(text: &str, min_chars: usize) -> bool {
    text.chars().count() > min_chars
}
