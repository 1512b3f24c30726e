//! Conversation repository trait.
//!
//! Defines the interface for persisting the single conversation slot.

use super::message::Message;
use crate::error::Result;
use async_trait::async_trait;

/// An abstract repository for the persisted conversation.
///
/// There is exactly one conversation; implementations decide where it lives
/// (TOML file, in-memory, remote).
#[async_trait]
pub trait ConversationRepository: Send + Sync {
    /// Loads the persisted conversation.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(messages))`: A snapshot exists
    /// - `Ok(None)`: Nothing has been persisted yet
    /// - `Err(_)`: The snapshot exists but could not be read
    async fn load(&self) -> Result<Option<Vec<Message>>>;

    /// Replaces the persisted conversation with `messages`.
    async fn save(&self, messages: &[Message]) -> Result<()>;

    /// Removes the persisted conversation. Succeeds if nothing was stored.
    async fn clear(&self) -> Result<()>;
}
