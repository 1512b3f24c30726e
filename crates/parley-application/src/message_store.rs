//! MessageStore - the shared, observable message log.
//!
//! The log is only ever changed by applying a transition (current log to
//! next log) inside `watch::Sender::send_if_modified`, so concurrent
//! completions never see a torn state. Once the log grows past the seed
//! conversation, every change is mirrored to the repository.

use parley_core::chat::{ConversationRepository, Message, MessageId, MessageLog, MessagePurpose, MessageUpdate};
use parley_core::error::Result;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::{Mutex, watch};

pub struct MessageStore {
    log: watch::Sender<MessageLog>,
    repository: Arc<dyn ConversationRepository>,
    /// Serializes snapshot writes and clears.
    persist_lock: Mutex<()>,
    hydrated: AtomicBool,
}

impl MessageStore {
    /// Creates a store holding the seed conversation.
    pub fn new(repository: Arc<dyn ConversationRepository>) -> Self {
        let (log, _) = watch::channel(MessageLog::seed());
        Self {
            log,
            repository,
            persist_lock: Mutex::new(()),
            hydrated: AtomicBool::new(false),
        }
    }

    /// Replaces the log with the persisted snapshot, if one exists.
    ///
    /// Only the first call reads the repository. Returns whether a snapshot
    /// was restored.
    pub async fn hydrate(&self) -> Result<bool> {
        if self.hydrated.swap(true, Ordering::SeqCst) {
            return Ok(false);
        }

        let Some(messages) = self.repository.load().await? else {
            tracing::debug!("[MessageStore] No snapshot, starting from the seed conversation");
            return Ok(false);
        };
        if messages.is_empty() {
            return Ok(false);
        }

        for message in &messages {
            MessageId::observe(message.id);
        }
        tracing::info!("[MessageStore] Restored {} messages", messages.len());
        self.log.send_replace(MessageLog::from_messages(messages));
        Ok(true)
    }

    // ============================================================================
    // Queries
    // ============================================================================

    pub fn snapshot(&self) -> MessageLog {
        self.log.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<MessageLog> {
        self.log.subscribe()
    }

    pub fn len(&self) -> usize {
        self.log.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.log.borrow().is_empty()
    }

    pub fn get(&self, id: MessageId) -> Option<Message> {
        self.log.borrow().get(id).cloned()
    }

    pub fn find_by_original_id(&self, original: MessageId, purpose: MessagePurpose) -> Option<Message> {
        self.log.borrow().find_by_original_id(original, purpose).cloned()
    }

    // ============================================================================
    // Mutations
    // ============================================================================

    /// Applies `transition` atomically and persists the result.
    ///
    /// A transition returning `None` leaves the log untouched. Returns whether
    /// the log changed.
    pub async fn apply<F>(&self, transition: F) -> bool
    where
        F: FnOnce(&MessageLog) -> Option<MessageLog>,
    {
        let changed = self.log.send_if_modified(|log| match transition(log) {
            Some(next) => {
                *log = next;
                true
            }
            None => false,
        });

        if changed {
            self.persist().await;
        }
        changed
    }

    pub async fn append(&self, message: Message) {
        tracing::debug!("[MessageStore] append {}", message.id);
        self.apply(|log| Some(log.appended(message))).await;
    }

    pub async fn insert_after(&self, anchor: MessageId, message: Message) -> bool {
        self.apply(|log| log.inserted_after(anchor, message)).await
    }

    pub async fn replace(&self, id: MessageId, update: MessageUpdate) -> bool {
        self.apply(|log| log.replaced(id, update)).await
    }

    /// Makes `translation` the single translation of `source`.
    ///
    /// Returns the id of the live translation, or `None` when `source` is gone.
    pub async fn place_translation(&self, source: MessageId, translation: Message) -> Option<MessageId> {
        if !self.apply(|log| log.with_translation(source, translation)).await {
            tracing::debug!("[MessageStore] Source {} vanished before its translation", source);
            return None;
        }
        self.find_by_original_id(source, MessagePurpose::Translation)
            .map(|m| m.id)
    }

    /// Inserts `summary` after `source`; `false` when `source` is gone.
    pub async fn insert_summary(&self, source: MessageId, summary: Message) -> bool {
        self.apply(|log| log.with_summary(source, summary)).await
    }

    /// Restores the seed conversation and clears the snapshot.
    ///
    /// Does nothing while the log is no larger than the seed.
    pub async fn reset(&self) -> Result<bool> {
        let changed = self.log.send_if_modified(|log| match log.reset() {
            Some(seed) => {
                *log = seed;
                true
            }
            None => false,
        });
        if !changed {
            return Ok(false);
        }

        let _guard = self.persist_lock.lock().await;
        self.repository.clear().await?;
        tracing::info!("[MessageStore] Conversation reset");
        Ok(true)
    }

    async fn persist(&self) {
        let _guard = self.persist_lock.lock().await;
        let latest = self.snapshot();
        if !latest.exceeds_seed() {
            return;
        }
        if let Err(e) = self.repository.save(latest.messages()).await {
            tracing::error!("[MessageStore] Failed to save conversation: {}", e);
        }
    }
}
