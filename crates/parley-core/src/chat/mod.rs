//! Chat domain module.
//!
//! # Module Structure
//!
//! - `message`: message types (`Message`, `MessageId`, `Sender`, `MessagePurpose`)
//! - `log`: the ordered log and its state transitions (`MessageLog`)
//! - `selection`: action panel state and offered actions
//! - `repository`: repository trait for conversation persistence

mod log;
mod message;
mod repository;
mod selection;

pub use log::{MessageLog, MessageUpdate, SEED_LEN};
pub use message::{Message, MessageId, MessagePurpose, Sender, translation_label};
pub use repository::ConversationRepository;
pub use selection::{Selection, SelectionState, can_summarize, translation_targets};
