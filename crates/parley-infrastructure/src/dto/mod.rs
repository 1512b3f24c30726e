//! Data transfer objects for persisted files.

pub mod conversation;

pub use conversation::{
    CONVERSATION_ENTITY, ConversationDTO, ConversationV1_0, ConversationV2_0, MessageV1_0,
    MessageV2_0, UNVERSIONED_SNAPSHOT, create_conversation_migrator,
};
