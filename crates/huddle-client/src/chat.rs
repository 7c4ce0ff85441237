//! Chat service call contract for team-scoped conversations.

use async_trait::async_trait;
use huddle_core::{ConversationId, Teamname};
use serde::{Deserialize, Serialize};

use crate::error::ServiceError;

/// Conversation topic kind the service can filter on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TopicType {
    /// Human chat channels.
    Chat,
    /// Development/system topics; never surfaced as channels.
    Dev,
}

/// One team conversation as listed by the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    /// Service-assigned conversation id.
    pub conv_id: ConversationId,
    /// Human channel name.
    pub channelname: String,
    /// Channel headline/description.
    pub headline: String,
    /// Usernames currently in the conversation.
    pub participants: Vec<String>,
}

/// Remote chat service operations used for team channel management.
#[async_trait]
pub trait ChatService: Send + Sync {
    /// List a team's conversations of one topic type.
    async fn list_team_conversations(
        &self,
        team: &Teamname,
        topic: TopicType,
    ) -> Result<Vec<Conversation>, ServiceError>;

    /// Join a conversation by id.
    async fn join_conversation_by_id(
        &self,
        conversation: &ConversationId,
    ) -> Result<(), ServiceError>;

    /// Join a team channel by name; the service resolves or creates the
    /// backing conversation.
    async fn join_conversation_by_name(
        &self,
        team: &Teamname,
        channelname: &str,
    ) -> Result<(), ServiceError>;

    /// Leave a conversation.
    async fn leave_conversation(
        &self,
        conversation: &ConversationId,
    ) -> Result<(), ServiceError>;

    /// Create a new team channel and return its conversation id.
    async fn new_conversation(
        &self,
        team: &Teamname,
        channelname: &str,
    ) -> Result<ConversationId, ServiceError>;

    /// Set a conversation's headline (topic).
    async fn post_headline(
        &self,
        conversation: &ConversationId,
        team: &Teamname,
        headline: &str,
    ) -> Result<(), ServiceError>;

    /// Rename a conversation's channel.
    async fn post_metadata(
        &self,
        conversation: &ConversationId,
        team: &Teamname,
        channelname: &str,
    ) -> Result<(), ServiceError>;

    /// Delete a conversation.
    async fn delete_conversation(
        &self,
        conversation: &ConversationId,
        channelname: &str,
        confirmed: bool,
    ) -> Result<(), ServiceError>;
}
