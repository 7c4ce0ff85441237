//! Channel handlers.
//!
//! Channel membership is never mutated locally: toggles and bulk saves
//! issue their join/leave calls and rely on the channel refresh that
//! always follows to bring the cache back to the source of truth.

use std::collections::{BTreeMap, HashMap};

use futures::future::{self, BoxFuture};
use huddle_client::{ServiceError, TopicType};
use huddle_core::{ChannelInfo, ConversationId, Teamname, WaitingKey};

use crate::{
    coordinator::Coordinator,
    dispatch::Ticket,
    effects::{Dialog, Tab},
    error::IntentError,
};

impl Coordinator {
    /// Refresh a team's channel list, rebuilding the conversation set and
    /// per-channel metadata wholesale.
    pub(crate) async fn get_channels(&self, name: &Teamname) -> Result<(), IntentError> {
        let _waiting = self.waiting.begin(WaitingKey::get_channels(name));

        let conversations =
            self.services.chat.list_team_conversations(name, TopicType::Chat).await?;
        let channels = conversations
            .into_iter()
            .map(|conv| {
                let info = ChannelInfo {
                    channelname: conv.channelname,
                    description: conv.headline,
                    participants: conv.participants.into_iter().collect(),
                };
                (conv.conv_id, info)
            })
            .collect();

        self.store.write().await.set_team_channels(name.clone(), channels);
        Ok(())
    }

    /// Join or leave one channel depending on cached membership, then
    /// refresh the channel list unconditionally.
    pub(crate) async fn toggle_channel_membership(
        &self,
        name: &Teamname,
        channelname: &str,
    ) -> Result<(), IntentError> {
        let you = self.username().await;
        let lookup = {
            let store = self.store.read().await;
            store.conversation_for_channel(name, channelname).map(|conversation| {
                let is_member = store
                    .participants(&conversation)
                    .is_some_and(|participants| participants.contains(&you));
                (conversation, is_member)
            })
        };

        let result = match &lookup {
            Some((conversation, true)) => {
                self.services.chat.leave_conversation(conversation).await
            },
            Some((conversation, false)) => {
                self.services.chat.join_conversation_by_id(conversation).await
            },
            None => {
                tracing::warn!(
                    team = %name,
                    channel = channelname,
                    "channel not in cache, skipping membership call"
                );
                Ok(())
            },
        };

        self.refresh_channels(name).await;
        result.map_err(Into::into)
    }

    /// Apply a channel-membership form: join wanted channels by name,
    /// leave unwanted ones by cached conversation id.
    ///
    /// All calls run in parallel with per-call failure isolation; failures
    /// are reported together and exactly one channel refresh follows the
    /// batch whatever the outcomes.
    pub(crate) async fn save_channel_membership(
        &self,
        name: &Teamname,
        channel_state: &BTreeMap<String, bool>,
    ) -> Result<(), IntentError> {
        let conversation_by_channel: HashMap<String, ConversationId> = {
            let store = self.store.read().await;
            store
                .conv_ids(name)
                .filter_map(|id| {
                    store.channelname(id).map(|channel| (channel.to_owned(), id.clone()))
                })
                .collect()
        };

        let chat = &self.services.chat;
        let mut calls: Vec<BoxFuture<'_, Result<(), ServiceError>>> = Vec::new();
        for (channelname, wants_membership) in channel_state {
            if *wants_membership {
                calls.push(Box::pin(async move {
                    chat.join_conversation_by_name(name, channelname).await
                }));
            } else if let Some(conversation) = conversation_by_channel.get(channelname) {
                let conversation = conversation.clone();
                calls.push(Box::pin(async move {
                    chat.leave_conversation(&conversation).await
                }));
            }
            // A leave for a channel with no cached conversation has nothing
            // to address; the refresh below reconciles it.
        }

        let waiting = self.waiting.begin(WaitingKey::save_channels(name));
        let results = future::join_all(calls).await;
        self.report_failures(results.into_iter().filter_map(Result::err).collect());
        drop(waiting);

        self.refresh_channels(name).await;
        Ok(())
    }

    /// Create a channel, post its description when given, and move the UI
    /// into the new conversation. Failures land in the channel-creation
    /// error field for inline display.
    pub(crate) async fn create_channel(
        &self,
        name: &Teamname,
        channelname: &str,
        description: &str,
    ) -> Result<(), IntentError> {
        self.store.write().await.set_channel_creation_error(String::new());

        let outcome: Result<ConversationId, ServiceError> = async {
            let conversation = self.services.chat.new_conversation(name, channelname).await?;
            if !description.is_empty() {
                self.services.chat.post_headline(&conversation, name, description).await?;
            }
            Ok(conversation)
        }
        .await;

        match outcome {
            Ok(conversation) => {
                self.effects.navigator.dismiss(Dialog::CreateChannel);
                self.effects.navigator.select_conversation(Some(&conversation));
                self.effects.navigator.navigate_to_tab(Tab::Chat);
            },
            Err(err) => {
                self.store.write().await.set_channel_creation_error(err.to_string());
            },
        }
        Ok(())
    }

    /// Delete a channel resolved from the cache, then refresh the list.
    /// Unknown conversations are a no-op.
    pub(crate) async fn delete_channel(
        &self,
        conversation: &ConversationId,
    ) -> Result<(), IntentError> {
        let (channelname, team) = {
            let store = self.store.read().await;
            (
                store.channelname(conversation).map(ToOwned::to_owned),
                store.team_for_conversation(conversation),
            )
        };
        let (Some(channelname), Some(team)) = (channelname, team) else {
            tracing::warn!(%conversation, "delete for a conversation not in cache");
            return Ok(());
        };

        self.services.chat.delete_conversation(conversation, &channelname, true).await?;
        self.refresh_channels(&team).await;
        Ok(())
    }

    /// Update a channel topic. TakeLatest: a superseded edit still posts,
    /// but only the latest occurrence triggers the channel refresh.
    pub(crate) async fn update_topic(
        &self,
        conversation: &ConversationId,
        new_topic: &str,
        ticket: Option<&Ticket>,
    ) -> Result<(), IntentError> {
        let Some(team) = self.store.read().await.team_for_conversation(conversation) else {
            tracing::warn!(%conversation, "topic update for a conversation not in cache");
            return Ok(());
        };

        let result = {
            let _waiting = self.waiting.begin(WaitingKey::update_topic(conversation));
            self.services.chat.post_headline(conversation, &team, new_topic).await
        };

        if self.latest.is_current(ticket) {
            self.refresh_channels(&team).await;
        }
        result.map_err(Into::into)
    }

    /// Rename a channel. TakeLatest, same commit rule as topic updates.
    pub(crate) async fn update_channel_name(
        &self,
        conversation: &ConversationId,
        new_channel_name: &str,
        ticket: Option<&Ticket>,
    ) -> Result<(), IntentError> {
        let Some(team) = self.store.read().await.team_for_conversation(conversation) else {
            tracing::warn!(%conversation, "rename for a conversation not in cache");
            return Ok(());
        };

        let result = {
            let _waiting = self.waiting.begin(WaitingKey::update_channel_name(conversation));
            self.services.chat.post_metadata(conversation, &team, new_channel_name).await
        };

        if self.latest.is_current(ticket) {
            self.refresh_channels(&team).await;
        }
        result.map_err(Into::into)
    }
}
