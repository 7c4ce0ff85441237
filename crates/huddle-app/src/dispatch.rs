//! Intent routing.
//!
//! [`Coordinator::dispatch`] is the single router: a closed, exhaustive
//! match from every [`TeamIntent`] variant to exactly one handler, so
//! duplicate registration is impossible by construction. The router
//! consults each intent's [`Discipline`] explicitly; TakeLatest intents
//! get a generation ticket at dispatch time, and a completion whose ticket
//! has been superseded skips its commit step while its remote calls still
//! run to completion.

use std::{
    collections::HashMap,
    sync::{Mutex, PoisonError},
};

use huddle_core::WaitingKey;

use crate::{
    coordinator::Coordinator,
    error::IntentError,
    intent::{Discipline, TeamIntent},
};

/// Generation stamp for one TakeLatest occurrence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Ticket {
    key: WaitingKey,
    generation: u64,
}

/// Per-key generation counters backing the TakeLatest discipline.
#[derive(Debug, Default)]
pub(crate) struct LatestTracker {
    generations: Mutex<HashMap<WaitingKey, u64>>,
}

impl LatestTracker {
    /// Stamp a new occurrence for a key, superseding earlier tickets.
    pub(crate) fn issue(&self, key: WaitingKey) -> Ticket {
        let mut generations =
            self.generations.lock().unwrap_or_else(PoisonError::into_inner);
        let generation = generations.entry(key.clone()).or_insert(0);
        *generation += 1;
        Ticket { key, generation: *generation }
    }

    /// Whether a ticket is still the latest for its key. Untracked
    /// occurrences (internal re-entry without a ticket) always commit.
    pub(crate) fn is_current(&self, ticket: Option<&Ticket>) -> bool {
        let Some(ticket) = ticket else {
            return true;
        };
        let generations = self.generations.lock().unwrap_or_else(PoisonError::into_inner);
        generations.get(&ticket.key).copied() == Some(ticket.generation)
    }
}

impl Coordinator {
    /// Route an intent to its handler and run it to completion.
    ///
    /// Remote failures that the UI displays inline are recorded in the
    /// store and do not surface here; other failures are logged and
    /// returned.
    pub async fn dispatch(&self, intent: TeamIntent) -> Result<(), IntentError> {
        let ticket = match intent.discipline() {
            Discipline::RunAll => None,
            Discipline::TakeLatest => intent.latest_key().map(|key| self.latest.issue(key)),
        };

        let result = match intent {
            TeamIntent::CreateNewTeam { name } => self.create_new_team(&name).await,
            TeamIntent::CreateNewTeamFromConversation { conversation, name } => {
                self.create_new_team_from_conversation(&conversation, &name).await
            },
            TeamIntent::JoinTeam { token_or_name } => self.join_team(&token_or_name).await,
            TeamIntent::LeaveTeam { name } => self.leave_team(&name).await,
            TeamIntent::GetTeams => self.get_teams().await,
            TeamIntent::GetDetails { name } => self.get_details(&name).await,
            TeamIntent::GetChannels { name } => self.get_channels(&name).await,
            TeamIntent::AddToTeam { name, user, role, notify_chat } => {
                self.add_to_team(&name, &user, role, notify_chat).await
            },
            TeamIntent::AddPeopleToTeam { name, users, role, notify_chat } => {
                self.add_people_to_team(&name, &users, role, notify_chat).await
            },
            TeamIntent::InviteByEmail { name, invitees, role } => {
                self.invite_by_email(&name, &invitees, role).await
            },
            TeamIntent::EditMembership { name, username, role } => {
                self.edit_membership(&name, &username, role).await
            },
            TeamIntent::EditDescription { name, description } => {
                self.edit_description(&name, &description).await
            },
            TeamIntent::RemoveMemberOrPendingInvite { name, username, email, invite_id } => {
                self.remove_member_or_pending_invite(&name, username, email, invite_id).await
            },
            TeamIntent::InviteToTeamByPhone { name, role, phone_number, full_name } => {
                self.invite_to_team_by_phone(&name, role, &phone_number, &full_name).await
            },
            TeamIntent::IgnoreRequest { name, username } => {
                self.ignore_request(&name, &username).await
            },
            TeamIntent::CheckRequestedAccess => self.check_requested_access().await,
            TeamIntent::ToggleChannelMembership { name, channelname } => {
                self.toggle_channel_membership(&name, &channelname).await
            },
            TeamIntent::SaveChannelMembership { name, channel_state } => {
                self.save_channel_membership(&name, &channel_state).await
            },
            TeamIntent::CreateChannel { name, channelname, description } => {
                self.create_channel(&name, &channelname, &description).await
            },
            TeamIntent::DeleteChannel { conversation } => {
                self.delete_channel(&conversation).await
            },
            TeamIntent::UpdateTopic { conversation, new_topic } => {
                self.update_topic(&conversation, &new_topic, ticket.as_ref()).await
            },
            TeamIntent::UpdateChannelName { conversation, new_channel_name } => {
                self.update_channel_name(&conversation, &new_channel_name, ticket.as_ref())
                    .await
            },
            TeamIntent::ChangeOpenTeamSetting { name, convert_to_open, default_role } => {
                self.change_open_team_setting(&name, convert_to_open, default_role).await
            },
            TeamIntent::SetPublicity { name, settings } => {
                self.set_publicity(&name, &settings).await
            },
            TeamIntent::BadgeAppForTeams { new_team_names, new_team_access_requests } => {
                self.badge_app_for_teams(new_team_names, new_team_access_requests).await
            },
        };

        if let Err(err) = &result {
            tracing::warn!(%err, "team intent failed");
        }
        result
    }
}
