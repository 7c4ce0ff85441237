//! Team intents and their dispatch discipline.
//!
//! [`TeamIntent`] is the closed set of operations the UI (and the
//! notification reconciler) can request. Each variant carries its typed
//! payload; [`Coordinator::dispatch`](crate::Coordinator::dispatch) routes
//! every variant to exactly one handler through an exhaustive match.

use std::collections::BTreeMap;

use huddle_core::{ConversationId, TeamRole, Teamname, WaitingKey};

/// How concurrent occurrences of one intent are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Discipline {
    /// Every occurrence runs to completion independently.
    RunAll,
    /// Only the latest occurrence per key commits its effects. In-flight
    /// remote calls still run to completion; a superseded occurrence skips
    /// its commit step.
    TakeLatest,
}

/// Desired publicity configuration submitted by the settings form.
///
/// Compared field-by-field against the cached values; only changed fields
/// produce remote calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DesiredPublicity {
    /// Whether the team should be open.
    pub open_team: bool,
    /// Role granted to open joiners.
    pub open_team_role: TeamRole,
    /// Any member may showcase the team.
    pub any_member_showcase: bool,
    /// The current user showcases the team.
    pub member_showcase: bool,
    /// The team itself is showcased.
    pub team_showcase: bool,
}

/// One user or system intent against team state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TeamIntent {
    /// Create a new team.
    CreateNewTeam {
        /// Fully-qualified name for the new team.
        name: Teamname,
    },

    /// Create a team from an existing conversation's participants.
    CreateNewTeamFromConversation {
        /// The conversation to lift into a team.
        conversation: ConversationId,
        /// Fully-qualified name for the new team.
        name: Teamname,
    },

    /// Redeem an invite token or request access to a named team.
    JoinTeam {
        /// Invite token, or a team name to request access to.
        token_or_name: String,
    },

    /// Leave a team.
    LeaveTeam {
        /// The team to leave.
        name: Teamname,
    },

    /// Refresh the team list.
    GetTeams,

    /// Refresh one team's full details.
    GetDetails {
        /// The team to refresh.
        name: Teamname,
    },

    /// Refresh one team's channel list.
    GetChannels {
        /// The team to refresh.
        name: Teamname,
    },

    /// Add one member by username or email.
    AddToTeam {
        /// Target team.
        name: Teamname,
        /// Username or email to add.
        user: String,
        /// Role to grant.
        role: TeamRole,
        /// Announce the addition in team chat.
        notify_chat: bool,
    },

    /// Add a batch of members at one role.
    AddPeopleToTeam {
        /// Target team.
        name: Teamname,
        /// Usernames to add.
        users: Vec<String>,
        /// Role to grant each.
        role: TeamRole,
        /// Announce the additions in team chat.
        notify_chat: bool,
    },

    /// Invite a batch of email addresses at one role.
    InviteByEmail {
        /// Target team.
        name: Teamname,
        /// Email addresses to invite.
        invitees: Vec<String>,
        /// Role each invitee will join as.
        role: TeamRole,
    },

    /// Change an existing member's role.
    EditMembership {
        /// Target team.
        name: Teamname,
        /// Member to change.
        username: String,
        /// New role.
        role: TeamRole,
    },

    /// Change the team's public description.
    EditDescription {
        /// Target team.
        name: Teamname,
        /// New description.
        description: String,
    },

    /// Remove a member or cancel a pending invite.
    ///
    /// Exactly one identity must be supplied; more than one is a caller
    /// contract violation.
    RemoveMemberOrPendingInvite {
        /// Target team.
        name: Teamname,
        /// Member username to remove.
        username: Option<String>,
        /// Email invite to cancel.
        email: Option<String>,
        /// Invite id to cancel.
        invite_id: Option<String>,
    },

    /// Mint a single-use token and hand off to the SMS composer.
    InviteToTeamByPhone {
        /// Target team.
        name: Teamname,
        /// Role the invitee will join as.
        role: TeamRole,
        /// Recipient phone number.
        phone_number: String,
        /// Recipient full name for the token label, possibly empty.
        full_name: String,
    },

    /// Ignore a pending join request.
    IgnoreRequest {
        /// Target team.
        name: Teamname,
        /// Requester to ignore.
        username: String,
    },

    /// Refresh the set of teams the user has requested access to.
    CheckRequestedAccess,

    /// Join or leave one channel based on cached membership.
    ToggleChannelMembership {
        /// Owning team.
        name: Teamname,
        /// Channel to toggle.
        channelname: String,
    },

    /// Apply a channel-membership form: join wanted channels, leave
    /// unwanted ones.
    SaveChannelMembership {
        /// Owning team.
        name: Teamname,
        /// Desired membership per channel name.
        channel_state: BTreeMap<String, bool>,
    },

    /// Create a channel, optionally with a description.
    CreateChannel {
        /// Owning team.
        name: Teamname,
        /// New channel name.
        channelname: String,
        /// Initial headline; empty for none.
        description: String,
    },

    /// Delete a channel.
    DeleteChannel {
        /// The channel's conversation.
        conversation: ConversationId,
    },

    /// Update a channel's topic. TakeLatest per conversation.
    UpdateTopic {
        /// The channel's conversation.
        conversation: ConversationId,
        /// New topic text.
        new_topic: String,
    },

    /// Rename a channel. TakeLatest per conversation.
    UpdateChannelName {
        /// The channel's conversation.
        conversation: ConversationId,
        /// New channel name.
        new_channel_name: String,
    },

    /// Set a team open or closed with a default join role.
    ChangeOpenTeamSetting {
        /// Target team.
        name: Teamname,
        /// Whether the team becomes open.
        convert_to_open: bool,
        /// Role granted to open joiners.
        default_role: TeamRole,
    },

    /// Apply the publicity settings form, eliding unchanged fields.
    SetPublicity {
        /// Target team.
        name: Teamname,
        /// Desired configuration.
        settings: DesiredPublicity,
    },

    /// Digest a new-teams/new-requests badge push.
    BadgeAppForTeams {
        /// Teams the user was newly added to.
        new_team_names: Vec<Teamname>,
        /// Teams with new access requests.
        new_team_access_requests: Vec<Teamname>,
    },
}

impl TeamIntent {
    /// Dispatch discipline for this intent.
    pub fn discipline(&self) -> Discipline {
        match self {
            Self::UpdateTopic { .. } | Self::UpdateChannelName { .. } => Discipline::TakeLatest,
            _ => Discipline::RunAll,
        }
    }

    /// Key that groups TakeLatest occurrences of this intent. `None` for
    /// RunAll intents.
    pub fn latest_key(&self) -> Option<WaitingKey> {
        match self {
            Self::UpdateTopic { conversation, .. } => {
                Some(WaitingKey::update_topic(conversation))
            },
            Self::UpdateChannelName { conversation, .. } => {
                Some(WaitingKey::update_channel_name(conversation))
            },
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_conversation_edits_take_latest() {
        let topic = TeamIntent::UpdateTopic {
            conversation: ConversationId::from("c1"),
            new_topic: "t".into(),
        };
        let rename = TeamIntent::UpdateChannelName {
            conversation: ConversationId::from("c1"),
            new_channel_name: "n".into(),
        };
        let fetch = TeamIntent::GetTeams;

        assert_eq!(topic.discipline(), Discipline::TakeLatest);
        assert_eq!(rename.discipline(), Discipline::TakeLatest);
        assert_eq!(fetch.discipline(), Discipline::RunAll);
        assert!(topic.latest_key().is_some());
        assert!(fetch.latest_key().is_none());
    }

    #[test]
    fn latest_keys_are_conversation_scoped() {
        let first = TeamIntent::UpdateTopic {
            conversation: ConversationId::from("c1"),
            new_topic: "t".into(),
        };
        let second = TeamIntent::UpdateTopic {
            conversation: ConversationId::from("c2"),
            new_topic: "t".into(),
        };
        assert_ne!(first.latest_key(), second.latest_key());
    }
}
