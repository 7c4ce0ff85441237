//! Normalized cache of team state.
//!
//! The [`TeamStore`] is the sole owner of cached entity state. Every mutator
//! replaces the whole value at its key and leaves sibling keys untouched;
//! last write wins per leaf. There is no merge arbitration between two
//! in-flight fetches of the same team: the most recently completed details
//! refresh is authoritative. Handlers re-fetch after every mutation, so a
//! stale overwrite is corrected by the next refresh.
//!
//! The store is plain data. Callers that share it across tasks wrap it in a
//! lock and keep critical sections free of await points.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::types::{
    ChannelInfo, ConversationId, InviteInfo, MemberInfo, PublicitySettings, RequestInfo,
    TeamJoinSettings, TeamRole, Teamname,
};

/// Normalized, in-memory cache of team state keyed by team name and
/// conversation id.
#[derive(Debug, Default)]
pub struct TeamStore {
    // Aggregate team-list state.
    teamnames: BTreeSet<Teamname>,
    member_counts: HashMap<Teamname, u32>,
    roles: HashMap<Teamname, TeamRole>,
    loaded: bool,

    // Per-team entity state, replaced wholesale on refresh.
    members: HashMap<Teamname, BTreeMap<String, MemberInfo>>,
    implicit_admins: HashMap<Teamname, BTreeSet<String>>,
    requests: HashMap<Teamname, BTreeSet<RequestInfo>>,
    invites: HashMap<Teamname, BTreeSet<InviteInfo>>,
    settings: HashMap<Teamname, TeamJoinSettings>,
    publicity: HashMap<Teamname, PublicitySettings>,

    // Channel state: a team owns a set of conversation ids; metadata is
    // keyed by conversation id.
    conv_ids: HashMap<Teamname, BTreeSet<ConversationId>>,
    channels: HashMap<ConversationId, ChannelInfo>,

    // Loading flags (boolean view; the counter view lives in WaitingTracker).
    loading: HashMap<Teamname, bool>,
    loading_invites: HashMap<Teamname, HashMap<String, bool>>,

    // Badge baselines and transient UI-signal state. Overwritten, never
    // merged.
    new_teams: BTreeSet<Teamname>,
    new_team_requests: Vec<Teamname>,
    access_requests_pending: BTreeSet<Teamname>,
    team_creation_error: String,
    team_creation_pending: bool,
    team_join_error: String,
    team_join_success: bool,
    team_join_success_team: Option<Teamname>,
    channel_creation_error: String,
}

impl TeamStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    // --- team list ---

    /// Replace the aggregate team list (names, member counts, roles).
    pub fn replace_team_list(
        &mut self,
        names: BTreeSet<Teamname>,
        member_counts: HashMap<Teamname, u32>,
        roles: HashMap<Teamname, TeamRole>,
    ) {
        self.teamnames = names;
        self.member_counts = member_counts;
        self.roles = roles;
    }

    /// Names of all known teams.
    pub fn teamnames(&self) -> &BTreeSet<Teamname> {
        &self.teamnames
    }

    /// Member count for a team, if listed.
    pub fn member_count(&self, team: &Teamname) -> Option<u32> {
        self.member_counts.get(team).copied()
    }

    /// The current user's role in a team, if listed.
    pub fn role_for(&self, team: &Teamname) -> Option<TeamRole> {
        self.roles.get(team).copied()
    }

    /// Whether the team list has completed at least one load cycle.
    pub fn loaded(&self) -> bool {
        self.loaded
    }

    /// Set the team-list loaded flag.
    pub fn set_loaded(&mut self, loaded: bool) {
        self.loaded = loaded;
    }

    // --- per-team entities ---

    /// Replace a team's member map (keyed by username).
    pub fn set_members(&mut self, team: Teamname, members: BTreeMap<String, MemberInfo>) {
        self.members.insert(team, members);
    }

    /// A team's members, if details have been fetched.
    pub fn members(&self, team: &Teamname) -> Option<&BTreeMap<String, MemberInfo>> {
        self.members.get(team)
    }

    /// Replace a team's implicit-admin username set.
    pub fn set_implicit_admins(&mut self, team: Teamname, admins: BTreeSet<String>) {
        self.implicit_admins.insert(team, admins);
    }

    /// A team's implicit admins.
    pub fn implicit_admins(&self, team: &Teamname) -> Option<&BTreeSet<String>> {
        self.implicit_admins.get(team)
    }

    /// Replace a team's pending join-request set.
    pub fn set_requests(&mut self, team: Teamname, requests: BTreeSet<RequestInfo>) {
        self.requests.insert(team, requests);
    }

    /// A team's pending join requests.
    pub fn requests(&self, team: &Teamname) -> Option<&BTreeSet<RequestInfo>> {
        self.requests.get(team)
    }

    /// Replace a team's pending invite set.
    pub fn set_invites(&mut self, team: Teamname, invites: BTreeSet<InviteInfo>) {
        self.invites.insert(team, invites);
    }

    /// A team's pending invites.
    pub fn invites(&self, team: &Teamname) -> Option<&BTreeSet<InviteInfo>> {
        self.invites.get(team)
    }

    /// Replace a team's join settings.
    pub fn set_team_settings(&mut self, team: Teamname, settings: TeamJoinSettings) {
        self.settings.insert(team, settings);
    }

    /// A team's join settings, defaulting to closed/reader when never
    /// fetched.
    pub fn team_settings(&self, team: &Teamname) -> TeamJoinSettings {
        self.settings.get(team).copied().unwrap_or_default()
    }

    /// Replace a team's publicity settings.
    pub fn set_publicity(&mut self, team: Teamname, publicity: PublicitySettings) {
        self.publicity.insert(team, publicity);
    }

    /// A team's publicity settings, defaulting to all-off when never
    /// fetched.
    pub fn publicity(&self, team: &Teamname) -> PublicitySettings {
        self.publicity.get(team).cloned().unwrap_or_default()
    }

    // --- channels ---

    /// Replace a team's channel set wholesale.
    ///
    /// Metadata for conversation ids the team no longer owns is pruned, so
    /// stale channels do not remain visible after a refresh.
    pub fn set_team_channels(
        &mut self,
        team: Teamname,
        channels: Vec<(ConversationId, ChannelInfo)>,
    ) {
        let ids: BTreeSet<ConversationId> = channels.iter().map(|(id, _)| id.clone()).collect();
        if let Some(previous) = self.conv_ids.get(&team) {
            for stale in previous.difference(&ids) {
                self.channels.remove(stale);
            }
        }
        for (id, info) in channels {
            self.channels.insert(id, info);
        }
        self.conv_ids.insert(team, ids);
    }

    /// Conversation ids owned by a team.
    pub fn conv_ids(&self, team: &Teamname) -> impl Iterator<Item = &ConversationId> {
        self.conv_ids.get(team).into_iter().flatten()
    }

    /// Cached metadata for a conversation.
    pub fn channel_info(&self, conversation: &ConversationId) -> Option<&ChannelInfo> {
        self.channels.get(conversation)
    }

    /// Channel name for a conversation, if cached.
    pub fn channelname(&self, conversation: &ConversationId) -> Option<&str> {
        self.channels.get(conversation).map(|info| info.channelname.as_str())
    }

    /// Resolve a channel name to a conversation id within one team.
    ///
    /// Channel names are only unique within a team; the lookup is scoped to
    /// the team's own conversation set.
    pub fn conversation_for_channel(
        &self,
        team: &Teamname,
        channelname: &str,
    ) -> Option<ConversationId> {
        self.conv_ids(team)
            .find(|&id| self.channelname(id) == Some(channelname))
            .cloned()
    }

    /// The team that owns a conversation, if any team's set contains it.
    pub fn team_for_conversation(&self, conversation: &ConversationId) -> Option<Teamname> {
        self.conv_ids
            .iter()
            .find(|(_, ids)| ids.contains(conversation))
            .map(|(team, _)| team.clone())
    }

    /// Cached participant usernames of a conversation.
    pub fn participants(&self, conversation: &ConversationId) -> Option<&BTreeSet<String>> {
        self.channels.get(conversation).map(|info| &info.participants)
    }

    // --- loading flags ---

    /// Set the boolean details-loading flag for a team.
    pub fn set_team_loading(&mut self, team: &Teamname, loading: bool) {
        self.loading.insert(team.clone(), loading);
    }

    /// Whether a team's details are loading.
    pub fn is_team_loading(&self, team: &Teamname) -> bool {
        self.loading.get(team).copied().unwrap_or(false)
    }

    /// Set the per-invitee loading flag for a team (keyed by the invitee
    /// batch or identity string).
    pub fn set_invite_loading(&mut self, team: &Teamname, key: &str, loading: bool) {
        self.loading_invites
            .entry(team.clone())
            .or_default()
            .insert(key.to_owned(), loading);
    }

    /// Whether an invite operation is loading for a team.
    pub fn invite_loading(&self, team: &Teamname, key: &str) -> bool {
        self.loading_invites
            .get(team)
            .and_then(|flags| flags.get(key))
            .copied()
            .unwrap_or(false)
    }

    // --- badge baselines ---

    /// Replace the new-team badge baseline.
    pub fn set_new_teams(&mut self, teams: BTreeSet<Teamname>) {
        self.new_teams = teams;
    }

    /// The new-team badge baseline.
    pub fn new_teams(&self) -> &BTreeSet<Teamname> {
        &self.new_teams
    }

    /// Replace the new-request badge baseline.
    pub fn set_new_team_requests(&mut self, teams: Vec<Teamname>) {
        self.new_team_requests = teams;
    }

    /// The new-request badge baseline.
    pub fn new_team_requests(&self) -> &[Teamname] {
        &self.new_team_requests
    }

    /// Replace the set of teams the user has requested access to.
    pub fn set_access_requests_pending(&mut self, teams: BTreeSet<Teamname>) {
        self.access_requests_pending = teams;
    }

    /// Teams the user has requested access to.
    pub fn access_requests_pending(&self) -> &BTreeSet<Teamname> {
        &self.access_requests_pending
    }

    // --- transient UI-signal state ---

    /// Record the last team-creation error ("" clears it).
    pub fn set_team_creation_error(&mut self, error: String) {
        self.team_creation_error = error;
    }

    /// Last team-creation error, empty when none.
    pub fn team_creation_error(&self) -> &str {
        &self.team_creation_error
    }

    /// Set the team-creation-in-progress flag.
    pub fn set_team_creation_pending(&mut self, pending: bool) {
        self.team_creation_pending = pending;
    }

    /// Whether a team creation is in progress.
    pub fn team_creation_pending(&self) -> bool {
        self.team_creation_pending
    }

    /// Record the last join error ("" clears it).
    pub fn set_team_join_error(&mut self, error: String) {
        self.team_join_error = error;
    }

    /// Last join error, empty when none.
    pub fn team_join_error(&self) -> &str {
        &self.team_join_error
    }

    /// Record join success, with the team name when the supplied token was
    /// a team name rather than an invite token.
    pub fn set_team_join_success(&mut self, success: bool, team: Option<Teamname>) {
        self.team_join_success = success;
        self.team_join_success_team = team;
    }

    /// Whether the last join attempt succeeded.
    pub fn team_join_success(&self) -> bool {
        self.team_join_success
    }

    /// The team joined by name on the last successful join attempt.
    pub fn team_join_success_team(&self) -> Option<&Teamname> {
        self.team_join_success_team.as_ref()
    }

    /// Record the last channel-creation error ("" clears it).
    pub fn set_channel_creation_error(&mut self, error: String) {
        self.channel_creation_error = error;
    }

    /// Last channel-creation error, empty when none.
    pub fn channel_creation_error(&self) -> &str {
        &self.channel_creation_error
    }
}
