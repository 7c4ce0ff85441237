//! Team service call contract.
//!
//! One method per remote operation the coordination layer consumes, with
//! typed parameters and results. The transport behind this trait is
//! external; implementations decide how calls reach the service.

use async_trait::async_trait;
use huddle_core::{TeamJoinSettings, TeamRole, Teamname};
use serde::{Deserialize, Serialize};

use crate::error::ServiceError;

/// Result of a team-creation call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateTeamResult {
    /// Whether the service already added the creator as a member.
    pub creator_added: bool,
}

/// One member entry inside a role bucket of a details result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberRecord {
    /// The member's username.
    pub username: String,
    /// Whether the member's account is active.
    pub active: bool,
}

/// Team membership grouped into the four role buckets the service returns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MembersByRole {
    /// Members with the owner role.
    pub owners: Vec<MemberRecord>,
    /// Members with the admin role.
    pub admins: Vec<MemberRecord>,
    /// Members with the writer role.
    pub writers: Vec<MemberRecord>,
    /// Members with the reader role.
    pub readers: Vec<MemberRecord>,
}

/// Join settings as the service reports them.
///
/// `join_as` is `None` when the service reports its "none" role; the
/// coordination layer fills that in as reader before storing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireTeamSettings {
    /// Whether anyone may join without an invite.
    pub open: bool,
    /// Role granted on open join, if the service has one configured.
    pub join_as: Option<TeamRole>,
}

/// Category of a pending invite, determining how its name field reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum InviteCategory {
    /// Email invitation; the name field is the address.
    Email,
    /// Single-use token invitation; the name field is the token label.
    Seitan,
    /// Social-proof invitation; the name field is the username on the
    /// named third-party service.
    Sbs {
        /// The third-party service the identity lives on.
        service: String,
    },
}

/// A pending invite as annotated by the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotatedInvite {
    /// Service-assigned invite id.
    pub id: String,
    /// Role the invitee will join as.
    pub role: TeamRole,
    /// Category-dependent addressee name.
    pub name: String,
    /// Invite category.
    pub category: InviteCategory,
}

/// Full details result for one team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamDetails {
    /// Membership grouped by role.
    pub members: MembersByRole,
    /// Join settings.
    pub settings: WireTeamSettings,
    /// Pending invites.
    pub annotated_active_invites: Vec<AnnotatedInvite>,
}

/// An implicit admin of a subteam (admin via an ancestor team).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImplicitAdmin {
    /// The admin's username.
    pub username: String,
}

/// A pending request to join an open team, as listed across all teams.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinRequest {
    /// The team the request targets.
    pub team_name: Teamname,
    /// Username of the requester.
    pub username: String,
}

/// Result of accepting an invite token or requesting access by team name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinAcceptance {
    /// Whether the supplied token was a team name (an access request was
    /// filed) rather than an invite token.
    pub was_team_name: bool,
}

/// Team-level showcase state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamShowcase {
    /// Any member may showcase the team.
    pub any_member_showcase: bool,
    /// Public team description.
    pub description: String,
    /// The team is showcased.
    pub is_showcased: bool,
}

/// Combined team and per-member showcase state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamAndMemberShowcase {
    /// Team-level showcase state.
    pub team_showcase: TeamShowcase,
    /// Whether the current user showcases this team.
    pub is_member_showcased: bool,
}

/// Partial showcase update; unset fields are left unchanged by the service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShowcaseUpdate {
    /// New public description.
    pub description: Option<String>,
    /// New any-member-showcase flag.
    pub any_member_showcase: Option<bool>,
    /// New team-showcased flag.
    pub is_showcased: Option<bool>,
}

/// The single identity a removal call targets.
///
/// Constructed by the coordination layer after validating that the caller
/// supplied exactly one identity form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemovalTarget {
    /// Remove a member by username.
    Username(String),
    /// Cancel a pending email invite.
    Email(String),
    /// Cancel a pending invite by its id.
    InviteId(String),
}

impl RemovalTarget {
    /// The identity string, whichever form it takes.
    pub fn value(&self) -> &str {
        match self {
            Self::Username(v) | Self::Email(v) | Self::InviteId(v) => v,
        }
    }
}

/// Label attached to a single-use invite token so the inviter can tell
/// tokens apart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeitanLabel {
    /// Recipient's full name, possibly empty.
    pub full_name: String,
    /// Recipient's phone number.
    pub phone_number: String,
}

/// One team in the current user's team list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotatedTeam {
    /// Fully-qualified team name.
    pub fq_name: Teamname,
    /// Number of members.
    pub member_count: u32,
    /// The current user's role.
    pub role: TeamRole,
}

/// One access request filed by the current user, as dotted name parts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessRequest {
    /// Team name components, joined with `.` to form the full name.
    pub parts: Vec<String>,
}

/// Remote team service operations.
///
/// Every method is one round trip; errors carry the service's description.
/// No method retries internally.
#[async_trait]
pub trait TeamService: Send + Sync {
    /// Create a team, optionally announcing it in chat.
    async fn create_team(
        &self,
        name: &Teamname,
        notify_chat: bool,
    ) -> Result<CreateTeamResult, ServiceError>;

    /// Add a member by username or email.
    async fn add_member(
        &self,
        team: &Teamname,
        user: &str,
        role: TeamRole,
        notify_chat: bool,
    ) -> Result<(), ServiceError>;

    /// Invite a batch of email addresses at one role.
    async fn add_emails_bulk(
        &self,
        team: &Teamname,
        emails: &[String],
        role: TeamRole,
    ) -> Result<(), ServiceError>;

    /// Change an existing member's role.
    async fn edit_member(
        &self,
        team: &Teamname,
        username: &str,
        role: TeamRole,
    ) -> Result<(), ServiceError>;

    /// Remove a member or cancel a pending invite.
    async fn remove_member(
        &self,
        team: &Teamname,
        target: RemovalTarget,
    ) -> Result<(), ServiceError>;

    /// Redeem an invite token, or file an access request when the token is
    /// a team name.
    async fn accept_invite_or_request_access(
        &self,
        token_or_name: &str,
    ) -> Result<JoinAcceptance, ServiceError>;

    /// Leave a team.
    async fn leave_team(&self, name: &Teamname, permanent: bool) -> Result<(), ServiceError>;

    /// Fetch full details for one team.
    async fn get_team_details(
        &self,
        name: &Teamname,
        force_repoll: bool,
    ) -> Result<TeamDetails, ServiceError>;

    /// List implicit admins of a team.
    async fn list_implicit_admins(
        &self,
        team: &Teamname,
    ) -> Result<Vec<ImplicitAdmin>, ServiceError>;

    /// List pending join requests across all of the user's teams.
    async fn list_join_requests(&self) -> Result<Vec<JoinRequest>, ServiceError>;

    /// Fetch a team's showcase state.
    async fn get_showcase(
        &self,
        team: &Teamname,
    ) -> Result<TeamAndMemberShowcase, ServiceError>;

    /// Apply a partial team-showcase update.
    async fn set_showcase(
        &self,
        team: &Teamname,
        update: ShowcaseUpdate,
    ) -> Result<(), ServiceError>;

    /// Set whether the current user showcases the team.
    async fn set_member_showcase(
        &self,
        team: &Teamname,
        is_showcased: bool,
    ) -> Result<(), ServiceError>;

    /// Set a team's open/closed join settings.
    async fn set_team_settings(
        &self,
        team: &Teamname,
        settings: TeamJoinSettings,
    ) -> Result<(), ServiceError>;

    /// Mint a single-use invite token at a role, labeled for the inviter.
    async fn create_seitan_token(
        &self,
        team: &Teamname,
        role: TeamRole,
        label: SeitanLabel,
    ) -> Result<String, ServiceError>;

    /// List the user's teams with member counts and roles.
    async fn list_teams(&self, user_assertion: &str)
    -> Result<Vec<AnnotatedTeam>, ServiceError>;

    /// List access requests the current user has filed.
    async fn list_my_access_requests(&self) -> Result<Vec<AccessRequest>, ServiceError>;

    /// Ignore a pending join request.
    async fn ignore_request(&self, team: &Teamname, username: &str)
    -> Result<(), ServiceError>;

    /// Dismiss a server-side notification badge category.
    async fn dismiss_notification_category(
        &self,
        category: crate::notify::BadgeCategory,
    ) -> Result<(), ServiceError>;
}
