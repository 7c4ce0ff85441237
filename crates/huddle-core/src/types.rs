//! Entity records for the team view model.
//!
//! These structures are the subset of remote team state the UI needs to
//! render membership, invitations, requests, and channels. They carry no
//! behavior beyond small lookups; all mutation goes through
//! [`crate::TeamStore`].

use std::{collections::BTreeSet, fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fully-qualified team name.
///
/// A `.` in the name denotes subteam nesting: `acme.design` is a subteam
/// of `acme`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Teamname(String);

impl Teamname {
    /// Create a team name from its dotted string form.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The dotted string form.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this name denotes a subteam (contains a `.`).
    pub fn is_subteam(&self) -> bool {
        self.0.contains('.')
    }
}

impl fmt::Display for Teamname {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Teamname {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for Teamname {
    fn from(name: String) -> Self {
        Self(name)
    }
}

/// Opaque conversation identifier assigned by the chat service.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ConversationId(String);

impl ConversationId {
    /// Wrap a service-issued conversation id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The raw id string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConversationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ConversationId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Role a user holds within a team.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TeamRole {
    /// Full control, including team deletion.
    Owner,
    /// Membership and settings management.
    Admin,
    /// Can post in team channels.
    Writer,
    /// Read-only membership.
    Reader,
}

impl TeamRole {
    /// Lowercase wire/display name of the role.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Owner => "owner",
            Self::Admin => "admin",
            Self::Writer => "writer",
            Self::Reader => "reader",
        }
    }
}

impl fmt::Display for TeamRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error parsing a role name off the wire.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown team role: {0}")]
pub struct ParseRoleError(pub String);

impl FromStr for TeamRole {
    type Err = ParseRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "owner" => Ok(Self::Owner),
            "admin" => Ok(Self::Admin),
            "writer" => Ok(Self::Writer),
            "reader" => Ok(Self::Reader),
            other => Err(ParseRoleError(other.to_owned())),
        }
    }
}

/// One member of a team, as of the last details refresh.
///
/// Uniqueness is per username per team; the store keys members by username
/// and replaces the whole member map on every refresh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberInfo {
    /// The member's username.
    pub username: String,
    /// Role the member holds.
    pub role: TeamRole,
    /// Whether the member's account is active (not reset or deleted).
    pub active: bool,
}

/// The addressee of a pending invite, by invite category.
///
/// Exactly one form applies to any given invite.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum InviteAddress {
    /// Invitation sent to an email address.
    Email(String),
    /// Single-use token invite; carries the label the token was minted with.
    Seitan(String),
    /// Social-proof invite pending on a third-party identity
    /// (`username@service`).
    Sbs(String),
}

/// A not-yet-accepted invitation to a team.
///
/// Removed when accepted or cancelled server-side and the team is refreshed.
/// Ordering is by id first, so invite sets sort stably.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct InviteInfo {
    /// Service-assigned invite id.
    pub id: String,
    /// Role the invitee will join as.
    pub role: TeamRole,
    /// Who the invite is addressed to.
    pub address: InviteAddress,
}

/// A pending request to join an open team.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RequestInfo {
    /// Username of the requester.
    pub username: String,
}

impl RequestInfo {
    /// Request record for the given username.
    pub fn new(username: impl Into<String>) -> Self {
        Self { username: username.into() }
    }
}

/// Cached metadata for one team channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelInfo {
    /// Human channel name (not unique across teams).
    pub channelname: String,
    /// Channel headline/description.
    pub description: String,
    /// Usernames currently in the channel.
    pub participants: BTreeSet<String>,
}

/// A team's open/closed setting and the role granted on open join.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamJoinSettings {
    /// Whether anyone may join without an invite.
    pub open: bool,
    /// Role granted to open joiners. The remote service's "none" is never
    /// stored; it is filled in as [`TeamRole::Reader`] on refresh.
    pub join_as: TeamRole,
}

impl Default for TeamJoinSettings {
    fn default() -> Self {
        Self { open: false, join_as: TeamRole::Reader }
    }
}

/// A team's publicity/showcase configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicitySettings {
    /// Any member may showcase the team.
    pub any_member_showcase: bool,
    /// Public team description.
    pub description: String,
    /// The current user showcases this team on their profile.
    pub member: bool,
    /// The team itself is showcased.
    pub team: bool,
}
