//! Push notifications and badge state delivered by the engine.

use std::fmt;

use huddle_core::Teamname;
use serde::{Deserialize, Serialize};

/// Out-of-band team change notification pushed by the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TeamPushEvent {
    /// A named team changed server-side.
    ChangedByName {
        /// The team that changed.
        name: Teamname,
        /// Whether the team is implicit (conversation-backed); implicit
        /// teams are not shown in the teams UI and are not refreshed.
        implicit_team: bool,
    },
    /// A team changed, identified only by id. Carries nothing this layer
    /// can refresh by; the by-name notification covers the same change.
    ChangedById,
    /// A team was deleted.
    Deleted,
    /// The current user exited a team.
    MemberExit,
}

/// Badge payload announcing new teams and new access requests.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamBadgeState {
    /// Teams the user was newly added to.
    pub new_team_names: Vec<Teamname>,
    /// Teams with new access requests awaiting the user's review.
    pub new_team_access_requests: Vec<Teamname>,
}

/// Server-side notification badge categories this layer dismisses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BadgeCategory {
    /// Badge for teams the user was newly added to.
    NewlyAddedToTeam,
    /// Badge for pending access requests.
    RequestAccess,
}

impl BadgeCategory {
    /// The service-side category string.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NewlyAddedToTeam => "team.newly_added_to_team",
            Self::RequestAccess => "team.request_access",
        }
    }
}

impl fmt::Display for BadgeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
