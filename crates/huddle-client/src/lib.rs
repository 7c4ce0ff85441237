//! Call contracts for the remote team and chat services.
//!
//! Huddle consumes its backend through two narrow async traits:
//! [`TeamService`] for identity/team operations and [`ChatService`] for
//! conversation operations. Production transports and in-memory test doubles
//! both implement these traits; nothing in this crate performs I/O itself.
//!
//! Push notifications delivered out-of-band by the engine are modeled as
//! [`TeamPushEvent`] and [`TeamBadgeState`] values that the caller feeds to
//! the coordination layer.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod chat;
mod error;
mod notify;
mod teams;

pub use chat::{ChatService, Conversation, TopicType};
pub use error::ServiceError;
pub use notify::{BadgeCategory, TeamBadgeState, TeamPushEvent};
pub use teams::{
    AccessRequest, AnnotatedInvite, AnnotatedTeam, CreateTeamResult, ImplicitAdmin,
    InviteCategory, JoinAcceptance, JoinRequest, MemberRecord, MembersByRole, RemovalTarget,
    SeitanLabel, ShowcaseUpdate, TeamAndMemberShowcase, TeamDetails, TeamService, TeamShowcase,
    WireTeamSettings,
};
