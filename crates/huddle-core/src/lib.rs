//! Core view model for Huddle team state.
//!
//! Pure data structures and bookkeeping for the client-side team cache,
//! shared by the coordination layer and any frontend that renders it.
//!
//! # Components
//!
//! - [`TeamStore`]: normalized, whole-value-replacement cache of team state
//! - [`WaitingTracker`]: refcounted busy-tracking with RAII release
//! - Entity records: [`MemberInfo`], [`InviteInfo`], [`RequestInfo`],
//!   [`ChannelInfo`] and the settings/publicity structs
//!
//! No I/O lives here. The store is plain data; callers decide how it is
//! shared (the coordination layer wraps it in a lock).

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod store;
mod types;
mod waiting;

pub use store::TeamStore;
pub use types::{
    ChannelInfo, ConversationId, InviteAddress, InviteInfo, MemberInfo, ParseRoleError,
    PublicitySettings, RequestInfo, TeamJoinSettings, TeamRole, Teamname,
};
pub use waiting::{WaitingGuard, WaitingKey, WaitingTracker};
