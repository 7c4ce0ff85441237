//! Team-state synchronization and action sequencing for Huddle.
//!
//! This crate turns UI-triggered intents into ordered remote calls against
//! the team and chat services, reconciles the results into the normalized
//! [`huddle_core::TeamStore`], and re-synchronizes that cache when the
//! service pushes out-of-band change notifications.
//!
//! # Components
//!
//! - [`TeamIntent`]: closed sum type of every intent, with typed payloads
//! - [`Coordinator`]: session-scoped owner of the store, busy-tracking, and
//!   every intent handler; [`Coordinator::dispatch`] is the single router
//! - [`Navigator`], [`SmsComposer`], [`ErrorSink`], [`ConversationDirectory`]:
//!   the narrow seams to the rest of the application
//! - [`generate_sms_body`]: deterministic invite text for the SMS handoff
//!
//! # Synchronization discipline
//!
//! Handlers never trust optimistic local mutation for membership or invite
//! lists: every mutation is followed by a refresh from the source of truth.
//! Overlapping refreshes of the same team converge by last-completion-wins;
//! there is no per-team fetch sequencing.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod channels;
mod coordinator;
mod dispatch;
mod effects;
mod error;
mod intent;
mod publicity;
mod reconcile;
mod sms;
mod teams;

pub use coordinator::{Coordinator, Effects, Services, Session};
pub use effects::{
    ComposeError, ConversationDirectory, Dialog, ErrorSink, Navigator, SmsComposer, Tab,
};
pub use error::IntentError;
pub use intent::{DesiredPublicity, Discipline, TeamIntent};
pub use sms::generate_sms_body;
