//! Seams to the rest of the application.
//!
//! The coordination core never renders, routes, or talks to platform APIs
//! directly; those capabilities are injected through the traits here. Each
//! trait is deliberately narrow so frontends and tests implement them in a
//! few lines.

use huddle_client::ServiceError;
use huddle_core::ConversationId;
use thiserror::Error;

/// Top-level surfaces this core navigates between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    /// The teams section.
    Teams,
    /// The chat section.
    Chat,
}

/// Modal flows this core dismisses on success.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialog {
    /// The create-team flow.
    CreateTeam,
    /// The create-channel flow.
    CreateChannel,
}

/// Opaque navigation effects.
pub trait Navigator: Send + Sync {
    /// Dismiss a modal flow, if it is on screen.
    fn dismiss(&self, dialog: Dialog);

    /// Switch to a top-level surface.
    fn navigate_to_tab(&self, tab: Tab);

    /// Change (or clear) the active conversation selection.
    fn select_conversation(&self, conversation: Option<&ConversationId>);
}

/// Failure to open the platform messaging composer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("sms compose failed: {0}")]
pub struct ComposeError(pub String);

/// Platform handoff to the native SMS composer.
pub trait SmsComposer: Send + Sync {
    /// Open the composer prefilled with recipients and body.
    ///
    /// Failure here never affects an already-created invite; callers log
    /// and move on.
    fn compose(&self, recipients: &[String], body: &str) -> Result<(), ComposeError>;
}

/// Sink for aggregated remote failures from fan-out batches.
pub trait ErrorSink: Send + Sync {
    /// Report every failure of one batch in a single call.
    fn report(&self, failures: &[ServiceError]);
}

/// Read access to chat conversation state owned elsewhere in the app.
pub trait ConversationDirectory: Send + Sync {
    /// Participants of an established conversation, if it exists.
    fn participants(&self, conversation: &ConversationId) -> Option<Vec<String>>;

    /// Participants of a not-yet-persisted pending conversation, if one is
    /// being composed under this id.
    fn pending_participants(&self, conversation: &ConversationId) -> Option<Vec<String>>;
}
