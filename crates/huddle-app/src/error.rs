//! Intent handler error type.

use huddle_client::ServiceError;
use thiserror::Error;

/// Failure of one intent handler invocation.
///
/// Remote failures that the UI displays inline (team creation, join,
/// channel creation) are recorded in store fields instead and never surface
/// here; this type covers failures the dispatcher reports to its caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntentError {
    /// A remote service call failed.
    #[error(transparent)]
    Service(#[from] ServiceError),

    /// The caller violated the handler's contract. Not recoverable by
    /// retry; indicates a bug at the call site.
    #[error("caller contract violation: {0}")]
    Contract(&'static str),
}
