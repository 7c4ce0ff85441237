//! Service error type.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure reported by the remote team or chat service.
///
/// Carries the human-readable description the service attached to the
/// failure; handlers record it into intent-specific error fields or report
/// it through the global error sink rather than propagating it upward.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{desc}")]
pub struct ServiceError {
    /// Human-readable failure description from the service.
    pub desc: String,
}

impl ServiceError {
    /// Wrap a service-supplied failure description.
    pub fn new(desc: impl Into<String>) -> Self {
        Self { desc: desc.into() }
    }
}
