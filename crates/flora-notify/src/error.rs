//! Dispatcher error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DispatchError {
    /// The downstream service could not be reached.
    #[error("{service} unavailable: {reason}")]
    Unavailable { service: String, reason: String },

    /// The downstream service refused the request.
    #[error("{service} rejected request: {reason}")]
    Rejected { service: String, reason: String },
}
