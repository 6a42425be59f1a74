use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors surfaced through [`SearchState::error`](crate::SearchState).
///
/// Failures are recorded into state for subscribers to render, never
/// retried and never raised to the caller.
#[derive(Debug, Error, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SearchError {
    /// The remote service rejected a dispatched request.
    #[error("search client error: {message}")]
    Client { message: String },

    /// The active client does not implement facet-value lookups.
    #[error("active search client does not support facet-value queries")]
    FacetValuesUnsupported,
}

impl SearchError {
    /// Wrap a remote-service failure message.
    pub fn client(message: impl Into<String>) -> Self {
        Self::Client {
            message: message.into(),
        }
    }
}
