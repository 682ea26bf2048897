//! The upstream error taxonomy.

/// Errors surfaced by the upstream client adapter.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The upstream does not implement the requested capability.
    #[error("upstream does not support {0}")]
    Unsupported(&'static str),

    /// A network or I/O failure talking to the upstream.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The upstream answered 404.
    #[error("not found")]
    NotFound,

    /// The upstream answered 503; it is still syncing.
    #[error("upstream is syncing")]
    Syncing,

    /// A response body failed to decode.
    #[error("invalid payload: {0}")]
    InvalidPayload(String),

    /// An event arrived on a topic the dispatcher does not know.
    #[error("unknown event topic {0}")]
    UnknownTopic(String),

    /// The upstream answered a status the client has no mapping for.
    #[error("unexpected status code {0}")]
    UnexpectedStatus(u16),

    /// The upstream answered with a different content type than requested.
    #[error("unexpected content type: wanted {wanted}, got {got}")]
    UnexpectedContentType { wanted: String, got: String },

    /// The client could not be constructed from the given configuration.
    #[error("invalid client configuration: {0}")]
    Config(String),
}

impl ApiError {
    /// Whether this error is the 404 that block lookups translate to an
    /// absent result.
    pub const fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound)
    }

    pub(crate) fn invalid_payload(err: impl std::fmt::Display) -> ApiError {
        ApiError::InvalidPayload(err.to_string())
    }
}
