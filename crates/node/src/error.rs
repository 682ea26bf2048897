//! Node-level errors.

use vigil_api::ApiError;

/// Errors surfaced by the node façade.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An upstream call failed.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// A cached getter was read before its slot was populated.
    #[error("{0} not available")]
    Unavailable(&'static str),

    /// The operation was cut short by lifecycle cancellation.
    #[error("cancelled")]
    Cancelled,

    /// The node could not be bootstrapped against the upstream.
    #[error("bootstrap failed: {0}")]
    Bootstrap(String),
}

impl Error {
    /// Whether this is the 404-derived absence marker.
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Error::Api(ApiError::NotFound))
    }
}
