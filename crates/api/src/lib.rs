//! The upstream client adapter: a typed HTTP + server-sent-events surface
//! over a beacon node's REST API.
//!
//! Each upstream capability is its own trait with a default implementation
//! that fails [`ApiError::Unsupported`]; [`BeaconApi`] implements the full
//! set against a real node. Consumers depend on the capability traits, not
//! the concrete client, so partial test doubles come for free.

mod client;
mod error;
mod http;
pub mod providers;
mod response;
mod sse;

pub use client::BeaconApi;
pub use error::ApiError;
pub use http::HttpClient;
pub use providers::UpstreamClient;
pub use response::{ApiResponse, VersionedResponse};
pub use sse::{SseDecoder, SseMessage};

/// The default per-request timeout. Beacon state downloads are large.
pub const DEFAULT_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(600);
