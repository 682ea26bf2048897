//! Beacon API response envelopes.

use serde::Deserialize;

/// The `{"data": ..., "version": ...}` wrapper most endpoints use.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse<T> {
    pub data: T,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub execution_optimistic: Option<bool>,
    #[serde(default)]
    pub finalized: Option<bool>,
}

/// A payload paired with the fork version the upstream served it under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionedResponse<T> {
    pub version: Option<String>,
    pub data: T,
}

impl<T> From<ApiResponse<T>> for VersionedResponse<T> {
    fn from(response: ApiResponse<T>) -> Self {
        VersionedResponse {
            version: response.version,
            data: response.data,
        }
    }
}
