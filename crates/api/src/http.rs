//! The low-level HTTP client the adapter runs on.

use std::{collections::HashMap, time::Duration};

use reqwest::{
    header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, CONTENT_TYPE},
    Response, StatusCode,
};
use serde::de::DeserializeOwned;
use tracing::trace;

use crate::error::ApiError;

pub(crate) const CONTENT_TYPE_JSON: &str = "application/json";
pub(crate) const CONTENT_TYPE_EVENT_STREAM: &str = "text/event-stream";

/// A reqwest wrapper that carries the upstream address, the configured extra
/// headers and the request timeout.
#[derive(Debug, Clone)]
pub struct HttpClient {
    base: String,
    client: reqwest::Client,
}

impl HttpClient {
    /// Build a client for the given upstream address.
    ///
    /// The extra headers are forwarded on every request.
    pub fn new(
        addr: &str,
        headers: &HashMap<String, String>,
        timeout: Duration,
    ) -> Result<HttpClient, ApiError> {
        let mut default_headers = HeaderMap::new();

        for (key, value) in headers {
            let name = HeaderName::from_bytes(key.as_bytes())
                .map_err(|err| ApiError::Config(format!("invalid header name {key}: {err}")))?;
            let value = HeaderValue::from_str(value)
                .map_err(|err| ApiError::Config(format!("invalid header value for {key}: {err}")))?;
            default_headers.insert(name, value);
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(default_headers)
            .build()?;

        Ok(HttpClient {
            base: addr.trim_end_matches('/').to_owned(),
            client,
        })
    }

    /// The upstream base address.
    pub fn base(&self) -> &str {
        &self.base
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    /// GET a JSON document.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        trace!(path, "GET json");

        let response = self
            .client
            .get(self.url(path))
            .header(ACCEPT, CONTENT_TYPE_JSON)
            .send()
            .await?;

        let response = check_status(response)?;
        check_content_type(&response, CONTENT_TYPE_JSON)?;

        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(ApiError::invalid_payload)
    }

    /// GET raw bytes under a caller-chosen `Accept` content type. An empty
    /// content type asks for JSON.
    pub async fn get_raw(&self, path: &str, content_type: &str) -> Result<Vec<u8>, ApiError> {
        let accept = if content_type.is_empty() {
            CONTENT_TYPE_JSON
        } else {
            content_type
        };

        trace!(path, accept, "GET raw");

        let response = self
            .client
            .get(self.url(path))
            .header(ACCEPT, accept)
            .send()
            .await?;

        let response = check_status(response)?;

        Ok(response.bytes().await?.to_vec())
    }

    /// Open a request for a server-sent-events stream. The caller consumes
    /// the body.
    pub(crate) async fn get_stream(&self, path: &str) -> Result<Response, ApiError> {
        trace!(path, "GET event stream");

        let response = self
            .client
            .get(self.url(path))
            .header(ACCEPT, CONTENT_TYPE_EVENT_STREAM)
            .send()
            .await?;

        check_status(response)
    }
}

pub(crate) fn check_status(response: Response) -> Result<Response, ApiError> {
    match response.status() {
        status if status.is_success() => Ok(response),
        StatusCode::NOT_FOUND => Err(ApiError::NotFound),
        StatusCode::SERVICE_UNAVAILABLE => Err(ApiError::Syncing),
        status => Err(ApiError::UnexpectedStatus(status.as_u16())),
    }
}

fn check_content_type(response: &Response, wanted: &str) -> Result<(), ApiError> {
    let Some(header) = response.headers().get(CONTENT_TYPE) else {
        return Ok(());
    };

    let got = header.to_str().unwrap_or_default();
    if got.contains(wanted) {
        Ok(())
    } else {
        Err(ApiError::UnexpectedContentType {
            wanted: wanted.to_owned(),
            got: got.to_owned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_address_is_normalized() {
        let client =
            HttpClient::new("http://localhost:5052/", &HashMap::new(), Duration::from_secs(1))
                .unwrap();
        assert_eq!(client.base(), "http://localhost:5052");
        assert_eq!(
            client.url("/eth/v1/node/version"),
            "http://localhost:5052/eth/v1/node/version"
        );
    }

    #[test]
    fn rejects_malformed_headers() {
        let mut headers = HashMap::new();
        headers.insert("bad header".to_owned(), "x".to_owned());

        let err = HttpClient::new("http://localhost:5052", &headers, Duration::from_secs(1))
            .unwrap_err();
        assert!(matches!(err, ApiError::Config(_)));
    }
}
