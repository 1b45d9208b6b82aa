//! Shared request plumbing: client construction and status mapping.

use std::time::Duration;

use bookvisit_core::error::UpstreamError;

/// Connection settings for one upstream service.
#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    /// Base URL without trailing slash, e.g. `http://localhost:8081`.
    pub base_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl UpstreamConfig {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout,
        }
    }

    /// Build a [`reqwest::Client`] honouring the configured timeout.
    pub fn build_client(&self) -> Result<reqwest::Client, UpstreamError> {
        reqwest::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| UpstreamError::Transport(e.to_string()))
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

pub(crate) fn transport_error(err: reqwest::Error) -> UpstreamError {
    if err.is_decode() {
        UpstreamError::Decode(err.to_string())
    } else {
        UpstreamError::Transport(err.to_string())
    }
}

/// Ensure the response has a success status. A 404 becomes
/// [`UpstreamError::NotFound`] for `resource`/`id`; any other failure keeps
/// its status and body.
pub(crate) async fn ensure_success(
    response: reqwest::Response,
    resource: &'static str,
    id: &str,
) -> Result<reqwest::Response, UpstreamError> {
    let status = response.status();
    if status == reqwest::StatusCode::NOT_FOUND {
        return Err(UpstreamError::NotFound {
            resource,
            id: id.to_string(),
        });
    }
    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<unreadable body>".to_string());
        tracing::warn!(status = status.as_u16(), resource, id, "Upstream request failed");
        return Err(UpstreamError::Status {
            status: status.as_u16(),
            body,
        });
    }
    Ok(response)
}

/// Parse a successful JSON response body into the expected type.
pub(crate) async fn parse_response<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
    resource: &'static str,
    id: &str,
) -> Result<T, UpstreamError> {
    let response = ensure_success(response, resource, id).await?;
    response.json::<T>().await.map_err(transport_error)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_trimmed() {
        let config = UpstreamConfig::new("http://localhost:8081/", Duration::from_secs(5));
        assert_eq!(config.url("/api/bookings"), "http://localhost:8081/api/bookings");
    }
}
