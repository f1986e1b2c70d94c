use std::time::Duration;

use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use hayah_core::HayahError;

/// Shared reqwest client construction. No timeout unless one is configured.
pub fn build_client(request_timeout_seconds: Option<u64>) -> Result<reqwest::Client, HayahError> {
    let mut builder = reqwest::Client::builder();
    if let Some(secs) = request_timeout_seconds {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    builder
        .build()
        .map_err(|e| HayahError::Config(format!("http client: {}", e)))
}

/// Parse a base URL so that relative joins append to its path
pub fn parse_base(base_url: &str) -> Result<Url, HayahError> {
    let normalized = if base_url.ends_with('/') {
        base_url.to_string()
    } else {
        format!("{}/", base_url)
    };
    Url::parse(&normalized).map_err(|e| HayahError::Config(format!("invalid base url {}: {}", base_url, e)))
}

pub fn join(base: &Url, path: &str) -> Result<Url, HayahError> {
    base.join(path.trim_start_matches('/'))
        .map_err(|e| HayahError::Config(format!("invalid path {}: {}", path, e)))
}

/// Send a request and decode a JSON success body, or turn the error
/// payload into `HayahError::Api`.
pub async fn send_json<T: DeserializeOwned>(request: reqwest::RequestBuilder) -> Result<T, HayahError> {
    let resp = request.send().await.map_err(|e| {
        warn!(error = %e, "request failed before a response");
        HayahError::Network(e.to_string())
    })?;

    let status = resp.status();
    let url = resp.url().clone();
    let body = resp
        .bytes()
        .await
        .map_err(|e| HayahError::Network(e.to_string()))?;

    if !status.is_success() {
        let message = error_message(&body).unwrap_or_else(|| format!("HTTP {}", status.as_u16()));
        warn!(url = %url, status = status.as_u16(), message = %message, "backend rejected request");
        return Err(HayahError::Api {
            status: status.as_u16(),
            message,
        });
    }

    debug!(url = %url, status = status.as_u16(), bytes = body.len(), "response received");

    // some endpoints answer 204 with no body
    if body.is_empty() {
        return serde_json::from_str("{}").map_err(|e| HayahError::Decode(e.to_string()));
    }

    serde_json::from_slice(&body).map_err(|e| HayahError::Decode(e.to_string()))
}

/// `message` or `error` from a JSON error payload
pub fn error_message(body: &[u8]) -> Option<String> {
    let value: serde_json::Value = serde_json::from_slice(body).ok()?;
    ["message", "error"]
        .iter()
        .filter_map(|key| value.get(*key))
        .find_map(|v| v.as_str().map(String::from))
        .filter(|s| !s.trim().is_empty())
}
