//! HTTP transport seam for the completion client.
//!
//! The client never touches `reqwest` directly; it hands a fully built JSON
//! POST to a [`HttpTransport`] and gets back status + raw body. Production
//! uses [`ReqwestTransport`]; tests inject scripted transports.

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Transport-level request data for one JSON POST.
#[derive(Debug, Clone)]
pub struct TransportRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: serde_json::Value,
}

/// Transport-level response data. Any status, success or not.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

impl TransportResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Network-level failure: no HTTP status was received.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("request failed: {0}")]
    Other(String),
}

#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn post_json(&self, request: TransportRequest)
        -> Result<TransportResponse, TransportError>;
}

/// `reqwest`-backed transport with a bounded wait per request.
pub struct ReqwestTransport {
    client: reqwest::Client,
    timeout: Duration,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::Other(e.to_string()))?;
        Ok(Self { client, timeout })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn post_json(
        &self,
        request: TransportRequest,
    ) -> Result<TransportResponse, TransportError> {
        let mut builder = self
            .client
            .post(&request.url)
            .header("content-type", "application/json");
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let response = builder.json(&request.body).send().await.map_err(|e| {
            if e.is_timeout() {
                TransportError::Timeout(self.timeout)
            } else if e.is_connect() {
                TransportError::Connect(e.without_url().to_string())
            } else {
                TransportError::Other(e.without_url().to_string())
            }
        })?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                TransportError::Timeout(self.timeout)
            } else {
                TransportError::Other(e.without_url().to_string())
            }
        })?;

        Ok(TransportResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_range_is_2xx() {
        let ok = TransportResponse {
            status: 204,
            body: String::new(),
        };
        let err = TransportResponse {
            status: 302,
            body: String::new(),
        };
        assert!(ok.is_success());
        assert!(!err.is_success());
    }

    #[test]
    fn builds_with_timeout() {
        assert!(ReqwestTransport::new(Duration::from_secs(5)).is_ok());
    }
}
