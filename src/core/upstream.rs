//! Upstream REST client
//!
//! The [`Upstream`] trait is the only way the core talks to the network. The
//! production implementation is [`HttpUpstream`]; tests substitute scripted
//! implementations.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::core::config::Config;

/// Errors from a single upstream request
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("upstream returned HTTP {status} for {url}")]
    Rejected { url: String, status: u16 },

    #[error("unable to reach {url}: {message}")]
    Unreachable { url: String, message: String },

    #[error("malformed response from {url}: {message}")]
    Malformed { url: String, message: String },
}

/// A read-only JSON source addressed by absolute URL
#[async_trait]
pub trait Upstream: Send + Sync {
    /// Fetch and decode the JSON document at `url`
    async fn fetch_json(&self, url: &str) -> Result<Value, UpstreamError>;
}

#[async_trait]
impl<T: Upstream + ?Sized> Upstream for std::sync::Arc<T> {
    async fn fetch_json(&self, url: &str) -> Result<Value, UpstreamError> {
        (**self).fetch_json(url).await
    }
}

/// reqwest-backed upstream with a per-request timeout
pub struct HttpUpstream {
    http: reqwest::Client,
}

impl HttpUpstream {
    /// Build a client using the configured timeout
    pub fn new(config: &Config) -> Result<Self, UpstreamError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("swx/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| UpstreamError::Unreachable {
                url: config.base_url.clone(),
                message: e.to_string(),
            })?;
        Ok(Self { http })
    }
}

#[async_trait]
impl Upstream for HttpUpstream {
    async fn fetch_json(&self, url: &str) -> Result<Value, UpstreamError> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| UpstreamError::Unreachable {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::Rejected {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.json::<Value>().await.map_err(|e| {
            // A body that times out mid-stream is a transport failure, not a bad document
            if e.is_timeout() {
                UpstreamError::Unreachable {
                    url: url.to_string(),
                    message: e.to_string(),
                }
            } else {
                UpstreamError::Malformed {
                    url: url.to_string(),
                    message: e.to_string(),
                }
            }
        })
    }
}
