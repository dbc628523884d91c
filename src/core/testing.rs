//! Scripted upstream used by unit tests

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::core::upstream::{Upstream, UpstreamError};

#[derive(Debug, Clone)]
enum Reply {
    Json(Value),
    Status(u16),
    Unreachable,
}

/// Upstream double answering from a fixed URL table and counting calls
///
/// Unscripted URLs answer 404.
#[derive(Default)]
pub struct ScriptedUpstream {
    replies: HashMap<String, Reply>,
    calls: Mutex<HashMap<String, usize>>,
}

impl ScriptedUpstream {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_json(mut self, url: &str, body: Value) -> Self {
        self.replies.insert(url.to_string(), Reply::Json(body));
        self
    }

    /// Shorthand for a resource whose display name is `name`
    pub fn with_name(self, url: &str, name: &str) -> Self {
        self.with_json(url, json!({ "name": name }))
    }

    pub fn with_status(mut self, url: &str, status: u16) -> Self {
        self.replies.insert(url.to_string(), Reply::Status(status));
        self
    }

    pub fn with_unreachable(mut self, url: &str) -> Self {
        self.replies.insert(url.to_string(), Reply::Unreachable);
        self
    }

    /// Number of fetches issued for `url`
    pub fn calls(&self, url: &str) -> usize {
        self.calls.lock().unwrap().get(url).copied().unwrap_or(0)
    }

    /// Number of fetches issued across all URLs
    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().values().sum()
    }
}

#[async_trait]
impl Upstream for ScriptedUpstream {
    async fn fetch_json(&self, url: &str) -> Result<Value, UpstreamError> {
        *self.calls.lock().unwrap().entry(url.to_string()).or_default() += 1;

        match self.replies.get(url) {
            Some(Reply::Json(body)) => Ok(body.clone()),
            Some(Reply::Status(status)) => Err(UpstreamError::Rejected {
                url: url.to_string(),
                status: *status,
            }),
            Some(Reply::Unreachable) => Err(UpstreamError::Unreachable {
                url: url.to_string(),
                message: "network down".to_string(),
            }),
            None => Err(UpstreamError::Rejected {
                url: url.to_string(),
                status: 404,
            }),
        }
    }
}
