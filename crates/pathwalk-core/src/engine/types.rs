//! Engine endpoints and client configuration.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Default engine base URL (a locally running GraphWalker REST service).
pub const DEFAULT_ENGINE_URL: &str = "http://localhost:8887/graphwalker";

/// Engine REST endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Load,
    Restart,
    GetStatistics,
    HasNext,
    GetNext,
}

impl Endpoint {
    pub fn path(self) -> &'static str {
        match self {
            Self::Load => "load",
            Self::Restart => "restart",
            Self::GetStatistics => "getStatistics",
            Self::HasNext => "hasNext",
            Self::GetNext => "getNext",
        }
    }

    pub fn method(self) -> reqwest::Method {
        match self {
            Self::Load => reqwest::Method::POST,
            Self::Restart => reqwest::Method::PUT,
            Self::GetStatistics | Self::HasNext | Self::GetNext => reqwest::Method::GET,
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} /{}", self.method(), self.path())
    }
}

/// Engine client configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Base URL of the engine REST API.
    #[serde(default = "default_engine_url")]
    pub url: String,

    /// Per-request timeout in seconds. Unset means calls wait indefinitely.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

fn default_engine_url() -> String {
    DEFAULT_ENGINE_URL.to_string()
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            url: default_engine_url(),
            timeout_secs: None,
        }
    }
}

impl EngineConfig {
    /// Create config from environment variables.
    ///
    /// | Variable | Description |
    /// |----------|-------------|
    /// | `PATHWALK_ENGINE_URL` | Engine base URL |
    /// | `PATHWALK_ENGINE_TIMEOUT` | Request timeout in seconds |
    pub fn from_env() -> Self {
        Self {
            url: std::env::var("PATHWALK_ENGINE_URL").unwrap_or_else(|_| default_engine_url()),
            timeout_secs: std::env::var("PATHWALK_ENGINE_TIMEOUT")
                .ok()
                .and_then(|v| v.parse().ok()),
        }
    }

    /// Set the base URL.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }
}
