//! Traversal engine session client.
//!
//! Public API: typed calls, no status code or JSON knowledge. Transport lives
//! in http.rs, reply interpretation in helpers.rs.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use tracing::{debug, info};

use crate::error::{WalkError, WalkResult};

mod helpers;
mod http;
mod types;

use helpers::{coverage_field, element_name_field, ensure_ok, has_next_field, is_ok};
use http::HttpBackend;

pub use types::{Endpoint, EngineConfig, DEFAULT_ENGINE_URL};

const USER_AGENT_VALUE: &str = concat!("pathwalk/", env!("CARGO_PKG_VERSION"));

/// Step-request protocol the walk driver consumes.
#[async_trait]
pub trait TraversalSession: Send + Sync {
    /// Reset the traversal to its initial position.
    async fn restart(&self) -> WalkResult<()>;

    /// Edge coverage in percent (0-100).
    async fn coverage(&self) -> WalkResult<u8>;

    async fn has_next(&self) -> WalkResult<bool>;

    /// Name of the next element; advances the engine.
    async fn next_step(&self) -> WalkResult<String>;
}

/// HTTP client for the traversal engine REST API.
#[derive(Debug, Clone)]
pub struct TraversalClient {
    http: HttpBackend,
}

impl TraversalClient {
    pub fn new(config: EngineConfig) -> WalkResult<Self> {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));

        let mut builder = reqwest::Client::builder().default_headers(default_headers);
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build().map_err(|e| {
            WalkError::protocol(Endpoint::Load, format!("failed to create HTTP client: {e}"))
        })?;

        Ok(Self {
            http: HttpBackend {
                client,
                base_url: config.url.trim_end_matches('/').to_string(),
            },
        })
    }

    pub fn from_env() -> WalkResult<Self> {
        Self::new(EngineConfig::from_env())
    }

    pub fn base_url(&self) -> &str {
        &self.http.base_url
    }

    /// Upload a model definition. A reply without the ok marker is a
    /// [`WalkError::ModelLoad`], not a protocol error.
    pub async fn load_model(&self, source_name: &str, model: String) -> WalkResult<()> {
        let reply = self.http.exchange(Endpoint::Load, Some(model)).await?;
        if !is_ok(&reply) {
            return Err(WalkError::ModelLoad {
                source_name: source_name.to_string(),
                message: format!(
                    "engine at {} answered {reply}",
                    self.http.url(Endpoint::Load)
                ),
            });
        }
        info!(source = source_name, "model loaded into engine");
        Ok(())
    }

    /// Read a model file and upload it.
    pub async fn load_model_file(&self, path: &Path) -> WalkResult<()> {
        let source_name = path.display().to_string();
        let model = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| WalkError::ModelLoad {
                source_name: source_name.clone(),
                message: format!("model file not readable: {e}"),
            })?;
        self.load_model(&source_name, model).await
    }
}

#[async_trait]
impl TraversalSession for TraversalClient {
    async fn restart(&self) -> WalkResult<()> {
        let reply = self.http.exchange(Endpoint::Restart, None).await?;
        ensure_ok(Endpoint::Restart, &reply)
    }

    async fn coverage(&self) -> WalkResult<u8> {
        let reply = self.http.exchange(Endpoint::GetStatistics, None).await?;
        ensure_ok(Endpoint::GetStatistics, &reply)?;
        let pct = coverage_field(Endpoint::GetStatistics, &reply)?;
        debug!(edge_coverage = pct, "engine statistics");
        Ok(pct)
    }

    async fn has_next(&self) -> WalkResult<bool> {
        let reply = self.http.exchange(Endpoint::HasNext, None).await?;
        ensure_ok(Endpoint::HasNext, &reply)?;
        has_next_field(Endpoint::HasNext, &reply)
    }

    async fn next_step(&self) -> WalkResult<String> {
        let reply = self.http.exchange(Endpoint::GetNext, None).await?;
        ensure_ok(Endpoint::GetNext, &reply)?;
        element_name_field(Endpoint::GetNext, &reply)
    }
}
