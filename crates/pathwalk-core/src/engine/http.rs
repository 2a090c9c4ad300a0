//! HTTP layer: the single request/verify path every engine call goes through.
//!
//! Transport failures, non-2xx statuses and undecodable bodies all become
//! `EngineProtocol`. Nothing here retries.

use reqwest::header::CONTENT_TYPE;
use serde_json::Value;
use tracing::debug;

use super::helpers::parse_reply;
use super::types::Endpoint;
use crate::error::{WalkError, WalkResult};

/// HTTP backend (holds reqwest client and base URL).
#[derive(Debug, Clone)]
pub(crate) struct HttpBackend {
    pub(crate) client: reqwest::Client,
    pub(crate) base_url: String,
}

impl HttpBackend {
    pub(crate) fn url(&self, endpoint: Endpoint) -> String {
        format!("{}/{}", self.base_url, endpoint.path())
    }

    /// Send one request and return the decoded JSON reply, without looking
    /// at the result marker.
    pub(crate) async fn exchange(
        &self,
        endpoint: Endpoint,
        body: Option<String>,
    ) -> WalkResult<Value> {
        let url = self.url(endpoint);
        debug!(endpoint = %endpoint, url = %url, "engine request");

        let mut request = self.client.request(endpoint.method(), &url);
        request = match body {
            Some(body) => request.header(CONTENT_TYPE, "text/plain").body(body),
            // PUT /restart carries an empty body
            None if endpoint.method() == reqwest::Method::PUT => request.body(""),
            None => request,
        };

        let response = request
            .send()
            .await
            .map_err(|e| WalkError::protocol(endpoint, format!("request failed: {e}")))?;

        let status = response.status();
        let text = response.text().await.map_err(|e| {
            WalkError::protocol(endpoint, format!("failed to read response body: {e}"))
        })?;

        if !status.is_success() {
            let detail: String = text.chars().take(200).collect();
            return Err(WalkError::protocol(
                endpoint,
                format!("HTTP {}: {}", status.as_u16(), detail),
            ));
        }

        parse_reply(endpoint, &text)
    }
}
