//! HTTP-backed decision source
//!
//! Posts `{instructions, context}` to a configured endpoint and sanitizes
//! the response body through [`parse_decision_payload`]. Provider-agnostic:
//! any service that answers with the decision JSON contract works.

use super::payload::parse_decision_payload;
use async_trait::async_trait;
use atrium_application::ports::decision_source::{DecisionSource, RawDecision, SourceError};
use atrium_domain::ContextSnapshot;
use std::time::Duration;

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Remote decision source speaking JSON over HTTP
pub struct HttpDecisionSource {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
}

impl HttpDecisionSource {
    pub fn new(endpoint: impl Into<String>) -> Result<Self, SourceError> {
        let client = reqwest::Client::builder()
            .timeout(DEFAULT_REQUEST_TIMEOUT)
            .build()
            .map_err(|e| SourceError::Unavailable(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
            api_key: None,
        })
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }
}

#[async_trait]
impl DecisionSource for HttpDecisionSource {
    async fn generate(
        &self,
        instructions: &str,
        snapshot: &ContextSnapshot,
    ) -> Result<RawDecision, SourceError> {
        let body = serde_json::json!({
            "instructions": instructions,
            "context": snapshot,
        });

        let mut request = self.client.post(&self.endpoint).json(&body);
        if let Some(api_key) = &self.api_key {
            request = request.bearer_auth(api_key);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                SourceError::Timeout
            } else {
                SourceError::RequestFailed(e.to_string())
            }
        })?;

        if !response.status().is_success() {
            return Err(SourceError::RequestFailed(format!(
                "HTTP {} from decision endpoint",
                response.status()
            )));
        }

        let text = response
            .text()
            .await
            .map_err(|e| SourceError::RequestFailed(e.to_string()))?;

        Ok(parse_decision_payload(&text))
    }
}
