//! HTTP oracle backed by a Gemini-style completion endpoint.

use crate::error::{OracleError, OracleResult};
use crate::request::OracleRequest;
use crate::traits::OracleService;
use async_trait::async_trait;
use serde_json::Value;

pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta/models";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Real oracle client. Cheap to clone; the underlying connection pool
/// is shared.
#[derive(Debug, Clone)]
pub struct HttpOracle {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: String,
}

impl HttpOracle {
    pub fn new(api_key: String, model: String, endpoint: String) -> OracleResult<Self> {
        if api_key.trim().is_empty() {
            return Err(OracleError::MissingApiKey);
        }
        Ok(Self {
            client: reqwest::Client::new(),
            endpoint,
            model,
            api_key,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn url(&self) -> String {
        format!(
            "{}/{}:generateContent?key={}",
            self.endpoint, self.model, self.api_key
        )
    }
}

#[async_trait]
impl OracleService for HttpOracle {
    async fn submit(&self, request: &OracleRequest) -> OracleResult<String> {
        let body = serde_json::json!({
            "contents": [{
                "parts": [{ "text": request.to_prompt() }]
            }],
            "generationConfig": { "responseMimeType": "application/json" }
        });

        tracing::debug!(model = %self.model, "submitting turn to oracle");
        let response = self
            .client
            .post(self.url())
            .json(&body)
            .send()
            .await?
            .error_for_status()?;

        let payload: Value = response.json().await?;
        let text = payload
            .get("candidates")
            .and_then(Value::as_array)
            .and_then(|c| c.first())
            .and_then(|c| c.pointer("/content/parts/0/text"))
            .and_then(Value::as_str)
            .ok_or(OracleError::EmptyCompletion)?;

        tracing::debug!(len = text.len(), "oracle completion received");
        Ok(text.to_string())
    }
}
