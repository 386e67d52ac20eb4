//! Configuration for the Omnichess client
//!
//! Oracle access is configured through the environment:
//! 1. OMNICHESS_API_KEY (required)
//! 2. OMNICHESS_MODEL (optional, defaults to the flash model)
//! 3. OMNICHESS_ENDPOINT (optional, defaults to the public API)

use anyhow::Context;
use oracle_client::http::{DEFAULT_ENDPOINT, DEFAULT_MODEL};

#[derive(Debug, Clone)]
pub struct OracleConfig {
    pub api_key: String,
    pub model: String,
    pub endpoint: String,
}

impl OracleConfig {
    /// Read the oracle configuration from the environment.
    pub fn from_env() -> anyhow::Result<Self> {
        let api_key = std::env::var("OMNICHESS_API_KEY")
            .context("OMNICHESS_API_KEY is not set; the move oracle needs an API key")?;
        let model =
            std::env::var("OMNICHESS_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        let endpoint =
            std::env::var("OMNICHESS_ENDPOINT").unwrap_or_else(|_| DEFAULT_ENDPOINT.to_string());
        Ok(Self {
            api_key,
            model,
            endpoint,
        })
    }
}
