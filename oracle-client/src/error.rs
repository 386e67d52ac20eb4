//! Error types for the oracle client

use thiserror::Error;

pub type OracleResult<T> = Result<T, OracleError>;

#[derive(Error, Debug)]
pub enum OracleError {
    #[error("Oracle API key is missing")]
    MissingApiKey,

    #[error("Oracle transport failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Oracle returned an empty or unusable completion")]
    EmptyCompletion,

    #[error("Malformed oracle response: {0}")]
    MalformedResponse(String),

    #[error("Mock response not configured for: {0}")]
    NotConfigured(String),
}
