//! OracleService trait abstraction for client implementations

use crate::error::OracleResult;
use crate::request::OracleRequest;
use async_trait::async_trait;

/// Core oracle interface: one request in, raw completion text out.
/// Implemented by the real HTTP client and by the test mock. The
/// response is parsed and validated separately so every caller applies
/// the same envelope checks regardless of transport.
#[async_trait]
pub trait OracleService: Send + Sync {
    /// Submit an assembled turn context and wait for the raw completion.
    async fn submit(&self, request: &OracleRequest) -> OracleResult<String>;
}
