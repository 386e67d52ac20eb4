//! Oracle client library
//!
//! Async client for the LLM move oracle: assembles turn context into a
//! prompt, submits it over HTTP, and parses the structured response
//! envelope. The transport sits behind [`OracleService`] so sessions can
//! be driven by the mock in tests.
//!
//! # Example
//!
//! ```no_run
//! use oracle_client::{HttpOracle, OracleService};
//! use oracle_client::http::{DEFAULT_ENDPOINT, DEFAULT_MODEL};
//!
//! # async fn run(request: oracle_client::OracleRequest) -> Result<(), Box<dyn std::error::Error>> {
//! let oracle = HttpOracle::new(
//!     std::env::var("OMNICHESS_API_KEY")?,
//!     DEFAULT_MODEL.to_string(),
//!     DEFAULT_ENDPOINT.to_string(),
//! )?;
//! let completion = oracle.submit(&request).await?;
//! let response = oracle_client::parse_response(&completion)?;
//! println!("{}", response.game_message);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod http;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod request;
pub mod response;
pub mod traits;

pub use error::{OracleError, OracleResult};
pub use http::HttpOracle;
#[cfg(any(test, feature = "mock"))]
pub use mock::{MockCall, MockOracle};
pub use request::OracleRequest;
pub use response::{parse_response, sanitize_completion, MoveAttempt, OracleResponse};
pub use traits::OracleService;
