//! Mock OracleService implementation for testing

use crate::error::{OracleError, OracleResult};
use crate::request::OracleRequest;
use crate::traits::OracleService;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Mock oracle for testing - only compiled in test mode or with mock feature
#[cfg(any(test, feature = "mock"))]
pub struct MockOracle {
    responder: Arc<Mutex<Option<Responder>>>,
    scripted: Arc<Mutex<VecDeque<OracleResult<String>>>>,
    call_log: Arc<Mutex<Vec<MockCall>>>,
}

#[cfg(any(test, feature = "mock"))]
type Responder = Box<dyn Fn(&OracleRequest) -> OracleResult<String> + Send>;

/// Record of one submitted turn, for assertions on what the session sent.
#[cfg(any(test, feature = "mock"))]
#[derive(Debug, Clone)]
pub struct MockCall {
    pub fen: String,
    pub directive: String,
    pub move_selection: bool,
}

#[cfg(any(test, feature = "mock"))]
impl Default for MockOracle {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(any(test, feature = "mock"))]
impl MockOracle {
    pub fn new() -> Self {
        Self {
            responder: Arc::new(Mutex::new(None)),
            scripted: Arc::new(Mutex::new(VecDeque::new())),
            call_log: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Configure a closure consulted for every submit.
    pub fn with_response<F>(self, f: F) -> Self
    where
        F: Fn(&OracleRequest) -> OracleResult<String> + Send + 'static,
    {
        *self.responder.lock().unwrap() = Some(Box::new(f));
        self
    }

    /// Queue one scripted reply; scripted replies are consumed in order
    /// before the configured closure is consulted.
    pub fn push_reply(self, reply: OracleResult<String>) -> Self {
        self.scripted.lock().unwrap().push_back(reply);
        self
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<MockCall> {
        self.call_log.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.call_log.lock().unwrap().len()
    }
}

#[cfg(any(test, feature = "mock"))]
#[async_trait]
impl OracleService for MockOracle {
    async fn submit(&self, request: &OracleRequest) -> OracleResult<String> {
        self.call_log.lock().unwrap().push(MockCall {
            fen: request.fen.clone(),
            directive: request.directive.clone(),
            move_selection: request.move_selection,
        });

        if let Some(reply) = self.scripted.lock().unwrap().pop_front() {
            return reply;
        }
        match self.responder.lock().unwrap().as_ref() {
            Some(f) => f(request),
            None => Err(OracleError::NotConfigured("submit".to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use board::Side;

    fn request(directive: &str) -> OracleRequest {
        OracleRequest {
            fen: "8/8 w".to_string(),
            directive: directive.to_string(),
            acting_side: Side::white(),
            opponent_side: Side::black(),
            terrain: serde_json::json!({}),
            num_files: 8,
            num_ranks: 2,
            history: Vec::new(),
            move_selection: false,
        }
    }

    #[tokio::test]
    async fn unconfigured_mock_reports_not_configured() {
        let mock = MockOracle::new();
        let err = mock.submit(&request("e4")).await.unwrap_err();
        assert!(matches!(err, OracleError::NotConfigured(_)));
        assert_eq!(mock.call_count(), 1);
    }

    #[tokio::test]
    async fn scripted_replies_are_consumed_in_order() {
        let mock = MockOracle::new()
            .push_reply(Ok("first".to_string()))
            .push_reply(Err(OracleError::EmptyCompletion))
            .with_response(|_| Ok("fallback".to_string()));

        assert_eq!(mock.submit(&request("a")).await.unwrap(), "first");
        assert!(mock.submit(&request("b")).await.is_err());
        assert_eq!(mock.submit(&request("c")).await.unwrap(), "fallback");
    }

    #[tokio::test]
    async fn call_log_records_the_directive() {
        let mock = MockOracle::new().with_response(|req| Ok(req.directive.clone()));
        mock.submit(&request("summon a werewolf")).await.unwrap();

        let calls = mock.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].directive, "summon a werewolf");
        assert!(!calls[0].move_selection);
    }
}
