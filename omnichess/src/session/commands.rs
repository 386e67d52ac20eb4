use tokio::sync::{broadcast, oneshot};

use super::events::SessionEvent;
use super::snapshot::SessionSnapshot;

#[derive(Debug, Clone, thiserror::Error)]
pub enum SessionError {
    #[error("The game has already ended")]
    GameEnded,
    #[error("Directive is empty")]
    EmptyDirective,
    #[error("Invalid position: {0}")]
    InvalidPosition(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Commands sent to the session actor. Each embeds a oneshot for the reply.
pub enum SessionCommand {
    SubmitDirective {
        input: String,
        reply: oneshot::Sender<Result<SessionSnapshot, SessionError>>,
    },
    Reset {
        fen: Option<String>,
        reply: oneshot::Sender<Result<SessionSnapshot, SessionError>>,
    },
    GetSnapshot {
        reply: oneshot::Sender<SessionSnapshot>,
    },
    Subscribe {
        reply: oneshot::Sender<(SessionSnapshot, broadcast::Receiver<SessionEvent>)>,
    },
    Shutdown,
}
