//! Game session, actor style.
//!
//! All mutable game state lives in [`state::SessionState`], owned by a
//! spawned task; callers talk to it through a cloneable [`SessionHandle`]
//! over an mpsc channel, and observers subscribe to a broadcast of
//! snapshots. One actor per game.

pub mod actor;
pub mod commands;
pub mod events;
pub mod handle;
pub mod snapshot;
pub mod state;

use std::sync::Arc;

use oracle_client::OracleService;
use tokio::sync::{broadcast, mpsc};
use uuid::Uuid;

use actor::run_session_actor;
pub use commands::SessionError;
pub use events::SessionEvent;
pub use handle::SessionHandle;
pub use snapshot::{GamePhase, GameResult, SessionSnapshot};
use state::SessionState;

/// Spawn a session actor for one game and return its handle together
/// with the initial snapshot.
pub fn spawn_session(
    fen: Option<String>,
    oracle: Arc<dyn OracleService>,
) -> Result<(SessionHandle, SessionSnapshot), SessionError> {
    let session_id = Uuid::new_v4().to_string();
    let fen = fen.unwrap_or_else(|| board::INITIAL_FEN.to_string());

    let state = SessionState::new(session_id.clone(), &fen, oracle)?;
    let initial_snapshot = state.snapshot();

    let (cmd_tx, cmd_rx) = mpsc::channel(32);
    let (event_tx, _) = broadcast::channel(100);

    tokio::spawn(async move {
        run_session_actor(state, cmd_rx, event_tx).await;
    });

    Ok((SessionHandle::new(session_id, cmd_tx), initial_snapshot))
}

#[cfg(test)]
mod tests {
    use super::*;
    use oracle_client::MockOracle;

    #[tokio::test]
    async fn spawn_rejects_an_unreadable_position() {
        let oracle: Arc<dyn OracleService> = Arc::new(MockOracle::new());
        let result = spawn_session(Some("not a position".to_string()), oracle);
        assert!(matches!(result, Err(SessionError::InvalidPosition(_))));
    }

    #[tokio::test]
    async fn handle_round_trips_through_the_actor() {
        let oracle: Arc<dyn OracleService> = Arc::new(MockOracle::new());
        let (handle, initial) = spawn_session(None, oracle).unwrap();
        assert_eq!(initial.fen, board::INITIAL_FEN);

        let snap = handle.get_snapshot().await.unwrap();
        assert_eq!(snap.side_to_move, "white");
        assert_eq!(snap.turn_count, 0);

        let reset = handle.reset(None).await.unwrap();
        assert_eq!(reset.fen, board::INITIAL_FEN);

        handle.shutdown().await;
    }

    #[tokio::test]
    async fn subscribers_see_a_snapshot_for_each_turn() {
        let oracle: Arc<dyn OracleService> = Arc::new(MockOracle::new());
        let (handle, _) = spawn_session(None, oracle).unwrap();

        let (current, mut events) = handle.subscribe().await.unwrap();
        assert_eq!(current.fen, board::INITIAL_FEN);

        // The unconfigured oracle drops the counter half, but the locally
        // resolved move stands and the mutation is broadcast.
        let after = handle.submit_directive("e4".to_string()).await.unwrap();
        match events.recv().await.unwrap() {
            SessionEvent::StateChanged(snap) => {
                assert_eq!(snap.fen, after.fen);
                assert_eq!(snap.side_to_move, "black");
            }
            SessionEvent::Error(e) => panic!("unexpected error event: {e}"),
        }

        handle.shutdown().await;
    }
}
