use tokio::sync::{broadcast, mpsc};
use tracing::Instrument;

use super::commands::SessionCommand;
use super::events::SessionEvent;
use super::state::SessionState;

/// The main session actor loop.
/// Owns all mutable state. Processes commands sequentially, so a turn
/// in flight at the oracle blocks later commands until it resolves.
pub(crate) async fn run_session_actor(
    state: SessionState,
    cmd_rx: mpsc::Receiver<SessionCommand>,
    event_tx: broadcast::Sender<SessionEvent>,
) {
    let session_id = state.session_id.clone();
    run_session_actor_inner(state, cmd_rx, event_tx)
        .instrument(tracing::info_span!("session", id = %session_id))
        .await;
}

async fn run_session_actor_inner(
    mut state: SessionState,
    mut cmd_rx: mpsc::Receiver<SessionCommand>,
    event_tx: broadcast::Sender<SessionEvent>,
) {
    tracing::info!("Session actor started");

    loop {
        match cmd_rx.recv().await {
            Some(SessionCommand::Shutdown) | None => {
                tracing::info!("Session actor shutting down");
                break;
            }
            Some(SessionCommand::SubmitDirective { input, reply }) => {
                let result = state.play_turn(&input).await;
                match &result {
                    Ok(snap) => {
                        let _ = event_tx.send(SessionEvent::StateChanged(snap.clone()));
                    }
                    Err(e) => {
                        let _ = event_tx.send(SessionEvent::Error(e.to_string()));
                    }
                }
                let _ = reply.send(result);
            }
            Some(SessionCommand::Reset { fen, reply }) => {
                let result = state.apply_reset(fen);
                if let Ok(ref snap) = result {
                    let _ = event_tx.send(SessionEvent::StateChanged(snap.clone()));
                }
                let _ = reply.send(result);
            }
            Some(SessionCommand::GetSnapshot { reply }) => {
                let _ = reply.send(state.snapshot());
            }
            Some(SessionCommand::Subscribe { reply }) => {
                let _ = reply.send((state.snapshot(), event_tx.subscribe()));
            }
        }
    }

    tracing::info!("Session actor exited");
}
