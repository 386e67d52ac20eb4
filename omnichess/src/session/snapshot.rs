use board::{PieceGrid, TerrainMap};

/// Lifecycle of one game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GamePhase {
    /// Waiting for the next player directive.
    Idle,
    /// A turn is in flight at the oracle.
    AwaitingOracle,
    /// Oracle reply received, side effects being applied and audited.
    Reconciling,
    /// Terminal. Once entered the session never leaves it.
    Ended { result: GameResult, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameResult {
    Won { side: String },
    Draw,
    /// Over for a narrated reason that names no winner.
    Ended,
}

/// Complete, immutable snapshot of session state.
/// Sent to clients on every state change and on subscribe.
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    pub session_id: String,
    pub fen: String,
    pub side_to_move: String,
    pub phase: GamePhase,
    pub board: PieceGrid,
    pub terrain: TerrainMap,
    pub messages: Vec<String>,
    pub turn_count: usize,
    pub dynamic_piece_count: usize,
}
