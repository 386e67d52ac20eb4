use std::sync::Arc;

use board::{
    audit_transition, game_status, is_standard_setup, legal_moves_san, project, try_standard_move,
    AuditOutcome, GameOutcome, PieceGrid, PieceRegistry, Position, PositionError, Side,
    SideRegistry, TerrainMap,
};
use oracle_client::{parse_response, OracleError, OracleRequest, OracleResponse, OracleService};

use super::commands::SessionError;
use super::snapshot::{GamePhase, GameResult, SessionSnapshot};

/// Turns of history kept for oracle context.
const MAX_HISTORY: usize = 5;
/// Narration lines kept for display.
const MAX_MESSAGES: usize = 16;

/// Internal mutable state, owned entirely by the session actor. No locks.
pub(crate) struct SessionState {
    pub session_id: String,
    pub fen: String,
    pub to_move: Side,
    pub grid: PieceGrid,
    pub num_files: usize,
    pub num_ranks: usize,
    pub phase: GamePhase,
    pub registry: PieceRegistry,
    pub sides: SideRegistry,
    pub terrain: TerrainMap,
    pub history: Vec<String>,
    pub messages: Vec<String>,
    pub turn_count: usize,
    oracle: Arc<dyn OracleService>,
}

impl SessionState {
    pub fn new(
        session_id: String,
        fen: &str,
        oracle: Arc<dyn OracleService>,
    ) -> Result<Self, SessionError> {
        let mut state = Self {
            session_id,
            fen: String::new(),
            to_move: Side::white(),
            grid: Vec::new(),
            num_files: 0,
            num_ranks: 0,
            phase: GamePhase::Idle,
            registry: PieceRegistry::new(),
            sides: SideRegistry::new(),
            terrain: TerrainMap::new(),
            history: Vec::new(),
            messages: Vec::new(),
            turn_count: 0,
            oracle,
        };
        state
            .commit(fen)
            .map_err(|e| SessionError::InvalidPosition(e.to_string()))?;
        Ok(state)
    }

    /// Build a full snapshot of the current state.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            session_id: self.session_id.clone(),
            fen: self.fen.clone(),
            side_to_move: self.to_move.name().to_string(),
            phase: self.phase.clone(),
            board: self.grid.clone(),
            terrain: self.terrain.clone(),
            messages: self.messages.clone(),
            turn_count: self.turn_count,
            dynamic_piece_count: self.registry.dynamic_count(),
        }
    }

    /// Start a fresh game, discarding terrain, registries and narration.
    pub fn apply_reset(&mut self, fen: Option<String>) -> Result<SessionSnapshot, SessionError> {
        let fen = fen.unwrap_or_else(|| board::INITIAL_FEN.to_string());
        let mut fresh = Self::new(self.session_id.clone(), &fen, Arc::clone(&self.oracle))?;
        std::mem::swap(self, &mut fresh);
        tracing::info!("session reset");
        Ok(self.snapshot())
    }

    /// Resolve one player directive end to end: fast path for standard
    /// moves on a standard board, oracle round-trip for everything else,
    /// then reconciliation of the oracle's claims against local state.
    pub async fn play_turn(&mut self, input: &str) -> Result<SessionSnapshot, SessionError> {
        if matches!(self.phase, GamePhase::Ended { .. }) {
            return Err(SessionError::GameEnded);
        }
        let input = input.trim();
        if input.is_empty() {
            return Err(SessionError::EmptyDirective);
        }

        let pre_fen = self.fen.clone();
        let acting = self.to_move.clone();
        self.turn_count += 1;
        tracing::info!(turn = self.turn_count, side = %acting, %input, "turn started");

        let mut fast_committed = false;
        let request = if is_standard_setup(&self.fen, self.num_files, self.num_ranks) {
            match try_standard_move(&self.fen, input) {
                Some(mv) => {
                    tracing::debug!(san = %mv.san, "standard move resolved locally");
                    let line = format!("{}: {}", self.display_name(&acting), mv.san);
                    self.push_message(line);
                    let fen_after = mv.fen_after;
                    self.commit(&fen_after).map_err(|e| {
                        SessionError::Internal(format!("unreadable engine position: {e}"))
                    })?;
                    fast_committed = true;

                    if let Some((result, reason)) = self.canonical_result() {
                        self.push_message(reason.clone());
                        self.phase = GamePhase::Ended { result, reason };
                        return Ok(self.snapshot());
                    }

                    let responder = self.to_move.clone();
                    let legal = legal_moves_san(&self.fen);
                    let directive = OracleRequest::move_selection_directive(&responder, &legal);
                    self.build_request(directive, responder, true)
                }
                None => self.build_request(input.to_string(), acting.clone(), false),
            }
        } else {
            self.build_request(input.to_string(), acting.clone(), false)
        };

        self.phase = GamePhase::AwaitingOracle;
        let completion = match self.oracle.submit(&request).await {
            Ok(text) => text,
            Err(e) => return Ok(self.abort_turn(&e, &pre_fen, fast_committed)),
        };
        let response = match parse_response(&completion) {
            Ok(response) => response,
            Err(e) => return Ok(self.abort_turn(&e, &pre_fen, fast_committed)),
        };

        self.phase = GamePhase::Reconciling;
        let destroyed = self.reconcile(&response, &pre_fen, fast_committed);

        self.push_history(format!(
            "Player ({acting}): {input}\nOracle: {}",
            response.game_message
        ));

        if let Some((result, reason)) = self.detect_termination(&response.game_message) {
            tracing::info!(?result, "game ended");
            self.phase = GamePhase::Ended { result, reason };
        } else if destroyed {
            tracing::info!("match destroyed by oracle sentinel");
            self.phase = GamePhase::Ended {
                result: GameResult::Ended,
                reason: response.game_message.clone(),
            };
        } else {
            self.phase = GamePhase::Idle;
        }
        Ok(self.snapshot())
    }

    /// Apply an oracle reply to local state: audit and commit each half
    /// of the turn, register new pieces, apply terrain. Returns true
    /// when either resulting position is the empty match-destroyed
    /// sentinel, which bypasses the codec entirely.
    fn reconcile(&mut self, response: &OracleResponse, pre_fen: &str, fast_committed: bool) -> bool {
        if response.board_after_player_move_fen.trim().is_empty() {
            self.push_narration(response);
            return true;
        }

        let first_narrative = format!(
            "{} {}",
            response.player_move_attempt.llm_interpretation, response.game_message
        );
        let first = audit_transition(
            &self.fen,
            &response.board_after_player_move_fen,
            &first_narrative,
        );
        self.report_audit(&first);
        if let Err(e) = self.commit(&response.board_after_player_move_fen) {
            tracing::warn!(error = %e, "claimed position unreadable");
            if !fast_committed {
                // Nothing local was committed this turn, so roll all the
                // way back. pre_fen was valid when the turn started.
                let _ = self.commit(pre_fen);
            }
            self.push_message(format!(
                "The claimed position could not be read ({e}); keeping the last valid board."
            ));
            return false;
        }

        for def in &response.new_piece_definitions {
            let symbol = def.fen_char;
            match self.registry.register(def.clone().into()) {
                Ok(()) => self.push_message(format!("New piece defined: '{symbol}'")),
                Err(e) => tracing::warn!(%symbol, error = %e, "piece definition rejected"),
            }
        }
        self.terrain
            .apply_changes(&response.terrain_changes, self.num_files, self.num_ranks);

        let mut destroyed = false;
        let next = response.board_after_opponent_move_fen.trim().to_string();
        if next.is_empty() {
            destroyed = true;
        } else if next != self.fen {
            let second_narrative = format!(
                "{} {}",
                response.opponent_response.llm_interpretation, response.game_message
            );
            let second = audit_transition(&self.fen, &next, &second_narrative);
            self.report_audit(&second);
            if let Err(e) = self.commit(&next) {
                tracing::warn!(error = %e, "counter-move position unreadable");
                self.push_message(format!(
                    "The claimed counter-move position could not be read ({e}); keeping the last valid board."
                ));
            }
        }
        // New prototypes may change glyphs or hit points on the board.
        self.refresh_grid();
        self.push_narration(response);
        destroyed
    }

    fn push_narration(&mut self, response: &OracleResponse) {
        for line in [
            &response.player_move_attempt.llm_interpretation,
            &response.opponent_response.llm_interpretation,
            &response.game_message,
        ] {
            if !line.trim().is_empty() {
                self.push_message(line.clone());
            }
        }
    }

    /// Drop an unusable oracle reply. A locally resolved standard move
    /// stands; an oracle-resolved turn rolls back entirely.
    fn abort_turn(
        &mut self,
        err: &OracleError,
        pre_fen: &str,
        fast_committed: bool,
    ) -> SessionSnapshot {
        tracing::warn!(error = %err, fast_committed, "turn aborted");
        if !fast_committed {
            let _ = self.commit(pre_fen);
        }
        self.push_message(format!(
            "The oracle reply was unusable ({err}). The board stands as shown; try again."
        ));
        self.phase = GamePhase::Idle;
        self.snapshot()
    }

    /// Authoritative outcome when the position is canonical.
    fn canonical_result(&self) -> Option<(GameResult, String)> {
        if !is_standard_setup(&self.fen, self.num_files, self.num_ranks) {
            return None;
        }
        match game_status(&self.fen) {
            GameOutcome::Ongoing => None,
            GameOutcome::Checkmate { winner } => {
                let name = self.display_name(&winner);
                Some((
                    GameResult::Won {
                        side: winner.name().to_string(),
                    },
                    format!("Checkmate. {name} wins."),
                ))
            }
            GameOutcome::Stalemate => Some((GameResult::Draw, "Stalemate.".to_string())),
            GameOutcome::Draw => Some((GameResult::Draw, "Draw.".to_string())),
        }
    }

    /// Decide whether the game is over. Canonical positions trust the
    /// rules engine; everything else falls back to scanning the oracle's
    /// narration for terminal phrasing.
    fn detect_termination(&self, message: &str) -> Option<(GameResult, String)> {
        if is_standard_setup(&self.fen, self.num_files, self.num_ranks) {
            return self.canonical_result();
        }

        let lower = message.to_lowercase();
        for side in self.sides.sides() {
            if lower.contains(&format!("{} wins", side.name())) {
                return Some((
                    GameResult::Won {
                        side: side.name().to_string(),
                    },
                    message.to_string(),
                ));
            }
        }
        if has_word(&lower, "stalemate") || has_word(&lower, "draw") || has_word(&lower, "drawn") {
            return Some((GameResult::Draw, message.to_string()));
        }
        if lower.contains("checkmate")
            || lower.contains("king captured")
            || lower.contains("king is captured")
            || lower.contains("game over")
        {
            return Some((GameResult::Ended, message.to_string()));
        }
        None
    }

    /// Validate and adopt a position, refreshing the derived board view.
    fn commit(&mut self, fen: &str) -> Result<(), PositionError> {
        let position = Position::parse(fen)?;
        self.grid = project(&position, &self.registry);
        self.num_files = position.num_files();
        self.num_ranks = position.num_ranks();
        self.to_move = position.side_to_move().clone();
        self.fen = fen.to_string();
        Ok(())
    }

    fn refresh_grid(&mut self) {
        if let Ok(position) = Position::parse(&self.fen) {
            self.grid = project(&position, &self.registry);
        }
    }

    fn build_request(
        &self,
        directive: String,
        acting: Side,
        move_selection: bool,
    ) -> OracleRequest {
        OracleRequest {
            fen: self.fen.clone(),
            directive,
            opponent_side: acting.opponent(),
            acting_side: acting,
            terrain: self.terrain.to_context_value(),
            num_files: self.num_files,
            num_ranks: self.num_ranks,
            history: self.history.clone(),
            move_selection,
        }
    }

    fn report_audit(&mut self, outcome: &AuditOutcome) {
        if outcome.is_valid {
            return;
        }
        for mismatch in &outcome.mismatches {
            tracing::warn!(%mismatch, "transition audit mismatch");
            self.push_message(format!("Audit: {mismatch}"));
        }
        for suggestion in &outcome.suggestions {
            self.push_message(format!("Audit: {suggestion}"));
        }
    }

    fn display_name(&self, side: &Side) -> String {
        self.sides
            .get(side)
            .map(|record| record.display_name.clone())
            .unwrap_or_else(|| side.name().to_string())
    }

    fn push_message(&mut self, message: String) {
        self.messages.push(message);
        if self.messages.len() > MAX_MESSAGES {
            let excess = self.messages.len() - MAX_MESSAGES;
            self.messages.drain(..excess);
        }
    }

    fn push_history(&mut self, entry: String) {
        self.history.push(entry);
        if self.history.len() > MAX_HISTORY {
            let excess = self.history.len() - MAX_HISTORY;
            self.history.drain(..excess);
        }
    }
}

fn has_word(haystack: &str, word: &str) -> bool {
    haystack
        .split(|c: char| !c.is_ascii_alphanumeric())
        .any(|token| token == word)
}
