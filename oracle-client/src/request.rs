//! Turn context assembly.
//!
//! A request carries everything the oracle needs to resolve one turn:
//! the current position notation, the directive text, both sides, the
//! terrain map, board dimensions and the recent turn history. Assembly
//! is deterministic; transport is someone else's problem.

use board::Side;

/// Context for one oracle round-trip.
#[derive(Debug, Clone)]
pub struct OracleRequest {
    pub fen: String,
    pub directive: String,
    pub acting_side: Side,
    pub opponent_side: Side,
    pub terrain: serde_json::Value,
    pub num_files: usize,
    pub num_ranks: usize,
    pub history: Vec<String>,
    /// True when the directive is a pick-one-of-these-legal-moves list
    /// produced by the fast path rather than free text from the player.
    pub move_selection: bool,
}

impl OracleRequest {
    /// The directive used on the standard path, asking the oracle to
    /// pick a strong reply from the engine's legal-move list.
    pub fn move_selection_directive(side: &Side, legal_moves_san: &[String]) -> String {
        format!(
            "It is your turn ({side}). Choose one of the following legal standard chess moves \
             for {side} from this list: {moves}. Select a strong move and provide the resulting \
             position.",
            moves = serde_json::json!(legal_moves_san),
        )
    }

    /// Render the full prompt text. The wording is not contractual; the
    /// response envelope it demands is.
    pub fn to_prompt(&self) -> String {
        let history = if self.history.is_empty() {
            "No prior game history for this session yet.".to_string()
        } else {
            format!(
                "RECENT GAME HISTORY (most recent turn last):\n{}",
                self.history.join("\n---\n")
            )
        };

        let task = if self.move_selection {
            format!(
                "Select one move from the list embedded in the directive and play it for \
                 {acting}. Set boardAfterOpponentMoveFen identical to boardAfterPlayerMoveFen \
                 and make opponentResponse.llmInterpretation a simple acknowledgement that it \
                 is now {opponent}'s turn.",
                acting = self.acting_side,
                opponent = self.opponent_side,
            )
        } else {
            format!(
                "The directive is paramount: execute it as stated for {acting}, using piece \
                 movement, hit points, captures, summoning, terrain changes, board dimension \
                 changes and new piece definitions as tools. Then determine {opponent}'s \
                 counter-move yourself. Keep both resulting position strings structurally \
                 exact: every rank must sum to the board's file count, pieces not involved in \
                 the action keep their squares, and a moved piece leaves its origin square \
                 empty. Damaged-but-alive pieces keep their symbol; destroyed pieces are \
                 removed. Narrate every piece that appears, moves or disappears.",
                acting = self.acting_side,
                opponent = self.opponent_side,
            )
        };

        format!(
            "You are an adaptive chess game engine playing as {acting}.\n\
             Current position: {fen}\n\
             Board dimensions: {files} files by {ranks} ranks.\n\
             Terrain and objects: {terrain}\n\
             {history}\n\n\
             Directive for {acting}'s turn: \"{directive}\"\n\n\
             {task}\n\n\
             Respond ONLY with a JSON object of the shape:\n\
             {{\"playerMoveAttempt\": {{\"userInput\": string, \"parsed\": object|null, \
             \"llmInterpretation\": string, \"appliedEffects\": array}}, \
             \"boardAfterPlayerMoveFen\": string, \
             \"newPieceDefinitions\": [{{\"fenChar\", \"displayChar\", \"description\", \"maxHp\"}}]|null, \
             \"terrainChanges\": [{{\"square\", \"terrainType\", \"displayChar\", \
             \"effectsDescription\", \"action\"}}]|null, \
             \"opponentResponse\": {{\"llmInterpretation\": string, \"parsed\": object|null, \
             \"appliedEffects\": array}}, \
             \"boardAfterOpponentMoveFen\": string, \
             \"gameMessage\": string}}\n\
             Do not wrap the JSON in markdown fences.",
            acting = self.acting_side,
            fen = self.fen,
            files = self.num_files,
            ranks = self.num_ranks,
            terrain = self.terrain,
            history = history,
            directive = self.directive,
            task = task,
        )
    }
}
