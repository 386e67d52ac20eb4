//! Oracle response envelope and defensive parsing.
//!
//! Completions arrive as free text that should be a JSON object but is
//! routinely wrapped in markdown fences or sprinkled with control
//! characters. Mandatory fields are validated strictly; optional arrays
//! degrade element-by-element so one malformed side effect cannot sink
//! an otherwise usable turn.

use crate::error::{OracleError, OracleResult};
use board::{NewPieceDefinition, TerrainChange};
use serde::Deserialize;
use serde_json::Value;

/// How the oracle understood the acting side's directive.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveAttempt {
    #[serde(default)]
    pub user_input: String,
    #[serde(default)]
    pub parsed: Option<Value>,
    pub llm_interpretation: String,
    #[serde(default)]
    pub applied_effects: Vec<Value>,
}

/// One fully resolved turn: the acting side's half, the opponent's
/// half, and the side effects that accompanied either.
#[derive(Debug, Clone)]
pub struct OracleResponse {
    pub player_move_attempt: MoveAttempt,
    pub board_after_player_move_fen: String,
    pub new_piece_definitions: Vec<NewPieceDefinition>,
    pub terrain_changes: Vec<TerrainChange>,
    pub opponent_response: MoveAttempt,
    pub board_after_opponent_move_fen: String,
    pub game_message: String,
}

/// Strip markdown code fences and control characters from a raw
/// completion, leaving what should be a bare JSON object.
pub fn sanitize_completion(raw: &str) -> String {
    let mut text = raw.trim().to_string();
    if let Some(stripped) = text.strip_prefix("```") {
        let stripped = stripped.strip_prefix("json").unwrap_or(stripped);
        let stripped = stripped.strip_suffix("```").unwrap_or(stripped);
        text = stripped.trim().to_string();
    }
    text.chars().filter(|c| !c.is_control() || *c == '\n').collect()
}

fn required_str(root: &Value, key: &str) -> OracleResult<String> {
    root.get(key)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| OracleError::MalformedResponse(format!("missing string field '{key}'")))
}

fn required_attempt(root: &Value, key: &str) -> OracleResult<MoveAttempt> {
    let value = root
        .get(key)
        .ok_or_else(|| OracleError::MalformedResponse(format!("missing object field '{key}'")))?;
    serde_json::from_value(value.clone())
        .map_err(|e| OracleError::MalformedResponse(format!("field '{key}': {e}")))
}

/// Coerce an optional array field element-by-element, dropping (and
/// logging) elements that do not deserialize. A missing field or a
/// JSON null yields an empty list.
fn lenient_array<T: serde::de::DeserializeOwned>(root: &Value, key: &str) -> Vec<T> {
    let Some(items) = root.get(key).and_then(Value::as_array) else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| match serde_json::from_value(item.clone()) {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                tracing::warn!(field = key, error = %e, "dropping malformed element");
                None
            }
        })
        .collect()
}

/// Parse a raw completion into the response envelope.
pub fn parse_response(raw: &str) -> OracleResult<OracleResponse> {
    let text = sanitize_completion(raw);
    if text.is_empty() {
        return Err(OracleError::EmptyCompletion);
    }
    let root: Value = serde_json::from_str(&text)
        .map_err(|e| OracleError::MalformedResponse(format!("not valid JSON: {e}")))?;
    if !root.is_object() {
        return Err(OracleError::MalformedResponse(
            "completion is not a JSON object".to_string(),
        ));
    }

    Ok(OracleResponse {
        player_move_attempt: required_attempt(&root, "playerMoveAttempt")?,
        board_after_player_move_fen: required_str(&root, "boardAfterPlayerMoveFen")?,
        new_piece_definitions: lenient_array(&root, "newPieceDefinitions"),
        terrain_changes: lenient_array(&root, "terrainChanges"),
        opponent_response: required_attempt(&root, "opponentResponse")?,
        board_after_opponent_move_fen: required_str(&root, "boardAfterOpponentMoveFen")?,
        game_message: required_str(&root, "gameMessage")?,
    })
}
