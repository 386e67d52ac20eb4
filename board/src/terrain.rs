//! Terrain overlay, independent of piece placement.
//!
//! Terrain lives in a side map keyed by algebraic coordinate and only
//! changes through explicit oracle directives. Region macros (`rank3`,
//! `filec`) expand against the board dimensions in effect when the
//! change is applied.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::square;

/// A terrain object occupying one square.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TerrainObject {
    #[serde(rename = "type")]
    pub kind: String,
    pub display_char: String,
    pub effects_description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TerrainAction {
    Add,
    Create,
    Remove,
}

/// A terrain-change directive as delivered by the oracle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TerrainChange {
    pub square: String,
    pub terrain_type: String,
    #[serde(default)]
    pub display_char: String,
    #[serde(default)]
    pub effects_description: String,
    pub action: TerrainAction,
}

/// Map of coordinate -> terrain. Persists across turns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TerrainMap {
    squares: HashMap<String, TerrainObject>,
}

impl TerrainMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, coordinate: &str) -> Option<&TerrainObject> {
        self.squares.get(coordinate)
    }

    pub fn is_empty(&self) -> bool {
        self.squares.is_empty()
    }

    pub fn len(&self) -> usize {
        self.squares.len()
    }

    /// JSON view of the terrain for oracle context assembly.
    pub fn to_context_value(&self) -> serde_json::Value {
        serde_json::to_value(&self.squares).unwrap_or_else(|_| serde_json::json!({}))
    }

    /// Apply a batch of directives against the given board dimensions.
    /// Invalid coordinates and regions are skipped with a warning; a bad
    /// directive is never fatal.
    pub fn apply_changes(&mut self, changes: &[TerrainChange], num_files: usize, num_ranks: usize) {
        for change in changes {
            let targets = expand_region(&change.square, num_files, num_ranks);
            if targets.is_empty() {
                tracing::warn!(square = %change.square, "skipping terrain change with unusable square");
                continue;
            }
            for coordinate in targets {
                match change.action {
                    TerrainAction::Add | TerrainAction::Create => {
                        tracing::debug!(%coordinate, kind = %change.terrain_type, "terrain added");
                        self.squares.insert(
                            coordinate,
                            TerrainObject {
                                kind: change.terrain_type.clone(),
                                display_char: change.display_char.clone(),
                                effects_description: change.effects_description.clone(),
                            },
                        );
                    }
                    TerrainAction::Remove => {
                        tracing::debug!(%coordinate, "terrain removed");
                        self.squares.remove(&coordinate);
                    }
                }
            }
        }
    }
}

/// Expand a coordinate or `rankN` / `fileX` macro into concrete squares.
/// Anything unrecognized or out of range yields an empty list.
fn expand_region(region: &str, num_files: usize, num_ranks: usize) -> Vec<String> {
    if let Some(rank_str) = region.strip_prefix("rank") {
        let Ok(rank) = rank_str.parse::<usize>() else {
            return Vec::new();
        };
        if rank == 0 || rank > num_ranks {
            tracing::warn!(%region, num_ranks, "rank macro out of range");
            return Vec::new();
        }
        return (0..num_files)
            .map(|col| format!("{}{rank}", square::file_label(col)))
            .collect();
    }

    if let Some(file_str) = region.strip_prefix("file") {
        let Some(col) = square::file_index(file_str) else {
            return Vec::new();
        };
        if col >= num_files {
            tracing::warn!(%region, num_files, "file macro out of range");
            return Vec::new();
        }
        return (1..=num_ranks)
            .map(|rank| format!("{file_str}{rank}"))
            .collect();
    }

    if square::parse_algebraic(region, num_files, num_ranks).is_some() {
        return vec![region.to_string()];
    }
    Vec::new()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn add(square: &str) -> TerrainChange {
        TerrainChange {
            square: square.to_string(),
            terrain_type: "moat".to_string(),
            display_char: "~".to_string(),
            effects_description: "deals 1 damage to pieces that enter".to_string(),
            action: TerrainAction::Add,
        }
    }

    #[test]
    fn adds_and_removes_single_square() {
        let mut terrain = TerrainMap::new();
        terrain.apply_changes(&[add("e4")], 8, 8);
        assert_eq!(terrain.get("e4").unwrap().kind, "moat");

        let remove = TerrainChange {
            action: TerrainAction::Remove,
            ..add("e4")
        };
        terrain.apply_changes(&[remove], 8, 8);
        assert!(terrain.get("e4").is_none());
    }

    #[test]
    fn rank_macro_covers_every_file() {
        let mut terrain = TerrainMap::new();
        terrain.apply_changes(&[add("rank3")], 8, 8);
        assert_eq!(terrain.len(), 8);
        assert!(terrain.get("a3").is_some());
        assert!(terrain.get("h3").is_some());
        assert!(terrain.get("a4").is_none());
    }

    #[test]
    fn file_macro_covers_every_rank() {
        let mut terrain = TerrainMap::new();
        terrain.apply_changes(&[add("filec")], 8, 8);
        assert_eq!(terrain.len(), 8);
        assert!(terrain.get("c1").is_some());
        assert!(terrain.get("c8").is_some());
    }

    #[test]
    fn macros_reach_files_past_z() {
        let mut terrain = TerrainMap::new();
        terrain.apply_changes(&[add("fileaa")], 30, 4);
        assert_eq!(terrain.len(), 4);
        assert!(terrain.get("aa1").is_some());
        assert!(terrain.get("aa4").is_some());

        terrain.apply_changes(&[add("rank2")], 28, 4);
        assert!(terrain.get("ab2").is_some());
    }

    #[test]
    fn invalid_regions_are_skipped_silently() {
        let mut terrain = TerrainMap::new();
        terrain.apply_changes(&[add("rank9"), add("filez"), add("zz9"), add("")], 8, 8);
        assert!(terrain.is_empty());
    }

    #[test]
    fn create_action_behaves_like_add() {
        let mut terrain = TerrainMap::new();
        let create = TerrainChange {
            action: TerrainAction::Create,
            ..add("b2")
        };
        terrain.apply_changes(&[create], 8, 8);
        assert!(terrain.get("b2").is_some());
    }

    #[test]
    fn directive_json_shape_round_trips() {
        let json = r#"{
            "square": "rank3",
            "terrainType": "moat",
            "displayChar": "~",
            "effectsDescription": "water hazard",
            "action": "create"
        }"#;
        let change: TerrainChange = serde_json::from_str(json).unwrap();
        assert_eq!(change.action, TerrainAction::Create);
        assert_eq!(change.terrain_type, "moat");
    }
}
