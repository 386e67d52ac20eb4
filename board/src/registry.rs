//! Piece prototype catalog.
//!
//! Built-in prototypes cover the standard set plus the werewolf
//! extension. Oracle responses may register further prototypes at
//! runtime; a symbol is write-once so that hit-point ceilings never
//! shift under earlier turns.

use serde::Deserialize;
use std::collections::HashMap;

/// Hit points assigned to any symbol without a formal definition.
pub const DEFAULT_PIECE_MAX_HP: u32 = 3;

/// Piece definition as it arrives in an oracle response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPieceDefinition {
    pub fen_char: char,
    pub display_char: String,
    pub description: String,
    #[serde(default = "default_max_hp")]
    pub max_hp: u32,
}

fn default_max_hp() -> u32 {
    DEFAULT_PIECE_MAX_HP
}

impl From<NewPieceDefinition> for PiecePrototype {
    fn from(def: NewPieceDefinition) -> Self {
        Self {
            symbol: def.fen_char,
            glyph: def.display_char,
            max_hp: def.max_hp,
            movement: Some(def.description),
        }
    }
}

/// Static definition of a piece type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PiecePrototype {
    pub symbol: char,
    pub glyph: String,
    pub max_hp: u32,
    pub movement: Option<String>,
}

impl PiecePrototype {
    fn new(symbol: char, glyph: &str, max_hp: u32) -> Self {
        Self {
            symbol,
            glyph: glyph.to_string(),
            max_hp,
            movement: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("piece symbol '{0}' is already defined")]
    AlreadyDefined(char),
}

/// Combined built-in and dynamic catalog. The dynamic catalog wins on
/// lookup but can never replace an existing definition.
#[derive(Debug, Clone, Default)]
pub struct PieceRegistry {
    dynamic: HashMap<char, PiecePrototype>,
}

impl PieceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve a symbol: dynamic catalog, then built-ins, then a default
    /// prototype so unrecognized symbols degrade instead of failing.
    pub fn lookup(&self, symbol: char) -> PiecePrototype {
        if let Some(proto) = self.dynamic.get(&symbol) {
            return proto.clone();
        }
        if let Some(proto) = builtin(symbol) {
            return proto;
        }
        tracing::debug!(%symbol, "no prototype for symbol, using default hit points");
        PiecePrototype {
            symbol,
            glyph: symbol.to_string(),
            max_hp: DEFAULT_PIECE_MAX_HP,
            movement: None,
        }
    }

    /// Register a dynamic prototype. Registration is write-once: a
    /// symbol that is already defined (dynamically or built-in) is left
    /// untouched and the attempt is rejected.
    pub fn register(&mut self, proto: PiecePrototype) -> Result<(), RegistryError> {
        if self.dynamic.contains_key(&proto.symbol) || builtin(proto.symbol).is_some() {
            return Err(RegistryError::AlreadyDefined(proto.symbol));
        }
        tracing::info!(
            symbol = %proto.symbol,
            glyph = %proto.glyph,
            max_hp = proto.max_hp,
            "registered dynamic piece prototype"
        );
        self.dynamic.insert(proto.symbol, proto);
        Ok(())
    }

    pub fn dynamic_count(&self) -> usize {
        self.dynamic.len()
    }
}

fn builtin(symbol: char) -> Option<PiecePrototype> {
    let proto = match symbol {
        'P' => PiecePrototype::new('P', "\u{2659}", 1),
        'N' => PiecePrototype::new('N', "\u{2658}", 3),
        'B' => PiecePrototype::new('B', "\u{2657}", 3),
        'R' => PiecePrototype::new('R', "\u{2656}", 5),
        'Q' => PiecePrototype::new('Q', "\u{2655}", 7),
        'K' => PiecePrototype::new('K', "\u{2654}", 10),
        'W' => PiecePrototype::new('W', "\u{1F43A}", 4),
        'p' => PiecePrototype::new('p', "\u{265F}", 1),
        'n' => PiecePrototype::new('n', "\u{265E}", 3),
        'b' => PiecePrototype::new('b', "\u{265D}", 3),
        'r' => PiecePrototype::new('r', "\u{265C}", 5),
        'q' => PiecePrototype::new('q', "\u{265B}", 7),
        'k' => PiecePrototype::new('k', "\u{265A}", 10),
        'w' => PiecePrototype::new('w', "\u{1F43A}", 4),
        _ => return None,
    };
    Some(proto)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_hit_point_table() {
        let registry = PieceRegistry::new();
        assert_eq!(registry.lookup('P').max_hp, 1);
        assert_eq!(registry.lookup('n').max_hp, 3);
        assert_eq!(registry.lookup('B').max_hp, 3);
        assert_eq!(registry.lookup('r').max_hp, 5);
        assert_eq!(registry.lookup('Q').max_hp, 7);
        assert_eq!(registry.lookup('k').max_hp, 10);
        assert_eq!(registry.lookup('W').max_hp, 4);
    }

    #[test]
    fn unknown_symbol_degrades_to_default() {
        let registry = PieceRegistry::new();
        let proto = registry.lookup('Z');
        assert_eq!(proto.max_hp, DEFAULT_PIECE_MAX_HP);
        assert_eq!(proto.glyph, "Z");
    }

    #[test]
    fn registration_is_write_once() {
        let mut registry = PieceRegistry::new();
        registry
            .register(PiecePrototype {
                symbol: 'D',
                glyph: "dragon".to_string(),
                max_hp: 4,
                movement: None,
            })
            .unwrap();

        let second = registry.register(PiecePrototype {
            symbol: 'D',
            glyph: "drake".to_string(),
            max_hp: 9,
            movement: None,
        });
        assert_eq!(second, Err(RegistryError::AlreadyDefined('D')));

        // The original definition wins.
        assert_eq!(registry.lookup('D').max_hp, 4);
        assert_eq!(registry.lookup('D').glyph, "dragon");
    }

    #[test]
    fn builtin_symbols_cannot_be_shadowed() {
        let mut registry = PieceRegistry::new();
        let result = registry.register(PiecePrototype {
            symbol: 'Q',
            glyph: "impostor".to_string(),
            max_hp: 1,
            movement: None,
        });
        assert_eq!(result, Err(RegistryError::AlreadyDefined('Q')));
        assert_eq!(registry.lookup('Q').max_hp, 7);
    }

    #[test]
    fn wire_definition_defaults_missing_hit_points() {
        let def: NewPieceDefinition = serde_json::from_value(serde_json::json!({
            "fenChar": "G",
            "displayChar": "🦅",
            "description": "Griffin, flies over terrain",
        }))
        .unwrap();
        assert_eq!(def.max_hp, DEFAULT_PIECE_MAX_HP);

        let proto = PiecePrototype::from(def);
        assert_eq!(proto.symbol, 'G');
        assert_eq!(proto.glyph, "🦅");
        assert!(proto.movement.is_some());
    }

    #[test]
    fn dynamic_lookup_prefers_dynamic_catalog() {
        let mut registry = PieceRegistry::new();
        registry
            .register(PiecePrototype {
                symbol: 'S',
                glyph: "shark".to_string(),
                max_hp: 6,
                movement: Some("swims along moats".to_string()),
            })
            .unwrap();
        assert_eq!(registry.lookup('S').max_hp, 6);
        assert_eq!(registry.dynamic_count(), 1);
    }
}
