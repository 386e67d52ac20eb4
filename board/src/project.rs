//! Projection of a parsed position into fully-typed piece instances.

use crate::fen::Position;
use crate::registry::PieceRegistry;
use crate::side::Side;

/// A prototype applied to an occupied square. Rebuilt on every
/// projection; the notation carries no damage information, so current
/// hit points always start at the maximum and damage is narrative-only
/// until a piece is removed outright.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PieceInstance {
    pub symbol: char,
    pub side: Side,
    pub glyph: String,
    pub current_hp: u32,
    pub max_hp: u32,
}

pub type PieceGrid = Vec<Vec<Option<PieceInstance>>>;

/// Resolve every occupied square against the registry. Pure; the only
/// failure mode is an upstream parse error, which callers hit before
/// this point.
pub fn project(position: &Position, registry: &PieceRegistry) -> PieceGrid {
    position
        .rows()
        .map(|row| {
            row.iter()
                .map(|square| {
                    square.as_ref().map(|occupant| {
                        let proto = registry.lookup(occupant.symbol);
                        PieceInstance {
                            symbol: occupant.symbol,
                            side: occupant.side.clone(),
                            glyph: proto.glyph,
                            current_hp: proto.max_hp,
                            max_hp: proto.max_hp,
                        }
                    })
                })
                .collect()
        })
        .collect()
}
