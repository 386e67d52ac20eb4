//! Board-state model for a rules-extensible chess variant.
//!
//! The position notation is FEN-shaped but carries no fixed dimensions
//! or piece alphabet; hit points and dynamic piece definitions live in
//! registries beside the notation, and a transition auditor checks the
//! oracle's claimed board changes against its own narrative.

pub mod audit;
pub mod display;
pub mod fen;
pub mod project;
pub mod registry;
pub mod side;
pub mod square;
pub mod standard;
pub mod terrain;

pub use audit::{audit_transition, AuditOutcome};
pub use display::render_board;
pub use fen::{is_standard_setup, Occupant, Position, PositionError};
pub use project::{project, PieceGrid, PieceInstance};
pub use registry::{
    NewPieceDefinition, PiecePrototype, PieceRegistry, RegistryError, DEFAULT_PIECE_MAX_HP,
};
pub use side::{Side, SideRecord, SideRegistry, SideRegistryError};
pub use standard::{game_status, legal_moves_san, try_standard_move, GameOutcome, StandardMove};
pub use terrain::{TerrainAction, TerrainChange, TerrainMap, TerrainObject};

/// The standard opening position.
pub const INITIAL_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";
