//! Hive Core - Placement-only Hive engine and AI
//!
//! This crate provides the core game logic:
//! - Board geometry (hex grid with axial coordinates, persistent stacks)
//! - Piece types and per-color bags
//! - Game state, placement rules and turn flow
//! - Queen-pressure evaluation
//! - Baseline and alpha-beta move selection
//! - Session history with undo

pub mod board;
pub mod error;
pub mod pieces;
pub mod player;
pub mod game;
pub mod eval;
pub mod ai;
pub mod ruleset;
pub mod session;

// Re-exports for convenient access
pub use board::{from_key, key, neighbor, Board, Cell, Direction, Hex, QueenPositions, Score, DIRECTIONS};
pub use error::{HexParseError, IllegalMove, NoLegalMove};
pub use pieces::{BagComposition, Color, Piece, PieceType, PLACEABLE_TYPES};
pub use player::Player;
pub use game::{GameResult, GameState, NoMoveRule, Placement};
pub use eval::{evaluate, WIN_VALUE};
pub use ai::{selector_for, AlphaBetaSelector, FirstCandidate, MoveSelector};
pub use ruleset::{PlayerSetup, RuleSet};
pub use session::Session;
