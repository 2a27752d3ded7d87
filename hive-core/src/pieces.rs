//! Piece type definitions

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Player color
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Color {
    Black = 0,
    White = 1,
}

impl Color {
    pub const ALL: [Color; 2] = [Color::Black, Color::White];

    pub fn opponent(self) -> Self {
        match self {
            Color::Black => Color::White,
            Color::White => Color::Black,
        }
    }

    /// Index into per-color arrays
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Black => write!(f, "BLACK"),
            Color::White => write!(f, "WHITE"),
        }
    }
}

/// Piece type. `Empty` only ever appears in the frontier sentinel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PieceType {
    Empty,
    Queen,
    Ant,
    Grasshopper,
    Spider,
    Beetle,
}

/// Types a player can hold in a bag, in bag order
pub const PLACEABLE_TYPES: [PieceType; 5] = [
    PieceType::Queen,
    PieceType::Ant,
    PieceType::Grasshopper,
    PieceType::Spider,
    PieceType::Beetle,
];

impl PieceType {
    pub fn name(self) -> &'static str {
        match self {
            PieceType::Empty => "EMPTY",
            PieceType::Queen => "QUEEN",
            PieceType::Ant => "ANT",
            PieceType::Grasshopper => "GRASSHOPPER",
            PieceType::Spider => "SPIDER",
            PieceType::Beetle => "BEETLE",
        }
    }

    /// Single-letter tag used by text views
    pub fn letter(self) -> char {
        match self {
            PieceType::Empty => '.',
            PieceType::Queen => 'Q',
            PieceType::Ant => 'A',
            PieceType::Grasshopper => 'G',
            PieceType::Spider => 'S',
            PieceType::Beetle => 'B',
        }
    }
}

impl fmt::Display for PieceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Unknown piece name
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown piece type: {0:?}")]
pub struct ParsePieceTypeError(pub String);

impl FromStr for PieceType {
    type Err = ParsePieceTypeError;

    /// Accepts full names or single letters, case-insensitive
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "Q" | "QUEEN" => Ok(PieceType::Queen),
            "A" | "ANT" => Ok(PieceType::Ant),
            "G" | "GRASSHOPPER" => Ok(PieceType::Grasshopper),
            "S" | "SPIDER" => Ok(PieceType::Spider),
            "B" | "BEETLE" => Ok(PieceType::Beetle),
            _ => Err(ParsePieceTypeError(s.to_string())),
        }
    }
}

/// A piece on the board or in a bag
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    pub piece_type: PieceType,
    pub owner: Option<Color>,
}

impl Piece {
    /// Sentinel held by known-but-unoccupied cells
    pub const EMPTY: Piece = Piece {
        piece_type: PieceType::Empty,
        owner: None,
    };

    pub const fn new(piece_type: PieceType, owner: Color) -> Self {
        Self {
            piece_type,
            owner: Some(owner),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.piece_type == PieceType::Empty
    }

    pub fn is_queen(&self) -> bool {
        self.piece_type == PieceType::Queen
    }

    pub fn same_color_as(&self, other: &Piece) -> bool {
        self.owner == other.owner
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.owner {
            Some(color) => write!(f, "{} {}", color, self.piece_type),
            None => f.write_str("EMPTY"),
        }
    }
}

/// Number of pieces of each type in a standard bag
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BagComposition {
    pub queen: u8,
    pub ant: u8,
    pub grasshopper: u8,
    pub spider: u8,
    pub beetle: u8,
}

impl Default for BagComposition {
    fn default() -> Self {
        Self {
            queen: 1,
            ant: 3,
            grasshopper: 3,
            spider: 2,
            beetle: 2,
        }
    }
}

impl BagComposition {
    pub fn count(&self, piece_type: PieceType) -> u8 {
        match piece_type {
            PieceType::Empty => 0,
            PieceType::Queen => self.queen,
            PieceType::Ant => self.ant,
            PieceType::Grasshopper => self.grasshopper,
            PieceType::Spider => self.spider,
            PieceType::Beetle => self.beetle,
        }
    }

    pub fn total(&self) -> usize {
        PLACEABLE_TYPES.iter().map(|&pt| self.count(pt) as usize).sum()
    }

    /// Build the ordered bag for one color
    pub fn build(&self, color: Color) -> Vec<Piece> {
        PLACEABLE_TYPES
            .iter()
            .flat_map(|&pt| std::iter::repeat(Piece::new(pt, color)).take(self.count(pt) as usize))
            .collect()
    }
}
