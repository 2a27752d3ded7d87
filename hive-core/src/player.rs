//! A color's remaining pieces and how it is driven

use crate::error::IllegalMove;
use crate::pieces::{BagComposition, Color, Piece, PieceType};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub color: Color,
    bag: Vec<Piece>,
    pub automated: bool,
    /// Lookahead in plies; `None` means the baseline selector
    pub search_depth: Option<u32>,
}

impl Player {
    /// Human player with a standard bag
    pub fn new(color: Color) -> Self {
        Self::with_bag(color, &BagComposition::default())
    }

    pub fn with_bag(color: Color, composition: &BagComposition) -> Self {
        Self {
            color,
            bag: composition.build(color),
            automated: false,
            search_depth: None,
        }
    }

    /// Mark as automated with the given lookahead
    pub fn automated(mut self, search_depth: Option<u32>) -> Self {
        self.automated = true;
        self.search_depth = search_depth;
        self
    }

    /// Remaining pieces, in bag order
    pub fn bag(&self) -> &[Piece] {
        &self.bag
    }

    pub fn is_bag_empty(&self) -> bool {
        self.bag.is_empty()
    }

    pub fn has(&self, piece_type: PieceType) -> bool {
        self.bag.iter().any(|p| p.piece_type == piece_type)
    }

    pub fn count(&self, piece_type: PieceType) -> usize {
        self.bag.iter().filter(|p| p.piece_type == piece_type).count()
    }

    /// Distinct types still in the bag, in bag order
    pub fn available_types(&self) -> Vec<PieceType> {
        let mut types: Vec<PieceType> = Vec::new();
        for piece in &self.bag {
            if !types.contains(&piece.piece_type) {
                types.push(piece.piece_type);
            }
        }
        types
    }

    /// Default selection for a fresh turn
    pub fn first_available(&self) -> Option<Piece> {
        self.bag.first().copied()
    }

    /// New player with the first piece of `piece_type` taken out
    pub fn remove_from_bag(&self, piece_type: PieceType) -> Result<Player, IllegalMove> {
        let index = self
            .bag
            .iter()
            .position(|p| p.piece_type == piece_type)
            .ok_or(IllegalMove::PieceNotInBag)?;

        let mut next = self.clone();
        next.bag.remove(index);
        Ok(next)
    }
}
