//! Hex board geometry with axial coordinates, and the stacked-cell board

use crate::error::{HexParseError, IllegalMove};
use crate::pieces::{Color, Piece};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

// ============================================================================
// COORDINATES
// ============================================================================

/// Axial hex coordinates
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Hex {
    pub x: i32,
    pub y: i32,
}

impl Hex {
    pub const ORIGIN: Hex = Hex::new(0, 0);

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Get neighbor in direction
    pub fn neighbor(&self, direction: Direction) -> Hex {
        let (dx, dy) = direction.offset();
        Hex::new(self.x + dx, self.y + dy)
    }

    /// All six neighbors, in `Direction::ALL` order
    pub fn neighbors(&self) -> [Hex; 6] {
        Direction::ALL.map(|d| self.neighbor(d))
    }

    pub fn is_adjacent(&self, other: Hex) -> bool {
        self.neighbors().contains(&other)
    }

    /// Canonical `"{x}~{y}"` key
    pub fn key(&self) -> String {
        self.to_string()
    }

    /// Row-major ordering used wherever enumeration must be deterministic
    fn reading_order(&self) -> (i32, i32) {
        (self.y, self.x)
    }
}

impl fmt::Display for Hex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}~{}", self.x, self.y)
    }
}

impl FromStr for Hex {
    type Err = HexParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || HexParseError(s.to_string());
        let (x, y) = s.split_once('~').ok_or_else(err)?;
        let x = x.parse().map_err(|_| err())?;
        let y = y.parse().map_err(|_| err())?;
        Ok(Hex::new(x, y))
    }
}

/// The six neighbor directions
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    UpLeft,
    UpRight,
    Right,
    DownRight,
    DownLeft,
    Left,
}

impl Direction {
    pub const ALL: [Direction; 6] = [
        Direction::UpLeft,
        Direction::UpRight,
        Direction::Right,
        Direction::DownRight,
        Direction::DownLeft,
        Direction::Left,
    ];

    pub fn offset(self) -> (i32, i32) {
        DIRECTIONS[self as usize]
    }
}

/// Direction vectors (dx, dy), indexed like `Direction::ALL`
pub const DIRECTIONS: [(i32, i32); 6] = [
    (0, -1),  // up-left
    (1, -1),  // up-right
    (1, 0),   // right
    (0, 1),   // down-right
    (-1, 1),  // down-left
    (-1, 0),  // left
];

pub fn neighbor(direction: Direction, point: Hex) -> Hex {
    point.neighbor(direction)
}

pub fn key(point: Hex) -> String {
    point.key()
}

pub fn from_key(key: &str) -> Result<Hex, HexParseError> {
    key.parse()
}

// ============================================================================
// CELLS
// ============================================================================

/// Stack of pieces at one coordinate, bottom to top. Never empty: an
/// unoccupied cell holds exactly one `Piece::EMPTY`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cell(Vec<Piece>);

impl Cell {
    fn empty() -> Self {
        Cell(vec![Piece::EMPTY])
    }

    /// Visible occupant
    pub fn top(&self) -> Piece {
        self.0.last().copied().unwrap_or(Piece::EMPTY)
    }

    pub fn pieces(&self) -> &[Piece] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.top().is_empty()
    }

    /// Number of real pieces in the stack
    pub fn height(&self) -> usize {
        self.0.iter().filter(|p| !p.is_empty()).count()
    }
}

// ============================================================================
// QUEENS AND SCORE
// ============================================================================

/// Where each color's queen was placed
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueenPositions {
    pub black: Option<Hex>,
    pub white: Option<Hex>,
}

impl QueenPositions {
    pub fn get(&self, color: Color) -> Option<Hex> {
        match color {
            Color::Black => self.black,
            Color::White => self.white,
        }
    }

    fn set(&mut self, color: Color, hex: Hex) {
        match color {
            Color::Black => self.black = Some(hex),
            Color::White => self.white = Some(hex),
        }
    }
}

/// Occupied neighbors around each queen. Black's count is positive and
/// White's negated, so Black wants `total()` low and White wants it high.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    pub black: i32,
    pub white: i32,
}

impl Score {
    pub fn total(&self) -> i32 {
        self.black + self.white
    }

    /// Total seen from `color`'s side, higher is better
    pub fn for_color(&self, color: Color) -> i32 {
        match color {
            Color::Black => -self.total(),
            Color::White => self.total(),
        }
    }
}

// ============================================================================
// BOARD
// ============================================================================

/// Immutable board value. Every operation returns a new board; the cell map
/// is shared between versions and copied on write.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Board {
    cells: Arc<FxHashMap<Hex, Cell>>,
    queens: QueenPositions,
}

impl Board {
    /// Board with no known cells
    pub fn new() -> Self {
        Self::default()
    }

    /// Board with a single empty cell at the origin, where the first piece goes
    pub fn seeded() -> Self {
        let mut cells = FxHashMap::default();
        cells.insert(Hex::ORIGIN, Cell::empty());
        Self {
            cells: Arc::new(cells),
            queens: QueenPositions::default(),
        }
    }

    // ========================================================================
    // QUERIES
    // ========================================================================

    /// Top piece at `hex`; `None` if the coordinate is not known to the board
    pub fn top_piece(&self, hex: Hex) -> Option<Piece> {
        self.cells.get(&hex).map(Cell::top)
    }

    pub fn cell(&self, hex: Hex) -> Option<&Cell> {
        self.cells.get(&hex)
    }

    pub fn contains(&self, hex: Hex) -> bool {
        self.cells.contains_key(&hex)
    }

    pub fn is_empty_cell(&self, hex: Hex) -> bool {
        self.top_piece(hex).map_or(false, |p| p.is_empty())
    }

    /// Number of known cells, frontier included
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Iterate known cells (unordered)
    pub fn cells(&self) -> impl Iterator<Item = (Hex, &Cell)> + '_ {
        self.cells.iter().map(|(&hex, cell)| (hex, cell))
    }

    /// Coordinates holding a real piece, in reading order
    pub fn occupied_coordinates(&self) -> Vec<Hex> {
        let mut occupied: Vec<Hex> = self
            .cells
            .iter()
            .filter(|(_, cell)| !cell.is_empty())
            .map(|(&hex, _)| hex)
            .collect();
        occupied.sort_unstable_by_key(Hex::reading_order);
        occupied
    }

    pub fn queens(&self) -> QueenPositions {
        self.queens
    }

    /// Smallest and largest x and y over known cells
    pub fn bounds(&self) -> Option<(Hex, Hex)> {
        let mut hexes = self.cells.keys();
        let first = *hexes.next()?;
        Some(hexes.fold((first, first), |(lo, hi), h| {
            (
                Hex::new(lo.x.min(h.x), lo.y.min(h.y)),
                Hex::new(hi.x.max(h.x), hi.y.max(h.y)),
            )
        }))
    }

    fn occupied_neighbors(&self, hex: Hex) -> usize {
        hex.neighbors()
            .iter()
            .filter(|&&n| self.top_piece(n).map_or(false, |p| !p.is_empty()))
            .count()
    }

    /// True iff all six neighbors are known and none is empty
    pub fn is_surrounded(&self, hex: Hex) -> bool {
        self.occupied_neighbors(hex) == 6
    }

    pub fn score(&self) -> Score {
        Score {
            black: self
                .queens
                .black
                .map_or(0, |q| self.occupied_neighbors(q) as i32),
            white: self
                .queens
                .white
                .map_or(0, |q| -(self.occupied_neighbors(q) as i32)),
        }
    }

    // ========================================================================
    // PLACEMENT RULES
    // ========================================================================

    /// (any friendly neighbor, any opposing neighbor) around `hex`
    fn neighbor_colors(&self, hex: Hex, piece: &Piece) -> (bool, bool) {
        hex.neighbors()
            .iter()
            .filter_map(|&n| self.top_piece(n))
            .filter(|p| !p.is_empty())
            .fold((false, false), |(matching, conflicting), p| {
                if p.same_color_as(piece) {
                    (true, conflicting)
                } else {
                    (matching, true)
                }
            })
    }

    /// Color rule only: anything goes on turn 1, afterwards the cell must
    /// touch a friendly piece and no opposing one.
    pub fn can_place(&self, hex: Hex, piece: &Piece, turn: u32) -> bool {
        if turn <= 1 {
            return true;
        }
        let (matching, conflicting) = self.neighbor_colors(hex, piece);
        matching && !conflicting
    }

    /// Full placement check with the reason it fails
    pub fn check_placement(&self, hex: Hex, piece: &Piece, turn: u32) -> Result<(), IllegalMove> {
        let top = self.top_piece(hex).ok_or(IllegalMove::UnknownCell)?;
        if !top.is_empty() {
            return Err(IllegalMove::TargetNotEmpty);
        }
        if turn <= 1 {
            return Ok(());
        }
        match self.neighbor_colors(hex, piece) {
            (_, true) => Err(IllegalMove::ColorConflict),
            (false, false) => Err(IllegalMove::Isolated),
            (true, false) => Ok(()),
        }
    }

    /// Empty known cells where `piece` may go, in reading order
    pub fn legal_placements(&self, piece: &Piece, turn: u32) -> Vec<Hex> {
        let mut spots: Vec<Hex> = self
            .cells
            .iter()
            .filter(|(_, cell)| cell.is_empty())
            .map(|(&hex, _)| hex)
            .filter(|&hex| self.can_place(hex, piece, turn))
            .collect();
        spots.sort_unstable_by_key(Hex::reading_order);
        spots
    }

    /// Boards resulting from each legal placement of `piece`
    pub fn placement_boards(&self, piece: &Piece, turn: u32) -> Vec<(Hex, Board)> {
        self.legal_placements(piece, turn)
            .into_iter()
            .map(|hex| (hex, self.place(hex, *piece)))
            .collect()
    }

    // ========================================================================
    // TRANSFORMS
    // ========================================================================

    /// Put `piece` at `hex`, stacking if the cell is occupied
    pub fn place(&self, hex: Hex, piece: Piece) -> Board {
        if piece.is_empty() {
            return self.clone();
        }

        let mut next = self.clone();
        let cells = Arc::make_mut(&mut next.cells);

        match cells.get_mut(&hex) {
            Some(cell) if !cell.is_empty() => cell.0.push(piece),
            _ => {
                cells.insert(hex, Cell(vec![piece]));
            }
        }
        for n in hex.neighbors() {
            cells.entry(n).or_insert_with(Cell::empty);
        }

        if piece.is_queen() {
            if let Some(color) = piece.owner {
                next.queens.set(color, hex);
            }
        }
        next
    }

    /// Pop the top piece at `hex`, returning it with the new board.
    /// `None` for unknown or empty cells.
    pub fn take(&self, hex: Hex) -> Option<(Piece, Board)> {
        let top = self.top_piece(hex).filter(|p| !p.is_empty())?;

        let mut next = self.clone();
        if let Some(cell) = Arc::make_mut(&mut next.cells).get_mut(&hex) {
            cell.0.pop();
            if cell.0.is_empty() {
                cell.0.push(Piece::EMPTY);
            }
        }
        Some((top, next))
    }

    /// Pop the top piece at `hex`. The queen cache is left alone.
    pub fn remove(&self, hex: Hex) -> Board {
        match self.take(hex) {
            Some((_, next)) => next,
            None => self.clone(),
        }
    }

    /// Transfer the top piece of `from` onto `to`
    pub fn move_piece(&self, from: Hex, to: Hex) -> Board {
        match self.take(from) {
            Some((piece, next)) => next.place(to, piece),
            None => self.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pieces::PieceType;

    fn black(pt: PieceType) -> Piece {
        Piece::new(pt, Color::Black)
    }

    fn white(pt: PieceType) -> Piece {
        Piece::new(pt, Color::White)
    }

    #[test]
    fn test_key_round_trip() {
        for hex in [Hex::new(0, 0), Hex::new(-3, 7), Hex::new(12, -40)] {
            assert_eq!(from_key(&key(hex)), Ok(hex));
        }
        assert_eq!(Hex::new(-1, 2).key(), "-1~2");
        assert!(from_key("1,2").is_err());
        assert!(from_key("a~2").is_err());
    }

    #[test]
    fn test_neighbor_vectors() {
        let p = Hex::new(2, 5);
        assert_eq!(neighbor(Direction::UpLeft, p), Hex::new(2, 4));
        assert_eq!(neighbor(Direction::UpRight, p), Hex::new(3, 4));
        assert_eq!(neighbor(Direction::Right, p), Hex::new(3, 5));
        assert_eq!(neighbor(Direction::DownRight, p), Hex::new(2, 6));
        assert_eq!(neighbor(Direction::DownLeft, p), Hex::new(1, 6));
        assert_eq!(neighbor(Direction::Left, p), Hex::new(1, 5));
        for n in p.neighbors() {
            assert!(n.is_adjacent(p));
        }
    }

    #[test]
    fn test_place_queen_on_seed() {
        let board = Board::seeded().place(Hex::ORIGIN, black(PieceType::Queen));

        assert_eq!(board.top_piece(Hex::ORIGIN), Some(black(PieceType::Queen)));
        for n in Hex::ORIGIN.neighbors() {
            assert_eq!(board.top_piece(n), Some(Piece::EMPTY));
        }
        assert_eq!(board.queens().black, Some(Hex::ORIGIN));
        assert_eq!(board.queens().black.map(|q| q.key()).as_deref(), Some("0~0"));
        assert_eq!(board.len(), 7);
    }

    #[test]
    fn test_place_leaves_original_untouched() {
        let before = Board::seeded();
        let after = before.place(Hex::ORIGIN, black(PieceType::Ant));
        assert_eq!(before.top_piece(Hex::ORIGIN), Some(Piece::EMPTY));
        assert_eq!(before.len(), 1);
        assert_ne!(before, after);
    }

    #[test]
    fn test_stacking_and_remove() {
        let board = Board::seeded()
            .place(Hex::ORIGIN, black(PieceType::Ant))
            .place(Hex::ORIGIN, white(PieceType::Beetle));

        let cell = board.cell(Hex::ORIGIN).unwrap();
        assert_eq!(cell.height(), 2);
        assert_eq!(cell.top(), white(PieceType::Beetle));

        let popped = board.remove(Hex::ORIGIN);
        assert_eq!(popped.top_piece(Hex::ORIGIN), Some(black(PieceType::Ant)));

        let cleared = popped.remove(Hex::ORIGIN);
        assert_eq!(cleared.cell(Hex::ORIGIN).unwrap().pieces(), &[Piece::EMPTY]);

        // Removing from an empty or unknown cell is a no-op
        assert_eq!(cleared.remove(Hex::ORIGIN), cleared);
        assert_eq!(cleared.remove(Hex::new(50, 50)), cleared);
    }

    #[test]
    fn test_remove_keeps_queen_cache() {
        let board = Board::seeded().place(Hex::ORIGIN, white(PieceType::Queen));
        let removed = board.remove(Hex::ORIGIN);
        assert_eq!(removed.queens().white, Some(Hex::ORIGIN));
    }

    #[test]
    fn test_move_matches_direct_transfer() {
        let from = Hex::ORIGIN;
        let to = Hex::new(1, 0);
        let board = Board::seeded()
            .place(from, black(PieceType::Spider))
            .place(from, black(PieceType::Beetle));

        let moved = board.move_piece(from, to);
        assert_eq!(moved.top_piece(from), Some(black(PieceType::Spider)));
        assert_eq!(moved.cell(to).unwrap().pieces(), &[black(PieceType::Beetle)]);

        let direct = board.remove(from).place(to, black(PieceType::Beetle));
        assert_eq!(moved, direct);
    }

    #[test]
    fn test_move_queen_updates_cache() {
        let board = Board::seeded().place(Hex::ORIGIN, black(PieceType::Queen));
        let moved = board.move_piece(Hex::ORIGIN, Hex::new(0, 1));
        assert_eq!(moved.queens().black, Some(Hex::new(0, 1)));
        assert_eq!(moved.top_piece(Hex::ORIGIN), Some(Piece::EMPTY));
    }

    #[test]
    fn test_can_place_turn_one() {
        let board = Board::seeded().place(Hex::ORIGIN, black(PieceType::Queen));
        let far = Hex::new(9, 9);
        assert!(board.can_place(far, &white(PieceType::Ant), 1));
        assert!(board.can_place(Hex::new(1, 0), &white(PieceType::Ant), 1));
    }

    #[test]
    fn test_can_place_color_rule() {
        let board = Board::seeded()
            .place(Hex::ORIGIN, black(PieceType::Queen))
            .place(Hex::new(2, 0), white(PieceType::Queen));

        // (1, 0) touches both colors
        assert!(!board.can_place(Hex::new(1, 0), &black(PieceType::Ant), 2));
        assert!(!board.can_place(Hex::new(1, 0), &white(PieceType::Ant), 2));
        // (-1, 0) touches only black
        assert!(board.can_place(Hex::new(-1, 0), &black(PieceType::Ant), 2));
        assert!(!board.can_place(Hex::new(-1, 0), &white(PieceType::Ant), 2));
        // isolated
        assert!(!board.can_place(Hex::new(-5, 0), &black(PieceType::Ant), 2));
    }

    #[test]
    fn test_check_placement_reasons() {
        let board = Board::seeded()
            .place(Hex::ORIGIN, black(PieceType::Queen))
            .place(Hex::new(2, 0), white(PieceType::Queen));
        let ant = black(PieceType::Ant);

        assert_eq!(board.check_placement(Hex::ORIGIN, &ant, 2), Err(IllegalMove::TargetNotEmpty));
        assert_eq!(board.check_placement(Hex::new(1, 0), &ant, 2), Err(IllegalMove::ColorConflict));
        assert_eq!(board.check_placement(Hex::new(20, 0), &ant, 2), Err(IllegalMove::UnknownCell));
        assert_eq!(board.check_placement(Hex::new(-1, 0), &ant, 2), Ok(()));

        let lonely = Board::seeded();
        assert_eq!(lonely.check_placement(Hex::ORIGIN, &ant, 2), Err(IllegalMove::Isolated));
        assert_eq!(lonely.check_placement(Hex::ORIGIN, &ant, 1), Ok(()));
    }

    #[test]
    fn test_is_surrounded() {
        let mut board = Board::seeded().place(Hex::ORIGIN, black(PieceType::Queen));
        assert!(!board.is_surrounded(Hex::ORIGIN));

        let ring = Hex::ORIGIN.neighbors();
        for (i, &n) in ring.iter().enumerate() {
            assert!(!board.is_surrounded(Hex::ORIGIN), "surrounded after {} pieces", i);
            board = board.place(n, white(PieceType::Ant));
        }
        assert!(board.is_surrounded(Hex::ORIGIN));

        // Unknown neighbors never count as occupied
        assert!(!Board::new().is_surrounded(Hex::ORIGIN));
    }

    #[test]
    fn test_score_signs() {
        let board = Board::seeded()
            .place(Hex::ORIGIN, black(PieceType::Queen))
            .place(Hex::new(1, 0), white(PieceType::Queen))
            .place(Hex::new(0, 1), white(PieceType::Ant));

        let score = board.score();
        // black queen touches white queen and the ant
        assert_eq!(score.black, 2);
        // white queen touches the black queen and the ant
        assert_eq!(score.white, -2);
        assert_eq!(score.total(), 0);
        assert_eq!(Board::seeded().score(), Score::default());
    }

    #[test]
    fn test_legal_placements_order() {
        let board = Board::seeded().place(Hex::ORIGIN, black(PieceType::Queen));
        let spots = board.legal_placements(&black(PieceType::Ant), 2);
        assert_eq!(spots.len(), 6);
        assert_eq!(spots[0], Hex::new(0, -1));
        assert_eq!(spots[1], Hex::new(1, -1));
        assert_eq!(spots[5], Hex::new(0, 1));
        assert!(board.legal_placements(&white(PieceType::Ant), 2).is_empty());

        let boards = board.placement_boards(&black(PieceType::Ant), 2);
        assert_eq!(boards.len(), 6);
        assert_eq!(boards[0].1.top_piece(spots[0]), Some(black(PieceType::Ant)));
    }

    #[test]
    fn test_bounds_and_occupied() {
        let board = Board::seeded()
            .place(Hex::ORIGIN, black(PieceType::Queen))
            .place(Hex::new(1, 0), white(PieceType::Queen));
        assert_eq!(board.occupied_coordinates(), vec![Hex::ORIGIN, Hex::new(1, 0)]);
        let (lo, hi) = board.bounds().unwrap();
        assert_eq!(lo, Hex::new(-1, -1));
        assert_eq!(hi, Hex::new(2, 1));
        assert!(Board::new().bounds().is_none());
    }
}
