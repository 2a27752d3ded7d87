//! Game state and turn sequencing

use crate::ai::MoveSelector;
use crate::board::{Board, Hex, QueenPositions, Score};
use crate::error::{IllegalMove, NoLegalMove};
use crate::pieces::{Color, Piece, PieceType};
use crate::player::Player;
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// CORE TYPES
// ============================================================================

/// Game result
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameResult {
    Ongoing,
    BlackWins,
    WhiteWins,
    Draw,
}

impl GameResult {
    pub fn win_for(color: Color) -> Self {
        match color {
            Color::Black => GameResult::BlackWins,
            Color::White => GameResult::WhiteWins,
        }
    }

    pub fn winner(self) -> Option<Color> {
        match self {
            GameResult::BlackWins => Some(Color::Black),
            GameResult::WhiteWins => Some(Color::White),
            GameResult::Ongoing | GameResult::Draw => None,
        }
    }
}

/// What happens when the color to move has no legal placement
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoMoveRule {
    /// The color must pass; the game is drawn if neither side can place
    #[default]
    Pass,
    /// The color loses on the spot
    Loss,
}

/// A placement of a piece type from the bag onto a cell
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Placement {
    pub hex: Hex,
    pub piece_type: PieceType,
}

impl Placement {
    pub fn new(hex: Hex, piece_type: PieceType) -> Self {
        Self { hex, piece_type }
    }
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}", self.piece_type, self.hex)
    }
}

// ============================================================================
// GAME STATE
// ============================================================================

/// Game state. Every action returns a new state; the receiver never changes.
#[derive(Clone, Debug)]
pub struct GameState {
    board: Board,

    /// Indexed by `Color::index`
    players: [Player; 2],

    current: Color,
    first: Color,

    /// Round number (increments when play returns to the first color)
    turn: u32,

    result: GameResult,
    no_move_rule: NoMoveRule,
}

impl GameState {
    // ========================================================================
    // CONSTRUCTORS
    // ========================================================================

    /// New game, Black to move first, seeded origin cell
    pub fn new(black: Player, white: Player) -> Self {
        Self::with_rules(black, white, Color::Black, NoMoveRule::Pass)
    }

    /// Both colors human with standard bags
    pub fn standard() -> Self {
        Self::new(Player::new(Color::Black), Player::new(Color::White))
    }

    pub fn with_rules(black: Player, white: Player, first: Color, no_move_rule: NoMoveRule) -> Self {
        Self {
            board: Board::seeded(),
            players: [black, white],
            current: first,
            first,
            turn: 1,
            result: GameResult::Ongoing,
            no_move_rule,
        }
    }

    /// Resume a standard game (Black first, Pass rule) from an arbitrary
    /// position. See `from_position_with_rules`.
    pub fn from_position(board: Board, black: Player, white: Player, to_move: Color, turn: u32) -> Self {
        Self::from_position_with_rules(board, black, white, to_move, turn, Color::Black, NoMoveRule::Pass)
    }

    /// Resume from an arbitrary position. A queen already on the board is
    /// taken out of its owner's bag, so each color has at most one queen.
    /// The result is recomputed as if the opponent of `to_move` had just acted.
    pub fn from_position_with_rules(
        board: Board,
        black: Player,
        white: Player,
        to_move: Color,
        turn: u32,
        first: Color,
        no_move_rule: NoMoveRule,
    ) -> Self {
        let queens = board.queens();
        let players = [black, white].map(|player| match queens.get(player.color) {
            Some(_) => player.remove_from_bag(PieceType::Queen).unwrap_or(player),
            None => player,
        });

        let mut state = Self {
            board,
            players,
            current: to_move,
            first,
            turn: turn.max(1),
            result: GameResult::Ongoing,
            no_move_rule,
        };
        state.settle(to_move.opponent());
        state
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Color to move
    pub fn current_player(&self) -> Color {
        self.current
    }

    pub fn first_player(&self) -> Color {
        self.first
    }

    pub fn player(&self, color: Color) -> &Player {
        &self.players[color.index()]
    }

    /// Player record of the color to move
    pub fn active_player(&self) -> &Player {
        self.player(self.current)
    }

    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn result(&self) -> GameResult {
        self.result
    }

    pub fn winner(&self) -> Option<Color> {
        self.result.winner()
    }

    pub fn is_over(&self) -> bool {
        self.result != GameResult::Ongoing
    }

    pub fn no_move_rule(&self) -> NoMoveRule {
        self.no_move_rule
    }

    pub fn score(&self) -> Score {
        self.board.score()
    }

    pub fn queens(&self) -> QueenPositions {
        self.board.queens()
    }

    pub fn top_piece(&self, hex: Hex) -> Option<Piece> {
        self.board.top_piece(hex)
    }

    pub fn occupied_coordinates(&self) -> Vec<Hex> {
        self.board.occupied_coordinates()
    }

    // ========================================================================
    // MOVE GENERATION
    // ========================================================================

    /// Cells where the color to move may place `piece_type`
    pub fn legal_placements(&self, piece_type: PieceType) -> Vec<Hex> {
        if self.is_over() || !self.active_player().has(piece_type) {
            return vec![];
        }
        self.board
            .legal_placements(&Piece::new(piece_type, self.current), self.turn)
    }

    /// Every legal placement: bag order first, then reading order
    pub fn legal_moves(&self) -> Vec<Placement> {
        if self.is_over() {
            return vec![];
        }

        let mut moves = Vec::new();
        for piece_type in self.active_player().available_types() {
            let piece = Piece::new(piece_type, self.current);
            for hex in self.board.legal_placements(&piece, self.turn) {
                moves.push(Placement::new(hex, piece_type));
            }
        }
        moves
    }

    fn has_legal_move(&self) -> bool {
        self.active_player().available_types().into_iter().any(|piece_type| {
            let piece = Piece::new(piece_type, self.current);
            self.board
                .cells()
                .any(|(hex, cell)| cell.is_empty() && self.board.can_place(hex, &piece, self.turn))
        })
    }

    /// True when the color to move has nothing to place and must call `pass`
    pub fn must_pass(&self) -> bool {
        !self.is_over() && !self.has_legal_move()
    }

    /// Why the color to move cannot place anything, if it cannot
    pub fn no_move_reason(&self) -> Option<NoLegalMove> {
        if self.is_over() {
            Some(NoLegalMove::GameOver)
        } else if self.active_player().is_bag_empty() {
            Some(NoLegalMove::BagEmpty)
        } else if !self.has_legal_move() {
            Some(NoLegalMove::NoReachableCell)
        } else {
            None
        }
    }

    // ========================================================================
    // ACTIONS
    // ========================================================================

    /// Place a piece of `piece_type` from the active bag at `hex`
    pub fn attempt_move(&self, hex: Hex, piece_type: PieceType) -> Result<GameState, IllegalMove> {
        if self.is_over() {
            return Err(IllegalMove::GameOver);
        }

        let remaining = self.active_player().remove_from_bag(piece_type)?;
        let piece = Piece::new(piece_type, self.current);
        self.board.check_placement(hex, &piece, self.turn)?;

        Ok(self.commit(hex, piece, remaining))
    }

    /// Apply a placement taken from `legal_moves`, skipping the cell checks.
    /// The piece must still be in the active bag.
    pub(crate) fn apply(&self, placement: Placement) -> Result<GameState, IllegalMove> {
        let remaining = self.active_player().remove_from_bag(placement.piece_type)?;
        let piece = Piece::new(placement.piece_type, self.current);
        Ok(self.commit(placement.hex, piece, remaining))
    }

    /// Let `selector` choose for the color to move, then apply its choice
    pub fn request_automated_move(&self, selector: &mut dyn MoveSelector) -> Result<GameState, NoLegalMove> {
        let placement = selector.select(self)?;
        Ok(self.attempt_move(placement.hex, placement.piece_type)?)
    }

    /// Hand the turn over. Only allowed when no placement exists.
    pub fn pass(&self) -> Result<GameState, IllegalMove> {
        if self.is_over() {
            return Err(IllegalMove::GameOver);
        }
        if self.has_legal_move() {
            return Err(IllegalMove::MovesAvailable);
        }

        tracing::debug!(color = %self.current, turn = self.turn, "pass");
        let mut next = self.clone();
        next.advance_turn();
        if !next.has_legal_move() {
            next.resolve_stuck();
        }
        Ok(next)
    }

    /// Moving placed pieces is not part of this ruleset
    pub fn can_move(&self, _from: Hex, _to: Hex) -> bool {
        false
    }

    pub fn attempt_relocation(&self, _from: Hex, _to: Hex) -> Result<GameState, IllegalMove> {
        Err(IllegalMove::MovementUnsupported)
    }

    // ========================================================================
    // TURN HANDLING
    // ========================================================================

    fn commit(&self, hex: Hex, piece: Piece, remaining: Player) -> GameState {
        let mover = self.current;
        let mut next = self.clone();
        next.board = self.board.place(hex, piece);
        next.players[mover.index()] = remaining;

        tracing::trace!(color = %mover, turn = self.turn, %hex, piece = %piece.piece_type, "placed");

        next.advance_turn();
        next.settle(mover);
        next
    }

    fn advance_turn(&mut self) {
        self.current = self.current.opponent();
        if self.current == self.first {
            self.turn += 1;
        }
    }

    /// Win check after `mover` acted, then the no-move rule for the next color
    fn settle(&mut self, mover: Color) {
        let queens = self.board.queens();
        let surrounded = |q: Option<Hex>| q.map_or(false, |q| self.board.is_surrounded(q));

        self.result = match (surrounded(queens.black), surrounded(queens.white)) {
            (true, true) => GameResult::win_for(mover),
            (true, false) => GameResult::WhiteWins,
            (false, true) => GameResult::BlackWins,
            (false, false) => GameResult::Ongoing,
        };

        if self.is_over() {
            tracing::debug!(result = ?self.result, turn = self.turn, "queen surrounded");
            return;
        }
        if !self.has_legal_move() {
            self.resolve_stuck();
        }
    }

    /// The color to move has no placement
    fn resolve_stuck(&mut self) {
        match self.no_move_rule {
            NoMoveRule::Loss => {
                self.result = GameResult::win_for(self.current.opponent());
                tracing::debug!(color = %self.current, result = ?self.result, "no legal move, forfeit");
            }
            NoMoveRule::Pass => {
                let mut after_pass = self.clone();
                after_pass.advance_turn();
                if !after_pass.has_legal_move() {
                    self.result = GameResult::Draw;
                    tracing::debug!(turn = self.turn, "neither color can place, draw");
                }
            }
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
