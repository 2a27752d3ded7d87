//! Position evaluation

use crate::game::{GameResult, GameState};

/// Win value (effectively infinite)
pub const WIN_VALUE: i32 = 100_000;

/// Evaluate position from the perspective of the color to move
pub fn evaluate(state: &GameState) -> i32 {
    let current = state.current_player();
    match state.result() {
        GameResult::Ongoing => state.score().for_color(current),
        GameResult::Draw => 0,
        result => {
            if result.winner() == Some(current) {
                WIN_VALUE
            } else {
                -WIN_VALUE
            }
        }
    }
}

/// Evaluate with depth bonus for preferring faster wins
pub fn evaluate_with_depth(state: &GameState, depth: u32) -> i32 {
    let base = evaluate(state);
    match state.result() {
        GameResult::BlackWins | GameResult::WhiteWins => {
            // Win sooner is better (higher depth = closer to current position)
            if base > 0 {
                base + depth as i32
            } else {
                base - depth as i32
            }
        }
        GameResult::Ongoing | GameResult::Draw => base,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Hex;
    use crate::pieces::{Color, PieceType};

    #[test]
    fn test_evaluate_fresh_game() {
        assert_eq!(evaluate(&GameState::standard()), 0);
    }

    #[test]
    fn test_evaluate_orientation() {
        // Black queen with a White ant next to it: bad for Black
        let game = GameState::standard()
            .attempt_move(Hex::ORIGIN, PieceType::Queen)
            .unwrap()
            .attempt_move(Hex::new(1, 0), PieceType::Ant)
            .unwrap();

        assert_eq!(game.score().black, 1);
        assert_eq!(game.current_player(), Color::Black);
        assert_eq!(evaluate(&game), -1);

        let white_view = game.attempt_move(Hex::new(-1, 0), PieceType::Ant).unwrap();
        assert_eq!(white_view.current_player(), Color::White);
        assert_eq!(evaluate(&white_view), 2);
    }
}
