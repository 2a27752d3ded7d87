//! In-memory game session: current state, history and automated players

use crate::ai::{selector_for, FirstCandidate, MoveSelector};
use crate::board::Hex;
use crate::error::{IllegalMove, NoLegalMove};
use crate::game::{GameResult, GameState};
use crate::pieces::{Color, PieceType};
use crate::ruleset::RuleSet;

/// Owns the one mutable thing in a game: which state is current. Every
/// accepted action swaps in a new state and keeps the old one for undo.
pub struct Session {
    state: GameState,
    history: Vec<GameState>,
    /// Indexed by `Color::index`; built lazily for human colors
    selectors: [Option<Box<dyn MoveSelector>>; 2],
}

impl Session {
    pub fn new(state: GameState) -> Self {
        let selectors = Color::ALL.map(|color| {
            let player = state.player(color);
            player.automated.then(|| selector_for(player))
        });
        Self {
            state,
            history: Vec::new(),
            selectors,
        }
    }

    pub fn from_ruleset(ruleset: &RuleSet) -> Self {
        Self::new(ruleset.to_game_state())
    }

    /// Replace the selector used for `color`
    pub fn with_selector(mut self, color: Color, selector: Box<dyn MoveSelector>) -> Self {
        self.selectors[color.index()] = Some(selector);
        self
    }

    pub fn current(&self) -> &GameState {
        &self.state
    }

    /// Prior states, oldest first
    pub fn history(&self) -> &[GameState] {
        &self.history
    }

    /// Whether the color to move is driven by a selector
    pub fn is_automated_turn(&self) -> bool {
        self.state.active_player().automated
    }

    fn commit(&mut self, next: GameState) -> &GameState {
        let previous = std::mem::replace(&mut self.state, next);
        self.history.push(previous);

        match self.state.result() {
            GameResult::Ongoing => {}
            result => tracing::info!(?result, turn = self.state.turn(), "game over"),
        }
        &self.state
    }

    pub fn attempt_move(&mut self, hex: Hex, piece_type: PieceType) -> Result<&GameState, IllegalMove> {
        let next = self.state.attempt_move(hex, piece_type)?;
        Ok(self.commit(next))
    }

    pub fn pass(&mut self) -> Result<&GameState, IllegalMove> {
        let next = self.state.pass()?;
        tracing::warn!(color = %self.state.current_player(), turn = self.state.turn(), "forced pass");
        Ok(self.commit(next))
    }

    /// Let the selector for the color to move act. A color that cannot place
    /// passes instead, so automated play never stalls on an unchanged state.
    pub fn request_automated_move(&mut self) -> Result<&GameState, NoLegalMove> {
        if self.state.is_over() {
            return Err(NoLegalMove::GameOver);
        }
        if self.state.must_pass() {
            return Ok(self.pass()?);
        }

        let color = self.state.current_player();
        let selector = self.selectors[color.index()].get_or_insert_with(|| Box::new(FirstCandidate));
        tracing::debug!(%color, selector = selector.name(), "requesting automated move");

        let next = self.state.request_automated_move(selector.as_mut())?;
        Ok(self.commit(next))
    }

    /// Step back one action. Returns false at the start of the game.
    pub fn undo(&mut self) -> bool {
        match self.history.pop() {
            Some(previous) => {
                self.state = previous;
                true
            }
            None => false,
        }
    }

    /// Drive automated colors until the game ends, a human is to move, or
    /// `max_actions` actions have been taken
    pub fn play_automated(&mut self, max_actions: usize) -> GameResult {
        let mut actions = 0;
        while actions < max_actions && !self.state.is_over() && self.is_automated_turn() {
            if let Err(e) = self.request_automated_move() {
                tracing::warn!(error = %e, "automated move failed");
                break;
            }
            actions += 1;
        }
        self.state.result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pieces::BagComposition;
    use crate::player::Player;
    use crate::ruleset::PlayerSetup;

    fn automated_ruleset(depth: Option<u32>) -> RuleSet {
        RuleSet {
            black: PlayerSetup::automated(depth),
            white: PlayerSetup::automated(depth),
            ..RuleSet::default()
        }
    }

    #[test]
    fn test_attempt_and_undo() {
        let mut session = Session::new(GameState::standard());
        session.attempt_move(Hex::ORIGIN, PieceType::Queen).unwrap();
        assert_eq!(session.history().len(), 1);
        assert_eq!(session.current().current_player(), Color::White);

        assert!(session.undo());
        assert_eq!(session.current().current_player(), Color::Black);
        assert!(session.current().occupied_coordinates().is_empty());
        assert!(!session.undo());
    }

    #[test]
    fn test_rejected_move_keeps_state() {
        let mut session = Session::new(GameState::standard());
        let err = session.attempt_move(Hex::new(4, 4), PieceType::Ant).unwrap_err();
        assert_eq!(err, IllegalMove::UnknownCell);
        assert!(session.history().is_empty());
        assert_eq!(session.current().turn(), 1);
    }

    #[test]
    fn test_human_turn_stops_automation() {
        let mut session = Session::new(GameState::standard());
        assert!(!session.is_automated_turn());
        assert_eq!(session.play_automated(10), GameResult::Ongoing);
        assert!(session.history().is_empty());
    }

    #[test]
    fn test_baseline_game_runs_to_completion() {
        let mut session = Session::from_ruleset(&automated_ruleset(None));
        let bag_size = BagComposition::default().total();
        let result = session.play_automated(10 * bag_size);

        assert_ne!(result, GameResult::Ongoing);
        let final_state = session.current();
        assert!(final_state.occupied_coordinates().len() <= 2 * bag_size);
    }

    #[test]
    fn test_search_game_makes_progress() {
        let mut session = Session::from_ruleset(&automated_ruleset(Some(1)));
        session.play_automated(6);
        assert_eq!(session.history().len(), 6);
        assert_eq!(session.current().turn(), 4);
    }

    #[test]
    fn test_automated_request_on_finished_game() {
        let ruleset = RuleSet {
            bag: BagComposition {
                queen: 1,
                ant: 0,
                grasshopper: 0,
                spider: 0,
                beetle: 0,
            },
            ..automated_ruleset(None)
        };
        let mut session = Session::from_ruleset(&ruleset);
        assert_eq!(session.play_automated(10), GameResult::Draw);
        assert_eq!(session.request_automated_move().unwrap_err(), NoLegalMove::GameOver);
    }

    #[test]
    fn test_stuck_color_passes_on_request() {
        let queen_only = BagComposition {
            queen: 1,
            ant: 0,
            grasshopper: 0,
            spider: 0,
            beetle: 0,
        };
        let queen_and_ants = BagComposition { ant: 2, ..queen_only };
        let state = GameState::new(
            Player::with_bag(Color::Black, &queen_only),
            Player::with_bag(Color::White, &queen_and_ants),
        );

        let mut session = Session::new(state);
        session.attempt_move(Hex::ORIGIN, PieceType::Queen).unwrap();
        session.attempt_move(Hex::new(1, 0), PieceType::Queen).unwrap();
        assert!(session.current().must_pass());

        let after = session.request_automated_move().unwrap();
        assert_eq!(after.current_player(), Color::White);
        assert_eq!(after.result(), GameResult::Ongoing);
        assert_eq!(session.history().len(), 3);
        assert_eq!(session.current().occupied_coordinates().len(), 2);
    }
}
