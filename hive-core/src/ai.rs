//! Move selection: deterministic baseline and alpha-beta search

use crate::error::NoLegalMove;
use crate::eval::{evaluate, evaluate_with_depth, WIN_VALUE};
use crate::game::{GameState, Placement};
use crate::player::Player;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;

/// Bound wider than any evaluation, safe to negate
const INFINITY: i32 = WIN_VALUE * 2;

/// Strategy that picks a placement for the color to move
pub trait MoveSelector: Send {
    fn name(&self) -> &str;

    /// Choose among `state.legal_moves()`. Never returns a no-op.
    fn select(&mut self, state: &GameState) -> Result<Placement, NoLegalMove>;
}

fn unavailable(state: &GameState) -> NoLegalMove {
    state.no_move_reason().unwrap_or(NoLegalMove::NoReachableCell)
}

/// Selector matching a player's configured search depth
pub fn selector_for(player: &Player) -> Box<dyn MoveSelector> {
    match player.search_depth {
        None | Some(0) => Box::new(FirstCandidate),
        Some(depth) => Box::new(AlphaBetaSelector::new(depth)),
    }
}

// ============================================================================
// BASELINE
// ============================================================================

/// Takes the first enumerated legal placement
#[derive(Clone, Copy, Debug, Default)]
pub struct FirstCandidate;

impl MoveSelector for FirstCandidate {
    fn name(&self) -> &str {
        "first-candidate"
    }

    fn select(&mut self, state: &GameState) -> Result<Placement, NoLegalMove> {
        state
            .legal_moves()
            .into_iter()
            .next()
            .ok_or_else(|| unavailable(state))
    }
}

// ============================================================================
// ALPHA-BETA
// ============================================================================

/// Negamax with alpha-beta pruning over placements
pub struct AlphaBetaSelector {
    pub depth: u32,
    /// Breaks ties randomly when set, otherwise the first best move wins
    rng: Option<ChaCha8Rng>,
}

impl AlphaBetaSelector {
    pub fn new(depth: u32) -> Self {
        Self { depth, rng: None }
    }

    pub fn with_seed(depth: u32, seed: u64) -> Self {
        Self {
            depth,
            rng: Some(ChaCha8Rng::seed_from_u64(seed)),
        }
    }

    /// Score every root placement, in `legal_moves` order
    pub fn score_moves(&self, state: &GameState) -> Vec<(Placement, i32)> {
        let depth = self.depth.max(1);
        let moves = state.legal_moves();

        // Boards are immutable, so root children search independently
        let scores: Vec<i32> = moves
            .par_iter()
            .map(|&mv| match state.apply(mv) {
                Ok(child) => -negamax(&child, depth - 1, -INFINITY, INFINITY),
                Err(_) => -INFINITY,
            })
            .collect();

        moves.into_iter().zip(scores).collect()
    }
}

impl MoveSelector for AlphaBetaSelector {
    fn name(&self) -> &str {
        "alpha-beta"
    }

    fn select(&mut self, state: &GameState) -> Result<Placement, NoLegalMove> {
        let mut moves = state.legal_moves();
        match moves.len() {
            0 => return Err(unavailable(state)),
            1 => return Ok(moves.remove(0)),
            _ => {}
        }

        let scored = self.score_moves(state);
        let best_score = scored
            .iter()
            .map(|&(_, score)| score)
            .max()
            .unwrap_or(-INFINITY);
        let tied: Vec<Placement> = scored
            .iter()
            .filter(|&&(_, score)| score == best_score)
            .map(|&(mv, _)| mv)
            .collect();

        let pick = match self.rng.as_mut() {
            Some(rng) => tied[rng.gen_range(0..tied.len())],
            None => tied[0],
        };

        tracing::debug!(
            color = %state.current_player(),
            depth = self.depth,
            candidates = scored.len(),
            tied = tied.len(),
            score = best_score,
            placement = %pick,
            "alpha-beta selection"
        );
        Ok(pick)
    }
}

fn negamax(state: &GameState, depth: u32, mut alpha: i32, beta: i32) -> i32 {
    if state.is_over() {
        return evaluate_with_depth(state, depth);
    }
    if depth == 0 {
        return evaluate(state);
    }

    let moves = state.legal_moves();
    if moves.is_empty() {
        // Forced pass is a ply of its own
        return match state.pass() {
            Ok(next) => -negamax(&next, depth - 1, -beta, -alpha),
            Err(_) => evaluate(state),
        };
    }

    // Search replies that look worst for the opponent first
    let mut children: Vec<GameState> = moves
        .into_iter()
        .filter_map(|mv| state.apply(mv).ok())
        .collect();
    children.sort_by_cached_key(evaluate);

    let mut best = -INFINITY;
    for child in &children {
        let score = -negamax(child, depth - 1, -beta, -alpha);
        best = best.max(score);
        alpha = alpha.max(score);
        if alpha >= beta {
            break;
        }
    }
    best
}

// ============================================================================
// TESTS
// ============================================================================
