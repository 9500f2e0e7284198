use crate::engine::config::EngineConfig;
use crate::engine::{Evaluator, Move};
use crate::logic::board::{Board, Square};
use crate::logic::game::GameState;
use crate::logic::piece::Color;
use std::sync::Arc;

/// Squares of each side's kings and hearts, reused across the nodes of one
/// search. Rescanned only when a cached square no longer holds a protectee of
/// that color, or when a side has none cached.
#[derive(Debug, Clone, Default)]
pub struct ProtecteeCache {
    squares: [Vec<Square>; 2],
}

impl ProtecteeCache {
    pub fn clear(&mut self) {
        for list in &mut self.squares {
            list.clear();
        }
    }

    pub fn refresh(&mut self, board: &Board) {
        if !self.is_stale(board) {
            return;
        }
        self.clear();
        for (sq, piece) in board.pieces() {
            if piece.kind.is_protectee() {
                self.squares[piece.color.index()].push(sq);
            }
        }
    }

    pub fn of(&self, color: Color) -> &[Square] {
        &self.squares[color.index()]
    }

    /// Manhattan distance from `sq` to the closest protectee of `color`.
    pub fn nearest_distance(&self, color: Color, sq: Square) -> Option<usize> {
        self.of(color).iter().map(|&target| target.manhattan(sq)).min()
    }

    fn is_stale(&self, board: &Board) -> bool {
        [Color::White, Color::Black].into_iter().any(|color| {
            let cached = self.of(color);
            cached.is_empty()
                || cached.iter().any(|&sq| {
                    !board
                        .get_piece(sq)
                        .is_some_and(|p| p.color == color && p.kind.is_protectee())
                })
        })
    }
}

/// Scores a position by how close each side's pieces are to the enemy's
/// kings and hearts. Positive favours White.
pub struct DistanceEvaluator {
    config: Arc<EngineConfig>,
    protectees: ProtecteeCache,
}

impl DistanceEvaluator {
    pub fn new(config: Arc<EngineConfig>) -> Self {
        Self {
            config,
            protectees: ProtecteeCache::default(),
        }
    }

    /// Drops cached protectee squares; called at the start of every search.
    pub fn reset(&mut self) {
        self.protectees.clear();
    }

    /// Stable sort: moves landing closer to an enemy protectee come first.
    pub fn order_moves(&mut self, state: &GameState, moves: &mut [Move]) {
        self.protectees.refresh(state.board());
        let enemy = state.turn().opposite();
        let protectees = &self.protectees;
        moves.sort_by_key(|mv| protectees.nearest_distance(enemy, mv.to).unwrap_or(usize::MAX));
    }
}

impl Evaluator for DistanceEvaluator {
    fn evaluate(&mut self, state: &GameState) -> i32 {
        if let Some(winner) = state.is_game_over() {
            return self.config.victory_points * winner.sign();
        }

        self.protectees.refresh(state.board());

        // A piece far from the enemy's protectees is a liability for its own
        // side: White's distances count against it, Black's in its favour.
        let mut score: i32 = 0;
        for (sq, piece) in state.board().pieces() {
            let Some(dist) = self.protectees.nearest_distance(piece.color.opposite(), sq) else {
                continue;
            };
            let dist = i32::try_from(dist).unwrap_or(i32::MAX);
            score = score.saturating_sub(dist.saturating_mul(piece.color.sign()));
        }

        let cap = self.config.heuristic_cap();
        score.clamp(-cap, cap)
    }
}
