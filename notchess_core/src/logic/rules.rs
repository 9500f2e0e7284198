use crate::engine::Move;
use crate::logic::board::Square;
use crate::logic::piece::{Category, Color, PieceKind};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("the game is already over")]
    GameOver,
    #[error("no piece at {0}")]
    NoPieceAtSource(Square),
    #[error("the piece belongs to the side not on move")]
    NotYourTurn,
    #[error("{0} is not a legal move")]
    IllegalMove(Move),
}

/// Remaining pieces of one color, by category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PieceTally {
    pub hearts: u32,
    pub kings: u32,
    pub others: u32,
}

impl PieceTally {
    pub fn add(&mut self, kind: PieceKind) {
        *self.slot(kind) += 1;
    }

    pub fn remove(&mut self, kind: PieceKind) {
        let slot = self.slot(kind);
        *slot = slot.saturating_sub(1);
    }

    pub const fn total(&self) -> u32 {
        self.hearts + self.kings + self.others
    }

    /// No kings left and either no hearts or nothing else to fight with.
    pub const fn is_lost(&self) -> bool {
        self.kings == 0 && (self.hearts == 0 || self.others == 0)
    }

    fn slot(&mut self, kind: PieceKind) -> &mut u32 {
        match kind.category() {
            Category::Heart => &mut self.hearts,
            Category::King => &mut self.kings,
            Category::Other => &mut self.others,
        }
    }
}

/// White's loss is checked first, so a layout where both sides already
/// satisfy the loss predicate is a win for Black.
pub fn winner_from_tallies(tally: &[PieceTally; 2]) -> Option<Color> {
    [Color::White, Color::Black]
        .into_iter()
        .find(|color| tally[color.index()].is_lost())
        .map(Color::opposite)
}
