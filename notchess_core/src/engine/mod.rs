use crate::engine::config::EngineConfig;
use crate::engine::search::AlphaBetaEngine;
use crate::logic::board::Square;
use crate::logic::game::GameState;
use crate::logic::piece::Promotion;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

pub mod config;
pub mod eval;
pub mod search;

/// Move descriptor. Castling is the king moving onto its own rook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    pub promotion: Option<Promotion>,
}

impl Move {
    #[must_use]
    pub const fn new(from: Square, to: Square) -> Self {
        Self {
            from,
            to,
            promotion: None,
        }
    }

    #[must_use]
    pub const fn promoting(from: Square, to: Square, promotion: Promotion) -> Self {
        Self {
            from,
            to,
            promotion: Some(promotion),
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}->{}", self.from, self.to)?;
        if let Some(promotion) = self.promotion {
            write!(f, "={}", promotion.kind().symbol())?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SearchLimit {
    Depth(u8),
    Time(u64), // milliseconds
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchStats {
    /// Deepest fully completed iteration, 0 if none finished.
    pub depth: u8,
    pub nodes: u32,
    pub time_ms: u64,
    pub score: i32,
}

pub trait Evaluator {
    fn evaluate(&mut self, state: &GameState) -> i32;
}

pub trait Searcher {
    /// `None` means the side to move has no legal moves.
    fn search(&mut self, state: &GameState, limit: SearchLimit) -> Option<(Move, SearchStats)>;
}

/// Picks a move for the side to move within `time_budget_ms`, using the
/// default engine settings.
pub fn select_move(state: &GameState, time_budget_ms: u64) -> Option<Move> {
    let mut engine = AlphaBetaEngine::new(Arc::new(EngineConfig::default()));
    engine
        .search(state, SearchLimit::Time(time_budget_ms))
        .map(|(mv, _)| mv)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_display() {
        let plain = Move::new(Square::new(4, 6), Square::new(4, 4));
        assert_eq!(plain.to_string(), "(4,6)->(4,4)");
        let promo = Move::promoting(Square::new(0, 1), Square::new(0, 0), Promotion::Knight);
        assert_eq!(promo.to_string(), "(0,1)->(0,0)=N");
    }
}
