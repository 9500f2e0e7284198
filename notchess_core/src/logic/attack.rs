//! Per-color attack maps, kept in sync with the board one move at a time.
//!
//! `attacking_from[a]` caches the attack-mode move list of the piece on `a`;
//! `attacked_by[color][s]` is the inverse index. After a move only the pieces
//! whose lists can have changed are recomputed: the pieces on the touched
//! squares, every piece recorded as attacking a touched square (its ray may now
//! stop earlier or run further), and pawns whose capture squares include a
//! touched square, since a pawn only bears on occupied diagonals.

use crate::engine::Move;
use crate::logic::board::{Board, Square};
use crate::logic::generator::attack_targets;
use crate::logic::piece::{Color, Facing};
use std::collections::BTreeSet;

const FACINGS: [Facing; 4] = [Facing::Up, Facing::Down, Facing::Left, Facing::Right];

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AttackMap {
    width: usize,
    attacked_by: [Vec<BTreeSet<Square>>; 2],
    attacking_from: Vec<Option<Vec<Move>>>,
}

impl AttackMap {
    /// Scans every occupied square once.
    #[must_use]
    pub fn build(board: &Board) -> Self {
        let len = board.len();
        let mut map = Self {
            width: board.width(),
            attacked_by: [vec![BTreeSet::new(); len], vec![BTreeSet::new(); len]],
            attacking_from: vec![None; len],
        };
        for (sq, _) in board.pieces() {
            map.register(board, sq);
        }
        map
    }

    pub fn attackers(&self, color: Color, sq: Square) -> Option<&BTreeSet<Square>> {
        self.attacked_by[color.index()].get(self.index(sq)?)
    }

    pub fn is_attacked_by(&self, color: Color, sq: Square) -> bool {
        self.attackers(color, sq).is_some_and(|set| !set.is_empty())
    }

    /// Cached attack list of the piece on `sq`, `None` when the square is empty.
    pub fn attacking_from(&self, sq: Square) -> Option<&[Move]> {
        self.attacking_from
            .get(self.index(sq)?)
            .and_then(|moves| moves.as_deref())
    }

    /// Brings the map up to date after the pieces on `touched` changed.
    /// Must run after the board was updated but before any other refresh.
    pub fn refresh(&mut self, board: &Board, touched: &[Square]) {
        let mut dirty = BTreeSet::new();
        for &sq in touched {
            dirty.insert(sq);
            for color in [Color::White, Color::Black] {
                if let Some(attackers) = self.attackers(color, sq) {
                    dirty.extend(attackers.iter().copied());
                }
            }
            dirty.extend(pawns_bearing_on(board, sq));
        }

        for sq in dirty {
            self.unregister(sq);
            self.register(board, sq);
        }
    }

    fn index(&self, sq: Square) -> Option<usize> {
        (sq.col < self.width).then(|| sq.row * self.width + sq.col)
    }

    fn register(&mut self, board: &Board, sq: Square) {
        let (Some(idx), Some(piece)) = (self.index(sq), board.get_piece(sq)) else {
            return;
        };
        let moves = attack_targets(board, sq);
        for mv in &moves {
            if let Some(target) = self
                .index(mv.to)
                .and_then(|t| self.attacked_by[piece.color.index()].get_mut(t))
            {
                target.insert(sq);
            }
        }
        if let Some(slot) = self.attacking_from.get_mut(idx) {
            *slot = Some(moves);
        }
    }

    fn unregister(&mut self, sq: Square) {
        let Some(moves) = self
            .index(sq)
            .and_then(|idx| self.attacking_from.get_mut(idx))
            .and_then(Option::take)
        else {
            return;
        };
        for mv in moves {
            let Some(t) = self.index(mv.to) else {
                continue;
            };
            for by_color in &mut self.attacked_by {
                if let Some(target) = by_color.get_mut(t) {
                    target.remove(&sq);
                }
            }
        }
    }
}

/// Pawns, of either color and any facing, whose capture squares include `sq`.
fn pawns_bearing_on(board: &Board, sq: Square) -> Vec<Square> {
    let mut pawns = Vec::new();
    for facing in FACINGS {
        for (dc, dr) in facing.capture_offsets() {
            let Some(from) = board.offset(sq, -dc, -dr) else {
                continue;
            };
            if board
                .get_piece(from)
                .is_some_and(|p| p.is_pawn() && p.facing == facing)
            {
                pawns.push(from);
            }
        }
    }
    pawns
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::layout::Layout;

    fn board(diagram: &str) -> Board {
        Layout::from_diagram(diagram).unwrap().to_board()
    }

    #[test]
    fn test_build_indexes_attackers() {
        let board = board(
            "
            r...
            ....
            ..N.
            ",
        );
        let map = AttackMap::build(&board);
        let rook_sq = Square::new(0, 0);
        let knight_sq = Square::new(2, 2);

        assert!(map
            .attackers(Color::Black, Square::new(0, 2))
            .unwrap()
            .contains(&rook_sq));
        assert!(map.is_attacked_by(Color::White, Square::new(0, 1)));
        assert!(map.is_attacked_by(Color::White, Square::new(3, 0)));
        assert!(!map.is_attacked_by(Color::White, Square::new(1, 1)));
        assert_eq!(map.attacking_from(knight_sq).map(<[Move]>::len), Some(3));
        assert_eq!(map.attacking_from(Square::new(1, 1)), None);
    }

    #[test]
    fn test_refresh_matches_rebuild_after_block() {
        let mut b = board(
            "
            r...
            ....
            N...
            ",
        );
        let mut map = AttackMap::build(&b);
        // The knight steps into the rook's file; the rook's ray now stops there.
        let from = Square::new(0, 2);
        let to = Square::new(0, 1);
        let knight = b.take_piece(from);
        b.set_piece(to, knight);
        map.refresh(&b, &[from, to]);
        assert_eq!(map, AttackMap::build(&b));
        assert!(!map.is_attacked_by(Color::Black, from));
    }

    #[test]
    fn test_refresh_updates_pawn_when_diagonal_fills() {
        let mut b = board(
            "
            ....
            .n..
            ..P.
            ",
        );
        let mut map = AttackMap::build(&b);
        assert!(map.is_attacked_by(Color::White, Square::new(1, 1)));
        assert!(!map.is_attacked_by(Color::White, Square::new(3, 1)));

        // The knight hops across to the pawn's other diagonal.
        let knight = b.take_piece(Square::new(1, 1));
        b.set_piece(Square::new(3, 1), knight);
        map.refresh(&b, &[Square::new(1, 1), Square::new(3, 1)]);
        assert_eq!(map, AttackMap::build(&b));
        assert!(map.is_attacked_by(Color::White, Square::new(3, 1)));
        assert!(!map.is_attacked_by(Color::White, Square::new(1, 1)));
    }
}
