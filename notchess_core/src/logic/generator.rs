use crate::engine::Move;
use crate::logic::board::{Board, Square};
use crate::logic::game::GameState;
use crate::logic::piece::{Color, Piece, PieceKind, Promotion, KING_DIRS, KNIGHT_DELTAS, ROOK_DIRS};

pub struct MoveGenerator;

impl Default for MoveGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl MoveGenerator {
    pub const fn new() -> Self {
        Self
    }

    /// Every legal move of `color`, scanning the board row by row.
    pub fn generate_moves(&self, state: &GameState, color: Color) -> Vec<Move> {
        let mut moves = Vec::with_capacity(64);
        for (sq, _) in state.board().pieces_of(color) {
            moves.extend(moves_for(state, sq, false));
        }
        moves
    }
}

/// Moves of the piece on `from`. In attack mode only the squares the piece
/// bears on are listed: friendly blockers count as defended, and the
/// history-dependent moves (castling, en passant) are left out.
pub fn moves_for(state: &GameState, from: Square, attack_only: bool) -> Vec<Move> {
    let board = state.board();
    let Some(piece) = board.get_piece(from) else {
        return Vec::new();
    };

    let mut moves = Vec::new();
    let unmoved = !state.ever_vacated(from);
    piece_moves(piece, board, from, unmoved, attack_only, &mut moves);

    if !attack_only {
        match piece.kind {
            PieceKind::Pawn => en_passant_moves(state, piece, from, &mut moves),
            PieceKind::King if unmoved => castling_moves(state, piece, from, &mut moves),
            _ => {}
        }
    }
    moves
}

/// Attack-mode moves of whatever stands on `from`; empty if nothing does.
pub fn attack_targets(board: &Board, from: Square) -> Vec<Move> {
    let mut moves = Vec::new();
    if let Some(piece) = board.get_piece(from) {
        piece_moves(piece, board, from, false, true, &mut moves);
    }
    moves
}

/// Movement rules that depend only on the grid.
pub fn piece_moves(
    piece: Piece,
    board: &Board,
    from: Square,
    unmoved: bool,
    attack_only: bool,
    moves: &mut Vec<Move>,
) {
    match piece.kind {
        PieceKind::King => step_moves(piece, board, from, &KING_DIRS, attack_only, moves),
        PieceKind::Knight => step_moves(piece, board, from, &KNIGHT_DELTAS, attack_only, moves),
        PieceKind::Queen | PieceKind::Bishop | PieceKind::Rook => {
            slide_moves(piece, board, from, attack_only, moves);
        }
        PieceKind::Pawn => pawn_moves(piece, board, from, unmoved, attack_only, moves),
        PieceKind::Heart => {}
    }
}

fn step_moves(
    piece: Piece,
    board: &Board,
    from: Square,
    deltas: &[(i32, i32)],
    attack_only: bool,
    moves: &mut Vec<Move>,
) {
    for &(dc, dr) in deltas {
        let Some(to) = board.offset(from, dc, dr) else {
            continue;
        };
        match board.get_piece(to) {
            Some(target) if target.is_friendly(piece) && !attack_only => {}
            _ => moves.push(Move::new(from, to)),
        }
    }
}

fn slide_moves(piece: Piece, board: &Board, from: Square, attack_only: bool, moves: &mut Vec<Move>) {
    for &(dc, dr) in piece.kind.slide_dirs() {
        let mut cur = from;
        while let Some(next) = board.offset(cur, dc, dr) {
            if let Some(target) = board.get_piece(next) {
                if attack_only || !target.is_friendly(piece) {
                    moves.push(Move::new(from, next));
                }
                break;
            }
            moves.push(Move::new(from, next));
            cur = next;
        }
    }
}

fn pawn_moves(
    piece: Piece,
    board: &Board,
    from: Square,
    unmoved: bool,
    attack_only: bool,
    moves: &mut Vec<Move>,
) {
    let (fc, fr) = piece.facing.forward();

    // Advances are never attacks.
    if !attack_only {
        let steps = if unmoved { 2 } else { 1 };
        let mut cur = from;
        for _ in 0..steps {
            match board.offset(cur, fc, fr) {
                Some(next) if board.get_piece(next).is_none() => {
                    push_pawn_move(board, piece, from, next, moves);
                    cur = next;
                }
                _ => break,
            }
        }
    }

    for (dc, dr) in piece.facing.capture_offsets() {
        let Some(to) = board.offset(from, dc, dr) else {
            continue;
        };
        match board.get_piece(to) {
            Some(_) if attack_only => moves.push(Move::new(from, to)),
            Some(target) if !target.is_friendly(piece) => push_pawn_move(board, piece, from, to, moves),
            _ => {}
        }
    }
}

/// True when a pawn standing on `sq` could not step any further forward.
pub fn is_promotion_square(board: &Board, piece: Piece, sq: Square) -> bool {
    let (fc, fr) = piece.facing.forward();
    piece.is_pawn() && board.offset(sq, fc, fr).is_none()
}

fn push_pawn_move(board: &Board, piece: Piece, from: Square, to: Square, moves: &mut Vec<Move>) {
    if is_promotion_square(board, piece, to) {
        moves.extend(
            Promotion::ALL
                .into_iter()
                .map(|promotion| Move::promoting(from, to, promotion)),
        );
    } else {
        moves.push(Move::new(from, to));
    }
}

fn en_passant_moves(state: &GameState, piece: Piece, from: Square, moves: &mut Vec<Move>) {
    let Some((last_from, last_to)) = state.last_move() else {
        return;
    };
    let board = state.board();
    let Some(victim) = board.get_piece(last_to) else {
        return;
    };
    if !victim.is_pawn() || victim.is_friendly(piece) {
        return;
    }

    let double_step = (last_from.col == last_to.col && last_from.row.abs_diff(last_to.row) == 2)
        || (last_from.row == last_to.row && last_from.col.abs_diff(last_to.col) == 2);
    if !double_step {
        return;
    }

    let (sc, sr) = piece.facing.sideways();
    let beside = [board.offset(from, sc, sr), board.offset(from, -sc, -sr)];
    if !beside.contains(&Some(last_to)) {
        return;
    }

    let (fc, fr) = piece.facing.forward();
    if let Some(to) = board.offset(last_to, fc, fr) {
        if board.get_piece(to).is_none() {
            push_pawn_move(board, piece, from, to, moves);
        }
    }
}

fn castling_moves(state: &GameState, king: Piece, from: Square, moves: &mut Vec<Move>) {
    let board = state.board();
    let enemy = king.color.opposite();

    for (dc, dr) in ROOK_DIRS {
        let mut cur = from;
        let first_occupied = loop {
            match board.offset(cur, dc, dr) {
                None => break None,
                Some(next) if board.get_piece(next).is_some() => break Some(next),
                Some(next) => cur = next,
            }
        };
        let Some(rook_sq) = first_occupied else {
            continue;
        };
        let is_own_rook = board
            .get_piece(rook_sq)
            .is_some_and(|p| p.kind == PieceKind::Rook && p.color == king.color);
        if !is_own_rook || state.ever_vacated(rook_sq) {
            continue;
        }
        let Some((king_to, _)) = castling_targets(from, rook_sq) else {
            continue;
        };

        let path_is_safe = line_between(from, king_to)
            .iter()
            .all(|&sq| !state.attacks().is_attacked_by(enemy, sq));
        if path_is_safe {
            moves.push(Move::new(from, rook_sq));
        }
    }
}

/// Destination squares of king and rook when the king on `king` castles with
/// the rook on `rook`: the king moves two squares toward the rook (fewer if
/// the rook is closer) and the rook lands on the king's near side.
pub fn castling_targets(king: Square, rook: Square) -> Option<(Square, Square)> {
    let dc = axis_step(king.col, rook.col);
    let dr = axis_step(king.row, rook.row);
    if (dc != 0 && dr != 0) || (dc == 0 && dr == 0) {
        return None;
    }

    let steps = king.manhattan(rook).min(2);
    let king_to = Square::new(
        king.col.checked_add_signed(dc * steps as isize)?,
        king.row.checked_add_signed(dr * steps as isize)?,
    );
    let rook_to = Square::new(
        king_to.col.checked_add_signed(-dc)?,
        king_to.row.checked_add_signed(-dr)?,
    );
    Some((king_to, rook_to))
}

const fn axis_step(from: usize, to: usize) -> isize {
    if to > from {
        1
    } else if to < from {
        -1
    } else {
        0
    }
}

/// Squares from `from` to `to` inclusive along a rank or file.
fn line_between(from: Square, to: Square) -> Vec<Square> {
    let dc = axis_step(from.col, to.col);
    let dr = axis_step(from.row, to.row);
    let mut squares = vec![from];
    let mut cur = from;
    while cur != to {
        let (Some(col), Some(row)) = (cur.col.checked_add_signed(dc), cur.row.checked_add_signed(dr))
        else {
            break;
        };
        cur = Square::new(col, row);
        squares.push(cur);
    }
    squares
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::layout::Layout;
    use crate::logic::piece::Facing;

    fn state(diagram: &str) -> GameState {
        GameState::new(&Layout::from_diagram(diagram).unwrap(), &[]).unwrap()
    }

    fn targets(moves: &[Move]) -> Vec<Square> {
        let mut squares: Vec<Square> = moves.iter().map(|mv| mv.to).collect();
        squares.sort();
        squares.dedup();
        squares
    }

    #[test]
    fn test_knight_moves_filter_friendly() {
        let game = state(
            "
            h...
            ..N.
            ....
            .R..
            ",
        );
        let from = Square::new(2, 1);
        let legal = moves_for(&game, from, false);
        assert_eq!(
            targets(&legal),
            vec![Square::new(0, 0), Square::new(0, 2), Square::new(3, 3)]
        );
        // The rook on (1,3) is defended, so attack mode lists it too.
        let attacks = moves_for(&game, from, true);
        assert!(targets(&attacks).contains(&Square::new(1, 3)));
        assert_eq!(attacks.len(), legal.len() + 1);
    }

    #[test]
    fn test_rook_stops_at_blockers() {
        let game = state(
            "
            ..k..
            .....
            R.P.n
            ",
        );
        let legal = moves_for(&game, Square::new(0, 2), false);
        assert_eq!(
            targets(&legal),
            vec![Square::new(0, 0), Square::new(0, 1), Square::new(1, 2)]
        );
        let attacks = moves_for(&game, Square::new(0, 2), true);
        assert!(targets(&attacks).contains(&Square::new(2, 2)));
        assert!(!targets(&attacks).contains(&Square::new(3, 2)));
    }

    #[test]
    fn test_queen_captures_enemy_blocker() {
        let game = state(
            "
            n....
            .....
            ..Q..
            ",
        );
        let legal = moves_for(&game, Square::new(2, 2), false);
        assert!(legal.contains(&Move::new(Square::new(2, 2), Square::new(0, 0))));
        assert!(legal.contains(&Move::new(Square::new(2, 2), Square::new(4, 0))));
        assert!(legal.contains(&Move::new(Square::new(2, 2), Square::new(2, 0))));
        assert_eq!(legal.len(), 10);
    }

    #[test]
    fn test_heart_never_moves() {
        let game = state("...\n.H.\n...");
        assert!(moves_for(&game, Square::new(1, 1), false).is_empty());
        assert!(moves_for(&game, Square::new(1, 1), true).is_empty());
    }

    #[test]
    fn test_pawn_double_step_only_when_unmoved() {
        let mut game = state(
            "
            k...
            ....
            ....
            ....
            K..P
            ",
        );
        let from = Square::new(3, 4);
        assert_eq!(
            targets(&moves_for(&game, from, false)),
            vec![Square::new(3, 2), Square::new(3, 3)]
        );
        game.make_move(Move::new(from, Square::new(3, 3))).unwrap();
        game.make_move(Move::new(Square::new(0, 0), Square::new(1, 0)))
            .unwrap();
        assert_eq!(
            targets(&moves_for(&game, Square::new(3, 3), false)),
            vec![Square::new(3, 2)]
        );
    }

    #[test]
    fn test_pawn_blocked_and_capturing() {
        let game = state(
            "
            .....
            .nNr.
            ..P..
            ",
        );
        let from = Square::new(2, 2);
        let legal = moves_for(&game, from, false);
        assert_eq!(
            targets(&legal),
            vec![Square::new(1, 1), Square::new(3, 1)]
        );
        // Both diagonals are occupied, so both count in attack mode; the
        // advance square never does.
        let attacks = moves_for(&game, from, true);
        assert_eq!(
            targets(&attacks),
            vec![Square::new(1, 1), Square::new(3, 1)]
        );
    }

    #[test]
    fn test_pawn_attack_mode_skips_empty_diagonals() {
        let game = state(
            "
            ...
            ...
            .P.
            ",
        );
        assert!(moves_for(&game, Square::new(1, 2), true).is_empty());
    }

    #[test]
    fn test_sideways_pawn() {
        let layout = Layout::from_diagram(
            "
            ....
            P..n
            ....
            ",
        )
        .unwrap();
        let game = GameState::new(&layout, &[(Square::new(0, 1), Facing::Right)]).unwrap();
        let legal = moves_for(&game, Square::new(0, 1), false);
        assert_eq!(
            targets(&legal),
            vec![Square::new(1, 1), Square::new(2, 1)]
        );
    }

    #[test]
    fn test_promotion_emits_four_choices() {
        let game = state(
            "
            .r..
            P...
            ....
            ",
        );
        let from = Square::new(0, 1);
        let legal = moves_for(&game, from, false);
        assert_eq!(legal.len(), 8);
        assert!(legal.iter().all(|mv| mv.promotion.is_some()));
        for promotion in Promotion::ALL {
            assert!(legal.contains(&Move::promoting(from, Square::new(0, 0), promotion)));
            assert!(legal.contains(&Move::promoting(from, Square::new(1, 0), promotion)));
        }
        assert!(!legal.contains(&Move::new(from, Square::new(0, 0))));

        let attacks = moves_for(&game, from, true);
        assert_eq!(attacks, vec![Move::new(from, Square::new(1, 0))]);
    }

    #[test]
    fn test_castling_targets() {
        let king = Square::new(4, 7);
        assert_eq!(
            castling_targets(king, Square::new(7, 7)),
            Some((Square::new(6, 7), Square::new(5, 7)))
        );
        assert_eq!(
            castling_targets(king, Square::new(0, 7)),
            Some((Square::new(2, 7), Square::new(3, 7)))
        );
        // An adjacent rook swaps places with the king.
        assert_eq!(
            castling_targets(king, Square::new(5, 7)),
            Some((Square::new(5, 7), king))
        );
        assert_eq!(castling_targets(king, Square::new(5, 6)), None);
        assert_eq!(castling_targets(king, king), None);
    }

    #[test]
    fn test_line_between_is_inclusive() {
        assert_eq!(
            line_between(Square::new(4, 0), Square::new(2, 0)),
            vec![Square::new(4, 0), Square::new(3, 0), Square::new(2, 0)]
        );
    }

    #[test]
    fn test_generator_collects_all_pieces() {
        let game = state(
            "
            k..
            ...
            N.K
            ",
        );
        let generator = MoveGenerator::new();
        let moves = generator.generate_moves(&game, Color::White);
        assert_eq!(moves.len(), 2 + 3);
        assert_eq!(generator.generate_moves(&game, Color::Black).len(), 3);
    }
}
