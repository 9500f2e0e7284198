use crate::engine::Move;
use crate::logic::attack::AttackMap;
use crate::logic::board::{Board, GridError, Square, SquareFlags};
use crate::logic::generator::{castling_targets, is_promotion_square, moves_for, MoveGenerator};
use crate::logic::layout::{Layout, LayoutError};
use crate::logic::levels::Level;
use crate::logic::piece::{Color, Facing, Piece, PieceKind, Promotion};
use crate::logic::rules::{winner_from_tallies, MoveError, PieceTally};
use serde::{Deserialize, Serialize};

/// Position plus everything the rules need to remember about how it was
/// reached. Attack maps are derived data: they are kept in sync on every
/// move, rebuilt on clone, and never serialized.
#[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "GameSnapshot", into = "GameSnapshot")]
pub struct GameState {
    board: Board,
    ever_vacated: SquareFlags,
    last_move: Option<(Square, Square)>,
    tally: [PieceTally; 2],
    turn: Color,
    move_count: u32,
    winner: Option<Color>,
    attacks: AttackMap,
}

/// Persistent part of a [`GameState`], used when a state crosses a worker
/// boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameSnapshot {
    board: Board,
    ever_vacated: SquareFlags,
    last_move: Option<(Square, Square)>,
    turn: Color,
    move_count: u32,
    winner: Option<Color>,
}

impl TryFrom<GameSnapshot> for GameState {
    type Error = GridError;

    fn try_from(snapshot: GameSnapshot) -> Result<Self, Self::Error> {
        if !snapshot.ever_vacated.fits(&snapshot.board) {
            return Err(GridError::SizeMismatch {
                expected: snapshot.board.len(),
                found: snapshot.ever_vacated.len(),
            });
        }
        Ok(Self {
            tally: count_tallies(&snapshot.board),
            attacks: AttackMap::build(&snapshot.board),
            board: snapshot.board,
            ever_vacated: snapshot.ever_vacated,
            last_move: snapshot.last_move,
            turn: snapshot.turn,
            move_count: snapshot.move_count,
            winner: snapshot.winner,
        })
    }
}

impl From<GameState> for GameSnapshot {
    fn from(state: GameState) -> Self {
        Self {
            board: state.board,
            ever_vacated: state.ever_vacated,
            last_move: state.last_move,
            turn: state.turn,
            move_count: state.move_count,
            winner: state.winner,
        }
    }
}

impl Clone for GameState {
    fn clone(&self) -> Self {
        Self {
            board: self.board.clone(),
            ever_vacated: self.ever_vacated.clone(),
            last_move: self.last_move,
            tally: self.tally,
            turn: self.turn,
            move_count: self.move_count,
            winner: self.winner,
            attacks: AttackMap::build(&self.board),
        }
    }
}

impl GameState {
    /// Builds the starting state of a level. `facings` overrides the default
    /// direction of individual pawns.
    pub fn new(layout: &Layout, facings: &[(Square, Facing)]) -> Result<Self, LayoutError> {
        let mut board = layout.to_board();
        for &(sq, facing) in facings {
            if !board.contains(sq) {
                return Err(LayoutError::OutOfBounds(sq));
            }
            match board.get_piece(sq) {
                Some(piece) if piece.is_pawn() => {
                    board.set_piece(sq, Some(piece.with_facing(facing)));
                }
                _ => return Err(LayoutError::FacingOnNonPawn(sq)),
            }
        }
        Ok(Self::from_board(board, Color::White))
    }

    pub fn from_level(level: &Level) -> Result<Self, LayoutError> {
        Self::new(&level.layout()?, &level.facings())
    }

    /// Fresh state around an arbitrary board: nothing has moved yet.
    #[must_use]
    pub fn from_board(board: Board, turn: Color) -> Self {
        let mut state = Self {
            ever_vacated: SquareFlags::new(board.width(), board.height()),
            last_move: None,
            tally: count_tallies(&board),
            turn,
            move_count: 0,
            winner: None,
            attacks: AttackMap::build(&board),
            board,
        };
        state.check_winner();
        state
    }

    #[must_use]
    pub fn with_turn(mut self, turn: Color) -> Self {
        self.turn = turn;
        self
    }

    pub const fn board(&self) -> &Board {
        &self.board
    }

    pub const fn turn(&self) -> Color {
        self.turn
    }

    pub const fn move_count(&self) -> u32 {
        self.move_count
    }

    pub const fn winner(&self) -> Option<Color> {
        self.winner
    }

    pub const fn last_move(&self) -> Option<(Square, Square)> {
        self.last_move
    }

    pub const fn tally(&self, color: Color) -> PieceTally {
        self.tally[color.index()]
    }

    pub fn ever_vacated(&self, sq: Square) -> bool {
        self.ever_vacated.get(sq)
    }

    pub const fn attacks(&self) -> &AttackMap {
        &self.attacks
    }

    /// `Some(winner)` once a side has lost.
    pub const fn is_game_over(&self) -> Option<Color> {
        self.winner
    }

    pub fn legal_moves(&self, from: Square) -> Vec<Move> {
        moves_for(self, from, false)
    }

    /// Legal moves of the side to move.
    pub fn all_legal_moves(&self) -> Vec<Move> {
        MoveGenerator::new().generate_moves(self, self.turn)
    }

    /// Checked entry point for moves coming from outside the engine.
    pub fn apply_move(&mut self, mv: Move) -> Result<(), MoveError> {
        if self.winner.is_some() {
            return Err(MoveError::GameOver);
        }
        let piece = self
            .board
            .get_piece(mv.from)
            .ok_or(MoveError::NoPieceAtSource(mv.from))?;
        if piece.color != self.turn {
            return Err(MoveError::NotYourTurn);
        }
        if !self.legal_moves(mv.from).contains(&mv) {
            return Err(MoveError::IllegalMove(mv));
        }
        self.make_move(mv)
    }

    /// Plays `mv` without checking it against the legal move list.
    pub fn make_move(&mut self, mv: Move) -> Result<(), MoveError> {
        let piece = self
            .board
            .get_piece(mv.from)
            .ok_or(MoveError::NoPieceAtSource(mv.from))?;

        let is_castling = piece.kind == PieceKind::King
            && self
                .board
                .get_piece(mv.to)
                .is_some_and(|target| target.kind == PieceKind::Rook && target.color == piece.color);

        let mut touched = vec![mv.from, mv.to];
        let captured = if is_castling {
            let (king_to, rook_to) =
                castling_targets(mv.from, mv.to).ok_or(MoveError::IllegalMove(mv))?;
            // 1. Lift both pieces first: with an adjacent rook they swap squares.
            let king = self.board.take_piece(mv.from);
            let rook = self.board.take_piece(mv.to);
            self.board.set_piece(king_to, king);
            self.board.set_piece(rook_to, rook);

            for sq in [mv.from, mv.to, king_to, rook_to] {
                self.ever_vacated.set(sq);
                if !touched.contains(&sq) {
                    touched.push(sq);
                }
            }
            self.last_move = Some((mv.from, king_to));
            None
        } else {
            self.board.take_piece(mv.from);

            // 2. En passant: a pawn moving onto an empty square with an enemy
            // pawn right behind it takes that pawn.
            let mut captured = None;
            if piece.is_pawn() && self.board.get_piece(mv.to).is_none() {
                let (fc, fr) = piece.facing.forward();
                if let Some(behind) = self.board.offset(mv.to, -fc, -fr) {
                    let is_victim = self
                        .board
                        .get_piece(behind)
                        .is_some_and(|p| p.is_pawn() && !p.is_friendly(piece));
                    if is_victim {
                        captured = self.board.take_piece(behind);
                        touched.push(behind);
                    }
                }
            }

            // 3. Promotion
            let placed = if is_promotion_square(&self.board, piece, mv.to) {
                let promotion = mv.promotion.unwrap_or(Promotion::Queen);
                Piece::new(promotion.kind(), piece.color)
            } else {
                piece
            };
            if let Some(taken) = self.board.set_piece(mv.to, Some(placed)) {
                captured = Some(taken);
            }

            self.ever_vacated.set(mv.from);
            self.ever_vacated.set(mv.to);
            self.last_move = Some((mv.from, mv.to));
            captured
        };

        if let Some(taken) = captured {
            self.tally[taken.color.index()].remove(taken.kind);
        }
        self.turn = self.turn.opposite();
        self.move_count += 1;

        self.attacks.refresh(&self.board, &touched);
        self.check_winner();

        log::trace!(
            "move {}: {:?} played {}{}",
            self.move_count,
            piece.color,
            mv,
            captured.map_or(String::new(), |p| format!(" capturing {}", p.code()))
        );
        Ok(())
    }

    /// Sets the winner the first time a side's tally meets the loss
    /// predicate; once set it never changes.
    pub fn check_winner(&mut self) -> Option<Color> {
        if self.winner.is_none() {
            self.winner = winner_from_tallies(&self.tally);
        }
        self.winner
    }
}

fn count_tallies(board: &Board) -> [PieceTally; 2] {
    let mut tally = [PieceTally::default(); 2];
    for (_, piece) in board.pieces() {
        tally[piece.color.index()].add(piece.kind);
    }
    tally
}
