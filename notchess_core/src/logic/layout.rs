//! Declarative piece layouts, the only board data that crosses the
//! persistence boundary. A layout carries no facings and no move history.

use crate::logic::board::{Board, Square};
use crate::logic::piece::{Color, Piece, PieceKind};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("invalid layout JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unknown piece name `{0}`")]
    UnknownPiece(String),
    #[error("unknown diagram symbol `{0}`")]
    UnknownSymbol(char),
    #[error("layout has no squares")]
    Empty,
    #[error("row {row} has {found} squares, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("square {0} is outside the board")]
    OutOfBounds(Square),
    #[error("square {0} does not hold a pawn")]
    FacingOnNonPawn(Square),
}

/// Piece type and color, persisted as names like `W_King` or `B_Pawn`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PieceCode {
    pub kind: PieceKind,
    pub color: Color,
}

impl PieceCode {
    #[must_use]
    pub const fn new(kind: PieceKind, color: Color) -> Self {
        Self { kind, color }
    }

    pub const fn to_piece(self) -> Piece {
        Piece::new(self.kind, self.color)
    }
}

impl From<Piece> for PieceCode {
    fn from(piece: Piece) -> Self {
        Self::new(piece.kind, piece.color)
    }
}

impl TryFrom<String> for PieceCode {
    type Error = LayoutError;

    fn try_from(name: String) -> Result<Self, Self::Error> {
        Piece::from_code(&name)
            .map(Self::from)
            .ok_or(LayoutError::UnknownPiece(name))
    }
}

impl From<PieceCode> for String {
    fn from(code: PieceCode) -> Self {
        code.to_piece().code()
    }
}

/// Rectangular grid of optional pieces, row 0 first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layout {
    board: Vec<Vec<Option<PieceCode>>>,
}

impl Layout {
    pub fn new(rows: Vec<Vec<Option<PieceCode>>>) -> Result<Self, LayoutError> {
        let layout = Self { board: rows };
        layout.validate()?;
        Ok(layout)
    }

    pub fn from_json(json: &str) -> Result<Self, LayoutError> {
        let layout: Self = serde_json::from_str(json)?;
        layout.validate()?;
        Ok(layout)
    }

    pub fn to_json(&self) -> Result<String, LayoutError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parses one text line per row: `KQBNRPH` for White, lower case for
    /// Black, `.` for an empty square. Blank lines and surrounding
    /// whitespace are ignored.
    pub fn from_diagram(diagram: &str) -> Result<Self, LayoutError> {
        let rows = diagram
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|line| {
                line.chars()
                    .map(|symbol| match symbol {
                        '.' => Ok(None),
                        _ => PieceKind::from_symbol(symbol)
                            .map(|(kind, color)| Some(PieceCode::new(kind, color)))
                            .ok_or(LayoutError::UnknownSymbol(symbol)),
                    })
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(rows)
    }

    pub fn to_diagram(&self) -> String {
        self.to_board().to_diagram()
    }

    pub fn width(&self) -> usize {
        self.board.first().map_or(0, Vec::len)
    }

    pub fn height(&self) -> usize {
        self.board.len()
    }

    pub fn get(&self, sq: Square) -> Option<PieceCode> {
        self.board
            .get(sq.row)
            .and_then(|row| row.get(sq.col))
            .copied()
            .flatten()
    }

    #[must_use]
    pub fn from_board(board: &Board) -> Self {
        let board = (0..board.height())
            .map(|row| {
                (0..board.width())
                    .map(|col| board.get_piece(Square::new(col, row)).map(PieceCode::from))
                    .collect()
            })
            .collect();
        Self { board }
    }

    /// Every pawn gets its color's default facing.
    pub fn to_board(&self) -> Board {
        let mut board = Board::empty(self.width(), self.height());
        for (row, cells) in self.board.iter().enumerate() {
            for (col, cell) in cells.iter().enumerate() {
                if let Some(code) = cell {
                    board.set_piece(Square::new(col, row), Some(code.to_piece()));
                }
            }
        }
        board
    }

    fn validate(&self) -> Result<(), LayoutError> {
        let expected = self.width();
        if expected == 0 {
            return Err(LayoutError::Empty);
        }
        for (row, cells) in self.board.iter().enumerate() {
            if cells.len() != expected {
                return Err(LayoutError::Ragged {
                    row,
                    expected,
                    found: cells.len(),
                });
            }
        }
        Ok(())
    }
}
