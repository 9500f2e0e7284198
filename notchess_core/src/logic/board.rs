use crate::logic::piece::{Color, Piece};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Rejected grid shapes when a board or flag grid arrives serialized.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("grid has a zero dimension")]
    ZeroDimension,
    #[error("grid has {found} squares, expected {expected}")]
    SizeMismatch { expected: usize, found: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Square {
    pub col: usize,
    pub row: usize,
}

impl Square {
    #[must_use]
    pub const fn new(col: usize, row: usize) -> Self {
        Self { col, row }
    }

    pub const fn manhattan(self, other: Self) -> usize {
        self.col.abs_diff(other.col) + self.row.abs_diff(other.row)
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.col, self.row)
    }
}

/// Rectangular grid of optional pieces. Owns every piece on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BoardRepr")]
pub struct Board {
    width: usize,
    height: usize,
    grid: Vec<Option<Piece>>,
}

#[derive(Deserialize)]
struct BoardRepr {
    width: usize,
    height: usize,
    grid: Vec<Option<Piece>>,
}

impl TryFrom<BoardRepr> for Board {
    type Error = GridError;

    fn try_from(repr: BoardRepr) -> Result<Self, Self::Error> {
        if repr.width == 0 || repr.height == 0 {
            return Err(GridError::ZeroDimension);
        }
        let expected = repr.width.checked_mul(repr.height).unwrap_or(usize::MAX);
        if repr.grid.len() != expected {
            return Err(GridError::SizeMismatch {
                expected,
                found: repr.grid.len(),
            });
        }
        Ok(Self {
            width: repr.width,
            height: repr.height,
            grid: repr.grid,
        })
    }
}

impl Board {
    #[must_use]
    pub fn empty(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            grid: vec![None; width * height],
        }
    }

    pub const fn width(&self) -> usize {
        self.width
    }

    pub const fn height(&self) -> usize {
        self.height
    }

    pub const fn len(&self) -> usize {
        self.width * self.height
    }

    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub const fn contains(&self, sq: Square) -> bool {
        sq.col < self.width && sq.row < self.height
    }

    #[must_use]
    pub const fn square_index(&self, sq: Square) -> usize {
        sq.row * self.width + sq.col
    }

    #[must_use]
    pub const fn index_to_square(&self, idx: usize) -> Square {
        Square::new(idx % self.width, idx / self.width)
    }

    /// Bounds-checked step from `sq`.
    pub fn offset(&self, sq: Square, dc: i32, dr: i32) -> Option<Square> {
        let col = i64::try_from(sq.col).ok()? + i64::from(dc);
        let row = i64::try_from(sq.row).ok()? + i64::from(dr);
        let target = Square::new(usize::try_from(col).ok()?, usize::try_from(row).ok()?);
        self.contains(target).then_some(target)
    }

    #[must_use]
    pub fn get_piece(&self, sq: Square) -> Option<Piece> {
        if !self.contains(sq) {
            return None;
        }
        self.grid.get(self.square_index(sq)).copied().flatten()
    }

    /// Replaces the contents of `sq` and returns what was there.
    pub fn set_piece(&mut self, sq: Square, piece: Option<Piece>) -> Option<Piece> {
        if !self.contains(sq) {
            return None;
        }
        let idx = self.square_index(sq);
        self.grid
            .get_mut(idx)
            .and_then(|slot| std::mem::replace(slot, piece))
    }

    pub fn take_piece(&mut self, sq: Square) -> Option<Piece> {
        self.set_piece(sq, None)
    }

    pub fn squares(&self) -> impl Iterator<Item = Square> + '_ {
        (0..self.len()).map(|idx| self.index_to_square(idx))
    }

    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.grid
            .iter()
            .enumerate()
            .filter_map(|(idx, slot)| slot.map(|piece| (self.index_to_square(idx), piece)))
    }

    pub fn pieces_of(&self, color: Color) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.pieces().filter(move |(_, piece)| piece.color == color)
    }

    pub fn count(&self) -> usize {
        self.grid.iter().filter(|slot| slot.is_some()).count()
    }

    /// One text line per row, `.` for empty squares.
    pub fn to_diagram(&self) -> String {
        let mut out = String::with_capacity(self.len() + self.height);
        for row in 0..self.height {
            for col in 0..self.width {
                out.push(
                    self.get_piece(Square::new(col, row))
                        .map_or('.', Piece::symbol),
                );
            }
            out.push('\n');
        }
        out
    }
}

/// Per-square flag grid with the board's dimensions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "FlagsRepr")]
pub struct SquareFlags {
    width: usize,
    flags: Vec<bool>,
}

#[derive(Deserialize)]
struct FlagsRepr {
    width: usize,
    flags: Vec<bool>,
}

impl TryFrom<FlagsRepr> for SquareFlags {
    type Error = GridError;

    fn try_from(repr: FlagsRepr) -> Result<Self, Self::Error> {
        if repr.width == 0 || repr.flags.is_empty() {
            return Err(GridError::ZeroDimension);
        }
        if repr.flags.len() % repr.width != 0 {
            let rows = repr.flags.len().div_ceil(repr.width);
            return Err(GridError::SizeMismatch {
                expected: rows.saturating_mul(repr.width),
                found: repr.flags.len(),
            });
        }
        Ok(Self {
            width: repr.width,
            flags: repr.flags,
        })
    }
}

impl SquareFlags {
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            flags: vec![false; width * height],
        }
    }

    pub fn len(&self) -> usize {
        self.flags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    /// Whether the flags cover exactly the squares of `board`.
    pub fn fits(&self, board: &Board) -> bool {
        self.width == board.width() && self.len() == board.len()
    }

    pub fn get(&self, sq: Square) -> bool {
        sq.col < self.width
            && self
                .flags
                .get(sq.row * self.width + sq.col)
                .copied()
                .unwrap_or(false)
    }

    pub fn set(&mut self, sq: Square) {
        if sq.col >= self.width {
            return;
        }
        if let Some(flag) = self.flags.get_mut(sq.row * self.width + sq.col) {
            *flag = true;
        }
    }
}
