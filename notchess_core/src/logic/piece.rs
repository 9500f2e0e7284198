use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    White,
    Black,
}

impl Color {
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::White => Self::Black,
            Self::Black => Self::White,
        }
    }

    pub const fn index(self) -> usize {
        match self {
            Self::White => 0,
            Self::Black => 1,
        }
    }

    /// +1 for the maximizing side (White), -1 for Black.
    pub const fn sign(self) -> i32 {
        match self {
            Self::White => 1,
            Self::Black => -1,
        }
    }

    const fn prefix(self) -> char {
        match self {
            Self::White => 'W',
            Self::Black => 'B',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceKind {
    King,
    Queen,
    Bishop,
    Knight,
    Rook,
    Pawn,
    Heart,
}

impl PieceKind {
    pub const ALL: [Self; 7] = [
        Self::King,
        Self::Queen,
        Self::Bishop,
        Self::Knight,
        Self::Rook,
        Self::Pawn,
        Self::Heart,
    ];

    /// Unit directions for sliding pieces.
    #[inline]
    pub fn slide_dirs(self) -> &'static [(i32, i32)] {
        match self {
            Self::Queen => &QUEEN_DIRS,
            Self::Rook => &ROOK_DIRS,
            Self::Bishop => &BISHOP_DIRS,
            _ => &[],
        }
    }

    pub const fn category(self) -> Category {
        match self {
            Self::King => Category::King,
            Self::Heart => Category::Heart,
            _ => Category::Other,
        }
    }

    /// Kings and hearts are what the opponent is trying to take.
    pub const fn is_protectee(self) -> bool {
        matches!(self, Self::King | Self::Heart)
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::King => "King",
            Self::Queen => "Queen",
            Self::Bishop => "Bishop",
            Self::Knight => "Knight",
            Self::Rook => "Rook",
            Self::Pawn => "Pawn",
            Self::Heart => "Heart",
        }
    }

    /// Diagram letter, upper case. Black pieces use the lower-case form.
    pub const fn symbol(self) -> char {
        match self {
            Self::King => 'K',
            Self::Queen => 'Q',
            Self::Bishop => 'B',
            Self::Knight => 'N',
            Self::Rook => 'R',
            Self::Pawn => 'P',
            Self::Heart => 'H',
        }
    }

    pub fn from_symbol(symbol: char) -> Option<(Self, Color)> {
        let color = if symbol.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };
        let upper = symbol.to_ascii_uppercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.symbol() == upper)
            .map(|kind| (kind, color))
    }
}

/// Tally bucket a piece is counted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Heart,
    King,
    Other,
}

/// Forward direction of a pawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Facing {
    Up,
    Down,
    Left,
    Right,
}

impl Facing {
    pub const fn default_for(color: Color) -> Self {
        match color {
            Color::White => Self::Up,
            Color::Black => Self::Down,
        }
    }

    /// (column delta, row delta) of one forward step. Row 0 is the top edge.
    pub const fn forward(self) -> (i32, i32) {
        match self {
            Self::Up => (0, -1),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
        }
    }

    /// Unit vector perpendicular to `forward`, always non-negative.
    pub const fn sideways(self) -> (i32, i32) {
        let (dc, dr) = self.forward();
        (dr.abs(), dc.abs())
    }

    /// The two squares a pawn captures on, as offsets.
    pub const fn capture_offsets(self) -> [(i32, i32); 2] {
        let (fc, fr) = self.forward();
        let (sc, sr) = self.sideways();
        [(fc - sc, fr - sr), (fc + sc, fr + sr)]
    }
}

/// Piece a pawn may turn into on the last rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Promotion {
    Queen,
    Bishop,
    Knight,
    Rook,
}

impl Promotion {
    pub const ALL: [Self; 4] = [Self::Queen, Self::Bishop, Self::Knight, Self::Rook];

    pub const fn kind(self) -> PieceKind {
        match self {
            Self::Queen => PieceKind::Queen,
            Self::Bishop => PieceKind::Bishop,
            Self::Knight => PieceKind::Knight,
            Self::Rook => PieceKind::Rook,
        }
    }
}

/// A piece instance on the board. `facing` only matters for pawns and is
/// stored per instance so two boards never share it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    pub kind: PieceKind,
    pub color: Color,
    pub facing: Facing,
}

impl Piece {
    #[must_use]
    pub const fn new(kind: PieceKind, color: Color) -> Self {
        Self {
            kind,
            color,
            facing: Facing::default_for(color),
        }
    }

    #[must_use]
    pub const fn with_facing(mut self, facing: Facing) -> Self {
        self.facing = facing;
        self
    }

    pub const fn is_pawn(self) -> bool {
        matches!(self.kind, PieceKind::Pawn)
    }

    pub const fn is_friendly(self, other: Self) -> bool {
        self.color.index() == other.color.index()
    }

    pub fn symbol(self) -> char {
        match self.color {
            Color::White => self.kind.symbol(),
            Color::Black => self.kind.symbol().to_ascii_lowercase(),
        }
    }

    /// Persisted name such as `W_Knight` or `B_Heart`.
    pub fn code(self) -> String {
        format!("{}_{}", self.color.prefix(), self.kind.name())
    }

    pub fn from_code(code: &str) -> Option<Self> {
        let (prefix, name) = code.split_once('_')?;
        let color = match prefix {
            "W" => Color::White,
            "B" => Color::Black,
            _ => return None,
        };
        PieceKind::ALL
            .into_iter()
            .find(|kind| kind.name() == name)
            .map(|kind| Self::new(kind, color))
    }
}

pub const KING_DIRS: [(i32, i32); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

pub const KNIGHT_DELTAS: [(i32, i32); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

pub const ROOK_DIRS: [(i32, i32); 4] = [(0, -1), (0, 1), (-1, 0), (1, 0)];

pub const BISHOP_DIRS: [(i32, i32); 4] = [(-1, -1), (1, 1), (1, -1), (-1, 1)];

pub const QUEEN_DIRS: [(i32, i32); 8] = [
    (-1, -1),
    (1, 1),
    (1, -1),
    (-1, 1),
    (0, -1),
    (0, 1),
    (-1, 0),
    (1, 0),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_facing() {
        assert_eq!(Piece::new(PieceKind::Pawn, Color::White).facing, Facing::Up);
        assert_eq!(Piece::new(PieceKind::Pawn, Color::Black).facing, Facing::Down);
    }

    #[test]
    fn test_capture_offsets_follow_facing() {
        assert_eq!(Facing::Up.capture_offsets(), [(-1, -1), (1, -1)]);
        assert_eq!(Facing::Down.capture_offsets(), [(-1, 1), (1, 1)]);
        assert_eq!(Facing::Left.capture_offsets(), [(-1, -1), (-1, 1)]);
        assert_eq!(Facing::Right.capture_offsets(), [(1, -1), (1, 1)]);
    }

    #[test]
    fn test_codes() {
        let heart = Piece::new(PieceKind::Heart, Color::Black);
        assert_eq!(heart.code(), "B_Heart");
        assert_eq!(Piece::from_code("B_Heart"), Some(heart));
        assert_eq!(Piece::from_code("W_Wizard"), None);
        assert_eq!(Piece::from_code("X_King"), None);
        assert_eq!(Piece::from_code("King"), None);
    }

    #[test]
    fn test_symbols() {
        assert_eq!(
            PieceKind::from_symbol('n'),
            Some((PieceKind::Knight, Color::Black))
        );
        assert_eq!(
            PieceKind::from_symbol('H'),
            Some((PieceKind::Heart, Color::White))
        );
        assert_eq!(PieceKind::from_symbol('x'), None);
        assert_eq!(Piece::new(PieceKind::Rook, Color::Black).symbol(), 'r');
    }

    #[test]
    fn test_categories() {
        assert_eq!(PieceKind::King.category(), Category::King);
        assert_eq!(PieceKind::Heart.category(), Category::Heart);
        assert_eq!(PieceKind::Pawn.category(), Category::Other);
        assert!(PieceKind::Heart.is_protectee());
        assert!(!PieceKind::Queen.is_protectee());
    }
}
