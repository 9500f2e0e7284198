use crate::logic::board::Square;
use crate::logic::layout::{Layout, LayoutError};
use crate::logic::piece::Facing;

#[derive(Debug, Clone, Copy)]
pub struct Level {
    pub title: &'static str,
    pub diagram: &'static str,
    /// (column, row) of each pawn that does not use its color's default.
    pub facings: &'static [((usize, usize), Facing)],
}

impl Level {
    pub fn layout(&self) -> Result<Layout, LayoutError> {
        Layout::from_diagram(self.diagram)
    }

    pub fn facings(&self) -> Vec<(Square, Facing)> {
        self.facings
            .iter()
            .map(|&((col, row), facing)| (Square::new(col, row), facing))
            .collect()
    }
}

const BUILTIN: [Level; 3] = [
    Level {
        title: "Hold Your Horse",
        diagram: "
            hnn....
            nnn....
            nn.....
            .....NN
            ....NNN
            ....NNH
        ",
        facings: &[],
    },
    Level {
        title: "Regular Chess",
        diagram: "
            rnbqkbnr
            pppppppp
            ........
            ........
            ........
            ........
            PPPPPPPP
            RNBQKBNR
        ",
        facings: &[],
    },
    Level {
        title: "en passant",
        diagram: "
            .....p.k
            .....p..
            ........
            ........
            ........
            ....P...
            K...P...
        ",
        facings: &[],
    },
];

pub fn builtin() -> &'static [Level] {
    &BUILTIN
}

/// Case-insensitive lookup.
pub fn by_title(title: &str) -> Option<&'static Level> {
    BUILTIN
        .iter()
        .find(|level| level.title.eq_ignore_ascii_case(title.trim()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_levels_parse() {
        let sizes: Vec<(usize, usize)> = builtin()
            .iter()
            .map(|level| {
                let layout = level.layout().unwrap();
                (layout.width(), layout.height())
            })
            .collect();
        assert_eq!(sizes, vec![(7, 6), (8, 8), (8, 7)]);
    }

    #[test]
    fn test_lookup() {
        assert_eq!(by_title("regular chess").map(|l| l.title), Some("Regular Chess"));
        assert_eq!(by_title(" EN PASSANT ").map(|l| l.title), Some("en passant"));
        assert!(by_title("Bughouse").is_none());
    }
}
