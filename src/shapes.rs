//! The seven piece templates.
//!
//! Every template is a square matrix of cell codes. The nonzero entries give
//! the geometry and also carry the piece's fixed color code, so a locked piece
//! leaves its type's code behind on the board.

use crate::board::Cell;

// ============================================================================
// Piece Types
// ============================================================================

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum PieceType {
    I,
    J,
    L,
    O,
    S,
    T,
    Z,
}

impl PieceType {
    pub const ALL: [PieceType; 7] = [
        PieceType::I,
        PieceType::J,
        PieceType::L,
        PieceType::O,
        PieceType::S,
        PieceType::T,
        PieceType::Z,
    ];

    /// Color code written into the board when a piece of this type locks.
    pub fn color(&self) -> Cell {
        match self {
            PieceType::I => 1,
            PieceType::J => 2,
            PieceType::L => 3,
            PieceType::O => 4,
            PieceType::S => 5,
            PieceType::T => 6,
            PieceType::Z => 7,
        }
    }

    fn matrix(&self) -> Vec<Vec<Cell>> {
        let c = self.color();
        match self {
            PieceType::I => vec![
                vec![0, 0, 0, 0],
                vec![c, c, c, c],
                vec![0, 0, 0, 0],
                vec![0, 0, 0, 0],
            ],
            PieceType::J => vec![
                vec![c, 0, 0],
                vec![c, c, c],
                vec![0, 0, 0],
            ],
            PieceType::L => vec![
                vec![0, 0, c],
                vec![c, c, c],
                vec![0, 0, 0],
            ],
            PieceType::O => vec![
                vec![c, c],
                vec![c, c],
            ],
            PieceType::S => vec![
                vec![0, c, c],
                vec![c, c, 0],
                vec![0, 0, 0],
            ],
            PieceType::T => vec![
                vec![0, c, 0],
                vec![c, c, c],
                vec![0, 0, 0],
            ],
            PieceType::Z => vec![
                vec![c, c, 0],
                vec![0, c, c],
                vec![0, 0, 0],
            ],
        }
    }

    /// A fresh piece built from this type's template. Each call allocates a
    /// new matrix, so rotating or merging the result never touches the catalog.
    pub fn template(&self) -> Piece {
        Piece {
            piece_type: *self,
            shape: Shape::from_rows(self.matrix()),
            color: self.color(),
        }
    }
}

// ============================================================================
// Shape
// ============================================================================

/// Square matrix of cell codes, indexed `[row][col]`.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Shape {
    rows: Vec<Vec<Cell>>,
}

impl Shape {
    /// Callers must pass a square matrix; rotation is only defined for those.
    pub fn from_rows(rows: Vec<Vec<Cell>>) -> Self {
        debug_assert!(rows.iter().all(|row| row.len() == rows.len()));
        Self { rows }
    }

    pub fn size(&self) -> usize {
        self.rows.len()
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn get(&self, row: usize, col: usize) -> Cell {
        self.rows[row][col]
    }

    /// Offsets `(dx, dy)` of every nonzero cell, relative to the top-left corner.
    pub fn filled(&self) -> impl Iterator<Item = (i16, i16)> + '_ {
        self.rows.iter().enumerate().flat_map(|(dy, row)| {
            row.iter()
                .enumerate()
                .filter(|(_, cell)| **cell != 0)
                .map(move |(dx, _)| (dx as i16, dy as i16))
        })
    }

    /// The nonzero cells cropped to their bounding box. Used to draw a
    /// piece centered in a preview panel regardless of padding in its template.
    pub fn trimmed(&self) -> Vec<Vec<Cell>> {
        let offsets: Vec<(i16, i16)> = self.filled().collect();
        let (Some(min_x), Some(max_x)) = (
            offsets.iter().map(|(x, _)| *x).min(),
            offsets.iter().map(|(x, _)| *x).max(),
        ) else {
            return Vec::new();
        };
        let min_y = offsets.iter().map(|(_, y)| *y).min().unwrap_or(0);
        let max_y = offsets.iter().map(|(_, y)| *y).max().unwrap_or(0);

        (min_y..=max_y)
            .map(|y| {
                (min_x..=max_x)
                    .map(|x| self.rows[y as usize][x as usize])
                    .collect()
            })
            .collect()
    }
}

// ============================================================================
// Piece
// ============================================================================

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Piece {
    pub piece_type: PieceType,
    pub shape: Shape,
    /// Same for every rotation of the piece.
    pub color: Cell,
}

impl Piece {
    pub fn preview(&self) -> Vec<Vec<Cell>> {
        self.shape.trimmed()
    }
}
