use std::ops::Index;

use crate::game::Position;
use crate::shapes::Shape;

/// A cell code: `0` is empty, `1..=7` is the color of the piece that filled it.
pub type Cell = u8;

pub const EMPTY: Cell = 0;

/// Fixed-size playfield. Always holds exactly `height` rows of `width` cells.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Board {
    width: usize,
    height: usize,
    rows: Vec<Vec<Cell>>,
}

impl Board {
    pub fn empty(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            rows: vec![vec![EMPTY; width]; height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    /// Cell at column `x`, row `y`, or `None` when the coordinate is off the board.
    pub fn get(&self, x: i16, y: i16) -> Option<Cell> {
        if x < 0 || y < 0 {
            return None;
        }
        self.rows.get(y as usize)?.get(x as usize).copied()
    }

    /// Out-of-range writes are ignored.
    pub fn set(&mut self, x: usize, y: usize, cell: Cell) {
        if let Some(slot) = self.rows.get_mut(y).and_then(|row| row.get_mut(x)) {
            *slot = cell;
        }
    }

    pub fn is_row_full(row: &[Cell]) -> bool {
        row.iter().all(|cell| *cell != EMPTY)
    }

    /// Removes every full row and pushes the same number of empty rows in at
    /// the top. Surviving rows keep their relative order.
    pub fn clear_full_rows(self) -> (Board, u32) {
        let Board {
            width,
            height,
            rows,
        } = self;

        let kept: Vec<Vec<Cell>> = rows
            .into_iter()
            .filter(|row| !Self::is_row_full(row))
            .collect();
        let cleared = height - kept.len();

        let mut new_rows = vec![vec![EMPTY; width]; cleared];
        new_rows.extend(kept);

        (
            Board {
                width,
                height,
                rows: new_rows,
            },
            cleared as u32,
        )
    }

    /// Writes every nonzero cell of `shape` at `position` as `color`.
    /// Cells landing outside the board, including above the top edge, are dropped.
    pub fn merged(&self, shape: &Shape, position: Position, color: Cell) -> Board {
        let mut board = self.clone();
        for (dx, dy) in shape.filled() {
            let x = position.x + dx;
            let y = position.y + dy;
            if x >= 0 && y >= 0 {
                board.set(x as usize, y as usize, color);
            }
        }
        board
    }
}

impl Index<usize> for Board {
    type Output = [Cell];

    fn index(&self, y: usize) -> &[Cell] {
        &self.rows[y]
    }
}
