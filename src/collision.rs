//! Pure geometry: rotation and collision tests against a board.

use crate::board::{Board, EMPTY};
use crate::game::Position;
use crate::shapes::Shape;

/// Quarter turn clockwise: `out[i][j] = shape[n - 1 - j][i]`.
pub fn rotate(shape: &Shape) -> Shape {
    let n = shape.size();
    let rows = (0..n)
        .map(|i| (0..n).map(|j| shape.get(n - 1 - j, i)).collect())
        .collect();
    Shape::from_rows(rows)
}

/// True if any filled cell of `shape` at `position` is left or right of the
/// board, at or below its bottom, or on an occupied cell. Cells above the top
/// edge are allowed.
pub fn collides(shape: &Shape, board: &Board, position: Position) -> bool {
    let width = board.width() as i16;
    let height = board.height() as i16;

    shape.filled().any(|(dx, dy)| {
        let x = position.x + dx;
        let y = position.y + dy;
        if x < 0 || x >= width || y >= height {
            return true;
        }
        y >= 0 && board.get(x, y) != Some(EMPTY)
    })
}

/// Number of rows `shape` can fall from `position` before the next step
/// down would collide. A shape with no filled cells never falls.
pub fn drop_distance(shape: &Shape, board: &Board, position: Position) -> i16 {
    if shape.filled().next().is_none() {
        return 0;
    }
    let mut distance = 0;
    while !collides(shape, board, position.offset(0, distance + 1)) {
        distance += 1;
    }
    distance
}
