//! Property tests for invariants that must hold for any board or piece
//! sequence: board dimensions, line clearing, collision bounds and the
//! no-repeat piece draw.

use proptest::prelude::*;

use blockfall::board::{Board, Cell};
use blockfall::collision::{collides, rotate};
use blockfall::config::GameConfig;
use blockfall::game::{Direction, Game, Position};
use blockfall::generator::{PieceProvider, RandomPieceProvider};
use blockfall::shapes::{PieceType, Shape};

const W: usize = 10;
const H: usize = 20;

fn rotated(piece_type: PieceType, turns: usize) -> Shape {
    let mut shape = piece_type.template().shape;
    for _ in 0..turns {
        shape = rotate(&shape);
    }
    shape
}

fn apply(game: &mut Game, action: u8) {
    match action {
        0 => game.tick(),
        1 => {
            game.move_horizontal(Direction::Left);
        }
        2 => {
            game.move_horizontal(Direction::Right);
        }
        3 => {
            game.rotate();
        }
        4 => game.hard_drop(),
        5 => game.toggle_pause(),
        _ => game.reset(),
    }
}

fn assert_dimensions(board: &Board) {
    assert_eq!(board.rows().len(), H);
    assert!(board.rows().iter().all(|row| row.len() == W));
}

fn board_strategy() -> impl Strategy<Value = Vec<Vec<Cell>>> {
    // Bias towards full rows so clears actually happen.
    let row = prop_oneof![
        1 => Just(vec![3u8; W]),
        2 => prop::collection::vec(0u8..=7, W),
    ];
    prop::collection::vec(row, H)
}

fn to_board(rows: &[Vec<Cell>]) -> Board {
    let mut board = Board::empty(W, H);
    for (y, row) in rows.iter().enumerate() {
        for (x, cell) in row.iter().enumerate() {
            board.set(x, y, *cell);
        }
    }
    board
}

#[test]
fn four_rotations_are_identity() {
    for piece_type in PieceType::ALL {
        assert_eq!(rotated(piece_type, 4), piece_type.template().shape);
    }
}

proptest! {
    #[test]
    fn board_keeps_its_size_through_play(
        seed in any::<u64>(),
        actions in prop::collection::vec(0u8..7, 1..300),
    ) {
        let config = GameConfig { seed: Some(seed), ..GameConfig::default() };
        let mut game = Game::with_config(config).expect("default config is valid");

        for action in actions {
            apply(&mut game, action);
            assert_dimensions(game.board());
            assert_dimensions(&game.render_grid());
            prop_assert!(game.level() >= 1);
            prop_assert!(game.drop_interval_ms() >= 100);
        }
    }

    #[test]
    fn clearing_preserves_rows_and_order(rows in board_strategy()) {
        let board = to_board(&rows);
        let full = rows.iter().filter(|row| Board::is_row_full(row)).count();
        let survivors: Vec<Vec<Cell>> = rows
            .iter()
            .filter(|row| !Board::is_row_full(row))
            .cloned()
            .collect();

        let (cleared_board, cleared) = board.clone().clear_full_rows();

        prop_assert_eq!(cleared as usize, full);
        assert_dimensions(&cleared_board);
        prop_assert!(cleared_board.rows()[..full].iter().all(|row| row.iter().all(|c| *c == 0)));
        prop_assert_eq!(&cleared_board.rows()[full..], &survivors[..]);
        if full == 0 {
            prop_assert_eq!(cleared_board, board);
        }
    }

    #[test]
    fn in_bounds_piece_on_empty_board_never_collides(
        kind in 0usize..7,
        turns in 0usize..4,
        x in -4i16..14,
        y in -4i16..24,
    ) {
        let shape = rotated(PieceType::ALL[kind], turns);
        let board = Board::empty(W, H);
        let position = Position { x, y };

        let cells: Vec<(i16, i16)> = shape.filled().map(|(dx, dy)| (x + dx, y + dy)).collect();
        let out_of_bounds = cells
            .iter()
            .any(|(cx, cy)| *cx < 0 || *cx >= W as i16 || *cy >= H as i16);
        let inside = cells
            .iter()
            .all(|(cx, cy)| *cx >= 0 && *cx < W as i16 && *cy >= 0 && *cy < H as i16);

        if out_of_bounds {
            prop_assert!(collides(&shape, &board, position));
        }
        if inside {
            prop_assert!(!collides(&shape, &board, position));
        }
    }

    #[test]
    fn random_provider_never_repeats(seed in any::<u64>()) {
        let mut provider = RandomPieceProvider::seeded(seed);
        let mut last = None;
        for _ in 0..1000 {
            let next = provider.next_type(last);
            prop_assert_ne!(Some(next), last);
            last = Some(next);
        }
    }
}
