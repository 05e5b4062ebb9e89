use log::{debug, info, trace};

use crate::board::Board;
use crate::collision::{self, collides};
use crate::config::{ConfigError, GameConfig};
use crate::generator::{PieceProvider, RandomPieceProvider};
use crate::shapes::Piece;

// ============================================================================
// Scoring
// ============================================================================

pub const SCORE_SINGLE: u32 = 40;
pub const SCORE_DOUBLE: u32 = 100;
pub const SCORE_TRIPLE: u32 = 300;
pub const SCORE_TETRIS: u32 = 1200;

/// Points for clearing `lines` rows in one lock at `level`.
pub fn points_for(lines: u32, level: u32) -> u32 {
    let base = match lines {
        1 => SCORE_SINGLE,
        2 => SCORE_DOUBLE,
        3 => SCORE_TRIPLE,
        4 => SCORE_TETRIS,
        _ => 0,
    };
    base * level
}

// ============================================================================
// Types
// ============================================================================

/// Board offset of a piece matrix's top-left corner.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Position {
    pub x: i16,
    pub y: i16,
}

impl Position {
    pub fn offset(self, dx: i16, dy: i16) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    pub fn dx(self) -> i16 {
        match self {
            Direction::Left => -1,
            Direction::Right => 1,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum GameState {
    Running,
    Paused,
    GameOver,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum GameEvent {
    PieceMoved,
    PieceRotated,
    PieceLocked,
    LinesCleared(u32),
    LevelUp(u32),
    Paused,
    Unpaused,
    GameRestarted,
    GameOver,
}

/// Owned copy of everything a renderer needs.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Snapshot {
    pub board: Board,
    pub current_piece: Piece,
    pub position: Position,
    pub next_piece: Piece,
    pub score: u32,
    pub level: u32,
    pub lines_cleared: u32,
    pub game_over: bool,
    pub paused: bool,
    pub drop_interval_ms: u64,
}

// ============================================================================
// Game
// ============================================================================

pub struct Game {
    config: GameConfig,
    board: Board,
    current_piece: Piece,
    position: Position,
    next_piece: Piece,
    drop_interval_ms: u64,
    state: GameState,
    score: u32,
    level: u32,
    lines_cleared: u32,
    piece_provider: Box<dyn PieceProvider>,
    events: Vec<GameEvent>,
}

impl Game {
    /// A game on the default 10x20 board with random pieces.
    pub fn new() -> Self {
        Self::build(GameConfig::default(), Box::new(RandomPieceProvider::new()))
    }

    pub fn with_config(config: GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let provider = match config.seed {
            Some(seed) => RandomPieceProvider::seeded(seed),
            None => RandomPieceProvider::new(),
        };
        Ok(Self::build(config, Box::new(provider)))
    }

    /// Default board, pieces drawn from `provider`.
    pub fn with_provider(provider: Box<dyn PieceProvider>) -> Self {
        Self::build(GameConfig::default(), provider)
    }

    pub fn with_config_and_provider(
        config: GameConfig,
        provider: Box<dyn PieceProvider>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(config, provider))
    }

    fn build(config: GameConfig, mut provider: Box<dyn PieceProvider>) -> Self {
        let current_piece = provider.next_piece(None);
        let next_piece = provider.next_piece(Some(current_piece.piece_type));

        Self {
            board: Board::empty(config.width, config.height),
            current_piece,
            position: spawn_position(&config),
            next_piece,
            drop_interval_ms: config.initial_drop_ms,
            state: GameState::Running,
            score: 0,
            level: 1,
            lines_cleared: 0,
            piece_provider: provider,
            events: Vec::new(),
            config,
        }
    }

    // ------------------------------------------------------------------------
    // Read access
    // ------------------------------------------------------------------------

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn current_piece(&self) -> &Piece {
        &self.current_piece
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn next_piece(&self) -> &Piece {
        &self.next_piece
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn lines_cleared(&self) -> u32 {
        self.lines_cleared
    }

    pub fn drop_interval_ms(&self) -> u64 {
        self.drop_interval_ms
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn is_paused(&self) -> bool {
        self.state == GameState::Paused
    }

    pub fn is_game_over(&self) -> bool {
        self.state == GameState::GameOver
    }

    pub fn spawn_position(&self) -> Position {
        spawn_position(&self.config)
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            board: self.board.clone(),
            current_piece: self.current_piece.clone(),
            position: self.position,
            next_piece: self.next_piece.clone(),
            score: self.score,
            level: self.level,
            lines_cleared: self.lines_cleared,
            game_over: self.is_game_over(),
            paused: self.is_paused(),
            drop_interval_ms: self.drop_interval_ms,
        }
    }

    /// The board with the falling piece drawn on top.
    pub fn render_grid(&self) -> Board {
        self.board.merged(
            &self.current_piece.shape,
            self.position,
            self.current_piece.color,
        )
    }

    /// Takes and clears all pending events
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    // ------------------------------------------------------------------------
    // Operations
    // ------------------------------------------------------------------------

    fn is_running(&self) -> bool {
        self.state == GameState::Running
    }

    /// One gravity step. Locks the piece if it cannot fall further.
    pub fn tick(&mut self) {
        if !self.is_running() {
            return;
        }
        let below = self.position.offset(0, 1);
        if collides(&self.current_piece.shape, &self.board, below) {
            self.lock_and_spawn(self.position);
        } else {
            self.position = below;
        }
    }

    pub fn soft_drop(&mut self) {
        self.tick();
    }

    /// Returns `false` if the move was blocked or the game is not running.
    pub fn move_horizontal(&mut self, direction: Direction) -> bool {
        if !self.is_running() {
            return false;
        }
        let moved = self.position.offset(direction.dx(), 0);
        if collides(&self.current_piece.shape, &self.board, moved) {
            return false;
        }
        self.position = moved;
        self.events.push(GameEvent::PieceMoved);
        true
    }

    /// Clockwise rotation in place. No kicks: a blocked rotation is rejected.
    pub fn rotate(&mut self) -> bool {
        if !self.is_running() {
            return false;
        }
        let rotated = collision::rotate(&self.current_piece.shape);
        if collides(&rotated, &self.board, self.position) {
            return false;
        }
        self.current_piece.shape = rotated;
        self.events.push(GameEvent::PieceRotated);
        true
    }

    pub fn hard_drop(&mut self) {
        if !self.is_running() {
            return;
        }
        let distance =
            collision::drop_distance(&self.current_piece.shape, &self.board, self.position);
        self.lock_and_spawn(self.position.offset(0, distance));
    }

    pub fn toggle_pause(&mut self) {
        match self.state {
            GameState::Running => {
                self.state = GameState::Paused;
                self.events.push(GameEvent::Paused);
                info!("game paused");
            }
            GameState::Paused => {
                self.state = GameState::Running;
                self.events.push(GameEvent::Unpaused);
                info!("game resumed");
            }
            GameState::GameOver => {}
        }
    }

    /// Starts a new session. Piece history from the old session is not carried over.
    pub fn reset(&mut self) {
        self.board = Board::empty(self.config.width, self.config.height);
        self.current_piece = self.piece_provider.next_piece(None);
        self.next_piece = self
            .piece_provider
            .next_piece(Some(self.current_piece.piece_type));
        self.position = spawn_position(&self.config);
        self.drop_interval_ms = self.config.initial_drop_ms;
        self.state = GameState::Running;
        self.score = 0;
        self.level = 1;
        self.lines_cleared = 0;

        self.events.clear();
        self.events.push(GameEvent::GameRestarted);
        info!("game reset");
    }

    // ------------------------------------------------------------------------
    // Locking
    // ------------------------------------------------------------------------

    fn lock_and_spawn(&mut self, resting: Position) {
        let merged = self.board.merged(
            &self.current_piece.shape,
            resting,
            self.current_piece.color,
        );
        self.events.push(GameEvent::PieceLocked);
        debug!(
            "locked {:?} at ({}, {})",
            self.current_piece.piece_type, resting.x, resting.y
        );

        // `next_piece` is always the most recently generated piece, so its
        // type is the history the provider needs.
        let upcoming = self
            .piece_provider
            .next_piece(Some(self.next_piece.piece_type));
        self.current_piece = std::mem::replace(&mut self.next_piece, upcoming);
        self.position = spawn_position(&self.config);
        trace!("spawned {:?}", self.current_piece.piece_type);

        if collides(&self.current_piece.shape, &merged, self.position) {
            self.state = GameState::GameOver;
            self.events.push(GameEvent::GameOver);
            info!(
                "game over: score {}, level {}, lines {}",
                self.score, self.level, self.lines_cleared
            );
        }

        let (board, cleared) = merged.clear_full_rows();
        self.board = board;
        if cleared > 0 {
            self.events.push(GameEvent::LinesCleared(cleared));
            self.add_score(cleared);
        }
    }

    /// Scores at the level in effect before this clear, then applies any level-up.
    fn add_score(&mut self, lines: u32) {
        let points = points_for(lines, self.level);
        self.score += points;

        let prior = self.lines_cleared;
        self.lines_cleared += lines;
        info!("cleared {} line(s) for {} points", lines, points);

        let per_level = self.config.lines_per_level;
        if self.lines_cleared / per_level > prior / per_level {
            self.level = self.lines_cleared / per_level + 1;
            self.drop_interval_ms = self.config.drop_interval_ms(self.lines_cleared);
            self.events.push(GameEvent::LevelUp(self.level));
            info!(
                "level {} reached, drop interval {}ms",
                self.level, self.drop_interval_ms
            );
        }
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

/// Horizontally centered, top row.
fn spawn_position(config: &GameConfig) -> Position {
    Position {
        x: (config.width / 2) as i16 - 2,
        y: 0,
    }
}

// ============================================================================
// Test Helpers
// ============================================================================

pub mod test_helpers {
    use super::*;
    use crate::board::{Cell, EMPTY};
    use crate::config::{DEFAULT_HEIGHT, DEFAULT_WIDTH};

    /// Filler code for hand-built boards.
    pub const JUNK: Cell = 6;

    pub fn empty_board() -> Board {
        Board::empty(DEFAULT_WIDTH, DEFAULT_HEIGHT)
    }

    pub fn fill_row(board: &mut Board, y: usize) {
        for x in 0..board.width() {
            board.set(x, y, JUNK);
        }
    }

    pub fn fill_row_with_gap(board: &mut Board, y: usize, gap_x: usize) {
        for x in 0..board.width() {
            if x != gap_x {
                board.set(x, y, JUNK);
            }
        }
    }

    pub fn is_row_complete(board: &Board, y: usize) -> bool {
        Board::is_row_full(&board[y])
    }

    pub fn filled_count_in_row(board: &Board, y: usize) -> usize {
        board[y].iter().filter(|cell| **cell != EMPTY).count()
    }

    pub fn total_filled_cells(board: &Board) -> usize {
        board.rows().iter().flatten().filter(|cell| **cell != EMPTY).count()
    }

    /// Replaces the board and puts `piece` at `position`, leaving the rest of
    /// the session untouched.
    pub fn arrange(game: &mut Game, board: Board, piece: Piece, position: Position) {
        game.board = board;
        game.current_piece = piece;
        game.position = position;
    }

    pub fn set_board(game: &mut Game, board: Board) {
        game.board = board;
    }

    /// Jumps the progress counters, e.g. to just below a level boundary.
    pub fn set_progress(game: &mut Game, lines_cleared: u32, level: u32) {
        game.lines_cleared = lines_cleared;
        game.level = level;
    }
}
