use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame, Terminal,
};
use std::{
    fs::File,
    io::{stdout, Stdout},
    path::PathBuf,
    time::{Duration, Instant},
};

use blockfall::board::{Cell, EMPTY};
use blockfall::config::{GameConfig, DEFAULT_HEIGHT, DEFAULT_WIDTH, INITIAL_DROP_MS};
use blockfall::game::{Direction, Game, GameState};

// ============================================================================
// Command Line
// ============================================================================

#[derive(Parser, Debug)]
#[command(version, about = "Falling-block puzzle game for the terminal")]
struct Cli {
    /// Board width in cells
    #[arg(long, default_value_t = DEFAULT_WIDTH)]
    width: usize,

    /// Board height in cells
    #[arg(long, default_value_t = DEFAULT_HEIGHT)]
    height: usize,

    /// Starting drop interval in milliseconds
    #[arg(long, default_value_t = INITIAL_DROP_MS)]
    drop_ms: u64,

    /// Seed for the piece generator
    #[arg(long)]
    seed: Option<u64>,

    /// Write logs here (filter with RUST_LOG)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Cli {
    fn game_config(&self) -> GameConfig {
        GameConfig {
            width: self.width,
            height: self.height,
            initial_drop_ms: self.drop_ms,
            min_drop_ms: GameConfig::default().min_drop_ms.min(self.drop_ms),
            seed: self.seed,
            ..GameConfig::default()
        }
    }
}

fn init_logging(path: Option<&PathBuf>) -> Result<()> {
    // stderr is hidden behind the alternate screen, so only a file target is useful.
    let Some(path) = path else {
        return Ok(());
    };
    let file = File::create(path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

// ============================================================================
// Visual Constants
// ============================================================================

const CELL_WIDTH: u16 = 2;
const BLOCK_CHAR: &str = "██";
const EMPTY_CHAR: &str = "  ";

// ============================================================================
// Color Mapping
// ============================================================================

fn cell_color(cell: Cell) -> Color {
    match cell {
        1 => Color::Cyan,
        2 => Color::Blue,
        3 => Color::Rgb(255, 127, 0),
        4 => Color::Yellow,
        5 => Color::Green,
        6 => Color::Rgb(128, 0, 128),
        7 => Color::Red,
        _ => Color::Reset,
    }
}

fn cell_span(cell: Cell) -> Span<'static> {
    if cell == EMPTY {
        Span::raw(EMPTY_CHAR)
    } else {
        Span::styled(BLOCK_CHAR, Style::default().fg(cell_color(cell)))
    }
}

// ============================================================================
// Rendering
// ============================================================================

fn render(frame: &mut Frame, game: &Game) {
    let area = frame.size();

    render_game(frame, game, area);
    match game.state() {
        GameState::Running => {}
        GameState::Paused => render_paused(frame, area),
        GameState::GameOver => render_game_over(frame, game, area),
    }
}

fn render_game(frame: &mut Frame, game: &Game, area: Rect) {
    let board = game.board();
    let grid_display_width = (board.width() as u16 * CELL_WIDTH) + 2;
    let grid_display_height = board.height() as u16 + 2;
    let preview_width = 12;
    let info_width = 14;
    let total_width = grid_display_width + preview_width + info_width + 4;
    let total_height = grid_display_height + 3;

    let main_area = centered_rect(total_width, total_height, area);

    let vertical = Layout::vertical([
        Constraint::Length(grid_display_height),
        Constraint::Fill(1),
    ])
    .split(main_area);

    let game_row = vertical[0];

    // [Grid][Next][Info]
    let horizontal = Layout::horizontal([
        Constraint::Length(grid_display_width),
        Constraint::Length(preview_width),
        Constraint::Length(info_width),
    ])
    .split(game_row);

    render_grid(frame, game, horizontal[0]);
    render_preview(frame, game, horizontal[1]);
    render_info(frame, game, horizontal[2]);

    let controls_area = Rect {
        x: area.x,
        y: game_row.y + game_row.height,
        width: area.width,
        height: 2,
    };

    if controls_area.y + 1 < area.height {
        let controls = Paragraph::new(vec![Line::from(
            "←→: Move | ↑: Rotate | ↓: Drop | Space: Hard drop | P: Pause | R: Reset | Q: Quit",
        )])
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(controls, controls_area);
    }
}

fn render_grid(frame: &mut Frame, game: &Game, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Blockfall ")
        .title_alignment(Alignment::Center);

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let visual = game.render_grid();
    let lines: Vec<Line> = visual
        .rows()
        .iter()
        .map(|row| Line::from(row.iter().map(|cell| cell_span(*cell)).collect::<Vec<_>>()))
        .collect();

    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_preview(frame: &mut Frame, game: &Game, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Next ")
        .title_alignment(Alignment::Center);

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut lines: Vec<Line> = vec![Line::from("")];
    for row in game.next_piece().preview() {
        let spans: Vec<Span> = row.iter().map(|cell| cell_span(*cell)).collect();
        lines.push(Line::from(spans));
    }

    let paragraph = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(paragraph, inner);
}

fn render_info(frame: &mut Frame, game: &Game, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Info ")
        .title_alignment(Alignment::Center);

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled("Score", Style::default().fg(Color::Yellow))),
        Line::from(format!("{}", game.score())),
        Line::from(""),
        Line::from(Span::styled("Lines", Style::default().fg(Color::Cyan))),
        Line::from(format!("{}", game.lines_cleared())),
        Line::from(""),
        Line::from(Span::styled("Level", Style::default().fg(Color::Green))),
        Line::from(format!("{}", game.level())),
        Line::from(""),
        Line::from(Span::styled("Speed", Style::default().fg(Color::Magenta))),
        Line::from(format!("{}ms", game.drop_interval_ms())),
    ];

    let paragraph = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(paragraph, inner);
}

fn render_game_over(frame: &mut Frame, game: &Game, area: Rect) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled("GAME OVER", Style::default().fg(Color::Red))),
        Line::from(""),
        Line::from(format!("Score: {}", game.score())),
        Line::from(format!("Lines: {}", game.lines_cleared())),
        Line::from(format!("Level: {}", game.level())),
        Line::from(""),
        Line::from(Span::styled(
            "R to restart, Q to quit",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let paragraph = Paragraph::new(text).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Game Over ")
            .title_alignment(Alignment::Center)
            .style(Style::default().bg(Color::Black)),
    );

    let popup_area = centered_rect(26, 12, area);
    frame.render_widget(paragraph, popup_area);
}

fn render_paused(frame: &mut Frame, area: Rect) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled("PAUSED", Style::default().fg(Color::Yellow))),
        Line::from(""),
        Line::from(Span::styled(
            "Press P to continue",
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(Span::styled(
            "Press Q to quit",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let paragraph = Paragraph::new(text).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Paused ")
            .title_alignment(Alignment::Center)
            .style(Style::default().bg(Color::Black)),
    );

    let popup_area = centered_rect(24, 10, area);
    frame.render_widget(paragraph, popup_area);
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let horizontal = Layout::horizontal([
        Constraint::Fill(1),
        Constraint::Length(width.min(area.width)),
        Constraint::Fill(1),
    ])
    .split(area);

    let vertical = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(height.min(area.height)),
        Constraint::Fill(1),
    ])
    .split(horizontal[1]);

    vertical[1]
}

// ============================================================================
// Input
// ============================================================================

enum Flow {
    Continue,
    Quit,
}

fn handle_key(game: &mut Game, code: KeyCode) -> Flow {
    match code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => return Flow::Quit,
        KeyCode::Char('p') | KeyCode::Char('P') => game.toggle_pause(),
        KeyCode::Char('r') | KeyCode::Char('R') => game.reset(),
        KeyCode::Left => {
            game.move_horizontal(Direction::Left);
        }
        KeyCode::Right => {
            game.move_horizontal(Direction::Right);
        }
        KeyCode::Down => game.soft_drop(),
        KeyCode::Up => {
            game.rotate();
        }
        KeyCode::Char(' ') => game.hard_drop(),
        _ => {}
    }
    Flow::Continue
}

// ============================================================================
// Main Loop
// ============================================================================

fn run(terminal: &mut Terminal<CrosstermBackend<Stdout>>, game: &mut Game) -> Result<()> {
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|frame| render(frame, game))?;

        // Re-read every pass so a level-up applies from the next tick on.
        let tick_duration = Duration::from_millis(game.drop_interval_ms());
        let timeout = tick_duration
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);

        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    if let Flow::Quit = handle_key(game, key.code) {
                        return Ok(());
                    }
                }
            }
        }

        if last_tick.elapsed() >= tick_duration {
            game.tick();
            last_tick = Instant::now();
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_file.as_ref())?;

    let mut game = Game::with_config(cli.game_config()).context("invalid game settings")?;
    log::info!(
        "starting {}x{} game",
        game.config().width,
        game.config().height
    );

    enable_raw_mode().context("failed to enable raw mode")?;
    stdout()
        .execute(EnterAlternateScreen)
        .context("failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout());

    let result = Terminal::new(backend)
        .map_err(anyhow::Error::from)
        .and_then(|mut terminal| run(&mut terminal, &mut game));

    // Restore the terminal even if the loop failed.
    if let Err(err) = disable_raw_mode() {
        log::warn!("failed to disable raw mode: {}", err);
    }
    if let Err(err) = stdout().execute(LeaveAlternateScreen) {
        log::warn!("failed to leave alternate screen: {}", err);
    }

    result
}
