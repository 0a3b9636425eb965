//! Terminal Duel Snake runner (default binary).
//!
//! Two players share one keyboard. It uses crossterm for input and a custom
//! framebuffer-based renderer.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use crossterm::event::{self, Event, KeyEventKind};
use tracing_subscriber::EnvFilter;

use duel_snake::engine::Match;
use duel_snake::input::{handle_key_event, should_quit};
use duel_snake::term::{FrameBuffer, GameView, TerminalRenderer, Viewport};
use duel_snake::types::{
    Settings, Theme, DEFAULT_BOARD_SIZE, DEFAULT_ROUNDS, DEFAULT_TICK_MS, FRAME_MS,
};

#[derive(Parser, Debug)]
#[command(name = "duel-snake")]
#[command(version, about = "Two-player simultaneous-move Snake for the terminal")]
struct Cli {
    /// Board edge length in cells
    #[arg(long, env = "DUEL_SNAKE_BOARD_SIZE", default_value_t = DEFAULT_BOARD_SIZE)]
    board_size: u16,

    /// Milliseconds per simulation tick
    #[arg(long, env = "DUEL_SNAKE_TICK_MS", default_value_t = DEFAULT_TICK_MS)]
    tick_ms: u32,

    /// Wrap around the board edges instead of dying on them
    #[arg(long, env = "DUEL_SNAKE_NO_WALLS")]
    no_walls: bool,

    /// Rounds per match
    #[arg(long, env = "DUEL_SNAKE_ROUNDS", default_value_t = DEFAULT_ROUNDS)]
    rounds: u32,

    /// Do not draw grid dots on empty cells
    #[arg(long)]
    hide_grid: bool,

    /// Color theme
    #[arg(long, value_enum, default_value_t = ThemeArg::Dark)]
    theme: ThemeArg,

    /// Seed for food placement (defaults to the current time)
    #[arg(long)]
    seed: Option<u64>,

    /// Write logs to this file (nothing is logged otherwise)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ThemeArg {
    Dark,
    Light,
}

impl From<ThemeArg> for Theme {
    fn from(arg: ThemeArg) -> Self {
        match arg {
            ThemeArg::Dark => Theme::Dark,
            ThemeArg::Light => Theme::Light,
        }
    }
}

impl Cli {
    fn settings(&self) -> Settings {
        Settings::default()
            .with_board_size(self.board_size)
            .with_tick_ms(self.tick_ms)
            .with_wall_collision(!self.no_walls)
            .with_rounds(self.rounds)
            .with_show_grid(!self.hide_grid)
            .with_theme(self.theme.into())
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings = cli.settings();
    settings.validate().context("invalid settings")?;

    if let Some(path) = &cli.log_file {
        init_logging(path)?;
    }

    let seed = cli.seed.unwrap_or_else(clock_seed);
    tracing::info!(seed, ?settings, "duel-snake starting");

    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = run(&mut term, Match::new(settings, seed));

    // Always try to restore terminal state.
    let _ = term.exit();
    result
}

/// Logs go to a file only; the game owns the terminal's alternate screen.
fn init_logging(path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("cannot create log file {}", path.display()))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(1)
}

fn run(term: &mut TerminalRenderer, mut game: Match) -> Result<()> {
    let view = GameView::default();
    let mut fb = FrameBuffer::new(0, 0);
    let frame = Duration::from_millis(u64::from(FRAME_MS));
    let mut last_advance = Instant::now();

    loop {
        // Render.
        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        view.render_into(game.state(), game.settings(), Viewport::new(w, h), &mut fb);
        term.draw_swap(&mut fb)?;

        // Input with timeout until the next frame.
        let timeout = frame
            .checked_sub(last_advance.elapsed())
            .unwrap_or(Duration::ZERO);

        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if should_quit(key) {
                        return Ok(());
                    }
                    if let Some(action) = handle_key_event(key) {
                        game.apply_action(action);
                    }
                }
                Event::Resize(..) => term.invalidate(),
                _ => {}
            }
        }

        // Advance by whole milliseconds; the fraction carries into the next frame.
        let elapsed_ms = last_advance.elapsed().as_millis();
        if elapsed_ms >= u128::from(FRAME_MS) {
            last_advance += Duration::from_millis(elapsed_ms as u64);
            game.advance(u32::try_from(elapsed_ms).unwrap_or(u32::MAX));
            // The engine logs each event; draining keeps its queue short.
            game.take_events();
        }
    }
}
