//! GameView: maps `core::GameState` into a terminal framebuffer.
//!
//! This module is pure (no I/O). It can be unit-tested.

use crate::core::{GameState, Snake};
use crate::fb::{CellStyle, FrameBuffer, Rgb};
use crate::types::{Phase, PlayerId, Settings, Theme, Vector, Winner};

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

/// Colors for one theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub screen: Rgb,
    pub board: Rgb,
    pub grid: Rgb,
    pub border: Rgb,
    pub text: Rgb,
    pub muted: Rgb,
    pub p1: Rgb,
    pub p2: Rgb,
    pub food: Rgb,
}

impl Palette {
    pub const DARK: Palette = Palette {
        screen: Rgb::new(0, 0, 0),
        board: Rgb::new(24, 26, 34),
        grid: Rgb::new(70, 74, 88),
        border: Rgb::new(200, 200, 200),
        text: Rgb::new(220, 220, 220),
        muted: Rgb::new(130, 130, 140),
        p1: Rgb::new(80, 220, 120),
        p2: Rgb::new(90, 150, 240),
        food: Rgb::new(240, 90, 80),
    };

    pub const LIGHT: Palette = Palette {
        screen: Rgb::new(245, 245, 240),
        board: Rgb::new(228, 230, 222),
        grid: Rgb::new(180, 182, 172),
        border: Rgb::new(60, 60, 60),
        text: Rgb::new(30, 30, 30),
        muted: Rgb::new(110, 110, 110),
        p1: Rgb::new(30, 150, 60),
        p2: Rgb::new(40, 90, 200),
        food: Rgb::new(200, 50, 40),
    };

    pub fn for_theme(theme: Theme) -> Palette {
        match theme {
            Theme::Dark => Palette::DARK,
            Theme::Light => Palette::LIGHT,
        }
    }

    pub fn player(&self, player: PlayerId) -> Rgb {
        match player {
            PlayerId::P1 => self.p1,
            PlayerId::P2 => self.p2,
        }
    }
}

/// Placement of the board frame inside the viewport.
#[derive(Debug, Clone, Copy)]
struct Layout {
    x: u16,
    y: u16,
    w: u16,
    h: u16,
}

const SNAKE_GLYPH: char = '█';
const FOOD_GLYPH: [char; 2] = ['(', ')'];
const GRID_GLYPH: char = '·';

/// A lightweight terminal renderer for a two-player Snake match.
pub struct GameView {
    /// Board cell width in terminal columns.
    cell_w: u16,
    /// Board cell height in terminal rows.
    cell_h: u16,
}

impl Default for GameView {
    fn default() -> Self {
        // 2x1 helps compensate for typical terminal glyph aspect ratio.
        Self {
            cell_w: 2,
            cell_h: 1,
        }
    }
}

impl GameView {
    pub fn new(cell_w: u16, cell_h: u16) -> Self {
        Self {
            cell_w: cell_w.max(1),
            cell_h: cell_h.max(1),
        }
    }

    /// Render the current match into an existing framebuffer.
    ///
    /// Callers can reuse a framebuffer across frames and only resize when the
    /// terminal size changes.
    pub fn render_into(
        &self,
        state: &GameState,
        settings: &Settings,
        viewport: Viewport,
        fb: &mut FrameBuffer,
    ) {
        let settings = settings.normalized();
        let palette = Palette::for_theme(settings.theme);
        let size = settings.board_size;

        fb.resize(viewport.width, viewport.height);
        fb.clear(CellStyle::new(palette.text, palette.screen).cell(' '));

        let (board_px_w, board_px_h) = self.board_extent(size);
        let frame = Layout {
            x: viewport.width.saturating_sub(board_px_w.saturating_add(2)) / 2,
            y: viewport.height.saturating_sub(board_px_h.saturating_add(2)) / 2,
            w: board_px_w.saturating_add(2),
            h: board_px_h.saturating_add(2),
        };

        let bg = CellStyle::new(palette.grid, palette.board);
        fb.fill_rect(frame.x + 1, frame.y + 1, board_px_w, board_px_h, ' ', bg);
        self.draw_border(fb, frame, CellStyle::new(palette.border, palette.screen));

        if settings.show_grid {
            let dot = bg.dim();
            for y in 0..size {
                for x in 0..size {
                    self.fill_cell(fb, frame, x, y, [GRID_GLYPH, ' '], dot);
                }
            }
        }

        let food = state.food();
        if food.in_bounds(size) {
            let style = CellStyle::new(palette.food, palette.board).bold();
            self.draw_cell(fb, frame, food, size, FOOD_GLYPH, style);
        }

        for snake in state.snakes() {
            self.draw_snake(fb, frame, snake, size, &palette);
        }

        self.draw_side_panel(fb, state, &palette, viewport, frame);
        self.draw_overlay(fb, state, &palette, frame);
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(&self, state: &GameState, settings: &Settings, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(state, settings, viewport, &mut fb);
        fb
    }

    /// Terminal position of the top-left column of board cell `(x, y)`.
    pub fn cell_origin(&self, settings: &Settings, viewport: Viewport, x: u16, y: u16) -> (u16, u16) {
        let size = settings.normalized().board_size;
        let (board_px_w, board_px_h) = self.board_extent(size);
        let fx = viewport.width.saturating_sub(board_px_w.saturating_add(2)) / 2;
        let fy = viewport.height.saturating_sub(board_px_h.saturating_add(2)) / 2;
        (
            (fx + 1).saturating_add(x.saturating_mul(self.cell_w)),
            (fy + 1).saturating_add(y.saturating_mul(self.cell_h)),
        )
    }

    /// Board size in terminal cells, border excluded.
    fn board_extent(&self, size: u16) -> (u16, u16) {
        (size.saturating_mul(self.cell_w), size.saturating_mul(self.cell_h))
    }

    fn draw_border(&self, fb: &mut FrameBuffer, frame: Layout, style: CellStyle) {
        let Layout { x, y, w, h } = frame;
        if w < 2 || h < 2 {
            return;
        }

        fb.put_char(x, y, '┌', style);
        fb.put_char(x + w - 1, y, '┐', style);
        fb.put_char(x, y + h - 1, '└', style);
        fb.put_char(x + w - 1, y + h - 1, '┘', style);

        for dx in 1..w - 1 {
            fb.put_char(x + dx, y, '─', style);
            fb.put_char(x + dx, y + h - 1, '─', style);
        }
        for dy in 1..h - 1 {
            fb.put_char(x, y + dy, '│', style);
            fb.put_char(x + w - 1, y + dy, '│', style);
        }
    }

    fn draw_snake(
        &self,
        fb: &mut FrameBuffer,
        frame: Layout,
        snake: &Snake,
        size: u16,
        palette: &Palette,
    ) {
        let mut body = CellStyle::new(palette.player(snake.id()), palette.board);
        if !snake.alive() {
            body = body.dim();
        }

        // Head last so it stays bold if a dead snake overlaps itself.
        for cell in snake.cells().skip(1) {
            self.draw_cell(fb, frame, cell, size, [SNAKE_GLYPH; 2], body);
        }
        self.draw_cell(fb, frame, snake.head(), size, [SNAKE_GLYPH; 2], body.bold());
    }

    fn draw_cell(
        &self,
        fb: &mut FrameBuffer,
        frame: Layout,
        cell: Vector,
        size: u16,
        glyph: [char; 2],
        style: CellStyle,
    ) {
        if !cell.in_bounds(size) {
            return;
        }
        self.fill_cell(fb, frame, cell.x as u16, cell.y as u16, glyph, style);
    }

    /// Fill one board cell; columns alternate between the two glyph halves.
    fn fill_cell(
        &self,
        fb: &mut FrameBuffer,
        frame: Layout,
        x: u16,
        y: u16,
        glyph: [char; 2],
        style: CellStyle,
    ) {
        let px = frame.x.saturating_add(1).saturating_add(x.saturating_mul(self.cell_w));
        let py = frame.y.saturating_add(1).saturating_add(y.saturating_mul(self.cell_h));
        if px >= fb.width() || py >= fb.height() {
            return;
        }
        let w = self.cell_w.min(fb.width() - px);
        let h = self.cell_h.min(fb.height() - py);
        for dy in 0..h {
            for dx in 0..w {
                fb.put_char(px + dx, py + dy, glyph[(dx % 2) as usize], style);
            }
        }
    }

    fn draw_side_panel(
        &self,
        fb: &mut FrameBuffer,
        state: &GameState,
        palette: &Palette,
        viewport: Viewport,
        frame: Layout,
    ) {
        let panel_x = frame.x.saturating_add(frame.w).saturating_add(2);
        if panel_x >= viewport.width {
            return;
        }
        let panel_w = viewport.width - panel_x;
        if panel_w < 12 {
            return;
        }

        let label = CellStyle::new(palette.text, palette.screen).bold();
        let value = CellStyle::new(palette.text, palette.screen);
        let muted = CellStyle::new(palette.muted, palette.screen);
        let scores = state.scores();

        let mut y = frame.y;
        for player in PlayerId::ALL {
            let style = CellStyle::new(palette.player(player), palette.screen).bold();
            let x = fb.put_str(panel_x, y, player.as_str(), style);
            fb.put_u32(x + 1, y, scores.get(player), value);
            if !state.snake(player).alive() {
                fb.put_str(x + 5, y, "dead", muted);
            }
            y = y.saturating_add(1);
        }
        y = y.saturating_add(1);

        fb.put_str(panel_x, y, "ROUND", label);
        y = y.saturating_add(1);
        let x = fb.put_u32(panel_x, y, state.round(), value);
        let x = fb.put_str(x, y, "/", value);
        fb.put_u32(x, y, state.rounds_total(), value);
        y = y.saturating_add(2);

        fb.put_str(panel_x, y, "STATE", label);
        y = y.saturating_add(1);
        fb.put_str(panel_x, y, phase_label(state.phase()), value);
        y = y.saturating_add(2);

        const CONTROLS: [(&str, &str); 6] = [
            ("WASD", "P1"),
            ("ARROWS", "P2"),
            ("SPACE", "pause"),
            ("R", "restart"),
            ("N", "next round"),
            ("Q", "quit"),
        ];
        for (key, what) in CONTROLS {
            if y >= viewport.height {
                break;
            }
            fb.put_str(panel_x, y, key, label);
            fb.put_str(panel_x + 7, y, what, muted);
            y = y.saturating_add(1);
        }
    }

    fn draw_overlay(&self, fb: &mut FrameBuffer, state: &GameState, palette: &Palette, frame: Layout) {
        let style = CellStyle::new(palette.text, palette.screen).bold();
        let hint = CellStyle::new(palette.muted, palette.screen);
        let mid_y = frame.y.saturating_add(frame.h / 2);

        match state.phase() {
            Phase::Countdown => {
                let secs = state.countdown_ms_left().div_ceil(1000);
                let x = frame.x.saturating_add(frame.w.saturating_sub(3) / 2);
                fb.put_char(x, mid_y, ' ', style);
                let x = fb.put_u32(x.saturating_add(1), mid_y, secs, style);
                fb.put_char(x, mid_y, ' ', style);
            }
            Phase::Paused => self.draw_overlay_text(fb, frame, mid_y, "PAUSED", style),
            Phase::GameOver => {
                let winner = state.round_winner();
                let text = round_result(winner);
                let style = winner_style(winner, palette, style);
                self.draw_overlay_text(fb, frame, mid_y, text, style);
                self.draw_overlay_text(fb, frame, mid_y.saturating_add(1), "N: next round", hint);
            }
            Phase::MatchOver => {
                let winner = state.match_winner();
                let text = match_result(winner);
                let style = winner_style(winner, palette, style);
                self.draw_overlay_text(fb, frame, mid_y, text, style);
                self.draw_overlay_text(fb, frame, mid_y.saturating_add(1), "R: new match", hint);
            }
            Phase::Running => {}
        }
    }

    fn draw_overlay_text(
        &self,
        fb: &mut FrameBuffer,
        frame: Layout,
        y: u16,
        text: &str,
        style: CellStyle,
    ) {
        let text_w = text.chars().count() as u16 + 2;
        let x = frame.x.saturating_add(frame.w.saturating_sub(text_w) / 2);
        let x = fb.put_str(x, y, " ", style);
        let x = fb.put_str(x, y, text, style);
        fb.put_str(x, y, " ", style);
    }
}

fn phase_label(phase: Phase) -> &'static str {
    match phase {
        Phase::Countdown => "get ready",
        Phase::Running => "running",
        Phase::Paused => "paused",
        Phase::GameOver => "round over",
        Phase::MatchOver => "match over",
    }
}

/// Result text takes the winning player's color; draws keep `fallback`.
fn winner_style(winner: Option<Winner>, palette: &Palette, fallback: CellStyle) -> CellStyle {
    match winner.and_then(Winner::player) {
        Some(player) => CellStyle::new(palette.player(player), palette.screen).bold(),
        None => fallback,
    }
}

fn round_result(winner: Option<Winner>) -> &'static str {
    match winner {
        Some(Winner::P1) => "P1 WINS ROUND",
        Some(Winner::P2) => "P2 WINS ROUND",
        Some(Winner::Draw) | None => "DRAW",
    }
}

fn match_result(winner: Option<Winner>) -> &'static str {
    match winner {
        Some(Winner::P1) => "P1 WINS MATCH",
        Some(Winner::P2) => "P2 WINS MATCH",
        Some(Winner::Draw) | None => "MATCH DRAWN",
    }
}
