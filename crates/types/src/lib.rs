//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the application.
//! All types are plain values, usable in any context (simulation, input
//! mapping, terminal rendering).
//!
//! # Board Geometry
//!
//! The board is a square grid of `board_size` x `board_size` cells:
//!
//! - **x** grows to the right, **y** grows downwards
//! - `(0, 0)` is the top-left cell
//! - Both snakes spawn on the middle row (`board_size / 2`)
//!
//! # Game Timing Constants
//!
//! Timing values are in milliseconds:
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `FRAME_MS` | 16 | Render/input frame of the terminal runner |
//! | `COUNTDOWN_MS` | 3000 | Countdown before every round |
//! | `COUNTDOWN_STEP_MS` | 100 | Granularity the countdown is driven at |
//! | `DEFAULT_TICK_MS` | 120 | Default interval between simulation ticks |
//! | `MIN_TICK_MS` | 10 | Fastest accepted tick interval |
//!
//! # Examples
//!
//! ```
//! use duel_snake_types::{Direction, PlayerId, Settings, Vector};
//!
//! let settings = Settings::default();
//! assert_eq!(settings.board_size, 24);
//!
//! let head = Vector::new(0, 5);
//! assert_eq!(head.moved(Direction::Left), Vector::new(-1, 5));
//! assert_eq!(head.moved(Direction::Left).wrapped(24), Vector::new(23, 5));
//!
//! assert!(Direction::Up.is_opposite(Direction::Down));
//! assert_eq!(PlayerId::P2.index(), 1);
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Render/input frame interval of the terminal runner (16ms ≈ 60 FPS)
pub const FRAME_MS: u32 = 16;

/// Countdown length before each round starts
pub const COUNTDOWN_MS: u32 = 3000;

/// Step the countdown is decremented by
pub const COUNTDOWN_STEP_MS: u32 = 100;

/// Random draws attempted before food placement gives up
pub const FOOD_SPAWN_ATTEMPTS: u32 = 1000;

/// Number of body cells each snake spawns with
pub const INITIAL_SNAKE_LEN: i32 = 3;

/// Smallest board that fits both spawn bodies; at this size the heads start adjacent
pub const MIN_BOARD_SIZE: u16 = 6;

/// Largest accepted board
pub const MAX_BOARD_SIZE: u16 = 200;

/// Largest accepted number of rounds per match
pub const MAX_ROUNDS: u32 = 99;

/// Fastest accepted tick interval
pub const MIN_TICK_MS: u32 = 10;

pub const DEFAULT_BOARD_SIZE: u16 = 24;
pub const DEFAULT_TICK_MS: u32 = 120;
pub const DEFAULT_ROUNDS: u32 = 5;

/// A board cell coordinate.
///
/// Coordinates are signed so that a head stepping off the board can still be
/// reported (death events carry the out-of-bounds cell).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Vector {
    pub x: i32,
    pub y: i32,
}

impl Vector {
    pub const ORIGIN: Vector = Vector { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The neighbouring cell in `dir`.
    pub fn moved(self, dir: Direction) -> Self {
        let (dx, dy) = dir.delta();
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Fold the coordinate back onto a toroidal `size` x `size` board.
    pub fn wrapped(self, size: u16) -> Self {
        let size = i32::from(size.max(1));
        Self {
            x: self.x.rem_euclid(size),
            y: self.y.rem_euclid(size),
        }
    }

    pub fn in_bounds(self, size: u16) -> bool {
        let size = i32::from(size);
        (0..size).contains(&self.x) && (0..size).contains(&self.y)
    }
}

/// Direction a snake travels in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Returns the delta (dx, dy) for moving one cell in this direction
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Returns true if turning from self to `other` would be a 180-degree turn
    pub fn is_opposite(self, other: Direction) -> bool {
        self.opposite() == other
    }
}

/// One of the two players (and the snake they steer)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerId {
    P1,
    P2,
}

impl PlayerId {
    pub const ALL: [PlayerId; 2] = [PlayerId::P1, PlayerId::P2];

    /// Slot of this player in per-player arrays
    pub fn index(self) -> usize {
        match self {
            PlayerId::P1 => 0,
            PlayerId::P2 => 1,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PlayerId::P1 => "p1",
            PlayerId::P2 => "p2",
        }
    }
}

/// Outcome of a round or of a whole match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Winner {
    P1,
    P2,
    Draw,
}

impl Winner {
    pub fn player(self) -> Option<PlayerId> {
        match self {
            Winner::P1 => Some(PlayerId::P1),
            Winner::P2 => Some(PlayerId::P2),
            Winner::Draw => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Winner::P1 => "p1",
            Winner::P2 => "p2",
            Winner::Draw => "draw",
        }
    }
}

impl From<PlayerId> for Winner {
    fn from(value: PlayerId) -> Self {
        match value {
            PlayerId::P1 => Winner::P1,
            PlayerId::P2 => Winner::P2,
        }
    }
}

/// Coarse game/match phase
///
/// ```text
/// countdown -> running <-> paused
///                 |
///                 +-> gameover -> countdown (next round)
///                 +-> matchover (final round; terminal until restart)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Countdown,
    Running,
    Paused,
    GameOver,
    MatchOver,
}

impl Phase {
    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Countdown => "countdown",
            Phase::Running => "running",
            Phase::Paused => "paused",
            Phase::GameOver => "gameover",
            Phase::MatchOver => "matchover",
        }
    }
}

/// Something that happened during the most recent tick.
///
/// Events are transient: a state carries only the events of the transition
/// that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum GameEvent {
    Eat { who: PlayerId, at: Vector },
    Death { who: PlayerId, at: Vector },
    SpawnFood { at: Vector },
}

impl GameEvent {
    pub fn who(&self) -> Option<PlayerId> {
        match *self {
            GameEvent::Eat { who, .. } | GameEvent::Death { who, .. } => Some(who),
            GameEvent::SpawnFood { .. } => None,
        }
    }

    pub fn at(&self) -> Vector {
        match *self {
            GameEvent::Eat { at, .. } | GameEvent::Death { at, .. } | GameEvent::SpawnFood { at } => {
                at
            }
        }
    }
}

/// Color palette of the presentation layer (ignored by the simulation)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

/// Settings rejected by [`Settings::validate`]
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsError {
    #[error("board size {size} is below the minimum of {min}")]
    BoardTooSmall { size: u16, min: u16 },

    #[error("board size {size} exceeds the maximum of {max}")]
    BoardTooLarge { size: u16, max: u16 },

    #[error("a match needs at least one round")]
    NoRounds,

    #[error("{rounds} rounds exceeds the maximum of {max}")]
    TooManyRounds { rounds: u32, max: u32 },

    #[error("tick interval {tick_ms}ms is below the minimum of {min}ms")]
    TickTooShort { tick_ms: u32, min: u32 },
}

/// Match settings.
///
/// `tick_ms`, `show_grid` and `theme` are consumed by the driver and the
/// renderer only; the simulation reads `board_size`, `wall_collision` and
/// `rounds_total`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub board_size: u16,
    pub tick_ms: u32,
    pub wall_collision: bool,
    pub rounds_total: u32,
    pub show_grid: bool,
    pub theme: Theme,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            board_size: DEFAULT_BOARD_SIZE,
            tick_ms: DEFAULT_TICK_MS,
            wall_collision: true,
            rounds_total: DEFAULT_ROUNDS,
            show_grid: true,
            theme: Theme::Dark,
        }
    }
}

impl Settings {
    pub fn with_board_size(mut self, board_size: u16) -> Self {
        self.board_size = board_size;
        self
    }

    pub fn with_tick_ms(mut self, tick_ms: u32) -> Self {
        self.tick_ms = tick_ms;
        self
    }

    pub fn with_wall_collision(mut self, wall_collision: bool) -> Self {
        self.wall_collision = wall_collision;
        self
    }

    pub fn with_rounds(mut self, rounds_total: u32) -> Self {
        self.rounds_total = rounds_total;
        self
    }

    pub fn with_show_grid(mut self, show_grid: bool) -> Self {
        self.show_grid = show_grid;
        self
    }

    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    /// Clamp every field into its accepted range.
    pub fn normalized(self) -> Self {
        Self {
            board_size: self.board_size.clamp(MIN_BOARD_SIZE, MAX_BOARD_SIZE),
            tick_ms: self.tick_ms.max(MIN_TICK_MS),
            rounds_total: self.rounds_total.clamp(1, MAX_ROUNDS),
            ..self
        }
    }

    /// Strict counterpart of [`Settings::normalized`].
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.board_size < MIN_BOARD_SIZE {
            return Err(SettingsError::BoardTooSmall {
                size: self.board_size,
                min: MIN_BOARD_SIZE,
            });
        }
        if self.board_size > MAX_BOARD_SIZE {
            return Err(SettingsError::BoardTooLarge {
                size: self.board_size,
                max: MAX_BOARD_SIZE,
            });
        }
        if self.rounds_total == 0 {
            return Err(SettingsError::NoRounds);
        }
        if self.rounds_total > MAX_ROUNDS {
            return Err(SettingsError::TooManyRounds {
                rounds: self.rounds_total,
                max: MAX_ROUNDS,
            });
        }
        if self.tick_ms < MIN_TICK_MS {
            return Err(SettingsError::TickTooShort {
                tick_ms: self.tick_ms,
                min: MIN_TICK_MS,
            });
        }
        Ok(())
    }

    /// True when switching from `self` to `next` invalidates the running match.
    pub fn requires_restart(&self, next: &Settings) -> bool {
        self.board_size != next.board_size || self.rounds_total != next.rounds_total
    }
}

/// Player/driver intents that can be applied to a match
///
/// These actions are produced by input mapping and consumed by the match
/// driver; the simulation itself only sees their effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameAction {
    /// Queue a direction for one player's snake
    Steer(PlayerId, Direction),
    /// Toggle between running and paused
    TogglePause,
    /// Start a fresh match
    Restart,
    /// Advance to the next round after a round ended
    NextRound,
}
