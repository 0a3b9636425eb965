//! Core game logic module - pure, deterministic, and testable
//!
//! This crate contains the rules of a two-player simultaneous-move Snake match.
//! It has **zero dependencies** on UI, input, or I/O, making it:
//!
//! - **Deterministic**: the food RNG travels inside the state, so a snapshot
//!   always steps to the same successor
//! - **Testable**: every rule is a function from one snapshot to the next
//! - **Portable**: runs in a terminal, a test, or a headless harness
//!
//! # Module Structure
//!
//! - [`game_state`]: match snapshot, tick reduction, round/match lifecycle
//! - [`step`]: per-tick collision resolution against the pre-tick snapshot
//! - [`snake`]: body, heading and queued turn of one player
//! - [`food`]: bounded rejection sampling for food placement
//! - [`rng`]: seeded ChaCha8 stream used for food
//!
//! # Tick Rules
//!
//! Both snakes move at once. Each tick is decided in this order:
//!
//! | Stage | Outcome |
//! |-------|---------|
//! | Walls | leaving the board kills (or wraps when walls are off) |
//! | Head-to-head | both heads entering one cell kills both |
//! | Head swap | heads passing through each other kills both |
//! | Bodies | entering an occupied cell kills; tails vacate unless growing |
//! | Eating | a survivor on the food scores and grows by one |
//! | Respawn | food is placed once if anybody ate |
//!
//! # Example
//!
//! ```
//! use duel_snake_core::{GameState, types::{Direction, Phase, PlayerId, Settings}};
//!
//! let settings = Settings::default();
//! let state = GameState::new(&settings, 12345)
//!     .countdown_tick(3000)
//!     .steer(PlayerId::P1, Direction::Up);
//! assert_eq!(state.phase(), Phase::Running);
//!
//! let next = state.step(&settings);
//! assert_eq!(next.tick(), 1);
//! assert_eq!(next.snake(PlayerId::P1).dir(), Direction::Up);
//! ```

pub mod food;
pub mod game_state;
pub mod rng;
pub mod snake;
pub mod step;

pub use duel_snake_types as types;

// Re-export commonly used types for convenience
pub use food::spawn_food;
pub use game_state::{
    initial_state, prepare_next_round, step, GameState, Scores, TickEvents, MAX_TICK_EVENTS,
};
pub use rng::FoodRng;
pub use snake::{next_dir, set_snake_dir, Snake};
pub use step::{occupancy, TickScratch};
