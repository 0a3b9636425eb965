//! Terminal input module (engine-facing).
//!
//! Maps `crossterm` key events into [`crate::types::GameAction`]. Both players
//! share one keyboard, so each key belongs to exactly one player or to the
//! match controls.

pub mod map;

pub use duel_snake_types as types;

pub use map::{handle_key_event, should_quit};
