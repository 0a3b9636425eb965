//! Duel Snake (workspace facade crate).
//!
//! Re-exports the workspace members as `duel_snake::{core,engine,input,term,types}`
//! while the implementation lives in dedicated crates under `crates/`.

pub use duel_snake_core as core;
pub use duel_snake_engine as engine;
pub use duel_snake_input as input;
pub use duel_snake_term as term;
pub use duel_snake_types as types;
