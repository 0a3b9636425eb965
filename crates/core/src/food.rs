//! Food placement
//!
//! Rejection sampling over the whole board with a bounded number of draws.
//! When every draw lands on an occupied cell the origin is returned even if a
//! snake covers it, which keeps the worst-case tick cost fixed.

use std::collections::HashSet;

use rand::Rng;

use crate::types::{Vector, FOOD_SPAWN_ATTEMPTS};

/// Pick a uniformly random cell of the `board_size` x `board_size` board that is
/// not in `occupied`, giving up after [`FOOD_SPAWN_ATTEMPTS`] draws.
pub fn spawn_food<R: Rng + ?Sized>(
    rng: &mut R,
    board_size: u16,
    occupied: &HashSet<Vector>,
) -> Vector {
    if board_size == 0 {
        return Vector::ORIGIN;
    }
    let size = i32::from(board_size);

    for _ in 0..FOOD_SPAWN_ATTEMPTS {
        let cell = Vector::new(rng.gen_range(0..size), rng.gen_range(0..size));
        if !occupied.contains(&cell) {
            return cell;
        }
    }

    tracing::warn!(
        board_size,
        occupied = occupied.len(),
        "no free food cell found, falling back to origin"
    );
    Vector::ORIGIN
}
