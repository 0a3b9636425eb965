//! Simultaneous move resolution for one tick.
//!
//! Everything that decides a tick is computed here, against the snapshot as
//! it was when the tick started: candidate heads, who dies, who eats. Only
//! afterwards does [`GameState::step`](crate::GameState::step) apply the
//! outcome. Resolving the snakes one at a time instead would let the order of
//! processing leak into the result (a tail vacated by the first snake would
//! open a cell to the second one).

use std::collections::HashSet;

use crate::game_state::TickEvents;
use crate::snake::Snake;
use crate::types::{Direction, GameEvent, PlayerId, Settings, Vector};

/// Outcome of a tick, decided before any snake moves.
///
/// All per-player arrays are indexed by [`PlayerId::index`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickScratch {
    /// Heads at the start of the tick.
    pub current: [Vector; 2],
    /// Cells the heads move into (wrapped when walls are off).
    pub candidates: [Vector; 2],
    /// Heading after resolving queued turns.
    pub dirs: [Direction; 2],
    /// Alive at the start of the tick.
    pub moving: [bool; 2],
    /// Dead at the end of the tick (includes snakes that were already dead).
    pub dead: [bool; 2],
    /// Candidate head lands on the food.
    pub eats: [bool; 2],
    /// Death events, in resolution order.
    pub events: TickEvents,
}

impl TickScratch {
    pub fn resolve(snakes: &[Snake; 2], food: Vector, settings: &Settings) -> Self {
        let size = settings.board_size;
        let mut scratch = Self {
            current: [snakes[0].head(), snakes[1].head()],
            candidates: [snakes[0].head(), snakes[1].head()],
            dirs: [snakes[0].dir(), snakes[1].dir()],
            moving: [false; 2],
            dead: [false; 2],
            eats: [false; 2],
            events: TickEvents::new(),
        };

        // Turns, candidate heads and walls.
        for snake in snakes {
            let i = snake.id().index();
            if !snake.alive() {
                scratch.dead[i] = true;
                continue;
            }
            scratch.moving[i] = true;

            let dir = snake.resolved_dir();
            let mut head = snake.head().moved(dir);
            if settings.wall_collision {
                if !head.in_bounds(size) {
                    scratch.kill(snake.id(), head);
                }
            } else {
                head = head.wrapped(size);
            }

            scratch.dirs[i] = dir;
            scratch.candidates[i] = head;
            scratch.eats[i] = head == food;
        }

        let [h1, h2] = scratch.candidates;
        let [c1, c2] = scratch.current;

        // Both heads enter the same cell.
        if scratch.both_alive() && h1 == h2 {
            scratch.kill(PlayerId::P1, h1);
            scratch.kill(PlayerId::P2, h2);
        }

        // Heads pass through each other.
        if scratch.both_alive() && h1 == c2 && h2 == c1 {
            scratch.kill(PlayerId::P1, h1);
            scratch.kill(PlayerId::P2, h2);
        }

        let occupied = occupancy(snakes, &scratch.eats);
        for id in PlayerId::ALL {
            let i = id.index();
            let cell = scratch.candidates[i];
            if !scratch.dead[i] && occupied.contains(&cell) {
                scratch.kill(id, cell);
            }
        }

        scratch
    }

    pub fn both_alive(&self) -> bool {
        !self.dead[0] && !self.dead[1]
    }

    /// Snake survives the tick and moves onto the food.
    pub fn ate(&self, id: PlayerId) -> bool {
        let i = id.index();
        self.moving[i] && !self.dead[i] && self.eats[i]
    }

    fn kill(&mut self, who: PlayerId, at: Vector) {
        self.dead[who.index()] = true;
        self.events.push(GameEvent::Death { who, at });
    }
}

/// Cells blocked for heads entering this tick.
///
/// A snake's tail leaves its cell during the move unless that snake grows, so
/// it only counts as occupied for a snake about to eat.
pub fn occupancy(snakes: &[Snake; 2], eats: &[bool; 2]) -> HashSet<Vector> {
    let mut occupied = HashSet::with_capacity(snakes.iter().map(Snake::len).sum());
    for snake in snakes {
        let keep_tail = eats[snake.id().index()];
        let len = snake.len();
        occupied.extend(
            snake
                .cells()
                .enumerate()
                .filter(|&(idx, _)| keep_tail || idx + 1 < len)
                .map(|(_, cell)| cell),
        );
    }
    occupied
}
