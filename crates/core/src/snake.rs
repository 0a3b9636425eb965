//! Snake module - a single player's body, heading and queued turn
//!
//! Bodies are stored head first. A snake is never empty: the head is supplied
//! separately at construction and movement always pushes before it pops.

use std::collections::VecDeque;

use crate::types::{Direction, PlayerId, Vector, INITIAL_SNAKE_LEN};

/// One player's snake
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Snake {
    id: PlayerId,
    body: VecDeque<Vector>,
    dir: Direction,
    pending: Option<Direction>,
    alive: bool,
}

impl Snake {
    /// Create an alive snake from a head and the cells trailing it (head-adjacent first).
    pub fn new(
        id: PlayerId,
        dir: Direction,
        head: Vector,
        tail: impl IntoIterator<Item = Vector>,
    ) -> Self {
        let mut body = VecDeque::with_capacity(INITIAL_SNAKE_LEN as usize);
        body.push_back(head);
        body.extend(tail);
        Self {
            id,
            body,
            dir,
            pending: None,
            alive: true,
        }
    }

    /// Spawn placement for a fresh round.
    ///
    /// P1 starts at the left edge heading right, P2 mirrors it on the right
    /// edge heading left, both on the middle row.
    pub fn spawn(id: PlayerId, board_size: u16) -> Self {
        let size = i32::from(board_size);
        let mid = size / 2;
        match id {
            PlayerId::P1 => {
                let head = Vector::new(INITIAL_SNAKE_LEN - 1, mid);
                let tail = (0..INITIAL_SNAKE_LEN - 1).rev().map(|x| Vector::new(x, mid));
                Self::new(id, Direction::Right, head, tail)
            }
            PlayerId::P2 => {
                let head = Vector::new(size - INITIAL_SNAKE_LEN, mid);
                let tail = (size - INITIAL_SNAKE_LEN + 1..size).map(|x| Vector::new(x, mid));
                Self::new(id, Direction::Left, head, tail)
            }
        }
    }

    pub fn id(&self) -> PlayerId {
        self.id
    }

    pub fn dir(&self) -> Direction {
        self.dir
    }

    pub fn pending(&self) -> Option<Direction> {
        self.pending
    }

    pub fn alive(&self) -> bool {
        self.alive
    }

    pub fn head(&self) -> Vector {
        self.body[0]
    }

    pub fn tail(&self) -> Vector {
        self.body[self.body.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Always false; present for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// Body cells, head first.
    pub fn cells(&self) -> impl Iterator<Item = Vector> + '_ {
        self.body.iter().copied()
    }

    pub fn contains(&self, cell: Vector) -> bool {
        self.body.contains(&cell)
    }

    /// Heading the snake will take on its next move.
    pub fn resolved_dir(&self) -> Direction {
        next_dir(self.dir, self.pending)
    }

    /// Queue `dir` for the next tick, replacing any earlier request.
    pub fn with_pending(mut self, dir: Direction) -> Self {
        self.pending = Some(dir);
        self
    }

    pub fn killed(mut self) -> Self {
        self.alive = false;
        self
    }

    /// Commit the turn decided this tick and clear the queued request.
    pub(crate) fn turn(&mut self, dir: Direction) {
        self.dir = dir;
        self.pending = None;
    }

    /// Move onto `head`; the tail stays in place when growing.
    pub(crate) fn advance(&mut self, head: Vector, grow: bool) {
        self.body.push_front(head);
        if !grow {
            self.body.pop_back();
        }
    }

    pub(crate) fn kill(&mut self) {
        self.alive = false;
    }
}

/// Resolve a queued turn against the current heading.
///
/// A request for the exact reverse of `current` is dropped, since it would
/// drive the head straight into the second body segment.
pub fn next_dir(current: Direction, pending: Option<Direction>) -> Direction {
    match pending {
        Some(dir) if !current.is_opposite(dir) => dir,
        _ => current,
    }
}

/// Record a pending direction on `snake`.
///
/// No reversal check happens here; that is decided by [`next_dir`] when the
/// tick runs.
pub fn set_snake_dir(snake: Snake, dir: Direction) -> Snake {
    snake.with_pending(dir)
}
