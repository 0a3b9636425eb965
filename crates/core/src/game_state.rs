//! Game state module - manages the complete match state
//!
//! This module ties together the snakes, food placement, scoring, and the
//! round/match lifecycle. Every operation takes `&self` and returns the next
//! snapshot; a state handed out to a caller is never modified afterwards.

use std::collections::HashSet;

use arrayvec::ArrayVec;

use crate::food::spawn_food;
use crate::rng::FoodRng;
use crate::snake::Snake;
use crate::step::TickScratch;
use crate::types::*;

/// Upper bound on events a single transition can produce: one death or eat
/// per snake, plus one food respawn.
pub const MAX_TICK_EVENTS: usize = 3;

/// Event log of the most recent transition.
pub type TickEvents = ArrayVec<GameEvent, MAX_TICK_EVENTS>;

/// Cumulative scores of a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Scores {
    pub p1: u32,
    pub p2: u32,
}

impl Scores {
    pub fn new(p1: u32, p2: u32) -> Self {
        Self { p1, p2 }
    }

    pub fn get(&self, player: PlayerId) -> u32 {
        match player {
            PlayerId::P1 => self.p1,
            PlayerId::P2 => self.p2,
        }
    }

    fn add(&mut self, player: PlayerId) {
        match player {
            PlayerId::P1 => self.p1 += 1,
            PlayerId::P2 => self.p2 += 1,
        }
    }

    /// Higher score wins; equal scores are a draw.
    pub fn leader(&self) -> Winner {
        match self.p1.cmp(&self.p2) {
            std::cmp::Ordering::Greater => Winner::P1,
            std::cmp::Ordering::Less => Winner::P2,
            std::cmp::Ordering::Equal => Winner::Draw,
        }
    }
}

/// Complete match state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    food: Vector,
    /// Indexed by [`PlayerId::index`].
    snakes: [Snake; 2],
    phase: Phase,
    countdown_ms_left: u32,
    tick: u64,
    scores: Scores,
    round_winner: Option<Winner>,
    match_winner: Option<Winner>,
    /// Events of the transition that produced this snapshot.
    events: TickEvents,
    round: u32,
    rounds_total: u32,
    rng: FoodRng,
}

impl GameState {
    /// Create a fresh match: both snakes at their spawn, food placed, countdown armed.
    pub fn new(settings: &Settings, seed: u64) -> Self {
        let settings = settings.normalized();
        let snakes = spawn_snakes(settings.board_size);
        let mut rng = FoodRng::new(seed);
        let food = spawn_food(&mut rng, settings.board_size, &body_cells(&snakes));

        let mut events = TickEvents::new();
        events.push(GameEvent::SpawnFood { at: food });

        Self {
            food,
            snakes,
            phase: Phase::Countdown,
            countdown_ms_left: COUNTDOWN_MS,
            tick: 0,
            scores: Scores::default(),
            round_winner: None,
            match_winner: None,
            events,
            round: 1,
            rounds_total: settings.rounds_total,
            rng,
        }
    }

    pub fn food(&self) -> Vector {
        self.food
    }

    pub fn snakes(&self) -> &[Snake; 2] {
        &self.snakes
    }

    pub fn snake(&self, player: PlayerId) -> &Snake {
        &self.snakes[player.index()]
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn countdown_ms_left(&self) -> u32 {
        self.countdown_ms_left
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn scores(&self) -> Scores {
        self.scores
    }

    pub fn round_winner(&self) -> Option<Winner> {
        self.round_winner
    }

    pub fn match_winner(&self) -> Option<Winner> {
        self.match_winner
    }

    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn rounds_total(&self) -> u32 {
        self.rounds_total
    }

    /// Every cell currently covered by a snake body.
    pub fn occupied_cells(&self) -> HashSet<Vector> {
        body_cells(&self.snakes)
    }

    /// Take and clear the events of the last transition.
    pub fn take_events(&mut self) -> TickEvents {
        std::mem::take(&mut self.events)
    }

    pub fn with_food(mut self, food: Vector) -> Self {
        self.food = food;
        self
    }

    /// Replace the snake with the same id.
    pub fn with_snake(mut self, snake: Snake) -> Self {
        let i = snake.id().index();
        self.snakes[i] = snake;
        self
    }

    pub fn with_phase(mut self, phase: Phase) -> Self {
        self.phase = phase;
        self
    }

    pub fn with_scores(mut self, scores: Scores) -> Self {
        self.scores = scores;
        self
    }

    /// Jump to `round`, clamped to `[1, rounds_total]`.
    pub fn with_round(mut self, round: u32) -> Self {
        self.round = round.clamp(1, self.rounds_total);
        self
    }

    /// Advance the simulation by one tick.
    ///
    /// Only a running match moves; in every other phase the snapshot is
    /// returned unchanged.
    pub fn step(&self, settings: &Settings) -> GameState {
        if self.phase != Phase::Running {
            return self.clone();
        }
        let settings = settings.normalized();

        let scratch = TickScratch::resolve(&self.snakes, self.food, &settings);
        let mut next = self.clone();
        let mut events = scratch.events.clone();

        for snake in next.snakes.iter_mut() {
            let id = snake.id();
            let i = id.index();
            if !scratch.moving[i] {
                continue;
            }
            snake.turn(scratch.dirs[i]);
            if scratch.dead[i] {
                snake.kill();
                continue;
            }

            let head = scratch.candidates[i];
            let ate = scratch.ate(id);
            snake.advance(head, ate);
            if ate {
                next.scores.add(id);
                events.push(GameEvent::Eat { who: id, at: head });
            }
        }

        if PlayerId::ALL.iter().any(|&id| scratch.ate(id)) {
            let occupied = body_cells(&next.snakes);
            next.food = spawn_food(&mut next.rng, settings.board_size, &occupied);
            events.push(GameEvent::SpawnFood { at: next.food });
        }

        next.events = events;
        next.tick += 1;
        next.resolve_round();
        next
    }

    /// Decide round and match outcome once a snake is down.
    fn resolve_round(&mut self) {
        let p1 = self.snakes[PlayerId::P1.index()].alive();
        let p2 = self.snakes[PlayerId::P2.index()].alive();
        if p1 && p2 {
            return;
        }

        self.round_winner = Some(match (p1, p2) {
            (true, false) => Winner::P1,
            (false, true) => Winner::P2,
            _ => Winner::Draw,
        });

        if self.round >= self.rounds_total {
            self.phase = Phase::MatchOver;
            self.match_winner = Some(self.scores.leader());
        } else {
            self.phase = Phase::GameOver;
        }
    }

    /// Reset the board for the next round of the match.
    ///
    /// Only valid after a round ended with rounds remaining; otherwise the
    /// snapshot is returned unchanged. Scores carry over.
    pub fn prepare_next_round(&self, settings: &Settings) -> GameState {
        if self.phase != Phase::GameOver || self.round >= self.rounds_total {
            return self.clone();
        }
        let settings = settings.normalized();

        let mut next = self.clone();
        next.snakes = spawn_snakes(settings.board_size);
        next.food = spawn_food(&mut next.rng, settings.board_size, &body_cells(&next.snakes));
        next.phase = Phase::Countdown;
        next.countdown_ms_left = COUNTDOWN_MS;
        next.round = (self.round + 1).min(self.rounds_total);
        next.round_winner = None;
        next.events.clear();
        next.events.push(GameEvent::SpawnFood { at: next.food });
        next
    }

    /// Queue a turn for `player`.
    ///
    /// Input only counts while the match is running and the snake is alive.
    pub fn steer(&self, player: PlayerId, dir: Direction) -> GameState {
        let snake = self.snake(player);
        if self.phase != Phase::Running || !snake.alive() {
            return self.clone();
        }
        let snake = crate::snake::set_snake_dir(snake.clone(), dir);
        self.clone().with_snake(snake)
    }

    /// Toggle between running and paused; other phases are left alone.
    pub fn toggle_pause(&self) -> GameState {
        let phase = match self.phase {
            Phase::Running => Phase::Paused,
            Phase::Paused => Phase::Running,
            other => other,
        };
        self.clone().with_phase(phase)
    }

    /// Run the countdown down by `elapsed_ms`; the round starts at zero.
    pub fn countdown_tick(&self, elapsed_ms: u32) -> GameState {
        if self.phase != Phase::Countdown {
            return self.clone();
        }
        let mut next = self.clone();
        next.countdown_ms_left = self.countdown_ms_left.saturating_sub(elapsed_ms);
        if next.countdown_ms_left == 0 {
            next.phase = Phase::Running;
        }
        next
    }

    /// Start a fresh match, seeded from this state's random stream.
    pub fn restart(&self, settings: &Settings) -> GameState {
        let mut rng = self.rng.clone();
        GameState::new(settings, rng.next_seed())
    }
}

fn spawn_snakes(board_size: u16) -> [Snake; 2] {
    [
        Snake::spawn(PlayerId::P1, board_size),
        Snake::spawn(PlayerId::P2, board_size),
    ]
}

fn body_cells(snakes: &[Snake; 2]) -> HashSet<Vector> {
    snakes.iter().flat_map(Snake::cells).collect()
}

/// Build the opening state of a match.
pub fn initial_state(settings: &Settings, seed: u64) -> GameState {
    GameState::new(settings, seed)
}

/// Advance `state` by one tick. See [`GameState::step`].
pub fn step(state: &GameState, settings: &Settings) -> GameState {
    state.step(settings)
}

/// Set up the next round. See [`GameState::prepare_next_round`].
pub fn prepare_next_round(state: &GameState, settings: &Settings) -> GameState {
    state.prepare_next_round(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> Settings {
        Settings::default()
    }

    fn running() -> GameState {
        GameState::new(&settings(), 42).with_phase(Phase::Running)
    }

    fn single(id: PlayerId, dir: Direction, x: i32, y: i32) -> Snake {
        Snake::new(id, dir, Vector::new(x, y), [])
    }

    #[test]
    fn test_new_game_state() {
        let state = GameState::new(&settings(), 42);

        assert_eq!(state.phase(), Phase::Countdown);
        assert_eq!(state.countdown_ms_left(), COUNTDOWN_MS);
        assert_eq!(state.tick(), 0);
        assert_eq!(state.round(), 1);
        assert_eq!(state.rounds_total(), DEFAULT_ROUNDS);
        assert_eq!(state.scores(), Scores::default());
        assert!(state.snakes().iter().all(Snake::alive));
        assert!(state.food().in_bounds(24));
        assert!(!state.occupied_cells().contains(&state.food()));
        assert_eq!(state.events(), &[GameEvent::SpawnFood { at: state.food() }]);
        assert_eq!(state.round_winner(), None);
        assert_eq!(state.match_winner(), None);
    }

    #[test]
    fn test_new_normalizes_settings() {
        let state = GameState::new(&settings().with_board_size(2).with_rounds(0), 1);
        assert_eq!(state.rounds_total(), 1);
        // Spawn bodies fit a clamped board without overlap.
        let p1 = state.snake(PlayerId::P1);
        let p2 = state.snake(PlayerId::P2);
        assert!(p1.cells().all(|c| !p2.contains(c)));
    }

    #[test]
    fn test_step_ignored_outside_running() {
        let base = GameState::new(&settings(), 42);
        for phase in [Phase::Countdown, Phase::Paused, Phase::GameOver, Phase::MatchOver] {
            let state = base.clone().with_phase(phase);
            assert_eq!(state.step(&settings()), state);
        }
    }

    #[test]
    fn test_step_moves_both_snakes() {
        let state = running().with_food(Vector::new(12, 0));
        let next = state.step(&settings());

        assert_eq!(next.snake(PlayerId::P1).head(), Vector::new(3, 12));
        assert_eq!(next.snake(PlayerId::P2).head(), Vector::new(20, 12));
        assert_eq!(next.snake(PlayerId::P1).len(), 3);
        assert_eq!(next.tick(), 1);
        assert!(next.events().is_empty());
        assert_eq!(next.phase(), Phase::Running);
    }

    #[test]
    fn test_step_does_not_mutate_input() {
        let state = running().with_food(Vector::new(3, 12));
        let before = state.clone();
        let a = state.step(&settings());
        let b = state.step(&settings());

        assert_eq!(state, before);
        // Same snapshot, same successor (food RNG travels with the state).
        assert_eq!(a, b);
    }

    #[test]
    fn test_death_eat_and_respawn_fill_tick_events() {
        let state = running()
            .with_food(Vector::new(3, 12))
            .with_snake(Snake::new(
                PlayerId::P2,
                Direction::Up,
                Vector::new(20, 0),
                [Vector::new(20, 1)],
            ));
        let next = state.step(&settings());

        let events = next.events();
        assert_eq!(events.len(), MAX_TICK_EVENTS);
        assert_eq!(
            events[0],
            GameEvent::Death {
                who: PlayerId::P2,
                at: Vector::new(20, -1)
            }
        );
        assert_eq!(
            events[1],
            GameEvent::Eat {
                who: PlayerId::P1,
                at: Vector::new(3, 12)
            }
        );
        assert_eq!(events[2], GameEvent::SpawnFood { at: next.food() });
        assert_ne!(next.food(), Vector::new(3, 12));
        assert_eq!(next.phase(), Phase::GameOver);
        assert_eq!(next.round_winner(), Some(Winner::P1));
        assert_eq!(next.scores().p1, 1);
    }

    #[test]
    fn test_eating_grows_scores_and_respawns() {
        let state = running().with_food(Vector::new(3, 12));
        let next = state.step(&settings());

        let p1 = next.snake(PlayerId::P1);
        assert_eq!(next.scores().p1, 1);
        assert_eq!(next.scores().p2, 0);
        assert_eq!(p1.len(), 4);
        assert_eq!(p1.tail(), Vector::new(0, 12));
        assert_eq!(
            next.events()[0],
            GameEvent::Eat {
                who: PlayerId::P1,
                at: Vector::new(3, 12)
            }
        );
        assert_eq!(next.events()[1], GameEvent::SpawnFood { at: next.food() });
        assert!(!next.occupied_cells().contains(&next.food()));
        assert!(next.food().in_bounds(24));
    }

    #[test]
    fn test_events_do_not_carry_over() {
        let state = running().with_food(Vector::new(3, 12));
        let after_eat = state.step(&settings());
        assert_eq!(after_eat.events().len(), 2);

        let after_eat = after_eat.with_food(Vector::new(12, 0));
        let next = after_eat.step(&settings());
        assert!(next.events().is_empty());
    }

    #[test]
    fn test_reverse_request_ignored_and_pending_cleared() {
        let state = running()
            .steer(PlayerId::P1, Direction::Left)
            .with_food(Vector::new(12, 0));
        assert_eq!(state.snake(PlayerId::P1).pending(), Some(Direction::Left));

        let next = state.step(&settings());
        let p1 = next.snake(PlayerId::P1);
        assert_eq!(p1.head(), Vector::new(3, 12));
        assert_eq!(p1.dir(), Direction::Right);
        assert_eq!(p1.pending(), None);
    }

    #[test]
    fn test_turn_applied() {
        let state = running()
            .steer(PlayerId::P2, Direction::Up)
            .with_food(Vector::new(12, 0));
        let next = state.step(&settings());

        let p2 = next.snake(PlayerId::P2);
        assert_eq!(p2.head(), Vector::new(21, 11));
        assert_eq!(p2.dir(), Direction::Up);
    }

    #[test]
    fn test_steer_ignored_when_not_running_or_dead() {
        let countdown = GameState::new(&settings(), 42);
        assert_eq!(countdown.steer(PlayerId::P1, Direction::Up), countdown);

        let dead = running().with_snake(Snake::spawn(PlayerId::P1, 24).killed());
        assert_eq!(dead.steer(PlayerId::P1, Direction::Up), dead);
    }

    #[test]
    fn test_head_to_head_is_draw() {
        let state = running()
            .with_food(Vector::new(0, 0))
            .with_snake(single(PlayerId::P1, Direction::Right, 4, 5))
            .with_snake(single(PlayerId::P2, Direction::Left, 6, 5));
        let next = state.step(&settings());

        assert!(!next.snake(PlayerId::P1).alive());
        assert!(!next.snake(PlayerId::P2).alive());
        assert_eq!(next.round_winner(), Some(Winner::Draw));
        assert_eq!(next.phase(), Phase::GameOver);
        assert_eq!(
            next.events(),
            &[
                GameEvent::Death {
                    who: PlayerId::P1,
                    at: Vector::new(5, 5)
                },
                GameEvent::Death {
                    who: PlayerId::P2,
                    at: Vector::new(5, 5)
                },
            ]
        );
        // Dead snakes stay where they were.
        assert_eq!(next.snake(PlayerId::P1).head(), Vector::new(4, 5));
        assert_eq!(next.tick(), 1);
    }

    #[test]
    fn test_head_to_head_on_food_nobody_eats() {
        let state = running()
            .with_food(Vector::new(5, 5))
            .with_snake(single(PlayerId::P1, Direction::Right, 4, 5))
            .with_snake(single(PlayerId::P2, Direction::Left, 6, 5));
        let next = state.step(&settings());

        assert_eq!(next.scores(), Scores::default());
        assert_eq!(next.food(), Vector::new(5, 5));
        assert!(next
            .events()
            .iter()
            .all(|e| matches!(e, GameEvent::Death { .. })));
    }

    #[test]
    fn test_head_swap_kills_both() {
        let state = running()
            .with_food(Vector::new(0, 0))
            .with_snake(single(PlayerId::P1, Direction::Right, 4, 5))
            .with_snake(single(PlayerId::P2, Direction::Left, 5, 5));
        let next = state.step(&settings());

        assert!(!next.snake(PlayerId::P1).alive());
        assert!(!next.snake(PlayerId::P2).alive());
        assert_eq!(next.round_winner(), Some(Winner::Draw));
        assert_eq!(
            next.events(),
            &[
                GameEvent::Death {
                    who: PlayerId::P1,
                    at: Vector::new(5, 5)
                },
                GameEvent::Death {
                    who: PlayerId::P2,
                    at: Vector::new(4, 5)
                },
            ]
        );
    }

    #[test]
    fn test_wall_collision_kills() {
        let p1 = Snake::new(
            PlayerId::P1,
            Direction::Right,
            Vector::new(23, 5),
            [Vector::new(22, 5)],
        );
        let state = running().with_food(Vector::new(0, 0)).with_snake(p1.clone());
        let next = state.step(&settings());

        let after = next.snake(PlayerId::P1);
        assert!(!after.alive());
        assert_eq!(after.cells().collect::<Vec<_>>(), p1.cells().collect::<Vec<_>>());
        assert_eq!(
            next.events(),
            &[GameEvent::Death {
                who: PlayerId::P1,
                at: Vector::new(24, 5)
            }]
        );
        assert_eq!(next.round_winner(), Some(Winner::P2));
        assert!(next.snake(PlayerId::P2).alive());
    }

    #[test]
    fn test_wrap_without_walls() {
        let settings = settings().with_wall_collision(false);
        let p1 = Snake::new(
            PlayerId::P1,
            Direction::Right,
            Vector::new(23, 5),
            [Vector::new(22, 5)],
        );
        let state = GameState::new(&settings, 42)
            .with_phase(Phase::Running)
            .with_food(Vector::new(10, 0))
            .with_snake(p1);
        let next = state.step(&settings);

        let after = next.snake(PlayerId::P1);
        assert!(after.alive());
        assert_eq!(after.head(), Vector::new(0, 5));
        assert_eq!(after.tail(), Vector::new(23, 5));
        assert_eq!(next.phase(), Phase::Running);
    }

    #[test]
    fn test_can_follow_own_tail() {
        // Head (5,5) heading left around a 2x2 loop; turning down enters the tail cell.
        let p1 = Snake::new(
            PlayerId::P1,
            Direction::Left,
            Vector::new(5, 5),
            [Vector::new(6, 5), Vector::new(6, 6), Vector::new(5, 6)],
        )
        .with_pending(Direction::Down);
        let state = running().with_food(Vector::new(0, 0)).with_snake(p1);
        let next = state.step(&settings());

        let after = next.snake(PlayerId::P1);
        assert!(after.alive());
        assert_eq!(after.head(), Vector::new(5, 6));
        assert_eq!(after.len(), 4);
    }

    #[test]
    fn test_growing_snake_keeps_its_tail_occupied() {
        let p1 = Snake::new(
            PlayerId::P1,
            Direction::Left,
            Vector::new(5, 5),
            [Vector::new(6, 5), Vector::new(6, 6), Vector::new(5, 6)],
        )
        .with_pending(Direction::Down);
        let state = running().with_food(Vector::new(5, 6)).with_snake(p1);
        let next = state.step(&settings());

        assert!(!next.snake(PlayerId::P1).alive());
        assert_eq!(next.scores().p1, 0);
        assert_eq!(next.round_winner(), Some(Winner::P2));
    }

    #[test]
    fn test_can_follow_opponent_tail() {
        let p1 = single(PlayerId::P1, Direction::Right, 4, 5);
        let p2 = Snake::new(
            PlayerId::P2,
            Direction::Down,
            Vector::new(5, 6),
            [Vector::new(5, 5)],
        );
        let state = running()
            .with_food(Vector::new(0, 0))
            .with_snake(p1)
            .with_snake(p2);
        let next = state.step(&settings());

        assert!(next.snake(PlayerId::P1).alive());
        assert!(next.snake(PlayerId::P2).alive());
        assert_eq!(next.snake(PlayerId::P1).head(), Vector::new(5, 5));
        assert_eq!(next.snake(PlayerId::P2).head(), Vector::new(5, 7));
    }

    #[test]
    fn test_opponent_body_collision() {
        let p1 = single(PlayerId::P1, Direction::Right, 4, 5);
        let p2 = Snake::new(
            PlayerId::P2,
            Direction::Up,
            Vector::new(5, 4),
            [Vector::new(5, 5), Vector::new(5, 6)],
        );
        let state = running()
            .with_food(Vector::new(0, 0))
            .with_snake(p1)
            .with_snake(p2);
        let next = state.step(&settings());

        assert!(!next.snake(PlayerId::P1).alive());
        assert!(next.snake(PlayerId::P2).alive());
        assert_eq!(next.round_winner(), Some(Winner::P2));
        assert_eq!(next.phase(), Phase::GameOver);
    }

    #[test]
    fn test_self_collision() {
        let p1 = Snake::new(
            PlayerId::P1,
            Direction::Left,
            Vector::new(5, 5),
            [
                Vector::new(6, 5),
                Vector::new(6, 6),
                Vector::new(5, 6),
                Vector::new(4, 6),
            ],
        )
        .with_pending(Direction::Down);
        let state = running().with_food(Vector::new(0, 0)).with_snake(p1);
        let next = state.step(&settings());

        assert!(!next.snake(PlayerId::P1).alive());
        assert_eq!(
            next.events(),
            &[GameEvent::Death {
                who: PlayerId::P1,
                at: Vector::new(5, 6)
            }]
        );
    }

    #[test]
    fn test_final_round_decided_by_scores() {
        let settings = settings().with_rounds(3);
        // P2 survives the round but P1 leads the match.
        let state = GameState::new(&settings, 42)
            .with_phase(Phase::Running)
            .with_round(3)
            .with_scores(Scores::new(4, 1))
            .with_food(Vector::new(0, 0))
            .with_snake(single(PlayerId::P1, Direction::Up, 3, 0));
        let next = state.step(&settings);

        assert_eq!(next.round_winner(), Some(Winner::P2));
        assert_eq!(next.match_winner(), Some(Winner::P1));
        assert_eq!(next.phase(), Phase::MatchOver);
    }

    #[test]
    fn test_final_round_tied_scores_draw() {
        let settings = settings().with_rounds(1);
        let state = GameState::new(&settings, 42)
            .with_phase(Phase::Running)
            .with_scores(Scores::new(2, 2))
            .with_food(Vector::new(0, 0))
            .with_snake(single(PlayerId::P1, Direction::Up, 3, 0));
        let next = state.step(&settings);

        assert_eq!(next.phase(), Phase::MatchOver);
        assert_eq!(next.match_winner(), Some(Winner::Draw));
    }

    #[test]
    fn test_prepare_next_round() {
        let state = running()
            .with_food(Vector::new(0, 0))
            .with_scores(Scores::new(3, 1))
            .with_snake(single(PlayerId::P1, Direction::Up, 3, 0));
        let over = state.step(&settings());
        assert_eq!(over.phase(), Phase::GameOver);

        let next = over.prepare_next_round(&settings());
        assert_eq!(next.round(), 2);
        assert_eq!(next.phase(), Phase::Countdown);
        assert_eq!(next.countdown_ms_left(), COUNTDOWN_MS);
        assert_eq!(next.scores(), Scores::new(3, 1));
        assert_eq!(next.round_winner(), None);
        assert_eq!(next.snake(PlayerId::P1), &Snake::spawn(PlayerId::P1, 24));
        assert_eq!(next.snake(PlayerId::P2), &Snake::spawn(PlayerId::P2, 24));
        assert_eq!(next.events(), &[GameEvent::SpawnFood { at: next.food() }]);
        assert!(!next.occupied_cells().contains(&next.food()));
    }

    #[test]
    fn test_prepare_next_round_guards() {
        let run = running();
        assert_eq!(run.prepare_next_round(&settings()), run);

        let last = running().with_round(DEFAULT_ROUNDS).with_phase(Phase::GameOver);
        assert_eq!(last.prepare_next_round(&settings()), last);

        let over = running().with_phase(Phase::MatchOver);
        assert_eq!(over.prepare_next_round(&settings()), over);
    }

    #[test]
    fn test_countdown_tick() {
        let state = GameState::new(&settings(), 42);

        let state = state.countdown_tick(1000);
        assert_eq!(state.countdown_ms_left(), 2000);
        assert_eq!(state.phase(), Phase::Countdown);

        let state = state.countdown_tick(5000);
        assert_eq!(state.countdown_ms_left(), 0);
        assert_eq!(state.phase(), Phase::Running);

        // No effect once running.
        assert_eq!(state.countdown_tick(100), state);
    }

    #[test]
    fn test_countdown_in_standard_steps() {
        let mut state = GameState::new(&settings(), 42);
        for _ in 0..(COUNTDOWN_MS / COUNTDOWN_STEP_MS - 1) {
            state = state.countdown_tick(COUNTDOWN_STEP_MS);
            assert_eq!(state.phase(), Phase::Countdown);
        }
        state = state.countdown_tick(COUNTDOWN_STEP_MS);
        assert_eq!(state.phase(), Phase::Running);
    }

    #[test]
    fn test_toggle_pause() {
        let countdown = GameState::new(&settings(), 42);
        assert_eq!(countdown.toggle_pause().phase(), Phase::Countdown);

        let paused = running().toggle_pause();
        assert_eq!(paused.phase(), Phase::Paused);
        assert_eq!(paused.toggle_pause().phase(), Phase::Running);

        let over = running().with_phase(Phase::GameOver);
        assert_eq!(over.toggle_pause().phase(), Phase::GameOver);
    }

    #[test]
    fn test_restart_fresh_match() {
        let state = running()
            .with_scores(Scores::new(5, 5))
            .with_round(4)
            .with_food(Vector::new(3, 12));
        let state = state.step(&settings());

        let fresh = state.restart(&settings());
        assert_eq!(fresh.round(), 1);
        assert_eq!(fresh.scores(), Scores::default());
        assert_eq!(fresh.phase(), Phase::Countdown);
        assert_eq!(fresh.tick(), 0);
        // Restarting the same snapshot twice gives the same match.
        assert_eq!(fresh, state.restart(&settings()));
    }

    #[test]
    fn test_take_events() {
        let mut state = GameState::new(&settings(), 42);
        let events = state.take_events();
        assert_eq!(events.len(), 1);
        assert!(state.events().is_empty());
    }

    #[test]
    fn test_scores_leader() {
        assert_eq!(Scores::new(2, 1).leader(), Winner::P1);
        assert_eq!(Scores::new(0, 1).leader(), Winner::P2);
        assert_eq!(Scores::new(3, 3).leader(), Winner::Draw);
        assert_eq!(Scores::new(3, 4).get(PlayerId::P2), 4);
    }
}
