//! Match driver - turns wall-clock time and player intents into snapshots
//!
//! The core only knows single transitions. [`Match`] owns the current
//! snapshot and decides when each transition happens:
//!
//! | Phase | `advance(elapsed_ms)` |
//! |-------|-----------------------|
//! | Countdown | feeds [`COUNTDOWN_STEP_MS`] steps until the round starts |
//! | Running | one tick per `tick_ms`, at most [`MAX_CATCH_UP_STEPS`] per call |
//! | Paused / GameOver / MatchOver | nothing; accumulated time is discarded |
//!
//! Events produced by every transition are queued until [`Match::take_events`]
//! is called, so a frame that covered several ticks still sees all of them.
//! The queue keeps at most [`MAX_QUEUED_EVENTS`]; callers that never drain it
//! lose the oldest events first.

use duel_snake_core::GameState;
use duel_snake_types::{
    GameAction, GameEvent, Phase, PlayerId, Settings, Winner, COUNTDOWN_STEP_MS,
};

pub use duel_snake_core as core;
pub use duel_snake_types as types;

/// Ticks a single `advance` may run to catch up after a slow frame.
pub const MAX_CATCH_UP_STEPS: u32 = 4;

/// Events held for [`Match::take_events`] before the oldest are dropped.
pub const MAX_QUEUED_EVENTS: usize = 256;

/// A match in progress plus its timing state.
#[derive(Debug, Clone)]
pub struct Match {
    settings: Settings,
    state: GameState,
    countdown_acc_ms: u32,
    tick_acc_ms: u32,
    inbox: Vec<GameEvent>,
}

impl Match {
    pub fn new(settings: Settings, seed: u64) -> Self {
        let settings = settings.normalized();
        let state = GameState::new(&settings, seed);
        Self::with_state(settings, state)
    }

    /// Drive an existing snapshot.
    pub fn with_state(settings: Settings, state: GameState) -> Self {
        let inbox = state.events().to_vec();
        Self {
            settings: settings.normalized(),
            state,
            countdown_acc_ms: 0,
            tick_acc_ms: 0,
            inbox,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Apply a player or control intent. Returns whether the snapshot changed.
    pub fn apply_action(&mut self, action: GameAction) -> bool {
        match action {
            GameAction::Steer(player, dir) => {
                let next = self.state.steer(player, dir);
                self.commit(next, false)
            }
            GameAction::TogglePause => {
                let next = self.state.toggle_pause();
                self.tick_acc_ms = 0;
                self.commit(next, false)
            }
            GameAction::Restart => {
                let next = self.state.restart(&self.settings);
                tracing::info!(
                    board_size = self.settings.board_size,
                    rounds = self.settings.rounds_total,
                    "match restarted"
                );
                self.reset_timers();
                self.commit(next, true)
            }
            GameAction::NextRound => {
                let next = self.state.prepare_next_round(&self.settings);
                if next.round() != self.state.round() {
                    tracing::debug!(round = next.round(), "next round");
                    self.reset_timers();
                }
                self.commit(next, true)
            }
        }
    }

    /// Feed `elapsed_ms` of wall time. Returns whether any transition happened.
    ///
    /// Call [`Match::take_events`] after each `advance`; the queue is capped at
    /// [`MAX_QUEUED_EVENTS`].
    pub fn advance(&mut self, elapsed_ms: u32) -> bool {
        match self.state.phase() {
            Phase::Countdown => self.advance_countdown(elapsed_ms),
            Phase::Running => self.advance_running(elapsed_ms),
            Phase::Paused | Phase::GameOver | Phase::MatchOver => {
                self.reset_timers();
                false
            }
        }
    }

    fn advance_countdown(&mut self, elapsed_ms: u32) -> bool {
        self.countdown_acc_ms = self.countdown_acc_ms.saturating_add(elapsed_ms);
        let mut changed = false;
        while self.countdown_acc_ms >= COUNTDOWN_STEP_MS && self.state.phase() == Phase::Countdown {
            self.countdown_acc_ms -= COUNTDOWN_STEP_MS;
            let next = self.state.countdown_tick(COUNTDOWN_STEP_MS);
            changed |= self.commit(next, false);
        }
        if self.state.phase() != Phase::Countdown {
            // Leftover countdown time does not count toward the first tick.
            self.reset_timers();
        }
        changed
    }

    fn advance_running(&mut self, elapsed_ms: u32) -> bool {
        let tick_ms = self.settings.tick_ms;
        self.tick_acc_ms = self.tick_acc_ms.saturating_add(elapsed_ms);

        let mut steps = 0;
        while self.tick_acc_ms >= tick_ms && self.state.phase() == Phase::Running {
            if steps == MAX_CATCH_UP_STEPS {
                tracing::debug!(behind_ms = self.tick_acc_ms, "dropping missed ticks");
                self.tick_acc_ms = 0;
                break;
            }
            self.tick_acc_ms -= tick_ms;
            let next = self.state.step(&self.settings);
            self.commit(next, true);
            steps += 1;
        }
        if self.state.phase() != Phase::Running {
            self.reset_timers();
        }
        steps > 0
    }

    /// Drain the events of every transition since the last call, oldest first.
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        self.state.take_events();
        std::mem::take(&mut self.inbox)
    }

    /// Swap in new settings.
    ///
    /// Board size and round count shape the whole match, so changing either
    /// starts a fresh one. Returns whether that happened.
    pub fn update_settings(&mut self, settings: Settings) -> bool {
        let settings = settings.normalized();
        let restart = self.settings.requires_restart(&settings);
        self.settings = settings;
        if restart {
            tracing::info!(
                board_size = self.settings.board_size,
                rounds = self.settings.rounds_total,
                "settings changed, restarting match"
            );
            let next = self.state.restart(&self.settings);
            self.reset_timers();
            self.commit(next, true);
        }
        restart
    }

    fn reset_timers(&mut self) {
        self.countdown_acc_ms = 0;
        self.tick_acc_ms = 0;
    }

    /// Install `next`; `fresh` marks snapshots whose events were produced by
    /// this transition rather than carried over.
    fn commit(&mut self, next: GameState, fresh: bool) -> bool {
        if next == self.state {
            return false;
        }
        if next.phase() != self.state.phase() {
            tracing::debug!(
                from = self.state.phase().as_str(),
                to = next.phase().as_str(),
                tick = next.tick(),
                "phase changed"
            );
            log_outcome(&next);
        }
        if fresh {
            for event in next.events() {
                log_event(next.tick(), event);
            }
            self.inbox.extend_from_slice(next.events());
            if self.inbox.len() > MAX_QUEUED_EVENTS {
                let overflow = self.inbox.len() - MAX_QUEUED_EVENTS;
                self.inbox.drain(..overflow);
            }
        }
        self.state = next;
        true
    }
}

fn log_event(tick: u64, event: &GameEvent) {
    let at = event.at();
    let who = event.who().map(PlayerId::as_str);
    match event {
        GameEvent::Death { .. } => tracing::debug!(tick, who, x = at.x, y = at.y, "snake died"),
        GameEvent::Eat { .. } => tracing::trace!(tick, who, x = at.x, y = at.y, "food eaten"),
        GameEvent::SpawnFood { .. } => tracing::trace!(tick, x = at.x, y = at.y, "food spawned"),
    }
}

fn log_outcome(state: &GameState) {
    let winner = |w: Option<Winner>| w.map(Winner::as_str).unwrap_or("none");
    let scores = state.scores();
    match state.phase() {
        Phase::GameOver => tracing::info!(
            round = state.round(),
            winner = winner(state.round_winner()),
            p1 = scores.p1,
            p2 = scores.p2,
            "round over"
        ),
        Phase::MatchOver => tracing::info!(
            round = state.round(),
            round_winner = winner(state.round_winner()),
            winner = winner(state.match_winner()),
            p1 = scores.p1,
            p2 = scores.p2,
            "match over"
        ),
        _ => {}
    }
}
