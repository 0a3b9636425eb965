//! Key mapping from terminal events to game actions.
//!
//! | Keys | Action |
//! |------|--------|
//! | W A S D | steer P1 |
//! | arrow keys | steer P2 |
//! | Space | pause / resume |
//! | R | restart the match |
//! | N, Enter | next round |
//! | Q, Ctrl-C | quit |

use crate::types::{Direction, GameAction, PlayerId};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Map keyboard input to game actions.
pub fn handle_key_event(key: KeyEvent) -> Option<GameAction> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return None;
    }

    let steer = |player, dir| Some(GameAction::Steer(player, dir));
    match key.code {
        // P1
        KeyCode::Char('w') | KeyCode::Char('W') => steer(PlayerId::P1, Direction::Up),
        KeyCode::Char('s') | KeyCode::Char('S') => steer(PlayerId::P1, Direction::Down),
        KeyCode::Char('a') | KeyCode::Char('A') => steer(PlayerId::P1, Direction::Left),
        KeyCode::Char('d') | KeyCode::Char('D') => steer(PlayerId::P1, Direction::Right),

        // P2
        KeyCode::Up => steer(PlayerId::P2, Direction::Up),
        KeyCode::Down => steer(PlayerId::P2, Direction::Down),
        KeyCode::Left => steer(PlayerId::P2, Direction::Left),
        KeyCode::Right => steer(PlayerId::P2, Direction::Right),

        // Match controls
        KeyCode::Char(' ') => Some(GameAction::TogglePause),
        KeyCode::Char('r') | KeyCode::Char('R') => Some(GameAction::Restart),
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Enter => Some(GameAction::NextRound),

        _ => None,
    }
}

/// Check if key should quit the game.
pub fn should_quit(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q'))
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}
