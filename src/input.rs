/// Keyboard translation: terminal key codes to game keys, and raw key
/// events to the press/release edges the turn manager expects.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEventKind};

use crate::compute::InputEvent;
use crate::turn::Key;

/// On terminals without key-release reporting a key counts as held while
/// its press/repeat events keep arriving within this window.
pub const HOLD_WINDOW: Duration = Duration::from_millis(150);

pub fn map_key(code: KeyCode) -> Option<Key> {
    match code {
        KeyCode::Char('a') | KeyCode::Char('A') | KeyCode::Left => Some(Key::MoveLeft),
        KeyCode::Char('d') | KeyCode::Char('D') | KeyCode::Right => Some(Key::MoveRight),
        KeyCode::Char('q') | KeyCode::Char('Q') => Some(Key::RotateLeft),
        KeyCode::Char('e') | KeyCode::Char('E') => Some(Key::RotateRight),
        KeyCode::Char(' ') => Some(Key::Fire),
        KeyCode::Esc => Some(Key::Quit),
        KeyCode::Up => Some(Key::Up),
        KeyCode::Down => Some(Key::Down),
        _ => None,
    }
}

/// Turns raw terminal key events into press/release edges.
///
/// * **Keyboard-enhancement capable** terminals report `Press` / `Repeat` /
///   `Release`; repeats are dropped and the other two pass straight through.
/// * **Classic** terminals only send `Press`, repeated while a key is held.
///   A repeat of a key that is already held is swallowed, and a key that has
///   gone quiet for `HOLD_WINDOW` gets a synthetic release. The fire key
///   never gets one: on those terminals a shot is two separate taps.
#[derive(Debug)]
pub struct KeyTracker {
    enhanced: bool,
    last_seen: HashMap<Key, Instant>,
}

impl KeyTracker {
    pub fn new(enhanced: bool) -> Self {
        Self {
            enhanced,
            last_seen: HashMap::new(),
        }
    }

    pub fn on_key(&mut self, key: Key, kind: KeyEventKind, now: Instant) -> Option<InputEvent> {
        if self.enhanced {
            return match kind {
                KeyEventKind::Press => Some(InputEvent::Key { key, pressed: true }),
                KeyEventKind::Release => Some(InputEvent::Key { key, pressed: false }),
                KeyEventKind::Repeat => None,
            };
        }
        if kind != KeyEventKind::Press {
            return None;
        }
        match self.last_seen.insert(key, now) {
            Some(_) => None,
            None => Some(InputEvent::Key { key, pressed: true }),
        }
    }

    /// Synthetic releases for keys quiet longer than `HOLD_WINDOW`.
    pub fn expire(&mut self, now: Instant) -> Vec<InputEvent> {
        if self.enhanced {
            return Vec::new();
        }
        let stale: Vec<Key> = self
            .last_seen
            .iter()
            .filter(|(_, &seen)| now.saturating_duration_since(seen) > HOLD_WINDOW)
            .map(|(&key, _)| key)
            .collect();
        stale
            .into_iter()
            .filter_map(|key| {
                self.last_seen.remove(&key);
                (key != Key::Fire).then_some(InputEvent::Key { key, pressed: false })
            })
            .collect()
    }
}
