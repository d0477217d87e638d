/// Turn manager: translates key edges into tank flags, debounces the fire
/// key and decides when the active player's turn is over.
///
/// The fire key toggles on every accepted edge. The first edge starts the
/// charge meter; the next one releases the shot and ends the turn. Edges
/// that arrive within the debounce window of the previous accepted one are
/// dropped, which absorbs key-repeat bursts.

use std::time::{Duration, Instant};

use crate::entities::{PlayerId, Tank};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    MoveLeft,
    MoveRight,
    RotateLeft,
    RotateRight,
    Fire,
    Quit,
    /// Recognised but unbound.
    Up,
    Down,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TurnPhase {
    AwaitingInput,
    Charging,
    /// Shot released; the turn is handed over on the next `hand_over`.
    Fired,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyOutcome {
    Ignored,
    Handled,
    /// A shot left the cannon and the turn is complete.
    TurnFinished,
    Quit,
}

#[derive(Clone, Debug)]
pub struct TurnManager {
    phase: TurnPhase,
    debounce: Duration,
    last_fire: Option<Instant>,
}

impl TurnManager {
    pub fn new(debounce: Duration) -> Self {
        Self {
            phase: TurnPhase::AwaitingInput,
            debounce,
            last_fire: None,
        }
    }

    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    /// Apply one key edge to the active tank.
    pub fn handle_key(
        &mut self,
        key: Key,
        pressed: bool,
        now: Instant,
        player: &mut Tank,
    ) -> KeyOutcome {
        match key {
            Key::MoveLeft => player.move_left = pressed,
            Key::MoveRight => player.move_right = pressed,
            Key::RotateLeft => player.rotate_left = pressed,
            Key::RotateRight => player.rotate_right = pressed,
            Key::Fire => return self.fire_edge(now, player),
            Key::Quit if pressed => return KeyOutcome::Quit,
            Key::Quit | Key::Up | Key::Down => return KeyOutcome::Ignored,
        }
        KeyOutcome::Handled
    }

    fn fire_edge(&mut self, now: Instant, player: &mut Tank) -> KeyOutcome {
        if self.phase == TurnPhase::Fired {
            return KeyOutcome::Ignored;
        }
        if let Some(last) = self.last_fire {
            if now.saturating_duration_since(last) < self.debounce {
                return KeyOutcome::Ignored;
            }
        }
        self.last_fire = Some(now);

        if !player.shot_began {
            player.shot_began = true;
            self.phase = TurnPhase::Charging;
            return KeyOutcome::Handled;
        }

        let speed = player.shot_speed();
        player.create_projectile(speed);
        player.shot_began = false;
        self.phase = TurnPhase::Fired;
        tracing::info!(power = player.power, angle = player.launch_angle, speed, "shot fired");
        KeyOutcome::TurnFinished
    }

    /// Reset the shooter's turn budget and pass control to the other tank.
    pub fn hand_over(&mut self, tanks: &mut [Tank; 2], active: PlayerId) -> PlayerId {
        tanks[active.index()].reset_turn();
        self.phase = TurnPhase::AwaitingInput;
        let next = active.other();
        tracing::info!(from = %active, to = %next, "turn handed over");
        next
    }
}
