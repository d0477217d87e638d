/// Game-level state transitions.
///
/// The loop driver owns a single `GameState` and feeds it through
/// `handle_event` for every input and `tick` once per frame. All randomness
/// comes through an injected RNG so tests can use a seeded one.

use std::time::Instant;

use rand::Rng;

use crate::config::GameConfig;
use crate::entities::{Body, GameState, GameStatus, PlayerId, Point, Tank};
use crate::terrain::Terrain;
use crate::turn::{Key, KeyOutcome, TurnManager};

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InputEvent {
    Key { key: Key, pressed: bool },
    /// Pointer press in world coordinates.
    Click { x: f32, y: f32 },
    Quit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EventOutcome {
    Continue,
    TurnPassed,
    Quit,
}

// ── Constructors ─────────────────────────────────────────────────────────────

/// Flat terrain, both tanks at their spawn points, player one to move.
pub fn init_state(config: GameConfig) -> GameState {
    let [a, b] = config.tank.spawn;
    let tanks = [
        Tank::new(a.0, a.1, config.tank, config.projectile),
        Tank::new(b.0, b.1, config.tank, config.projectile),
    ];
    GameState {
        terrain: Terrain::new(&config.world, &config.terrain),
        tanks,
        active: PlayerId::One,
        turns: TurnManager::new(config.turn.fire_debounce()),
        status: GameStatus::Playing,
        frame: 0,
        config,
    }
}

// ── Input ────────────────────────────────────────────────────────────────────

/// Route one input event. Key edges go to the active tank through the turn
/// manager; clicks cut a crater no matter whose turn it is.
pub fn handle_event(
    state: &mut GameState,
    event: InputEvent,
    now: Instant,
    rng: &mut impl Rng,
) -> EventOutcome {
    match event {
        InputEvent::Quit => EventOutcome::Quit,
        InputEvent::Click { x, y } => {
            if state.status == GameStatus::Playing {
                let radius = state.config.turn.click_radius;
                state.terrain.destroy(x, y, radius, rng);
            }
            EventOutcome::Continue
        }
        InputEvent::Key { key, pressed } => {
            if state.status != GameStatus::Playing {
                return if key == Key::Quit && pressed {
                    EventOutcome::Quit
                } else {
                    EventOutcome::Continue
                };
            }
            let active = state.active;
            let outcome = state
                .turns
                .handle_key(key, pressed, now, &mut state.tanks[active.index()]);
            match outcome {
                KeyOutcome::Quit => EventOutcome::Quit,
                KeyOutcome::TurnFinished => {
                    state.active = state.turns.hand_over(&mut state.tanks, active);
                    EventOutcome::TurnPassed
                }
                KeyOutcome::Handled | KeyOutcome::Ignored => EventOutcome::Continue,
            }
        }
    }
}

// ── Per-frame tick ───────────────────────────────────────────────────────────

/// Advance the simulation by one frame.
pub fn tick(state: &mut GameState, rng: &mut impl Rng) {
    if state.status != GameStatus::Playing {
        return;
    }
    state.frame += 1;

    for tank in &mut state.tanks {
        tank.update();
    }

    if state.config.impact.enabled {
        resolve_impacts(state, rng);
    }

    state.status = match (state.tanks[0].is_destroyed(), state.tanks[1].is_destroyed()) {
        (false, false) => GameStatus::Playing,
        (true, false) => GameStatus::GameOver {
            winner: Some(PlayerId::Two),
        },
        (false, true) => GameStatus::GameOver {
            winner: Some(PlayerId::One),
        },
        (true, true) => GameStatus::GameOver { winner: None },
    };
    if let GameStatus::GameOver { winner } = state.status {
        tracing::info!(?winner, frame = state.frame, "game over");
    }
}

/// Detonate projectiles that entered the ground or the opposing tank.
/// Each blast cuts a crater and damages every tank within its radius.
fn resolve_impacts(state: &mut GameState, rng: &mut impl Rng) {
    let bodies: [Body; 2] = [state.tanks[0].body, state.tanks[1].body];
    let mut blasts: Vec<Point> = Vec::new();

    for (owner, tank) in state.tanks.iter_mut().enumerate() {
        let target = bodies[1 - owner];
        for projectile in tank.projectiles.iter_mut().filter(|p| p.is_active) {
            let hit = projectile.body.center();
            if state.terrain.contains(hit) || target.contains(hit) {
                projectile.kill();
                blasts.push(hit);
            }
        }
        tank.projectiles.retain(|p| p.is_active);
    }

    let impact = state.config.impact;
    for blast in blasts {
        state.terrain.destroy(blast.x, blast.y, impact.blast_radius, rng);
        for (i, tank) in state.tanks.iter_mut().enumerate() {
            if tank.body.center().distance_to(blast) <= impact.blast_radius as f32 {
                tank.apply_damage(impact.damage);
                tracing::info!(tank = i, health = tank.health, "tank hit");
            }
        }
    }
}

/// Score recorded for a finished match: the winner's remaining health.
pub fn final_score(state: &GameState) -> Option<u32> {
    match state.status {
        GameStatus::GameOver { winner: Some(id) } => Some(state.tank(id).health.max(0) as u32),
        _ => None,
    }
}
