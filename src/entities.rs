/// All game entity types: data only. Behaviour lives in `tank`,
/// `projectile`, `terrain`, `turn` and `compute`.

use crate::config::{GameConfig, ProjectileTuning, TankTuning};
use crate::terrain::Terrain;
use crate::turn::TurnManager;

// ── Geometry ──────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: Point) -> f32 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

/// Position and size shared by everything that is drawn: tanks, cannons,
/// projectiles and health bars. `(x, y)` is the top-left corner, with y
/// growing downward.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Body {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Body {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.x + self.width && p.y >= self.y && p.y <= self.y + self.height
    }
}

// ── Players ───────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PlayerId {
    One,
    Two,
}

impl PlayerId {
    pub fn index(self) -> usize {
        match self {
            PlayerId::One => 0,
            PlayerId::Two => 1,
        }
    }

    pub fn other(self) -> PlayerId {
        match self {
            PlayerId::One => PlayerId::Two,
            PlayerId::Two => PlayerId::One,
        }
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlayerId::One => write!(f, "player one"),
            PlayerId::Two => write!(f, "player two"),
        }
    }
}

// ── Projectiles ───────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Projectile {
    pub body: Body,
    /// `(cos θ, sin θ)` of the launch angle.
    pub direction: (f32, f32),
    /// Launch speed; negative values travel up (and left for positive angles).
    pub speed: f32,
    /// Grows by `gravity * dt` every tick.
    pub vertical_velocity: f32,
    pub is_active: bool,
    pub tuning: ProjectileTuning,
}

// ── Tank parts ────────────────────────────────────────────────────────────────

/// Visual barrel; its angle always mirrors the owning tank's launch angle.
#[derive(Clone, Debug)]
pub struct Cannon {
    pub body: Body,
    pub angle: i32,
}

/// Derived view of a tank's health, recomputed every tick.
#[derive(Clone, Debug)]
pub struct HealthBar {
    pub body: Body,
    /// Width of the bar at full health; `body.width` shrinks with damage.
    pub full_width: f32,
    pub current_value: i32,
    pub total_value: i32,
    pub is_visible: bool,
}

#[derive(Clone, Debug)]
pub struct Tank {
    pub body: Body,
    pub launch_angle: i32,
    /// Signed horizontal displacement this turn.
    pub distance_moved: i32,
    pub move_left: bool,
    pub move_right: bool,
    pub rotate_left: bool,
    pub rotate_right: bool,
    pub health: i32,
    /// Charge meter; oscillates between `-max_power` and `max_power`.
    pub power: i32,
    pub power_decreasing: bool,
    /// True while the fire key has started a charge that has not been released.
    pub shot_began: bool,
    pub cannon: Cannon,
    pub projectiles: Vec<Projectile>,
    pub health_bar: HealthBar,
    pub tuning: TankTuning,
    pub projectile_tuning: ProjectileTuning,
}

// ── Master game state ─────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GameStatus {
    Playing,
    /// `winner` is `None` when both tanks went down on the same tick.
    GameOver { winner: Option<PlayerId> },
}

/// Everything the loop driver owns. Only the game-loop thread touches it.
#[derive(Clone, Debug)]
pub struct GameState {
    pub terrain: Terrain,
    pub tanks: [Tank; 2],
    pub active: PlayerId,
    pub turns: TurnManager,
    pub status: GameStatus,
    pub frame: u64,
    pub config: GameConfig,
}

impl GameState {
    pub fn active_tank(&self) -> &Tank {
        &self.tanks[self.active.index()]
    }

    pub fn tank(&self, id: PlayerId) -> &Tank {
        &self.tanks[id.index()]
    }
}
