/// Gameplay tuning.
///
/// Every struct's `Default` reproduces the constants the game has always
/// shipped with. A JSON file can override any subset of fields; missing
/// fields fall back to the defaults.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("parse config {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

// ── World ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct WorldTuning {
    pub width: f32,
    pub height: f32,
}

impl Default for WorldTuning {
    fn default() -> Self {
        Self {
            width: 1200.0,
            height: 800.0,
        }
    }
}

// ── Terrain ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct TerrainTuning {
    /// Thickness of the ground band; the surface sits at `height - asl`.
    pub asl: f32,
    /// Number of points inserted per crater.
    pub steepness: usize,
    /// Impacts above the surface by more than this are ignored.
    pub surface_tolerance: f32,
}

impl Default for TerrainTuning {
    fn default() -> Self {
        Self {
            asl: 100.0,
            steepness: 5,
            surface_tolerance: 5.0,
        }
    }
}

// ── Tanks ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct TankTuning {
    pub width: f32,
    pub height: f32,
    /// The line the body settles on (not terrain-following).
    pub asl: f32,
    pub max_distance: i32,
    pub max_power: i32,
    pub max_angle: i32,
    pub max_health: i32,
    /// Pixels the body falls per tick while above `asl`.
    pub fall_speed: f32,
    pub move_speed: f32,
    /// Movement stops at these x limits regardless of the distance budget.
    pub min_x: f32,
    pub max_x: f32,
    pub spawn: [(f32, f32); 2],
}

impl Default for TankTuning {
    fn default() -> Self {
        Self {
            width: 100.0,
            height: 50.0,
            asl: 650.0,
            max_distance: 100,
            max_power: 100,
            max_angle: 80,
            max_health: 100,
            fall_speed: 4.0,
            move_speed: 1.0,
            min_x: 0.0,
            max_x: 1000.0,
            spawn: [(100.0, 600.0), (1000.0, 600.0)],
        }
    }
}

// ── Projectiles ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct ProjectileTuning {
    pub size: f32,
    pub gravity: f32,
    pub dt: f32,
    /// Small constant added to the vertical step every tick.
    pub drift: f32,
    pub min_x: f32,
    pub max_x: f32,
    pub max_y: f32,
}

impl Default for ProjectileTuning {
    fn default() -> Self {
        Self {
            size: 20.0,
            gravity: 9.8,
            dt: 0.01,
            drift: 0.01,
            min_x: -100.0,
            max_x: 1200.0,
            max_y: 800.0,
        }
    }
}

// ── Turns & impacts ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct TurnTuning {
    /// Minimum gap between two accepted fire-key edges.
    pub fire_debounce_ms: u64,
    /// Radius used for pointer-click terrain edits.
    pub click_radius: i32,
}

impl TurnTuning {
    pub fn fire_debounce(&self) -> Duration {
        Duration::from_millis(self.fire_debounce_ms)
    }
}

impl Default for TurnTuning {
    fn default() -> Self {
        Self {
            fire_debounce_ms: 200,
            click_radius: 55,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct ImpactTuning {
    /// Off by default: projectiles fly through terrain and tanks.
    pub enabled: bool,
    pub blast_radius: i32,
    pub damage: i32,
}

impl Default for ImpactTuning {
    fn default() -> Self {
        Self {
            enabled: false,
            blast_radius: 55,
            damage: 25,
        }
    }
}

// ── Loop ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct LoopTuning {
    pub ticks_per_second: u32,
}

impl LoopTuning {
    pub fn frame(&self) -> Duration {
        Duration::from_secs(1) / self.ticks_per_second.max(1)
    }
}

impl Default for LoopTuning {
    fn default() -> Self {
        Self {
            ticks_per_second: 120,
        }
    }
}

// ── Aggregate ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub world: WorldTuning,
    pub terrain: TerrainTuning,
    pub tank: TankTuning,
    pub projectile: ProjectileTuning,
    pub turn: TurnTuning,
    pub impact: ImpactTuning,
    #[serde(rename = "loop")]
    pub game_loop: LoopTuning,
}

impl GameConfig {
    pub fn from_json(text: &str, origin: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(text).map_err(|source| ConfigError::Parse {
            path: origin.to_string(),
            source,
        })
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&text, &path.display().to_string())
    }

    /// Like [`GameConfig::load`], but a missing file yields the defaults.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::info!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let config = Self::load(path)?;
        tracing::info!(path = %path.display(), "config loaded");
        Ok(config)
    }
}
