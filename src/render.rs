/// Scene composition on top of an abstract `Canvas`.
///
/// The canvas is the only thing that knows about pixels or terminal cells.
/// This module decides what is drawn, where, and in which order.

use thiserror::Error;

use crate::entities::{Body, Cannon, GameState, GameStatus, HealthBar, Point, Projectile, Tank};

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("canvas output failed: {0}")]
    Io(#[from] std::io::Error),
}

// ── Palette ──────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Color {
    Blue,
    Red,
    White,
    Green,
    DarkGreen,
    Yellow,
    Orange,
    Grey,
    Black,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Sprite {
    Tank,
    Cannon,
    Projectile,
}

/// Drawing primitives supplied by the platform.
pub trait Canvas {
    fn clear(&mut self, color: Color) -> Result<(), RenderError>;
    fn fill_polygon(&mut self, points: &[Point], color: Color) -> Result<(), RenderError>;
    fn fill_rect(&mut self, rect: Body, color: Color) -> Result<(), RenderError>;
    /// `bounds` is already re-fitted around the rotated sprite; `angle` is in
    /// degrees, counter-clockwise.
    fn draw_sprite(&mut self, sprite: Sprite, bounds: Body, angle: f32) -> Result<(), RenderError>;
    fn draw_text(&mut self, text: &str, x: f32, y: f32, color: Color) -> Result<(), RenderError>;
    fn present(&mut self) -> Result<(), RenderError>;
}

// ── HUD layout ───────────────────────────────────────────────────────────────

const BAR_LENGTH: f32 = 330.0;
const BAR_HEIGHT: f32 = 30.0;
const DISTANCE_LABEL: (f32, f32) = (30.0, 10.0);
const DISTANCE_BAR: (f32, f32) = (30.0, 50.0);
const POWER_LABEL: (f32, f32) = (1050.0, 10.0);
/// The power bar grows leftward from this x.
const POWER_BAR_RIGHT: f32 = 1170.0;
const POWER_BAR_Y: f32 = 50.0;

/// Colour of the power bar for a charge fraction in `[0, 1]`.
pub fn power_color(value: f32) -> Color {
    if value > 0.9 {
        Color::Red
    } else if value > 0.7 {
        Color::Orange
    } else if value > 0.5 {
        Color::Yellow
    } else if value > 0.3 {
        Color::DarkGreen
    } else {
        Color::Green
    }
}

/// Axis-aligned box around `body` rotated by `angle` degrees about its centre.
pub fn rotated_bounds(body: Body, angle: f32) -> Body {
    let (sin, cos) = angle.to_radians().sin_cos();
    let w = body.width * cos.abs() + body.height * sin.abs();
    let h = body.width * sin.abs() + body.height * cos.abs();
    let c = body.center();
    Body::new(c.x - w / 2.0, c.y - h / 2.0, w, h)
}

// ── Scene ────────────────────────────────────────────────────────────────────

/// One drawable thing. Each variant draws differently.
#[derive(Clone, Copy, Debug)]
pub enum SceneItem<'a> {
    Tank(&'a Tank),
    Cannon(&'a Cannon),
    Projectile(&'a Projectile),
    HealthBar(&'a HealthBar),
}

impl SceneItem<'_> {
    pub fn draw(&self, canvas: &mut impl Canvas) -> Result<(), RenderError> {
        match self {
            SceneItem::Tank(tank) => canvas.draw_sprite(Sprite::Tank, tank.body, 0.0),
            SceneItem::Cannon(cannon) => {
                let angle = cannon.angle as f32;
                canvas.draw_sprite(Sprite::Cannon, rotated_bounds(cannon.body, angle), angle)
            }
            SceneItem::Projectile(p) => {
                if p.is_active {
                    canvas.draw_sprite(Sprite::Projectile, p.body, 0.0)
                } else {
                    Ok(())
                }
            }
            SceneItem::HealthBar(bar) => {
                if !bar.is_visible {
                    return Ok(());
                }
                let background = Body { width: bar.full_width, ..bar.body };
                canvas.fill_rect(background, Color::Red)?;
                canvas.fill_rect(bar.body, Color::Green)
            }
        }
    }
}

/// Back-to-front draw order: each tank, its cannon, its shots, its health bar.
pub fn scene(state: &GameState) -> Vec<SceneItem<'_>> {
    let mut items = Vec::new();
    for tank in &state.tanks {
        items.push(SceneItem::Tank(tank));
        items.push(SceneItem::Cannon(&tank.cannon));
        items.extend(tank.projectiles.iter().map(SceneItem::Projectile));
        items.push(SceneItem::HealthBar(&tank.health_bar));
    }
    items
}

/// Render one complete frame.
pub fn draw_frame(canvas: &mut impl Canvas, state: &GameState) -> Result<(), RenderError> {
    canvas.clear(Color::White)?;
    state.terrain.draw(canvas)?;
    for item in scene(state) {
        item.draw(canvas)?;
    }
    draw_hud(canvas, state)?;
    if let GameStatus::GameOver { winner } = state.status {
        draw_game_over(canvas, state, winner.map(|w| w.to_string()))?;
    }
    canvas.present()
}

fn draw_hud(canvas: &mut impl Canvas, state: &GameState) -> Result<(), RenderError> {
    let player = state.active_tank();
    let t = &player.tuning;

    canvas.draw_text("YOUR TURN", player.body.x - 40.0, player.body.y - 130.0, Color::Red)?;

    canvas.draw_text("DISTANCE TRAVELLED", DISTANCE_LABEL.0, DISTANCE_LABEL.1, Color::Black)?;
    let travelled = fraction(player.distance_moved, t.max_distance);
    canvas.fill_rect(
        Body::new(DISTANCE_BAR.0, DISTANCE_BAR.1, travelled * BAR_LENGTH, BAR_HEIGHT),
        Color::Black,
    )?;

    canvas.draw_text("POWER", POWER_LABEL.0, POWER_LABEL.1, Color::Black)?;
    let power = fraction(player.power, t.max_power);
    let width = power * BAR_LENGTH;
    canvas.fill_rect(
        Body::new(POWER_BAR_RIGHT - width, POWER_BAR_Y, width, BAR_HEIGHT),
        power_color(power),
    )
}

fn draw_game_over(
    canvas: &mut impl Canvas,
    state: &GameState,
    winner: Option<String>,
) -> Result<(), RenderError> {
    let cx = state.config.world.width / 2.0;
    let cy = state.config.world.height / 2.0;
    let headline = match winner {
        Some(name) => format!("GAME OVER - {} WINS", name.to_uppercase()),
        None => "GAME OVER - DRAW".to_string(),
    };
    canvas.draw_text(&headline, cx - 150.0, cy - 40.0, Color::Red)?;
    canvas.draw_text("ENTER - Play Again  ESC - Quit", cx - 150.0, cy, Color::Black)
}

/// `|value / max|`, zero when `max` is zero.
fn fraction(value: i32, max: i32) -> f32 {
    if max == 0 {
        0.0
    } else {
        (value as f32 / max as f32).abs()
    }
}
