/// Constant-gravity ballistic motion.

use crate::config::ProjectileTuning;
use crate::entities::{Body, Projectile};

impl Projectile {
    /// `angle` is in degrees; 0 points straight along the vertical axis.
    pub fn new(x: f32, y: f32, angle: i32, speed: f32, tuning: ProjectileTuning) -> Self {
        let rad = (angle as f32).to_radians();
        Self {
            body: Body::new(x, y, tuning.size, tuning.size),
            direction: (rad.cos(), rad.sin()),
            speed,
            vertical_velocity: 0.0,
            is_active: true,
            tuning,
        }
    }

    /// Advance one tick. Inactive projectiles no longer move.
    pub fn update(&mut self) {
        if !self.is_active {
            return;
        }
        let t = &self.tuning;
        self.vertical_velocity += t.gravity * t.dt;

        self.body.x += self.direction.1 * self.speed;
        self.body.y += self.vertical_velocity + t.drift + self.direction.0 * self.speed;

        if self.out_of_bounds() {
            self.is_active = false;
        }
    }

    pub fn out_of_bounds(&self) -> bool {
        let t = &self.tuning;
        self.body.y > t.max_y || self.body.x > t.max_x || self.body.x < t.min_x
    }

    pub fn kill(&mut self) {
        self.is_active = false;
    }
}
