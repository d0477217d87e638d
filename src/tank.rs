/// Per-player tank controller: gravity, aiming, movement budget, the
/// charge meter and the projectiles the tank has fired.

use crate::config::{ProjectileTuning, TankTuning};
use crate::entities::{Body, Cannon, HealthBar, Point, Projectile, Tank};

const CANNON_WIDTH: f32 = 10.0;
const CANNON_LENGTH: f32 = 100.0;
/// Cannon body sits this far above the tank's top edge.
const CANNON_RISE: f32 = 30.0;
/// Projectiles spawn this far above the tank's top edge.
const MUZZLE_RISE: f32 = 40.0;

const HEALTH_BAR_HEIGHT: f32 = 10.0;
const HEALTH_BAR_RISE: f32 = 80.0;

impl Tank {
    pub fn new(x: f32, y: f32, tuning: TankTuning, projectile_tuning: ProjectileTuning) -> Self {
        let body = Body::new(x, y, tuning.width, tuning.height);
        let mut tank = Self {
            body,
            launch_angle: 0,
            distance_moved: 0,
            move_left: false,
            move_right: false,
            rotate_left: false,
            rotate_right: false,
            health: tuning.max_health,
            power: 0,
            power_decreasing: false,
            shot_began: false,
            cannon: Cannon {
                body: Body::new(x, y, CANNON_WIDTH, CANNON_LENGTH),
                angle: 0,
            },
            projectiles: Vec::new(),
            health_bar: HealthBar::new(&body, tuning.max_health),
            tuning,
            projectile_tuning,
        };
        tank.place_cannon();
        tank
    }

    /// Advance one tick.
    pub fn update(&mut self) {
        self.gravity();
        self.place_cannon();
        self.rotate();
        self.apply_movement();
        if self.shot_began {
            self.charge();
        }

        for projectile in &mut self.projectiles {
            projectile.update();
        }
        self.projectiles.retain(|p| p.is_active);

        self.health_bar.update(&self.body, self.health);
    }

    /// Falls toward the fixed ASL line. Craters underneath are ignored.
    fn gravity(&mut self) {
        if self.body.y < self.tuning.asl {
            self.body.y += self.tuning.fall_speed;
        }
    }

    fn place_cannon(&mut self) {
        self.cannon.body.x = self.body.x + self.body.width / 2.0 - self.cannon.body.width / 2.0;
        self.cannon.body.y = self.body.y - CANNON_RISE;
        self.cannon.angle = self.launch_angle;
    }

    fn rotate(&mut self) {
        let max = self.tuning.max_angle;
        if self.rotate_left {
            self.launch_angle = (self.launch_angle + 1).min(max);
        }
        if self.rotate_right {
            self.launch_angle = (self.launch_angle - 1).max(-max);
        }
        self.cannon.angle = self.launch_angle;
    }

    /// One step per tick while the key is held. A step that would take
    /// `distance_moved` past the budget is simply not taken, so the tank
    /// stops at the bound and only the opposite direction frees it.
    fn apply_movement(&mut self) {
        let t = self.tuning;
        if self.move_right && self.body.x < t.max_x && self.distance_moved < t.max_distance {
            self.distance_moved += 1;
            self.body.x += t.move_speed;
        }
        if self.move_left && self.body.x > t.min_x && self.distance_moved > -t.max_distance {
            self.distance_moved -= 1;
            self.body.x -= t.move_speed;
        }
    }

    /// Triangle wave between `-max_power` and `max_power`.
    fn charge(&mut self) {
        let max = self.tuning.max_power;
        if self.power_decreasing {
            self.power = (self.power - 1).max(-max);
            if self.power <= -max {
                self.power_decreasing = false;
            }
        } else {
            self.power = (self.power + 1).min(max);
            if self.power >= max {
                self.power_decreasing = true;
            }
        }
    }

    /// Spawn a projectile at the muzzle with the current launch angle.
    /// The charge meter is left untouched.
    pub fn create_projectile(&mut self, speed: f32) {
        let muzzle = self.muzzle();
        self.projectiles.push(Projectile::new(
            muzzle.x,
            muzzle.y,
            self.launch_angle,
            speed,
            self.projectile_tuning,
        ));
    }

    pub fn muzzle(&self) -> Point {
        Point::new(self.body.x + self.body.width / 2.0, self.body.y - MUZZLE_RISE)
    }

    /// Shot speed for the current charge: always negative, in `[-11, -1]`.
    pub fn shot_speed(&self) -> f32 {
        let ratio = if self.tuning.max_power == 0 {
            0.0
        } else {
            self.power as f32 / self.tuning.max_power as f32
        };
        -(ratio.abs() * 10.0) - 1.0
    }

    /// Clears the per-turn budget once this tank has fired.
    pub fn reset_turn(&mut self) {
        self.distance_moved = 0;
        self.power = 0;
        self.power_decreasing = false;
        self.move_left = false;
        self.move_right = false;
        self.rotate_left = false;
        self.rotate_right = false;
    }

    pub fn apply_damage(&mut self, amount: i32) {
        self.health = (self.health - amount).clamp(0, self.tuning.max_health.max(0));
        self.health_bar.update(&self.body, self.health);
    }

    pub fn is_destroyed(&self) -> bool {
        self.health <= 0
    }
}

impl HealthBar {
    pub fn new(owner: &Body, total: i32) -> Self {
        let full_width = owner.width * 1.5;
        let mut bar = Self {
            body: Body::new(owner.x, owner.y, full_width, HEALTH_BAR_HEIGHT),
            full_width,
            current_value: total,
            total_value: total,
            is_visible: true,
        };
        bar.update(owner, total);
        bar
    }

    pub fn update(&mut self, owner: &Body, health: i32) {
        self.body.x = owner.x - owner.width / 4.0;
        self.body.y = owner.y - HEALTH_BAR_RISE;
        self.current_value = health;
        self.body.width = self.ratio() * self.full_width;
    }

    /// Fraction of health left; a zero total reads as empty.
    pub fn ratio(&self) -> f32 {
        if self.total_value <= 0 {
            return 0.0;
        }
        (self.current_value as f32 / self.total_value as f32).clamp(0.0, 1.0)
    }
}
