use tankz::config::ProjectileTuning;
use tankz::entities::Projectile;

fn shell(x: f32, y: f32, angle: i32, speed: f32) -> Projectile {
    Projectile::new(x, y, angle, speed, ProjectileTuning::default())
}

// ── kinematics ────────────────────────────────────────────────────────────────

#[test]
fn new_projectile_is_active_and_at_rest() {
    let p = shell(150.0, 560.0, 30, -7.0);
    assert!(p.is_active);
    assert_eq!(p.vertical_velocity, 0.0);
    assert_eq!(p.body.width, 20.0);
    let (cos, sin) = p.direction;
    assert!((cos - 30f32.to_radians().cos()).abs() < 1e-6);
    assert!((sin - 0.5).abs() < 1e-6);
}

#[test]
fn zero_angle_has_no_horizontal_drift() {
    let mut p = shell(150.0, 560.0, 0, -7.0);
    for _ in 0..40 {
        p.update();
        assert_eq!(p.body.x, 150.0);
    }
}

#[test]
fn zero_angle_vertical_step_follows_gravity() {
    let mut p = shell(150.0, 560.0, 0, -7.0);
    p.update();
    // v = 9.8 * 0.01; y += v + 0.01 + cos(0) * speed
    assert!((p.vertical_velocity - 0.098).abs() < 1e-6);
    assert!((p.body.y - (560.0 + 0.098 + 0.01 - 7.0)).abs() < 1e-4);

    let y1 = p.body.y;
    p.update();
    assert!((p.vertical_velocity - 0.196).abs() < 1e-6);
    assert!((p.body.y - (y1 + 0.196 + 0.01 - 7.0)).abs() < 1e-4);
}

#[test]
fn positive_angle_with_negative_speed_travels_left() {
    let mut p = shell(600.0, 500.0, 45, -7.0);
    p.update();
    assert!(p.body.x < 600.0);
    assert!(p.body.y < 500.0);
}

#[test]
fn velocity_keeps_growing_until_projectile_falls() {
    let mut p = shell(600.0, 500.0, 0, -5.0);
    let mut lowest = p.body.y;
    let mut went_up = false;
    let mut came_down = false;
    for _ in 0..200 {
        let before = p.body.y;
        p.update();
        if p.body.y < before {
            went_up = true;
        }
        if went_up && p.body.y > before {
            came_down = true;
        }
        lowest = lowest.min(p.body.y);
    }
    assert!(went_up && came_down);
    assert!(lowest < 500.0);
}

// ── bounds ────────────────────────────────────────────────────────────────────

#[test]
fn deactivates_past_bottom() {
    let mut p = shell(500.0, 790.0, 0, 5.0);
    p.update();
    assert!(p.is_active, "y = {}", p.body.y);
    p.update();
    assert!(!p.is_active, "y = {}", p.body.y);
}

#[test]
fn deactivates_past_right_edge() {
    let mut p = shell(1190.0, 100.0, -90, -7.0);
    p.update();
    assert!(p.is_active, "x = {}", p.body.x);
    p.update();
    assert!(!p.is_active, "x = {}", p.body.x);
}

#[test]
fn deactivates_past_left_edge() {
    let mut p = shell(-95.0, 100.0, 90, -3.0);
    p.update();
    assert!(p.is_active, "x = {}", p.body.x);
    p.update();
    assert!(!p.is_active, "x = {}", p.body.x);
}

#[test]
fn inactive_never_reactivates() {
    let mut p = shell(500.0, 790.0, 0, 5.0);
    p.update();
    p.update();
    assert!(!p.is_active);
    let frozen = p.body;
    for _ in 0..50 {
        p.update();
        assert!(!p.is_active);
    }
    assert_eq!(p.body, frozen);
}

#[test]
fn kill_deactivates() {
    let mut p = shell(500.0, 300.0, 0, -7.0);
    p.kill();
    assert!(!p.is_active);
    p.update();
    assert!(!p.is_active);
}
