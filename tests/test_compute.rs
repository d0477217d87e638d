use std::time::{Duration, Instant};

use tankz::compute::*;
use tankz::config::{GameConfig, ImpactTuning};
use tankz::entities::*;
use tankz::turn::Key;

use rand::rngs::StdRng;
use rand::SeedableRng;

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

fn key(key: Key, pressed: bool) -> InputEvent {
    InputEvent::Key { key, pressed }
}

fn run_ticks(state: &mut GameState, rng: &mut StdRng, n: usize) {
    for _ in 0..n {
        tick(state, rng);
    }
}

fn impact_config() -> GameConfig {
    GameConfig {
        impact: ImpactTuning {
            enabled: true,
            ..ImpactTuning::default()
        },
        ..GameConfig::default()
    }
}

// ── init_state ────────────────────────────────────────────────────────────────

#[test]
fn init_state_layout() {
    let s = init_state(GameConfig::default());
    assert_eq!(s.tanks[0].body.x, 100.0);
    assert_eq!(s.tanks[0].body.y, 600.0);
    assert_eq!(s.tanks[1].body.x, 1000.0);
    assert_eq!(s.active, PlayerId::One);
    assert_eq!(s.status, GameStatus::Playing);
    assert_eq!(s.frame, 0);
    assert_eq!(s.terrain.points().len(), 16);
}

// ── handle_event ──────────────────────────────────────────────────────────────

#[test]
fn keys_only_reach_active_tank() {
    let mut s = init_state(GameConfig::default());
    let mut rng = seeded_rng();
    let now = Instant::now();
    handle_event(&mut s, key(Key::MoveRight, true), now, &mut rng);
    assert!(s.tanks[0].move_right);
    assert!(!s.tanks[1].move_right);
}

#[test]
fn click_cuts_crater_regardless_of_turn() {
    let mut s = init_state(GameConfig::default());
    let mut rng = seeded_rng();
    let now = Instant::now();
    s.active = PlayerId::Two;

    let out = handle_event(&mut s, InputEvent::Click { x: 600.0, y: 700.0 }, now, &mut rng);
    assert_eq!(out, EventOutcome::Continue);
    assert_eq!(s.terrain.points().len(), 20);
    assert_eq!(s.active, PlayerId::Two);
}

#[test]
fn click_in_sky_changes_nothing() {
    let mut s = init_state(GameConfig::default());
    let mut rng = seeded_rng();
    let before = s.terrain.points().to_vec();
    handle_event(&mut s, InputEvent::Click { x: 600.0, y: 200.0 }, Instant::now(), &mut rng);
    assert_eq!(s.terrain.points(), before.as_slice());
}

#[test]
fn quit_events() {
    let mut s = init_state(GameConfig::default());
    let mut rng = seeded_rng();
    let now = Instant::now();
    assert_eq!(handle_event(&mut s, InputEvent::Quit, now, &mut rng), EventOutcome::Quit);
    assert_eq!(handle_event(&mut s, key(Key::Quit, true), now, &mut rng), EventOutcome::Quit);
}

// ── turn flow ─────────────────────────────────────────────────────────────────

#[test]
fn completed_fire_swaps_turn_and_resets_shooter() {
    let mut s = init_state(GameConfig::default());
    let mut rng = seeded_rng();
    let t0 = Instant::now();

    handle_event(&mut s, key(Key::MoveRight, true), t0, &mut rng);
    handle_event(&mut s, key(Key::Fire, true), t0, &mut rng);
    run_ticks(&mut s, &mut rng, 30);
    assert_eq!(s.tanks[0].distance_moved, 30);
    assert_eq!(s.tanks[0].power, 30);

    let out = handle_event(&mut s, key(Key::Fire, false), t0 + Duration::from_millis(250), &mut rng);
    assert_eq!(out, EventOutcome::TurnPassed);
    assert_eq!(s.active, PlayerId::Two);
    assert_eq!(s.tanks[0].distance_moved, 0);
    assert_eq!(s.tanks[0].power, 0);
    assert_eq!(s.tanks[0].projectiles.len(), 1);
}

#[test]
fn turns_alternate() {
    let mut s = init_state(GameConfig::default());
    let mut rng = seeded_rng();
    let mut now = Instant::now();
    for expected in [PlayerId::Two, PlayerId::One, PlayerId::Two] {
        handle_event(&mut s, key(Key::Fire, true), now, &mut rng);
        now += Duration::from_millis(300);
        handle_event(&mut s, key(Key::Fire, false), now, &mut rng);
        now += Duration::from_millis(300);
        assert_eq!(s.active, expected);
    }
    assert_eq!(s.tanks[0].projectiles.len(), 2);
    assert_eq!(s.tanks[1].projectiles.len(), 1);
}

// ── end to end ────────────────────────────────────────────────────────────────

#[test]
fn charge_fire_and_projectile_leaves_field() {
    let mut s = init_state(GameConfig::default());
    let mut rng = seeded_rng();
    let frame = s.config.game_loop.frame();
    let t0 = Instant::now();

    handle_event(&mut s, key(Key::Fire, true), t0, &mut rng);
    run_ticks(&mut s, &mut rng, 50);
    let out = handle_event(&mut s, key(Key::Fire, false), t0 + frame * 50, &mut rng);
    assert_eq!(out, EventOutcome::TurnPassed);

    let shooter = &s.tanks[0];
    assert_eq!(shooter.projectiles.len(), 1);
    let mut shell = shooter.projectiles[0].clone();
    assert_eq!(shell.speed, -6.0);
    assert!((-11.0..=-1.0).contains(&shell.speed));

    let mut exited_at = None;
    for n in 1..=200 {
        let before = shell.body.y;
        shell.update();
        if !shell.is_active && exited_at.is_none() {
            assert!(shell.body.y > 800.0);
            assert!(before <= 800.0);
            exited_at = Some(n);
        }
    }
    assert!(exited_at.is_some());
    assert!(!shell.is_active);

    run_ticks(&mut s, &mut rng, 200);
    assert!(s.tanks[0].projectiles.is_empty());
}

// ── tick ──────────────────────────────────────────────────────────────────────

#[test]
fn tick_advances_both_tanks() {
    let mut s = init_state(GameConfig::default());
    let mut rng = seeded_rng();
    tick(&mut s, &mut rng);
    assert_eq!(s.frame, 1);
    assert_eq!(s.tanks[0].body.y, 604.0);
    assert_eq!(s.tanks[1].body.y, 604.0);
}

#[test]
fn projectiles_pass_through_ground_by_default() {
    let mut s = init_state(GameConfig::default());
    let mut rng = seeded_rng();
    s.tanks[0]
        .projectiles
        .push(Projectile::new(590.0, 710.0, 0, 0.0, s.config.projectile));
    tick(&mut s, &mut rng);
    assert_eq!(s.tanks[0].projectiles.len(), 1);
    assert_eq!(s.terrain.points().len(), 16);
}

#[test]
fn impact_with_ground_cuts_crater() {
    let mut s = init_state(impact_config());
    let mut rng = seeded_rng();
    s.tanks[0]
        .projectiles
        .push(Projectile::new(590.0, 710.0, 0, 0.0, s.config.projectile));
    tick(&mut s, &mut rng);
    assert!(s.tanks[0].projectiles.is_empty());
    assert_eq!(s.terrain.points().len(), 20);
    assert_eq!(s.status, GameStatus::Playing);
}

#[test]
fn direct_hit_ends_game() {
    let mut s = init_state(impact_config());
    let mut rng = seeded_rng();
    s.tanks[1].health = 10;
    s.tanks[0]
        .projectiles
        .push(Projectile::new(1040.0, 620.0, 0, 0.0, s.config.projectile));
    tick(&mut s, &mut rng);

    assert!(s.tanks[0].projectiles.is_empty());
    assert_eq!(s.tanks[1].health, 0);
    assert_eq!(s.tanks[0].health, 100);
    assert_eq!(
        s.status,
        GameStatus::GameOver {
            winner: Some(PlayerId::One)
        }
    );
    assert_eq!(final_score(&s), Some(100));
}

#[test]
fn game_over_freezes_play() {
    let mut s = init_state(GameConfig::default());
    let mut rng = seeded_rng();
    s.tanks[0].health = 0;
    tick(&mut s, &mut rng);
    assert_eq!(
        s.status,
        GameStatus::GameOver {
            winner: Some(PlayerId::Two)
        }
    );
    let frame = s.frame;
    let y = s.tanks[1].body.y;

    let now = Instant::now();
    assert_eq!(
        handle_event(&mut s, key(Key::MoveLeft, true), now, &mut rng),
        EventOutcome::Continue
    );
    assert!(!s.tanks[0].move_left);
    tick(&mut s, &mut rng);
    assert_eq!(s.frame, frame);
    assert_eq!(s.tanks[1].body.y, y);
    assert_eq!(handle_event(&mut s, key(Key::Quit, true), now, &mut rng), EventOutcome::Quit);
}

#[test]
fn final_score_only_for_decided_games() {
    let mut s = init_state(GameConfig::default());
    assert_eq!(final_score(&s), None);
    s.status = GameStatus::GameOver { winner: None };
    assert_eq!(final_score(&s), None);
    s.tanks[1].health = 64;
    s.status = GameStatus::GameOver {
        winner: Some(PlayerId::Two),
    };
    assert_eq!(final_score(&s), Some(64));
}
