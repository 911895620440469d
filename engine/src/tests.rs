use std::{cell::RefCell, rc::Rc};

use glam::Vec2;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use space_shooter_core::{BossKind, EnemyId, ManualClock};
use space_shooter_rendering::{Color, DrawCommand, RecordingCanvas, Rect};

use super::*;

const WIDTH: f32 = 800.0;
const HEIGHT: f32 = 600.0;

fn engine_at(tier: QualityTier) -> (GameEngine, ManualClock) {
    let clock = ManualClock::starting_at(1_000);
    let engine = GameEngine::new(EngineConfig::default().with_seed(7), WIDTH, HEIGHT)
        .expect("valid canvas")
        .with_clock(clock.clone())
        .with_optimizer(GameOptimizer::fixed(tier));
    (engine, clock)
}

fn engine() -> (GameEngine, ManualClock) {
    engine_at(QualityTier::High)
}

fn record_events(engine: &mut GameEngine) -> Rc<RefCell<Vec<Event>>> {
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&events);
    let _ = engine.subscribe(move |event| sink.borrow_mut().push(*event));
    events
}

fn player_bullet_at(x: f32, y: f32) -> Bullet {
    Bullet::new(
        Vec2::new(x, y),
        Vec2::ZERO,
        5.0,
        Rgb::from_hex(0x00ff00),
        BulletOwner::Player,
    )
}

fn enemy_bullet_at(x: f32, y: f32) -> Bullet {
    Bullet::new(
        Vec2::new(x, y),
        Vec2::ZERO,
        5.0,
        ENEMY_SHOT_COLOR,
        BulletOwner::Enemy,
    )
}

fn rng() -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(11)
}

#[test]
fn basic_kill_awards_level_one_reward() {
    let (mut engine, _clock) = engine();
    let events = record_events(&mut engine);
    engine
        .enemies
        .push(Enemy::basic(EnemyId::new(100), 400.0, 300.0, 1, &mut rng()));
    engine.player_bullets.push(player_bullet_at(400.0, 300.0));

    let state = engine.update();

    assert_eq!(state.score, 3);
    assert_eq!(state.enemies_killed, 1);
    assert!((state.level_progress - 0.1).abs() < f32::EPSILON);
    assert!(engine.enemies().is_empty());
    assert!(engine.player_bullets().is_empty());
    assert!(!engine.particles().is_empty());

    let events = events.borrow();
    assert!(events.contains(&Event::EnemyKilled));
    assert!(events.contains(&Event::EnemyDestroyed));
    assert!(events.contains(&Event::BulletHit));
}

#[test]
fn heavy_kill_is_worth_triple_once_its_shield_is_gone() {
    let (mut engine, _clock) = engine();
    let mut heavy = Enemy::heavy(EnemyId::new(100), 400.0, 300.0, 1, &mut rng());
    for _ in 0..4 {
        assert!(!heavy.take_damage(1));
    }
    engine.enemies.push(heavy);
    engine.player_bullets.push(player_bullet_at(400.0, 300.0));

    let state = engine.update();

    assert_eq!(state.score, 9);
    assert_eq!(state.enemies_killed, 1);
}

#[test]
fn surviving_hits_only_consume_the_bullet() {
    let (mut engine, _clock) = engine();
    let events = record_events(&mut engine);
    engine
        .enemies
        .push(Enemy::heavy(EnemyId::new(100), 400.0, 300.0, 1, &mut rng()));
    engine.player_bullets.push(player_bullet_at(400.0, 300.0));

    let state = engine.update();

    assert_eq!(state.score, 0);
    assert_eq!(engine.enemies().len(), 1);
    assert_eq!(engine.enemies()[0].shield(), 1);
    assert!(engine.player_bullets().is_empty());
    assert!(events.borrow().contains(&Event::BulletHit));
    assert!(!events.borrow().contains(&Event::EnemyKilled));
}

#[test]
fn boss_defeat_rewards_points_and_three_power_ups() {
    let (mut engine, _clock) = engine();
    let events = record_events(&mut engine);
    engine.level = 5;
    engine.enemies_killed = 40;
    let mut boss = Boss::new(BossKind::Destroyer, 400.0, 100.0, 5);
    assert!(!boss.take_damage(boss.health() - 1));
    engine.boss = Some(boss);
    engine.player_bullets.push(player_bullet_at(400.0, 100.0));

    let state = engine.update();

    assert_eq!(state.score, 200);
    assert!(engine.boss().is_none());
    assert!(!state.boss_active);
    assert_eq!(engine.power_ups().len(), 3);
    for power_up in engine.power_ups() {
        assert!((power_up.x - 400.5).abs() <= 30.0);
        assert!((power_up.y - 100.0).abs() <= 20.0);
    }
    assert_eq!(state.level, 6);
    assert_eq!(state.enemies_killed, 50);

    let events = events.borrow();
    assert!(events.contains(&Event::BossDefeated {
        level: 6,
        score: 200
    }));
    assert!(events.contains(&Event::LevelUp {
        level: 6,
        score: 200
    }));
}

#[test]
fn boss_hits_report_remaining_health() {
    let (mut engine, _clock) = engine();
    engine.level = 5;
    engine.boss = Some(Boss::new(BossKind::Destroyer, 400.0, 100.0, 5));
    engine.player_bullets.push(player_bullet_at(400.0, 100.0));

    let state = engine.update();

    assert!(state.boss_active);
    assert_eq!(state.boss_health, Some(39));
    assert_eq!(state.boss_max_health, Some(40));
    assert_eq!(state.boss_type, Some(BossKind::Destroyer));
}

#[test]
fn shield_absorbs_enemy_bullets() {
    let (mut engine, clock) = engine();
    let events = record_events(&mut engine);
    engine
        .player
        .apply_power_up(PowerUpKind::Shield, clock.now_ms());
    let (x, y) = (engine.player.x, engine.player.y);
    engine.enemy_bullets.push(enemy_bullet_at(x, y));

    let state = engine.update();

    assert_eq!(state.lives, 3);
    assert!(engine.enemy_bullets().is_empty());
    assert!(!engine.particles().is_empty());
    assert!(!events.borrow().contains(&Event::PlayerHit));
}

#[test]
fn unshielded_hit_costs_a_life() {
    let (mut engine, _clock) = engine();
    let events = record_events(&mut engine);
    let (x, y) = (engine.player.x, engine.player.y);
    engine.enemy_bullets.push(enemy_bullet_at(x, y));
    engine.enemy_bullets.push(enemy_bullet_at(x, y));

    let state = engine.update();

    assert_eq!(state.lives, 2);
    assert_eq!(engine.enemy_bullets().len(), 1);
    assert_eq!(
        events
            .borrow()
            .iter()
            .filter(|event| **event == Event::PlayerHit)
            .count(),
        1
    );
}

#[test]
fn ramming_enemy_is_destroyed_and_costs_a_life() {
    let (mut engine, _clock) = engine();
    let (x, y) = (engine.player.x, engine.player.y);
    engine
        .enemies
        .push(Enemy::kamikaze(EnemyId::new(100), x, y, 1, &mut rng()));

    let state = engine.update();

    assert_eq!(state.lives, 2);
    assert_eq!(state.score, 0);
    assert!(engine.enemies().is_empty());
}

#[test]
fn bullets_beyond_the_canvas_are_removed() {
    let (mut engine, _clock) = engine();
    engine.enemy_bullets.push(enemy_bullet_at(400.0, HEIGHT + 20.0));
    engine.enemy_bullets.push(enemy_bullet_at(100.0, 300.0));
    engine.player_bullets.push(player_bullet_at(400.0, -20.0));

    let _ = engine.update();

    assert_eq!(engine.enemy_bullets().len(), 1);
    assert_eq!(engine.enemy_bullets()[0].x, 100.0);
    assert!(engine.player_bullets().is_empty());
}

#[test]
fn large_bullets_leave_the_canvas_at_the_same_margin_as_small_ones() {
    let clock = ManualClock::starting_at(1_000);
    let (width, height) = (400.0, 288.0);
    let mut engine = GameEngine::new(EngineConfig::default().with_seed(7), width, height)
        .expect("valid canvas")
        .with_clock(clock)
        .with_optimizer(GameOptimizer::fixed(QualityTier::High));
    assert_eq!(engine.bullet_scale(), 2.5);

    let boss_shot = |y: f32| {
        Bullet::new(
            Vec2::new(312.0, y),
            Vec2::new(0.0, 4.0),
            BOSS_SHOT_RADIUS * engine.bullet_scale(),
            BOSS_SHOT_COLOR,
            BulletOwner::Enemy,
        )
    };
    let falling_out = boss_shot(height + 20.0);
    let still_visible = boss_shot(height);
    assert!(falling_out.width > 20.0);
    engine.enemy_bullets.push(falling_out);
    engine.enemy_bullets.push(still_visible);

    let _ = engine.update();

    assert_eq!(engine.enemy_bullets().len(), 1);
    assert_eq!(engine.enemy_bullets()[0].y, height + 4.0);
}

#[test]
fn basic_shots_below_the_canvas_are_retired() {
    let (mut engine, _clock) = engine();
    engine.player_bullets.push(Bullet::new(
        Vec2::new(732.0, HEIGHT + 20.0),
        Vec2::new(0.0, -8.0),
        7.0,
        Rgb::from_hex(0x00ff00),
        BulletOwner::Player,
    ));

    let _ = engine.update();

    assert!(engine.player_bullets().is_empty());
}

#[test]
fn lives_stop_at_zero_and_game_over_freezes_the_session() {
    let (mut engine, _clock) = engine();
    let events = record_events(&mut engine);
    engine.lives = 1;
    let (x, y) = (engine.player.x, engine.player.y);
    engine.enemy_bullets.push(enemy_bullet_at(x, y));
    engine
        .enemies
        .push(Enemy::kamikaze(EnemyId::new(100), x, y, 1, &mut rng()));

    let state = engine.update();
    assert_eq!(state.lives, 0);
    assert!(state.game_over);
    assert!(engine.is_game_over());

    let hits_after_game_over = events.borrow().len();
    engine.enemy_bullets.push(enemy_bullet_at(x, y));
    let frozen = engine.update();

    assert_eq!(frozen, state);
    assert_eq!(events.borrow().len(), hits_after_game_over);
}

#[test]
fn level_progression_advances_once_per_threshold() {
    let (mut engine, _clock) = engine();
    let events = record_events(&mut engine);
    engine.enemies_killed = 10;

    engine.check_level_progression();
    engine.check_level_progression();

    assert_eq!(engine.level(), 2);
    assert_eq!(engine.spawning.delay(), 105);
    let level_ups = events
        .borrow()
        .iter()
        .filter(|event| matches!(event, Event::LevelUp { .. }))
        .count();
    assert_eq!(level_ups, 1);
}

#[test]
fn bosses_spawn_only_on_boss_levels_with_a_clear_field() {
    let (mut engine, _clock) = engine();
    let events = record_events(&mut engine);

    engine.level = 4;
    let _ = engine.update();
    assert!(engine.boss().is_none());

    engine.level = 5;
    engine
        .enemies
        .push(Enemy::basic(EnemyId::new(100), 400.0, 50.0, 5, &mut rng()));
    let _ = engine.update();
    assert!(engine.boss().is_none());

    engine.enemies.clear();
    let state = engine.update();
    assert!(state.boss_active);
    assert_eq!(state.boss_type, Some(BossKind::Mothership));
    let _ = engine.update();

    let spawns = events
        .borrow()
        .iter()
        .filter(|event| matches!(event, Event::BossSpawn { .. }))
        .count();
    assert_eq!(spawns, 1);
    assert!(events.borrow().contains(&Event::BossSpawn {
        kind: BossKind::Mothership,
        level: 5
    }));
}

#[test]
fn multi_shot_switches_to_spread_for_its_duration() {
    let (mut engine, clock) = engine();
    engine
        .player
        .apply_power_up(PowerUpKind::MultiShot, clock.now_ms());

    let _ = engine.update();
    assert_eq!(engine.current_weapon(), WeaponKind::Spread);
    assert!(engine.multi_shot_link.is_latched());

    clock.advance(14_000);
    let _ = engine.update();
    assert_eq!(engine.current_weapon(), WeaponKind::Spread);

    clock.advance(1_001);
    let _ = engine.update();
    assert_eq!(engine.current_weapon(), WeaponKind::Basic);
    assert!(!engine.multi_shot_link.is_latched());
}

#[test]
fn rapid_fire_shortens_the_fire_delay() {
    let (mut engine, clock) = engine();
    let _ = engine.update();
    assert_eq!(engine.weapons.fire_rate(), 15);

    engine
        .player
        .apply_power_up(PowerUpKind::RapidFire, clock.now_ms());
    let _ = engine.update();
    assert_eq!(engine.weapons.fire_rate(), 5);
}

#[test]
fn weapon_fires_after_its_delay_and_announces_the_volley() {
    let (mut engine, _clock) = engine();
    let events = record_events(&mut engine);

    for _ in 0..14 {
        let _ = engine.update();
    }
    assert!(engine.player_bullets().is_empty());

    let _ = engine.update();
    assert_eq!(engine.player_bullets().len(), 1);
    assert!(events.borrow().contains(&Event::BulletFired));
    assert!(events.borrow().contains(&Event::PlayShootSound));
}

#[test]
fn extra_life_power_up_adds_a_life() {
    let (mut engine, _clock) = engine();
    let (x, y) = (engine.player.x, engine.player.y);
    engine
        .power_ups
        .push(PowerUp::new(x, y, PowerUpKind::ExtraLife));

    let state = engine.update();

    assert_eq!(state.lives, 4);
    assert!(engine.power_ups().is_empty());
    assert!(state.active_power_ups.is_empty());
}

#[test]
fn timed_power_up_is_applied_to_the_player() {
    let (mut engine, _clock) = engine();
    let events = record_events(&mut engine);
    let (x, y) = (engine.player.x, engine.player.y);
    engine
        .power_ups
        .push(PowerUp::new(x, y, PowerUpKind::SlowMotion));

    let state = engine.update();

    assert_eq!(state.active_power_ups, vec![PowerUpKind::SlowMotion]);
    assert!(events.borrow().contains(&Event::PowerUpCollected));
}

#[test]
fn bullet_scale_tracks_the_short_side() {
    let (mut engine, _clock) = engine();
    assert!((engine.bullet_scale() - 1.2).abs() < 1e-6);

    engine
        .update_canvas_size(1920.0, 1080.0)
        .expect("valid canvas");
    assert_eq!(engine.bullet_scale(), 1.0);

    engine.update_canvas_size(200.0, 300.0).expect("valid canvas");
    assert_eq!(engine.bullet_scale(), 2.5);
}

#[test]
fn resizing_rejects_degenerate_canvases() {
    let (mut engine, _clock) = engine();

    assert!(matches!(
        engine.update_canvas_size(0.0, 600.0),
        Err(EngineError::InvalidCanvas { .. })
    ));
    assert!(engine.update_canvas_size(f32::NAN, 600.0).is_err());
    assert!((engine.bullet_scale() - 1.2).abs() < 1e-6);
}

#[test]
fn resizing_keeps_the_player_on_the_bottom_edge() {
    let (mut engine, _clock) = engine();
    engine.player.x = 780.0;

    engine.update_canvas_size(400.0, 900.0).expect("valid canvas");

    assert_eq!(engine.player.y, 820.0);
    assert_eq!(engine.player.x, 400.0);
}

#[test]
fn touch_position_maps_to_canvas_pixels() {
    let (mut engine, _clock) = engine();
    engine.handle_player_move(0.25);
    assert_eq!(engine.player.target_x(), Some(200.0));
}

#[test]
fn reset_restores_a_fresh_session() {
    let (mut engine, clock) = engine();
    engine
        .player
        .apply_power_up(PowerUpKind::MultiShot, clock.now_ms());
    let _ = engine.update();
    engine.score = 120;
    engine.lives = 0;
    engine.level = 3;
    engine.game_over = true;
    engine.enemy_bullets.push(enemy_bullet_at(10.0, 10.0));
    engine.boss = Some(Boss::new(BossKind::Destroyer, 400.0, 100.0, 5));

    engine.reset();

    let state = engine.update();
    assert_eq!(state.score, 0);
    assert_eq!(state.lives, 3);
    assert_eq!(state.level, 1);
    assert!(!state.game_over);
    assert!(state.active_power_ups.is_empty());
    assert!(engine.boss().is_none());
    assert!(engine.enemy_bullets().is_empty());
    assert_eq!(engine.current_weapon(), WeaponKind::Basic);
    assert!(!engine.multi_shot_link.is_latched());
}

#[test]
fn render_starts_with_the_trail_overlay_and_draws_every_star() {
    let (mut engine, _clock) = engine();
    let mut canvas = RecordingCanvas::new();

    engine.render(&mut canvas);

    let commands = canvas.take_commands();
    assert_eq!(
        commands[0],
        DrawCommand::FillRect {
            rect: Rect::new(0.0, 0.0, WIDTH, HEIGHT),
            color: Color::new(0.0, 0.0, 20.0 / 255.0, 0.2),
        }
    );
    let stars = commands
        .iter()
        .filter(|command| {
            matches!(
                command,
                DrawCommand::FillRect { color, rect } if *color == Color::WHITE && rect.width <= 2.0
            )
        })
        .count();
    assert_eq!(stars, 50);
}

#[test]
fn low_quality_batches_particles_into_small_squares() {
    let (mut engine, _clock) = engine_at(QualityTier::Low);
    let color = Rgb::from_hex(0x123456);
    engine
        .particles
        .push(Particle::new(100.0, 100.0, 0.0, 0.0, color, 30));
    let mut canvas = RecordingCanvas::new();

    engine.render(&mut canvas);

    assert!(canvas.commands().contains(&DrawCommand::FillRect {
        rect: Rect::new(99.0, 99.0, 2.0, 2.0),
        color: Color::from(color),
    }));
}

#[test]
fn seeded_sessions_replay_identically() {
    let run = || {
        let (mut engine, clock) = engine();
        let mut states = Vec::new();
        for _ in 0..600 {
            clock.advance(16);
            states.push(engine.update());
        }
        (states, engine.enemies().len(), engine.enemy_bullets().len())
    };

    assert_eq!(run(), run());
}
