#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Frame-driven orchestrator for Space Shooter sessions.
//!
//! [`GameEngine`] owns every entity collection and all session counters. Each
//! call to [`GameEngine::update`] advances the simulation by exactly one frame
//! and returns a fresh [`GameState`] snapshot; [`GameEngine::render`] paints the
//! current frame onto any [`space_shooter_rendering::Canvas`]. Collaborators
//! observe the session by subscribing to [`Event`]s and steer the ship through
//! the public [`GameEngine::player`] handle.

mod collisions;
mod config;
mod coupling;
mod effects;
mod error;
mod render;
mod starfield;
#[cfg(test)]
mod tests;

pub use config::EngineConfig;
pub use coupling::{EffectLink, LinkTransition};
pub use error::EngineError;

use glam::Vec2;
use rand::{rngs::OsRng, Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use space_shooter_core::{
    Clock, Event, EventDispatcher, GameState, PowerUpKind, QualityTier, Rgb, SubscriptionId,
    SystemClock,
};
use space_shooter_system_collision::CollisionSystem;
use space_shooter_system_optimizer::{DeviceProfile, GameOptimizer, ObjectPool};
use space_shooter_system_spawning::{max_enemies, EnemyFactory, Spawning};
use space_shooter_system_weapons::{HomingTarget, WeaponKind, WeaponSystem};
use space_shooter_world::{
    Boss, Bullet, BulletOwner, Enemy, EnemyAction, EnemyContext, Particle, Player, PowerUp,
};

use starfield::Starfield;

const BASELINE_SHORT_SIDE: f32 = 720.0;
const MIN_BULLET_SCALE: f32 = 1.0;
const MAX_BULLET_SCALE: f32 = 2.5;

const BOSS_SHOT_RADIUS: f32 = 7.0;
const BOSS_SHOT_COLOR: Rgb = Rgb::from_hex(0xff4444);
const BOMB_RADIUS: f32 = 6.0;
const BOMB_COLOR: Rgb = Rgb::from_hex(0xff6600);
const BOMB_SPACING: f32 = 15.0;
const ENEMY_SHOT_RADIUS: f32 = 5.0;
const ENEMY_SHOT_COLOR: Rgb = Rgb::from_hex(0xff0000);

/// Responsive bullet size multiplier for a canvas; small screens get larger bullets.
#[must_use]
pub fn bullet_scale_for(width: f32, height: f32) -> f32 {
    (BASELINE_SHORT_SIDE / width.min(height)).clamp(MIN_BULLET_SCALE, MAX_BULLET_SCALE)
}

fn validate_canvas(width: f32, height: f32) -> Result<(), EngineError> {
    if width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0 {
        Ok(())
    } else {
        Err(EngineError::InvalidCanvas { width, height })
    }
}

fn level_offset(level: u32) -> f32 {
    level.saturating_sub(1) as f32
}

/// Owns and advances one game session.
#[derive(Debug)]
pub struct GameEngine {
    /// The ship; adapters set its movement flags directly.
    pub player: Player,
    config: EngineConfig,
    clock: Box<dyn Clock>,
    rng: ChaCha8Rng,
    optimizer: GameOptimizer,
    events: EventDispatcher,
    collision: CollisionSystem,
    weapons: WeaponSystem,
    spawning: Spawning,
    multi_shot_link: EffectLink,
    enemies: Vec<Enemy>,
    player_bullets: Vec<Bullet>,
    enemy_bullets: Vec<Bullet>,
    particles: Vec<Particle>,
    power_ups: Vec<PowerUp>,
    boss: Option<Boss>,
    starfield: Starfield,
    score: u32,
    lives: u32,
    level: u32,
    enemies_killed: u32,
    game_over: bool,
    width: f32,
    height: f32,
    bullet_scale: f32,
    last_frame_ms: Option<u64>,
}

impl GameEngine {
    /// Creates a session for a canvas of the provided size.
    ///
    /// The quality tier is detected from the host; a random seed is drawn and
    /// logged when the configuration does not pin one.
    pub fn new(config: EngineConfig, width: f32, height: f32) -> Result<Self, EngineError> {
        config.validate()?;
        validate_canvas(width, height)?;

        let seed = config.seed.unwrap_or_else(|| OsRng.next_u64());
        tracing::info!(seed, width, height, "starting game engine");

        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let optimizer = GameOptimizer::new(&DeviceProfile::native());
        let starfield = Starfield::new(rng.next_u64(), width, height, optimizer.quality());
        let spawning = Spawning::new(config.spawn_config());

        Ok(Self {
            player: Player::new(width, height),
            lives: config.initial_lives,
            config,
            clock: Box::new(SystemClock::new()),
            rng,
            optimizer,
            events: EventDispatcher::new(),
            collision: CollisionSystem::new(),
            weapons: WeaponSystem::new(),
            spawning,
            multi_shot_link: EffectLink::new(PowerUpKind::MultiShot),
            enemies: Vec::new(),
            player_bullets: Vec::new(),
            enemy_bullets: Vec::new(),
            particles: Vec::new(),
            power_ups: Vec::new(),
            boss: None,
            starfield,
            score: 0,
            level: 1,
            enemies_killed: 0,
            game_over: false,
            width,
            height,
            bullet_scale: bullet_scale_for(width, height),
            last_frame_ms: None,
        })
    }

    /// Replaces the wall clock used for timed effects and frame tracking.
    #[must_use]
    pub fn with_clock<C>(mut self, clock: C) -> Self
    where
        C: Clock + 'static,
    {
        self.clock = Box::new(clock);
        self.last_frame_ms = None;
        self
    }

    /// Replaces the performance controller, regenerating the starfield for its tier.
    #[must_use]
    pub fn with_optimizer(mut self, optimizer: GameOptimizer) -> Self {
        self.optimizer = optimizer;
        self.starfield.regenerate(self.width, self.height, self.optimizer.quality());
        self
    }

    /// Registers a listener for every event the session dispatches.
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&Event) + 'static,
    {
        self.events.subscribe(listener)
    }

    /// Removes a listener, returning whether it was registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.events.unsubscribe(id)
    }

    /// Steers the ship toward a horizontal position given as a fraction of the canvas width.
    pub fn handle_player_move(&mut self, position: f32) {
        let target = position * self.width;
        tracing::trace!(position, target, "touch target updated");
        self.player.set_target_position(target);
    }

    /// Adapts the session to a resized canvas.
    pub fn update_canvas_size(&mut self, width: f32, height: f32) -> Result<(), EngineError> {
        validate_canvas(width, height)?;
        self.width = width;
        self.height = height;
        self.player.fit_canvas(width, height);
        self.starfield.regenerate(width, height, self.optimizer.quality());
        self.bullet_scale = bullet_scale_for(width, height);
        tracing::debug!(
            width,
            height,
            bullet_scale = self.bullet_scale,
            "canvas resized"
        );
        Ok(())
    }

    /// Current responsive bullet size multiplier.
    #[must_use]
    pub const fn bullet_scale(&self) -> f32 {
        self.bullet_scale
    }

    /// Restarts the session in place, keeping the same player handle.
    pub fn reset(&mut self) {
        self.player.reset(self.width, self.height);
        self.enemies.clear();
        self.player_bullets.clear();
        self.enemy_bullets.clear();
        self.particles.clear();
        self.power_ups.clear();
        self.boss = None;
        self.score = 0;
        self.lives = self.config.initial_lives;
        self.level = 1;
        self.enemies_killed = 0;
        self.game_over = false;
        self.spawning.reset();
        self.weapons.reset();
        self.multi_shot_link.reset();
        tracing::debug!("session reset");
    }

    /// Advances the session by one frame.
    ///
    /// Once the game is over this only reports the final snapshot.
    pub fn update(&mut self) -> GameState {
        let now_ms = self.clock.now_ms();
        self.track_frame_time(now_ms);

        if self.game_over {
            return self.snapshot();
        }

        self.spawn_boss_if_due();
        self.player.update(self.width, now_ms);
        self.update_weapons(now_ms);
        if self.boss.is_none() {
            self.spawn_enemies();
        }
        self.update_boss();
        self.update_enemies(now_ms);
        self.update_projectiles();
        self.update_particles();
        self.update_power_ups();
        self.handle_collisions(now_ms);

        self.snapshot()
    }

    /// Accumulated score.
    #[must_use]
    pub const fn score(&self) -> u32 {
        self.score
    }

    /// Remaining lives.
    #[must_use]
    pub const fn lives(&self) -> u32 {
        self.lives
    }

    /// Current level.
    #[must_use]
    pub const fn level(&self) -> u32 {
        self.level
    }

    /// Enemies destroyed this session.
    #[must_use]
    pub const fn enemies_killed(&self) -> u32 {
        self.enemies_killed
    }

    /// Whether the session has ended.
    #[must_use]
    pub const fn is_game_over(&self) -> bool {
        self.game_over
    }

    /// Enemies on the field.
    #[must_use]
    pub fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    /// The active boss, if any.
    #[must_use]
    pub const fn boss(&self) -> Option<&Boss> {
        self.boss.as_ref()
    }

    /// Bullets fired by the player.
    #[must_use]
    pub fn player_bullets(&self) -> &[Bullet] {
        &self.player_bullets
    }

    /// Bullets fired by enemies and the boss.
    #[must_use]
    pub fn enemy_bullets(&self) -> &[Bullet] {
        &self.enemy_bullets
    }

    /// Falling power-ups.
    #[must_use]
    pub fn power_ups(&self) -> &[PowerUp] {
        &self.power_ups
    }

    /// Live particles.
    #[must_use]
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Quality tier currently in effect.
    #[must_use]
    pub const fn quality(&self) -> QualityTier {
        self.optimizer.quality()
    }

    /// Performance controller driving quality decisions.
    #[must_use]
    pub const fn optimizer(&self) -> &GameOptimizer {
        &self.optimizer
    }

    /// Weapon the player currently wields.
    #[must_use]
    pub const fn current_weapon(&self) -> WeaponKind {
        self.weapons.current_weapon()
    }

    /// Configuration the session was created with.
    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn track_frame_time(&mut self, now_ms: u64) {
        if let Some(last_ms) = self.last_frame_ms {
            let _ = self
                .optimizer
                .report_frame_time(now_ms.saturating_sub(last_ms) as f32);
        }
        self.last_frame_ms = Some(now_ms);
    }

    fn spawn_boss_if_due(&mut self) {
        if self.boss.is_some()
            || !self.enemies.is_empty()
            || !self.spawning.config().is_boss_level(self.level)
        {
            return;
        }

        let boss = EnemyFactory::create_boss(self.level, self.width);
        let kind = boss.kind();
        tracing::info!(boss = kind.as_str(), level = self.level, "boss spawned");
        self.boss = Some(boss);
        self.events.dispatch(Event::BossSpawn {
            kind,
            level: self.level,
        });
    }

    fn update_weapons(&mut self, now_ms: u64) {
        self.weapons.update_fire_timer();
        self.weapons.update_effects(now_ms);
        self.weapons.update_targets(
            self.enemies
                .iter()
                .map(|enemy| HomingTarget {
                    id: enemy.id(),
                    position: Vec2::new(enemy.x, enemy.y),
                })
                .collect(),
        );

        let multi_shot_remaining = self
            .player
            .power_up(PowerUpKind::MultiShot)
            .map(|effect| effect.remaining_ms(now_ms));
        match self.multi_shot_link.observe(multi_shot_remaining.is_some()) {
            Some(LinkTransition::Activated) => self.weapons.set_weapon(
                WeaponKind::Spread,
                multi_shot_remaining.unwrap_or_default(),
                None,
                now_ms,
            ),
            Some(LinkTransition::Deactivated) => {
                self.weapons.clear_weapon(Some(WeaponKind::Spread));
            }
            None => {}
        }

        let fire_delay = if self.player.has_power_up(PowerUpKind::RapidFire) {
            self.config.rapid_fire_delay
        } else {
            self.config.base_fire_delay
        };
        self.weapons.set_fire_rate(fire_delay);

        let volley = self.weapons.fire(
            self.player.x,
            self.player.y - self.player.height / 2.0,
            self.bullet_scale,
            &mut self.rng,
        );
        if !volley.is_empty() {
            self.player_bullets.extend(volley);
            self.events.dispatch(Event::PlayShootSound);
            self.events.dispatch(Event::BulletFired);
        }
    }

    fn spawn_enemies(&mut self) {
        let slowed = self.player.has_power_up(PowerUpKind::SlowMotion);
        if let Some(enemy) = self.spawning.tick(
            slowed,
            self.enemies.len(),
            max_enemies(self.optimizer.quality()),
            self.width,
            self.level,
            &mut self.rng,
        ) {
            self.enemies.push(enemy);
        }
    }

    fn update_boss(&mut self) {
        let Some(boss) = self.boss.as_mut() else {
            return;
        };
        let radius = BOSS_SHOT_RADIUS * self.bullet_scale;
        let shots = boss.update(self.width);
        let rng = &mut self.rng;
        self.enemy_bullets.extend(shots.into_iter().map(|shot| {
            Bullet::new(
                Vec2::new(shot.x, shot.y),
                Vec2::new(shot.vx, shot.vy),
                radius,
                BOSS_SHOT_COLOR,
                BulletOwner::Enemy,
            )
            .with_random_spin(rng)
        }));
    }

    fn update_enemies(&mut self, now_ms: u64) {
        let context = EnemyContext {
            canvas_width: self.width,
            canvas_height: self.height,
            player_x: Some(self.player.x),
            now_ms,
        };
        let fire_chance = 0.003 + f64::from(self.level.saturating_sub(1)) * 0.002;
        let shot_speed = 4.0 + level_offset(self.level) * 0.5;

        for index in (0..self.enemies.len()).rev() {
            if let EnemyAction::DropBombs { x, y } = self.enemies[index].update(&context) {
                self.drop_bombs(x, y);
            }

            if self.enemies[index].is_off_screen(self.height) {
                let enemy = self.enemies.remove(index);
                self.optimizer.enemy_pool().release(enemy);
                continue;
            }

            let enemy = &self.enemies[index];
            if enemy.kind().fires_standard_shots() && self.rng.gen::<f64>() < fire_chance {
                self.enemy_bullets.push(Bullet::new(
                    Vec2::new(enemy.x, enemy.y + enemy.height / 2.0),
                    Vec2::new(0.0, shot_speed),
                    ENEMY_SHOT_RADIUS * self.bullet_scale,
                    ENEMY_SHOT_COLOR,
                    BulletOwner::Enemy,
                )
                .with_random_spin(&mut self.rng));
                self.events.dispatch(Event::PlayShootSound);
            }
        }
    }

    fn drop_bombs(&mut self, x: f32, y: f32) {
        let fall_speed = 4.0 + level_offset(self.level) * 0.3;
        let radius = BOMB_RADIUS * self.bullet_scale;
        for lane in [-1.0_f32, 0.0, 1.0] {
            self.enemy_bullets.push(Bullet::new(
                Vec2::new(x + lane * BOMB_SPACING, y),
                Vec2::new(lane * 0.5, fall_speed),
                radius,
                BOMB_COLOR,
                BulletOwner::Enemy,
            )
            .with_random_spin(&mut self.rng));
        }
        self.events.dispatch(Event::PlayShootSound);
    }

    fn update_projectiles(&mut self) {
        for bullet in &mut self.player_bullets {
            let Some(target) = bullet.homing_target() else {
                continue;
            };
            if let Some(enemy) = self.enemies.iter().find(|enemy| enemy.id() == target) {
                bullet.track_target(Vec2::new(enemy.x, enemy.y));
            }
        }

        let (width, height) = (self.width, self.height);
        advance_bullets(
            &mut self.player_bullets,
            width,
            height,
            self.optimizer.bullet_pool(),
            &mut self.rng,
        );
        advance_bullets(
            &mut self.enemy_bullets,
            width,
            height,
            self.optimizer.bullet_pool(),
            &mut self.rng,
        );
    }

    fn update_particles(&mut self) {
        for mut particle in std::mem::take(&mut self.particles) {
            particle.update();
            if particle.is_dead() {
                self.optimizer.particle_pool().release(particle);
            } else {
                self.particles.push(particle);
            }
        }
    }

    fn update_power_ups(&mut self) {
        let height = self.height;
        for power_up in &mut self.power_ups {
            power_up.update();
        }
        self.power_ups.retain(|power_up| !power_up.is_off_screen(height));
    }

    fn snapshot(&self) -> GameState {
        let per_level = self.config.enemies_per_level;
        let boss = if self.game_over {
            None
        } else {
            self.boss.as_ref()
        };

        GameState {
            score: self.score,
            lives: self.lives,
            level: self.level,
            enemies_killed: self.enemies_killed,
            level_progress: (self.enemies_killed % per_level) as f32 / per_level as f32,
            game_over: self.game_over,
            active_power_ups: self.player.active_power_ups(),
            boss_active: boss.is_some(),
            boss_health: boss.map(|boss| boss.health().max(0) as u32),
            boss_max_health: boss.map(|boss| boss.max_health().max(0) as u32),
            boss_type: boss.map(Boss::kind),
        }
    }
}

/// Moves every bullet one frame, bursting ready splitting shells and retiring
/// bullets that left the canvas.
fn advance_bullets(
    bullets: &mut Vec<Bullet>,
    width: f32,
    height: f32,
    pool: &mut ObjectPool<Bullet>,
    rng: &mut ChaCha8Rng,
) {
    let mut fragments = Vec::new();
    for mut bullet in std::mem::take(bullets) {
        bullet.update(width, height);
        if bullet.should_split() {
            fragments.extend(bullet.split(rng));
            pool.release(bullet);
        } else if bullet.is_off_screen(height) {
            pool.release(bullet);
        } else {
            bullets.push(bullet);
        }
    }
    bullets.extend(fragments);
}
