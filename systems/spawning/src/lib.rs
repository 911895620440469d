#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Spawning system responsible for pacing enemy waves, picking variants, and rolling drops.

use rand::Rng;
use space_shooter_core::{BossKind, EnemyId, EnemyKind, PowerUpKind, QualityTier};
use space_shooter_world::{Boss, Enemy, PowerUp};

const SPAWN_Y: f32 = -20.0;
const SPAWN_MARGIN: f32 = 30.0;
const BOSS_SPAWN_Y: f32 = 100.0;
const BASIC_DROP_CHANCE: f64 = 0.15;
const SPECIAL_DROP_CHANCE: f64 = 0.25;

/// Configuration parameters required to construct the spawning system.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    base_delay: u32,
    min_delay: u32,
    delay_step: u32,
    boss_level_interval: u32,
}

impl Config {
    /// Creates a configuration from the spawn delay curve, in frames, and the boss cadence.
    #[must_use]
    pub const fn new(base_delay: u32, min_delay: u32, delay_step: u32, boss_level_interval: u32) -> Self {
        Self {
            base_delay,
            min_delay,
            delay_step,
            boss_level_interval,
        }
    }

    /// Spawn delay, in frames, for the provided level.
    #[must_use]
    pub fn delay_for_level(&self, level: u32) -> u32 {
        let reduction = level.saturating_sub(1).saturating_mul(self.delay_step);
        self.base_delay.saturating_sub(reduction).max(self.min_delay)
    }

    /// Returns whether the provided level hosts a boss encounter.
    #[must_use]
    pub const fn is_boss_level(&self, level: u32) -> bool {
        self.boss_level_interval != 0 && level % self.boss_level_interval == 0
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(120, 30, 15, 5)
    }
}

/// Maximum number of simultaneous enemies allowed at the provided quality tier.
#[must_use]
pub const fn max_enemies(tier: QualityTier) -> usize {
    match tier {
        QualityTier::Low => 8,
        QualityTier::Medium => 12,
        QualityTier::High => 16,
    }
}

/// Frame-counted wave pacer that hands out enemy identities.
#[derive(Debug)]
pub struct Spawning {
    config: Config,
    timer: u32,
    delay: u32,
    next_id: u32,
}

impl Spawning {
    /// Creates a new spawning system paced for the first level.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            timer: 0,
            delay: config.delay_for_level(1),
            next_id: 0,
        }
    }

    /// Configuration the system was created with.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Current spawn delay in frames, before any slow-motion doubling.
    #[must_use]
    pub const fn delay(&self) -> u32 {
        self.delay
    }

    /// Recomputes the spawn delay after a level change.
    pub fn set_level(&mut self, level: u32) {
        self.delay = self.config.delay_for_level(level);
    }

    /// Restores the first-level pace and zeroes the timer.
    pub fn reset(&mut self) {
        self.timer = 0;
        self.delay = self.config.delay_for_level(1);
    }

    /// Advances the timer by one frame and spawns an enemy when it is due.
    ///
    /// The delay doubles while `slowed` is set. No enemy spawns while
    /// `enemy_count` is at `max_enemies`; the timer keeps running so the next
    /// free slot is filled immediately.
    pub fn tick<R: Rng + ?Sized>(
        &mut self,
        slowed: bool,
        enemy_count: usize,
        max_enemies: usize,
        canvas_width: f32,
        level: u32,
        rng: &mut R,
    ) -> Option<Enemy> {
        let delay = if slowed { self.delay.saturating_mul(2) } else { self.delay };
        self.timer = self.timer.saturating_add(1);
        if self.timer < delay || enemy_count >= max_enemies {
            return None;
        }

        self.timer = 0;
        let x = rng.gen::<f32>() * (canvas_width - 2.0 * SPAWN_MARGIN) + SPAWN_MARGIN;
        let kind = EnemyFactory::random_variant(level, rng);
        let id = self.allocate_id();
        Some(EnemyFactory::create_enemy(kind, id, x, SPAWN_Y, level, rng))
    }

    /// Reserves a fresh enemy identifier.
    pub fn allocate_id(&mut self) -> EnemyId {
        let id = EnemyId::new(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        id
    }
}

/// Constructs enemies and bosses and decides which variant appears next.
#[derive(Clone, Copy, Debug, Default)]
pub struct EnemyFactory;

impl EnemyFactory {
    /// Creates an enemy of the provided variant scaled to the level.
    pub fn create_enemy<R: Rng + ?Sized>(
        kind: EnemyKind,
        id: EnemyId,
        x: f32,
        y: f32,
        level: u32,
        rng: &mut R,
    ) -> Enemy {
        match kind {
            EnemyKind::Basic => Enemy::basic(id, x, y, level, rng),
            EnemyKind::Scout => Enemy::scout(id, x, y, level, rng),
            EnemyKind::Heavy => Enemy::heavy(id, x, y, level, rng),
            EnemyKind::Bomber => Enemy::bomber(id, x, y, level, rng),
            EnemyKind::Kamikaze => Enemy::kamikaze(id, x, y, level, rng),
        }
    }

    /// Unnormalised roulette weights for the provided level in sampling order.
    ///
    /// Locked variants carry a weight of zero.
    #[must_use]
    pub fn variant_weights(level: u32) -> [(EnemyKind, f64); 5] {
        let unlocked = |at: u32, weight: f64| if level >= at { weight } else { 0.0 };
        [
            (EnemyKind::Basic, (1.0 - f64::from(level) * 0.1).max(0.5)),
            (EnemyKind::Scout, unlocked(2, 0.3)),
            (EnemyKind::Kamikaze, unlocked(3, 0.2)),
            (EnemyKind::Bomber, unlocked(4, 0.15)),
            (EnemyKind::Heavy, unlocked(5, 0.1)),
        ]
    }

    /// Samples a variant by cumulative-weight roulette over a uniform draw in `0.0..1.0`.
    ///
    /// The weights are not normalised; draws beyond their sum yield [`EnemyKind::Basic`].
    pub fn random_variant<R: Rng + ?Sized>(level: u32, rng: &mut R) -> EnemyKind {
        Self::variant_for_roll(level, rng.gen::<f64>())
    }

    /// Resolves a uniform draw in `0.0..1.0` to a variant.
    #[must_use]
    pub fn variant_for_roll(level: u32, roll: f64) -> EnemyKind {
        let mut cumulative = 0.0;
        for (kind, weight) in Self::variant_weights(level) {
            cumulative += weight;
            if roll <= cumulative {
                return kind;
            }
        }
        EnemyKind::Basic
    }

    /// Creates the boss guarding the provided level, centred horizontally.
    #[must_use]
    pub fn create_boss(level: u32, canvas_width: f32) -> Boss {
        Boss::new(BossKind::for_level(level), canvas_width / 2.0, BOSS_SPAWN_Y, level)
    }
}

/// Probability that destroying an enemy of the provided variant drops a power-up.
#[must_use]
pub const fn power_up_drop_chance(kind: EnemyKind) -> f64 {
    match kind {
        EnemyKind::Basic => BASIC_DROP_CHANCE,
        EnemyKind::Scout | EnemyKind::Heavy | EnemyKind::Bomber | EnemyKind::Kamikaze => {
            SPECIAL_DROP_CHANCE
        }
    }
}

/// Rolls the power-up dropped by a destroyed enemy, if any.
pub fn roll_power_up_drop<R: Rng + ?Sized>(kind: EnemyKind, rng: &mut R) -> Option<PowerUpKind> {
    if rng.gen::<f64>() < power_up_drop_chance(kind) {
        Some(PowerUp::random_kind(rng))
    } else {
        None
    }
}
