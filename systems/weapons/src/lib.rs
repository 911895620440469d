#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Weapon state machine that decides when the player fires and what leaves the barrel.
//!
//! Exactly one [`WeaponKind`] is current at a time. Special weapons are installed
//! as timed [`WeaponEffect`]s that expire by wall-clock duration or by running out
//! of ammunition, after which the system falls back to [`WeaponKind::Basic`].
//! Fire cadence is frame-counted: callers advance the fire timer once per frame
//! and [`WeaponSystem::fire`] releases a volley once the current weapon's delay
//! has elapsed.

use std::collections::BTreeMap;

use glam::Vec2;
use rand::Rng;
use space_shooter_core::{EnemyId, Rgb};
use space_shooter_world::{Bullet, BulletOwner, BulletSize, EffectType};

/// Fire delay, in frames, used when no rapid-fire buff is active.
pub const DEFAULT_FIRE_RATE: u32 = 15;

const MUZZLE_OFFSET: f32 = 20.0;
const SIDE_MUZZLE_OFFSET: f32 = 10.0;
const SPREAD_ANGLES: [f32; 5] = [-0.6, -0.3, 0.0, 0.3, 0.6];
const HOMING_LAUNCH_SPEED: f32 = 6.0;

/// Every weapon the player can wield.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum WeaponKind {
    /// Standard blaster.
    Basic,
    /// Fast piercing beam.
    Laser,
    /// Five-way fan.
    Spread,
    /// Missiles that steer toward an enemy.
    Homing,
    /// Large pulsing orb.
    Plasma,
    /// Slow area-damage rounds.
    Explosive,
    /// Armour-penetrating rounds.
    Piercing,
    /// Rounds that ricochet off the canvas edges.
    Bouncing,
    /// Shells that burst into three fragments.
    Splitting,
    /// Pulsing energy projectiles.
    Energy,
    /// Slow high-damage shots.
    Charged,
    /// Screen-clearing burst.
    Ultimate,
}

impl WeaponKind {
    /// All weapons in canonical order.
    pub const ALL: [WeaponKind; 12] = [
        WeaponKind::Basic,
        WeaponKind::Laser,
        WeaponKind::Spread,
        WeaponKind::Homing,
        WeaponKind::Plasma,
        WeaponKind::Explosive,
        WeaponKind::Piercing,
        WeaponKind::Bouncing,
        WeaponKind::Splitting,
        WeaponKind::Energy,
        WeaponKind::Charged,
        WeaponKind::Ultimate,
    ];

    /// Factor applied to the base fire delay while this weapon is current.
    #[must_use]
    pub const fn fire_delay_multiplier(self) -> f32 {
        match self {
            WeaponKind::Laser => 0.3,
            WeaponKind::Spread => 1.5,
            WeaponKind::Homing => 2.0,
            WeaponKind::Plasma => 0.8,
            WeaponKind::Explosive => 2.5,
            WeaponKind::Piercing => 0.7,
            WeaponKind::Bouncing => 1.2,
            WeaponKind::Splitting => 1.8,
            WeaponKind::Charged => 3.0,
            WeaponKind::Ultimate => 6.0,
            WeaponKind::Basic | WeaponKind::Energy => 1.0,
        }
    }

    /// Short player-facing description.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            WeaponKind::Basic => "Standard blaster",
            WeaponKind::Laser => "High-speed piercing laser beam",
            WeaponKind::Spread => "Five-way spread shot",
            WeaponKind::Homing => "Auto-targeting missiles",
            WeaponKind::Plasma => "Devastating plasma cannon",
            WeaponKind::Explosive => "Area-damage explosive rounds",
            WeaponKind::Piercing => "Armor-penetrating bullets",
            WeaponKind::Bouncing => "Ricocheting projectiles",
            WeaponKind::Splitting => "Bullets that split mid-flight",
            WeaponKind::Energy => "Pulsing energy projectiles",
            WeaponKind::Charged => "High-damage charged shots",
            WeaponKind::Ultimate => "Screen-clearing mega weapon",
        }
    }

    /// Stable lowercase name of the weapon.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            WeaponKind::Basic => "basic",
            WeaponKind::Laser => "laser",
            WeaponKind::Spread => "spread",
            WeaponKind::Homing => "homing",
            WeaponKind::Plasma => "plasma",
            WeaponKind::Explosive => "explosive",
            WeaponKind::Piercing => "piercing",
            WeaponKind::Bouncing => "bouncing",
            WeaponKind::Splitting => "splitting",
            WeaponKind::Energy => "energy",
            WeaponKind::Charged => "charged",
            WeaponKind::Ultimate => "ultimate",
        }
    }
}

/// Installed special weapon and the conditions under which it expires.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WeaponEffect {
    /// Weapon granted by the effect.
    pub kind: WeaponKind,
    /// Lifetime in milliseconds.
    pub duration_ms: u64,
    /// Cleared once the effect expires or is revoked.
    pub active: bool,
    /// Wall-clock timestamp at installation.
    pub started_at_ms: u64,
    /// Remaining volleys, when the weapon is ammunition-limited.
    pub ammo: Option<i32>,
}

impl WeaponEffect {
    fn is_spent(&self, now_ms: u64) -> bool {
        now_ms.saturating_sub(self.started_at_ms) > self.duration_ms
            || self.ammo.is_some_and(|ammo| ammo <= 0)
    }
}

/// Enemy a homing missile may lock onto.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HomingTarget {
    /// Enemy identity, used to keep tracking it after launch.
    pub id: EnemyId,
    /// Current position of the enemy.
    pub position: Vec2,
}

/// Current-weapon state machine and bullet factory for the player.
#[derive(Debug)]
pub struct WeaponSystem {
    current: WeaponKind,
    effects: BTreeMap<WeaponKind, WeaponEffect>,
    fire_timer: u32,
    targets: Vec<HomingTarget>,
    fire_rate: u32,
}

impl Default for WeaponSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl WeaponSystem {
    /// Creates a system wielding the basic blaster with the default fire rate.
    #[must_use]
    pub fn new() -> Self {
        Self {
            current: WeaponKind::Basic,
            effects: BTreeMap::new(),
            fire_timer: 0,
            targets: Vec::new(),
            fire_rate: DEFAULT_FIRE_RATE,
        }
    }

    /// Installs or refreshes a weapon effect and makes it current.
    pub fn set_weapon(&mut self, kind: WeaponKind, duration_ms: u64, ammo: Option<i32>, now_ms: u64) {
        let _ = self.effects.insert(
            kind,
            WeaponEffect {
                kind,
                duration_ms,
                active: true,
                started_at_ms: now_ms,
                ammo,
            },
        );
        self.current = kind;
        tracing::debug!(weapon = kind.as_str(), duration_ms, ?ammo, "weapon installed");
    }

    /// Weapon that is current without re-evaluating expiry.
    #[must_use]
    pub const fn current_weapon(&self) -> WeaponKind {
        self.current
    }

    /// Expires stale effects at the provided time and returns the current weapon.
    pub fn current_weapon_at(&mut self, now_ms: u64) -> WeaponKind {
        self.update_effects(now_ms);
        self.current
    }

    /// Deactivates effects whose duration elapsed or whose ammunition ran out.
    pub fn update_effects(&mut self, now_ms: u64) {
        for effect in self.effects.values_mut() {
            if effect.active && effect.is_spent(now_ms) {
                effect.active = false;
                if self.current == effect.kind {
                    self.current = WeaponKind::Basic;
                    tracing::debug!(weapon = effect.kind.as_str(), "weapon expired");
                }
            }
        }
    }

    /// Replaces the set of enemies homing missiles may lock onto.
    pub fn update_targets(&mut self, targets: Vec<HomingTarget>) {
        self.targets = targets;
    }

    /// Sets the base fire delay, in frames, used by [`WeaponSystem::fire`].
    pub fn set_fire_rate(&mut self, rate: u32) {
        self.fire_rate = rate;
    }

    /// Base fire delay in frames.
    #[must_use]
    pub const fn fire_rate(&self) -> u32 {
        self.fire_rate
    }

    /// Revokes the provided weapon, or the current one when `None`.
    pub fn clear_weapon(&mut self, kind: Option<WeaponKind>) {
        match kind {
            Some(kind) => {
                if let Some(effect) = self.effects.get_mut(&kind) {
                    effect.active = false;
                }
                if self.current == kind {
                    self.current = WeaponKind::Basic;
                }
            }
            None => self.current = WeaponKind::Basic,
        }
    }

    /// Drops every effect and returns to the freshly constructed state.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Advances the frame counter gating the next volley.
    pub fn update_fire_timer(&mut self) {
        self.fire_timer = self.fire_timer.saturating_add(1);
    }

    /// Returns whether the current weapon's delay has elapsed, restarting the counter when it has.
    pub fn can_fire(&mut self, base_delay: u32) -> bool {
        let delay = (base_delay as f32 * self.current.fire_delay_multiplier()).floor() as u32;
        if self.fire_timer >= delay {
            self.fire_timer = 0;
            true
        } else {
            false
        }
    }

    /// Fires the current weapon from the ship at `(x, y)` if it is ready.
    ///
    /// Limited ammunition is decremented once per volley regardless of how many
    /// bullets the volley contains.
    pub fn fire<R: Rng + ?Sized>(&mut self, x: f32, y: f32, scale: f32, rng: &mut R) -> Vec<Bullet> {
        if !self.can_fire(self.fire_rate) {
            return Vec::new();
        }

        if let Some(ammo) = self
            .effects
            .get_mut(&self.current)
            .and_then(|effect| effect.ammo.as_mut())
        {
            *ammo -= 1;
        }

        let muzzle = Vec2::new(x, y - MUZZLE_OFFSET);
        let shot = |vx: f32, vy: f32, radius: f32, color: u32| {
            Bullet::new(
                muzzle,
                Vec2::new(vx, vy),
                radius * scale,
                Rgb::from_hex(color),
                BulletOwner::Player,
            )
        };

        let volley = match self.current {
            WeaponKind::Basic => vec![shot(0.0, -8.0, 7.0, 0x00ff00)],
            WeaponKind::Laser => {
                vec![shot(0.0, -12.0, 4.0, 0xff00ff).with_style(BulletSize::Small, EffectType::Piercing)]
            }
            WeaponKind::Spread => SPREAD_ANGLES
                .iter()
                .map(|angle| {
                    Bullet::new(
                        Vec2::new(x + angle.sin() * 10.0, muzzle.y),
                        Vec2::new(angle.sin() * 4.0, -8.0 * angle.cos()),
                        6.0 * scale,
                        Rgb::from_hex(0xffaa00),
                        BulletOwner::Player,
                    )
                    .with_style(BulletSize::Small, EffectType::Basic)
                })
                .collect(),
            WeaponKind::Homing => self.homing_volley(x, y, scale, rng),
            WeaponKind::Plasma => vec![shot(0.0, -5.0, 14.0, 0x00ff88).plasma()],
            WeaponKind::Explosive => {
                vec![shot(0.0, -7.0, 10.0, 0xff4400).with_style(BulletSize::Large, EffectType::Explosive)]
            }
            WeaponKind::Piercing => {
                vec![shot(0.0, -10.0, 6.0, 0xffffff).with_style(BulletSize::Small, EffectType::Piercing)]
            }
            WeaponKind::Bouncing => {
                let vx = rng.gen::<f32>() * 4.0 - 2.0;
                vec![shot(vx, -6.0, 8.0, 0x00aaff).with_style(BulletSize::Medium, EffectType::Bouncing)]
            }
            WeaponKind::Splitting => vec![shot(0.0, -8.0, 9.0, 0xaa00ff).splitting()],
            WeaponKind::Energy => {
                vec![shot(0.0, -9.0, 8.0, 0x00ffaa).with_style(BulletSize::Medium, EffectType::Energy)]
            }
            WeaponKind::Charged => {
                vec![shot(0.0, -6.0, 12.0, 0xffff00).with_style(BulletSize::Large, EffectType::Charged)]
            }
            WeaponKind::Ultimate => {
                let mut volley = vec![shot(0.0, -4.0, 20.0, 0xff00ff)
                    .with_style(BulletSize::Massive, EffectType::Ultimate)];
                volley.extend([-2.0_f32, -1.0, 1.0, 2.0].into_iter().map(|lane| {
                    Bullet::new(
                        Vec2::new(x + lane * 30.0, y - SIDE_MUZZLE_OFFSET),
                        Vec2::new(lane * 2.0, -6.0),
                        8.0 * scale,
                        Rgb::from_hex(0xff00ff),
                        BulletOwner::Player,
                    )
                    .with_style(BulletSize::Medium, EffectType::Energy)
                }));
                volley
            }
        };

        volley
            .into_iter()
            .map(|bullet| bullet.with_random_spin(rng))
            .collect()
    }

    fn homing_volley<R: Rng + ?Sized>(&self, x: f32, y: f32, scale: f32, rng: &mut R) -> Vec<Bullet> {
        let muzzle = Vec2::new(x, y - MUZZLE_OFFSET);
        let color = Rgb::from_hex(0x00ffff);

        if self.targets.is_empty() {
            return vec![Bullet::new(
                muzzle,
                Vec2::new(0.0, -HOMING_LAUNCH_SPEED),
                8.0 * scale,
                color,
                BulletOwner::Player,
            )];
        }

        let target = self.targets[rng.gen_range(0..self.targets.len())];
        let delta = target.position - Vec2::new(x, y);
        let distance = delta.length();
        if distance <= 0.0 {
            return Vec::new();
        }

        vec![Bullet::new(
            muzzle,
            delta / distance * HOMING_LAUNCH_SPEED,
            8.0 * scale,
            color,
            BulletOwner::Player,
        )
        .homing(target.id, target.position)]
    }

    /// Remaining volleys of an ammunition-limited weapon.
    #[must_use]
    pub fn remaining_ammo(&self, kind: WeaponKind) -> Option<i32> {
        self.effects.get(&kind).and_then(|effect| effect.ammo)
    }

    /// Milliseconds left on an active weapon effect; zero when inactive.
    #[must_use]
    pub fn remaining_time(&self, kind: WeaponKind, now_ms: u64) -> u64 {
        match self.effects.get(&kind) {
            Some(effect) if effect.active => {
                let elapsed = now_ms.saturating_sub(effect.started_at_ms);
                effect.duration_ms.saturating_sub(elapsed)
            }
            _ => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn fire_delay_multipliers_are_floored() {
        let mut system = WeaponSystem::new();
        system.set_weapon(WeaponKind::Laser, 10_000, None, 0);
        for _ in 0..3 {
            system.update_fire_timer();
        }
        assert!(!system.can_fire(15));
        system.update_fire_timer();
        assert!(system.can_fire(15));
        assert!(!system.can_fire(15), "counter restarts after firing");
    }

    #[test]
    fn clearing_current_weapon_reverts_to_basic() {
        let mut system = WeaponSystem::new();
        system.set_weapon(WeaponKind::Spread, 10_000, None, 0);
        system.clear_weapon(Some(WeaponKind::Laser));
        assert_eq!(system.current_weapon(), WeaponKind::Spread);

        system.clear_weapon(Some(WeaponKind::Spread));
        assert_eq!(system.current_weapon(), WeaponKind::Basic);
        assert_eq!(system.remaining_time(WeaponKind::Spread, 0), 0);
    }

    #[test]
    fn homing_without_targets_fires_straight() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut system = WeaponSystem::new();
        system.set_weapon(WeaponKind::Homing, 10_000, None, 0);
        for _ in 0..30 {
            system.update_fire_timer();
        }
        let volley = system.fire(100.0, 500.0, 1.0, &mut rng);
        assert_eq!(volley.len(), 1);
        assert_eq!(volley[0].homing_target(), None);
        assert_eq!((volley[0].vx, volley[0].vy), (0.0, -6.0));
    }
}
