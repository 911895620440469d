use std::collections::VecDeque;

use glam::Vec2;
use rand::Rng;
use space_shooter_core::{Aabb, Bounded, EnemyId, Rgb};

const BASE_DAMAGE: f32 = 10.0;
const BASE_ENERGY_COST: f32 = 1.0;
const TRAIL_ALPHA_DECAY: f32 = 0.85;
const TRAIL_SIZE_DECAY: f32 = 0.95;
const TRAIL_MIN_ALPHA: f32 = 0.05;
const PULSE_STEP: f32 = 0.15;
const BOUNCE_DAMPING: f32 = 0.9;
const HOMING_SPEED: f32 = 6.0;
const HOMING_TURN_RATE: f32 = 0.1;
const SPLIT_DISTANCE: f32 = 100.0;
const SPLIT_ANGLES: [f32; 3] = [-0.4, 0.0, 0.4];
const OFF_SCREEN_MARGIN: f32 = 10.0;
const MAX_SPIN: f32 = 0.1;

/// Side that fired a bullet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BulletOwner {
    /// Fired by the player's weapon system.
    Player,
    /// Fired by an enemy or boss.
    Enemy,
}

/// Size class scaling a bullet's footprint, damage, and energy cost.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BulletSize {
    /// Half the base radius.
    Tiny,
    /// Three quarters of the base radius.
    Small,
    /// The base radius.
    Medium,
    /// One and a half times the base radius.
    Large,
    /// Two and a half times the base radius.
    Massive,
}

impl BulletSize {
    /// Multiplier applied to the base radius and to the damage and cost tables.
    #[must_use]
    pub const fn multiplier(self) -> f32 {
        match self {
            BulletSize::Tiny => 0.5,
            BulletSize::Small => 0.75,
            BulletSize::Medium => 1.0,
            BulletSize::Large => 1.5,
            BulletSize::Massive => 2.5,
        }
    }
}

/// Behavioural category of a bullet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EffectType {
    /// Plain projectile.
    Basic,
    /// Detonates on impact.
    Explosive,
    /// Passes through a limited number of targets.
    Piercing,
    /// Reflects off the canvas edges a limited number of times.
    Bouncing,
    /// Splits into three smaller bullets mid-flight.
    Splitting,
    /// Pulsing energy orb.
    Energy,
    /// Slow high-damage shot.
    Charged,
    /// Screen-clearing mega shot.
    Ultimate,
}

impl EffectType {
    const fn damage_factor(self) -> f32 {
        match self {
            EffectType::Explosive => 2.5,
            EffectType::Piercing => 1.5,
            EffectType::Charged => 3.0,
            EffectType::Ultimate => 5.0,
            EffectType::Energy => 2.0,
            EffectType::Basic | EffectType::Bouncing | EffectType::Splitting => 1.0,
        }
    }

    const fn energy_factor(self) -> f32 {
        match self {
            EffectType::Explosive => 3.0,
            EffectType::Ultimate => 10.0,
            EffectType::Energy => 5.0,
            EffectType::Charged => 7.0,
            EffectType::Basic
            | EffectType::Piercing
            | EffectType::Bouncing
            | EffectType::Splitting => 1.0,
        }
    }

    const fn trail_length(self) -> usize {
        match self {
            EffectType::Energy => 10,
            EffectType::Charged => 15,
            _ => 5,
        }
    }
}

/// Damage dealt by a bullet of the provided size and effect.
#[must_use]
pub fn damage_for(size: BulletSize, effect: EffectType) -> u32 {
    (BASE_DAMAGE * size.multiplier() * effect.damage_factor()).floor() as u32
}

/// Energy consumed by firing a bullet of the provided size and effect.
#[must_use]
pub fn energy_cost_for(size: BulletSize, effect: EffectType) -> u32 {
    (BASE_ENERGY_COST * size.multiplier() * effect.energy_factor()).floor() as u32
}

/// Fading sample of a bullet's recent positions.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrailPoint {
    /// Horizontal position.
    pub x: f32,
    /// Vertical position.
    pub y: f32,
    /// Opacity in `0.0..=1.0`.
    pub alpha: f32,
    /// Stroke size.
    pub size: f32,
}

/// Specialised flight model layered over the basic bullet.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Projectile {
    /// Straight-line flight.
    Standard,
    /// Steers toward a locked enemy.
    Homing {
        /// Enemy being tracked; its last known position is kept once it dies.
        target: EnemyId,
        /// Last known target position.
        target_position: Vec2,
    },
    /// Large pulsing plasma orb.
    Plasma,
    /// Splits into three bullets after travelling a fixed distance.
    Splitting {
        /// Vertical position at launch.
        spawn_y: f32,
        /// Set once the travel distance is reached.
        ready: bool,
    },
}

/// Projectile fired by the player or an enemy.
#[derive(Clone, Debug, PartialEq)]
pub struct Bullet {
    /// Horizontal centre in canvas pixels.
    pub x: f32,
    /// Vertical centre in canvas pixels.
    pub y: f32,
    /// Horizontal velocity in pixels per frame.
    pub vx: f32,
    /// Vertical velocity in pixels per frame.
    pub vy: f32,
    /// Full width derived from the radius and size class.
    pub width: f32,
    /// Full height derived from the radius and size class.
    pub height: f32,
    /// Fill colour.
    pub color: Rgb,
    owner: BulletOwner,
    radius: f32,
    size: BulletSize,
    effect: EffectType,
    damage: u32,
    energy_cost: u32,
    penetration_count: u32,
    max_penetrations: u32,
    bounce_count: u32,
    max_bounces: u32,
    explosion_radius: f32,
    trail: VecDeque<TrailPoint>,
    max_trail_length: usize,
    glow_intensity: f32,
    rotation_angle: f32,
    rotation_speed: f32,
    pulse_time: f32,
    projectile: Projectile,
    last_hit: Option<EnemyId>,
}

impl Bullet {
    /// Creates a medium, basic bullet.
    #[must_use]
    pub fn new(position: Vec2, velocity: Vec2, radius: f32, color: Rgb, owner: BulletOwner) -> Self {
        let mut bullet = Self {
            x: position.x,
            y: position.y,
            vx: velocity.x,
            vy: velocity.y,
            width: 0.0,
            height: 0.0,
            color,
            owner,
            radius,
            size: BulletSize::Medium,
            effect: EffectType::Basic,
            damage: 0,
            energy_cost: 0,
            penetration_count: 0,
            max_penetrations: 0,
            bounce_count: 0,
            max_bounces: 0,
            explosion_radius: 0.0,
            trail: VecDeque::new(),
            max_trail_length: 0,
            glow_intensity: 1.0,
            rotation_angle: 0.0,
            rotation_speed: 0.0,
            pulse_time: 0.0,
            projectile: Projectile::Standard,
            last_hit: None,
        };
        bullet.derive_stats();
        bullet
    }

    /// Replaces the size class and effect, recomputing every derived stat.
    #[must_use]
    pub fn with_style(mut self, size: BulletSize, effect: EffectType) -> Self {
        self.size = size;
        self.effect = effect;
        self.derive_stats();
        self
    }

    /// Gives the bullet a random per-frame spin in `[-0.1, 0.1)` radians for
    /// rotating visuals.
    #[must_use]
    pub fn with_random_spin<R: Rng + ?Sized>(mut self, rng: &mut R) -> Self {
        self.rotation_speed = rng.gen::<f32>() * 2.0 * MAX_SPIN - MAX_SPIN;
        self
    }

    /// Per-frame change of [`Bullet::rotation_angle`].
    #[must_use]
    pub const fn rotation_speed(&self) -> f32 {
        self.rotation_speed
    }

    /// Turns the bullet into a homing missile locked onto the provided enemy.
    #[must_use]
    pub fn homing(mut self, target: EnemyId, target_position: Vec2) -> Self {
        self.projectile = Projectile::Homing {
            target,
            target_position,
        };
        self
    }

    /// Turns the bullet into a large energy plasma orb.
    #[must_use]
    pub fn plasma(self) -> Self {
        let mut bullet = self.with_style(BulletSize::Large, EffectType::Energy);
        bullet.projectile = Projectile::Plasma;
        bullet
    }

    /// Turns the bullet into a splitting shell.
    #[must_use]
    pub fn splitting(self) -> Self {
        let mut bullet = self.with_style(BulletSize::Medium, EffectType::Splitting);
        bullet.projectile = Projectile::Splitting {
            spawn_y: bullet.y,
            ready: false,
        };
        bullet
    }

    fn derive_stats(&mut self) {
        let multiplier = self.size.multiplier();
        self.width = self.radius * 2.0 * multiplier;
        self.height = self.width;
        self.damage = damage_for(self.size, self.effect);
        self.energy_cost = energy_cost_for(self.size, self.effect);
        self.max_penetrations = if self.effect == EffectType::Piercing { 3 } else { 0 };
        self.max_bounces = if self.effect == EffectType::Bouncing { 5 } else { 0 };
        self.explosion_radius = if self.effect == EffectType::Explosive {
            self.width * 2.0
        } else {
            0.0
        };
        self.max_trail_length = self.effect.trail_length();
    }

    /// Side that fired the bullet.
    #[must_use]
    pub const fn owner(&self) -> BulletOwner {
        self.owner
    }

    /// Size class.
    #[must_use]
    pub const fn size(&self) -> BulletSize {
        self.size
    }

    /// Behavioural category.
    #[must_use]
    pub const fn effect(&self) -> EffectType {
        self.effect
    }

    /// Flight model.
    #[must_use]
    pub const fn projectile(&self) -> Projectile {
        self.projectile
    }

    /// Damage dealt on impact.
    #[must_use]
    pub const fn damage(&self) -> u32 {
        self.damage
    }

    /// Energy consumed when fired.
    #[must_use]
    pub const fn energy_cost(&self) -> u32 {
        self.energy_cost
    }

    /// Targets pierced so far.
    #[must_use]
    pub const fn penetration_count(&self) -> u32 {
        self.penetration_count
    }

    /// Edge reflections performed so far.
    #[must_use]
    pub const fn bounce_count(&self) -> u32 {
        self.bounce_count
    }

    /// Blast radius of explosive rounds; zero otherwise.
    #[must_use]
    pub const fn explosion_radius(&self) -> f32 {
        self.explosion_radius
    }

    /// Recent positions, newest first.
    #[must_use]
    pub fn trail(&self) -> &VecDeque<TrailPoint> {
        &self.trail
    }

    /// Current glow multiplier.
    #[must_use]
    pub const fn glow_intensity(&self) -> f32 {
        self.glow_intensity
    }

    /// Accumulated spin in radians.
    #[must_use]
    pub const fn rotation_angle(&self) -> f32 {
        self.rotation_angle
    }

    /// Phase accumulator driving pulsing visuals.
    #[must_use]
    pub const fn pulse_time(&self) -> f32 {
        self.pulse_time
    }

    /// Advances the bullet by one frame.
    pub fn update(&mut self, canvas_width: f32, canvas_height: f32) {
        if let Projectile::Homing {
            target_position, ..
        } = self.projectile
        {
            self.steer_towards(target_position);
        }

        self.update_trail();

        self.x += self.vx;
        self.y += self.vy;
        self.rotation_angle += self.rotation_speed;
        self.pulse_time += PULSE_STEP;

        if self.effect == EffectType::Bouncing && self.bounce_count < self.max_bounces {
            self.bounce(canvas_width, canvas_height);
        }

        self.glow_intensity = match self.effect {
            EffectType::Energy => 0.8 + 0.4 * (self.pulse_time * 2.0).sin(),
            EffectType::Charged => 1.2 + 0.6 * (self.pulse_time * 4.0).sin(),
            EffectType::Ultimate => 1.5 + 0.8 * (self.pulse_time * 6.0).sin(),
            _ => 1.0,
        };

        if let Projectile::Splitting { spawn_y, ready } = &mut self.projectile {
            if !*ready && (self.y - *spawn_y).abs() >= SPLIT_DISTANCE {
                *ready = true;
            }
        }
    }

    fn steer_towards(&mut self, target: Vec2) {
        let delta = target - Vec2::new(self.x, self.y);
        let distance = delta.length();
        if distance > 0.0 {
            let desired = delta / distance * HOMING_SPEED;
            self.vx += (desired.x - self.vx) * HOMING_TURN_RATE;
            self.vy += (desired.y - self.vy) * HOMING_TURN_RATE;
        }
    }

    fn update_trail(&mut self) {
        self.trail.push_front(TrailPoint {
            x: self.x,
            y: self.y,
            alpha: 1.0,
            size: self.width,
        });
        for point in &mut self.trail {
            point.alpha *= TRAIL_ALPHA_DECAY;
            point.size *= TRAIL_SIZE_DECAY;
        }
        self.trail.truncate(self.max_trail_length);
        self.trail.retain(|point| point.alpha > TRAIL_MIN_ALPHA);
    }

    fn bounce(&mut self, canvas_width: f32, canvas_height: f32) {
        let mut bounced = false;
        if self.x <= 0.0 || self.x >= canvas_width {
            self.vx = -self.vx;
            self.x = self.x.clamp(0.0, canvas_width);
            bounced = true;
        }
        if self.y <= 0.0 || self.y >= canvas_height {
            self.vy = -self.vy;
            self.y = self.y.clamp(0.0, canvas_height);
            bounced = true;
        }
        if bounced {
            self.bounce_count += 1;
            self.vx *= BOUNCE_DAMPING;
            self.vy *= BOUNCE_DAMPING;
        }
    }

    /// Enemy tracked by a homing missile.
    #[must_use]
    pub const fn homing_target(&self) -> Option<EnemyId> {
        match self.projectile {
            Projectile::Homing { target, .. } => Some(target),
            _ => None,
        }
    }

    /// Refreshes the last known position of a homing missile's target.
    pub fn track_target(&mut self, position: Vec2) {
        if let Projectile::Homing {
            target_position, ..
        } = &mut self.projectile
        {
            *target_position = position;
        }
    }

    /// Returns whether the bullet can pass through another enemy.
    #[must_use]
    pub fn can_penetrate(&self) -> bool {
        self.effect == EffectType::Piercing && self.penetration_count < self.max_penetrations
    }

    /// Records a pierced enemy.
    pub fn on_penetration(&mut self, enemy: EnemyId) {
        if self.effect == EffectType::Piercing {
            self.penetration_count += 1;
        }
        self.last_hit = Some(enemy);
    }

    /// Returns whether the provided enemy was the last one pierced.
    #[must_use]
    pub fn recently_hit(&self, enemy: EnemyId) -> bool {
        self.last_hit == Some(enemy)
    }

    /// Returns whether the bullet detonates on impact.
    #[must_use]
    pub fn should_explode(&self) -> bool {
        self.effect == EffectType::Explosive
    }

    /// Returns whether a splitting shell has travelled far enough to split.
    #[must_use]
    pub fn should_split(&self) -> bool {
        matches!(self.projectile, Projectile::Splitting { ready: true, .. })
    }

    /// Produces the three fragments released when a splitting shell bursts.
    #[must_use]
    pub fn split<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<Bullet> {
        let fragment_radius = self.width * 0.3;
        SPLIT_ANGLES
            .iter()
            .map(|angle| {
                Bullet::new(
                    Vec2::new(self.x, self.y),
                    Vec2::new(angle.sin() * 6.0, self.vy * 1.2),
                    fragment_radius,
                    self.color,
                    self.owner,
                )
                .with_style(BulletSize::Small, EffectType::Basic)
                .with_random_spin(rng)
            })
            .collect()
    }

    /// Returns whether the bullet's center left the top or bottom of the
    /// canvas by more than a fixed margin, whatever its size.
    #[must_use]
    pub fn is_off_screen(&self, canvas_height: f32) -> bool {
        self.y < -OFF_SCREEN_MARGIN || self.y > canvas_height + OFF_SCREEN_MARGIN
    }
}

impl Bounded for Bullet {
    fn bounds(&self) -> Aabb {
        Aabb::new(self.x, self.y, self.width, self.height)
    }
}
