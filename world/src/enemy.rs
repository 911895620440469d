use std::f32::consts::TAU;

use rand::Rng;
use space_shooter_core::{Aabb, Bounded, EnemyId, EnemyKind};

const OSCILLATION_FREQUENCY: f32 = 0.02;
const OSCILLATION_AMPLITUDE: f32 = 0.5;
const SCOUT_DASH_COOLDOWN: f32 = 180.0;
const SCOUT_DASH_MULTIPLIER: f32 = 3.0;
const SCOUT_DASH_DURATION_MS: u64 = 1_000;
const HEAVY_SHIELD: i32 = 2;
const BOMBER_COOLDOWN: f32 = 240.0;
const INITIAL_TIMER_SPREAD: f32 = 120.0;
const KAMIKAZE_CHARGE_SPEED: f32 = 4.0;
const KAMIKAZE_ALIGN_THRESHOLD: f32 = 5.0;

/// World facts handed to every enemy update; variants ignore what they do not need.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemyContext {
    /// Width of the play field.
    pub canvas_width: f32,
    /// Height of the play field.
    pub canvas_height: f32,
    /// Horizontal centre of the player's ship, if known.
    pub player_x: Option<f32>,
    /// Current wall-clock time in milliseconds.
    pub now_ms: u64,
}

/// Side effect requested by an enemy update.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EnemyAction {
    /// Nothing beyond movement happened.
    Idle,
    /// A bomber released its payload at the provided point.
    DropBombs {
        /// Horizontal release point.
        x: f32,
        /// Vertical release point.
        y: f32,
    },
}

#[derive(Clone, Debug, PartialEq)]
enum Behavior {
    Standard,
    Scout {
        dash_timer: f32,
        dash_ends_at_ms: Option<u64>,
    },
    Heavy {
        shield: i32,
    },
    Bomber {
        bomb_timer: f32,
    },
    Kamikaze {
        target_x: f32,
        charging: bool,
    },
}

/// Hostile craft descending toward the player.
#[derive(Clone, Debug, PartialEq)]
pub struct Enemy {
    /// Horizontal centre in canvas pixels.
    pub x: f32,
    /// Vertical centre in canvas pixels.
    pub y: f32,
    /// Full width of the craft.
    pub width: f32,
    /// Full height of the craft.
    pub height: f32,
    /// Downward speed in pixels per frame.
    pub speed: f32,
    id: EnemyId,
    kind: EnemyKind,
    health: i32,
    oscillation_offset: f32,
    behavior: Behavior,
}

impl Enemy {
    /// Creates the standard fighter.
    pub fn basic<R: Rng + ?Sized>(id: EnemyId, x: f32, y: f32, level: u32, rng: &mut R) -> Self {
        let speed = 1.0 + level_offset(level) * 0.3;
        Self::with_shape(id, EnemyKind::Basic, x, y, (30.0, 20.0), speed, rng)
    }

    /// Creates a scout that dashes at triple speed on a cooldown.
    pub fn scout<R: Rng + ?Sized>(id: EnemyId, x: f32, y: f32, level: u32, rng: &mut R) -> Self {
        let speed = 2.0 + level_offset(level) * 0.5;
        let mut enemy = Self::with_shape(id, EnemyKind::Scout, x, y, (20.0, 15.0), speed, rng);
        enemy.behavior = Behavior::Scout {
            dash_timer: rng.gen::<f32>() * INITIAL_TIMER_SPREAD,
            dash_ends_at_ms: None,
        };
        enemy
    }

    /// Creates an armoured craft whose shield absorbs hits before its health.
    pub fn heavy<R: Rng + ?Sized>(id: EnemyId, x: f32, y: f32, level: u32, rng: &mut R) -> Self {
        let speed = 0.5 + level_offset(level) * 0.2;
        let mut enemy = Self::with_shape(id, EnemyKind::Heavy, x, y, (45.0, 35.0), speed, rng);
        enemy.health = 3 + (level / 2) as i32;
        enemy.behavior = Behavior::Heavy {
            shield: HEAVY_SHIELD,
        };
        enemy
    }

    /// Creates a bomber that periodically releases a three-bomb spread.
    pub fn bomber<R: Rng + ?Sized>(id: EnemyId, x: f32, y: f32, level: u32, rng: &mut R) -> Self {
        let speed = 1.0 + level_offset(level) * 0.3;
        let mut enemy = Self::with_shape(id, EnemyKind::Bomber, x, y, (35.0, 25.0), speed, rng);
        enemy.behavior = Behavior::Bomber {
            bomb_timer: rng.gen::<f32>() * INITIAL_TIMER_SPREAD,
        };
        enemy
    }

    /// Creates a kamikaze that charges the player's column once it is low enough.
    pub fn kamikaze<R: Rng + ?Sized>(
        id: EnemyId,
        x: f32,
        y: f32,
        level: u32,
        rng: &mut R,
    ) -> Self {
        let speed = 1.5 + level_offset(level) * 0.4;
        let mut enemy = Self::with_shape(id, EnemyKind::Kamikaze, x, y, (25.0, 20.0), speed, rng);
        enemy.behavior = Behavior::Kamikaze {
            target_x: 0.0,
            charging: false,
        };
        enemy
    }

    fn with_shape<R: Rng + ?Sized>(
        id: EnemyId,
        kind: EnemyKind,
        x: f32,
        y: f32,
        (width, height): (f32, f32),
        speed: f32,
        rng: &mut R,
    ) -> Self {
        Self {
            x,
            y,
            width,
            height,
            speed,
            id,
            kind,
            health: 1,
            oscillation_offset: rng.gen::<f32>() * TAU,
            behavior: Behavior::Standard,
        }
    }

    /// Identifier assigned when the enemy spawned.
    #[must_use]
    pub const fn id(&self) -> EnemyId {
        self.id
    }

    /// Variant tag used for scoring and drop rules.
    #[must_use]
    pub const fn kind(&self) -> EnemyKind {
        self.kind
    }

    /// Remaining hull health.
    #[must_use]
    pub const fn health(&self) -> i32 {
        self.health
    }

    /// Remaining shield points; zero for unshielded variants.
    #[must_use]
    pub const fn shield(&self) -> i32 {
        match self.behavior {
            Behavior::Heavy { shield } => shield,
            _ => 0,
        }
    }

    /// Returns whether a scout is mid-dash.
    #[must_use]
    pub const fn is_dashing(&self) -> bool {
        matches!(
            self.behavior,
            Behavior::Scout {
                dash_ends_at_ms: Some(_),
                ..
            }
        )
    }

    /// Returns whether a kamikaze has started its charge.
    #[must_use]
    pub const fn is_charging(&self) -> bool {
        matches!(self.behavior, Behavior::Kamikaze { charging: true, .. })
    }

    /// Applies damage, consuming any shield first, and reports whether the enemy died.
    pub fn take_damage(&mut self, damage: i32) -> bool {
        if let Behavior::Heavy { shield } = &mut self.behavior {
            if *shield > 0 {
                *shield -= damage;
                return false;
            }
        }
        self.health -= damage;
        self.health <= 0
    }

    /// Returns whether the enemy has left the bottom of the canvas.
    #[must_use]
    pub fn is_off_screen(&self, canvas_height: f32) -> bool {
        self.y > canvas_height + 50.0
    }

    /// Advances the enemy by one frame.
    pub fn update(&mut self, context: &EnemyContext) -> EnemyAction {
        match &mut self.behavior {
            Behavior::Scout {
                dash_ends_at_ms, ..
            } => {
                if dash_ends_at_ms.is_some_and(|end| context.now_ms >= end) {
                    *dash_ends_at_ms = None;
                    self.speed /= SCOUT_DASH_MULTIPLIER;
                }
            }
            Behavior::Kamikaze { target_x, charging } => {
                if let Some(player_x) = context.player_x {
                    *target_x = player_x;
                }
                if !*charging && self.y > context.canvas_height / 3.0 {
                    *charging = true;
                }
                if *charging {
                    let dx = *target_x - self.x;
                    let distance = dx.abs();
                    if distance > KAMIKAZE_ALIGN_THRESHOLD {
                        self.x += dx / distance * KAMIKAZE_CHARGE_SPEED;
                    }
                    self.speed = KAMIKAZE_CHARGE_SPEED;
                }
            }
            Behavior::Standard | Behavior::Heavy { .. } | Behavior::Bomber { .. } => {}
        }

        self.drift(context.canvas_width);

        match &mut self.behavior {
            Behavior::Scout {
                dash_timer,
                dash_ends_at_ms,
            } => {
                *dash_timer += 1.0;
                if *dash_timer >= SCOUT_DASH_COOLDOWN && dash_ends_at_ms.is_none() {
                    *dash_ends_at_ms = Some(context.now_ms + SCOUT_DASH_DURATION_MS);
                    *dash_timer = 0.0;
                    self.speed *= SCOUT_DASH_MULTIPLIER;
                }
                EnemyAction::Idle
            }
            Behavior::Bomber { bomb_timer } => {
                *bomb_timer += 1.0;
                if *bomb_timer >= BOMBER_COOLDOWN {
                    *bomb_timer = 0.0;
                    EnemyAction::DropBombs {
                        x: self.x,
                        y: self.y + self.height / 2.0,
                    }
                } else {
                    EnemyAction::Idle
                }
            }
            Behavior::Standard | Behavior::Heavy { .. } | Behavior::Kamikaze { .. } => {
                EnemyAction::Idle
            }
        }
    }

    fn drift(&mut self, canvas_width: f32) {
        self.y += self.speed;
        self.x += (self.y * OSCILLATION_FREQUENCY + self.oscillation_offset).sin()
            * OSCILLATION_AMPLITUDE;
        let half_width = self.width / 2.0;
        self.x = self.x.max(half_width).min(canvas_width - half_width);
    }
}

impl Bounded for Enemy {
    fn bounds(&self) -> Aabb {
        Aabb::new(self.x, self.y, self.width, self.height)
    }
}

fn level_offset(level: u32) -> f32 {
    level.saturating_sub(1) as f32
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn context(now_ms: u64) -> EnemyContext {
        EnemyContext {
            canvas_width: 800.0,
            canvas_height: 600.0,
            player_x: Some(100.0),
            now_ms,
        }
    }

    #[test]
    fn variants_scale_with_level() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let id = EnemyId::new(0);

        let basic = Enemy::basic(id, 100.0, 0.0, 3, &mut rng);
        assert!((basic.speed - 1.6).abs() < 1e-5);
        assert_eq!((basic.width, basic.height), (30.0, 20.0));

        let heavy = Enemy::heavy(id, 100.0, 0.0, 5, &mut rng);
        assert_eq!(heavy.health(), 5);
        assert_eq!(heavy.shield(), 2);

        let bomber = Enemy::bomber(id, 100.0, 0.0, 4, &mut rng);
        assert_eq!(bomber.health(), 1);

        let scout = Enemy::scout(id, 100.0, 0.0, 2, &mut rng);
        assert!((scout.speed - 2.5).abs() < 1e-5);
    }

    #[test]
    fn heavy_shield_absorbs_hits_before_health() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let mut heavy = Enemy::heavy(EnemyId::new(1), 100.0, 0.0, 1, &mut rng);

        assert!(!heavy.take_damage(1));
        assert!(!heavy.take_damage(1));
        assert_eq!(heavy.shield(), 0);
        assert_eq!(heavy.health(), 3);

        assert!(!heavy.take_damage(1));
        assert!(!heavy.take_damage(1));
        assert!(heavy.take_damage(1));
    }

    #[test]
    fn enemies_stay_inside_horizontal_bounds() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut enemy = Enemy::basic(EnemyId::new(2), 2.0, 0.0, 1, &mut rng);
        for _ in 0..200 {
            let _ = enemy.update(&context(0));
            assert!(enemy.x >= enemy.width / 2.0);
            assert!(enemy.x <= 800.0 - enemy.width / 2.0);
        }
    }

    #[test]
    fn bomber_releases_payload_on_cooldown() {
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let mut bomber = Enemy::bomber(EnemyId::new(3), 400.0, 0.0, 1, &mut rng);

        let drops = (0..240)
            .filter(|_| matches!(bomber.update(&context(0)), EnemyAction::DropBombs { .. }))
            .count();
        assert_eq!(drops, 1, "one bomb run per 240-frame cooldown");
    }

    #[test]
    fn scout_dash_lasts_one_second_of_wall_clock() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut scout = Enemy::scout(EnemyId::new(4), 400.0, -1000.0, 1, &mut rng);
        let base_speed = scout.speed;

        let mut now = 0;
        while !scout.is_dashing() {
            now += 16;
            let _ = scout.update(&context(now));
        }
        assert!((scout.speed - base_speed * 3.0).abs() < 1e-5);

        let _ = scout.update(&context(now + 999));
        assert!(scout.is_dashing());
        let _ = scout.update(&context(now + 1_000));
        assert!(!scout.is_dashing());
        assert!((scout.speed - base_speed).abs() < 1e-5);
    }

    #[test]
    fn kamikaze_charges_player_column_below_first_third() {
        let mut rng = ChaCha8Rng::seed_from_u64(6);
        let mut kamikaze = Enemy::kamikaze(EnemyId::new(5), 400.0, 150.0, 1, &mut rng);

        let _ = kamikaze.update(&context(0));
        assert!(!kamikaze.is_charging());

        kamikaze.y = 250.0;
        let before = kamikaze.x;
        let _ = kamikaze.update(&context(0));
        assert!(kamikaze.is_charging());
        assert_eq!(kamikaze.speed, 4.0);
        assert!(kamikaze.x < before - 3.0, "moves toward the player at x=100");
    }
}
