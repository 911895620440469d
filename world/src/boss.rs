use space_shooter_core::{Aabb, Bounded, BossKind};

const DESTROYER_BURST_START: u32 = 45;
const DESTROYER_BURST_INTERVAL: u32 = 15;
const DESTROYER_CYCLE: u32 = 120;
const MOTHERSHIP_CYCLE: u32 = 80;
const MOTHERSHIP_FAN: [f32; 3] = [-0.3, 0.0, 0.3];
const DREADNOUGHT_CYCLE: u32 = 60;

/// Projectile requested by a boss attack pattern.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BossShot {
    /// Horizontal spawn point.
    pub x: f32,
    /// Vertical spawn point.
    pub y: f32,
    /// Horizontal velocity.
    pub vx: f32,
    /// Vertical velocity.
    pub vy: f32,
}

/// Large enemy guarding every fifth level.
#[derive(Clone, Debug, PartialEq)]
pub struct Boss {
    /// Horizontal centre in canvas pixels.
    pub x: f32,
    /// Vertical centre in canvas pixels.
    pub y: f32,
    /// Full width of the hull.
    pub width: f32,
    /// Full height of the hull.
    pub height: f32,
    speed: f32,
    kind: BossKind,
    health: i32,
    max_health: i32,
    attack_timer: u32,
    movement_timer: u32,
    move_direction: f32,
    attack_pattern: u32,
}

impl Boss {
    /// Creates a boss whose hull and health scale with the provided level.
    #[must_use]
    pub fn new(kind: BossKind, x: f32, y: f32, level: u32) -> Self {
        let level = level as i32;
        let (width, height, speed, health) = match kind {
            BossKind::Destroyer => (80.0, 60.0, 0.5, 15 + level * 5),
            BossKind::Mothership => (120.0, 80.0, 0.3, 25 + level * 7),
            BossKind::Dreadnought => (150.0, 100.0, 0.2, 35 + level * 10),
        };

        Self {
            x,
            y,
            width,
            height,
            speed,
            kind,
            health,
            max_health: health,
            attack_timer: 0,
            movement_timer: 0,
            move_direction: 1.0,
            attack_pattern: 0,
        }
    }

    /// Boss variant.
    #[must_use]
    pub const fn kind(&self) -> BossKind {
        self.kind
    }

    /// Remaining health.
    #[must_use]
    pub const fn health(&self) -> i32 {
        self.health
    }

    /// Health at spawn time.
    #[must_use]
    pub const fn max_health(&self) -> i32 {
        self.max_health
    }

    /// Fraction of health remaining, clamped to `0.0..=1.0`.
    #[must_use]
    pub fn health_fraction(&self) -> f32 {
        if self.max_health <= 0 {
            return 0.0;
        }
        (self.health as f32 / self.max_health as f32).clamp(0.0, 1.0)
    }

    /// Applies damage and reports whether the boss was destroyed.
    pub fn take_damage(&mut self, damage: i32) -> bool {
        self.health -= damage;
        self.health <= 0
    }

    /// Advances movement and the attack pattern, returning any projectiles fired this frame.
    pub fn update(&mut self, canvas_width: f32) -> Vec<BossShot> {
        self.movement_timer += 1;
        self.attack_timer += 1;

        let muzzle_y = self.y + self.height / 2.0;
        let mut shots = Vec::new();

        match self.kind {
            BossKind::Destroyer => {
                self.x += self.speed * self.move_direction;
                let half_width = self.width / 2.0;
                if self.x <= half_width || self.x >= canvas_width - half_width {
                    self.move_direction = -self.move_direction;
                }

                if self.attack_timer >= DESTROYER_BURST_START
                    && self.attack_timer % DESTROYER_BURST_INTERVAL == 0
                {
                    shots.push(BossShot {
                        x: self.x,
                        y: muzzle_y,
                        vx: 0.0,
                        vy: 4.0,
                    });
                    if self.attack_timer >= DESTROYER_CYCLE {
                        self.attack_timer = 0;
                    }
                }
            }
            BossKind::Mothership => {
                self.x += (self.movement_timer as f32 * 0.02).sin() * 1.5;
                self.clamp_to(canvas_width);

                if self.attack_timer >= MOTHERSHIP_CYCLE {
                    for angle in MOTHERSHIP_FAN {
                        shots.push(BossShot {
                            x: self.x + angle.sin() * 20.0,
                            y: muzzle_y,
                            vx: angle.sin() * 2.0,
                            vy: 3.0 + angle.cos(),
                        });
                    }
                    self.attack_timer = 0;
                }
            }
            BossKind::Dreadnought => {
                self.x += (self.movement_timer as f32 * 0.01).sin() * 0.5;
                self.clamp_to(canvas_width);

                if self.attack_timer >= DREADNOUGHT_CYCLE {
                    if self.attack_pattern % 2 == 0 {
                        for lane in -2..=2 {
                            let lane = lane as f32;
                            shots.push(BossShot {
                                x: self.x + lane * 15.0,
                                y: muzzle_y,
                                vx: lane * 0.8,
                                vy: 3.5,
                            });
                        }
                    } else {
                        for step in 0..3 {
                            shots.push(BossShot {
                                x: self.x,
                                y: muzzle_y + step as f32 * 10.0,
                                vx: 0.0,
                                vy: 5.0,
                            });
                        }
                    }
                    self.attack_pattern += 1;
                    self.attack_timer = 0;
                }
            }
        }

        shots
    }

    fn clamp_to(&mut self, canvas_width: f32) {
        let half_width = self.width / 2.0;
        self.x = self.x.max(half_width).min(canvas_width - half_width);
    }
}

impl Bounded for Boss {
    fn bounds(&self) -> Aabb {
        Aabb::new(self.x, self.y, self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shots_over(boss: &mut Boss, frames: u32) -> Vec<(u32, usize)> {
        (1..=frames)
            .filter_map(|frame| {
                let shots = boss.update(800.0);
                (!shots.is_empty()).then_some((frame, shots.len()))
            })
            .collect()
    }

    #[test]
    fn health_scales_with_kind_and_level() {
        assert_eq!(Boss::new(BossKind::Destroyer, 0.0, 0.0, 5).max_health(), 40);
        assert_eq!(Boss::new(BossKind::Mothership, 0.0, 0.0, 5).max_health(), 60);
        assert_eq!(Boss::new(BossKind::Dreadnought, 0.0, 0.0, 10).max_health(), 135);
    }

    #[test]
    fn destroyer_fires_bursts_between_45_and_120() {
        let mut boss = Boss::new(BossKind::Destroyer, 400.0, 100.0, 5);
        let fired = shots_over(&mut boss, 130);
        let frames: Vec<u32> = fired.iter().map(|(frame, _)| *frame).collect();
        assert_eq!(frames, vec![45, 60, 75, 90, 105, 120]);
    }

    #[test]
    fn mothership_fires_three_way_fan() {
        let mut boss = Boss::new(BossKind::Mothership, 400.0, 100.0, 5);
        let fired = shots_over(&mut boss, 160);
        assert_eq!(fired, vec![(80, 3), (160, 3)]);
    }

    #[test]
    fn dreadnought_alternates_spread_and_column() {
        let mut boss = Boss::new(BossKind::Dreadnought, 400.0, 100.0, 10);
        let fired = shots_over(&mut boss, 180);
        assert_eq!(fired, vec![(60, 5), (120, 3), (180, 5)]);
    }

    #[test]
    fn destroyer_reverses_at_canvas_edges() {
        let mut boss = Boss::new(BossKind::Destroyer, 760.0, 100.0, 5);
        let _ = boss.update(800.0);
        let turned_at = boss.x;
        let _ = boss.update(800.0);
        assert!(boss.x < turned_at);
    }

    #[test]
    fn health_fraction_never_negative() {
        let mut boss = Boss::new(BossKind::Destroyer, 0.0, 0.0, 0);
        assert!(boss.take_damage(100));
        assert_eq!(boss.health_fraction(), 0.0);
    }
}
