use space_shooter_core::Rgb;

const FRICTION: f32 = 0.98;

/// Short-lived point sprite spawned by explosions and pickups.
#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    /// Horizontal position in canvas pixels.
    pub x: f32,
    /// Vertical position in canvas pixels.
    pub y: f32,
    /// Horizontal velocity in pixels per frame.
    pub vx: f32,
    /// Vertical velocity in pixels per frame.
    pub vy: f32,
    /// Colour used when drawing the particle.
    pub color: Rgb,
    life: u32,
    max_life: u32,
}

impl Particle {
    /// Creates a particle that lives for the provided number of frames.
    #[must_use]
    pub fn new(x: f32, y: f32, vx: f32, vy: f32, color: Rgb, life: u32) -> Self {
        Self {
            x,
            y,
            vx,
            vy,
            color,
            life,
            max_life: life.max(1),
        }
    }

    /// Advances the particle by one frame.
    pub fn update(&mut self) {
        self.x += self.vx;
        self.y += self.vy;
        self.life = self.life.saturating_sub(1);
        self.vx *= FRICTION;
        self.vy *= FRICTION;
    }

    /// Returns whether the particle has exhausted its lifetime.
    #[must_use]
    pub const fn is_dead(&self) -> bool {
        self.life == 0
    }

    /// Remaining frames before the particle disappears.
    #[must_use]
    pub const fn life(&self) -> u32 {
        self.life
    }

    /// Opacity derived from the remaining lifetime.
    #[must_use]
    pub fn alpha(&self) -> f32 {
        self.life as f32 / self.max_life as f32
    }

    /// Edge length of the square drawn for the particle.
    #[must_use]
    pub fn size(&self) -> f32 {
        2.0 + self.alpha() * 3.0
    }
}
