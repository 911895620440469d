use rand::Rng;
use space_shooter_core::{Aabb, Bounded, PowerUpKind, Rgb};

const POWER_UP_SIZE: f32 = 20.0;
const FALL_SPEED: f32 = 1.0;
const PULSE_STEP: f32 = 0.1;

/// Falling pickup that grants a temporary or instant buff when collected.
#[derive(Clone, Debug, PartialEq)]
pub struct PowerUp {
    /// Horizontal centre in canvas pixels.
    pub x: f32,
    /// Vertical centre in canvas pixels.
    pub y: f32,
    /// Full width of the pickup.
    pub width: f32,
    /// Full height of the pickup.
    pub height: f32,
    kind: PowerUpKind,
    speed: f32,
    pulse_time: f32,
}

impl PowerUp {
    /// Creates a pickup of the provided kind centred on the given point.
    #[must_use]
    pub fn new(x: f32, y: f32, kind: PowerUpKind) -> Self {
        Self {
            x,
            y,
            width: POWER_UP_SIZE,
            height: POWER_UP_SIZE,
            kind,
            speed: FALL_SPEED,
            pulse_time: 0.0,
        }
    }

    /// Draws a power-up kind uniformly at random.
    pub fn random_kind<R: Rng + ?Sized>(rng: &mut R) -> PowerUpKind {
        PowerUpKind::ALL[rng.gen_range(0..PowerUpKind::ALL.len())]
    }

    /// Advances the pickup by one frame.
    pub fn update(&mut self) {
        self.y += self.speed;
        self.pulse_time += PULSE_STEP;
    }

    /// Kind of buff granted on collection.
    #[must_use]
    pub const fn kind(&self) -> PowerUpKind {
        self.kind
    }

    /// Phase accumulator driving the glow pulse.
    #[must_use]
    pub const fn pulse_time(&self) -> f32 {
        self.pulse_time
    }

    /// Colour associated with the pickup's kind.
    #[must_use]
    pub const fn color(&self) -> Rgb {
        color_for(self.kind)
    }

    /// Returns whether the pickup fell past the bottom of the canvas.
    #[must_use]
    pub fn is_off_screen(&self, canvas_height: f32) -> bool {
        self.y > canvas_height + 50.0
    }
}

impl Bounded for PowerUp {
    fn bounds(&self) -> Aabb {
        Aabb::new(self.x, self.y, self.width, self.height)
    }
}

/// Colour used for pickups and collection particles of the provided kind.
#[must_use]
pub const fn color_for(kind: PowerUpKind) -> Rgb {
    match kind {
        PowerUpKind::Shield => Rgb::from_hex(0x00ffff),
        PowerUpKind::SlowMotion => Rgb::from_hex(0xffff00),
        PowerUpKind::RapidFire => Rgb::from_hex(0xff8800),
        PowerUpKind::MultiShot => Rgb::from_hex(0xff00ff),
        PowerUpKind::ExtraLife => Rgb::from_hex(0x00ff00),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::collections::HashSet;

    #[test]
    fn falls_at_constant_speed() {
        let mut power_up = PowerUp::new(50.0, 10.0, PowerUpKind::Shield);
        for _ in 0..5 {
            power_up.update();
        }
        assert_eq!(power_up.y, 15.0);
        assert!((power_up.pulse_time() - 0.5).abs() < 1e-5);
    }

    #[test]
    fn leaves_screen_fifty_pixels_below_canvas() {
        let mut power_up = PowerUp::new(0.0, 650.0, PowerUpKind::RapidFire);
        assert!(!power_up.is_off_screen(600.0));
        power_up.update();
        assert!(power_up.is_off_screen(600.0));
    }

    #[test]
    fn random_kind_covers_every_variant() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let seen: HashSet<_> = (0..200).map(|_| PowerUp::random_kind(&mut rng)).collect();
        assert_eq!(seen.len(), PowerUpKind::ALL.len());
    }
}
