use std::f32::consts::TAU;

use rand::Rng;
use space_shooter_core::{QualityTier, Rgb};
use space_shooter_world::Particle;

const EXPLOSION_PARTICLES: f32 = 8.0;
const EXPLOSION_MIN_PARTICLES: usize = 2;
const EXPLOSION_LIFE: u32 = 30;

const BIG_EXPLOSION_PARTICLES: f32 = 20.0;
const BIG_EXPLOSION_MIN_PARTICLES: usize = 6;
const BIG_EXPLOSION_LIFE: u32 = 50;
const BIG_EXPLOSION_JITTER_X: f32 = 40.0;
const BIG_EXPLOSION_JITTER_Y: f32 = 30.0;
const BIG_EXPLOSION_PALETTE: [Rgb; 4] = [
    Rgb::from_hex(0xff4400),
    Rgb::from_hex(0xffaa00),
    Rgb::from_hex(0xff0044),
    Rgb::from_hex(0xffffff),
];

/// Colour of the fallback burst used when a big explosion is capped.
pub(crate) const BIG_EXPLOSION_FALLBACK: Rgb = Rgb::from_hex(0xff4400);

fn explosion_multiplier(tier: QualityTier) -> f32 {
    match tier {
        QualityTier::Low => 0.25,
        QualityTier::Medium => 0.5,
        QualityTier::High => 1.0,
    }
}

fn big_explosion_multiplier(tier: QualityTier) -> f32 {
    match tier {
        QualityTier::Low => 0.3,
        QualityTier::Medium => 0.6,
        QualityTier::High => 1.0,
    }
}

fn particle_count(base: f32, multiplier: f32, minimum: usize) -> usize {
    ((base * multiplier).floor() as usize).max(minimum)
}

/// Radial burst of evenly spaced particles in a single colour.
pub(crate) fn explosion<R: Rng + ?Sized>(
    x: f32,
    y: f32,
    color: Rgb,
    tier: QualityTier,
    rng: &mut R,
) -> Vec<Particle> {
    let count = particle_count(
        EXPLOSION_PARTICLES,
        explosion_multiplier(tier),
        EXPLOSION_MIN_PARTICLES,
    );
    (0..count)
        .map(|index| {
            let angle = TAU * index as f32 / count as f32;
            let speed = rng.gen::<f32>() * 3.0 + 2.0;
            Particle::new(
                x,
                y,
                angle.cos() * speed,
                angle.sin() * speed,
                color,
                EXPLOSION_LIFE,
            )
        })
        .collect()
}

/// Larger jittered burst in the fiery palette released when a boss falls.
pub(crate) fn big_explosion<R: Rng + ?Sized>(
    x: f32,
    y: f32,
    tier: QualityTier,
    rng: &mut R,
) -> Vec<Particle> {
    let count = particle_count(
        BIG_EXPLOSION_PARTICLES,
        big_explosion_multiplier(tier),
        BIG_EXPLOSION_MIN_PARTICLES,
    );
    (0..count)
        .map(|index| {
            let angle = TAU * index as f32 / count as f32;
            let speed = rng.gen::<f32>() * 5.0 + 3.0;
            let color = BIG_EXPLOSION_PALETTE[rng.gen_range(0..BIG_EXPLOSION_PALETTE.len())];
            Particle::new(
                x + (rng.gen::<f32>() - 0.5) * BIG_EXPLOSION_JITTER_X,
                y + (rng.gen::<f32>() - 0.5) * BIG_EXPLOSION_JITTER_Y,
                angle.cos() * speed,
                angle.sin() * speed,
                color,
                BIG_EXPLOSION_LIFE,
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn explosion_size_scales_with_quality() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let color = Rgb::from_hex(0xffff00);

        assert_eq!(explosion(0.0, 0.0, color, QualityTier::High, &mut rng).len(), 8);
        assert_eq!(explosion(0.0, 0.0, color, QualityTier::Medium, &mut rng).len(), 4);
        assert_eq!(explosion(0.0, 0.0, color, QualityTier::Low, &mut rng).len(), 2);
    }

    #[test]
    fn big_explosion_keeps_a_minimum_burst() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);

        assert_eq!(big_explosion(0.0, 0.0, QualityTier::High, &mut rng).len(), 20);
        assert_eq!(big_explosion(0.0, 0.0, QualityTier::Medium, &mut rng).len(), 12);
        assert_eq!(big_explosion(0.0, 0.0, QualityTier::Low, &mut rng).len(), 6);
    }

    #[test]
    fn explosion_particles_move_outward_at_burst_speed() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for particle in explosion(50.0, 60.0, Rgb::from_hex(0xff0000), QualityTier::High, &mut rng)
        {
            let speed = (particle.vx * particle.vx + particle.vy * particle.vy).sqrt();
            assert!((2.0..=5.0001).contains(&speed), "speed {speed}");
            assert_eq!((particle.x, particle.y), (50.0, 60.0));
            assert_eq!(particle.life(), 30);
        }
    }

    #[test]
    fn big_explosion_uses_its_palette() {
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        for particle in big_explosion(100.0, 100.0, QualityTier::High, &mut rng) {
            assert!(BIG_EXPLOSION_PALETTE.contains(&particle.color));
            assert!((particle.x - 100.0).abs() <= 20.0);
            assert!((particle.y - 100.0).abs() <= 15.0);
        }
    }
}
