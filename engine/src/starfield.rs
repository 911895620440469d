use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use space_shooter_core::QualityTier;
use space_shooter_rendering::{Canvas, Color, Rect};

const SPARSE_STARS: usize = 25;
const DENSE_STARS: usize = 50;
const SCROLL_SPEED: f32 = 1.0;
const SLOWED_SCROLL_SPEED: f32 = 0.5;
const RESPAWN_Y: f32 = -5.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Star {
    pub(crate) x: f32,
    pub(crate) y: f32,
    pub(crate) size: f32,
}

/// Backdrop scrolled once per rendered frame.
///
/// Stars draw from their own random stream so rendering never perturbs the
/// simulation's sequence.
#[derive(Clone, Debug)]
pub(crate) struct Starfield {
    stars: Vec<Star>,
    rng: ChaCha8Rng,
}

impl Starfield {
    pub(crate) fn new(seed: u64, width: f32, height: f32, tier: QualityTier) -> Self {
        let mut field = Self {
            stars: Vec::new(),
            rng: ChaCha8Rng::seed_from_u64(seed),
        };
        field.regenerate(width, height, tier);
        field
    }

    /// Scatters a fresh set of stars sized for the tier over the canvas.
    pub(crate) fn regenerate(&mut self, width: f32, height: f32, tier: QualityTier) {
        let count = if tier == QualityTier::Low {
            SPARSE_STARS
        } else {
            DENSE_STARS
        };
        let rng = &mut self.rng;
        self.stars = (0..count)
            .map(|_| Star {
                x: rng.gen::<f32>() * width,
                y: rng.gen::<f32>() * height,
                size: rng.gen::<f32>() * 1.5 + 0.5,
            })
            .collect();
    }

    /// Moves every star down, wrapping those that leave the bottom edge.
    pub(crate) fn scroll(&mut self, width: f32, height: f32, slowed: bool) {
        let speed = if slowed {
            SLOWED_SCROLL_SPEED
        } else {
            SCROLL_SPEED
        };
        for star in &mut self.stars {
            star.y += speed;
            if star.y > height {
                star.y = RESPAWN_Y;
                star.x = self.rng.gen::<f32>() * width;
            }
        }
    }

    pub(crate) fn draw(&self, canvas: &mut dyn Canvas) {
        for star in &self.stars {
            canvas.fill_rect(Rect::new(star.x, star.y, star.size, star.size), Color::WHITE);
        }
    }

    #[cfg(test)]
    pub(crate) fn stars(&self) -> &[Star] {
        &self.stars
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn density_follows_quality() {
        let mut field = Starfield::new(5, 800.0, 600.0, QualityTier::Low);
        assert_eq!(field.stars().len(), 25);

        field.regenerate(800.0, 600.0, QualityTier::Medium);
        assert_eq!(field.stars().len(), 50);
    }

    #[test]
    fn stars_stay_within_the_canvas_and_size_range() {
        let field = Starfield::new(6, 800.0, 600.0, QualityTier::High);
        for star in field.stars() {
            assert!((0.0..=800.0).contains(&star.x));
            assert!((0.0..=600.0).contains(&star.y));
            assert!((0.5..=2.0).contains(&star.size));
        }
    }

    #[test]
    fn slow_motion_halves_scroll_and_bottom_stars_wrap() {
        let mut field = Starfield::new(7, 800.0, 600.0, QualityTier::High);
        field.stars = vec![
            Star {
                x: 10.0,
                y: 100.0,
                size: 1.0,
            },
            Star {
                x: 20.0,
                y: 600.0,
                size: 1.0,
            },
        ];

        field.scroll(800.0, 600.0, true);
        assert_eq!(field.stars()[0].y, 100.5);
        assert_eq!(field.stars()[1].y, -5.0);

        field.scroll(800.0, 600.0, false);
        assert_eq!(field.stars()[0].y, 101.5);
    }
}
