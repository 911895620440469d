#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Space Shooter adapters.
//!
//! Entities never draw themselves. Instead the engine walks its collections and
//! hands each entity to the procedural painters in this crate, which issue
//! primitive commands against a backend-agnostic [`Canvas`]. Backends decide
//! whether a [`SpriteKey`] is available; when it is not, the painters fall
//! back to vector shapes so a missing image never fails a frame.

mod recording;
mod visuals;

use anyhow::Result as AnyResult;
use glam::Vec2;
use space_shooter_core::{Aabb, Rgb};
use std::{ops::ControlFlow, time::Duration};

pub use recording::{DrawCommand, RecordingCanvas};
pub use visuals::{draw_boss, draw_bullet, draw_enemy, draw_particle, draw_player, draw_power_up};

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Opaque white.
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);
    /// Opaque black.
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0, 1.0);

    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Creates an opaque color from a packed `0xRRGGBB` literal.
    #[must_use]
    pub const fn from_hex(packed: u32) -> Self {
        Self::from_rgb_u8(
            ((packed >> 16) & 0xff) as u8,
            ((packed >> 8) & 0xff) as u8,
            (packed & 0xff) as u8,
        )
    }

    /// Returns the same color with its alpha replaced, clamped to `0.0..=1.0`.
    #[must_use]
    pub fn with_alpha(self, alpha: f32) -> Self {
        Self {
            alpha: alpha.clamp(0.0, 1.0),
            ..self
        }
    }

    /// Returns a new color lightened towards white by the provided amount.
    #[must_use]
    pub fn lighten(self, amount: f32) -> Self {
        let amount = amount.clamp(0.0, 1.0);

        Self {
            red: lighten_channel(self.red, amount),
            green: lighten_channel(self.green, amount),
            blue: lighten_channel(self.blue, amount),
            alpha: self.alpha,
        }
    }
}

fn lighten_channel(channel: f32, amount: f32) -> f32 {
    channel + (1.0 - channel) * amount
}

impl From<Rgb> for Color {
    fn from(value: Rgb) -> Self {
        Self::from_rgb_u8(value.red(), value.green(), value.blue())
    }
}

/// Axis-aligned rectangle anchored at its top-left corner.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    /// Left edge in canvas pixels.
    pub x: f32,
    /// Top edge in canvas pixels.
    pub y: f32,
    /// Width in pixels.
    pub width: f32,
    /// Height in pixels.
    pub height: f32,
}

impl Rect {
    /// Creates a rectangle from its top-left corner and extent.
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Creates a rectangle centred on the provided point.
    #[must_use]
    pub fn centered(center_x: f32, center_y: f32, width: f32, height: f32) -> Self {
        Self::new(center_x - width / 2.0, center_y - height / 2.0, width, height)
    }
}

impl From<Aabb> for Rect {
    fn from(value: Aabb) -> Self {
        Self::centered(value.x, value.y, value.width, value.height)
    }
}

/// Optional images a backend may provide in place of procedural shapes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SpriteKey {
    /// The player's ship.
    PlayerShip,
    /// The basic enemy fighter.
    EnemyShip,
    /// Every boss hull.
    Boss,
    /// Basic player projectile.
    PlayerRocket,
    /// Basic enemy projectile.
    EnemyRocket,
}

impl SpriteKey {
    /// All sprite keys in canonical order.
    pub const ALL: [SpriteKey; 5] = [
        SpriteKey::PlayerShip,
        SpriteKey::EnemyShip,
        SpriteKey::Boss,
        SpriteKey::PlayerRocket,
        SpriteKey::EnemyRocket,
    ];

    /// Name used for the sprite in asset manifests.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            SpriteKey::PlayerShip => "PlayerShip",
            SpriteKey::EnemyShip => "EnemyShip",
            SpriteKey::Boss => "Boss",
            SpriteKey::PlayerRocket => "PlayerRocket",
            SpriteKey::EnemyRocket => "EnemyRocket",
        }
    }
}

/// Immediate-mode drawing surface implemented by each backend.
///
/// Coordinates are canvas pixels with the origin at the top-left corner.
pub trait Canvas {
    /// Fills a rectangle.
    fn fill_rect(&mut self, rect: Rect, color: Color);

    /// Outlines a rectangle.
    fn stroke_rect(&mut self, rect: Rect, thickness: f32, color: Color);

    /// Fills a circle.
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color);

    /// Outlines a circle.
    fn stroke_circle(&mut self, center: Vec2, radius: f32, thickness: f32, color: Color);

    /// Draws a straight segment.
    fn line(&mut self, from: Vec2, to: Vec2, thickness: f32, color: Color);

    /// Fills a closed polygon that is star-shaped around its centroid.
    fn fill_polygon(&mut self, points: &[Vec2], color: Color);

    /// Draws text with its baseline starting at `position`.
    fn text(&mut self, text: &str, position: Vec2, size: f32, color: Color);

    /// Stretches a sprite over `rect`, returning `false` when the sprite is unavailable.
    fn draw_sprite(&mut self, sprite: SpriteKey, rect: Rect) -> bool;
}

/// Input snapshot gathered by adapters before advancing a frame.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct FrameInput {
    /// Whether a move-left key is held.
    pub move_left: bool,
    /// Whether a move-right key is held.
    pub move_right: bool,
    /// Pointer or touch position as a fraction of the canvas width, while pressed.
    pub pointer_x: Option<f32>,
    /// Whether a start key was pressed on this frame.
    pub start: bool,
    /// Whether a restart key was pressed on this frame.
    pub restart: bool,
    /// Whether a quit key was pressed on this frame.
    pub quit: bool,
    /// Current drawable size in pixels.
    pub canvas_size: Vec2,
}

/// Window configuration requested by the session driver.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Initial drawable size in pixels.
    pub canvas_size: Vec2,
    /// Solid color used to clear the window before the first frame.
    pub clear_color: Color,
    /// Whether the backend should overlay a frame-rate counter.
    pub show_fps: bool,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, canvas_size: Vec2, clear_color: Color) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            canvas_size,
            clear_color,
            show_fps: false,
        }
    }

    /// Enables or disables the frame-rate overlay.
    #[must_use]
    pub fn with_fps_overlay(mut self, show_fps: bool) -> Self {
        self.show_fps = show_fps;
        self
    }
}

/// Rendering backend capable of presenting Space Shooter sessions.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `frame` closure receives the measured frame delta, the input
    /// captured by the adapter, and the canvas to paint for that frame. The
    /// backend stops once the closure returns [`ControlFlow::Break`].
    fn run<F>(self, presentation: Presentation, frame: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut dyn Canvas) -> ControlFlow<()> + 'static;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_colors_normalise_channels() {
        let color = Color::from_hex(0xff_80_00);
        assert_eq!(color.red, 1.0);
        assert!((color.green - 128.0 / 255.0).abs() < f32::EPSILON);
        assert_eq!(color.blue, 0.0);
        assert_eq!(color.alpha, 1.0);
    }

    #[test]
    fn with_alpha_clamps() {
        assert_eq!(Color::WHITE.with_alpha(1.5).alpha, 1.0);
        assert_eq!(Color::WHITE.with_alpha(-0.5).alpha, 0.0);
    }

    #[test]
    fn lighten_moves_towards_white() {
        let lightened = Color::new(0.5, 0.0, 1.0, 0.4).lighten(0.5);
        assert_eq!(lightened, Color::new(0.75, 0.5, 1.0, 0.4));
    }

    #[test]
    fn entity_colors_convert_to_opaque_colors() {
        assert_eq!(Color::from(Rgb::from_hex(0x00ffff)), Color::from_hex(0x00ffff));
    }

    #[test]
    fn centred_boxes_become_top_left_rects() {
        let rect = Rect::from(Aabb::new(100.0, 50.0, 40.0, 20.0));
        assert_eq!(rect, Rect::new(80.0, 40.0, 40.0, 20.0));
    }

    #[test]
    fn sprite_names_are_unique() {
        let mut names: Vec<_> = SpriteKey::ALL.iter().map(|key| key.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), SpriteKey::ALL.len());
    }
}
