use std::collections::BTreeSet;

use glam::Vec2;

use crate::{Canvas, Color, Rect, SpriteKey};

/// Primitive captured by a [`RecordingCanvas`].
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    /// Filled rectangle.
    FillRect {
        /// Target rectangle.
        rect: Rect,
        /// Fill color.
        color: Color,
    },
    /// Outlined rectangle.
    StrokeRect {
        /// Target rectangle.
        rect: Rect,
        /// Outline thickness.
        thickness: f32,
        /// Outline color.
        color: Color,
    },
    /// Filled circle.
    FillCircle {
        /// Circle centre.
        center: Vec2,
        /// Circle radius.
        radius: f32,
        /// Fill color.
        color: Color,
    },
    /// Outlined circle.
    StrokeCircle {
        /// Circle centre.
        center: Vec2,
        /// Circle radius.
        radius: f32,
        /// Outline thickness.
        thickness: f32,
        /// Outline color.
        color: Color,
    },
    /// Straight segment.
    Line {
        /// Segment start.
        from: Vec2,
        /// Segment end.
        to: Vec2,
        /// Stroke thickness.
        thickness: f32,
        /// Stroke color.
        color: Color,
    },
    /// Filled polygon.
    FillPolygon {
        /// Polygon vertices in drawing order.
        points: Vec<Vec2>,
        /// Fill color.
        color: Color,
    },
    /// Text run.
    Text {
        /// Rendered string.
        text: String,
        /// Baseline origin.
        position: Vec2,
        /// Font size in pixels.
        size: f32,
        /// Text color.
        color: Color,
    },
    /// Sprite stretched over a rectangle.
    Sprite {
        /// Sprite drawn.
        sprite: SpriteKey,
        /// Target rectangle.
        rect: Rect,
    },
}

/// Canvas that stores every primitive instead of drawing it.
///
/// Useful for headless sessions and for asserting on what a frame would paint.
#[derive(Clone, Debug, Default)]
pub struct RecordingCanvas {
    commands: Vec<DrawCommand>,
    sprites: BTreeSet<SpriteKey>,
}

impl RecordingCanvas {
    /// Creates a canvas with no sprites available.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a canvas that reports the provided sprites as available.
    #[must_use]
    pub fn with_sprites<I>(sprites: I) -> Self
    where
        I: IntoIterator<Item = SpriteKey>,
    {
        Self {
            commands: Vec::new(),
            sprites: sprites.into_iter().collect(),
        }
    }

    /// Commands recorded so far.
    #[must_use]
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Drains the recorded commands.
    pub fn take_commands(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }
}

impl Canvas for RecordingCanvas {
    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.commands.push(DrawCommand::FillRect { rect, color });
    }

    fn stroke_rect(&mut self, rect: Rect, thickness: f32, color: Color) {
        self.commands.push(DrawCommand::StrokeRect {
            rect,
            thickness,
            color,
        });
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        self.commands.push(DrawCommand::FillCircle {
            center,
            radius,
            color,
        });
    }

    fn stroke_circle(&mut self, center: Vec2, radius: f32, thickness: f32, color: Color) {
        self.commands.push(DrawCommand::StrokeCircle {
            center,
            radius,
            thickness,
            color,
        });
    }

    fn line(&mut self, from: Vec2, to: Vec2, thickness: f32, color: Color) {
        self.commands.push(DrawCommand::Line {
            from,
            to,
            thickness,
            color,
        });
    }

    fn fill_polygon(&mut self, points: &[Vec2], color: Color) {
        self.commands.push(DrawCommand::FillPolygon {
            points: points.to_vec(),
            color,
        });
    }

    fn text(&mut self, text: &str, position: Vec2, size: f32, color: Color) {
        self.commands.push(DrawCommand::Text {
            text: text.to_owned(),
            position,
            size,
            color,
        });
    }

    fn draw_sprite(&mut self, sprite: SpriteKey, rect: Rect) -> bool {
        if !self.sprites.contains(&sprite) {
            return false;
        }
        self.commands.push(DrawCommand::Sprite { sprite, rect });
        true
    }
}
