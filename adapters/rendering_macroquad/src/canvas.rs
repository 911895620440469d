use glam::Vec2;
use macroquad::{math::Vec2 as MacroquadVec2, shapes, text::draw_text};
use space_shooter_rendering::{Canvas, Color, Rect, SpriteKey};

use crate::{sprites::SpriteAtlas, to_macroquad_color};

/// Canvas that paints straight to the macroquad window.
#[derive(Debug)]
pub(crate) struct MacroquadCanvas<'a> {
    atlas: Option<&'a SpriteAtlas>,
}

impl<'a> MacroquadCanvas<'a> {
    pub(crate) const fn new(atlas: Option<&'a SpriteAtlas>) -> Self {
        Self { atlas }
    }
}

impl Canvas for MacroquadCanvas<'_> {
    fn fill_rect(&mut self, rect: Rect, color: Color) {
        shapes::draw_rectangle(
            rect.x,
            rect.y,
            rect.width,
            rect.height,
            to_macroquad_color(color),
        );
    }

    fn stroke_rect(&mut self, rect: Rect, thickness: f32, color: Color) {
        shapes::draw_rectangle_lines(
            rect.x,
            rect.y,
            rect.width,
            rect.height,
            thickness,
            to_macroquad_color(color),
        );
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        shapes::draw_circle(center.x, center.y, radius, to_macroquad_color(color));
    }

    fn stroke_circle(&mut self, center: Vec2, radius: f32, thickness: f32, color: Color) {
        shapes::draw_circle_lines(
            center.x,
            center.y,
            radius,
            thickness,
            to_macroquad_color(color),
        );
    }

    fn line(&mut self, from: Vec2, to: Vec2, thickness: f32, color: Color) {
        shapes::draw_line(from.x, from.y, to.x, to.y, thickness, to_macroquad_color(color));
    }

    fn fill_polygon(&mut self, points: &[Vec2], color: Color) {
        let color = to_macroquad_color(color);
        for [a, b, c] in fan_triangles(points) {
            shapes::draw_triangle(
                to_macroquad_vec(a),
                to_macroquad_vec(b),
                to_macroquad_vec(c),
                color,
            );
        }
    }

    fn text(&mut self, text: &str, position: Vec2, size: f32, color: Color) {
        let _ = draw_text(text, position.x, position.y, size, to_macroquad_color(color));
    }

    fn draw_sprite(&mut self, sprite: SpriteKey, rect: Rect) -> bool {
        self.atlas.is_some_and(|atlas| atlas.draw(sprite, rect))
    }
}

fn to_macroquad_vec(point: Vec2) -> MacroquadVec2 {
    MacroquadVec2::new(point.x, point.y)
}

/// Splits a polygon into triangles fanning out from its centroid.
///
/// Exact for convex and star-shaped outlines, which is all the painters emit.
fn fan_triangles(points: &[Vec2]) -> Vec<[Vec2; 3]> {
    if points.len() < 3 {
        return Vec::new();
    }

    let centroid = points.iter().copied().sum::<Vec2>() / points.len() as f32;
    points
        .iter()
        .zip(points.iter().cycle().skip(1))
        .map(|(&from, &to)| [centroid, from, to])
        .collect()
}
