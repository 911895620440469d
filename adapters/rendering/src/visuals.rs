//! Procedural painters for every simulation entity.

use std::f32::consts::TAU;

use glam::Vec2;
use space_shooter_core::{BossKind, EnemyKind, PowerUpKind};
use space_shooter_world::{Boss, Bullet, BulletOwner, EffectType, Enemy, Particle, Player, PowerUp};

use crate::{Canvas, Color, Rect, SpriteKey};

const SHIELD_RING: Color = Color::from_hex(0x00ffff);
const WARNING_YELLOW: Color = Color::from_hex(0xffff00);
const HEART_SEGMENTS: usize = 8;

/// Paints the player's ship and, while shielded, its shield ring.
pub fn draw_player(canvas: &mut dyn Canvas, player: &Player) {
    let (x, y, w, h) = (player.x, player.y, player.width, player.height);

    if player.is_shielded() {
        canvas.stroke_circle(Vec2::new(x, y), w / 2.0 + 10.0, 3.0, SHIELD_RING);
    }

    let hull = Rect::centered(x, y, w, h);
    if canvas.draw_sprite(SpriteKey::PlayerShip, hull) {
        return;
    }
    canvas.fill_rect(hull, Color::from_hex(0x00ff00));
    canvas.fill_rect(
        Rect::new(x - w / 4.0, y - h / 2.0, w / 2.0, 5.0),
        Color::from_hex(0x00aa00),
    );
    canvas.fill_rect(
        Rect::new(x - 3.0, y + h / 2.0, 6.0, 8.0),
        Color::from_hex(0x0088ff),
    );
}

/// Paints an enemy according to its variant.
pub fn draw_enemy(canvas: &mut dyn Canvas, enemy: &Enemy) {
    let (x, y, w, h) = (enemy.x, enemy.y, enemy.width, enemy.height);
    let hull = Rect::centered(x, y, w, h);

    match enemy.kind() {
        EnemyKind::Basic => {
            if canvas.draw_sprite(SpriteKey::EnemyShip, hull) {
                return;
            }
            canvas.fill_rect(hull, Color::from_hex(0xff0000));
            canvas.fill_rect(
                Rect::new(x - w / 4.0, y + h / 2.0 - 5.0, w / 2.0, 5.0),
                Color::from_hex(0xaa0000),
            );
            canvas.fill_rect(Rect::new(x - 2.0, y - h / 2.0 - 5.0, 4.0, 5.0), WARNING_YELLOW);
        }
        EnemyKind::Scout => {
            let body = Color::from_hex(0x00aaff);
            if enemy.is_dashing() {
                canvas.stroke_rect(
                    Rect::centered(x, y, w + 6.0, h + 6.0),
                    2.0,
                    body.with_alpha(0.5),
                );
            }
            canvas.fill_rect(hull, body);
            canvas.fill_polygon(
                &[
                    Vec2::new(x, y - h / 2.0),
                    Vec2::new(x - w / 3.0, y + h / 4.0),
                    Vec2::new(x + w / 3.0, y + h / 4.0),
                ],
                Color::from_hex(0x0088cc),
            );
        }
        EnemyKind::Heavy => {
            canvas.fill_rect(hull, Color::from_hex(0xaa2222));
            canvas.fill_rect(
                Rect::new(x - w / 3.0, y - h / 3.0, w * 2.0 / 3.0, h * 2.0 / 3.0),
                Color::from_hex(0x666666),
            );
            if enemy.shield() > 0 {
                canvas.stroke_circle(Vec2::new(x, y), w / 2.0 + 5.0, 2.0, SHIELD_RING);
            }
        }
        EnemyKind::Bomber => {
            canvas.fill_rect(hull, Color::from_hex(0x228822));
            canvas.fill_rect(
                Rect::new(x - w / 4.0, y + h / 4.0, w / 2.0, h / 4.0),
                Color::from_hex(0xff6600),
            );
            let wing = Color::from_hex(0x114411);
            canvas.fill_rect(Rect::new(x - w / 2.0 - 5.0, y - h / 6.0, 5.0, h / 3.0), wing);
            canvas.fill_rect(Rect::new(x + w / 2.0, y - h / 6.0, 5.0, h / 3.0), wing);
        }
        EnemyKind::Kamikaze => {
            canvas.fill_rect(hull, Color::from_hex(0xff2222));
            for stripe in 0..3 {
                let stripe_y = y - h / 2.0 + stripe as f32 * h / 3.0;
                canvas.fill_rect(Rect::new(x - w / 2.0, stripe_y, w, 2.0), WARNING_YELLOW);
            }
            if enemy.is_charging() {
                canvas.fill_rect(
                    Rect::new(x - w / 4.0, y + h / 2.0, w / 2.0, 8.0),
                    Color::from_hex(0xffaa00),
                );
            }
        }
    }
}

/// Paints a boss hull followed by its health bar.
pub fn draw_boss(canvas: &mut dyn Canvas, boss: &Boss) {
    let (x, y, w, h) = (boss.x, boss.y, boss.width, boss.height);
    let hull = Rect::centered(x, y, w, h);

    if !canvas.draw_sprite(SpriteKey::Boss, hull) {
        let mut body = match boss.kind() {
            BossKind::Destroyer => Color::from_hex(0x8b0000),
            BossKind::Mothership => Color::from_hex(0x4b0082),
            BossKind::Dreadnought => Color::from_hex(0x800080),
        };
        if boss.health_fraction() < 0.3 {
            body = body.lighten(0.2);
        }
        canvas.fill_rect(hull, body);
        canvas.fill_rect(
            Rect::new(x - w / 4.0, y - h / 4.0, w / 2.0, h / 2.0),
            Color::from_hex(0xff0000),
        );
        for port in -1..=1 {
            canvas.fill_rect(
                Rect::new(x + port as f32 * (w / 6.0), y + h / 2.0 - 5.0, 6.0, 8.0),
                WARNING_YELLOW,
            );
        }
    }

    draw_health_bar(canvas, boss);
}

fn draw_health_bar(canvas: &mut dyn Canvas, boss: &Boss) {
    let bar_width = boss.width + 20.0;
    let bar = Rect::new(
        boss.x - bar_width / 2.0,
        boss.y - boss.height / 2.0 - 20.0,
        bar_width,
        8.0,
    );
    let fraction = boss.health_fraction();
    let fill = if fraction > 0.5 {
        Color::from_hex(0x00ff00)
    } else if fraction > 0.25 {
        WARNING_YELLOW
    } else {
        Color::from_hex(0xff0000)
    };

    canvas.fill_rect(bar, Color::from_hex(0x333333));
    canvas.fill_rect(Rect::new(bar.x, bar.y, bar.width * fraction, bar.height), fill);
    canvas.stroke_rect(bar, 1.0, Color::WHITE);
}

/// Paints a bullet's trail, body, and sparkles.
pub fn draw_bullet(canvas: &mut dyn Canvas, bullet: &Bullet) {
    let color = Color::from(bullet.color);
    let trail = bullet.trail();
    for (previous, current) in trail.iter().zip(trail.iter().skip(1)) {
        canvas.line(
            Vec2::new(previous.x, previous.y),
            Vec2::new(current.x, current.y),
            (current.size * 0.3).max(1.0),
            color.with_alpha(current.alpha * 0.6),
        );
    }

    let center = Vec2::new(bullet.x, bullet.y);
    let (w, h) = (bullet.width, bullet.height);
    let pulse_time = bullet.pulse_time();

    match bullet.effect() {
        EffectType::Explosive => {
            canvas.fill_circle(center, w / 2.0, color);
            for stripe in 0..4 {
                let angle = stripe as f32 / 4.0 * TAU;
                canvas.line(center, center + Vec2::from_angle(angle) * (w / 3.0), 2.0, WARNING_YELLOW);
            }
        }
        EffectType::Piercing => {
            canvas.fill_polygon(
                &[
                    Vec2::new(center.x, center.y - h / 2.0),
                    Vec2::new(center.x + w / 3.0, center.y),
                    Vec2::new(center.x, center.y + h / 2.0),
                    Vec2::new(center.x - w / 3.0, center.y),
                ],
                color,
            );
            canvas.line(
                Vec2::new(center.x, center.y - h / 3.0),
                Vec2::new(center.x, center.y + h / 3.0),
                2.0,
                Color::WHITE,
            );
        }
        EffectType::Energy => {
            let radius = w / 2.0 * ((pulse_time * 3.0).sin() * 0.3 + 1.0);
            canvas.fill_circle(center, radius, color);
            for ring in 1..=3 {
                canvas.stroke_circle(
                    center,
                    radius + ring as f32 * 3.0,
                    1.0,
                    color.with_alpha(0.6 / ring as f32),
                );
            }
        }
        EffectType::Charged => {
            let intensity = (pulse_time * 4.0).sin() * 0.5 + 1.0;
            canvas.fill_circle(center, w / 2.0, color);
            let arc = Color::WHITE.with_alpha(intensity * 0.8);
            for spoke in 0..6 {
                let angle = spoke as f32 / 6.0 * TAU + bullet.rotation_angle();
                canvas.line(center, center + Vec2::from_angle(angle) * (w * 0.4 * intensity), 2.0, arc);
            }
            draw_sparkles(canvas, bullet, 4);
        }
        EffectType::Ultimate => {
            let intensity = (pulse_time * 6.0).sin() * 0.4 + 1.2;
            let layers = [
                (w * 0.6, Color::WHITE.with_alpha(0.9)),
                (w * 0.4, color),
                (w * 0.2, Color::WHITE.with_alpha(0.8)),
            ];
            for (radius, layer) in layers {
                canvas.fill_circle(center, radius * intensity, layer);
            }
            for ring in 1..=2 {
                canvas.stroke_circle(
                    center,
                    w * ring as f32 * intensity,
                    3.0,
                    color.with_alpha(0.5 / ring as f32),
                );
            }
            draw_sparkles(canvas, bullet, 8);
        }
        EffectType::Basic | EffectType::Bouncing | EffectType::Splitting => {
            let body = Rect::centered(center.x, center.y, w, h);
            match bullet.owner() {
                BulletOwner::Player => {
                    if !canvas.draw_sprite(SpriteKey::PlayerRocket, body) {
                        canvas.fill_rect(body, color);
                    }
                }
                BulletOwner::Enemy => {
                    if !canvas.draw_sprite(SpriteKey::EnemyRocket, body) {
                        canvas.fill_circle(center, w / 2.0, color);
                    }
                }
            }
        }
    }
}

fn draw_sparkles(canvas: &mut dyn Canvas, bullet: &Bullet, count: u32) {
    let pulse_time = bullet.pulse_time();
    let distance = bullet.width * 0.8 + (pulse_time * 2.0).sin() * 5.0;
    let sparkle = Color::WHITE.with_alpha(0.8);
    for index in 0..count {
        let angle = index as f32 / count as f32 * TAU + pulse_time;
        let position = Vec2::new(bullet.x, bullet.y) + Vec2::from_angle(angle) * distance;
        canvas.fill_circle(position, 1.0, sparkle);
    }
}

/// Paints a falling power-up icon.
pub fn draw_power_up(canvas: &mut dyn Canvas, power_up: &PowerUp) {
    let center = Vec2::new(power_up.x, power_up.y);
    let size = power_up.width / 2.0;
    let color = Color::from(power_up.color());
    let glow = 0.7 + 0.3 * (power_up.pulse_time() * 3.0).sin();

    canvas.fill_circle(center, size + 4.0, color.with_alpha(0.25 * glow));

    match power_up.kind() {
        PowerUpKind::Shield => {
            let points = [
                Vec2::new(0.0, -size),
                Vec2::new(size * 0.7, -size * 0.3),
                Vec2::new(size * 0.7, size * 0.3),
                Vec2::new(0.0, size),
                Vec2::new(-size * 0.7, size * 0.3),
                Vec2::new(-size * 0.7, -size * 0.3),
            ]
            .map(|offset| center + offset);
            canvas.fill_polygon(&points, color);
            stroke_polygon(canvas, &points, 2.0, Color::WHITE);
        }
        PowerUpKind::SlowMotion => {
            canvas.fill_circle(center, size * 0.8, color);
            canvas.stroke_circle(center, size * 0.8, 2.0, Color::WHITE);
            canvas.line(center, center - Vec2::new(0.0, size * 0.5), 2.0, Color::BLACK);
            canvas.line(center, center + Vec2::new(size * 0.3, 0.0), 2.0, Color::BLACK);
        }
        PowerUpKind::RapidFire => {
            for row in 0..3 {
                let offset = (row as f32 - 1.0) * size * 0.4;
                draw_arrow(canvas, center + Vec2::new(0.0, offset), 0.0, size);
            }
        }
        PowerUpKind::MultiShot => {
            for angle in [-0.3, 0.0, 0.3] {
                draw_arrow(canvas, center, angle, size);
            }
        }
        PowerUpKind::ExtraLife => {
            let points = heart_outline(center, size);
            canvas.fill_polygon(&points, color);
            stroke_polygon(canvas, &points, 2.0, Color::WHITE);
        }
    }
}

fn draw_arrow(canvas: &mut dyn Canvas, origin: Vec2, angle: f32, size: f32) {
    let rotation = Vec2::from_angle(angle);
    let point = |x: f32, y: f32| origin + rotation.rotate(Vec2::new(x * size, y * size));
    let tip = point(0.5, 0.0);
    canvas.line(point(-0.5, 0.0), tip, 2.0, Color::WHITE);
    canvas.line(tip, point(0.3, -0.2), 2.0, Color::WHITE);
    canvas.line(tip, point(0.3, 0.2), 2.0, Color::WHITE);
}

fn heart_outline(center: Vec2, size: f32) -> Vec<Vec2> {
    let at = |x: f32, y: f32| center + Vec2::new(x * size, y * size);
    let lobes = [
        [at(0.0, 0.3), at(-1.0, -0.3), at(-1.0, -0.8), at(0.0, -0.5)],
        [at(0.0, -0.5), at(1.0, -0.8), at(1.0, -0.3), at(0.0, 0.3)],
    ];

    let mut points = Vec::with_capacity(HEART_SEGMENTS * 2);
    for [p0, p1, p2, p3] in lobes {
        for step in 0..HEART_SEGMENTS {
            let t = step as f32 / HEART_SEGMENTS as f32;
            let u = 1.0 - t;
            points.push(
                p0 * (u * u * u) + p1 * (3.0 * u * u * t) + p2 * (3.0 * u * t * t) + p3 * (t * t * t),
            );
        }
    }
    points
}

fn stroke_polygon(canvas: &mut dyn Canvas, points: &[Vec2], thickness: f32, color: Color) {
    for (index, from) in points.iter().enumerate() {
        let to = points[(index + 1) % points.len()];
        canvas.line(*from, to, thickness, color);
    }
}

/// Paints a single fading particle.
pub fn draw_particle(canvas: &mut dyn Canvas, particle: &Particle) {
    let size = particle.size();
    canvas.fill_rect(
        Rect::centered(particle.x, particle.y, size, size),
        Color::from(particle.color).with_alpha(particle.alpha()),
    );
}
