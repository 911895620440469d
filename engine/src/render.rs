use std::time::Instant;

use space_shooter_core::{PowerUpKind, QualityTier};
use space_shooter_rendering::{
    draw_boss, draw_bullet, draw_enemy, draw_particle, draw_player, draw_power_up, Canvas, Color,
    Rect,
};
use space_shooter_system_optimizer::batch_particles;

use crate::GameEngine;

/// Translucent fill that leaves motion trails behind moving sprites.
const OVERLAY: Color = Color::new(0.0, 0.0, 20.0 / 255.0, 0.2);

impl GameEngine {
    /// Paints the current frame.
    ///
    /// Nothing is drawn on frames the optimizer asks to skip. The starfield
    /// scrolls as part of drawing, so skipped frames also freeze the backdrop.
    pub fn render(&mut self, canvas: &mut dyn Canvas) {
        if self.optimizer.should_skip_frame() {
            return;
        }
        let started = Instant::now();

        canvas.fill_rect(Rect::new(0.0, 0.0, self.width, self.height), OVERLAY);

        let slowed = self.player.has_power_up(PowerUpKind::SlowMotion);
        self.starfield.scroll(self.width, self.height, slowed);
        self.starfield.draw(canvas);

        draw_player(canvas, &self.player);
        for enemy in &self.enemies {
            draw_enemy(canvas, enemy);
        }
        if let Some(boss) = &self.boss {
            draw_boss(canvas, boss);
        }
        for bullet in self.player_bullets.iter().chain(&self.enemy_bullets) {
            draw_bullet(canvas, bullet);
        }
        for power_up in &self.power_ups {
            draw_power_up(canvas, power_up);
        }
        self.draw_particles(canvas);

        self.optimizer.report_render_time(started.elapsed().as_secs_f32() * 1000.0);
    }

    fn draw_particles(&self, canvas: &mut dyn Canvas) {
        if self.optimizer.quality() != QualityTier::Low {
            for particle in &self.particles {
                draw_particle(canvas, particle);
            }
            return;
        }

        for batch in batch_particles(&self.particles) {
            let color = Color::from(batch.color);
            for rect in batch.rects {
                canvas.fill_rect(Rect::from(rect), color);
            }
        }
    }
}
