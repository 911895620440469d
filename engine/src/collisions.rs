use rand::Rng;
use space_shooter_core::{Event, PowerUpKind, Rgb};
use space_shooter_system_spawning::roll_power_up_drop;
use space_shooter_world::{Enemy, PowerUp};

use crate::{effects, level_offset, GameEngine};

const ENEMY_HIT_COLOR: Rgb = Rgb::from_hex(0xffff00);
const BOSS_HIT_COLOR: Rgb = Rgb::from_hex(0xffaa00);
const SHIELD_HIT_COLOR: Rgb = Rgb::from_hex(0x00ffff);
const PLAYER_HIT_COLOR: Rgb = Rgb::from_hex(0xff0000);
const RAM_COLOR: Rgb = Rgb::from_hex(0xff8800);

const BOSS_BASE_REWARD: u32 = 100;
const BOSS_LEVEL_REWARD: u32 = 20;
const BOSS_DROPS: usize = 3;
const BOSS_DROP_SPREAD_X: f32 = 60.0;
const BOSS_DROP_SPREAD_Y: f32 = 40.0;

impl GameEngine {
    /// Resolves every pairwise interaction for the current frame.
    ///
    /// Each category stops at its first match per bullet or per frame, so a
    /// pair is never resolved twice.
    pub(crate) fn handle_collisions(&mut self, now_ms: u64) {
        self.resolve_enemy_hits();
        self.resolve_boss_hits();
        self.resolve_player_hits();
        if self.game_over {
            return;
        }
        self.resolve_rams();
        self.collect_power_ups(now_ms);
    }

    /// Advances the level once enough enemies have been destroyed.
    pub(crate) fn check_level_progression(&mut self) {
        if self.enemies_killed < self.level.saturating_mul(self.config.enemies_per_level) {
            return;
        }

        self.level += 1;
        self.spawning.set_level(self.level);
        tracing::info!(level = self.level, score = self.score, "level up");
        self.events.dispatch(Event::LevelUp {
            level: self.level,
            score: self.score,
        });
        self.events.dispatch(Event::PlaySuccessSound);
    }

    fn resolve_enemy_hits(&mut self) {
        let collision = self.collision;
        for bullet_index in (0..self.player_bullets.len()).rev() {
            let bullet = &self.player_bullets[bullet_index];
            let Some(enemy_index) = self.enemies.iter().rposition(|enemy| {
                !bullet.recently_hit(enemy.id()) && collision.check_collision(bullet, enemy)
            }) else {
                continue;
            };

            let (enemy_x, enemy_y, enemy_id) = {
                let enemy = &self.enemies[enemy_index];
                (enemy.x, enemy.y, enemy.id())
            };
            self.spawn_explosion(enemy_x, enemy_y, ENEMY_HIT_COLOR);

            let bullet = &mut self.player_bullets[bullet_index];
            let burst = bullet
                .should_explode()
                .then_some((bullet.x, bullet.y, bullet.color));
            if bullet.can_penetrate() {
                bullet.on_penetration(enemy_id);
            } else {
                let spent = self.player_bullets.remove(bullet_index);
                self.optimizer.bullet_pool().release(spent);
            }
            if let Some((x, y, color)) = burst {
                self.spawn_explosion(x, y, color);
            }

            if self.enemies[enemy_index].take_damage(1) {
                let enemy = self.enemies.remove(enemy_index);
                self.reward_kill(&enemy);
                self.optimizer.enemy_pool().release(enemy);
            }

            self.events.dispatch(Event::PlayHitSound);
            self.events.dispatch(Event::BulletHit);
        }
    }

    fn reward_kill(&mut self, enemy: &Enemy) {
        let base = 3.0 + level_offset(self.level) * 4.0;
        let points = (base * enemy.kind().score_multiplier()).floor() as u32;
        self.score = self.score.saturating_add(points);
        self.enemies_killed = self.enemies_killed.saturating_add(1);
        self.check_level_progression();

        if let Some(kind) = roll_power_up_drop(enemy.kind(), &mut self.rng) {
            self.power_ups.push(PowerUp::new(enemy.x, enemy.y, kind));
        }

        self.events.dispatch(Event::EnemyDestroyed);
        self.events.dispatch(Event::EnemyKilled);
    }

    fn resolve_boss_hits(&mut self) {
        let Some(boss) = self.boss.as_ref() else {
            return;
        };
        let collision = self.collision;
        let Some(bullet_index) = self
            .player_bullets
            .iter()
            .rposition(|bullet| collision.check_collision(bullet, boss))
        else {
            return;
        };

        let bullet = self.player_bullets.remove(bullet_index);
        self.spawn_explosion(bullet.x, bullet.y, BOSS_HIT_COLOR);
        self.optimizer.bullet_pool().release(bullet);

        let destroyed = self.boss.as_mut().is_some_and(|boss| boss.take_damage(1));
        self.events.dispatch(Event::PlayHitSound);
        if destroyed {
            self.defeat_boss();
        }
    }

    fn defeat_boss(&mut self) {
        let Some(boss) = self.boss.take() else {
            return;
        };

        self.spawn_big_explosion(boss.x, boss.y);
        let reward = BOSS_BASE_REWARD + self.level.saturating_mul(BOSS_LEVEL_REWARD);
        self.score = self.score.saturating_add(reward);

        for _ in 0..BOSS_DROPS {
            let kind = PowerUp::random_kind(&mut self.rng);
            let x = boss.x + (self.rng.gen::<f32>() - 0.5) * BOSS_DROP_SPREAD_X;
            let y = boss.y + (self.rng.gen::<f32>() - 0.5) * BOSS_DROP_SPREAD_Y;
            self.power_ups.push(PowerUp::new(x, y, kind));
        }

        tracing::info!(
            boss = boss.kind().as_str(),
            level = self.level,
            score = self.score,
            "boss defeated"
        );
        self.enemies_killed = self.level.saturating_mul(self.config.enemies_per_level);
        self.check_level_progression();

        self.events.dispatch(Event::BossDefeated {
            level: self.level,
            score: self.score,
        });
        self.events.dispatch(Event::PlaySuccessSound);
    }

    fn resolve_player_hits(&mut self) {
        for index in (0..self.enemy_bullets.len()).rev() {
            if !self
                .collision
                .check_collision(&self.enemy_bullets[index], &self.player)
            {
                continue;
            }

            let bullet = self.enemy_bullets.remove(index);
            if self.player.is_shielded() {
                self.spawn_explosion(bullet.x, bullet.y, SHIELD_HIT_COLOR);
                self.optimizer.bullet_pool().release(bullet);
                continue;
            }

            self.spawn_explosion(self.player.x, self.player.y, PLAYER_HIT_COLOR);
            self.optimizer.bullet_pool().release(bullet);
            self.lose_life();
            break;
        }
    }

    fn resolve_rams(&mut self) {
        let collision = self.collision;
        let player = &self.player;
        let Some(index) = self
            .enemies
            .iter()
            .rposition(|enemy| collision.check_collision(enemy, player))
        else {
            return;
        };

        let enemy = self.enemies.remove(index);
        self.spawn_explosion(enemy.x, enemy.y, RAM_COLOR);
        self.optimizer.enemy_pool().release(enemy);
        self.lose_life();
    }

    fn collect_power_ups(&mut self, now_ms: u64) {
        let collision = self.collision;
        let player = &self.player;
        let Some(index) = self
            .power_ups
            .iter()
            .rposition(|power_up| collision.check_collision(power_up, player))
        else {
            return;
        };

        let power_up = self.power_ups.remove(index);
        match power_up.kind() {
            PowerUpKind::ExtraLife => self.lives = self.lives.saturating_add(1),
            kind => self.player.apply_power_up(kind, now_ms),
        }
        self.spawn_explosion(power_up.x, power_up.y, power_up.color());
        tracing::debug!(power_up = power_up.kind().as_str(), "power-up collected");

        self.events.dispatch(Event::PlaySuccessSound);
        self.events.dispatch(Event::PowerUpCollected);
    }

    fn lose_life(&mut self) {
        self.lives = self.lives.saturating_sub(1);
        self.events.dispatch(Event::PlayHitSound);
        self.events.dispatch(Event::PlayerHit);

        if self.lives == 0 {
            self.game_over = true;
            tracing::info!(score = self.score, level = self.level, "game over");
        }
    }

    fn spawn_explosion(&mut self, x: f32, y: f32, color: Rgb) {
        if self.optimizer.should_limit_particles(self.particles.len()) {
            return;
        }
        let burst = effects::explosion(x, y, color, self.optimizer.quality(), &mut self.rng);
        self.particles.extend(burst);
    }

    fn spawn_big_explosion(&mut self, x: f32, y: f32) {
        if self.optimizer.should_limit_particles(self.particles.len()) {
            self.spawn_explosion(x, y, effects::BIG_EXPLOSION_FALLBACK);
            return;
        }
        let burst = effects::big_explosion(x, y, self.optimizer.quality(), &mut self.rng);
        self.particles.extend(burst);
    }
}
