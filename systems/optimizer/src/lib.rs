#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Adaptive quality controller that trades visual fidelity for frame rate.
//!
//! The optimizer starts at a tier chosen from a [`DeviceProfile`] and tracks a
//! rolling window of frame times reported by the engine. Sustained low frame
//! rates demote the tier one step at a time; the tier never climbs back within
//! a session. Everything else the engine asks of it (particle caps, frame
//! skipping, level-of-detail thresholds, batched particle drawing) derives from
//! the current tier and the measured frame rate.

mod device;
mod pool;

use std::collections::{HashMap, VecDeque};

use serde::Serialize;
use space_shooter_core::{Aabb, QualityTier, Rgb};
use space_shooter_world::{Bullet, Enemy, Particle};

pub use device::DeviceProfile;
pub use pool::ObjectPool;

const FRAME_WINDOW: usize = 60;
const TARGET_FPS: f32 = 60.0;
const FRAME_DROP_MS: f32 = 33.0;
const DEMOTION_FPS: f32 = 30.0;
const FRAME_SKIP_FPS: f32 = 20.0;
const MIN_OPTIMAL_PARTICLES: u32 = 10;
const MEMORY_PRESSURE: f32 = 0.8;
const BATCH_PARTICLE_SIZE: f32 = 2.0;

/// Maximum live particles allowed at the provided tier.
#[must_use]
pub const fn particle_limit(tier: QualityTier) -> u32 {
    match tier {
        QualityTier::Low => 30,
        QualityTier::Medium => 60,
        QualityTier::High => 100,
    }
}

/// Snapshot of the optimizer's measurements.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceMetrics {
    /// Average frames per second over the rolling window.
    pub average_fps: f32,
    /// Frames that took longer than 33 ms.
    pub frame_drops: u32,
    /// Last reported heap usage as a fraction of the limit.
    pub memory_usage: f32,
    /// Last reported render duration in milliseconds.
    pub render_time_ms: f32,
}

/// Particles sharing one colour, drawn as small squares in a single pass.
#[derive(Clone, Debug, PartialEq)]
pub struct ParticleBatch {
    /// Fill colour shared by the batch.
    pub color: Rgb,
    /// Centred squares, one per particle.
    pub rects: Vec<Aabb>,
}

/// Tier-tracking performance controller threaded through the engine.
#[derive(Debug)]
pub struct GameOptimizer {
    tier: QualityTier,
    adaptive: bool,
    frame_times: VecDeque<f32>,
    metrics: PerformanceMetrics,
    render_skip_counter: u64,
    bullet_pool: ObjectPool<Bullet>,
    particle_pool: ObjectPool<Particle>,
    enemy_pool: ObjectPool<Enemy>,
}

impl GameOptimizer {
    /// Creates an optimizer whose starting tier is detected from the device.
    #[must_use]
    pub fn new(profile: &DeviceProfile) -> Self {
        let tier = profile.detect_tier();
        tracing::info!(
            tier = tier.as_str(),
            user_agent = %profile.user_agent,
            cores = profile.hardware_concurrency,
            "device performance tier detected"
        );
        Self::with_tier(tier, true)
    }

    /// Creates an optimizer pinned to the provided tier; it never demotes.
    #[must_use]
    pub fn fixed(tier: QualityTier) -> Self {
        tracing::info!(tier = tier.as_str(), "quality tier forced");
        Self::with_tier(tier, false)
    }

    fn with_tier(tier: QualityTier, adaptive: bool) -> Self {
        Self {
            tier,
            adaptive,
            frame_times: VecDeque::with_capacity(FRAME_WINDOW + 1),
            metrics: PerformanceMetrics {
                average_fps: TARGET_FPS,
                frame_drops: 0,
                memory_usage: 0.0,
                render_time_ms: 0.0,
            },
            render_skip_counter: 0,
            bullet_pool: ObjectPool::new(50, 25),
            particle_pool: ObjectPool::new(100, 50),
            enemy_pool: ObjectPool::new(30, 15),
        }
    }

    /// Current quality tier.
    #[must_use]
    pub const fn quality(&self) -> QualityTier {
        self.tier
    }

    /// Maximum live particles at the current tier.
    #[must_use]
    pub const fn particle_limit(&self) -> u32 {
        particle_limit(self.tier)
    }

    /// Records the duration of a frame and returns the possibly demoted tier.
    ///
    /// Non-positive or non-finite durations are ignored.
    pub fn report_frame_time(&mut self, delta_ms: f32) -> QualityTier {
        if !delta_ms.is_finite() || delta_ms <= 0.0 {
            return self.tier;
        }

        self.frame_times.push_back(delta_ms);
        if self.frame_times.len() > FRAME_WINDOW {
            let _ = self.frame_times.pop_front();
        }
        let average = self.frame_times.iter().sum::<f32>() / self.frame_times.len() as f32;
        self.metrics.average_fps = 1000.0 / average;

        if delta_ms > FRAME_DROP_MS {
            self.metrics.frame_drops = self.metrics.frame_drops.saturating_add(1);
            self.handle_performance_drop();
        }
        self.tier
    }

    fn handle_performance_drop(&mut self) {
        if !self.adaptive || self.metrics.average_fps >= DEMOTION_FPS {
            return;
        }
        let demoted = self.tier.demoted();
        if demoted != self.tier {
            tracing::info!(
                from = self.tier.as_str(),
                to = demoted.as_str(),
                average_fps = self.metrics.average_fps,
                "reduced quality due to performance issues"
            );
            self.tier = demoted;
        }
    }

    /// Returns whether rendering should be skipped this frame.
    ///
    /// Below 20 FPS every other call reports a skip.
    pub fn should_skip_frame(&mut self) -> bool {
        if self.metrics.average_fps >= FRAME_SKIP_FPS {
            return false;
        }
        self.render_skip_counter = self.render_skip_counter.wrapping_add(1);
        let skip = self.render_skip_counter % 2 == 0;
        if skip {
            tracing::trace!(average_fps = self.metrics.average_fps, "skipping frame");
        }
        skip
    }

    /// Returns whether the particle pool is at capacity.
    #[must_use]
    pub fn should_limit_particles(&self, current: usize) -> bool {
        current >= self.particle_limit() as usize
    }

    /// Particle budget scaled by the measured frame rate.
    #[must_use]
    pub fn optimal_particle_count(&self) -> u32 {
        let scaled = (self.particle_limit() as f32 * (self.metrics.average_fps / TARGET_FPS)).floor();
        (scaled.max(0.0) as u32).max(MIN_OPTIMAL_PARTICLES)
    }

    /// Returns whether an object this far away may be drawn with reduced detail.
    #[must_use]
    pub fn simple_rendering(&self, distance: f32) -> bool {
        let threshold = match self.tier {
            QualityTier::Low => 100.0,
            QualityTier::Medium => 200.0,
            QualityTier::High => 300.0,
        };
        distance > threshold
    }

    /// Records heap usage as a fraction of the limit, trimming pools above 80 %.
    pub fn report_memory_usage(&mut self, fraction: f32) {
        self.metrics.memory_usage = fraction;
        if fraction > MEMORY_PRESSURE {
            let bullets = self.bullet_pool.trim();
            let particles = self.particle_pool.trim();
            let enemies = self.enemy_pool.trim();
            tracing::debug!(bullets, particles, enemies, "performed memory cleanup");
        }
    }

    /// Records how long the last render pass took.
    pub fn report_render_time(&mut self, render_time_ms: f32) {
        self.metrics.render_time_ms = render_time_ms;
    }

    /// Snapshot of current measurements.
    #[must_use]
    pub const fn metrics(&self) -> PerformanceMetrics {
        self.metrics
    }

    /// Pool of retired bullets.
    pub fn bullet_pool(&mut self) -> &mut ObjectPool<Bullet> {
        &mut self.bullet_pool
    }

    /// Pool of retired particles.
    pub fn particle_pool(&mut self) -> &mut ObjectPool<Particle> {
        &mut self.particle_pool
    }

    /// Pool of retired enemies.
    pub fn enemy_pool(&mut self) -> &mut ObjectPool<Enemy> {
        &mut self.enemy_pool
    }
}

/// Groups particles by colour in first-seen order for batched drawing.
#[must_use]
pub fn batch_particles(particles: &[Particle]) -> Vec<ParticleBatch> {
    let mut batches: Vec<ParticleBatch> = Vec::new();
    let mut index_by_color: HashMap<Rgb, usize> = HashMap::new();

    for particle in particles {
        let rect = Aabb::new(particle.x, particle.y, BATCH_PARTICLE_SIZE, BATCH_PARTICLE_SIZE);
        let index = *index_by_color.entry(particle.color).or_insert_with(|| {
            batches.push(ParticleBatch {
                color: particle.color,
                rects: Vec::new(),
            });
            batches.len() - 1
        });
        batches[index].rects.push(rect);
    }
    batches
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_frame_drop_alone_does_not_demote() {
        let mut optimizer = GameOptimizer::fixed(QualityTier::High);
        optimizer.adaptive = true;
        for _ in 0..59 {
            let _ = optimizer.report_frame_time(16.0);
        }
        assert_eq!(optimizer.report_frame_time(40.0), QualityTier::High);
        assert_eq!(optimizer.metrics().frame_drops, 1);
    }

    #[test]
    fn skip_counter_advances_only_when_slow() {
        let mut optimizer = GameOptimizer::fixed(QualityTier::Low);
        assert!(!optimizer.should_skip_frame());
        assert_eq!(optimizer.render_skip_counter, 0);
    }
}
