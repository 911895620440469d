#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Simulation entities that populate the play field.
//!
//! Every entity is a plain data owner with a per-frame `update`. Entities never
//! reach for global time or randomness: wall-clock timestamps arrive as
//! `now_ms` arguments and random draws come from a caller-supplied [`rand::Rng`].
//! Spatial queries go through [`space_shooter_core::Bounded`], which every
//! entity implements with a centred bounding box.

mod boss;
mod bullet;
mod enemy;
mod particle;
mod player;
mod power_up;

pub use boss::{Boss, BossShot};
pub use bullet::{
    damage_for, energy_cost_for, Bullet, BulletOwner, BulletSize, EffectType, Projectile,
    TrailPoint,
};
pub use enemy::{Enemy, EnemyAction, EnemyContext};
pub use particle::Particle;
pub use player::{ActivePowerUp, Player, PLAYER_BOTTOM_OFFSET, PLAYER_HEIGHT, PLAYER_WIDTH};
pub use power_up::{color_for, PowerUp};
