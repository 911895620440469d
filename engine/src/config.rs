use serde::Deserialize;
use space_shooter_system_spawning::Config as SpawnConfig;

use crate::EngineError;

/// Tunables for a game session.
///
/// Every field is optional in the TOML document; omitted fields keep the
/// arcade defaults.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Seed for the session's random stream; a fresh seed is drawn when absent.
    pub seed: Option<u64>,
    /// Lives granted at the start of a session.
    pub initial_lives: u32,
    /// Kills required per level before the next one unlocks.
    pub enemies_per_level: u32,
    /// Every level divisible by this value hosts a boss; zero disables bosses.
    pub boss_level_interval: u32,
    /// Frames between enemy spawns on the first level.
    pub base_enemy_spawn_delay: u32,
    /// Lower bound for the spawn delay on later levels.
    pub min_enemy_spawn_delay: u32,
    /// Frames removed from the spawn delay per level.
    pub enemy_spawn_delay_step: u32,
    /// Frames between player volleys.
    pub base_fire_delay: u32,
    /// Frames between player volleys while rapid fire is active.
    pub rapid_fire_delay: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            seed: None,
            initial_lives: 3,
            enemies_per_level: 10,
            boss_level_interval: 5,
            base_enemy_spawn_delay: 120,
            min_enemy_spawn_delay: 30,
            enemy_spawn_delay_step: 15,
            base_fire_delay: 15,
            rapid_fire_delay: 5,
        }
    }
}

impl EngineConfig {
    /// Parses and validates a TOML configuration document.
    pub fn from_toml_str(contents: &str) -> Result<Self, EngineError> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Overrides the seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Checks that every value can drive a session.
    pub fn validate(&self) -> Result<(), EngineError> {
        let invalid = |field, reason| Err(EngineError::InvalidConfig { field, reason });

        if self.initial_lives == 0 {
            return invalid("initial_lives", "must be at least 1");
        }
        if self.enemies_per_level == 0 {
            return invalid("enemies_per_level", "must be at least 1");
        }
        if self.base_enemy_spawn_delay == 0 {
            return invalid("base_enemy_spawn_delay", "must be at least 1");
        }
        if self.min_enemy_spawn_delay > self.base_enemy_spawn_delay {
            return invalid("min_enemy_spawn_delay", "must not exceed base_enemy_spawn_delay");
        }
        if self.base_fire_delay == 0 || self.rapid_fire_delay == 0 {
            return invalid("base_fire_delay", "fire delays must be at least 1");
        }
        Ok(())
    }

    pub(crate) fn spawn_config(&self) -> SpawnConfig {
        SpawnConfig::new(
            self.base_enemy_spawn_delay,
            self.min_enemy_spawn_delay,
            self.enemy_spawn_delay_step,
            self.boss_level_interval,
        )
    }
}
