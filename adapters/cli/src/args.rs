use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use space_shooter_core::QualityTier;
use space_shooter_engine::EngineConfig;
use tracing::Level;

/// Quality tiers accepted on the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum QualityArg {
    Low,
    Medium,
    High,
}

impl From<QualityArg> for QualityTier {
    fn from(value: QualityArg) -> Self {
        match value {
            QualityArg::Low => QualityTier::Low,
            QualityArg::Medium => QualityTier::Medium,
            QualityArg::High => QualityTier::High,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "space-shooter")]
#[command(about = "Arcade space shooter with bosses, power-ups and adaptive quality")]
pub(crate) struct Args {
    /// Engine configuration file (TOML)
    #[arg(long, value_name = "FILE")]
    pub(crate) config: Option<PathBuf>,

    /// Seed for the session's random stream; overrides the configuration file
    #[arg(long)]
    pub(crate) seed: Option<u64>,

    /// Canvas width in pixels
    #[arg(long, default_value_t = 800.0)]
    pub(crate) width: f32,

    /// Canvas height in pixels
    #[arg(long, default_value_t = 600.0)]
    pub(crate) height: f32,

    /// Force a quality tier instead of detecting one and adapting at runtime
    #[arg(long, value_enum)]
    pub(crate) quality: Option<QualityArg>,

    /// Synchronise presentation with the display refresh rate
    #[arg(long, overrides_with = "no_vsync")]
    vsync: bool,

    /// Render as fast as possible
    #[arg(long = "no-vsync", overrides_with = "vsync")]
    no_vsync: bool,

    /// Overlay and log the measured frame rate
    #[arg(long)]
    pub(crate) show_fps: bool,

    /// Sprite manifest to load instead of assets/manifest.toml
    #[arg(long, value_name = "MANIFEST", conflicts_with = "no_sprites")]
    pub(crate) sprites: Option<PathBuf>,

    /// Draw every entity procedurally
    #[arg(long)]
    pub(crate) no_sprites: bool,

    /// Simulate without a window and print the final state as JSON
    #[arg(long)]
    pub(crate) headless: bool,

    /// Frames to simulate in headless mode
    #[arg(long, default_value_t = 3_600, value_parser = clap::value_parser!(u64).range(1..))]
    pub(crate) frames: u64,

    /// Default log level; RUST_LOG directives take precedence
    #[arg(long, default_value = "info")]
    pub(crate) log_level: Level,
}

impl Args {
    /// Requested swap behaviour, or `None` for the platform default.
    pub(crate) fn vsync(&self) -> Option<bool> {
        if self.no_vsync {
            Some(false)
        } else if self.vsync {
            Some(true)
        } else {
            None
        }
    }

    /// Loads the engine configuration and applies command-line overrides.
    pub(crate) fn engine_config(&self) -> Result<EngineConfig> {
        let config = match &self.config {
            Some(path) => {
                let contents = fs::read_to_string(path).with_context(|| {
                    format!("failed to read engine config at {}", path.display())
                })?;
                EngineConfig::from_toml_str(&contents).with_context(|| {
                    format!("invalid engine config at {}", path.display())
                })?
            }
            None => EngineConfig::default(),
        };

        Ok(match self.seed {
            Some(seed) => config.with_seed(seed),
            None => config,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("space-shooter").chain(args.iter().copied()))
            .expect("arguments should parse")
    }

    #[test]
    fn defaults_describe_a_windowed_session() {
        let args = parse(&[]);

        assert_eq!(args.width, 800.0);
        assert_eq!(args.height, 600.0);
        assert_eq!(args.quality, None);
        assert_eq!(args.vsync(), None);
        assert!(!args.headless);
        assert_eq!(args.frames, 3_600);
        assert_eq!(args.log_level, Level::INFO);
    }

    #[test]
    fn last_vsync_flag_wins() {
        assert_eq!(parse(&["--vsync"]).vsync(), Some(true));
        assert_eq!(parse(&["--no-vsync"]).vsync(), Some(false));
        assert_eq!(parse(&["--no-vsync", "--vsync"]).vsync(), Some(true));
        assert_eq!(parse(&["--vsync", "--no-vsync"]).vsync(), Some(false));
    }

    #[test]
    fn quality_and_log_level_parse() {
        let args = parse(&["--quality", "low", "--log-level", "debug"]);

        assert_eq!(args.quality.map(QualityTier::from), Some(QualityTier::Low));
        assert_eq!(args.log_level, Level::DEBUG);
    }

    #[test]
    fn sprite_flags_conflict() {
        let result = Args::try_parse_from([
            "space-shooter",
            "--sprites",
            "assets/manifest.toml",
            "--no-sprites",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn headless_frames_must_be_positive() {
        assert!(Args::try_parse_from(["space-shooter", "--headless", "--frames", "0"]).is_err());
    }

    #[test]
    fn seed_flag_overrides_the_default_configuration() {
        let config = parse(&["--seed", "99"]).engine_config().expect("config");

        assert_eq!(config.seed, Some(99));
        assert_eq!(config.initial_lives, 3);
    }

    #[test]
    fn configuration_files_are_loaded_and_overridden() {
        let path = std::env::temp_dir().join(format!(
            "space-shooter-args-{}.toml",
            std::process::id()
        ));
        fs::write(&path, "seed = 1\ninitial_lives = 7\n").expect("write config");

        let path_arg = path.to_string_lossy().into_owned();
        let from_file = parse(&["--config", &path_arg]).engine_config();
        let overridden = parse(&["--config", &path_arg, "--seed", "2"]).engine_config();
        let _ = fs::remove_file(&path);

        let from_file = from_file.expect("config file");
        assert_eq!(from_file.seed, Some(1));
        assert_eq!(from_file.initial_lives, 7);
        assert_eq!(overridden.expect("config file").seed, Some(2));
    }

    #[test]
    fn missing_configuration_files_name_the_path() {
        let error = parse(&["--config", "no/such/config.toml"])
            .engine_config()
            .expect_err("missing file");

        assert!(format!("{error:#}").contains("no/such/config.toml"));
    }
}
