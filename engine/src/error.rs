use thiserror::Error;

/// Errors reported while configuring or resizing the engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The canvas must have a finite, positive width and height.
    #[error("invalid canvas size {width}x{height}")]
    InvalidCanvas {
        /// Rejected width.
        width: f32,
        /// Rejected height.
        height: f32,
    },
    /// A configuration value is outside its accepted range.
    #[error("invalid configuration: {field} {reason}")]
    InvalidConfig {
        /// Offending configuration key.
        field: &'static str,
        /// Why the value was rejected.
        reason: &'static str,
    },
    /// The configuration document could not be parsed.
    #[error("failed to parse engine configuration")]
    Parse(#[from] toml::de::Error),
}
