//! Error types for the fallible setup paths.
//!
//! Gameplay operations never fail: invalid requests are ignored. Only
//! loading configuration and level descriptions can go wrong.
use std::path::PathBuf;

use thiserror::Error;

/// Failure while loading a [`GameConfig`](crate::config::GameConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config {path}: {source}")]
    Read {
        /// Path that was being read.
        path: PathBuf,
        /// Underlying IO failure.
        #[source]
        source: std::io::Error,
    },
    /// The configuration text was not valid JSON for the schema.
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    /// A value parsed but is outside its meaningful range.
    #[error("invalid config value `{field}`: {reason}")]
    Invalid {
        /// Dotted path of the offending field.
        field: &'static str,
        /// Why the value was rejected.
        reason: String,
    },
}

/// Failure while turning a level description into world geometry.
#[derive(Debug, Error)]
pub enum LevelError {
    /// The level file could not be read.
    #[error("failed to read level {path}: {source}")]
    Read {
        /// Path that was being read.
        path: PathBuf,
        /// Underlying IO failure.
        #[source]
        source: std::io::Error,
    },
    /// The level text was not valid JSON for the schema.
    #[error("failed to parse level: {0}")]
    Parse(#[from] serde_json::Error),
    /// The level declares a non-positive size.
    #[error("level `{name}` has invalid dimensions {width}x{height}")]
    Dimensions {
        /// Level name.
        name: String,
        /// Declared width in tiles.
        width: u32,
        /// Declared height in tiles.
        height: u32,
    },
    /// An object has a zero or negative extent.
    #[error("object {index} in level `{name}` has an empty extent")]
    EmptyObject {
        /// Level name.
        name: String,
        /// Position of the object in the object list.
        index: usize,
    },
}
