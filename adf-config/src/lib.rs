//! Shared configuration loader for the adf toolchain.
//!
//! `defaults/adf.default.toml` is embedded into every binary so that docs and
//! runtime behavior stay in sync. Applications layer user-specific files on top
//! of those defaults via [`Loader`] before deserializing into [`AdfConfig`].

use adf_babel::formats::treeviz::TreevizOptions;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::path::Path;

const DEFAULT_TOML: &str = include_str!("../defaults/adf.default.toml");

/// Top-level configuration consumed by adf applications.
#[derive(Debug, Clone, Deserialize)]
pub struct AdfConfig {
    pub convert: ConvertConfig,
    pub inspect: InspectConfig,
    pub log: LogConfig,
}

/// Output knobs for `adf convert`.
#[derive(Debug, Clone, Deserialize)]
pub struct ConvertConfig {
    pub pretty: bool,
}

/// Controls the tree view printed by `adf inspect`.
#[derive(Debug, Clone, Deserialize)]
pub struct InspectConfig {
    pub show_marks: bool,
    pub label_width: usize,
}

impl From<&InspectConfig> for TreevizOptions {
    fn from(config: &InspectConfig) -> Self {
        TreevizOptions {
            show_marks: config.show_marks,
            label_width: config.label_width,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    pub level: String,
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override (useful for CLI settings).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    pub fn build(self) -> Result<AdfConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<AdfConfig, ConfigError> {
    Loader::new().build()
}
