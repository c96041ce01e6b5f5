//! Shared configuration loader for the plait filters.
//!
//! `defaults/plait.default.toml` is embedded into the binary so that docs and
//! runtime behavior stay in sync. Applications layer user-specific files on top
//! of those defaults via [`Loader`] before deserializing into [`PlaitConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use plait_babel::{ConvertOptions, DuplicatePathPolicy, IndexMode};
use plait_sort::SortOptions;
use serde::Deserialize;
use std::path::Path;

const DEFAULT_TOML: &str = include_str!("../defaults/plait.default.toml");

/// Optional project-level configuration file picked up from the working directory.
pub const PROJECT_CONFIG: &str = "plait.toml";

/// Top-level configuration consumed by the plait commands.
#[derive(Debug, Clone, Deserialize)]
pub struct PlaitConfig {
    pub convert: ConvertConfig,
    pub get: GetConfig,
    pub sort: SortConfig,
}

/// Settings shared by `convert` and `get`.
#[derive(Debug, Clone, Deserialize)]
pub struct ConvertConfig {
    pub from: String,
    pub to: String,
    pub equal_sign: char,
    /// Unset means "pick from the formats", see [`ConvertOptions::default_delimiter`]
    pub delimiter: Option<char>,
    pub index_mode: IndexMode,
    pub duplicates: DuplicatePathPolicy,
    pub linewise: bool,
}

impl ConvertConfig {
    /// Delimiter to use when converting `from` into `to`.
    pub fn delimiter_for(&self, from: &str, to: &str) -> char {
        self.delimiter
            .unwrap_or_else(|| ConvertOptions::default_delimiter(from, to, self.linewise))
    }
}

impl From<&ConvertConfig> for ConvertOptions {
    fn from(config: &ConvertConfig) -> Self {
        ConvertOptions {
            equal_sign: config.equal_sign,
            delimiter: config.delimiter_for(&config.from, &config.to),
            index_mode: config.index_mode,
            duplicates: config.duplicates,
            linewise: config.linewise,
        }
    }
}

/// Output settings for `get`.
#[derive(Debug, Clone, Deserialize)]
pub struct GetConfig {
    pub to: String,
    pub index_mode: IndexMode,
    pub output_path: bool,
}

/// Record settings for `sort`.
#[derive(Debug, Clone, Deserialize)]
pub struct SortConfig {
    pub delimiter: char,
    pub string_keys: bool,
    pub reverse: bool,
    pub flush: bool,
}

impl From<&SortConfig> for SortOptions {
    fn from(config: &SortConfig) -> Self {
        SortOptions {
            delimiter: config.delimiter,
            string_keys: config.string_keys,
            reverse: config.reverse,
            flush: config.flush,
            ..SortOptions::default()
        }
    }
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

    /// Finalize the builder and deserialize the resulting configuration.
    pub fn build(self) -> Result<PlaitConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<PlaitConfig, ConfigError> {
    Loader::new().build()
}
