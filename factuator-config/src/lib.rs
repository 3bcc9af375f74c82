//! Shared configuration loader for the factuator toolchain.
//!
//! `defaults/factuator.default.toml` is embedded into every binary so that docs
//! and runtime behavior stay in sync. Applications layer user-specific files on
//! top of those defaults via [`Loader`] before deserializing into
//! [`FactuatorConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use factuator_babel::driver::SubmitMode;
use factuator_babel::ConvertOptions;
use serde::Deserialize;
use std::path::{Path, PathBuf};

const DEFAULT_TOML: &str = include_str!("../defaults/factuator.default.toml");

/// Top-level configuration consumed by factuator applications.
#[derive(Debug, Clone, Deserialize)]
pub struct FactuatorConfig {
    pub wiki: WikiConfig,
    pub destination: DestinationConfig,
    pub convert: ConvertConfig,
    pub mappings: MappingsConfig,
    pub assets: AssetsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WikiConfig {
    pub page_prefix: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DestinationConfig {
    pub document_prefix: String,
    pub asset_prefix: String,
    pub placeholder_scheme: String,
    pub submit_mode: SubmitModeConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum SubmitModeConfig {
    #[serde(rename = "batch")]
    Batch,
    #[serde(rename = "one-by-one")]
    OneByOne,
}

impl From<SubmitModeConfig> for SubmitMode {
    fn from(mode: SubmitModeConfig) -> Self {
        match mode {
            SubmitModeConfig::Batch => SubmitMode::Batch,
            SubmitModeConfig::OneByOne => SubmitMode::OneByOne,
        }
    }
}

/// Mirrors the knobs of [`ConvertOptions`] that are not destination URLs.
#[derive(Debug, Clone, Deserialize)]
pub struct ConvertConfig {
    pub body_font_size_pt: f64,
    pub table_font_size_pt: f64,
    pub image_size_pt: f64,
    pub include_title: bool,
    pub include_source_link: bool,
    pub source_link_text: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MappingsConfig {
    pub path: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AssetsConfig {
    pub directory: Option<PathBuf>,
    pub http_prefix: String,
}

impl From<&FactuatorConfig> for ConvertOptions {
    fn from(config: &FactuatorConfig) -> Self {
        ConvertOptions {
            wiki_page_prefix: config.wiki.page_prefix.clone(),
            document_prefix: config.destination.document_prefix.clone(),
            asset_prefix: config.destination.asset_prefix.clone(),
            placeholder_scheme: config.destination.placeholder_scheme.clone(),
            body_font_size_pt: config.convert.body_font_size_pt,
            table_font_size_pt: config.convert.table_font_size_pt,
            image_size_pt: config.convert.image_size_pt,
            include_title: config.convert.include_title,
            include_source_link: config.convert.include_source_link,
            source_link_text: config.convert.source_link_text.clone(),
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
    pub fn build(self) -> Result<FactuatorConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<FactuatorConfig, ConfigError> {
    Loader::new().build()
}
