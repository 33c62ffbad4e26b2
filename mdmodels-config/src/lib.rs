//! Shared configuration loader for the mdmodels toolchain.
//!
//! `defaults/mdmodels.default.toml` is embedded into every binary so that docs and
//! runtime behavior stay in sync. Applications layer user-specific files on top
//! of those defaults via [`Loader`] before deserializing into [`MdModelsConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use mdmodels_core::{JsonSchemaOptions, TemplateId};
use serde::Deserialize;
use std::path::{Path, PathBuf};

const DEFAULT_TOML: &str = include_str!("../defaults/mdmodels.default.toml");

/// Top-level configuration consumed by mdmodels applications.
#[derive(Debug, Clone, Deserialize)]
pub struct MdModelsConfig {
    pub convert: ConvertConfig,
    pub validate: ValidateConfig,
    pub logging: LoggingConfig,
}

/// Conversion defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct ConvertConfig {
    pub default_template: TemplateId,
    pub json_schema: JsonSchemaConfig,
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JsonSchemaConfig {
    pub resolve_refs: bool,
    pub strict: bool,
}

impl From<&JsonSchemaConfig> for JsonSchemaOptions {
    fn from(config: &JsonSchemaConfig) -> Self {
        JsonSchemaOptions {
            root: None,
            strict: config.strict,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ValidateConfig {
    pub ignore_empty_document: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
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

    /// Finalize the builder and deserialize the resulting configuration.
    pub fn build(self) -> Result<MdModelsConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<MdModelsConfig, ConfigError> {
    Loader::new().build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn loads_default_config() {
        let config = load_defaults().expect("defaults to deserialize");
        assert_eq!(config.convert.default_template, TemplateId::JsonSchema);
        assert!(!config.convert.json_schema.resolve_refs);
        assert!(!config.convert.json_schema.strict);
        assert_eq!(config.convert.output_dir, None);
        assert!(!config.validate.ignore_empty_document);
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn supports_overrides() {
        let config = Loader::new()
            .set_override("convert.default_template", "typescript-zod")
            .expect("override to apply")
            .set_override("convert.json_schema.strict", true)
            .expect("override to apply")
            .build()
            .expect("config to build");
        assert_eq!(config.convert.default_template, TemplateId::TypescriptZod);
        assert!(config.convert.json_schema.strict);
    }

    #[test]
    fn layers_user_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mdmodels.toml");
        fs::write(
            &path,
            "[convert]\ndefault_template = \"rust\"\noutput_dir = \"out\"\n\n[logging]\nlevel = \"debug\"\n",
        )
        .unwrap();

        let config = Loader::new().with_file(&path).build().expect("config to build");
        assert_eq!(config.convert.default_template, TemplateId::Rust);
        assert_eq!(config.convert.output_dir, Some(PathBuf::from("out")));
        assert_eq!(config.logging.level, "debug");
        assert!(!config.convert.json_schema.resolve_refs);
    }

    #[test]
    fn optional_files_may_be_missing() {
        let config = Loader::new()
            .with_optional_file("/nonexistent/mdmodels.toml")
            .build()
            .expect("config to build");
        assert_eq!(config.convert.default_template, TemplateId::JsonSchema);

        assert!(Loader::new().with_file("/nonexistent/mdmodels.toml").build().is_err());
    }

    #[test]
    fn rejects_unknown_templates() {
        let result = Loader::new()
            .set_override("convert.default_template", "cobol")
            .expect("override to apply")
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn json_schema_config_converts_to_options() {
        let config = load_defaults().expect("defaults to deserialize");
        let options: JsonSchemaOptions = (&config.convert.json_schema).into();
        assert_eq!(options, JsonSchemaOptions::default());
    }
}
