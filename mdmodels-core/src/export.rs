//! Convert-and-write pipeline.
//!
//! Provides a single call for "export this model as X": template selection,
//! validation, rendering and the optional write to disk. Without an output path the
//! rendered text is returned in memory.
//!
//! For more control over the conversion, use [`TemplateRegistry`] directly.

use crate::error::ConvertError;
use crate::registry::TemplateRegistry;
use crate::template::TemplateId;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Specifies how to export a model.
///
/// ```ignore
/// let spec = ExportSpec::new(&markdown, TemplateId::JsonSchema)
///     .with_output_path("out/schema.json")
///     .with_option("root", "Dataset");
/// ```
#[derive(Debug)]
pub struct ExportSpec<'a> {
    /// Markdown source of the model.
    pub markdown: &'a str,
    pub template: TemplateId,
    /// File to write. A directory receives `schema.<ext>`.
    pub output: Option<PathBuf>,
    /// Treat `output` as a directory even when it does not exist yet.
    pub output_is_dir: bool,
    /// Template specific options (e.g. `root` for JSON Schema).
    pub options: HashMap<String, String>,
}

impl<'a> ExportSpec<'a> {
    pub fn new(markdown: &'a str, template: TemplateId) -> Self {
        Self {
            markdown,
            template,
            output: None,
            output_is_dir: false,
            options: HashMap::new(),
        }
    }

    pub fn with_output_path(mut self, path: impl AsRef<Path>) -> Self {
        self.output = Some(path.as_ref().to_path_buf());
        self
    }

    /// Write `schema.<ext>` into `dir`, creating it if needed.
    pub fn with_output_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.output = Some(dir.as_ref().to_path_buf());
        self.output_is_dir = true;
        self
    }

    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }
}

/// The output of a successful export.
#[derive(Debug, Clone, PartialEq)]
pub enum ExportArtifact {
    /// Rendered text (no output path given).
    InMemory(String),
    /// Path of the written file.
    File(PathBuf),
}

/// File name used when exporting into a directory, `schema.<ext>`.
pub fn default_file_name(template: TemplateId) -> Result<String, ConvertError> {
    let registry = TemplateRegistry::with_defaults();
    let extension = registry.get_by_id(template)?.file_extension();
    Ok(format!("schema.{extension}"))
}

/// Exports a model according to the specification.
///
/// # Errors
///
/// Returns [`ConvertError`] if:
/// - The model does not parse or does not validate
/// - The template rejects an option
/// - File I/O fails
pub fn export(spec: ExportSpec<'_>) -> Result<ExportArtifact, ConvertError> {
    let text = crate::convert_with_options(spec.markdown, spec.template, &spec.options)?;
    match spec.output {
        Some(path) => {
            let path = if spec.output_is_dir || path.is_dir() {
                path.join(default_file_name(spec.template)?)
            } else {
                path
            };
            write_to_path(path, text).map(ExportArtifact::File)
        }
        None => Ok(ExportArtifact::InMemory(text)),
    }
}

fn write_to_path(path: PathBuf, text: String) -> Result<PathBuf, ConvertError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(&path, text)?;
    debug!(path = %path.display(), "wrote export");
    Ok(path)
}
