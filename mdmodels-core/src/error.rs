//! Error types for parsing and conversion
//!
//! Validation findings are not errors: they are returned as data by
//! [`crate::validate`]. These enums only cover the cases where a call cannot
//! produce its result at all.

use crate::validation::ValidationError;
use thiserror::Error;

/// Unrecoverable failures while reading a document.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    /// The `---` block opened on the first line is never closed.
    #[error("front matter starting on line {line} is not terminated by '---'")]
    UnterminatedFrontMatter { line: usize },

    /// The front matter is not valid YAML for the model configuration.
    #[error("invalid front matter on line {line}: {message}")]
    FrontMatter { line: usize, message: String },
}

impl ParseError {
    /// 1-based source line the error refers to.
    pub fn line(&self) -> usize {
        match self {
            ParseError::UnterminatedFrontMatter { line } => *line,
            ParseError::FrontMatter { line, .. } => *line,
        }
    }
}

/// Failures of the template converter.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("model is invalid ({} error(s)): {}", .0.len(), summarize(.0))]
    InvalidModel(Vec<ValidationError>),

    #[error("Template '{0}' not found")]
    TemplateNotFound(String),

    #[error("Operation not supported: {0}")]
    NotSupported(String),

    #[error("Render error: {0}")]
    Render(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for ConvertError {
    fn from(err: serde_json::Error) -> Self {
        ConvertError::Render(err.to_string())
    }
}

impl From<serde_yaml::Error> for ConvertError {
    fn from(err: serde_yaml::Error) -> Self {
        ConvertError::Render(err.to_string())
    }
}

impl From<std::fmt::Error> for ConvertError {
    fn from(err: std::fmt::Error) -> Self {
        ConvertError::Render(err.to_string())
    }
}

fn summarize(errors: &[ValidationError]) -> String {
    errors
        .first()
        .map(ValidationError::to_string)
        .unwrap_or_default()
}
