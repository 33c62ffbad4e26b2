//! Parser, validator and schema converter for markdown data models
//!
//!     A markdown data model is an ordinary markdown file written in a small dialect:
//!     `###` headings declare objects, bullets under them declare attributes, and
//!     `Key: Value` sub-bullets carry the attribute metadata (`Type`, `Term`,
//!     `Description`, ...). A `###` section holding only a fenced code block of
//!     `KEY = "value"` lines declares an enumeration. Optional YAML front matter
//!     configures prefixes and the model namespace.
//!
//!     This crate turns such a document into a typed [`DataModel`], checks it, and renders
//!     it into one of eighteen targets (JSON Schema, XSD, Python, Rust, TypeScript, ...).
//!     It is a pure lib: no printing, no environment, no network. The only file I/O
//!     is the opt-in write in [`export`].
//!
//! Architecture
//!
//!     The pipeline is linear, and every stage only sees the output of the previous one:
//!
//!         source ─▶ parser::lexer ─▶ parser::builder ─▶ DataModel ─┬─▶ validation
//!                                                                    └─▶ templates
//!
//!     - The lexer leans on comrak for block structure only. Text is sliced from the
//!       raw lines so `__id__` survives as written.
//!     - The builder never fails. Malformed bullets become [`parser::ParseDiagnostic`]s
//!       and the rest of the document is still read.
//!     - Validation is a fold over the model plus those diagnostics, producing
//!       positioned [`validation::ValidationError`]s.
//!     - Conversion refuses invalid models. Renderers can therefore assume that every
//!       dtype resolves.
//!
//!     The file structure :
//!     .
//!     ├── error.rs            # ParseError, ConvertError
//!     ├── model               # DataModel, Object, Attribute, positions, primitives
//!     ├── parser              # front matter, lexer, builder, line grammar
//!     ├── validation          # Validator and its rules
//!     ├── template.rs         # Template trait, TemplateId
//!     ├── registry.rs         # TemplateRegistry for discovery and selection
//!     ├── templates           # one module per target
//!     ├── lint.rs             # editor facing diagnostics
//!     ├── graph.rs            # relationship edges, heading outline
//!     └── export.rs           # convert-and-write helper
//!
//! Testing
//!
//!     Unit tests sit next to the code. Renderers are pinned with inline insta snapshots.
//!     tests/ holds the end to end scenarios and the proptest properties (determinism,
//!     idempotent markdown, validation never panicking), aggregated from tests/lib.rs.
//!
pub mod error;
pub mod export;
pub mod graph;
pub mod lint;
pub mod model;
pub mod parser;
pub mod registry;
pub mod template;
pub mod templates;
pub mod validation;

use std::collections::HashMap;
use tracing::debug;

pub use error::{ConvertError, ParseError};
pub use model::{Attribute, Config, DataModel, Enumeration, Object, SourcePosition};
pub use registry::TemplateRegistry;
pub use template::{Template, TemplateId};
pub use templates::json_schema::JsonSchemaOptions;
pub use validation::{ErrorType, ValidationError, Validator, EMPTY_DOC_ERROR};

/// Parses a markdown data model.
///
/// Only a broken front matter block makes this fail. Everything else that is malformed
/// is skipped here and reported by [`validate`].
pub fn parse_model(source: &str) -> Result<DataModel, ParseError> {
    parser::parse(source).map(|outcome| outcome.model)
}

/// Validates a markdown data model. Never fails; problems are returned as data.
pub fn validate(source: &str) -> Validator {
    validation::validate(source)
}

/// Converts a markdown data model into the given template.
///
/// # Errors
///
/// - [`ConvertError::Parse`] if the front matter is broken
/// - [`ConvertError::InvalidModel`] if validation reports anything, the empty-document
///   sentinel included
pub fn convert_to(source: &str, template: TemplateId) -> Result<String, ConvertError> {
    convert_with_options(source, template, &HashMap::new())
}

/// Same as [`convert_to`], passing template specific options through.
pub fn convert_with_options(
    source: &str,
    template: TemplateId,
    options: &HashMap<String, String>,
) -> Result<String, ConvertError> {
    let model = checked_model(source)?;
    debug!(%template, objects = model.objects.len(), "converting data model");
    TemplateRegistry::with_defaults().render_with_options(&model, template.name(), options)
}

/// Renders the JSON Schema of a markdown data model.
///
/// `options` selects the root object and strict mode; `resolve_refs` inlines every
/// definition instead of pointing into `$defs`.
pub fn json_schema(
    source: &str,
    options: Option<&JsonSchemaOptions>,
    resolve_refs: bool,
) -> Result<String, ConvertError> {
    let model = checked_model(source)?;
    let defaults = JsonSchemaOptions::default();
    templates::json_schema::render_schema(&model, options.unwrap_or(&defaults), resolve_refs)
}

fn checked_model(source: &str) -> Result<DataModel, ConvertError> {
    let outcome = parser::parse(source)?;
    let report = validation::validate_outcome(&outcome);
    if !report.is_valid {
        debug!(errors = report.errors.len(), "refusing to convert an invalid model");
        return Err(ConvertError::InvalidModel(report.errors));
    }
    Ok(outcome.model)
}
