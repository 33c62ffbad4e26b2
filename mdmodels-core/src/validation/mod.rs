//! Model validation
//!
//!     Validation is a fold over the built model: every rule appends to one error list
//!     and nothing short-circuits, so a single pass reports every problem of the
//!     document. Bad input is expected input here; [`validate`] never fails and never
//!     panics.
//!
//!     Errors are returned sorted by source line (stable, so findings on the same line
//!     keep the order in which the rules ran). A document without any definitions gets
//!     exactly one [`ErrorType::GlobalError`] whose message is [`EMPTY_DOC_ERROR`];
//!     callers use it to tell "nothing written yet" apart from real problems.
//!
//!     The rules themselves live in [`rules`]:
//!
//!     | Rule                     | Error type        |
//!     |--------------------------|-------------------|
//!     | block diagnostics        | `ParseError`      |
//!     | duplicate definitions    | `DuplicateError`  |
//!     | duplicate attributes     | `DuplicateError`  |
//!     | identifier-like names    | `NameError`       |
//!     | unresolved / missing type| `TypeError`       |
//!     | term syntax and prefixes | `TermError`       |
//!     | XML names                | `XMLError`        |
//!     | enumeration members      | `GlobalError`     |

pub mod rules;

use crate::error::ParseError;
use crate::model::SourcePosition;
use crate::parser::{self, ParseOutcome};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Message of the sentinel error reported for a document without definitions.
pub const EMPTY_DOC_ERROR: &str = "This model has no definitions.";

/// Category of a validation finding, serialized as its tag (`"TypeError"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorType {
    NameError,
    TypeError,
    DuplicateError,
    GlobalError,
    XMLError,
    TermError,
    ParseError,
}

impl ErrorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorType::NameError => "NameError",
            ErrorType::TypeError => "TypeError",
            ErrorType::DuplicateError => "DuplicateError",
            ErrorType::GlobalError => "GlobalError",
            ErrorType::XMLError => "XMLError",
            ErrorType::TermError => "TermError",
            ErrorType::ParseError => "ParseError",
        }
    }
}

impl fmt::Display for ErrorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One positioned finding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationError {
    pub attribute: Option<String>,
    pub error_type: ErrorType,
    /// Human readable anchor, `"Line 3, Column 3"`. Empty for document-wide findings.
    pub location: String,
    pub message: String,
    pub object: Option<String>,
    pub positions: Vec<SourcePosition>,
}

impl ValidationError {
    pub fn new(
        error_type: ErrorType,
        message: impl Into<String>,
        object: Option<&str>,
        attribute: Option<&str>,
        positions: Vec<SourcePosition>,
    ) -> Self {
        let location = positions
            .first()
            .map(display_location)
            .unwrap_or_default();
        ValidationError {
            attribute: attribute.map(str::to_string),
            error_type,
            location,
            message: message.into(),
            object: object.map(str::to_string),
            positions,
        }
    }

    /// A finding about the document as a whole.
    pub fn global(message: impl Into<String>) -> Self {
        ValidationError::new(ErrorType::GlobalError, message, None, None, Vec::new())
    }

    /// Line of the first position, `0` for document-wide findings.
    pub fn line(&self) -> usize {
        self.positions.first().map(|p| p.line).unwrap_or(0)
    }

    pub fn is_empty_document(&self) -> bool {
        self.error_type == ErrorType::GlobalError && self.message == EMPTY_DOC_ERROR
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.location.is_empty() {
            write!(f, "[{}] {}", self.error_type, self.message)
        } else {
            write!(f, "[{}] {}: {}", self.error_type, self.location, self.message)
        }
    }
}

/// `"Line L, Column C"` for a position.
pub fn display_location(position: &SourcePosition) -> String {
    format!("Line {}, Column {}", position.line, position.column.start)
}

/// Result of a validation pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Validator {
    pub is_valid: bool,
    pub errors: Vec<ValidationError>,
}

impl Validator {
    pub fn from_errors(mut errors: Vec<ValidationError>) -> Self {
        errors.sort_by_key(ValidationError::line);
        Validator {
            is_valid: errors.is_empty(),
            errors,
        }
    }

    /// True when the only finding is the empty-document sentinel.
    pub fn is_empty_document(&self) -> bool {
        self.errors.len() == 1 && self.errors[0].is_empty_document()
    }

    /// The same result with the empty-document sentinel removed.
    pub fn without_sentinel(self) -> Self {
        let errors = self
            .errors
            .into_iter()
            .filter(|e| !e.is_empty_document())
            .collect();
        Validator::from_errors(errors)
    }
}

/// Validate a markdown data model.
pub fn validate(source: &str) -> Validator {
    match parser::parse(source) {
        Ok(outcome) => validate_outcome(&outcome),
        Err(err) => Validator::from_errors(vec![parse_failure(source, &err)]),
    }
}

/// Validate an already parsed document.
pub fn validate_outcome(outcome: &ParseOutcome) -> Validator {
    let model = &outcome.model;
    if model.is_empty() && outcome.diagnostics.is_empty() {
        return Validator::from_errors(vec![ValidationError::global(EMPTY_DOC_ERROR)]);
    }

    let mut errors = Vec::new();
    rules::check_diagnostics(&outcome.diagnostics, &mut errors);
    rules::check_duplicates(model, &mut errors);
    rules::check_names(model, &mut errors);
    rules::check_types(model, &mut errors);
    rules::check_terms(model, &mut errors);
    rules::check_xml(model, &mut errors);
    rules::check_enumerations(model, &mut errors);

    debug!(errors = errors.len(), "validated data model");
    Validator::from_errors(errors)
}

fn parse_failure(source: &str, err: &ParseError) -> ValidationError {
    let index = crate::model::LineIndex::new(source);
    ValidationError::new(
        ErrorType::ParseError,
        err.to_string(),
        None,
        None,
        vec![index.line_position(err.line())],
    )
}
