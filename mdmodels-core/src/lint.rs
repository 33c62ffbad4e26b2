//! Editor facing diagnostics
//!
//! Validation positions point at the construct that is wrong (usually the attribute
//! bullet). Editors want squiggles where the user has to type the fix, so a few error
//! types are moved before they are shown: a type problem is re-anchored onto the
//! `- Type:` line that follows the attribute.
//!
//! The completion snippets for new objects and attributes live here too.

use crate::model::LineIndex;
use crate::validation::{self, ErrorType, ValidationError, Validator};
use serde::{Deserialize, Serialize};

/// Number of lines, starting at the attribute bullet, searched for the `- Type:` line.
const TYPE_LINE_WINDOW: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// A diagnostic over a byte range `[from, to)` of the editor buffer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditorDiagnostic {
    pub from: usize,
    pub to: usize,
    pub severity: Severity,
    pub message: String,
}

/// Map one validation error onto editor ranges, one per position.
pub fn reanchor(source: &str, error: &ValidationError) -> Vec<EditorDiagnostic> {
    let index = LineIndex::new(source);
    error
        .positions
        .iter()
        .map(|position| {
            let (from, to) = match error.error_type {
                ErrorType::TypeError => type_line(&index, position.line)
                    .unwrap_or((position.offset.start, position.offset.end)),
                _ => (position.offset.start, position.offset.end),
            };
            EditorDiagnostic {
                from,
                to,
                severity: Severity::Error,
                message: error.message.clone(),
            }
        })
        .collect()
}

/// Byte range of the first `- Type:` line in the window starting at `line`, marker to
/// end of line.
///
/// The search stops at the next attribute bullet or heading.
fn type_line(index: &LineIndex<'_>, line: usize) -> Option<(usize, usize)> {
    for candidate in line..line + TYPE_LINE_WINDOW {
        let text = index.line_text(candidate);
        let trimmed = text.trim_start();
        if trimmed.to_lowercase().starts_with("- type:") {
            let start = index.line_start(candidate) + (text.len() - trimmed.len());
            let end = index.line_start(candidate) + text.trim_end().len();
            return Some((start, end));
        }
        if candidate > line && (text.starts_with('-') || text.starts_with('#')) {
            return None;
        }
    }
    None
}

/// Diagnostics for the whole document, ready for an editor.
///
/// The empty-document sentinel is left out: an empty buffer is not an error to show.
pub fn editor_diagnostics(source: &str) -> Vec<EditorDiagnostic> {
    validation::validate(source)
        .without_sentinel()
        .errors
        .iter()
        .flat_map(|error| reanchor(source, error))
        .collect()
}

/// Whether the text reads as a data model at all.
///
/// False only when the one thing validation has to say is that nothing is defined.
pub fn is_md_model(source: &str) -> bool {
    !validation::validate(source).is_empty_document()
}

/// Validation errors for a side panel, without the empty-document sentinel.
pub fn panel_errors(source: &str) -> Vec<ValidationError> {
    let Validator { errors, .. } = validation::validate(source).without_sentinel();
    errors
}

/// An insertable template offered by editor completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Snippet {
    pub label: &'static str,
    pub insert_text: &'static str,
}

const SNIPPETS: &[Snippet] = &[
    Snippet {
        label: "Add Object",
        insert_text: "### ObjectName\n\n_Description_\n\n- enter_name\n    - Type: <Type>\n    - Description: <Description>\n",
    },
    Snippet {
        label: "Add Attribute",
        insert_text: "- enter_name\n    - Type: <Type>\n    - Description: <Description>\n",
    },
];

/// The snippets an editor offers, "Add Object" first.
pub fn snippets() -> &'static [Snippet] {
    SNIPPETS
}

/// Snippets replacing the word that ends at `from..offset`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Completion {
    pub from: usize,
    pub options: &'static [Snippet],
}

/// Completion at byte `offset`.
///
/// The word before the cursor (letters, digits, `_`) is replaced. Without a word only an
/// explicit request completes.
pub fn completions_at(source: &str, offset: usize, explicit: bool) -> Option<Completion> {
    let before = source.get(..offset)?;
    let word_len: usize = before
        .chars()
        .rev()
        .take_while(|c| c.is_alphanumeric() || *c == '_')
        .map(char::len_utf8)
        .sum();
    if word_len == 0 && !explicit {
        return None;
    }
    Some(Completion {
        from: offset - word_len,
        options: snippets(),
    })
}
