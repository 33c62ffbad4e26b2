//! Markdown data model parser
//!
//!     Pipeline: source → [`frontmatter`] split → [`lexer`] blocks → [`builder`] model.
//!
//!     Only a broken front matter block aborts parsing. Everything below it is read
//!     leniently: problems in bullets and enumeration blocks become
//!     [`ParseDiagnostic`]s that the validator later reports as `ParseError` findings.

pub mod builder;
pub mod frontmatter;
pub mod lexer;
pub mod types;

use crate::error::ParseError;
use tracing::debug;

pub use builder::{ParseDiagnostic, ParseOutcome};

/// Parse markdown into a model plus recoverable diagnostics.
pub fn parse(source: &str) -> Result<ParseOutcome, ParseError> {
    let lexed = lexer::lex(source)?;
    debug!(blocks = lexed.blocks.len(), "parsing markdown data model");
    Ok(builder::build(source, lexed))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rejects_unterminated_front_matter() {
        let err = parse("---\nrepo: x\n### A\n").unwrap_err();
        assert_eq!(err.line(), 1);
    }

    #[test]
    fn test_parse_empty_source() {
        let outcome = parse("").unwrap();
        assert!(outcome.model.is_empty());
        assert!(outcome.diagnostics.is_empty());
    }

    #[test]
    fn test_positions_survive_front_matter() {
        let outcome = parse("---\nprefix: ex\n---\n\n### A\n- x\n  - Type: string\n").unwrap();
        let object = &outcome.model.objects[0];
        assert_eq!(object.position.line, 5);
        assert_eq!(object.attributes[0].position.line, 6);
        assert_eq!(object.attributes[0].type_position.map(|p| p.line), Some(7));
    }
}
