//! YAML front matter
//!
//! The front matter is split off before the markdown is handed to comrak, so that
//! comrak's line numbers can be shifted back onto the original source and so that a
//! broken YAML block is reported as the one unrecoverable parse failure.

use crate::error::ParseError;
use crate::model::Config;

/// The `---` delimited block at the very top of a document.
#[derive(Debug, Clone, PartialEq)]
pub struct FrontMatter<'a> {
    /// YAML between the delimiters.
    pub yaml: &'a str,
    /// Line of the opening delimiter (always 1).
    pub start_line: usize,
    /// Line of the closing delimiter.
    pub end_line: usize,
}

/// Split a document into its optional front matter and the markdown body.
///
/// Returns the body together with the number of source lines that precede it.
pub fn split_front_matter(source: &str) -> Result<(Option<FrontMatter<'_>>, &str, usize), ParseError> {
    let mut lines = source.split_inclusive('\n');
    let Some(first) = lines.next() else {
        return Ok((None, source, 0));
    };
    if first.trim_end() != "---" {
        return Ok((None, source, 0));
    }

    let yaml_start = first.len();
    let mut consumed = first.len();
    let mut line_no = 1;
    for line in lines {
        line_no += 1;
        if line.trim_end() == "---" {
            let yaml = &source[yaml_start..consumed];
            let body = &source[consumed + line.len()..];
            let front = FrontMatter {
                yaml,
                start_line: 1,
                end_line: line_no,
            };
            return Ok((Some(front), body, line_no));
        }
        consumed += line.len();
    }

    Err(ParseError::UnterminatedFrontMatter { line: 1 })
}

/// Deserialize the front matter into a [`Config`]. An empty block yields defaults.
pub fn parse_config(front: &FrontMatter<'_>) -> Result<Config, ParseError> {
    if front.yaml.trim().is_empty() {
        return Ok(Config::default());
    }

    serde_yaml::from_str::<Config>(front.yaml).map_err(|err| {
        let line = err
            .location()
            .map(|loc| front.start_line + loc.line())
            .unwrap_or(front.start_line);
        ParseError::FrontMatter {
            line,
            message: err.to_string(),
        }
    })
}
