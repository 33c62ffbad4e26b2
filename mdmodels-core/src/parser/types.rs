//! Line-level grammar of attribute bullets
//!
//! | Input                          | Result                                   |
//! |--------------------------------|------------------------------------------|
//! | `__id__`                       | name `id`, `is_id = true`                |
//! | `string`                       | dtypes `["string"]`                      |
//! | `[Author](#author)[]`          | dtypes `["Author"]`, `multiple = true`   |
//! | `string \| [Unit](#unit)`      | dtypes `["string", "Unit"]`              |
//! | `[]`                           | no dtype, `multiple = true`              |
//! | `ECO = "https://..."`          | enum member `ECO` → `https://...`        |

use once_cell::sync::Lazy;
use regex::Regex;

static LINK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\[([^\]]+)\]\(([^)]*)\)$").expect("valid link regex"));

static ENUM_MAPPING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^\s*([A-Za-z_][A-Za-z0-9_]*)\s*=\s*(?:"([^"]*)"|'([^']*)')\s*,?\s*$"#)
        .expect("valid enum mapping regex")
});

/// Split an attribute bullet into its stored name and identifier flag.
pub fn parse_attribute_name(text: &str) -> (String, bool) {
    let text = text.trim();
    if text.len() > 4 && text.starts_with("__") && text.ends_with("__") {
        (text[2..text.len() - 2].trim().to_string(), true)
    } else {
        (text.to_string(), false)
    }
}

/// Parse a `Type:` value into its alternatives and the multiplicity flag.
pub fn parse_type_value(value: &str) -> (Vec<String>, bool) {
    let multiple = value.contains("[]");
    let cleaned = value.replace("[]", "");
    let dtypes = cleaned
        .split(['|', ','])
        .map(str::trim)
        .filter(|alt| !alt.is_empty())
        .map(|alt| match LINK.captures(alt) {
            Some(caps) => caps[1].trim().to_string(),
            None => alt.trim_matches('`').to_string(),
        })
        .collect();
    (dtypes, multiple)
}

/// Parse a `Required:` value.
pub fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "1" => Some(true),
        "false" | "no" | "0" => Some(false),
        _ => None,
    }
}

/// Outcome of reading one line of an enumeration code block.
#[derive(Debug, Clone, PartialEq)]
pub enum EnumLine {
    Mapping(String, String),
    Skip,
    Malformed,
}

pub fn parse_enum_line(line: &str) -> EnumLine {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with("//") {
        return EnumLine::Skip;
    }
    match ENUM_MAPPING.captures(line) {
        Some(caps) => {
            let value = caps
                .get(2)
                .or_else(|| caps.get(3))
                .map(|m| m.as_str())
                .unwrap_or_default();
            EnumLine::Mapping(caps[1].to_string(), value.to_string())
        }
        None => EnumLine::Malformed,
    }
}

/// Anchor used when linking to a definition (`[Name](#name)`).
pub fn anchor_for(name: &str) -> String {
    format!("#{}", name.to_lowercase())
}
