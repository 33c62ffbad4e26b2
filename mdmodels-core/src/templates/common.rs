//! Helpers shared by the renderers

use crate::model::{Attribute, DataModel, PrimitiveType, TypeRef};

/// What a dtype string turned out to be, for renderers that only need the kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind<'a> {
    Primitive(PrimitiveType),
    Object(&'a str),
    Enum(&'a str),
    /// Not defined in the model. Only reachable when rendering an unvalidated model.
    Unknown(&'a str),
}

pub fn kind_of<'a>(model: &'a DataModel, dtype: &'a str) -> Kind<'a> {
    match model.resolve(dtype) {
        Some(TypeRef::Primitive(primitive)) => Kind::Primitive(primitive),
        Some(TypeRef::Object(object)) => Kind::Object(&object.name),
        Some(TypeRef::Enum(enumeration)) => Kind::Enum(&enumeration.name),
        None => Kind::Unknown(dtype),
    }
}

/// How a target deals with attributes that have more than one dtype.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnionPolicy {
    /// The target has a union construct; every alternative is emitted.
    Native,
    /// The target has no union construct; the first alternative is emitted.
    FirstWins,
}

/// The dtypes a renderer emits for an attribute under the given policy.
pub fn alternatives(attribute: &Attribute, policy: UnionPolicy) -> &[String] {
    match policy {
        UnionPolicy::Native => &attribute.dtypes,
        UnionPolicy::FirstWins => &attribute.dtypes[..attribute.dtypes.len().min(1)],
    }
}

/// Drop repeated entries, keeping the first occurrence of each.
pub fn unique(items: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}

/// Split an identifier into lowercase words on `_`, `-`, spaces and case changes.
fn words(name: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let chars: Vec<char> = name.chars().collect();

    for (idx, &c) in chars.iter().enumerate() {
        if c == '_' || c == '-' || c.is_whitespace() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }
        let boundary = c.is_uppercase()
            && idx > 0
            && (chars[idx - 1].is_lowercase()
                || chars[idx - 1].is_ascii_digit()
                || chars
                    .get(idx + 1)
                    .is_some_and(|next| next.is_lowercase() && chars[idx - 1].is_uppercase()));
        if boundary && !current.is_empty() {
            words.push(std::mem::take(&mut current));
        }
        current.extend(c.to_lowercase());
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn pascal_case(name: &str) -> String {
    words(name).iter().map(|w| capitalize(w)).collect()
}

pub fn camel_case(name: &str) -> String {
    let pascal = pascal_case(name);
    let mut chars = pascal.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn snake_case(name: &str) -> String {
    words(name).join("_")
}

pub fn screaming_snake_case(name: &str) -> String {
    snake_case(name).to_uppercase()
}

/// Escape text for XML attribute values and element content.
pub fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

/// Escape text for a double-quoted string literal (C-family, Python, Turtle, YAML).
pub fn escape_string(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out
}

/// A docstring collapsed onto one line.
pub fn one_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Prefix every line of a docstring, e.g. with `/// ` or `# `. Empty docs yield nothing.
pub fn comment_lines(text: &str, prefix: &str, indent: &str) -> String {
    let mut out = String::new();
    for line in text.lines() {
        let line = line.trim_end();
        if line.is_empty() {
            out.push_str(&format!("{indent}{}\n", prefix.trim_end()));
        } else {
            out.push_str(&format!("{indent}{prefix}{line}\n"));
        }
    }
    out
}

/// Whether any attribute in the model uses one of the given primitives.
pub fn uses_primitive(model: &DataModel, wanted: &[PrimitiveType]) -> bool {
    model.objects.iter().any(|object| {
        object.attributes.iter().any(|attribute| {
            attribute.dtypes.iter().any(|dtype| {
                matches!(kind_of(model, dtype), Kind::Primitive(p) if wanted.contains(&p))
            })
        })
    })
}

/// Whether any attribute has more than one dtype.
pub fn uses_unions(model: &DataModel) -> bool {
    model
        .objects
        .iter()
        .any(|o| o.attributes.iter().any(Attribute::is_union))
}

/// The model title, falling back to a fixed name.
pub fn model_title(model: &DataModel) -> &str {
    model.name.as_deref().unwrap_or("Model")
}
