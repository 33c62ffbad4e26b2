//! Rust template
//!
//! Objects become serde structs, enumerations serde enums renamed to their values.
//! Rust has no anonymous unions, so only the first dtype of an attribute is used.
//! References to other objects are boxed so that cyclic models still have a finite size.

use super::common::{alternatives, comment_lines, kind_of, pascal_case, snake_case, Kind, UnionPolicy};
use crate::error::ConvertError;
use crate::model::{Attribute, DataModel, Enumeration, Object, PrimitiveType};
use crate::template::{Template, TemplateId};
use std::fmt::Write;

const KEYWORDS: &[&str] = &[
    "as", "async", "await", "break", "const", "continue", "crate", "dyn", "else", "enum",
    "extern", "false", "fn", "for", "if", "impl", "in", "let", "loop", "match", "mod", "move",
    "mut", "pub", "ref", "return", "self", "static", "struct", "super", "trait", "true", "type",
    "unsafe", "use", "where", "while",
];

/// Keywords that cannot be raw identifiers.
const RESERVED_PATH_KEYWORDS: &[&str] = &["crate", "self", "super"];

pub struct RustTemplate;

impl Template for RustTemplate {
    fn id(&self) -> TemplateId {
        TemplateId::Rust
    }

    fn description(&self) -> &str {
        "Rust structs and enums with serde derives"
    }

    fn file_extension(&self) -> &str {
        "rs"
    }

    fn render(&self, model: &DataModel) -> Result<String, ConvertError> {
        let mut out = String::new();
        writeln!(out, "use serde::{{Deserialize, Serialize}};")?;

        for object in &model.objects {
            writeln!(out)?;
            render_struct(&mut out, model, object)?;
        }
        for enumeration in &model.enums {
            writeln!(out)?;
            render_enum(&mut out, enumeration)?;
        }
        Ok(out)
    }
}

fn rust_primitive(primitive: PrimitiveType) -> &'static str {
    match primitive {
        PrimitiveType::String
        | PrimitiveType::Identifier
        | PrimitiveType::Date
        | PrimitiveType::DateTime => "String",
        PrimitiveType::Integer => "i64",
        PrimitiveType::Float | PrimitiveType::Number => "f64",
        PrimitiveType::Boolean => "bool",
        PrimitiveType::Bytes => "Vec<u8>",
    }
}

fn field_name(name: &str) -> String {
    let snake = snake_case(name);
    if RESERVED_PATH_KEYWORDS.contains(&snake.as_str()) {
        format!("{snake}_")
    } else if KEYWORDS.contains(&snake.as_str()) {
        format!("r#{snake}")
    } else {
        snake
    }
}

fn field_type(model: &DataModel, attribute: &Attribute) -> String {
    let (base, boxed) = match alternatives(attribute, UnionPolicy::FirstWins).first() {
        Some(dtype) => match kind_of(model, dtype) {
            Kind::Primitive(primitive) => (rust_primitive(primitive).to_string(), false),
            Kind::Enum(name) => (pascal_case(name), false),
            Kind::Object(name) | Kind::Unknown(name) => (pascal_case(name), true),
        },
        None => ("serde_json::Value".to_string(), false),
    };

    if attribute.multiple {
        format!("Vec<{base}>")
    } else if boxed && attribute.is_required() {
        format!("Box<{base}>")
    } else if boxed {
        format!("Option<Box<{base}>>")
    } else if attribute.is_required() {
        base
    } else {
        format!("Option<{base}>")
    }
}

fn render_struct(out: &mut String, model: &DataModel, object: &Object) -> std::fmt::Result {
    out.push_str(&comment_lines(&object.docstring, "/// ", ""));
    writeln!(out, "#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]")?;
    writeln!(out, "pub struct {} {{", pascal_case(&object.name))?;

    for attribute in &object.attributes {
        out.push_str(&comment_lines(&attribute.docstring, "/// ", "    "));
        let name = field_name(&attribute.name);
        let mut serde_args = Vec::new();
        if name.trim_start_matches("r#") != attribute.name {
            serde_args.push(format!("rename = \"{}\"", attribute.name));
        }
        if attribute.multiple {
            serde_args.push("default".to_string());
            serde_args.push("skip_serializing_if = \"Vec::is_empty\"".to_string());
        } else if !attribute.is_required() {
            serde_args.push("default".to_string());
            serde_args.push("skip_serializing_if = \"Option::is_none\"".to_string());
        }
        if !serde_args.is_empty() {
            writeln!(out, "    #[serde({})]", serde_args.join(", "))?;
        }
        writeln!(out, "    pub {name}: {},", field_type(model, attribute))?;
    }

    writeln!(out, "}}")
}

fn render_enum(out: &mut String, enumeration: &Enumeration) -> std::fmt::Result {
    out.push_str(&comment_lines(&enumeration.docstring, "/// ", ""));
    writeln!(
        out,
        "#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]"
    )?;
    writeln!(out, "pub enum {} {{", pascal_case(&enumeration.name))?;
    for (key, value) in &enumeration.mappings {
        writeln!(out, "    #[serde(rename = \"{}\")]", value.replace('"', "\\\""))?;
        writeln!(out, "    {},", pascal_case(key))?;
    }
    writeln!(out, "}}")
}
