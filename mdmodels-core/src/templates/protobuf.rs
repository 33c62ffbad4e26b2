//! Protocol Buffers template (proto3)
//!
//! One message per object, one enum per enumeration. Field numbers follow attribute
//! order. proto3 enums need a zero value, so every enum starts with
//! `<NAME>_UNSPECIFIED = 0` and the members follow in key order, each carrying its value
//! as a trailing comment. `oneof` cannot hold repeated fields, so unions use the first
//! alternative.

use super::common::{alternatives, comment_lines, kind_of, pascal_case, screaming_snake_case, snake_case, Kind, UnionPolicy};
use crate::error::ConvertError;
use crate::model::{Attribute, DataModel, Enumeration, Object, PrimitiveType};
use crate::template::{Template, TemplateId};
use std::fmt::Write;

pub struct ProtobufTemplate;

impl Template for ProtobufTemplate {
    fn id(&self) -> TemplateId {
        TemplateId::Protobuf
    }

    fn description(&self) -> &str {
        "Protocol Buffers (proto3) messages"
    }

    fn file_extension(&self) -> &str {
        "proto"
    }

    fn render(&self, model: &DataModel) -> Result<String, ConvertError> {
        let mut out = String::new();
        writeln!(out, "syntax = \"proto3\";")?;
        writeln!(out)?;
        let package = model
            .name
            .as_deref()
            .map(snake_case)
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| "model".to_string());
        writeln!(out, "package {package};")?;

        for object in &model.objects {
            writeln!(out)?;
            render_message(&mut out, model, object)?;
        }
        for enumeration in &model.enums {
            writeln!(out)?;
            render_enum(&mut out, enumeration)?;
        }
        Ok(out)
    }
}

fn proto_primitive(primitive: PrimitiveType) -> &'static str {
    match primitive {
        PrimitiveType::String
        | PrimitiveType::Identifier
        | PrimitiveType::Date
        | PrimitiveType::DateTime => "string",
        PrimitiveType::Integer => "int64",
        PrimitiveType::Float | PrimitiveType::Number => "double",
        PrimitiveType::Boolean => "bool",
        PrimitiveType::Bytes => "bytes",
    }
}

fn field_type(model: &DataModel, attribute: &Attribute) -> (String, bool) {
    match alternatives(attribute, UnionPolicy::FirstWins).first() {
        Some(dtype) => match kind_of(model, dtype) {
            Kind::Primitive(primitive) => (proto_primitive(primitive).to_string(), true),
            Kind::Object(name) | Kind::Enum(name) | Kind::Unknown(name) => {
                (pascal_case(name), false)
            }
        },
        None => ("string".to_string(), true),
    }
}

fn render_message(out: &mut String, model: &DataModel, object: &Object) -> std::fmt::Result {
    out.push_str(&comment_lines(&object.docstring, "// ", ""));
    writeln!(out, "message {} {{", pascal_case(&object.name))?;
    for (idx, attribute) in object.attributes.iter().enumerate() {
        out.push_str(&comment_lines(&attribute.docstring, "// ", "  "));
        let (dtype, scalar) = field_type(model, attribute);
        let label = if attribute.multiple {
            "repeated "
        } else if scalar && !attribute.is_required() {
            "optional "
        } else {
            ""
        };
        writeln!(
            out,
            "  {label}{dtype} {} = {};",
            snake_case(&attribute.name),
            idx + 1
        )?;
    }
    writeln!(out, "}}")
}

fn render_enum(out: &mut String, enumeration: &Enumeration) -> std::fmt::Result {
    let prefix = screaming_snake_case(&enumeration.name);
    out.push_str(&comment_lines(&enumeration.docstring, "// ", ""));
    writeln!(out, "enum {} {{", pascal_case(&enumeration.name))?;
    writeln!(out, "  {prefix}_UNSPECIFIED = 0;")?;
    for (idx, (key, value)) in enumeration.mappings.iter().enumerate() {
        writeln!(
            out,
            "  {prefix}_{} = {}; // {value}",
            screaming_snake_case(key),
            idx + 1
        )?;
    }
    writeln!(out, "}}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;
    use insta::assert_snapshot;

    #[test]
    fn test_render_message_and_enum() {
        let source = "# Lab Data\n### Sample\n\nA lab sample.\n\n- __id__\n  - Type: string\n- tags\n  - Type: string[]\n- volume\n  - Type: float | string\n- color\n  - Type: Color\n\n### Color\n\n```\nRED = \"red\"\nDARK_BLUE = \"dark blue\"\n```\n";
        let model = parse(source).unwrap().model;
        assert_snapshot!(ProtobufTemplate.render(&model).unwrap(), @r###"
        syntax = "proto3";

        package lab_data;

        // A lab sample.
        message Sample {
          string id = 1;
          repeated string tags = 2;
          optional double volume = 3;
          Color color = 4;
        }

        enum Color {
          COLOR_UNSPECIFIED = 0;
          COLOR_DARK_BLUE = 1; // dark blue
          COLOR_RED = 2; // red
        }
        "###);
    }
}
