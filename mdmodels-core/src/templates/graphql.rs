//! GraphQL schema template
//!
//! Objects become object types, enumerations enum types named after their keys.
//! Identifiers map to `ID!`, required fields get a `!`. GraphQL unions may only join
//! object types, so attributes with several dtypes keep the first one.

use super::common::{alternatives, kind_of, Kind, UnionPolicy};
use crate::error::ConvertError;
use crate::model::{Attribute, DataModel, PrimitiveType};
use crate::template::{Template, TemplateId};
use std::fmt::Write;

pub struct GraphqlTemplate;

impl Template for GraphqlTemplate {
    fn id(&self) -> TemplateId {
        TemplateId::Graphql
    }

    fn description(&self) -> &str {
        "GraphQL schema types"
    }

    fn file_extension(&self) -> &str {
        "graphql"
    }

    fn render(&self, model: &DataModel) -> Result<String, ConvertError> {
        let mut blocks = Vec::new();

        for object in &model.objects {
            let mut block = description(&object.docstring, "");
            writeln!(block, "type {} {{", object.name)?;
            for attribute in &object.attributes {
                block.push_str(&description(&attribute.docstring, "  "));
                writeln!(block, "  {}: {}", attribute.name, field_type(model, attribute))?;
            }
            writeln!(block, "}}")?;
            blocks.push(block);
        }

        for enumeration in &model.enums {
            let mut block = description(&enumeration.docstring, "");
            writeln!(block, "enum {} {{", enumeration.name)?;
            for key in enumeration.mappings.keys() {
                writeln!(block, "  {key}")?;
            }
            writeln!(block, "}}")?;
            blocks.push(block);
        }

        Ok(blocks.join("\n"))
    }
}

fn graphql_primitive(primitive: PrimitiveType) -> &'static str {
    match primitive {
        PrimitiveType::Identifier => "ID",
        PrimitiveType::String
        | PrimitiveType::Bytes
        | PrimitiveType::Date
        | PrimitiveType::DateTime => "String",
        PrimitiveType::Integer => "Int",
        PrimitiveType::Float | PrimitiveType::Number => "Float",
        PrimitiveType::Boolean => "Boolean",
    }
}

fn field_type(model: &DataModel, attribute: &Attribute) -> String {
    let base = if attribute.is_id {
        "ID".to_string()
    } else {
        match alternatives(attribute, UnionPolicy::FirstWins).first() {
            Some(dtype) => match kind_of(model, dtype) {
                Kind::Primitive(primitive) => graphql_primitive(primitive).to_string(),
                Kind::Object(name) | Kind::Enum(name) | Kind::Unknown(name) => name.to_string(),
            },
            None => "String".to_string(),
        }
    };

    let bang = if attribute.is_required() { "!" } else { "" };
    if attribute.multiple {
        format!("[{base}!]{bang}")
    } else {
        format!("{base}{bang}")
    }
}

fn description(text: &str, indent: &str) -> String {
    if text.is_empty() {
        String::new()
    } else if text.contains('\n') {
        format!("{indent}\"\"\"\n{indent}{}\n{indent}\"\"\"\n", text.replace('\n', &format!("\n{indent}")))
    } else {
        format!("{indent}\"{}\"\n", text.replace('"', "\\\""))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;
    use insta::assert_snapshot;

    #[test]
    fn test_render_types_and_enums() {
        let source = "### Sample\n\nA lab sample.\n\n- __id__\n  - Type: string\n- tags\n  - Type: string[]\n  - Required: true\n- parent\n  - Type: Sample\n  - Description: Where it came from\n- color\n  - Type: Color\n\n### Color\n\n```\nRED = \"red\"\n```\n";
        let model = parse(source).unwrap().model;
        assert_snapshot!(GraphqlTemplate.render(&model).unwrap(), @r###"
        "A lab sample."
        type Sample {
          id: ID!
          tags: [String!]!
          "Where it came from"
          parent: Sample
          color: Color
        }

        enum Color {
          RED
        }
        "###);
    }

    #[test]
    fn test_union_uses_first_alternative() {
        let model = parse("### A\n- v\n  - Type: float | string\n").unwrap().model;
        let out = GraphqlTemplate.render(&model).unwrap();
        assert!(out.contains("  v: Float\n"));
    }
}
