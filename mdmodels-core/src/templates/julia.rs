//! Julia template
//!
//! A module with one `Base.@kwdef mutable struct` per object and an `@enum` per
//! enumeration (member values kept in a lookup dictionary). Unions use Julia's native
//! `Union{...}`; optional fields add `Nothing` and default to `nothing`.

use super::common::{escape_string, kind_of, model_title, pascal_case, unique, uses_primitive, Kind};
use crate::error::ConvertError;
use crate::model::{Attribute, DataModel, Enumeration, Object, PrimitiveType};
use crate::template::{Template, TemplateId};
use std::fmt::Write;

pub struct JuliaTemplate;

impl Template for JuliaTemplate {
    fn id(&self) -> TemplateId {
        TemplateId::Julia
    }

    fn description(&self) -> &str {
        "Julia module with structs and enums"
    }

    fn file_extension(&self) -> &str {
        "jl"
    }

    fn render(&self, model: &DataModel) -> Result<String, ConvertError> {
        let mut out = String::new();
        let module = pascal_case(model_title(model));
        writeln!(out, "module {module}")?;

        if uses_primitive(model, &[PrimitiveType::Date, PrimitiveType::DateTime]) {
            writeln!(out)?;
            writeln!(out, "using Dates")?;
        }

        let exports: Vec<&str> = model.type_names();
        if !exports.is_empty() {
            writeln!(out)?;
            writeln!(out, "export {}", exports.join(", "))?;
        }

        for enumeration in &model.enums {
            writeln!(out)?;
            render_enum(&mut out, enumeration)?;
        }
        for object in &model.objects {
            writeln!(out)?;
            render_struct(&mut out, model, object)?;
        }

        writeln!(out)?;
        writeln!(out, "end # module {module}")?;
        Ok(out)
    }
}

fn julia_primitive(primitive: PrimitiveType) -> &'static str {
    match primitive {
        PrimitiveType::String | PrimitiveType::Identifier => "String",
        PrimitiveType::Integer => "Int64",
        PrimitiveType::Float | PrimitiveType::Number => "Float64",
        PrimitiveType::Boolean => "Bool",
        PrimitiveType::Bytes => "Vector{UInt8}",
        PrimitiveType::Date => "Date",
        PrimitiveType::DateTime => "DateTime",
    }
}

fn field_type(model: &DataModel, attribute: &Attribute) -> String {
    let names = unique(
        attribute
            .dtypes
            .iter()
            .map(|dtype| match kind_of(model, dtype) {
                Kind::Primitive(primitive) => julia_primitive(primitive).to_string(),
                Kind::Object(name) | Kind::Enum(name) | Kind::Unknown(name) => name.to_string(),
            })
            .collect(),
    );
    let base = match names.len() {
        0 => "Any".to_string(),
        1 => names[0].clone(),
        _ => format!("Union{{{}}}", names.join(",")),
    };

    if attribute.multiple {
        format!("Vector{{{base}}}")
    } else if attribute.is_required() {
        base
    } else if names.len() > 1 {
        format!("Union{{{},Nothing}}", names.join(","))
    } else {
        format!("Union{{{base},Nothing}}")
    }
}

fn default_value(model: &DataModel, attribute: &Attribute, dtype: &str) -> Option<String> {
    if attribute.multiple {
        return Some(format!("{dtype}()"));
    }
    if let Some(value) = attribute.default_value() {
        let typed = attribute.dtypes.iter().any(|d| {
            matches!(
                kind_of(model, d),
                Kind::Primitive(
                    PrimitiveType::Integer
                        | PrimitiveType::Float
                        | PrimitiveType::Number
                        | PrimitiveType::Boolean
                )
            )
        });
        return Some(if typed {
            value.to_ascii_lowercase()
        } else {
            format!("\"{}\"", escape_string(value.trim_matches('"')))
        });
    }
    if attribute.is_required() {
        None
    } else {
        Some("nothing".to_string())
    }
}

fn render_struct(out: &mut String, model: &DataModel, object: &Object) -> std::fmt::Result {
    if !object.docstring.is_empty() {
        writeln!(out, "\"\"\"")?;
        writeln!(out, "{}", object.docstring)?;
        writeln!(out, "\"\"\"")?;
    }
    writeln!(out, "Base.@kwdef mutable struct {}", object.name)?;
    for attribute in &object.attributes {
        let dtype = field_type(model, attribute);
        match default_value(model, attribute, &dtype) {
            Some(default) => writeln!(out, "    {}::{dtype} = {default}", attribute.name)?,
            None => writeln!(out, "    {}::{dtype}", attribute.name)?,
        }
    }
    writeln!(out, "end")
}

fn render_enum(out: &mut String, enumeration: &Enumeration) -> std::fmt::Result {
    if !enumeration.docstring.is_empty() {
        writeln!(out, "\"\"\"")?;
        writeln!(out, "{}", enumeration.docstring)?;
        writeln!(out, "\"\"\"")?;
    }
    let keys: Vec<&str> = enumeration.mappings.keys().map(String::as_str).collect();
    writeln!(out, "@enum {} {}", enumeration.name, keys.join(" "))?;
    writeln!(out)?;
    writeln!(
        out,
        "const {}_VALUES = Dict{{{},String}}(",
        enumeration.name.to_uppercase(),
        enumeration.name
    )?;
    for (key, value) in &enumeration.mappings {
        writeln!(out, "    {key} => \"{}\",", escape_string(value))?;
    }
    writeln!(out, ")")
}
