//! Go template
//!
//! Objects become structs with `json` and `xml` tags, enumerations a named `string`
//! type with one constant per member. Go has no unions: the first dtype wins. Optional
//! scalars and object references are pointers.

use super::common::{alternatives, comment_lines, kind_of, pascal_case, snake_case, uses_primitive, Kind, UnionPolicy};
use crate::error::ConvertError;
use crate::model::{Attribute, DataModel, Enumeration, Object, PrimitiveType};
use crate::template::{Template, TemplateId};
use std::fmt::Write;

pub struct GolangTemplate;

impl Template for GolangTemplate {
    fn id(&self) -> TemplateId {
        TemplateId::Golang
    }

    fn description(&self) -> &str {
        "Go structs with json and xml tags"
    }

    fn file_extension(&self) -> &str {
        "go"
    }

    fn render(&self, model: &DataModel) -> Result<String, ConvertError> {
        let mut out = String::new();
        let package = model
            .name
            .as_deref()
            .map(|n| snake_case(n).replace('_', ""))
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| "model".to_string());
        writeln!(out, "package {package}")?;

        if uses_primitive(model, &[PrimitiveType::Date, PrimitiveType::DateTime]) {
            writeln!(out)?;
            writeln!(out, "import \"time\"")?;
        }

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

fn go_primitive(primitive: PrimitiveType) -> &'static str {
    match primitive {
        PrimitiveType::String | PrimitiveType::Identifier => "string",
        PrimitiveType::Integer => "int64",
        PrimitiveType::Float | PrimitiveType::Number => "float64",
        PrimitiveType::Boolean => "bool",
        PrimitiveType::Bytes => "[]byte",
        PrimitiveType::Date | PrimitiveType::DateTime => "time.Time",
    }
}

fn field_type(model: &DataModel, attribute: &Attribute) -> String {
    let (base, is_object) = match alternatives(attribute, UnionPolicy::FirstWins).first() {
        Some(dtype) => match kind_of(model, dtype) {
            Kind::Primitive(primitive) => (go_primitive(primitive).to_string(), false),
            Kind::Enum(name) => (pascal_case(name), false),
            Kind::Object(name) | Kind::Unknown(name) => (pascal_case(name), true),
        },
        None => ("interface{}".to_string(), false),
    };

    if attribute.multiple {
        format!("[]{base}")
    } else if is_object || !attribute.is_required() {
        format!("*{base}")
    } else {
        base
    }
}

fn render_struct(out: &mut String, model: &DataModel, object: &Object) -> std::fmt::Result {
    let name = pascal_case(&object.name);
    if object.docstring.is_empty() {
        writeln!(out, "// {name} is generated from the data model.")?;
    } else {
        out.push_str(&comment_lines(&format!("{name} {}", object.docstring), "// ", ""));
    }
    writeln!(out, "type {name} struct {{")?;

    let rows: Vec<(String, String, String)> = object
        .attributes
        .iter()
        .map(|attribute| {
            let omit = if attribute.is_required() { "" } else { ",omitempty" };
            let xml = if attribute.xml.is_attr {
                format!("{},attr{omit}", attribute.xml.name)
            } else {
                format!("{}{omit}", attribute.xml.name)
            };
            (
                pascal_case(&attribute.name),
                field_type(model, attribute),
                format!("`json:\"{}{omit}\" xml:\"{xml}\"`", attribute.name),
            )
        })
        .collect();

    // gofmt aligns field names and types in columns.
    let name_width = rows.iter().map(|r| r.0.len()).max().unwrap_or(0);
    let type_width = rows.iter().map(|r| r.1.len()).max().unwrap_or(0);
    for (field, dtype, tag) in rows {
        writeln!(out, "\t{field:<name_width$} {dtype:<type_width$} {tag}")?;
    }
    writeln!(out, "}}")
}

fn render_enum(out: &mut String, enumeration: &Enumeration) -> std::fmt::Result {
    let name = pascal_case(&enumeration.name);
    if !enumeration.docstring.is_empty() {
        out.push_str(&comment_lines(&format!("{name} {}", enumeration.docstring), "// ", ""));
    }
    writeln!(out, "type {name} string")?;
    if enumeration.mappings.is_empty() {
        return Ok(());
    }

    writeln!(out)?;
    writeln!(out, "const (")?;
    let constants: Vec<(String, &String)> = enumeration
        .mappings
        .iter()
        .map(|(key, value)| (format!("{name}{}", pascal_case(key)), value))
        .collect();
    let width = constants.iter().map(|c| c.0.len()).max().unwrap_or(0);
    for (constant, value) in constants {
        writeln!(out, "\t{constant:<width$} {name} = {value:?}")?;
    }
    writeln!(out, ")")
}
