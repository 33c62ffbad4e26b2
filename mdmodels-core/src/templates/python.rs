//! Python templates
//!
//! Three flavors share one renderer:
//!
//! | Template              | Base class                  | Field helper              |
//! |-----------------------|-----------------------------|---------------------------|
//! | `python-pydantic`     | `pydantic.BaseModel`        | `Field(...)`              |
//! | `python-pydantic-xml` | `pydantic_xml.BaseXmlModel` | `attr(...)`/`element(...)`|
//! | `python-dataclass`    | `@dataclass`                | `field(...)`              |
//!
//! Enumerations are emitted first as `str` enums so that objects can refer to them.
//! Unions map to `Union[...]`, `multiple` to `List[...]`, optional fields to
//! `Optional[...]` defaulting to `None`.

use super::common::{escape_string, kind_of, one_line, unique, uses_primitive, Kind};
use crate::error::ConvertError;
use crate::model::{Attribute, DataModel, Enumeration, Object, PrimitiveType};
use crate::template::{Template, TemplateId};
use std::fmt::Write;

const KEYWORDS: &[&str] = &[
    "False", "None", "True", "and", "as", "assert", "async", "await", "break", "class",
    "continue", "def", "del", "elif", "else", "except", "finally", "for", "from", "global",
    "if", "import", "in", "is", "lambda", "nonlocal", "not", "or", "pass", "raise",
    "return", "try", "while", "with", "yield",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flavor {
    Pydantic,
    PydanticXml,
    Dataclass,
}

pub struct PydanticTemplate;
pub struct PydanticXmlTemplate;
pub struct DataclassTemplate;

impl Template for PydanticTemplate {
    fn id(&self) -> TemplateId {
        TemplateId::PythonPydantic
    }

    fn description(&self) -> &str {
        "Pydantic v2 models"
    }

    fn file_extension(&self) -> &str {
        "py"
    }

    fn render(&self, model: &DataModel) -> Result<String, ConvertError> {
        render_python(model, Flavor::Pydantic)
    }
}

impl Template for PydanticXmlTemplate {
    fn id(&self) -> TemplateId {
        TemplateId::PythonPydanticXML
    }

    fn description(&self) -> &str {
        "pydantic-xml models with XML bindings"
    }

    fn file_extension(&self) -> &str {
        "py"
    }

    fn render(&self, model: &DataModel) -> Result<String, ConvertError> {
        render_python(model, Flavor::PydanticXml)
    }
}

impl Template for DataclassTemplate {
    fn id(&self) -> TemplateId {
        TemplateId::PythonDataclass
    }

    fn description(&self) -> &str {
        "Standard library dataclasses"
    }

    fn file_extension(&self) -> &str {
        "py"
    }

    fn render(&self, model: &DataModel) -> Result<String, ConvertError> {
        render_python(model, Flavor::Dataclass)
    }
}

fn python_primitive(primitive: PrimitiveType) -> &'static str {
    match primitive {
        PrimitiveType::String | PrimitiveType::Identifier => "str",
        PrimitiveType::Integer => "int",
        PrimitiveType::Float | PrimitiveType::Number => "float",
        PrimitiveType::Boolean => "bool",
        PrimitiveType::Bytes => "bytes",
        PrimitiveType::Date => "date",
        PrimitiveType::DateTime => "datetime",
    }
}

fn python_name(name: &str) -> String {
    if KEYWORDS.contains(&name) {
        format!("{name}_")
    } else {
        name.to_string()
    }
}

/// Base type of an attribute, without the `List`/`Optional` wrapper.
fn base_type(model: &DataModel, attribute: &Attribute) -> String {
    let names: Vec<String> = attribute
        .dtypes
        .iter()
        .map(|dtype| match kind_of(model, dtype) {
            Kind::Primitive(primitive) => python_primitive(primitive).to_string(),
            Kind::Object(name) | Kind::Enum(name) | Kind::Unknown(name) => name.to_string(),
        })
        .collect();
    let names = unique(names);
    match names.len() {
        0 => "Any".to_string(),
        1 => names[0].clone(),
        _ => format!("Union[{}]", names.join(", ")),
    }
}

fn annotation(model: &DataModel, attribute: &Attribute) -> String {
    let base = base_type(model, attribute);
    if attribute.multiple {
        format!("List[{base}]")
    } else if attribute.is_required() {
        base
    } else {
        format!("Optional[{base}]")
    }
}

/// A default value as a Python literal.
fn python_literal(model: &DataModel, attribute: &Attribute, value: &str) -> String {
    let numeric = attribute.dtypes.iter().any(|dtype| {
        matches!(
            kind_of(model, dtype),
            Kind::Primitive(PrimitiveType::Integer | PrimitiveType::Float | PrimitiveType::Number)
        )
    });
    match value.to_ascii_lowercase().as_str() {
        "true" => return "True".to_string(),
        "false" => return "False".to_string(),
        _ => {}
    }
    if numeric && value.parse::<f64>().is_ok() {
        value.to_string()
    } else {
        format!("\"{}\"", escape_string(value.trim_matches('"')))
    }
}

fn render_python(model: &DataModel, flavor: Flavor) -> Result<String, ConvertError> {
    let mut out = String::new();
    render_imports(&mut out, model, flavor)?;

    for enumeration in &model.enums {
        writeln!(out)?;
        writeln!(out)?;
        render_enum(&mut out, enumeration)?;
    }
    for object in &model.objects {
        writeln!(out)?;
        writeln!(out)?;
        render_object(&mut out, model, object, flavor)?;
    }

    if flavor != Flavor::Dataclass && !model.objects.is_empty() {
        writeln!(out)?;
        writeln!(out)?;
        for object in &model.objects {
            writeln!(out, "{}.model_rebuild()", object.name)?;
        }
    }
    Ok(out)
}

fn render_imports(out: &mut String, model: &DataModel, flavor: Flavor) -> std::fmt::Result {
    writeln!(out, "from __future__ import annotations")?;
    writeln!(out)?;

    let needs_date = uses_primitive(model, &[PrimitiveType::Date]);
    let needs_datetime = uses_primitive(model, &[PrimitiveType::DateTime]);
    if flavor == Flavor::Dataclass {
        writeln!(out, "from dataclasses import dataclass, field")?;
    }
    match (needs_date, needs_datetime) {
        (true, true) => writeln!(out, "from datetime import date, datetime")?,
        (true, false) => writeln!(out, "from datetime import date")?,
        (false, true) => writeln!(out, "from datetime import datetime")?,
        (false, false) => {}
    }
    if !model.enums.is_empty() {
        writeln!(out, "from enum import Enum")?;
    }
    writeln!(out, "from typing import Any, List, Optional, Union")?;

    match flavor {
        Flavor::Pydantic => {
            writeln!(out)?;
            writeln!(out, "from pydantic import BaseModel, ConfigDict, Field")?;
        }
        Flavor::PydanticXml => {
            writeln!(out)?;
            writeln!(out, "from pydantic_xml import BaseXmlModel, attr, element")?;
        }
        Flavor::Dataclass => {}
    }
    Ok(())
}

/// Docstring body on one line, with quotes escaped so `"""` cannot end it early.
fn docstring(text: &str) -> String {
    escape_string(&one_line(text))
}

fn render_enum(out: &mut String, enumeration: &Enumeration) -> std::fmt::Result {
    writeln!(out, "class {}(str, Enum):", enumeration.name)?;
    if !enumeration.docstring.is_empty() {
        writeln!(out, "    \"\"\"{}\"\"\"", docstring(&enumeration.docstring))?;
        writeln!(out)?;
    }
    if enumeration.mappings.is_empty() {
        writeln!(out, "    pass")?;
    }
    for (key, value) in &enumeration.mappings {
        writeln!(out, "    {} = \"{}\"", python_name(key), escape_string(value))?;
    }
    Ok(())
}

fn render_object(
    out: &mut String,
    model: &DataModel,
    object: &Object,
    flavor: Flavor,
) -> std::fmt::Result {
    match flavor {
        Flavor::Pydantic => writeln!(out, "class {}(BaseModel):", object.name)?,
        Flavor::PydanticXml => writeln!(
            out,
            "class {}(BaseXmlModel, tag=\"{}\", search_mode=\"unordered\"):",
            object.name, object.name
        )?,
        Flavor::Dataclass => {
            writeln!(out, "@dataclass")?;
            writeln!(out, "class {}:", object.name)?;
        }
    }

    let mut body = String::new();
    if !object.docstring.is_empty() {
        writeln!(body, "    \"\"\"{}\"\"\"", docstring(&object.docstring))?;
        writeln!(body)?;
    }
    if flavor == Flavor::Pydantic {
        writeln!(body, "    model_config = ConfigDict(populate_by_name=True)")?;
        writeln!(body)?;
    }

    let mut attributes: Vec<&Attribute> = object.attributes.iter().collect();
    if flavor == Flavor::Dataclass {
        // Fields without a default must precede fields with one.
        attributes.sort_by_key(|a| !(a.is_required() && !a.multiple && a.default_value().is_none()));
    }
    for attribute in attributes {
        writeln!(body, "    {}", field_line(model, attribute, flavor))?;
    }

    if body.trim().is_empty() {
        writeln!(out, "    pass")
    } else {
        out.push_str(body.trim_end_matches('\n'));
        writeln!(out)
    }
}

fn field_line(model: &DataModel, attribute: &Attribute, flavor: Flavor) -> String {
    let name = python_name(&attribute.name);
    let annotation = annotation(model, attribute);

    let default = if attribute.multiple {
        Some("default_factory=list".to_string())
    } else if let Some(value) = attribute.default_value() {
        Some(format!("default={}", python_literal(model, attribute, value)))
    } else if attribute.is_required() {
        None
    } else {
        Some("default=None".to_string())
    };

    match flavor {
        Flavor::Dataclass => match default {
            Some(default) if attribute.multiple => format!("{name}: {annotation} = field({default})"),
            Some(default) => {
                let value = default.trim_start_matches("default=");
                format!("{name}: {annotation} = {value}")
            }
            None => format!("{name}: {annotation}"),
        },
        Flavor::Pydantic => {
            let mut args = vec![default.unwrap_or_else(|| "...".to_string())];
            if name != attribute.name {
                args.push(format!("alias=\"{}\"", attribute.name));
            }
            if !attribute.docstring.is_empty() {
                args.push(format!("description=\"{}\"", escape_string(&attribute.docstring)));
            }
            if let Some(term) = &attribute.term {
                args.push(format!(
                    "json_schema_extra={{\"term\": \"{}\"}}",
                    escape_string(term)
                ));
            }
            format!("{name}: {annotation} = Field({})", args.join(", "))
        }
        Flavor::PydanticXml => {
            let is_simple = attribute
                .dtypes
                .iter()
                .all(|d| !matches!(kind_of(model, d), Kind::Object(_)));
            let mut args = Vec::new();
            let helper = if attribute.xml.is_attr && is_simple && !attribute.multiple {
                args.push(format!("name=\"{}\"", attribute.xml.name));
                "attr"
            } else {
                args.push(format!("tag=\"{}\"", attribute.xml.name));
                "element"
            };
            if let Some(default) = default {
                args.push(default);
            }
            format!("{name}: {annotation} = {helper}({})", args.join(", "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;
    use insta::assert_snapshot;

    const SOURCE: &str = "### Sample\n\nA lab sample.\n\n- __id__\n  - Type: string\n  - XML: @id\n- tags\n  - Type: string[]\n- volume\n  - Type: float\n  - Default: 1.5\n- color\n  - Type: Color\n  - Description: Sample color\n- taken\n  - Type: date | datetime\n\n### Color\n\n```\nRED = \"red\"\n```\n";

    fn model() -> DataModel {
        parse(SOURCE).unwrap().model
    }

    #[test]
    fn test_pydantic() {
        assert_snapshot!(PydanticTemplate.render(&model()).unwrap(), @r###"
        from __future__ import annotations

        from datetime import date, datetime
        from enum import Enum
        from typing import Any, List, Optional, Union

        from pydantic import BaseModel, ConfigDict, Field


        class Color(str, Enum):
            RED = "red"


        class Sample(BaseModel):
            """A lab sample."""

            model_config = ConfigDict(populate_by_name=True)

            id: str = Field(...)
            tags: List[str] = Field(default_factory=list)
            volume: Optional[float] = Field(default=1.5)
            color: Optional[Color] = Field(default=None, description="Sample color")
            taken: Optional[Union[date, datetime]] = Field(default=None)


        Sample.model_rebuild()
        "###);
    }

    #[test]
    fn test_pydantic_xml_fields() {
        let out = PydanticXmlTemplate.render(&model()).unwrap();
        assert!(out.contains("class Sample(BaseXmlModel, tag=\"Sample\", search_mode=\"unordered\"):"));
        assert!(out.contains("id: str = attr(name=\"id\")"));
        assert!(out.contains("tags: List[str] = element(tag=\"tags\", default_factory=list)"));
        assert!(out.contains("color: Optional[Color] = element(tag=\"color\", default=None)"));
    }

    #[test]
    fn test_dataclass_orders_required_fields_first() {
        let out = DataclassTemplate
            .render(&parse("### A\n- x\n  - Type: integer\n- __id__\n  - Type: string\n").unwrap().model)
            .unwrap();
        let id = out.find("id: str").unwrap();
        let x = out.find("x: Optional[int] = None").unwrap();
        assert!(id < x);
        assert!(out.contains("@dataclass\nclass A:"));
        assert!(!out.contains("model_rebuild"));
    }

    #[test]
    fn test_docstring_quotes_are_escaped() {
        let model = parse("### Sample\n\nSays \"\"\"hi\"\"\" twice.\n\n- x\n  - Type: string\n")
            .unwrap()
            .model;
        let out = PydanticTemplate.render(&model).unwrap();
        assert!(out.contains(r#"    """Says \"\"\"hi\"\"\" twice.""""#));
    }

    #[test]
    fn test_keywords_are_escaped() {
        let out = PydanticTemplate
            .render(&parse("### A\n- from\n  - Type: string\n").unwrap().model)
            .unwrap();
        assert!(out.contains("from_: Optional[str] = Field(default=None, alias=\"from\")"));
    }
}
