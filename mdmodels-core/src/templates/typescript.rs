//! TypeScript templates
//!
//! Both flavors declare plain interfaces and string literal unions for the static
//! types, then a runtime codec per definition:
//!
//! - `typescript`: io-ts codecs (`t.type` / `t.partial`), wrapped in `t.recursion`
//! - `typescript-zod`: zod schemas, wrapped in `z.lazy`
//!
//! The lazy wrappers make declaration order irrelevant, so cyclic models work.

use super::common::{comment_lines, kind_of, unique, Kind};
use crate::error::ConvertError;
use crate::model::{Attribute, DataModel, Enumeration, Object, PrimitiveType};
use crate::template::{Template, TemplateId};
use std::fmt::Write;

pub struct TypescriptTemplate;
pub struct ZodTemplate;

impl Template for TypescriptTemplate {
    fn id(&self) -> TemplateId {
        TemplateId::Typescript
    }

    fn description(&self) -> &str {
        "TypeScript interfaces with io-ts codecs"
    }

    fn file_extension(&self) -> &str {
        "ts"
    }

    fn render(&self, model: &DataModel) -> Result<String, ConvertError> {
        let mut out = String::new();
        writeln!(out, "import * as t from \"io-ts\";")?;

        for enumeration in &model.enums {
            writeln!(out)?;
            render_enum_type(&mut out, enumeration)?;
            let codec = match enumeration.mappings.len() {
                0 => "t.never".to_string(),
                1 => literal_list(enumeration, "t.literal")[0].clone(),
                _ => format!("t.union([{}])", literal_list(enumeration, "t.literal").join(", ")),
            };
            writeln!(
                out,
                "export const {0}Codec: t.Type<{0}> = {codec};",
                enumeration.name
            )?;
        }

        for object in &model.objects {
            writeln!(out)?;
            render_interface(&mut out, model, object)?;
            writeln!(out)?;
            render_io_ts_codec(&mut out, model, object)?;
        }
        Ok(out)
    }
}

impl Template for ZodTemplate {
    fn id(&self) -> TemplateId {
        TemplateId::TypescriptZod
    }

    fn description(&self) -> &str {
        "TypeScript interfaces with zod schemas"
    }

    fn file_extension(&self) -> &str {
        "ts"
    }

    fn render(&self, model: &DataModel) -> Result<String, ConvertError> {
        let mut out = String::new();
        writeln!(out, "import {{ z }} from \"zod\";")?;

        for enumeration in &model.enums {
            writeln!(out)?;
            render_enum_type(&mut out, enumeration)?;
            let schema = if enumeration.mappings.is_empty() {
                "z.never()".to_string()
            } else {
                let values: Vec<String> = enumeration
                    .mappings
                    .values()
                    .map(|v| format!("{v:?}"))
                    .collect();
                format!("z.enum([{}])", values.join(", "))
            };
            writeln!(
                out,
                "export const {0}Schema: z.ZodType<{0}> = {schema};",
                enumeration.name
            )?;
        }

        for object in &model.objects {
            writeln!(out)?;
            render_interface(&mut out, model, object)?;
            writeln!(out)?;
            render_zod_schema(&mut out, model, object)?;
        }
        Ok(out)
    }
}

fn ts_primitive(primitive: PrimitiveType) -> &'static str {
    match primitive {
        PrimitiveType::String
        | PrimitiveType::Identifier
        | PrimitiveType::Bytes
        | PrimitiveType::Date
        | PrimitiveType::DateTime => "string",
        PrimitiveType::Integer | PrimitiveType::Float | PrimitiveType::Number => "number",
        PrimitiveType::Boolean => "boolean",
    }
}

fn literal_list(enumeration: &Enumeration, constructor: &str) -> Vec<String> {
    enumeration
        .mappings
        .values()
        .map(|v| format!("{constructor}({v:?})"))
        .collect()
}

fn render_enum_type(out: &mut String, enumeration: &Enumeration) -> std::fmt::Result {
    out.push_str(&jsdoc(&enumeration.docstring, ""));
    let members: Vec<String> = enumeration
        .mappings
        .values()
        .map(|v| format!("{v:?}"))
        .collect();
    let union = if members.is_empty() {
        "never".to_string()
    } else {
        members.join(" | ")
    };
    writeln!(out, "export type {} = {union};", enumeration.name)
}

fn jsdoc(text: &str, indent: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    if !text.contains('\n') {
        return format!("{indent}/** {text} */\n");
    }
    format!(
        "{indent}/**\n{}{indent} */\n",
        comment_lines(text, " * ", indent)
    )
}

/// Static type of an attribute.
fn ts_type(model: &DataModel, attribute: &Attribute) -> String {
    let names: Vec<String> = attribute
        .dtypes
        .iter()
        .map(|dtype| match kind_of(model, dtype) {
            Kind::Primitive(primitive) => ts_primitive(primitive).to_string(),
            Kind::Object(name) | Kind::Enum(name) | Kind::Unknown(name) => name.to_string(),
        })
        .collect();
    let names = unique(names);
    let base = match names.len() {
        0 => "unknown".to_string(),
        1 => names[0].clone(),
        _ => names.join(" | "),
    };
    match (attribute.multiple, names.len() > 1) {
        (true, true) => format!("({base})[]"),
        (true, false) => format!("{base}[]"),
        (false, _) => base,
    }
}

fn render_interface(out: &mut String, model: &DataModel, object: &Object) -> std::fmt::Result {
    out.push_str(&jsdoc(&object.docstring, ""));
    writeln!(out, "export interface {} {{", object.name)?;
    for attribute in &object.attributes {
        out.push_str(&jsdoc(&attribute.docstring, "  "));
        let optional = if attribute.is_required() { "" } else { "?" };
        writeln!(
            out,
            "  {}{optional}: {};",
            attribute.name,
            ts_type(model, attribute)
        )?;
    }
    writeln!(out, "}}")
}

fn io_ts_codec(model: &DataModel, attribute: &Attribute) -> String {
    let codecs: Vec<String> = attribute
        .dtypes
        .iter()
        .map(|dtype| match kind_of(model, dtype) {
            Kind::Primitive(primitive) => format!("t.{}", ts_primitive(primitive)),
            Kind::Object(name) | Kind::Enum(name) | Kind::Unknown(name) => format!("{name}Codec"),
        })
        .collect();
    let codecs = unique(codecs);
    let base = match codecs.len() {
        0 => "t.unknown".to_string(),
        1 => codecs[0].clone(),
        _ => format!("t.union([{}])", codecs.join(", ")),
    };
    if attribute.multiple {
        format!("t.array({base})")
    } else {
        base
    }
}

fn render_io_ts_codec(out: &mut String, model: &DataModel, object: &Object) -> std::fmt::Result {
    writeln!(
        out,
        "export const {0}Codec: t.Type<{0}> = t.recursion(\"{0}\", () =>",
        object.name
    )?;
    writeln!(out, "  t.intersection([")?;
    for (constructor, required) in [("t.type", true), ("t.partial", false)] {
        let fields: Vec<&Attribute> = object
            .attributes
            .iter()
            .filter(|a| a.is_required() == required)
            .collect();
        if fields.is_empty() {
            writeln!(out, "    {constructor}({{}}),")?;
            continue;
        }
        writeln!(out, "    {constructor}({{")?;
        for attribute in fields {
            writeln!(out, "      {}: {},", attribute.name, io_ts_codec(model, attribute))?;
        }
        writeln!(out, "    }}),")?;
    }
    writeln!(out, "  ])")?;
    writeln!(out, ");")
}

fn zod_primitive(primitive: PrimitiveType) -> &'static str {
    match primitive {
        PrimitiveType::String | PrimitiveType::Identifier | PrimitiveType::Bytes => "z.string()",
        PrimitiveType::Integer => "z.number().int()",
        PrimitiveType::Float | PrimitiveType::Number => "z.number()",
        PrimitiveType::Boolean => "z.boolean()",
        PrimitiveType::Date => "z.string().date()",
        PrimitiveType::DateTime => "z.string().datetime()",
    }
}

fn zod_schema(model: &DataModel, attribute: &Attribute) -> String {
    let schemas: Vec<String> = attribute
        .dtypes
        .iter()
        .map(|dtype| match kind_of(model, dtype) {
            Kind::Primitive(primitive) => zod_primitive(primitive).to_string(),
            Kind::Object(name) | Kind::Enum(name) | Kind::Unknown(name) => format!("{name}Schema"),
        })
        .collect();
    let mut schema = match schemas.len() {
        0 => "z.unknown()".to_string(),
        1 => schemas[0].clone(),
        _ => format!("z.union([{}])", schemas.join(", ")),
    };
    if attribute.multiple {
        schema = format!("z.array({schema})");
    }
    if !attribute.docstring.is_empty() {
        schema = format!("{schema}.describe({:?})", attribute.docstring);
    }
    if !attribute.is_required() {
        schema.push_str(".optional()");
    }
    schema
}

fn render_zod_schema(out: &mut String, model: &DataModel, object: &Object) -> std::fmt::Result {
    writeln!(
        out,
        "export const {0}Schema: z.ZodType<{0}> = z.lazy(() =>",
        object.name
    )?;
    writeln!(out, "  z.object({{")?;
    for attribute in &object.attributes {
        writeln!(out, "    {}: {},", attribute.name, zod_schema(model, attribute))?;
    }
    writeln!(out, "  }})")?;
    writeln!(out, ");")
}
