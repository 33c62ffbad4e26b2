//! JSON Schema template (draft 2020-12)
//!
//! The root object becomes the top-level schema; every other object or enumeration
//! reachable from it lands in `$defs`. With `resolve-refs` definitions are inlined at
//! their use site instead, except where that would recurse forever: a reference back
//! into the current path stays a `$ref` (`#` for the root itself).
//!
//! ## Type mapping
//!
//! | dtype        | schema                                             |
//! |--------------|----------------------------------------------------|
//! | `string`     | `{"type": "string"}`                               |
//! | `Identifier` | `{"type": "string"}`                               |
//! | `integer`    | `{"type": "integer"}`                              |
//! | `float`      | `{"type": "number"}`                               |
//! | `number`     | `{"type": "number"}`                               |
//! | `boolean`    | `{"type": "boolean"}`                              |
//! | `bytes`      | `{"type": "string", "contentEncoding": "base64"}`  |
//! | `date`       | `{"type": "string", "format": "date"}`             |
//! | `datetime`   | `{"type": "string", "format": "date-time"}`        |
//! | object/enum  | `{"$ref": "#/$defs/Name"}`                         |
//!
//! Unions become `anyOf`, `multiple` wraps in `{"type": "array", "items": ...}`.
//!
//! ## Options
//!
//! - `root=<Object>`: object used as the top-level schema (default: first object)
//! - `strict=true`: every property required, `additionalProperties: false`
//! - `resolve-refs=true`: inline definitions

use super::common::{kind_of, Kind};
use crate::error::ConvertError;
use crate::model::{Attribute, DataModel, Enumeration, Object, PrimitiveType};
use crate::template::{Template, TemplateId};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::collections::{BTreeSet, HashMap};

const DRAFT: &str = "https://json-schema.org/draft/2020-12/schema";

/// Options of the dedicated JSON Schema entry point.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonSchemaOptions {
    /// Object rendered as the top-level schema. Defaults to the first object.
    pub root: Option<String>,
    /// Require every property and forbid additional ones.
    pub strict: bool,
}

pub struct JsonSchemaTemplate;

impl Template for JsonSchemaTemplate {
    fn id(&self) -> TemplateId {
        TemplateId::JsonSchema
    }

    fn description(&self) -> &str {
        "JSON Schema (draft 2020-12) for the root object"
    }

    fn file_extension(&self) -> &str {
        "json"
    }

    fn render(&self, model: &DataModel) -> Result<String, ConvertError> {
        render_schema(model, &JsonSchemaOptions::default(), false)
    }

    fn render_with_options(
        &self,
        model: &DataModel,
        options: &HashMap<String, String>,
    ) -> Result<String, ConvertError> {
        let mut schema_options = JsonSchemaOptions::default();
        let mut resolve_refs = false;
        for (key, value) in options {
            match key.as_str() {
                "root" => schema_options.root = Some(value.clone()),
                "strict" => schema_options.strict = parse_flag(key, value)?,
                "resolve-refs" => resolve_refs = parse_flag(key, value)?,
                other => {
                    return Err(ConvertError::NotSupported(format!(
                        "Template 'json-schema' does not support parameter '{other}'"
                    )))
                }
            }
        }
        render_schema(model, &schema_options, resolve_refs)
    }
}

fn parse_flag(key: &str, value: &str) -> Result<bool, ConvertError> {
    crate::parser::types::parse_bool(value).ok_or_else(|| {
        ConvertError::NotSupported(format!("Parameter '{key}' expects true or false, got '{value}'"))
    })
}

/// Render a model as a pretty-printed JSON Schema document.
pub fn render_schema(
    model: &DataModel,
    options: &JsonSchemaOptions,
    resolve_refs: bool,
) -> Result<String, ConvertError> {
    let root = match &options.root {
        Some(name) => Some(model.object(name).ok_or_else(|| {
            ConvertError::Render(format!("Root object '{name}' is not defined"))
        })?),
        None => model.objects.first(),
    };

    let mut builder = SchemaBuilder {
        model,
        strict: options.strict,
        resolve_refs,
        root: root.map(|r| r.name.as_str()),
        path: Vec::new(),
        referenced: BTreeSet::new(),
    };

    let mut schema = Map::new();
    schema.insert("$schema".to_string(), json!(DRAFT));
    if let Some(repo) = &model.config.repo {
        schema.insert("$id".to_string(), json!(repo));
    }

    match root {
        Some(root) => {
            let body = builder.object_schema(root);
            if let Value::Object(body) = body {
                schema.extend(body);
            }
        }
        None => {
            for enumeration in &model.enums {
                builder.referenced.insert(enumeration.name.clone());
            }
        }
    }

    let defs = builder.definitions();
    if !defs.is_empty() {
        schema.insert("$defs".to_string(), Value::Object(defs));
    }

    Ok(serde_json::to_string_pretty(&Value::Object(schema))?)
}

struct SchemaBuilder<'a> {
    model: &'a DataModel,
    strict: bool,
    resolve_refs: bool,
    root: Option<&'a str>,
    /// Objects currently being inlined, used to stop at cycles.
    path: Vec<&'a str>,
    /// Definitions that must appear in `$defs`.
    referenced: BTreeSet<String>,
}

impl<'a> SchemaBuilder<'a> {
    fn object_schema(&mut self, object: &'a Object) -> Value {
        self.path.push(&object.name);

        let mut properties = Map::new();
        let mut required = Vec::new();
        for attribute in &object.attributes {
            properties.insert(attribute.name.clone(), self.property_schema(attribute));
            if self.strict || attribute.is_required() {
                required.push(json!(attribute.name));
            }
        }

        let mut schema = Map::new();
        schema.insert("title".to_string(), json!(object.name));
        schema.insert("type".to_string(), json!("object"));
        if !object.docstring.is_empty() {
            schema.insert("description".to_string(), json!(object.docstring));
        }
        schema.insert("properties".to_string(), Value::Object(properties));
        if !required.is_empty() {
            schema.insert("required".to_string(), Value::Array(required));
        }
        if self.strict {
            schema.insert("additionalProperties".to_string(), json!(false));
        }

        self.path.pop();
        Value::Object(schema)
    }

    fn property_schema(&mut self, attribute: &'a Attribute) -> Value {
        let mut alternatives: Vec<Value> = attribute
            .dtypes
            .iter()
            .map(|dtype| self.type_schema(dtype))
            .collect();

        let item = match alternatives.len() {
            0 => json!({}),
            1 => alternatives.remove(0),
            _ => json!({ "anyOf": alternatives }),
        };

        let mut schema = if attribute.multiple {
            let mut map = Map::new();
            map.insert("type".to_string(), json!("array"));
            map.insert("items".to_string(), item);
            map
        } else {
            match item {
                Value::Object(map) => map,
                other => {
                    let mut map = Map::new();
                    map.insert("allOf".to_string(), json!([other]));
                    map
                }
            }
        };

        if !attribute.docstring.is_empty() {
            schema.insert("description".to_string(), json!(attribute.docstring));
        }
        if let Some(term) = &attribute.term {
            schema.insert("$term".to_string(), json!(term));
        }
        if let Some(default) = attribute.default_value() {
            schema.insert(
                "default".to_string(),
                default_literal(self.model, attribute, default),
            );
        }
        for (option, keyword) in [
            ("minimum", "minimum"),
            ("maximum", "maximum"),
            ("exclusiveminimum", "exclusiveMinimum"),
            ("exclusivemaximum", "exclusiveMaximum"),
            ("minlength", "minLength"),
            ("maxlength", "maxLength"),
            ("minitems", "minItems"),
            ("maxitems", "maxItems"),
        ] {
            if let Some(value) = attribute.option(option) {
                if let Some(number) = value.parse::<f64>().ok().filter(|n| n.is_finite()) {
                    schema.insert(keyword.to_string(), number_value(number));
                }
            }
        }
        if let Some(pattern) = attribute.option("pattern") {
            schema.insert("pattern".to_string(), json!(pattern));
        }

        Value::Object(schema)
    }

    fn type_schema(&mut self, dtype: &'a str) -> Value {
        let model = self.model;
        match kind_of(model, dtype) {
            Kind::Primitive(primitive) => primitive_schema(primitive),
            Kind::Object(name) if self.root == Some(name) => self.reference(name),
            Kind::Object(name) => match model.object(name) {
                Some(object) if self.resolve_refs && !self.path.contains(&name) => {
                    self.object_schema(object)
                }
                _ => self.reference(name),
            },
            Kind::Enum(name) => match model.enumeration(name) {
                Some(enumeration) if self.resolve_refs => enum_schema(enumeration),
                _ => self.reference(name),
            },
            Kind::Unknown(name) => self.reference(name),
        }
    }

    fn reference(&mut self, name: &str) -> Value {
        if self.root == Some(name) {
            return json!({ "$ref": "#" });
        }
        self.referenced.insert(name.to_string());
        json!({ "$ref": format!("#/$defs/{name}") })
    }

    /// Build `$defs`, following references of definitions until no new ones appear.
    fn definitions(&mut self) -> Map<String, Value> {
        let mut defs = Map::new();
        loop {
            let pending: Vec<String> = self
                .referenced
                .iter()
                .filter(|name| !defs.contains_key(*name))
                .cloned()
                .collect();
            if pending.is_empty() {
                break;
            }
            for name in pending {
                let model = self.model;
                let schema = if let Some(object) = model.object(&name) {
                    let saved = std::mem::take(&mut self.path);
                    let schema = self.object_schema(object);
                    self.path = saved;
                    schema
                } else if let Some(enumeration) = model.enumeration(&name) {
                    enum_schema(enumeration)
                } else {
                    json!({})
                };
                defs.insert(name, schema);
            }
        }
        defs
    }
}

fn primitive_schema(primitive: PrimitiveType) -> Value {
    match primitive {
        PrimitiveType::String | PrimitiveType::Identifier => json!({ "type": "string" }),
        PrimitiveType::Integer => json!({ "type": "integer" }),
        PrimitiveType::Float | PrimitiveType::Number => json!({ "type": "number" }),
        PrimitiveType::Boolean => json!({ "type": "boolean" }),
        PrimitiveType::Bytes => json!({ "type": "string", "contentEncoding": "base64" }),
        PrimitiveType::Date => json!({ "type": "string", "format": "date" }),
        PrimitiveType::DateTime => json!({ "type": "string", "format": "date-time" }),
    }
}

fn enum_schema(enumeration: &Enumeration) -> Value {
    let mut schema = Map::new();
    schema.insert("title".to_string(), json!(enumeration.name));
    schema.insert("type".to_string(), json!("string"));
    if !enumeration.docstring.is_empty() {
        schema.insert("description".to_string(), json!(enumeration.docstring));
    }
    let values: Vec<Value> = enumeration.mappings.values().map(|v| json!(v)).collect();
    schema.insert("enum".to_string(), Value::Array(values));
    Value::Object(schema)
}

/// A default value as JSON, typed after the attribute's first declared type.
///
/// A value that does not fit a numeric or boolean type is kept as a string.
fn default_literal(model: &DataModel, attribute: &Attribute, value: &str) -> Value {
    let text = value.trim_matches('"');
    let primitive = match attribute.dtypes.first().map(|dtype| kind_of(model, dtype)) {
        Some(Kind::Primitive(primitive)) => primitive,
        Some(Kind::Object(_) | Kind::Unknown(_)) | None => return literal(value),
        Some(Kind::Enum(_)) => return json!(text),
    };
    match primitive {
        PrimitiveType::Integer => text
            .parse::<i64>()
            .map(|n| json!(n))
            .unwrap_or_else(|_| json!(text)),
        PrimitiveType::Float | PrimitiveType::Number => text
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .map(number_value)
            .unwrap_or_else(|| json!(text)),
        PrimitiveType::Boolean => match text.to_ascii_lowercase().as_str() {
            "true" => json!(true),
            "false" => json!(false),
            _ => json!(text),
        },
        _ => json!(text),
    }
}

/// Numbers and booleans stay typed, anything else is a string.
fn literal(value: &str) -> Value {
    match serde_json::from_str::<Value>(value) {
        Ok(parsed @ (Value::Number(_) | Value::Bool(_))) => parsed,
        _ => json!(value.trim_matches('"')),
    }
}

fn number_value(number: f64) -> Value {
    if number.fract() == 0.0 && number.abs() < i64::MAX as f64 {
        json!(number as i64)
    } else {
        json!(number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    fn schema(source: &str, options: JsonSchemaOptions, resolve_refs: bool) -> Value {
        let model = parse(source).unwrap().model;
        let text = render_schema(&model, &options, resolve_refs).unwrap();
        serde_json::from_str(&text).unwrap()
    }

    #[test]
    fn test_single_string_attribute() {
        let value = schema("### A\n- name\n  - Type: string\n", JsonSchemaOptions::default(), false);
        assert_eq!(value["$schema"], DRAFT);
        assert_eq!(value["type"], "object");
        assert_eq!(value["properties"]["name"]["type"], "string");
        assert!(value.get("$defs").is_none());
    }

    #[test]
    fn test_references_go_to_defs() {
        let source = "### A\n- __id__\n  - Type: string\n- items\n  - Type: [B](#b)[]\n### B\n- kind\n  - Type: Kind\n### Kind\n```\nX = \"x\"\n```\n";
        let value = schema(source, JsonSchemaOptions::default(), false);

        assert_eq!(value["required"], json!(["id"]));
        assert_eq!(value["properties"]["items"]["type"], "array");
        assert_eq!(value["properties"]["items"]["items"]["$ref"], "#/$defs/B");
        assert_eq!(value["$defs"]["B"]["properties"]["kind"]["$ref"], "#/$defs/Kind");
        assert_eq!(value["$defs"]["Kind"]["enum"], json!(["x"]));
    }

    #[test]
    fn test_resolve_refs_inlines_and_stops_at_cycles() {
        let source = "### A\n- b\n  - Type: B\n### B\n- a\n  - Type: A\n- self_ref\n  - Type: B\n";
        let value = schema(source, JsonSchemaOptions::default(), true);

        let b = &value["properties"]["b"];
        assert_eq!(b["type"], "object");
        assert_eq!(b["properties"]["a"]["$ref"], "#");
        assert_eq!(b["properties"]["self_ref"]["$ref"], "#/$defs/B");
        assert_eq!(value["$defs"]["B"]["title"], "B");
    }

    #[test]
    fn test_root_and_strict() {
        let source = "### A\n- x\n  - Type: string\n### B\n- y\n  - Type: integer\n  - Minimum: 0\n  - Default: 3\n";
        let options = JsonSchemaOptions {
            root: Some("B".to_string()),
            strict: true,
        };
        let value = schema(source, options, false);

        assert_eq!(value["title"], "B");
        assert_eq!(value["required"], json!(["y"]));
        assert_eq!(value["additionalProperties"], false);
        assert_eq!(value["properties"]["y"]["minimum"], 0);
        assert_eq!(value["properties"]["y"]["default"], 3);
    }

    #[test]
    fn test_defaults_follow_declared_type() {
        let source = "### A\n- code\n  - Type: string\n  - Default: 1\n- ratio\n  - Type: float\n  - Default: 0.5\n- flag\n  - Type: boolean\n  - Default: True\n- count\n  - Type: integer\n  - Default: many\n";
        let value = schema(source, JsonSchemaOptions::default(), false);

        assert_eq!(value["properties"]["code"]["default"], json!("1"));
        assert_eq!(value["properties"]["ratio"]["default"], json!(0.5));
        assert_eq!(value["properties"]["flag"]["default"], json!(true));
        assert_eq!(value["properties"]["count"]["default"], json!("many"));
    }

    #[test]
    fn test_non_finite_bounds_are_dropped() {
        let source = "### A\n- x\n  - Type: float\n  - Minimum: -inf\n  - Maximum: NaN\n  - MinLength: 2\n";
        let value = schema(source, JsonSchemaOptions::default(), false);
        let property = value["properties"]["x"].as_object().unwrap();

        assert!(!property.contains_key("minimum"));
        assert!(!property.contains_key("maximum"));
        assert_eq!(property["minLength"], 2);
    }

    #[test]
    fn test_unknown_root() {
        let model = parse("### A\n- x\n  - Type: string\n").unwrap().model;
        let options = JsonSchemaOptions {
            root: Some("Nope".to_string()),
            strict: false,
        };
        assert!(render_schema(&model, &options, false).is_err());
    }

    #[test]
    fn test_unions_become_any_of() {
        let value = schema("### A\n- v\n  - Type: string | integer\n", JsonSchemaOptions::default(), false);
        assert_eq!(
            value["properties"]["v"]["anyOf"],
            json!([{ "type": "string" }, { "type": "integer" }])
        );
    }

    #[test]
    fn test_template_options() {
        let model = parse("### A\n- x\n  - Type: string\n").unwrap().model;
        let mut options = HashMap::new();
        options.insert("strict".to_string(), "true".to_string());
        let text = JsonSchemaTemplate.render_with_options(&model, &options).unwrap();
        assert!(text.contains("\"additionalProperties\": false"));

        options.insert("color".to_string(), "red".to_string());
        assert!(JsonSchemaTemplate.render_with_options(&model, &options).is_err());
    }
}
