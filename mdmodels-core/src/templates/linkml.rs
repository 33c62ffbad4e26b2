//! LinkML template
//!
//! Builds the schema as a `serde_yaml` mapping (insertion ordered) and serializes it.
//! Objects become classes with inline `attributes`, enumerations `permissible_values`
//! whose `meaning` is the member value. Unions are expressed with `any_of`.

use super::common::{kind_of, snake_case, Kind};
use super::rdf::DEFAULT_BASE;
use crate::error::ConvertError;
use crate::model::{Attribute, DataModel, Enumeration, Object, PrimitiveType};
use crate::template::{Template, TemplateId};
use serde_yaml::{Mapping, Value};

pub struct LinkmlTemplate;

impl Template for LinkmlTemplate {
    fn id(&self) -> TemplateId {
        TemplateId::Linkml
    }

    fn description(&self) -> &str {
        "LinkML schema"
    }

    fn file_extension(&self) -> &str {
        "yaml"
    }

    fn render(&self, model: &DataModel) -> Result<String, ConvertError> {
        let name = model
            .name
            .as_deref()
            .map(snake_case)
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| "model".to_string());
        let default_prefix = model.config.prefix.clone().unwrap_or_else(|| name.clone());
        let base = model
            .config
            .repo
            .clone()
            .unwrap_or_else(|| format!("{DEFAULT_BASE}{name}/"));

        let mut schema = Mapping::new();
        insert(&mut schema, "id", base.clone());
        insert(&mut schema, "name", name);
        if let Some(title) = &model.name {
            insert(&mut schema, "title", title.clone());
        }

        let mut prefixes = Mapping::new();
        insert(&mut prefixes, "linkml", "https://w3id.org/linkml/");
        insert(&mut prefixes, &default_prefix, base);
        for (prefix, iri) in model.config.prefixes.iter().chain(&model.config.nsmap) {
            if !prefixes.contains_key(prefix.as_str()) {
                insert(&mut prefixes, prefix, iri.clone());
            }
        }
        schema.insert("prefixes".into(), Value::Mapping(prefixes));
        insert(&mut schema, "default_prefix", default_prefix);
        insert(&mut schema, "default_range", "string");
        schema.insert(
            "imports".into(),
            Value::Sequence(vec![Value::from("linkml:types")]),
        );

        if !model.objects.is_empty() {
            let mut classes = Mapping::new();
            for (idx, object) in model.objects.iter().enumerate() {
                classes.insert(
                    object.name.clone().into(),
                    Value::Mapping(class(model, object, idx == 0)),
                );
            }
            schema.insert("classes".into(), Value::Mapping(classes));
        }

        if !model.enums.is_empty() {
            let mut enums = Mapping::new();
            for enumeration in &model.enums {
                enums.insert(
                    enumeration.name.clone().into(),
                    Value::Mapping(enum_definition(enumeration)),
                );
            }
            schema.insert("enums".into(), Value::Mapping(enums));
        }

        Ok(serde_yaml::to_string(&Value::Mapping(schema))?)
    }
}

fn insert(map: &mut Mapping, key: &str, value: impl Into<Value>) {
    map.insert(Value::from(key), value.into());
}

fn linkml_range(model: &DataModel, dtype: &str) -> String {
    match kind_of(model, dtype) {
        Kind::Primitive(primitive) => match primitive {
            PrimitiveType::String | PrimitiveType::Identifier | PrimitiveType::Bytes => "string",
            PrimitiveType::Integer => "integer",
            PrimitiveType::Float => "float",
            PrimitiveType::Number => "decimal",
            PrimitiveType::Boolean => "boolean",
            PrimitiveType::Date => "date",
            PrimitiveType::DateTime => "datetime",
        }
        .to_string(),
        Kind::Object(name) | Kind::Enum(name) | Kind::Unknown(name) => name.to_string(),
    }
}

fn class(model: &DataModel, object: &Object, is_root: bool) -> Mapping {
    let mut class = Mapping::new();
    if !object.docstring.is_empty() {
        insert(&mut class, "description", object.docstring.clone());
    }
    if is_root {
        class.insert("tree_root".into(), Value::Bool(true));
    }
    let mut attributes = Mapping::new();
    for attribute in &object.attributes {
        attributes.insert(
            attribute.name.clone().into(),
            Value::Mapping(slot(model, attribute)),
        );
    }
    class.insert("attributes".into(), Value::Mapping(attributes));
    class
}

fn slot(model: &DataModel, attribute: &Attribute) -> Mapping {
    let mut slot = Mapping::new();
    if !attribute.docstring.is_empty() {
        insert(&mut slot, "description", attribute.docstring.clone());
    }
    if let Some(term) = &attribute.term {
        insert(&mut slot, "slot_uri", term.clone());
    }
    if attribute.is_id {
        slot.insert("identifier".into(), Value::Bool(true));
    }

    match attribute.dtypes.as_slice() {
        [] => {}
        [single] => insert(&mut slot, "range", linkml_range(model, single)),
        many => {
            let any_of = many
                .iter()
                .map(|dtype| {
                    let mut alternative = Mapping::new();
                    insert(&mut alternative, "range", linkml_range(model, dtype));
                    Value::Mapping(alternative)
                })
                .collect();
            slot.insert("any_of".into(), Value::Sequence(any_of));
        }
    }

    if attribute.required {
        slot.insert("required".into(), Value::Bool(true));
    }
    if attribute.multiple {
        slot.insert("multivalued".into(), Value::Bool(true));
    }
    if let Some(default) = attribute.default_value() {
        insert(&mut slot, "ifabsent", format!("string({default})"));
    }
    for (option, key) in [("minimum", "minimum_value"), ("maximum", "maximum_value")] {
        if let Some(value) = attribute.option(option) {
            let value = value
                .parse::<i64>()
                .map(Value::from)
                .or_else(|_| value.parse::<f64>().map(Value::from))
                .unwrap_or_else(|_| Value::from(value));
            slot.insert(key.into(), value);
        }
    }
    if let Some(pattern) = attribute.option("pattern") {
        insert(&mut slot, "pattern", pattern.to_string());
    }
    slot
}

fn enum_definition(enumeration: &Enumeration) -> Mapping {
    let mut definition = Mapping::new();
    if !enumeration.docstring.is_empty() {
        insert(&mut definition, "description", enumeration.docstring.clone());
    }
    let mut values = Mapping::new();
    for (key, value) in &enumeration.mappings {
        let mut member = Mapping::new();
        insert(&mut member, "meaning", value.clone());
        values.insert(key.clone().into(), Value::Mapping(member));
    }
    definition.insert("permissible_values".into(), Value::Mapping(values));
    definition
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    fn render(source: &str) -> Value {
        let model = parse(source).unwrap().model;
        let text = LinkmlTemplate.render(&model).unwrap();
        serde_yaml::from_str(&text).unwrap()
    }

    #[test]
    fn test_schema_header() {
        let schema = render("---\nprefix: lab\nprefixes:\n  schema: http://schema.org/\n---\n# Lab\n### A\n- x\n  - Type: string\n");
        assert_eq!(schema["name"], "lab");
        assert_eq!(schema["default_prefix"], "lab");
        assert_eq!(schema["prefixes"]["schema"], "http://schema.org/");
        assert_eq!(schema["imports"][0], "linkml:types");
        assert_eq!(schema["classes"]["A"]["tree_root"], true);
    }

    #[test]
    fn test_slots() {
        let source = "### Sample\n- __id__\n  - Type: string\n  - Term: schema:identifier\n- tags\n  - Type: string[]\n- value\n  - Type: float | Unit\n  - Minimum: 0\n\n### Unit\n\n```\nMG = \"http://purl.obolibrary.org/obo/UO_0000022\"\n```\n";
        let schema = render(source);
        let attributes = &schema["classes"]["Sample"]["attributes"];

        assert_eq!(attributes["id"]["identifier"], true);
        assert_eq!(attributes["id"]["slot_uri"], "schema:identifier");
        assert_eq!(attributes["tags"]["multivalued"], true);
        assert_eq!(attributes["value"]["any_of"][1]["range"], "Unit");
        assert_eq!(attributes["value"]["minimum_value"], 0);
        assert_eq!(
            schema["enums"]["Unit"]["permissible_values"]["MG"]["meaning"],
            "http://purl.obolibrary.org/obo/UO_0000022"
        );
    }

    #[test]
    fn test_classes_keep_source_order() {
        let model = parse("### B\n- x\n  - Type: string\n### A\n- y\n  - Type: string\n").unwrap().model;
        let text = LinkmlTemplate.render(&model).unwrap();
        assert!(text.find("  B:").unwrap() < text.find("  A:").unwrap());
    }
}
