//! Document model
//!
//! The in-memory representation of a markdown data model. It is plain owned data:
//! type references between objects are stored as names (`Attribute::dtypes`) and
//! resolved on demand through [`DataModel::resolve`], so the logical graph can be
//! cyclic while the storage stays a flat list.
//!
//! ```text
//! DataModel
//! ├── name          (# Title)
//! ├── config        (YAML front matter)
//! ├── objects[]     (### Heading + bullet list)
//! │   └── attributes[]
//! │       ├── dtypes[]   (names, not pointers)
//! │       └── options[]  (Default, Minimum, ...)
//! └── enums[]       (### Heading + fenced KEY = "value" block)
//! ```

pub mod position;
pub mod primitives;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub use position::{LineIndex, SourcePosition, Span};
pub use primitives::PrimitiveType;

/// Root of a parsed document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataModel {
    pub name: Option<String>,
    pub objects: Vec<Object>,
    pub enums: Vec<Enumeration>,
    pub config: Config,
}

impl DataModel {
    /// True when the document defines neither objects nor enumerations.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty() && self.enums.is_empty()
    }

    pub fn object(&self, name: &str) -> Option<&Object> {
        self.objects.iter().find(|o| o.name == name)
    }

    pub fn enumeration(&self, name: &str) -> Option<&Enumeration> {
        self.enums.iter().find(|e| e.name == name)
    }

    /// Resolve a dtype name. Object and enum names win over primitives.
    pub fn resolve(&self, dtype: &str) -> Option<TypeRef<'_>> {
        if let Some(object) = self.object(dtype) {
            return Some(TypeRef::Object(object));
        }
        if let Some(enumeration) = self.enumeration(dtype) {
            return Some(TypeRef::Enum(enumeration));
        }
        PrimitiveType::parse(dtype).map(TypeRef::Primitive)
    }

    /// Names of every object and enumeration, in source order.
    pub fn type_names(&self) -> Vec<&str> {
        self.objects
            .iter()
            .map(|o| o.name.as_str())
            .chain(self.enums.iter().map(|e| e.name.as_str()))
            .collect()
    }
}

/// Result of resolving a dtype string against a model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TypeRef<'a> {
    Primitive(PrimitiveType),
    Object(&'a Object),
    Enum(&'a Enumeration),
}

impl TypeRef<'_> {
    pub fn is_reference(&self) -> bool {
        !matches!(self, TypeRef::Primitive(_))
    }
}

/// One `###` section with an attribute list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Object {
    pub name: String,
    pub docstring: String,
    pub attributes: Vec<Attribute>,
    pub position: SourcePosition,
}

impl Object {
    pub fn new(name: impl Into<String>, position: SourcePosition) -> Self {
        Object {
            name: name.into(),
            position,
            ..Default::default()
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    /// Attributes that must be present in an instance.
    pub fn required_attributes(&self) -> impl Iterator<Item = &Attribute> {
        self.attributes.iter().filter(|a| a.is_required())
    }

    pub fn identifier(&self) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.is_id)
    }
}

/// One top-level bullet under an object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    pub multiple: bool,
    pub is_id: bool,
    pub dtypes: Vec<String>,
    pub docstring: String,
    pub term: Option<String>,
    pub required: bool,
    pub xml: XMLType,
    pub options: Vec<AttrOption>,
    pub is_enum: bool,
    pub position: SourcePosition,
    pub type_position: Option<SourcePosition>,
    pub term_position: Option<SourcePosition>,
}

impl Attribute {
    pub fn new(name: impl Into<String>, position: SourcePosition) -> Self {
        let name = name.into();
        Attribute {
            xml: XMLType::element(&name),
            name,
            position,
            ..Default::default()
        }
    }

    pub fn is_required(&self) -> bool {
        self.required || self.is_id
    }

    /// Case-insensitive lookup in the option bag.
    pub fn option(&self, key: &str) -> Option<&str> {
        self.options
            .iter()
            .find(|o| o.key.eq_ignore_ascii_case(key))
            .map(|o| o.value.as_str())
    }

    pub fn default_value(&self) -> Option<&str> {
        self.option("default")
    }

    /// The first alternative of a union, used by targets without union types.
    pub fn primary_dtype(&self) -> Option<&str> {
        self.dtypes.first().map(String::as_str)
    }

    pub fn is_union(&self) -> bool {
        self.dtypes.len() > 1
    }
}

/// XML serialization hint (`- XML: @name` marks an attribute).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct XMLType {
    pub is_attr: bool,
    pub name: String,
}

impl XMLType {
    pub fn element(name: &str) -> Self {
        XMLType {
            is_attr: false,
            name: name.to_string(),
        }
    }

    pub fn attribute(name: &str) -> Self {
        XMLType {
            is_attr: true,
            name: name.to_string(),
        }
    }

    /// Parse the value of an `XML:` sub-bullet.
    pub fn from_value(value: &str) -> Self {
        let value = value.trim();
        match value.strip_prefix('@') {
            Some(name) => XMLType::attribute(name.trim()),
            None => XMLType::element(value),
        }
    }

    /// Inverse of [`XMLType::from_value`].
    pub fn to_value(&self) -> String {
        if self.is_attr {
            format!("@{}", self.name)
        } else {
            self.name.clone()
        }
    }
}

/// Catch-all `Key: Value` metadata such as `Default` or `Minimum`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttrOption {
    pub key: String,
    pub value: String,
}

impl AttrOption {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        AttrOption {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// A `###` section holding a fenced `KEY = "value"` block.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Enumeration {
    pub name: String,
    pub mappings: BTreeMap<String, String>,
    pub docstring: String,
    pub position: SourcePosition,
}

/// Front matter settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    #[serde(rename = "id-field", skip_serializing_if = "is_false")]
    pub id_field: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub prefixes: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub nsmap: BTreeMap<String, String>,
}

impl Config {
    pub fn is_default(&self) -> bool {
        *self == Config::default()
    }

    /// Expand a `prefix:local` CURIE using `prefixes`, then `nsmap`.
    pub fn expand_curie(&self, term: &str) -> Option<String> {
        let (prefix, local) = term.split_once(':')?;
        self.prefixes
            .get(prefix)
            .or_else(|| self.nsmap.get(prefix))
            .map(|base| format!("{base}{local}"))
    }

    pub fn knows_prefix(&self, prefix: &str) -> bool {
        self.prefixes.contains_key(prefix)
            || self.nsmap.contains_key(prefix)
            || self.prefix.as_deref() == Some(prefix)
    }
}

fn is_false(value: &bool) -> bool {
    !*value
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model_with(objects: &[&str], enums: &[&str]) -> DataModel {
        DataModel {
            objects: objects
                .iter()
                .map(|n| Object::new(*n, SourcePosition::default()))
                .collect(),
            enums: enums
                .iter()
                .map(|n| Enumeration {
                    name: n.to_string(),
                    ..Default::default()
                })
                .collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_resolve_prefers_definitions_over_primitives() {
        let model = model_with(&["Date"], &["Color"]);
        assert!(matches!(model.resolve("Date"), Some(TypeRef::Object(_))));
        assert!(matches!(model.resolve("Color"), Some(TypeRef::Enum(_))));
        assert!(matches!(
            model.resolve("string"),
            Some(TypeRef::Primitive(PrimitiveType::String))
        ));
        assert!(model.resolve("Missing").is_none());
    }

    #[test]
    fn test_xml_value_round_trip() {
        let attr = XMLType::from_value("@name");
        assert!(attr.is_attr);
        assert_eq!(attr.name, "name");
        assert_eq!(attr.to_value(), "@name");

        let element = XMLType::from_value("Child");
        assert!(!element.is_attr);
        assert_eq!(element.to_value(), "Child");
    }

    #[test]
    fn test_option_lookup_is_case_insensitive() {
        let mut attr = Attribute::new("value", SourcePosition::default());
        attr.options.push(AttrOption::new("Default", "1.0"));
        assert_eq!(attr.default_value(), Some("1.0"));
        assert_eq!(attr.option("DEFAULT"), Some("1.0"));
        assert_eq!(attr.option("minimum"), None);
    }

    #[test]
    fn test_identifier_counts_as_required() {
        let mut attr = Attribute::new("id", SourcePosition::default());
        assert!(!attr.is_required());
        attr.is_id = true;
        assert!(attr.is_required());
    }

    #[test]
    fn test_expand_curie() {
        let mut config = Config::default();
        config
            .prefixes
            .insert("schema".to_string(), "http://schema.org/".to_string());
        assert_eq!(
            config.expand_curie("schema:name").as_deref(),
            Some("http://schema.org/name")
        );
        assert_eq!(config.expand_curie("foaf:name"), None);
    }

    #[test]
    fn test_default_config_serializes_empty() {
        let yaml = serde_yaml::to_string(&Config::default()).unwrap();
        assert_eq!(yaml.trim(), "{}");
    }
}
