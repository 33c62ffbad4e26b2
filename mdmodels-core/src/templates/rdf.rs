//! Namespace handling shared by the RDF shape templates (SHACL, ShEx)

use super::common::{escape_string, snake_case};
use crate::model::{Attribute, DataModel, PrimitiveType};

/// Base IRI used when the front matter has no `repo`.
pub const DEFAULT_BASE: &str = "https://w3id.org/mdmodels/";

pub const XSD: &str = "http://www.w3.org/2001/XMLSchema#";

/// Prefix bindings for one model. The model's own namespace comes first.
#[derive(Debug, Clone, PartialEq)]
pub struct Namespaces {
    pub base_prefix: String,
    pub bindings: Vec<(String, String)>,
}

impl Namespaces {
    /// Collect the bindings a shape document needs, after the fixed `leading` ones.
    pub fn for_model(model: &DataModel, leading: &[(&str, &str)]) -> Self {
        let name = model
            .name
            .as_deref()
            .map(snake_case)
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| "model".to_string());
        let base_prefix = model.config.prefix.clone().unwrap_or_else(|| "md".to_string());
        let base_iri = model
            .config
            .repo
            .clone()
            .unwrap_or_else(|| format!("{DEFAULT_BASE}{name}/"));

        let mut bindings: Vec<(String, String)> = leading
            .iter()
            .map(|(prefix, iri)| (prefix.to_string(), iri.to_string()))
            .collect();
        bindings.push((base_prefix.clone(), base_iri));
        for (prefix, iri) in model.config.prefixes.iter().chain(&model.config.nsmap) {
            if !bindings.iter().any(|(known, _)| known == prefix) {
                bindings.push((prefix.clone(), iri.clone()));
            }
        }

        Namespaces {
            base_prefix,
            bindings,
        }
    }

    /// A name in the model's own namespace.
    pub fn local(&self, name: &str) -> String {
        format!("{}:{name}", self.base_prefix)
    }

    /// Predicate for an attribute: its term when set, otherwise a local name.
    pub fn predicate(&self, attribute: &Attribute) -> String {
        match attribute.term.as_deref() {
            Some(term) if term.contains("://") => format!("<{term}>"),
            Some(term) if self.binds(term) => term.to_string(),
            _ => self.local(&attribute.name),
        }
    }

    fn binds(&self, curie: &str) -> bool {
        curie
            .split_once(':')
            .is_some_and(|(prefix, _)| self.bindings.iter().any(|(known, _)| known == prefix))
    }
}

pub fn xsd_datatype(primitive: PrimitiveType) -> &'static str {
    match primitive {
        PrimitiveType::String | PrimitiveType::Identifier => "xsd:string",
        PrimitiveType::Integer => "xsd:integer",
        PrimitiveType::Float => "xsd:double",
        PrimitiveType::Number => "xsd:decimal",
        PrimitiveType::Boolean => "xsd:boolean",
        PrimitiveType::Bytes => "xsd:base64Binary",
        PrimitiveType::Date => "xsd:date",
        PrimitiveType::DateTime => "xsd:dateTime",
    }
}

/// Enumeration values as quoted literals, in member order.
pub fn enum_literals(model: &DataModel, name: &str) -> Vec<String> {
    model
        .enumeration(name)
        .map(|enumeration| {
            enumeration
                .mappings
                .values()
                .map(|value| format!("\"{}\"", escape_string(value)))
                .collect()
        })
        .unwrap_or_default()
}
