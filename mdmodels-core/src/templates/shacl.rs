//! SHACL shapes (Turtle)
//!
//! Every object becomes a `sh:NodeShape` targeting the class of the same name. Each
//! attribute is a property shape: primitives constrain `sh:datatype`, object references
//! `sh:node`, enumerations `sh:in`. Multi-typed attributes wrap the alternatives in
//! `sh:or`.

use super::common::{escape_string, kind_of, one_line, Kind};
use super::rdf::{enum_literals, xsd_datatype, Namespaces, XSD};
use crate::error::ConvertError;
use crate::model::{Attribute, DataModel};
use crate::template::{Template, TemplateId};
use std::fmt::Write;

const SH: &str = "http://www.w3.org/ns/shacl#";

pub struct ShaclTemplate;

impl Template for ShaclTemplate {
    fn id(&self) -> TemplateId {
        TemplateId::Shacl
    }

    fn description(&self) -> &str {
        "SHACL node shapes in Turtle"
    }

    fn file_extension(&self) -> &str {
        "ttl"
    }

    fn render(&self, model: &DataModel) -> Result<String, ConvertError> {
        let ns = Namespaces::for_model(model, &[("sh", SH), ("xsd", XSD)]);
        let mut out = String::new();
        for (prefix, iri) in &ns.bindings {
            writeln!(out, "@prefix {prefix}: <{iri}> .")?;
        }

        for object in &model.objects {
            writeln!(out)?;
            writeln!(out, "{}", shape_name(&ns, &object.name))?;
            writeln!(out, "    a sh:NodeShape ;")?;
            write!(out, "    sh:targetClass {}", ns.local(&object.name))?;
            if !object.docstring.is_empty() {
                let doc = escape_string(&one_line(&object.docstring));
                write!(out, " ;\n    sh:description \"{doc}\"")?;
            }
            for attribute in &object.attributes {
                writeln!(out, " ;\n    sh:property [")?;
                property(&mut out, model, &ns, attribute)?;
                write!(out, "    ]")?;
            }
            writeln!(out, " .")?;
        }
        Ok(out)
    }
}

fn shape_name(ns: &Namespaces, object: &str) -> String {
    ns.local(&format!("{object}Shape"))
}

fn property(
    out: &mut String,
    model: &DataModel,
    ns: &Namespaces,
    attribute: &Attribute,
) -> std::fmt::Result {
    writeln!(out, "        sh:path {} ;", ns.predicate(attribute))?;
    writeln!(out, "        sh:name \"{}\" ;", escape_string(&attribute.name))?;
    if !attribute.docstring.is_empty() {
        let doc = escape_string(&one_line(&attribute.docstring));
        writeln!(out, "        sh:description \"{doc}\" ;")?;
    }
    match attribute.dtypes.as_slice() {
        [] => {}
        [single] => writeln!(out, "        {} ;", constraint(model, ns, single))?,
        alternatives => {
            let branches = alternatives
                .iter()
                .map(|dtype| format!("[ {} ]", constraint(model, ns, dtype)))
                .collect::<Vec<_>>()
                .join(" ");
            writeln!(out, "        sh:or ( {branches} ) ;")?;
        }
    }
    if attribute.is_required() {
        writeln!(out, "        sh:minCount 1 ;")?;
    }
    if !attribute.multiple {
        writeln!(out, "        sh:maxCount 1 ;")?;
    }
    Ok(())
}

fn constraint(model: &DataModel, ns: &Namespaces, dtype: &str) -> String {
    match kind_of(model, dtype) {
        Kind::Primitive(primitive) => format!("sh:datatype {}", xsd_datatype(primitive)),
        Kind::Object(name) => format!("sh:node {}", shape_name(ns, name)),
        Kind::Enum(name) => format!("sh:in ( {} )", enum_literals(model, name).join(" ")),
        Kind::Unknown(name) => format!("sh:class {}", ns.local(name)),
    }
}
