//! ShEx shape expressions (compact syntax)

use super::common::{comment_lines, kind_of, Kind};
use super::rdf::{enum_literals, xsd_datatype, Namespaces, XSD};
use crate::error::ConvertError;
use crate::model::{Attribute, DataModel};
use crate::template::{Template, TemplateId};
use std::fmt::Write;

pub struct ShexTemplate;

impl Template for ShexTemplate {
    fn id(&self) -> TemplateId {
        TemplateId::Shex
    }

    fn description(&self) -> &str {
        "ShEx shape expressions"
    }

    fn file_extension(&self) -> &str {
        "shex"
    }

    fn render(&self, model: &DataModel) -> Result<String, ConvertError> {
        let ns = Namespaces::for_model(model, &[("xsd", XSD)]);
        let mut out = String::new();
        for (prefix, iri) in &ns.bindings {
            writeln!(out, "PREFIX {prefix}: <{iri}>")?;
        }

        for object in &model.objects {
            writeln!(out)?;
            out.push_str(&comment_lines(&object.docstring, "# ", ""));
            if object.attributes.is_empty() {
                writeln!(out, "{} {{}}", ns.local(&object.name))?;
                continue;
            }
            writeln!(out, "{} {{", ns.local(&object.name))?;
            let constraints = object
                .attributes
                .iter()
                .map(|attribute| triple_constraint(model, &ns, attribute))
                .collect::<Vec<_>>();
            writeln!(out, "{}", constraints.join(" ;\n"))?;
            writeln!(out, "}}")?;
        }
        Ok(out)
    }
}

fn triple_constraint(model: &DataModel, ns: &Namespaces, attribute: &Attribute) -> String {
    let value = match attribute.dtypes.as_slice() {
        [] => ".".to_string(),
        [single] => value_expression(model, ns, single),
        alternatives => format!(
            "( {} )",
            alternatives
                .iter()
                .map(|dtype| value_expression(model, ns, dtype))
                .collect::<Vec<_>>()
                .join(" OR ")
        ),
    };
    let cardinality = match (attribute.is_required(), attribute.multiple) {
        (true, false) => "",
        (false, false) => " ?",
        (true, true) => " +",
        (false, true) => " *",
    };
    format!("    {} {value}{cardinality}", ns.predicate(attribute))
}

fn value_expression(model: &DataModel, ns: &Namespaces, dtype: &str) -> String {
    match kind_of(model, dtype) {
        Kind::Primitive(primitive) => xsd_datatype(primitive).to_string(),
        Kind::Object(name) | Kind::Unknown(name) => format!("@{}", ns.local(name)),
        Kind::Enum(name) => format!("[ {} ]", enum_literals(model, name).join(" ")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;
    use insta::assert_snapshot;

    #[test]
    fn test_shapes() {
        let source = "---\nprefix: ex\nrepo: https://example.org/lab/\n---\n# Lab\n### Sample\n\nA lab sample.\n\n- __id__\n  - Type: string\n- parts\n  - Type: Part[]\n- color\n  - Type: Color\n- value\n  - Type: float | Part\n### Part\n- tags\n  - Type: string[]\n  - Required: true\n### Empty\n\n### Color\n\n```\nRED = \"red\"\nBLUE = \"blue\"\n```\n";
        let model = parse(source).unwrap().model;

        assert_snapshot!(ShexTemplate.render(&model).unwrap(), @r###"
        PREFIX xsd: <http://www.w3.org/2001/XMLSchema#>
        PREFIX ex: <https://example.org/lab/>

        # A lab sample.
        ex:Sample {
            ex:id xsd:string ;
            ex:parts @ex:Part * ;
            ex:color [ "blue" "red" ] ? ;
            ex:value ( xsd:double OR @ex:Part ) ?
        }

        ex:Part {
            ex:tags xsd:string +
        }

        ex:Empty {}
        "###);
    }
}
