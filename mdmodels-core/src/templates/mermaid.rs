//! Mermaid class diagram template

use super::common::{kind_of, Kind};
use crate::error::ConvertError;
use crate::model::{Attribute, DataModel};
use crate::template::{Template, TemplateId};
use std::fmt::Write;

pub struct MermaidTemplate;

impl Template for MermaidTemplate {
    fn id(&self) -> TemplateId {
        TemplateId::Mermaid
    }

    fn description(&self) -> &str {
        "Mermaid class diagram"
    }

    fn file_extension(&self) -> &str {
        "mmd"
    }

    fn render(&self, model: &DataModel) -> Result<String, ConvertError> {
        let mut out = String::new();
        writeln!(out, "classDiagram")?;

        let mut relations = Vec::new();
        for object in &model.objects {
            writeln!(out, "    class {} {{", object.name)?;
            for attribute in &object.attributes {
                writeln!(out, "        +{} {}", member_type(attribute), attribute.name)?;
                for dtype in &attribute.dtypes {
                    if let Kind::Object(target) | Kind::Enum(target) = kind_of(model, dtype) {
                        let multiplicity = if attribute.multiple { "\"*\"" } else { "\"1\"" };
                        relations.push(format!(
                            "    {} --> {multiplicity} {target} : {}",
                            object.name, attribute.name
                        ));
                    }
                }
            }
            writeln!(out, "    }}")?;
        }

        for enumeration in &model.enums {
            writeln!(out, "    class {} {{", enumeration.name)?;
            writeln!(out, "        <<enumeration>>")?;
            for key in enumeration.mappings.keys() {
                writeln!(out, "        {key}")?;
            }
            writeln!(out, "    }}")?;
        }

        if !relations.is_empty() {
            writeln!(out)?;
            for relation in relations {
                writeln!(out, "{relation}")?;
            }
        }
        Ok(out)
    }
}

fn member_type(attribute: &Attribute) -> String {
    let base = attribute.dtypes.join(" | ");
    if attribute.multiple {
        format!("{base}[]")
    } else {
        base
    }
}
