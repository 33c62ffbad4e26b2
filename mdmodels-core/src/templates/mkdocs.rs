//! MkDocs documentation page
//!
//! A single markdown page meant for `mkdocs-material`: an overview diagram, then one
//! section per object with an attribute table, then the enumerations. Type cells link
//! to the section of the referenced definition.

use super::common::{kind_of, model_title, Kind};
use super::mermaid::MermaidTemplate;
use crate::error::ConvertError;
use crate::model::{Attribute, DataModel};
use crate::parser::types::anchor_for;
use crate::template::{Template, TemplateId};
use std::fmt::Write;

pub struct MkDocsTemplate;

impl Template for MkDocsTemplate {
    fn id(&self) -> TemplateId {
        TemplateId::MkDocs
    }

    fn description(&self) -> &str {
        "MkDocs documentation page"
    }

    fn file_extension(&self) -> &str {
        "md"
    }

    fn render(&self, model: &DataModel) -> Result<String, ConvertError> {
        let mut out = String::new();
        writeln!(out, "---")?;
        writeln!(out, "hide:")?;
        writeln!(out, "  - navigation")?;
        writeln!(out, "---")?;
        writeln!(out)?;
        writeln!(out, "# {}", model_title(model))?;

        if !model.objects.is_empty() {
            writeln!(out)?;
            writeln!(out, "```mermaid")?;
            out.push_str(&MermaidTemplate.render(model)?);
            writeln!(out, "```")?;

            writeln!(out)?;
            writeln!(out, "## Types")?;
        }

        for object in &model.objects {
            writeln!(out)?;
            writeln!(out, "### {}", object.name)?;
            if !object.docstring.is_empty() {
                writeln!(out)?;
                writeln!(out, "{}", object.docstring)?;
            }
            if object.attributes.is_empty() {
                continue;
            }
            writeln!(out)?;
            writeln!(out, "| Attribute | Type | Required | Description | Term |")?;
            writeln!(out, "|-----------|------|----------|-------------|------|")?;
            for attribute in &object.attributes {
                writeln!(
                    out,
                    "| {} | {} | {} | {} | {} |",
                    attribute_label(attribute),
                    type_cell(model, attribute),
                    if attribute.is_required() { "yes" } else { "no" },
                    cell(&attribute.docstring),
                    attribute.term.as_deref().map(cell).unwrap_or_default()
                )?;
            }
        }

        if !model.enums.is_empty() {
            writeln!(out)?;
            writeln!(out, "## Enumerations")?;
        }
        for enumeration in &model.enums {
            writeln!(out)?;
            writeln!(out, "### {}", enumeration.name)?;
            if !enumeration.docstring.is_empty() {
                writeln!(out)?;
                writeln!(out, "{}", enumeration.docstring)?;
            }
            writeln!(out)?;
            writeln!(out, "| Alias | Value |")?;
            writeln!(out, "|-------|-------|")?;
            for (key, value) in &enumeration.mappings {
                writeln!(out, "| `{key}` | `{}` |", cell(value))?;
            }
        }
        Ok(out)
    }
}

fn attribute_label(attribute: &Attribute) -> String {
    if attribute.is_id {
        format!("**{}** (identifier)", attribute.name)
    } else {
        format!("`{}`", attribute.name)
    }
}

fn type_cell(model: &DataModel, attribute: &Attribute) -> String {
    let mut cell = attribute
        .dtypes
        .iter()
        .map(|dtype| match kind_of(model, dtype) {
            Kind::Object(name) | Kind::Enum(name) => format!("[{name}]({})", anchor_for(name)),
            Kind::Primitive(_) | Kind::Unknown(_) => dtype.clone(),
        })
        .collect::<Vec<_>>()
        .join(" or ");
    if attribute.multiple {
        cell.push_str("[]");
    }
    cell
}

/// Text safe inside a table cell.
fn cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', "<br>")
}
