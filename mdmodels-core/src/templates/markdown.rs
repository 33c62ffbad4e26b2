//! Markdown template (normalized dialect)
//!
//! Renders a model back into the markdown dialect in its normalized spelling. Rendering
//! a normalized document reproduces it byte for byte, and rendering is idempotent.
//!
//! ## Normalization rules
//!
//! | Element        | Normalized form                                          |
//! |----------------|----------------------------------------------------------|
//! | front matter   | emitted only when it differs from the defaults           |
//! | title          | `# Title` when present                                   |
//! | order          | objects first, then enumerations, source order kept      |
//! | identifier     | `- __name__`                                             |
//! | types          | primitives bare, references as `[Name](#name)`           |
//! | unions         | alternatives joined with ` \| `, `[]` appended once      |
//! | `Required`     | only when true                                           |
//! | `XML`          | only when it differs from the implicit element           |
//! | enum members   | ` ```python ` block, members sorted by key               |
//! | spacing        | one blank line between blocks, single trailing newline  |

use super::common::{kind_of, Kind};
use crate::error::ConvertError;
use crate::model::{Attribute, DataModel, Enumeration, Object, XMLType};
use crate::parser::types::anchor_for;
use crate::template::{Template, TemplateId};

pub struct MarkdownTemplate;

impl Template for MarkdownTemplate {
    fn id(&self) -> TemplateId {
        TemplateId::Markdown
    }

    fn description(&self) -> &str {
        "Normalized markdown data model"
    }

    fn file_extension(&self) -> &str {
        "md"
    }

    fn render(&self, model: &DataModel) -> Result<String, ConvertError> {
        let mut blocks = Vec::new();

        if !model.config.is_default() {
            let yaml = serde_yaml::to_string(&model.config)?;
            blocks.push(format!("---\n{yaml}---\n"));
        }
        if let Some(name) = &model.name {
            blocks.push(format!("# {name}\n"));
        }
        for object in &model.objects {
            blocks.push(render_object(model, object));
        }
        for enumeration in &model.enums {
            blocks.push(render_enum(enumeration));
        }

        Ok(blocks.join("\n"))
    }
}

fn render_object(model: &DataModel, object: &Object) -> String {
    let mut out = format!("### {}\n", object.name);
    if !object.docstring.is_empty() {
        out.push_str(&format!("\n{}\n", object.docstring));
    }
    if !object.attributes.is_empty() {
        out.push('\n');
        for attribute in &object.attributes {
            out.push_str(&render_attribute(model, attribute));
        }
    }
    out
}

fn render_attribute(model: &DataModel, attribute: &Attribute) -> String {
    let mut out = if attribute.is_id {
        format!("- __{}__\n", attribute.name)
    } else {
        format!("- {}\n", attribute.name)
    };

    if let Some(value) = type_value(model, attribute) {
        out.push_str(&format!("  - Type: {value}\n"));
    }
    if let Some(term) = &attribute.term {
        out.push_str(&format!("  - Term: {term}\n"));
    }
    if !attribute.docstring.is_empty() {
        out.push_str(&format!("  - Description: {}\n", attribute.docstring));
    }
    if attribute.required {
        out.push_str("  - Required: true\n");
    }
    if attribute.xml != XMLType::element(&attribute.name) {
        out.push_str(&format!("  - XML: {}\n", attribute.xml.to_value()));
    }
    for option in &attribute.options {
        out.push_str(&format!("  - {}: {}\n", option.key, option.value));
    }
    out
}

fn type_value(model: &DataModel, attribute: &Attribute) -> Option<String> {
    if attribute.dtypes.is_empty() && !attribute.multiple {
        return None;
    }
    let mut value = attribute
        .dtypes
        .iter()
        .map(|dtype| match kind_of(model, dtype) {
            Kind::Primitive(_) | Kind::Unknown(_) => dtype.clone(),
            Kind::Object(name) | Kind::Enum(name) => format!("[{name}]({})", anchor_for(name)),
        })
        .collect::<Vec<_>>()
        .join(" | ");
    if attribute.multiple {
        value.push_str("[]");
    }
    Some(value)
}

fn render_enum(enumeration: &Enumeration) -> String {
    let mut out = format!("### {}\n", enumeration.name);
    if !enumeration.docstring.is_empty() {
        out.push_str(&format!("\n{}\n", enumeration.docstring));
    }
    out.push_str("\n```python\n");
    for (key, value) in &enumeration.mappings {
        if value.contains('"') {
            out.push_str(&format!("{key} = '{value}'\n"));
        } else {
            out.push_str(&format!("{key} = \"{value}\"\n"));
        }
    }
    out.push_str("```\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;
    use insta::assert_snapshot;

    fn render(source: &str) -> String {
        let model = parse(source).unwrap().model;
        MarkdownTemplate.render(&model).unwrap()
    }

    #[test]
    fn test_normalizes_spelling() {
        let source = "# Lab\n### Sample\nA sample.\n* __id__\n    * type: Identifier\n* refs\n    * TYPE: [Measurement](#measurement)[]\n    * Required: yes\n\n### Measurement\n- value\n  - Type: float, integer\n  - XML: @value\n  - Minimum: 0\n";
        assert_snapshot!(render(source), @r###"
        # Lab

        ### Sample

        A sample.

        - __id__
          - Type: Identifier
        - refs
          - Type: [Measurement](#measurement)[]
          - Required: true

        ### Measurement

        - value
          - Type: float | integer
          - XML: @value
          - Minimum: 0
        "###);
    }

    #[test]
    fn test_front_matter_and_enum() {
        let source = "---\nprefixes:\n  schema: http://schema.org/\n---\n### Color\n\nPrimary colors.\n\n```\nRED = \"r\"\nBLUE = \"b\"\n```\n";
        assert_snapshot!(render(source), @r###"
        ---
        prefixes:
          schema: http://schema.org/
        ---

        ### Color

        Primary colors.

        ```python
        BLUE = "b"
        RED = "r"
        ```
        "###);
    }

    #[test]
    fn test_normalized_document_is_reproduced() {
        let normalized = "# Model\n\n### A\n\nAn object.\n\n- __id__\n  - Type: string\n  - Term: http://schema.org/identifier\n  - Description: The key.\n- items\n  - Type: [B](#b)[]\n\n### B\n\n- value\n  - Type: integer\n  - Default: 1\n";
        assert_eq!(render(normalized), normalized);
    }

    #[test]
    fn test_rendering_is_idempotent() {
        let once = render("### A\n- x\n  - Type: string\n  - Type: []\n### B\n```\nX='x'\n```\n");
        assert_eq!(render(&once), once);
    }

    #[test]
    fn test_enum_value_with_double_quote_round_trips() {
        let once = render("### Mark\n\n```\nQUOTE = 'say \"hi\"'\n```\n");
        assert!(once.contains("QUOTE = 'say \"hi\"'"));
        assert_eq!(render(&once), once);
    }
}
