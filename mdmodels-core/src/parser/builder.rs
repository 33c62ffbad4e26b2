//! Document model builder (blocks → [`DataModel`])
//!
//! Blocks are grouped into sections opened by `###` headings. A section whose body
//! holds a fenced code block and no bullet list becomes an [`Enumeration`]; every
//! other section becomes an [`Object`]. `#` sets the model title, `##` closes the
//! current section, deeper headings are skipped.
//!
//! The builder never fails. Malformed bullets are recorded as [`ParseDiagnostic`]s
//! and the remaining lines are still read, so the validator can report every
//! problem of a document in one pass.

use super::lexer::{Block, BlockKind, Lexed, ListItem};
use super::types::{parse_attribute_name, parse_bool, parse_enum_line, parse_type_value, EnumLine};
use crate::model::{
    AttrOption, Attribute, DataModel, Enumeration, LineIndex, Object, SourcePosition, XMLType,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A recoverable problem found while building the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParseDiagnostic {
    pub message: String,
    pub object: Option<String>,
    pub attribute: Option<String>,
    pub position: SourcePosition,
}

/// The built model plus every recoverable diagnostic.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseOutcome {
    pub model: DataModel,
    pub diagnostics: Vec<ParseDiagnostic>,
}

struct Section {
    name: String,
    line: usize,
    paragraphs: Vec<String>,
    lists: Vec<Vec<ListItem>>,
    code_blocks: Vec<Vec<(usize, String)>>,
}

impl Section {
    fn new(name: String, line: usize) -> Self {
        Section {
            name,
            line,
            paragraphs: Vec::new(),
            lists: Vec::new(),
            code_blocks: Vec::new(),
        }
    }

    fn accepts_docstring(&self) -> bool {
        self.lists.is_empty() && self.code_blocks.is_empty()
    }

    fn is_enumeration(&self) -> bool {
        self.lists.is_empty() && !self.code_blocks.is_empty()
    }
}

struct Builder<'a> {
    index: LineIndex<'a>,
    model: DataModel,
    diagnostics: Vec<ParseDiagnostic>,
}

/// Build a [`DataModel`] from lexed blocks.
pub fn build(source: &str, lexed: Lexed) -> ParseOutcome {
    let mut builder = Builder {
        index: LineIndex::new(source),
        model: DataModel {
            config: lexed.config,
            ..Default::default()
        },
        diagnostics: Vec::new(),
    };

    let mut current: Option<Section> = None;
    for block in lexed.blocks {
        let Block {
            kind, start_line, ..
        } = block;
        match kind {
            BlockKind::Heading { level: 1, text } => {
                if builder.model.name.is_none() && !text.is_empty() {
                    builder.model.name = Some(text);
                }
            }
            BlockKind::Heading { level: 2, .. } => {
                if let Some(section) = current.take() {
                    builder.finish_section(section);
                }
            }
            BlockKind::Heading { level: 3, text } => {
                if let Some(section) = current.take() {
                    builder.finish_section(section);
                }
                current = Some(Section::new(text, start_line));
            }
            BlockKind::Heading { .. } | BlockKind::Other => {}
            BlockKind::Paragraph { text } => {
                if let Some(section) = current.as_mut() {
                    if section.accepts_docstring() {
                        section.paragraphs.push(text);
                    }
                }
            }
            BlockKind::List { items } => match current.as_mut() {
                Some(section) => section.lists.push(items),
                None => debug!(line = start_line, "ignoring list outside of a definition"),
            },
            BlockKind::CodeBlock { lines, .. } => {
                if let Some(section) = current.as_mut() {
                    section.code_blocks.push(lines);
                }
            }
        }
    }
    if let Some(section) = current.take() {
        builder.finish_section(section);
    }

    builder.mark_enum_attributes();
    debug!(
        objects = builder.model.objects.len(),
        enums = builder.model.enums.len(),
        diagnostics = builder.diagnostics.len(),
        "built data model"
    );

    ParseOutcome {
        model: builder.model,
        diagnostics: builder.diagnostics,
    }
}

impl Builder<'_> {
    fn finish_section(&mut self, section: Section) {
        if section.is_enumeration() {
            let enumeration = self.build_enumeration(section);
            self.model.enums.push(enumeration);
        } else {
            let object = self.build_object(section);
            self.model.objects.push(object);
        }
    }

    fn build_object(&mut self, section: Section) -> Object {
        let mut object = Object::new(section.name, self.index.line_position(section.line));
        object.docstring = section.paragraphs.join("\n\n").trim().to_string();

        for item in section.lists.into_iter().flatten() {
            if let Some(attribute) = self.build_attribute(&object.name, item) {
                object.attributes.push(attribute);
            }
        }
        object
    }

    fn build_attribute(&mut self, object: &str, item: ListItem) -> Option<Attribute> {
        let position = self.index.line_position(item.line);
        if item.text.is_empty() {
            self.diagnose(position, object, None, "Attribute bullet has no name");
            return None;
        }

        let (name, is_id) = parse_attribute_name(&item.text);
        let mut attribute = Attribute::new(name, position);
        attribute.is_id = is_id;

        for child in item.children {
            self.apply_option(object, &mut attribute, child);
        }
        Some(attribute)
    }

    fn apply_option(&mut self, object: &str, attribute: &mut Attribute, item: ListItem) {
        let position = self.index.line_position(item.line);
        let attr_name = Some(attribute.name.clone());

        for nested in &item.children {
            let nested_position = self.index.line_position(nested.line);
            self.diagnose(
                nested_position,
                object,
                attr_name.clone(),
                format!(
                    "Bullet '{}' is nested too deeply; options are a single level below the attribute",
                    nested.text
                ),
            );
        }

        let Some((key, value)) = item.text.split_once(':') else {
            self.diagnose(
                position,
                object,
                attr_name,
                format!("Malformed option '{}': expected 'Key: Value'", item.text),
            );
            return;
        };
        let key = key.trim();
        let value = value.trim();

        if key.is_empty() {
            self.diagnose(position, object, attr_name, "Option is missing its key");
            return;
        }
        if value.is_empty() {
            self.diagnose(
                position,
                object,
                attr_name,
                format!("Option '{key}' has no value"),
            );
            return;
        }

        match key.to_ascii_lowercase().as_str() {
            "type" => {
                let (dtypes, multiple) = parse_type_value(value);
                attribute.dtypes.extend(dtypes);
                attribute.multiple |= multiple;
                if attribute.type_position.is_none() {
                    attribute.type_position = Some(position);
                }
            }
            "term" => {
                attribute.term = Some(value.to_string());
                attribute.term_position = Some(position);
            }
            "description" => {
                if attribute.docstring.is_empty() {
                    attribute.docstring = value.to_string();
                } else {
                    attribute.docstring.push(' ');
                    attribute.docstring.push_str(value);
                }
            }
            "xml" => attribute.xml = XMLType::from_value(value),
            "required" => match parse_bool(value) {
                Some(required) => attribute.required = required,
                None => self.diagnose(
                    position,
                    object,
                    attr_name,
                    format!("Required must be 'true' or 'false', found '{value}'"),
                ),
            },
            _ => attribute.options.push(AttrOption::new(key, value)),
        }
    }

    fn build_enumeration(&mut self, section: Section) -> Enumeration {
        let mut enumeration = Enumeration {
            name: section.name,
            docstring: section.paragraphs.join("\n\n").trim().to_string(),
            position: self.index.line_position(section.line),
            ..Default::default()
        };

        for (line, text) in section.code_blocks.into_iter().flatten() {
            let position = self.index.line_position(line);
            match parse_enum_line(&text) {
                EnumLine::Mapping(key, value) => {
                    if enumeration.mappings.contains_key(&key) {
                        let name = enumeration.name.clone();
                        self.diagnose(
                            position,
                            &name,
                            None,
                            format!("Enumeration member '{key}' is defined more than once"),
                        );
                    } else {
                        enumeration.mappings.insert(key, value);
                    }
                }
                EnumLine::Skip => {}
                EnumLine::Malformed => {
                    let name = enumeration.name.clone();
                    self.diagnose(
                        position,
                        &name,
                        None,
                        format!("Malformed enumeration member '{}': expected KEY = \"value\"", text.trim()),
                    );
                }
            }
        }
        enumeration
    }

    fn mark_enum_attributes(&mut self) {
        let enum_names: Vec<String> = self.model.enums.iter().map(|e| e.name.clone()).collect();
        for object in &mut self.model.objects {
            for attribute in &mut object.attributes {
                attribute.is_enum = attribute.dtypes.iter().any(|d| enum_names.contains(d));
            }
        }
    }

    fn diagnose(
        &mut self,
        position: SourcePosition,
        object: &str,
        attribute: Option<String>,
        message: impl Into<String>,
    ) {
        let message = message.into();
        debug!(line = position.line, %message, "recovered parse diagnostic");
        self.diagnostics.push(ParseDiagnostic {
            message,
            object: Some(object.to_string()),
            attribute,
            position,
        });
    }
}
