//! Template trait definition
//!
//! A template renders a [`DataModel`] into one target representation. Every target is a
//! unit struct implementing [`Template`]; [`TemplateId`] is the closed set of targets
//! the converter knows about and the key under which they are registered.

use crate::error::ConvertError;
use crate::model::DataModel;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Target formats of the converter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TemplateId {
    Markdown,
    JsonSchema,
    #[serde(rename = "xsd")]
    XmlSchema,
    #[serde(rename = "python-pydantic-xml")]
    PythonPydanticXML,
    PythonPydantic,
    PythonDataclass,
    Rust,
    Golang,
    Typescript,
    TypescriptZod,
    Protobuf,
    Graphql,
    Linkml,
    Julia,
    Mermaid,
    #[serde(rename = "mkdocs")]
    MkDocs,
    Shacl,
    Shex,
}

impl TemplateId {
    pub const ALL: [TemplateId; 18] = [
        TemplateId::Markdown,
        TemplateId::JsonSchema,
        TemplateId::XmlSchema,
        TemplateId::PythonPydanticXML,
        TemplateId::PythonPydantic,
        TemplateId::PythonDataclass,
        TemplateId::Rust,
        TemplateId::Golang,
        TemplateId::Typescript,
        TemplateId::TypescriptZod,
        TemplateId::Protobuf,
        TemplateId::Graphql,
        TemplateId::Linkml,
        TemplateId::Julia,
        TemplateId::Mermaid,
        TemplateId::MkDocs,
        TemplateId::Shacl,
        TemplateId::Shex,
    ];

    /// Registry key and command line spelling.
    pub fn name(&self) -> &'static str {
        match self {
            TemplateId::Markdown => "markdown",
            TemplateId::JsonSchema => "json-schema",
            TemplateId::XmlSchema => "xsd",
            TemplateId::PythonPydanticXML => "python-pydantic-xml",
            TemplateId::PythonPydantic => "python-pydantic",
            TemplateId::PythonDataclass => "python-dataclass",
            TemplateId::Rust => "rust",
            TemplateId::Golang => "golang",
            TemplateId::Typescript => "typescript",
            TemplateId::TypescriptZod => "typescript-zod",
            TemplateId::Protobuf => "protobuf",
            TemplateId::Graphql => "graphql",
            TemplateId::Linkml => "linkml",
            TemplateId::Julia => "julia",
            TemplateId::Mermaid => "mermaid",
            TemplateId::MkDocs => "mkdocs",
            TemplateId::Shacl => "shacl",
            TemplateId::Shex => "shex",
        }
    }
}

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TemplateId {
    type Err = ConvertError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('_', "-");
        TemplateId::ALL
            .into_iter()
            .find(|id| id.name() == wanted)
            .ok_or_else(|| ConvertError::TemplateNotFound(s.to_string()))
    }
}

/// Trait for conversion targets
///
/// Implementors are stateless and render deterministically: the same model always
/// produces byte-identical output.
///
/// # Examples
///
/// ```ignore
/// struct MyTemplate;
///
/// impl Template for MyTemplate {
///     fn id(&self) -> TemplateId {
///         TemplateId::Markdown
///     }
///
///     fn file_extension(&self) -> &str {
///         "md"
///     }
///
///     fn render(&self, model: &DataModel) -> Result<String, ConvertError> {
///         Ok(format!("{} objects", model.objects.len()))
///     }
/// }
/// ```
pub trait Template: Send + Sync {
    fn id(&self) -> TemplateId;

    /// Registry name, the kebab-case spelling of [`Template::id`].
    fn name(&self) -> &str {
        self.id().name()
    }

    fn description(&self) -> &str {
        ""
    }

    /// File extension of rendered output, without the leading dot.
    fn file_extension(&self) -> &str;

    fn render(&self, model: &DataModel) -> Result<String, ConvertError>;

    /// Render, optionally using extra parameters.
    ///
    /// Templates without parameters rely on the default implementation, which rejects
    /// any non-empty option map.
    fn render_with_options(
        &self,
        model: &DataModel,
        options: &HashMap<String, String>,
    ) -> Result<String, ConvertError> {
        if options.is_empty() {
            self.render(model)
        } else {
            Err(ConvertError::NotSupported(format!(
                "Template '{}' does not support extra parameters",
                self.name()
            )))
        }
    }
}
