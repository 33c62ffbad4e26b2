//! Template registry for template discovery and selection
//!
//! This module provides a centralized registry for all available templates.
//! Templates can be registered and retrieved by name.

use crate::error::ConvertError;
use crate::model::DataModel;
use crate::template::{Template, TemplateId};
use crate::templates;
use std::collections::HashMap;

/// Registry of conversion templates
///
/// # Examples
///
/// ```ignore
/// let registry = TemplateRegistry::with_defaults();
/// let rust = registry.render(&model, "rust")?;
/// ```
pub struct TemplateRegistry {
    templates: HashMap<String, Box<dyn Template>>,
}

impl TemplateRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        TemplateRegistry {
            templates: HashMap::new(),
        }
    }

    /// Register a template
    ///
    /// If a template with the same name already exists, it will be replaced.
    pub fn register<T: Template + 'static>(&mut self, template: T) {
        self.templates
            .insert(template.name().to_string(), Box::new(template));
    }

    /// Get a template by name
    pub fn get(&self, name: &str) -> Result<&dyn Template, ConvertError> {
        self.templates
            .get(name)
            .map(|t| t.as_ref())
            .ok_or_else(|| ConvertError::TemplateNotFound(name.to_string()))
    }

    pub fn get_by_id(&self, id: TemplateId) -> Result<&dyn Template, ConvertError> {
        self.get(id.name())
    }

    /// Check if a template exists
    pub fn has(&self, name: &str) -> bool {
        self.templates.contains_key(name)
    }

    /// List all available template names (sorted)
    pub fn list_templates(&self) -> Vec<String> {
        let mut names: Vec<_> = self.templates.keys().cloned().collect();
        names.sort();
        names
    }

    /// Detect a template from an output filename based on its extension
    ///
    /// Several templates share an extension (`.py`, `.ts`, `.md`); the first one in
    /// [`TemplateId::ALL`] order wins.
    pub fn detect_template_from_filename(&self, filename: &str) -> Option<TemplateId> {
        let extension = std::path::Path::new(filename)
            .extension()
            .and_then(|ext| ext.to_str())?;

        TemplateId::ALL.into_iter().find(|id| {
            self.templates
                .get(id.name())
                .is_some_and(|t| t.file_extension() == extension)
        })
    }

    /// Render a model using the specified template
    pub fn render(&self, model: &DataModel, template: &str) -> Result<String, ConvertError> {
        self.get(template)?.render(model)
    }

    /// Render a model using the specified template and options
    pub fn render_with_options(
        &self,
        model: &DataModel,
        template: &str,
        options: &HashMap<String, String>,
    ) -> Result<String, ConvertError> {
        self.get(template)?.render_with_options(model, options)
    }

    /// Create a registry with every built-in template
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();

        registry.register(templates::markdown::MarkdownTemplate);
        registry.register(templates::json_schema::JsonSchemaTemplate);
        registry.register(templates::xsd::XsdTemplate);
        registry.register(templates::python::PydanticXmlTemplate);
        registry.register(templates::python::PydanticTemplate);
        registry.register(templates::python::DataclassTemplate);
        registry.register(templates::rust::RustTemplate);
        registry.register(templates::golang::GolangTemplate);
        registry.register(templates::typescript::TypescriptTemplate);
        registry.register(templates::typescript::ZodTemplate);
        registry.register(templates::protobuf::ProtobufTemplate);
        registry.register(templates::graphql::GraphqlTemplate);
        registry.register(templates::linkml::LinkmlTemplate);
        registry.register(templates::julia::JuliaTemplate);
        registry.register(templates::mermaid::MermaidTemplate);
        registry.register(templates::mkdocs::MkDocsTemplate);
        registry.register(templates::shacl::ShaclTemplate);
        registry.register(templates::shex::ShexTemplate);

        registry
    }
}

impl Default for TemplateRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TestTemplate;
    impl Template for TestTemplate {
        fn id(&self) -> TemplateId {
            TemplateId::Markdown
        }
        fn description(&self) -> &str {
            "Test template"
        }
        fn file_extension(&self) -> &str {
            "test"
        }
        fn render(&self, model: &DataModel) -> Result<String, ConvertError> {
            Ok(format!("{} objects", model.objects.len()))
        }
    }

    #[test]
    fn test_registry_creation() {
        let registry = TemplateRegistry::new();
        assert_eq!(registry.templates.len(), 0);
    }

    #[test]
    fn test_registry_register() {
        let mut registry = TemplateRegistry::new();
        registry.register(TestTemplate);

        assert!(registry.has("markdown"));
        assert_eq!(registry.list_templates(), vec!["markdown"]);
    }

    #[test]
    fn test_registry_get_nonexistent() {
        let registry = TemplateRegistry::new();
        match registry.get("nonexistent") {
            Err(ConvertError::TemplateNotFound(name)) => assert_eq!(name, "nonexistent"),
            _ => panic!("Expected TemplateNotFound error"),
        }
    }

    #[test]
    fn test_registry_render() {
        let mut registry = TemplateRegistry::new();
        registry.register(TestTemplate);

        let result = registry.render(&DataModel::default(), "markdown");
        assert_eq!(result.unwrap(), "0 objects");
    }

    #[test]
    fn test_render_rejects_unknown_options() {
        let mut registry = TemplateRegistry::new();
        registry.register(TestTemplate);

        let mut options = HashMap::new();
        options.insert("flavor".to_string(), "x".to_string());
        let result = registry.render_with_options(&DataModel::default(), "markdown", &options);
        assert!(matches!(result, Err(ConvertError::NotSupported(_))));
    }

    #[test]
    fn test_registry_with_defaults() {
        let registry = TemplateRegistry::with_defaults();
        for id in TemplateId::ALL {
            let template = registry.get_by_id(id).unwrap();
            assert_eq!(template.id(), id);
            assert!(!template.description().is_empty());
        }
        assert_eq!(registry.list_templates().len(), TemplateId::ALL.len());
    }

    #[test]
    fn test_detect_template_from_filename() {
        let registry = TemplateRegistry::with_defaults();
        assert_eq!(
            registry.detect_template_from_filename("schema.json"),
            Some(TemplateId::JsonSchema)
        );
        assert_eq!(
            registry.detect_template_from_filename("model.rs"),
            Some(TemplateId::Rust)
        );
        assert_eq!(
            registry.detect_template_from_filename("model.py"),
            Some(TemplateId::PythonPydanticXML)
        );
        assert_eq!(registry.detect_template_from_filename("model.unknown"), None);
    }
}
