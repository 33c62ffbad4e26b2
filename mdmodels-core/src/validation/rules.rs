//! Individual validation rules. Each rule appends its findings and never stops early.

use super::{ErrorType, ValidationError};
use crate::model::{DataModel, SourcePosition, XMLType};
use crate::parser::ParseDiagnostic;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

static DEFINITION_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9_]*$").expect("valid definition name regex"));

static ATTRIBUTE_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("valid attribute name regex"));

static CURIE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([A-Za-z_][A-Za-z0-9_.\-]*):(\S+)$").expect("valid curie regex"));

static URI: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*://\S+$").expect("valid uri regex"));

static XML_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_.\-]*(?::[A-Za-z_][A-Za-z0-9_.\-]*)?$")
        .expect("valid xml name regex")
});

/// Builder diagnostics become `ParseError` findings.
pub fn check_diagnostics(diagnostics: &[ParseDiagnostic], errors: &mut Vec<ValidationError>) {
    for diagnostic in diagnostics {
        errors.push(ValidationError::new(
            ErrorType::ParseError,
            diagnostic.message.clone(),
            diagnostic.object.as_deref(),
            diagnostic.attribute.as_deref(),
            vec![diagnostic.position],
        ));
    }
}

/// Every repeated definition or attribute name is reported at its own position.
pub fn check_duplicates(model: &DataModel, errors: &mut Vec<ValidationError>) {
    let mut definitions: Vec<(&str, &str, SourcePosition)> = model
        .objects
        .iter()
        .map(|o| ("Object", o.name.as_str(), o.position))
        .chain(
            model
                .enums
                .iter()
                .map(|e| ("Enumeration", e.name.as_str(), e.position)),
        )
        .collect();
    definitions.sort_by_key(|(_, _, position)| position.line);

    let mut seen = HashSet::new();
    for (kind, name, position) in definitions {
        if !seen.insert(name) {
            errors.push(ValidationError::new(
                ErrorType::DuplicateError,
                format!("{kind} '{name}' is defined more than once"),
                Some(name),
                None,
                vec![position],
            ));
        }
    }

    for object in &model.objects {
        let mut seen = HashSet::new();
        for attribute in &object.attributes {
            if !seen.insert(attribute.name.as_str()) {
                errors.push(ValidationError::new(
                    ErrorType::DuplicateError,
                    format!(
                        "Attribute '{}' is defined more than once in object '{}'",
                        attribute.name, object.name
                    ),
                    Some(&object.name),
                    Some(&attribute.name),
                    vec![attribute.position],
                ));
            }
        }
    }
}

pub fn check_names(model: &DataModel, errors: &mut Vec<ValidationError>) {
    for object in &model.objects {
        if !DEFINITION_NAME.is_match(&object.name) {
            errors.push(ValidationError::new(
                ErrorType::NameError,
                format!(
                    "Name '{}' of object is invalid: use letters, digits and underscores, starting with a letter",
                    object.name
                ),
                Some(&object.name),
                None,
                vec![object.position],
            ));
        }
        for attribute in &object.attributes {
            if !ATTRIBUTE_NAME.is_match(&attribute.name) {
                errors.push(ValidationError::new(
                    ErrorType::NameError,
                    format!(
                        "Name '{}' of attribute in object '{}' is invalid: use letters, digits and underscores",
                        attribute.name, object.name
                    ),
                    Some(&object.name),
                    Some(&attribute.name),
                    vec![attribute.position],
                ));
            }
        }
    }

    for enumeration in &model.enums {
        if !DEFINITION_NAME.is_match(&enumeration.name) {
            errors.push(ValidationError::new(
                ErrorType::NameError,
                format!(
                    "Name '{}' of enumeration is invalid: use letters, digits and underscores, starting with a letter",
                    enumeration.name
                ),
                Some(&enumeration.name),
                None,
                vec![enumeration.position],
            ));
        }
    }
}

/// Types must be present, resolvable and compatible with identifier semantics.
pub fn check_types(model: &DataModel, errors: &mut Vec<ValidationError>) {
    for object in &model.objects {
        for attribute in &object.attributes {
            let anchor = attribute.type_position.unwrap_or(attribute.position);

            if attribute.dtypes.is_empty() {
                errors.push(ValidationError::new(
                    ErrorType::TypeError,
                    format!(
                        "Attribute '{}' in object '{}' has no type",
                        attribute.name, object.name
                    ),
                    Some(&object.name),
                    Some(&attribute.name),
                    vec![attribute.position],
                ));
            }

            for dtype in &attribute.dtypes {
                if model.resolve(dtype).is_none() {
                    errors.push(ValidationError::new(
                        ErrorType::TypeError,
                        format!(
                            "Type '{}' of attribute '{}' in object '{}' is not defined",
                            dtype, attribute.name, object.name
                        ),
                        Some(&object.name),
                        Some(&attribute.name),
                        vec![anchor],
                    ));
                }
            }

            if attribute.is_id && attribute.multiple {
                errors.push(ValidationError::new(
                    ErrorType::TypeError,
                    format!(
                        "Identifier '{}' in object '{}' cannot be an array",
                        attribute.name, object.name
                    ),
                    Some(&object.name),
                    Some(&attribute.name),
                    vec![anchor],
                ));
            }
        }
    }
}

/// Terms are full URIs or CURIEs whose prefix is declared in the front matter.
pub fn check_terms(model: &DataModel, errors: &mut Vec<ValidationError>) {
    for object in &model.objects {
        for attribute in &object.attributes {
            let Some(term) = attribute.term.as_deref() else {
                continue;
            };
            if URI.is_match(term) {
                continue;
            }
            let message = match CURIE.captures(term) {
                Some(caps) if model.config.knows_prefix(&caps[1]) => continue,
                Some(caps) => format!(
                    "Prefix '{}' of term '{}' is not declared in the front matter",
                    &caps[1], term
                ),
                None => format!("Term '{term}' is neither a URI nor a 'prefix:local' CURIE"),
            };
            errors.push(ValidationError::new(
                ErrorType::TermError,
                message,
                Some(&object.name),
                Some(&attribute.name),
                vec![attribute.term_position.unwrap_or(attribute.position)],
            ));
        }
    }
}

pub fn check_xml(model: &DataModel, errors: &mut Vec<ValidationError>) {
    for object in &model.objects {
        for attribute in &object.attributes {
            // The implicit element name is covered by the attribute name rule.
            if attribute.xml == XMLType::element(&attribute.name) {
                continue;
            }
            if !XML_NAME.is_match(&attribute.xml.name) {
                errors.push(ValidationError::new(
                    ErrorType::XMLError,
                    format!(
                        "XML name '{}' of attribute '{}' is not a valid XML name",
                        attribute.xml.name, attribute.name
                    ),
                    Some(&object.name),
                    Some(&attribute.name),
                    vec![attribute.position],
                ));
            }
        }
    }
}

pub fn check_enumerations(model: &DataModel, errors: &mut Vec<ValidationError>) {
    for enumeration in &model.enums {
        if enumeration.mappings.is_empty() {
            errors.push(ValidationError::new(
                ErrorType::GlobalError,
                format!("Enumeration '{}' has no members", enumeration.name),
                Some(&enumeration.name),
                None,
                vec![enumeration.position],
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::validation::{validate, ErrorType};

    fn error_types(source: &str) -> Vec<ErrorType> {
        validate(source).errors.iter().map(|e| e.error_type).collect()
    }

    #[test]
    fn test_unknown_type_is_anchored_at_type_line() {
        let result = validate("### A\n- x\n  - Type: Missing\n");
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].error_type, ErrorType::TypeError);
        assert_eq!(result.errors[0].positions[0].line, 3);
        assert_eq!(result.errors[0].location, "Line 3, Column 3");
    }

    #[test]
    fn test_missing_type() {
        let result = validate("### A\n- __id__\n");
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].error_type, ErrorType::TypeError);
        assert_eq!(result.errors[0].positions[0].line, 2);
        assert_eq!(result.errors[0].attribute.as_deref(), Some("id"));
    }

    #[test]
    fn test_each_extra_definition_is_a_duplicate() {
        let source = "### A\n- x\n  - Type: string\n### A\n- y\n  - Type: string\n### A\n- z\n  - Type: string\n";
        let result = validate(source);
        let lines: Vec<_> = result.errors.iter().map(|e| e.positions[0].line).collect();
        assert!(result
            .errors
            .iter()
            .all(|e| e.error_type == ErrorType::DuplicateError));
        assert_eq!(lines, vec![4, 7]);
    }

    #[test]
    fn test_enum_and_object_share_a_namespace() {
        let source = "### Color\n- x\n  - Type: string\n\n### Color\n\n```\nRED = \"r\"\n```\n";
        assert_eq!(error_types(source), vec![ErrorType::DuplicateError]);
    }

    #[test]
    fn test_duplicate_attribute() {
        let source = "### A\n- x\n  - Type: string\n- x\n  - Type: integer\n";
        let result = validate(source);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].error_type, ErrorType::DuplicateError);
        assert_eq!(result.errors[0].positions[0].line, 4);
    }

    #[test]
    fn test_invalid_names() {
        let source = "### My Object\n- first name\n  - Type: string\n";
        assert_eq!(
            error_types(source),
            vec![ErrorType::NameError, ErrorType::NameError]
        );
    }

    #[test]
    fn test_identifier_cannot_be_multiple() {
        assert_eq!(
            error_types("### A\n- __id__\n  - Type: string[]\n"),
            vec![ErrorType::TypeError]
        );
    }

    #[test]
    fn test_terms() {
        let declared = "---\nprefixes:\n  schema: http://schema.org/\n---\n### A\n- name\n  - Type: string\n  - Term: schema:name\n";
        assert!(validate(declared).is_valid);

        let uri = "### A\n- name\n  - Type: string\n  - Term: http://schema.org/name\n";
        assert!(validate(uri).is_valid);

        let undeclared = "### A\n- name\n  - Type: string\n  - Term: foaf:name\n";
        assert_eq!(error_types(undeclared), vec![ErrorType::TermError]);

        let malformed = "### A\n- name\n  - Type: string\n  - Term: not a term\n";
        assert_eq!(error_types(malformed), vec![ErrorType::TermError]);
    }

    #[test]
    fn test_term_error_points_at_term_line() {
        let source = "### A\n- name\n  - Type: string\n  - Term: foaf:name\n";
        let result = validate(source);
        assert_eq!(result.errors[0].error_type, ErrorType::TermError);
        assert_eq!(result.errors[0].location, "Line 4, Column 3");
    }

    #[test]
    fn test_xml_names() {
        assert!(validate("### A\n- x\n  - Type: string\n  - XML: @ex:x\n").is_valid);
        assert_eq!(
            error_types("### A\n- x\n  - Type: string\n  - XML: 1bad\n"),
            vec![ErrorType::XMLError]
        );
    }

    #[test]
    fn test_enumeration_without_members() {
        let source = "### Color\n\n```\n# nothing yet\n```\n";
        assert_eq!(error_types(source), vec![ErrorType::GlobalError]);
    }

    #[test]
    fn test_parse_diagnostics_are_reported() {
        let source = "### A\n- x\n  - Type string\n";
        let types = error_types(source);
        assert!(types.contains(&ErrorType::ParseError));
        assert!(types.contains(&ErrorType::TypeError));
    }
}
