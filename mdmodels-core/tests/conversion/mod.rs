//! Conversion of whole documents through the public API.

use crate::common::fixture;
use insta::assert_snapshot;
use mdmodels_core::{convert_to, json_schema, ConvertError, JsonSchemaOptions, TemplateId};
use serde_json::Value;

#[test]
fn test_single_string_attribute_schema() {
    let schema = convert_to("### Person\n- name\n  - Type: string\n", TemplateId::JsonSchema).unwrap();
    let value: Value = serde_json::from_str(&schema).unwrap();

    assert_eq!(value["type"], "object");
    assert_eq!(value["properties"]["name"]["type"], "string");
}

#[test]
fn test_normalized_document_round_trips() {
    let normalized = fixture("normalized.md");
    assert_eq!(convert_to(&normalized, TemplateId::Markdown).unwrap(), normalized);
}

#[test]
fn test_every_template_renders_the_lab() {
    let source = fixture("lab.md");
    for id in TemplateId::ALL {
        let first = convert_to(&source, id).unwrap_or_else(|err| panic!("{id}: {err}"));
        assert!(!first.is_empty(), "{id} rendered nothing");
        assert_eq!(convert_to(&source, id).unwrap(), first, "{id} is not deterministic");
    }
}

#[test]
fn test_invalid_models_are_refused() {
    for source in ["", "### A\n- x\n  - Type: Missing\n"] {
        let err = convert_to(source, TemplateId::Rust).unwrap_err();
        assert!(matches!(err, ConvertError::InvalidModel(ref errors) if !errors.is_empty()));
    }
    let err = convert_to("---\nrepo: x\n", TemplateId::Rust).unwrap_err();
    assert!(matches!(err, ConvertError::Parse(_)));
}

#[test]
fn test_json_schema_root_and_refs() {
    let source = fixture("lab.md");

    let default: Value = serde_json::from_str(&json_schema(&source, None, false).unwrap()).unwrap();
    assert_eq!(default["title"], "Notebook");
    assert_eq!(default["properties"]["entries"]["items"]["$ref"], "#/$defs/Entry");
    assert!(default["$defs"]["State"].is_object());

    let options = JsonSchemaOptions {
        root: Some("Sample".to_string()),
        strict: true,
    };
    let sample: Value = serde_json::from_str(&json_schema(&source, Some(&options), true).unwrap()).unwrap();
    assert_eq!(sample["title"], "Sample");
    assert_eq!(sample["additionalProperties"], false);
    assert_eq!(sample["properties"]["state"]["enum"][0], "gas");
    assert!(sample.get("$defs").is_none());
}

#[test]
fn test_lab_class_diagram() {
    assert_snapshot!(convert_to(&fixture("lab.md"), TemplateId::Mermaid).unwrap(), @r###"
    classDiagram
        class Notebook {
            +Identifier id
            +string title
            +Entry[] entries
        }
        class Entry {
            +datetime written
            +Person | string author
            +Sample[] samples
            +Notebook notebook
        }
        class Person {
            +string name
            +string orcid
        }
        class Sample {
            +string label
            +float mass
            +State state
        }
        class State {
            <<enumeration>>
            GAS
            LIQUID
            SOLID
        }

        Notebook --> "*" Entry : entries
        Entry --> "1" Person : author
        Entry --> "*" Sample : samples
        Entry --> "1" Notebook : notebook
        Sample --> "1" State : state
    "###);
}
