//! Parsing of whole documents through the public API.

use crate::common::fixture;
use mdmodels_core::parse_model;

#[test]
fn test_reference_and_array_marker() {
    let source = "### A\n- __id__\n  - Type: string\n### B\n- ref\n  - Type: [A](#a)\n  - Type: []\n";
    let model = parse_model(source).unwrap();

    let names: Vec<_> = model.objects.iter().map(|o| o.name.as_str()).collect();
    assert_eq!(names, vec!["A", "B"]);

    let reference = &model.objects[1].attributes[0];
    assert_eq!(reference.dtypes, vec!["A"]);
    assert!(reference.multiple);
    assert!(model.objects[0].attributes[0].is_id);
}

#[test]
fn test_empty_document() {
    let model = parse_model("").unwrap();
    assert!(model.objects.is_empty());
    assert!(model.enums.is_empty());
    assert!(model.is_empty());
}

#[test]
fn test_unterminated_front_matter_fails() {
    assert!(parse_model("---\nrepo: x\n### A\n- x\n  - Type: string\n").is_err());
}

#[test]
fn test_lab_fixture() {
    let model = parse_model(&fixture("lab.md")).unwrap();

    assert_eq!(model.name.as_deref(), Some("Lab Notebook"));
    assert!(model.config.id_field);
    assert_eq!(model.config.prefix.as_deref(), Some("lab"));
    assert_eq!(
        model.config.expand_curie("schema:name").as_deref(),
        Some("http://schema.org/name")
    );

    let names: Vec<_> = model.objects.iter().map(|o| o.name.as_str()).collect();
    assert_eq!(names, vec!["Notebook", "Entry", "Person", "Sample"]);

    let notebook = &model.objects[0];
    assert_eq!(notebook.docstring, "A bound notebook with entries.");
    assert_eq!(notebook.position.line, 15);
    assert_eq!(notebook.identifier().map(|a| a.name.as_str()), Some("id"));

    let entries = notebook.attribute("entries").unwrap();
    assert!(entries.multiple);
    assert_eq!(entries.docstring, "Entries in order of writing.");

    let author = model.objects[1].attribute("author").unwrap();
    assert_eq!(author.dtypes, vec!["Person", "string"]);
    assert!(author.is_union());

    let orcid = model.objects[2].attribute("orcid").unwrap();
    assert!(orcid.xml.is_attr);
    assert_eq!(orcid.option("pattern"), Some(r"^\d{4}-\d{4}-\d{4}-\d{3}[0-9X]$"));

    let state = model.enumeration("State").unwrap();
    let keys: Vec<_> = state.mappings.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["GAS", "LIQUID", "SOLID"]);
    assert!(model.objects[3].attribute("state").unwrap().is_enum);
}
