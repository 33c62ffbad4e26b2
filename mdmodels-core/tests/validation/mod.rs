//! Validation of whole documents through the public API.

use crate::common::fixture;
use mdmodels_core::{validate, ErrorType, EMPTY_DOC_ERROR};

#[test]
fn test_valid_documents_have_no_errors() {
    for name in ["lab.md", "normalized.md"] {
        let report = validate(&fixture(name));
        assert!(report.is_valid, "{name}: {:?}", report.errors);
        assert!(report.errors.is_empty());
    }
}

#[test]
fn test_undefined_type_points_at_type_line() {
    let report = validate("### A\n- x\n  - Type: Missing\n");
    assert!(!report.is_valid);
    assert_eq!(report.errors.len(), 1);

    let error = &report.errors[0];
    assert_eq!(error.error_type, ErrorType::TypeError);
    assert_eq!(error.positions[0].line, 3);
    assert_eq!(error.location, "Line 3, Column 3");
}

#[test]
fn test_one_duplicate_error_per_extra_occurrence() {
    let source = "### A\n- x\n  - Type: string\n### A\n- y\n  - Type: string\n### A\n- z\n  - Type: string\n";
    let report = validate(source);

    let duplicates: Vec<_> = report
        .errors
        .iter()
        .filter(|e| e.error_type == ErrorType::DuplicateError)
        .collect();
    assert_eq!(duplicates.len(), 2);
    let lines: Vec<_> = duplicates.iter().map(|e| e.positions[0].line).collect();
    assert_eq!(lines, vec![4, 7]);
}

#[test]
fn test_empty_document_sentinel() {
    let report = validate("");
    assert!(!report.is_valid);
    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.errors[0].error_type, ErrorType::GlobalError);
    assert_eq!(report.errors[0].message, EMPTY_DOC_ERROR);
    assert!(report.is_empty_document());
    assert!(report.without_sentinel().is_valid);
}

#[test]
fn test_broken_front_matter_is_a_diagnostic() {
    let report = validate("---\nrepo: x\n### A\n");
    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.errors[0].error_type, ErrorType::ParseError);
    assert_eq!(report.errors[0].positions[0].line, 1);
}

#[test]
fn test_errors_serialize_with_type_tags() {
    let report = validate("### A\n- x\n  - Type: Missing\n");
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["is_valid"], false);
    assert_eq!(json["errors"][0]["error_type"], "TypeError");
    assert_eq!(json["errors"][0]["object"], "A");
    assert_eq!(json["errors"][0]["attribute"], "x");
}

#[test]
fn test_errors_are_ordered_by_line() {
    let source = "### B\n- 1st\n  - Type: string\n### A\n- x\n  - Type: Missing\n- y\n";
    let report = validate(source);
    let lines: Vec<_> = report.errors.iter().map(|e| e.line()).collect();
    let mut sorted = lines.clone();
    sorted.sort();
    assert_eq!(lines, sorted);
    assert!(report.errors.len() >= 3);
}
