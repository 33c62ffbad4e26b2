//! Property tests: validation never panics, conversion is deterministic, and the
//! markdown rendering is a fixed point.

use mdmodels_core::{convert_to, validate, TemplateId};
use proptest::prelude::*;

const PRIMITIVES: [&str; 6] = ["string", "integer", "float", "boolean", "date", "datetime"];

/// `(type index, multiple, union)` for one attribute.
type AttributeShape = (usize, bool, bool);

fn model_shapes() -> impl Strategy<Value = Vec<Vec<AttributeShape>>> {
    prop::collection::vec(
        prop::collection::vec((0usize..10, any::<bool>(), any::<bool>()), 1..5),
        1..4,
    )
}

/// A valid document: distinct object names, every type resolvable.
fn document(shapes: &[Vec<AttributeShape>]) -> String {
    let mut source = String::from("# Generated\n");
    for (idx, attributes) in shapes.iter().enumerate() {
        source.push_str(&format!("\n### Object{idx}\n\n"));
        for (attr_idx, &(type_idx, multiple, union)) in attributes.iter().enumerate() {
            let dtype = if type_idx < PRIMITIVES.len() {
                PRIMITIVES[type_idx].to_string()
            } else {
                let target = (type_idx - PRIMITIVES.len()) % shapes.len();
                format!("[Object{target}](#object{target})")
            };
            let mut value = dtype.clone();
            if union {
                value.push_str(if dtype == "integer" { " | string" } else { " | integer" });
            }
            if multiple {
                value.push_str("[]");
            }
            source.push_str(&format!("- field{attr_idx}\n  - Type: {value}\n"));
        }
    }
    source
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn validation_never_panics(source in "\\PC{0,400}") {
        let report = validate(&source);
        prop_assert_eq!(report.is_valid, report.errors.is_empty());
    }

    #[test]
    fn validation_never_panics_on_dialect_soup(
        source in "(### [A-Za-z_ ]{0,8}\n|- [_A-Za-z:|\\[\\]()#]{0,12}\n|  - [A-Za-z]{0,6}: [A-Za-z\\[\\]|]{0,10}\n|```\n|[A-Z]{1,4} = \"[a-z]{0,4}\"\n|---\n|\n){0,30}"
    ) {
        let report = validate(&source);
        for error in &report.errors {
            prop_assert!(!error.message.is_empty());
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn generated_models_are_valid(shapes in model_shapes()) {
        let source = document(&shapes);
        let report = validate(&source);
        prop_assert!(report.is_valid, "{:?}\n{}", report.errors, source);
    }

    #[test]
    fn conversion_is_deterministic(shapes in model_shapes()) {
        let source = document(&shapes);
        for id in TemplateId::ALL {
            let first = convert_to(&source, id);
            let second = convert_to(&source, id);
            prop_assert!(first.is_ok(), "{} failed on\n{}", id, source);
            prop_assert_eq!(first.ok(), second.ok());
        }
    }

    #[test]
    fn markdown_rendering_is_a_fixed_point(shapes in model_shapes()) {
        let once = convert_to(&document(&shapes), TemplateId::Markdown).unwrap();
        let twice = convert_to(&once, TemplateId::Markdown).unwrap();
        prop_assert_eq!(once, twice);
    }
}
