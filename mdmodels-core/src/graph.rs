//! Relationship graph and heading outline
//!
//! Both are views for a visual editor: the edges feed a node-link diagram of the
//! objects, the outline a table of contents. Neither does layout.

use crate::model::DataModel;
use crate::parser::lexer::{lex, BlockKind};
use serde::{Deserialize, Serialize};

/// An attribute of `source` whose type is the object `target`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub id: String,
    pub source: String,
    pub target: String,
    pub attribute: String,
}

/// Edges between objects, in source order. Enumerations and primitives are not nodes.
pub fn relationship_edges(model: &DataModel) -> Vec<Edge> {
    let mut edges = Vec::new();
    for object in &model.objects {
        for attribute in &object.attributes {
            for dtype in &attribute.dtypes {
                let Some(target) = model.object(dtype) else {
                    continue;
                };
                edges.push(Edge {
                    id: format!("{}-{}-{}", object.name, attribute.name, target.name),
                    source: object.name.clone(),
                    target: target.name.clone(),
                    attribute: attribute.name.clone(),
                });
            }
        }
    }
    edges
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutlineEntry {
    pub level: u8,
    pub text: String,
    pub line: usize,
}

/// Headings of level 1 to 3, in document order.
///
/// A document with a broken front matter has no outline.
pub fn outline(source: &str) -> Vec<OutlineEntry> {
    let Ok(lexed) = lex(source) else {
        return Vec::new();
    };
    lexed
        .blocks
        .into_iter()
        .filter_map(|block| match block.kind {
            BlockKind::Heading { level, text } if level <= 3 => Some(OutlineEntry {
                level,
                text,
                line: block.start_line,
            }),
            _ => None,
        })
        .collect()
}
