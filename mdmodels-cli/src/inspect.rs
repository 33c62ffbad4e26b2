//! Views for the `inspect` command
//!
//! Each view shows one stage of the pipeline:
//!
//! - `model-json`: the built [`DataModel`](mdmodels_core::DataModel) as JSON (default)
//! - `blocks`: the lexer output, one block per line with its source range
//! - `graph`: relationship edges between objects as JSON
//! - `outline`: headings `#` to `###`, indented by level
//! - `lint`: editor diagnostics (byte ranges, type errors re-anchored) as JSON

use mdmodels_core::graph::{outline, relationship_edges};
use mdmodels_core::lint::editor_diagnostics;
use mdmodels_core::parser::lexer::{lex, Block, BlockKind};
use mdmodels_core::parse_model;
use std::fmt::Write;

/// All views understood by [`execute_view`]
pub const AVAILABLE_VIEWS: &[&str] = &["model-json", "blocks", "graph", "outline", "lint"];

pub const DEFAULT_VIEW: &str = "model-json";

/// Render a named view of a markdown data model.
pub fn execute_view(source: &str, view: &str) -> Result<String, String> {
    match view {
        "model-json" => {
            let model = parse_model(source).map_err(|e| format!("Parse error: {e}"))?;
            to_json(&model)
        }
        "blocks" => {
            let lexed = lex(source).map_err(|e| format!("Parse error: {e}"))?;
            let mut out = String::new();
            if let Some((start, end)) = lexed.front_matter {
                writeln!(out, "{:>4}-{:<4} front-matter", start, end).map_err(|e| e.to_string())?;
            }
            for block in &lexed.blocks {
                writeln!(out, "{}", describe_block(block)).map_err(|e| e.to_string())?;
            }
            Ok(out)
        }
        "graph" => {
            let model = parse_model(source).map_err(|e| format!("Parse error: {e}"))?;
            to_json(&relationship_edges(&model))
        }
        "outline" => {
            let mut out = String::new();
            for entry in outline(source) {
                let indent = "  ".repeat(usize::from(entry.level.saturating_sub(1)));
                writeln!(out, "{indent}{} (line {})", entry.text, entry.line)
                    .map_err(|e| e.to_string())?;
            }
            Ok(out)
        }
        "lint" => to_json(&editor_diagnostics(source)),
        other => Err(format!(
            "Unknown view '{other}'. Available views: {}",
            AVAILABLE_VIEWS.join(", ")
        )),
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string_pretty(value)
        .map(|json| json + "\n")
        .map_err(|e| format!("JSON serialization failed: {e}"))
}

fn describe_block(block: &Block) -> String {
    let range = format!("{:>4}-{:<4}", block.start_line, block.end_line);
    match &block.kind {
        BlockKind::Heading { level, text } => format!("{range} heading({level}) {text}"),
        BlockKind::Paragraph { text } => {
            format!("{range} paragraph {}", text.lines().next().unwrap_or_default())
        }
        BlockKind::List { items } => {
            let nested: usize = items.iter().map(|item| item.children.len()).sum();
            format!("{range} list items={} nested={nested}", items.len())
        }
        BlockKind::CodeBlock { info, lines } => {
            format!("{range} code info={info:?} lines={}", lines.len())
        }
        BlockKind::Other => format!("{range} other"),
    }
}
