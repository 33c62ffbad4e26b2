//! Block lexer (markdown → blocks)
//!
//! Pipeline: source → front matter split → comrak AST → flat [`Block`] sequence.
//!
//! Comrak is only trusted for block *structure* and line ranges. Every piece of
//! text a block carries is sliced from the raw source lines, because the dialect
//! gives meaning to characters CommonMark would consume (`__id__` is an identifier
//! marker, not strong emphasis).

use super::frontmatter::{parse_config, split_front_matter};
use crate::error::ParseError;
use crate::model::{Config, LineIndex};
use comrak::nodes::{AstNode, NodeValue};
use comrak::{parse_document, Arena, ComrakOptions};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::trace;

static LIST_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:[-*+]|\d+[.)])(?:\s+|$)").expect("valid list marker regex"));

/// A structural unit of the document, with its 1-based source line range.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub kind: BlockKind,
    pub start_line: usize,
    pub end_line: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum BlockKind {
    Heading { level: u8, text: String },
    Paragraph { text: String },
    List { items: Vec<ListItem> },
    CodeBlock { info: String, lines: Vec<(usize, String)> },
    /// Any other markdown construct (quotes, tables, rules, HTML).
    Other,
}

/// A bullet with the raw text after its marker and its nested bullets.
#[derive(Debug, Clone, PartialEq)]
pub struct ListItem {
    pub text: String,
    pub line: usize,
    pub children: Vec<ListItem>,
}

/// Output of the lexer.
#[derive(Debug, Clone, PartialEq)]
pub struct Lexed {
    pub config: Config,
    /// Lines spanned by the front matter, if any.
    pub front_matter: Option<(usize, usize)>,
    pub blocks: Vec<Block>,
}

/// Lex a markdown data model into blocks.
pub fn lex(source: &str) -> Result<Lexed, ParseError> {
    let (front, body, line_offset) = split_front_matter(source)?;
    let config = match &front {
        Some(front) => parse_config(front)?,
        None => Config::default(),
    };
    let front_matter = front.map(|f| (f.start_line, f.end_line));

    let index = LineIndex::new(source);
    let arena = Arena::new();
    let options = default_comrak_options();
    let root = parse_document(&arena, body, &options);

    let mut blocks = Vec::new();
    for node in root.children() {
        blocks.push(node_to_block(node, &index, line_offset));
    }
    trace!(blocks = blocks.len(), "lexed markdown blocks");

    Ok(Lexed {
        config,
        front_matter,
        blocks,
    })
}

fn default_comrak_options() -> ComrakOptions<'static> {
    let mut options = ComrakOptions::default();
    options.extension.table = true;
    options.extension.strikethrough = true;
    options
}

fn node_to_block<'a>(node: &'a AstNode<'a>, index: &LineIndex<'_>, offset: usize) -> Block {
    let data = node.data.borrow();
    let start_line = data.sourcepos.start.line + offset;
    let end_line = data.sourcepos.end.line.max(data.sourcepos.start.line) + offset;

    let kind = match &data.value {
        NodeValue::Heading(heading) => BlockKind::Heading {
            level: heading.level,
            text: heading_text(index.line_text(start_line)),
        },
        NodeValue::Paragraph => BlockKind::Paragraph {
            text: (start_line..=end_line)
                .map(|line| index.line_text(line).trim())
                .collect::<Vec<_>>()
                .join("\n"),
        },
        NodeValue::List(_) => BlockKind::List {
            items: collect_items(node, index, offset),
        },
        NodeValue::CodeBlock(code) => {
            let first_line = if code.fenced { start_line + 1 } else { start_line };
            let lines = code
                .literal
                .lines()
                .enumerate()
                .map(|(idx, text)| (first_line + idx, text.to_string()))
                .collect();
            BlockKind::CodeBlock {
                info: code.info.trim().to_string(),
                lines,
            }
        }
        _ => BlockKind::Other,
    };

    Block {
        kind,
        start_line,
        end_line,
    }
}

fn collect_items<'a>(list: &'a AstNode<'a>, index: &LineIndex<'_>, offset: usize) -> Vec<ListItem> {
    let mut items = Vec::new();
    for item in list.children() {
        let line = item.data.borrow().sourcepos.start.line + offset;
        let mut children = Vec::new();
        for child in item.children() {
            if matches!(child.data.borrow().value, NodeValue::List(_)) {
                children.extend(collect_items(child, index, offset));
            }
        }
        items.push(ListItem {
            text: strip_list_marker(index.line_text(line)),
            line,
            children,
        });
    }
    items
}

/// Text of an ATX heading line without the `#` markers.
fn heading_text(line: &str) -> String {
    let trimmed = line.trim();
    if !trimmed.starts_with('#') {
        return trimmed.to_string();
    }
    let text = trimmed.trim_start_matches('#').trim();
    let without_closing = text.trim_end_matches('#');
    if without_closing.len() != text.len() && without_closing.ends_with(' ') {
        without_closing.trim_end().to_string()
    } else if without_closing.is_empty() {
        String::new()
    } else {
        text.to_string()
    }
}

/// Text of a bullet line after its `-`, `*`, `+` or `1.` marker.
pub(crate) fn strip_list_marker(line: &str) -> String {
    let trimmed = line.trim_start();
    match LIST_MARKER.find(trimmed) {
        Some(marker) => trimmed[marker.end()..].trim().to_string(),
        None => trimmed.trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<BlockKind> {
        lex(source)
            .expect("lexes")
            .blocks
            .into_iter()
            .map(|b| b.kind)
            .collect()
    }

    #[test]
    fn test_heading_text() {
        assert_eq!(heading_text("### Name"), "Name");
        assert_eq!(heading_text("###   Name  "), "Name");
        assert_eq!(heading_text("## Closed ##"), "Closed");
        assert_eq!(heading_text("# C#"), "C#");
        assert_eq!(heading_text("Setext"), "Setext");
    }

    #[test]
    fn test_strip_list_marker() {
        assert_eq!(strip_list_marker("- name"), "name");
        assert_eq!(strip_list_marker("  - Type: string"), "Type: string");
        assert_eq!(strip_list_marker("* __id__"), "__id__");
        assert_eq!(strip_list_marker("1. first"), "first");
        assert_eq!(strip_list_marker("-"), "");
    }

    #[test]
    fn test_lex_object_with_nested_bullets() {
        let blocks = kinds("### A\n\nSome docs.\n\n- __id__\n  - Type: string\n");
        assert_eq!(
            blocks,
            vec![
                BlockKind::Heading {
                    level: 3,
                    text: "A".to_string()
                },
                BlockKind::Paragraph {
                    text: "Some docs.".to_string()
                },
                BlockKind::List {
                    items: vec![ListItem {
                        text: "__id__".to_string(),
                        line: 5,
                        children: vec![ListItem {
                            text: "Type: string".to_string(),
                            line: 6,
                            children: vec![],
                        }],
                    }]
                },
            ]
        );
    }

    #[test]
    fn test_lines_are_shifted_past_front_matter() {
        let lexed = lex("---\nrepo: x\n---\n### A\n- x\n").expect("lexes");
        assert_eq!(lexed.front_matter, Some((1, 3)));
        assert_eq!(lexed.config.repo.as_deref(), Some("x"));
        assert_eq!(lexed.blocks[0].start_line, 4);
        match &lexed.blocks[1].kind {
            BlockKind::List { items } => assert_eq!(items[0].line, 5),
            other => panic!("expected list, got {other:?}"),
        }
    }

    #[test]
    fn test_code_block_lines() {
        let blocks = kinds("### Color\n\n```python\nRED = \"r\"\nBLUE = \"b\"\n```\n");
        match &blocks[1] {
            BlockKind::CodeBlock { info, lines } => {
                assert_eq!(info, "python");
                assert_eq!(
                    lines,
                    &vec![(4, "RED = \"r\"".to_string()), (5, "BLUE = \"b\"".to_string())]
                );
            }
            other => panic!("expected code block, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_source() {
        let lexed = lex("").expect("lexes");
        assert!(lexed.blocks.is_empty());
        assert_eq!(lexed.config, Config::default());
    }
}
