//! Text reconstruction from a block's children.

use std::collections::HashSet;

use crate::model::{Block, BlockType};

use super::index::BlockIndex;

/// Placeholder the OCR engine emits for the Euro sign.
pub const EURO_PLACEHOLDER: char = '\u{FFFD}';

/// Mark for a selected selection element.
pub const SELECTED_MARK: &str = "☒";

/// Mark for an unselected selection element.
pub const UNSELECTED_MARK: &str = "☐";

/// Deepest chain of nested blocks followed below the extracted block.
pub const MAX_NESTING_DEPTH: usize = 64;

/// Replace the OCR engine's Euro placeholder with `€`.
///
/// This is the only text correction performed during normalization.
pub fn fix_symbols(text: &str) -> String {
    text.replace(EURO_PLACEHOLDER, "€")
}

/// Resolves a block's CHILD relationships to plain text.
pub struct TextExtractor<'i, 'a> {
    index: &'i BlockIndex<'a>,
    multiline: bool,
}

impl<'i, 'a> TextExtractor<'i, 'a> {
    /// Create an extractor. `multiline` joins LINE children with newlines.
    pub fn new(index: &'i BlockIndex<'a>, multiline: bool) -> Self {
        Self { index, multiline }
    }

    /// Text of `block`, trimmed. Empty if nothing resolves.
    pub fn extract(&self, block: &'a Block) -> String {
        let mut path = HashSet::new();
        self.extract_on_path(block, &mut path)
    }

    fn extract_on_path(&self, block: &'a Block, path: &mut HashSet<&'a str>) -> String {
        if !path.insert(block.id.as_str()) {
            log::warn!("cycle through block {}, skipping", block.id);
            return String::new();
        }
        if path.len() > MAX_NESTING_DEPTH {
            log::warn!(
                "block {} nested deeper than {} levels, skipping",
                block.id,
                MAX_NESTING_DEPTH
            );
            path.remove(block.id.as_str());
            return String::new();
        }

        let mut lines = Vec::new();
        for group in self.index.child_groups(block) {
            let line_blocks: Vec<&Block> = group
                .iter()
                .copied()
                .filter(|b| b.block_type == BlockType::Line)
                .collect();

            if !line_blocks.is_empty() {
                for line in line_blocks {
                    let text = fix_symbols(line.text.as_deref().unwrap_or(""));
                    if !text.trim().is_empty() {
                        lines.push(text);
                    }
                }
                continue;
            }

            let mut buf = String::new();
            for child in group {
                self.append_child(&mut buf, child, path);
            }
            let text = buf.trim();
            if !text.is_empty() {
                lines.push(text.to_string());
            }
        }

        path.remove(block.id.as_str());

        if lines.is_empty() {
            return fix_symbols(block.text.as_deref().unwrap_or(""))
                .trim()
                .to_string();
        }

        let separator = if self.multiline { "\n" } else { " " };
        lines.join(separator).trim().to_string()
    }

    fn append_child(&self, buf: &mut String, child: &'a Block, path: &mut HashSet<&'a str>) {
        match child.block_type {
            BlockType::Word => {
                if let Some(word) = &child.text {
                    buf.push_str(&fix_symbols(word));
                    buf.push(' ');
                }
            }
            BlockType::SelectionElement => {
                buf.push_str(if child.is_selected() {
                    SELECTED_MARK
                } else {
                    UNSELECTED_MARK
                });
                buf.push(' ');
            }
            BlockType::Page
            | BlockType::Line
            | BlockType::Table
            | BlockType::TableTitle
            | BlockType::TableFooter
            | BlockType::Cell
            | BlockType::MergedCell
            | BlockType::KeyValueSet
            | BlockType::LayoutTitle
            | BlockType::LayoutHeader
            | BlockType::LayoutFooter
            | BlockType::LayoutSectionHeader
            | BlockType::LayoutPageNumber
            | BlockType::LayoutList
            | BlockType::LayoutFigure
            | BlockType::LayoutTable
            | BlockType::LayoutKeyValue
            | BlockType::LayoutText
            | BlockType::Unknown => {
                let nested = self.extract_on_path(child, path);
                if !nested.trim().is_empty() {
                    if !buf.is_empty() {
                        buf.push(' ');
                    }
                    buf.push_str(&nested);
                }
            }
        }
    }
}
