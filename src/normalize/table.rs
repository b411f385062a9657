//! Table grid reconstruction from CELL / MERGED_CELL children.

use std::collections::BTreeMap;

use crate::model::{Block, BlockType, TableRows};

use super::geometry::AreaSet;
use super::index::BlockIndex;
use super::text::TextExtractor;

/// CELL blocks of a table, with MERGED_CELL children flattened one level.
///
/// A MERGED_CELL contributes its CELL children; deeper merge chains are not
/// followed. Dangling ids and other child kinds are dropped.
pub fn resolve_cells<'a>(index: &BlockIndex<'a>, table: &Block) -> Vec<&'a Block> {
    let mut cells = Vec::new();
    for child in index.children(table) {
        match child.block_type {
            BlockType::Cell => cells.push(child),
            BlockType::MergedCell => cells.extend(
                index
                    .children(child)
                    .into_iter()
                    .filter(|b| b.block_type == BlockType::Cell),
            ),
            _ => log::debug!(
                "table {} has non-cell child {} ({})",
                table.id,
                child.id,
                child.block_type
            ),
        }
    }
    cells
}

/// Widest grid a table may produce; cells beyond it are dropped.
pub const MAX_COLUMNS: u32 = 1024;

fn row_of(cell: &Block) -> u32 {
    cell.row_index.unwrap_or(1)
}

fn column_of(cell: &Block) -> u32 {
    cell.column_index.unwrap_or(1).max(1)
}

/// Builds row-major grids for TABLE blocks.
pub struct TableReconstructor<'i, 'a> {
    index: &'i BlockIndex<'a>,
    extractor: TextExtractor<'i, 'a>,
}

impl<'i, 'a> TableReconstructor<'i, 'a> {
    /// Create a reconstructor over a page index.
    pub fn new(index: &'i BlockIndex<'a>, multiline: bool) -> Self {
        Self {
            index,
            extractor: TextExtractor::new(index, multiline),
        }
    }

    /// Rectangular grid of the table; `None` marks an empty cell.
    ///
    /// Every row is as wide as the largest column index in the table. Cells
    /// with a column index above [`MAX_COLUMNS`] are dropped.
    pub fn rows(&self, table: &Block) -> TableRows {
        let mut cells = resolve_cells(self.index, table);
        cells.retain(|c| {
            let keep = column_of(c) <= MAX_COLUMNS;
            if !keep {
                log::warn!(
                    "table {}: cell {} has column {} beyond {}, dropped",
                    table.id,
                    c.id,
                    column_of(c),
                    MAX_COLUMNS
                );
            }
            keep
        });

        let mut by_row: BTreeMap<u32, Vec<&'a Block>> = BTreeMap::new();
        for &cell in &cells {
            by_row.entry(row_of(cell)).or_default().push(cell);
        }
        for row in by_row.values_mut() {
            row.sort_by_key(|c| column_of(c));
        }

        let width = cells.iter().map(|c| column_of(c)).max().unwrap_or(0) as usize;
        log::debug!(
            "table {}: {} cells, {} rows, {} columns",
            table.id,
            cells.len(),
            by_row.len(),
            width
        );

        by_row
            .values()
            .map(|row| {
                let mut cols: Vec<Option<String>> = vec![None; width];
                for &cell in row {
                    let text = self.extractor.extract(cell);
                    let idx = column_of(cell) as usize - 1;
                    cols[idx] = if text.is_empty() { None } else { Some(text) };
                }
                cols
            })
            .collect()
    }

    /// Bounding boxes of every resolved cell of every table, by page.
    pub fn cell_areas(&self, default_page: u32, threshold: f64) -> AreaSet {
        let mut areas = AreaSet::new(threshold);
        for table in self.index.of_type(BlockType::Table) {
            let table_page = table.page_or(default_page);
            for cell in resolve_cells(self.index, table) {
                if let Some(bbox) = cell.bbox() {
                    areas.insert(cell.page_or(table_page), *bbox);
                }
            }
        }
        areas
    }
}
