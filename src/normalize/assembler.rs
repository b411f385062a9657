//! Unit assembly and reading-order sort.

use std::cmp::Ordering;

use crate::model::{BBox, Block, BlockType, DocUnit};

use super::geometry::AreaSet;
use super::index::BlockIndex;
use super::options::NormalizeOptions;
use super::region::classify_region;
use super::table::TableReconstructor;
use super::text::TextExtractor;

/// Subtype of TEXT units built from LINE blocks.
pub const LINE_SUBTYPE: &str = "LINE";

/// Normalization strategy for a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutMode {
    /// The response carries LAYOUT_* blocks
    Layout,
    /// Fallback on LINE blocks
    Line,
}

impl LayoutMode {
    /// Layout mode if any block is a layout block.
    pub fn detect(index: &BlockIndex<'_>) -> Self {
        if index.has_layout() {
            LayoutMode::Layout
        } else {
            LayoutMode::Line
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LayoutMode::Layout => "layout",
            LayoutMode::Line => "line",
        }
    }
}

/// Check if a block type is a free-text source in layout mode.
pub fn is_free_text_layout(block_type: BlockType) -> bool {
    match block_type {
        BlockType::LayoutTitle
        | BlockType::LayoutSectionHeader
        | BlockType::LayoutText
        | BlockType::LayoutList
        | BlockType::LayoutHeader
        | BlockType::LayoutFooter => true,
        BlockType::Page
        | BlockType::Line
        | BlockType::Word
        | BlockType::Table
        | BlockType::TableTitle
        | BlockType::TableFooter
        | BlockType::Cell
        | BlockType::MergedCell
        | BlockType::SelectionElement
        | BlockType::KeyValueSet
        | BlockType::LayoutPageNumber
        | BlockType::LayoutFigure
        | BlockType::LayoutTable
        | BlockType::LayoutKeyValue
        | BlockType::Unknown => false,
    }
}

/// Builds the TEXT and TABLE units of one page.
pub struct UnitAssembler<'i, 'a> {
    index: &'i BlockIndex<'a>,
    options: &'i NormalizeOptions,
    mode: LayoutMode,
}

impl<'i, 'a> UnitAssembler<'i, 'a> {
    /// Create an assembler; the layout mode is detected from the index.
    pub fn new(index: &'i BlockIndex<'a>, options: &'i NormalizeOptions) -> Self {
        Self {
            index,
            options,
            mode: LayoutMode::detect(index),
        }
    }

    /// Detected layout mode.
    pub fn mode(&self) -> LayoutMode {
        self.mode
    }

    /// Units of the page, in reading order.
    ///
    /// `page` is used for blocks that carry no page number of their own.
    pub fn assemble(&self, page: u32, origin: &str) -> Vec<DocUnit> {
        let tables = TableReconstructor::new(self.index, self.options.multiline);
        let extractor = TextExtractor::new(self.index, self.options.multiline);

        let (candidates, areas): (Vec<&'a Block>, AreaSet) = match self.mode {
            LayoutMode::Layout => (
                self.index
                    .blocks()
                    .iter()
                    .filter(|b| is_free_text_layout(b.block_type))
                    .collect(),
                self.layout_table_areas(page),
            ),
            LayoutMode::Line => (
                self.index.of_type(BlockType::Line).collect(),
                tables.cell_areas(page, self.options.coverage_threshold),
            ),
        };

        let mut units = Vec::new();
        let mut dropped = 0usize;
        for block in candidates {
            let block_page = block.page_or(page);
            if areas.contains(block.bbox(), block_page) {
                dropped += 1;
                continue;
            }
            let text = extractor.extract(block);
            if text.trim().is_empty() {
                continue;
            }
            let subtype = match self.mode {
                LayoutMode::Layout => block.block_type.as_str(),
                LayoutMode::Line => LINE_SUBTYPE,
            };
            units.push(self.describe(DocUnit::text(subtype, text), block, block_page, origin));
        }

        for table in self.index.of_type(BlockType::Table) {
            let rows = tables.rows(table);
            let table_page = table.page_or(page);
            units.push(self.describe(DocUnit::table(rows), table, table_page, origin));
        }

        log::debug!(
            "page {} ({} mode): {} units, {} candidates inside tables",
            page,
            self.mode.as_str(),
            units.len(),
            dropped
        );

        sort_units(&mut units);
        units
    }

    fn describe(&self, unit: DocUnit, block: &Block, page: u32, origin: &str) -> DocUnit {
        let bbox = block.bbox().map(BBox::from);
        let unit = unit
            .on_page(page)
            .with_bbox(bbox)
            .with_region(classify_region(bbox.as_ref()))
            .from_block(block.id.clone(), block.confidence);
        if origin.is_empty() {
            unit
        } else {
            unit.with_origin(origin)
        }
    }

    fn layout_table_areas(&self, page: u32) -> AreaSet {
        let mut areas = AreaSet::new(self.options.coverage_threshold);
        for block in self.index.of_type(BlockType::LayoutTable) {
            if let Some(bbox) = block.bbox() {
                areas.insert(block.page_or(page), *bbox);
            }
        }
        areas
    }
}

fn compare_units(a: &DocUnit, b: &DocUnit) -> Ordering {
    let page = |u: &DocUnit| (u.page.is_none(), u.page);
    let top = |u: &DocUnit| u.top().unwrap_or(1.0);
    page(a)
        .cmp(&page(b))
        .then_with(|| top(a).total_cmp(&top(b)))
        .then_with(|| a.unit_type.as_str().cmp(b.unit_type.as_str()))
}

/// Stable sort by page (unknown last), top (unknown as 1.0), type name.
pub fn sort_units(units: &mut [DocUnit]) {
    units.sort_by(compare_units);
}

/// Check if units are in reading order.
pub fn is_sorted(units: &[DocUnit]) -> bool {
    units
        .windows(2)
        .all(|w| compare_units(&w[0], &w[1]) != Ordering::Greater)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Region;

    fn opts() -> NormalizeOptions {
        NormalizeOptions::default()
    }

    fn word(id: &str, text: &str) -> Block {
        Block::new(id, BlockType::Word).with_text(text)
    }

    #[test]
    fn test_mode_detection() {
        let layout = vec![Block::new("a", BlockType::LayoutFigure)];
        let line = vec![Block::new("a", BlockType::Line)];
        assert_eq!(LayoutMode::detect(&BlockIndex::new(&layout)), LayoutMode::Layout);
        assert_eq!(LayoutMode::detect(&BlockIndex::new(&line)), LayoutMode::Line);
    }

    #[test]
    fn test_layout_text_inside_table_excluded() {
        let blocks = vec![
            Block::new("lt", BlockType::LayoutTable).with_bbox(0.1, 0.3, 0.8, 0.4),
            Block::new("inside", BlockType::LayoutText)
                .with_bbox(0.1, 0.35, 0.5, 0.1)
                .with_children(["w1"]),
            Block::new("outside", BlockType::LayoutText)
                .with_bbox(0.1, 0.8, 0.5, 0.05)
                .with_children(["w2"]),
            word("w1", "hidden"),
            word("w2", "visible"),
        ];
        let index = BlockIndex::new(&blocks);
        let options = opts();
        let units = UnitAssembler::new(&index, &options).assemble(1, "doc.pdf");

        assert_eq!(units.len(), 1);
        assert_eq!(units[0].text.as_deref(), Some("visible"));
        assert_eq!(units[0].subtype.as_deref(), Some("LAYOUT_TEXT"));
        assert_eq!(units[0].block_id.as_deref(), Some("outside"));
        assert_eq!(units[0].origin.as_deref(), Some("doc.pdf"));
        assert_eq!(units[0].page, Some(1));
    }

    #[test]
    fn test_line_mode_filters_cells_and_keeps_table() {
        let blocks = vec![
            Block::new("t", BlockType::Table)
                .with_bbox(0.0, 0.4, 1.0, 0.2)
                .with_children(["c"]),
            Block::new("c", BlockType::Cell)
                .at_cell(1, 1)
                .with_bbox(0.0, 0.4, 0.5, 0.2)
                .with_children(["w"]),
            word("w", "cell"),
            Block::new("l1", BlockType::Line)
                .with_text("cell")
                .with_bbox(0.05, 0.45, 0.2, 0.05),
            Block::new("l2", BlockType::Line)
                .with_text("Intestazione")
                .with_bbox(0.05, 0.05, 0.3, 0.05)
                .with_confidence(99.1),
            Block::new("l3", BlockType::Line).with_text("  "),
        ];
        let index = BlockIndex::new(&blocks);
        let options = opts();
        let assembler = UnitAssembler::new(&index, &options);
        assert_eq!(assembler.mode(), LayoutMode::Line);

        let units = assembler.assemble(2, "scan");
        assert_eq!(units.len(), 2);

        assert!(units[0].is_text());
        assert_eq!(units[0].subtype.as_deref(), Some(LINE_SUBTYPE));
        assert_eq!(units[0].region, Some(Region::Header));
        assert_eq!(units[0].confidence, Some(99.1));

        assert!(units[1].is_table());
        assert_eq!(units[1].rows, Some(vec![vec![Some("cell".to_string())]]));
        assert_eq!(units[1].region, Some(Region::Body));
        assert_eq!(units[1].page, Some(2));
        assert!(units[1].text.is_none());
    }

    #[test]
    fn test_missing_geometry_is_kept_as_body() {
        let blocks = vec![
            Block::new("lt", BlockType::LayoutTable).with_bbox(0.0, 0.0, 1.0, 1.0),
            Block::new("t", BlockType::LayoutTitle).with_text("Fattura"),
        ];
        let index = BlockIndex::new(&blocks);
        let options = opts();
        let units = UnitAssembler::new(&index, &options).assemble(1, "x");
        assert_eq!(units.len(), 1);
        assert_eq!(units[0].region, Some(Region::Body));
        assert!(units[0].bbox.is_none());
    }

    #[test]
    fn test_sort_units() {
        let mut units = vec![
            DocUnit::text("LINE", "no page"),
            DocUnit::text("LINE", "p2").on_page(2),
            DocUnit::table(vec![]).on_page(1),
            DocUnit::text("LINE", "p1 low")
                .on_page(1)
                .with_bbox(Some(BBox {
                    top: Some(0.9),
                    ..BBox::default()
                })),
            DocUnit::text("LINE", "p1 unknown top").on_page(1),
            DocUnit::text("LINE", "p1 high")
                .on_page(1)
                .with_bbox(Some(BBox {
                    top: Some(0.1),
                    ..BBox::default()
                })),
        ];
        sort_units(&mut units);
        assert!(is_sorted(&units));

        let labels: Vec<String> = units.iter().map(|u| u.plain_text()).collect();
        assert_eq!(
            labels,
            vec!["p1 high", "p1 low", "", "p1 unknown top", "p2", "no page"]
        );
    }

    #[test]
    fn test_free_text_layout_types() {
        assert!(is_free_text_layout(BlockType::LayoutHeader));
        assert!(is_free_text_layout(BlockType::LayoutFooter));
        assert!(!is_free_text_layout(BlockType::LayoutTable));
        assert!(!is_free_text_layout(BlockType::LayoutFigure));
        assert!(!is_free_text_layout(BlockType::Line));
    }
}
