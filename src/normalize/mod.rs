//! Block-graph normalization.
//!
//! Turns one page's OCR blocks into a flat sequence of TEXT and TABLE units:
//! the blocks are indexed by id, the layout mode is detected, free-text
//! candidates overlapping a table are dropped, tables are rebuilt as grids,
//! and the units are sorted into reading order.

mod assembler;
mod geometry;
mod index;
mod normalizer;
mod options;
mod region;
mod table;
mod text;

pub use assembler::{is_free_text_layout, is_sorted, sort_units, LayoutMode, UnitAssembler, LINE_SUBTYPE};
pub use geometry::{area, coverage, intersection_area, AreaSet, DEFAULT_COVERAGE_THRESHOLD};
pub use index::BlockIndex;
pub use normalizer::{Normalizer, PageInput, PageUnits};
pub use options::NormalizeOptions;
pub use region::{classify_region, classify_top, FOOTER_LIMIT, HEADER_LIMIT};
pub use table::{resolve_cells, TableReconstructor, MAX_COLUMNS};
pub use text::{
    fix_symbols, TextExtractor, EURO_PLACEHOLDER, MAX_NESTING_DEPTH, SELECTED_MARK, UNSELECTED_MARK,
};
