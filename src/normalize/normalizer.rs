//! Page and document normalization.

use chrono::Utc;
use rayon::prelude::*;

use crate::error::{Error, Result};
use crate::model::{AnalyzeResponse, Block, DocUnit, Document};

use super::assembler::{sort_units, LayoutMode, UnitAssembler};
use super::index::BlockIndex;
use super::options::NormalizeOptions;

/// Blocks of one page, with the caller-supplied page number and origin.
#[derive(Debug, Clone)]
pub struct PageInput {
    pub blocks: Vec<Block>,
    /// 1-based page number within the origin document
    pub page: u32,
    /// Source document identifier
    pub origin: String,
}

impl PageInput {
    /// Create a page input. Pages are numbered from 1.
    pub fn new(blocks: Vec<Block>, page: u32, origin: impl Into<String>) -> Result<Self> {
        if page == 0 {
            return Err(Error::PageOutOfRange(page));
        }
        Ok(Self {
            blocks,
            page,
            origin: origin.into(),
        })
    }

    /// One page input per response, numbered from 1.
    pub fn from_responses(
        responses: Vec<AnalyzeResponse>,
        origin: impl Into<String>,
    ) -> Vec<PageInput> {
        let origin = origin.into();
        responses
            .into_iter()
            .zip(1u32..)
            .map(|(response, page)| PageInput {
                blocks: response.blocks,
                page,
                origin: origin.clone(),
            })
            .collect()
    }
}

/// Units of one normalized page.
#[derive(Debug, Clone)]
pub struct PageUnits {
    pub page: u32,
    pub mode: LayoutMode,
    pub units: Vec<DocUnit>,
}

/// Turns OCR block graphs into ordered document units.
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    options: NormalizeOptions,
}

impl Normalizer {
    /// Create a normalizer with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a normalizer with the given options.
    pub fn with_options(options: NormalizeOptions) -> Self {
        Self { options }
    }

    /// Get the options.
    pub fn options(&self) -> &NormalizeOptions {
        &self.options
    }

    /// Normalize one page.
    pub fn process_page(&self, input: &PageInput) -> PageUnits {
        self.run(&input.blocks, input.page, &input.origin)
    }

    /// Normalize one page and return its ordered units.
    pub fn normalize_page(&self, input: &PageInput) -> Vec<DocUnit> {
        self.process_page(input).units
    }

    /// Normalize one OCR response as the given page.
    pub fn normalize_response(
        &self,
        response: &AnalyzeResponse,
        page: u32,
        origin: &str,
    ) -> Result<Vec<DocUnit>> {
        if page == 0 {
            return Err(Error::PageOutOfRange(page));
        }
        Ok(self.run(&response.blocks, page, origin).units)
    }

    /// Normalize many pages and order all units globally.
    pub fn normalize_pages(&self, pages: &[PageInput]) -> Vec<DocUnit> {
        let mut units: Vec<DocUnit> = self
            .process_all(pages)
            .into_iter()
            .flat_map(|p| p.units)
            .collect();
        sort_units(&mut units);
        units
    }

    /// Normalize many pages into a document with metadata.
    pub fn normalize_document(&self, pages: &[PageInput]) -> Document {
        let results = self.process_all(pages);
        let layout_pages = results
            .iter()
            .filter(|p| p.mode == LayoutMode::Layout)
            .count() as u32;

        let mut units: Vec<DocUnit> = results.into_iter().flat_map(|p| p.units).collect();
        sort_units(&mut units);

        let mut doc = Document::new(units);
        doc.metadata.page_count = pages.len() as u32;
        doc.metadata.layout_pages = layout_pages;
        doc.metadata.created = Some(Utc::now());
        doc
    }

    fn process_all(&self, pages: &[PageInput]) -> Vec<PageUnits> {
        // Skip rayon for a single page
        if self.options.parallel && pages.len() > 1 {
            pages.par_iter().map(|p| self.process_page(p)).collect()
        } else {
            pages.iter().map(|p| self.process_page(p)).collect()
        }
    }

    fn run(&self, blocks: &[Block], page: u32, origin: &str) -> PageUnits {
        let index = BlockIndex::new(blocks);
        let assembler = UnitAssembler::new(&index, &self.options);
        let units = assembler.assemble(page, origin);
        PageUnits {
            page,
            mode: assembler.mode(),
            units,
        }
    }
}
