//! # docunit
//!
//! Normalization of OCR block graphs into LLM-ready document units, and
//! confidence scoring of extracted values from completion log-probabilities.
//!
//! ## Quick Start
//!
//! ```no_run
//! use docunit::{normalize_file, render};
//!
//! fn main() -> docunit::Result<()> {
//!     // One OCR response per page, or an array of them
//!     let doc = normalize_file("invoice.json")?;
//!
//!     // One unit per line, ready for the extraction step
//!     print!("{}", render::to_jsonl(&doc.units));
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Layout and line modes**: layout regions when available, LINE blocks otherwise
//! - **Table reconstruction**: rectangular grids, merged cells resolved
//! - **Reading order**: deterministic sort by page, top and unit type
//! - **Regions**: header/body/footer from vertical position
//! - **Confidence scoring**: token margins against runner-up alternatives
//! - **Parallel processing**: Uses Rayon for multi-page documents

pub mod error;
pub mod model;
pub mod normalize;
pub mod render;
pub mod score;

// Re-export commonly used types
pub use error::{Error, Result};
pub use model::{
    AnalyzeResponse, Block, BlockType, DocUnit, DocUnitRequest, DocUnitTextRequest, DocUnitType,
    Document, ExtractionItem, ExtractionResult, ExtractionStatus, LogProbs, Metadata, Region,
    Token,
};
pub use normalize::{NormalizeOptions, Normalizer, PageInput};
pub use render::JsonFormat;
pub use score::{score_extractions, score_with_logprobs, ScoreOptions, ScoreSummary};

use std::path::Path;

/// Source name used as the origin of units read from `path`.
pub fn origin_of<P: AsRef<Path>>(path: P) -> String {
    let path = path.as_ref();
    path.file_name()
        .unwrap_or(path.as_os_str())
        .to_string_lossy()
        .into_owned()
}

/// Parse OCR response JSON into numbered pages.
///
/// The JSON is a single response object (page 1) or an array of responses,
/// one per page.
pub fn read_pages_str(json: &str, origin: &str) -> Result<Vec<PageInput>> {
    let responses = AnalyzeResponse::parse_many(json)?;
    Ok(PageInput::from_responses(responses, origin))
}

/// Read an OCR response file into numbered pages.
pub fn read_pages<P: AsRef<Path>>(path: P) -> Result<Vec<PageInput>> {
    let json = std::fs::read_to_string(path.as_ref())?;
    read_pages_str(&json, &origin_of(&path))
}

/// Normalize an OCR response file into a document.
///
/// # Example
///
/// ```no_run
/// use docunit::normalize_file;
///
/// let doc = normalize_file("invoice.json").unwrap();
/// println!("Units: {}", doc.unit_count());
/// ```
pub fn normalize_file<P: AsRef<Path>>(path: P) -> Result<Document> {
    normalize_file_with_options(path, NormalizeOptions::default())
}

/// Normalize an OCR response file with custom options.
///
/// # Example
///
/// ```no_run
/// use docunit::{normalize_file_with_options, NormalizeOptions};
///
/// let options = NormalizeOptions::new().single_line().sequential();
/// let doc = normalize_file_with_options("invoice.json", options).unwrap();
/// ```
pub fn normalize_file_with_options<P: AsRef<Path>>(
    path: P,
    options: NormalizeOptions,
) -> Result<Document> {
    let pages = read_pages(path)?;
    Ok(Normalizer::with_options(options).normalize_document(&pages))
}

/// Normalize OCR response JSON and return the ordered units.
pub fn normalize_str(json: &str, origin: &str) -> Result<Vec<DocUnit>> {
    let pages = read_pages_str(json, origin)?;
    Ok(Normalizer::new().normalize_pages(&pages))
}

/// Normalize an OCR response file, reading it asynchronously.
#[cfg(feature = "async")]
pub async fn normalize_file_async<P: AsRef<Path>>(
    path: P,
    options: NormalizeOptions,
) -> Result<Document> {
    let json = tokio::fs::read_to_string(path.as_ref()).await?;
    let pages = read_pages_str(&json, &origin_of(&path))?;
    Ok(Normalizer::with_options(options).normalize_document(&pages))
}

/// Builder for normalizing OCR responses and rendering the result.
///
/// # Example
///
/// ```no_run
/// use docunit::Docunit;
///
/// let jsonl = Docunit::new()
///     .single_line()
///     .with_origin("fattura-2024-17.pdf")
///     .normalize("invoice.json")?
///     .to_jsonl();
/// # Ok::<(), docunit::Error>(())
/// ```
pub struct Docunit {
    options: NormalizeOptions,
    origin: Option<String>,
}

impl Docunit {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            options: NormalizeOptions::default(),
            origin: None,
        }
    }

    /// Disable parallel processing.
    pub fn sequential(mut self) -> Self {
        self.options = self.options.sequential();
        self
    }

    /// Join LINE children with single spaces.
    pub fn single_line(mut self) -> Self {
        self.options = self.options.single_line();
        self
    }

    /// Set the table coverage threshold.
    pub fn with_coverage_threshold(mut self, threshold: f64) -> Self {
        self.options = self.options.with_coverage_threshold(threshold);
        self
    }

    /// Override the origin recorded on every unit.
    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = Some(origin.into());
        self
    }

    /// Normalize one OCR response file.
    pub fn normalize<P: AsRef<Path>>(self, path: P) -> Result<DocunitResult> {
        self.normalize_files(&[path])
    }

    /// Normalize several OCR response files as one document.
    ///
    /// Pages are numbered per file; units are ordered across all files.
    pub fn normalize_files<P: AsRef<Path>>(self, paths: &[P]) -> Result<DocunitResult> {
        let mut pages = Vec::new();
        for path in paths {
            let json = std::fs::read_to_string(path.as_ref())?;
            let origin = self.origin.clone().unwrap_or_else(|| origin_of(path));
            pages.extend(read_pages_str(&json, &origin)?);
        }
        Ok(self.normalize_pages(&pages))
    }

    /// Normalize OCR response JSON.
    pub fn normalize_str(self, json: &str) -> Result<DocunitResult> {
        let origin = self.origin.clone().unwrap_or_default();
        let pages = read_pages_str(json, &origin)?;
        Ok(self.normalize_pages(&pages))
    }

    /// Normalize already parsed pages.
    pub fn normalize_pages(self, pages: &[PageInput]) -> DocunitResult {
        let document = Normalizer::with_options(self.options).normalize_document(pages);
        DocunitResult { document }
    }
}

impl Default for Docunit {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of normalizing OCR responses.
pub struct DocunitResult {
    /// The normalized document
    pub document: Document,
}

impl DocunitResult {
    /// Convert to JSON Lines, one unit per line.
    pub fn to_jsonl(&self) -> String {
        render::to_jsonl(&self.document.units)
    }

    /// Write JSON Lines to a writer.
    pub fn write_jsonl<W: std::io::Write>(&self, writer: W) -> Result<()> {
        render::write_jsonl(&self.document.units, writer)
    }

    /// Convert the whole document to JSON.
    pub fn to_json(&self, format: JsonFormat) -> Result<String> {
        render::to_json(&self.document, format)
    }

    /// Build an extraction request with structured records.
    pub fn request<S: AsRef<str>>(&self, fields: &[S], notes: Option<&str>) -> DocUnitRequest {
        render::build_request(&self.document.units, fields, notes)
    }

    /// Build an extraction request with JSON Lines records.
    pub fn text_request<S: AsRef<str>>(
        &self,
        fields: &[S],
        notes: Option<&str>,
    ) -> DocUnitTextRequest {
        render::build_text_request(&self.document.units, fields, notes)
    }

    /// Get plain text of all units.
    pub fn plain_text(&self) -> String {
        self.document.plain_text()
    }

    /// Get the document.
    pub fn document(&self) -> &Document {
        &self.document
    }
}
