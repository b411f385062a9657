//! Data model for OCR input, normalized units and extraction results.
//!
//! `block` holds the OCR collaborator's block graph as received; `unit` and
//! `document` hold the normalized output; `extraction` and `token` hold the
//! extraction step's answer and the completion's log-probabilities.

mod block;
mod document;
mod extraction;
mod token;
mod unit;

pub use block::{
    AnalyzeResponse, Block, BlockType, BoundingBox, Geometry, Relationship, RelationshipType,
    SelectionStatus,
};
pub use document::{Document, Metadata};
pub use extraction::{
    DocUnitRequest, DocUnitTextRequest, Evidence, ExtractionItem, ExtractionResult,
    ExtractionStatus,
};
pub use token::{Alternative, LogProbs, Token};
pub use unit::{BBox, DocUnit, DocUnitType, Region, TableRows};
