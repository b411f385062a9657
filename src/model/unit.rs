//! Normalized document units.

use serde::{Deserialize, Serialize};

use super::BoundingBox;

/// Kind of a document unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocUnitType {
    /// Free text (a line or a layout region)
    Text,
    /// A reconstructed table grid
    Table,
}

impl DocUnitType {
    /// Type name used on the wire and as the final sort tie-break.
    pub fn as_str(&self) -> &'static str {
        match self {
            DocUnitType::Text => "TEXT",
            DocUnitType::Table => "TABLE",
        }
    }
}

impl std::fmt::Display for DocUnitType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Vertical page region.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Region {
    Header,
    #[default]
    Body,
    Footer,
}

/// Bounding box of a unit. Every coordinate is optional on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BBox {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f32>,
}

impl From<&BoundingBox> for BBox {
    fn from(bb: &BoundingBox) -> Self {
        Self {
            left: Some(bb.left),
            top: Some(bb.top),
            width: Some(bb.width),
            height: Some(bb.height),
        }
    }
}

/// Grid of a table unit; `None` marks an empty cell.
pub type TableRows = Vec<Vec<Option<String>>>;

/// A normalized, self-contained document record.
///
/// Exactly one of `text` / `rows` is populated, matching `unit_type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocUnit {
    /// TEXT or TABLE
    #[serde(rename = "type")]
    pub unit_type: DocUnitType,

    /// Source block type label (TEXT units only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtype: Option<String>,

    /// 1-based page number
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bbox: Option<BBox>,

    /// Id of the source block
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rows: Option<TableRows>,

    /// OCR confidence of the source block (0..100)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<Region>,

    /// Source document identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
}

impl DocUnit {
    fn empty(unit_type: DocUnitType) -> Self {
        Self {
            unit_type,
            subtype: None,
            page: None,
            bbox: None,
            block_id: None,
            text: None,
            rows: None,
            confidence: None,
            region: None,
            origin: None,
        }
    }

    /// Create a text unit.
    pub fn text(subtype: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            subtype: Some(subtype.into()),
            text: Some(text.into()),
            ..Self::empty(DocUnitType::Text)
        }
    }

    /// Create a table unit.
    pub fn table(rows: TableRows) -> Self {
        Self {
            rows: Some(rows),
            ..Self::empty(DocUnitType::Table)
        }
    }

    /// Set the page and return self.
    pub fn on_page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    /// Set the bounding box and return self.
    pub fn with_bbox(mut self, bbox: Option<BBox>) -> Self {
        self.bbox = bbox;
        self
    }

    /// Set the region and return self.
    pub fn with_region(mut self, region: Region) -> Self {
        self.region = Some(region);
        self
    }

    /// Record the source block id and confidence and return self.
    pub fn from_block(mut self, block_id: impl Into<String>, confidence: Option<f32>) -> Self {
        self.block_id = Some(block_id.into());
        self.confidence = confidence;
        self
    }

    /// Set the origin and return self.
    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = Some(origin.into());
        self
    }

    /// Check if this is a text unit.
    pub fn is_text(&self) -> bool {
        self.unit_type == DocUnitType::Text
    }

    /// Check if this is a table unit.
    pub fn is_table(&self) -> bool {
        self.unit_type == DocUnitType::Table
    }

    /// Top coordinate, if known.
    pub fn top(&self) -> Option<f32> {
        self.bbox.and_then(|b| b.top)
    }

    /// Plain text representation (table cells tab-separated, rows by newline).
    pub fn plain_text(&self) -> String {
        match (&self.text, &self.rows) {
            (Some(text), _) => text.clone(),
            (None, Some(rows)) => rows
                .iter()
                .map(|row| {
                    row.iter()
                        .map(|cell| cell.as_deref().unwrap_or(""))
                        .collect::<Vec<_>>()
                        .join("\t")
                })
                .collect::<Vec<_>>()
                .join("\n"),
            (None, None) => String::new(),
        }
    }
}
