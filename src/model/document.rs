//! Document-level view over normalized units.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::DocUnit;

/// Document metadata collected during normalization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Metadata {
    /// Source document identifiers, in first-seen order
    pub origins: Vec<String>,

    /// Number of pages normalized
    pub page_count: u32,

    /// Pages processed in layout mode
    pub layout_pages: u32,

    /// Number of text units
    pub text_units: u32,

    /// Number of table units
    pub table_units: u32,

    /// When normalization ran
    pub created: Option<DateTime<Utc>>,
}

/// An ordered sequence of units with metadata.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Document {
    pub metadata: Metadata,
    pub units: Vec<DocUnit>,
}

impl Document {
    /// Create a document from already ordered units.
    pub fn new(units: Vec<DocUnit>) -> Self {
        let mut metadata = Metadata::default();
        for unit in &units {
            if let Some(origin) = &unit.origin {
                if !metadata.origins.contains(origin) {
                    metadata.origins.push(origin.clone());
                }
            }
            if unit.is_text() {
                metadata.text_units += 1;
            } else {
                metadata.table_units += 1;
            }
        }
        Self { metadata, units }
    }

    /// Number of units.
    pub fn unit_count(&self) -> usize {
        self.units.len()
    }

    /// Check if the document has no units.
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Text units in order.
    pub fn text_units(&self) -> impl Iterator<Item = &DocUnit> {
        self.units.iter().filter(|u| u.is_text())
    }

    /// Table units in order.
    pub fn table_units(&self) -> impl Iterator<Item = &DocUnit> {
        self.units.iter().filter(|u| u.is_table())
    }

    /// Plain text of all units, separated by blank lines.
    pub fn plain_text(&self) -> String {
        self.units
            .iter()
            .map(|u| u.plain_text())
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}
