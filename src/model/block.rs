//! OCR block graph types.
//!
//! These mirror the document-analysis service's native response shape
//! (`{"Blocks": [...]}` with PascalCase keys and geometry nested under
//! `Geometry.BoundingBox`), so a response can be deserialized directly.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Kind of an OCR block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BlockType {
    Page,
    Line,
    Word,
    Table,
    TableTitle,
    TableFooter,
    Cell,
    MergedCell,
    SelectionElement,
    KeyValueSet,
    LayoutTitle,
    LayoutHeader,
    LayoutFooter,
    LayoutSectionHeader,
    LayoutPageNumber,
    LayoutList,
    LayoutFigure,
    LayoutTable,
    LayoutKeyValue,
    LayoutText,
    /// Any block kind this crate does not know about
    #[default]
    #[serde(other)]
    Unknown,
}

impl BlockType {
    /// Wire label of the block type (e.g. `LAYOUT_TEXT`).
    pub fn as_str(&self) -> &'static str {
        match self {
            BlockType::Page => "PAGE",
            BlockType::Line => "LINE",
            BlockType::Word => "WORD",
            BlockType::Table => "TABLE",
            BlockType::TableTitle => "TABLE_TITLE",
            BlockType::TableFooter => "TABLE_FOOTER",
            BlockType::Cell => "CELL",
            BlockType::MergedCell => "MERGED_CELL",
            BlockType::SelectionElement => "SELECTION_ELEMENT",
            BlockType::KeyValueSet => "KEY_VALUE_SET",
            BlockType::LayoutTitle => "LAYOUT_TITLE",
            BlockType::LayoutHeader => "LAYOUT_HEADER",
            BlockType::LayoutFooter => "LAYOUT_FOOTER",
            BlockType::LayoutSectionHeader => "LAYOUT_SECTION_HEADER",
            BlockType::LayoutPageNumber => "LAYOUT_PAGE_NUMBER",
            BlockType::LayoutList => "LAYOUT_LIST",
            BlockType::LayoutFigure => "LAYOUT_FIGURE",
            BlockType::LayoutTable => "LAYOUT_TABLE",
            BlockType::LayoutKeyValue => "LAYOUT_KEY_VALUE",
            BlockType::LayoutText => "LAYOUT_TEXT",
            BlockType::Unknown => "UNKNOWN",
        }
    }

    /// Check if this is one of the layout-analysis kinds.
    pub fn is_layout(&self) -> bool {
        match self {
            BlockType::LayoutTitle
            | BlockType::LayoutHeader
            | BlockType::LayoutFooter
            | BlockType::LayoutSectionHeader
            | BlockType::LayoutPageNumber
            | BlockType::LayoutList
            | BlockType::LayoutFigure
            | BlockType::LayoutTable
            | BlockType::LayoutKeyValue
            | BlockType::LayoutText => true,
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
            | BlockType::Unknown => false,
        }
    }
}

impl std::fmt::Display for BlockType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Axis-aligned box in page-relative coordinates (0..1 fractions).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BoundingBox {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl BoundingBox {
    /// Create a bounding box.
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Right edge.
    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    /// Bottom edge.
    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }
}

/// Block geometry. Only the bounding box is used.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Geometry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounding_box: Option<BoundingBox>,
}

/// Relationship kind between blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RelationshipType {
    Child,
    Value,
    ComplexFeatures,
    MergedCell,
    Title,
    Answer,
    Table,
    TableTitle,
    TableFooter,
    #[serde(other)]
    Other,
}

/// An ordered list of referenced block ids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Relationship {
    #[serde(rename = "Type")]
    pub kind: RelationshipType,
    #[serde(default)]
    pub ids: Vec<String>,
}

impl Relationship {
    /// Create a CHILD relationship.
    pub fn child<S: Into<String>>(ids: impl IntoIterator<Item = S>) -> Self {
        Self {
            kind: RelationshipType::Child,
            ids: ids.into_iter().map(Into::into).collect(),
        }
    }
}

/// Selection mark state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SelectionStatus {
    Selected,
    NotSelected,
}

/// One structural unit of an OCR response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Block {
    /// Unique id within a page's response
    pub id: String,

    /// Block kind
    pub block_type: BlockType,

    /// 1-based page number (defaults to the page being processed)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,

    /// Geometry (bounding box)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geometry: Option<Geometry>,

    /// Text on leaf text-bearing blocks
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    /// Recognition confidence (0..100)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f32>,

    /// 1-based row index (cells)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row_index: Option<u32>,

    /// 1-based column index (cells)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column_index: Option<u32>,

    /// Outgoing relationships
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub relationships: Vec<Relationship>,

    /// Selection state (selection elements)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selection_status: Option<SelectionStatus>,
}

impl Block {
    /// Create a block with the given id and type.
    pub fn new(id: impl Into<String>, block_type: BlockType) -> Self {
        Self {
            id: id.into(),
            block_type,
            ..Default::default()
        }
    }

    /// Set text and return self.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Set the bounding box and return self.
    pub fn with_bbox(mut self, left: f32, top: f32, width: f32, height: f32) -> Self {
        self.geometry = Some(Geometry {
            bounding_box: Some(BoundingBox::new(left, top, width, height)),
        });
        self
    }

    /// Set the page and return self.
    pub fn on_page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    /// Set confidence and return self.
    pub fn with_confidence(mut self, confidence: f32) -> Self {
        self.confidence = Some(confidence);
        self
    }

    /// Set row/column indices and return self.
    pub fn at_cell(mut self, row: u32, column: u32) -> Self {
        self.row_index = Some(row);
        self.column_index = Some(column);
        self
    }

    /// Append a CHILD relationship and return self.
    pub fn with_children<S: Into<String>>(mut self, ids: impl IntoIterator<Item = S>) -> Self {
        self.relationships.push(Relationship::child(ids));
        self
    }

    /// Set the selection status and return self.
    pub fn with_selection(mut self, status: SelectionStatus) -> Self {
        self.selection_status = Some(status);
        self
    }

    /// Bounding box, if the block carries geometry.
    pub fn bbox(&self) -> Option<&BoundingBox> {
        self.geometry.as_ref().and_then(|g| g.bounding_box.as_ref())
    }

    /// Page of this block, falling back to `default_page`.
    pub fn page_or(&self, default_page: u32) -> u32 {
        self.page.unwrap_or(default_page)
    }

    /// Ids referenced through CHILD relationships, grouped per relationship.
    pub fn child_id_groups(&self) -> impl Iterator<Item = &[String]> {
        self.relationships
            .iter()
            .filter(|r| r.kind == RelationshipType::Child)
            .map(|r| r.ids.as_slice())
    }

    /// Check if a selection element is selected.
    pub fn is_selected(&self) -> bool {
        self.selection_status == Some(SelectionStatus::Selected)
    }
}

/// A document-analysis response for one page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    #[serde(rename = "Blocks", default)]
    pub blocks: Vec<Block>,
}

impl AnalyzeResponse {
    /// Create a response from blocks.
    pub fn new(blocks: Vec<Block>) -> Self {
        Self { blocks }
    }

    /// Parse one response object, or a JSON array of responses (one per page).
    pub fn parse_many(json: &str) -> Result<Vec<AnalyzeResponse>> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        match value {
            serde_json::Value::Array(items) => items
                .into_iter()
                .map(|item| serde_json::from_value(item).map_err(Error::from))
                .collect(),
            serde_json::Value::Object(ref map) if map.contains_key("Blocks") => {
                Ok(vec![serde_json::from_value(value)?])
            }
            _ => Err(Error::InvalidInput(
                "expected a response object with \"Blocks\" or an array of responses".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_native_shape() {
        let json = r#"{
            "BlockType": "LINE",
            "Id": "l1",
            "Confidence": 99.5,
            "Text": "Totale � 10,00",
            "Geometry": {
                "BoundingBox": {"Left": 0.1, "Top": 0.2, "Width": 0.3, "Height": 0.05},
                "Polygon": [{"X": 0.1, "Y": 0.2}]
            },
            "Relationships": [{"Type": "CHILD", "Ids": ["w1", "w2"]}]
        }"#;
        let block: Block = serde_json::from_str(json).unwrap();
        assert_eq!(block.block_type, BlockType::Line);
        assert_eq!(block.id, "l1");
        assert_eq!(block.bbox().unwrap().top, 0.2);
        assert_eq!(block.child_id_groups().count(), 1);
        assert!(block.page.is_none());
    }

    #[test]
    fn test_unknown_block_type() {
        let block: Block = serde_json::from_str(r#"{"Id": "q", "BlockType": "QUERY"}"#).unwrap();
        assert_eq!(block.block_type, BlockType::Unknown);
        assert!(!block.block_type.is_layout());
    }

    #[test]
    fn test_block_type_labels() {
        assert_eq!(BlockType::LayoutSectionHeader.as_str(), "LAYOUT_SECTION_HEADER");
        assert_eq!(BlockType::MergedCell.to_string(), "MERGED_CELL");
        let json = serde_json::to_string(&BlockType::SelectionElement).unwrap();
        assert_eq!(json, "\"SELECTION_ELEMENT\"");
    }

    #[test]
    fn test_child_groups_skip_other_relationships() {
        let mut block = Block::new("k", BlockType::KeyValueSet).with_children(["a"]);
        block.relationships.push(Relationship {
            kind: RelationshipType::Value,
            ids: vec!["v".to_string()],
        });
        let groups: Vec<_> = block.child_id_groups().collect();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].to_vec(), vec!["a".to_string()]);
    }

    #[test]
    fn test_parse_many() {
        let single = r#"{"Blocks": [{"Id": "a", "BlockType": "WORD", "Text": "x"}]}"#;
        assert_eq!(AnalyzeResponse::parse_many(single).unwrap().len(), 1);

        let many = r#"[{"Blocks": []}, {"Blocks": []}]"#;
        assert_eq!(AnalyzeResponse::parse_many(many).unwrap().len(), 2);

        let bad = r#"{"Pages": 1}"#;
        assert!(matches!(
            AnalyzeResponse::parse_many(bad),
            Err(Error::InvalidInput(_))
        ));
    }
}
