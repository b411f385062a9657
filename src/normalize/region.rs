//! Header/body/footer classification.

use crate::model::{BBox, Region};

/// Units whose top is above this line are headers.
pub const HEADER_LIMIT: f32 = 0.15;

/// Units whose top is below this line are footers.
pub const FOOTER_LIMIT: f32 = 0.85;

/// Classify a top coordinate. Unknown tops are BODY.
pub fn classify_top(top: Option<f32>) -> Region {
    match top {
        Some(t) if t < HEADER_LIMIT => Region::Header,
        Some(t) if t > FOOTER_LIMIT => Region::Footer,
        _ => Region::Body,
    }
}

/// Classify a unit bounding box.
pub fn classify_region(bbox: Option<&BBox>) -> Region {
    classify_top(bbox.and_then(|b| b.top))
}
