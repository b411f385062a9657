//! Bounding-box area, overlap and containment.

use std::collections::HashMap;

use crate::model::BoundingBox;

/// Default minimum coverage for a box to count as inside an area.
pub const DEFAULT_COVERAGE_THRESHOLD: f64 = 0.20;

/// Area of a box; negative extents count as zero.
pub fn area(b: &BoundingBox) -> f64 {
    f64::from(b.width).max(0.0) * f64::from(b.height).max(0.0)
}

/// Overlap area of two boxes, never negative.
pub fn intersection_area(a: &BoundingBox, b: &BoundingBox) -> f64 {
    let ix = f64::from(a.right().min(b.right())) - f64::from(a.left.max(b.left));
    let iy = f64::from(a.bottom().min(b.bottom())) - f64::from(a.top.max(b.top));
    ix.max(0.0) * iy.max(0.0)
}

/// Fraction of `inner`'s area covered by `outer` (0 for degenerate `inner`).
pub fn coverage(inner: &BoundingBox, outer: &BoundingBox) -> f64 {
    let inner_area = area(inner);
    if inner_area <= 0.0 {
        return 0.0;
    }
    intersection_area(inner, outer) / inner_area
}

/// Candidate areas grouped by page, with a fixed coverage threshold.
#[derive(Debug, Clone)]
pub struct AreaSet {
    by_page: HashMap<u32, Vec<BoundingBox>>,
    threshold: f64,
}

impl AreaSet {
    /// Create an empty set.
    pub fn new(threshold: f64) -> Self {
        Self {
            by_page: HashMap::new(),
            threshold,
        }
    }

    /// Add an area on a page.
    pub fn insert(&mut self, page: u32, area: BoundingBox) {
        self.by_page.entry(page).or_default().push(area);
    }

    /// Total number of areas.
    pub fn len(&self) -> usize {
        self.by_page.values().map(Vec::len).sum()
    }

    /// Check if there are no areas.
    pub fn is_empty(&self) -> bool {
        self.by_page.values().all(Vec::is_empty)
    }

    /// Check if `bbox` on `page` is covered by any area at or above the
    /// threshold. Missing geometry is never inside.
    pub fn contains(&self, bbox: Option<&BoundingBox>, page: u32) -> bool {
        let Some(bbox) = bbox else {
            return false;
        };
        let Some(areas) = self.by_page.get(&page) else {
            return false;
        };
        if area(bbox) <= 0.0 {
            return false;
        }
        areas.iter().any(|a| coverage(bbox, a) >= self.threshold)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bb(left: f32, top: f32, width: f32, height: f32) -> BoundingBox {
        BoundingBox::new(left, top, width, height)
    }

    #[test]
    fn test_area_clamps_negative() {
        assert!((area(&bb(0.0, 0.0, 0.5, 0.2)) - 0.1).abs() < 1e-6);
        assert_eq!(area(&bb(0.0, 0.0, -0.5, 0.2)), 0.0);
    }

    #[test]
    fn test_intersection() {
        let a = bb(0.0, 0.0, 0.5, 0.5);
        let b = bb(0.25, 0.25, 0.5, 0.5);
        assert!((intersection_area(&a, &b) - 0.0625).abs() < 1e-6);

        let far = bb(0.8, 0.8, 0.1, 0.1);
        assert_eq!(intersection_area(&a, &far), 0.0);
    }

    #[test]
    fn test_contains_threshold() {
        let mut areas = AreaSet::new(DEFAULT_COVERAGE_THRESHOLD);
        areas.insert(1, bb(0.0, 0.5, 1.0, 0.5));
        assert_eq!(areas.len(), 1);

        // Half inside
        assert!(areas.contains(Some(&bb(0.1, 0.4, 0.2, 0.2)), 1));
        // 10% inside
        assert!(!areas.contains(Some(&bb(0.1, 0.32, 0.2, 0.2)), 1));
        // Other page
        assert!(!areas.contains(Some(&bb(0.1, 0.6, 0.2, 0.2)), 2));
    }

    #[test]
    fn test_contains_degrades_without_geometry() {
        let mut areas = AreaSet::new(0.2);
        areas.insert(1, bb(0.0, 0.0, 1.0, 1.0));
        assert!(!areas.contains(None, 1));
        assert!(!areas.contains(Some(&bb(0.5, 0.5, 0.0, 0.1)), 1));
        assert!(AreaSet::new(0.2).is_empty());
    }
}
