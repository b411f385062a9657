//! Normalization options and configuration.

use super::geometry::DEFAULT_COVERAGE_THRESHOLD;

/// Options for normalizing OCR block graphs.
#[derive(Debug, Clone)]
pub struct NormalizeOptions {
    /// Minimum fraction of a candidate's area that must overlap a table
    /// area for the candidate to be dropped
    pub coverage_threshold: f64,

    /// Join LINE children with newlines instead of spaces
    pub multiline: bool,

    /// Normalize pages in parallel
    pub parallel: bool,
}

impl NormalizeOptions {
    /// Create new normalize options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the table coverage threshold.
    pub fn with_coverage_threshold(mut self, threshold: f64) -> Self {
        self.coverage_threshold = threshold;
        self
    }

    /// Enable or disable multi-line text joining.
    pub fn with_multiline(mut self, multiline: bool) -> Self {
        self.multiline = multiline;
        self
    }

    /// Join LINE children with single spaces.
    pub fn single_line(mut self) -> Self {
        self.multiline = false;
        self
    }

    /// Enable or disable parallel processing.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Disable parallel processing.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            coverage_threshold: DEFAULT_COVERAGE_THRESHOLD,
            multiline: true,
            parallel: true,
        }
    }
}
