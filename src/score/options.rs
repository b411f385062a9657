//! Scoring constants.

/// Marker the extraction step reports for a field it could not find.
pub const NOT_FOUND_MARKER: &str = "NOT_FOUND";

/// JSON key under which the completion reports each field's value.
pub const VALUE_KEY: &str = "value";

/// Calibration of the confidence score.
///
/// The defaults are the calibrated values; overriding them is for
/// experimentation.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreOptions {
    /// Sharpening exponent (values below 1 act as 1)
    pub gamma: f64,

    /// Length penalty constant `k` in `L / (L + k)` (values below 1 act as 1)
    pub runner_up_k: u32,

    /// Windows with fewer content tokens take the flat discount
    pub min_content_tokens: usize,

    /// Floor as a fraction of the margin geometric mean, clamped to [0, 1]
    pub floor_factor: f64,

    /// Flat discount for short windows
    pub short_window_factor: f64,

    /// Value meaning "not found"; such fields score exactly 0.0
    pub not_found_marker: String,

    /// JSON key of the field value in the completion text
    pub value_key: String,
}

impl ScoreOptions {
    /// Create new score options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the sharpening exponent.
    pub fn with_gamma(mut self, gamma: f64) -> Self {
        self.gamma = gamma;
        self
    }

    /// Set the length penalty constant.
    pub fn with_runner_up_k(mut self, k: u32) -> Self {
        self.runner_up_k = k;
        self
    }

    /// Set the minimum number of content tokens for the full formula.
    pub fn with_min_content_tokens(mut self, min: usize) -> Self {
        self.min_content_tokens = min;
        self
    }

    /// Set the floor factor.
    pub fn with_floor_factor(mut self, factor: f64) -> Self {
        self.floor_factor = factor;
        self
    }

    /// Set the not-found marker.
    pub fn with_not_found_marker(mut self, marker: impl Into<String>) -> Self {
        self.not_found_marker = marker.into();
        self
    }

    /// Set the JSON value key.
    pub fn with_value_key(mut self, key: impl Into<String>) -> Self {
        self.value_key = key.into();
        self
    }
}

impl Default for ScoreOptions {
    fn default() -> Self {
        Self {
            gamma: 1.8,
            runner_up_k: 2,
            min_content_tokens: 3,
            floor_factor: 0.6,
            short_window_factor: 0.8,
            not_found_marker: NOT_FOUND_MARKER.to_string(),
            value_key: VALUE_KEY.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = ScoreOptions::default();
        assert_eq!(options.gamma, 1.8);
        assert_eq!(options.runner_up_k, 2);
        assert_eq!(options.min_content_tokens, 3);
        assert_eq!(options.floor_factor, 0.6);
        assert_eq!(options.short_window_factor, 0.8);
        assert_eq!(options.not_found_marker, "NOT_FOUND");
        assert_eq!(options.value_key, "value");
    }

    #[test]
    fn test_builder() {
        let options = ScoreOptions::new()
            .with_gamma(2.0)
            .with_runner_up_k(4)
            .with_min_content_tokens(1)
            .with_floor_factor(0.5)
            .with_not_found_marker("N/A")
            .with_value_key("valore");
        assert_eq!(options.gamma, 2.0);
        assert_eq!(options.runner_up_k, 4);
        assert_eq!(options.min_content_tokens, 1);
        assert_eq!(options.floor_factor, 0.5);
        assert_eq!(options.not_found_marker, "N/A");
        assert_eq!(options.value_key, "valore");
    }
}
