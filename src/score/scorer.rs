//! Margin-based confidence of a token window.

use regex::Regex;

use crate::model::Token;

use super::offsets::Range;
use super::options::ScoreOptions;

/// Ratio bounds before taking the log.
const RATIO_EPSILON: f64 = 1e-9;

/// Clamp to [0, 1], keeping NaN.
pub fn clamp01(v: f64) -> f64 {
    if v.is_nan() {
        return v;
    }
    v.clamp(0.0, 1.0)
}

/// Scores token windows from their log-probabilities.
///
/// Only content tokens count: tokens with at least one letter or digit and
/// an informative log-probability (present, finite, non-zero). Each one
/// contributes its probability margin over the strongest alternative; the
/// window score is the geometric mean of those margins, sharpened for long
/// windows and discounted for short ones.
pub struct ConfidenceScorer {
    options: ScoreOptions,
    content_regex: Regex,
}

impl Default for ConfidenceScorer {
    fn default() -> Self {
        Self::new(ScoreOptions::default())
    }
}

impl ConfidenceScorer {
    /// Create a scorer.
    pub fn new(options: ScoreOptions) -> Self {
        Self {
            options,
            content_regex: Regex::new(r"[\p{L}\p{N}]").unwrap(),
        }
    }

    /// Get the options.
    pub fn options(&self) -> &ScoreOptions {
        &self.options
    }

    /// Check if a token string carries a letter or digit.
    pub fn is_content_token(&self, text: &str) -> bool {
        self.content_regex.is_match(text)
    }

    fn content_tokens<'t>(
        &'t self,
        tokens: &'t [Token],
        range: Range,
    ) -> impl Iterator<Item = (&'t Token, f64)> + 't {
        let end = range.end.min(tokens.len());
        let start = range.start.min(end);
        tokens[start..end].iter().filter_map(move |t| {
            let lp = t.informative_log_probability()?;
            self.is_content_token(&t.text).then_some((t, lp))
        })
    }

    /// Number of scoring content tokens in the window.
    pub fn count_content_tokens(&self, tokens: &[Token], range: Range) -> usize {
        self.content_tokens(tokens, range).count()
    }

    /// Geometric mean of per-token margins; `None` without content tokens.
    pub fn margin_geometric_mean(&self, tokens: &[Token], range: Range) -> Option<f64> {
        let mut sum_log = 0.0;
        let mut used = 0usize;

        for (token, lp) in self.content_tokens(tokens, range) {
            let p = lp.exp();
            let p2 = token
                .alternatives
                .iter()
                .filter(|alt| alt.text != token.text)
                .filter_map(|alt| alt.log_probability)
                .map(f64::exp)
                .fold(0.0, |best, q| if q > best { q } else { best });

            let ratio = if p2 > 0.0 { p / (p + p2) } else { p };
            sum_log += ratio.clamp(RATIO_EPSILON, 1.0 - RATIO_EPSILON).ln();
            used += 1;
        }

        if used == 0 {
            return None;
        }
        Some((sum_log / used as f64).exp())
    }

    /// Confidence of the window in [0, 1]; `None` without content tokens.
    pub fn score(&self, tokens: &[Token], range: Range) -> Option<f64> {
        let gm = self.margin_geometric_mean(tokens, range)?;
        let len = self.count_content_tokens(tokens, range);
        let o = &self.options;

        if len < o.min_content_tokens {
            return Some(clamp01(gm * o.short_window_factor));
        }

        let k = f64::from(o.runner_up_k.max(1));
        let length_penalty = len as f64 / (len as f64 + k);
        let sharpened = gm.max(RATIO_EPSILON).powf(o.gamma.max(1.0));
        let strict = clamp01(sharpened * length_penalty);
        let floor = clamp01(gm * o.floor_factor.clamp(0.0, 1.0));
        Some(strict.max(floor))
    }
}
