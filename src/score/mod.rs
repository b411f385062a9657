//! Token-window confidence scoring.
//!
//! Each extracted value is located in the raw completion text, mapped to the
//! tokens that produced it, and scored from their log-probabilities. Fields
//! are processed in reported order with a forward-only cursor so that two
//! fields with the same value map to different spans.
//!
//! # Example
//!
//! ```
//! use docunit::model::{ExtractionItem, ExtractionResult, Token};
//! use docunit::score::{score_extractions, ScoreOptions};
//!
//! let completion = r#"{"value":"Roma"}"#;
//! let tokens = vec![
//!     Token::new(r#"{"value":""#, -0.01),
//!     Token::new("Roma", -0.05),
//!     Token::new(r#""}"#, -0.01),
//! ];
//! let mut result = ExtractionResult::new(vec![ExtractionItem::new("city", "Roma")]);
//!
//! let summary = score_extractions(&mut result, completion, &tokens, &ScoreOptions::default());
//! assert_eq!(summary.scored, 1);
//! assert!(result.extractions[0].confidence.unwrap() > 0.7);
//! ```

mod locator;
mod offsets;
mod options;
mod scorer;
mod windows;

pub use locator::{ValueMatch, ValueWindowLocator};
pub use offsets::{Range, TokenOffsets};
pub use options::{ScoreOptions, NOT_FOUND_MARKER, VALUE_KEY};
pub use scorer::{clamp01, ConfidenceScorer};
pub use windows::key_value_windows;

use crate::model::{ExtractionItem, ExtractionResult, LogProbs, Token};

/// What happened to one field during scoring.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldOutcome {
    /// Confidence overwritten with a computed score
    Scored(f64),
    /// Value absent or the not-found marker; confidence set to 0.0
    NotFound,
    /// Value not present in the completion text; confidence kept
    Unlocated,
    /// Located, but no token window or no content tokens; confidence kept
    Unscored,
}

/// Counts of field outcomes for one scoring pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScoreSummary {
    pub scored: usize,
    pub not_found: usize,
    pub unlocated: usize,
    pub unscored: usize,
}

impl ScoreSummary {
    fn record(mut self, outcome: FieldOutcome) -> Self {
        match outcome {
            FieldOutcome::Scored(_) => self.scored += 1,
            FieldOutcome::NotFound => self.not_found += 1,
            FieldOutcome::Unlocated => self.unlocated += 1,
            FieldOutcome::Unscored => self.unscored += 1,
        }
        self
    }

    /// Number of fields seen.
    pub fn total(&self) -> usize {
        self.scored + self.not_found + self.unlocated + self.unscored
    }
}

/// Score one field from `cursor`; returns the outcome and the next cursor.
pub fn score_field(
    item: &mut ExtractionItem,
    cursor: usize,
    locator: &ValueWindowLocator<'_>,
    scorer: &ConfidenceScorer,
    tokens: &[Token],
) -> (FieldOutcome, usize) {
    if item.is_not_found(&scorer.options().not_found_marker) {
        item.confidence = Some(0.0);
        return (FieldOutcome::NotFound, cursor);
    }
    let value = item.value.as_deref().unwrap_or_default();

    let Some(found) = locator.locate(value, cursor) else {
        log::debug!("value of {} not found after byte {}", item.name, cursor);
        return (FieldOutcome::Unlocated, cursor);
    };

    let score = found.tokens.and_then(|range| scorer.score(tokens, range));
    let outcome = match score {
        Some(score) => {
            log::debug!("{}: confidence {:.4}", item.name, score);
            item.confidence = Some(score);
            FieldOutcome::Scored(score)
        }
        None => FieldOutcome::Unscored,
    };
    (outcome, found.end)
}

/// Recompute field confidences from the completion's log-probabilities.
///
/// Fields are scored in order; a computed score overwrites the reported
/// confidence, not-found fields get exactly 0.0, and every other field keeps
/// its reported confidence.
pub fn score_extractions(
    result: &mut ExtractionResult,
    completion: &str,
    tokens: &[Token],
    options: &ScoreOptions,
) -> ScoreSummary {
    let joined_len: usize = tokens.iter().map(|t| t.text.len()).sum();
    if joined_len != completion.len()
        || !tokens
            .iter()
            .scan(0usize, |pos, t| {
                let start = *pos;
                *pos += t.text.len();
                Some(completion.get(start..*pos) == Some(t.text.as_str()))
            })
            .all(|same| same)
    {
        log::warn!("token text does not match the completion text; windows may be misaligned");
    }

    let locator = ValueWindowLocator::new(completion, tokens, options.value_key.as_str());
    let scorer = ConfidenceScorer::new(options.clone());

    let (_, summary) = result.extractions.iter_mut().fold(
        (0usize, ScoreSummary::default()),
        |(cursor, summary), item| {
            let (outcome, next) = score_field(item, cursor, &locator, &scorer, tokens);
            (next, summary.record(outcome))
        },
    );
    log::debug!("scored {} of {} fields", summary.scored, summary.total());
    summary
}

/// Score with a log-probability payload; the completion text defaults to
/// the concatenated tokens.
pub fn score_with_logprobs(
    result: &mut ExtractionResult,
    completion: Option<&str>,
    logprobs: &LogProbs,
    options: &ScoreOptions,
) -> ScoreSummary {
    match completion {
        Some(text) => score_extractions(result, text, logprobs.tokens(), options),
        None => {
            let text = logprobs.text();
            score_extractions(result, &text, logprobs.tokens(), options)
        }
    }
}
