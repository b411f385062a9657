//! Locating reported values in the raw completion text.

use regex::Regex;

use crate::model::Token;

use super::offsets::{Range, TokenOffsets};

/// A located value: its byte span in the completion and its token window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValueMatch {
    /// First byte of the value (after the opening quote)
    pub start: usize,
    /// One past the last byte of the value (at the closing quote)
    pub end: usize,
    /// Token window, if the span maps onto at least one whole token
    pub tokens: Option<Range>,
}

/// Finds `"<key>": "<value>"` occurrences of literal values.
pub struct ValueWindowLocator<'t> {
    text: &'t str,
    offsets: TokenOffsets,
    value_key: String,
}

impl<'t> ValueWindowLocator<'t> {
    /// Create a locator over a completion and its tokens.
    pub fn new(text: &'t str, tokens: &[Token], value_key: impl Into<String>) -> Self {
        Self {
            text,
            offsets: TokenOffsets::new(tokens),
            value_key: value_key.into(),
        }
    }

    /// Offset table of the tokens.
    pub fn offsets(&self) -> &TokenOffsets {
        &self.offsets
    }

    /// First occurrence of `value` at or after byte `cursor`.
    ///
    /// The value is matched exactly, in its JSON-escaped form, as the string
    /// under the value key. The caller advances its cursor to `end`.
    pub fn locate(&self, value: &str, cursor: usize) -> Option<ValueMatch> {
        if cursor > self.text.len() {
            return None;
        }
        let escaped = json_escape(value);
        let pattern = format!(
            r#""{}"\s*:\s*"({})""#,
            regex::escape(&self.value_key),
            regex::escape(&escaped)
        );
        let re = match Regex::new(&pattern) {
            Ok(re) => re,
            Err(e) => {
                log::warn!("cannot search for value of length {}: {}", value.len(), e);
                return None;
            }
        };

        let group = re.captures_at(self.text, cursor)?.get(1)?;
        let tokens = self.offsets.char_range_to_tokens(group.start(), group.end());
        log::debug!(
            "value located at bytes {}..{}, tokens {:?}",
            group.start(),
            group.end(),
            tokens
        );
        Some(ValueMatch {
            start: group.start(),
            end: group.end(),
            tokens,
        })
    }
}

/// JSON string body of `value`, without the surrounding quotes.
fn json_escape(value: &str) -> String {
    let quoted = serde_json::Value::String(value.to_string()).to_string();
    quoted[1..quoted.len() - 1].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split(text: &str, at: &[usize]) -> Vec<Token> {
        let mut tokens = Vec::new();
        let mut prev = 0;
        for &i in at.iter().chain(std::iter::once(&text.len())) {
            tokens.push(Token::new(&text[prev..i], -0.1));
            prev = i;
        }
        tokens
    }

    #[test]
    fn test_locate_value_and_tokens() {
        let text = r#"{"name":"total","value":"12,50"}"#;
        let start = text.find("12,50").unwrap();
        let tokens = split(text, &[start, start + 5]);
        let locator = ValueWindowLocator::new(text, &tokens, "value");

        let found = locator.locate("12,50", 0).unwrap();
        assert_eq!(found.start, start);
        assert_eq!(found.end, start + 5);
        assert_eq!(found.tokens, Some(Range::new(1, 2)));
    }

    #[test]
    fn test_cursor_skips_earlier_occurrence() {
        let text = r#"[{"value": "A"}, {"value" : "A"}]"#;
        let tokens = vec![Token::new(text, -0.1)];
        let locator = ValueWindowLocator::new(text, &tokens, "value");

        let first = locator.locate("A", 0).unwrap();
        let second = locator.locate("A", first.end).unwrap();
        assert!(second.start > first.end);
        assert!(locator.locate("A", second.end).is_none());
    }

    #[test]
    fn test_only_matches_value_key() {
        let text = r#"{"name":"IBAN","value":"IT60X"}"#;
        let tokens = vec![Token::new(text, -0.1)];
        let locator = ValueWindowLocator::new(text, &tokens, "value");
        assert!(locator.locate("IBAN", 0).is_none());
        assert!(locator.locate("IT6", 0).is_none());
    }

    #[test]
    fn test_escaped_and_special_values() {
        let text = r#"{"value":"Via \"Roma\" 1 (sede)"}"#;
        let tokens = vec![Token::new(text, -0.1)];
        let locator = ValueWindowLocator::new(text, &tokens, "value");
        let found = locator.locate("Via \"Roma\" 1 (sede)", 0).unwrap();
        assert_eq!(&text[found.start..found.end], r#"Via \"Roma\" 1 (sede)"#);
        // Single token spanning the whole text does not fit inside the value
        assert_eq!(found.tokens, None);
    }

    #[test]
    fn test_cursor_past_end() {
        let locator = ValueWindowLocator::new("", &[], "value");
        assert!(locator.locate("x", 10).is_none());
    }

    #[test]
    fn test_json_escape() {
        assert_eq!(json_escape("a\"b"), r#"a\"b"#);
        assert_eq!(json_escape("riga\nnuova"), r"riga\nnuova");
        assert_eq!(json_escape("€"), "€");
    }
}
