//! Token windows of every string value under a JSON key.

use regex::Regex;

use crate::model::Token;

use super::offsets::{Range, TokenOffsets};

/// Token windows of all `"<key>": "<string>"` values in the token text.
///
/// Strings are matched lazily up to the next quote, so values containing
/// escaped quotes are cut short. Windows that do not cover a whole token
/// are skipped.
pub fn key_value_windows(tokens: &[Token], key: &str) -> Vec<Range> {
    let text: String = tokens.iter().map(|t| t.text.as_str()).collect();
    let offsets = TokenOffsets::new(tokens);
    let re = Regex::new(&format!(r#"(?s)"{}"\s*:\s*"(.*?)""#, regex::escape(key))).unwrap();

    re.captures_iter(&text)
        .filter_map(|caps| caps.get(1))
        .filter_map(|m| offsets.char_range_to_tokens(m.start(), m.end()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(parts: &[&str]) -> Vec<Token> {
        parts.iter().map(|p| Token::new(*p, -0.1)).collect()
    }

    #[test]
    fn test_windows_for_each_value() {
        let toks = tokens(&[
            "[{\"", "value", "\":\"", "Mario", " Rossi", "\"},{\"", "value", "\": \"", "12", "\"}]",
        ]);
        let windows = key_value_windows(&toks, "value");
        assert_eq!(windows, vec![Range::new(3, 5), Range::new(8, 9)]);
    }

    #[test]
    fn test_empty_value_has_no_window() {
        let toks = tokens(&["{\"value\":\"", "\"}"]);
        assert!(key_value_windows(&toks, "value").is_empty());
    }

    #[test]
    fn test_key_is_literal() {
        let toks = tokens(&["{\"a.b\":\"", "x", "\",\"aXb\":\"", "y", "\"}"]);
        assert_eq!(key_value_windows(&toks, "a.b"), vec![Range::new(1, 2)]);
    }
}
