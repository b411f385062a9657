//! Completion tokens with log-probabilities.

use serde::{Deserialize, Serialize};

/// A runner-up candidate considered at one token position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alternative {
    #[serde(rename = "token")]
    pub text: String,
    #[serde(rename = "logprob", default)]
    pub log_probability: Option<f64>,
}

impl Alternative {
    /// Create an alternative.
    pub fn new(text: impl Into<String>, log_probability: f64) -> Self {
        Self {
            text: text.into(),
            log_probability: Some(log_probability),
        }
    }
}

/// One emitted completion token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    /// Raw token string
    #[serde(rename = "token")]
    pub text: String,

    /// Natural-log probability of the emitted token
    #[serde(rename = "logprob", default)]
    pub log_probability: Option<f64>,

    /// Runner-up candidates at this position
    #[serde(rename = "top_logprobs", default)]
    pub alternatives: Vec<Alternative>,
}

impl Token {
    /// Create a token with a log-probability.
    pub fn new(text: impl Into<String>, log_probability: f64) -> Self {
        Self {
            text: text.into(),
            log_probability: Some(log_probability),
            alternatives: Vec::new(),
        }
    }

    /// Create a token without probability data.
    pub fn bare(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            log_probability: None,
            alternatives: Vec::new(),
        }
    }

    /// Add a runner-up alternative and return self.
    pub fn with_alternative(mut self, text: impl Into<String>, log_probability: f64) -> Self {
        self.alternatives.push(Alternative::new(text, log_probability));
        self
    }

    /// Log-probability if it carries information (present, finite, non-zero).
    pub fn informative_log_probability(&self) -> Option<f64> {
        self.log_probability
            .filter(|lp| lp.is_finite() && *lp != 0.0)
    }
}

/// Token log-probabilities of one completion.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LogProbs {
    #[serde(default)]
    pub content: Vec<Token>,
}

impl LogProbs {
    /// Create from tokens.
    pub fn new(content: Vec<Token>) -> Self {
        Self { content }
    }

    /// Convert a loosely-typed payload, returning `None` if the shape is wrong.
    ///
    /// Accepts either the `{"content": [...]}` object or a bare token array.
    pub fn from_value(value: serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::Null => None,
            serde_json::Value::Array(_) => serde_json::from_value::<Vec<Token>>(value)
                .map(Self::new)
                .map_err(|e| log::debug!("token array did not parse: {}", e))
                .ok(),
            other => serde_json::from_value(other)
                .map_err(|e| log::debug!("logprobs payload did not parse: {}", e))
                .ok(),
        }
    }

    /// Completion text reconstructed from the token strings.
    pub fn text(&self) -> String {
        self.content.iter().map(|t| t.text.as_str()).collect()
    }

    /// Tokens of the completion.
    pub fn tokens(&self) -> &[Token] {
        &self.content
    }

    /// Number of tokens.
    pub fn len(&self) -> usize {
        self.content.len()
    }

    /// Check if there are no tokens.
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_value_object() {
        let value = json!({
            "content": [
                {"token": "{\"", "logprob": -0.01, "bytes": [123, 34], "top_logprobs": []},
                {"token": "value", "logprob": -0.2,
                 "top_logprobs": [{"token": "value", "logprob": -0.2}, {"token": "val", "logprob": -2.0}]}
            ]
        });
        let lp = LogProbs::from_value(value).unwrap();
        assert_eq!(lp.len(), 2);
        assert_eq!(lp.text(), "{\"value");
        assert_eq!(lp.tokens()[1].alternatives.len(), 2);
    }

    #[test]
    fn test_from_value_array_and_garbage() {
        let lp = LogProbs::from_value(json!([{"token": "a", "logprob": -1.0}])).unwrap();
        assert_eq!(lp.text(), "a");

        assert!(LogProbs::from_value(json!(null)).is_none());
        assert!(LogProbs::from_value(json!("nope")).is_none());
        assert!(LogProbs::from_value(json!({"content": 3})).is_none());
    }

    #[test]
    fn test_informative_log_probability() {
        assert_eq!(Token::new("a", -0.5).informative_log_probability(), Some(-0.5));
        assert_eq!(Token::new("a", 0.0).informative_log_probability(), None);
        assert_eq!(Token::new("a", f64::NAN).informative_log_probability(), None);
        assert_eq!(
            Token::new("a", f64::NEG_INFINITY).informative_log_probability(),
            None
        );
        assert_eq!(Token::bare("a").informative_log_probability(), None);
    }
}
