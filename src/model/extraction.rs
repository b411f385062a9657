//! Extraction request and result types.

use serde::{Deserialize, Serialize};

use super::DocUnit;

/// Status reported for one extracted field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ExtractionStatus {
    /// A clear winner was found
    Ok,
    /// No candidate value exists
    NotFound,
    /// Several plausible candidates; the most likely one was chosen
    Ambiguous,
    /// Any other label, preserved verbatim
    Other(String),
}

impl ExtractionStatus {
    /// Wire label of the status.
    pub fn as_str(&self) -> &str {
        match self {
            ExtractionStatus::Ok => "OK",
            ExtractionStatus::NotFound => "NOT_FOUND",
            ExtractionStatus::Ambiguous => "AMBIGUOUS",
            ExtractionStatus::Other(s) => s,
        }
    }
}

impl From<String> for ExtractionStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "OK" => ExtractionStatus::Ok,
            "NOT_FOUND" => ExtractionStatus::NotFound,
            // "AMBIGUO" is the spelling the Italian extraction prompt asks for
            "AMBIGUOUS" | "AMBIGUO" => ExtractionStatus::Ambiguous,
            _ => ExtractionStatus::Other(s),
        }
    }
}

impl From<ExtractionStatus> for String {
    fn from(status: ExtractionStatus) -> Self {
        status.as_str().to_string()
    }
}

/// Source evidence for an extracted value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Evidence {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,
}

/// One extracted field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractionItem {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evidence: Option<Evidence>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ExtractionStatus>,

    /// Confidence in [0, 1]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,

    #[serde(default)]
    pub alternatives: Vec<String>,
}

impl ExtractionItem {
    /// Create an item with a name and value.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: Some(value.into()),
            ..Default::default()
        }
    }

    /// Set status and return self.
    pub fn with_status(mut self, status: ExtractionStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Set confidence and return self.
    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = Some(confidence);
        self
    }

    /// Check if the value is absent or equals the not-found marker.
    pub fn is_not_found(&self, marker: &str) -> bool {
        match self.value.as_deref() {
            None => true,
            Some(v) => v == marker,
        }
    }
}

/// The extraction step's parsed answer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractionResult {
    #[serde(default)]
    pub extractions: Vec<ExtractionItem>,
}

impl ExtractionResult {
    /// Create a result from items.
    pub fn new(extractions: Vec<ExtractionItem>) -> Self {
        Self { extractions }
    }

    /// Find an item by field name.
    pub fn get(&self, name: &str) -> Option<&ExtractionItem> {
        self.extractions.iter().find(|e| e.name == name)
    }
}

/// Request body for the extraction step with structured records.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocUnitRequest {
    pub records: Vec<DocUnit>,
    pub fields: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Request body for the extraction step with records as JSONL text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocUnitTextRequest {
    pub records: String,
    pub fields: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_aliases() {
        let item: ExtractionItem =
            serde_json::from_str(r#"{"name":"x","value":"1","status":"AMBIGUO"}"#).unwrap();
        assert_eq!(item.status, Some(ExtractionStatus::Ambiguous));

        let json = serde_json::to_string(&item).unwrap();
        assert!(json.contains(r#""status":"AMBIGUOUS""#));
    }

    #[test]
    fn test_status_other_preserved() {
        let status = ExtractionStatus::from("PARTIAL".to_string());
        assert_eq!(status, ExtractionStatus::Other("PARTIAL".into()));
        assert_eq!(String::from(status), "PARTIAL");
    }

    #[test]
    fn test_is_not_found() {
        assert!(ExtractionItem::new("a", "NOT_FOUND").is_not_found("NOT_FOUND"));
        assert!(ExtractionItem {
            name: "a".into(),
            ..Default::default()
        }
        .is_not_found("NOT_FOUND"));
        assert!(!ExtractionItem::new("a", "42").is_not_found("NOT_FOUND"));
    }

    #[test]
    fn test_result_parse() {
        let json = r#"{"extractions":[
            {"name":"importo","value":"€ 1.200,00","evidence":{"snippet":"Totale € 1.200,00"},
             "status":"OK","confidence":0.9,"alternatives":[]}
        ]}"#;
        let result: ExtractionResult = serde_json::from_str(json).unwrap();
        let item = result.get("importo").unwrap();
        assert_eq!(item.confidence, Some(0.9));
        assert_eq!(
            item.evidence.as_ref().unwrap().snippet.as_deref(),
            Some("Totale € 1.200,00")
        );
    }
}
